use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_usage() {
    cargo_bin_cmd!("codeassist")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("coding assistant pipeline"));
}

#[test]
fn test_version_shows_version() {
    cargo_bin_cmd!("codeassist")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("codeassist"));
}

#[test]
fn test_help_lists_session_reset() {
    cargo_bin_cmd!("codeassist")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("new-session"));
}

#[test]
fn test_new_session_without_api_key_fails_gracefully() {
    cargo_bin_cmd!("codeassist")
        .env_remove("GEMINI_API_KEY")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("CODEASSIST_PROVIDER")
        .arg("new-session")
        .assert()
        .failure();
}

#[test]
fn test_unknown_provider_fails_gracefully() {
    cargo_bin_cmd!("codeassist")
        .args(["--provider", "nonexistent", "ask", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown provider"));
}

#[test]
fn test_ask_without_api_key_fails_gracefully() {
    cargo_bin_cmd!("codeassist")
        .env_remove("GEMINI_API_KEY")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("CODEASSIST_PROVIDER")
        .args(["ask", "hello"])
        .assert()
        .failure();
}
