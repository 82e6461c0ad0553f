mod common;

use codeassist::CodeAssist;

use common::MockProvider;

#[tokio::test]
async fn distinct_users_have_independent_sessions() {
    let provider = MockProvider::with_responses(vec![
        "u1-a", "u1-b", "u1-c", "u1-d", // first user's run
        "u2-a", "u2-b", "u2-c", "u2-d", // second user's run
    ]);
    let assistant = CodeAssist::builder()
        .provider(provider)
        .build()
        .expect("build");

    assistant
        .process_to_text("alice", "question one")
        .await
        .expect("alice's run");
    assistant
        .process_to_text("bob", "question two")
        .await
        .expect("bob's run");

    let alice = assistant.session("alice").await;
    let bob = assistant.session("bob").await;

    assert_ne!(alice.id, bob.id);
    assert_eq!(alice.output("code_explanation"), Some("u1-d"));
    assert_eq!(bob.output("code_explanation"), Some("u2-d"));

    // No cross-contamination of recorded outputs
    for text in alice.outputs.values() {
        assert!(text.starts_with("u1-"));
    }
    for text in bob.outputs.values() {
        assert!(text.starts_with("u2-"));
    }
}

#[tokio::test]
async fn reset_discards_accumulated_state() {
    let provider = MockProvider::with_responses(vec!["a", "b", "c", "d"]);
    let assistant = CodeAssist::builder()
        .provider(provider)
        .build()
        .expect("build");

    assistant
        .process_to_text("u1", "hello")
        .await
        .expect("run");

    let before = assistant.session("u1").await;
    assert_eq!(before.output("code_explanation"), Some("d"));

    let new_id = assistant.new_session("u1").await.expect("reset");
    assert_ne!(new_id, before.id);

    let after = assistant.session("u1").await;
    assert_eq!(after.id, new_id);
    assert!(after.outputs.is_empty());
}

#[tokio::test]
async fn consecutive_resets_yield_distinct_ids() {
    let provider = MockProvider::with_responses(vec![]);
    let assistant = CodeAssist::builder()
        .provider(provider)
        .build()
        .expect("build");

    let first = assistant.new_session("u1").await.expect("first reset");
    let second = assistant.new_session("u1").await.expect("second reset");
    assert_ne!(first, second);
}

#[tokio::test]
async fn session_is_created_lazily_on_first_contact() {
    let provider = MockProvider::with_responses(vec![]);
    let assistant = CodeAssist::builder()
        .provider(provider)
        .build()
        .expect("build");

    let session = assistant.session("new_user").await;
    assert!(session.id.starts_with("session_"));
    assert!(session.outputs.is_empty());
}
