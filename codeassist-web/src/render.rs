use pulldown_cmark::{Options, Parser, html};

/// The query form served at `/`.
pub const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>CodeAssist AI</title>
<style>
  body { font-family: sans-serif; max-width: 56rem; margin: 2rem auto; padding: 0 1rem; }
  textarea, input { width: 100%; box-sizing: border-box; font-family: inherit; }
  textarea { min-height: 12rem; }
  button { margin-top: 0.5rem; padding: 0.5rem 1.5rem; }
</style>
</head>
<body>
<h1>CodeAssist AI</h1>
<p>Your coding companion: generate new code, debug errors, optimize, and learn.</p>
<form action="/submit" method="post">
  <label for="user_id">User ID (optional)</label>
  <input type="text" id="user_id" name="user_id" placeholder="Enter a unique identifier or leave blank for default">
  <label for="query">Describe your coding task or paste code with errors</label>
  <textarea id="query" name="query" placeholder="Example: 'How do I create a REST API in Python?'"></textarea>
  <button type="submit">Submit</button>
  <button type="submit" formaction="/new-session">Start New Session</button>
</form>
<h3>Tips for best results</h3>
<ul>
  <li>Be specific about what you're trying to accomplish</li>
  <li>Include error messages if you're debugging code</li>
  <li>Mention the programming language, framework, or libraries you're using</li>
  <li>Start a new session for unrelated coding tasks</li>
</ul>
</body>
</html>
"#;

/// Render the assistant's markdown reply into a full response page.
pub fn response_page(markdown: &str) -> String {
    let mut body = String::new();
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    html::push_html(&mut body, parser);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>CodeAssist AI Response</title>
<style>
  body {{ font-family: sans-serif; max-width: 56rem; margin: 2rem auto; padding: 0 1rem; }}
  pre {{ background: #f4f4f4; padding: 1rem; overflow-x: auto; }}
  code {{ font-family: monospace; }}
</style>
</head>
<body>
<h1>CodeAssist AI Response</h1>
{}
<p><a href="/">Ask another question</a></p>
</body>
</html>
"#,
        body
    )
}

/// Generic error page for stage failures.
pub fn error_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>CodeAssist AI</title></head>
<body>
<h1>Something went wrong</h1>
<p>The assistant could not process your request. Please try again or start a new session.</p>
<p><a href="/">Back</a></p>
</body>
</html>
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_submits_the_entered_user_id() {
        // one user_id field feeds both actions
        assert_eq!(INDEX_PAGE.matches(r#"name="user_id""#).count(), 1);
        assert!(INDEX_PAGE.contains(r#"formaction="/new-session""#));
    }

    #[test]
    fn response_page_renders_markdown() {
        let page = response_page("## Solution\n\nUse `Vec::sort`.");
        assert!(page.contains("<h2>Solution</h2>"));
        assert!(page.contains("<code>Vec::sort</code>"));
    }
}
