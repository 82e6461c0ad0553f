mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use clap::Parser;
use serde::Deserialize;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use codeassist::{AppConfig, CodeAssist};

const DEFAULT_USER_ID: &str = "default_user";

#[derive(Parser)]
#[command(name = "codeassist-web", version)]
#[command(about = "Web front end for the CodeAssist AI pipeline", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// LLM provider to use (gemini, anthropic)
    #[arg(long)]
    provider: Option<String>,

    /// Model to use (provider-specific)
    #[arg(long)]
    model: Option<String>,

    /// Address to bind the server to
    #[arg(long)]
    bind: Option<String>,
}

struct AppState {
    assistant: CodeAssist,
}

#[derive(Deserialize)]
struct SubmitForm {
    query: String,
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Deserialize)]
struct NewSessionForm {
    #[serde(default)]
    user_id: Option<String>,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive("info".parse().expect("valid log directive"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load().unwrap_or_else(|e| {
        debug!(error = %e, "failed to load config, using defaults");
        AppConfig::default()
    });

    let provider_name = cli
        .provider
        .as_deref()
        .or(config.provider.as_deref())
        .unwrap_or("gemini");
    let model_name = cli.model.as_deref().or(config.model.as_deref());
    let bind = cli.bind.unwrap_or(config.web.bind);

    let assistant = CodeAssist::builder()
        .provider_by_name(provider_name, model_name)
        .context("failed to create LLM provider")?
        .build()
        .context("failed to build CodeAssist")?;

    let state = Arc::new(AppState { assistant });

    let app = Router::new()
        .route("/", get(index))
        .route("/submit", post(submit))
        .route("/new-session", post(new_session))
        .with_state(state);

    info!(provider = %provider_name, %bind, "starting web front end");

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(render::INDEX_PAGE)
}

async fn submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SubmitForm>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let user_id = form
        .user_id
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string());

    info!(user_id = %user_id, "received query");

    match state.assistant.process_to_text(&user_id, &form.query).await {
        Ok(reply) => Ok(Html(render::response_page(&reply))),
        Err(e) => {
            // A stage failure surfaces as a generic message, not a crash
            error!(error = %e, "pipeline failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render::error_page()),
            ))
        }
    }
}

async fn new_session(
    State(state): State<Arc<AppState>>,
    Form(form): Form<NewSessionForm>,
) -> Result<String, (StatusCode, String)> {
    let user_id = form
        .user_id
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string());

    match state.assistant.new_session(&user_id).await {
        Ok(session_id) => Ok(format!("Created new session: {}", session_id)),
        Err(e) => {
            error!(error = %e, "new session failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create a new session".to_string(),
            ))
        }
    }
}
