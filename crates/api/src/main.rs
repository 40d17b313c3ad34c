//! LabGate - command-line client for the lab gateway
//!
//! Main entry point for the `labgate` binary.

use std::io::Write;

use anyhow::Context;
use clap::{Parser, Subcommand};
use labgate_infra::ApiRequest;
use labgate_lib::utils::logging::init_logging;
use labgate_lib::{requests, session, AppContext};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the issued tokens
    Login {
        email: String,
        #[arg(long, env = "LABGATE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Keep the session across restarts
        #[arg(long)]
        remember: bool,
    },
    /// Create an account
    Register {
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, env = "LABGATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget every stored credential
    Logout,
    /// Show the local session state
    Status,
    /// Request a password reset email
    ForgotPassword { email: String },
    /// Complete a password reset
    ResetPassword {
        token: String,
        #[arg(long, env = "LABGATE_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
    /// GET a gateway path with the stored session
    Get { path: String },
    /// Send a JSON request with the stored session
    Send {
        #[arg(value_parser = ["POST", "PUT", "PATCH", "DELETE"], ignore_case = true)]
        method: String,
        path: String,
        /// JSON request body
        #[arg(long)]
        body: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before logging so LABGATE_LOG applies
    let dotenv = dotenvy::dotenv();
    init_logging();
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) => tracing::debug!(error = %err, "no .env file loaded"),
    }

    let cli = Cli::parse();
    let ctx = AppContext::new().context("failed to initialise application context")?;
    let listener = ctx.spawn_event_listener();

    let outcome = run(&ctx, cli.command).await;

    // Let the listener drain events published by the command
    tokio::task::yield_now().await;
    listener.abort();

    let output = outcome?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

async fn run(ctx: &AppContext, command: Command) -> anyhow::Result<Value> {
    let output = match command {
        Command::Login { email, password, remember } => {
            serde_json::to_value(session::login(ctx, &email, &password, remember).await?)?
        }
        Command::Register { email, name, password } => {
            session::register(ctx, &email, &password, &name).await?
        }
        Command::Logout => {
            session::logout(ctx)?;
            serde_json::to_value(session::status(ctx))?
        }
        Command::Status => serde_json::to_value(session::status(ctx))?,
        Command::ForgotPassword { email } => {
            session::forgot_password(ctx, &email).await?;
            Value::Null
        }
        Command::ResetPassword { token, new_password } => {
            session::reset_password(ctx, &token, &new_password).await?;
            Value::Null
        }
        Command::Get { path } => requests::get(ctx, &path).await?,
        Command::Send { method, path, body } => {
            let request = match method.to_ascii_uppercase().as_str() {
                "POST" => ApiRequest::post(path),
                "PUT" => ApiRequest::put(path),
                "PATCH" => ApiRequest::patch(path),
                _ => ApiRequest::delete(path),
            };
            let request = match body {
                Some(raw) => {
                    let body: Value =
                        serde_json::from_str(&raw).context("--body must be valid JSON")?;
                    request.json(&body)?
                }
                None => request,
            };
            requests::send(ctx, request).await?
        }
    };
    Ok(output)
}
