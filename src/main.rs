//! Quest engine - scripted waypoint quest for groups of participants
//!
//! Plays timed content, routes each group through waypoints chosen by its
//! access code and scores a true/false quiz. The binary wires the engine to
//! a console transport.

mod catalog;
mod config;
mod console;
mod content;
mod dispatcher;
mod quiz;
mod route;
mod runtime;
mod session;
mod state_machine;

use catalog::Catalog;
use config::QuestConfig;
use console::ConsoleTransport;
use dispatcher::Dispatcher;
use runtime::QuestRuntime;
use session::InMemorySessionStore;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout belongs to the console transport
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quest_engine=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = QuestConfig::from_env()?;
    let catalog = Arc::new(Catalog::from_config(config)?);
    tracing::info!(
        interval_ms = u64::try_from(catalog.interval.as_millis()).unwrap_or(u64::MAX),
        scripts = catalog.scripts.len(),
        quiz_questions = catalog.quiz.len(),
        "Catalog loaded"
    );

    let store = Arc::new(InMemorySessionStore::new());
    let dispatcher = Dispatcher::new(catalog, store)?;
    let runtime = QuestRuntime::new(dispatcher, ConsoleTransport::new());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!(
                        active_sessions = runtime.active_sessions().await,
                        "Input closed, finishing queued events"
                    );
                    runtime.close().await;
                    break;
                };
                match console::parse_line(&line) {
                    Some((session_id, event)) => {
                        if let Err(e) = runtime.submit(&session_id, event).await {
                            tracing::warn!(
                                session_id = %session_id,
                                error = %e,
                                "Failed to submit event"
                            );
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => tracing::warn!(
                        line = %line,
                        "Expected `<session> <text>` or `<session> [token]`"
                    ),
                }
            }
            signal = &mut ctrl_c => {
                signal?;
                tracing::info!("Received Ctrl-C, shutting down");
                runtime.shutdown().await;
                break;
            }
        }
    }

    Ok(())
}
