use anyhow::Context;
use chat_session::protocol::AgentConfig;
use chat_session::transports::transport_for_id;
use chat_session::{ChatController, ChatSession};
use colored::Colorize;

use agent_chat::{logging, repl, EnvConfig};

fn main() -> anyhow::Result<()> {
    let config = EnvConfig::from_env()?;
    if !config.color {
        colored::control::set_override(false);
    }
    logging::init(&config)?;

    let transport = transport_for_id(&config.transport_id, config.api_config())
        .with_context(|| format!("failed to set up '{}' transport", config.transport_id))?;
    tracing::info!(transport = transport.id(), base_url = %config.base_url, "starting agent chat");

    match transport.probe() {
        Ok(Some(status)) => tracing::info!(%status, "backend reachable"),
        Ok(None) => {}
        Err(error) => {
            tracing::warn!(%error, "backend health probe failed");
            eprintln!(
                "{}",
                format!("Backend not reachable at {}; messages will fail until it is up.", config.base_url)
                    .yellow()
            );
        }
    }

    let controller = ChatController::new(ChatSession::new(AgentConfig::web_search_agent()), transport);
    repl::run(controller, config.view_options()).context("chat loop failed")?;

    Ok(())
}
