use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use finalyser_chat::{ProxyClient, UpstreamClient};
use finalyser_core::{Tab, View};
use std::path::PathBuf;

mod chat;
mod config;
mod logging;
mod render;
mod shell;
mod state;

use chat::{ChatTarget, Conversation};

#[derive(Parser, Debug)]
#[command(
    name = "finalyser",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FINALYSER_BUILD_SHA"), ")"),
    about = "Personal finance dashboard with an AI assistant"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one dashboard tab and exit
    Show {
        /// overview, expenses, income, budget or goals (unknown names show overview)
        #[arg(default_value = "overview")]
        tab: String,

        /// JSON fixture to load instead of the sample data
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Interactive session: switch tabs, edit records, chat
    Session {
        #[arg(long)]
        data: Option<PathBuf>,

        /// Send chat turns through a running proxy instead of the upstream service
        #[arg(long)]
        proxy: Option<String>,
    },

    /// Ask the assistant one question about the data
    Chat {
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,

        #[arg(long)]
        data: Option<PathBuf>,

        /// Proxy endpoint, e.g. http://127.0.0.1:8787/financial-chat
        #[arg(long)]
        proxy: Option<String>,
    },

    /// Run the chat proxy HTTP endpoint
    Serve {
        /// Listen address (default from config: 127.0.0.1:8787)
        #[arg(long)]
        bind: Option<String>,
    },

    /// Manage ~/.finalyser/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,

    /// Print the effective config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Show { tab, data } => {
            let store = state::load_store(data.as_deref())?;
            let tab = Tab::route(&tab);
            println!("{}\n", render::tab_bar(tab));
            print!("{}", render::render(&View::build(tab, &store)));
        }

        Command::Session { data, proxy } => {
            let store = state::load_store(data.as_deref())?;
            shell::run(store, chat_target(proxy)?).await?;
        }

        Command::Chat { message, data, proxy } => {
            let store = state::load_store(data.as_deref())?;
            let mut convo = Conversation::new(chat_target(proxy)?);
            convo
                .send_to_console(&message.join(" "), Some(&store.snapshot()))
                .await;
        }

        Command::Serve { bind } => {
            let cfg = config::load_config()?;
            let bind = bind.unwrap_or_else(|| cfg.server.bind.clone());
            let upstream = UpstreamClient::new(cfg.upstream_config());
            if upstream.config().api_key.is_none() {
                tracing::warn!(
                    var = %cfg.chat.api_key_env,
                    "API key missing; chat requests will fail until it is set"
                );
            }

            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .with_context(|| format!("bind {bind}"))?;
            finalyser_chat::serve(listener, upstream, shutdown_signal())
                .await
                .context("proxy server")?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

fn chat_target(proxy: Option<String>) -> Result<ChatTarget> {
    match proxy {
        Some(endpoint) => Ok(ChatTarget::Proxy(ProxyClient::new(endpoint))),
        None => {
            let cfg = config::load_config()?;
            Ok(ChatTarget::Direct(UpstreamClient::new(cfg.upstream_config())))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
