//! CLI for chat-relay
//!
//! Subcommands:
//! - `serve` (default): run the WebSocket channel and the HTTP API
//! - `client`: connect to a running relay, print history, send one message

use std::sync::{Arc, Mutex};

use anyhow::Context;
use chat_relay::broker::Broker;
use chat_relay::config::load_config;
use chat_relay::contact::ContactDesk;
use chat_relay::generator::{DeepAiClient, ResponseGenerator};
use chat_relay::notify::{Notifier, PostmarkMailer};
use chat_relay::persistence::SledStore;
use chat_relay::pipeline::Pipeline;
use chat_relay::transport::http::{AppState, start_http_server};
use chat_relay::transport::websocket::start_websocket_server;
use chat_relay::utils::logging;
use clap::{Parser, Subcommand};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "chat-relay")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the WebSocket and HTTP servers
    Serve,
    /// Connect to a relay, print the history, send one message and print the broadcasts
    Client {
        /// WebSocket URL of the relay
        #[arg(long, default_value = "ws://127.0.0.1:8080")]
        url: String,
        #[arg(long, default_value = "User")]
        sender: String,
        #[arg(long, default_value = "Hello from the smoke-test client")]
        body: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    match Cli::parse().into_command() {
        Command::Serve => run_server().await,
        Command::Client { url, sender, body } => {
            logging::init("info", false);
            run_client(&url, &sender, &body).await
        }
    }
}

async fn run_server() -> anyhow::Result<()> {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info", false);
            error!("Refusing to start: {e}");
            return Err(e).context("loading configuration");
        }
    };
    logging::init(&config.logging.level, config.logging.json);

    let store = Arc::new(
        SledStore::open(&config.store.path)
            .with_context(|| format!("opening message store at {}", config.store.path))?,
    );
    let notifier = Arc::new(Notifier::new(
        PostmarkMailer::new(&config.notifier.api_url, config.notifier.api_token.clone()),
        config.notifier.operator_email.clone(),
        config.notifier.from_address.clone(),
    ));
    let generator = Arc::new(ResponseGenerator::new(DeepAiClient::new(
        config.generator.api_url.clone(),
        config.generator.api_key.clone(),
    )));
    let pipeline = Pipeline::new(
        store.clone(),
        Arc::new(Mutex::new(Broker::new())),
        notifier.clone(),
        generator,
        config.chat.clone(),
    );
    let state = AppState {
        pipeline: pipeline.clone(),
        contacts: ContactDesk::new(store.clone(), notifier),
    };

    let ws_addr = config.ws_addr();
    let http_addr = config.http_addr();

    tokio::select! {
        res = start_websocket_server(&ws_addr, pipeline) => {
            error!("WebSocket server exited unexpectedly: {res:?}");
        }
        res = start_http_server(&http_addr, state) => {
            error!("HTTP server exited unexpectedly: {res:?}");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }

    store.flush().context("flushing message store")?;
    Ok(())
}

async fn run_client(url: &str, sender: &str, body: &str) -> anyhow::Result<()> {
    use futures_util::{SinkExt, StreamExt};
    use serde_json::json;
    use tokio_tungstenite::connect_async;
    use tokio_tungstenite::tungstenite::Message as WsMessage;

    let (mut ws_stream, _response) = connect_async(url)
        .await
        .with_context(|| format!("connecting to {url}"))?;

    // 1. History snapshot
    if let Some(Ok(WsMessage::Text(history))) = ws_stream.next().await {
        println!("History: {history}");
    }

    // 2. Send
    let send = json!({ "event": "sendMessage", "sender": sender, "body": body });
    ws_stream
        .send(WsMessage::Text(send.to_string().into()))
        .await?;

    // 3. Print broadcasts until the relay goes quiet
    loop {
        let next = tokio::time::timeout(std::time::Duration::from_secs(10), ws_stream.next());
        match next.await {
            Ok(Some(Ok(WsMessage::Text(incoming)))) => println!("Incoming: {incoming}"),
            Ok(Some(Ok(_))) => continue,
            Ok(Some(Err(e))) => return Err(e.into()),
            Ok(None) | Err(_) => break,
        }
    }

    ws_stream.close(None).await.ok();
    Ok(())
}
