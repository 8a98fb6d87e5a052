use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use smsgate::chat::{self, ChatEngine};
use smsgate::config;
use smsgate::dispatch::Dispatcher;
use smsgate::mailer::SmtpMailer;
use smsgate::routing::RouteTable;
use smsgate::transport::SerialTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(device), Some(routes_path)) = (args.next(), args.next()) else {
        eprintln!("smsgate: <device> <routes.json>");
        std::process::exit(1);
    };

    let routes = config::load_routes(std::path::Path::new(&routes_path))
        .with_context(|| format!("Loading routes from {routes_path}"))?;

    eprintln!("📟 smsgate v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Device: {} @ {} baud", device, config::BAUD_RATE);
    eprintln!("   Routes: {} from {}\n", routes.len(), routes_path);

    let transport = SerialTransport::open(&device, config::BAUD_RATE, config::READ_TIMEOUT)
        .context("Opening modem device")?;

    // Ctrl-C raises the shutdown flag; the engine checks it at every
    // wait iteration and step boundary.
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown requested");
                shutdown.store(true, Ordering::Relaxed);
            }
        });
    }

    let dispatcher = Dispatcher::new(RouteTable::new(routes), Arc::new(SmtpMailer::new()));
    let engine = ChatEngine::new(transport, chat::setup_script(), dispatcher, shutdown);

    // The modem dialog is blocking serial IO; run it off the async
    // runtime the same way other blocking pollers are run.
    tokio::task::spawn_blocking(move || engine.run())
        .await
        .context("Modem worker panicked")??;

    Ok(())
}
