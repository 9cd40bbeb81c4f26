use clap::Parser;
use log::{error, info};
use server::network::{NetResult, Server};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value = "2409")]
    port: u16,

    /// Maximum number of simultaneous connections
    #[arg(short, long, default_value = "64")]
    max_clients: usize,

    /// Seconds of silence before a connection is dropped
    #[arg(short = 't', long, default_value = "5")]
    client_timeout: u64,
}

#[tokio::main]
async fn main() -> NetResult<()> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();
    let address = format!("{}:{}", args.host, args.port);

    let mut server = Server::new(
        &address,
        args.max_clients,
        Duration::from_secs(args.client_timeout),
    )
    .await?;
    let shutdown = server.shutdown_handle();

    let server_task = tokio::spawn(async move { server.run().await });

    tokio::select! {
        result = server_task => {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Server stopped with error: {}", e),
                Err(e) => error!("Server task panicked: {}", e),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
            shutdown.shutdown();
        }
    }

    Ok(())
}
