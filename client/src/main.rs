use clap::{Parser, Subcommand};
use client::network::{Client, RoomIntent};
use client::progression::GameMode;
use client::solo::SoloGame;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Play offline, one level up per completed grid
    Solo {
        /// Starting level
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        level: u32,

        #[arg(short, long, value_enum, default_value_t = GameMode::Zen)]
        mode: GameMode,
    },
    /// Play against others through a server
    Online {
        /// Server address to connect to
        #[arg(short = 's', long, default_value = "127.0.0.1:2409")]
        server: String,

        #[command(subcommand)]
        action: OnlineAction,
    },
}

#[derive(Subcommand, Debug)]
enum OnlineAction {
    /// Open a new room and become its host
    Create,
    /// Join an existing room by code
    Join { code: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    match args.command {
        Mode::Solo { level, mode } => {
            info!("Starting solo game at level {} ({})", level, mode);
            SoloGame::new(level, mode).run().await?;
        }
        Mode::Online { server, action } => {
            let intent = match action {
                OnlineAction::Create => RoomIntent::Create,
                OnlineAction::Join { code } => RoomIntent::Join(code),
            };
            info!("Connecting to: {}", server);
            Client::new(&server, intent).await?.run().await?;
        }
    }

    Ok(())
}
