use clap::Parser;
use log::{error, info};
use server::board::Board;
use server::config::BoardConfig;
use server::network::Server;

#[derive(Parser, Debug)]
#[command(author, version, about = "Shared bulletin board server", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Board width
    board_width: i32,

    /// Board height
    board_height: i32,

    /// Width of every note
    note_width: i32,

    /// Height of every note
    note_height: i32,

    /// Colours notes may be posted in
    #[arg(required = true, num_args = 1..)]
    colours: Vec<String>,

    /// Address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let config = BoardConfig::new(
        args.board_width,
        args.board_height,
        args.note_width,
        args.note_height,
        args.colours,
    )
    .map_err(|e| {
        error!("Invalid board configuration: {}", e);
        e
    })?;

    info!(
        "Board {}x{}, notes {}x{}, colours: {}",
        config.board_width,
        config.board_height,
        config.note_width,
        config.note_height,
        config.colours.join(", ")
    );

    let address = format!("{}:{}", args.host, args.port);
    let server = Server::bind(&address, Board::new(config)).await?;

    tokio::select! {
        _ = server.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
