use clap::Parser;
use client::network::Client;
use log::info;
use shared::DEFAULT_PORT;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value_t = format!("127.0.0.1:{}", DEFAULT_PORT))]
    server: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Connecting to: {}", args.server);
    let mut client = Client::connect(&args.server).await?;

    let handshake = client.handshake();
    println!(
        "Board {}x{}, notes {}x{}, colours: {}",
        handshake.board_width,
        handshake.board_height,
        handshake.note_width,
        handshake.note_height,
        handshake.colours.join(" ")
    );

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = stdin.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line == "DISCONNECT" {
            break;
        }

        for reply in client.send(line).await? {
            println!("{}", reply);
        }
    }

    client.disconnect().await?;
    Ok(())
}
