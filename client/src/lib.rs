//! # Bulletin Board Client Library
//!
//! A thin terminal client for the bulletin board server. It does no
//! rendering of its own: it connects, learns the board geometry and colour
//! vocabulary from the handshake, and relays protocol lines.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! - TCP connection setup and handshake parsing
//! - Local validation of command lines with the shared parser
//! - Collecting multi-line `GET` / `GET PINS` replies
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::connect("127.0.0.1:8080").await?;
//!     println!("colours: {:?}", client.handshake().colours);
//!
//!     for line in client.send("GET").await? {
//!         println!("{}", line);
//!     }
//!
//!     client.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod network;
