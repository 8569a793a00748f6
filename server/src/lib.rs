//! # Bulletin Board Server Library
//!
//! Server side of a shared bulletin board. Many clients connect over TCP and
//! post notes, pin them, query them and shake loose everything unpinned,
//! using a line-based text protocol (see the `shared` crate for the command
//! and reply vocabulary).
//!
//! ## Module Organization
//!
//! ### Board Module (`board`)
//! The board state and its seven operations:
//! - `post` a note at a coordinate, validated against colours, bounds and
//!   identical-origin overlap
//! - `query_notes` / `query_pins` for `GET` and `GET PINS`
//! - `add_pin` / `remove_pin`, keeping the pin registry and per-note pin
//!   sets in step
//! - `shake` and `clear`
//!
//! ### Config Module (`config`)
//! Validated board geometry and colour vocabulary, fixed at startup.
//!
//! ### Connection Module (`connection`)
//! The per-client state machine: handshake, then one reply per command line
//! until `DISCONNECT` or end of stream.
//!
//! ### Network Module (`network`)
//! The TCP accept loop. One task per connection, no admission control.
//!
//! ## Concurrency
//!
//! All connections share a single board behind one `tokio::sync::Mutex`.
//! Every command holds the lock for exactly one board operation and no board
//! operation performs I/O, so each command observes and leaves a consistent
//! board. Reads and writes are serialized alike.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::board::Board;
//! use server::config::BoardConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BoardConfig::new(100, 100, 10, 10, vec!["red".into(), "blue".into()])?;
//!     let server = Server::bind("127.0.0.1:8080", Board::new(config)).await?;
//!     server.run().await;
//!     Ok(())
//! }
//! ```

pub mod board;
pub mod config;
pub mod connection;
pub mod network;
