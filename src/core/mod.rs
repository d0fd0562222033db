//! Core relay components.
//!
//! - **term**: scoped raw-mode control of the local terminal
//! - **net**: one-shot TCP connection bootstrap
//! - **relay**: reader loops and the channel-multiplexing dispatcher
//!
//! # Architecture
//!
//! ```text
//! RawModeGuard (raw terminal for the session lifetime)
//! net::connect (single TcpStream)
//! relay::run
//! ├── input reader thread  (stdin  -> rendezvous channel)
//! ├── socket reader thread (socket -> rendezvous channel)
//! └── dispatcher           (select -> socket write / stdout write)
//! ```

pub mod net;
pub mod relay;
pub mod term;
