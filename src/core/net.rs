//! TCP connection bootstrap.
//!
//! Resolves a `host:port` string and opens the single connection the relay
//! runs over. One shot: there is no retry and no reconnection.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum NetError {
    #[error("invalid address {0:?}: {1}")]
    Resolve(String, #[source] io::Error),

    #[error("address {0:?} did not resolve to any endpoint")]
    NoAddresses(String),

    #[error("failed to connect to {0}: {1}")]
    Connect(String, #[source] io::Error),
}

pub type Result<T> = std::result::Result<T, NetError>;

/// Resolve `addr` and open a TCP connection to it.
///
/// Every resolved endpoint is tried in order; the last failure is reported
/// when none accepts. Without a timeout the OS default blocking connect
/// applies.
pub fn connect(addr: &str, timeout: Option<Duration>) -> Result<TcpStream> {
    let candidates: Vec<_> = addr
        .to_socket_addrs()
        .map_err(|e| NetError::Resolve(addr.to_string(), e))?
        .collect();

    if candidates.is_empty() {
        return Err(NetError::NoAddresses(addr.to_string()));
    }

    let mut last_err = None;
    for candidate in candidates {
        let attempt = match timeout {
            Some(t) => TcpStream::connect_timeout(&candidate, t),
            None => TcpStream::connect(candidate),
        };
        match attempt {
            Ok(stream) => {
                info!("connected to {}", candidate);
                return Ok(stream);
            }
            Err(e) => last_err = Some(e),
        }
    }

    // candidates was non-empty, so at least one attempt failed
    Err(NetError::Connect(
        addr.to_string(),
        last_err.unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "no address accepted")),
    ))
}
