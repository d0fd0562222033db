//! Bidirectional relay between the local terminal and the remote peer.
//!
//! Three threads of control: one reader per source (stdin, socket) plus the
//! dispatcher loop on the calling thread. Readers hand chunks to the
//! dispatcher over zero-capacity rendezvous channels, so a reader never
//! starts its next read before the dispatcher has consumed the previous
//! chunk. The dispatcher multiplexes both data channels and a completion
//! channel, forwarding each chunk to the opposite destination:
//!
//! ```text
//! stdin  --reader--> rendezvous --+
//!                                 +--> dispatcher --> socket (input origin)
//! socket --reader--> rendezvous --+               --> stdout (socket origin)
//! ```
//!
//! Readers never terminate the process themselves. On EOF or read error
//! they report a [`SessionEnd`] on the completion channel and stop; the
//! dispatcher returns it and the caller performs one orderly shutdown.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::thread;

use crossbeam_channel::{bounded, never, select, unbounded, Receiver, Sender};
use thiserror::Error;
use tracing::{debug, info};

/// Maximum bytes read from a source in one call.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("failed to clone socket handle: {0}")]
    CloneSocket(#[source] io::Error),

    #[error("failed to write to socket: {0}")]
    SocketWrite(#[source] io::Error),

    #[error("failed to write to local output: {0}")]
    OutputWrite(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;

/// How the session ended, as reported by a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The remote peer closed the stream, or the socket read failed.
    /// This is the expected way for a session to finish.
    RemoteClosed,
    /// Local input reached end-of-stream or failed.
    InputClosed,
}

impl SessionEnd {
    /// Process exit status for this end condition. Remote closure is the
    /// normal termination path; a dead local input is not.
    pub fn exit_code(self) -> i32 {
        match self {
            SessionEnd::RemoteClosed => 0,
            SessionEnd::InputClosed => 1,
        }
    }
}

/// Read chunks from `source` and hand each one to the dispatcher.
///
/// The rendezvous send blocks until the dispatcher takes the chunk, which
/// keeps exactly one read per source outstanding. EOF and read errors both
/// end the loop with `end` reported on the completion channel.
fn read_loop<R: Read>(
    mut source: R,
    chunk_size: usize,
    tx: Sender<Vec<u8>>,
    done_tx: Sender<SessionEnd>,
    end: SessionEnd,
) {
    let mut buffer = vec![0u8; chunk_size];
    loop {
        match source.read(&mut buffer) {
            Ok(0) | Err(_) => {
                let _ = done_tx.send(end);
                break;
            }
            Ok(n) => {
                if tx.send(buffer[..n].to_vec()).is_err() {
                    // Dispatcher is gone; the session is already over.
                    break;
                }
            }
        }
    }
}

/// Run the relay to completion over an established connection.
///
/// Bytes read from `input` go to the socket; bytes read from the socket go
/// to `output`. Returns how the session ended, or the first write failure,
/// which is fatal. The socket is shut down before returning so both reader
/// threads unblock and the peer sees the close.
pub fn run<I, O>(input: I, mut output: O, stream: TcpStream, chunk_size: usize) -> Result<SessionEnd>
where
    I: Read + Send + 'static,
    O: Write,
{
    let socket_reader = stream.try_clone().map_err(RelayError::CloneSocket)?;
    let mut socket_writer = stream;

    // Capacity 0: the rendezvous is the only backpressure in the pipeline.
    let (input_tx, input_rx) = bounded::<Vec<u8>>(0);
    let (socket_tx, socket_rx) = bounded::<Vec<u8>>(0);
    let (done_tx, done_rx) = unbounded::<SessionEnd>();

    let input_done = done_tx.clone();
    thread::spawn(move || {
        read_loop(input, chunk_size, input_tx, input_done, SessionEnd::InputClosed);
    });
    thread::spawn(move || {
        read_loop(
            socket_reader,
            chunk_size,
            socket_tx,
            done_tx,
            SessionEnd::RemoteClosed,
        );
    });

    let result = dispatch(&mut socket_writer, &mut output, input_rx, socket_rx, done_rx);

    // Unblocks the reader threads and sends the peer a close.
    let _ = socket_writer.shutdown(Shutdown::Both);
    result
}

/// Multiplex the delivery channels until a reader reports completion.
///
/// `select!` services whichever channel is ready, choosing uniformly at
/// random when several are, so neither source can starve the other.
fn dispatch<O: Write>(
    socket_writer: &mut TcpStream,
    output: &mut O,
    input_rx: Receiver<Vec<u8>>,
    socket_rx: Receiver<Vec<u8>>,
    done_rx: Receiver<SessionEnd>,
) -> Result<SessionEnd> {
    let mut input_rx = input_rx;
    let mut socket_rx = socket_rx;

    loop {
        select! {
            recv(input_rx) -> chunk => match chunk {
                Ok(chunk) => {
                    debug!("input -> socket: {} bytes", chunk.len());
                    socket_writer
                        .write_all(&chunk)
                        .map_err(RelayError::SocketWrite)?;
                }
                Err(_) => input_rx = never(),
            },
            recv(socket_rx) -> chunk => match chunk {
                Ok(chunk) => {
                    debug!("socket -> output: {} bytes", chunk.len());
                    output.write_all(&chunk).map_err(RelayError::OutputWrite)?;
                    output.flush().map_err(RelayError::OutputWrite)?;
                }
                Err(_) => socket_rx = never(),
            },
            recv(done_rx) -> end => match end {
                Ok(end) => {
                    info!("session ended: {:?}", end);
                    return Ok(end);
                }
                // Both readers gone without reporting; treat as remote close.
                Err(_) => return Ok(SessionEnd::RemoteClosed),
            },
        }
    }
}
