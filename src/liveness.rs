//! Liveness responder for external uptime checkers.
//!
//! Runs on its own thread and shares no mutable state with the monitor:
//! every connection gets the same fixed "alive" body.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

const RESPONSE: &[u8] = b"HTTP/1.0 200 OK\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
Connection: close\r\n\
\r\n\
Bot is alive!";

/// Bind the liveness listener and serve it from a detached thread.
///
/// Bind failures surface immediately so startup can fail fast; per-
/// connection errors are logged and the listener keeps accepting.
pub fn spawn(port: u16) -> Result<SocketAddr> {
    let listener = TcpListener::bind(("0.0.0.0", port))
        .with_context(|| format!("failed to bind liveness port {port}"))?;
    let addr = listener.local_addr().context("liveness listener has no local address")?;

    thread::spawn(move || {
        for stream in listener.incoming() {
            match stream {
                Ok(mut stream) => {
                    if let Err(err) = respond(&mut stream) {
                        warn!(error = %err, "liveness response failed");
                    }
                }
                Err(err) => warn!(error = %err, "liveness accept failed"),
            }
        }
    });

    Ok(addr)
}

fn respond(stream: &mut TcpStream) -> std::io::Result<()> {
    stream.set_read_timeout(Some(IO_TIMEOUT))?;
    stream.set_write_timeout(Some(IO_TIMEOUT))?;

    // Drain whatever request line arrived; the answer is the same for
    // every path.
    let mut buf = [0u8; 1024];
    let _ = stream.read(&mut buf)?;

    stream.write_all(RESPONSE)?;
    stream.flush()
}
