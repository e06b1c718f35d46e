//! Line-oriented client for the gateway bridge socket.
//!
//! The client opens one connection on its first request and keeps it for the
//! rest of the tick. If the connection breaks, the failing request returns an
//! error and the connection is dropped; the next request reconnects. Nothing
//! is retried here, the next tick does that naturally.

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::os::unix::net::UnixStream;
use std::time::Duration;

use super::protocol::{Request, Response};
use crate::backend::GatewayAddress;

/// A connected Unix or TCP stream.
enum Connection {
    Unix(UnixStream),
    Tcp(TcpStream),
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Unix(stream) => stream.read(buf),
            Self::Tcp(stream) => stream.read(buf),
        }
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Self::Unix(stream) => stream.write(buf),
            Self::Tcp(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Self::Unix(stream) => stream.flush(),
            Self::Tcp(stream) => stream.flush(),
        }
    }
}

impl Connection {
    fn open(address: &GatewayAddress, timeout: Duration) -> Result<Self> {
        match address {
            GatewayAddress::Unix(path) => {
                let stream = UnixStream::connect(path)
                    .with_context(|| format!("Failed to connect to socket at {}", path.display()))?;
                stream.set_read_timeout(Some(timeout)).ok();
                stream.set_write_timeout(Some(timeout)).ok();
                Ok(Self::Unix(stream))
            }
            GatewayAddress::Tcp(addr) => {
                let socket_addr = addr
                    .to_socket_addrs()
                    .with_context(|| format!("Failed to resolve {addr}"))?
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("{addr} did not resolve to any address"))?;
                let stream = TcpStream::connect_timeout(&socket_addr, timeout)
                    .with_context(|| format!("Failed to connect to {addr}"))?;
                stream.set_read_timeout(Some(timeout)).ok();
                stream.set_write_timeout(Some(timeout)).ok();
                stream.set_nodelay(true).ok();
                Ok(Self::Tcp(stream))
            }
        }
    }
}

/// Client for one gateway bridge endpoint.
pub struct GatewayClient {
    address: GatewayAddress,
    timeout: Duration,
    debug_enabled: bool,
    connection: Option<BufReader<Connection>>,
}

impl GatewayClient {
    pub fn new(address: GatewayAddress, timeout: Duration, debug_enabled: bool) -> Self {
        Self {
            address,
            timeout,
            debug_enabled,
            connection: None,
        }
    }

    pub fn address(&self) -> &GatewayAddress {
        &self.address
    }

    /// Send one request and wait for its response line.
    ///
    /// An `ok: false` response is turned into an error carrying the bridge's
    /// message.
    pub fn request(&mut self, request: &Request) -> Result<Response> {
        let result = self.exchange(request);
        if result.is_err() {
            // Never reuse a stream that may hold half a response
            self.connection = None;
        }
        let response = result?;

        if !response.ok {
            let message = response
                .error
                .unwrap_or_else(|| "unspecified gateway error".to_string());
            anyhow::bail!("Gateway rejected request: {message}");
        }

        Ok(response)
    }

    fn exchange(&mut self, request: &Request) -> Result<Response> {
        let mut line = serde_json::to_string(request).context("Failed to encode request")?;
        line.push('\n');

        if self.debug_enabled {
            log_indented!("Sending: {}", line.trim_end());
        }

        if self.connection.is_none() {
            let connection = Connection::open(&self.address, self.timeout)?;
            self.connection = Some(BufReader::new(connection));
        }
        let connection = self
            .connection
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("Gateway connection unavailable"))?;

        connection
            .get_mut()
            .write_all(line.as_bytes())
            .context("Failed to write request to gateway")?;
        connection
            .get_mut()
            .flush()
            .context("Failed to flush request to gateway")?;

        let mut reply = String::new();
        let bytes_read = connection
            .read_line(&mut reply)
            .context("Failed to read response from gateway")?;
        if bytes_read == 0 {
            anyhow::bail!("Gateway closed the connection");
        }

        if self.debug_enabled {
            log_indented!("Response: {}", reply.trim_end());
        }

        serde_json::from_str(reply.trim_end())
            .with_context(|| format!("Malformed gateway response: {}", reply.trim_end()))
    }
}
