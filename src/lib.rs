//! # api-calls
//!
//! Command-dispatch core for agents controlled over a TLV wire protocol.
//!
//! Every request from the controller carries an integer command tag. The
//! core resolves the tag to a registered handler, runs it against the
//! connection context and returns its response packet. Unknown tags are
//! answered with a status-only `NOT_IMPLEMENTED` packet, so every request
//! gets exactly one response.
//!
//! ## Architecture
//!
//! - **api**: handler registry, dispatch, status codes, crafted responses
//! - **tlv**: packet type, field encoding and stream framing
//! - **session**: async connection loop that stops on `QUIT`
//!
//! ## Example
//!
//! ```ignore
//! use api_calls::api::{craft, ApiStatus};
//! use api_calls::Session;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
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

pub mod api;
pub mod builtins;
pub mod config;
pub mod error;
pub mod tlv;

mod c2;
mod session;

pub use api::{ApiCalls, ApiHandler, ApiStatus};
pub use c2::{generate_uuid, C2};
pub use config::SessionConfig;
pub use error::{ApiError, Result};
pub use session::{Session, SessionBuilder, SessionEnd};
