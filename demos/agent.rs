//! Agent - connects to a controller and serves commands.
//!
//! This demo shows:
//! - Building a session with the built-in commands
//! - Registering an extra command that reads request arguments
//! - Running the session until the controller sends `BUILTIN_QUIT`
//!
//! # Running
//!
//! ```text
//! RUST_LOG=debug cargo run --example agent -- 127.0.0.1:8888 [config.json]
//! ```

use api_calls::api::{craft, ApiStatus};
use api_calls::tlv::{
    tlv_custom_tag, tlv_custom_type, API_CALL, API_CALL_DYNAMIC, API_TYPE, TLV_TYPE_STRING,
};
use api_calls::{Session, SessionConfig, SessionEnd, C2};
use tokio::net::TcpStream;
use tracing_subscriber::EnvFilter;

/// Echo back the string argument of the request.
const ECHO: i32 = tlv_custom_tag(API_CALL_DYNAMIC, 1, API_CALL);
/// Text argument of `ECHO`.
const ECHO_TEXT: i32 = tlv_custom_type(TLV_TYPE_STRING, 1, API_TYPE);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:8888".to_string());
    let config = match args.next() {
        Some(path) => SessionConfig::from_json_file(path)?,
        None => SessionConfig::default(),
    };

    let mut session = Session::builder()
        .config(config)
        .builtins()
        .handle(ECHO, |ctx: &mut C2| {
            match ctx.request().get_string(ECHO_TEXT) {
                Some(text) => {
                    let mut response = craft(ApiStatus::Success);
                    response.add_string(ECHO_TEXT, text);
                    response
                }
                None => craft(ApiStatus::UsageError),
            }
        })
        .build()?;

    tracing::info!("Session {} connecting to {}", session.context().uuid(), addr);
    let stream = TcpStream::connect(&addr).await?;

    match session.run(stream).await? {
        SessionEnd::Quit => tracing::info!("Controller asked to quit"),
        SessionEnd::Closed => tracing::warn!("Controller went away"),
    }

    let ctx = session.end();
    tracing::info!("Served {} requests", ctx.received());
    Ok(())
}
