//! API module - command registry, dispatch and status responses.
//!
//! Provides:
//! - [`ApiCalls`] - maps command tags to handlers
//! - [`ApiCalls::dispatch`] - resolves a tag and returns the response
//! - [`craft`] - builds status-only responses
//! - [`ApiStatus`] - the closed set of outcome codes
//!
//! # Example
//!
//! ```
//! use api_calls::api::{craft, response_status, ApiCalls, ApiStatus};
//!
//! struct Ctx;
//!
//! let mut calls = ApiCalls::<Ctx>::new();
//! calls.register(1, |_: &mut Ctx| craft(ApiStatus::Success)).unwrap();
//!
//! let response = calls.dispatch(&mut Ctx, 1);
//! assert_eq!(response_status(&response), Some(ApiStatus::Success));
//!
//! let response = calls.dispatch(&mut Ctx, 99);
//! assert_eq!(response_status(&response), Some(ApiStatus::NotImplemented));
//! ```

mod craft;
mod dispatch;
mod registry;
mod status;

pub use craft::{craft, try_craft};
pub use dispatch::response_status;
pub use registry::{boxed, ApiCalls, ApiHandler};
pub use status::ApiStatus;
