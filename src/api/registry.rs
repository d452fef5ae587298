//! Handler registry mapping command tags to handlers.
//!
//! One tag maps to at most one handler. Registering a tag that is already
//! present replaces the previous handler (last registration wins).
//!
//! The registry is generic over the context type `C` handed to handlers, so
//! the same table works for a live session ([`C2`](crate::C2)) and for tests.
//!
//! # Example
//!
//! ```
//! use api_calls::api::{craft, ApiCalls, ApiStatus};
//!
//! struct Ctx;
//!
//! let mut calls = ApiCalls::<Ctx>::new();
//! calls.register(1, |_: &mut Ctx| craft(ApiStatus::Success)).unwrap();
//!
//! assert!(calls.contains(1));
//! assert!(calls.lookup(2).is_none());
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::error::Result;
use crate::tlv::TlvPacket;

/// Trait for command handlers.
///
/// A handler receives the connection context and returns the complete
/// response packet, status included.
pub trait ApiHandler<C>: Send + Sync + 'static {
    /// Run the command.
    fn call(&self, ctx: &mut C) -> TlvPacket;
}

impl<C, F> ApiHandler<C> for F
where
    F: Fn(&mut C) -> TlvPacket + Send + Sync + 'static,
{
    fn call(&self, ctx: &mut C) -> TlvPacket {
        self(ctx)
    }
}

/// Box a handler for [`ApiCalls::register_many`].
pub fn boxed<C, H: ApiHandler<C>>(handler: H) -> Box<dyn ApiHandler<C>> {
    Box::new(handler)
}

/// Registry mapping command tags to handlers.
pub struct ApiCalls<C> {
    calls: HashMap<i32, Box<dyn ApiHandler<C>>>,
}

impl<C: 'static> ApiCalls<C> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            calls: HashMap::new(),
        }
    }

    /// Register a handler for a tag, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Alloc`](crate::ApiError::Alloc) if the table cannot
    /// grow. Existing entries are left untouched.
    pub fn register<H: ApiHandler<C>>(&mut self, tag: i32, handler: H) -> Result<()> {
        self.register_boxed(tag, Box::new(handler))
    }

    /// Register an already boxed handler.
    pub fn register_boxed(&mut self, tag: i32, handler: Box<dyn ApiHandler<C>>) -> Result<()> {
        self.calls.try_reserve(1)?;

        if self.calls.insert(tag, handler).is_some() {
            tracing::debug!("Replaced handler for tag {}", tag);
        }
        Ok(())
    }

    /// Register a set of handlers in order.
    ///
    /// Each pair follows the same overwrite rule as [`ApiCalls::register`].
    /// On allocation failure the pairs inserted so far stay registered and
    /// the error is returned.
    pub fn register_many<I>(&mut self, handlers: I) -> Result<()>
    where
        I: IntoIterator<Item = (i32, Box<dyn ApiHandler<C>>)>,
    {
        let handlers = handlers.into_iter();
        self.calls.try_reserve(handlers.size_hint().0)?;

        for (tag, handler) in handlers {
            self.register_boxed(tag, handler)?;
        }
        Ok(())
    }

    /// Get the handler for a tag.
    pub fn lookup(&self, tag: i32) -> Option<&dyn ApiHandler<C>> {
        self.calls.get(&tag).map(|h| h.as_ref())
    }

    /// Check if a tag has a handler.
    pub fn contains(&self, tag: i32) -> bool {
        self.calls.contains_key(&tag)
    }

    /// Remove the handler for a tag. Returns `true` if one was registered.
    pub fn unregister(&mut self, tag: i32) -> bool {
        self.calls.remove(&tag).is_some()
    }

    /// Registered tags, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = i32> + '_ {
        self.calls.keys().copied()
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Check if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Drop every handler and release the table storage.
    ///
    /// The registry is empty afterwards and may be populated again.
    pub fn free(&mut self) {
        let released = self.calls.len();
        self.calls = HashMap::new();
        tracing::debug!("Released {} handlers", released);
    }
}

impl<C: 'static> Default for ApiCalls<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> fmt::Debug for ApiCalls<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.tags().collect();
        tags.sort_unstable();
        f.debug_struct("ApiCalls").field("tags", &tags).finish()
    }
}
