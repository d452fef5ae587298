//! Status codes carried by every response.

use std::fmt;

use crate::error::ApiError;

/// Outcome of a dispatched command.
///
/// Sent on the wire as a fixed-width integer in the status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ApiStatus {
    /// Session should end once this response is sent.
    Quit = 0,
    /// Command completed.
    Success = 1,
    /// Command ran and failed.
    Fail = 2,
    /// Command is still running, a follow-up is expected.
    Wait = 3,
    /// No handler is registered for the tag.
    NotImplemented = 4,
    /// Request arguments were missing or invalid.
    UsageError = 5,
    /// Read or write on an external resource failed.
    RwError = 6,
}

impl ApiStatus {
    /// Every status, in wire order.
    pub const ALL: [ApiStatus; 7] = [
        ApiStatus::Quit,
        ApiStatus::Success,
        ApiStatus::Fail,
        ApiStatus::Wait,
        ApiStatus::NotImplemented,
        ApiStatus::UsageError,
        ApiStatus::RwError,
    ];

    /// Wire value of this status.
    #[inline]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this status asks the connection loop to stop.
    #[inline]
    pub fn is_quit(self) -> bool {
        self == ApiStatus::Quit
    }
}

impl From<ApiStatus> for i32 {
    fn from(status: ApiStatus) -> Self {
        status.as_i32()
    }
}

impl TryFrom<i32> for ApiStatus {
    type Error = ApiError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(ApiError::InvalidStatus(value))
    }
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiStatus::Quit => "QUIT",
            ApiStatus::Success => "SUCCESS",
            ApiStatus::Fail => "FAIL",
            ApiStatus::Wait => "WAIT",
            ApiStatus::NotImplemented => "NOT_IMPLEMENTED",
            ApiStatus::UsageError => "USAGE_ERROR",
            ApiStatus::RwError => "RW_ERROR",
        };
        f.write_str(name)
    }
}
