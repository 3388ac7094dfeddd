use std::fmt::{self, Display};

use crate::Result;

/// The outcome of an operation, reduced to the four kinds callers can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    InvalidArgument,
    NotInitialized,
    ProcessingFailed,
}

impl Status {
    /// Reduces a result to its status.
    ///
    /// # Arguments
    /// * `result` - The result of any of the crate's operations.
    ///
    /// # Returns
    /// `Success` for `Ok`, otherwise the status of the error.
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Status::Success,
            Err(e) => e.status(),
        }
    }

    /// Returns the stable numeric code of this status.
    pub fn code(self) -> u32 {
        match self {
            Status::Success => 0,
            Status::InvalidArgument => 1,
            Status::NotInitialized => 2,
            Status::ProcessingFailed => 3,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Success => "success",
            Status::InvalidArgument => "invalid argument",
            Status::NotInitialized => "not initialized",
            Status::ProcessingFailed => "processing failed",
        };

        f.write_str(s)
    }
}
