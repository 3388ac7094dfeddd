use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

use crate::{initialization::RandErr, status::Status};

/// The result type used in the entire crate.
pub type Result<T> = std::result::Result<T, FahrenErr>;

/// The crate's error type.
#[derive(Debug)]
pub enum FahrenErr {
    InvalidArgument {
        what: String,
    },
    InvalidDistribution(RandErr),
    NotInitialized,
    Overflow {
        layer: usize,
    },
    Allocation {
        what: &'static str,
        len: usize,
    },
    ParamGenExhausted {
        got: usize,
        expected: usize,
    },
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    Entropy(String),
    Io(io::Error),
}

impl FahrenErr {
    /// Creates a new `InvalidArgument` error.
    ///
    /// # Arguments
    /// * `what` - A description of the offending argument.
    pub(crate) fn invalid(what: impl Into<String>) -> Self {
        Self::InvalidArgument { what: what.into() }
    }

    /// Maps this error onto the coarse status taxonomy.
    ///
    /// # Returns
    /// The `Status` reported to callers that only care about the kind of failure.
    pub fn status(&self) -> Status {
        match self {
            FahrenErr::InvalidArgument { .. } | FahrenErr::InvalidDistribution(_) => {
                Status::InvalidArgument
            }
            FahrenErr::NotInitialized => Status::NotInitialized,
            FahrenErr::Overflow { .. }
            | FahrenErr::Allocation { .. }
            | FahrenErr::ParamGenExhausted { .. }
            | FahrenErr::SizeMismatch { .. }
            | FahrenErr::Entropy(_)
            | FahrenErr::Io(_) => Status::ProcessingFailed,
        }
    }
}

impl Display for FahrenErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FahrenErr::InvalidArgument { what } => write!(f, "invalid argument: {what}"),
            FahrenErr::InvalidDistribution(e) => write!(f, "invalid distribution: {e}"),
            FahrenErr::NotInitialized => write!(f, "the model is not initialized"),
            FahrenErr::Overflow { layer } => write!(
                f,
                "parameter count overflowed while accumulating the {layer}-th layer"
            ),
            FahrenErr::Allocation { what, len } => {
                write!(f, "failed to allocate {len} values for the {what} buffer")
            }
            FahrenErr::ParamGenExhausted { got, expected } => write!(
                f,
                "the parameter generator got exhausted, generated {got} of the expected {expected}"
            ),
            FahrenErr::SizeMismatch {
                what,
                got,
                expected,
            } => write!(
                f,
                "the layers need {expected} {what} but the buffer only holds {got}"
            ),
            FahrenErr::Entropy(e) => write!(f, "failed to seed from the os: {e}"),
            FahrenErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for FahrenErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FahrenErr::Io(e) => Some(e),
            FahrenErr::InvalidDistribution(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FahrenErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RandErr> for FahrenErr {
    fn from(value: RandErr) -> Self {
        Self::InvalidDistribution(value)
    }
}
