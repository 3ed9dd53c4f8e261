use core::fmt;
use thiserror::Error;

// errno values used as failure codes
const EINVAL: i32 = 22;
const ERANGE: i32 = 34;
const ENODATA: i32 = 61;
const EOVERFLOW: i32 = 75;

/// Errors returned for histogram construction and operations.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("lowest discernible value must be >= 1")]
    LowestDiscernibleValueTooLow,
    #[error("highest trackable value must be >= 2 * lowest discernible value")]
    HighestTrackableValueTooLow,
    #[error("significant figures must be in range 0..=5")]
    InvalidSignificantFigures,
    #[error("the requested resolution cannot be represented with 64bit values")]
    ResolutionTooHigh,
    #[error("conversion ratio must be finite and greater than zero")]
    InvalidConversionRatio,
    #[error("the value is outside of the trackable range")]
    OutOfRange,
    #[error("the number of counters does not match the histogram layout")]
    LayoutMismatch,
    #[error("invalid percentile, must be in range 0.0..=100.0")]
    InvalidPercentile,
    #[error("percentile ticks per half distance must be greater than zero")]
    InvalidTicks,
    #[error("histogram contains no observations")]
    Empty,
    #[error("an overflow occurred")]
    Overflow,
}

impl Error {
    /// Returns the errno-style code that identifies this kind of failure.
    pub fn code(&self) -> i32 {
        match self {
            Self::OutOfRange => ERANGE,
            Self::Overflow => EOVERFLOW,
            Self::Empty => ENODATA,
            Self::LowestDiscernibleValueTooLow
            | Self::HighestTrackableValueTooLow
            | Self::InvalidSignificantFigures
            | Self::ResolutionTooHigh
            | Self::InvalidConversionRatio
            | Self::LayoutMismatch
            | Self::InvalidPercentile
            | Self::InvalidTicks => EINVAL,
        }
    }

    /// Returns a value that displays the message followed by the code, for
    /// example `the value is outside of the trackable range (34)`.
    pub fn with_code(&self) -> WithCode<'_> {
        WithCode { error: self }
    }

    /// Renders the error as a JSON object with `code` and `message` fields.
    #[cfg(feature = "serde-serialize")]
    pub fn to_json(&self) -> String {
        #[derive(serde::Serialize)]
        struct Report<'a> {
            code: i32,
            message: &'a str,
        }

        let message = self.to_string();

        serde_json::to_string(&Report {
            code: self.code(),
            message: &message,
        })
        .unwrap_or_default()
    }
}

/// Displays an [`Error`] along with its code.
pub struct WithCode<'a> {
    error: &'a Error,
}

impl fmt::Display for WithCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error, self.error.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert_eq!(Error::OutOfRange.code(), 34);
        assert_eq!(Error::InvalidSignificantFigures.code(), 22);
        assert_eq!(Error::Overflow.code(), 75);
        assert_eq!(Error::Empty.code(), 61);
    }

    #[test]
    fn with_code() {
        assert_eq!(
            Error::InvalidPercentile.with_code().to_string(),
            "invalid percentile, must be in range 0.0..=100.0 (22)"
        );
        assert_eq!(
            Error::OutOfRange.with_code().to_string(),
            "the value is outside of the trackable range (34)"
        );
    }

    #[cfg(feature = "serde-serialize")]
    #[test]
    fn json() {
        assert_eq!(
            Error::OutOfRange.to_json(),
            "{\"code\":34,\"message\":\"the value is outside of the trackable range\"}"
        );
    }
}
