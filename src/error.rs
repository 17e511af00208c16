use std::fmt::Display;

/// Errors raised when an indicator is configured or invoked with
/// parameters it cannot compute on.
///
/// Insufficient history is never an error: positions without enough data
/// carry the undefined sentinel instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A window length, span, multiplier or input shape was rejected.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the builder or function.
        name: &'static str,
        /// Human readable cause.
        reason: String,
    },
}

impl Error {
    pub(crate) fn invalid(name: &'static str, reason: impl Display) -> Self {
        let reason = reason.to_string();
        tracing::warn!(parameter = name, %reason, "rejected indicator parameter");

        Self::InvalidParameter { name, reason }
    }
}

/// Result alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_parameter_and_reason() {
        let err = Error::invalid("length", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter `length`: must be positive"
        );
    }

    #[test]
    fn carries_structured_fields() {
        let Error::InvalidParameter { name, reason } = Error::invalid("k", 0.0);
        assert_eq!(name, "k");
        assert_eq!(reason, "0");
    }
}
