//! Tagged result type for fail-closed storage operations.
//!
//! Session storage never raises to its caller. Instead every operation
//! reports a [`StoreOutcome`]: either `Success` with the real value, or
//! `Failure` carrying the fail-closed fallback (`false`, `None`, empty list)
//! together with the underlying error detail.

/// Outcome of a fail-closed storage operation.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOutcome<T> {
    /// The operation reached the store and completed.
    Success(T),
    /// The operation failed; `fallback` is the value the caller should act on.
    Failure { fallback: T, detail: String },
}

impl<T> StoreOutcome<T> {
    /// Build a failure outcome from any displayable error.
    pub fn failed(fallback: T, detail: impl std::fmt::Display) -> Self {
        Self::Failure {
            fallback,
            detail: detail.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Error detail, if the operation failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { detail, .. } => Some(detail),
        }
    }

    /// Borrow the value the caller should act on.
    pub fn value(&self) -> &T {
        match self {
            Self::Success(v) => v,
            Self::Failure { fallback, .. } => fallback,
        }
    }

    /// Collapse to the value, discarding the tag.
    pub fn into_value(self) -> T {
        match self {
            Self::Success(v) => v,
            Self::Failure { fallback, .. } => fallback,
        }
    }
}

impl StoreOutcome<bool> {
    /// `Success(true)` for write-style operations.
    pub fn done() -> Self {
        Self::Success(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_exposes_fallback_and_detail() {
        let outcome: StoreOutcome<Option<u8>> = StoreOutcome::failed(None, "disk I/O error");
        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some("disk I/O error"));
        assert_eq!(outcome.into_value(), None);
    }

    #[test]
    fn success_has_no_error() {
        let outcome = StoreOutcome::done();
        assert!(outcome.is_success());
        assert_eq!(outcome.error(), None);
        assert!(*outcome.value());
    }
}
