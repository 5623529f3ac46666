use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Faults raised by the rendering transport.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection-level failure talking to the page or the rendering
    /// service. Retried within the engine's attempt budget.
    #[error("connection error: {0}")]
    Connection(String),

    /// Browser driver failure that retrying will not fix (launch failure,
    /// protocol error while reading the DOM).
    #[error("browser driver error: {0}")]
    Driver(String),
}

impl FetchError {
    /// Whether the engine should sleep and try again.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FetchError::Connection("peer reset".to_string());
        assert_eq!(err.to_string(), "connection error: peer reset");
    }

    #[test]
    fn test_transient_classification() {
        assert!(FetchError::Connection("timeout".to_string()).is_transient());
        assert!(!FetchError::Driver("no chrome binary".to_string()).is_transient());
    }
}
