use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Generic failure injected by the latency simulator.
    #[error("Network error: {0}")]
    NetworkSimulated(String),

    #[error("{collection} {id} not found")]
    NotFound { collection: &'static str, id: u64 },

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl StoreError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// 4xx-shaped failures: the request itself is wrong, so retrying cannot help.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Permission(_) | Self::Validation { .. }
        )
    }

    pub fn is_retryable(&self) -> bool {
        !self.is_client_error()
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_not_retryable() {
        assert!(!StoreError::Permission("no".into()).is_retryable());
        assert!(!StoreError::NotFound {
            collection: "products",
            id: 9
        }
        .is_retryable());
        assert!(!StoreError::validation("name", "is required").is_retryable());
    }

    #[test]
    fn network_and_store_errors_are_retryable() {
        assert!(StoreError::NetworkSimulated("boom".into()).is_retryable());
        assert!(StoreError::Store("disk".into()).is_retryable());
    }

    #[test]
    fn messages_name_the_offending_field() {
        let err = StoreError::validation("price", "must not be negative");
        assert_eq!(err.to_string(), "Invalid price: must not be negative");
        let err = StoreError::NotFound {
            collection: "products",
            id: 3,
        };
        assert_eq!(err.to_string(), "products 3 not found");
    }
}
