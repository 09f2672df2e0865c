//! Error types for model parsing

use thiserror::Error;

/// Errors raised while building model values from user input
#[derive(Debug, Error)]
pub enum ModelError {
    /// MAC address is not six hex octets
    #[error("invalid MAC address: {0}")]
    InvalidMacAddress(String),

    /// Loader file or kind name is not one we know how to configure
    #[error("unknown boot loader: {0}")]
    UnknownBootLoader(String),

    /// Architecture name is empty or malformed
    #[error("invalid architecture: {0}")]
    InvalidArchitecture(String),
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::InvalidMacAddress("zz:zz".to_string());
        assert_eq!(err.to_string(), "invalid MAC address: zz:zz");

        let err = ModelError::UnknownBootLoader("ipxe.efi".to_string());
        assert_eq!(err.to_string(), "unknown boot loader: ipxe.efi");
    }
}
