//! Error types for template resolution

use netboot_common::BootLoaderKind;
use thiserror::Error;

/// Error type for template resolution
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No installer template registered for the host's OS and architecture
    #[error("No {kind} templates were found for {os}/{arch}")]
    NotFound {
        kind: BootLoaderKind,
        os: String,
        arch: String,
    },

    /// Template source failed to render
    #[error("failed to render template '{template}': {source}")]
    Render {
        template: String,
        #[source]
        source: minijinja::Error,
    },
}

impl TemplateError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TemplateError::NotFound { .. })
    }
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = TemplateError::NotFound {
            kind: BootLoaderKind::PxeGrub2,
            os: "Redhat 6.1".to_string(),
            arch: "x86_64".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No PXEGrub2 templates were found for Redhat 6.1/x86_64"
        );
        assert!(err.is_not_found());
    }
}
