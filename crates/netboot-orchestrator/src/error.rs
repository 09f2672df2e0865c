//! Error types for deployment orchestration
//!
//! Remote failures are normally collected in a
//! [`PublishReport`](crate::deploy::PublishReport); [`DeployError::Proxy`]
//! only appears when a caller asks for the report as a `Result`.

use netboot_proxy::ProxyError;
use netboot_templates::TemplateError;
use thiserror::Error;

/// Error type for deployment orchestration
#[derive(Debug, Error)]
pub enum DeployError {
    /// Configuration content could not be resolved
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Interface (or bond member) is not part of the host
    #[error("interface {interface} not found on host {host}")]
    UnknownInterface { host: String, interface: String },

    /// One or more boot proxy calls failed
    #[error("{failed} boot proxy call(s) failed: {first}")]
    Proxy {
        failed: usize,
        #[source]
        first: ProxyError,
    },
}

impl DeployError {
    pub fn is_template_not_found(&self) -> bool {
        matches!(self, DeployError::Template(e) if e.is_not_found())
    }
}

/// Result type for deployment orchestration
pub type Result<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;
    use netboot_common::BootLoaderKind;

    #[test]
    fn test_error_display() {
        let err = DeployError::UnknownInterface {
            host: "web01".to_string(),
            interface: "eth9".to_string(),
        };
        assert_eq!(err.to_string(), "interface eth9 not found on host web01");

        let err = DeployError::Proxy {
            failed: 2,
            first: ProxyError::Timeout("https://p/tftp/PXELinux/aa".to_string()),
        };
        assert!(err.to_string().starts_with("2 boot proxy call(s) failed"));
    }

    #[test]
    fn test_template_not_found_passthrough() {
        let err: DeployError = TemplateError::NotFound {
            kind: BootLoaderKind::PxeGrub2,
            os: "Redhat 7.9".to_string(),
            arch: "x86_64".to_string(),
        }
        .into();
        assert!(err.is_template_not_found());
        assert_eq!(
            err.to_string(),
            "No PXEGrub2 templates were found for Redhat 7.9/x86_64"
        );
    }
}
