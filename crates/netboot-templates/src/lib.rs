//! Netboot template resolution
//!
//! Produces the boot loader configuration a host's network interface
//! should receive for a given loader kind. Resolution walks a fixed chain:
//!
//! 1. host parameter `local_boot_<Kind>` (hosts not in build)
//! 2. global setting `local_boot_<Kind>` (hosts not in build)
//! 3. the operating system / architecture template for the kind (hosts in build)
//! 4. the built-in local boot menu for the kind's firmware family (hosts not in build)
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use netboot_common::{BootLoaderKind, Host};
//! use netboot_templates::{MemoryCatalog, Settings, TemplateResolver};
//!
//! let resolver = TemplateResolver::new(
//!     Arc::new(MemoryCatalog::with_builtins()),
//!     Arc::new(Settings::default()),
//! );
//!
//! let host = Host::new("web01.example.com");
//! let config = resolver.resolve(&host, BootLoaderKind::PxeLinux).unwrap();
//! assert!(config.contains("LOCALBOOT 0"));
//! ```

pub mod catalog;
pub mod context;
pub mod error;
pub mod resolver;
pub mod settings;

pub use catalog::{MemoryCatalog, ProvisioningTemplate, TemplateCatalog};
pub use context::RenderContext;
pub use error::{Result, TemplateError};
pub use resolver::TemplateResolver;
pub use settings::{Settings, SettingsProvider, DEFAULT_UNATTENDED_URL};
