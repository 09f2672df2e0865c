//! Netboot common model
//!
//! Read-only records consumed by the orchestration core: hosts and their
//! interfaces, subnets with their bound boot-service proxies, and the
//! operating system / architecture / installation medium triple that
//! decides which boot files and templates a host needs.
//!
//! Persistence of these records is somebody else's job. This crate only
//! describes their shape and the derived values (boot file prefixes,
//! normalized MAC addresses, loader kinds) the rest of the workspace relies on.

pub mod error;
pub mod host;
pub mod loader;
pub mod mac;
pub mod network;
pub mod os;
pub mod topology;

pub use error::{ModelError, Result};
pub use host::*;
pub use loader::{BootLoaderKind, Firmware};
pub use mac::MacAddress;
pub use network::*;
pub use os::*;
pub use topology::Topology;
