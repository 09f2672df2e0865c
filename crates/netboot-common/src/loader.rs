//! Boot loader kinds
//!
//! A host boots through exactly one network boot loader. Each loader reads
//! a differently formatted configuration file from the TFTP root, so the
//! kind decides both the template that is rendered and the slot the boot
//! proxy writes it into.

use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network boot loader whose configuration we publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BootLoaderKind {
    /// SYSLINUX PXELINUX, legacy BIOS
    #[serde(rename = "PXELinux", alias = "pxelinux.0")]
    PxeLinux,
    /// GRUB legacy built for EFI
    #[serde(
        rename = "PXEGrub",
        alias = "grub/bootia32.efi",
        alias = "grub/bootx64.efi"
    )]
    PxeGrub,
    /// GRUB 2, EFI
    #[serde(
        rename = "PXEGrub2",
        alias = "grub2/grubx64.efi",
        alias = "grub2/grubia32.efi",
        alias = "grub2/grubaa64.efi",
        alias = "grub2/shimx64.efi"
    )]
    PxeGrub2,
}

/// Firmware family a loader runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Firmware {
    Bios,
    Uefi,
}

impl BootLoaderKind {
    /// Every kind, in the order a rebuild refreshes them
    pub const ALL: [BootLoaderKind; 3] = [
        BootLoaderKind::PxeLinux,
        BootLoaderKind::PxeGrub,
        BootLoaderKind::PxeGrub2,
    ];

    /// Name used in template kinds, task names and proxy URLs
    pub fn as_str(&self) -> &'static str {
        match self {
            BootLoaderKind::PxeLinux => "PXELinux",
            BootLoaderKind::PxeGrub => "PXEGrub",
            BootLoaderKind::PxeGrub2 => "PXEGrub2",
        }
    }

    pub fn firmware(&self) -> Firmware {
        match self {
            BootLoaderKind::PxeLinux => Firmware::Bios,
            BootLoaderKind::PxeGrub | BootLoaderKind::PxeGrub2 => Firmware::Uefi,
        }
    }

    /// Host parameter / global setting naming a local boot template override
    pub fn local_boot_key(&self) -> String {
        format!("local_boot_{}", self.as_str())
    }

    /// Map a loader file name (as handed out over DHCP) to its kind.
    ///
    /// An empty string or `None` means the host has no loader selected and
    /// yields `Ok(None)`.
    pub fn from_loader_file(file: &str) -> Result<Option<Self>> {
        match file.trim() {
            "" | "None" => Ok(None),
            "pxelinux.0" => Ok(Some(BootLoaderKind::PxeLinux)),
            "grub/bootia32.efi" | "grub/bootx64.efi" => Ok(Some(BootLoaderKind::PxeGrub)),
            "grub2/grubx64.efi" | "grub2/grubia32.efi" | "grub2/grubaa64.efi"
            | "grub2/shimx64.efi" => Ok(Some(BootLoaderKind::PxeGrub2)),
            other => Err(ModelError::UnknownBootLoader(other.to_string())),
        }
    }
}

impl fmt::Display for BootLoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BootLoaderKind {
    type Err = ModelError;

    /// Accepts either the kind name (`PXEGrub2`) or a loader file name
    fn from_str(s: &str) -> Result<Self> {
        let by_name = BootLoaderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()));
        match by_name {
            Some(kind) => Ok(kind),
            None => Self::from_loader_file(s)?
                .ok_or_else(|| ModelError::UnknownBootLoader(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_order_is_fixed() {
        assert_eq!(
            BootLoaderKind::ALL,
            [
                BootLoaderKind::PxeLinux,
                BootLoaderKind::PxeGrub,
                BootLoaderKind::PxeGrub2
            ]
        );
    }

    #[test]
    fn test_loader_file_mapping() {
        assert_eq!(
            BootLoaderKind::from_loader_file("pxelinux.0").unwrap(),
            Some(BootLoaderKind::PxeLinux)
        );
        assert_eq!(
            BootLoaderKind::from_loader_file("grub/bootx64.efi").unwrap(),
            Some(BootLoaderKind::PxeGrub)
        );
        assert_eq!(
            BootLoaderKind::from_loader_file("grub2/grubx64.efi").unwrap(),
            Some(BootLoaderKind::PxeGrub2)
        );
        assert_eq!(BootLoaderKind::from_loader_file("").unwrap(), None);
        assert_eq!(BootLoaderKind::from_loader_file("None").unwrap(), None);
        assert!(BootLoaderKind::from_loader_file("ipxe.efi").is_err());
    }

    #[test]
    fn test_from_str_accepts_names_and_files() {
        assert_eq!("PXEGrub2".parse::<BootLoaderKind>().unwrap(), BootLoaderKind::PxeGrub2);
        assert_eq!("pxelinux".parse::<BootLoaderKind>().unwrap(), BootLoaderKind::PxeLinux);
        assert_eq!(
            "grub/bootia32.efi".parse::<BootLoaderKind>().unwrap(),
            BootLoaderKind::PxeGrub
        );
        assert!("".parse::<BootLoaderKind>().is_err());
    }

    #[test]
    fn test_firmware_family() {
        assert_eq!(BootLoaderKind::PxeLinux.firmware(), Firmware::Bios);
        assert_eq!(BootLoaderKind::PxeGrub.firmware(), Firmware::Uefi);
        assert_eq!(BootLoaderKind::PxeGrub2.firmware(), Firmware::Uefi);
    }

    #[test]
    fn test_local_boot_key() {
        assert_eq!(BootLoaderKind::PxeLinux.local_boot_key(), "local_boot_PXELinux");
    }

    #[test]
    fn test_serde_accepts_loader_file_alias() {
        let kind: BootLoaderKind = serde_json::from_str(r#""grub2/shimx64.efi""#).unwrap();
        assert_eq!(kind, BootLoaderKind::PxeGrub2);
        assert_eq!(serde_json::to_string(&kind).unwrap(), r#""PXEGrub2""#);
    }
}
