//! Operating systems, architectures and installation media
//!
//! Together these decide where a build-mode host fetches its installer
//! kernel and initrd from, and under which prefix the boot proxy stores them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Distribution family, which fixes installer file names and layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Redhat,
    Suse,
    Debian,
    #[default]
    Other,
}

impl OsFamily {
    /// Installer kernel and initrd file names
    fn pxe_images(&self) -> Option<(&'static str, &'static str)> {
        match self {
            OsFamily::Redhat => Some(("vmlinuz", "initrd.img")),
            OsFamily::Suse => Some(("linux", "initrd")),
            OsFamily::Debian => Some(("linux", "initrd.gz")),
            OsFamily::Other => None,
        }
    }

    /// Directory holding the installer images, relative to the medium root
    fn pxe_dir(&self, arch: &Architecture) -> Option<String> {
        match self {
            OsFamily::Redhat => Some("images/pxeboot".to_string()),
            OsFamily::Suse => Some(format!("boot/{}/loader", arch)),
            OsFamily::Debian => {
                let arch = arch.debian_name();
                Some(format!(
                    "main/installer-{arch}/current/images/netboot/debian-installer/{arch}"
                ))
            }
            OsFamily::Other => None,
        }
    }

    /// Path segment of the unattended-installation URL the installer fetches
    pub fn provision_path(&self) -> &'static str {
        match self {
            OsFamily::Redhat => "kickstart",
            _ => "provision",
        }
    }
}

/// An operating system release
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperatingSystem {
    pub name: String,
    pub major: String,
    #[serde(default)]
    pub minor: String,
    #[serde(default)]
    pub family: OsFamily,
}

impl OperatingSystem {
    pub fn new(name: impl Into<String>, major: impl Into<String>, minor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            major: major.into(),
            minor: minor.into(),
            family: OsFamily::Other,
        }
    }

    pub fn with_family(mut self, family: OsFamily) -> Self {
        self.family = family;
        self
    }

    /// `major.minor`, or just `major` when there is no minor release
    pub fn release(&self) -> String {
        if self.minor.is_empty() {
            self.major.clone()
        } else {
            format!("{}.{}", self.major, self.minor)
        }
    }

    /// Boot file prefix on the TFTP root, e.g. `boot/Redhat-6.1-x86_64`
    pub fn pxe_prefix(&self, arch: &Architecture) -> String {
        format!("boot/{}-{}-{}", self.name.replace(' ', "-"), self.release(), arch)
    }

    /// Kernel path relative to the TFTP root
    pub fn kernel_path(&self, arch: &Architecture) -> Option<String> {
        let (kernel, _) = self.family.pxe_images()?;
        Some(format!("{}-{}", self.pxe_prefix(arch), kernel))
    }

    /// Initrd path relative to the TFTP root
    pub fn initrd_path(&self, arch: &Architecture) -> Option<String> {
        let (_, initrd) = self.family.pxe_images()?;
        Some(format!("{}-{}", self.pxe_prefix(arch), initrd))
    }

    /// Files the boot proxy has to download before this release can be
    /// network-installed from `medium`. Empty for families we have no
    /// layout knowledge of.
    pub fn boot_files(&self, medium: &Medium, arch: &Architecture) -> Vec<BootFile> {
        let (Some((kernel, initrd)), Some(dir)) =
            (self.family.pxe_images(), self.family.pxe_dir(arch))
        else {
            return Vec::new();
        };
        let base = medium.url_for(self, arch);
        let base = base.trim_end_matches('/');
        let prefix = self.pxe_prefix(arch);
        [kernel, initrd]
            .into_iter()
            .map(|image| BootFile {
                prefix: format!("{}-{}", prefix, image),
                url: format!("{}/{}/{}", base, dir, image),
            })
            .collect()
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.release())
    }
}

/// CPU architecture name as used in boot file prefixes (`x86_64`, `aarch64`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Architecture(pub String);

impl Architecture {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn debian_name(&self) -> &str {
        match self.0.as_str() {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            "i386" | "i686" => "i386",
            other => other,
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Installation medium (package mirror)
///
/// `path` may contain `$major`, `$minor`, `$version` and `$arch`, which are
/// substituted per host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medium {
    pub name: String,
    pub path: String,
}

impl Medium {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn url_for(&self, os: &OperatingSystem, arch: &Architecture) -> String {
        self.path
            .replace("$version", &os.release())
            .replace("$major", &os.major)
            .replace("$minor", &os.minor)
            .replace("$arch", arch.as_str())
    }
}

/// A file the boot proxy downloads into its TFTP root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootFile {
    /// Destination relative to the TFTP root
    pub prefix: String,
    /// Source URL
    pub url: String,
}
