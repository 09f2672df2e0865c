//! Template catalog
//!
//! Installer templates are bound to operating systems, either by exact
//! release or by distribution family, and optionally narrowed to a set of
//! architectures. Built-in templates cover the common families and can be
//! shadowed by registering a template bound to the specific release.

use netboot_common::{Architecture, BootLoaderKind, Firmware, OperatingSystem, OsFamily};
use serde::{Deserialize, Serialize};

/// Built-in local boot menus. BIOS loaders hand off with `LOCALBOOT`,
/// UEFI loaders exit back to the firmware boot manager in their own syntax.
pub(crate) fn local_boot_source(kind: BootLoaderKind) -> (&'static str, &'static str) {
    match (kind.firmware(), kind) {
        (Firmware::Bios, _) => (
            "PXELinux default local boot",
            include_str!("../templates/pxelinux-local.tmpl"),
        ),
        (Firmware::Uefi, BootLoaderKind::PxeGrub) => (
            "PXEGrub default local boot",
            include_str!("../templates/pxegrub-local.tmpl"),
        ),
        (Firmware::Uefi, _) => (
            "PXEGrub2 default local boot",
            include_str!("../templates/pxegrub2-local.tmpl"),
        ),
    }
}

/// Built-in installer templates: (name, kind, family, source)
const BUILTIN_TEMPLATES: &[(&str, BootLoaderKind, OsFamily, &str)] = &[
    (
        "Kickstart default PXELinux",
        BootLoaderKind::PxeLinux,
        OsFamily::Redhat,
        include_str!("../templates/kickstart-pxelinux.tmpl"),
    ),
    (
        "Kickstart default PXEGrub",
        BootLoaderKind::PxeGrub,
        OsFamily::Redhat,
        include_str!("../templates/kickstart-pxegrub.tmpl"),
    ),
    (
        "Kickstart default PXEGrub2",
        BootLoaderKind::PxeGrub2,
        OsFamily::Redhat,
        include_str!("../templates/kickstart-pxegrub2.tmpl"),
    ),
    (
        "AutoYaST default PXELinux",
        BootLoaderKind::PxeLinux,
        OsFamily::Suse,
        include_str!("../templates/autoyast-pxelinux.tmpl"),
    ),
    (
        "Preseed default PXELinux",
        BootLoaderKind::PxeLinux,
        OsFamily::Debian,
        include_str!("../templates/preseed-pxelinux.tmpl"),
    ),
];

/// A boot loader configuration template
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProvisioningTemplate {
    pub name: String,
    pub kind: BootLoaderKind,
    /// minijinja source; plain text renders to itself
    pub template: String,
    /// Releases this template is bound to, by name (`Redhat`) or title (`Redhat 6.1`)
    #[serde(default)]
    pub operatingsystems: Vec<String>,
    /// Families this template is bound to
    #[serde(default)]
    pub families: Vec<OsFamily>,
    /// Architectures this template is limited to; empty means any
    #[serde(default)]
    pub architectures: Vec<Architecture>,
}

impl ProvisioningTemplate {
    pub fn new(name: impl Into<String>, kind: BootLoaderKind, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            template: template.into(),
            operatingsystems: Vec::new(),
            families: Vec::new(),
            architectures: Vec::new(),
        }
    }

    pub fn for_os(mut self, os: impl Into<String>) -> Self {
        self.operatingsystems.push(os.into());
        self
    }

    pub fn for_family(mut self, family: OsFamily) -> Self {
        self.families.push(family);
        self
    }

    pub fn for_arch(mut self, arch: Architecture) -> Self {
        self.architectures.push(arch);
        self
    }

    fn arch_matches(&self, arch: &Architecture) -> bool {
        self.architectures.is_empty() || self.architectures.contains(arch)
    }

    /// Bound to this exact release
    pub fn binds_release(&self, os: &OperatingSystem, arch: &Architecture) -> bool {
        let title = os.to_string();
        self.arch_matches(arch)
            && self
                .operatingsystems
                .iter()
                .any(|bound| *bound == os.name || *bound == title)
    }

    /// Bound to the release's family
    pub fn binds_family(&self, os: &OperatingSystem, arch: &Architecture) -> bool {
        self.arch_matches(arch) && self.families.contains(&os.family)
    }
}

/// Lookup of templates by name and by OS / architecture / kind
pub trait TemplateCatalog: Send + Sync {
    /// Find a template by its name
    fn find_by_name(&self, name: &str) -> Option<ProvisioningTemplate>;

    /// Find the installer template for a release, architecture and kind
    fn find_for(
        &self,
        os: &OperatingSystem,
        arch: &Architecture,
        kind: BootLoaderKind,
    ) -> Option<ProvisioningTemplate>;
}

/// In-memory catalog
///
/// A template bound to the exact release wins over one bound to the family;
/// within each tier, the most recently added template wins.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    templates: Vec<ProvisioningTemplate>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the built-in installer templates
    pub fn with_builtins() -> Self {
        let templates = BUILTIN_TEMPLATES
            .iter()
            .map(|(name, kind, family, source)| {
                ProvisioningTemplate::new(*name, *kind, *source).for_family(*family)
            })
            .collect();
        Self { templates }
    }

    pub fn with_template(mut self, template: ProvisioningTemplate) -> Self {
        self.add(template);
        self
    }

    pub fn add(&mut self, template: ProvisioningTemplate) {
        self.templates.push(template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateCatalog for MemoryCatalog {
    fn find_by_name(&self, name: &str) -> Option<ProvisioningTemplate> {
        self.templates.iter().rev().find(|t| t.name == name).cloned()
    }

    fn find_for(
        &self,
        os: &OperatingSystem,
        arch: &Architecture,
        kind: BootLoaderKind,
    ) -> Option<ProvisioningTemplate> {
        let of_kind = || self.templates.iter().rev().filter(move |t| t.kind == kind);
        of_kind()
            .find(|t| t.binds_release(os, arch))
            .or_else(|| of_kind().find(|t| t.binds_family(os, arch)))
            .cloned()
    }
}
