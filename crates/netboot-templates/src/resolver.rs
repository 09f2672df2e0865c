//! Template resolver

use crate::catalog::{local_boot_source, ProvisioningTemplate, TemplateCatalog};
use crate::context::RenderContext;
use crate::error::{Result, TemplateError};
use crate::settings::SettingsProvider;
use minijinja::Environment;
use netboot_common::{BootLoaderKind, Host};
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves and renders boot loader configuration for a host
pub struct TemplateResolver {
    catalog: Arc<dyn TemplateCatalog>,
    settings: Arc<dyn SettingsProvider>,
    env: Environment<'static>,
}

impl TemplateResolver {
    pub fn new(catalog: Arc<dyn TemplateCatalog>, settings: Arc<dyn SettingsProvider>) -> Self {
        Self {
            catalog,
            settings,
            env: Environment::new(),
        }
    }

    pub fn settings(&self) -> &dyn SettingsProvider {
        self.settings.as_ref()
    }

    /// Render the configuration `host` needs for `kind`.
    ///
    /// Returns [`TemplateError::NotFound`] only for hosts in build whose
    /// OS / architecture has no template of this kind; hosts out of build
    /// always get at least the built-in local boot menu.
    pub fn resolve(&self, host: &Host, kind: BootLoaderKind) -> Result<String> {
        let context = self.context(host, kind);

        if host.build {
            let template = self.build_template(host, kind)?;
            debug!(host = %host.name, kind = %kind, template = %template.name, "Rendering installer template");
            return self.render(&template.name, &template.template, &context);
        }

        if let Some(template) = self.local_boot_override(host, kind) {
            debug!(host = %host.name, kind = %kind, template = %template.name, "Rendering local boot override");
            return self.render(&template.name, &template.template, &context);
        }

        let (name, source) = local_boot_source(kind);
        self.render(name, source, &context)
    }

    /// The installer template a build of `host` would use for `kind`
    pub fn build_template(&self, host: &Host, kind: BootLoaderKind) -> Result<ProvisioningTemplate> {
        let found = match (&host.operatingsystem, &host.architecture) {
            (Some(os), Some(arch)) => self.catalog.find_for(os, arch, kind),
            _ => None,
        };
        found.ok_or_else(|| TemplateError::NotFound {
            kind,
            os: host
                .operatingsystem
                .as_ref()
                .map(|os| os.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            arch: host
                .architecture
                .as_ref()
                .map(|arch| arch.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    /// Local boot template named by the host parameter or, failing that,
    /// the global setting `local_boot_<Kind>`
    pub fn local_boot_override(&self, host: &Host, kind: BootLoaderKind) -> Option<ProvisioningTemplate> {
        let key = kind.local_boot_key();
        let candidates = [
            host.parameter(&key).filter(|v| !v.is_empty()).map(str::to_string),
            self.settings.setting(&key),
        ];

        for name in candidates.into_iter().flatten() {
            match self.catalog.find_by_name(&name) {
                Some(template) => return Some(template),
                None => warn!(host = %host.name, key = %key, template = %name, "Local boot template not found, falling back"),
            }
        }
        None
    }

    /// Substitution variables for `host` and `kind`
    pub fn context(&self, host: &Host, kind: BootLoaderKind) -> RenderContext {
        RenderContext::for_host(host, kind, &self.settings.unattended_url())
    }

    fn render(&self, name: &str, source: &str, context: &RenderContext) -> Result<String> {
        self.env
            .render_str(source, context)
            .map_err(|source| TemplateError::Render {
                template: name.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::settings::Settings;
    use netboot_common::{Architecture, Medium, OperatingSystem, OsFamily};

    fn resolver(catalog: MemoryCatalog, settings: Settings) -> TemplateResolver {
        TemplateResolver::new(Arc::new(catalog), Arc::new(settings))
    }

    fn redhat_build_host() -> Host {
        Host::new("build01.example.com")
            .with_os(
                OperatingSystem::new("Redhat", "6", "1").with_family(OsFamily::Redhat),
                Architecture::new("x86_64"),
            )
            .with_loader(BootLoaderKind::PxeLinux)
            .in_build(true)
    }

    const PXELINUX_LOCAL: &str = "DEFAULT menu
PROMPT 0
MENU TITLE PXE Menu
TIMEOUT 200
TOTALTIMEOUT 6000
ONTIMEOUT local

LABEL local
MENU LABEL (local)
MENU DEFAULT
LOCALBOOT 0";

    #[test]
    fn test_pxelinux_build_template() {
        let resolver = resolver(
            MemoryCatalog::with_builtins(),
            Settings::new().with("unattended_url", "http://ahost.com:3000"),
        );

        let config = resolver
            .resolve(&redhat_build_host(), BootLoaderKind::PxeLinux)
            .unwrap();

        let expected = "default linux
label linux
kernel boot/Redhat-6.1-x86_64-vmlinuz
append initrd=boot/Redhat-6.1-x86_64-initrd.img ks=http://ahost.com:3000/unattended/kickstart ksdevice=bootif network kssendmac";
        assert_eq!(config.trim(), expected);
    }

    #[test]
    fn test_suse_build_template() {
        let host = Host::new("suse01.example.com")
            .with_os(
                OperatingSystem::new("OpenSuse", "12", "3").with_family(OsFamily::Suse),
                Architecture::new("x86_64"),
            )
            .with_medium(Medium::new(
                "openSUSE",
                "http://download.opensuse.org/distribution/$version/repo/oss",
            ))
            .in_build(true);
        let resolver = resolver(
            MemoryCatalog::with_builtins(),
            Settings::new().with("unattended_url", "http://ahost.com:3000"),
        );

        let config = resolver.resolve(&host, BootLoaderKind::PxeLinux).unwrap();

        let expected = "DEFAULT linux
LABEL linux
KERNEL boot/OpenSuse-12.3-x86_64-linux
APPEND initrd=boot/OpenSuse-12.3-x86_64-initrd ramdisk_size=65536 install=http://download.opensuse.org/distribution/12.3/repo/oss autoyast=http://ahost.com:3000/unattended/provision textmode=1";
        assert_eq!(config.trim(), expected);
    }

    #[test]
    fn test_local_boot_ignores_operating_system() {
        let resolver = resolver(MemoryCatalog::with_builtins(), Settings::new());
        let host = redhat_build_host().in_build(false);

        let config = resolver.resolve(&host, BootLoaderKind::PxeLinux).unwrap();
        assert_eq!(config.trim(), PXELINUX_LOCAL);
        assert!(!config.contains("vmlinuz"));

        let other = Host::new("other").in_build(false);
        assert_eq!(
            resolver.resolve(&other, BootLoaderKind::PxeLinux).unwrap(),
            config
        );
    }

    #[test]
    fn test_uefi_local_boot_exits_to_firmware() {
        let resolver = resolver(MemoryCatalog::new(), Settings::new());
        let host = Host::new("h");
        for kind in [BootLoaderKind::PxeGrub, BootLoaderKind::PxeGrub2] {
            let config = resolver.resolve(&host, kind).unwrap();
            assert!(config.contains("exit"), "{} local boot: {}", kind, config);
            assert!(!config.contains("LOCALBOOT"));
        }
    }

    #[test]
    fn test_local_boot_from_setting() {
        let catalog = MemoryCatalog::new().with_template(ProvisioningTemplate::new(
            "my template",
            BootLoaderKind::PxeLinux,
            "test content",
        ));
        let resolver = resolver(catalog, Settings::new().with("local_boot_PXELinux", "my template"));

        let config = resolver
            .resolve(&Host::new("h"), BootLoaderKind::PxeLinux)
            .unwrap();
        assert_eq!(config, "test content");
    }

    #[test]
    fn test_host_parameter_beats_setting() {
        let catalog = MemoryCatalog::new()
            .with_template(ProvisioningTemplate::new("global", BootLoaderKind::PxeLinux, "global content"))
            .with_template(ProvisioningTemplate::new("mine", BootLoaderKind::PxeLinux, "test content again"));
        let resolver = resolver(catalog, Settings::new().with("local_boot_PXELinux", "global"));
        let host = Host::new("h").with_parameter("local_boot_PXELinux", "mine");

        assert_eq!(
            resolver.resolve(&host, BootLoaderKind::PxeLinux).unwrap(),
            "test content again"
        );
    }

    #[test]
    fn test_override_ignored_in_build() {
        let catalog = MemoryCatalog::with_builtins()
            .with_template(ProvisioningTemplate::new("mine", BootLoaderKind::PxeLinux, "local"));
        let resolver = resolver(catalog, Settings::new());
        let host = redhat_build_host().with_parameter("local_boot_PXELinux", "mine");

        let config = resolver.resolve(&host, BootLoaderKind::PxeLinux).unwrap();
        assert!(config.contains("kernel boot/Redhat-6.1-x86_64-vmlinuz"));
    }

    #[test]
    fn test_missing_override_falls_back_to_builtin() {
        let resolver = resolver(MemoryCatalog::new(), Settings::new().with("local_boot_PXELinux", "gone"));
        let config = resolver.resolve(&Host::new("h"), BootLoaderKind::PxeLinux).unwrap();
        assert_eq!(config.trim(), PXELINUX_LOCAL);
    }

    #[test]
    fn test_build_without_template_is_not_found() {
        let resolver = resolver(MemoryCatalog::new(), Settings::new());
        let err = resolver
            .resolve(&redhat_build_host(), BootLoaderKind::PxeGrub2)
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "No PXEGrub2 templates were found for Redhat 6.1/x86_64"
        );
    }

    #[test]
    fn test_build_without_os_is_not_found() {
        let resolver = resolver(MemoryCatalog::with_builtins(), Settings::new());
        let host = Host::new("h").in_build(true);
        assert!(resolver.resolve(&host, BootLoaderKind::PxeLinux).unwrap_err().is_not_found());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let resolver = resolver(MemoryCatalog::with_builtins(), Settings::new());
        let host = redhat_build_host();
        for kind in BootLoaderKind::ALL {
            let first = resolver.resolve(&host, kind).unwrap();
            let second = resolver.resolve(&host, kind).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_render_error_names_template() {
        let catalog = MemoryCatalog::new().with_template(
            ProvisioningTemplate::new("broken", BootLoaderKind::PxeLinux, "{% if %}").for_os("Redhat"),
        );
        let resolver = resolver(catalog, Settings::new());
        let err = resolver
            .resolve(&redhat_build_host(), BootLoaderKind::PxeLinux)
            .unwrap_err();
        assert!(matches!(err, TemplateError::Render { ref template, .. } if template == "broken"));
    }
}
