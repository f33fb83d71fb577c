//! Manifest attributes embedded into packaged JARs.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::env::EnvironmentSnapshot;
use crate::error::{BuildError, Result};
use crate::metadata::ProjectMetadata;
use crate::module::ModuleDescriptor;

/// Override key that is translated into [`keys::AUTOMATIC_MODULE_NAME`].
pub const MODULE_NAME_OVERRIDE: &str = "moduleName";

/// Maximum length of a manifest line in bytes, including the line break
/// continuation space.
const MAX_LINE_BYTES: usize = 72;

/// Longest attribute name a JAR manifest accepts.
const MAX_NAME_BYTES: usize = 70;

/// Manifest version written when no override sets one.
const DEFAULT_MANIFEST_VERSION: &str = "1.0";

pub mod keys {
    pub const MANIFEST_VERSION: &str = "Manifest-Version";
    pub const IMPLEMENTATION_TITLE: &str = "Implementation-Title";
    pub const IMPLEMENTATION_VERSION: &str = "Implementation-Version";
    pub const IMPLEMENTATION_URL: &str = "Implementation-URL";
    pub const IMPLEMENTATION_VENDOR: &str = "Implementation-Vendor";
    pub const PROJECT_NAME: &str = "ProjectName";
    pub const VERSION: &str = "Version";
    pub const MAINTAINER: &str = "Maintainer";
    pub const PROJECT: &str = "Project";
    pub const PROJECT_VERSION: &str = "Project-Version";
    pub const CREATED_WITH: &str = "Created-With";
    pub const BUILT_BY: &str = "Built-By";
    pub const BUILD_DATE: &str = "Build-Date";
    pub const BUILD_JDK: &str = "Build-JDK";
    pub const BUILD_OS_NAME: &str = "Build-OS-Name";
    pub const BUILD_OS_ARCH: &str = "Build-OS-Arch";
    pub const BUILD_OS_VERSION: &str = "Build-OS-Version";
    pub const AUTOMATIC_MODULE_NAME: &str = "Automatic-Module-Name";
}

/// Flat attribute-name to value mapping, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ManifestAttributes(BTreeMap<String, String>);

impl ManifestAttributes {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Render the attributes as a `META-INF/MANIFEST.MF` main section.
    ///
    /// `Manifest-Version` comes first, `1.0` unless overridden; lines longer
    /// than 72 bytes are wrapped onto continuation lines starting with a
    /// single space.
    #[must_use]
    pub fn to_manifest(&self) -> String {
        let mut out = String::new();
        let version = self
            .get(keys::MANIFEST_VERSION)
            .unwrap_or(DEFAULT_MANIFEST_VERSION);
        write_wrapped(&mut out, &format!("{}: {version}", keys::MANIFEST_VERSION));
        for (key, value) in self.iter() {
            if key == keys::MANIFEST_VERSION {
                continue;
            }
            write_wrapped(&mut out, &format!("{key}: {value}"));
        }
        out.push('\n');
        out
    }
}

fn write_wrapped(out: &mut String, line: &str) {
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_BYTES {
            out.push_str("\n ");
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out.push('\n');
}

/// Check that `name` can be a manifest header: 1 to 70 bytes of ASCII
/// letters, digits, `-` and `_`.
///
/// # Errors
/// Returns `BuildError::Configuration` naming the offending attribute.
pub fn validate_attribute_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_BYTES
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(BuildError::Configuration(format!(
            "invalid manifest attribute name '{name}'"
        )))
    }
}

/// Check that `value` fits on a manifest header line: no line breaks or NUL.
///
/// # Errors
/// Returns `BuildError::Configuration` naming the attribute `name`.
pub fn validate_attribute_value(name: &str, value: &str) -> Result<()> {
    if value.contains(['\r', '\n', '\0']) {
        return Err(BuildError::Configuration(format!(
            "value of '{name}' must not contain line breaks"
        )));
    }
    Ok(())
}

/// Compose the manifest attributes of a module.
///
/// The result depends only on the arguments. `overrides` may add keys or
/// replace fixed ones; the `moduleName` key becomes `Automatic-Module-Name`
/// and every other key is copied verbatim.
#[must_use]
pub fn compose(
    metadata: &ProjectMetadata,
    snapshot: &EnvironmentSnapshot,
    module: &ModuleDescriptor,
    overrides: &BTreeMap<String, String>,
) -> ManifestAttributes {
    let mut attributes = ManifestAttributes::default();
    attributes.insert(keys::IMPLEMENTATION_TITLE, module.name());
    attributes.insert(keys::IMPLEMENTATION_VERSION, &metadata.version);
    attributes.insert(keys::IMPLEMENTATION_URL, &metadata.url);
    attributes.insert(keys::IMPLEMENTATION_VENDOR, &metadata.name);
    attributes.insert(keys::PROJECT_NAME, &metadata.name);
    attributes.insert(keys::VERSION, &metadata.version);
    attributes.insert(keys::MAINTAINER, &metadata.author);
    attributes.insert(keys::PROJECT, module.name());
    attributes.insert(keys::PROJECT_VERSION, &metadata.version);
    attributes.insert(keys::CREATED_WITH, CREATED_WITH);
    attributes.insert(keys::BUILT_BY, snapshot.built_by());
    attributes.insert(keys::BUILD_DATE, snapshot.build_date());
    attributes.insert(keys::BUILD_JDK, snapshot.jdk_version());
    attributes.insert(keys::BUILD_OS_NAME, snapshot.os_name());
    attributes.insert(keys::BUILD_OS_ARCH, snapshot.os_arch());
    attributes.insert(keys::BUILD_OS_VERSION, snapshot.os_version());

    for (key, value) in overrides {
        if key == MODULE_NAME_OVERRIDE {
            attributes.insert(keys::AUTOMATIC_MODULE_NAME, value);
        } else {
            attributes.insert(key, value);
        }
    }
    attributes
}

const CREATED_WITH: &str = concat!("buildplan ", env!("CARGO_PKG_VERSION"));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::SystemFacts;
    use crate::module::ModuleConfig;
    use chrono::{TimeZone, Utc};

    fn metadata() -> ProjectMetadata {
        ProjectMetadata {
            id: "jpx".to_string(),
            name: "jpx".to_string(),
            group: "io.jenetics".to_string(),
            version: "3.2.0".to_string(),
            author: "Franz Wilhelmstötter".to_string(),
            url: "https://github.com/jenetics/jpx".to_string(),
            ..Default::default()
        }
    }

    fn snapshot() -> EnvironmentSnapshot {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        EnvironmentSnapshot::from_facts(
            now,
            SystemFacts {
                jdk_version: "11.0.20".to_string(),
                os_name: "Linux".to_string(),
                os_arch: "amd64".to_string(),
                os_version: "6.8".to_string(),
                user: "builder".to_string(),
            },
            Some(2016),
        )
    }

    fn module() -> ModuleDescriptor {
        ModuleConfig::new("jpx").finalize().unwrap()
    }

    #[test]
    fn test_compose_fixed_keys() {
        let attributes = compose(&metadata(), &snapshot(), &module(), &BTreeMap::new());
        assert_eq!(attributes.get(keys::IMPLEMENTATION_TITLE), Some("jpx"));
        assert_eq!(attributes.get(keys::IMPLEMENTATION_VERSION), Some("3.2.0"));
        assert_eq!(
            attributes.get(keys::IMPLEMENTATION_URL),
            Some("https://github.com/jenetics/jpx")
        );
        assert_eq!(attributes.get(keys::MAINTAINER), Some("Franz Wilhelmstötter"));
        assert_eq!(attributes.get(keys::BUILT_BY), Some("builder"));
        assert_eq!(attributes.get(keys::BUILD_DATE), Some("2026-10-19 12:00"));
        assert_eq!(attributes.get(keys::BUILD_JDK), Some("11.0.20"));
        assert_eq!(attributes.get(keys::BUILD_OS_ARCH), Some("amd64"));
        assert!(
            attributes
                .get(keys::CREATED_WITH)
                .unwrap()
                .starts_with("buildplan ")
        );
        assert_eq!(attributes.len(), 16);
        assert!(!attributes.contains(keys::AUTOMATIC_MODULE_NAME));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let mut overrides = BTreeMap::new();
        overrides.insert("moduleName".to_string(), "io.jenetics.jpx".to_string());
        overrides.insert("X-Custom".to_string(), "1".to_string());
        let first = compose(&metadata(), &snapshot(), &module(), &overrides);
        let second = compose(&metadata(), &snapshot(), &module(), &overrides);
        assert_eq!(first, second);
        assert_eq!(first.to_manifest(), second.to_manifest());
    }

    #[test]
    fn test_module_name_override_becomes_automatic_module_name() {
        let mut overrides = BTreeMap::new();
        overrides.insert("moduleName".to_string(), "io.jenetics.jpx".to_string());
        let attributes = compose(&metadata(), &snapshot(), &module(), &overrides);
        assert_eq!(
            attributes.get(keys::AUTOMATIC_MODULE_NAME),
            Some("io.jenetics.jpx")
        );
        assert!(!attributes.contains("moduleName"));
    }

    #[test]
    fn test_unknown_override_keys_pass_through() {
        let mut overrides = BTreeMap::new();
        overrides.insert("Sealed".to_string(), "true".to_string());
        overrides.insert(keys::MAINTAINER.to_string(), "Someone Else".to_string());
        let attributes = compose(&metadata(), &snapshot(), &module(), &overrides);
        assert_eq!(attributes.get("Sealed"), Some("true"));
        assert_eq!(attributes.get(keys::MAINTAINER), Some("Someone Else"));
        assert_eq!(attributes.len(), 17);
    }

    #[test]
    fn test_descriptor_overrides_feed_compose() {
        let module = ModuleConfig::new("jpx")
            .module_name("io.jenetics.jpx")
            .finalize()
            .unwrap();
        let attributes = compose(&metadata(), &snapshot(), &module, &module.overrides());
        assert_eq!(
            attributes.get(keys::AUTOMATIC_MODULE_NAME),
            Some("io.jenetics.jpx")
        );
    }

    #[test]
    fn test_to_manifest_starts_with_version_and_ends_with_blank_line() {
        let attributes = compose(&metadata(), &snapshot(), &module(), &BTreeMap::new());
        let manifest = attributes.to_manifest();
        assert!(manifest.starts_with("Manifest-Version: 1.0\n"));
        assert!(manifest.ends_with("\n\n"));
        assert!(manifest.contains("Implementation-Title: jpx\n"));
    }

    #[test]
    fn test_to_manifest_wraps_long_lines() {
        let mut overrides = BTreeMap::new();
        let long_value = "ö".repeat(40) + &"x".repeat(60);
        overrides.insert("X-Long".to_string(), long_value.clone());
        let attributes = compose(&metadata(), &snapshot(), &module(), &overrides);
        let manifest = attributes.to_manifest();

        for line in manifest.lines() {
            assert!(line.len() <= MAX_LINE_BYTES, "line too long: {line}");
        }
        let unwrapped = manifest.replace("\n ", "");
        assert!(unwrapped.contains(&format!("X-Long: {long_value}\n")));
    }

    #[test]
    fn test_manifest_version_override_is_rendered() {
        let mut overrides = BTreeMap::new();
        overrides.insert(keys::MANIFEST_VERSION.to_string(), "2.0".to_string());
        let attributes = compose(&metadata(), &snapshot(), &module(), &overrides);
        assert_eq!(attributes.get(keys::MANIFEST_VERSION), Some("2.0"));

        let manifest = attributes.to_manifest();
        assert!(manifest.starts_with("Manifest-Version: 2.0\n"));
        assert_eq!(manifest.matches("Manifest-Version").count(), 1);
    }

    #[rstest::rstest]
    #[case("Sealed")]
    #[case("X-Custom_1")]
    #[case(&"A".repeat(70))]
    fn test_validate_attribute_name_accepts(#[case] name: &str) {
        assert!(validate_attribute_name(name).is_ok());
    }

    #[rstest::rstest]
    #[case("")]
    #[case("Main Class")]
    #[case("X:Y")]
    #[case("Bad\nName")]
    #[case("Größe")]
    #[case(&"A".repeat(71))]
    fn test_validate_attribute_name_rejects(#[case] name: &str) {
        assert!(matches!(
            validate_attribute_name(name),
            Err(BuildError::Configuration(_))
        ));
    }

    #[rstest::rstest]
    #[case("a\nMain-Class: Pwn")]
    #[case("a\r\nb")]
    #[case("a\rb")]
    #[case("a\0b")]
    fn test_validate_attribute_value_rejects_line_breaks(#[case] value: &str) {
        assert!(matches!(
            validate_attribute_value("X-Evil", value),
            Err(BuildError::Configuration(_))
        ));
    }
}
