use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::attributes::{
    MODULE_NAME_OVERRIDE, validate_attribute_name, validate_attribute_value,
};
use crate::error::{BuildError, Result};

fn default_documented() -> bool {
    true
}

/// Mutable per-module settings, as read from the config file and adjusted by
/// the caller before tasks are registered.
///
/// Turned into an immutable [`ModuleDescriptor`] by [`ModuleConfig::finalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    pub name: String,
    #[serde(default)]
    pub publishable: bool,
    /// Java module name; its presence marks the module as modularized.
    #[serde(default)]
    pub module_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_documented")]
    pub documented: bool,
    /// Directory relative to the project root. Defaults to the module name.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Extra manifest attributes for this module.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ModuleConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            publishable: false,
            module_name: None,
            description: None,
            documented: true,
            path: None,
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn publishable(mut self, publishable: bool) -> Self {
        self.publishable = publishable;
        self
    }

    #[must_use]
    pub fn module_name(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = Some(module_name.into());
        self
    }

    #[must_use]
    pub fn documented(mut self, documented: bool) -> Self {
        self.documented = documented;
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Freeze the configuration.
    ///
    /// # Errors
    /// Returns `BuildError::Configuration` if the module has no name, an
    /// empty module name, or an attribute that cannot be written into a
    /// manifest.
    pub fn finalize(self) -> Result<ModuleDescriptor> {
        if self.name.trim().is_empty() {
            return Err(BuildError::Configuration(
                "module name must not be empty".to_string(),
            ));
        }
        if let Some(module_name) = &self.module_name
            && module_name.trim().is_empty()
        {
            return Err(BuildError::Configuration(format!(
                "module '{}' has an empty moduleName",
                self.name
            )));
        }
        if let Some(module_name) = &self.module_name {
            validate_attribute_value(MODULE_NAME_OVERRIDE, module_name)?;
        }
        for (key, value) in &self.attributes {
            validate_attribute_name(key)?;
            validate_attribute_value(key, value)?;
        }
        let dir = self.path.unwrap_or_else(|| PathBuf::from(&self.name));
        Ok(ModuleDescriptor {
            name: self.name,
            publishable: self.publishable,
            module_name: self.module_name,
            description: self.description,
            documented: self.documented,
            dir,
            attributes: self.attributes,
        })
    }
}

/// Immutable description of one buildable subproject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    name: String,
    publishable: bool,
    module_name: Option<String>,
    description: Option<String>,
    documented: bool,
    dir: PathBuf,
    attributes: BTreeMap<String, String>,
}

impl ModuleDescriptor {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_publishable(&self) -> bool {
        self.publishable
    }

    #[must_use]
    pub const fn is_modularized(&self) -> bool {
        self.module_name.is_some()
    }

    #[must_use]
    pub fn module_name(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub const fn is_documented(&self) -> bool {
        self.documented
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn source_dir(&self) -> PathBuf {
        self.dir.join("src").join("main").join("java")
    }

    /// Manifest overrides contributed by the module itself: its extra
    /// attributes plus `moduleName` when the module is modularized.
    #[must_use]
    pub fn overrides(&self) -> BTreeMap<String, String> {
        let mut overrides = self.attributes.clone();
        if let Some(module_name) = &self.module_name {
            overrides.insert(MODULE_NAME_OVERRIDE.to_string(), module_name.clone());
        }
        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalize_defaults() {
        let descriptor = ModuleConfig::new("jpx").finalize().unwrap();
        assert_eq!(descriptor.name(), "jpx");
        assert!(!descriptor.is_publishable());
        assert!(!descriptor.is_modularized());
        assert!(descriptor.is_documented());
        assert_eq!(descriptor.dir(), Path::new("jpx"));
        assert_eq!(
            descriptor.source_dir(),
            PathBuf::from("jpx").join("src").join("main").join("java")
        );
        assert!(descriptor.overrides().is_empty());
    }

    #[test]
    fn test_builder_settings_survive_finalize() {
        let descriptor = ModuleConfig::new("jpx")
            .publishable(true)
            .module_name("io.jenetics.jpx")
            .documented(false)
            .path(".")
            .finalize()
            .unwrap();
        assert!(descriptor.is_publishable());
        assert!(descriptor.is_modularized());
        assert_eq!(descriptor.module_name(), Some("io.jenetics.jpx"));
        assert!(!descriptor.is_documented());
        assert_eq!(descriptor.dir(), Path::new("."));
    }

    #[test]
    fn test_overrides_include_module_name_and_attributes() {
        let descriptor = ModuleConfig::new("jpx")
            .module_name("io.jenetics.jpx")
            .attribute("Sealed", "true")
            .finalize()
            .unwrap();
        let overrides = descriptor.overrides();
        assert_eq!(
            overrides.get(MODULE_NAME_OVERRIDE).map(String::as_str),
            Some("io.jenetics.jpx")
        );
        assert_eq!(overrides.get("Sealed").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_finalize_rejects_empty_name() {
        let err = ModuleConfig::new(" ").finalize().unwrap_err();
        assert!(matches!(err, BuildError::Configuration(_)));
    }

    #[test]
    fn test_finalize_rejects_empty_module_name() {
        let err = ModuleConfig::new("jpx").module_name("").finalize().unwrap_err();
        assert!(err.to_string().contains("moduleName"));
    }

    #[test]
    fn test_finalize_rejects_invalid_attributes() {
        let err = ModuleConfig::new("jpx")
            .attribute("Main Class", "x")
            .finalize()
            .unwrap_err();
        assert!(err.to_string().contains("Main Class"));

        let err = ModuleConfig::new("jpx")
            .attribute("X-Evil", "a\nMain-Class: Pwn")
            .finalize()
            .unwrap_err();
        assert!(matches!(err, BuildError::Configuration(_)));

        let err = ModuleConfig::new("jpx")
            .module_name("io.jenetics.jpx\nMain-Class: Pwn")
            .finalize()
            .unwrap_err();
        assert!(matches!(err, BuildError::Configuration(_)));
    }

    #[test]
    fn test_deserialize_module_config() {
        let config: ModuleConfig = serde_json::from_str(
            r#"{"name": "jpx.jdbc", "publishable": true, "moduleName": "io.jenetics.jpx.jdbc"}"#,
        )
        .unwrap();
        assert!(config.publishable);
        assert!(config.documented);
        assert_eq!(config.module_name.as_deref(), Some("io.jenetics.jpx.jdbc"));
        assert!(config.path.is_none());
    }
}
