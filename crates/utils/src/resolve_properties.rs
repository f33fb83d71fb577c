use std::collections::BTreeMap;
use std::ffi::OsString;

use anyhow::{Context, Result};

/// Prefix of environment variables that provide build properties.
pub const PROPERTY_ENV_PREFIX: &str = "BUILDPLAN_PROP_";

/// Parse a `-P key=value` argument.
///
/// # Errors
/// Returns error if there is no `=` or the key is empty.
pub fn parse_property(arg: &str) -> Result<(String, String)> {
    let (key, value) = arg
        .split_once('=')
        .with_context(|| format!("Invalid property '{arg}', expected key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Invalid property '{arg}', key is empty");
    }
    Ok((key.to_string(), value.to_string()))
}

/// Merge the property sources, later ones winning: config file, then
/// `BUILDPLAN_PROP_<key>` environment variables, then command-line overrides.
/// Environment keys are taken verbatim after the prefix. Variables whose name
/// or value is not valid UTF-8 are ignored.
#[must_use]
pub fn resolve_properties<E, O>(
    config: &BTreeMap<String, String>,
    env_vars: E,
    overrides: O,
) -> BTreeMap<String, String>
where
    E: IntoIterator<Item = (OsString, OsString)>,
    O: IntoIterator<Item = (String, String)>,
{
    let mut properties = config.clone();
    properties.extend(env_vars.into_iter().filter_map(|(name, value)| {
        let name = name.into_string().ok()?;
        let key = name.strip_prefix(PROPERTY_ENV_PREFIX)?;
        if key.is_empty() {
            return None;
        }
        Some((key.to_string(), value.into_string().ok()?))
    }));
    properties.extend(overrides);
    properties
}
