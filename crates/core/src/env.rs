use std::path::Path;

use chrono::{DateTime, Datelike, Local, TimeZone};
use serde::Serialize;
use sysinfo::System;

/// Format of the `Build-Date` manifest attribute.
pub const BUILD_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Machine facts read from the running system.
///
/// Every field defaults to an empty string when the fact is not available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemFacts {
    pub jdk_version: String,
    pub os_name: String,
    pub os_arch: String,
    pub os_version: String,
    pub user: String,
}

impl SystemFacts {
    /// Read the facts of the current machine. Never spawns processes.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            jdk_version: jdk_version(
                std::env::var("JAVA_VERSION").ok(),
                std::env::var_os("JAVA_HOME").as_deref().map(Path::new),
            ),
            os_name: os_display_name(std::env::consts::OS).to_string(),
            os_arch: std::env::consts::ARCH.to_string(),
            os_version: System::kernel_version().unwrap_or_default(),
            user: whoami::username(),
        }
    }
}

/// `java_version` if set, else the `JAVA_VERSION` entry of the JDK's
/// `release` file under `java_home`, else empty.
fn jdk_version(java_version: Option<String>, java_home: Option<&Path>) -> String {
    if let Some(version) = java_version.filter(|version| !version.trim().is_empty()) {
        return version.trim().to_string();
    }
    java_home
        .and_then(|home| std::fs::read_to_string(home.join("release")).ok())
        .and_then(|release| {
            release.lines().find_map(|line| {
                line.trim()
                    .strip_prefix("JAVA_VERSION=")
                    .map(|value| value.trim().trim_matches('"').to_string())
            })
        })
        .unwrap_or_default()
}

fn os_display_name(os: &str) -> &str {
    match os {
        "linux" => "Linux",
        "macos" => "Mac OS X",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

/// Immutable facts about one build invocation.
///
/// Captured once when the process starts and passed to whoever needs it; it is
/// never read from global state afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSnapshot {
    build_date: String,
    jdk_version: String,
    os_name: String,
    os_arch: String,
    os_version: String,
    built_by: String,
    copyright_year: String,
}

impl EnvironmentSnapshot {
    /// Capture the snapshot for the current machine and clock.
    #[must_use]
    pub fn capture(inception_year: Option<i32>) -> Self {
        Self::from_facts(Local::now(), SystemFacts::detect(), inception_year)
    }

    /// Capture the snapshot at an explicit instant on the current machine.
    #[must_use]
    pub fn capture_at<Tz>(now: DateTime<Tz>, inception_year: Option<i32>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self::from_facts(now, SystemFacts::detect(), inception_year)
    }

    #[must_use]
    pub fn from_facts<Tz>(now: DateTime<Tz>, facts: SystemFacts, inception_year: Option<i32>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            build_date: now.format(BUILD_DATE_FORMAT).to_string(),
            jdk_version: facts.jdk_version,
            os_name: facts.os_name,
            os_arch: facts.os_arch,
            os_version: facts.os_version,
            built_by: facts.user,
            copyright_year: copyright_years(inception_year, now.year()),
        }
    }

    #[must_use]
    pub fn build_date(&self) -> &str {
        &self.build_date
    }

    #[must_use]
    pub fn jdk_version(&self) -> &str {
        &self.jdk_version
    }

    #[must_use]
    pub fn os_name(&self) -> &str {
        &self.os_name
    }

    #[must_use]
    pub fn os_arch(&self) -> &str {
        &self.os_arch
    }

    #[must_use]
    pub fn os_version(&self) -> &str {
        &self.os_version
    }

    #[must_use]
    pub fn built_by(&self) -> &str {
        &self.built_by
    }

    /// Year range printed in copyright notices, e.g. `2016-2026`.
    #[must_use]
    pub fn copyright_year(&self) -> &str {
        &self.copyright_year
    }
}

fn copyright_years(inception_year: Option<i32>, current_year: i32) -> String {
    match inception_year {
        Some(year) if year < current_year => format!("{year}-{current_year}"),
        _ => current_year.to_string(),
    }
}
