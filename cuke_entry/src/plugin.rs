//! Reporter plugin descriptors.
//!
//! A reporter is described by a `<format>:<path>` string such as
//! `json:build/cucumber/cucumber.json`, mirroring the plugin syntax used by
//! other Cucumber implementations. The same string form is accepted from the
//! configuration file, the environment and the command line.

use std::fmt;
use std::str::FromStr;

use camino::Utf8PathBuf;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Output formats understood by the entry point.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ReporterFormat {
    /// Cucumber JSON results written to a single file.
    Json,
    /// HTML summary written to a directory.
    Html,
    /// JUnit-style XML results written to a single file.
    Junit,
}

impl ReporterFormat {
    /// Canonical lowercase name used in descriptor strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Html => "html",
            Self::Junit => "junit",
        }
    }
}

impl fmt::Display for ReporterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReporterFormat {
    type Err = ParseReporterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            "junit" => Ok(Self::Junit),
            other => Err(ParseReporterError::UnknownFormat(other.to_owned())),
        }
    }
}

/// Error produced when parsing a reporter descriptor string.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseReporterError {
    /// The descriptor lacked a `:` separating the format from the target.
    #[error("reporter descriptor '{0}' is missing a ':' separator")]
    MissingSeparator(String),

    /// The format name was not one of `json`, `html` or `junit`.
    #[error("unknown reporter format '{0}'")]
    UnknownFormat(String),

    /// The target path was empty.
    #[error("reporter descriptor '{0}' has an empty target path")]
    EmptyTarget(String),
}

/// A single `(format, target)` reporter descriptor.
///
/// # Examples
///
/// ```rust
/// use cuke_entry::{ReporterFormat, ReporterSpec};
///
/// let spec: ReporterSpec = "junit:build/test-results/cucumber.xml"
///     .parse()
///     .map_err(|e| format!("{e}"))?;
/// assert_eq!(spec.format, ReporterFormat::Junit);
/// assert_eq!(spec.target, "build/test-results/cucumber.xml");
/// # Ok::<(), String>(())
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReporterSpec {
    /// Report format to produce.
    pub format: ReporterFormat,
    /// Artifact location; a file path for `json`/`junit`, a directory for
    /// `html`.
    pub target: Utf8PathBuf,
}

impl FromStr for ReporterSpec {
    type Err = ParseReporterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (format, target) = s
            .split_once(':')
            .ok_or_else(|| ParseReporterError::MissingSeparator(s.to_owned()))?;
        let trimmed = target.trim();
        if trimmed.is_empty() {
            return Err(ParseReporterError::EmptyTarget(s.to_owned()));
        }
        Ok(Self {
            format: format.trim().parse()?,
            target: Utf8PathBuf::from(trimmed),
        })
    }
}

impl fmt::Display for ReporterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.format, self.target)
    }
}

impl Serialize for ReporterSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReporterSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
