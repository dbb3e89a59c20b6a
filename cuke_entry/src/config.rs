//! Layered runner configuration.
//!
//! The configuration record mirrors the annotation surface of other Cucumber
//! implementations: a feature directory, a glue label, an ordered set of
//! reporter plugins and an enable/disable flag with an optional skip reason.
//! Values are resolved in layers: built-in defaults, then [`CONFIG_FILE`],
//! then `CUKE_ENTRY_*` environment variables, then command-line options
//! merged over the top.

use std::collections::HashSet;
use std::ffi::OsString;

use camino::Utf8PathBuf;
use clap::Parser;
use figment::Figment;
use figment::providers::{Format as _, Serialized, Toml};
use serde::{Deserialize, Deserializer, Serialize};

use crate::csv_env::CsvEnv;
use crate::error::{EntryError, EntryResult};
use crate::plugin::{ReporterFormat, ReporterSpec};

/// Environment variable prefix recognised by the loader.
pub const ENV_PREFIX: &str = "CUKE_ENTRY_";

/// Well-known configuration file consulted by [`RunnerConfig::load`].
pub const CONFIG_FILE: &str = "cuke-entry.toml";

/// Configuration record describing a single test run.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Directory containing `.feature` files.
    pub features: Utf8PathBuf,
    /// Suite label recorded in logs and the HTML report title.
    ///
    /// Step definitions bind to the `World` type at compile time, so unlike
    /// a glue namespace this label carries no resolution semantics beyond
    /// being mandatory.
    pub glue: String,
    /// Ordered set of reporter descriptors; at most one per format.
    #[serde(deserialize_with = "one_or_many_plugins")]
    pub plugins: Vec<ReporterSpec>,
    /// Whether the run executes at all.
    pub enabled: bool,
    /// Reason recorded when the run is skipped.
    pub skip_reason: Option<String>,
    /// Treat skipped scenarios as failures.
    pub fail_on_skipped: bool,
    /// Upper bound on concurrently executing scenarios.
    pub max_concurrent_scenarios: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            features: Utf8PathBuf::from("tests/features"),
            glue: "steps".to_owned(),
            plugins: Vec::new(),
            enabled: true,
            skip_reason: None,
            fail_on_skipped: false,
            max_concurrent_scenarios: None,
        }
    }
}

/// Accept either a single descriptor string or a list of them.
///
/// The environment layer produces a plain string when only one plugin is
/// configured and no trailing comma is present.
fn one_or_many_plugins<'de, D>(deserializer: D) -> Result<Vec<ReporterSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(ReporterSpec),
        Many(Vec<ReporterSpec>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(spec) => vec![spec],
        OneOrMany::Many(specs) => specs,
    })
}

/// Command-line options layered over the file and environment configuration.
#[derive(Debug, Default, Parser)]
#[command(
    name = "cuke-entry",
    about = "Run Cucumber features with configurable report outputs"
)]
pub struct CliArgs {
    /// Directory containing `.feature` files.
    #[arg(long)]
    pub features: Option<Utf8PathBuf>,

    /// Suite label recorded in logs and the HTML report.
    #[arg(long)]
    pub glue: Option<String>,

    /// Reporter descriptor such as `json:build/cucumber.json`. Repeatable.
    #[arg(long = "plugin", value_name = "FORMAT:PATH")]
    pub plugins: Vec<ReporterSpec>,

    /// Skip the run entirely.
    #[arg(long)]
    pub disabled: bool,

    /// Reason recorded when the run is skipped.
    #[arg(long)]
    pub skip_reason: Option<String>,

    /// Treat skipped scenarios as failures.
    #[arg(long)]
    pub fail_on_skipped: bool,

    /// Upper bound on concurrently executing scenarios.
    #[arg(long)]
    pub max_concurrent_scenarios: Option<usize>,
}

impl RunnerConfig {
    /// Loads configuration from the well-known file, the environment and the
    /// process command line.
    ///
    /// # Errors
    ///
    /// Returns an [`EntryError`] if CLI parsing, provider gathering or
    /// validation fails.
    pub fn load() -> EntryResult<Self> {
        let cli = CliArgs::try_parse().map_err(EntryError::cli_parsing)?;
        Self::load_with(cli)
    }

    /// Loads configuration as [`RunnerConfig::load`] does, parsing
    /// command-line options from `args` instead of the process arguments.
    ///
    /// # Errors
    ///
    /// Returns an [`EntryError`] if CLI parsing, provider gathering or
    /// validation fails.
    pub fn load_from_iter<I, T>(args: I) -> EntryResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = CliArgs::try_parse_from(args).map_err(EntryError::cli_parsing)?;
        Self::load_with(cli)
    }

    /// Merges already-parsed `cli` options over the file and environment
    /// layers.
    ///
    /// # Errors
    ///
    /// Returns an [`EntryError`] if provider gathering or validation fails.
    pub fn load_with(cli: CliArgs) -> EntryResult<Self> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(CsvEnv::prefixed(ENV_PREFIX));
        let mut config: Self = figment.extract().map_err(EntryError::gathering)?;
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Applies `cli` options over this configuration. Absent options leave
    /// the underlying layers untouched.
    fn apply_cli(&mut self, cli: CliArgs) {
        if let Some(features) = cli.features {
            self.features = features;
        }
        if let Some(glue) = cli.glue {
            self.glue = glue;
        }
        if !cli.plugins.is_empty() {
            self.plugins = cli.plugins;
        }
        if cli.disabled {
            self.enabled = false;
        }
        if let Some(reason) = cli.skip_reason {
            self.skip_reason = Some(reason);
        }
        if cli.fail_on_skipped {
            self.fail_on_skipped = true;
        }
        if let Some(max) = cli.max_concurrent_scenarios {
            self.max_concurrent_scenarios = Some(max);
        }
    }

    /// Checks invariants that require no filesystem access.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::Validation`] if the glue label is empty or a
    /// reporter format is configured more than once.
    pub fn validate(&self) -> EntryResult<()> {
        if self.glue.trim().is_empty() {
            return Err(EntryError::validation(
                "glue",
                "suite label must not be empty",
            ));
        }
        let mut seen = HashSet::new();
        for plugin in &self.plugins {
            if !seen.insert(plugin.format) {
                return Err(EntryError::validation(
                    "plugins",
                    format!(
                        "reporter format '{}' is configured more than once",
                        plugin.format
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Returns the descriptor configured for `format`, if any.
    #[must_use]
    pub fn plugin(&self, format: ReporterFormat) -> Option<&ReporterSpec> {
        self.plugins.iter().find(|p| p.format == format)
    }
}
