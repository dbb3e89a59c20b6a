//! Core crate for the `cuke-entry` test entry point.
//!
//! `cuke-entry` wires the [`cucumber`] framework to a configured directory of
//! feature files and a set of step definitions bound to a [`cucumber::World`]
//! type, then emits results through a configurable set of reporter plugins
//! (JSON, HTML and JUnit XML). Feature parsing, step matching and scenario
//! execution are supplied entirely by the framework; this crate resolves the
//! configuration, invokes the run once and routes the report artifacts.
//!
//! Configuration is layered in the usual order: built-in defaults, then a
//! `cuke-entry.toml` file, then `CUKE_ENTRY_*` environment variables, then
//! command-line options.
//!
//! ```rust,ignore
//! use cuke_entry::RunnerConfig;
//!
//! #[derive(Debug, Default, cucumber::World)]
//! struct World;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cuke_entry::EntryError> {
//!     let config = RunnerConfig::load()?;
//!     let outcome = cuke_entry::run::<World>(&config).await?;
//!     std::process::exit(outcome.exit_code());
//! }
//! ```

mod config;
mod csv_env;
mod discovery;
mod error;
mod plugin;
mod reporter;
mod runner;

pub use config::{CONFIG_FILE, CliArgs, ENV_PREFIX, RunnerConfig};
pub use csv_env::CsvEnv;
pub use discovery::{FeatureSet, resolve_features};
pub use error::{EntryError, EntryResult};
pub use plugin::{ParseReporterError, ReporterFormat, ReporterSpec};
pub use reporter::ReporterSinks;
pub use reporter::html::HtmlReport;
pub use runner::{Outcome, run};
