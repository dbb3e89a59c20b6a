//! The test entry point.
//!
//! [`run`] is the single operation of this crate: resolve the configured
//! feature directory, execute every scenario through the framework with the
//! step definitions bound to the caller's `World`, and write results to each
//! configured reporter target.

use std::fmt::Debug;
use std::io;

use cucumber::{World, WriterExt as _, writer, writer::Stats as _};

use crate::config::RunnerConfig;
use crate::discovery::resolve_features;
use crate::error::EntryResult;
use crate::reporter::{ReporterSinks, html::HtmlReport};

/// Aggregate result of invoking the entry point.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[must_use]
pub enum Outcome {
    /// Every executed scenario passed.
    Passed,
    /// At least one scenario or parse step failed.
    Failed,
    /// The run was disabled; nothing executed and no artifacts were written.
    Skipped,
}

impl Outcome {
    /// Process exit status reflecting the aggregate pass/fail.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Passed | Self::Skipped => 0,
            Self::Failed => 1,
        }
    }

    /// Whether the run recorded at least one failure.
    #[must_use]
    pub const fn has_failed(self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Executes the Cucumber run described by `config` with the step definitions
/// bound to `W`.
///
/// A disabled configuration short-circuits to [`Outcome::Skipped`] before any
/// feature discovery or reporter target creation, so a skipped run executes
/// zero scenarios and writes zero artifacts. Individual scenario failures are
/// recorded by the framework, not returned as errors; they fold into the
/// aggregate [`Outcome`].
///
/// # Errors
///
/// Returns an [`EntryError`](crate::EntryError) if validation fails, the
/// feature path cannot be resolved or a reporter target cannot be created.
pub async fn run<W>(config: &RunnerConfig) -> EntryResult<Outcome>
where
    W: World + cucumber::codegen::WorldInventory + Debug,
{
    if !config.enabled {
        let reason = config.skip_reason.as_deref().unwrap_or("no reason given");
        tracing::info!(suite = %config.glue, reason, "run disabled; skipping");
        return Ok(Outcome::Skipped);
    }

    config.validate()?;
    let features = resolve_features(&config.features)?;
    tracing::info!(
        suite = %config.glue,
        path = %features.root,
        feature_files = features.feature_files,
        "starting run"
    );
    let sinks = ReporterSinks::open(&config.plugins)?;

    let composed = writer::Basic::new(
        io::stdout(),
        writer::Coloring::Auto,
        writer::Verbosity::Default,
    )
    .summarized()
    .tee::<W, _>(writer::Json::for_tee(sinks.json))
    .tee::<W, _>(writer::JUnit::for_tee(sinks.junit, writer::Verbosity::Default))
    .tee::<W, _>(HtmlReport::for_tee(sinks.html, config.glue.clone()))
    .normalized();

    let cucumber = W::cucumber()
        .with_writer(composed)
        .max_concurrent_scenarios(config.max_concurrent_scenarios);

    let input = features.root.clone().into_std_path_buf();
    let failed = if config.fail_on_skipped {
        cucumber
            .fail_on_skipped()
            .run(input)
            .await
            .execution_has_failed()
    } else {
        cucumber.run(input).await.execution_has_failed()
    };

    for plugin in &config.plugins {
        tracing::debug!(format = %plugin.format, target = %plugin.target, "report artifact written");
    }

    if failed {
        Ok(Outcome::Failed)
    } else {
        Ok(Outcome::Passed)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Result, ensure};
    use rstest::rstest;

    use super::Outcome;

    #[rstest]
    #[case(Outcome::Passed, 0, false)]
    #[case(Outcome::Skipped, 0, false)]
    #[case(Outcome::Failed, 1, true)]
    fn exit_codes_reflect_aggregate(
        #[case] outcome: Outcome,
        #[case] code: i32,
        #[case] failed: bool,
    ) -> Result<()> {
        ensure!(outcome.exit_code() == code, "unexpected exit code");
        ensure!(outcome.has_failed() == failed, "unexpected failure flag");
        Ok(())
    }
}
