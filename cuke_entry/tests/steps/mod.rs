//! Step definitions for the self-test feature suite.

use anyhow::{Result, ensure};
use cucumber::{given, then, when};
use cuke_entry::{EntryError, ParseReporterError, ReporterSpec, RunnerConfig};

/// Shared state threaded through the self-test scenarios.
#[derive(Debug, Default, cucumber::World)]
pub struct EntryWorld {
    /// Raw descriptor string captured by a `Given` step.
    pub descriptor: Option<String>,
    /// Outcome of parsing [`descriptor`](Self::descriptor).
    pub parsed: Option<Result<ReporterSpec, ParseReporterError>>,
    /// Configuration under validation.
    pub config: Option<RunnerConfig>,
    /// Outcome of the validation step.
    pub validation: Option<Result<(), EntryError>>,
}

#[given(expr = "the descriptor {string}")]
fn descriptor(world: &mut EntryWorld, raw: String) -> Result<()> {
    ensure!(world.descriptor.is_none(), "descriptor already initialised");
    world.descriptor = Some(raw);
    Ok(())
}

#[when("the descriptor is parsed")]
fn parse_descriptor(world: &mut EntryWorld) -> Result<()> {
    let raw = world
        .descriptor
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("no descriptor captured"))?;
    world.parsed = Some(raw.parse());
    Ok(())
}

#[then(expr = "the format is {string} and the target is {string}")]
fn parsed_descriptor(world: &mut EntryWorld, format: String, target: String) -> Result<()> {
    let spec = match world.parsed.as_ref() {
        Some(Ok(spec)) => spec,
        other => anyhow::bail!("expected a parsed descriptor, got {other:?}"),
    };
    ensure!(
        spec.format.as_str() == format,
        "unexpected format: {}",
        spec.format
    );
    ensure!(spec.target == *target, "unexpected target: {}", spec.target);
    Ok(())
}

#[then("parsing fails with an unknown format error")]
fn unknown_format(world: &mut EntryWorld) -> Result<()> {
    ensure!(
        matches!(
            world.parsed.as_ref(),
            Some(Err(ParseReporterError::UnknownFormat(_)))
        ),
        "expected an unknown-format error, got {:?}",
        world.parsed
    );
    Ok(())
}

#[then("parsing fails with a missing separator error")]
fn missing_separator(world: &mut EntryWorld) -> Result<()> {
    ensure!(
        matches!(
            world.parsed.as_ref(),
            Some(Err(ParseReporterError::MissingSeparator(_)))
        ),
        "expected a missing-separator error, got {:?}",
        world.parsed
    );
    Ok(())
}

#[given(expr = "a configuration with plugins {string} and {string}")]
fn config_with_plugins(world: &mut EntryWorld, first: String, second: String) -> Result<()> {
    world.config = Some(RunnerConfig {
        plugins: vec![first.parse()?, second.parse()?],
        ..RunnerConfig::default()
    });
    Ok(())
}

#[given("a configuration with a blank glue label")]
fn config_with_blank_glue(world: &mut EntryWorld) -> Result<()> {
    world.config = Some(RunnerConfig {
        glue: "  ".to_owned(),
        ..RunnerConfig::default()
    });
    Ok(())
}

#[when("the configuration is validated")]
fn validate_config(world: &mut EntryWorld) -> Result<()> {
    let config = world
        .config
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no configuration captured"))?;
    world.validation = Some(config.validate());
    Ok(())
}

#[then("validation succeeds")]
fn validation_succeeds(world: &mut EntryWorld) -> Result<()> {
    ensure!(
        matches!(world.validation.as_ref(), Some(Ok(()))),
        "expected validation to succeed, got {:?}",
        world.validation
    );
    Ok(())
}

#[then(expr = "validation fails for {string}")]
fn validation_fails_for(world: &mut EntryWorld, expected_key: String) -> Result<()> {
    match world.validation.as_ref() {
        Some(Err(EntryError::Validation { key, .. })) if *key == expected_key => Ok(()),
        other => anyhow::bail!("expected validation failure for '{expected_key}', got {other:?}"),
    }
}
