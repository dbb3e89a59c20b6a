//! End-to-end tests for the entry point, covering the observable contract:
//! one artifact per configured reporter, zero side effects when disabled,
//! idempotent aggregate outcomes and fatal resolution failures for malformed
//! feature paths.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow, ensure};
use camino::{Utf8Path, Utf8PathBuf};
use cucumber::{given, then, when};
use cuke_entry::{EntryError, Outcome, RunnerConfig};
use serial_test::serial;

/// Counts every step execution across the process, so disabled runs can be
/// shown to execute nothing.
static EXECUTED_STEPS: AtomicUsize = AtomicUsize::new(0);

/// Minimal world backing the temp-directory feature suites.
#[derive(Debug, Default, cucumber::World)]
pub struct CounterWorld {
    current: u64,
}

#[given(expr = "a counter at {int}")]
fn counter_at(world: &mut CounterWorld, start: u64) {
    EXECUTED_STEPS.fetch_add(1, Ordering::SeqCst);
    world.current = start;
}

#[when(expr = "the counter is incremented {int} times")]
fn increment(world: &mut CounterWorld, times: u64) {
    EXECUTED_STEPS.fetch_add(1, Ordering::SeqCst);
    world.current += times;
}

#[then(expr = "the counter shows {int}")]
fn shows(world: &mut CounterWorld, expected: u64) -> Result<()> {
    EXECUTED_STEPS.fetch_add(1, Ordering::SeqCst);
    ensure!(
        world.current == expected,
        "counter shows {}, expected {expected}",
        world.current
    );
    Ok(())
}

const PASSING_FEATURE: &str = "Feature: Counting\n\
  Scenario: increments accumulate\n\
    Given a counter at 1\n\
    When the counter is incremented 2 times\n\
    Then the counter shows 3\n";

const FAILING_FEATURE: &str = "Feature: Counting\n\
  Scenario: a wrong expectation fails\n\
    Given a counter at 1\n\
    Then the counter shows 99\n";

fn utf8(path: &std::path::Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|p| anyhow!("non UTF-8 temp dir: {}", p.display()))
}

fn write_suite(root: &Utf8Path, feature: &str) -> Result<Utf8PathBuf> {
    let features = root.join("features");
    fs::create_dir_all(&features)?;
    fs::write(features.join("counting.feature"), feature)?;
    Ok(features)
}

fn config_for(features: Utf8PathBuf, reports: &Utf8Path) -> Result<RunnerConfig> {
    Ok(RunnerConfig {
        features,
        glue: "counter suite".to_owned(),
        plugins: vec![
            format!("json:{reports}/cucumber.json").parse()?,
            format!("html:{reports}/html").parse()?,
            format!("junit:{reports}/cucumber.xml").parse()?,
        ],
        max_concurrent_scenarios: Some(1),
        ..RunnerConfig::default()
    })
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn produces_one_artifact_per_configured_reporter() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = utf8(dir.path())?;
    let features = write_suite(&root, PASSING_FEATURE)?;
    let reports = root.join("reports");
    let config = config_for(features, &reports)?;

    let outcome = cuke_entry::run::<CounterWorld>(&config).await?;
    ensure!(outcome == Outcome::Passed, "expected a passing run");
    ensure!(outcome.exit_code() == 0, "expected exit code 0");

    let json = fs::read_to_string(reports.join("cucumber.json"))?;
    let parsed: serde_json::Value = serde_json::from_str(&json)?;
    ensure!(parsed.is_array(), "JSON report should be a feature array");

    let xml = fs::read_to_string(reports.join("cucumber.xml"))?;
    ensure!(xml.contains("testsuite"), "JUnit report missing testsuite");

    let html = fs::read_to_string(reports.join("html/index.html"))?;
    ensure!(html.contains("counter suite"), "HTML report missing title");
    ensure!(
        html.contains("increments accumulate"),
        "HTML report missing scenario row"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn scenario_failures_aggregate_without_being_fatal() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = utf8(dir.path())?;
    let features = write_suite(&root, FAILING_FEATURE)?;
    let reports = root.join("reports");
    let config = config_for(features, &reports)?;

    let outcome = cuke_entry::run::<CounterWorld>(&config).await?;
    ensure!(outcome == Outcome::Failed, "expected a failing run");
    ensure!(outcome.exit_code() == 1, "expected exit code 1");
    ensure!(
        reports.join("cucumber.xml").is_file(),
        "failing runs still produce artifacts"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn disabled_run_executes_nothing_and_writes_nothing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = utf8(dir.path())?;
    let features = write_suite(&root, PASSING_FEATURE)?;
    let reports = root.join("reports");
    let config = RunnerConfig {
        enabled: false,
        skip_reason: Some("blocked on fixtures".to_owned()),
        ..config_for(features, &reports)?
    };

    let before = EXECUTED_STEPS.load(Ordering::SeqCst);
    let outcome = cuke_entry::run::<CounterWorld>(&config).await?;
    let after = EXECUTED_STEPS.load(Ordering::SeqCst);

    ensure!(outcome == Outcome::Skipped, "expected a skipped run");
    ensure!(outcome.exit_code() == 0, "skipped runs exit cleanly");
    ensure!(before == after, "skipped runs must execute zero steps");
    ensure!(!reports.exists(), "skipped runs must write zero artifacts");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn rerun_with_identical_inputs_is_idempotent() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = utf8(dir.path())?;
    let features = write_suite(&root, PASSING_FEATURE)?;
    let reports = root.join("reports");
    let config = config_for(features, &reports)?;

    let first = cuke_entry::run::<CounterWorld>(&config).await?;
    let second = cuke_entry::run::<CounterWorld>(&config).await?;
    ensure!(first == second, "identical inputs must yield identical outcomes");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[serial]
async fn malformed_feature_path_fails_resolution() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = utf8(dir.path())?;
    let reports = root.join("reports");
    let config = config_for(root.join("no-such-directory"), &reports)?;

    ensure!(
        matches!(
            cuke_entry::run::<CounterWorld>(&config).await,
            Err(EntryError::Features { .. })
        ),
        "expected a feature-path resolution failure"
    );
    ensure!(!reports.exists(), "failed resolution must not create targets");
    Ok(())
}
