//! HTML summary report [`Writer`] implementation.
//!
//! The framework ships JSON and JUnit XML writers but no HTML one, so this
//! adapter fills the gap. It collects per-scenario outcomes from framework
//! events and renders a single summary page when the run finishes; it
//! performs no scenario interpretation of its own.
//!
//! # Ordering
//!
//! This [`Writer`] isn't normalized by itself, so should be wrapped into a
//! `writer::Normalize`, otherwise scenario rows may interleave between
//! features. [`HtmlReport::for_tee`] prepares it for feeding into a teed,
//! normalized pipeline.

use std::fmt::Debug;
use std::io;

use cucumber::{
    Event, World, Writer, WriterExt as _, event, parser,
    writer::{self, discard},
};

/// Aggregate outcome of a single scenario, as rendered in the summary table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ScenarioStatus {
    Passed,
    Failed,
    Skipped,
}

impl ScenarioStatus {
    const fn label(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

/// A finished scenario row.
#[derive(Debug)]
struct ScenarioRow {
    feature: String,
    name: String,
    status: ScenarioStatus,
}

/// HTML summary report [`Writer`] outputting a single page into an
/// [`io::Write`] implementor.
#[derive(Debug)]
pub struct HtmlReport<Out: io::Write> {
    /// [`io::Write`] implementor to output the page into.
    output: Out,
    /// Suite label rendered as the page title.
    title: String,
    /// Finished scenario rows, in event order.
    rows: Vec<ScenarioRow>,
    /// Scenario currently executing.
    current: Option<ScenarioRow>,
    /// Feature parse errors reported by the framework.
    parsing_errors: Vec<String>,
}

impl<Out: io::Write> HtmlReport<Out> {
    /// Creates a new raw, non-normalized [`HtmlReport`] outputting the page
    /// into the given `output`.
    #[must_use]
    pub fn raw(output: Out, title: impl Into<String>) -> Self {
        Self {
            output,
            title: title.into(),
            rows: Vec::new(),
            current: None,
            parsing_errors: Vec::new(),
        }
    }

    /// Creates a new [`HtmlReport`] suitable for feeding into a teed writer
    /// pipeline that is normalized as a whole.
    #[must_use]
    pub fn for_tee(
        output: Out,
        title: impl Into<String>,
    ) -> discard::Arbitrary<discard::Stats<Self>> {
        Self::raw(output, title)
            .discard_stats_writes()
            .discard_arbitrary_writes()
    }

    fn scenario_event<W: Debug>(&mut self, feature: &str, scenario: &str, ev: &event::Scenario<W>) {
        use event::{Hook, Scenario, Step};

        match ev {
            Scenario::Started => {
                self.current = Some(ScenarioRow {
                    feature: feature.to_owned(),
                    name: scenario.to_owned(),
                    status: ScenarioStatus::Passed,
                });
            }
            Scenario::Background(_, Step::Failed(..))
            | Scenario::Step(_, Step::Failed(..))
            | Scenario::Hook(_, Hook::Failed(..)) => self.mark(ScenarioStatus::Failed),
            Scenario::Background(_, Step::Skipped) | Scenario::Step(_, Step::Skipped) => {
                self.mark(ScenarioStatus::Skipped);
            }
            Scenario::Finished => {
                if let Some(row) = self.current.take() {
                    self.rows.push(row);
                }
            }
            _ => {}
        }
    }

    /// Records `status` for the executing scenario. A failure is sticky: a
    /// scenario that has already failed never improves to skipped.
    fn mark(&mut self, status: ScenarioStatus) {
        if let Some(row) = self.current.as_mut()
            && row.status != ScenarioStatus::Failed
        {
            row.status = status;
        }
    }

    fn write_page(&mut self) {
        let mut passed = 0_usize;
        let mut failed = 0_usize;
        let mut skipped = 0_usize;
        for row in &self.rows {
            match row.status {
                ScenarioStatus::Passed => passed += 1,
                ScenarioStatus::Failed => failed += 1,
                ScenarioStatus::Skipped => skipped += 1,
            }
        }

        let mut page = String::new();
        page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        page.push_str(&format!(
            "<meta charset=\"utf-8\">\n<title>{}</title>\n",
            escape(&self.title)
        ));
        page.push_str("</head>\n<body>\n");
        page.push_str(&format!("<h1>{}</h1>\n", escape(&self.title)));
        page.push_str(&format!(
            "<p>{passed} passed, {failed} failed, {skipped} skipped, {} parse errors</p>\n",
            self.parsing_errors.len()
        ));
        page.push_str("<table>\n<thead><tr><th>Feature</th><th>Scenario</th><th>Status</th></tr></thead>\n<tbody>\n");
        for row in &self.rows {
            page.push_str(&format!(
                "<tr class=\"{status}\"><td>{feature}</td><td>{name}</td><td>{status}</td></tr>\n",
                status = row.status.label(),
                feature = escape(&row.feature),
                name = escape(&row.name),
            ));
        }
        page.push_str("</tbody>\n</table>\n");
        if !self.parsing_errors.is_empty() {
            page.push_str("<ul class=\"parse-errors\">\n");
            for parse_error in &self.parsing_errors {
                page.push_str(&format!("<li>{}</li>\n", escape(parse_error)));
            }
            page.push_str("</ul>\n");
        }
        page.push_str("</body>\n</html>\n");

        self.output
            .write_all(page.as_bytes())
            .unwrap_or_else(|e| panic!("Failed to write HTML report: {e}"));
    }
}

impl<W, Out> Writer<W> for HtmlReport<Out>
where
    W: World + Debug,
    Out: io::Write,
{
    type Cli = cucumber::cli::Empty;

    async fn handle_event(
        &mut self,
        ev: parser::Result<Event<event::Cucumber<W>>>,
        _cli: &Self::Cli,
    ) {
        use event::{Cucumber, Feature, Rule};

        match ev.map(Event::split) {
            Err(err) => self.parsing_errors.push(err.to_string()),
            Ok((Cucumber::Feature(feat, feature_ev), _)) => match feature_ev {
                Feature::Scenario(sc, retried) => {
                    self.scenario_event(&feat.name, &sc.name, &retried.event);
                }
                Feature::Rule(_, Rule::Scenario(sc, retried)) => {
                    self.scenario_event(&feat.name, &sc.name, &retried.event);
                }
                Feature::Started | Feature::Finished | Feature::Rule(..) => {}
            },
            Ok((Cucumber::Finished, _)) => self.write_page(),
            Ok((Cucumber::Started | Cucumber::ParsingFinished { .. }, _)) => {}
        }
    }
}

impl<Out: io::Write> writer::NonTransforming for HtmlReport<Out> {}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
