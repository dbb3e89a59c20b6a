//! Report artifact sinks.
//!
//! One sink is opened per configured reporter before the run starts, so
//! target-creation failures surface as configuration-resolution errors
//! rather than mid-run panics. Unconfigured formats receive an [`io::sink`],
//! which keeps the composed framework writer a single static type whilst
//! producing exactly one artifact per configured reporter.

pub mod html;

use std::fs::{self, File};
use std::io::{self, Write};

use crate::error::{EntryError, EntryResult};
use crate::plugin::{ReporterFormat, ReporterSpec};

/// Open artifact sinks for one run, one slot per supported format.
pub struct ReporterSinks {
    /// Sink for the Cucumber JSON report file.
    pub json: Box<dyn Write>,
    /// Sink for the JUnit XML report file.
    pub junit: Box<dyn Write>,
    /// Sink for the HTML summary page (`index.html` inside the configured
    /// directory).
    pub html: Box<dyn Write>,
}

impl ReporterSinks {
    /// Opens a sink for every descriptor in `plugins`, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::Reporter`] if a target file or directory cannot
    /// be created.
    pub fn open(plugins: &[ReporterSpec]) -> EntryResult<Self> {
        let mut sinks = Self {
            json: Box::new(io::sink()),
            junit: Box::new(io::sink()),
            html: Box::new(io::sink()),
        };
        for plugin in plugins {
            let sink = open_target(plugin)?;
            match plugin.format {
                ReporterFormat::Json => sinks.json = sink,
                ReporterFormat::Junit => sinks.junit = sink,
                ReporterFormat::Html => sinks.html = sink,
            }
        }
        Ok(sinks)
    }
}

fn open_target(plugin: &ReporterSpec) -> EntryResult<Box<dyn Write>> {
    match plugin.format {
        ReporterFormat::Html => {
            fs::create_dir_all(&plugin.target)
                .map_err(|e| EntryError::reporter(&plugin.target, e))?;
            let index = plugin.target.join("index.html");
            let file = File::create(&index).map_err(|e| EntryError::reporter(&index, e))?;
            Ok(Box::new(file))
        }
        ReporterFormat::Json | ReporterFormat::Junit => {
            if let Some(parent) = plugin.target.parent()
                && !parent.as_str().is_empty()
            {
                fs::create_dir_all(parent).map_err(|e| EntryError::reporter(parent, e))?;
            }
            let file =
                File::create(&plugin.target).map_err(|e| EntryError::reporter(&plugin.target, e))?;
            Ok(Box::new(file))
        }
    }
}
