//! Stage reporting.
//!
//! Transformers stay silent; the driver tells a `Reporter` what happened.
//! `TracingReporter` is what the binary uses, `RecordingReporter` is for
//! tests that assert on the sequence of stages.

use quarry_operators::Healed;

use crate::error::ExecError;

pub trait Reporter {
    fn stage_started(&mut self, stage: &str);
    fn stage_finished(&mut self, stage: &str, rows: usize);
    fn healed(&mut self, entity: &str, healed: &Healed);
    fn failed(&mut self, stage: &str, error: &ExecError);
}

/// Emits one `tracing` event per report. Validation failures are warnings,
/// everything else is an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn stage_started(&mut self, stage: &str) {
        tracing::debug!(stage, "stage started");
    }

    fn stage_finished(&mut self, stage: &str, rows: usize) {
        tracing::info!(stage, rows, "stage finished");
    }

    fn healed(&mut self, entity: &str, healed: &Healed) {
        tracing::info!(
            entity,
            column = %healed.column,
            rows = healed.rows.len(),
            "recomputed inconsistent derived values"
        );
    }

    fn failed(&mut self, stage: &str, error: &ExecError) {
        if error.is_validation() {
            tracing::warn!(stage, %error, "validation failed");
        } else {
            tracing::error!(stage, %error, "stage failed");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started(String),
    Finished { stage: String, rows: usize },
    Healed { entity: String, rows: Vec<usize> },
    Failed { stage: String, validation: bool, message: String },
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<Event>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages that finished, in order.
    pub fn finished(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Finished { stage, .. } => Some(stage.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Failed { .. }))
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn stage_started(&mut self, stage: &str) {
        self.events.push(Event::Started(stage.to_string()));
    }

    fn stage_finished(&mut self, stage: &str, rows: usize) {
        self.events.push(Event::Finished {
            stage: stage.to_string(),
            rows,
        });
    }

    fn healed(&mut self, entity: &str, healed: &Healed) {
        self.events.push(Event::Healed {
            entity: entity.to_string(),
            rows: healed.rows.clone(),
        });
    }

    fn failed(&mut self, stage: &str, error: &ExecError) {
        self.events.push(Event::Failed {
            stage: stage.to_string(),
            validation: error.is_validation(),
            message: error.to_string(),
        });
    }
}
