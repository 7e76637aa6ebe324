//! Verbosity-gated logging for selection runs.
//!
//! Output goes to stderr so it never mixes with a caller's stdout.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::selection::Selection;

/// Verbosity level for selection output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Warnings only (e.g. early budget termination).
    Warning,
    /// Run start/end and stage transitions.
    Info,
    /// Every committed selection.
    Debug,
}

/// Logger for one optimizer run.
#[derive(Debug, Clone)]
pub struct SelectionLogger {
    verbosity: Verbosity,
    optimizer: &'static str,
    started: Option<Instant>,
}

impl SelectionLogger {
    pub fn new(verbosity: Verbosity, optimizer: &'static str) -> Self {
        Self {
            verbosity,
            optimizer,
            started: None,
        }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    pub fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    pub fn start(&mut self, k: usize, n_candidates: usize) {
        self.started = Some(Instant::now());
        if self.enabled(Verbosity::Info) {
            eprintln!(
                "[{}] selecting {} of {} candidates",
                self.optimizer, k, n_candidates
            );
        }
    }

    pub fn log_selection(&self, round: usize, index: usize, gain: f64) {
        if self.enabled(Verbosity::Debug) {
            eprintln!(
                "[{}] round {}: selected {} (gain {:.6})",
                self.optimizer, round, index, gain
            );
        }
    }

    pub fn log_reevaluations(&self, round: usize, n_evaluations: usize) {
        if self.enabled(Verbosity::Debug) {
            eprintln!(
                "[{}] round {}: {} lazy re-evaluations",
                self.optimizer, round, n_evaluations
            );
        }
    }

    pub fn info(&self, message: &str) {
        if self.enabled(Verbosity::Info) {
            eprintln!("[{}] {}", self.optimizer, message);
        }
    }

    pub fn warn(&self, message: &str) {
        if self.enabled(Verbosity::Warning) {
            eprintln!("[{}] warning: {}", self.optimizer, message);
        }
    }

    pub fn finish(&self, selection: &Selection) {
        if self.enabled(Verbosity::Info) {
            let elapsed = self
                .started
                .map(|t| t.elapsed().as_secs_f64())
                .unwrap_or(0.0);
            eprintln!(
                "[{}] selected {} items, total gain {:.6} in {:.3}s",
                self.optimizer,
                selection.len(),
                selection.total_gain(),
                elapsed
            );
        }
    }
}
