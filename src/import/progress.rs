//! Progress rendering
//!
//! The reporter never participates in correctness: it receives monotonic
//! advances from the coordinator and renders them either as a live bar or,
//! in quiet mode, as log lines throttled to whole-percent steps.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

/// How progress is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Live-updating terminal bar
    Bar,
    /// Discrete log lines (quiet mode)
    Log,
}

/// Stage-by-stage progress reporter.
pub struct ProgressReporter {
    mode: ProgressMode,
    bar: Option<ProgressBar>,
    stage: String,
    total: u64,
    done: u64,
    last_pct: u64,
}

impl ProgressReporter {
    pub fn new(mode: ProgressMode) -> Self {
        Self {
            mode,
            bar: None,
            stage: String::new(),
            total: 0,
            done: 0,
            last_pct: 0,
        }
    }

    /// Begin a stage. A total of zero means the size is unknown and a
    /// spinner is shown instead of a bar.
    pub fn start_stage(&mut self, stage: &str, total: u64) {
        self.stage = stage.to_string();
        self.total = total;
        self.done = 0;
        self.last_pct = 0;

        match self.mode {
            ProgressMode::Bar => {
                let bar = if total > 0 {
                    let bar = ProgressBar::new(total);
                    bar.set_style(
                        ProgressStyle::with_template(
                            "{msg:>14} [{bar:40}] {pos}/{len} ({percent}%)",
                        )
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("=> "),
                    );
                    bar
                } else {
                    ProgressBar::new_spinner()
                };
                bar.set_message(stage.to_string());
                self.bar = Some(bar);
            }
            ProgressMode::Log => {
                info!(stage = %self.stage, total, "stage started");
            }
        }
    }

    /// Advance the current stage. Updates are throttled in log mode so
    /// rendering never slows the pipeline.
    pub fn advance(&mut self, n: u64) {
        self.done += n;
        match self.mode {
            ProgressMode::Bar => {
                if let Some(bar) = &self.bar {
                    bar.inc(n);
                }
            }
            ProgressMode::Log => {
                if self.total > 0 {
                    let pct = self.done * 100 / self.total;
                    if pct > self.last_pct {
                        self.last_pct = pct;
                        info!(stage = %self.stage, "{}% ({}/{})", pct, self.done, self.total);
                    }
                } else if self.done % 50_000 == 0 {
                    info!(stage = %self.stage, done = self.done, "still merging");
                }
            }
        }
    }

    /// Close out the current stage.
    pub fn finish_stage(&mut self) {
        match self.mode {
            ProgressMode::Bar => {
                if let Some(bar) = self.bar.take() {
                    bar.finish_with_message(format!("{} done", self.stage));
                }
            }
            ProgressMode::Log => {
                info!(stage = %self.stage, done = self.done, "stage complete");
            }
        }
    }

    /// Final completion line, rendered exactly once on success.
    pub fn finish_run(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
        info!("import complete (100%)");
    }

    /// Distinct failure indicator, rendered on abort.
    pub fn abandon(&mut self, msg: &str) {
        if let Some(bar) = self.bar.take() {
            bar.abandon_with_message(msg.to_string());
        }
        error!("{}", msg);
    }

    /// Units completed in the current stage.
    pub fn done(&self) -> u64 {
        self.done
    }

    /// Whole-percent completion of the current stage, if its size is known.
    pub fn percent(&self) -> Option<u64> {
        (self.total > 0).then(|| self.done * 100 / self.total)
    }
}
