// Terminal reporter adapter - Console messages and the indicatif progress bar

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::warn;

use crate::ports::ReporterPort;

const BAR_TEMPLATE: &str = "{bar:40} {percent}% | ETA: {eta} | {pos}/{len}";

/// Writes messages to the terminal and draws progress on stderr
pub struct TerminalReporter {
    bar: Mutex<Option<ProgressBar>>,
    messages_to_stderr: bool,
    hidden: bool,
}

impl TerminalReporter {
    /// Messages go to stdout unless `messages_to_stderr` (stdout reserved for JSON)
    pub fn new(messages_to_stderr: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            messages_to_stderr,
            hidden: false,
        }
    }

    /// A reporter whose progress bar never draws
    pub fn hidden() -> Self {
        Self {
            bar: Mutex::new(None),
            messages_to_stderr: true,
            hidden: true,
        }
    }

    fn build_bar(&self) -> ProgressBar {
        let bar = ProgressBar::new(100);
        if self.hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        } else {
            bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        }
        match ProgressStyle::with_template(BAR_TEMPLATE) {
            Ok(style) => bar.set_style(style.progress_chars("█░ ")),
            Err(e) => warn!(error = %e, "invalid progress template, using default style"),
        }
        bar
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(bar) = guard.as_ref() {
                f(bar);
            }
        }
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|mut guard| guard.take())
    }

    /// Current bar position, if a bar is active
    pub fn position(&self) -> Option<u64> {
        self.bar.lock().ok().and_then(|guard| guard.as_ref().map(ProgressBar::position))
    }
}

impl ReporterPort for TerminalReporter {
    fn message(&self, text: &str) {
        let print = |text: &str| {
            if self.messages_to_stderr {
                eprintln!("{}", text);
            } else {
                println!("{}", text);
            }
        };
        match self.bar.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(bar) => bar.suspend(|| print(text)),
                None => print(text),
            },
            Err(_) => print(text),
        }
    }

    fn error(&self, text: &str) {
        eprintln!("{}", text);
    }

    fn progress_start(&self) {
        let bar = self.build_bar();
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn progress_update(&self, percent: f64) {
        let position = percent.clamp(0.0, 100.0).floor() as u64;
        self.with_bar(|bar| bar.set_position(position));
    }

    fn progress_finish(&self) {
        if let Some(bar) = self.take_bar() {
            bar.set_position(100);
            bar.finish();
        }
    }

    fn progress_abandon(&self) {
        if let Some(bar) = self.take_bar() {
            bar.abandon();
        }
    }
}
