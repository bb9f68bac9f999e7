use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::{SampleEvent, SampleObserver};

fn sampling_bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{prefix:<10} {bar:40.cyan/blue} {percent:>3}% {pos}/{len} samples [{elapsed_precise}<{eta_precise}] {msg}",
    )
    .expect("invalid sampling bar template")
}

pub struct ProgressReporter {
    bar: ProgressBar,
    samples_seen: u64,
    started: Instant,
    finished: bool,
}

impl ProgressReporter {
    pub fn new(expected_samples: u64) -> Self {
        let bar = ProgressBar::new(expected_samples);
        bar.set_style(sampling_bar_style());
        bar.set_prefix("sampling");
        Self {
            bar,
            samples_seen: 0,
            started: Instant::now(),
            finished: false,
        }
    }

    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let elapsed = self.started.elapsed().as_secs_f64();
        self.bar.finish_with_message(format!(
            "recorded {} samples in {elapsed:.1}s",
            self.samples_seen
        ));
    }

    pub fn abandon(&mut self, reason: &str) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.bar.abandon_with_message(format!(
            "stopped after {} samples: {reason}",
            self.samples_seen
        ));
    }
}

impl SampleObserver for ProgressReporter {
    fn sample_recorded(&mut self, event: &SampleEvent<'_>) {
        self.samples_seen = self.samples_seen.saturating_add(1);
        self.bar.inc(1);
        self.bar
            .set_message(format!("t={:.2}s", event.relative_time));
    }
}
