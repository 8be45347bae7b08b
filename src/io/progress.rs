//! Progress display for sampling runs

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use crate::sampler::SessionStats;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] {{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} patches"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Tracks patches emitted against the number targeted
///
/// Volumes that yield fewer patches than targeted leave the bar short of its
/// length, which is reported when the run finishes.
pub struct SamplingProgress {
    bar: ProgressBar,
    current_volume: Option<usize>,
}

impl SamplingProgress {
    /// Create a visible progress bar expecting `expected_patches`
    pub fn new(expected_patches: usize) -> Self {
        let bar = ProgressBar::new(expected_patches as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        Self {
            bar,
            current_volume: None,
        }
    }

    /// Create a progress tracker that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            current_volume: None,
        }
    }

    /// Record one emitted patch
    pub fn record_patch(&mut self, volume_id: usize) {
        if self.current_volume != Some(volume_id) {
            self.current_volume = Some(volume_id);
            self.bar.set_message(format!("volume {volume_id}"));
        }
        self.bar.inc(1);
    }

    /// Patches recorded so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Close the bar with a summary of the session
    pub fn finish(&self, stats: &SessionStats) {
        self.bar.finish_with_message(format!(
            "{} volumes, {} short",
            stats.volumes, stats.short_volumes
        ));
    }
}
