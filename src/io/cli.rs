//! Command-line interface for sampling patches from synthetic phantoms

use crate::io::configuration::{
    DEFAULT_AUGMENTATION_METHODS, DEFAULT_LABEL_CLASSES, DEFAULT_MIN_LABELS,
    DEFAULT_PATCH_PER_VOLUME, DEFAULT_PATCH_SIZE, DEFAULT_SEED, DEFAULT_VOLUME_COUNT,
    DEFAULT_VOLUME_EXTENT,
};
use crate::io::error::{Result, WithContext};
use crate::io::phantom::PhantomSource;
use crate::io::progress::SamplingProgress;
use crate::sampler::{SamplerConfig, SelectiveSampler, SessionStats, SpatialLocationCheck};
use crate::volume::patch::{Location, Patch, PatchGeometry};
use clap::Parser;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "volpatch")]
#[command(
    author,
    version,
    about = "Sample label-diverse patches from synthetic volumes"
)]
/// Command-line arguments for the sampling demo
pub struct Cli {
    /// Number of synthetic volumes to sample from
    #[arg(short = 'n', long, default_value_t = DEFAULT_VOLUME_COUNT)]
    pub volumes: usize,

    /// Edge length of each synthetic volume
    #[arg(short, long, default_value_t = DEFAULT_VOLUME_EXTENT)]
    pub extent: usize,

    /// Edge length of each patch
    #[arg(short, long, default_value_t = DEFAULT_PATCH_SIZE)]
    pub patch_size: usize,

    /// Valid locations targeted per volume
    #[arg(short = 'k', long, default_value_t = DEFAULT_PATCH_PER_VOLUME)]
    pub patch_per_volume: usize,

    /// Augmentation methods in order (rotation, spatial_scaling)
    #[arg(short, long, value_delimiter = ',')]
    pub augment: Vec<String>,

    /// Disable augmentation entirely
    #[arg(long, conflicts_with = "augment")]
    pub no_augment: bool,

    /// Number of label classes painted into each volume
    #[arg(short, long, default_value_t = DEFAULT_LABEL_CLASSES)]
    pub label_classes: usize,

    /// Minimum distinct labels required inside a patch
    #[arg(short, long, default_value_t = DEFAULT_MIN_LABELS)]
    pub min_labels: usize,

    /// Random seed for reproducible sampling
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Write a CSV manifest of sampled locations to this path
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,
}

impl Cli {
    /// Augmentation methods to configure, defaults when none were given
    pub fn augmentation_methods(&self) -> Vec<String> {
        if self.no_augment {
            Vec::new()
        } else if self.augment.is_empty() {
            DEFAULT_AUGMENTATION_METHODS
                .iter()
                .map(|&name| name.to_owned())
                .collect()
        } else {
            self.augment.clone()
        }
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Outcome of a sampling run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Session totals
    pub stats: SessionStats,
    /// Patches emitted per volume identifier
    pub patches_per_volume: BTreeMap<usize, usize>,
    /// Distinct label classes seen in each emitted patch
    pub distinct_labels: Vec<usize>,
    /// Volume identifier and location of every emitted patch
    pub locations: Vec<(usize, Location)>,
}

impl RunSummary {
    /// Average number of distinct label classes per patch
    pub fn mean_distinct_labels(&self) -> f64 {
        if self.distinct_labels.is_empty() {
            return 0.0;
        }
        self.distinct_labels.iter().sum::<usize>() as f64 / self.distinct_labels.len() as f64
    }

    /// CSV manifest with one `volume_id,x,y,z` line per patch
    pub fn manifest_csv(&self) -> String {
        let rows = self.locations.iter().map(|(volume_id, location)| {
            let mut row = volume_id.to_string();
            for coordinate in location.coordinates() {
                row.push(',');
                row.push_str(&coordinate.to_string());
            }
            row.push('\n');
            row
        });
        std::iter::once(String::from("volume_id,x,y,z\n")).chain(rows).collect()
    }
}

/// Runs the sampler over synthetic phantoms according to CLI arguments
pub struct SamplingRun {
    cli: Cli,
}

impl SamplingRun {
    /// Create a run for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Build the sampler described by the arguments
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid patch size, patch count
    /// or augmentation method name.
    pub fn build_sampler(&self) -> Result<SelectiveSampler> {
        let geometry = PatchGeometry::new(3, self.cli.patch_size, 1, 1, 1)?;
        let check = SpatialLocationCheck::new(self.cli.patch_size)
            .with_min_distinct_labels(self.cli.min_labels);
        let config = SamplerConfig::new(geometry)
            .with_patch_per_volume(self.cli.patch_per_volume)
            .with_augmentation(self.cli.augmentation_methods())
            .with_location_check(check)
            .with_seed(self.cli.seed);
        SelectiveSampler::new(config)
    }

    /// Sample every phantom and collect the summary
    ///
    /// # Errors
    ///
    /// Returns an error if the sampler cannot be built, a volume fails to
    /// sample or the manifest cannot be written.
    pub fn run(&self) -> Result<RunSummary> {
        let sampler = self.build_sampler()?;
        let source = PhantomSource::new(
            self.cli.volumes,
            self.cli.extent,
            self.cli.label_classes,
            self.cli.seed,
        );

        let mut progress = if self.cli.should_show_progress() {
            SamplingProgress::new(self.cli.volumes * self.cli.patch_per_volume)
        } else {
            SamplingProgress::hidden()
        };

        let mut summary = RunSummary::default();
        let mut session = sampler.sample(source, 1)?;
        while let Some(patch) = session.next_patch()? {
            progress.record_patch(patch.volume_id());
            *summary
                .patches_per_volume
                .entry(patch.volume_id())
                .or_insert(0) += 1;
            summary.distinct_labels.push(distinct_label_count(patch));
            summary
                .locations
                .push((patch.volume_id(), patch.location().clone()));
        }
        summary.stats = session.stats();
        progress.finish(&summary.stats);

        if let Some(path) = &self.cli.manifest {
            std::fs::write(path, summary.manifest_csv()).with_path(path, "write manifest")?;
        }

        Ok(summary)
    }

    /// Print a human-readable summary
    // Allow print for the final report of the demo binary
    #[allow(clippy::print_stdout)]
    pub fn report(&self, summary: &RunSummary) {
        let stats = &summary.stats;
        println!(
            "Sampled {} patches from {} volumes ({} short of {} per volume)",
            stats.patches, stats.volumes, stats.short_volumes, self.cli.patch_per_volume
        );
        println!(
            "Search: {} trials, {} location checks",
            stats.trials, stats.evaluations
        );
        println!(
            "Mean distinct labels per patch: {:.2}",
            summary.mean_distinct_labels()
        );
        for (volume_id, count) in &summary.patches_per_volume {
            println!("  volume {volume_id}: {count} patches");
        }
    }
}

fn distinct_label_count(patch: &Patch) -> usize {
    patch.label().map_or(0, |label| {
        label
            .iter()
            .filter(|value| value.is_finite())
            .map(|value| value.round() as i64)
            .collect::<BTreeSet<_>>()
            .len()
    })
}
