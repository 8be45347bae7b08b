/// Command-line interface for the synthetic sampling demo
pub mod cli;
/// Sampling constants and defaults
pub mod configuration;
/// Error types and context helpers
pub mod error;
/// Synthetic phantom volumes for demos and benchmarks
pub mod phantom;
/// Progress display for sampling runs
pub mod progress;
