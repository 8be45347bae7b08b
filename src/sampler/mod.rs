/// Uniform candidate location generation
pub mod coordinates;
/// Bitset of label classes
pub mod label_set;
/// Location validity predicates
pub mod location_check;
/// Sampler orchestration and rejection search
pub mod selective;

pub use location_check::{AcceptAll, LocationValidator, SpatialLocationCheck};
pub use selective::{SamplerConfig, SamplingSession, SelectiveSampler, SessionStats};
