//! Error types and context management for sampling operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all sampling operations
#[derive(Debug)]
pub enum SamplerError {
    /// Sampler or session configuration was rejected at construction time
    ///
    /// Raised for unknown augmentation method names, a zero patch count,
    /// a zero batch size or an inconsistent patch geometry.
    Configuration {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Aligned volume carries more than one non-spatial axis
    ///
    /// Time series and other multi-frame data are not supported.
    Dimensionality {
        /// Identifier of the offending volume
        volume_id: usize,
        /// Number of axes after alignment
        ndim: usize,
        /// Spatial rank the session was configured with
        spatial_rank: usize,
    },

    /// A location check needs label data but the volume has none
    MissingLabel {
        /// Identifier of the offending volume
        volume_id: usize,
    },

    /// Label or weight map extent differs from the image after alignment
    ShapeMismatch {
        /// Identifier of the offending volume
        volume_id: usize,
        /// Spatial extent of the image
        expected: Vec<usize>,
        /// Spatial extent that was found
        found: Vec<usize>,
    },

    /// The volume source failed to deliver a sample
    Source {
        /// Description of the failure
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for SamplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid configuration '{parameter}' = '{value}': {reason}")
            }
            Self::Dimensionality {
                volume_id,
                ndim,
                spatial_rank,
            } => {
                write!(
                    f,
                    "Volume {volume_id} has {ndim} axes for spatial rank {spatial_rank}; \
                     at most one non-spatial axis is supported"
                )
            }
            Self::MissingLabel { volume_id } => {
                write!(
                    f,
                    "Volume {volume_id} has no label but the location check requires one"
                )
            }
            Self::ShapeMismatch {
                volume_id,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Volume {volume_id} spatial extent mismatch: expected {expected:?}, found {found:?}"
                )
            }
            Self::Source { reason } => write!(f, "Volume source error: {reason}"),
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for SamplerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for sampling results
pub type Result<T> = std::result::Result<T, SamplerError>;

/// Additional context to enrich error messages
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Volume being processed when the error occurred
    pub volume_id: Option<usize>,
    /// Path of the file being written
    pub path: Option<PathBuf>,
    /// Operation being performed
    pub operation: Option<&'static str>,
}

/// Enriches error messages with sampling state information
pub trait WithContext<T> {
    /// Add error context to a Result
    ///
    /// # Errors
    ///
    /// Propagates the original error with additional context applied
    fn with_context(self, context: ErrorContext) -> Result<T>;

    /// Attach the path and operation of a failed file system call
    ///
    /// # Errors
    ///
    /// Propagates the original error with the path context applied
    fn with_path(self, path: impl Into<PathBuf>, operation: &'static str) -> Result<T>;
}

impl<T, E> WithContext<T> for std::result::Result<T, E>
where
    E: Into<SamplerError>,
{
    fn with_context(self, context: ErrorContext) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();
            match &mut error {
                SamplerError::Dimensionality { volume_id, .. }
                | SamplerError::MissingLabel { volume_id }
                | SamplerError::ShapeMismatch { volume_id, .. } => {
                    if let Some(id) = context.volume_id {
                        *volume_id = id;
                    }
                }
                SamplerError::FileSystem {
                    path, operation, ..
                } => {
                    if let Some(new_path) = context.path {
                        *path = new_path;
                    }
                    if let Some(new_operation) = context.operation {
                        *operation = new_operation;
                    }
                }
                SamplerError::Configuration { .. } | SamplerError::Source { .. } => {}
            }
            error
        })
    }

    fn with_path(self, path: impl Into<PathBuf>, operation: &'static str) -> Result<T> {
        self.with_context(ErrorContext {
            path: Some(path.into()),
            operation: Some(operation),
            ..Default::default()
        })
    }
}

impl From<std::io::Error> for SamplerError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create a configuration error
pub fn configuration_error(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> SamplerError {
    SamplerError::Configuration {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a volume source error
pub fn source_error(reason: &impl ToString) -> SamplerError {
    SamplerError::Source {
        reason: reason.to_string(),
    }
}
