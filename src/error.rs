//! Error types for the argo-profiles crate.
use thiserror::Error;

/// Error type for the crate.
#[derive(Debug, Error)]
pub enum ArgoError {
    /// A record lacks a required field, or holds a value that cannot be read.
    #[error("Record {index} has a missing or unreadable field '{field}'.")]
    MalformedRecord {
        /// Position of the offending record in the input.
        index: usize,
        /// Name of the offending field.
        field: &'static str,
    },
    /// Two records of the same profile disagree on a value every level should share.
    #[error(
        "Profile {platform_number}/{cycle_number} has conflicting values for '{field}'."
    )]
    InconsistentHeader {
        /// Float WMO id of the profile.
        platform_number: u32,
        /// Cycle number of the profile.
        cycle_number: u32,
        /// Name of the conflicting header field.
        field: &'static str,
    },
    /// The data source failed to answer a request.
    #[error("Data source unavailable: {0}")]
    SourceUnavailable(String),
    /// A spatial/temporal domain that cannot be requested.
    #[error("Invalid region: {0}")]
    InvalidRegion(String),
    /// A configuration value that is not recognized.
    #[error("Invalid value '{value}' for option '{option}'.")]
    InvalidOption {
        /// Name of the option.
        option: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A data request was made before an access point was selected.
    #[error("No access point selected, use 'float', 'profile' or 'region' first.")]
    NoAccessPoint,
    /// An access point was used with arguments it does not accept.
    #[error("Invalid access point: {0}")]
    InvalidAccessPoint(String),
    /// Forward an error from writing a table.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Forward an error from the CSV writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, ArgoError>;
