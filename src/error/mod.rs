/////////////////////////////////////////////////////////////////////////////////////
//
// Outbreak model
//
// error module
//
// every failure the model can raise ends up as a SimError
//
////////////////////////////////////////////////////////////////////////////////////

use std::fmt::{self, Display};
use std::io;

pub type Result<T> = std::result::Result<T, SimError>;

/// Failures raised by the model. None of them are retried: invariant
/// violations point at a logic or configuration defect, validation errors
/// reject a single write, and resource errors abort the run at setup.
#[derive(Debug)]
pub enum SimError {
    /// an internal invariant does not hold (counter underflow, bad matrix shape ...)
    Invariant(String),
    /// a value was rejected at the point of mutation
    Validation(String),
    IoError(io::Error),
    CsvError(csv::Error),
    YamlError(yaml_rust::ScanError),
}

impl SimError {
    pub fn invariant<S: Into<String>>(msg: S) -> SimError {
        SimError::Invariant(msg.into())
    }

    pub fn validation<S: Into<String>>(msg: S) -> SimError {
        SimError::Validation(msg.into())
    }
}

impl From<io::Error> for SimError {
    fn from(error: io::Error) -> Self {
        SimError::IoError(error)
    }
}

impl From<csv::Error> for SimError {
    fn from(error: csv::Error) -> Self {
        SimError::CsvError(error)
    }
}

impl From<yaml_rust::ScanError> for SimError {
    fn from(error: yaml_rust::ScanError) -> Self {
        SimError::YamlError(error)
    }
}

impl std::error::Error for SimError {}

impl Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimError::Invariant(msg) => write!(f, "invariant violated: {}", msg),
            SimError::Validation(msg) => write!(f, "invalid value: {}", msg),
            SimError::IoError(e) => write!(f, "i/o error: {}", e),
            SimError::CsvError(e) => write!(f, "csv error: {}", e),
            SimError::YamlError(e) => write!(f, "yaml error: {}", e),
        }
    }
}
