use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum EstimateError {
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}
