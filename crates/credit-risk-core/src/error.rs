use thiserror::Error;

/// A numeric field could not be read as a finite number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("could not convert {field} value {value:?} to a number")]
pub struct ConversionError {
    pub field: &'static str,
    pub value: String,
}

/// A required form field was left empty or zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("please enter your ID first")]
    MissingId,
    #[error("please enter your age first")]
    MissingAge,
    #[error("please enter your gender first")]
    MissingSex,
    #[error("please enter your housing detail first")]
    MissingHousing,
    #[error("please enter your credit amount first")]
    MissingCreditAmount,
    #[error("please enter duration first")]
    MissingDuration,
}
