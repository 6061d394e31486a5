//! Raw applicant record as collected from a form or an input file.

use serde::{Deserialize, Deserializer};

use crate::error::{ConversionError, FormError};

/// One applicant, exactly as entered.
///
/// Numeric fields are kept as text and only converted when the feature
/// vector is built, so a bad value surfaces as a [`ConversionError`] for that
/// request instead of failing at input time. When deserialized, numeric
/// fields accept either a JSON number or a JSON string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ApplicantForm {
    #[serde(deserialize_with = "number_or_text")]
    pub id: String,
    #[serde(deserialize_with = "number_or_text")]
    pub age: String,
    pub sex: String,
    /// Job category, 0 to 3.
    #[serde(deserialize_with = "number_or_text")]
    pub job: String,
    pub housing: String,
    #[serde(alias = "saving_accounts")]
    pub savings: String,
    #[serde(alias = "checking_account")]
    pub checking: String,
    #[serde(deserialize_with = "number_or_text")]
    pub credit_amount: String,
    #[serde(deserialize_with = "number_or_text")]
    pub duration: String,
    pub purpose: String,
}

impl ApplicantForm {
    /// Check that the fields a form must collect were provided.
    ///
    /// `id`, `age`, `credit_amount` and `duration` are only rejected when they
    /// parse to zero; unparsable values are left for the pipeline to report.
    pub fn check_required(&self) -> Result<(), FormError> {
        if is_zero(&self.id) {
            return Err(FormError::MissingId);
        }
        if is_zero(&self.age) {
            return Err(FormError::MissingAge);
        }
        if self.sex.trim().is_empty() {
            return Err(FormError::MissingSex);
        }
        if self.housing.trim().is_empty() {
            return Err(FormError::MissingHousing);
        }
        if is_zero(&self.credit_amount) {
            return Err(FormError::MissingCreditAmount);
        }
        if is_zero(&self.duration) {
            return Err(FormError::MissingDuration);
        }
        Ok(())
    }
}

fn is_zero(s: &str) -> bool {
    s.trim().parse::<f64>().is_ok_and(|v| v == 0.0)
}

/// Parse a numeric field to a finite `f64`.
pub fn parse_number(field: &'static str, value: &str) -> Result<f64, ConversionError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConversionError {
            field,
            value: value.to_string(),
        })
}

fn number_or_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(x) => x.to_string(),
    })
}
