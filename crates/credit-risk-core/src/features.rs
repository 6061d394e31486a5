//! Fixed-order numeric feature vector fed to the model chain.

use crate::applicant::{ApplicantForm, parse_number};
use crate::encode::{
    PURPOSE_CATEGORIES, encode_checking_account, encode_housing, encode_purpose,
    encode_saving_accounts, encode_sex,
};
use crate::error::ConversionError;

/// Scalar fields ahead of the purpose one-hot block.
pub const SCALAR_COUNT: usize = 9;

/// Total encoded width: 9 scalars + 8 purpose slots.
pub const FEATURE_COUNT: usize = SCALAR_COUNT + PURPOSE_CATEGORIES.len();

/// Column names in vector order. The scaler was fitted on this exact order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "id",
    "age",
    "sex",
    "job",
    "housing",
    "saving_accounts",
    "checking_account",
    "credit_amount",
    "duration",
    "purpose_radio_tv",
    "purpose_education",
    "purpose_furniture_equipment",
    "purpose_car",
    "purpose_business",
    "purpose_domestic_appliances",
    "purpose_repairs",
    "purpose_vacation_others",
];

/// An applicant encoded as 17 finite numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Convert and encode a raw applicant.
    ///
    /// Fails on the first numeric field (in vector order) that does not parse.
    pub fn from_form(form: &ApplicantForm) -> Result<Self, ConversionError> {
        let id = parse_number("id", &form.id)?;
        let age = parse_number("age", &form.age)?;
        let job = parse_number("job", &form.job)?;
        let credit_amount = parse_number("credit_amount", &form.credit_amount)?;
        let duration = parse_number("duration", &form.duration)?;

        let scalars = [
            id,
            age,
            f64::from(encode_sex(&form.sex)),
            job,
            f64::from(encode_housing(&form.housing)),
            f64::from(encode_saving_accounts(&form.savings)),
            f64::from(encode_checking_account(&form.checking)),
            credit_amount,
            duration,
        ];

        let mut values = [0.0; FEATURE_COUNT];
        values[..SCALAR_COUNT].copy_from_slice(&scalars);
        values[SCALAR_COUNT..].copy_from_slice(&encode_purpose(&form.purpose));
        Ok(Self(values))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Look up a value by its [`FEATURE_NAMES`] entry.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.0[i])
    }
}
