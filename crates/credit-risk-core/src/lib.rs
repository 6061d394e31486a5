pub mod applicant;
pub mod encode;
pub mod error;
pub mod features;
pub mod label;
pub mod schema;

pub use applicant::ApplicantForm;
pub use error::{ConversionError, FormError};
pub use features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
pub use label::RiskLabel;
pub use schema::scoring;
