/// Arrow schema definitions for scoring output.
pub mod scoring {
    use arrow::datatypes::{DataType, Field, Schema};

    use crate::features::FEATURE_NAMES;

    /// Schema for encoded feature rows, one Float64 column per vector slot.
    pub fn feature_schema() -> Schema {
        Schema::new(
            FEATURE_NAMES
                .iter()
                .map(|name| Field::new(*name, DataType::Float64, false))
                .collect::<Vec<_>>(),
        )
    }

    /// Schema for batch predictions.
    ///
    /// `class`, `label` and `confidence` are null exactly when `error` is set.
    pub fn prediction_schema() -> Schema {
        Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("class", DataType::Int64, true),
            Field::new("label", DataType::Utf8, true),
            Field::new("confidence", DataType::Float64, true),
            Field::new("error", DataType::Utf8, true),
        ])
    }
}
