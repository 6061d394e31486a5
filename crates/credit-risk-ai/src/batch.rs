//! Tabular scoring: many applicants in, one Arrow RecordBatch out.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use credit_risk_core::{ApplicantForm, FEATURE_COUNT, FeatureVector, scoring};
use tracing::info;

use crate::pipeline::RiskPipeline;

/// Score every applicant, one output row per input row.
///
/// A failed prediction fills the `error` column for that row and leaves
/// `class`, `label` and `confidence` null; the rest of the batch is unaffected.
pub fn score_batch(pipeline: &RiskPipeline, forms: &[ApplicantForm]) -> anyhow::Result<RecordBatch> {
    let n = forms.len();
    let mut ids = Vec::with_capacity(n);
    let mut classes = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    let mut confidences = Vec::with_capacity(n);
    let mut errors = Vec::with_capacity(n);

    for form in forms {
        ids.push(form.id.trim().to_string());
        match pipeline.predict(form) {
            Ok(p) => {
                classes.push(Some(p.class));
                labels.push(Some(p.label.as_str().to_string()));
                confidences.push(Some(p.confidence));
                errors.push(None);
            }
            Err(e) => {
                classes.push(None);
                labels.push(None);
                confidences.push(None);
                errors.push(Some(e.to_string()));
            }
        }
    }

    let failed = errors.iter().filter(|e| e.is_some()).count();
    info!(rows = n, failed, "scored batch");

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(ids)),
        Arc::new(Int64Array::from(classes)),
        Arc::new(StringArray::from(labels)),
        Arc::new(Float64Array::from(confidences)),
        Arc::new(StringArray::from(errors)),
    ];
    Ok(RecordBatch::try_new(
        Arc::new(scoring::prediction_schema()),
        columns,
    )?)
}

/// Lay out encoded vectors as a RecordBatch, one Float64 column per slot.
pub fn encode_batch(vectors: &[FeatureVector]) -> anyhow::Result<RecordBatch> {
    let columns: Vec<ArrayRef> = (0..FEATURE_COUNT)
        .map(|j| {
            Arc::new(Float64Array::from_iter_values(
                vectors.iter().map(|v| v.as_slice()[j]),
            )) as ArrayRef
        })
        .collect();
    Ok(RecordBatch::try_new(
        Arc::new(scoring::feature_schema()),
        columns,
    )?)
}
