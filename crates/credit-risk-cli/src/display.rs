//! Terminal rendering for predictions, encoded applicants, and artifact status.

use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use credit_risk_ai::{ArtifactSummary, Prediction, StageSummary};
use credit_risk_core::{FEATURE_NAMES, FeatureVector};

// ── Feature card sections ──

const APPLICANT: &[&str] = &["id", "age", "sex", "job", "housing"];

const ACCOUNTS: &[&str] = &["saving_accounts", "checking_account"];

const LOAN: &[&str] = &["credit_amount", "duration"];

/// Print the outcome as the form used to show it.
pub fn print_prediction(prediction: &Prediction) {
    println!(
        "Credit Risk Prediction: {}",
        prediction.label.as_str().to_uppercase()
    );
    println!("Confidence: {}", format_percent(prediction.confidence));
}

/// Print an encoded applicant as a vertical card grouped by section.
pub fn print_feature_card(features: &FeatureVector) {
    print_section(features, "Applicant", APPLICANT);
    print_section(features, "Accounts", ACCOUNTS);
    print_section(features, "Loan", LOAN);

    let purpose: Vec<&str> = FEATURE_NAMES
        .iter()
        .filter(|name| name.starts_with("purpose_"))
        .copied()
        .collect();
    print_section(features, "Purpose (one-hot)", &purpose);
}

pub fn print_summary(summary: &ArtifactSummary) {
    print_stage("scaler", summary.scaler.as_ref());
    print_stage("reducer", summary.reducer.as_ref());
    print_stage("classifier", summary.classifier.as_ref());
}

pub fn print_table(batch: &RecordBatch) -> anyhow::Result<()> {
    println!("{}", pretty_format_batches(std::slice::from_ref(batch))?);
    Ok(())
}

fn print_section(features: &FeatureVector, header: &str, names: &[&str]) {
    println!("{header}");
    for &name in names {
        if let Some(v) = features.get(name) {
            println!("  {:<30} {}", name, v);
        }
    }
    println!();
}

fn print_stage(role: &str, stage: Option<&StageSummary>) {
    match stage {
        Some(s) => println!("  {:<12} {:<22} {} -> {}", role, s.kind, s.n_in, s.n_out),
        None => println!("  {:<12} missing", role),
    }
}

fn format_percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}
