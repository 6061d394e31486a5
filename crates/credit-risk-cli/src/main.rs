mod display;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use credit_risk_ai::{ArtifactPaths, Artifacts, RiskPipeline};
use credit_risk_core::{ApplicantForm, FeatureVector};
use tracing_subscriber::EnvFilter;

/// Score German-credit style loan applicants as good or bad risks.
#[derive(Parser)]
#[command(name = "credit-risk", version, about)]
struct Cli {
    /// Increase log verbosity (-v shows every pipeline stage)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    artifacts: ArtifactArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ArtifactArgs {
    /// Directory holding the fitted model artifacts
    #[arg(long, env = "CREDIT_RISK_ARTIFACTS", default_value = ".")]
    artifacts_dir: PathBuf,

    /// Classifier file, overriding `<artifacts-dir>/logistic_regression.json`
    #[arg(long, env = "CREDIT_RISK_CLASSIFIER")]
    classifier: Option<PathBuf>,

    /// Scaler file, overriding `<artifacts-dir>/scaler.json`
    #[arg(long, env = "CREDIT_RISK_SCALER")]
    scaler: Option<PathBuf>,

    /// Dimensionality reducer file, overriding `<artifacts-dir>/pca.json`
    #[arg(long, env = "CREDIT_RISK_REDUCER")]
    reducer: Option<PathBuf>,
}

impl ArtifactArgs {
    fn paths(&self) -> ArtifactPaths {
        let defaults = ArtifactPaths::in_dir(&self.artifacts_dir);
        ArtifactPaths {
            classifier: self.classifier.clone().unwrap_or(defaults.classifier),
            scaler: self.scaler.clone().unwrap_or(defaults.scaler),
            reducer: self.reducer.clone().unwrap_or(defaults.reducer),
        }
    }
}

/// Applicant fields. Numbers are taken as text and validated by the pipeline.
#[derive(Args)]
struct ApplicantArgs {
    #[arg(long, default_value = "1")]
    id: String,

    #[arg(long, default_value = "35")]
    age: String,

    /// Male / Female
    #[arg(long, default_value = "Male")]
    sex: String,

    /// Job category: 0, 1, 2 or 3
    #[arg(long, default_value = "2")]
    job: String,

    /// own, free or rent
    #[arg(long, default_value = "own")]
    housing: String,

    /// little, moderate, quite rich or rich
    #[arg(long, default_value = "moderate")]
    savings: String,

    /// little, moderate or rich
    #[arg(long, default_value = "moderate")]
    checking: String,

    #[arg(long, default_value = "2000")]
    credit_amount: String,

    /// Loan duration in months
    #[arg(long, default_value = "12")]
    duration: String,

    /// radio/TV, education, furniture/equipment, car, business,
    /// domestic appliances, repairs or vacation/others
    #[arg(long, default_value = "radio/TV")]
    purpose: String,
}

impl From<ApplicantArgs> for ApplicantForm {
    fn from(a: ApplicantArgs) -> Self {
        Self {
            id: a.id,
            age: a.age,
            sex: a.sex,
            job: a.job,
            housing: a.housing,
            savings: a.savings,
            checking: a.checking,
            credit_amount: a.credit_amount,
            duration: a.duration,
            purpose: a.purpose,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Predict the credit risk of one applicant
    Predict(ApplicantArgs),

    /// Show the encoded feature vector for one applicant
    Encode {
        #[command(flatten)]
        applicant: ApplicantArgs,

        /// Print as an Arrow table instead of a card
        #[arg(long)]
        table: bool,
    },

    /// Score a JSON-lines file of applicants, one object per line
    Batch {
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Report which model artifacts loaded
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("credit-risk v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Predict(applicant) => {
            let form = ApplicantForm::from(applicant);
            form.check_required()?;
            let pipeline = load_pipeline(&cli.artifacts);
            let prediction = pipeline.predict(&form)?;
            display::print_prediction(&prediction);
        }
        Command::Encode { applicant, table } => {
            let features = FeatureVector::from_form(&ApplicantForm::from(applicant))?;
            if table {
                display::print_table(&credit_risk_ai::encode_batch(&[features])?)?;
            } else {
                display::print_feature_card(&features);
            }
        }
        Command::Batch { input } => {
            let forms = read_applicants(&input)?;
            let pipeline = load_pipeline(&cli.artifacts);
            let batch = credit_risk_ai::score_batch(&pipeline, &forms)?;
            display::print_table(&batch)?;
        }
        Command::Check => {
            let artifacts = Artifacts::load(&cli.artifacts.paths());
            let summary = artifacts.summary();
            display::print_summary(&summary);
            anyhow::ensure!(summary.is_complete(), "artifact set is incomplete");
        }
    }

    Ok(())
}

/// Logs go to stderr so tables on stdout stay clean. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    const CRATES: &[&str] = &["credit_risk", "credit_risk_ai", "credit_risk_core"];
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let allowlist = CRATES
        .iter()
        .map(|c| format!("{c}={level}"))
        .collect::<Vec<_>>()
        .join(",");
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,{allowlist}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_pipeline(args: &ArtifactArgs) -> RiskPipeline {
    RiskPipeline::new(Artifacts::load(&args.paths()))
}

/// Read one applicant per non-blank line.
fn read_applicants(path: &Path) -> anyhow::Result<Vec<ApplicantForm>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<ApplicantForm>(line)
                .with_context(|| format!("{} line {}", path.display(), i + 1))
        })
        .collect()
}
