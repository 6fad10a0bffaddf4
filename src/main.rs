use anyhow::Context;
use clap::{Parser, Subcommand};
use featurefit::artifact::LinearArtifact;
use featurefit::{
    ColumnReport, ModelArtifact, PredictionResult, RawInput, ReconcileResult, RestApi, SalaryBand,
    Schema, SchemaConfig, Session,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Reconcile form input with a trained model's feature schema
#[derive(Parser, Debug)]
#[command(name = "featurefit")]
#[command(about = "Feature-schema reconciliation for salary models", long_about = None)]
struct Args {
    /// Path to the model artifact (JSON)
    #[arg(short, long)]
    artifact: PathBuf,

    /// Path to the reconciliation config (JSON); defaults to no groups
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the schema the model expects
    Inspect,
    /// Predict one row
    Predict {
        /// Raw input as a JSON object
        #[arg(short, long, conflicts_with = "input_file")]
        input: Option<String>,

        /// File holding the raw input JSON object
        #[arg(long)]
        input_file: Option<PathBuf>,
    },
    /// Show the row the model would receive, without predicting
    Reconcile {
        /// Raw input as a JSON object
        #[arg(short, long, conflicts_with = "input_file")]
        input: Option<String>,

        /// File holding the raw input JSON object
        #[arg(long)]
        input_file: Option<PathBuf>,

        /// Print every column, not just the non-zero ones
        #[arg(long)]
        all: bool,
    },
    /// Serve the REST API
    Serve {
        /// HTTP API port
        #[arg(long, default_value_t = 8080)]
        http_port: u16,
    },
}

#[derive(Serialize)]
struct PredictOutput {
    #[serde(flatten)]
    result: PredictionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    band: Option<SalaryBand>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let artifact = LinearArtifact::from_path(&args.artifact)
        .with_context(|| format!("loading model artifact {:?}", args.artifact))?;
    let config = match &args.config {
        Some(path) => SchemaConfig::from_path(path)?,
        None => SchemaConfig::default(),
    };
    let bundled = artifact.bundled_columns().map(<[String]>::to_vec);

    let artifact = Arc::new(artifact);
    let session = Session::load(artifact.clone(), bundled.as_deref(), config)
        .context("the model's expected schema could not be determined")?;
    info!("Model loaded: {} features", session.schema().len());

    match args.command {
        Command::Inspect => {
            inspect(&session, artifact.as_ref(), bundled.as_deref());
            Ok(ExitCode::SUCCESS)
        }
        Command::Predict { input, input_file } => {
            let payload = read_payload(input, input_file)?;
            let result = match RawInput::from_json(&payload) {
                Ok(raw) => session.predict(&raw),
                Err(err) => PredictionResult::failure(&err, Vec::new()),
            };
            let success = result.is_success();
            let band = result.prediction.map(SalaryBand::classify);
            println!("{}", serde_json::to_string_pretty(&PredictOutput { result, band })?);

            Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Reconcile { input, input_file, all } => {
            let payload = read_payload(input, input_file)?;
            let mut result = match RawInput::from_json(&payload) {
                Ok(raw) => session.explain(&raw),
                Err(err) => ReconcileResult::failure(&err),
            };
            if !all {
                result.columns.retain(|c| c.value != 0.0);
            }
            let success = result.is_success();
            println!("{}", serde_json::to_string_pretty(&result)?);

            Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Serve { http_port } => {
            serve(Arc::new(session), http_port).await;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_payload(input: Option<String>, input_file: Option<PathBuf>) -> anyhow::Result<serde_json::Value> {
    let json = match (input, input_file) {
        (Some(json), _) => json,
        (None, Some(path)) => {
            std::fs::read_to_string(&path).with_context(|| format!("reading input {:?}", path))?
        }
        (None, None) => anyhow::bail!("either --input or --input-file is required"),
    };
    serde_json::from_str(&json).context("input is not valid JSON")
}

fn inspect(session: &Session, artifact: &dyn ModelArtifact, bundled: Option<&[String]>) {
    let schema = session.schema();

    println!("Model: {}", artifact.describe());
    println!("Expected features ({}):", schema.len());
    for (i, spec) in schema.features().iter().enumerate() {
        println!("  {:>3}  {}", i, spec.name());
    }

    for group in schema.groups() {
        println!("Group {}: choices {:?}", group.name(), group.choices());
        if let Some(fallback) = group.fallback() {
            println!("  unknown categories fall back to '{}'", fallback.category);
        }
        if let Some(reference) = group.reference() {
            println!("  '{}' is encoded as all zeros", reference);
        }
    }

    if let Some(columns) = bundled {
        println!("Bundled column list: {}", ColumnReport::compare(schema, columns));
    }

    if let Some(importances) = artifact.feature_importances() {
        match top_importances(schema, &importances, 10) {
            Some(ranked) => {
                println!("Top 10 important features:");
                for (rank, (name, importance)) in ranked.into_iter().enumerate() {
                    println!("  {}. {}: {:.4}", rank + 1, name, importance);
                }
            }
            None => tracing::warn!(
                importances = importances.len(),
                features = schema.len(),
                "feature importances do not line up with the schema; not shown"
            ),
        }
    }
}

/// Highest `n` importances paired with their column names
///
/// `None` when the importances are not one per schema column.
fn top_importances<'a>(schema: &'a Schema, importances: &[f64], n: usize) -> Option<Vec<(&'a str, f64)>> {
    if importances.len() != schema.len() {
        return None;
    }
    let mut ranked: Vec<(&str, f64)> = schema.names().into_iter().zip(importances.iter().copied()).collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(n);
    Some(ranked)
}

async fn serve(session: Arc<Session>, http_port: u16) {
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(session, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use featurefit::FeatureSpec;

    fn schema() -> Schema {
        Schema::new(vec![
            FeatureSpec::numeric("Years_Coding"),
            FeatureSpec::numeric("Education"),
            FeatureSpec::numeric("Age"),
        ])
        .unwrap()
    }

    #[test]
    fn test_top_importances_ranked() {
        let schema = schema();
        let ranked = top_importances(&schema, &[0.2, 0.5, 0.3], 2).unwrap();
        assert_eq!(ranked, vec![("Education", 0.5), ("Age", 0.3)]);
    }

    #[test]
    fn test_top_importances_length_mismatch() {
        let schema = schema();
        assert!(top_importances(&schema, &[0.2, 0.5], 10).is_none());
        assert!(top_importances(&schema, &[0.1, 0.2, 0.3, 0.4], 10).is_none());
    }
}
