//! Glukora: diabetes risk prediction over a pre-trained logistic model.
//!
//! Command-line entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glukora::adapters::artifact::LogisticArtifact;
use glukora::adapters::gallery::Gallery;
use glukora::adapters::history::CsvHistory;
use glukora::application::{PredictionService, SummaryService};
use glukora::domain::PatientFeatures;
use glukora::ports::RepairOutcome;

#[derive(Debug, Parser)]
#[command(
    name = "glukora",
    version,
    about = "Diabetes risk prediction with an append-only CSV history",
    long_about = "Glukora scores clinical measurements against a pre-trained\n\
        logistic regression model, explains each prediction through ranked\n\
        feature contributions, and keeps every prediction in a flat CSV\n\
        history for later reporting."
)]
struct Cli {
    /// Directory containing the exported model artifact
    #[arg(long, env = "GLUKORA_MODEL_DIR", default_value = "model", global = true)]
    model_dir: PathBuf,

    /// Path of the CSV prediction history
    #[arg(
        long,
        env = "GLUKORA_HISTORY_FILE",
        default_value = "hasil/hasil_prediksi.csv",
        global = true
    )]
    history_file: PathBuf,

    /// Directory containing the model evaluation images
    #[arg(
        long,
        env = "GLUKORA_VISUALS_DIR",
        default_value = "visualisasi",
        global = true
    )]
    visuals_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score one set of measurements and append it to the history
    Predict(PredictArgs),

    /// Show the most recent history records
    History {
        /// Maximum number of records to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Backfill top-factor columns missing from an older history file
    Repair,

    /// Aggregate statistics over the whole history
    Summary,

    /// List which evaluation images are present
    Visuals,
}

/// Raw measurements; defaults match the intake form presets.
#[derive(Debug, Args)]
struct PredictArgs {
    /// Number of pregnancies (0-20)
    #[arg(long, default_value_t = 1)]
    pregnancies: u32,

    /// Plasma glucose in mg/dL (0-300)
    #[arg(long, default_value_t = 120)]
    glucose: u32,

    /// Diastolic blood pressure in mm Hg (0-200)
    #[arg(long, default_value_t = 70)]
    blood_pressure: u32,

    /// Triceps skin fold thickness in mm (0-100)
    #[arg(long, default_value_t = 20)]
    skin_thickness: u32,

    /// 2-hour serum insulin in mu U/ml (0-900)
    #[arg(long, default_value_t = 79)]
    insulin: u32,

    /// Body mass index in kg/m² (0.0-70.0)
    #[arg(long, default_value_t = 28.5)]
    bmi: f64,

    /// Diabetes pedigree function (0.0-2.5)
    #[arg(long, default_value_t = 0.5)]
    pedigree: f64,

    /// Age in years (1-120)
    #[arg(long, default_value_t = 30)]
    age: u32,
}

impl PredictArgs {
    fn into_features(self) -> Result<PatientFeatures> {
        let features = PatientFeatures {
            pregnancies: self.pregnancies,
            glucose: self.glucose,
            blood_pressure: self.blood_pressure,
            skin_thickness: self.skin_thickness,
            insulin: self.insulin,
            bmi: self.bmi,
            pedigree: self.pedigree,
            age: self.age,
        };
        if let Err(errors) = features.validate() {
            bail!("Invalid measurements: {}", errors.join("; "));
        }
        Ok(features)
    }
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    // Logs go to stderr so command output stays pipeable; GLUKORA_LOG_FILE
    // redirects them to a file instead.
    let (writer, guard) = match std::env::var("GLUKORA_LOG_FILE") {
        Ok(log_file) => {
            if let Some(parent) = std::path::Path::new(&log_file).parent() {
                // Best-effort: don't fail startup just because the directory is missing.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file)
                .with_context(|| format!("failed to open log file {log_file}"))?;
            tracing_appender::non_blocking(file)
        }
        Err(_) => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging()?;

    tracing::info!("Starting glukora...");

    match cli.command {
        Command::Predict(args) => {
            let features = args.into_features()?;
            let model =
                Arc::new(LogisticArtifact::load(&cli.model_dir).context("failed to load model")?);
            let store = Arc::new(CsvHistory::new(&cli.history_file));
            let service = PredictionService::new(model, store);

            let assessment = service.assess(features)?;

            println!("Status      : {}", assessment.outcome);
            println!(
                "Probability : {:.2}%",
                assessment.probability * 100.0
            );
            println!("Strongest factors:");
            for (i, c) in assessment.contributions.iter().take(3).enumerate() {
                println!(
                    "  {}. {} — {} (contribution: {:.4})",
                    i + 1,
                    c.feature,
                    c.direction().description(),
                    c.score
                );
            }
            println!("Saved to {:?}", cli.history_file);
        }

        Command::History { limit } => {
            use glukora::ports::PredictionStore;
            let store = CsvHistory::new(&cli.history_file);
            let records = store.read(Some(limit))?;
            if records.is_empty() {
                println!("No history records yet.");
            }
            for r in records {
                println!(
                    "glucose={} bmi={} age={} -> {} ({:.2}%) factors: {}, {}, {}",
                    r.features.glucose,
                    r.features.bmi,
                    r.features.age,
                    r.label,
                    r.probability * 100.0,
                    r.factors[0],
                    r.factors[1],
                    r.factors[2],
                );
            }
        }

        Command::Repair => {
            use glukora::ports::PredictionStore;
            let store = CsvHistory::new(&cli.history_file);
            match store.repair()? {
                RepairOutcome::Repaired(columns) => {
                    println!("Added columns: {}", columns.join(", "));
                }
                RepairOutcome::NothingToRepair => {
                    println!("All columns already present. Nothing changed.");
                }
            }
        }

        Command::Summary => {
            let store = Arc::new(CsvHistory::new(&cli.history_file));
            let summary = SummaryService::new(store).summarize()?;

            println!("Predictions : {}", summary.total);
            println!(
                "Positive    : {} ({:.1}%)",
                summary.positive, summary.positive_pct
            );
            println!(
                "Negative    : {} ({:.1}%)",
                summary.negative, summary.negative_pct
            );

            match summary.means {
                Some(means) => {
                    println!("Averages ({} columns):", means.convention);
                    for (col, mean) in means.values {
                        println!("  {col}: {mean:.2}");
                    }
                }
                None => println!("No mean columns available."),
            }

            if summary.top_factors.is_empty() {
                println!("No dominant factors recorded.");
            } else {
                println!("Most frequent factors:");
                for (i, f) in summary.top_factors.iter().enumerate() {
                    println!("  {}. {} — appeared {}x", i + 1, f.name, f.count);
                }
            }
        }

        Command::Visuals => {
            let gallery = Gallery::new(&cli.visuals_dir);
            for entry in gallery.entries() {
                match entry.path {
                    Some(path) => println!("{:<22} {}", entry.title, path.display()),
                    None => println!("{:<22} (missing: {})", entry.title, entry.file_name),
                }
            }
        }
    }

    tracing::info!("glukora done.");
    Ok(())
}
