//! Command-line front end for Hanzo PII
//!
//! - `list`: presets and recognizer identifiers
//! - `redact`: redact a text argument or stdin
//! - `input` / `output`: run a gateway guardrail request read from a JSON file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hanzo_pii::config::CONFIG_ENV_VAR;
use hanzo_pii::{
    catalog, redactor, resolver, AnalyzerEngine, EngineConfig, Guard, GuardConfig, GuardrailResponse,
    InputGuardrailRequest, OutputGuardrailRequest, PipelineConfig,
};
use serde_json::json;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hanzo-pii")]
#[command(about = "Detect and redact PII in LLM gateway traffic")]
struct Args {
    /// Engine/guard configuration file (TOML)
    #[arg(short, long, env = CONFIG_ENV_VAR, global = true)]
    config: Option<PathBuf>,

    /// Deadline for one guardrail decision, in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List presets and recognizer identifiers
    List,

    /// Redact a text (reads stdin when TEXT is omitted)
    Redact {
        text: Option<String>,

        /// Presets and/or identifiers, comma separated
        #[arg(short, long)]
        recognizers: Option<String>,

        /// Language code
        #[arg(short, long, default_value = "en")]
        language: String,

        /// Print the matches and result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run an input guardrail request
    Input { file: PathBuf },

    /// Run an output guardrail request
    Output { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GuardConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => GuardConfig::default(),
    };
    if let Some(ms) = args.timeout_ms {
        config.timeout_ms = Some(ms);
    }

    match args.command {
        Command::List => list(&config.engine),
        Command::Redact {
            text,
            recognizers,
            language,
            json,
        } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("reading stdin")?;
                    buf
                }
            };

            let pipeline_config = PipelineConfig {
                enabled: true,
                recognizers: recognizers.as_deref().map(Into::into),
                language,
            };
            let guard = build_guard(config);

            if json {
                let engine = guard.engine();
                let resolved = resolver::resolve_config(&pipeline_config, engine.config())?;
                let matches = engine
                    .analyze(&text, &resolved.ids, &resolved.language)
                    .await?;
                let result = redactor::redact(&text, &matches)?;
                let report = json!({
                    "recognizers": resolved.ids,
                    "language": resolved.language,
                    "matches": matches,
                    "redacted_text": result.redacted_text,
                    "changed": result.changed,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let result = guard.redact_text(&text, &pipeline_config).await?;
                print!("{}", result.redacted_text);
            }
        }
        Command::Input { file } => {
            let request: InputGuardrailRequest = read_json(&file)?;
            let guard = build_guard(config);
            let outcome = guard.process_input(&request).await?;
            print_response(outcome)?;
        }
        Command::Output { file } => {
            let request: OutputGuardrailRequest = read_json(&file)?;
            let guard = build_guard(config);
            let outcome = guard.process_output(&request).await?;
            print_response(outcome)?;
        }
    }

    Ok(())
}

fn build_guard(config: GuardConfig) -> Guard {
    info!(
        default_recognizers = ?config.engine.default_recognizers.tokens(),
        timeout_ms = ?config.timeout_ms,
        "Starting PII guard"
    );
    let engine = Arc::new(AnalyzerEngine::new(config.engine.clone()));
    Guard::with_engine(config, engine)
}

fn list(engine: &EngineConfig) {
    println!("Presets:");
    for preset in catalog::Preset::ALL {
        let ids: Vec<&str> = preset.ids().iter().map(|id| id.as_str()).collect();
        let aliases = if preset.aliases().is_empty() {
            String::new()
        } else {
            format!(" (aliases: {})", preset.aliases().join(", "))
        };
        println!("  {}{}: {}", preset.name(), aliases, ids.join(", "));
    }

    println!();
    println!("Recognizers:");
    for id in catalog::list_all() {
        let note = if id.is_remote() {
            " [remote, unavailable]"
        } else if id.is_model_backed() {
            if engine.ner_model(id.as_str()).is_some() {
                " [model]"
            } else {
                " [model, not configured]"
            }
        } else {
            ""
        };
        println!("  {}{}", id, note);
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_response(outcome: Option<serde_json::Value>) -> Result<()> {
    let response = GuardrailResponse::from_outcome(outcome);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
