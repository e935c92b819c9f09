//! wizard: offline front end for the alert wizard translation layer.
//!
//! - `encode`: simplified parameters to an engine condition configuration
//! - `decode`: engine condition configuration back to simplified parameters
//! - `view`: assemble rule views from a fixture of collaborator state
//! - `validate`: check an alert rule request

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use wizard_core::config::{load_dotenv, Config};
use wizard_rules::codec::{decode_condition, parse_engine_config};
use wizard_rules::fixture::Fixture;
use wizard_rules::schema::{AlertRuleRequest, ParameterMap};
use wizard_rules::validation::validate_request;
use wizard_rules::ConditionFactory;

// ── CLI ─────────────────────────────────────────────────────────────

/// Translate between simplified alert rule parameters and engine conditions.
#[derive(Parser, Debug)]
#[command(name = "wizard", version, about)]
struct Cli {
    /// Configuration profile (overrides WIZARD_PROFILE).
    #[arg(long, env = "WIZARD_PROFILE", global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an engine condition from a parameter file.
    Encode {
        /// Condition type tag (COUNT, GROUP_DISTINCT, THEN, AND, STATISTICAL, ...).
        #[arg(long)]
        kind: String,
        #[arg(long)]
        stream: String,
        /// Second stream, used by correlations.
        #[arg(long)]
        stream2: Option<String>,
        /// JSON or YAML file holding the parameter map.
        #[arg(long)]
        params: PathBuf,
    },
    /// Decode an engine condition file into simplified parameters.
    Decode {
        #[arg(long)]
        config: PathBuf,
    },
    /// Print the assembled view of fixture rules.
    View {
        #[arg(long, env = "WIZARD_FIXTURE")]
        fixture: PathBuf,
        /// Rule title; all rules when omitted.
        #[arg(long)]
        rule: Option<String>,
    },
    /// Validate an alert rule request file.
    Validate {
        #[arg(long)]
        request: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let cli = Cli::parse();

    let config = match &cli.profile {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };
    config.log_summary();
    let factory = ConditionFactory::new(config.settings, config.defaults);

    match cli.command {
        Command::Encode {
            kind,
            stream,
            stream2,
            params,
        } => {
            let params: ParameterMap = read_document(&params)?;
            let engine_config = factory
                .dispatch(&kind, &params, &stream, stream2.as_deref())
                .with_context(|| format!("failed to build {} condition", kind))?;
            print_json(&engine_config)
        }
        Command::Decode { config } => {
            let value: serde_json::Value = read_document(&config)?;
            let engine_config = parse_engine_config(value)?;
            info!(engine_type = engine_config.type_name(), "Decoding condition");
            print_json(&decode_condition(&engine_config))
        }
        Command::View { fixture, rule } => {
            let fixture = Fixture::load(&fixture)
                .with_context(|| format!("failed to load fixture {}", fixture.display()))?;
            let service = fixture.into_service(factory)?;
            let rules = match &rule {
                Some(title) => vec![fixture.rule(title)?],
                None => fixture.rules.iter().collect(),
            };
            let views = rules
                .into_iter()
                .map(|r| {
                    service
                        .assemble_view(r)
                        .with_context(|| format!("failed to assemble rule '{}'", r.title))
                })
                .collect::<Result<Vec<_>>>()?;
            if rule.is_some() {
                print_json(&views[0])
            } else {
                print_json(&views)
            }
        }
        Command::Validate { request } => {
            let request: AlertRuleRequest = read_document(&request)?;
            let result = validate_request(&request);
            print_json(&result)?;
            if !result.valid {
                bail!("request has {} error(s)", result.errors.len());
            }
            Ok(())
        }
    }
}

/// Read a JSON or YAML document.
fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
