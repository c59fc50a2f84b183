//! saas-configurator - Command-line front end for the configuration resolver.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use serde_json::json;
use tracing::{info, warn};

use saas_configurator::adapters::{HttpConfigurationEngine, PromptAnswerSource};
use saas_configurator::application::{ResolveConfigurationHandler, ResolverSettings};
use saas_configurator::config::{AppConfig, LoggingConfig};
use saas_configurator::domain::resolver::{Document, ResolutionSession, ResolverError};
use saas_configurator::ports::ConfigurationEngine;

/// Interactive configuration resolver
#[derive(Parser)]
#[command(name = "saas-configurator")]
#[command(about = "Complete a configuration document by answering the rule engine's questions", long_about = None)]
#[command(version)]
struct Cli {
    /// Skeleton document to start from (.json, .yaml or .yml)
    #[arg(long, value_name = "FILE")]
    skeleton: Option<PathBuf>,

    /// Write the resolved document here instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Only check whether the rule engine is reachable
    #[arg(long)]
    probe_only: bool,

    /// Rule engine base URL (overrides SAAS_CONFIGURATOR__ENGINE__BASE_URL)
    #[arg(long, value_name = "URL")]
    engine_url: Option<String>,

    /// Language for question texts (overrides SAAS_CONFIGURATOR__ENGINE__LANG)
    #[arg(long)]
    lang: Option<String>,

    /// Restart a failed session from its last document this many times
    #[arg(long, default_value_t = 0)]
    restarts: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(url) = cli.engine_url {
        config.engine.base_url = url;
    }
    if let Some(lang) = cli.lang {
        config.engine.lang = lang;
    }
    config.validate()?;

    init_tracing(&config.logging);

    let engine = Arc::new(HttpConfigurationEngine::new(config.engine.http_config())?);

    if cli.probe_only {
        if engine.probe().await {
            println!("rule engine at {} is available", config.engine.base_url);
            return Ok(());
        }
        return Err(ResolverError::EngineUnavailable.into());
    }

    let document = match &cli.skeleton {
        Some(path) => load_skeleton(path)?,
        None => demo_skeleton(),
    };
    let target = config.engine.model_target()?;
    info!(
        engine = %config.engine.base_url,
        app_path = %target.app_path(),
        operation = %target.operation(),
        "Starting configuration"
    );

    let handler = ResolveConfigurationHandler::new(
        engine,
        Arc::new(PromptAnswerSource::stdio()),
        ResolverSettings::from(&config.session),
    );

    let mut session = ResolutionSession::new(target, config.engine.lang.clone(), document);
    let mut restarts_left = cli.restarts;
    let resolution = loop {
        match handler.run(&mut session).await {
            Ok(resolution) => break resolution,
            Err(error) => {
                report_failure(&error);
                if restarts_left == 0 || matches!(error, ResolverError::EngineUnavailable) {
                    return Err(error.into());
                }
                restarts_left -= 1;
                warn!(restarts_left, "Restarting from the last document");
                session = session.restart();
            }
        }
    };

    let rendered = serde_json::to_string_pretty(&resolution.document)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            info!(path = %path.display(), rounds = resolution.rounds, "Resolved document written");
        }
        None => println!("{rendered}"),
    }
    if let Some(details) = &resolution.computation_details {
        info!(
            app = %details.app_name,
            version = %details.app_version,
            operation = %details.operation,
            "Computed by rule engine"
        );
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(logging.env_filter())
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_skeleton(path: &Path) -> Result<Document, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    let document: Document = if is_yaml {
        serde_yaml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };
    if !document.is_object() {
        return Err(format!("skeleton {} must be a JSON object", path.display()).into());
    }
    Ok(document)
}

fn demo_skeleton() -> Document {
    json!({
        "the customer request": { "LGType_": "demo.config.CustomerRequest" },
        "the configuration": { "LGType_": "demo.config.Configuration" }
    })
}

fn report_failure(error: &ResolverError) {
    let round = error
        .round()
        .map(|r| format!(" in round {r}"))
        .unwrap_or_default();
    eprintln!("configuration failed{round}: {error}");
    if let Some(raw) = error
        .descriptor()
        .and_then(|descriptor| serde_json::to_string(descriptor).ok())
    {
        eprintln!("  descriptor: {raw}");
    }
}
