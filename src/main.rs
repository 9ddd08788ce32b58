use anyhow::{Context, Result};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use word_lookup::cli::{Args, ExecutionMode, LookupCommand, render_word, show_discovery_info};
use word_lookup::{ConfigDiscovery, LookupSettings, LookupSystem};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so --json output stays machine readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("word_lookup=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mode = match args.mode() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match mode {
        ExecutionMode::Lookup(command) => run_lookup(command).await,
        ExecutionMode::ShowConfig => {
            show_discovery_info();
            Ok(ExitCode::SUCCESS)
        }
        ExecutionMode::InitConfig => init_config(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_settings(command: &LookupCommand) -> Result<LookupSettings> {
    let mut settings = match &command.config_override {
        Some(path) => {
            info!("Loading configuration override from: {:?}", path);
            let mut settings = LookupSettings::from_toml_file(path)
                .with_context(|| format!("failed to load configuration from {:?}", path))?;
            settings.apply_env_overrides()?;
            settings
        }
        None => ConfigDiscovery::discover_config().context("failed to discover configuration")?,
    };

    if let Some(provider) = command.provider {
        settings.primary_provider = provider;
    }
    Ok(settings)
}

async fn run_lookup(command: LookupCommand) -> Result<ExitCode> {
    let settings = load_settings(&command)?;
    let system = LookupSystem::from_settings(settings)
        .await
        .context("failed to initialize lookup system")?;
    info!(
        "Looking up '{}' with {}",
        command.word,
        system.settings().primary_provider
    );

    let lookup = system.service().get_word_info(
        &command.word,
        command.from_language.as_deref(),
        command.target_language.as_deref(),
    );

    let outcome = tokio::select! {
        outcome = lookup => outcome,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, abandoning lookup");
            return Ok(ExitCode::from(130));
        }
    };

    match outcome {
        Ok(info) => {
            if command.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("{}", render_word(&info));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(lookup_error) => {
            println!("{}", serde_json::to_string_pretty(&lookup_error)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_config() -> Result<ExitCode> {
    let path = ConfigDiscovery::create_default_user_config()
        .context("failed to create default configuration")?;
    println!("Configuration file: {:?}", path);
    Ok(ExitCode::SUCCESS)
}
