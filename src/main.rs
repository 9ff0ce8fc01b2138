use anyhow::{bail, Context};
use clap::Parser;
use std::path::Path;
use teamcity_provider::config::Command;
use teamcity_provider::core::tfsdk::{
    Config, CreateRequest, DeleteRequest, PlanRequest, ReadRequest, State, UpdateRequest,
    ValidateConfigRequest,
};
use teamcity_provider::core::Resource;
use teamcity_provider::utils::logger;
use teamcity_provider::{CleanupResource, CliConfig, Diagnostics, Provider};

const RESOURCE_TYPE: &str = "teamcity_cleanup";

fn load_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn report(diagnostics: &Diagnostics) -> anyhow::Result<()> {
    for diagnostic in diagnostics.iter() {
        eprintln!("{}", diagnostic);
    }
    if diagnostics.has_error() {
        bail!("{} error(s) reported", diagnostics.errors().count());
    }
    Ok(())
}

fn print_state(state: &State) -> anyhow::Result<()> {
    match state.raw() {
        Some(raw) => println!("{}", serde_json::to_string_pretty(raw)?),
        None => println!("null"),
    }
    Ok(())
}

fn configured_resource(cli: &CliConfig) -> anyhow::Result<Box<dyn Resource>> {
    let mut provider = Provider::new(env!("CARGO_PKG_VERSION"));
    let config = cli.provider_config().map_err(|e| {
        if e.is_config_error() {
            tracing::error!("💡 Set --host/--token, TEAMCITY_HOST/TEAMCITY_TOKEN, or pass --config");
        }
        e
    })?;
    provider
        .configure(&config)
        .context("failed to configure the TeamCity provider")?;

    provider
        .resource(RESOURCE_TYPE)
        .with_context(|| format!("unknown resource type {}", RESOURCE_TYPE))
}

async fn apply(cli: &CliConfig, file: &Path, state_path: Option<&Path>) -> anyhow::Result<()> {
    let resource = configured_resource(cli)?;
    let config = Config::new(load_json(file)?);

    let prior_state = match state_path {
        Some(path) if path.exists() => State::new(load_json(path)?),
        _ => State::empty(),
    };

    let planned = resource.plan(PlanRequest {
        config,
        prior_state: prior_state.clone(),
    });
    report(&planned.diagnostics)?;

    let (state, diagnostics) = if prior_state.is_empty() {
        tracing::info!("creating {}", RESOURCE_TYPE);
        let resp = resource
            .create(CreateRequest {
                plan: planned.planned,
            })
            .await;
        (resp.state, resp.diagnostics)
    } else {
        tracing::info!("updating {}", RESOURCE_TYPE);
        let resp = resource
            .update(UpdateRequest {
                plan: planned.planned,
                state: prior_state,
            })
            .await;
        (resp.state, resp.diagnostics)
    };
    report(&diagnostics)?;

    if let (Some(path), Some(raw)) = (state_path, state.raw()) {
        std::fs::write(path, serde_json::to_string_pretty(raw)?)
            .with_context(|| format!("failed to write state to {}", path.display()))?;
    }
    print_state(&state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli.command);

    match &cli.command {
        Command::Schema => {
            let schema = CleanupResource::unconfigured().schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Validate { file } => {
            let resp = CleanupResource::unconfigured().validate_config(ValidateConfigRequest {
                config: Config::new(load_json(file)?),
            });
            report(&resp.diagnostics)?;
            println!("✅ {} is valid", file.display());
        }
        Command::Apply { file, state } => {
            apply(&cli, file, state.as_deref()).await?;
        }
        Command::Read => {
            let resource = configured_resource(&cli)?;
            let resp = resource.read(ReadRequest::default()).await;
            report(&resp.diagnostics)?;
            print_state(&resp.state)?;
        }
        Command::Delete { state } => {
            let resource = CleanupResource::unconfigured();
            let resp = resource.delete(DeleteRequest::default()).await;
            report(&resp.diagnostics)?;

            match state {
                Some(path) if path.exists() => {
                    std::fs::remove_file(path)
                        .with_context(|| format!("failed to remove {}", path.display()))?;
                    println!(
                        "Removed {}; server cleanup settings left unchanged.",
                        path.display()
                    );
                }
                _ => println!("No state file to remove; server cleanup settings left unchanged."),
            }
        }
    }

    Ok(())
}
