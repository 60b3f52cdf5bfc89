use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::{LevelFilter, info};
use std::path::Path;
use std::sync::Arc;

use formcheck::adapter::FieldAdapter;
use formcheck::check::CheckList;
use formcheck::config::Config;
use formcheck::fixture::{FieldSpec, FormFixture, StaticField};
use formcheck::host::FieldElement;
use formcheck::registry::{self, Registry};

mod cli;

use cli::commands::Commands;
use cli::{Cli, ConsoleRenderer};

fn setup_logging(cli: &Cli, config: &Config) {
    let mut builder = env_logger::Builder::from_default_env();

    if cli.is_verbose() {
        builder.filter_level(LevelFilter::Debug);
    } else if let Some(level) = config.log_level.as_deref().and_then(|l| l.parse::<LevelFilter>().ok()) {
        builder.filter_level(level);
    }

    builder.init();
}

fn bootstrap_registry(config: &Config) -> Result<Arc<Registry>> {
    let mut registry = Registry::with_builtins();
    config.apply(&mut registry)?;
    registry::install(registry).context("Failed to install registry")
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    let registry = bootstrap_registry(config)?;

    match &cli.command {
        Commands::Check {
            field_type,
            value,
            min,
            max,
            json,
        } => handle_check_command(&registry, field_type, value, *min, *max, *json),
        Commands::Types => handle_types_command(&registry),
        Commands::Messages => handle_messages_command(&registry),
        Commands::Simulate { fixture, json } => handle_simulate_command(cli, config, registry, fixture, *json),
    }
}

fn handle_check_command(
    registry: &Registry,
    field_type: &str,
    value: &str,
    min: Option<usize>,
    max: Option<usize>,
    json: bool,
) -> Result<()> {
    info!("Checking {:?} as {}", value, field_type);
    let adapter = registry
        .field_type(field_type)
        .ok_or_else(|| eyre!("Unsupported field type: {}", field_type))?;

    let checked = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let field = StaticField::from_spec(&FieldSpec {
        handle: field_type.to_string(),
        declared_type: field_type.to_string(),
        value: value.to_string(),
        checked,
        min_length: min,
        max_length: max,
        detached: false,
    });

    let field_value = adapter.read_value(&field)?;
    let checks: CheckList = adapter.produce_checks(&field_value, &field.meta(), registry)?;
    let first_failure = checks.first_failure();

    if json {
        let report = serde_json::json!({
            "field_type": field_type,
            "value": field_value,
            "checks": checks,
            "first_failure": first_failure,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {} ({})", "Checking:".cyan(), value, adapter.description());
    for result in checks.iter() {
        if result.passed {
            println!("  {} {}", "✓".green(), result.name);
        } else {
            println!("  {} {}", "✗".red(), result.name);
        }
    }
    match first_failure {
        Some(check) => println!("{} {} - {}", "Invalid:".red(), check, registry.resolve_message(check)),
        None => println!("{}", "Valid".green()),
    }
    Ok(())
}

fn handle_types_command(registry: &Registry) -> Result<()> {
    println!("{}", "Field types:".cyan());
    for name in registry.field_type_names() {
        if let Some(adapter) = registry.field_type(name) {
            // An empty value fails every check, so this lists them all
            let field = StaticField::text(name, name, "");
            let checks = adapter
                .read_value(&field)
                .and_then(|v| adapter.produce_checks(&v, &field.meta(), registry))?;
            let names: Vec<&str> = checks.iter().map(|r| r.name.as_str()).collect();
            println!("  {:<14} {}", name.green(), names.join(", "));
        }
    }
    Ok(())
}

fn handle_messages_command(registry: &Registry) -> Result<()> {
    println!("{}", "Messages:".cyan());
    for key in registry.message_keys() {
        println!("  {:<14} {}", key.green(), registry.resolve_message(key));
    }
    Ok(())
}

fn handle_simulate_command(
    cli: &Cli,
    config: &Config,
    registry: Arc<Registry>,
    path: &Path,
    json: bool,
) -> Result<()> {
    info!("Simulating fixture: {}", path.display());
    let fixture =
        FormFixture::from_file(path).context(format!("Failed to load fixture from {}", path.display()))?;

    if json {
        let renderer = Arc::new(formcheck::host::RecordingRenderer::new());
        let reports = fixture.run(registry, renderer, &config.form)?;
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("{} {}", "Simulating:".cyan(), fixture.form);
    let renderer = Arc::new(ConsoleRenderer::new(cli.is_verbose()));
    let reports = fixture.run(registry, renderer, &config.form)?;
    for (i, report) in reports.iter().enumerate() {
        println!("{} {}", format!("[{}]", i + 1).dimmed(), report.step.bold());
        for field in &report.fields {
            println!("  {:<14} {}", field.field.to_string(), field.state);
        }
        if let Some(outcome) = &report.outcome {
            if outcome.is_accepted() {
                println!("  {}", "Submit accepted".green());
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(&cli, &config);
    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
