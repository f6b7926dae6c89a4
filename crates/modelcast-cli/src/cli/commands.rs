//! # CLI Layer
//!
//! The only place that:
//! - Knows about terminal I/O (stdout, stderr, stdin)
//! - Installs the tracing subscriber
//! - Loads configuration and definition files
//! - Turns library errors into user-facing listings
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Resolve config and load the definition set
//! 3. **Dispatch**: Route each command to its handler
//! 4. **Output Formatting**: JSON and listings via `render`

use super::render;
use super::setup::{Cli, Commands};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use modelcast::{
    AttributeFilter, DefinitionSet, ModelClass, ModelError, ModelInstance, ModelcastConfig,
    SchemaEmitter, Value,
};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

struct AppContext {
    definitions: DefinitionSet,
    pretty: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = create_context(&cli)?;

    match cli.command {
        Commands::List => handle_list(&ctx),
        Commands::Schema { model } => handle_schema(&ctx, &model),
        Commands::Cast {
            model,
            input,
            only,
            except,
        } => handle_cast(&ctx, &model, input.as_deref(), only, except),
        Commands::Validate { model, input } => handle_validate(&ctx, &model, input.as_deref()),
        Commands::Show { model, input } => handle_show(&ctx, &model, input.as_deref()),
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn create_context(cli: &Cli) -> Result<AppContext> {
    let config = ModelcastConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;

    let path = cli
        .defs
        .clone()
        .or_else(|| config.definitions.clone())
        .ok_or_else(|| {
            anyhow!("No definition file given (use --defs or set MODELCAST_DEFINITIONS)")
        })?;

    let mut definitions = DefinitionSet::new().with_time_format(config.time_format.clone());
    definitions
        .extend_from_path(&path)
        .with_context(|| format!("Failed to load definitions from {}", path.display()))?;
    debug!(
        path = %path.display(),
        models = definitions.len(),
        pretty = config.pretty,
        "definitions loaded"
    );

    Ok(AppContext {
        definitions,
        pretty: config.pretty && !cli.compact,
    })
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    print!("{}", render::model_list(&ctx.definitions));
    Ok(())
}

fn handle_schema(ctx: &AppContext, model: &str) -> Result<()> {
    let class = lookup(ctx, model)?;
    let schema = SchemaEmitter::new().serialize_model(class);
    println!("{}", render::json(&schema.to_json(), ctx.pretty)?);
    Ok(())
}

fn handle_cast(
    ctx: &AppContext,
    model: &str,
    input: Option<&Path>,
    only: Vec<String>,
    except: Vec<String>,
) -> Result<()> {
    let instance = read_instance(ctx, model, input)?;
    let filter = if only.is_empty() {
        AttributeFilter::except(except)
    } else {
        AttributeFilter::only(only).and_except(except)
    };

    let serialized = instance
        .to_h_filtered(&filter)
        .map_err(|error| report(model, error))?;
    println!(
        "{}",
        render::json(&render::serialized_json(serialized)?, ctx.pretty)?
    );
    Ok(())
}

fn handle_validate(ctx: &AppContext, model: &str, input: Option<&Path>) -> Result<()> {
    let instance = read_instance(ctx, model, input)?;
    instance.validate().map_err(|error| report(model, error))?;
    print!("{}", render::valid(model));
    Ok(())
}

fn handle_show(ctx: &AppContext, model: &str, input: Option<&Path>) -> Result<()> {
    let instance = read_instance(ctx, model, input)?;
    let text = instance.to_s().map_err(|error| report(model, error))?;
    println!("{text}");
    Ok(())
}

fn lookup<'a>(ctx: &'a AppContext, model: &str) -> Result<&'a ModelClass> {
    ctx.definitions
        .get(model)
        .ok_or_else(|| anyhow!("Unknown model: {model}"))
}

/// Read the JSON document and build an (unvalidated) instance from it.
fn read_instance(ctx: &AppContext, model: &str, input: Option<&Path>) -> Result<ModelInstance> {
    let class = lookup(ctx, model)?;
    let text = read_input(input)?;
    let json: serde_json::Value = serde_json::from_str(&text).context("Input is not valid JSON")?;
    ModelInstance::from_value(class, Value::from(json)).map_err(|error| report(model, error))
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Lists compound failures on stderr; the returned error carries the summary.
fn report(model: &str, error: ModelError) -> anyhow::Error {
    match error {
        ModelError::Compound(errors) => {
            eprint!("{}", render::error_listing(model, &errors));
            anyhow!("{model} is invalid")
        }
        other => other.into(),
    }
}
