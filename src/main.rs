use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use shipping_label::config::Config;
use shipping_label::label::{
    normalize_address, AddressRole, Capabilities, DispatchContext, LabelForm, LabelFormSnapshot,
    LabelStore, LabelWorkflow, RequiredFieldsValidator, WorkflowState,
};
use shipping_label::logging::init_tracing;
use shipping_label::services::{
    build_client, HttpNormalizer, HttpPersistence, PdfFilePrinter, TracingNotifier,
};

#[derive(Debug, Parser)]
#[command(name = "shipping-label", version, about = "Buy and print shipping labels")]
struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize addresses, buy labels for every package and print the first.
    Purchase {
        /// JSON form snapshot (origin, destination, packages, rates).
        #[arg(long)]
        form: PathBuf,
    },
    /// Normalize one address of a form snapshot.
    Normalize {
        #[arg(long)]
        form: PathBuf,
        #[arg(long, value_parser = parse_role)]
        group: AddressRole,
    },
    /// Print the validation errors of a form snapshot.
    Validate {
        #[arg(long)]
        form: PathBuf,
    },
    /// Print the default config file location.
    ConfigPath,
}

fn parse_role(value: &str) -> Result<AddressRole, String> {
    match value {
        "origin" => Ok(AddressRole::Origin),
        "destination" => Ok(AddressRole::Destination),
        other => Err(format!("expected 'origin' or 'destination', got '{other}'")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::ConfigPath => {
            println!("{}", Config::config_path().display());
        }
        Command::Purchase { form } => {
            let config = load_config(cli.config.as_deref())?;
            let workflow = build_workflow(&config, load_form(&form)?)?;
            for handle in workflow.open_printing_flow() {
                handle.await.context("normalization task panicked")?;
            }
            let labels = workflow.purchase_label().await?;
            println!("{}", serde_json::to_string_pretty(&labels)?);
        }
        Command::Normalize { form, group } => {
            let config = load_config(cli.config.as_deref())?;
            let workflow = build_workflow(&config, load_form(&form)?)?;
            let values = workflow.state().form.group(group).values.clone();
            let normalizer = HttpNormalizer::new(build_client(&config.http)?);
            let normalized = normalize_address(
                workflow.store(),
                &normalizer,
                &DispatchContext::from_config(&config),
                values,
                group,
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&normalized)?);
        }
        Command::Validate { form } => {
            let config = load_config(cli.config.as_deref())?;
            let workflow = build_workflow(&config, load_form(&form)?)?;
            let errors = workflow.errors();
            if errors.is_empty() {
                println!("Form is valid");
            } else {
                println!("{errors:#?}");
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

fn load_form(path: &Path) -> anyhow::Result<LabelForm> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read form '{}'", path.display()))?;
    let snapshot: LabelFormSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse form '{}'", path.display()))?;
    Ok(snapshot.into())
}

fn build_workflow(config: &Config, form: LabelForm) -> anyhow::Result<LabelWorkflow> {
    let client = build_client(&config.http)?;
    let store = LabelStore::new(WorkflowState::with_form(form), Arc::new(TracingNotifier));
    let capabilities = Capabilities {
        normalizer: Arc::new(HttpNormalizer::new(client.clone())),
        persistence: Arc::new(HttpPersistence::new(client)),
        printer: Arc::new(PdfFilePrinter::new(config.print.output_dir.clone())),
        validator: Arc::new(RequiredFieldsValidator),
    };
    Ok(LabelWorkflow::new(
        store,
        DispatchContext::from_config(config),
        capabilities,
    ))
}
