use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use variantize_convert::{ConversionRequest, HierarchyExecutor};
use variantize_pim::PimClient;

mod labels;
mod render;
mod selection;
mod session;
#[cfg(test)]
mod session_test;

use labels::AxisLabels;

#[derive(Debug, Parser)]
#[command(name = "variantize")]
#[command(about = "Convert simple catalog products into a variant hierarchy")]
struct Cli {
    /// Path to the selection file (defaults to VARIANTIZE_SELECTION_PATH).
    #[arg(long, global = true)]
    selection: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the family variants available for a family.
    Variants {
        /// Family code to inspect.
        family: String,
    },
    /// Validate the selection and print the hierarchy a run would create.
    Preview,
    /// Run the conversion against the catalog.
    Convert,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = variantize_core::load_app_config()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();
    let client = PimClient::new(&config)?;

    match cli.command {
        Commands::Variants { family } => {
            let variants = client.list_family_variants(&family).await?;
            if variants.is_empty() {
                println!("No family variants found for family '{family}'.");
            } else {
                render::print_family_variants(&family, &variants);
            }
        }
        Commands::Preview => {
            let session = prepare_session(&client, &config, cli.selection.as_deref()).await?;
            let labels = fetch_labels(&client, &config, &session).await;
            render::print_preview(&session, &labels);
        }
        Commands::Convert => {
            let session = prepare_session(&client, &config, cli.selection.as_deref()).await?;
            let labels = fetch_labels(&client, &config, &session).await;
            render::print_preview(&session, &labels);
            println!();

            let report = HierarchyExecutor::new(&client)
                .execute(&ConversionRequest {
                    products: &session.products,
                    schema: &session.schema,
                    axis_values: &session.axis_values,
                    plan: &session.plan,
                    family: &session.family,
                    family_variant: &session.family_variant_code,
                })
                .await;
            render::print_report(&report);

            if report.created_root_code.is_none() {
                anyhow::bail!("root model creation failed; nothing was converted");
            }
        }
    }

    Ok(())
}

async fn prepare_session(
    client: &PimClient,
    config: &variantize_core::AppConfig,
    selection_override: Option<&std::path::Path>,
) -> anyhow::Result<session::Session> {
    let path = selection_override.unwrap_or(&config.selection_path);
    let selection = selection::load_selection(path)?;
    session::prepare(client, config, &selection).await
}

async fn fetch_labels(
    client: &PimClient,
    config: &variantize_core::AppConfig,
    session: &session::Session,
) -> AxisLabels {
    match AxisLabels::fetch(
        client,
        &session.schema.all_axes(),
        config.option_page_limit,
        config.max_concurrent_fetches,
    )
    .await
    {
        Ok(labels) => labels,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load attribute labels; rendering raw codes");
            AxisLabels::default()
        }
    }
}
