use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_kit::{
    format_terms, sort_packages, BackwardsCompatibilityEntitlement, Config, CustomerInfo,
    EntitlementResolver, EnvironmentProbe, Package, PackageTermsFormatOptions, PurchasesProvider,
    ResolverOptions, SortCriterion, StaticPurchases,
};

#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(about = "Entitlement checks and purchase terms for subscription apps")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print purchase terms for each package in a JSON array
    Terms {
        /// JSON file holding an array of packages
        packages: PathBuf,

        /// Describe a fixed duration ("for 1 Year") instead of a recurring price
        #[arg(long)]
        one_time: bool,

        /// Leave out trial and introductory pricing
        #[arg(long)]
        no_intro: bool,
    },

    /// Print package identifiers in sorted order
    Sort {
        /// JSON file holding an array of packages
        packages: PathBuf,

        /// time-ascending, time-descending or has-introductory-price
        #[arg(long, default_value = "time-ascending")]
        by: SortCriterion,
    },

    /// Decide whether an entitlement is active
    Resolve {
        /// Entitlement name
        entitlement: String,

        /// JSON file holding an array of backwards compatibility entitlements
        #[arg(long)]
        registry: Option<PathBuf>,

        /// JSON customer record. Without it the customer is fetched from the
        /// backend configured in the environment.
        #[arg(long)]
        customer: Option<PathBuf>,
    },
}

/// Map the `terms` flags onto formatter options.
fn terms_options(one_time: bool, no_intro: bool) -> PackageTermsFormatOptions {
    PackageTermsFormatOptions {
        is_recurring: !one_time,
        include_introductory_terms: !no_intro,
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> storefront_kit::Result<T> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

async fn run(cli: Cli) -> storefront_kit::Result<()> {
    match cli.command {
        Command::Terms {
            packages,
            one_time,
            no_intro,
        } => {
            let packages: Vec<Package> = read_json(&packages)?;
            let options = terms_options(one_time, no_intro);
            for package in &packages {
                println!("{}: {}", package.identifier, format_terms(package, options));
            }
        }
        Command::Sort { packages, by } => {
            let packages: Vec<Package> = read_json(&packages)?;
            for package in sort_packages(&packages, by) {
                println!("{}", package.identifier);
            }
        }
        Command::Resolve {
            entitlement,
            registry,
            customer,
        } => {
            let config = Config::from_env();
            let entitlements: Vec<BackwardsCompatibilityEntitlement> = match registry {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };

            let purchases: Arc<dyn PurchasesProvider> = match customer {
                Some(path) => {
                    let info: CustomerInfo = read_json(&path)?;
                    Arc::new(StaticPurchases::new(Some(info)))
                }
                None => Arc::new(config.rest_purchases()?),
            };

            let environment = config.environment();
            if environment.is_sandbox() {
                tracing::info!("Running against the store sandbox");
            }

            let resolver = EntitlementResolver::new(
                purchases,
                ResolverOptions {
                    environment: Some(Arc::new(environment)),
                    overrides: Some(config.overrides()),
                    entitlements,
                },
            );

            let (entitled, info) = resolver.resolve_with_fallback_fetch(&entitlement).await;
            if info.is_none() {
                tracing::warn!("No customer info available, decision made without it");
            }
            println!("{}", entitled);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_kit=info,storefront=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "storefront failed");
            ExitCode::FAILURE
        }
    }
}
