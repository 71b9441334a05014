//! remora: AWS region accessibility and pricing catalogue lookups
//!
//! Reports which regions and profiles the current credentials can reach,
//! translates region codes to catalogue location names, and prints
//! normalized pricing offers.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use remora::aws::{AwsContext, AwsProfiles, Ec2Client, FromAwsContext, SsmClient, StsIdentityProbe};
use remora::pricing::{PricingSession, prices_by_key};
use remora::regions::{RegionAccessResolver, RegionNameTranslator};
use remora::PricingConfig;
use remora::config::partition_for_region;
use remora_common::defaults::{
    DEFAULT_CURRENCY, DEFAULT_MAX_CONCURRENCY, DEFAULT_PRICING_REGION, DEFAULT_TERM_TYPE,
};
use remora_common::endpoints::EndpointTable;
use std::collections::BTreeMap;
use tracing::info;
use tracing_subscriber::filter::Directive;

#[derive(Parser, Debug)]
#[command(name = "remora")]
#[command(about = "AWS region accessibility and pricing catalogue lookups")]
#[command(version)]
struct Args {
    /// AWS profile to use (overrides AWS_PROFILE env var)
    #[arg(long, global = true, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Partition whose region table is used (aws, aws-cn, aws-us-gov)
    /// [default: the partition of the command's region]
    #[arg(long, global = true)]
    partition: Option<String>,

    /// Maximum number of probes in flight
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    max_concurrency: usize,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// Arguments shared by the catalogue commands
#[derive(clap::Args, Debug)]
struct CatalogueArgs {
    /// Region hosting the pricing endpoint
    #[arg(long, default_value = DEFAULT_PRICING_REGION)]
    pricing_region: String,

    /// Currency to extract prices in
    #[arg(long, default_value = DEFAULT_CURRENCY)]
    currency: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List regions the current credentials can reach
    Regions {
        /// Service whose regions are candidates (from the bundled table)
        #[arg(long, default_value = "sts")]
        service: String,

        /// Use the account's enabled EC2 regions as candidates instead
        #[arg(long)]
        enabled: bool,

        /// Region used for the EC2 DescribeRegions call
        #[arg(long, default_value = DEFAULT_PRICING_REGION)]
        region: String,
    },

    /// List which of the given profiles authenticate
    Profiles {
        /// Profile names to check (default: every configured profile)
        profiles: Vec<String>,

        /// Region to probe (default: each profile's own region)
        #[arg(long)]
        region: Option<String>,
    },

    /// Print the region code to catalogue location name table
    RegionNames {
        /// Region used for SSM parameter lookups
        #[arg(long, default_value = DEFAULT_PRICING_REGION)]
        region: String,
    },

    /// List the attribute values offers can be looked up by
    Keys {
        /// Resource type (EC2, EBS)
        resource: String,

        #[command(flatten)]
        catalogue: CatalogueArgs,
    },

    /// Print offers for a resource type, key and regions
    Offers {
        /// Resource type (EC2, EBS)
        resource: String,

        /// Attribute value, e.g. an instance type or volume type
        key: String,

        /// Regions to look up (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        regions: Vec<String>,

        /// Attribute constraint as NAME=VALUE (repeatable)
        #[arg(long = "filter", value_parser = parse_constraint)]
        filters: Vec<(String, String)>,

        /// Term type to tabulate prices for
        #[arg(long, default_value = DEFAULT_TERM_TYPE)]
        term_type: String,

        #[command(flatten)]
        catalogue: CatalogueArgs,
    },
}

fn parse_constraint(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&e);
        std::process::exit(1);
    }
}

/// Print error in a user-friendly way
fn print_error(e: &anyhow::Error) {
    use std::io::Write;

    let mut stderr = std::io::stderr();

    let _ = writeln!(stderr, "\n\x1b[1;31mError:\x1b[0m {e}");

    let mut source = e.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "  \x1b[33mCaused by:\x1b[0m {cause}");
        source = cause.source();
    }

    if let Some(pe) = e.downcast_ref::<remora::PricingError>() {
        if let Some(suggestion) = pe.suggestion() {
            let _ = writeln!(stderr, "  \x1b[36mHint:\x1b[0m {suggestion}");
        }
        if pe.is_retryable() {
            let _ = writeln!(
                stderr,
                "  \x1b[36mHint:\x1b[0m This failure is transient; retrying may succeed."
            );
        }
    }

    if std::env::var("RUST_BACKTRACE").is_err() {
        let _ = writeln!(
            stderr,
            "\n\x1b[2mSet RUST_BACKTRACE=1 for a detailed backtrace\x1b[0m"
        );
    } else {
        let backtrace = e.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            let _ = writeln!(stderr, "\n\x1b[2mBacktrace:\x1b[0m\n{backtrace}");
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let mut filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());
    // Reduce noise from AWS SDK (show only warnings and errors)
    for target in [
        "aws_config",
        "aws_sdk_ec2",
        "aws_sdk_pricing",
        "aws_sdk_ssm",
        "aws_sdk_sts",
        "aws_smithy_http",
        "aws_smithy_runtime",
    ] {
        if let Ok(directive) = format!("{target}=warn").parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Some(profile) = &args.profile {
        info!(profile = %profile, "Using AWS profile");
    }

    match &args.command {
        Command::Regions {
            service,
            enabled,
            region,
        } => handle_regions(&args, service, *enabled, region).await,
        Command::Profiles { profiles, region } => {
            handle_profiles(&args, profiles, region.as_deref()).await
        }
        Command::RegionNames { region } => handle_region_names(&args, region).await,
        Command::Keys {
            resource,
            catalogue,
        } => handle_keys(&args, resource, catalogue).await,
        Command::Offers {
            resource,
            key,
            regions,
            filters,
            term_type,
            catalogue,
        } => {
            let constraints: BTreeMap<String, String> = filters.iter().cloned().collect();
            handle_offers(&args, resource, key, regions, &constraints, term_type, catalogue).await
        }
    }
}

/// The `--partition` override, else the partition `region` belongs to
fn partition(args: &Args, region: &str) -> String {
    args.partition
        .clone()
        .unwrap_or_else(|| partition_for_region(region))
}

fn pricing_config(args: &Args, catalogue: &CatalogueArgs) -> PricingConfig {
    let config = PricingConfig::for_region(catalogue.pricing_region.clone())
        .with_profile(args.profile.clone())
        .with_currency(catalogue.currency.clone())
        .with_max_concurrency(args.max_concurrency);
    match &args.partition {
        Some(partition) => config.with_partition(partition.clone()),
        None => config,
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(Cell::new).collect::<Vec<_>>());
    table
}

fn list_table(header: &str, items: &[String]) -> Table {
    let mut table = new_table(&[header]);
    for item in items {
        table.add_row(vec![Cell::new(item)]);
    }
    table
}

fn print_list(format: OutputFormat, header: &str, items: &[String]) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
        OutputFormat::Table => {
            println!("{}", list_table(header, items));
            println!("Total: {}", items.len());
        }
    }
    Ok(())
}

/// Handle the regions command
async fn handle_regions(args: &Args, service: &str, enabled: bool, region: &str) -> Result<()> {
    let ctx = AwsContext::with_profile(Some(region), args.profile.as_deref()).await;

    let candidates: Vec<String> = if enabled {
        Ec2Client::from_context(&ctx)
            .enabled_regions()
            .await
            .context("Failed to list enabled EC2 regions")?
            .iter()
            .cloned()
            .collect()
    } else {
        EndpointTable::bundled()?.service_regions(service, Some(&partition(args, region)))?
    };
    info!(candidates = candidates.len(), "Probing regions");

    let probe = StsIdentityProbe::from_context(&ctx);
    let accessible = RegionAccessResolver::new(args.max_concurrency)
        .accessible_regions(&probe, &candidates)
        .await?;
    if accessible.is_empty() {
        bail!("No region is accessible with the current credentials");
    }

    let accessible: Vec<String> = accessible.into_iter().collect();
    print_list(args.format, "REGION", &accessible)
}

/// Handle the profiles command
async fn handle_profiles(args: &Args, profiles: &[String], region: Option<&str>) -> Result<()> {
    let candidates = (!profiles.is_empty()).then_some(profiles);
    let authenticated = RegionAccessResolver::new(args.max_concurrency)
        .authenticated_profiles(&AwsProfiles, candidates, region)
        .await?;
    print_list(args.format, "PROFILE", &authenticated)
}

/// Handle the region-names command
async fn handle_region_names(args: &Args, region: &str) -> Result<()> {
    let ctx = AwsContext::with_profile(Some(region), args.profile.as_deref()).await;
    let translator = RegionNameTranslator::new(
        SsmClient::from_context(&ctx),
        Some(&partition(args, region)),
    )?;
    let map = translator.resolve().await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(map)?),
        OutputFormat::Table => {
            let mut table = new_table(&["Region", "Location"]);
            for (code, name) in map.iter() {
                table.add_row(vec![Cell::new(code), Cell::new(name)]);
            }
            println!("{table}");
            println!("Total: {} regions", map.len());
        }
    }
    Ok(())
}

/// Handle the keys command
async fn handle_keys(args: &Args, resource: &str, catalogue: &CatalogueArgs) -> Result<()> {
    let session = PricingSession::connect(&pricing_config(args, catalogue)).await?;
    let cache = session.offers_by_name(resource)?;
    let keys = cache.available_keys().await?;
    print_list(args.format, cache.kind().key().attribute_key, keys)
}

/// Handle the offers command
async fn handle_offers(
    args: &Args,
    resource: &str,
    key: &str,
    regions: &[String],
    constraints: &BTreeMap<String, String>,
    term_type: &str,
    catalogue: &CatalogueArgs,
) -> Result<()> {
    let session = PricingSession::connect(&pricing_config(args, catalogue)).await?;
    let cache = session.offers_by_name(resource)?;
    let kind = cache.kind();

    let mut offers = Vec::new();
    for region in regions {
        let found = if constraints.is_empty() {
            cache.get_offers(region, key).await?.to_vec()
        } else {
            cache.get_filtered_offers(region, key, constraints).await?
        };
        info!(region = %region, key, offers = found.len(), "Fetched offers");
        offers.extend(found);
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&offers)?),
        OutputFormat::Table => {
            let attribute_key = kind.key().attribute_key;
            let mut table = new_table(&[
                "Region",
                "SKU",
                attribute_key,
                "Term",
                "Price",
                "Unit",
                "Description",
            ]);
            for offer in &offers {
                for (term, price) in offer.prices() {
                    table.add_row(vec![
                        Cell::new(offer.region()),
                        Cell::new(offer.sku()),
                        Cell::new(offer.attribute(attribute_key).unwrap_or("-")),
                        Cell::new(term),
                        Cell::new(format!("{price} {}", offer.currency())),
                        Cell::new(offer.unit()),
                        Cell::new(offer.description()),
                    ]);
                }
            }
            println!("{table}");

            let by_key = prices_by_key(&offers, attribute_key, term_type);
            if !by_key.is_empty() {
                let mut summary = new_table(&["Region", attribute_key, term_type]);
                for (region, prices) in &by_key {
                    for (key, price) in prices {
                        summary.add_row(vec![
                            Cell::new(region),
                            Cell::new(key),
                            Cell::new(price),
                        ]);
                    }
                }
                println!("\n{summary}");
            }
            println!("Total: {} offers", offers.len());
        }
    }
    Ok(())
}
