use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uc_catalog::{
    Catalog, DuplicateConversions, LoadOptions, builtin, filter_equivalent,
    find_duplicate_conversions,
};
use uc_convert::ConversionKind;
use uc_core::Real;
use uc_service::{
    CatalogSource, DirectorySource, GLOBAL_PARTITION, ServiceError, ServiceResult, SourceError,
    StaticSource, UnitService,
};

#[derive(Parser)]
#[command(name = "uc-cli")]
#[command(about = "Unit catalog CLI - validate catalogs and convert between units", long_about = None)]
struct Cli {
    /// Directory holding `<partition>.json` documents
    #[arg(long, global = true, env = "UC_CATALOG_DIR")]
    catalog_dir: Option<PathBuf>,

    /// Partition to query (defaults to the bundled `global` catalog)
    #[arg(short, long, global = true)]
    partition: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a units and unit-systems document pair and report what was found
    Validate {
        /// Path to the units JSON file
        units_path: PathBuf,
        /// Path to the unit systems JSON file
        systems_path: PathBuf,
        /// Name of the fallback unit system
        #[arg(long, default_value = uc_catalog::DEFAULT_SYSTEM)]
        default_system: String,
    },
    /// Convert a value between two units of the same quantity
    Convert {
        value: Real,
        /// Source unit externalId (e.g., temperature:deg_c)
        from: String,
        /// Target unit externalId
        to: String,
        #[arg(long, value_enum, default_value_t = Kind::Affine)]
        kind: Kind,
    },
    /// List units, optionally restricted to one quantity
    Units {
        #[arg(short, long)]
        quantity: Option<String>,
    },
    /// Show the canonical unit of a unit's quantity under a unit system
    System {
        external_id: String,
        system: String,
        /// Also convert this value into the canonical unit
        #[arg(long)]
        value: Option<Real>,
    },
    /// Report units of one quantity sharing a conversion
    Duplicates {
        /// JSON array of externalId groups known to be equivalent
        #[arg(long)]
        equivalents: Option<PathBuf>,
        /// Report every group, including known equivalents
        #[arg(long)]
        all: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Affine,
    Multiplier,
    Square,
}

impl From<Kind> for ConversionKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Affine => ConversionKind::Affine,
            Kind::Multiplier => ConversionKind::Multiplier,
            Kind::Square => ConversionKind::SquareMultiplier,
        }
    }
}

#[tokio::main]
async fn main() -> ServiceResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let source: Arc<dyn CatalogSource> = match &cli.catalog_dir {
        Some(dir) => Arc::new(DirectorySource::new(dir)),
        None => Arc::new(StaticSource::new()),
    };
    let service = UnitService::new(source);
    let partition = cli.partition.as_deref();

    match cli.command {
        Commands::Validate {
            units_path,
            systems_path,
            default_system,
        } => cmd_validate(&units_path, &systems_path, default_system),
        Commands::Convert {
            value,
            from,
            to,
            kind,
        } => cmd_convert(&service, partition, value, &from, &to, kind).await,
        Commands::Units { quantity } => cmd_units(&service, partition, quantity.as_deref()).await,
        Commands::System {
            external_id,
            system,
            value,
        } => cmd_system(&service, partition, &external_id, &system, value).await,
        Commands::Duplicates { equivalents, all } => {
            cmd_duplicates(&service, partition, equivalents.as_deref(), all).await
        }
    }
}

fn is_global(partition: Option<&str>) -> bool {
    partition.is_none_or(|name| name == GLOBAL_PARTITION)
}

fn read_document(path: &Path) -> ServiceResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        SourceError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
        .into()
    })
}

fn cmd_validate(units_path: &Path, systems_path: &Path, default_system: String) -> ServiceResult<()> {
    println!(
        "Validating catalog: {} + {}",
        units_path.display(),
        systems_path.display()
    );
    let units = read_document(units_path)?;
    let systems = read_document(systems_path)?;

    let catalog = Catalog::from_json(&units, &systems, &LoadOptions { default_system })?;
    println!("✓ Catalog is valid");
    println!("  Units: {}", catalog.units().len());
    println!("  Quantities: {}", catalog.quantities().len());
    println!("  Unit systems: {}", catalog.systems().len());

    let duplicates = find_duplicate_conversions(catalog.units());
    if !duplicates.is_empty() {
        let groups: usize = duplicates.values().map(|g| g.len()).sum();
        tracing::warn!(groups, "Catalog has units sharing a conversion; run `duplicates` to review");
    }
    Ok(())
}

async fn cmd_convert(
    service: &UnitService,
    partition: Option<&str>,
    value: Real,
    from: &str,
    to: &str,
    kind: Kind,
) -> ServiceResult<()> {
    let result = service
        .convert(kind.into(), from, to, value, partition)
        .await?;
    println!("{} {} = {} {}", value, from, result, to);
    Ok(())
}

async fn cmd_units(
    service: &UnitService,
    partition: Option<&str>,
    quantity: Option<&str>,
) -> ServiceResult<()> {
    let catalog = service.catalog(partition).await?;
    let quantities: Vec<&str> = match quantity {
        Some(q) => vec![q],
        None => catalog.quantities().iter().map(String::as_str).collect(),
    };

    for quantity in quantities {
        println!("{}:", quantity);
        for unit in catalog.units_by_quantity(quantity)? {
            let symbol = unit.symbol.as_deref().unwrap_or("-");
            println!("  {:<32} {:<10} {}", unit.external_id, symbol, unit.long_name);
        }
    }
    Ok(())
}

async fn cmd_system(
    service: &UnitService,
    partition: Option<&str>,
    external_id: &str,
    system: &str,
    value: Option<Real>,
) -> ServiceResult<()> {
    match value {
        Some(value) => {
            let converted = service
                .convert_to_system(ConversionKind::Affine, external_id, system, value, partition)
                .await?;
            println!(
                "{} {} = {} {} ({})",
                value, external_id, converted.value, converted.unit.external_id, system
            );
        }
        None => {
            let unit = service.unit_by_system(external_id, system, partition).await?;
            println!("{} ({})", unit.external_id, unit.long_name);
        }
    }
    Ok(())
}

async fn cmd_duplicates(
    service: &UnitService,
    partition: Option<&str>,
    equivalents: Option<&Path>,
    all: bool,
) -> ServiceResult<()> {
    let catalog = service.catalog(partition).await?;
    let mut duplicates = find_duplicate_conversions(catalog.units());

    if !all {
        let known = match equivalents {
            Some(path) => builtin::parse_equivalents(&read_document(path)?)?,
            None if is_global(partition) => builtin::equivalent_units()?,
            None => Vec::new(),
        };
        duplicates = filter_equivalent(duplicates, &known);
    }

    if duplicates.is_empty() {
        println!("✓ No duplicate conversions");
        return Ok(());
    }

    for (quantity, groups) in &duplicates {
        println!("{}:", quantity);
        let mut groups: Vec<_> = groups.iter().collect();
        groups.sort_by(|a, b| a.1[0].external_id.cmp(&b.1[0].external_id));
        for (conversion, units) in groups {
            let ids: Vec<&str> = units.iter().map(|u| u.external_id.as_str()).collect();
            println!(
                "  multiplier={} offset={}: {}",
                conversion.multiplier,
                conversion.offset,
                ids.join(", ")
            );
        }
    }

    review_outcome(&duplicates, all)
}

/// Unreviewed groups fail the command so it can gate catalog changes.
fn review_outcome(duplicates: &DuplicateConversions, all: bool) -> ServiceResult<()> {
    if all || duplicates.is_empty() {
        return Ok(());
    }
    let groups: usize = duplicates.values().map(|g| g.len()).sum();
    Err(ServiceError::Validation(format!(
        "{} unreviewed duplicate conversion group(s) in {} quantities",
        groups,
        duplicates.len()
    )))
}
