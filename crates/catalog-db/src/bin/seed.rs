//! # Seed Data Generator
//!
//! Populates a SQLite catalog with test products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 500 products (default)
//! cargo run -p catalog-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p catalog-db --bin seed -- --count 2000
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! Without `--db` the path comes from `CATALOG_DB_PATH` (default
//! `./catalog.db`). Log verbosity follows `RUST_LOG`.
//!
//! ## Generated Products
//! Each product has:
//! - Unique code: `{FAMILY}-{NAME}-{INDEX}`
//! - Name with size variant
//! - Value: 1.99 - 9.99 plus a size surcharge
//! - Stock: 0 - 100

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use catalog_core::{Money, Product};
use catalog_db::{Catalog, CatalogConfig, StoreKind};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Product families for realistic test data
const FAMILIES: &[(&str, &[&str])] = &[
    (
        "HDW",
        &[
            "Hex Bolt",
            "Wood Screw",
            "Wall Anchor",
            "Hinge",
            "Drawer Slide",
            "Cabinet Handle",
            "Door Stop",
            "Shelf Bracket",
        ],
    ),
    (
        "ELC",
        &[
            "Extension Cord",
            "Wall Socket",
            "Light Switch",
            "LED Bulb",
            "Cable Tie",
            "Junction Box",
        ],
    ),
    (
        "PNT",
        &[
            "Wall Paint",
            "Wood Varnish",
            "Paint Roller",
            "Masking Tape",
            "Brush",
            "Primer",
        ],
    ),
    (
        "GRD",
        &[
            "Garden Hose",
            "Watering Can",
            "Pruning Shears",
            "Plant Pot",
            "Potting Soil",
        ],
    ),
];

/// Size variants with value surcharge in cents
const SIZES: &[(&str, i64)] = &[
    ("Small", 0),
    ("Medium", 100),
    ("Large", 200),
    ("XL", 350),
    ("Pack of 10", 500),
];

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,catalog_db=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let mut config = CatalogConfig::from_env()?;
    config.store = StoreKind::Sqlite;

    let args: Vec<String> = env::args().collect();
    let mut count: usize = 500;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.db_path = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: $CATALOG_DB_PATH or ./catalog.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(path = %config.db_path.display(), count, "Seeding catalog");

    let catalog = Catalog::open(&config).await?;
    let products = catalog.products();

    let existing = products.count().await?;
    if existing > 0 {
        warn!(
            existing,
            "Catalog already has products, skipping seed. Delete the database file to regenerate."
        );
        catalog.close().await;
        return Ok(());
    }

    let mut generated = 0;
    let start = Instant::now();

    'families: for (family_idx, (family, names)) in FAMILIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (size_idx, (size, surcharge)) in SIZES.iter().enumerate() {
                if generated >= count {
                    break 'families;
                }

                let product = generate_product(
                    family,
                    name,
                    size,
                    *surcharge,
                    family_idx * 1000 + name_idx * 20 + size_idx,
                );

                if let Err(e) = products.add(&product).await {
                    warn!(code = %product.code, error = %e, "Failed to add product");
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    info!(generated, "Progress");
                }
            }
        }
    }

    let elapsed = start.elapsed();
    info!(
        generated,
        elapsed_ms = elapsed.as_millis() as u64,
        rate = %format!("{:.0}/s", generated as f64 / elapsed.as_secs_f64()),
        "Products generated"
    );

    for fragment in ["Bolt", "LED", "zzz"] {
        let found = products.get_by_name(fragment).await?;
        info!(fragment, results = found.len(), "Name lookup");
    }

    catalog.close().await;
    info!("Seed complete");

    Ok(())
}

/// Generates a single product with deterministic pseudo-random data.
fn generate_product(family: &str, name: &str, size: &str, surcharge: i64, seed: usize) -> Product {
    let prefix: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    let code = format!("{}-{}-{:04}", family, prefix, seed);

    let base_cents = 199 + ((seed * 17) % 800) as i64;
    let value = Money::from_cents(base_cents + surcharge);

    let stock = (seed % 101) as i64;

    let product = Product::new(code, format!("{} {}", name, size), value, stock);

    if seed % 3 == 0 {
        product.with_description(format!("{} ({})", name, family))
    } else {
        product
    }
}
