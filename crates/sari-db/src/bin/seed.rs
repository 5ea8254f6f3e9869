//! # Seed Data Generator
//!
//! Populates the database with a starter sari-sari store catalog for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p sari-db --bin seed
//!
//! # Specify database path
//! cargo run -p sari-db --bin seed -- --db ./data/sari.db
//! ```
//!
//! Skips seeding if the catalog already has items, so it is safe to run
//! repeatedly.

use std::env;

use sari_db::{Database, DbConfig};

/// Starter catalog: (name, price in centavos, stock on hand).
///
/// Typical sari-sari store shelf, prices in whole pesos.
const CATALOG: &[(&str, i64, i64)] = &[
    ("Coke 8oz", 2000, 24),
    ("Royal 8oz", 2000, 24),
    ("Sprite 8oz", 2000, 24),
    ("Bottled Water 500ml", 1500, 36),
    ("Chippy", 3500, 20),
    ("Piattos", 3500, 20),
    ("Nova", 3000, 20),
    ("SkyFlakes Pack", 1000, 50),
    ("Lucky Me Pancit Canton", 1800, 40),
    ("Lucky Me Beef Noodles", 1500, 40),
    ("Sardines 155g", 2500, 30),
    ("Corned Beef 150g", 4500, 15),
    ("Kopiko Brown Sachet", 1200, 60),
    ("Milo Sachet", 1100, 60),
    ("Sunsilk Shampoo Sachet", 800, 48),
    ("Safeguard Bar 60g", 3500, 12),
    ("Detergent Bar Half", 1500, 24),
    ("Load Card 100", 10500, 10),
    ("Egg (piece)", 900, 30),
    ("Pandesal (piece)", 400, 0), // restocked each morning
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./sari_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Sari POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./sari_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Sari POS Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing catalog
    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let items = db.items();
    for (name, price_cents, stock) in CATALOG {
        let item = items.create(name, *price_cents, *stock).await?;
        println!(
            "  + {:<28} {}  (stock {})",
            item.name,
            item.price(),
            item.stock_count
        );
    }

    println!();
    println!("✓ Seeded {} items", CATALOG.len());
    println!();
    println!("Try it:");
    println!("  cargo test --workspace");

    Ok(())
}
