//! Reference data seeder for eTIMS bridge development and testing.
//!
//! Seeds the code lists the submission pipeline reads before the first
//! vendor sync has run: taxation types with their rates, quantity units
//! and packing units. When `SEED_COMPANY` is set, a default warehouse is
//! also mapped to branch `00`.
//!
//! Usage: cargo run --bin seeder

use etims_core::codelist::{CodeCategory, MirrorStore, ReferenceCode};
use etims_db::{MirrorRepository, ReferenceRepository};

/// Taxation types A-E with the rate carried in `userDfnCd1`.
const TAXATION_TYPES: [(&str, &str, &str); 5] = [
    ("A", "A-Exempt", "0"),
    ("B", "B-16.00%", "16"),
    ("C", "C-0%", "0"),
    ("D", "D-Non-VAT", "0"),
    ("E", "E-8%", "8"),
];

const QUANTITY_UNITS: [(&str, &str); 6] = [
    ("U", "Pieces/item [Number]"),
    ("KG", "Kilo-Gramme"),
    ("LTR", "Litre"),
    ("BX", "Box"),
    ("MTR", "Metre"),
    ("DZ", "Dozen"),
];

const PACKING_UNITS: [(&str, &str); 4] = [
    ("NT", "NET"),
    ("BG", "Bag"),
    ("BX", "Box"),
    ("CT", "Carton"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set in environment"))?;

    println!("Connecting to database...");
    let db = etims_db::connect(&database_url).await?;
    let mirror = MirrorRepository::new(db.clone());

    println!("Seeding taxation types...");
    let taxation: Vec<ReferenceCode> = TAXATION_TYPES
        .iter()
        .zip(1..)
        .map(|(&(code, name, rate), order)| {
            let mut entry = code_entry(CodeCategory::TaxationType, code, name, order);
            entry.user_defined_1 = Some(rate.to_string());
            entry
        })
        .collect();
    seed(&mirror, CodeCategory::TaxationType, &taxation).await?;

    println!("Seeding quantity units...");
    let units: Vec<ReferenceCode> = QUANTITY_UNITS
        .iter()
        .zip(1..)
        .map(|(&(code, name), order)| code_entry(CodeCategory::QuantityUnit, code, name, order))
        .collect();
    seed(&mirror, CodeCategory::QuantityUnit, &units).await?;

    println!("Seeding packing units...");
    let packing: Vec<ReferenceCode> = PACKING_UNITS
        .iter()
        .zip(1..)
        .map(|(&(code, name), order)| code_entry(CodeCategory::PackingUnit, code, name, order))
        .collect();
    seed(&mirror, CodeCategory::PackingUnit, &packing).await?;

    if let Ok(company) = std::env::var("SEED_COMPANY") {
        let warehouse = std::env::var("SEED_WAREHOUSE").unwrap_or_else(|_| "Stores".to_string());
        println!("Mapping warehouse {warehouse} to branch 00...");
        ReferenceRepository::new(db)
            .upsert_warehouse(&warehouse, &company, "00")
            .await?;
    }

    println!("Seeding complete!");
    Ok(())
}

fn code_entry(category: CodeCategory, code: &str, name: &str, order: i32) -> ReferenceCode {
    ReferenceCode {
        category,
        code: code.to_string(),
        name: name.to_string(),
        description: None,
        sort_order: Some(order),
        in_use: true,
        user_defined_1: None,
        user_defined_2: None,
        user_defined_3: None,
    }
}

async fn seed(mirror: &MirrorRepository, category: CodeCategory, codes: &[ReferenceCode]) -> anyhow::Result<()> {
    let changed = mirror.upsert_codes(category, codes).await?;
    if changed == 0 {
        println!("  {category} already up to date, skipping...");
    } else {
        println!("  Upserted {changed} {category} rows");
    }
    Ok(())
}
