//! Database seeder for Sarraf development and testing.
//!
//! Seeds a handful of products and customers for local development.
//!
//! Usage: cargo run --bin seeder

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::str::FromStr;

use sarraf_core::trade::UnitKind;
use sarraf_db::entities::{customers, products};
use sarraf_db::repositories::{
    CreateCustomerInput, CreateProductInput, CustomerRepository, ProductRepository,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = sarraf_db::connect(&database_url, 2, 1)
        .await
        .expect("Failed to connect to database");

    println!("Seeding products...");
    seed_products(&db).await;

    println!("Seeding customers...");
    seed_customers(&db).await;

    println!("Seeding complete!");
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Seeds a mix of gram-traded and piece-traded products.
async fn seed_products(db: &DatabaseConnection) {
    let repo = ProductRepository::new(db.clone());

    let seeds = [
        ("22K Bilezik", UnitKind::Gram, None, "0.916", "0.920"),
        ("14K Bilezik", UnitKind::Gram, None, "0.585", "0.590"),
        ("Hurda 22K", UnitKind::Gram, None, "0.910", "0.916"),
        (
            "Ceyrek Altin",
            UnitKind::Piece,
            Some("1.754"),
            "0.916",
            "0.920",
        ),
        (
            "Yarim Altin",
            UnitKind::Piece,
            Some("3.508"),
            "0.916",
            "0.920",
        ),
        (
            "Tam Altin",
            UnitKind::Piece,
            Some("7.016"),
            "0.916",
            "0.920",
        ),
        (
            "Gram Kulce",
            UnitKind::Piece,
            Some("1.000"),
            "0.995",
            "0.995",
        ),
    ];

    let mut inserted = 0;
    for (name, unit_kind, grams_per_piece, buy_milyem, sell_milyem) in seeds {
        let exists = products::Entity::find()
            .filter(products::Column::Name.eq(name))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some();
        if exists {
            println!("  Product {name} already exists, skipping...");
            continue;
        }

        let input = CreateProductInput {
            name: name.to_string(),
            unit_kind,
            grams_per_piece: grams_per_piece.map(dec),
            buy_milyem: dec(buy_milyem),
            sell_milyem: dec(sell_milyem),
        };

        match repo.create_product(input).await {
            Ok(product) => {
                inserted += 1;
                println!("  Created product {} ({})", product.code, product.name);
            }
            Err(e) => eprintln!("Failed to insert product {name}: {e}"),
        }
    }

    println!("  Inserted {inserted} products");
}

/// Seeds test customers, one per balance denomination.
async fn seed_customers(db: &DatabaseConnection) {
    let repo = CustomerRepository::new(db.clone());

    let seeds = [
        ("Ayse Yilmaz", "05321112233", None),
        ("Mehmet Demir", "05334445566", Some("USD")),
        ("Fatma Kaya", "05357778899", Some("TRY")),
    ];

    let mut inserted = 0;
    for (name, phone, currency) in seeds {
        let exists = customers::Entity::find()
            .filter(customers::Column::Name.eq(name))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some();
        if exists {
            println!("  Customer {name} already exists, skipping...");
            continue;
        }

        let balance_currency = currency.map(|code| {
            sarraf_core::consignment::CurrencyCode::from_str(code).expect("known currency code")
        });

        let input = CreateCustomerInput {
            name: name.to_string(),
            phone: phone.to_string(),
            national_id: None,
            balance_currency,
            note: Some("seeded".to_string()),
        };

        match repo.create_customer(input).await {
            Ok(customer) => {
                inserted += 1;
                println!("  Created customer {} ({})", customer.code, customer.name);
            }
            Err(e) => eprintln!("Failed to insert customer {name}: {e}"),
        }
    }

    println!("  Inserted {inserted} customers");
}
