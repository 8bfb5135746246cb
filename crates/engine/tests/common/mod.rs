#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{
    Customer, CustomerType, Engine, MoneyCents, NewCustomer, NewProduct, NewSupplier, Product,
    Supplier, TaxRate,
};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn cents(value: i64) -> MoneyCents {
    MoneyCents::new(value)
}

/// A product priced at 50.00 retail, 40.00 wholesale, 30.00 cost, 18% tax.
pub async fn widget(engine: &Engine, stock: i64) -> Product {
    engine
        .create_product(
            NewProduct::new("Widget", cents(5000))
                .sku(format!("W-{}", uuid::Uuid::new_v4()))
                .wholesale_price(cents(4000))
                .cost_price(cents(3000))
                .tax_rate(TaxRate::percent(18))
                .stock_quantity(stock),
        )
        .await
        .unwrap()
}

pub async fn retail_customer(engine: &Engine) -> Customer {
    engine
        .create_customer(NewCustomer::new("Asha Traders"))
        .await
        .unwrap()
}

pub async fn wholesale_customer(engine: &Engine) -> Customer {
    engine
        .create_customer(NewCustomer::new("Bulk Mart").customer_type(CustomerType::Wholesale))
        .await
        .unwrap()
}

pub async fn supplier(engine: &Engine) -> Supplier {
    engine
        .create_supplier(NewSupplier::new("Acme Wholesale").contact_person("Ravi"))
        .await
        .unwrap()
}
