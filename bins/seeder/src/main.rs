//! Database seeder for Tally development and testing.
//!
//! Seeds a demo company with a small chart of accounts and one fixed
//! asset for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use tally_db::entities::{
    accounts, companies, fixed_assets,
    sea_orm_active_enums::{AccountType, DepreciationMethod},
    users,
};
use tally_shared::config::AppConfig;

/// Demo company ID (consistent for all seeds)
const DEMO_COMPANY_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    // AppConfig::load reads .env itself
    let config = AppConfig::load().expect("Failed to load configuration");

    println!("Connecting to database...");
    let db = tally_db::connect(&config.database)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo company...");
    seed_company(&db).await;

    println!("Seeding demo user...");
    seed_user(&db).await;

    println!("Seeding chart of accounts...");
    seed_accounts(&db).await;

    println!("Seeding fixed asset...");
    seed_fixed_asset(&db).await;

    println!("Seeding complete!");
}

fn demo_company_id() -> Uuid {
    Uuid::parse_str(DEMO_COMPANY_ID).unwrap()
}

fn demo_user_id() -> Uuid {
    Uuid::parse_str(DEMO_USER_ID).unwrap()
}

async fn seed_company(db: &DatabaseConnection) {
    if companies::Entity::find_by_id(demo_company_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo company already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let company = companies::ActiveModel {
        id: Set(demo_company_id()),
        name: Set("Demo Company".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    company.insert(db).await.expect("Failed to seed company");
}

async fn seed_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(demo_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo user already exists, skipping...");
        return;
    }

    let user = users::ActiveModel {
        id: Set(demo_user_id()),
        company_id: Set(demo_company_id()),
        display_name: Set("Demo User".to_string()),
        created_at: Set(Utc::now().into()),
    };
    user.insert(db).await.expect("Failed to seed user");
}

/// Fixed account IDs so re-running the seeder is a no-op.
const ACCOUNT_SEEDS: &[(&str, &str, &str, AccountType, Option<&str>)] = &[
    (
        "00000000-0000-0000-0000-000000000101",
        "1000",
        "Cash",
        AccountType::Asset,
        None,
    ),
    (
        "00000000-0000-0000-0000-000000000102",
        "1500",
        "Equipment",
        AccountType::Asset,
        None,
    ),
    (
        "00000000-0000-0000-0000-000000000103",
        "1590",
        "Accumulated Depreciation - Equipment",
        AccountType::Asset,
        Some("00000000-0000-0000-0000-000000000102"),
    ),
    (
        "00000000-0000-0000-0000-000000000104",
        "4000",
        "Sales Revenue",
        AccountType::Revenue,
        None,
    ),
    (
        "00000000-0000-0000-0000-000000000105",
        "6100",
        "Depreciation Expense",
        AccountType::Expense,
        None,
    ),
];

async fn seed_accounts(db: &DatabaseConnection) {
    let now = Utc::now().into();
    for (id, code, name, account_type, parent) in ACCOUNT_SEEDS {
        let account_id = Uuid::parse_str(id).unwrap();
        if accounts::Entity::find_by_id(account_id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Account {code} already exists, skipping...");
            continue;
        }

        let account = accounts::ActiveModel {
            id: Set(account_id),
            company_id: Set(demo_company_id()),
            code: Set((*code).to_string()),
            name: Set((*name).to_string()),
            account_type: Set(account_type.clone()),
            parent_id: Set(parent.map(|p| Uuid::parse_str(p).unwrap())),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        account.insert(db).await.expect("Failed to seed account");
    }
}

async fn seed_fixed_asset(db: &DatabaseConnection) {
    let asset_id = Uuid::parse_str("00000000-0000-0000-0000-000000000201").unwrap();
    if fixed_assets::Entity::find_by_id(asset_id)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo asset already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let asset = fixed_assets::ActiveModel {
        id: Set(asset_id),
        company_id: Set(demo_company_id()),
        asset_code: Set("FA-001".to_string()),
        name: Set("Office server".to_string()),
        purchase_date: Set(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()),
        purchase_cost: Set(Decimal::new(12_000, 0)),
        residual_value: Set(Decimal::ZERO),
        useful_life_years: Set(1),
        depreciation_method: Set(DepreciationMethod::StraightLine),
        accumulated_depreciation: Set(Decimal::ZERO),
        last_depreciation_date: Set(None),
        expense_account_id: Set(Uuid::parse_str("00000000-0000-0000-0000-000000000105").unwrap()),
        accumulated_account_id: Set(Uuid::parse_str("00000000-0000-0000-0000-000000000103").unwrap()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    asset.insert(db).await.expect("Failed to seed asset");
}
