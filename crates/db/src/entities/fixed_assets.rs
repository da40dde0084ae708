//! `SeaORM` Entity for the fixed_assets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DepreciationMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "fixed_assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    /// Unique per company.
    pub asset_code: String,
    pub name: String,
    pub purchase_date: Date,
    pub purchase_cost: Decimal,
    pub residual_value: Decimal,
    pub useful_life_years: i32,
    pub depreciation_method: DepreciationMethod,
    pub accumulated_depreciation: Decimal,
    pub last_depreciation_date: Option<Date>,
    /// Expense account debited by each depreciation entry.
    pub expense_account_id: Uuid,
    /// Contra-asset account credited by each depreciation entry.
    pub accumulated_account_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::ExpenseAccountId",
        to = "super::accounts::Column::Id"
    )]
    ExpenseAccount,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccumulatedAccountId",
        to = "super::accounts::Column::Id"
    )]
    AccumulatedAccount,
}

impl ActiveModelBehavior for ActiveModel {}
