//! `SeaORM` Entity for reference_codes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reference_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub category: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub in_use: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_defined_1: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_defined_2: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_defined_3: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
