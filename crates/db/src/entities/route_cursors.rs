//! `SeaORM` Entity for route_cursors table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "route_cursors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub route: String,
    /// `yyyyMMddHHmmss` of the last successful response.
    pub last_req_dt: String,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
