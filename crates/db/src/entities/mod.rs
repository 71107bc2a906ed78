//! `SeaORM` entity definitions.

pub mod documents;
pub mod error_logs;
pub mod etims_settings;
pub mod integration_requests;
pub mod item_classifications;
pub mod reference_codes;
pub mod route_cursors;
pub mod warehouses;
