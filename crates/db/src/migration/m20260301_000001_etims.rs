//! Initial schema for the eTIMS bridge.
//!
//! Creates the settings, audit and error log tables, the ERP document mirror,
//! and the tables holding data pulled from the vendor.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(SETTINGS_SQL).await?;
        db.execute_unprepared(AUDIT_SQL).await?;
        db.execute_unprepared(DOCUMENTS_SQL).await?;
        db.execute_unprepared(REFERENCE_SQL).await?;
        db.execute_unprepared(MIRROR_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const SETTINGS_SQL: &str = r"
CREATE TABLE etims_settings (
    id UUID PRIMARY KEY,
    company VARCHAR(140) NOT NULL,
    vendor VARCHAR(140) NOT NULL,
    environment VARCHAR(16) NOT NULL,
    bhfid VARCHAR(2) NOT NULL,
    tin VARCHAR(11) NOT NULL,
    dvc_srl_no VARCHAR(140),
    consumer_key TEXT NOT NULL,
    consumer_secret TEXT NOT NULL,
    communication_key TEXT,
    scu_id VARCHAR(140),
    is_active BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_settings_environment CHECK (environment IN ('Sandbox', 'Production')),
    CONSTRAINT chk_settings_bhfid CHECK (char_length(bhfid) = 2)
);

-- At most one active record per tenant branch
CREATE UNIQUE INDEX uq_settings_active
    ON etims_settings (company, vendor, environment, bhfid)
    WHERE is_active;

CREATE INDEX idx_settings_company ON etims_settings (company);
";

const AUDIT_SQL: &str = r"
CREATE TABLE integration_requests (
    id UUID PRIMARY KEY,
    operation VARCHAR(64) NOT NULL,
    url TEXT NOT NULL,
    reference_doctype VARCHAR(140),
    reference_name VARCHAR(140),
    data JSONB NOT NULL DEFAULT '{}',
    status VARCHAR(16) NOT NULL DEFAULT 'Pending',
    output TEXT,
    error TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_request_status CHECK (status IN ('Pending', 'Completed', 'Failed'))
);

CREATE INDEX idx_requests_reference ON integration_requests (reference_doctype, reference_name);
CREATE INDEX idx_requests_status ON integration_requests (status, created_at DESC);

CREATE TABLE error_logs (
    id UUID PRIMARY KEY,
    title TEXT NOT NULL,
    category VARCHAR(64) NOT NULL,
    message TEXT NOT NULL,
    route VARCHAR(64) NOT NULL,
    reference_doctype VARCHAR(140),
    reference_name VARCHAR(140),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_error_logs_created ON error_logs (created_at DESC);
";

const DOCUMENTS_SQL: &str = r"
CREATE TABLE documents (
    kind VARCHAR(64) NOT NULL,
    name VARCHAR(140) NOT NULL,
    company VARCHAR(140) NOT NULL,
    docstatus SMALLINT NOT NULL DEFAULT 0,
    submitted BOOLEAN NOT NULL DEFAULT false,
    inventory_submitted BOOLEAN NOT NULL DEFAULT false,
    body JSONB NOT NULL,
    vendor_fields JSONB NOT NULL DEFAULT '{}',
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (kind, name),
    CONSTRAINT chk_docstatus CHECK (docstatus IN (0, 1, 2))
);

-- Sweeps look for finalized, unaccepted documents
CREATE INDEX idx_documents_pending ON documents (kind, docstatus) WHERE NOT submitted;
CREATE INDEX idx_documents_inventory ON documents (kind)
    WHERE submitted AND NOT inventory_submitted;

CREATE TABLE warehouses (
    name VARCHAR(140) PRIMARY KEY,
    company VARCHAR(140) NOT NULL,
    branch VARCHAR(2) NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const REFERENCE_SQL: &str = r"
CREATE TABLE reference_codes (
    category VARCHAR(32) NOT NULL,
    code VARCHAR(64) NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    sort_order INTEGER,
    in_use BOOLEAN NOT NULL DEFAULT true,
    user_defined_1 TEXT,
    user_defined_2 TEXT,
    user_defined_3 TEXT,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (category, code)
);

CREATE TABLE item_classifications (
    code VARCHAR(64) PRIMARY KEY,
    name TEXT NOT NULL,
    level INTEGER,
    tax_type VARCHAR(8),
    major_target BOOLEAN NOT NULL DEFAULT false,
    in_use BOOLEAN NOT NULL DEFAULT true,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE route_cursors (
    route VARCHAR(64) PRIMARY KEY,
    last_req_dt VARCHAR(14) NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const MIRROR_SQL: &str = r"
CREATE TABLE notices (
    company VARCHAR(140) NOT NULL,
    record_key VARCHAR(255) NOT NULL,
    data JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (company, record_key)
);

CREATE TABLE branches (LIKE notices INCLUDING ALL);
CREATE TABLE imported_items (LIKE notices INCLUDING ALL);
CREATE TABLE stock_movements (LIKE notices INCLUDING ALL);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS stock_movements CASCADE;
DROP TABLE IF EXISTS imported_items CASCADE;
DROP TABLE IF EXISTS branches CASCADE;
DROP TABLE IF EXISTS notices CASCADE;
DROP TABLE IF EXISTS route_cursors CASCADE;
DROP TABLE IF EXISTS item_classifications CASCADE;
DROP TABLE IF EXISTS reference_codes CASCADE;
DROP TABLE IF EXISTS warehouses CASCADE;
DROP TABLE IF EXISTS documents CASCADE;
DROP TABLE IF EXISTS error_logs CASCADE;
DROP TABLE IF EXISTS integration_requests CASCADE;
DROP TABLE IF EXISTS etims_settings CASCADE;
";
