//! Initial database migration.
//!
//! Creates the enums, core tables, and indexes for the ledger schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;
        db.execute_unprepared(PERIOD_LOCKS_SQL).await?;
        db.execute_unprepared(ENTRY_COUNTERS_SQL).await?;
        db.execute_unprepared(FIXED_ASSETS_SQL).await?;
        db.execute_unprepared(AUDIT_LOG_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
-- Account classification
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

-- Depreciation methods
CREATE TYPE depreciation_method AS ENUM ('straight_line', 'declining_balance');

-- Audit record severity
CREATE TYPE audit_severity AS ENUM ('info', 'warning', 'critical');
";

const COMPANIES_SQL: &str = r"
-- Companies (tenant scope for every other table)
CREATE TABLE companies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const USERS_SQL: &str = r"
-- Users (identity is supplied by the caller; no credentials stored here)
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    display_name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_company ON users(company_id);
";

const ACCOUNTS_SQL: &str = r"
-- Chart of accounts (self-referential tree)
CREATE TABLE accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    parent_id UUID REFERENCES accounts(id),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_accounts_company_code UNIQUE (company_id, code)
);

CREATE INDEX idx_accounts_company ON accounts(company_id) WHERE is_active;
CREATE INDEX idx_accounts_parent ON accounts(parent_id);
";

const JOURNAL_ENTRIES_SQL: &str = r"
-- Journal entry headers
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    entry_number BIGINT NOT NULL,
    entry_date DATE NOT NULL,
    description TEXT NOT NULL,
    reference VARCHAR(100),
    total_debit DECIMAL(19, 4) NOT NULL,
    total_credit DECIMAL(19, 4) NOT NULL,
    reverses_entry_id UUID REFERENCES journal_entries(id),
    created_by UUID NOT NULL REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_entries_company_number UNIQUE (company_id, entry_number),
    CONSTRAINT chk_entry_totals_non_negative CHECK (total_debit >= 0 AND total_credit >= 0)
);

CREATE INDEX idx_entries_company_date ON journal_entries(company_id, entry_date);
";

const JOURNAL_LINES_SQL: &str = r"
-- Journal entry lines
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    line_number INTEGER NOT NULL,
    debit DECIMAL(19, 4) NOT NULL DEFAULT 0,
    credit DECIMAL(19, 4) NOT NULL DEFAULT 0,
    memo TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_line_amounts_non_negative CHECK (debit >= 0 AND credit >= 0),
    CONSTRAINT chk_line_one_side CHECK (NOT (debit > 0 AND credit > 0)),
    CONSTRAINT uq_lines_entry_number UNIQUE (entry_id, line_number)
);

CREATE INDEX idx_lines_entry ON journal_lines(entry_id);
CREATE INDEX idx_lines_account ON journal_lines(account_id);
";

const PERIOD_LOCKS_SQL: &str = r"
-- Period locks gating all historical mutation
CREATE TABLE period_locks (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    period_start DATE NOT NULL,
    period_end DATE NOT NULL,
    is_locked BOOLEAN NOT NULL DEFAULT true,
    locked_by UUID NOT NULL REFERENCES users(id),
    locked_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_locks_company_range UNIQUE (company_id, period_start, period_end),
    CONSTRAINT chk_lock_range CHECK (period_start <= period_end)
);

CREATE INDEX idx_locks_company ON period_locks(company_id) WHERE is_locked;
";

const ENTRY_COUNTERS_SQL: &str = r"
-- Per-company entry number allocation; the row is locked FOR UPDATE
-- for the duration of a posting transaction
CREATE TABLE entry_counters (
    company_id UUID PRIMARY KEY REFERENCES companies(id) ON DELETE CASCADE,
    next_number BIGINT NOT NULL DEFAULT 1,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const FIXED_ASSETS_SQL: &str = r"
-- Fixed assets depreciated monthly through the ledger
CREATE TABLE fixed_assets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    asset_code VARCHAR(50) NOT NULL,
    name VARCHAR(255) NOT NULL,
    purchase_date DATE NOT NULL,
    purchase_cost DECIMAL(19, 4) NOT NULL,
    residual_value DECIMAL(19, 4) NOT NULL DEFAULT 0,
    useful_life_years INTEGER NOT NULL,
    depreciation_method depreciation_method NOT NULL,
    accumulated_depreciation DECIMAL(19, 4) NOT NULL DEFAULT 0,
    last_depreciation_date DATE,
    expense_account_id UUID NOT NULL REFERENCES accounts(id),
    accumulated_account_id UUID NOT NULL REFERENCES accounts(id),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_assets_company_code UNIQUE (company_id, asset_code),
    CONSTRAINT chk_asset_cost_positive CHECK (purchase_cost > 0),
    CONSTRAINT chk_asset_residual CHECK (residual_value >= 0 AND residual_value <= purchase_cost),
    CONSTRAINT chk_asset_life CHECK (useful_life_years >= 1),
    CONSTRAINT chk_asset_book_floor CHECK (purchase_cost - accumulated_depreciation >= residual_value)
);

CREATE INDEX idx_assets_company_active ON fixed_assets(company_id) WHERE is_active;
";

const AUDIT_LOG_SQL: &str = r"
-- Append-only audit trail; written after every successful mutation
CREATE TABLE audit_log (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    company_id UUID NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
    user_id UUID REFERENCES users(id),
    action VARCHAR(50) NOT NULL,
    table_name VARCHAR(63) NOT NULL,
    record_id UUID NOT NULL,
    old_values JSONB,
    new_values JSONB,
    severity audit_severity NOT NULL DEFAULT 'info',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_company_time ON audit_log(company_id, created_at DESC);
CREATE INDEX idx_audit_record ON audit_log(table_name, record_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS audit_log CASCADE;
DROP TABLE IF EXISTS fixed_assets CASCADE;
DROP TABLE IF EXISTS entry_counters CASCADE;
DROP TABLE IF EXISTS period_locks CASCADE;
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS companies CASCADE;
DROP TYPE IF EXISTS audit_severity;
DROP TYPE IF EXISTS depreciation_method;
DROP TYPE IF EXISTS account_type;
";
