//! Initial database migration.
//!
//! Creates all enums, tables, indexes, and the updated_at trigger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CODE SEQUENCES
        // ============================================================
        db.execute_unprepared(COUNTERS_SQL).await?;

        // ============================================================
        // PART 3: CATALOG
        // ============================================================
        db.execute_unprepared(PRODUCTS_SQL).await?;
        db.execute_unprepared(CUSTOMERS_SQL).await?;

        // ============================================================
        // PART 4: TRADES & CONSIGNMENTS
        // ============================================================
        db.execute_unprepared(PRODUCT_TRANSACTIONS_SQL).await?;
        db.execute_unprepared(CONSIGNMENTS_SQL).await?;

        // ============================================================
        // PART 5: PAYMENTS
        // ============================================================
        db.execute_unprepared(PAYMENTS_SQL).await?;
        db.execute_unprepared(PAYMENT_DETAILS_SQL).await?;

        // ============================================================
        // PART 6: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
CREATE TYPE unit_kind AS ENUM ('GRAM', 'PIECE');
CREATE TYPE trade_direction AS ENUM ('BUY', 'SELL');
CREATE TYPE consignment_direction AS ENUM ('GIVE', 'RECEIVE');
CREATE TYPE consignment_status AS ENUM ('ACTIVE', 'RETURNED');
CREATE TYPE consignment_item_kind AS ENUM ('PRODUCT', 'CURRENCY');
CREATE TYPE currency_code AS ENUM ('TRY', 'USD', 'EUR');
CREATE TYPE payment_status AS ENUM ('PENDING', 'PARTIAL', 'COMPLETED');
CREATE TYPE payment_kind AS ENUM ('PAYABLE', 'RECEIVABLE');
CREATE TYPE payment_method AS ENUM ('CASH', 'BANK_TRANSFER', 'CREDIT_CARD');
";

const COUNTERS_SQL: &str = r"
CREATE TABLE counters (
    name VARCHAR(64) PRIMARY KEY,
    value BIGINT NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const PRODUCTS_SQL: &str = r"
CREATE TABLE products (
    id UUID PRIMARY KEY,
    code VARCHAR(16) NOT NULL UNIQUE,
    name VARCHAR(100) NOT NULL,
    unit_kind unit_kind NOT NULL,
    grams_per_piece DECIMAL(12, 4),
    buy_milyem DECIMAL(6, 4) NOT NULL,
    sell_milyem DECIMAL(6, 4) NOT NULL,
    gold_buy_price DECIMAL(18, 4),
    gold_sell_price DECIMAL(18, 4),
    current_stock DECIMAL(18, 4) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_products_milyem CHECK (
        buy_milyem > 0 AND buy_milyem <= 1 AND
        sell_milyem > 0 AND sell_milyem <= 1
    ),
    CONSTRAINT chk_products_piece_factor CHECK (
        unit_kind <> 'PIECE' OR grams_per_piece > 0
    )
);

CREATE INDEX idx_products_name ON products (name);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY,
    code VARCHAR(16) NOT NULL UNIQUE,
    name VARCHAR(100) NOT NULL,
    phone VARCHAR(20) NOT NULL,
    national_id VARCHAR(11),
    balance DECIMAL(18, 4) NOT NULL DEFAULT 0,
    balance_currency currency_code,
    is_favorite BOOLEAN NOT NULL DEFAULT FALSE,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_customers_name ON customers (name);
CREATE INDEX idx_customers_favorite ON customers (is_favorite) WHERE is_favorite;
";

const PRODUCT_TRANSACTIONS_SQL: &str = r"
CREATE TABLE product_transactions (
    id UUID PRIMARY KEY,
    code VARCHAR(16) NOT NULL UNIQUE,
    product_id UUID NOT NULL REFERENCES products(id),
    direction trade_direction NOT NULL,
    quantity DECIMAL(18, 4) NOT NULL,
    milyem DECIMAL(6, 4) NOT NULL,
    gold_buy_price DECIMAL(18, 4) NOT NULL,
    gold_sell_price DECIMAL(18, 4) NOT NULL,
    adjustment DECIMAL(18, 4) NOT NULL DEFAULT 0,
    total_grams DECIMAL(18, 4) NOT NULL,
    total_amount DECIMAL(18, 4) NOT NULL,
    remaining_stock DECIMAL(18, 4) NOT NULL,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_transactions_quantity CHECK (quantity > 0)
);

CREATE INDEX idx_transactions_product ON product_transactions (product_id, created_at);
CREATE INDEX idx_transactions_direction ON product_transactions (direction);
";

const CONSIGNMENTS_SQL: &str = r"
CREATE TABLE consignments (
    id UUID PRIMARY KEY,
    code VARCHAR(16) NOT NULL UNIQUE,
    customer_id UUID NOT NULL REFERENCES customers(id),
    direction consignment_direction NOT NULL,
    item_kind consignment_item_kind NOT NULL,
    product_id UUID REFERENCES products(id),
    quantity DECIMAL(18, 4),
    milyem DECIMAL(6, 4),
    currency currency_code,
    amount DECIMAL(18, 4),
    currency_buy_price DECIMAL(18, 4),
    currency_sell_price DECIMAL(18, 4),
    balance_delta DECIMAL(18, 4) NOT NULL DEFAULT 0,
    status consignment_status NOT NULL DEFAULT 'ACTIVE',
    delivered_at TIMESTAMPTZ,
    returned_at TIMESTAMPTZ,
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_consignments_item CHECK (
        (item_kind = 'PRODUCT' AND product_id IS NOT NULL AND quantity IS NOT NULL
            AND milyem IS NOT NULL)
        OR
        (item_kind = 'CURRENCY' AND currency IS NOT NULL AND amount IS NOT NULL)
    )
);

CREATE INDEX idx_consignments_customer ON consignments (customer_id, created_at);
CREATE INDEX idx_consignments_status ON consignments (status);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY,
    product_transaction_id UUID UNIQUE REFERENCES product_transactions(id),
    customer_id UUID REFERENCES customers(id),
    kind payment_kind NOT NULL,
    total_amount DECIMAL(18, 4) NOT NULL,
    paid_amount DECIMAL(18, 4) NOT NULL DEFAULT 0,
    remaining_amount DECIMAL(18, 4) NOT NULL,
    status payment_status NOT NULL DEFAULT 'PENDING',
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_payments_amounts CHECK (
        total_amount >= 0 AND paid_amount >= 0 AND remaining_amount >= 0
    )
);

CREATE INDEX idx_payments_customer ON payments (customer_id);
CREATE INDEX idx_payments_status ON payments (status);
";

const PAYMENT_DETAILS_SQL: &str = r"
CREATE TABLE payment_details (
    id UUID PRIMARY KEY,
    payment_id UUID NOT NULL REFERENCES payments(id) ON DELETE CASCADE,
    amount DECIMAL(18, 4) NOT NULL,
    method payment_method NOT NULL,
    bank_name VARCHAR(100),
    account_holder VARCHAR(100),
    reference VARCHAR(64),
    note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_payment_details_amount CHECK (amount > 0)
);

CREATE INDEX idx_payment_details_payment ON payment_details (payment_id, created_at);
";

const TRIGGERS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_products_updated_at
    BEFORE UPDATE ON products
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_customers_updated_at
    BEFORE UPDATE ON customers
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_product_transactions_updated_at
    BEFORE UPDATE ON product_transactions
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_consignments_updated_at
    BEFORE UPDATE ON consignments
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_payments_updated_at
    BEFORE UPDATE ON payments
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS payment_details CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS consignments CASCADE;
DROP TABLE IF EXISTS product_transactions CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
DROP TABLE IF EXISTS products CASCADE;
DROP TABLE IF EXISTS counters CASCADE;

DROP FUNCTION IF EXISTS set_updated_at CASCADE;

DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS payment_kind;
DROP TYPE IF EXISTS payment_status;
DROP TYPE IF EXISTS currency_code;
DROP TYPE IF EXISTS consignment_item_kind;
DROP TYPE IF EXISTS consignment_status;
DROP TYPE IF EXISTS consignment_direction;
DROP TYPE IF EXISTS trade_direction;
DROP TYPE IF EXISTS unit_kind;
";
