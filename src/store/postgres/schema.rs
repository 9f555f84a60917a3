//! Table definitions for the PostgreSQL backend

use sqlx::PgPool;

/// Statements applied in order by [`init_schema`]. All are idempotent.
const SCHEMA: &[&str] = &[
    // Owned by the auth collaborator; the ledger only reads id + email
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        email TEXT NOT NULL UNIQUE
    )"#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email_lower ON users (lower(email))",
    r#"CREATE TABLE IF NOT EXISTS wallets (
        id BIGSERIAL PRIMARY KEY,
        owner_id UUID NOT NULL UNIQUE REFERENCES users(id),
        balance NUMERIC NOT NULL DEFAULT 0 CHECK (balance >= 0),
        currency VARCHAR(3) NOT NULL DEFAULT 'USD',
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS transactions (
        seq BIGSERIAL NOT NULL,
        id VARCHAR(64) PRIMARY KEY,
        wallet_id BIGINT NOT NULL REFERENCES wallets(id),
        owner_id UUID NOT NULL REFERENCES users(id),
        recipient_identifier TEXT NOT NULL,
        amount NUMERIC NOT NULL CHECK (amount > 0),
        note TEXT,
        type VARCHAR(16) NOT NULL DEFAULT 'transfer',
        status VARCHAR(16) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
    )"#,
    "CREATE INDEX IF NOT EXISTS idx_transactions_owner_created ON transactions (owner_id, created_at DESC, seq DESC)",
];

/// Create tables and indexes if they do not exist yet
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for stmt in SCHEMA {
        sqlx::query(stmt).execute(pool).await?;
    }
    tracing::info!(statements = SCHEMA.len(), "Ledger schema ready");
    Ok(())
}
