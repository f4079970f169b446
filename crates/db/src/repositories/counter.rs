//! Counter repository for atomic code generation.
//!
//! Codes are minted by a single upsert that increments the counter row and
//! returns the new value in one statement. Two concurrent callers can never
//! observe the same value, and a gap only appears if the enclosing database
//! transaction rolls back after minting.

use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};

use sarraf_shared::CodeKind;

/// Error types for counter operations.
#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    /// The upsert returned no row, which should be impossible.
    #[error("Counter upsert for '{0}' returned no row")]
    MissingRow(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository minting sequential entity codes.
#[derive(Debug, Clone, Copy)]
pub struct CounterRepository;

impl CounterRepository {
    /// Mints the next code for `kind` on the given connection.
    ///
    /// Callers creating an entity should pass their open database
    /// transaction so the counter increment rolls back with the insert.
    ///
    /// # Errors
    ///
    /// Returns an error if the database statement fails.
    pub async fn next_code<C: ConnectionTrait>(
        conn: &C,
        kind: CodeKind,
    ) -> Result<String, CounterError> {
        let value = Self::next_value(conn, kind).await?;
        Ok(kind.format(value))
    }

    /// Atomically increments the counter for `kind` and returns the new
    /// value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database statement fails.
    pub async fn next_value<C: ConnectionTrait>(
        conn: &C,
        kind: CodeKind,
    ) -> Result<i64, CounterError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "INSERT INTO counters (name, value) VALUES ($1, 1)
             ON CONFLICT (name) DO UPDATE
                 SET value = counters.value + 1, updated_at = NOW()
             RETURNING value",
            [kind.counter_name().into()],
        );

        let row = conn
            .query_one(stmt)
            .await?
            .ok_or(CounterError::MissingRow(kind.counter_name()))?;

        Ok(row.try_get("", "value")?)
    }
}
