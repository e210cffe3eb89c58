use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::expense::Expense;

/// Write-mirror target for the ledger (e.g., an on-device database).
///
/// One fixed capability set; implementations do not look for alternative
/// APIs. The ledger only ever writes here; it never reads expenses back.
pub trait ExpenseMirror: Send {
    /// Human-readable name (for logs).
    fn name(&self) -> &str;

    /// Open the connection and make sure the schema exists. Idempotent.
    fn open(&mut self) -> Result<(), CoreError>;

    fn insert(&mut self, expense: &Expense) -> Result<(), CoreError>;

    fn delete(&mut self, id: Uuid) -> Result<(), CoreError>;

    /// Every mirrored expense, newest first.
    fn query_all(&self) -> Result<Vec<Expense>, CoreError>;

    fn close(&mut self) -> Result<(), CoreError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use sqlite::SqliteMirror;

#[cfg(not(target_arch = "wasm32"))]
mod sqlite {
    use std::path::PathBuf;

    use chrono::{DateTime, NaiveDate, Utc};
    use rusqlite::{params, Connection};
    use uuid::Uuid;

    use super::ExpenseMirror;
    use crate::errors::CoreError;
    use crate::models::expense::Expense;

    const CREATE_TABLES: &str = "
        CREATE TABLE IF NOT EXISTS gastos (
            id TEXT PRIMARY KEY,
            categoria TEXT NOT NULL,
            descricao TEXT NOT NULL,
            valor REAL NOT NULL,
            data TEXT NOT NULL,
            criadoEm TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_gastos_criado_em ON gastos (criadoEm);
    ";

    /// SQLite-backed mirror (bundled SQLite, so the library version is pinned).
    pub struct SqliteMirror {
        path: Option<PathBuf>,
        conn: Option<Connection>,
    }

    impl SqliteMirror {
        /// Mirror into a database file.
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self {
                path: Some(path.into()),
                conn: None,
            }
        }

        /// Mirror into a private in-memory database.
        pub fn in_memory() -> Self {
            Self {
                path: None,
                conn: None,
            }
        }

        pub fn is_open(&self) -> bool {
            self.conn.is_some()
        }

        fn conn(&self) -> Result<&Connection, CoreError> {
            self.conn
                .as_ref()
                .ok_or_else(|| CoreError::Database("mirror connection is not open".into()))
        }
    }

    impl ExpenseMirror for SqliteMirror {
        fn name(&self) -> &str {
            "sqlite"
        }

        fn open(&mut self) -> Result<(), CoreError> {
            if self.conn.is_some() {
                return Ok(());
            }
            let conn = match &self.path {
                Some(path) => Connection::open(path)?,
                None => Connection::open_in_memory()?,
            };
            conn.execute_batch(CREATE_TABLES)?;
            tracing::debug!(path = ?self.path, "sqlite mirror opened");
            self.conn = Some(conn);
            Ok(())
        }

        fn insert(&mut self, expense: &Expense) -> Result<(), CoreError> {
            self.conn()?.execute(
                "INSERT OR REPLACE INTO gastos (id, categoria, descricao, valor, data, criadoEm)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    expense.id.to_string(),
                    expense.category,
                    expense.description,
                    expense.amount,
                    expense.date.format("%Y-%m-%d").to_string(),
                    expense.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        }

        fn delete(&mut self, id: Uuid) -> Result<(), CoreError> {
            self.conn()?
                .execute("DELETE FROM gastos WHERE id = ?1", params![id.to_string()])?;
            Ok(())
        }

        fn query_all(&self) -> Result<Vec<Expense>, CoreError> {
            let conn = self.conn()?;
            let mut stmt = conn.prepare(
                "SELECT id, categoria, descricao, valor, data, criadoEm
                 FROM gastos ORDER BY criadoEm DESC",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?;

            let mut expenses = Vec::new();
            for row in rows {
                let (id, category, description, amount, date, created_at) = row?;
                let id = Uuid::parse_str(&id)
                    .map_err(|e| CoreError::Database(format!("bad id '{id}': {e}")))?;
                let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                    .map_err(|e| CoreError::Database(format!("bad date '{date}': {e}")))?;
                let created_at = DateTime::parse_from_rfc3339(&created_at)
                    .map_err(|e| CoreError::Database(format!("bad criadoEm '{created_at}': {e}")))?
                    .with_timezone(&Utc);
                expenses.push(Expense {
                    id,
                    description,
                    amount,
                    category,
                    date,
                    created_at,
                });
            }
            Ok(expenses)
        }

        fn close(&mut self) -> Result<(), CoreError> {
            if let Some(conn) = self.conn.take() {
                conn.close().map_err(|(_, e)| CoreError::from(e))?;
            }
            Ok(())
        }
    }
}
