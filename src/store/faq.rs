//! FAQ repository and the answer-store seam consumed by the controller

use async_trait::async_trait;

use super::DbPool;
use crate::controller::ResponseStore;
use crate::{Error, Result};

/// A stored question/answer pair
#[derive(Debug, Clone)]
pub struct FaqEntry {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

/// FAQ repository
#[derive(Clone)]
pub struct FaqRepo {
    pool: DbPool,
}

impl FaqRepo {
    /// Create a new FAQ repository
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Add a question/answer row
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn add(&self, question: &str, answer: &str) -> Result<i64> {
        let conn = self.pool.get().map_err(|e| Error::Store(e.to_string()))?;

        conn.execute(
            "INSERT INTO faq (question, answer) VALUES (?1, ?2)",
            [question, answer],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Find the answer whose stored question is contained in the given
    /// question text
    ///
    /// Matching is case-insensitive containment: a row matches when its
    /// question column appears anywhere inside `question`. The first match
    /// by insertion order wins. Returns `None` when no row matches.
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn find_match(&self, question: &str) -> Result<Option<String>> {
        let conn = self.pool.get().map_err(|e| Error::Store(e.to_string()))?;

        let answer = conn
            .query_row(
                "SELECT answer FROM faq
                 WHERE instr(lower(?1), lower(question)) > 0
                 ORDER BY id LIMIT 1",
                [question],
                |row| row.get::<_, String>(0),
            )
            .ok();

        Ok(answer)
    }

    /// List all rows
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn list_all(&self) -> Result<Vec<FaqEntry>> {
        let conn = self.pool.get().map_err(|e| Error::Store(e.to_string()))?;

        let mut stmt = conn.prepare("SELECT id, question, answer FROM faq ORDER BY id")?;
        let entries = stmt
            .query_map([], |row| {
                Ok(FaqEntry {
                    id: row.get(0)?,
                    question: row.get(1)?,
                    answer: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Count stored rows
    ///
    /// # Errors
    ///
    /// Returns error if database operation fails
    pub fn count(&self) -> Result<i64> {
        let conn = self.pool.get().map_err(|e| Error::Store(e.to_string()))?;

        let count = conn.query_row("SELECT COUNT(*) FROM faq", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Answer store backed by [`FaqRepo`]
///
/// Supplies the canned fallback answer when no row matches — "no match" is a
/// valid Answer here, never an error.
#[derive(Clone)]
pub struct FaqStore {
    repo: FaqRepo,
    fallback: String,
}

impl FaqStore {
    /// Create a new answer store
    #[must_use]
    pub fn new(repo: FaqRepo, fallback: String) -> Self {
        Self { repo, fallback }
    }
}

#[async_trait]
impl ResponseStore for FaqStore {
    async fn lookup(&self, question: &str) -> Result<String> {
        match self.repo.find_match(question)? {
            Some(answer) => Ok(answer),
            None => {
                tracing::debug!(question, "no FAQ row matched");
                Ok(self.fallback.clone())
            }
        }
    }
}
