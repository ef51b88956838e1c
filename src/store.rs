use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::model::{AnswerLetter, NewQuestion, Question};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS questions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    question_text TEXT NOT NULL CHECK (length(trim(question_text)) > 0),
    choice_a TEXT NOT NULL,
    choice_b TEXT NOT NULL,
    choice_c TEXT NOT NULL,
    choice_d TEXT NOT NULL,
    predicted_answer TEXT CHECK (predicted_answer IN ('A', 'B', 'C', 'D')),
    explanation TEXT,
    user_correction TEXT CHECK (user_correction IN ('A', 'B', 'C', 'D'))
)
"#;

const SELECT_COLUMNS: &str = "SELECT id, question_text, choice_a, choice_b, choice_c, choice_d, \
     predicted_answer, explanation, user_correction FROM questions";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("question {0} not found")]
    NotFound(i64),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored question {id} is corrupt: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// Storage for question records. Every write runs in its own transaction.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, question: NewQuestion) -> Result<i64, StoreError>;
    async fn get(&self, id: i64) -> Result<Question, StoreError>;
    /// All records, newest first.
    async fn list(&self) -> Result<Vec<Question>, StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
    async fn update_correction(&self, id: i64, letter: AnswerLetter) -> Result<(), StoreError>;
}

#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    question_text: String,
    choice_a: String,
    choice_b: String,
    choice_c: String,
    choice_d: String,
    predicted_answer: Option<String>,
    explanation: Option<String>,
    user_correction: Option<String>,
}

impl TryFrom<QuestionRow> for Question {
    type Error = StoreError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let letter = |value: Option<String>| {
            value
                .map(|v| AnswerLetter::from_str(&v))
                .transpose()
                .map_err(|e| StoreError::Corrupt {
                    id,
                    reason: e.to_string(),
                })
        };

        Ok(Question {
            id,
            question_text: row.question_text,
            choices: [row.choice_a, row.choice_b, row.choice_c, row.choice_d],
            predicted_answer: letter(row.predicted_answer)?,
            explanation: row.explanation,
            user_correction: letter(row.user_correction)?,
        })
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens the database at `url`, creating the file and schema if needed.
    ///
    /// In-memory databases are pinned to one connection that is never
    /// recycled, otherwise every pooled connection would see its own empty
    /// database.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = if url.contains(":memory:") || url.contains("mode=memory") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:").await
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl QuestionRepository for SqliteStore {
    async fn create(&self, question: NewQuestion) -> Result<i64, StoreError> {
        let [a, b, c, d] = question.choices;
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query(
            "INSERT INTO questions \
             (question_text, choice_a, choice_b, choice_c, choice_d, predicted_answer, explanation) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(question.question_text)
        .bind(a)
        .bind(b)
        .bind(c)
        .bind(d)
        .bind(question.predicted_answer.as_str())
        .bind(question.explanation)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Question, StoreError> {
        let row: Option<QuestionRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(StoreError::NotFound(id))?.try_into()
    }

    async fn list(&self) -> Result<Vec<Question>, StoreError> {
        let rows: Vec<QuestionRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY id DESC"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Question::try_from).collect()
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound(id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update_correction(&self, id: i64, letter: AnswerLetter) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE questions SET user_correction = ? WHERE id = ?")
            .bind(letter.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if updated == 0 {
            return Err(StoreError::NotFound(id));
        }

        tx.commit().await?;
        Ok(())
    }
}
