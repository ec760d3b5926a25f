//! Document repository implementation.
//!
//! The coordinator owns sequencing; this repository only ever writes
//! within a transaction handle the coordinator passes down, so the
//! `_tx` variants are the primary API and pool-backed variants exist
//! for reads outside a pipeline run.

use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use landai_core::{
    defaults, Document, DocumentSummary, Error, NewDocument, Result,
};

/// Column list shared by every query that materializes a full [`Document`].
const DOCUMENT_COLUMNS: &str = "id, user_id, conversation_id, filename, file_type, file_size, \
     storage_location, full_text, extracted_data, upload_date";

/// PostgreSQL implementation of document persistence.
#[derive(Clone)]
pub struct PgDocumentRepository {
    pool: PgPool,
}

fn document_from_row(row: &PgRow) -> Result<Document> {
    let extracted: Option<JsonValue> = row.try_get("extracted_data")?;
    let extracted_data = match extracted {
        Some(value) => Some(serde_json::from_value(value).map_err(|e| {
            Error::Serialization(format!("stored extracted_data is not valid lease terms: {}", e))
        })?),
        None => None,
    };

    Ok(Document {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        conversation_id: row.try_get("conversation_id")?,
        filename: row.try_get("filename")?,
        file_type: row.try_get("file_type")?,
        file_size: row.try_get("file_size")?,
        storage_location: row.try_get("storage_location")?,
        full_text: row.try_get("full_text")?,
        extracted_data,
        upload_date: row.try_get("upload_date")?,
    })
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the metadata row for a freshly uploaded document.
    ///
    /// Runs before any AI call; text and terms stay NULL until
    /// [`Self::set_extraction_tx`] completes. The row survives pipeline
    /// fallbacks so the user always sees their file was received.
    pub async fn insert_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        req: &NewDocument,
    ) -> Result<Document> {
        let id = Uuid::now_v7();
        let sql = format!(
            "INSERT INTO documents \
                 (id, user_id, conversation_id, filename, file_type, file_size, storage_location) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {DOCUMENT_COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .bind(req.user_id)
            .bind(req.conversation_id)
            .bind(&req.filename)
            .bind(&req.file_type)
            .bind(req.file_size)
            .bind(defaults::TRANSIENT_STORAGE)
            .fetch_one(&mut **tx)
            .await
            .map_err(Error::Database)?;

        document_from_row(&row)
    }

    /// Persist extraction output: one combined update so `full_text` and
    /// `extracted_data` are set together or not at all.
    pub async fn set_extraction_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        full_text: &str,
        terms: &landai_core::ExtractedLeaseTerms,
    ) -> Result<()> {
        let terms_json = serde_json::to_value(terms)?;

        let result = sqlx::query(
            "UPDATE documents SET full_text = $2, extracted_data = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(full_text)
        .bind(terms_json)
        .execute(&mut **tx)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Document {} not found", id)));
        }
        Ok(())
    }

    /// Fetch a document scoped to its owner, within a transaction.
    ///
    /// A document belonging to another user is reported as not-found, not
    /// as forbidden, so the response leaks nothing about existence.
    pub async fn fetch_owned_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Document> {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1 AND user_id = $2"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(Error::Database)?;

        match row {
            Some(row) => document_from_row(&row),
            None => Err(Error::NotFound(format!("Document {} not found", id))),
        }
    }

    /// Fetch a document scoped to its owner.
    pub async fn fetch_owned(&self, user_id: Uuid, id: Uuid) -> Result<Document> {
        let sql = format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1 AND user_id = $2"
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        match row {
            Some(row) => document_from_row(&row),
            None => Err(Error::NotFound(format!("Document {} not found", id))),
        }
    }

    /// List a user's uploaded documents, newest first.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<DocumentSummary>> {
        let rows = sqlx::query(
            "SELECT id, filename, file_type, file_size, upload_date \
             FROM documents WHERE user_id = $1 ORDER BY upload_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter()
            .map(|row| {
                Ok(DocumentSummary {
                    id: row.try_get("id")?,
                    filename: row.try_get("filename")?,
                    file_type: row.try_get("file_type")?,
                    file_size: row.try_get("file_size")?,
                    upload_date: row.try_get("upload_date")?,
                })
            })
            .collect()
    }

    /// Delete a user's document. Messages referencing it keep their row
    /// (`document_id` becomes NULL via the FK).
    pub async fn delete_owned(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Document {} not found", id)));
        }
        Ok(())
    }
}
