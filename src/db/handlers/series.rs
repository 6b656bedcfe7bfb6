//! Database repository for series records.
//!
//! Every operation is scoped by `(series_id, user_id)` in a single predicate,
//! so records owned by other users behave exactly like missing ones.

use crate::api::models::series::SeriesStatus;
use crate::types::{SeriesId, UserId, abbrev_uuid};
use crate::{
    db::{
        errors::{DbError, Result},
        handlers::repository::Repository,
        models::series::{SeriesCreateDBRequest, SeriesDBResponse, SeriesPatchDBRequest, SeriesUpdateDBRequest},
    },
};
use sqlx::{Connection, PgConnection};
use tracing::instrument;

/// Filter for listing series, always scoped to one user
#[derive(Debug, Clone)]
pub struct SeriesFilter {
    pub user_id: UserId,
    pub status: Option<SeriesStatus>,
    pub nota: Option<f64>,
    pub titulo: Option<String>,
}

impl SeriesFilter {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            status: None,
            nota: None,
            titulo: None,
        }
    }
}

/// Escape LIKE wildcards so a filter value matches literally
fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

pub struct Series<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Series<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Partial update as one read-modify-write unit.
    ///
    /// Locks the row, overlays the provided fields onto the stored values,
    /// re-checks watched <= total against the merged state, then writes. The
    /// row lock keeps the merge consistent under concurrent patches; across
    /// requests the policy stays last-write-wins.
    #[instrument(skip(self, patch), fields(series_id = %abbrev_uuid(&id.0), user_id = %abbrev_uuid(&id.1)), err)]
    pub async fn update_partial(&mut self, id: (SeriesId, UserId), patch: &SeriesPatchDBRequest) -> Result<SeriesDBResponse> {
        let (series_id, user_id) = id;
        let mut tx = self.db.begin().await?;

        let current = sqlx::query_as::<_, SeriesDBResponse>("SELECT * FROM series WHERE id = $1 AND user_id = $2 FOR UPDATE")
            .bind(series_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DbError::NotFound)?;

        let titulo = patch.titulo.clone().unwrap_or(current.titulo);
        let nota = patch.nota.unwrap_or(current.nota);
        let numero_temporadas = patch.numero_temporadas.unwrap_or(current.numero_temporadas);
        let episodios_totais = patch.episodios_totais.unwrap_or(current.episodios_totais);
        let episodios_assistidos = patch.episodios_assistidos.unwrap_or(current.episodios_assistidos);
        let status = patch.status.unwrap_or(current.status);

        // Validate the merged state before touching the row; the database
        // CHECK constraint remains as a backstop.
        if episodios_assistidos > episodios_totais {
            return Err(DbError::CheckViolation {
                constraint: Some("series_progress_check".to_string()),
                table: Some("series".to_string()),
                message: format!("episodios_assistidos ({episodios_assistidos}) exceeds episodios_totais ({episodios_totais})"),
            });
        }

        let updated = sqlx::query_as::<_, SeriesDBResponse>(
            r#"
            UPDATE series
            SET titulo = $3,
                nota = $4,
                numero_temporadas = $5,
                episodios_totais = $6,
                episodios_assistidos = $7,
                status = $8,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(series_id)
        .bind(user_id)
        .bind(&titulo)
        .bind(nota)
        .bind(numero_temporadas)
        .bind(episodios_totais)
        .bind(episodios_assistidos)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Series<'c> {
    type CreateRequest = SeriesCreateDBRequest;
    type UpdateRequest = SeriesUpdateDBRequest;
    type Response = SeriesDBResponse;
    type Id = (SeriesId, UserId);
    type Filter = SeriesFilter;

    #[instrument(skip(self, request), fields(titulo = %request.titulo, user_id = %abbrev_uuid(&request.user_id)), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let series = sqlx::query_as::<_, SeriesDBResponse>(
            r#"
            INSERT INTO series (titulo, nota, numero_temporadas, episodios_totais, episodios_assistidos, status, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&request.titulo)
        .bind(request.nota)
        .bind(request.numero_temporadas)
        .bind(request.episodios_totais)
        .bind(request.episodios_assistidos)
        .bind(request.status)
        .bind(request.user_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(series)
    }

    #[instrument(skip(self), fields(series_id = %abbrev_uuid(&id.0), user_id = %abbrev_uuid(&id.1)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let series = sqlx::query_as::<_, SeriesDBResponse>("SELECT * FROM series WHERE id = $1 AND user_id = $2")
            .bind(id.0)
            .bind(id.1)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(series)
    }

    #[instrument(skip(self, filter), fields(user_id = %abbrev_uuid(&filter.user_id)), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let series = sqlx::query_as::<_, SeriesDBResponse>(
            r#"
            SELECT * FROM series
            WHERE user_id = $1
              AND ($2::series_status IS NULL OR status = $2)
              AND ($3::double precision IS NULL OR nota = $3)
              AND ($4::text IS NULL OR titulo ILIKE '%' || $4 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.status)
        .bind(filter.nota)
        .bind(filter.titulo.as_deref().map(escape_like))
        .fetch_all(&mut *self.db)
        .await?;

        Ok(series)
    }

    #[instrument(skip(self), fields(series_id = %abbrev_uuid(&id.0), user_id = %abbrev_uuid(&id.1)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM series WHERE id = $1 AND user_id = $2")
            .bind(id.0)
            .bind(id.1)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(series_id = %abbrev_uuid(&id.0), user_id = %abbrev_uuid(&id.1)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let series = sqlx::query_as::<_, SeriesDBResponse>(
            r#"
            UPDATE series
            SET titulo = $3,
                nota = $4,
                numero_temporadas = $5,
                episodios_totais = $6,
                episodios_assistidos = $7,
                status = $8,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id.0)
        .bind(id.1)
        .bind(&request.titulo)
        .bind(request.nota)
        .bind(request.numero_temporadas)
        .bind(request.episodios_totais)
        .bind(request.episodios_assistidos)
        .bind(request.status)
        .fetch_optional(&mut *self.db)
        .await?;

        series.ok_or(DbError::NotFound)
    }
}
