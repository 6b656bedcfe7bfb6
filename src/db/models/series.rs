//! Database models for series.

use crate::api::models::series::SeriesStatus;
use crate::types::{SeriesId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for creating a new series record
#[derive(Debug, Clone)]
pub struct SeriesCreateDBRequest {
    pub titulo: String,
    pub nota: f64,
    pub numero_temporadas: i32,
    pub episodios_totais: i32,
    pub episodios_assistidos: i32,
    pub status: SeriesStatus,
    pub user_id: UserId,
}

/// Database request for a full replace of a series record
#[derive(Debug, Clone)]
pub struct SeriesUpdateDBRequest {
    pub titulo: String,
    pub nota: f64,
    pub numero_temporadas: i32,
    pub episodios_totais: i32,
    pub episodios_assistidos: i32,
    pub status: SeriesStatus,
}

/// Database request for a partial update; `None` fields keep the stored value
#[derive(Debug, Clone, Default)]
pub struct SeriesPatchDBRequest {
    pub titulo: Option<String>,
    pub nota: Option<f64>,
    pub numero_temporadas: Option<i32>,
    pub episodios_totais: Option<i32>,
    pub episodios_assistidos: Option<i32>,
    pub status: Option<SeriesStatus>,
}

impl SeriesPatchDBRequest {
    pub fn is_empty(&self) -> bool {
        self.titulo.is_none()
            && self.nota.is_none()
            && self.numero_temporadas.is_none()
            && self.episodios_totais.is_none()
            && self.episodios_assistidos.is_none()
            && self.status.is_none()
    }
}

/// Database response for a series record
#[derive(Debug, Clone, FromRow)]
pub struct SeriesDBResponse {
    pub id: SeriesId,
    pub titulo: String,
    pub nota: f64,
    pub numero_temporadas: i32,
    pub episodios_totais: i32,
    pub episodios_assistidos: i32,
    pub status: SeriesStatus,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
