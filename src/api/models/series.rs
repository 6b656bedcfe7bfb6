//! API models and input validation for series records.
//!
//! The wire format keeps the Portuguese camelCase field names (`titulo`,
//! `numeroTemporadas`, `episodiosTotais`, `episodiosAssistidos`, ...) used by
//! existing clients; only the error messages are English.

use crate::db::handlers::series::SeriesFilter;
use crate::db::models::series::{SeriesCreateDBRequest, SeriesDBResponse, SeriesPatchDBRequest, SeriesUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::{SeriesId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

pub const MAX_TITULO_LEN: usize = 200;

/// Watch status of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "series_status", rename_all = "lowercase")]
pub enum SeriesStatus {
    Planejado,
    Assistindo,
    Concluido,
}

impl FromStr for SeriesStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "planejado" => Ok(SeriesStatus::Planejado),
            "assistindo" => Ok(SeriesStatus::Assistindo),
            "concluido" => Ok(SeriesStatus::Concluido),
            _ => Err(Error::validation("Invalid status. Allowed values: planejado, assistindo, concluido")),
        }
    }
}

/// Full series payload, used by create and full update (PUT). All fields are
/// required on both paths.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeriesCreate {
    pub titulo: String,
    pub nota: f64,
    pub numero_temporadas: i32,
    pub episodios_totais: i32,
    pub episodios_assistidos: i32,
    pub status: SeriesStatus,
}

impl SeriesCreate {
    /// Field-level and cross-field validation on the full payload.
    pub fn validate(&self) -> Result<()> {
        let titulo = self.titulo.trim();
        // Character count, not byte length; accented titles are the norm here
        if titulo.is_empty() || titulo.chars().count() > MAX_TITULO_LEN {
            return Err(Error::validation("Title must be between 1 and 200 characters"));
        }
        // The range check also rejects NaN
        if !(0.0..=10.0).contains(&self.nota) {
            return Err(Error::validation("Rating must be between 0 and 10"));
        }
        if self.numero_temporadas < 1 {
            return Err(Error::validation("Number of seasons must be at least 1"));
        }
        if self.episodios_totais < 1 {
            return Err(Error::validation("Total episodes must be at least 1"));
        }
        if self.episodios_assistidos < 0 {
            return Err(Error::validation("Watched episodes cannot be negative"));
        }
        if self.episodios_assistidos > self.episodios_totais {
            return Err(Error::validation("Watched episodes cannot exceed total episodes"));
        }
        Ok(())
    }

    pub fn into_create_db_request(self, user_id: UserId) -> SeriesCreateDBRequest {
        SeriesCreateDBRequest {
            titulo: self.titulo.trim().to_string(),
            nota: self.nota,
            numero_temporadas: self.numero_temporadas,
            episodios_totais: self.episodios_totais,
            episodios_assistidos: self.episodios_assistidos,
            status: self.status,
            user_id,
        }
    }

    pub fn into_update_db_request(self) -> SeriesUpdateDBRequest {
        SeriesUpdateDBRequest {
            titulo: self.titulo.trim().to_string(),
            nota: self.nota,
            numero_temporadas: self.numero_temporadas,
            episodios_totais: self.episodios_totais,
            episodios_assistidos: self.episodios_assistidos,
            status: self.status,
        }
    }
}

/// Partial series payload (PATCH); omitted fields keep their stored values
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesPatch {
    pub titulo: Option<String>,
    pub nota: Option<f64>,
    pub numero_temporadas: Option<i32>,
    pub episodios_totais: Option<i32>,
    pub episodios_assistidos: Option<i32>,
    pub status: Option<SeriesStatus>,
}

impl SeriesPatch {
    /// Per-field validation. The watched/total cross-check against stored
    /// values happens in the repository after the merge; only the case where
    /// both fields arrive together can be rejected here.
    pub fn validate(&self) -> Result<()> {
        if let Some(titulo) = &self.titulo {
            let titulo = titulo.trim();
            if titulo.is_empty() || titulo.chars().count() > MAX_TITULO_LEN {
                return Err(Error::validation("Title must be between 1 and 200 characters"));
            }
        }
        if let Some(nota) = self.nota {
            if !(0.0..=10.0).contains(&nota) {
                return Err(Error::validation("Rating must be between 0 and 10"));
            }
        }
        if let Some(n) = self.numero_temporadas {
            if n < 1 {
                return Err(Error::validation("Number of seasons must be at least 1"));
            }
        }
        if let Some(n) = self.episodios_totais {
            if n < 1 {
                return Err(Error::validation("Total episodes must be at least 1"));
            }
        }
        if let Some(n) = self.episodios_assistidos {
            if n < 0 {
                return Err(Error::validation("Watched episodes cannot be negative"));
            }
        }
        if let (Some(assistidos), Some(totais)) = (self.episodios_assistidos, self.episodios_totais) {
            if assistidos > totais {
                return Err(Error::validation("Watched episodes cannot exceed total episodes"));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.titulo.is_none()
            && self.nota.is_none()
            && self.numero_temporadas.is_none()
            && self.episodios_totais.is_none()
            && self.episodios_assistidos.is_none()
            && self.status.is_none()
    }

    pub fn into_db_request(self) -> SeriesPatchDBRequest {
        SeriesPatchDBRequest {
            titulo: self.titulo.map(|t| t.trim().to_string()),
            nota: self.nota,
            numero_temporadas: self.numero_temporadas,
            episodios_totais: self.episodios_totais,
            episodios_assistidos: self.episodios_assistidos,
            status: self.status,
        }
    }
}

/// List query parameters. `nota` arrives as a string so an unparsable or
/// out-of-range value can be silently ignored instead of rejecting the
/// request, which is the behavior existing clients rely on.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[serde(default)]
pub struct ListSeriesQuery {
    pub status: Option<String>,
    pub titulo: Option<String>,
    pub nota: Option<String>,
}

impl ListSeriesQuery {
    pub fn into_filter(self, user_id: UserId) -> Result<SeriesFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<SeriesStatus>()?),
        };

        let nota = self
            .nota
            .as_deref()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|n| (0.0..=10.0).contains(n));

        let titulo = self.titulo.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());

        Ok(SeriesFilter {
            user_id,
            status,
            nota,
            titulo,
        })
    }
}

/// Public view of a series record
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResponse {
    #[schema(value_type = Uuid)]
    pub id: SeriesId,
    pub titulo: String,
    pub nota: f64,
    pub numero_temporadas: i32,
    pub episodios_totais: i32,
    pub episodios_assistidos: i32,
    pub status: SeriesStatus,
    #[schema(value_type = Uuid)]
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SeriesDBResponse> for SeriesResponse {
    fn from(series: SeriesDBResponse) -> Self {
        Self {
            id: series.id,
            titulo: series.titulo,
            nota: series.nota,
            numero_temporadas: series.numero_temporadas,
            episodios_totais: series.episodios_totais,
            episodios_assistidos: series.episodios_assistidos,
            status: series.status,
            user_id: series.user_id,
            created_at: series.created_at,
            updated_at: series.updated_at,
        }
    }
}

/// `{message, series}` envelope for create and both update paths
#[derive(Debug, Serialize, ToSchema)]
pub struct SeriesEnvelope {
    pub message: String,
    pub series: SeriesResponse,
}

/// `{count, series}` envelope for listing
#[derive(Debug, Serialize, ToSchema)]
pub struct SeriesListResponse {
    pub count: usize,
    pub series: Vec<SeriesResponse>,
}

/// `{series}` envelope for a single fetch
#[derive(Debug, Serialize, ToSchema)]
pub struct SeriesItemResponse {
    pub series: SeriesResponse,
}
