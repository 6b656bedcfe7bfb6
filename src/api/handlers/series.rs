use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    api::{
        extract::Json,
        models::{
            MessageResponse,
            series::{ListSeriesQuery, SeriesCreate, SeriesEnvelope, SeriesItemResponse, SeriesListResponse, SeriesPatch, SeriesResponse},
            users::CurrentUser,
        },
    },
    db::{
        errors::DbError,
        handlers::{Repository, Series},
    },
    errors::Error,
    types::SeriesId,
};

/// Path ids are taken as raw strings so a malformed UUID behaves like a
/// missing record instead of a routing-level rejection.
fn parse_series_id(raw: &str) -> Result<SeriesId, Error> {
    Uuid::parse_str(raw).map_err(|_| Error::not_found("Series", raw))
}

/// Create a series record for the authenticated user
#[utoipa::path(
    post,
    path = "/api/series",
    request_body = SeriesCreate,
    tag = "series",
    responses(
        (status = 201, description = "Series created", body = SeriesEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 422, description = "Invalid payload"),
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn create_series(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<SeriesCreate>,
) -> Result<(StatusCode, Json<SeriesEnvelope>), Error> {
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Series::new(&mut conn);
    let created = repo.create(&request.into_create_db_request(current_user.id)).await?;

    Ok((
        StatusCode::CREATED,
        Json(SeriesEnvelope {
            message: "Series created successfully".to_string(),
            series: SeriesResponse::from(created),
        }),
    ))
}

/// List the authenticated user's series, with optional filters
#[utoipa::path(
    get,
    path = "/api/series",
    params(ListSeriesQuery),
    tag = "series",
    responses(
        (status = 200, description = "Series list", body = SeriesListResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 422, description = "Invalid status filter"),
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn list_series(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListSeriesQuery>,
) -> Result<Json<SeriesListResponse>, Error> {
    let filter = query.into_filter(current_user.id)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Series::new(&mut conn);
    let series: Vec<SeriesResponse> = repo.list(&filter).await?.into_iter().map(SeriesResponse::from).collect();

    Ok(Json(SeriesListResponse {
        count: series.len(),
        series,
    }))
}

/// Fetch one series record
#[utoipa::path(
    get,
    path = "/api/series/{id}",
    params(("id" = String, Path, description = "Series ID")),
    tag = "series",
    responses(
        (status = 200, description = "Series found", body = SeriesItemResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Series not found"),
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn get_series(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Json<SeriesItemResponse>, Error> {
    let id = parse_series_id(&raw_id)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Series::new(&mut conn);
    let series = repo
        .get_by_id((id, current_user.id))
        .await?
        .ok_or_else(|| Error::not_found("Series", raw_id.as_str()))?;

    Ok(Json(SeriesItemResponse {
        series: SeriesResponse::from(series),
    }))
}

/// Replace a series record (full update, all fields required)
#[utoipa::path(
    put,
    path = "/api/series/{id}",
    params(("id" = String, Path, description = "Series ID")),
    request_body = SeriesCreate,
    tag = "series",
    responses(
        (status = 200, description = "Series updated", body = SeriesEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Series not found"),
        (status = 422, description = "Invalid payload"),
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn update_series(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(raw_id): Path<String>,
    Json(request): Json<SeriesCreate>,
) -> Result<Json<SeriesEnvelope>, Error> {
    let id = parse_series_id(&raw_id)?;
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Series::new(&mut conn);
    let updated = repo
        .update((id, current_user.id), &request.into_update_db_request())
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("Series", raw_id.as_str()),
            other => Error::Database(other),
        })?;

    Ok(Json(SeriesEnvelope {
        message: "Series updated successfully".to_string(),
        series: SeriesResponse::from(updated),
    }))
}

/// Update a subset of fields; omitted fields keep their stored values
#[utoipa::path(
    patch,
    path = "/api/series/{id}",
    params(("id" = String, Path, description = "Series ID")),
    request_body = SeriesPatch,
    tag = "series",
    responses(
        (status = 200, description = "Series updated", body = SeriesEnvelope),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Series not found"),
        (status = 422, description = "Invalid or empty payload"),
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn patch_series(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(raw_id): Path<String>,
    Json(request): Json<SeriesPatch>,
) -> Result<Json<SeriesEnvelope>, Error> {
    let id = parse_series_id(&raw_id)?;

    if request.is_empty() {
        return Err(Error::validation("No fields provided for update"));
    }
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Series::new(&mut conn);
    let updated = repo
        .update_partial((id, current_user.id), &request.into_db_request())
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("Series", raw_id.as_str()),
            other => Error::Database(other),
        })?;

    Ok(Json(SeriesEnvelope {
        message: "Series updated successfully".to_string(),
        series: SeriesResponse::from(updated),
    }))
}

/// Delete a series record
#[utoipa::path(
    delete,
    path = "/api/series/{id}",
    params(("id" = String, Path, description = "Series ID")),
    tag = "series",
    responses(
        (status = 200, description = "Series deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Series not found"),
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(skip_all, fields(user_id = %current_user.id))]
pub async fn delete_series(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, Error> {
    let id = parse_series_id(&raw_id)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Series::new(&mut conn);
    let deleted = repo.delete((id, current_user.id)).await?;

    if !deleted {
        return Err(Error::not_found("Series", raw_id.as_str()));
    }

    Ok(Json(MessageResponse {
        message: "Series deleted successfully".to_string(),
    }))
}
