use axum::{extract::State, http::StatusCode};

use crate::{
    AppState,
    api::{
        extract::Json,
        models::{
            auth::{LoginRequest, LoginResponse, ProtectedResponse, RegisterRequest, RegisterResponse, normalize_email},
            users::{CurrentUser, UserResponse},
        },
    },
    auth::{password, session},
    db::{handlers::Users, models::users::UserCreateDBRequest},
    errors::Error,
};

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    tag = "auth",
    responses(
        (status = 201, description = "User registered successfully", body = RegisterResponse),
        (status = 422, description = "Invalid input or email already registered"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Json(request): Json<RegisterRequest>) -> Result<(StatusCode, Json<RegisterResponse>), Error> {
    request.validate()?;

    let name = request.name.trim().to_string();
    let email = normalize_email(&request.email);

    // Hash on a blocking thread, before any pool connection is taken
    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string(&password))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut tx);

    // Pre-check for a friendly message; the unique constraint still catches
    // races and maps to the same status.
    if user_repo.get_user_by_email(&email).await?.is_some() {
        return Err(Error::validation("An account with this email address already exists"));
    }

    let created_user = user_repo
        .create(&UserCreateDBRequest {
            name,
            email,
            password_hash,
        })
        .await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user: UserResponse::from(created_user),
        }),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    tag = "auth",
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 422, description = "Missing email or password"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, Error> {
    request.validate()?;

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut pool_conn);

    // Uniform failure for unknown email and wrong password, no account enumeration
    let user = user_repo
        .get_user_by_email(&normalize_email(&request.email))
        .await?
        .ok_or_else(|| Error::Unauthenticated {
            message: Some("Invalid email or password".to_string()),
        })?;

    // Verify password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(Error::Unauthenticated {
            message: Some("Invalid email or password".to_string()),
        });
    }

    let current_user = CurrentUser {
        id: user.id,
        email: user.email.clone(),
    };
    let token = session::create_session_token(&current_user, &state.config)?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: UserResponse::from(user),
    }))
}

/// Identity echo for bearer-authenticated clients
#[utoipa::path(
    get,
    path = "/api/protected",
    tag = "auth",
    responses(
        (status = 200, description = "Access granted", body = ProtectedResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(
        ("bearer_token" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn protected(current_user: CurrentUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "Access granted to protected route".to_string(),
        user: current_user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum_test::TestServer;
    use serde_json::json;
    use sqlx::PgPool;

    fn test_config() -> Config {
        Config {
            secret_key: Some("test-secret-key".to_string()),
            ..Default::default()
        }
    }

    fn test_server(pool: PgPool) -> TestServer {
        let state = AppState::builder().db(pool).config(test_config()).build();
        TestServer::new(crate::build_router(state)).unwrap()
    }

    #[sqlx::test]
    async fn test_register_success_never_returns_password(pool: PgPool) {
        let server = test_server(pool);

        let response = server
            .post("/api/register")
            .json(&json!({
                "name": "Ana Silva",
                "email": "Ana@Example.com",
                "password": "Str0ng!pass"
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "User created successfully");
        assert_eq!(body["user"]["email"], "ana@example.com");
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("passwordHash").is_none());
        assert!(body["user"].get("password_hash").is_none());
    }

    #[sqlx::test]
    async fn test_register_duplicate_email(pool: PgPool) {
        let server = test_server(pool);

        let payload = json!({
            "name": "Ana Silva",
            "email": "ana@example.com",
            "password": "Str0ng!pass"
        });
        server.post("/api/register").json(&payload).await.assert_status(axum::http::StatusCode::CREATED);

        let response = server.post("/api/register").json(&payload).await;
        response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "An account with this email address already exists");
    }

    #[sqlx::test]
    async fn test_register_missing_field_keeps_the_message_envelope(pool: PgPool) {
        let server = test_server(pool);

        let response = server
            .post("/api/register")
            .json(&json!({ "name": "Ana Silva", "email": "ana@example.com" }))
            .await;

        response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = response.json();
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[sqlx::test]
    async fn test_register_weak_password(pool: PgPool) {
        let server = test_server(pool);

        let response = server
            .post("/api/register")
            .json(&json!({
                "name": "Ana Silva",
                "email": "ana@example.com",
                "password": "weakpass"
            }))
            .await;

        response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[sqlx::test]
    async fn test_login_success_and_wrong_password(pool: PgPool) {
        let server = test_server(pool);

        server
            .post("/api/register")
            .json(&json!({
                "name": "Ana Silva",
                "email": "ana@example.com",
                "password": "Str0ng!pass"
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let response = server
            .post("/api/login")
            .json(&json!({ "email": "ana@example.com", "password": "Str0ng!pass" }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Login successful");
        assert!(!body["token"].as_str().unwrap().is_empty());
        assert_eq!(body["user"]["name"], "Ana Silva");

        let response = server
            .post("/api/login")
            .json(&json!({ "email": "ana@example.com", "password": "Wrong!pass1" }))
            .await;
        response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Invalid email or password");
    }

    #[sqlx::test]
    async fn test_login_unknown_email_is_401(pool: PgPool) {
        let server = test_server(pool);

        let response = server
            .post("/api/login")
            .json(&json!({ "email": "ghost@example.com", "password": "Str0ng!pass" }))
            .await;
        response.assert_status(axum::http::StatusCode::UNAUTHORIZED);
        // Same message as a wrong password
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Invalid email or password");
    }

    #[sqlx::test]
    async fn test_protected_roundtrip(pool: PgPool) {
        let server = test_server(pool);

        server
            .post("/api/register")
            .json(&json!({
                "name": "Ana Silva",
                "email": "ana@example.com",
                "password": "Str0ng!pass"
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);

        let login: serde_json::Value = server
            .post("/api/login")
            .json(&json!({ "email": "ana@example.com", "password": "Str0ng!pass" }))
            .await
            .json();
        let token = login["token"].as_str().unwrap().to_string();

        let response = server
            .get("/api/protected")
            .add_header("authorization", format!("Bearer {token}"))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["user"]["email"], "ana@example.com");

        // No token at all
        server.get("/api/protected").await.assert_status(axum::http::StatusCode::UNAUTHORIZED);
    }
}
