//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use blogspot_core::domain::User;
use blogspot_core::ports::{PasswordService, TokenService};
use blogspot_shared::dto::{AuthResponse, LoginRequest, RegisterRequest, RegisteredUser};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    state: web::Data<AppState>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.username.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password_service.hash(&req.password)?;

    let user = User::new(req.username.clone(), req.email.clone(), password_hash);
    let id = state.users.insert(user).await?;

    Ok(HttpResponse::Created().json(RegisteredUser {
        id: id.to_hex(),
        username: req.username,
        email: req.email,
    }))
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest("Missing email or password".to_string()));
    }

    // Unknown email and wrong password answer identically
    let Some(user) = state.users.find_by_email(&req.email).await? else {
        return Err(AppError::Unauthorized);
    };

    if !password_service.verify(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let user_id = user
        .id
        .ok_or_else(|| AppError::Internal("Stored user is missing its id".to_string()))?;
    let token = token_service.generate_token(user_id)?;

    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::json;

    use blogspot_shared::dto::{AuthResponse, RegisteredUser};

    use crate::handlers::{configure_routes, test_support};
    use crate::state::AppState;

    macro_rules! auth_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .app_data(web::Data::new(test_support::token_service()))
                    .app_data(web::Data::new(test_support::password_service()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn register_returns_user_without_password() {
        let dir = tempfile::tempdir().unwrap();
        let app = auth_app!(AppState::in_memory(dir.path()));

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "hunter22"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let raw = test::read_body(resp).await;
        assert!(!String::from_utf8_lossy(&raw).contains("password"));

        let body: RegisteredUser = serde_json::from_slice(&raw).unwrap();
        assert!(!body.id.is_empty());
        assert_eq!(body.username, "alice");
        assert_eq!(body.email, "alice@example.com");
    }

    #[actix_web::test]
    async fn register_rejects_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let app = auth_app!(AppState::in_memory(dir.path()));

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "username": "",
                "email": "alice@example.com",
                "password": "hunter22"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn register_rejects_duplicate_email() {
        let dir = tempfile::tempdir().unwrap();
        let app = auth_app!(AppState::in_memory(dir.path()));

        let payload = json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "hunter22"
        });

        let first = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(&payload)
            .to_request();
        assert_eq!(
            test::call_service(&app, first).await.status(),
            StatusCode::CREATED
        );

        let second = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(&payload)
            .to_request();
        assert_eq!(
            test::call_service(&app, second).await.status(),
            StatusCode::CONFLICT
        );
    }

    #[actix_web::test]
    async fn login_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let app = auth_app!(AppState::in_memory(dir.path()));

        let register = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "username": "bob",
                "email": "bob@example.com",
                "password": "correct-password"
            }))
            .to_request();
        test::call_service(&app, register).await;

        let login = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({
                "email": "bob@example.com",
                "password": "correct-password"
            }))
            .to_request();
        let resp = test::call_service(&app, login).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: AuthResponse = test::read_body_json(resp).await;
        assert!(!body.token.is_empty());
    }

    #[actix_web::test]
    async fn login_rejects_bad_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let app = auth_app!(AppState::in_memory(dir.path()));

        let register = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "username": "bob",
                "email": "bob@example.com",
                "password": "correct-password"
            }))
            .to_request();
        test::call_service(&app, register).await;

        let wrong_password = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({
                "email": "bob@example.com",
                "password": "wrong-password"
            }))
            .to_request();
        assert_eq!(
            test::call_service(&app, wrong_password).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let unknown_email = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({
                "email": "nobody@example.com",
                "password": "correct-password"
            }))
            .to_request();
        assert_eq!(
            test::call_service(&app, unknown_email).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
