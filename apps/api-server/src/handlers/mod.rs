//! HTTP handlers and route configuration.

mod app;
mod auth;
mod comments;
mod history;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/status", web::get().to(app::get_status))
        .route("/stats", web::get().to(app::get_stats))
        .route("/auth/register", web::post().to(auth::register))
        .route("/auth/login", web::post().to(auth::login))
        .route("/posts", web::get().to(posts::list_posts))
        .route(
            "/posts/{post_id}/comments",
            web::get().to(comments::list_comments),
        )
        // Authenticated routes - the Identity extractor rejects requests
        // without a valid bearer token
        .route("/posts", web::post().to(posts::create_post))
        .route("/posts/{id}", web::put().to(posts::update_post))
        .route("/posts/{id}", web::delete().to(posts::delete_post))
        .route("/comments", web::post().to(comments::add_comment))
        .route(
            "/users/reading-history",
            web::post().to(history::add_to_history),
        )
        .route(
            "/users/reading-history",
            web::get().to(history::get_history),
        );
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use bson::oid::ObjectId;

    use blogspot_core::ports::{PasswordService, TokenService};
    use blogspot_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

    pub fn token_service() -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "test".to_string(),
        }))
    }

    pub fn password_service() -> Arc<dyn PasswordService> {
        Arc::new(Argon2PasswordService::new())
    }

    /// Authorization header for a signed test token.
    pub fn bearer(user_id: ObjectId) -> (&'static str, String) {
        let token = token_service().generate_token(user_id).unwrap();
        ("Authorization", format!("Bearer {token}"))
    }
}
