//! Application status and statistics handlers.

use actix_web::{HttpResponse, web};

use blogspot_shared::dto::{StatsResponse, StatusResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /status - liveness of the persistence and cache gateways.
pub async fn get_status(state: web::Data<AppState>) -> HttpResponse {
    let redis = state.cache.is_alive().await;
    let db = state.db_alive().await;

    HttpResponse::Ok().json(StatusResponse { redis, db })
}

/// GET /stats - aggregate user and post counts.
pub async fn get_stats(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state.users.count().await?;
    let posts = state.posts.count().await?;

    Ok(HttpResponse::Ok().json(StatsResponse { users, posts }))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use bson::oid::ObjectId;

    use blogspot_core::domain::{Post, User};
    use blogspot_shared::dto::{StatsResponse, StatusResponse};

    use crate::handlers::{configure_routes, test_support};
    use crate::state::AppState;

    #[actix_web::test]
    async fn status_reports_both_gateways() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::in_memory(dir.path());

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(test_support::token_service()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/status").to_request();
        let body: StatusResponse = test::call_and_read_body_json(&app, req).await;

        assert!(body.redis);
        assert!(body.db);
    }

    #[actix_web::test]
    async fn stats_counts_users_and_posts() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::in_memory(dir.path());

        state
            .users
            .insert(User::new(
                "alice".to_string(),
                "alice@example.com".to_string(),
                "hash".to_string(),
            ))
            .await
            .unwrap();
        for i in 0..3 {
            state
                .posts
                .insert(Post::new(
                    ObjectId::new(),
                    format!("post {i}"),
                    "body".to_string(),
                ))
                .await
                .unwrap();
        }

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(web::Data::new(test_support::token_service()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/stats").to_request();
        let body: StatsResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.users, 1);
        assert_eq!(body.posts, 3);
    }
}
