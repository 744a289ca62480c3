//! Reading-history handlers. Both endpoints act on the user identified by
//! the bearer token.

use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use bson::oid::ObjectId;
use chrono::Utc;

use blogspot_shared::MessageResponse;
use blogspot_shared::dto::{AddHistoryRequest, HistoryItem};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// How many entries GET /users/reading-history returns.
const HISTORY_LIMIT: u64 = 20;

/// POST /users/reading-history - record (or refresh) a read.
pub async fn add_to_history(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<AddHistoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.post_id.is_empty() {
        return Err(AppError::BadRequest("Missing postId".to_string()));
    }
    let post_id = ObjectId::parse_str(&req.post_id)
        .map_err(|_| AppError::BadRequest("Invalid post id".to_string()))?;

    // Re-reading a post refreshes its timestamp instead of duplicating the
    // entry
    state
        .history
        .upsert(identity.user_id, post_id, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Added to reading history")))
}

/// GET /users/reading-history - the 20 most recent reads joined against
/// their posts. Entries whose post has since been deleted are skipped.
pub async fn get_history(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let entries = state
        .history
        .recent_for_user(identity.user_id, HISTORY_LIMIT)
        .await?;

    let post_ids: Vec<ObjectId> = entries.iter().map(|e| e.post_id).collect();
    let posts: HashMap<ObjectId, _> = state
        .posts
        .find_by_ids(&post_ids)
        .await?
        .into_iter()
        .filter_map(|post| post.id.map(|id| (id, post)))
        .collect();

    let items: Vec<HistoryItem> = entries
        .into_iter()
        .filter_map(|entry| {
            posts.get(&entry.post_id).map(|post| HistoryItem {
                post_id: entry.post_id.to_hex(),
                read_at: entry.read_at,
                title: post.title.clone(),
                header_image: post.header_image.clone(),
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(items))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use bson::oid::ObjectId;
    use serde_json::json;

    use blogspot_core::domain::Post;
    use blogspot_shared::dto::HistoryItem;

    use crate::handlers::{configure_routes, test_support};
    use crate::state::AppState;

    macro_rules! history_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .app_data(web::Data::new(test_support::token_service()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    async fn seed_post(state: &AppState, title: &str) -> ObjectId {
        state
            .posts
            .insert(Post::new(
                ObjectId::new(),
                title.to_string(),
                "body".to_string(),
            ))
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn history_endpoints_require_auth() {
        let dir = tempfile::tempdir().unwrap();
        let app = history_app!(AppState::in_memory(dir.path()));

        let post = test::TestRequest::post()
            .uri("/users/reading-history")
            .set_json(json!({ "postId": ObjectId::new().to_hex() }))
            .to_request();
        assert_eq!(
            test::call_service(&app, post).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let get = test::TestRequest::get()
            .uri("/users/reading-history")
            .to_request();
        assert_eq!(
            test::call_service(&app, get).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn add_rejects_missing_post_id() {
        let dir = tempfile::tempdir().unwrap();
        let app = history_app!(AppState::in_memory(dir.path()));

        let req = test::TestRequest::post()
            .uri("/users/reading-history")
            .insert_header(test_support::bearer(ObjectId::new()))
            .set_json(json!({ "postId": "" }))
            .to_request();

        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[actix_web::test]
    async fn history_round_trip_joins_post_fields() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::in_memory(dir.path());
        let reader = ObjectId::new();
        let post_id = seed_post(&state, "an article").await;
        let app = history_app!(state);

        let add = test::TestRequest::post()
            .uri("/users/reading-history")
            .insert_header(test_support::bearer(reader))
            .set_json(json!({ "postId": post_id.to_hex() }))
            .to_request();
        assert_eq!(test::call_service(&app, add).await.status(), StatusCode::OK);

        let get = test::TestRequest::get()
            .uri("/users/reading-history")
            .insert_header(test_support::bearer(reader))
            .to_request();
        let items: Vec<HistoryItem> = test::call_and_read_body_json(&app, get).await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].post_id, post_id.to_hex());
        assert_eq!(items[0].title, "an article");
    }

    #[actix_web::test]
    async fn rereading_refreshes_instead_of_duplicating() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::in_memory(dir.path());
        let reader = ObjectId::new();
        let post_id = seed_post(&state, "an article").await;
        let app = history_app!(state);

        for _ in 0..2 {
            let add = test::TestRequest::post()
                .uri("/users/reading-history")
                .insert_header(test_support::bearer(reader))
                .set_json(json!({ "postId": post_id.to_hex() }))
                .to_request();
            test::call_service(&app, add).await;
        }

        let get = test::TestRequest::get()
            .uri("/users/reading-history")
            .insert_header(test_support::bearer(reader))
            .to_request();
        let items: Vec<HistoryItem> = test::call_and_read_body_json(&app, get).await;

        assert_eq!(items.len(), 1);
    }

    #[actix_web::test]
    async fn deleted_posts_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::in_memory(dir.path());
        let reader = ObjectId::new();
        let kept = seed_post(&state, "kept").await;
        let doomed = seed_post(&state, "doomed").await;
        let app = history_app!(state.clone());

        for id in [kept, doomed] {
            let add = test::TestRequest::post()
                .uri("/users/reading-history")
                .insert_header(test_support::bearer(reader))
                .set_json(json!({ "postId": id.to_hex() }))
                .to_request();
            test::call_service(&app, add).await;
        }
        state.posts.delete(doomed).await.unwrap();

        let get = test::TestRequest::get()
            .uri("/users/reading-history")
            .insert_header(test_support::bearer(reader))
            .to_request();
        let items: Vec<HistoryItem> = test::call_and_read_body_json(&app, get).await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "kept");
    }

    #[actix_web::test]
    async fn history_is_scoped_to_the_token_user() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::in_memory(dir.path());
        let reader = ObjectId::new();
        let post_id = seed_post(&state, "an article").await;
        let app = history_app!(state);

        let add = test::TestRequest::post()
            .uri("/users/reading-history")
            .insert_header(test_support::bearer(reader))
            .set_json(json!({ "postId": post_id.to_hex() }))
            .to_request();
        test::call_service(&app, add).await;

        let get = test::TestRequest::get()
            .uri("/users/reading-history")
            .insert_header(test_support::bearer(ObjectId::new()))
            .to_request();
        let items: Vec<HistoryItem> = test::call_and_read_body_json(&app, get).await;

        assert!(items.is_empty());
    }
}
