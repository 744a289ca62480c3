//! Comment handlers.

use actix_web::{HttpResponse, web};
use bson::oid::ObjectId;

use blogspot_core::domain::Comment;
use blogspot_shared::dto::{
    AddCommentRequest, CommentCreated, CommentPage, CommentView, PageQuery, total_pages,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn comment_view(comment: Comment) -> CommentView {
    CommentView {
        id: comment.id.map(|id| id.to_hex()).unwrap_or_default(),
        post_id: comment.post_id.to_hex(),
        user_id: comment.user_id.to_hex(),
        content: comment.content,
        created_at: comment.created_at,
    }
}

/// POST /comments - the commenting user comes from the bearer token.
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<AddCommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    if req.post_id.is_empty() || req.content.trim().is_empty() {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }
    let post_id = ObjectId::parse_str(&req.post_id)
        .map_err(|_| AppError::BadRequest("Invalid post id".to_string()))?;

    // Comments never attach to posts that do not exist
    if state.posts.find_by_id(post_id).await?.is_none() {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    let comment = Comment::new(post_id, identity.user_id, req.content.clone());
    let id = state.comments.insert(comment).await?;

    Ok(HttpResponse::Created().json(CommentCreated {
        id: id.to_hex(),
        content: req.content,
    }))
}

/// GET /posts/{post_id}/comments
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let post_id = ObjectId::parse_str(path.as_str())
        .map_err(|_| AppError::BadRequest("Invalid post id".to_string()))?;

    let page = query.page();
    let limit = query.limit();

    let comments = state
        .comments
        .list_for_post(post_id, query.skip(), limit)
        .await?;
    let total = state.comments.count_for_post(post_id).await?;

    Ok(HttpResponse::Ok().json(CommentPage {
        comments: comments.into_iter().map(comment_view).collect(),
        current_page: page,
        total_pages: total_pages(total, limit),
        total_comments: total,
    }))
}
