//! Post handlers - CRUD plus the read-through listing cache.
//!
//! Listing pages are cached under a revision-stamped key
//! (`posts:v<rev>:<page>:<limit>`). Any successful write bumps the revision
//! counter, which orphans every cached page at once; the old entries age out
//! on their TTL. This avoids enumerating page/limit combinations on
//! invalidation.

use std::time::Duration;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::{HttpResponse, web};
use bson::oid::ObjectId;

use blogspot_core::domain::{Post, PostPatch};
use blogspot_core::ports::Cache;
use blogspot_infra::markdown::render_markdown;
use blogspot_shared::MessageResponse;
use blogspot_shared::dto::{PageQuery, PostCreated, PostPage, PostView, UpdatePostRequest, total_pages};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// How long a cached listing page may serve reads.
const POST_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Revision counter behind the page keys.
const POST_CACHE_REV_KEY: &str = "posts:rev";

fn post_page_key(rev: i64, page: u64, limit: u64) -> String {
    format!("posts:v{rev}:{page}:{limit}")
}

async fn current_revision(cache: &dyn Cache) -> i64 {
    match cache.get(POST_CACHE_REV_KEY).await {
        Some(value) => value.parse().unwrap_or(0),
        None => 0,
    }
}

/// Bump the revision. A cache that cannot be invalidated must not fail the
/// write that triggered the bump, so errors only log.
async fn invalidate_post_cache(cache: &dyn Cache) {
    if let Err(e) = cache.incr(POST_CACHE_REV_KEY).await {
        tracing::warn!(error = %e, "Failed to invalidate post cache");
    }
}

fn post_view(post: Post) -> PostView {
    PostView {
        id: post.id.map(|id| id.to_hex()).unwrap_or_default(),
        user_id: post.user_id.to_hex(),
        title: post.title,
        content: post.content,
        content_html: post.content_html,
        header_image: post.header_image,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn parse_post_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid post id".to_string()))
}

/// Random name keeping only a sanitized extension; uploads never keep
/// client-supplied names.
fn upload_file_name(original: Option<&str>) -> String {
    let stem = ObjectId::new().to_hex();
    let ext = original
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        });

    match ext {
        Some(ext) => format!("{stem}.{}", ext.to_ascii_lowercase()),
        None => stem,
    }
}

/// Multipart body of POST /posts.
#[derive(Debug, MultipartForm)]
pub struct CreatePostForm {
    pub title: Option<Text<String>>,
    pub content: Option<Text<String>>,
    #[multipart(rename = "userId")]
    pub user_id: Option<Text<String>>,
    #[multipart(rename = "renderMarkdown")]
    pub render_markdown: Option<Text<bool>>,
    #[multipart(rename = "headerImage", limit = "10MB")]
    pub header_image: Option<TempFile>,
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    _identity: Identity,
    MultipartForm(form): MultipartForm<CreatePostForm>,
) -> AppResult<HttpResponse> {
    let title = form.title.map(|t| t.into_inner()).unwrap_or_default();
    let content = form.content.map(|t| t.into_inner()).unwrap_or_default();
    let user_id = form.user_id.map(|t| t.into_inner()).unwrap_or_default();

    if title.is_empty() || content.is_empty() || user_id.is_empty() {
        return Err(AppError::BadRequest("Missing required fields".to_string()));
    }
    let user_id = ObjectId::parse_str(&user_id)
        .map_err(|_| AppError::BadRequest("Invalid userId".to_string()))?;

    let mut post = Post::new(user_id, title, content);
    if form
        .render_markdown
        .map(|t| t.into_inner())
        .unwrap_or(false)
    {
        post.content_html = Some(render_markdown(&post.content));
    }

    // The image lands on disk before the insert so a failed insert can
    // remove it instead of leaving an orphaned upload behind.
    if let Some(image) = form.header_image {
        let file_name = upload_file_name(image.file_name.as_deref());
        let public_path = state
            .uploads
            .store(image.file.path(), &file_name)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {e}")))?;
        post.header_image = Some(public_path);
    }

    let created = PostCreated {
        id: String::new(),
        title: post.title.clone(),
        content: post.content.clone(),
        content_html: post.content_html.clone(),
        header_image: post.header_image.clone(),
    };

    let id = match state.posts.insert(post).await {
        Ok(id) => id,
        Err(e) => {
            if let Some(image) = &created.header_image {
                if let Err(cleanup) = state.uploads.remove(image).await {
                    tracing::warn!(error = %cleanup, "Failed to remove orphaned upload");
                }
            }
            return Err(e.into());
        }
    };

    invalidate_post_cache(state.cache.as_ref()).await;

    Ok(HttpResponse::Created().json(PostCreated {
        id: id.to_hex(),
        ..created
    }))
}

/// GET /posts
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = query.page();
    let limit = query.limit();

    let rev = current_revision(state.cache.as_ref()).await;
    let key = post_page_key(rev, page, limit);

    // A hit replays the stored JSON byte for byte, no database round trip
    if let Some(cached) = state.cache.get(&key).await {
        return Ok(HttpResponse::Ok()
            .content_type("application/json")
            .body(cached));
    }

    let posts = state.posts.list_page(query.skip(), limit).await?;
    let total = state.posts.count().await?;

    let body = PostPage {
        posts: posts.into_iter().map(post_view).collect(),
        current_page: page,
        total_pages: total_pages(total, limit),
        total_posts: total,
    };
    let serialized = serde_json::to_string(&body)?;

    if let Err(e) = state
        .cache
        .set(&key, &serialized, Some(POST_CACHE_TTL))
        .await
    {
        tracing::warn!(error = %e, "Failed to cache post listing");
    }

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(serialized))
}

/// PUT /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let has_title = req.title.as_deref().is_some_and(|t| !t.is_empty());
    let has_content = req.content.as_deref().is_some_and(|c| !c.is_empty());
    if !has_title && !has_content {
        return Err(AppError::BadRequest("No update data provided".to_string()));
    }

    let id = parse_post_id(&path)?;
    let Some(existing) = state.posts.find_by_id(id).await? else {
        return Err(AppError::NotFound("Post not found".to_string()));
    };

    let mut patch = PostPatch::new();
    if has_title {
        patch.title = req.title;
    }
    if has_content {
        // A post created with rendering keeps its HTML in sync
        if existing.content_html.is_some() {
            patch.content_html = req.content.as_deref().map(render_markdown);
        }
        patch.content = req.content;
    }

    if !state.posts.update(id, patch).await? {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    invalidate_post_cache(state.cache.as_ref()).await;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post updated successfully")))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;

    if !state.posts.delete(id).await? {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    invalidate_post_cache(state.cache.as_ref()).await;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}
