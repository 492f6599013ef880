//! Blog post CRUD handlers.
//!
//! Listing responses are cached; every successful write clears the cache so a
//! stale listing is never served after a post changes.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{PageRequest, Post, PostFilter};
use quill_core::error::RepoError;
use quill_shared::dto::{
    CreatePostRequest, PostListQuery, PostListResponse, PostResponse, UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        user_id: post.user_id,
        title: post.title,
        content: post.content,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// Escape the key's structural characters so two distinct queries can never
/// compose the same key (`title=x&content=y` as a title value must not read
/// as a title plus a content filter).
fn escape_key_component(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('&', "%26")
        .replace('=', "%3D")
}

/// Normalized cache key: equivalent requests share an entry regardless of
/// query parameter order.
fn cache_key(query: &PostListQuery, page: PageRequest) -> String {
    format!(
        "posts:list:title={}&content={}&after={}&before={}&page={}&page_size={}",
        escape_key_component(query.title.as_deref().unwrap_or("")),
        escape_key_component(query.content.as_deref().unwrap_or("")),
        query
            .created_at_after
            .map(|d| d.to_string())
            .unwrap_or_default(),
        query
            .created_at_before
            .map(|d| d.to_string())
            .unwrap_or_default(),
        page.page,
        page.page_size,
    )
}

/// Drop all cached listings. Cache failures are logged, never surfaced: the
/// write already succeeded and entries expire via TTL anyway.
async fn invalidate_listings(state: &AppState) {
    if let Err(e) = state.cache.clear().await {
        tracing::warn!(error = %e, "Failed to clear response cache");
    }
}

/// GET /posts - filtered, paginated, cached listing.
pub async fn list_posts(
    _identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let page = PageRequest::new(query.page, query.page_size);
    let key = cache_key(&query, page);

    if let Some(cached) = state.cache.get(&key).await {
        match serde_json::from_str::<PostListResponse>(&cached) {
            Ok(body) => return Ok(HttpResponse::Ok().json(body)),
            // Corrupt entry: fall through and recompute
            Err(e) => tracing::warn!(key = %key, error = %e, "Discarding unreadable cache entry"),
        }
    }

    let filter = PostFilter {
        title: query.title.clone(),
        content: query.content.clone(),
        created_at_after: query.created_at_after,
        created_at_before: query.created_at_before,
    };
    let result = state.posts.search(&filter, page).await?;

    let body = PostListResponse {
        count: result.total,
        page: page.page,
        page_size: page.page_size,
        results: result.items.into_iter().map(to_response).collect(),
    };

    match serde_json::to_string(&body) {
        Ok(serialized) => {
            if let Err(e) = state.cache.set(&key, &serialized, Some(state.cache_ttl)).await {
                tracing::warn!(error = %e, "Failed to cache post listing");
            }
        }
        Err(e) => tracing::warn!(error = %e, "Failed to serialize post listing for cache"),
    }

    Ok(HttpResponse::Ok().json(body))
}

/// POST /posts - create a post attributed to the authenticated caller.
pub async fn create_post(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate().map_err(AppError::Validation)?;

    let post = Post::new(identity.user_id, req.title, req.content);
    let saved = state.posts.insert(post).await?;

    invalidate_listings(&state).await;

    Ok(HttpResponse::Created().json(to_response(saved)))
}

/// GET /posts/{id}
pub async fn get_post(
    _identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", id)))?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// PUT /posts/{id} - full update, owner only.
pub async fn update_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();
    req.validate().map_err(AppError::Validation)?;

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", id)))?;

    if !post.is_owned_by(identity.user_id) {
        return Err(AppError::Forbidden);
    }

    post.apply_update(req.title, req.content);
    let saved = state.posts.update(post).await?;

    invalidate_listings(&state).await;

    Ok(HttpResponse::Ok().json(to_response(saved)))
}

/// DELETE /posts/{id} - owner only.
pub async fn delete_post(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", id)))?;

    if !post.is_owned_by(identity.user_id) {
        return Err(AppError::Forbidden);
    }

    match state.posts.delete(id).await {
        Ok(()) => {
            invalidate_listings(&state).await;
            Ok(HttpResponse::NoContent().finish())
        }
        Err(RepoError::NotFound) => {
            // Row vanished between the lookup and the delete
            Err(AppError::NotFound(format!("Post with id {} not found", id)))
        }
        // Any other failure during delete surfaces as 400 with a message
        Err(e) => Err(AppError::BadRequest(e.to_string())),
    }
}

#[cfg(test)]
mod key_tests {
    use super::*;

    #[test]
    fn test_cache_key_is_injective_over_filter_values() {
        let page = PageRequest::default();

        // A title containing "&content=" must not collide with an actual
        // content filter carrying the same bytes
        let smuggled = PostListQuery {
            title: Some("x&content=y".to_string()),
            ..Default::default()
        };
        let split = PostListQuery {
            title: Some("x".to_string()),
            content: Some("y&content=".to_string()),
            ..Default::default()
        };

        assert_ne!(cache_key(&smuggled, page), cache_key(&split, page));
    }

    #[test]
    fn test_cache_key_escaping_is_reversible() {
        // The escape itself must be injective: "%26" as literal input differs
        // from an escaped "&"
        assert_ne!(escape_key_component("%26"), escape_key_component("&"));
        assert_eq!(escape_key_component("plain title"), "plain title");
    }
}
