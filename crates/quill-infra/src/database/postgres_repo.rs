//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

use quill_core::domain::{PageRequest, Post, PostFilter, PostPage, User};
use quill_core::error::RepoError;
use quill_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn map_db_err(e: DbErr) -> RepoError {
    match e {
        DbErr::RecordNotUpdated => RepoError::NotFound,
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        other => {
            let msg = other.to_string();
            if msg.contains("duplicate") || msg.contains("unique") {
                RepoError::Constraint("Entity already exists".to_string())
            } else {
                RepoError::Query(msg)
            }
        }
    }
}

/// Escape LIKE wildcards so user input only ever matches literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Translate a [`PostFilter`] into a SQL condition: ILIKE for the
/// case-insensitive substring matches, half-open range on `created_at`.
fn filter_condition(filter: &PostFilter) -> Condition {
    let mut cond = Condition::all();

    if let Some(title) = &filter.title {
        cond = cond.add(Expr::col(post::Column::Title).ilike(like_pattern(title)));
    }
    if let Some(content) = &filter.content {
        cond = cond.add(Expr::col(post::Column::Content).ilike(like_pattern(content)));
    }
    if let Some(after) = filter.after_bound() {
        cond = cond.add(post::Column::CreatedAt.gte(after));
    }
    if let Some(before) = filter.before_bound() {
        cond = cond.add(post::Column::CreatedAt.lt(before));
    }

    cond
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = if let Some(at_pos) = email.find('@') {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = if local.len() > 1 {
                format!("{}***", &local[..1])
            } else {
                "***".to_string()
            };
            format!("{}{}", masked_local, domain)
        } else {
            "***".to_string()
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, new_user: User) -> Result<User, RepoError> {
        let active_model: user::ActiveModel = new_user.into();
        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, new_post: Post) -> Result<Post, RepoError> {
        let active_model: post::ActiveModel = new_post.into();
        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update(&self, changed: Post) -> Result<Post, RepoError> {
        let active_model: post::ActiveModel = changed.into();
        let model = active_model.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn search(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<PostPage, RepoError> {
        let paginator = PostEntity::find()
            .filter(filter_condition(filter))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .paginate(&self.db, page.page_size);

        let total = paginator.num_items().await.map_err(map_db_err)?;
        // fetch_page is zero-based; the API is one-based
        let models = paginator
            .fetch_page(page.page.saturating_sub(1))
            .await
            .map_err(map_db_err)?;

        Ok(PostPage {
            items: models.into_iter().map(Into::into).collect(),
            total,
        })
    }
}
