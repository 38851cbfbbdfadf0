//! Transactional change store on SeaORM.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, DbConn, DbErr, EntityTrait, QueryFilter,
    SqlErr, TransactionTrait,
};

use blogstore_core::domain::{Blog, Post};
use blogstore_core::error::RepoError;
use blogstore_core::ports::{Change, ChangeStore, CommitReceipt};

use super::entity::blog::{self, Entity as BlogEntity};
use super::entity::post::{self, Entity as PostEntity};

/// Applies each batch inside one database transaction.
///
/// If the transaction is dropped before `commit` (error or cancelled future)
/// the database rolls it back, so no partial batch is ever visible.
pub struct PostgresChangeStore {
    db: Arc<DbConn>,
}

impl PostgresChangeStore {
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self { db: db.into() }
    }

    /// The connection back, once no repository shares it.
    #[cfg(test)]
    pub(crate) fn into_connection(self) -> Option<DbConn> {
        Arc::into_inner(self.db)
    }
}

fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => RepoError::ForeignKey(msg),
        _ => RepoError::Query(err.to_string()),
    }
}

async fn ensure_blog_exists(
    txn: &DatabaseTransaction,
    blog_id: Option<i32>,
) -> Result<i32, RepoError> {
    let Some(blog_id) = blog_id else {
        return Err(RepoError::ForeignKey("post has no parent blog".to_string()));
    };

    let found = BlogEntity::find_by_id(blog_id)
        .one(txn)
        .await
        .map_err(map_db_err)?;

    match found {
        Some(_) => Ok(blog_id),
        None => Err(RepoError::ForeignKey(format!("blog {blog_id} does not exist"))),
    }
}

async fn insert_post(
    txn: &DatabaseTransaction,
    post: &Post,
    blog_id: i32,
) -> Result<i32, RepoError> {
    let mut model = post::ActiveModel::from(post);
    model.id = NotSet;
    model.blog_id = Set(blog_id);

    let inserted = model.insert(txn).await.map_err(map_db_err)?;
    Ok(inserted.id)
}

async fn insert_blog(
    txn: &DatabaseTransaction,
    blog: &Blog,
    receipt: &mut CommitReceipt,
) -> Result<(), RepoError> {
    let mut model = blog::ActiveModel::from(blog);
    model.id = NotSet;

    let inserted = model.insert(txn).await.map_err(map_db_err)?;
    receipt.blog_ids.push(inserted.id);

    for post in &blog.posts {
        let post_id = insert_post(txn, post, inserted.id).await?;
        receipt.post_ids.push(post_id);
    }

    Ok(())
}

async fn apply_change(
    txn: &DatabaseTransaction,
    change: Change,
    receipt: &mut CommitReceipt,
) -> Result<(), RepoError> {
    match change {
        Change::AddBlog(blog) => insert_blog(txn, &blog, receipt).await?,
        Change::UpdateBlog(blog) => {
            let id = blog.id.unwrap_or_default();
            blog::ActiveModel::from(&blog)
                .update(txn)
                .await
                .map_err(|e| match e {
                    DbErr::RecordNotUpdated => RepoError::NotFound {
                        entity_type: "Blog",
                        id,
                    },
                    other => map_db_err(other),
                })?;
            receipt.updated += 1;
        }
        Change::DeleteBlog(id) => {
            PostEntity::delete_many()
                .filter(post::Column::BlogId.eq(id))
                .exec(txn)
                .await
                .map_err(map_db_err)?;
            let result = BlogEntity::delete_by_id(id)
                .exec(txn)
                .await
                .map_err(map_db_err)?;
            receipt.deleted += result.rows_affected;
        }
        Change::AddPost(post) => {
            let blog_id = ensure_blog_exists(txn, post.blog_id).await?;
            let post_id = insert_post(txn, &post, blog_id).await?;
            receipt.post_ids.push(post_id);
        }
        Change::UpdatePost(post) => {
            let id = post.id.unwrap_or_default();
            ensure_blog_exists(txn, post.blog_id).await?;

            let mut model = post::ActiveModel::from(&post);
            model.created = NotSet;
            model.update(txn).await.map_err(|e| match e {
                DbErr::RecordNotUpdated => RepoError::NotFound {
                    entity_type: "Post",
                    id,
                },
                other => map_db_err(other),
            })?;
            receipt.updated += 1;
        }
        Change::DeletePost(id) => {
            let result = PostEntity::delete_by_id(id)
                .exec(txn)
                .await
                .map_err(map_db_err)?;
            receipt.deleted += result.rows_affected;
        }
    }

    Ok(())
}

#[async_trait]
impl ChangeStore for PostgresChangeStore {
    async fn apply(&self, changes: Vec<Change>) -> Result<CommitReceipt, RepoError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        let mut receipt = CommitReceipt::default();
        for change in changes {
            if let Err(err) = apply_change(&txn, change, &mut receipt).await {
                tracing::warn!(error = %err, "Rolling back commit");
                if let Err(rollback) = txn.rollback().await {
                    tracing::error!(error = %rollback, "Rollback failed");
                }
                return Err(err);
            }
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(receipt)
    }
}
