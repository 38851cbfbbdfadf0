//! Post entity for SeaORM, stored in `articles`.

use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "post_id")]
    pub id: i32,
    pub blog_id: i32,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub name: String,
    #[sea_orm(column_type = "String(StringLen::N(1000))")]
    pub content: String,
    pub created: DateTimeWithTimeZone,
    pub updated: Option<DateTimeWithTimeZone>,
}

/// The only relationship between posts and blogs.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::blog::Entity",
        from = "Column::BlogId",
        to = "super::blog::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Blog,
}

impl Related<super::blog::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Blog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for blogstore_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            blog_id: Some(model.blog_id),
            name: model.name,
            content: model.content,
            created: model.created.into(),
            updated: model.updated.map(Into::into),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
///
/// A missing parent stays `NotSet`; the change store rejects it before insert.
impl From<&blogstore_core::domain::Post> for ActiveModel {
    fn from(post: &blogstore_core::domain::Post) -> Self {
        Self {
            id: post.id.map_or(NotSet, Unchanged),
            blog_id: post.blog_id.map_or(NotSet, Set),
            name: Set(post.name.clone()),
            content: Set(post.content.clone()),
            created: Set(post.created.into()),
            updated: Set(post.updated.map(Into::into)),
        }
    }
}
