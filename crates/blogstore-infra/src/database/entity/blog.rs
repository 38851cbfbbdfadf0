//! Blog entity for SeaORM.

use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::entity::prelude::*;

use crate::database::mapping::IS_ACTIVE;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blogs")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "blog_id")]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub name: String,
    /// `"Blog is active"` or `"Blog is not active"`; see [`IS_ACTIVE`].
    #[sea_orm(column_type = "Text")]
    pub is_active: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Blog. Posts are loaded separately.
impl From<Model> for blogstore_core::domain::Blog {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
            is_active: IS_ACTIVE.decode(&model.is_active),
            posts: Vec::new(),
        }
    }
}

/// Conversion from Domain Blog to SeaORM ActiveModel. Owned posts are not part of the row.
impl From<&blogstore_core::domain::Blog> for ActiveModel {
    fn from(blog: &blogstore_core::domain::Blog) -> Self {
        Self {
            id: blog.id.map_or(NotSet, Unchanged),
            name: Set(blog.name.clone()),
            is_active: Set(IS_ACTIVE.encode(blog.is_active).to_string()),
        }
    }
}
