use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Blogs::BlogId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Blogs::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Blogs::IsActive).text().not_null())
                    .to_owned(),
            )
            .await?;

        // One foreign key only: articles.blog_id -> blogs.blog_id
        manager
            .create_table(
                Table::create()
                    .table(Articles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Articles::PostId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Articles::BlogId).integer().not_null())
                    .col(ColumnDef::new(Articles::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Articles::Content).string_len(1000).not_null())
                    .col(
                        ColumnDef::new(Articles::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Articles::Updated).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_articles_blog_id")
                            .from(Articles::Table, Articles::BlogId)
                            .to(Blogs::Table, Blogs::BlogId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_articles_blog_id")
                    .table(Articles::Table)
                    .col(Articles::BlogId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Articles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Blogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Blogs {
    Table,
    BlogId,
    Name,
    IsActive,
}

#[derive(DeriveIden)]
enum Articles {
    Table,
    PostId,
    BlogId,
    Name,
    Content,
    Created,
    Updated,
}
