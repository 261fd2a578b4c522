use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApprovalFlows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApprovalFlows::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // モジュールごとに承認フローは最大1つ
                    .col(
                        ColumnDef::new(ApprovalFlows::Module)
                            .string_len(30)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ApprovalFlows::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ApprovalFlows::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApprovalFlows::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ApprovalFlows {
    Table,
    Id,
    Module,
    CreatedAt,
    UpdatedAt,
}
