use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Approvals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Approvals::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Approvals::ActivityId).uuid().not_null())
                    .col(ColumnDef::new(Approvals::ApproverId).uuid().not_null())
                    .col(
                        ColumnDef::new(Approvals::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Approvals::ApprovalOrder)
                            .integer()
                            .not_null(),
                    )
                    // 判定が確定した時点で一度だけ刻印される
                    .col(
                        ColumnDef::new(Approvals::DecidedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Approvals::Comments)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Approvals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Approvals::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_approvals_activity_id")
                            .from(Approvals::Table, Approvals::ActivityId)
                            .to(Activities::Table, Activities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_approvals_approver_id")
                            .from(Approvals::Table, Approvals::ApproverId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一アクティビティ内で承認者と承認順序はそれぞれ一意
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Approvals::Table)
                    .name("idx_approvals_activity_id_approver_id")
                    .col(Approvals::ActivityId)
                    .col(Approvals::ApproverId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Approvals::Table)
                    .name("idx_approvals_activity_id_approval_order")
                    .col(Approvals::ActivityId)
                    .col(Approvals::ApprovalOrder)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 承認者ごとの未処理一覧の取得用
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Approvals::Table)
                    .name("idx_approvals_approver_id_status")
                    .col(Approvals::ApproverId)
                    .col(Approvals::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .table(Approvals::Table)
                    .name("idx_approvals_approver_id_status")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .table(Approvals::Table)
                    .name("idx_approvals_activity_id_approval_order")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .table(Approvals::Table)
                    .name("idx_approvals_activity_id_approver_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Approvals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Approvals {
    Table,
    Id,
    ActivityId,
    ApproverId,
    Status,
    ApprovalOrder,
    DecidedAt,
    Comments,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
