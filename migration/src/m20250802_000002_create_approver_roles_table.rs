use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApproverRoles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApproverRoles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ApproverRoles::FlowId).uuid().not_null())
                    .col(ColumnDef::new(ApproverRoles::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(ApproverRoles::RoleName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApproverRoles::ApprovalOrder)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApproverRoles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ApproverRoles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_approver_roles_flow_id")
                            .from(ApproverRoles::Table, ApproverRoles::FlowId)
                            .to(ApprovalFlows::Table, ApprovalFlows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_approver_roles_user_id")
                            .from(ApproverRoles::Table, ApproverRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一フロー内でユーザーと承認順序はそれぞれ一意
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(ApproverRoles::Table)
                    .name("idx_approver_roles_flow_id_user_id")
                    .col(ApproverRoles::FlowId)
                    .col(ApproverRoles::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(ApproverRoles::Table)
                    .name("idx_approver_roles_flow_id_approval_order")
                    .col(ApproverRoles::FlowId)
                    .col(ApproverRoles::ApprovalOrder)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(ApproverRoles::Table)
                    .name("idx_approver_roles_user_id")
                    .col(ApproverRoles::UserId)
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
                    .table(ApproverRoles::Table)
                    .name("idx_approver_roles_user_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .table(ApproverRoles::Table)
                    .name("idx_approver_roles_flow_id_approval_order")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .table(ApproverRoles::Table)
                    .name("idx_approver_roles_flow_id_user_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ApproverRoles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ApproverRoles {
    Table,
    Id,
    FlowId,
    UserId,
    RoleName,
    ApprovalOrder,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ApprovalFlows {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
