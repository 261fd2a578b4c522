use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Activities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Activities::PlanId).uuid().not_null())
                    .col(ColumnDef::new(Activities::Name).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Activities::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Activities::ResponsibleId).uuid().not_null())
                    .col(ColumnDef::new(Activities::StartDate).date().not_null())
                    .col(ColumnDef::new(Activities::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Activities::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Activities::Progress)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Activities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Activities::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activities_plan_id")
                            .from(Activities::Table, Activities::PlanId)
                            .to(AnnualPlans::Table, AnnualPlans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activities_responsible_id")
                            .from(Activities::Table, Activities::ResponsibleId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Activities::Table)
                    .name("idx_activities_plan_id")
                    .col(Activities::PlanId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Activities::Table)
                    .name("idx_activities_responsible_id")
                    .col(Activities::ResponsibleId)
                    .to_owned(),
            )
            .await?;

        // ダッシュボード集計でのステータス別カウント用
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(Activities::Table)
                    .name("idx_activities_status")
                    .col(Activities::Status)
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
                    .table(Activities::Table)
                    .name("idx_activities_status")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .table(Activities::Table)
                    .name("idx_activities_responsible_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .table(Activities::Table)
                    .name("idx_activities_plan_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Activities::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
    PlanId,
    Name,
    Description,
    ResponsibleId,
    StartDate,
    EndDate,
    Status,
    Progress,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AnnualPlans {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
