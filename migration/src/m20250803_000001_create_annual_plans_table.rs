use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AnnualPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AnnualPlans::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AnnualPlans::Year).integer().not_null())
                    .col(ColumnDef::new(AnnualPlans::CreatedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(AnnualPlans::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AnnualPlans::ApprovedBy).uuid().null())
                    .col(
                        ColumnDef::new(AnnualPlans::OrganizationLevelId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AnnualPlans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AnnualPlans::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_annual_plans_created_by")
                            .from(AnnualPlans::Table, AnnualPlans::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_annual_plans_approved_by")
                            .from(AnnualPlans::Table, AnnualPlans::ApprovedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_annual_plans_organization_level_id")
                            .from(AnnualPlans::Table, AnnualPlans::OrganizationLevelId)
                            .to(OrganizationLevels::Table, OrganizationLevels::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一組織レベルに同じ年度の計画は1つだけ
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(AnnualPlans::Table)
                    .name("idx_annual_plans_year_organization_level_id")
                    .col(AnnualPlans::Year)
                    .col(AnnualPlans::OrganizationLevelId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(AnnualPlans::Table)
                    .name("idx_annual_plans_organization_level_id")
                    .col(AnnualPlans::OrganizationLevelId)
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
                    .table(AnnualPlans::Table)
                    .name("idx_annual_plans_organization_level_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .table(AnnualPlans::Table)
                    .name("idx_annual_plans_year_organization_level_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(AnnualPlans::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AnnualPlans {
    Table,
    Id,
    Year,
    CreatedBy,
    Approved,
    ApprovedBy,
    OrganizationLevelId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum OrganizationLevels {
    Table,
    Id,
}
