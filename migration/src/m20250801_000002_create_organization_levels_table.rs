use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrganizationLevels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrganizationLevels::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OrganizationLevels::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganizationLevels::LevelType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrganizationLevels::ParentId).uuid().null())
                    .col(
                        ColumnDef::new(OrganizationLevels::DirectorId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrganizationLevels::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(OrganizationLevels::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organization_levels_parent_id")
                            .from(OrganizationLevels::Table, OrganizationLevels::ParentId)
                            .to(OrganizationLevels::Table, OrganizationLevels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organization_levels_director_id")
                            .from(OrganizationLevels::Table, OrganizationLevels::DirectorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一タイプ内でレベル名は一意
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(OrganizationLevels::Table)
                    .name("idx_organization_levels_name_level_type")
                    .col(OrganizationLevels::Name)
                    .col(OrganizationLevels::LevelType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(OrganizationLevels::Table)
                    .name("idx_organization_levels_parent_id")
                    .col(OrganizationLevels::ParentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(OrganizationLevels::Table)
                    .name("idx_organization_levels_director_id")
                    .col(OrganizationLevels::DirectorId)
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
                    .table(OrganizationLevels::Table)
                    .name("idx_organization_levels_director_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .table(OrganizationLevels::Table)
                    .name("idx_organization_levels_parent_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .if_exists()
                    .table(OrganizationLevels::Table)
                    .name("idx_organization_levels_name_level_type")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(OrganizationLevels::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OrganizationLevels {
    Table,
    Id,
    Name,
    LevelType,
    ParentId,
    DirectorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
