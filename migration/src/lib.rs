// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// ユーザー・組織関連マイグレーション
mod m20250801_000001_create_users_table;
mod m20250801_000002_create_organization_levels_table;
mod m20250801_000003_create_user_profiles_table;

// 承認フロー設定関連マイグレーション
mod m20250802_000001_create_approval_flows_table;
mod m20250802_000002_create_approver_roles_table;

// 年度計画・アクティビティ関連マイグレーション
mod m20250803_000001_create_annual_plans_table;
mod m20250803_000002_create_activities_table;

// 承認レコード関連マイグレーション
mod m20250804_000001_create_approvals_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル作成（依存関係なし）
            Box::new(m20250801_000001_create_users_table::Migration),
            // 2. usersテーブルに依存するテーブル
            Box::new(m20250801_000002_create_organization_levels_table::Migration),
            Box::new(m20250801_000003_create_user_profiles_table::Migration),
            // 3. 承認フロー設定（users に依存）
            Box::new(m20250802_000001_create_approval_flows_table::Migration),
            Box::new(m20250802_000002_create_approver_roles_table::Migration),
            // 4. 年度計画（users / organization_levels に依存）
            Box::new(m20250803_000001_create_annual_plans_table::Migration),
            Box::new(m20250803_000002_create_activities_table::Migration),
            // 5. 承認レコード（activities / users に依存）
            Box::new(m20250804_000001_create_approvals_table::Migration),
        ]
    }
}
