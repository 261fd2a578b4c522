// tests/common/test_data.rs

use chrono::NaiveDate;
use plan_backend::domain::level_type::LevelType;
use plan_backend::domain::position::Position;
use plan_backend::domain::workflow_module::WorkflowModule;
use plan_backend::domain::{
    activity_model, annual_plan_model, approval_flow_model, approval_model,
    organization_level_model, user_model,
};
use plan_backend::repository::activity_repository::{ActivityRepository, CreateActivity};
use plan_backend::repository::annual_plan_repository::{AnnualPlanRepository, CreateAnnualPlan};
use plan_backend::repository::approval_flow_repository::ApprovalFlowRepository;
use plan_backend::repository::approver_role_repository::{
    ApproverRoleRepository, CreateApproverRole,
};
use plan_backend::repository::organization_level_repository::{
    CreateOrganizationLevel, OrganizationLevelRepository,
};
use plan_backend::repository::user_repository::{CreateUser, UserRepository};
use plan_backend::utils::password::PasswordManager;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// 全テスト共通のパスワード（デフォルトのパスワードポリシーを満たす）
pub const TEST_PASSWORD: &str = "MyUniqueP@ssw0rd91";

/// 衝突しないユーザー名を生成
pub fn unique_username(prefix: &str) -> String {
    format!("{}{}", prefix, &Uuid::new_v4().to_string()[..8])
}

// === ユーザー ===

/// ユーザーを作成（組織レベル所属なし）
pub async fn seed_user(
    db: &DatabaseConnection,
    password_manager: &PasswordManager,
    username: &str,
    position: Position,
) -> user_model::Model {
    seed_user_at_level(db, password_manager, username, position, None).await
}

/// 組織レベル所属のユーザーを作成
pub async fn seed_user_at_level(
    db: &DatabaseConnection,
    password_manager: &PasswordManager,
    username: &str,
    position: Position,
    organization_level_id: Option<Uuid>,
) -> user_model::Model {
    let password_hash = password_manager
        .hash_password(TEST_PASSWORD)
        .expect("hash test password");

    UserRepository::new(db.clone())
        .create(CreateUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash,
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            position: position.as_str().to_string(),
            organization_level_id,
            boss_id: None,
            is_admin: Some(position == Position::SystemAdmin),
            is_active: Some(true),
        })
        .await
        .expect("create test user")
}

/// 管理者ユーザーを作成
pub async fn seed_admin(
    db: &DatabaseConnection,
    password_manager: &PasswordManager,
) -> user_model::Model {
    seed_user(
        db,
        password_manager,
        &unique_username("admin"),
        Position::SystemAdmin,
    )
    .await
}

// === 組織レベル ===

/// 組織レベルを作成
pub async fn seed_level(
    db: &DatabaseConnection,
    name: &str,
    level_type: LevelType,
    parent_id: Option<Uuid>,
    director_id: Uuid,
) -> organization_level_model::Model {
    OrganizationLevelRepository::new(db.clone())
        .create(CreateOrganizationLevel {
            name: name.to_string(),
            level_type: level_type.as_str().to_string(),
            parent_id,
            director_id,
        })
        .await
        .expect("create test level")
}

/// 3階層の組織（Central → Regional → BaseUnit）と各ディレクター
pub struct OrgFixture {
    pub general_director: user_model::Model,
    pub regional_director: user_model::Model,
    pub base_unit_director: user_model::Model,
    pub central: organization_level_model::Model,
    pub regional: organization_level_model::Model,
    pub base_unit: organization_level_model::Model,
}

/// 3階層の組織とディレクターを一括で用意
pub async fn seed_org_hierarchy(
    db: &DatabaseConnection,
    password_manager: &PasswordManager,
) -> OrgFixture {
    let general_director = seed_user(
        db,
        password_manager,
        &unique_username("gdir"),
        Position::GeneralDirector,
    )
    .await;
    let regional_director = seed_user(
        db,
        password_manager,
        &unique_username("rdir"),
        Position::RegionalDirector,
    )
    .await;
    let base_unit_director = seed_user(
        db,
        password_manager,
        &unique_username("bdir"),
        Position::BaseUnitDirector,
    )
    .await;

    let central = seed_level(
        db,
        "Central Office",
        LevelType::Central,
        None,
        general_director.id,
    )
    .await;
    let regional = seed_level(
        db,
        "North Region",
        LevelType::Regional,
        Some(central.id),
        regional_director.id,
    )
    .await;
    let base_unit = seed_level(
        db,
        "Unit 12",
        LevelType::BaseUnit,
        Some(regional.id),
        base_unit_director.id,
    )
    .await;

    OrgFixture {
        general_director,
        regional_director,
        base_unit_director,
        central,
        regional,
        base_unit,
    }
}

// === 年間計画・活動 ===

/// 年間計画を作成
pub async fn seed_plan(
    db: &DatabaseConnection,
    year: i32,
    created_by: Uuid,
    organization_level_id: Uuid,
) -> annual_plan_model::Model {
    AnnualPlanRepository::new(db.clone())
        .create(CreateAnnualPlan {
            year,
            created_by,
            organization_level_id,
        })
        .await
        .expect("create test plan")
}

/// 承認レコード付きの活動を作成
///
/// approver_idsの並び順がそのまま承認順になる。
pub async fn seed_activity(
    db: &DatabaseConnection,
    plan_id: Uuid,
    name: &str,
    responsible_id: Uuid,
    approver_ids: &[Uuid],
) -> (activity_model::Model, Vec<approval_model::Model>) {
    ActivityRepository::new(db.clone())
        .create_with_approvals(
            CreateActivity {
                plan_id,
                name: name.to_string(),
                description: String::new(),
                responsible_id,
                start_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 11, 30).unwrap(),
            },
            approver_ids,
        )
        .await
        .expect("create test activity")
}

// === 承認フロー ===

/// 年間計画モジュールの承認フローを作成（ロールは指定順）
pub async fn seed_flow(
    db: &DatabaseConnection,
    approver_ids: &[Uuid],
) -> approval_flow_model::Model {
    let flow_repo = ApprovalFlowRepository::new(db.clone());
    let role_repo = ApproverRoleRepository::new(db.clone());

    let flow = flow_repo
        .create(WorkflowModule::AnnualPlan.as_str().to_string())
        .await
        .expect("create test flow");

    for (index, approver_id) in approver_ids.iter().enumerate() {
        role_repo
            .create(CreateApproverRole {
                flow_id: flow.id,
                user_id: *approver_id,
                role_name: format!("Approver {}", index + 1),
                approval_order: index as i32 + 1,
            })
            .await
            .expect("create approver role");
    }

    flow
}
