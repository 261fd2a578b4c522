// tests/plan_activity_tests.rs

mod common;

use axum::{
    body::{self},
    http::{header, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::app_helper::setup_app;
use common::request::{create_empty_request, create_request};
use common::test_data;
use plan_backend::domain::position::Position;

async fn read_json(res: axum::response::Response) -> Value {
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_plan_and_duplicate_conflict() {
    let test_app = setup_app().await;
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let token = test_app.token_for(&admin);
    let fixture = test_data::seed_org_hierarchy(db, &test_app.password_manager).await;

    let payload = json!({
        "year": 2025,
        "organization_level_id": fixture.regional.id,
    });

    let res = test_app
        .app
        .clone()
        .oneshot(create_request("POST", "/plans", &token, &payload))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    assert_eq!(body["data"]["year"], 2025);
    assert_eq!(body["data"]["approved"], false);
    assert_eq!(
        body["data"]["created_by"],
        admin.id.to_string().as_str()
    );

    // 同じ年度・同じレベルの2本目は409
    let res = test_app
        .app
        .clone()
        .oneshot(create_request("POST", "/plans", &token, &payload))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_plan_validates_year_range() {
    let test_app = setup_app().await;
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let token = test_app.token_for(&admin);
    let fixture = test_data::seed_org_hierarchy(db, &test_app.password_manager).await;

    let res = test_app
        .app
        .clone()
        .oneshot(create_request(
            "POST",
            "/plans",
            &token,
            &json!({
                "year": 2032,
                "organization_level_id": fixture.regional.id,
            }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["error_type"], "validation_errors");
}

#[tokio::test]
async fn test_create_plan_rejects_unknown_level() {
    let test_app = setup_app().await;
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let token = test_app.token_for(&admin);

    let res = test_app
        .app
        .clone()
        .oneshot(create_request(
            "POST",
            "/plans",
            &token,
            &json!({
                "year": 2025,
                "organization_level_id": uuid::Uuid::new_v4(),
            }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_plans_scopes_to_directed_levels() {
    let test_app = setup_app().await;
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let fixture = test_data::seed_org_hierarchy(db, &test_app.password_manager).await;

    test_data::seed_plan(db, 2025, admin.id, fixture.regional.id).await;
    test_data::seed_plan(db, 2025, admin.id, fixture.base_unit.id).await;

    // 管理者は全計画を見える
    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "GET",
            "/plans",
            &test_app.token_for(&admin),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Regionalのディレクターは自分のレベルの計画だけ
    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "GET",
            "/plans",
            &test_app.token_for(&fixture.regional_director),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    let plans = body["data"].as_array().unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(
        plans[0]["organization_level_id"],
        fixture.regional.id.to_string().as_str()
    );
}

#[tokio::test]
async fn test_plan_detail_includes_level_name_and_activities() {
    let test_app = setup_app().await;
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let token = test_app.token_for(&admin);
    let fixture = test_data::seed_org_hierarchy(db, &test_app.password_manager).await;

    let plan = test_data::seed_plan(db, 2025, admin.id, fixture.regional.id).await;
    let responsible = test_data::seed_user_at_level(
        db,
        &test_app.password_manager,
        &test_data::unique_username("resp"),
        Position::RegionalSpecialist,
        Some(fixture.regional.id),
    )
    .await;
    test_data::seed_activity(
        db,
        plan.id,
        "Community Outreach",
        responsible.id,
        &[fixture.regional_director.id, fixture.general_director.id],
    )
    .await;

    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "GET",
            &format!("/plans/{}", plan.id),
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["data"]["organization_level_name"], "North Region");
    let activities = body["data"]["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["name"], "Community Outreach");
    assert_eq!(
        activities[0]["responsible_name"],
        responsible.full_name().as_str()
    );
}

#[tokio::test]
async fn test_approve_plan_requires_level_director_or_admin() {
    let test_app = setup_app().await;
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let fixture = test_data::seed_org_hierarchy(db, &test_app.password_manager).await;
    let plan = test_data::seed_plan(db, 2025, admin.id, fixture.regional.id).await;

    // レベル所属のスペシャリストには承認権限がない
    let specialist = test_data::seed_user_at_level(
        db,
        &test_app.password_manager,
        &test_data::unique_username("spec"),
        Position::RegionalSpecialist,
        Some(fixture.regional.id),
    )
    .await;
    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "POST",
            &format!("/plans/{}/approve", plan.id),
            &test_app.token_for(&specialist),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // レベルのディレクターは承認できる
    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "POST",
            &format!("/plans/{}/approve", plan.id),
            &test_app.token_for(&fixture.regional_director),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["data"]["approved"], true);
    assert_eq!(
        body["data"]["approved_by"],
        fixture.regional_director.id.to_string().as_str()
    );

    // 承認済み計画の再承認は409
    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "POST",
            &format!("/plans/{}/approve", plan.id),
            &test_app.token_for(&fixture.regional_director),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_activity_spawns_ordered_approvals() {
    let test_app = setup_app().await;
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let token = test_app.token_for(&admin);
    let fixture = test_data::seed_org_hierarchy(db, &test_app.password_manager).await;
    let plan = test_data::seed_plan(db, 2025, admin.id, fixture.regional.id).await;

    let responsible = test_data::seed_user_at_level(
        db,
        &test_app.password_manager,
        &test_data::unique_username("resp"),
        Position::RegionalSpecialist,
        Some(fixture.regional.id),
    )
    .await;

    let res = test_app
        .app
        .clone()
        .oneshot(create_request(
            "POST",
            &format!("/plans/{}/activities", plan.id),
            &token,
            &json!({
                "name": "Quarterly Training",
                "description": "On-site training sessions",
                "responsible_id": responsible.id,
                "start_date": "2025-03-01",
                "end_date": "2025-10-31",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["progress"], 0);
    let activity_id = body["data"]["id"].as_str().unwrap().to_string();

    // Regionalレベル発なので承認者はRegional→Centralのディレクター順
    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "GET",
            &format!("/activities/{}/approvals", activity_id),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    let approvals = body["data"].as_array().unwrap();
    assert_eq!(approvals.len(), 2);
    assert_eq!(approvals[0]["approval_order"], 1);
    assert_eq!(
        approvals[0]["approver_id"],
        fixture.regional_director.id.to_string().as_str()
    );
    assert_eq!(approvals[1]["approval_order"], 2);
    assert_eq!(
        approvals[1]["approver_id"],
        fixture.general_director.id.to_string().as_str()
    );
    assert!(approvals.iter().all(|a| a["status"] == "pending"));
}

#[tokio::test]
async fn test_create_activity_rejects_responsible_outside_level() {
    let test_app = setup_app().await;
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let token = test_app.token_for(&admin);
    let fixture = test_data::seed_org_hierarchy(db, &test_app.password_manager).await;
    let plan = test_data::seed_plan(db, 2025, admin.id, fixture.regional.id).await;

    // 別レベル所属の担当者は拒否される
    let outsider = test_data::seed_user_at_level(
        db,
        &test_app.password_manager,
        &test_data::unique_username("out"),
        Position::BaseUnitSpecialist,
        Some(fixture.base_unit.id),
    )
    .await;

    let res = test_app
        .app
        .clone()
        .oneshot(create_request(
            "POST",
            &format!("/plans/{}/activities", plan.id),
            &token,
            &json!({
                "name": "Misassigned Activity",
                "responsible_id": outsider.id,
                "start_date": "2025-03-01",
                "end_date": "2025-10-31",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["error_type"], "validation_error");
}

#[tokio::test]
async fn test_create_activity_rejects_end_before_start() {
    let test_app = setup_app().await;
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let token = test_app.token_for(&admin);
    let fixture = test_data::seed_org_hierarchy(db, &test_app.password_manager).await;
    let plan = test_data::seed_plan(db, 2025, admin.id, fixture.regional.id).await;
    let responsible = test_data::seed_user_at_level(
        db,
        &test_app.password_manager,
        &test_data::unique_username("resp"),
        Position::RegionalSpecialist,
        Some(fixture.regional.id),
    )
    .await;

    let res = test_app
        .app
        .clone()
        .oneshot(create_request(
            "POST",
            &format!("/plans/{}/activities", plan.id),
            &token,
            &json!({
                "name": "Backwards Activity",
                "responsible_id": responsible.id,
                "start_date": "2025-10-31",
                "end_date": "2025-03-01",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("End date must not be before start date"));
}

#[tokio::test]
async fn test_update_activity_progress_and_manual_status() {
    let test_app = setup_app().await;
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let token = test_app.token_for(&admin);
    let fixture = test_data::seed_org_hierarchy(db, &test_app.password_manager).await;
    let plan = test_data::seed_plan(db, 2025, admin.id, fixture.regional.id).await;
    let responsible = test_data::seed_user_at_level(
        db,
        &test_app.password_manager,
        &test_data::unique_username("resp"),
        Position::RegionalSpecialist,
        Some(fixture.regional.id),
    )
    .await;
    let (activity, _) = test_data::seed_activity(
        db,
        plan.id,
        "Field Survey",
        responsible.id,
        &[fixture.regional_director.id],
    )
    .await;

    let res = test_app
        .app
        .clone()
        .oneshot(create_request(
            "PATCH",
            &format!("/activities/{}", activity.id),
            &token,
            &json!({ "status": "in_progress", "progress": 40 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["data"]["status"], "in_progress");
    assert_eq!(body["data"]["progress"], 40);

    // 承認済みへの手動遷移は承認フロー経由でしかできない
    let res = test_app
        .app
        .clone()
        .oneshot(create_request(
            "PATCH",
            &format!("/activities/{}", activity.id),
            &token,
            &json!({ "status": "approved" }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // 進捗の範囲外は400
    let res = test_app
        .app
        .clone()
        .oneshot(create_request(
            "PATCH",
            &format!("/activities/{}", activity.id),
            &token,
            &json!({ "progress": 140 }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_plan_report_downloads_csv() {
    let test_app = setup_app().await;
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let token = test_app.token_for(&admin);
    let fixture = test_data::seed_org_hierarchy(db, &test_app.password_manager).await;
    let plan = test_data::seed_plan(db, 2025, admin.id, fixture.regional.id).await;
    let responsible = test_data::seed_user_at_level(
        db,
        &test_app.password_manager,
        &test_data::unique_username("resp"),
        Position::RegionalSpecialist,
        Some(fixture.regional.id),
    )
    .await;
    test_data::seed_activity(
        db,
        plan.id,
        "Community Outreach",
        responsible.id,
        &[fixture.regional_director.id],
    )
    .await;

    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "GET",
            &format!("/plans/{}/report", plan.id),
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );
    let disposition = res
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains(&format!("plan_{}.csv", plan.id)));

    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let content = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(content.contains("Annual Plan,2025,North Region"));
    assert!(content.contains("Activity,Responsible,Status,Progress"));
    assert!(content.contains("Community Outreach"));
    assert!(content.contains("0%"));
}

#[tokio::test]
async fn test_plan_report_unknown_plan_is_not_found() {
    let test_app = setup_app().await;
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let token = test_app.token_for(&admin);

    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "GET",
            &format!("/plans/{}/report", uuid::Uuid::new_v4()),
            &token,
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_summary_counts_and_level_progress() {
    let test_app = setup_app().await;
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let token = test_app.token_for(&admin);
    let fixture = test_data::seed_org_hierarchy(db, &test_app.password_manager).await;

    let plan = test_data::seed_plan(db, 2025, admin.id, fixture.regional.id).await;
    let responsible = test_data::seed_user_at_level(
        db,
        &test_app.password_manager,
        &test_data::unique_username("resp"),
        Position::RegionalSpecialist,
        Some(fixture.regional.id),
    )
    .await;
    let (first, _) = test_data::seed_activity(
        db,
        plan.id,
        "First Activity",
        responsible.id,
        &[fixture.regional_director.id],
    )
    .await;
    test_data::seed_activity(
        db,
        plan.id,
        "Second Activity",
        responsible.id,
        &[fixture.regional_director.id],
    )
    .await;

    // 片方だけ進捗を入れて平均を確かめる
    test_app
        .app
        .clone()
        .oneshot(create_request(
            "PATCH",
            &format!("/activities/{}", first.id),
            &token,
            &json!({ "status": "in_progress", "progress": 50 }),
        ))
        .await
        .unwrap();

    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request("GET", "/dashboard/summary", &token))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["data"]["total_plans"], 1);
    assert_eq!(body["data"]["approved_plans"], 0);
    assert_eq!(body["data"]["total_activities"], 2);
    assert_eq!(body["data"]["activities_by_status"]["pending"], 1);
    assert_eq!(body["data"]["activities_by_status"]["in_progress"], 1);

    // 活動のないレベルも件数0で現れる
    let progress = body["data"]["average_progress_by_level"]
        .as_array()
        .unwrap();
    assert_eq!(progress.len(), 3);

    let regional = progress
        .iter()
        .find(|p| p["level_name"] == "North Region")
        .unwrap();
    assert_eq!(regional["activity_count"], 2);
    assert_eq!(regional["average_progress"], 25.0);

    let base_unit = progress
        .iter()
        .find(|p| p["level_name"] == "Unit 12")
        .unwrap();
    assert_eq!(base_unit["activity_count"], 0);
    assert_eq!(base_unit["average_progress"], 0.0);
}
