// tests/approval_workflow_tests.rs

mod common;

use axum::{
    body::{self},
    http::StatusCode,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::app_helper::{setup_app, TestApp};
use common::request::{create_empty_request, create_request};
use common::test_data::{self, OrgFixture};
use plan_backend::domain::position::Position;
use plan_backend::domain::{activity_model, approval_model, user_model};

async fn read_json(res: axum::response::Response) -> Value {
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// BaseUnitレベルの計画と活動を用意する
///
/// 階層解決により承認順は BaseUnit → Regional → Central のディレクター。
async fn setup_activity_with_chain(
    test_app: &TestApp,
) -> (
    OrgFixture,
    user_model::Model,
    activity_model::Model,
    Vec<approval_model::Model>,
) {
    let db = &test_app.db.connection;
    let admin = test_data::seed_admin(db, &test_app.password_manager).await;
    let fixture = test_data::seed_org_hierarchy(db, &test_app.password_manager).await;
    let plan = test_data::seed_plan(db, 2025, admin.id, fixture.base_unit.id).await;

    let responsible = test_data::seed_user_at_level(
        db,
        &test_app.password_manager,
        &test_data::unique_username("resp"),
        Position::BaseUnitSpecialist,
        Some(fixture.base_unit.id),
    )
    .await;

    let (activity, approvals) = test_data::seed_activity(
        db,
        plan.id,
        "Safety Inspection",
        responsible.id,
        &[
            fixture.base_unit_director.id,
            fixture.regional_director.id,
            fixture.general_director.id,
        ],
    )
    .await;

    (fixture, responsible, activity, approvals)
}

async fn decide(
    test_app: &TestApp,
    approval_id: uuid::Uuid,
    approver: &user_model::Model,
    decision: &str,
    comments: &str,
) -> (StatusCode, Value) {
    let res = test_app
        .app
        .clone()
        .oneshot(create_request(
            "POST",
            &format!("/approvals/{}/decide", approval_id),
            &test_app.token_for(approver),
            &json!({ "decision": decision, "comments": comments }),
        ))
        .await
        .unwrap();

    let status = res.status();
    (status, read_json(res).await)
}

#[tokio::test]
async fn test_full_chain_approves_activity() {
    let test_app = setup_app().await;
    let (fixture, _, activity, approvals) = setup_activity_with_chain(&test_app).await;

    let (status, body) = decide(
        &test_app,
        approvals[0].id,
        &fixture.base_unit_director,
        "approved",
        "Looks good at unit level",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["approval"]["status"], "approved");
    assert!(body["data"]["approval"]["decided_at"].as_str().is_some());
    assert_eq!(body["data"]["activity_finalized"], false);
    assert_eq!(body["data"]["activity_status"], "pending");

    let (status, body) = decide(
        &test_app,
        approvals[1].id,
        &fixture.regional_director,
        "approved",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["activity_finalized"], false);

    // 最後の承認で活動が承認済みに確定する
    let (status, body) = decide(
        &test_app,
        approvals[2].id,
        &fixture.general_director,
        "approved",
        "Final sign-off",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["activity_finalized"], true);
    assert_eq!(body["data"]["activity_status"], "approved");

    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "GET",
            &format!("/activities/{}/approvals", activity.id),
            &test_app.token_for(&fixture.general_director),
        ))
        .await
        .unwrap();
    let body = read_json(res).await;
    let approvals_json = body["data"].as_array().unwrap();
    assert!(approvals_json.iter().all(|a| a["status"] == "approved"));
    assert!(approvals_json
        .iter()
        .all(|a| a["decided_at"].as_str().is_some()));
}

#[tokio::test]
async fn test_decide_out_of_order_is_rejected() {
    let test_app = setup_app().await;
    let (fixture, _, _, approvals) = setup_activity_with_chain(&test_app).await;

    // 2番目の承認者は1番目が未判定のうちは動けない
    let (status, body) = decide(
        &test_app,
        approvals[1].id,
        &fixture.regional_director,
        "approved",
        "",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("waiting on order 1"));
}

#[tokio::test]
async fn test_rejection_finalizes_activity() {
    let test_app = setup_app().await;
    let (fixture, _, activity, approvals) = setup_activity_with_chain(&test_app).await;

    let (status, _) = decide(
        &test_app,
        approvals[0].id,
        &fixture.base_unit_director,
        "approved",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = decide(
        &test_app,
        approvals[1].id,
        &fixture.regional_director,
        "rejected",
        "Budget is not justified",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["activity_finalized"], true);
    assert_eq!(body["data"]["activity_status"], "rejected");
    assert_eq!(
        body["data"]["approval"]["comments"],
        "Budget is not justified"
    );

    // 確定後の残り承認には判定を入れられない
    let (status, body) = decide(
        &test_app,
        approvals[2].id,
        &fixture.general_director,
        "approved",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "conflict");

    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "GET",
            &format!("/activities/{}", activity.id),
            &test_app.token_for(&fixture.regional_director),
        ))
        .await
        .unwrap();
    let body = read_json(res).await;
    assert_eq!(body["data"]["status"], "rejected");
}

#[tokio::test]
async fn test_decide_twice_conflicts() {
    let test_app = setup_app().await;
    let (fixture, _, _, approvals) = setup_activity_with_chain(&test_app).await;

    let (status, _) = decide(
        &test_app,
        approvals[0].id,
        &fixture.base_unit_director,
        "approved",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = decide(
        &test_app,
        approvals[0].id,
        &fixture.base_unit_director,
        "rejected",
        "Changed my mind",
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_only_assigned_approver_can_decide() {
    let test_app = setup_app().await;
    let (fixture, responsible, _, approvals) = setup_activity_with_chain(&test_app).await;

    // 担当者本人にも他人の承認は判定できない
    let (status, body) = decide(&test_app, approvals[0].id, &responsible, "approved", "").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_type"], "forbidden");

    // 別の承認者でも自分の行でなければ403
    let (status, _) = decide(
        &test_app,
        approvals[0].id,
        &fixture.regional_director,
        "approved",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_pending_list_reports_actionability() {
    let test_app = setup_app().await;
    let (fixture, _, _, approvals) = setup_activity_with_chain(&test_app).await;

    // 先頭の承認者はすぐ動ける
    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "GET",
            "/approvals/pending",
            &test_app.token_for(&fixture.base_unit_director),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    let pending = body["data"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["activity_name"], "Safety Inspection");
    assert_eq!(pending[0]["approval_order"], 1);
    assert_eq!(pending[0]["actionable"], true);

    // 2番目の承認者は順番待ち
    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "GET",
            "/approvals/pending",
            &test_app.token_for(&fixture.regional_director),
        ))
        .await
        .unwrap();
    let body = read_json(res).await;
    assert_eq!(body["data"][0]["actionable"], false);

    // 1番目が承認すると2番目が動けるようになる
    let (status, _) = decide(
        &test_app,
        approvals[0].id,
        &fixture.base_unit_director,
        "approved",
        "",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "GET",
            "/approvals/pending",
            &test_app.token_for(&fixture.regional_director),
        ))
        .await
        .unwrap();
    let body = read_json(res).await;
    assert_eq!(body["data"][0]["actionable"], true);

    // 判定済みの承認者のリストからは消える
    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "GET",
            "/approvals/pending",
            &test_app.token_for(&fixture.base_unit_director),
        ))
        .await
        .unwrap();
    let body = read_json(res).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_pending_list_after_rejection_is_not_actionable() {
    let test_app = setup_app().await;
    let (fixture, _, _, approvals) = setup_activity_with_chain(&test_app).await;

    let (status, _) = decide(
        &test_app,
        approvals[0].id,
        &fixture.base_unit_director,
        "rejected",
        "Not this year",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // 活動が確定したので後続の承認行は残っていても動かせない
    let res = test_app
        .app
        .clone()
        .oneshot(create_empty_request(
            "GET",
            "/approvals/pending",
            &test_app.token_for(&fixture.regional_director),
        ))
        .await
        .unwrap();
    let body = read_json(res).await;
    let pending = body["data"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["actionable"], false);
    assert_eq!(pending[0]["activity_status"], "rejected");
}

#[tokio::test]
async fn test_configured_flow_overrides_hierarchy() {
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

    // 承認フローが設定されていれば階層ではなくそのロール順を使う
    let reviewer_one = test_data::seed_user(
        db,
        &test_app.password_manager,
        &test_data::unique_username("rev"),
        Position::RegionalSpecialist,
    )
    .await;
    let reviewer_two = test_data::seed_user(
        db,
        &test_app.password_manager,
        &test_data::unique_username("rev"),
        Position::GeneralDirector,
    )
    .await;
    test_data::seed_flow(db, &[reviewer_one.id, reviewer_two.id]).await;

    let res = test_app
        .app
        .clone()
        .oneshot(create_request(
            "POST",
            &format!("/plans/{}/activities", plan.id),
            &token,
            &json!({
                "name": "Flow Routed Activity",
                "responsible_id": responsible.id,
                "start_date": "2025-04-01",
                "end_date": "2025-06-30",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = read_json(res).await;
    let activity_id = body["data"]["id"].as_str().unwrap().to_string();

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
    let body = read_json(res).await;
    let approvals = body["data"].as_array().unwrap();
    assert_eq!(approvals.len(), 2);
    assert_eq!(
        approvals[0]["approver_id"],
        reviewer_one.id.to_string().as_str()
    );
    assert_eq!(
        approvals[1]["approver_id"],
        reviewer_two.id.to_string().as_str()
    );
}
