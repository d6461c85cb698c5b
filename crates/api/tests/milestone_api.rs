//! Milestone and weekly progress endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_milestone, create_project, get, patch_json, post_json};
use serde_json::json;

async fn current_ids(app: &common::TestApp, project_id: i64) -> Vec<i64> {
    let json = body_json(get(app, "/api/v1/projects", &app.manager()).await).await;
    let project = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == project_id)
        .unwrap()
        .clone();
    let mut ids: Vec<i64> = project["milestones"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    ids
}

#[tokio::test]
async fn third_current_milestone_demotes_the_oldest() {
    let app = common::build_test_app();
    let project = create_project(&app, &app.owner(), "Apollo").await;
    let first = create_milestone(&app, &app.owner(), project, true).await;
    let second = create_milestone(&app, &app.owner(), project, true).await;
    assert_eq!(current_ids(&app, project).await, vec![first, second]);

    let third = create_milestone(&app, &app.owner(), project, true).await;

    assert_eq!(current_ids(&app, project).await, vec![second, third]);
}

#[tokio::test]
async fn promoting_by_patch_keeps_at_most_two_current() {
    let app = common::build_test_app();
    let project = create_project(&app, &app.owner(), "Apollo").await;
    create_milestone(&app, &app.owner(), project, true).await;
    let second = create_milestone(&app, &app.owner(), project, true).await;
    let third = create_milestone(&app, &app.owner(), project, false).await;

    let response = patch_json(
        &app,
        &format!("/api/v1/milestones/{third}"),
        &app.owner(),
        json!({"is_current": true, "status": "in-progress"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_current"], true);
    assert_eq!(json["data"]["status"], "in-progress");
    assert_eq!(current_ids(&app, project).await, vec![second, third]);
}

#[tokio::test]
async fn clearing_current_never_rotates() {
    let app = common::build_test_app();
    let project = create_project(&app, &app.owner(), "Apollo").await;
    let first = create_milestone(&app, &app.owner(), project, true).await;
    let second = create_milestone(&app, &app.owner(), project, true).await;

    let response = patch_json(
        &app,
        &format!("/api/v1/milestones/{second}"),
        &app.owner(),
        json!({"is_current": false}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(current_ids(&app, project).await, vec![first]);
}

#[tokio::test]
async fn milestone_on_foreign_project_is_forbidden() {
    let app = common::build_test_app();
    let project = create_project(&app, &app.owner(), "Apollo").await;

    let response = post_json(
        &app,
        "/api/v1/milestones",
        &app.other(),
        json!({"project_id": project, "title": "Sneaky"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn milestone_requires_title() {
    let app = common::build_test_app();
    let project = create_project(&app, &app.owner(), "Apollo").await;

    let response = post_json(
        &app,
        "/api/v1/milestones",
        &app.owner(),
        json!({"project_id": project, "title": ""}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "title is required");
}

#[tokio::test]
async fn weekly_progress_round_trip_through_the_api() {
    let app = common::build_test_app();
    let project = create_project(&app, &app.owner(), "Apollo").await;
    let milestone = create_milestone(&app, &app.owner(), project, true).await;

    let response = post_json(
        &app,
        "/api/v1/weekly-progress",
        &app.owner(),
        json!({
            "milestone_id": milestone,
            "week_start_date": "2026-10-11",
            "week_end_date": "2026-10-17",
            "completed_this_week": ["Login page", " "],
            "task_delays": [{"task": "API", "isCompleted": false, "delayReasons": ["client"]}],
            "notes": "Good week",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["project_id"], project);
    assert_eq!(created["data"]["completed_this_week"], json!(["Login page"]));
    assert_eq!(created["data"]["task_delays"][0]["delayReasons"], json!(["client"]));
    let id = created["data"]["id"].as_i64().unwrap();

    let response = patch_json(
        &app,
        &format!("/api/v1/weekly-progress/{id}"),
        &app.owner(),
        json!({"goals_achieved": true, "notes": null}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["goals_achieved"], true);
    assert!(updated["data"]["notes"].is_null());
    assert_eq!(updated["data"]["completed_this_week"], json!(["Login page"]));
}

#[tokio::test]
async fn weekly_progress_on_foreign_milestone_is_forbidden() {
    let app = common::build_test_app();
    let project = create_project(&app, &app.owner(), "Apollo").await;
    let milestone = create_milestone(&app, &app.owner(), project, false).await;

    let response = post_json(
        &app,
        "/api/v1/weekly-progress",
        &app.other(),
        json!({
            "milestone_id": milestone,
            "week_start_date": "2026-10-11",
            "week_end_date": "2026-10-17",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn current_week_resolves_sunday_to_saturday() {
    let app = common::build_test_app();
    let response = get(
        &app,
        "/api/v1/weekly-progress/current-week?date=2026-10-15",
        &app.owner(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["week_start"], "2026-10-11");
    assert_eq!(json["data"]["week_end"], "2026-10-17");
    assert_eq!(json["data"]["week_number"], 41);
}
