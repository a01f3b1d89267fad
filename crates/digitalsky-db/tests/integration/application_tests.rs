use digitalsky_core::AppError;
use digitalsky_core::models::{ApplicationStatus, ImportDroneApplication};
use digitalsky_core::testutil::complete_application;

use crate::integration::common::setup_test_db;

fn draft(id: &str, applicant_id: i64) -> ImportDroneApplication {
    ImportDroneApplication {
        id: Some(id.to_string()),
        applicant_id: Some(applicant_id),
        status: Some(ApplicationStatus::Draft),
        ..complete_application()
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn insert_and_find_by_id() {
    let (db, _container) = setup_test_db().await;
    let repo = db.application_repo();

    let saved = repo.insert(&draft("app-1", 7)).await.unwrap();
    assert_eq!(saved.id.as_deref(), Some("app-1"));
    assert!(saved.created_date.is_some());

    let found = repo
        .find_by_id("app-1")
        .await
        .unwrap()
        .expect("Should find the application");
    assert_eq!(found.applicant_id, Some(7));
    assert_eq!(found.status, Some(ApplicationStatus::Draft));
    assert_eq!(found.model_name.as_deref(), Some("SW-4 Surveyor"));

    assert!(repo.find_by_id("missing").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn update_replaces_document_and_status() {
    let (db, _container) = setup_test_db().await;
    let repo = db.application_repo();

    let mut application = repo.insert(&draft("app-1", 7)).await.unwrap();
    application.status = Some(ApplicationStatus::Submitted);
    application.security_clearance_doc_name = Some("clearance.pdf".into());

    let updated = repo.update(&application).await.unwrap();
    assert_eq!(updated.status, Some(ApplicationStatus::Submitted));

    let found = repo.find_by_id("app-1").await.unwrap().unwrap();
    assert_eq!(found.status, Some(ApplicationStatus::Submitted));
    assert_eq!(
        found.security_clearance_doc_name.as_deref(),
        Some("clearance.pdf")
    );
}

#[tokio::test]
#[ignore = "requires docker"]
async fn update_missing_is_not_found() {
    let (db, _container) = setup_test_db().await;
    let repo = db.application_repo();

    let err = repo.update(&draft("ghost", 7)).await.unwrap_err();
    assert!(matches!(err, AppError::ApplicationNotFound(id) if id == "ghost"));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn find_by_applicant_only_returns_owned() {
    let (db, _container) = setup_test_db().await;
    let repo = db.application_repo();

    repo.insert(&draft("a", 1)).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    repo.insert(&draft("b", 1)).await.unwrap();
    repo.insert(&draft("c", 2)).await.unwrap();

    let mine = repo.find_by_applicant(1).await.unwrap();
    let ids: Vec<_> = mine.iter().filter_map(|a| a.id.as_deref()).collect();
    // Newest first
    assert_eq!(ids, vec!["b", "a"]);

    assert!(repo.find_by_applicant(99).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn find_all_keeps_null_status() {
    let (db, _container) = setup_test_db().await;
    let repo = db.application_repo();

    let mut legacy = draft("legacy", 3);
    legacy.status = None;
    repo.insert(&legacy).await.unwrap();
    repo.insert(&draft("a", 1)).await.unwrap();

    let all = repo.find_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|a| a.status.is_none()));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn insert_without_applicant_fails() {
    let (db, _container) = setup_test_db().await;
    let repo = db.application_repo();

    let mut orphan = draft("orphan", 1);
    orphan.applicant_id = None;
    let err = repo.insert(&orphan).await.unwrap_err();
    assert!(matches!(err, AppError::DatabaseError(_)));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn health_check_succeeds() {
    let (db, _container) = setup_test_db().await;
    let repo = db.application_repo();
    repo.health_check().await.unwrap();
}

#[tokio::test]
#[ignore = "requires docker"]
async fn status_column_rejects_unknown_values() {
    let (db, _container) = setup_test_db().await;

    let result = sqlx::query(
        "INSERT INTO import_drone_applications (id, applicant_id, status, data)
         VALUES ('bad', 1, 'ARCHIVED', '{}'::jsonb)",
    )
    .execute(db.pool())
    .await;

    assert!(result.is_err());
}
