//! Repository behavior against a scripted driver
//!
//! These tests check which statements the repository issues and how it
//! turns driver results into records and errors, without a database.

use chrono::Utc;
use domain_deploy::{Application, Deployment};
use infra_db::{DatabaseError, Repository};
use mapping_core::{
    DriverError, MappingError, RepositoryDescriptor, Row, UpdateStamp, Value,
};
use test_utils::{
    assert_not_assigned, assert_sql, ApplicationFixtures, DeploymentFixtures, ScriptedDriver,
};

fn applications() -> Repository<Application, ScriptedDriver> {
    let descriptor = RepositoryDescriptor::new("applications", "id").unwrap();
    Repository::new(ScriptedDriver::new(), descriptor)
}

fn deployments() -> Repository<Deployment, ScriptedDriver> {
    let descriptor = RepositoryDescriptor::new("deployments", "id")
        .unwrap()
        .with_update_stamp(UpdateStamp::enabled());
    Repository::new(ScriptedDriver::new(), descriptor)
}

#[tokio::test]
async fn test_find_empty_key_issues_no_statement() {
    let repo = applications();

    let err = repo.find("").await.unwrap_err();

    assert!(err.is_empty_key());
    assert_eq!(repo.driver().statement_count(), 0);
}

#[tokio::test]
async fn test_find_unparsable_key_issues_no_statement() {
    let repo = applications();

    let err = repo.find("two").await.unwrap_err();

    assert!(matches!(
        err,
        DatabaseError::Mapping { source: MappingError::InvalidKey { .. }, .. }
    ));
    assert_eq!(repo.driver().statement_count(), 0);
}

#[tokio::test]
async fn test_find_returns_matching_record() {
    let repo = applications();
    let app = ApplicationFixtures::billing();
    repo.driver().push_rows(vec![ApplicationFixtures::row(&app)]);

    let found = repo.find("2").await.unwrap();

    assert_eq!(found, app);
    let stmt = repo.driver().last_statement().unwrap();
    assert_sql(&stmt, "SELECT * FROM applications WHERE id=$1");
    assert_eq!(stmt.params, vec![Value::Integer(2)]);
}

#[tokio::test]
async fn test_find_without_row_is_not_found() {
    let repo = applications();

    let err = repo.find("42").await.unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("applications"));
    assert!(err.to_string().contains("42"));
}

#[tokio::test]
async fn test_find_uses_first_row() {
    let repo = applications();
    let first = ApplicationFixtures::billing();
    let mut second = ApplicationFixtures::billing();
    second.name = "shadow".into();
    repo.driver()
        .push_rows(vec![ApplicationFixtures::row(&first), ApplicationFixtures::row(&second)]);

    let found = repo.find("2").await.unwrap();

    assert_eq!(found.name, "billing");
}

#[tokio::test]
async fn test_list_empty_table() {
    let repo = applications();

    let apps = repo.list().await.unwrap();

    assert!(apps.is_empty());
    assert_sql(&repo.driver().statements()[0], "SELECT * FROM applications");
}

#[tokio::test]
async fn test_list_materializes_every_row() {
    let repo = applications();
    let billing = ApplicationFixtures::billing();
    let mut search = ApplicationFixtures::billing();
    search.id = 3;
    search.name = "search".into();
    search.restricted_tables.clear();
    repo.driver()
        .push_rows(vec![ApplicationFixtures::row(&billing), ApplicationFixtures::row(&search)]);

    let apps = repo.list().await.unwrap();

    assert_eq!(apps, vec![billing, search]);
}

#[tokio::test]
async fn test_list_fails_whole_result_on_bad_row() {
    let repo = applications();
    let good = ApplicationFixtures::row(&ApplicationFixtures::billing());
    let bad = Row::from_pairs([
        ("id", Value::Text("three".into())),
        ("name", Value::Text("broken".into())),
    ]);
    repo.driver().push_rows(vec![good, bad]);

    let err = repo.list().await.unwrap_err();

    assert!(err.is_record_initialization());
    assert_eq!(err.row_index(), Some(1));
    assert!(err.to_string().contains("at row 1"));
    assert!(err.to_string().contains("Application.id"));
}

#[tokio::test]
async fn test_list_row_decode_is_row_extraction() {
    let repo = applications();
    repo.driver()
        .push_query_error(DriverError::RowDecode("column meta: unsupported column type JSONB".into()));

    let err = repo.list().await.unwrap_err();

    assert!(err.is_row_extraction());
}

#[tokio::test]
async fn test_list_null_columns_keep_defaults() {
    let repo = applications();
    repo.driver().push_rows(vec![Row::from_pairs([
        ("id", Value::Integer(5)),
        ("name", Value::Text("nulls".into())),
        ("namespace", Value::Null),
        ("restricted_tables", Value::Null),
    ])]);

    let apps = repo.list().await.unwrap();

    assert_eq!(apps[0].id, 5);
    assert_eq!(apps[0].namespace, "");
    assert!(apps[0].restricted_tables.is_empty());
}

#[tokio::test]
async fn test_add_excludes_primary_key_and_returns_stored_row() {
    let repo = applications();
    let new_app = ApplicationFixtures::new_app();
    let mut stored = new_app.clone();
    stored.id = 11;
    repo.driver().push_rows(vec![ApplicationFixtures::row(&stored)]);

    let result = repo.add(&new_app).await.unwrap();

    assert_eq!(result.id, 11);
    assert_eq!(result.name, "new-app");
    assert_eq!(result.restricted_tables, vec!["a".to_string(), "b".to_string()]);

    let stmt = repo.driver().last_statement().unwrap();
    assert_sql(
        &stmt,
        "INSERT INTO applications (name, namespace, database_url, restricted_tables, helm_version, flux_version) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, name, namespace, database_url, restricted_tables, helm_version, flux_version",
    );
    assert_eq!(stmt.params.len(), 6);
    assert_eq!(
        stmt.params[3],
        Value::TextArray(vec![Some("a".into()), Some("b".into())])
    );
}

#[tokio::test]
async fn test_add_without_returned_row_is_not_found() {
    let repo = applications();

    let err = repo.add(&ApplicationFixtures::new_app()).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_add_not_null_violation_is_query_failed() {
    let repo = applications();
    repo.driver().push_query_error(DriverError::NotNullViolation(
        "null value in column \"namespace\" violates not-null constraint".into(),
    ));

    let err = repo.add(&ApplicationFixtures::new_app()).await.unwrap_err();

    assert!(err.is_query_failed());
    assert!(err.is_constraint_violation());
    assert!(matches!(err.driver_error(), Some(DriverError::NotNullViolation(_))));
    assert!(err.to_string().contains("INSERT INTO applications"));
}

#[tokio::test]
async fn test_update_targets_own_key_without_assigning_it() {
    let repo = applications();
    let mut app = ApplicationFixtures::billing();
    app.toggle_helm_version();
    repo.driver().push_rows(vec![ApplicationFixtures::row(&app)]);

    let updated = repo.update(&app).await.unwrap();

    assert_eq!(updated.helm_version, "v3");
    let stmt = repo.driver().last_statement().unwrap();
    assert_not_assigned(&stmt, "id");
    assert!(stmt.sql.contains(" WHERE id=$7 RETURNING "));
    assert_eq!(stmt.params.last(), Some(&Value::Integer(2)));
}

#[tokio::test]
async fn test_update_without_stamp_keeps_record_timestamps() {
    let descriptor = RepositoryDescriptor::<Deployment>::new("deployments", "id").unwrap();
    let repo = Repository::new(ScriptedDriver::new(), descriptor);
    let deployment = DeploymentFixtures::pending();
    repo.driver().push_rows(vec![DeploymentFixtures::row(&deployment)]);

    repo.update(&deployment).await.unwrap();

    let stmt = repo.driver().last_statement().unwrap();
    assert!(stmt.params.contains(&Value::Timestamp(deployment.updated_at)));
}

#[tokio::test]
async fn test_update_stamps_updated_at() {
    let repo = deployments();
    let mut deployment = DeploymentFixtures::pending();
    deployment.status = "done".into();
    repo.driver().push_rows(vec![DeploymentFixtures::row(&deployment)]);

    let before = Utc::now();
    repo.update(&deployment).await.unwrap();
    let after = Utc::now();

    let stmt = repo.driver().last_statement().unwrap();
    assert_sql(
        &stmt,
        "UPDATE deployments SET app_id=$1, status=$2, image_url=$3, author=$4, description=$5, \
         updated_at=$6, created_at=$7 WHERE id=$8 \
         RETURNING id, app_id, status, image_url, author, description, updated_at, created_at",
    );
    match &stmt.params[5] {
        Value::Timestamp(ts) => assert!(*ts >= before && *ts <= after),
        other => panic!("expected timestamp, got {:?}", other),
    }
    assert_eq!(stmt.params[6], Value::Timestamp(deployment.created_at));
    assert_eq!(stmt.params[7], Value::Uuid(deployment.id));
    // The caller's record is untouched
    assert_eq!(deployment.updated_at, DeploymentFixtures::pending().updated_at);
}

#[tokio::test]
async fn test_delete_binds_parsed_key() {
    let repo = deployments();
    let id = DeploymentFixtures::pending().id;
    repo.driver().push_affected(1);

    repo.delete(&id.to_string()).await.unwrap();

    let stmt = repo.driver().last_statement().unwrap();
    assert_sql(&stmt, "DELETE FROM deployments WHERE id=$1");
    assert_eq!(stmt.params, vec![Value::Uuid(id)]);
}

#[tokio::test]
async fn test_delete_missing_row_is_silent() {
    let repo = applications();
    repo.driver().push_affected(0);

    assert!(repo.delete("99").await.is_ok());
}

#[tokio::test]
async fn test_delete_empty_key_rejected() {
    let repo = applications();

    let err = repo.delete("").await.unwrap_err();

    assert!(err.is_empty_key());
    assert_eq!(repo.driver().statement_count(), 0);
}

#[tokio::test]
async fn test_delete_driver_failure_is_query_failed() {
    let repo = applications();
    repo.driver()
        .push_execute_error(DriverError::ForeignKeyViolation("deployments_app_id_fkey".into()));

    let err = repo.delete("2").await.unwrap_err();

    assert!(err.is_query_failed());
    assert!(err.to_string().contains("DELETE FROM applications"));
}

#[tokio::test]
async fn test_connection_errors_surface_without_retry() {
    let repo = applications();
    repo.driver().push_query_error(DriverError::Timeout(250));

    let err = repo.find("2").await.unwrap_err();

    assert!(err.is_connection_error());
    assert_eq!(repo.driver().statement_count(), 1);
}

#[tokio::test]
async fn test_clones_share_driver() {
    let repo = applications();
    let clone = repo.clone();

    clone.list().await.unwrap();

    assert_eq!(repo.driver().statement_count(), 1);
}
