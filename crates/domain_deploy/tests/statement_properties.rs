//! Statement properties over generated records

use chrono::Utc;
use domain_deploy::{Application, Deployment, APPLICATIONS_TABLE, DEPLOYMENTS_TABLE, PRIMARY_KEY};
use mapping_core::{materialize, RepositoryDescriptor, UpdateStamp, Value};
use proptest::prelude::*;
use test_utils::{
    application_strategy, assert_not_assigned, deployment_strategy, ApplicationFixtures,
    DeploymentFixtures,
};

proptest! {
    #[test]
    fn application_update_binds_own_key_last(app in application_strategy()) {
        let descriptor = RepositoryDescriptor::<Application>::new(APPLICATIONS_TABLE, PRIMARY_KEY).unwrap();

        let stmt = descriptor.update_statement(&app, Utc::now());

        assert_not_assigned(&stmt, PRIMARY_KEY);
        prop_assert_eq!(stmt.params.len(), 7);
        prop_assert_eq!(stmt.params.last(), Some(&Value::Integer(app.id.into())));
        prop_assert!(stmt.sql.ends_with(
            "RETURNING id, name, namespace, database_url, restricted_tables, helm_version, flux_version"
        ));
    }

    #[test]
    fn application_rows_materialize_to_record(app in application_strategy()) {
        let stored: Application = materialize(ApplicationFixtures::row(&app)).unwrap();
        prop_assert_eq!(stored, app);
    }

    #[test]
    fn deployment_stamp_only_touches_updated_at(deployment in deployment_strategy()) {
        let descriptor = RepositoryDescriptor::<Deployment>::new(DEPLOYMENTS_TABLE, PRIMARY_KEY)
            .unwrap()
            .with_update_stamp(UpdateStamp::enabled());
        let now = Utc::now();

        let stmt = descriptor.update_statement(&deployment, now);

        prop_assert_eq!(&stmt.params[5], &Value::Timestamp(now));
        prop_assert_eq!(&stmt.params[6], &Value::Timestamp(deployment.created_at));
        prop_assert_eq!(&stmt.params[1], &Value::Text(deployment.status.clone()));
        prop_assert_eq!(stmt.params.last(), Some(&Value::Uuid(deployment.id)));
    }

    #[test]
    fn deployment_rows_materialize_to_record(deployment in deployment_strategy()) {
        let stored: Deployment = materialize(DeploymentFixtures::row(&deployment)).unwrap();
        prop_assert_eq!(stored, deployment);
    }
}
