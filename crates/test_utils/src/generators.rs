//! Property-Based Test Generators
//!
//! Provides proptest strategies for column values and records. Generated
//! values stay inside what PostgreSQL stores losslessly: text without NUL
//! bytes and timestamps at microsecond precision.

use chrono::{DateTime, TimeZone, Utc};
use domain_deploy::{Application, Deployment};
use proptest::prelude::*;
use uuid::Uuid;

/// Strategy for text PostgreSQL can store (no NUL bytes)
pub fn text_strategy() -> impl Strategy<Value = String> {
    "[^\\x00]{0,40}"
}

/// Strategy for identifier-like names
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{2,20}"
}

/// Strategy for text arrays without NULL elements
pub fn text_array_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(text_strategy(), 0..6)
}

/// Strategy for Uuid values
pub fn uuid_strategy() -> impl Strategy<Value = Uuid> {
    any::<[u8; 16]>().prop_map(Uuid::from_bytes)
}

/// Strategy for timestamps between 1970 and 2100 at microsecond precision
pub fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800i64, 0u32..1_000_000u32).prop_map(|(secs, micros)| {
        Utc.timestamp_opt(secs, micros * 1_000).unwrap()
    })
}

/// Strategy for stored applications
pub fn application_strategy() -> impl Strategy<Value = Application> {
    (
        1i32..i32::MAX,
        name_strategy(),
        name_strategy(),
        text_strategy(),
        text_array_strategy(),
        prop_oneof![Just(String::new()), Just("v2".to_string()), Just("v3".to_string())],
        text_strategy(),
    )
        .prop_map(|(id, name, namespace, database_url, restricted_tables, helm_version, flux_version)| {
            Application {
                id,
                name,
                namespace,
                database_url,
                restricted_tables,
                helm_version,
                flux_version,
            }
        })
}

/// Strategy for stored deployments
pub fn deployment_strategy() -> impl Strategy<Value = Deployment> {
    (
        uuid_strategy(),
        1i32..i32::MAX,
        prop_oneof![Just("pending"), Just("running"), Just("done"), Just("failed")],
        text_strategy(),
        name_strategy(),
        text_strategy(),
        timestamp_strategy(),
        timestamp_strategy(),
    )
        .prop_map(|(id, app_id, status, image_url, author, description, updated_at, created_at)| {
            Deployment {
                id,
                app_id,
                status: status.to_string(),
                image_url,
                author,
                description,
                updated_at,
                created_at,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn timestamps_have_microsecond_precision(ts in timestamp_strategy()) {
            prop_assert_eq!(ts.timestamp_subsec_nanos() % 1_000, 0);
        }

        #[test]
        fn text_has_no_nul(text in text_strategy()) {
            prop_assert!(!text.contains('\0'));
        }
    }
}
