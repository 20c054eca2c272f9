//! Check service: fetch, extract, persist
//!
//! One call runs one straight-line check: a single fetch, a best-effort
//! parse when the fetch succeeded, and exactly one stored record. Fetch and
//! parse problems are part of the outcome; only storage failures are
//! returned as errors.

use crate::checker::fetcher::{FetchResult, PageFetcher};
use crate::checker::parser::extract;
use crate::storage::{CheckStore, NewCheck, StorageResult};

/// Result of one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Whether the page was fetched successfully
    pub success: bool,
    /// The fields that were stored
    pub check: NewCheck,
    /// Id of the stored record
    pub check_id: i64,
}

/// Orchestrates fetcher → parser → store
#[derive(Debug, Clone)]
pub struct CheckService<F, S> {
    fetcher: F,
    store: S,
}

impl<F, S> CheckService<F, S>
where
    F: PageFetcher,
    S: CheckStore,
{
    pub fn new(fetcher: F, store: S) -> Self {
        Self { fetcher, store }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Checks `url` once and records the result against `address_id`
    ///
    /// A failed fetch is still recorded: `status_code` is whatever the
    /// server answered (absent for transport failures), `h1` and `title`
    /// are empty, and `description` holds the failure kind.
    ///
    /// # Arguments
    ///
    /// * `address_id` - Id of the stored address the record belongs to
    /// * `url` - Canonical URL to fetch
    ///
    /// # Returns
    ///
    /// * `Ok(CheckOutcome)` - The stored fields, their record id and whether the fetch succeeded
    /// * `Err(StorageError)` - The record could not be written
    pub async fn perform_check(&self, address_id: i64, url: &str) -> StorageResult<CheckOutcome> {
        let result = self.fetcher.fetch(url).await;
        let success = result.is_success();

        let check = match result {
            FetchResult::Success { status_code, body } => {
                let summary = extract(&body);
                NewCheck {
                    status_code: Some(status_code),
                    h1: summary.h1,
                    title: summary.title,
                    description: summary.description,
                }
            }
            FetchResult::Failure { status_code, kind } => {
                tracing::warn!(
                    "Check of {} failed: {} (status {:?})",
                    url,
                    kind,
                    status_code
                );
                NewCheck {
                    status_code,
                    h1: None,
                    title: None,
                    description: Some(kind.as_str().to_string()),
                }
            }
        };

        let check_id = self.store.save_check(address_id, &check)?;
        tracing::info!(
            "Stored check #{} for address #{} (status {:?})",
            check_id,
            address_id,
            check.status_code
        );

        Ok(CheckOutcome {
            success,
            check,
            check_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::fetcher::FetchErrorKind;
    use crate::storage::{AddressRepository, CheckRepository, Database, StorageError};
    use crate::url::validate_url;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns the same canned result for every URL
    struct StubFetcher(FetchResult);

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, _url: &str) -> FetchResult {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<(i64, NewCheck)>>,
    }

    impl CheckStore for RecordingStore {
        fn save_check(&self, address_id: i64, check: &NewCheck) -> StorageResult<i64> {
            let mut saved = self.saved.lock().unwrap();
            saved.push((address_id, check.clone()));
            Ok(saved.len() as i64)
        }
    }

    struct BrokenStore;

    impl CheckStore for BrokenStore {
        fn save_check(&self, _address_id: i64, _check: &NewCheck) -> StorageResult<i64> {
            Err(StorageError::LockPoisoned)
        }
    }

    fn success(status_code: u16, body: &str) -> StubFetcher {
        StubFetcher(FetchResult::Success {
            status_code,
            body: body.to_string(),
        })
    }

    fn failure(status_code: Option<u16>, kind: FetchErrorKind) -> StubFetcher {
        StubFetcher(FetchResult::Failure { status_code, kind })
    }

    #[tokio::test]
    async fn test_successful_check_is_parsed_and_stored() {
        let service = CheckService::new(success(200, "<title>T</title>"), RecordingStore::default());

        let outcome = service.perform_check(7, "https://example.com").await.unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.check.status_code, Some(200));
        assert_eq!(outcome.check.title.as_deref(), Some("T"));
        assert_eq!(outcome.check.h1, None);

        let saved = service.store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0], (7, outcome.check.clone()));
    }

    #[tokio::test]
    async fn test_not_found_is_recorded_as_failure() {
        let service = CheckService::new(
            failure(Some(404), FetchErrorKind::RequestError),
            RecordingStore::default(),
        );

        let outcome = service.perform_check(1, "https://example.com").await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.check.status_code, Some(404));
        assert_eq!(outcome.check.h1, None);
        assert_eq!(outcome.check.title, None);
        assert_eq!(outcome.check.description.as_deref(), Some("request_error"));
        assert_eq!(service.store.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_recorded_without_status() {
        let service = CheckService::new(
            failure(None, FetchErrorKind::ConnectError),
            RecordingStore::default(),
        );

        let outcome = service.perform_check(1, "https://unreachable.test").await.unwrap();

        assert!(!outcome.success);
        assert_eq!(
            outcome.check,
            NewCheck {
                status_code: None,
                h1: None,
                title: None,
                description: Some("connect_error".to_string()),
            }
        );
        assert_eq!(service.store.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let service = CheckService::new(success(200, "<h1>x</h1>"), BrokenStore);
        let result = service.perform_check(1, "https://example.com").await;
        assert!(matches!(result, Err(StorageError::LockPoisoned)));
    }

    #[tokio::test]
    async fn test_persists_through_repository() {
        let db = Database::open_in_memory().unwrap();
        let address_id = AddressRepository::new(db.clone())
            .insert(&validate_url("https://example.com").unwrap())
            .unwrap();
        let checks = CheckRepository::new(db);
        let service = CheckService::new(
            success(200, "<h1>Hi</h1><meta name=\"description\" content=\"About\">"),
            checks.clone(),
        );

        let outcome = service
            .perform_check(address_id, "https://example.com")
            .await
            .unwrap();

        let record = checks.find_by_id(outcome.check_id).unwrap().unwrap();
        assert_eq!(record.address_id, address_id);
        assert_eq!(record.status_code, Some(200));
        assert_eq!(record.h1.as_deref(), Some("Hi"));
        assert_eq!(record.title, None);
        assert_eq!(record.description.as_deref(), Some("About"));
    }

    #[tokio::test]
    async fn test_unknown_address_is_storage_error() {
        let db = Database::open_in_memory().unwrap();
        let service = CheckService::new(success(200, ""), CheckRepository::new(db));
        let result = service.perform_check(404, "https://example.com").await;
        assert!(matches!(result, Err(StorageError::Sqlite(_))));
    }
}
