//! Caller-facing pipeline
//!
//! Ties validation, the address store and the check service together the
//! way an interactive caller uses them: register an address from raw input,
//! then check it by id.

use crate::checker::fetcher::{HttpFetcher, PageFetcher};
use crate::checker::service::{CheckOutcome, CheckService};
use crate::config::Config;
use crate::storage::{
    Address, AddressRepository, AddressSummary, CheckRecord, CheckRepository, Database,
    StorageError,
};
use crate::url::validate_url;
use crate::AnalyzerError;

/// Result of registering an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub address: Address,
    /// `false` when the canonical address was already stored
    pub created: bool,
}

/// The whole site-check pipeline over one database
pub struct Pipeline<F = HttpFetcher> {
    addresses: AddressRepository,
    checks: CheckRepository,
    service: CheckService<F, CheckRepository>,
}

impl Pipeline<HttpFetcher> {
    /// Opens the configured database and builds the HTTP fetcher
    pub fn from_config(config: &Config) -> Result<Self, AnalyzerError> {
        let db = Database::open(&config.database.location)?;
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        Ok(Self::new(db, fetcher))
    }
}

impl<F: PageFetcher> Pipeline<F> {
    pub fn new(db: Database, fetcher: F) -> Self {
        let checks = CheckRepository::new(db.clone());
        Self {
            addresses: AddressRepository::new(db),
            service: CheckService::new(fetcher, checks.clone()),
            checks,
        }
    }

    /// Validates raw input and stores its canonical address
    ///
    /// Registering an address that is already stored returns the existing
    /// row with `created == false`.
    pub fn register(&self, raw: &str) -> Result<Registration, AnalyzerError> {
        let url = validate_url(raw).map_err(|e| {
            tracing::debug!("Rejected {:?}: {}", raw, e);
            e
        })?;

        let (address, created) = self.addresses.find_or_create(&url)?;
        Ok(Registration { address, created })
    }

    /// Checks a stored address now
    ///
    /// Returns the checked address together with the outcome so callers
    /// need no second lookup.
    pub async fn check(&self, address_id: i64) -> Result<(Address, CheckOutcome), AnalyzerError> {
        let address = self
            .addresses
            .find_by_id(address_id)?
            .ok_or(StorageError::AddressNotFound(address_id))?;

        let outcome = self.service.perform_check(address.id, &address.name).await?;
        Ok((address, outcome))
    }

    /// An address with its check history, newest first
    pub fn history(
        &self,
        address_id: i64,
    ) -> Result<Option<(Address, Vec<CheckRecord>)>, AnalyzerError> {
        let Some(address) = self.addresses.find_by_id(address_id)? else {
            return Ok(None);
        };
        let checks = self.checks.find_all_by_address(address.id, None)?;
        Ok(Some((address, checks)))
    }

    /// Every address with its latest check
    pub fn summaries(&self) -> Result<Vec<AddressSummary>, AnalyzerError> {
        Ok(self.addresses.list_with_last_check()?)
    }

    pub fn addresses(&self) -> &AddressRepository {
        &self.addresses
    }

    pub fn checks(&self) -> &CheckRepository {
        &self.checks
    }
}
