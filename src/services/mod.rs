/// Query orchestration over the launch record store
pub mod filter;
pub mod pagination;
pub mod stats;

pub use filter::{matches, FilterSet};
pub use pagination::{paginate, Page, PageRequest};
pub use stats::summarize;

use crate::domain::{LaunchRecord, ResultEnvelope, StatisticsSummary};
use crate::errors::{ApiError, ApiResult};
use crate::repo::RecordStore;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Launch query service
pub struct LaunchService {
    store: Arc<dyn RecordStore>,
    timeout: Duration,
}

impl LaunchService {
    pub fn new(store: Arc<dyn RecordStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Filtered, ordered, paginated launch list.
    ///
    /// Order of work: fetch, validate filters, filter, sort by flight
    /// number, validate paging, slice.
    pub async fn list(&self, params: &HashMap<String, String>) -> ApiResult<ResultEnvelope> {
        let records = self.fetch_all().await?;

        let filters = FilterSet::from_params(params)?;
        let mut matched: Vec<LaunchRecord> = records
            .into_iter()
            .filter(|record| filters.matches(record))
            .collect();
        matched.sort_by_key(|record| record.flight_number);

        let request = PageRequest::from_params(params)?;
        let page = paginate(matched, request);
        debug!(
            total = page.total,
            returned = page.items.len(),
            limit = request.limit,
            offset = request.offset,
            "Listed launches"
        );

        Ok(ResultEnvelope {
            data: page.items,
            total: page.total,
            limit: request.limit,
            offset: request.offset,
        })
    }

    /// Single launch by flight number
    pub async fn get(&self, flight_number: u64) -> ApiResult<LaunchRecord> {
        self.bounded(self.store.fetch_by_key(flight_number))
            .await
            .map_err(|e| {
                if !matches!(e, ApiError::NotFound(_)) {
                    error!(flight_number, "Launch lookup failed: {}", e);
                }
                e
            })
    }

    /// Statistics over the whole, unfiltered dataset
    pub async fn stats(&self) -> ApiResult<StatisticsSummary> {
        let records = self.fetch_all().await?;
        Ok(summarize(&records))
    }

    /// Whether the store answered a probe within the timeout
    pub async fn store_connected(&self) -> bool {
        match self.bounded(self.store.ping()).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Store health probe failed: {}", e);
                false
            }
        }
    }

    async fn fetch_all(&self) -> ApiResult<Vec<LaunchRecord>> {
        self.bounded(self.store.fetch_all()).await.map_err(|e| {
            error!("Fetching launches failed: {}", e);
            e
        })
    }

    /// Run a store call under the configured timeout
    async fn bounded<T>(&self, call: impl Future<Output = ApiResult<T>>) -> ApiResult<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::StoreUnavailable(format!(
                "store did not respond within {} ms",
                self.timeout.as_millis()
            ))),
        }
    }
}
