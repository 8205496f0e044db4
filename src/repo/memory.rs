/// In-memory launch store, loaded from a JSON file or built from fixtures
use super::{decode_batch, decode_keyed, malformed, not_found, RecordStore};
use crate::domain::LaunchRecord;
use crate::errors::{ApiError, ApiResult};
use crate::utils;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;

/// Holds raw items and decodes them on every read, like a remote store would
#[derive(Clone, Debug, Default)]
pub struct MemoryLaunchStore {
    items: Vec<Value>,
}

impl MemoryLaunchStore {
    pub fn from_items(items: Vec<Value>) -> Self {
        Self { items }
    }

    pub fn from_records(records: &[LaunchRecord]) -> ApiResult<Self> {
        let items = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { items })
    }

    /// Load a JSON array of launch items
    pub fn from_file(path: impl AsRef<Path>) -> ApiResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        match serde_json::from_str::<Value>(&raw)? {
            Value::Array(items) => Ok(Self { items }),
            _ => Err(ApiError::StoreUnavailable(format!(
                "{} does not contain a JSON array",
                path.as_ref().display()
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[async_trait]
impl RecordStore for MemoryLaunchStore {
    async fn fetch_all(&self) -> ApiResult<Vec<LaunchRecord>> {
        decode_batch(&self.items)
    }

    async fn fetch_by_key(&self, flight_number: u64) -> ApiResult<LaunchRecord> {
        let mut hits = self.items.iter().filter(|item| {
            item.get("flight_number").and_then(utils::flight_number) == Some(flight_number)
        });

        match (hits.next(), hits.next()) {
            (Some(item), None) => decode_keyed(item, flight_number),
            (Some(_), Some(_)) => Err(malformed(format_args!(
                "flight {} appears more than once",
                flight_number
            ))),
            (None, _) => Err(not_found(flight_number)),
        }
    }

    async fn ping(&self) -> ApiResult<()> {
        Ok(())
    }
}
