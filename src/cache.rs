use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use crate::{errors::ProcessingError, models::case::CaseType};

/// Read-through cache for case-type metadata, shared across all in-flight
/// events. Single-flight per key: concurrent first-time lookups of the same
/// reference trigger at most one upstream fetch; the other callers wait for
/// its result. A failed fetch leaves the slot empty so the next caller
/// tries again. Entries are never invalidated; values are immutable
/// upstream.
#[derive(Default)]
pub struct CaseTypeCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<CaseType>>>>,
}

impl CaseTypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_fetch<F, Fut>(
        &self,
        case_type_ref: &str,
        fetch: F,
    ) -> Result<CaseType, ProcessingError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CaseType, ProcessingError>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            Arc::clone(entries.entry(case_type_ref.to_string()).or_default())
        };

        if let Some(cached) = cell.get() {
            debug!(case_type_ref, "Case type served from cache");
            return Ok(cached.clone());
        }

        cell.get_or_try_init(fetch).await.cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
