use crate::archive_data::error::FetchError;
use crate::series::raw_series::RawSeries;
use crate::types::location::Town;
use crate::types::variable::Variable;
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OnceCell};

/// Identifies one cached series: a location and a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub location: String,
    pub variable: Variable,
}

impl SeriesKey {
    pub fn new(location: impl Into<String>, variable: Variable) -> Self {
        Self {
            location: location.into(),
            variable,
        }
    }

    pub fn for_town(town: &Town, variable: Variable) -> Self {
        Self::new(town.key(), variable)
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.location, self.variable)
    }
}

/// In-memory store of fetched series for the lifetime of a session.
///
/// Each key owns a once-cell: the first caller runs the fetch, concurrent callers for
/// the same key wait for it instead of fetching again. A failed fetch leaves the cell
/// empty, so the error goes back to the caller and the next call tries again.
pub struct SeriesCache {
    slots: Mutex<HashMap<SeriesKey, Arc<OnceCell<Arc<RawSeries>>>>>,
    fetch_timeout: Option<Duration>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            fetch_timeout: None,
        }
    }

    /// A cache that fails fetches running longer than `timeout` with
    /// [`FetchError::Timeout`].
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            fetch_timeout: Some(timeout),
        }
    }

    /// Returns the cached series for `key`, running `fetch_fn` if there is none yet.
    ///
    /// # Examples
    ///
    /// ```
    /// use climate_archive::{RawSeries, SeriesCache, SeriesKey, Variable};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), climate_archive::FetchError> {
    /// let cache = SeriesCache::new();
    /// let key = SeriesKey::new("Bordeaux - Gironde", Variable::TemperatureMin);
    ///
    /// let series = cache.get_or_fetch(&key, || async { Ok(RawSeries::default()) }).await?;
    /// assert!(series.is_empty());
    /// assert_eq!(cache.len().await, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &SeriesKey,
        fetch_fn: F,
    ) -> Result<Arc<RawSeries>, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RawSeries, FetchError>>,
    {
        let cell = {
            let mut slots = self.slots.lock().await;
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        if let Some(series) = cell.get() {
            debug!("Cache hit for {}", key);
            return Ok(Arc::clone(series));
        }

        let timeout = self.fetch_timeout;
        let series = cell
            .get_or_try_init(|| async move {
                info!("Cache miss for {}, fetching", key);
                let series = match timeout {
                    Some(limit) => tokio::time::timeout(limit, fetch_fn())
                        .await
                        .map_err(|_| FetchError::Timeout(limit))??,
                    None => fetch_fn().await?,
                };
                Ok::<_, FetchError>(Arc::new(series))
            })
            .await?;

        Ok(Arc::clone(series))
    }

    /// The cached series for `key`, without fetching.
    pub async fn get(&self, key: &SeriesKey) -> Option<Arc<RawSeries>> {
        let slots = self.slots.lock().await;
        slots.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Drops the entry for `key`. Returns whether a series was cached.
    pub async fn invalidate(&self, key: &SeriesKey) -> bool {
        let mut slots = self.slots.lock().await;
        slots
            .remove(key)
            .is_some_and(|cell| cell.initialized())
    }

    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }

    /// Number of series held.
    pub async fn len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for SeriesCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::raw_series::DailyValue;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_series() -> RawSeries {
        RawSeries::new(vec![DailyValue {
            date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            value: Some(1.5),
        }])
    }

    fn key() -> SeriesKey {
        SeriesKey::new("Bordeaux - Gironde", Variable::Precipitation)
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_fetch() {
        let cache = SeriesCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let key = key();
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(sample_series())
        };

        let (first, second) = tokio::join!(
            cache.get_or_fetch(&key, fetch),
            cache.get_or_fetch(&key, fetch)
        );

        let (first, second) = (first.unwrap(), second.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let cache = SeriesCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(sample_series())
        };

        cache.get_or_fetch(&key(), fetch).await.unwrap();
        let again = cache.get_or_fetch(&key(), fetch).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*again, sample_series());
        assert_eq!(cache.get(&key()).await.as_deref(), Some(&sample_series()));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = SeriesCache::new();
        let other = SeriesKey::new("Bordeaux - Gironde", Variable::TemperatureMax);
        cache
            .get_or_fetch(&key(), || async { Ok(sample_series()) })
            .await
            .unwrap();
        assert_eq!(cache.get(&other).await, None);
        cache
            .get_or_fetch(&other, || async { Ok(RawSeries::default()) })
            .await
            .unwrap();
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache = SeriesCache::new();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let failed = cache
            .get_or_fetch(&key(), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FetchError::MissingField {
                    url: "test://archive".to_string(),
                    field: "precipitation_sum".to_string(),
                })
            })
            .await;
        assert!(matches!(failed, Err(FetchError::MissingField { .. })));
        assert!(cache.is_empty().await);

        let retried = cache
            .get_or_fetch(&key(), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(sample_series())
            })
            .await;
        assert!(retried.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_slow_fetch_times_out() {
        let cache = SeriesCache::with_timeout(Duration::from_millis(10));
        let result = cache
            .get_or_fetch(&key(), || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(sample_series())
            })
            .await;
        assert!(matches!(result, Err(FetchError::Timeout(_))));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = SeriesCache::default();
        cache
            .get_or_fetch(&key(), || async { Ok(sample_series()) })
            .await
            .unwrap();
        assert!(cache.invalidate(&key()).await);
        assert!(!cache.invalidate(&key()).await);
        assert!(cache.is_empty().await);

        cache
            .get_or_fetch(&key(), || async { Ok(sample_series()) })
            .await
            .unwrap();
        cache.clear().await;
        assert_eq!(cache.get(&key()).await, None);
    }
}
