//! Entry point of the crate: a session that fetches, caches and charts archive series.

use crate::archive_data::fetcher::{OpenMeteoFetcher, SeriesSource};
use crate::archive_data::error::FetchError;
use crate::archive_data::series_cache::{SeriesCache, SeriesKey};
use crate::calendar::normalize::normalize;
use crate::chart::adapter::{to_chart_series, ChartSeries};
use crate::config::ArchiveConfig;
use crate::error::ArchiveError;
use crate::series::raw_series::RawSeries;
use crate::stats::aggregate::compute_stats;
use crate::stats::error::StatsError;
use crate::stats::year_stats::YearStats;
use crate::types::day_of_year::DayOfYearIndex;
use crate::types::location::Town;
use crate::types::variable::Variable;
use bon::bon;
use futures_util::future::try_join_all;
use log::{debug, info};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A chart ready to hand to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearChart {
    /// Cache key of the town, `"name - admin2"`.
    pub town: String,
    pub variable: Variable,
    pub year: i32,
    pub stats: YearStats,
    pub chart: ChartSeries,
    /// The selected year has no measurement; only the historical envelope is drawn.
    pub selected_year_missing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Ready(Box<YearChart>),
    /// A newer chart request was issued while this one was waiting for data.
    Stale,
}

impl ChartOutcome {
    pub fn into_chart(self) -> Option<YearChart> {
        match self {
            ChartOutcome::Ready(chart) => Some(*chart),
            ChartOutcome::Stale => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, ChartOutcome::Stale)
    }
}

/// A charting session.
///
/// Series are cached per town and variable for the lifetime of the session. Only the
/// most recent [`year_chart`](Self::year_chart) request gets a chart: an older request
/// whose data arrives after a newer one was issued resolves to [`ChartOutcome::Stale`].
pub struct ClimateArchive<S: SeriesSource = OpenMeteoFetcher> {
    source: S,
    cache: SeriesCache,
    index: DayOfYearIndex,
    generation: AtomicU64,
}

impl ClimateArchive {
    pub fn new() -> Self {
        Self::with_config(ArchiveConfig::default())
    }

    pub fn with_config(config: ArchiveConfig) -> Self {
        let timeout = config.fetch_timeout;
        Self::with_source(OpenMeteoFetcher::new(config), timeout)
    }
}

impl Default for ClimateArchive {
    fn default() -> Self {
        Self::new()
    }
}

#[bon]
impl<S: SeriesSource> ClimateArchive<S> {
    pub fn with_source(source: S, fetch_timeout: Duration) -> Self {
        Self {
            source,
            cache: SeriesCache::with_timeout(fetch_timeout),
            index: DayOfYearIndex::new(),
            generation: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    /// The raw series of `variable` at `town`, fetched once per session.
    pub async fn series(&self, town: &Town, variable: Variable) -> Result<Arc<RawSeries>, FetchError> {
        let key = SeriesKey::for_town(town, variable);
        self.cache
            .get_or_fetch(&key, || self.source.fetch_series(town, variable))
            .await
    }

    /// Fetches every variable of `town` concurrently, so later charts are served from
    /// the cache.
    pub async fn prefetch(&self, town: &Town) -> Result<(), ArchiveError> {
        let fetches = Variable::ALL.iter().map(|&variable| self.series(town, variable));
        let series = try_join_all(fetches).await?;
        info!("Prefetched {} series for {}", series.len(), town.key());
        Ok(())
    }

    /// Charts `year` of `variable` at `town` against every other archived year.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::Fetch`] when the series cannot be downloaded, and
    /// [`ArchiveError::Stats`] with [`StatsError::NoHistory`] when it holds nothing to
    /// chart. A selected year without data is not an error: the chart is returned with
    /// `selected_year_missing` set.
    #[builder]
    pub async fn year_chart(
        &self,
        town: &Town,
        variable: Variable,
        year: i32,
    ) -> Result<ChartOutcome, ArchiveError> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let fetched = self.series(town, variable).await;

        let latest = self.generation.load(Ordering::SeqCst);
        if latest != ticket {
            debug!(
                "Discarding {} {} for {}: request {} superseded by {}",
                variable,
                year,
                town.key(),
                ticket,
                latest
            );
            return Ok(ChartOutcome::Stale);
        }

        let series = fetched?;
        let chart = self.chart_series(&series, town, variable, year)?;
        Ok(ChartOutcome::Ready(Box::new(chart)))
    }

    fn chart_series(
        &self,
        series: &RawSeries,
        town: &Town,
        variable: Variable,
        year: i32,
    ) -> Result<YearChart, StatsError> {
        let calendar = normalize(series);
        let (stats, selected_year_missing) =
            match compute_stats(&calendar, &self.index, year, variable.is_cumulative()) {
                Ok(stats) => (stats, false),
                Err(StatsError::EmptyYear { history, .. }) => (*history, true),
                Err(e) => return Err(e),
            };

        let chart = to_chart_series(&stats, &variable.spec());
        Ok(YearChart {
            town: town.key(),
            variable,
            year,
            stats,
            chart,
            selected_year_missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::raw_series::DailyValue;
    use crate::types::location::LatLon;
    use chrono::{Datelike, NaiveDate};
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    struct FakeSource {
        series: HashMap<Variable, RawSeries>,
        delays: HashMap<Variable, Duration>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(series: HashMap<Variable, RawSeries>) -> Self {
            Self {
                series,
                delays: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, variable: Variable, delay: Duration) -> Self {
            self.delays.insert(variable, delay);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SeriesSource for FakeSource {
        async fn fetch_series(&self, _town: &Town, variable: Variable) -> Result<RawSeries, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(&variable) {
                tokio::time::sleep(*delay).await;
            }
            self.series
                .get(&variable)
                .cloned()
                .ok_or_else(|| FetchError::MissingField {
                    url: "fake://archive".to_string(),
                    field: variable.spec().api_field.to_string(),
                })
        }
    }

    fn years(first: i32, last: i32, value: f64) -> RawSeries {
        NaiveDate::from_ymd_opt(first, 1, 1)
            .unwrap()
            .iter_days()
            .take_while(|d| d.year() <= last)
            .map(|date| DailyValue {
                date,
                value: Some(value + f64::from(date.year() - first)),
            })
            .collect()
    }

    fn all_variables() -> HashMap<Variable, RawSeries> {
        HashMap::from([
            (Variable::TemperatureMin, years(2020, 2023, 1.0)),
            (Variable::TemperatureMax, years(2020, 2023, 10.0)),
            (Variable::Precipitation, years(2020, 2023, 2.0)),
        ])
    }

    fn archive(source: FakeSource) -> ClimateArchive<FakeSource> {
        ClimateArchive::with_source(source, Duration::from_secs(5))
    }

    fn bordeaux() -> Town {
        Town::new("Bordeaux", "Gironde", LatLon(44.84, -0.58))
    }

    #[tokio::test]
    async fn test_year_chart() -> Result<(), ArchiveError> {
        let archive = archive(FakeSource::new(all_variables()));
        let outcome = archive
            .year_chart()
            .town(&bordeaux())
            .variable(Variable::TemperatureMax)
            .year(2022)
            .call()
            .await?;

        let chart = outcome.into_chart().unwrap();
        assert_eq!(chart.town, "Bordeaux - Gironde");
        assert!(!chart.selected_year_missing);
        assert_eq!(chart.chart.title, "Température Max");
        assert_eq!(chart.chart.per_day.selected_year().label, "2022");
        assert_eq!(chart.stats.per_day.selected_year[0], Some(12.0));
        assert_eq!(chart.chart.per_day.max().data[0], Some(13.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_series_is_fetched_once_per_variable() -> Result<(), ArchiveError> {
        let archive = archive(FakeSource::new(all_variables()));
        let town = bordeaux();
        for year in [2021, 2022, 2023] {
            archive
                .year_chart()
                .town(&town)
                .variable(Variable::Precipitation)
                .year(year)
                .call()
                .await?;
        }
        assert_eq!(archive.source.calls(), 1);

        archive.prefetch(&town).await?;
        assert_eq!(archive.source.calls(), 3);
        assert_eq!(archive.cache().len().await, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_older_request_is_stale() {
        let source = FakeSource::new(all_variables())
            .with_delay(Variable::Precipitation, Duration::from_millis(50));
        let archive = archive(source);
        let town = bordeaux();

        let slow = archive
            .year_chart()
            .town(&town)
            .variable(Variable::Precipitation)
            .year(2023)
            .call();
        let fast = archive
            .year_chart()
            .town(&town)
            .variable(Variable::TemperatureMin)
            .year(2023)
            .call();
        let (slow, fast) = tokio::join!(slow, fast);

        assert!(slow.unwrap().is_stale());
        let fast = fast.unwrap().into_chart().unwrap();
        assert_eq!(fast.variable, Variable::TemperatureMin);

        // The stale request still filled the cache.
        let key = SeriesKey::for_town(&town, Variable::Precipitation);
        assert!(archive.cache().get(&key).await.is_some());
    }

    #[tokio::test]
    async fn test_missing_year_charts_history_only() -> Result<(), ArchiveError> {
        let archive = archive(FakeSource::new(all_variables()));
        let chart = archive
            .year_chart()
            .town(&bordeaux())
            .variable(Variable::TemperatureMin)
            .year(1990)
            .call()
            .await?
            .into_chart()
            .unwrap();

        assert!(chart.selected_year_missing);
        assert!(chart.chart.per_day.selected_year().data.iter().all(Option::is_none));
        assert_eq!(chart.chart.per_day.min().data[0], Some(1.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_errors_are_surfaced() {
        let sources = HashMap::from([(Variable::TemperatureMin, RawSeries::default())]);
        let archive = archive(FakeSource::new(sources));
        let town = bordeaux();

        let empty = archive
            .year_chart()
            .town(&town)
            .variable(Variable::TemperatureMin)
            .year(2023)
            .call()
            .await;
        assert!(matches!(empty, Err(ArchiveError::Stats(StatsError::NoHistory))));

        let missing = archive
            .year_chart()
            .town(&town)
            .variable(Variable::TemperatureMax)
            .year(2023)
            .call()
            .await;
        assert!(matches!(
            missing,
            Err(ArchiveError::Fetch(FetchError::MissingField { .. }))
        ));
        assert!(archive.prefetch(&town).await.is_err());
    }
}
