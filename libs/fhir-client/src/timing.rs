//! Timed family-name searches
//!
//! [`response_times`] runs one search per term and collects the latency of
//! each. [`run_iterations`] repeats that over several passes so cached and
//! uncached server responses can be compared.

use crate::cache_control::CacheControl;
use crate::client::PatientSearch;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use tracing::{debug, info};

/// Latency in milliseconds per search term, in the order terms were searched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseTimes {
    millis: IndexMap<String, u64>,
}

impl ResponseTimes {
    /// Record a latency. A repeated term keeps its position and takes the
    /// newer value.
    pub fn record(&mut self, term: impl Into<String>, millis: u64) {
        self.millis.insert(term.into(), millis);
    }

    pub fn get(&self, term: &str) -> Option<u64> {
        self.millis.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.millis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.millis.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.millis.iter().map(|(term, ms)| (term.as_str(), *ms))
    }

    /// Mean latency, or 0.0 when nothing was recorded.
    pub fn average_millis(&self) -> f64 {
        if self.millis.is_empty() {
            return 0.0;
        }
        let total: u64 = self.millis.values().sum();
        total as f64 / self.millis.len() as f64
    }
}

/// Search every term once and collect per-term latency.
///
/// `connect` is called once per term so no client (or its connection pool)
/// is shared between searches. The first failed search aborts the run.
pub async fn response_times<C, F>(
    terms: &[String],
    bypass_cache: bool,
    mut connect: F,
) -> Result<ResponseTimes>
where
    C: PatientSearch,
    F: FnMut() -> Result<C>,
{
    let cache = CacheControl::bypass(bypass_cache);
    let mut times = ResponseTimes::default();

    for term in terms {
        debug!(family = %term, bypass_cache, "processing family name");
        let client = connect()?;
        let timed = client.search_patients_by_family(term, cache).await?;
        debug!(
            family = %term,
            elapsed_ms = timed.elapsed_millis(),
            total = timed.value.total_or_zero(),
            "family name searched"
        );
        times.record(term.as_str(), timed.elapsed_millis());
    }

    Ok(times)
}

/// How many passes to make over the terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationPlan {
    pub iterations: u32,
    /// Send `Cache-Control: no-cache` on the last pass only
    pub disable_cache_on_final: bool,
}

impl Default for IterationPlan {
    fn default() -> Self {
        Self {
            iterations: 3,
            disable_cache_on_final: true,
        }
    }
}

impl IterationPlan {
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::Config(
                "iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the 1-based `iteration` bypasses the cache.
    pub fn bypasses_cache(&self, iteration: u32) -> bool {
        self.disable_cache_on_final && iteration == self.iterations
    }
}

/// Outcome of one pass over the terms.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    /// 1-based
    pub iteration: u32,
    pub cache: CacheControl,
    pub response_times: ResponseTimes,
    pub average_millis: f64,
}

/// Run [`response_times`] once per iteration of `plan`.
pub async fn run_iterations<C, F>(
    terms: &[String],
    plan: &IterationPlan,
    mut connect: F,
) -> Result<Vec<IterationReport>>
where
    C: PatientSearch,
    F: FnMut() -> Result<C>,
{
    plan.validate()?;

    let mut reports = Vec::with_capacity(plan.iterations as usize);
    for iteration in 1..=plan.iterations {
        let bypass_cache = plan.bypasses_cache(iteration);
        let response_times = response_times(terms, bypass_cache, &mut connect).await?;
        let average_millis = response_times.average_millis();

        info!(
            iteration,
            terms = response_times.len(),
            bypass_cache,
            average_ms = average_millis,
            "iteration finished"
        );

        reports.push(IterationReport {
            iteration,
            cache: CacheControl::bypass(bypass_cache),
            response_times,
            average_millis,
        });
    }

    Ok(reports)
}
