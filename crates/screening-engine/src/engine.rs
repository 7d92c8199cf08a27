use crate::cache::{IndexedEntry, WatchlistCache};
use name_matching::NameProfile;
use screening_core::{
    RiskLevel, ScreenResult, ScreeningConfig, ScreeningError, WatchlistMatch, WatchlistSource,
    WatchlistStats,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

type ReloadOutcome = Result<WatchlistStats, ScreeningError>;

/// Screens names against the cached watchlists and owns the reload path.
///
/// `screen` and `stats` are plain reads of one snapshot and can run from any
/// number of tasks. `reload` is single-flight: callers that arrive while a
/// reload is running wait for it and share its outcome.
pub struct ScreeningEngine {
    cache: Arc<WatchlistCache>,
    source: Arc<dyn WatchlistSource>,
    config: ScreeningConfig,
    /// Held for the duration of a reload; stores the last outcome for joiners
    reload_gate: Mutex<Option<ReloadOutcome>>,
    /// Bumped every time a reload finishes
    reloads_completed: AtomicU64,
}

impl ScreeningEngine {
    pub fn new(source: Arc<dyn WatchlistSource>, config: ScreeningConfig) -> Result<Self, ScreeningError> {
        Self::with_cache(source, Arc::new(WatchlistCache::new()), config)
    }

    pub fn with_cache(
        source: Arc<dyn WatchlistSource>,
        cache: Arc<WatchlistCache>,
        config: ScreeningConfig,
    ) -> Result<Self, ScreeningError> {
        config.validate()?;
        Ok(Self {
            cache,
            source,
            config,
            reload_gate: Mutex::new(None),
            reloads_completed: AtomicU64::new(0),
        })
    }

    /// Screen one name against a single snapshot of both lists.
    pub fn screen(&self, name: &str) -> ScreenResult {
        let input = NameProfile::new(name);
        let snapshot = self.cache.current();

        let (sanction_matches, pep_matches) = if input.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            (
                self.collect_matches(&input, snapshot.sanctions(), self.config.sanction_threshold),
                self.collect_matches(&input, snapshot.peps(), self.config.pep_threshold),
            )
        };

        let risk = RiskLevel::classify(sanction_matches.len(), pep_matches.len());
        tracing::debug!(
            "Screened '{}': {} sanction / {} PEP matches, risk {}",
            name,
            sanction_matches.len(),
            pep_matches.len(),
            risk
        );

        ScreenResult {
            input_name: name.to_string(),
            sanction_matches,
            pep_matches,
            risk,
        }
    }

    pub fn stats(&self) -> WatchlistStats {
        self.cache.stats()
    }

    /// Fetch all feeds and swap in a new snapshot.
    ///
    /// When every feed fails the current snapshot stays in place and the
    /// error is returned to every caller sharing this reload.
    pub async fn reload(&self) -> Result<WatchlistStats, ScreeningError> {
        let seen = self.reloads_completed.load(Ordering::Acquire);
        let mut last_outcome = self.reload_gate.lock().await;

        if self.reloads_completed.load(Ordering::Acquire) != seen {
            if let Some(outcome) = last_outcome.as_ref() {
                tracing::debug!("Reload finished while waiting, sharing its outcome");
                return outcome.clone();
            }
        }

        let outcome = self.run_reload().await;
        *last_outcome = Some(outcome.clone());
        self.reloads_completed.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    async fn run_reload(&self) -> ReloadOutcome {
        let started = Instant::now();
        tracing::info!("Reloading watchlists");

        let batch = match self.source.fetch_all().await {
            Ok(batch) => batch,
            Err(e) => {
                tracing::error!("Watchlist reload failed, keeping previous snapshot: {}", e);
                return Err(e);
            }
        };

        let snapshot = self.cache.replace(batch.sanctions, batch.peps);
        let stats = snapshot.stats();
        tracing::info!(
            "Watchlists reloaded: {} sanctions, {} PEPs in {:.1}s",
            stats.sanctions_count,
            stats.peps_count,
            started.elapsed().as_secs_f64()
        );
        Ok(stats)
    }

    fn collect_matches(
        &self,
        input: &NameProfile,
        entries: &[IndexedEntry],
        threshold: f64,
    ) -> Vec<WatchlistMatch> {
        let hits = entries
            .iter()
            .filter_map(|indexed| {
                let score = input.score(&indexed.profile, self.config.token_weight);
                (score >= threshold).then(|| WatchlistMatch::from_entry(&indexed.entry, score))
            })
            .collect();
        rank_matches(hits, self.config.max_matches)
    }
}

/// Sort descending by score and keep the top `cap`.
///
/// The sort is stable, so equal scores keep snapshot order.
pub(crate) fn rank_matches(mut matches: Vec<WatchlistMatch>, cap: usize) -> Vec<WatchlistMatch> {
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches.truncate(cap);
    matches
}
