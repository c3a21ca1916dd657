use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    requests_total: AtomicU64,
    destination_answers_total: AtomicU64,
    budget_guides_total: AtomicU64,
    season_guides_total: AtomicU64,
    itinerary_skeletons_total: AtomicU64,
    fallback_total: AtomicU64,
    skipped_records_total: AtomicU64,
    total_latency_micros: AtomicU64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub destination_answers_total: u64,
    pub budget_guides_total: u64,
    pub season_guides_total: u64,
    pub itinerary_skeletons_total: u64,
    pub fallback_total: u64,
    pub skipped_records_total: u64,
    pub avg_latency_micros: f64,
}

/// Answer categories counted by [`AppMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerKind {
    Destination,
    BudgetGuide,
    SeasonGuide,
    ItinerarySkeleton,
    Fallback,
}

impl AnswerKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Destination => "destination",
            Self::BudgetGuide => "budget_guide",
            Self::SeasonGuide => "season_guide",
            Self::ItinerarySkeleton => "itinerary_skeleton",
            Self::Fallback => "fallback",
        }
    }
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("globalbot_requests_total").increment(1);
    }

    pub fn record_answer(&self, kind: AnswerKind) {
        let counter = match kind {
            AnswerKind::Destination => &self.destination_answers_total,
            AnswerKind::BudgetGuide => &self.budget_guides_total,
            AnswerKind::SeasonGuide => &self.season_guides_total,
            AnswerKind::ItinerarySkeleton => &self.itinerary_skeletons_total,
            AnswerKind::Fallback => &self.fallback_total,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("globalbot_answers_total", "branch" => kind.label()).increment(1);
    }

    pub fn add_skipped_records(&self, count: usize) {
        if count == 0 {
            return;
        }
        self.skipped_records_total
            .fetch_add(count as u64, Ordering::Relaxed);
        metrics::counter!("globalbot_skipped_records_total").increment(count as u64);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_micros.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: requests,
            destination_answers_total: self.destination_answers_total.load(Ordering::Relaxed),
            budget_guides_total: self.budget_guides_total.load(Ordering::Relaxed),
            season_guides_total: self.season_guides_total.load(Ordering::Relaxed),
            itinerary_skeletons_total: self.itinerary_skeletons_total.load(Ordering::Relaxed),
            fallback_total: self.fallback_total.load(Ordering::Relaxed),
            skipped_records_total: self.skipped_records_total.load(Ordering::Relaxed),
            avg_latency_micros: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
        }
    }
}

/// Installs the JSON subscriber once per process. Logs go to stderr.
pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,globalbot_agents=info,globalbot_catalog=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
