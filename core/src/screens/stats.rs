//! Rent statistics: three summaries and a three-bar chart.

use std::thread;

use tracing::error;

use crate::api::Api;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{Apartment, Stats};

/// One bar of the rent chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub label: &'static str,
    pub value: f64,
}

pub struct StatsScreen<T> {
    api: Api<T>,
    stats: Stats,
    apartments: Vec<Apartment>,
    loading: bool,
    seen_revision: Option<u64>,
}

impl<T: Transport> StatsScreen<T> {
    pub fn new(api: Api<T>) -> Self {
        Self {
            api,
            stats: Stats::default(),
            apartments: Vec::new(),
            loading: true,
            seen_revision: None,
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn apartments(&self) -> &[Apartment] {
        &self.apartments
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// First load, for the collection at `revision`. A later `sync` with
    /// the same revision does not fetch again.
    pub fn mount(&mut self, revision: u64) -> bool {
        self.seen_revision = Some(revision);
        self.load()
    }

    /// Reload when the list screen's collection revision has moved since
    /// the last call. Returns whether a load was attempted.
    pub fn sync(&mut self, revision: u64) -> bool {
        if self.seen_revision == Some(revision) {
            return false;
        }
        self.seen_revision = Some(revision);
        self.load();
        true
    }

    /// Fetch stats and the list side by side. Displayed values change only
    /// when both succeed; `loading` is false afterwards either way.
    pub fn load(&mut self) -> bool {
        let api = &self.api;
        let (stats, apartments) = thread::scope(|scope| {
            let stats = scope.spawn(|| api.stats());
            let apartments = api.list();
            let stats = stats
                .join()
                .unwrap_or_else(|_| Err(ApiError::Transport("stats fetch panicked".to_string())));
            (stats, apartments)
        });
        self.loading = false;

        match (stats, apartments) {
            (Ok(stats), Ok(apartments)) => {
                self.stats = stats;
                self.apartments = apartments;
                true
            }
            (Err(stats_err), Err(list_err)) => {
                error!(error = %stats_err, "error loading stats");
                error!(error = %list_err, "error loading apartments for stats");
                false
            }
            (Err(err), Ok(_)) => {
                error!(error = %err, "error loading stats");
                false
            }
            (Ok(_), Err(err)) => {
                error!(error = %err, "error loading apartments for stats");
                false
            }
        }
    }

    /// Text lines shown above the chart; `None` while the first load is
    /// still pending.
    pub fn summaries(&self) -> Option<[String; 3]> {
        if self.loading {
            return None;
        }
        let Stats { total, min, max } = self.stats;
        Some([
            format!("Total des loyers: {total} Ariary"),
            format!("Loyer minimal: {min} Ariary"),
            format!("Loyer maximal: {max} Ariary"),
        ])
    }

    pub fn chart(&self) -> Option<[Bar; 3]> {
        if self.loading {
            return None;
        }
        Some([
            Bar { label: "Total", value: self.stats.total },
            Bar { label: "Minimal", value: self.stats.min },
            Bar { label: "Maximal", value: self.stats.max },
        ])
    }
}
