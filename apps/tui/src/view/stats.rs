use crate::domain::{Clasificacion, Statistics};

/// Statistics panel model. Values come only from the statistics endpoint and
/// survive a failed refresh, flagged as stale.
#[derive(Debug, Clone, Default)]
pub struct StatsView {
    stats: Option<Statistics>,
    stale: bool,
}

/// One percentage bar of the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassShare {
    pub clasificacion: Clasificacion,
    pub count: u64,
    pub percent: f64,
}

impl StatsView {
    pub fn render(&mut self, stats: Statistics) {
        self.stats = Some(stats);
        self.stale = false;
    }

    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    pub const fn stats(&self) -> Option<&Statistics> {
        self.stats.as_ref()
    }

    pub fn shares(&self) -> Vec<ClassShare> {
        let Some(stats) = &self.stats else {
            return Vec::new();
        };
        Clasificacion::ALL
            .into_iter()
            .map(|clasificacion| ClassShare {
                clasificacion,
                count: stats.count(clasificacion),
                percent: stats.percent(clasificacion).unwrap_or(0.0),
            })
            .collect()
    }

    pub fn score_label(&self) -> String {
        self.stats
            .map_or_else(|| "-".to_string(), |stats| format!("{:.2}", stats.score_promedio))
    }
}
