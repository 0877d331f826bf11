use rand::Rng;
use serde::Deserialize;

/// One row of the build-interval stage table.
///
/// Applies while fewer than `below` settlements have been built; the last
/// stage has no `below` and applies forever after. The next build interval
/// is drawn uniformly from `[min, max)` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stage {
    #[serde(default)]
    pub below: Option<u32>,
    pub min: f32,
    pub max: f32,
}

impl Stage {
    pub const fn new(below: Option<u32>, min: f32, max: f32) -> Self {
        Self { below, min, max }
    }

    /// Quick start, a long lull, then steadily faster growth.
    pub fn default_table() -> Vec<Stage> {
        vec![
            Stage::new(Some(2), 10.0, 15.0),
            Stage::new(Some(5), 60.0, 90.0),
            Stage::new(Some(10), 30.0, 90.0),
            Stage::new(Some(20), 30.0, 65.0),
            Stage::new(Some(25), 30.0, 60.0),
            Stage::new(None, 20.0, 40.0),
        ]
    }

    pub fn contains(&self, interval: f32) -> bool {
        interval >= self.min && interval < self.max
    }
}

/// Stage that applies after `built` settlements.
///
/// Falls back to the last stage, so a table with no open-ended row still
/// resolves. Tables are validated non-empty at config load.
pub fn stage_for(stages: &[Stage], built: u32) -> Option<&Stage> {
    stages
        .iter()
        .find(|stage| stage.below.is_none_or(|below| built < below))
        .or_else(|| stages.last())
}

/// Draw the next build interval for `built` settlements so far.
pub fn sample_interval(stages: &[Stage], built: u32, rng: &mut (impl Rng + ?Sized)) -> Option<f32> {
    let stage = stage_for(stages, built)?;
    Some(rng.random_range(stage.min..stage.max))
}
