use core::num::Saturating;

use crate::Score;

/// Running total of the points revealed in the live session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreTracker {
    total: Saturating<Score>,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_points(&mut self, points: Score) {
        self.total += points;
    }

    pub fn current_total(&self) -> Score {
        self.total.0
    }

    pub fn reset(&mut self) {
        self.total = Saturating(0);
    }
}
