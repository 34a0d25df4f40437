use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Which rule set the shot clock resets to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotClockRule {
    #[default]
    Fiba,
    HighSchool,
}

impl ShotClockRule {
    pub const fn duration(self) -> Duration {
        match self {
            Self::Fiba => Duration::from_secs(24),
            Self::HighSchool => Duration::from_secs(35),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub period_duration: u16,
    pub shot_clock_rule: ShotClockRule,
    pub score_ceiling: u16,
    pub fouls_limit: u8,
    pub timeouts_per_team: u8,
    pub main_clock_tenths_below: u16,
    pub shot_clock_tenths_below: u16,
}

impl Game {
    pub fn period_duration(&self) -> Duration {
        Duration::from_secs(self.period_duration.into())
    }

    pub fn shot_clock_duration(&self) -> Duration {
        self.shot_clock_rule.duration()
    }

    /// Threshold below which the main clock shows tenths.
    pub fn main_clock_tenths_threshold(&self) -> Duration {
        Duration::from_secs(self.main_clock_tenths_below.into())
    }

    /// Threshold below which the shot clock shows tenths.
    pub fn shot_clock_tenths_threshold(&self) -> Duration {
        Duration::from_secs(self.shot_clock_tenths_below.into())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self {
            period_duration: 600,
            shot_clock_rule: ShotClockRule::Fiba,
            score_ceiling: 200,
            fouls_limit: 19,
            timeouts_per_team: 5,
            main_clock_tenths_below: 60,
            shot_clock_tenths_below: 10,
        }
    }
}
