use crate::{
    bundles::HomeVisitorBundle,
    clock_time::ClockTime,
};
use core::time::Duration;
use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence, Serialize, Deserialize)]
pub enum Team {
    Home,
    Visitor,
}

impl Default for Team {
    fn default() -> Self {
        Self::Home
    }
}

impl Team {
    pub const fn other(self) -> Self {
        match self {
            Self::Home => Self::Visitor,
            Self::Visitor => Self::Home,
        }
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => write!(f, "Home"),
            Self::Visitor => write!(f, "Visitor"),
        }
    }
}

/// The operator-visible run state. `Edit` implies the clocks are frozen;
/// `Running` only means the operator has started them, the clocks still
/// freeze on their own when either reaches zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Stopped,
    Running,
    Edit,
}

impl Display for GameMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Running => write!(f, "Running"),
            Self::Edit => write!(f, "Edit"),
        }
    }
}

/// How a clock's digits are laid out on the panel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockLayout {
    /// Minutes, colon, seconds.
    #[default]
    Normal,
    /// Seconds, decimal point, tenths.
    TenthSeconds,
}

impl ClockLayout {
    /// The layout a clock naturally uses for `time`, switching to tenths
    /// strictly below `threshold`.
    pub fn from_time(time: ClockTime, threshold: Duration) -> Self {
        if time.to_duration() < threshold {
            Self::TenthSeconds
        } else {
            Self::Normal
        }
    }
}

/// Which counter the quick increment/decrement inputs act on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Sequence, Serialize, Deserialize)]
pub enum ChangeTarget {
    #[default]
    Score,
    Fouls,
    TimeoutsLeft,
    Period,
}

impl Display for ChangeTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score => write!(f, "Score"),
            Self::Fouls => write!(f, "Fouls"),
            Self::TimeoutsLeft => write!(f, "Timeouts Left"),
            Self::Period => write!(f, "Period"),
        }
    }
}

/// A selectable digit cell on the panel. Positions 1-4 are the main clock,
/// 5-6 the shot clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DigitPosition(u8);

impl DigitPosition {
    pub const FIRST_MAIN: Self = Self(1);
    pub const FIRST_SHOT: Self = Self(5);
    const LAST: Self = Self(6);

    pub const fn index(self) -> u8 {
        self.0
    }

    pub const fn is_main_clock(self) -> bool {
        self.0 <= 4
    }

    pub const fn left(self) -> Self {
        if self.0 > Self::FIRST_MAIN.0 {
            Self(self.0 - 1)
        } else {
            self
        }
    }

    pub const fn right(self) -> Self {
        if self.0 < Self::LAST.0 {
            Self(self.0 + 1)
        } else {
            self
        }
    }
}

impl Default for DigitPosition {
    fn default() -> Self {
        Self::FIRST_MAIN
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub time: ClockTime,
    pub layout: ClockLayout,
}

/// All the state the display needs, with no access to the manager's
/// internals. In `Edit` mode the clock and score fields carry the staged
/// buffer values, not the live ones.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub mode: GameMode,
    pub main_clock: ClockSnapshot,
    pub shot_clock: ClockSnapshot,
    pub scores: HomeVisitorBundle<u16>,
    pub fouls: HomeVisitorBundle<u8>,
    pub timeouts_left: HomeVisitorBundle<u8>,
    pub bonus: HomeVisitorBundle<bool>,
    pub period: i8,
    pub possession: Option<Team>,
    pub selected_team: Team,
    pub selected_target: ChangeTarget,
    pub selected_digit: Option<DigitPosition>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_layout_threshold_is_strict() {
        let threshold = Duration::from_secs(60);
        assert_eq!(
            ClockLayout::from_time(ClockTime::from_secs(60), threshold),
            ClockLayout::Normal
        );
        assert_eq!(
            ClockLayout::from_time(ClockTime::from_tenths(599), threshold),
            ClockLayout::TenthSeconds
        );
    }

    #[test]
    fn test_digit_position_bounds() {
        assert_eq!(DigitPosition::FIRST_MAIN.left(), DigitPosition::FIRST_MAIN);
        assert_eq!(
            DigitPosition::FIRST_SHOT.right().right(),
            DigitPosition::FIRST_SHOT.right()
        );
        assert!(DigitPosition::FIRST_MAIN.is_main_clock());
        assert!(!DigitPosition::FIRST_SHOT.is_main_clock());

        let mut pos = DigitPosition::FIRST_MAIN;
        for expected in 1..=4u8 {
            assert_eq!(pos.index(), expected);
            assert!(pos.is_main_clock());
            pos = pos.right();
        }
        assert!(!pos.is_main_clock());
    }
}
