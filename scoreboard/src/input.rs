use scoreboard_common::game_snapshot::{ChangeTarget, Team};

/// A logical operator action, decoupled from the key that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreboardInput {
    ToggleClock,
    ResetShotClock,
    SoundBuzzer,
    SelectTeam(Team),
    SelectTarget(ChangeTarget),
    Increment,
    Decrement,
    Digit(u8),
    TogglePossession,
    ToggleBonus,
    StartEdit,
    CommitEdit,
    CancelEdit,
    EditLeft,
    EditRight,
    EditJumpMainClock,
    EditJumpShotClock,
    ToggleTenths,
}

impl ScoreboardInput {
    /// Maps a console byte to an action. Unbound bytes return `None`.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b' ' => Self::ToggleClock,
            b'r' => Self::ResetShotClock,
            b'h' => Self::SoundBuzzer,
            b'z' => Self::SelectTeam(Team::Home),
            b'x' => Self::SelectTeam(Team::Visitor),
            b'a' => Self::SelectTarget(ChangeTarget::Score),
            b'f' => Self::SelectTarget(ChangeTarget::Fouls),
            b't' => Self::SelectTarget(ChangeTarget::TimeoutsLeft),
            b'p' => Self::SelectTarget(ChangeTarget::Period),
            b'=' | b'+' => Self::Increment,
            b'-' => Self::Decrement,
            b'o' => Self::TogglePossession,
            b'b' => Self::ToggleBonus,
            b'e' => Self::StartEdit,
            b'\n' | b'\r' => Self::CommitEdit,
            0x1b | b'q' => Self::CancelEdit,
            b'[' => Self::EditLeft,
            b']' => Self::EditRight,
            b'm' => Self::EditJumpMainClock,
            b'n' => Self::EditJumpShotClock,
            b'.' => Self::ToggleTenths,
            b'0'..=b'9' => Self::Digit(byte - b'0'),
            _ => return None,
        })
    }
}
