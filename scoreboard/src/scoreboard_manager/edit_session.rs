use log::*;
use scoreboard_common::{
    bundles::HomeVisitorBundle,
    clock_time::ClockTime,
    game_snapshot::{ClockLayout, DigitPosition, Team},
};

/// A staged copy of the editable state. All edits land here; the live state
/// only changes when the whole session is committed, so a cancelled edit
/// leaves no trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct EditSession {
    main_clock: ClockTime,
    shot_clock: ClockTime,
    scores: HomeVisitorBundle<u16>,
    main_layout: ClockLayout,
    shot_layout: ClockLayout,
    position: DigitPosition,
}

impl EditSession {
    pub(super) fn new(
        main_clock: ClockTime,
        shot_clock: ClockTime,
        scores: HomeVisitorBundle<u16>,
        main_layout: ClockLayout,
        shot_layout: ClockLayout,
    ) -> Self {
        Self {
            main_clock,
            shot_clock,
            scores,
            main_layout,
            shot_layout,
            position: DigitPosition::default(),
        }
    }

    pub(super) fn main_clock(&self) -> ClockTime {
        self.main_clock
    }

    pub(super) fn shot_clock(&self) -> ClockTime {
        self.shot_clock
    }

    pub(super) fn scores(&self) -> HomeVisitorBundle<u16> {
        self.scores
    }

    pub(super) fn main_layout(&self) -> ClockLayout {
        self.main_layout
    }

    pub(super) fn shot_layout(&self) -> ClockLayout {
        self.shot_layout
    }

    pub(super) fn position(&self) -> DigitPosition {
        self.position
    }

    pub(super) fn into_parts(self) -> (ClockTime, ClockTime, HomeVisitorBundle<u16>) {
        (self.main_clock, self.shot_clock, self.scores)
    }

    pub(super) fn move_left(&mut self) {
        self.position = self.position.left();
    }

    pub(super) fn move_right(&mut self) {
        self.position = self.position.right();
    }

    pub(super) fn jump_main_clock(&mut self) {
        self.position = DigitPosition::FIRST_MAIN;
    }

    pub(super) fn jump_shot_clock(&mut self) {
        self.position = DigitPosition::FIRST_SHOT;
    }

    /// Flips the layout of the clock owning the cursor, changing which
    /// digit fields the positions map to.
    pub(super) fn toggle_tenths(&mut self) {
        let layout = if self.position.is_main_clock() {
            &mut self.main_layout
        } else {
            &mut self.shot_layout
        };
        *layout = match layout {
            ClockLayout::Normal => ClockLayout::TenthSeconds,
            ClockLayout::TenthSeconds => ClockLayout::Normal,
        };
    }

    pub(super) fn add_score(&mut self, team: Team, points: u8, ceiling: u16) {
        let new_score = self.scores[team].saturating_add(points.into());
        if new_score >= ceiling {
            info!("Staged {team} score change to {new_score} rejected, over the limit");
        } else {
            self.scores[team] = new_score;
        }
    }

    pub(super) fn sub_score(&mut self, team: Team) {
        self.scores[team] = self.scores[team].saturating_sub(1);
    }

    /// Replaces the digit under the cursor. The replacement is applied to
    /// the digit field the cursor maps to in the owning clock's current
    /// layout; if the result is not a valid clock value the buffer is left
    /// untouched.
    pub(super) fn set_digit(&mut self, value: u8) {
        if value > 9 {
            return;
        }

        let (clock, layout) = if self.position.is_main_clock() {
            (&mut self.main_clock, self.main_layout)
        } else {
            (&mut self.shot_clock, self.shot_layout)
        };

        let mut digits = clock.digits();
        let field = match (layout, self.position.index()) {
            (ClockLayout::Normal, 1) => &mut digits.ten_minutes,
            (ClockLayout::Normal, 2) => &mut digits.minutes,
            (ClockLayout::Normal, 3) => &mut digits.ten_seconds,
            (ClockLayout::Normal, 4) => &mut digits.seconds,
            (ClockLayout::TenthSeconds, 1) => &mut digits.ten_seconds,
            (ClockLayout::TenthSeconds, 2) => &mut digits.seconds,
            (ClockLayout::TenthSeconds, 3) => &mut digits.tenth_seconds,
            // The fourth cell is unused in the tenths layout
            (ClockLayout::TenthSeconds, 4) => return,
            (ClockLayout::Normal, 5) => &mut digits.ten_seconds,
            (ClockLayout::Normal, 6) => &mut digits.seconds,
            (ClockLayout::TenthSeconds, 5) => &mut digits.seconds,
            (ClockLayout::TenthSeconds, 6) => &mut digits.tenth_seconds,
            _ => return,
        };
        *field = value;

        match digits.try_compose() {
            Some(new_time) => *clock = new_time,
            None => info!(
                "Digit {value} rejected at position {}, not a valid clock value",
                self.position.index()
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn session() -> EditSession {
        EditSession::new(
            ClockTime::from_secs(480),
            ClockTime::from_secs(24),
            HomeVisitorBundle::default(),
            ClockLayout::Normal,
            ClockLayout::Normal,
        )
    }

    #[test]
    fn test_cursor_starts_at_first_main_digit() {
        let s = session();
        assert_eq!(s.position(), DigitPosition::FIRST_MAIN);
    }

    #[test]
    fn test_set_digit_normal_layout() {
        let mut s = session();
        // 8:00 -> 58:00
        s.set_digit(5);
        assert_eq!(s.main_clock(), ClockTime::from_secs(58 * 60));

        // 58:00 -> 58:30
        s.jump_main_clock();
        s.move_right();
        s.move_right();
        s.set_digit(3);
        assert_eq!(s.main_clock(), ClockTime::from_secs(58 * 60 + 30));
    }

    #[test]
    fn test_invalid_ten_seconds_digit_leaves_buffer() {
        let mut s = session();
        s.move_right();
        s.move_right();
        s.set_digit(7);
        assert_eq!(s.main_clock(), ClockTime::from_secs(480));
    }

    #[test]
    fn test_tenths_layout_mapping() {
        let mut s = EditSession::new(
            ClockTime::from_tenths(320),
            ClockTime::from_secs(24),
            HomeVisitorBundle::default(),
            ClockLayout::TenthSeconds,
            ClockLayout::Normal,
        );
        // 32.0 -> 32.7
        s.move_right();
        s.move_right();
        s.set_digit(7);
        assert_eq!(s.main_clock(), ClockTime::from_tenths(327));

        // Fourth cell is inert in this layout
        s.move_right();
        s.set_digit(9);
        assert_eq!(s.main_clock(), ClockTime::from_tenths(327));
    }

    #[test]
    fn test_shot_clock_digits() {
        let mut s = session();
        s.jump_shot_clock();
        s.set_digit(1);
        assert_eq!(s.shot_clock(), ClockTime::from_secs(14));
        s.move_right();
        s.set_digit(9);
        assert_eq!(s.shot_clock(), ClockTime::from_secs(19));
    }

    #[test]
    fn test_toggle_tenths_follows_cursor() {
        let mut s = session();
        s.toggle_tenths();
        assert_eq!(s.main_layout(), ClockLayout::TenthSeconds);
        assert_eq!(s.shot_layout(), ClockLayout::Normal);

        s.jump_shot_clock();
        s.toggle_tenths();
        assert_eq!(s.shot_layout(), ClockLayout::TenthSeconds);
    }

    #[test]
    fn test_staged_scores() {
        let mut s = session();
        s.add_score(Team::Home, 3, 200);
        s.add_score(Team::Home, 2, 200);
        assert_eq!(s.scores()[Team::Home], 5);

        s.sub_score(Team::Visitor);
        assert_eq!(s.scores()[Team::Visitor], 0);
    }
}
