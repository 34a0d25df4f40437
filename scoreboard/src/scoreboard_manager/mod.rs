use crate::input::ScoreboardInput;
use log::*;
use scoreboard_common::{
    bundles::HomeVisitorBundle,
    clock_time::ClockTime,
    config::Game as GameConfig,
    game_snapshot::{ChangeTarget, ClockLayout, ClockSnapshot, GameMode, GameSnapshot, Team},
};
use std::time::Duration;
use thiserror::Error;
use tokio::{sync::watch, time::Instant};

mod edit_session;
use edit_session::EditSession;

const MAX_TIMEOUTS_LEFT: u8 = 9;
const MAX_PERIOD: i8 = 9;
const MIN_PERIOD: i8 = -1;
const BUZZER_HOLD: Duration = Duration::from_millis(400);

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ScoreboardError {
    #[error("A `now` value was earlier than the clocks' start")]
    InvalidNowValue,
    #[error("Can't edit while the clocks are running")]
    ClockIsRunning,
    #[error("An edit session is already open")]
    AlreadyEditing,
    #[error("No edit session is open")]
    NotEditing,
    #[error("Action not available while editing")]
    EditInProgress,
}

pub type Result<T> = std::result::Result<T, ScoreboardError>;

/// The scoreboard's authoritative state: the paired clocks, every counter,
/// the selection cursor, and the edit session when one is open.
///
/// All clock readings are taken against a caller-supplied `now`, so the
/// clocks are exact regardless of how often the caller polls.
#[derive(Debug)]
pub struct ScoreboardManager {
    config: GameConfig,
    main_clock: ClockState,
    shot_clock: ClockState,
    running: bool,
    scores: HomeVisitorBundle<u16>,
    fouls: HomeVisitorBundle<u8>,
    timeouts_left: HomeVisitorBundle<u8>,
    bonus: HomeVisitorBundle<bool>,
    period: i8,
    possession: Option<Team>,
    selected_team: Team,
    selected_target: ChangeTarget,
    edit_session: Option<EditSession>,
    buzzer_held_until: Option<Instant>,
    start_stop_tx: watch::Sender<bool>,
    start_stop_rx: watch::Receiver<bool>,
}

impl ScoreboardManager {
    pub fn new(config: GameConfig) -> Self {
        let (start_stop_tx, start_stop_rx) = watch::channel(false);
        Self {
            main_clock: ClockState::Stopped {
                clock_time: ClockTime::from_duration(config.period_duration()),
            },
            shot_clock: ClockState::Stopped {
                clock_time: ClockTime::from_duration(config.shot_clock_duration()),
            },
            running: false,
            scores: Default::default(),
            fouls: Default::default(),
            timeouts_left: HomeVisitorBundle {
                home: config.timeouts_per_team,
                visitor: config.timeouts_per_team,
            },
            bonus: Default::default(),
            period: MIN_PERIOD,
            possession: None,
            selected_team: Team::Home,
            selected_target: ChangeTarget::Score,
            edit_session: None,
            buzzer_held_until: None,
            start_stop_tx,
            start_stop_rx,
            config,
        }
    }

    pub fn mode(&self) -> GameMode {
        if self.edit_session.is_some() {
            GameMode::Edit
        } else if self.running {
            GameMode::Running
        } else {
            GameMode::Stopped
        }
    }

    pub fn clock_is_running(&self) -> bool {
        self.running
    }

    /// Whether the clock values are actually advancing, as opposed to the
    /// operator-facing run state. The two differ once a clock hits zero.
    pub fn clocks_are_counting(&self) -> bool {
        self.main_clock.is_running()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scores(&self) -> HomeVisitorBundle<u16> {
        self.scores
    }

    pub fn period(&self) -> i8 {
        self.period
    }

    pub fn possession(&self) -> Option<Team> {
        self.possession
    }

    pub fn selected_team(&self) -> Team {
        self.selected_team
    }

    pub fn selected_target(&self) -> ChangeTarget {
        self.selected_target
    }

    pub fn get_start_stop_rx(&self) -> watch::Receiver<bool> {
        self.start_stop_rx.clone()
    }

    /// The instant at which the first of the two clocks runs out. Both
    /// clocks freeze there.
    fn freeze_instant(&self) -> Option<Instant> {
        match (self.main_clock.end_instant(), self.shot_clock.end_instant()) {
            (Some(main), Some(shot)) => Some(main.min(shot)),
            (Some(end), None) | (None, Some(end)) => Some(end),
            (None, None) => None,
        }
    }

    fn effective_now(&self, now: Instant) -> Instant {
        match self.freeze_instant() {
            Some(freeze) => now.min(freeze),
            None => now,
        }
    }

    /// Returns `None` if `now` is before the clocks' start.
    pub fn main_clock_time(&self, now: Instant) -> Option<ClockTime> {
        self.main_clock.clock_time(self.effective_now(now))
    }

    /// Returns `None` if `now` is before the clocks' start.
    pub fn shot_clock_time(&self, now: Instant) -> Option<ClockTime> {
        self.shot_clock.clock_time(self.effective_now(now))
    }

    /// Settles expired clocks. Once the freeze instant has passed, both
    /// clock states are pinned to their values at that instant; the run
    /// state is deliberately left alone.
    pub fn update(&mut self, now: Instant) -> Result<()> {
        if self.main_clock.clock_time(now).is_none()
            || self.shot_clock.clock_time(now).is_none()
        {
            return Err(ScoreboardError::InvalidNowValue);
        }

        if let Some(freeze) = self.freeze_instant() {
            if freeze <= now {
                let main = self
                    .main_clock
                    .clock_time(freeze)
                    .ok_or(ScoreboardError::InvalidNowValue)?;
                let shot = self
                    .shot_clock
                    .clock_time(freeze)
                    .ok_or(ScoreboardError::InvalidNowValue)?;
                info!("{} Clock expired, freezing both clocks", self.status_string(now));
                self.main_clock = ClockState::Stopped { clock_time: main };
                self.shot_clock = ClockState::Stopped { clock_time: shot };
            }
        }

        Ok(())
    }

    pub fn start_stop_clock(&mut self, now: Instant) -> Result<()> {
        if self.edit_session.is_some() {
            return Err(ScoreboardError::EditInProgress);
        }
        self.update(now)?;

        if self.running {
            info!("{} Stopping the clocks", self.status_string(now));
            self.stop_counting(now)?;
            self.running = false;
        } else {
            info!("{} Starting the clocks", self.status_string(now));
            self.running = true;
            self.resume_counting(now);
        }
        self.send_clock_running(self.running);

        Ok(())
    }

    /// Puts both clocks into countdown from `now`, unless either is at
    /// zero, in which case they stay frozen.
    fn resume_counting(&mut self, now: Instant) {
        let (main, shot) = match (&self.main_clock, &self.shot_clock) {
            (
                ClockState::Stopped { clock_time: main },
                ClockState::Stopped { clock_time: shot },
            ) => (*main, *shot),
            _ => return,
        };

        if main.is_zero() || shot.is_zero() {
            info!(
                "{} Clocks stay frozen, a clock is at zero",
                self.status_string(now)
            );
            return;
        }

        self.main_clock = ClockState::CountingDown {
            start_time: now,
            time_remaining_at_start: main,
        };
        self.shot_clock = ClockState::CountingDown {
            start_time: now,
            time_remaining_at_start: shot,
        };
    }

    fn stop_counting(&mut self, now: Instant) -> Result<()> {
        let now = self.effective_now(now);
        if self.main_clock.is_running() {
            self.main_clock = ClockState::Stopped {
                clock_time: self
                    .main_clock
                    .clock_time(now)
                    .ok_or(ScoreboardError::InvalidNowValue)?,
            };
        }
        if self.shot_clock.is_running() {
            self.shot_clock = ClockState::Stopped {
                clock_time: self
                    .shot_clock
                    .clock_time(now)
                    .ok_or(ScoreboardError::InvalidNowValue)?,
            };
        }
        Ok(())
    }

    fn send_clock_running(&self, running: bool) {
        self.start_stop_tx.send(running).unwrap();
    }

    /// Resets the shot clock to the configured rule duration. While running
    /// this restarts both countdowns from `now`; if the main clock is at
    /// zero the clocks stay frozen and only the shot value changes.
    pub fn reset_shot_clock(&mut self, now: Instant) -> Result<()> {
        if self.edit_session.is_some() {
            return Err(ScoreboardError::EditInProgress);
        }
        self.update(now)?;

        let main = self
            .main_clock_time(now)
            .ok_or(ScoreboardError::InvalidNowValue)?;
        info!("{} Resetting the shot clock", self.status_string(now));
        self.main_clock = ClockState::Stopped { clock_time: main };
        self.shot_clock = ClockState::Stopped {
            clock_time: ClockTime::from_duration(self.config.shot_clock_duration()),
        };
        if self.running {
            self.resume_counting(now);
        }

        Ok(())
    }

    pub fn sound_buzzer(&mut self, now: Instant) {
        debug!("{} Operator buzzer", self.status_string(now));
        self.buzzer_held_until = Some(now + BUZZER_HOLD);
    }

    /// The buzzer sounds while the operator holds it, and continuously when
    /// the main clock has expired during play.
    pub fn buzzer_should_sound(&self, now: Instant) -> bool {
        let held = self.buzzer_held_until.is_some_and(|until| now < until);
        let expired = self.running
            && self
                .main_clock_time(now)
                .is_some_and(|time| time.is_zero());
        held || expired
    }

    pub fn select_team(&mut self, team: Team, now: Instant) {
        info!("{} Selecting {team} team", self.status_string(now));
        self.selected_team = team;
    }

    pub fn select_target(&mut self, target: ChangeTarget, now: Instant) {
        info!("{} Selecting {target} target", self.status_string(now));
        self.selected_target = target;
    }

    /// Adds points to a team's score, refusing any change that would reach
    /// the configured ceiling. While editing the change lands in the staged
    /// buffer instead.
    pub fn add_points(&mut self, team: Team, points: u8, now: Instant) {
        if let Some(session) = &mut self.edit_session {
            session.add_score(team, points, self.config.score_ceiling);
            return;
        }

        let new_score = self.scores[team].saturating_add(points.into());
        if new_score >= self.config.score_ceiling {
            info!(
                "{} {team} score change to {new_score} rejected, over the limit",
                self.status_string(now)
            );
        } else {
            info!("{} {team} score to {new_score}", self.status_string(now));
            self.scores[team] = new_score;
        }
    }

    pub fn increment_active(&mut self, now: Instant) -> Result<()> {
        let team = self.selected_team;
        if self.edit_session.is_some() && self.selected_target != ChangeTarget::Score {
            return Err(ScoreboardError::EditInProgress);
        }

        match self.selected_target {
            ChangeTarget::Score => self.add_points(team, 1, now),
            ChangeTarget::Fouls => {
                if self.fouls[team] < self.config.fouls_limit {
                    self.fouls[team] += 1;
                    info!(
                        "{} {team} fouls to {}",
                        self.status_string(now),
                        self.fouls[team]
                    );
                }
            }
            ChangeTarget::TimeoutsLeft => {
                if self.timeouts_left[team] < MAX_TIMEOUTS_LEFT {
                    self.timeouts_left[team] += 1;
                    info!(
                        "{} {team} timeouts left to {}",
                        self.status_string(now),
                        self.timeouts_left[team]
                    );
                }
            }
            ChangeTarget::Period => {
                if self.period < MAX_PERIOD {
                    self.period += 1;
                    info!("{} Period to {}", self.status_string(now), self.period);
                }
            }
        }

        Ok(())
    }

    pub fn decrement_active(&mut self, now: Instant) -> Result<()> {
        let team = self.selected_team;
        if self.edit_session.is_some() && self.selected_target != ChangeTarget::Score {
            return Err(ScoreboardError::EditInProgress);
        }

        match self.selected_target {
            ChangeTarget::Score => {
                if let Some(session) = &mut self.edit_session {
                    session.sub_score(team);
                } else {
                    self.scores[team] = self.scores[team].saturating_sub(1);
                    info!(
                        "{} {team} score to {}",
                        self.status_string(now),
                        self.scores[team]
                    );
                }
            }
            ChangeTarget::Fouls => {
                self.fouls[team] = self.fouls[team].saturating_sub(1);
            }
            ChangeTarget::TimeoutsLeft => {
                self.timeouts_left[team] = self.timeouts_left[team].saturating_sub(1);
            }
            ChangeTarget::Period => {
                if self.period > MIN_PERIOD {
                    self.period -= 1;
                    info!("{} Period to {}", self.status_string(now), self.period);
                }
            }
        }

        Ok(())
    }

    pub fn cycle_possession(&mut self, now: Instant) -> Result<()> {
        if self.edit_session.is_some() {
            return Err(ScoreboardError::EditInProgress);
        }
        self.possession = match self.possession {
            None => Some(Team::Home),
            Some(Team::Home) => Some(Team::Visitor),
            Some(Team::Visitor) => None,
        };
        info!(
            "{} Possession now {}",
            self.status_string(now),
            match self.possession {
                Some(team) => team.to_string(),
                None => "cleared".to_string(),
            }
        );
        Ok(())
    }

    pub fn toggle_bonus(&mut self, now: Instant) -> Result<()> {
        if self.edit_session.is_some() {
            return Err(ScoreboardError::EditInProgress);
        }
        let team = self.selected_team;
        self.bonus[team] = !self.bonus[team];
        info!(
            "{} {team} bonus now {}",
            self.status_string(now),
            self.bonus[team]
        );
        Ok(())
    }

    /// Directly sets both stopped clock values, for tests and external
    /// control surfaces.
    pub fn set_clock_times(&mut self, main: ClockTime, shot: ClockTime) -> Result<()> {
        if self.edit_session.is_some() {
            return Err(ScoreboardError::EditInProgress);
        }
        if self.main_clock.is_running() || self.shot_clock.is_running() {
            return Err(ScoreboardError::ClockIsRunning);
        }
        self.main_clock = ClockState::Stopped { clock_time: main };
        self.shot_clock = ClockState::Stopped { clock_time: shot };
        Ok(())
    }

    pub fn set_scores(&mut self, scores: HomeVisitorBundle<u16>, now: Instant) -> Result<()> {
        if self.edit_session.is_some() {
            return Err(ScoreboardError::EditInProgress);
        }
        info!("{} Scores set to {scores}", self.status_string(now));
        self.scores = scores;
        Ok(())
    }

    /// Opens an edit session seeded from the live state. Only available
    /// while stopped.
    pub fn start_edit(&mut self, now: Instant) -> Result<()> {
        if self.running {
            return Err(ScoreboardError::ClockIsRunning);
        }
        if self.edit_session.is_some() {
            return Err(ScoreboardError::AlreadyEditing);
        }
        self.update(now)?;

        let main = self
            .main_clock_time(now)
            .ok_or(ScoreboardError::InvalidNowValue)?;
        let shot = self
            .shot_clock_time(now)
            .ok_or(ScoreboardError::InvalidNowValue)?;
        info!("{} Opening edit session", self.status_string(now));
        self.edit_session = Some(EditSession::new(
            main,
            shot,
            self.scores,
            ClockLayout::from_time(main, self.config.main_clock_tenths_threshold()),
            ClockLayout::from_time(shot, self.config.shot_clock_tenths_threshold()),
        ));

        Ok(())
    }

    /// Applies the staged values to the live state in one step.
    pub fn commit_edit(&mut self, now: Instant) -> Result<()> {
        let session = self
            .edit_session
            .take()
            .ok_or(ScoreboardError::NotEditing)?;
        let (main, shot, scores) = session.into_parts();
        self.main_clock = ClockState::Stopped { clock_time: main };
        self.shot_clock = ClockState::Stopped { clock_time: shot };
        self.scores = scores;
        info!("{} Edit committed", self.status_string(now));
        Ok(())
    }

    /// Discards the staged values; the live state is untouched.
    pub fn cancel_edit(&mut self, now: Instant) -> Result<()> {
        self.edit_session
            .take()
            .ok_or(ScoreboardError::NotEditing)?;
        info!("{} Edit cancelled", self.status_string(now));
        Ok(())
    }

    fn edit_mut(&mut self) -> Result<&mut EditSession> {
        self.edit_session
            .as_mut()
            .ok_or(ScoreboardError::NotEditing)
    }

    fn handle_digit(&mut self, value: u8, now: Instant) -> Result<()> {
        if self.edit_session.is_some() {
            return self.edit_mut().map(|session| session.set_digit(value));
        }
        // Quick score entry: 1, 2 or 3 points to the selected team
        if (1..=3).contains(&value) {
            self.add_points(self.selected_team, value, now);
        }
        Ok(())
    }

    /// Routes a logical input to the right operation for the current mode.
    pub fn handle_input(&mut self, input: ScoreboardInput, now: Instant) -> Result<()> {
        match input {
            ScoreboardInput::ToggleClock => self.start_stop_clock(now),
            ScoreboardInput::ResetShotClock => self.reset_shot_clock(now),
            ScoreboardInput::SoundBuzzer => {
                self.sound_buzzer(now);
                Ok(())
            }
            ScoreboardInput::SelectTeam(team) => {
                self.select_team(team, now);
                Ok(())
            }
            ScoreboardInput::SelectTarget(target) => {
                self.select_target(target, now);
                Ok(())
            }
            ScoreboardInput::Increment => self.increment_active(now),
            ScoreboardInput::Decrement => self.decrement_active(now),
            ScoreboardInput::Digit(value) => self.handle_digit(value, now),
            ScoreboardInput::TogglePossession => self.cycle_possession(now),
            ScoreboardInput::ToggleBonus => self.toggle_bonus(now),
            ScoreboardInput::StartEdit => self.start_edit(now),
            ScoreboardInput::CommitEdit => self.commit_edit(now),
            ScoreboardInput::CancelEdit => self.cancel_edit(now),
            ScoreboardInput::EditLeft => self.edit_mut().map(|session| session.move_left()),
            ScoreboardInput::EditRight => self.edit_mut().map(|session| session.move_right()),
            ScoreboardInput::EditJumpMainClock => {
                self.edit_mut().map(|session| session.jump_main_clock())
            }
            ScoreboardInput::EditJumpShotClock => {
                self.edit_mut().map(|session| session.jump_shot_clock())
            }
            ScoreboardInput::ToggleTenths => {
                self.edit_mut().map(|session| session.toggle_tenths())
            }
        }
    }

    /// Returns `None` if `now` is before the clocks' start. In edit mode
    /// the clock and score fields carry the staged values.
    pub fn generate_snapshot(&self, now: Instant) -> Option<GameSnapshot> {
        let (main, shot, main_layout, shot_layout, selected_digit, scores) =
            if let Some(session) = &self.edit_session {
                (
                    session.main_clock(),
                    session.shot_clock(),
                    session.main_layout(),
                    session.shot_layout(),
                    Some(session.position()),
                    session.scores(),
                )
            } else {
                let main = self.main_clock_time(now)?;
                let shot = self.shot_clock_time(now)?;
                (
                    main,
                    shot,
                    ClockLayout::from_time(main, self.config.main_clock_tenths_threshold()),
                    ClockLayout::from_time(shot, self.config.shot_clock_tenths_threshold()),
                    None,
                    self.scores,
                )
            };

        Some(GameSnapshot {
            mode: self.mode(),
            main_clock: ClockSnapshot {
                time: main,
                layout: main_layout,
            },
            shot_clock: ClockSnapshot {
                time: shot,
                layout: shot_layout,
            },
            scores,
            fouls: self.fouls,
            timeouts_left: self.timeouts_left,
            bonus: self.bonus,
            period: self.period,
            possession: self.possession,
            selected_team: self.selected_team,
            selected_target: self.selected_target,
            selected_digit,
        })
    }

    fn status_string(&self, now: Instant) -> String {
        use std::fmt::Write;

        let mut string = String::new();

        if let (Some(main), Some(shot)) =
            (self.main_clock_time(now), self.shot_clock_time(now))
        {
            if let Err(e) = write!(&mut string, "[{main}/{shot} ") {
                error!("Error with time string: {e}");
            }
        } else {
            string.push_str("[XX:XX/XX.X ");
        }

        string.push_str(match self.mode() {
            GameMode::Stopped => "STOPPED]",
            GameMode::Running => "RUNNING]",
            GameMode::Edit => "EDITING]",
        });

        string
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClockState {
    Stopped {
        clock_time: ClockTime,
    },
    CountingDown {
        start_time: Instant,
        time_remaining_at_start: ClockTime,
    },
}

impl ClockState {
    fn is_running(&self) -> bool {
        match self {
            ClockState::CountingDown { .. } => true,
            ClockState::Stopped { .. } => false,
        }
    }

    /// Returns `None` if `now` is before the start of the countdown.
    fn clock_time(&self, now: Instant) -> Option<ClockTime> {
        match self {
            ClockState::CountingDown {
                start_time,
                time_remaining_at_start,
            } => now.checked_duration_since(*start_time).map(|elapsed| {
                ClockTime::from_duration(
                    time_remaining_at_start.to_duration().saturating_sub(elapsed),
                )
            }),
            ClockState::Stopped { clock_time } => Some(*clock_time),
        }
    }

    fn end_instant(&self) -> Option<Instant> {
        match self {
            ClockState::CountingDown {
                start_time,
                time_remaining_at_start,
            } => Some(*start_time + time_remaining_at_start.to_duration()),
            ClockState::Stopped { .. } => None,
        }
    }
}
