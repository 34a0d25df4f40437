use crate::segments::Digit;
use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle, Triangle},
};
use more_asserts::*;
use scoreboard_common::game_snapshot::{ClockLayout, DigitPosition, GameSnapshot, Team};

pub const PANEL_WIDTH: u32 = 192;
pub const PANEL_HEIGHT: u32 = 96;

pub const RED: Rgb888 = Rgb888::RED;
pub const YELLOW: Rgb888 = Rgb888::YELLOW;
pub const GREEN: Rgb888 = Rgb888::GREEN;
pub const WHITE: Rgb888 = Rgb888::WHITE;
/// Unlit segments stay faintly visible, like a real LED panel.
pub const DIM: Rgb888 = Rgb888::new(25, 25, 25);

// Digit cell origins, indexed to match DigitPosition 1-6.
const MAIN_CLOCK_X: [i32; 4] = [46, 70, 102, 126];
const MAIN_CLOCK_Y: i32 = 4;
const MAIN_CLOCK_SCALE: u32 = 4;
const SHOT_CLOCK_X: [i32; 2] = [79, 98];
const SHOT_CLOCK_Y: i32 = 46;
const SHOT_CLOCK_SCALE: u32 = 3;

/// Draws one seven-segment cell with its top left corner at `top_left`.
/// The cell is `5 * scale` wide and `9 * scale` tall; unlit segments are
/// drawn in [`DIM`] so the cell outline is always visible.
pub fn draw_cell<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    digit: Digit,
    top_left: Point,
    scale: u32,
    color: Rgb888,
) -> Result<(), D::Error> {
    let t = scale as i32;
    let l = 3 * t;

    let segments = [
        (digit.a, Point::new(t, 0), Size::new(l as u32, scale)),
        (digit.b, Point::new(t + l, t), Size::new(scale, l as u32)),
        (
            digit.c,
            Point::new(t + l, 2 * t + l),
            Size::new(scale, l as u32),
        ),
        (
            digit.d,
            Point::new(t, 2 * (t + l)),
            Size::new(l as u32, scale),
        ),
        (digit.e, Point::new(0, 2 * t + l), Size::new(scale, l as u32)),
        (digit.f, Point::new(0, t), Size::new(scale, l as u32)),
        (digit.g, Point::new(t, t + l), Size::new(l as u32, scale)),
    ];

    for (lit, offset, size) in segments {
        let seg_color = if lit { color } else { DIM };
        Rectangle::new(top_left + offset, size)
            .into_styled(PrimitiveStyle::with_fill(seg_color))
            .draw(display)?;
    }

    Ok(())
}

/// Draws the full scoreboard face from a snapshot. Assumes the display is
/// 192x96; anything the target clips is lost, matching the panel hardware.
pub fn draw_panels<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    state: &GameSnapshot,
) -> Result<(), D::Error> {
    debug_assert_le!(state.scores[Team::Home], 999);
    debug_assert_le!(state.scores[Team::Visitor], 999);

    Rectangle::new(Point::zero(), Size::new(PANEL_WIDTH, PANEL_HEIGHT))
        .into_styled(PrimitiveStyle::with_fill(Rgb888::BLACK))
        .draw(display)?;

    draw_main_clock(display, state)?;
    draw_shot_clock(display, state)?;

    for (team, score) in state.scores.iter() {
        draw_score(display, team, *score)?;
    }
    for (team, fouls) in state.fouls.iter() {
        draw_fouls(display, team, *fouls)?;
    }
    for (team, timeouts) in state.timeouts_left.iter() {
        draw_timeouts(display, team, *timeouts)?;
    }
    for (team, bonus) in state.bonus.iter() {
        draw_bonus(display, team, *bonus)?;
    }

    draw_period(display, state.period)?;
    draw_possession(display, state.possession)?;

    if let Some(position) = state.selected_digit {
        draw_digit_highlight(display, position)?;
    }

    Ok(())
}

fn draw_main_clock<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    state: &GameSnapshot,
) -> Result<(), D::Error> {
    let digits = state.main_clock.time.digits();
    let editing = state
        .selected_digit
        .is_some_and(|position| position.is_main_clock());

    let cells = match state.main_clock.layout {
        ClockLayout::Normal => [
            // Leading blank matches the usual clock face, except while
            // editing, when every selectable digit has to be visible.
            if digits.ten_minutes == 0 && !editing {
                Digit::BLANK
            } else {
                Digit::from_num(digits.ten_minutes)
            },
            Digit::from_num(digits.minutes),
            Digit::from_num(digits.ten_seconds),
            Digit::from_num(digits.seconds),
        ],
        ClockLayout::TenthSeconds => [
            if digits.ten_seconds == 0 && !editing {
                Digit::BLANK
            } else {
                Digit::from_num(digits.ten_seconds)
            },
            Digit::from_num(digits.seconds),
            Digit::from_num(digits.tenth_seconds),
            Digit::BLANK,
        ],
    };

    for (x, digit) in MAIN_CLOCK_X.iter().zip(cells) {
        draw_cell(
            display,
            digit,
            Point::new(*x, MAIN_CLOCK_Y),
            MAIN_CLOCK_SCALE,
            RED,
        )?;
    }

    // Between cells 2 and 3: a colon in the normal layout, a decimal point
    // in the tenths layout.
    let (upper, lower) = match state.main_clock.layout {
        ClockLayout::Normal => (RED, RED),
        ClockLayout::TenthSeconds => (DIM, RED),
    };
    Rectangle::new(Point::new(94, 12), Size::new(4, 4))
        .into_styled(PrimitiveStyle::with_fill(upper))
        .draw(display)?;
    Rectangle::new(Point::new(94, 28), Size::new(4, 4))
        .into_styled(PrimitiveStyle::with_fill(lower))
        .draw(display)?;

    Ok(())
}

fn draw_shot_clock<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    state: &GameSnapshot,
) -> Result<(), D::Error> {
    let digits = state.shot_clock.time.digits();
    let editing = state
        .selected_digit
        .is_some_and(|position| !position.is_main_clock());

    let cells = match state.shot_clock.layout {
        ClockLayout::Normal => [
            if digits.ten_seconds == 0 && !editing {
                Digit::BLANK
            } else {
                Digit::from_num(digits.ten_seconds)
            },
            Digit::from_num(digits.seconds),
        ],
        ClockLayout::TenthSeconds => [
            Digit::from_num(digits.seconds),
            Digit::from_num(digits.tenth_seconds),
        ],
    };

    for (x, digit) in SHOT_CLOCK_X.iter().zip(cells) {
        draw_cell(
            display,
            digit,
            Point::new(*x, SHOT_CLOCK_Y),
            SHOT_CLOCK_SCALE,
            RED,
        )?;
    }

    let dot = match state.shot_clock.layout {
        ClockLayout::Normal => DIM,
        ClockLayout::TenthSeconds => RED,
    };
    Rectangle::new(Point::new(95, 68), Size::new(3, 3))
        .into_styled(PrimitiveStyle::with_fill(dot))
        .draw(display)?;

    Ok(())
}

fn draw_score<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    team: Team,
    score: u16,
) -> Result<(), D::Error> {
    let hundreds = (score / 100) as u8;
    let tens = (score / 10 % 10) as u8;
    let ones = (score % 10) as u8;

    let cells = [
        if hundreds == 0 {
            Digit::BLANK
        } else {
            Digit::from_num(hundreds)
        },
        if hundreds == 0 && tens == 0 {
            Digit::BLANK
        } else {
            Digit::from_num(tens)
        },
        Digit::from_num(ones),
    ];

    let xs = match team {
        Team::Home => [8, 20, 32],
        Team::Visitor => [148, 160, 172],
    };

    for (x, digit) in xs.iter().zip(cells) {
        draw_cell(display, digit, Point::new(*x, 8), 2, YELLOW)?;
    }

    Ok(())
}

fn draw_fouls<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    team: Team,
    fouls: u8,
) -> Result<(), D::Error> {
    let tens = fouls / 10;
    let cells = [
        if tens == 0 {
            Digit::BLANK
        } else {
            Digit::from_num(tens)
        },
        Digit::from_num(fouls % 10),
    ];

    let xs = match team {
        Team::Home => [8, 15],
        Team::Visitor => [170, 177],
    };

    for (x, digit) in xs.iter().zip(cells) {
        draw_cell(display, digit, Point::new(*x, 34), 1, WHITE)?;
    }

    Ok(())
}

fn draw_timeouts<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    team: Team,
    timeouts: u8,
) -> Result<(), D::Error> {
    let x = match team {
        Team::Home => 26,
        Team::Visitor => 161,
    };
    draw_cell(display, Digit::from_num(timeouts), Point::new(x, 34), 1, GREEN)
}

fn draw_bonus<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    team: Team,
    bonus: bool,
) -> Result<(), D::Error> {
    let x = match team {
        Team::Home => 8,
        Team::Visitor => 179,
    };
    let color = if bonus { YELLOW } else { DIM };
    Rectangle::new(Point::new(x, 48), Size::new(5, 5))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(display)
}

fn draw_period<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    period: i8,
) -> Result<(), D::Error> {
    // Pre-game shows a dash, same as any out-of-range value.
    let digit = if period < 0 {
        Digit::DASH
    } else {
        Digit::from_num(period as u8)
    };
    draw_cell(display, digit, Point::new(91, 74), 2, WHITE)
}

fn draw_possession<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    possession: Option<Team>,
) -> Result<(), D::Error> {
    let home_color = if possession == Some(Team::Home) {
        GREEN
    } else {
        DIM
    };
    let visitor_color = if possession == Some(Team::Visitor) {
        GREEN
    } else {
        DIM
    };

    Triangle::new(Point::new(8, 62), Point::new(16, 58), Point::new(16, 66))
        .into_styled(PrimitiveStyle::with_fill(home_color))
        .draw(display)?;
    Triangle::new(
        Point::new(184, 62),
        Point::new(176, 58),
        Point::new(176, 66),
    )
    .into_styled(PrimitiveStyle::with_fill(visitor_color))
    .draw(display)?;

    Ok(())
}

fn draw_digit_highlight<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    position: DigitPosition,
) -> Result<(), D::Error> {
    let (x, y, scale) = if position.is_main_clock() {
        let cell = (position.index() - DigitPosition::FIRST_MAIN.index()) as usize;
        (MAIN_CLOCK_X[cell], MAIN_CLOCK_Y, MAIN_CLOCK_SCALE)
    } else {
        let cell = (position.index() - DigitPosition::FIRST_SHOT.index()) as usize;
        (SHOT_CLOCK_X[cell], SHOT_CLOCK_Y, SHOT_CLOCK_SCALE)
    };

    Rectangle::new(
        Point::new(x - 2, y - 2),
        Size::new(5 * scale + 4, 9 * scale + 4),
    )
    .into_styled(PrimitiveStyle::with_stroke(WHITE, 1))
    .draw(display)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::panel::SimPanel;
    use scoreboard_common::{
        clock_time::ClockTime,
        game_snapshot::{ClockSnapshot, GameMode},
    };

    fn snapshot() -> GameSnapshot {
        GameSnapshot {
            mode: GameMode::Stopped,
            main_clock: ClockSnapshot {
                time: ClockTime::from_secs(480),
                layout: ClockLayout::Normal,
            },
            shot_clock: ClockSnapshot {
                time: ClockTime::from_secs(24),
                layout: ClockLayout::Normal,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_colon_lit_in_normal_layout() {
        let mut panel = SimPanel::new();
        draw_panels(&mut panel, &snapshot()).unwrap();
        assert_eq!(panel.pixel(95, 13), RED);
        assert_eq!(panel.pixel(95, 29), RED);
    }

    #[test]
    fn test_decimal_point_in_tenths_layout() {
        let mut panel = SimPanel::new();
        let mut state = snapshot();
        state.main_clock = ClockSnapshot {
            time: ClockTime::from_tenths(320),
            layout: ClockLayout::TenthSeconds,
        };
        draw_panels(&mut panel, &state).unwrap();
        assert_eq!(panel.pixel(95, 13), DIM);
        assert_eq!(panel.pixel(95, 29), RED);
    }

    #[test]
    fn test_leading_main_clock_digit_blanks() {
        let mut panel = SimPanel::new();
        draw_panels(&mut panel, &snapshot()).unwrap();
        // 8:00 leaves the ten-minutes cell fully dim; the minutes cell
        // shows an 8, so its top segment is lit
        assert_eq!(panel.pixel(46 + 8, 4), DIM);
        assert_eq!(panel.pixel(70 + 8, 4), RED);
    }

    #[test]
    fn test_editing_reveals_leading_digit() {
        let mut panel = SimPanel::new();
        let mut state = snapshot();
        state.mode = GameMode::Edit;
        state.selected_digit = Some(DigitPosition::FIRST_MAIN);
        draw_panels(&mut panel, &state).unwrap();
        // The ten-minutes cell shows a zero, so its top segment is lit
        assert_eq!(panel.pixel(46 + 8, 4), RED);
        // And the selected cell is outlined
        assert_eq!(panel.pixel(45, 2), WHITE);
    }

    #[test]
    fn test_score_leading_blanks() {
        let mut panel = SimPanel::new();
        let mut state = snapshot();
        state.scores[Team::Home] = 5;
        draw_panels(&mut panel, &state).unwrap();
        // Hundreds and tens cells dim, ones cell lit (5 has a top segment)
        assert_eq!(panel.pixel(8 + 4, 8), DIM);
        assert_eq!(panel.pixel(20 + 4, 8), DIM);
        assert_eq!(panel.pixel(32 + 4, 8), YELLOW);
    }

    #[test]
    fn test_period_dash_before_game() {
        let mut panel = SimPanel::new();
        let mut state = snapshot();
        state.period = -1;
        draw_panels(&mut panel, &state).unwrap();
        // Middle segment of the period cell: offset (t, t+l) = (2, 8)
        assert_eq!(panel.pixel(91 + 3, 74 + 8), WHITE);
        // Top segment unlit
        assert_eq!(panel.pixel(91 + 3, 74), DIM);
    }

    #[test]
    fn test_possession_arrow() {
        let mut panel = SimPanel::new();
        let mut state = snapshot();
        state.possession = Some(Team::Home);
        draw_panels(&mut panel, &state).unwrap();
        assert_eq!(panel.pixel(15, 62), GREEN);
        assert_eq!(panel.pixel(177, 62), DIM);
    }
}
