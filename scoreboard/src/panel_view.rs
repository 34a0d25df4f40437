use embedded_graphics::prelude::*;
use segment_drawing::{
    drawing::{PANEL_HEIGHT, PANEL_WIDTH},
    panel::SimPanel,
};
use std::fmt::Write;

/// Renders the simulated panel as terminal text, two pixels per character
/// cell using the upper-half-block glyph with 24-bit colors.
pub fn render(panel: &SimPanel) -> String {
    let mut out = String::with_capacity((PANEL_WIDTH as usize + 16) * (PANEL_HEIGHT as usize / 2));

    for row in (0..PANEL_HEIGHT).step_by(2) {
        for col in 0..PANEL_WIDTH {
            let top = panel.pixel(col, row);
            let bottom = panel.pixel(col, row + 1);
            // Errors from writing to a String are impossible
            let _ = write!(
                out,
                "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                top.r(),
                top.g(),
                top.b(),
                bottom.r(),
                bottom.g(),
                bottom.b()
            );
        }
        out.push_str("\x1b[0m\n");
    }

    out
}

#[cfg(test)]
mod test {
    use super::*;
    use embedded_graphics::{
        pixelcolor::Rgb888,
        primitives::{PrimitiveStyle, Rectangle},
    };

    #[test]
    fn test_row_count() {
        let panel = SimPanel::new();
        let rendered = render(&panel);
        assert_eq!(
            rendered.lines().count(),
            PANEL_HEIGHT as usize / 2
        );
    }

    #[test]
    fn test_colors_pass_through() {
        let mut panel = SimPanel::new();
        Rectangle::new(Point::new(0, 0), Size::new(1, 1))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::new(1, 2, 3)))
            .draw(&mut panel)
            .unwrap();
        let rendered = render(&panel);
        assert!(rendered.starts_with("\x1b[38;2;1;2;3m"));
    }
}
