use crate::drawing::{PANEL_HEIGHT, PANEL_WIDTH};
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};

/// A software framebuffer standing in for the LED panel. Pixels outside the
/// panel are silently dropped, like on the real hardware.
#[derive(Debug, Clone)]
pub struct SimPanel {
    pixels: Vec<Rgb888>,
}

impl SimPanel {
    pub fn new() -> Self {
        Self {
            pixels: vec![Rgb888::BLACK; (PANEL_WIDTH * PANEL_HEIGHT) as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb888 {
        self.pixels[(y * PANEL_WIDTH + x) as usize]
    }
}

impl Default for SimPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for SimPanel {
    fn size(&self) -> Size {
        Size::new(PANEL_WIDTH, PANEL_HEIGHT)
    }
}

impl DrawTarget for SimPanel {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if (0..PANEL_WIDTH as i32).contains(&point.x)
                && (0..PANEL_HEIGHT as i32).contains(&point.y)
            {
                self.pixels[(point.y as u32 * PANEL_WIDTH + point.x as u32) as usize] = color;
            }
        }
        Ok(())
    }
}
