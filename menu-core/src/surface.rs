/// Drawing primitives the menu screen needs from a display
use embedded_graphics::mono_font::{ascii::FONT_8X13, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use thiserror::Error;

use crate::layout::{text_width, Rect};
use crate::theme::to_rgb565;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("draw failed: {0}")]
pub struct SurfaceError(pub String);

/// Screen as seen by the menu controller. Coordinates are pixels in the
/// landscape frame, text is positioned by its top-left corner.
pub trait Surface {
    fn clear(&mut self, color: u16) -> Result<(), SurfaceError>;

    fn fill_rect(&mut self, rect: Rect, color: u16) -> Result<(), SurfaceError>;

    /// One-pixel outline.
    fn draw_rect(&mut self, rect: Rect, color: u16) -> Result<(), SurfaceError>;

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: u16) -> Result<(), SurfaceError>;

    /// Text centred horizontally on `center_x`.
    fn draw_text_centered(
        &mut self,
        center_x: i32,
        y: i32,
        text: &str,
        color: u16,
    ) -> Result<(), SurfaceError> {
        let x = (center_x - text_width(text) / 2).max(0);
        self.draw_text(x, y, text, color)
    }
}

/// [`Surface`] over any `embedded_graphics` RGB565 draw target.
pub struct GraphicsSurface<D> {
    target: D,
}

impl<D> GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

fn draw_err<E: core::fmt::Debug>(e: E) -> SurfaceError {
    SurfaceError(format!("{:?}", e))
}

fn rectangle(rect: Rect) -> Rectangle {
    Rectangle::new(
        Point::new(rect.x, rect.y),
        Size::new(rect.width.max(0) as u32, rect.height.max(0) as u32),
    )
}

impl<D> Surface for GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
    D::Error: core::fmt::Debug,
{
    fn clear(&mut self, color: u16) -> Result<(), SurfaceError> {
        self.target.clear(to_rgb565(color)).map_err(draw_err)
    }

    fn fill_rect(&mut self, rect: Rect, color: u16) -> Result<(), SurfaceError> {
        rectangle(rect)
            .into_styled(PrimitiveStyle::with_fill(to_rgb565(color)))
            .draw(&mut self.target)
            .map_err(draw_err)
    }

    fn draw_rect(&mut self, rect: Rect, color: u16) -> Result<(), SurfaceError> {
        rectangle(rect)
            .into_styled(PrimitiveStyle::with_stroke(to_rgb565(color), 1))
            .draw(&mut self.target)
            .map_err(draw_err)
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: u16) -> Result<(), SurfaceError> {
        let style = MonoTextStyle::new(&FONT_8X13, to_rgb565(color));
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(draw_err)
    }
}
