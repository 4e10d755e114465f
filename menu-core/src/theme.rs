/// Color palette and conversions
///
/// Colors are kept as raw RGB565 `u16` values, the way the panel consumes
/// them, and converted to `embedded_graphics` colors at draw time.
use embedded_graphics::pixelcolor::Rgb565;

/// Convert RGB888 to RGB565
pub const fn rgb888_to_rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | ((b as u16 & 0xF8) >> 3)
}

/// Convert a packed RGB565 value to an `embedded_graphics` color
pub fn to_rgb565(color: u16) -> Rgb565 {
    Rgb565::new(
        ((color >> 11) & 0x1F) as u8,
        ((color >> 5) & 0x3F) as u8,
        (color & 0x1F) as u8,
    )
}

pub mod colors {
    use super::rgb888_to_rgb565;

    pub const BLACK: u16 = 0x0000;
    pub const WHITE: u16 = 0xFFFF;
    pub const RED: u16 = 0xF800;
    pub const GREEN: u16 = 0x07E0;
    pub const BLUE: u16 = 0x001F;
    pub const YELLOW: u16 = 0xFFE0;

    pub const BACKGROUND: u16 = BLACK;
    pub const TEXT_PRIMARY: u16 = WHITE;
    pub const TEXT_SECONDARY: u16 = rgb888_to_rgb565(180, 186, 196);
    pub const BUTTON_FILL: u16 = BLUE;
    pub const BUTTON_BORDER: u16 = WHITE;
    pub const MESSAGE_OK: u16 = GREEN;
    pub const MESSAGE_ERROR: u16 = RED;
    pub const MESSAGE_BUSY: u16 = YELLOW;
}
