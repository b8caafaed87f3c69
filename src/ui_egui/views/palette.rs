use egui::{Color32, Visuals};

/// Card fills, picked by event index.
pub const CARD_COLORS: [Color32; 9] = [
    Color32::RED,
    Color32::GREEN,
    Color32::BLUE,
    Color32::YELLOW,
    Color32::from_rgb(255, 0, 255),
    Color32::from_rgb(0, 255, 255),
    Color32::from_rgb(0x26, 0xA6, 0x9A),
    Color32::from_rgb(0xFF, 0xCA, 0x28),
    Color32::from_rgb(0xD4, 0xE1, 0x57),
];

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub fn card_color(index: usize) -> Color32 {
    CARD_COLORS[index % CARD_COLORS.len()]
}

/// Readable text on top of `fill`.
pub fn card_text_color(fill: Color32) -> Color32 {
    let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct TimetablePalette {
    pub header_bg: Color32,
    pub grid_bg: Color32,
    pub line: Color32,
    pub header_text: Color32,
}

impl TimetablePalette {
    pub fn from_visuals(visuals: &Visuals) -> Self {
        let text = visuals.text_color();
        Self {
            header_bg: visuals.panel_fill,
            grid_bg: visuals.faint_bg_color,
            line: with_alpha(text, if visuals.dark_mode { 60 } else { 80 }),
            header_text: text,
        }
    }
}
