use crossterm::style::Color;

use crate::model::config::UiSettings;
use crate::model::task::{Impact, Priority, Status};

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Truecolor terminal color
    pub fn color(self) -> Color {
        Color::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Named palette slots, overridable from `[ui.colors]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub text: Rgb,
    pub dim: Rgb,
    pub red: Rgb,
    pub orange: Rgb,
    pub yellow: Rgb,
    pub green: Rgb,
    pub cyan: Rgb,
    pub blue: Rgb,
    pub sky: Rgb,
    pub gray: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            text: Rgb(0xE5, 0xE7, 0xEB),
            dim: Rgb(0x6B, 0x72, 0x80),
            red: Rgb(0xEF, 0x44, 0x44),
            orange: Rgb(0xF9, 0x73, 0x16),
            yellow: Rgb(0xEA, 0xB3, 0x08),
            green: Rgb(0x22, 0xC5, 0x5E),
            cyan: Rgb(0x06, 0xB6, 0xD4),
            blue: Rgb(0x3B, 0x82, 0xF6),
            sky: Rgb(0x0E, 0xA5, 0xE9),
            gray: Rgb(0x9C, 0xA3, 0xAF),
        }
    }
}

/// Parse a hex color string like "#FF4444"
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgb(r, g, b))
}

impl Palette {
    /// Defaults with `[ui.colors]` overrides applied. Bad entries are logged
    /// and skipped.
    pub fn from_config(ui: &UiSettings) -> Self {
        let mut palette = Palette::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(slot = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "text" => palette.text = color,
                "dim" => palette.dim = color,
                "red" => palette.red = color,
                "orange" => palette.orange = color,
                "yellow" => palette.yellow = color,
                "green" => palette.green = color,
                "cyan" => palette.cyan = color,
                "blue" => palette.blue = color,
                "sky" => palette.sky = color,
                "gray" => palette.gray = color,
                _ => tracing::warn!(slot = %key, "unknown color slot"),
            }
        }
        palette
    }

    /// Status dot color
    pub fn status_color(&self, status: Status) -> Rgb {
        match status {
            Status::InProgress => self.cyan,
            Status::Completed => self.green,
            Status::InReview => self.yellow,
            Status::Planned => self.blue,
            Status::New => self.sky,
        }
    }

    /// Color and arrow glyph for a priority badge
    pub fn priority_style(&self, priority: Priority) -> (Rgb, &'static str) {
        match priority {
            Priority::Urgent => (self.red, "↑"),
            Priority::High => (self.orange, "↑"),
            Priority::Medium => (self.yellow, "…"),
            Priority::Low => (self.green, "↓"),
            Priority::None => (self.gray, "…"),
        }
    }

    pub fn impact_color(&self, impact: Impact) -> Rgb {
        match impact {
            Impact::High => self.red,
            Impact::Medium => self.yellow,
            Impact::Low => self.green,
        }
    }
}
