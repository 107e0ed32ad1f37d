use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    /// Counter, hints and the progress track.
    pub chrome: Color32,
    pub code_background: Color32,
    pub overlay_background: Color32,
    pub h1_size: f32,
    pub h2_size: f32,
    pub h3_size: f32,
    pub body_size: f32,
    pub code_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x14, 0x17, 0x1C),
            foreground: Color32::from_rgb(0xD4, 0xD7, 0xDD),
            heading_color: Color32::from_rgb(0xF4, 0xF6, 0xFA),
            accent: Color32::from_rgb(0x4F, 0xB3, 0xA9),
            chrome: Color32::from_rgb(0x8A, 0x93, 0xA3),
            code_background: Color32::from_rgb(0x22, 0x27, 0x2F),
            overlay_background: Color32::from_rgba_unmultiplied(0x0B, 0x0D, 0x11, 0xF0),
            h1_size: 88.0,
            h2_size: 64.0,
            h3_size: 48.0,
            body_size: 40.0,
            code_size: 28.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::from_rgb(0xFB, 0xFA, 0xF7),
            foreground: Color32::from_rgb(0x2B, 0x2D, 0x33),
            heading_color: Color32::from_rgb(0x12, 0x2B, 0x4A),
            accent: Color32::from_rgb(0x1F, 0x7A, 0x70),
            chrome: Color32::from_rgb(0x6B, 0x70, 0x7A),
            code_background: Color32::from_rgb(0xEE, 0xEC, 0xE6),
            overlay_background: Color32::from_rgba_unmultiplied(0xFF, 0xFF, 0xFF, 0xF2),
            h1_size: 88.0,
            h2_size: 64.0,
            h3_size: 48.0,
            body_size: 40.0,
            code_size: 28.0,
        }
    }

    /// Unknown names fall back to light.
    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    /// Same color at `opacity` (clamped to 0..=1).
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
    }

    pub fn heading_size(&self, level: u8) -> f32 {
        match level {
            1 => self.h1_size,
            2 => self.h2_size,
            3 => self.h3_size,
            _ => self.body_size,
        }
    }
}
