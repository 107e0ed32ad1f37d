use crate::parser::Block;
use crate::theme::Theme;
use eframe::egui::{self, Color32, FontId, Pos2, Stroke};

/// Layout and paint a single run of text, returning the height used.
pub fn draw_text(
    ui: &egui::Ui,
    text: &str,
    pos: Pos2,
    font: FontId,
    color: Color32,
    max_width: f32,
) -> f32 {
    let galley = ui
        .painter()
        .layout(text.to_string(), font, color, max_width);
    let height = galley.rect.height();
    ui.painter().galley(pos, galley, color);
    height
}

/// Draw blocks top to bottom starting at `pos`. Returns total height used.
pub fn draw_blocks(
    ui: &egui::Ui,
    blocks: &[Block],
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let spacing = 24.0 * scale;
    let mut y = pos.y;

    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            y += spacing;
        }
        let at = Pos2::new(pos.x, y);
        y += match block {
            Block::Heading { level, text } => {
                let color = Theme::with_opacity(theme.heading_color, opacity);
                let font = FontId::proportional(theme.heading_size(*level) * scale);
                draw_text(ui, text, at, font, color, max_width)
            }
            Block::Paragraph { text } => {
                let color = Theme::with_opacity(theme.foreground, opacity);
                let font = FontId::proportional(theme.body_size * scale);
                draw_text(ui, text, at, font, color, max_width)
            }
            Block::ListItem { depth, text } => {
                draw_list_item(ui, *depth, text, theme, at, max_width, opacity, scale)
            }
            Block::CodeBlock { code } => draw_code(ui, code, theme, at, max_width, opacity, scale),
            Block::Quote { text } => draw_quote(ui, text, theme, at, max_width, opacity, scale),
            Block::HorizontalRule => {
                let color = Theme::with_opacity(theme.foreground, opacity * 0.3);
                let line_y = at.y + 4.0 * scale;
                ui.painter().line_segment(
                    [Pos2::new(at.x, line_y), Pos2::new(at.x + max_width, line_y)],
                    Stroke::new(2.0 * scale, color),
                );
                8.0 * scale
            }
        };
    }

    y - pos.y
}

#[allow(clippy::too_many_arguments)]
fn draw_list_item(
    ui: &egui::Ui,
    depth: usize,
    text: &str,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let color = Theme::with_opacity(theme.foreground, opacity);
    let font = FontId::proportional(theme.body_size * scale);
    let indent = 30.0 * scale * depth as f32;
    let marker_width = 45.0 * scale;

    let marker_color = Theme::with_opacity(theme.accent, opacity);
    let marker_pos = Pos2::new(pos.x + indent, pos.y);
    draw_text(
        ui,
        "\u{2022}",
        marker_pos,
        font.clone(),
        marker_color,
        marker_width,
    );

    let text_pos = Pos2::new(pos.x + indent + marker_width, pos.y);
    draw_text(
        ui,
        text,
        text_pos,
        font,
        color,
        (max_width - indent - marker_width).max(1.0),
    )
}

fn draw_code(
    ui: &egui::Ui,
    code: &str,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let padding = 20.0 * scale;
    let color = Theme::with_opacity(theme.foreground, opacity);
    let galley = ui.painter().layout(
        code.to_string(),
        FontId::monospace(theme.code_size * scale),
        color,
        max_width - padding * 2.0,
    );
    let bg_rect = egui::Rect::from_min_size(
        pos,
        egui::vec2(max_width, galley.rect.height() + padding * 2.0),
    );
    ui.painter().rect_filled(
        bg_rect,
        8.0 * scale,
        Theme::with_opacity(theme.code_background, opacity),
    );
    let height = bg_rect.height();
    ui.painter()
        .galley(pos + egui::vec2(padding, padding), galley, color);
    height
}

fn draw_quote(
    ui: &egui::Ui,
    text: &str,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let bar = 6.0 * scale;
    let gap = 24.0 * scale;
    let color = Theme::with_opacity(theme.foreground, opacity * 0.85);
    let mut job = egui::text::LayoutJob::simple(
        text.to_string(),
        FontId::proportional(theme.body_size * scale),
        color,
        max_width - bar - gap,
    );
    if let Some(section) = job.sections.first_mut() {
        section.format.italics = true;
    }
    let galley = ui.painter().layout_job(job);
    let height = galley.rect.height();
    ui.painter().rect_filled(
        egui::Rect::from_min_size(pos, egui::vec2(bar, height)),
        0.0,
        Theme::with_opacity(theme.accent, opacity),
    );
    ui.painter()
        .galley(pos + egui::vec2(bar + gap, 0.0), galley, color);
    height
}
