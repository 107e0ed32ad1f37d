pub mod text;

use eframe::egui;

use crate::document::{ContainerKind, Document, HintRegion, Overlay, SlideContainer};
use crate::parser;
use crate::theme::Theme;

const HINTS: &str = "\u{2190} \u{2192} navigate \u{00b7} S notes \u{00b7} 1\u{2013}9, 0 jump \u{00b7} Home / End \u{00b7} Ctrl+L address";

/// Scale relative to a 1920x1080 reference canvas.
pub fn compute_scale(rect: egui::Rect) -> f32 {
    let ref_w = 1920.0;
    let ref_h = 1080.0;
    (rect.width() / ref_w).min(rect.height() / ref_h)
}

/// Paint the whole document: active containers, chrome, then the overlay.
pub fn render_document(
    ui: &mut egui::Ui,
    document: &Document,
    theme: &Theme,
    rect: egui::Rect,
) {
    let scale = compute_scale(rect);

    for (_, container) in document.active_containers() {
        render_container(ui, container, theme, rect, scale);
    }

    if let Some(progress) = &document.progress {
        draw_progress(ui, progress.fraction, theme, rect, scale);
    }
    if let Some(counter) = &document.counter {
        draw_counter(ui, &counter.text, theme, rect, scale);
    }
    if let Some(hints) = &document.hints {
        draw_hints(ui, hints, theme, rect, scale);
    }
    if let Some(overlay) = document.overlay.as_ref().filter(|o| o.visible) {
        draw_notes_overlay(ui, overlay, theme, rect, scale);
    }
}

fn render_container(
    ui: &egui::Ui,
    container: &SlideContainer,
    theme: &Theme,
    rect: egui::Rect,
    scale: f32,
) {
    let padding = 80.0 * scale;
    let content_rect = rect.shrink(padding);

    match container.kind {
        ContainerKind::Loading => {
            let color = Theme::with_opacity(theme.foreground, 0.6);
            let galley = ui.painter().layout_no_wrap(
                container.source.clone(),
                egui::FontId::proportional(theme.body_size * scale),
                color,
            );
            let pos = rect.center() - galley.rect.size() / 2.0;
            ui.painter().galley(pos, galley, color);
        }
        ContainerKind::Diagnostic => {
            // Centered vertically like a title slide
            let width = content_rect.width() * 0.8;
            let left = content_rect.center().x - width / 2.0;
            let top = content_rect.top() + content_rect.height() * 0.25;
            text::draw_blocks(
                ui,
                &container.blocks,
                theme,
                egui::pos2(left, top),
                width,
                1.0,
                scale,
            );
        }
        ContainerKind::Slide => {
            text::draw_blocks(
                ui,
                &container.blocks,
                theme,
                content_rect.left_top(),
                content_rect.width(),
                1.0,
                scale,
            );
        }
    }
}

fn draw_progress(ui: &egui::Ui, fraction: f32, theme: &Theme, rect: egui::Rect, scale: f32) {
    let height = 6.0 * scale;
    let track = egui::Rect::from_min_max(
        egui::pos2(rect.left(), rect.bottom() - height),
        rect.right_bottom(),
    );
    ui.painter()
        .rect_filled(track, 0.0, Theme::with_opacity(theme.chrome, 0.2));
    let mut fill = track;
    fill.set_width(track.width() * fraction.clamp(0.0, 1.0));
    ui.painter().rect_filled(fill, 0.0, theme.accent);
}

fn draw_counter(ui: &egui::Ui, text: &str, theme: &Theme, rect: egui::Rect, scale: f32) {
    let color = Theme::with_opacity(theme.chrome, 0.9);
    let galley = ui.painter().layout_no_wrap(
        text.to_string(),
        egui::FontId::proportional(18.0 * scale),
        color,
    );
    let pos = egui::pos2(
        rect.right() - galley.rect.width() - 24.0 * scale,
        rect.bottom() - galley.rect.height() - 20.0 * scale,
    );
    ui.painter().galley(pos, galley, color);
}

fn draw_hints(ui: &egui::Ui, hints: &HintRegion, theme: &Theme, rect: egui::Rect, scale: f32) {
    let color = Theme::with_opacity(theme.chrome, hints.opacity);
    let galley = ui.painter().layout_no_wrap(
        HINTS.to_string(),
        egui::FontId::proportional(16.0 * scale),
        color,
    );
    let pos = egui::pos2(
        rect.left() + 24.0 * scale,
        rect.bottom() - galley.rect.height() - 20.0 * scale,
    );
    ui.painter().galley(pos, galley, color);
}

fn draw_notes_overlay(
    ui: &mut egui::Ui,
    overlay: &Overlay,
    theme: &Theme,
    rect: egui::Rect,
    scale: f32,
) {
    let margin = 48.0 * scale;
    let padding = 32.0 * scale;
    let height = rect.height() * 0.4;

    let overlay_rect = egui::Rect::from_min_max(
        egui::pos2(rect.left() + margin, rect.bottom() - margin - height),
        egui::pos2(rect.right() - margin, rect.bottom() - margin),
    );
    ui.painter()
        .rect_filled(overlay_rect, 12.0 * scale, theme.overlay_background);

    let title_color = Theme::with_opacity(theme.heading_color, 0.9);
    let title_galley = ui.painter().layout_no_wrap(
        "Speaker Notes".to_string(),
        egui::FontId::proportional(20.0 * scale),
        title_color,
    );
    let title_pos = egui::pos2(overlay_rect.left() + padding, overlay_rect.top() + padding);
    ui.painter().galley(title_pos, title_galley, title_color);

    let hint_color = Theme::with_opacity(theme.chrome, 0.5);
    let hint_galley = ui.painter().layout_no_wrap(
        "S or Esc to close".to_string(),
        egui::FontId::proportional(14.0 * scale),
        hint_color,
    );
    let hint_pos = egui::pos2(
        overlay_rect.right() - padding - hint_galley.rect.width(),
        overlay_rect.top() + padding + 3.0 * scale,
    );
    ui.painter().galley(hint_pos, hint_galley, hint_color);

    // Notes use a smaller type scale than slides
    let notes_theme = Theme {
        h1_size: 30.0,
        h2_size: 26.0,
        h3_size: 22.0,
        body_size: 20.0,
        code_size: 16.0,
        ..theme.clone()
    };
    let clip = overlay_rect.shrink(padding);
    let child = ui.new_child(
        egui::UiBuilder::new()
            .max_rect(clip)
            .id_salt("speaker_notes"),
    );
    let blocks = parser::parse_blocks(&overlay.content);
    text::draw_blocks(
        &child,
        &blocks,
        &notes_theme,
        egui::pos2(clip.left(), clip.top() + 40.0 * scale),
        clip.width(),
        1.0,
        scale.max(0.5),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chrome;

    fn paint(document: &Document) -> usize {
        let theme = Theme::dark();
        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let rect = ui.max_rect();
                render_document(ui, document, &theme, rect);
            });
        });
        output.shapes.len()
    }

    fn presented(overlay_visible: bool) -> Document {
        let mut document =
            Document::from_markdown("# One\n\n- point\n\n---\n\n# Two", Chrome::default());
        document.set_active(0, true);
        if let Some(progress) = document.progress.as_mut() {
            progress.fraction = 0.5;
        }
        if let Some(counter) = document.counter.as_mut() {
            counter.text = "1 / 2".to_string();
        }
        if let Some(hints) = document.hints.as_mut() {
            hints.opacity = 0.3;
        }
        document.overlay = Some(Overlay {
            visible: overlay_visible,
            content: "# Opening\n\nWelcome everyone.".to_string(),
        });
        document
    }

    #[test]
    fn test_compute_scale_uses_smaller_axis() {
        let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(960.0, 1080.0));
        assert_eq!(compute_scale(rect), 0.5);
    }

    #[test]
    fn test_render_document_with_notes_overlay() {
        let hidden = paint(&presented(false));
        let shown = paint(&presented(true));
        assert!(hidden > 0);
        assert!(shown > hidden);
    }

    #[test]
    fn test_render_loading_and_diagnostic() {
        assert!(paint(&Document::loading(Chrome::default())) > 0);

        let mut document = Document::loading(Chrome {
            progress: false,
            counter: false,
            hints: false,
        });
        document.inject_diagnostic("failed to load slides/00.md");
        assert!(paint(&document) > 0);
    }
}
