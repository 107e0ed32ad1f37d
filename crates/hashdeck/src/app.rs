use eframe::egui;
use std::time::Instant;

use crate::address::Address;
use crate::config::Config;
use crate::deck::{Deck, DeckLink, DeckSource};
use crate::document::Document;
use crate::input::Key;
use crate::loader::ReadySignal;
use crate::navigator::{Event, Handled, Navigator};
use crate::render;
use crate::theme::Theme;

/// The eframe shell: translates egui input into navigator events and
/// paints the navigator's document every frame.
struct ViewerApp {
    navigator: Navigator,
    ready: Option<ReadySignal>,
    theme: Theme,
    title: String,
    shown_href: String,
    /// Text of the address field while it is open.
    address_input: Option<String>,
    focus_address: bool,
}

impl ViewerApp {
    fn new(navigator: Navigator, ready: Option<ReadySignal>, theme: Theme, title: String) -> Self {
        Self {
            navigator,
            ready,
            theme,
            title,
            shown_href: String::new(),
            address_input: None,
            focus_address: false,
        }
    }

    /// Run both initialization triggers. Statically present content also
    /// gets a ready signal, which the navigator ignores when the presence
    /// check already initialized it.
    fn start(&mut self) {
        let now = Instant::now();
        self.navigator.startup(now);
        if self.ready.is_none() {
            self.navigator.handle(Event::ContentReady { at: now });
        }
    }

    fn poll_content(&mut self) {
        let Some(signal) = self.ready.as_mut() else {
            return;
        };
        if let Some(outcome) = signal.try_take() {
            tracing::debug!(loaded = outcome.is_loaded(), "content source finished");
            outcome.inject_into(self.navigator.document_mut());
            self.ready = None;
            self.navigator.handle(Event::ContentReady { at: Instant::now() });
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context, viewport_cmds: &mut Vec<egui::ViewportCommand>) {
        let events = ctx.input(|i| i.events.clone());
        for event in events {
            match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => self.on_key(ctx, key, modifiers, viewport_cmds),
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    let event = if pressed {
                        Event::PointerDown { x: pos.x }
                    } else {
                        Event::PointerUp { x: pos.x }
                    };
                    self.navigator.handle(event);
                }
                egui::Event::PointerGone => {
                    self.navigator.handle(Event::PointerCancel);
                }
                _ => {}
            }
        }
    }

    fn on_key(
        &mut self,
        ctx: &egui::Context,
        key: egui::Key,
        modifiers: egui::Modifiers,
        viewport_cmds: &mut Vec<egui::ViewportCommand>,
    ) {
        // Shell shortcuts first
        if modifiers.command && key == egui::Key::L {
            self.address_input = Some(self.navigator.address().href());
            self.focus_address = true;
            return;
        }
        if modifiers.alt {
            let moved = match key {
                egui::Key::ArrowLeft => self.navigator.address_mut().back(),
                egui::Key::ArrowRight => self.navigator.address_mut().forward(),
                _ => false,
            };
            if moved {
                self.navigator.sync_address();
                ctx.input_mut(|i| i.consume_key(modifiers, key));
            }
            return;
        }
        if modifiers.command {
            return;
        }
        match key {
            egui::Key::Q => {
                self.navigator.teardown();
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }
            egui::Key::F => {
                let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(!fullscreen));
                return;
            }
            _ => {}
        }

        let Some(mapped) = map_key(key, modifiers) else {
            return;
        };
        if self.navigator.handle(Event::Key(mapped)) == Handled::Consumed {
            ctx.input_mut(|i| i.consume_key(modifiers, key));
        }
    }

    fn draw_address_bar(&mut self, ctx: &egui::Context) {
        let Some(input) = self.address_input.as_mut() else {
            return;
        };

        let mut submitted = None;
        let mut close = false;
        egui::TopBottomPanel::top("address_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Address");
                let response = ui.add(
                    egui::TextEdit::singleline(input)
                        .desired_width(f32::INFINITY)
                        .font(egui::TextStyle::Monospace),
                );
                if self.focus_address {
                    response.request_focus();
                    self.focus_address = false;
                }
                if response.lost_focus() {
                    if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submitted = Some(input.clone());
                    }
                    close = true;
                }
            });
        });

        if let Some(text) = submitted {
            tracing::debug!(address = %text, "address submitted");
            self.navigator.address_mut().navigate_to_input(&text);
            self.navigator.sync_address();
        }
        if close {
            self.address_input = None;
        }
    }

    fn sync_title(&mut self, viewport_cmds: &mut Vec<egui::ViewportCommand>) {
        let href = self.navigator.address().href();
        if href != self.shown_href {
            viewport_cmds.push(egui::ViewportCommand::Title(format!(
                "{} \u{2014} {href}",
                self.title
            )));
            self.shown_href = href;
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_content();

        // Collect viewport commands to send after input handling
        // (sending inside ctx.input() causes RwLock deadlock)
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();

        if self.address_input.is_none() {
            self.handle_input(ctx, &mut viewport_cmds);
        }
        self.draw_address_bar(ctx);

        if ctx.input(|i| i.viewport().close_requested()) {
            self.navigator.teardown();
        }

        let now = Instant::now();
        self.navigator.sync_address();
        self.navigator.handle(Event::Tick(now));
        if let Some(deadline) = self.navigator.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }

        self.sync_title(&mut viewport_cmds);
        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                render::render_document(ui, self.navigator.document(), &self.theme, rect);
            });
    }
}

fn map_key(key: egui::Key, modifiers: egui::Modifiers) -> Option<Key> {
    let mapped = match key {
        egui::Key::ArrowLeft => Key::ArrowLeft,
        egui::Key::ArrowRight => Key::ArrowRight,
        egui::Key::ArrowUp => Key::ArrowUp,
        egui::Key::ArrowDown => Key::ArrowDown,
        egui::Key::PageUp => Key::PageUp,
        egui::Key::PageDown => Key::PageDown,
        egui::Key::Space => Key::Space,
        egui::Key::Home => Key::Home,
        egui::Key::End => Key::End,
        egui::Key::Escape => Key::Escape,
        egui::Key::S => Key::Char(if modifiers.shift { 'S' } else { 's' }),
        egui::Key::Num0 => Key::Digit(0),
        egui::Key::Num1 => Key::Digit(1),
        egui::Key::Num2 => Key::Digit(2),
        egui::Key::Num3 => Key::Digit(3),
        egui::Key::Num4 => Key::Digit(4),
        egui::Key::Num5 => Key::Digit(5),
        egui::Key::Num6 => Key::Digit(6),
        egui::Key::Num7 => Key::Digit(7),
        egui::Key::Num8 => Key::Digit(8),
        egui::Key::Num9 => Key::Digit(9),
        _ => return None,
    };
    Some(mapped)
}

/// Resolve the theme: CLI flag, then deck, then user config, then light.
fn resolve_theme(cli: Option<&str>, deck: &Deck, config: &Config) -> Theme {
    let name = cli
        .or_else(|| deck.theme())
        .or_else(|| config.theme())
        .unwrap_or("light");
    Theme::from_name(name)
}

pub fn run(link: DeckLink, windowed: bool, theme: Option<String>) -> anyhow::Result<()> {
    let deck = Deck::load(&link.path)?;
    let config = Config::load_or_default();
    let theme = resolve_theme(theme.as_deref(), &deck, &config);
    let windowed = windowed || config.windowed();

    let (document, source) = match &deck.source {
        DeckSource::Markdown(content) => {
            let document = Document::from_markdown(content, deck.chrome());
            if document.slide_indices().is_empty() {
                anyhow::bail!("No slides found in {}", link.path.display());
            }
            (document, None)
        }
        DeckSource::Manifest(_) => {
            let source = deck
                .content_source()
                .map(|s| s.with_timeout(config.loader_timeout()));
            (Document::loading(deck.chrome()), source)
        }
    };

    let address = Address::new(deck.display_name(), link.fragment.clone());
    let navigator = Navigator::new(document, address, deck.notes())
        .with_expected_slides(deck.expected_slides());

    let title = deck
        .title()
        .map(str::to_string)
        .unwrap_or_else(|| format!("hashdeck \u{2014} {}", deck.display_name()));
    tracing::info!(deck = %link.path.display(), fragment = ?link.fragment, "opening deck");

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title.clone(),
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let ready = source.map(|s| s.spawn(move || ctx.request_repaint()));
            let mut app = ViewerApp::new(navigator, ready, theme, title);
            app.start();
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
