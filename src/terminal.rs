// SPDX-License-Identifier: GPL-3.0-only

//! Terminal scanner front end
//!
//! Renders the camera feed to the terminal using Unicode half-block
//! characters, with the scan line, toggle indicators and transient notices
//! drawn on top. Key presses are read on their own thread and posted to the
//! scanner as messages.

use crate::app::dispatcher::{DryRunOpener, NoticeBoard, NoticeLevel, SystemUrlOpener, UrlOpener};
use crate::app::frame_processor::QrDetector;
use crate::app::{Collaborators, Message, ScannerApp};
use crate::backends::camera::orchestrator::CaptureOrchestrator;
use crate::backends::camera::types::{CameraFacing, CameraFrame};
use crate::backends::camera::{FrameReceiver, FrameSender, get_backend};
use crate::backends::feedback::SystemFeedback;
use crate::config::Config;
use crate::constants::animation;
use crate::storage::RfdImagePicker;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Run the terminal scanner until the user quits
///
/// `config_path` is the file `config` came from; remembered toggles are
/// written back there.
pub fn run(config: Config, config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize GStreamer
    gstreamer::init()?;

    let runtime = tokio::runtime::Runtime::new()?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = runtime.block_on(run_app(&mut terminal, config, config_path));

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Config,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (sender, mut messages) = mpsc::unbounded_channel();
    // Keep only the newest frame; the pipeline drops when this is full
    let (frame_sender, mut frames): (FrameSender, FrameReceiver) = mpsc::channel(1);

    let notices = Arc::new(NoticeBoard::default());
    let opener: Arc<dyn UrlOpener> = if config.open_links {
        Arc::new(SystemUrlOpener)
    } else {
        Arc::new(DryRunOpener)
    };

    let collaborators = Collaborators {
        decoder: Arc::new(QrDetector::with_max_dimension(config.max_dimension)),
        opener,
        notifier: notices.clone(),
        feedback: Arc::new(SystemFeedback),
        picker: Some(Arc::new(RfdImagePicker::default())),
    };

    let orchestrator = CaptureOrchestrator::new(get_backend(), frame_sender)
        .with_pinned_devices(
            config.pinned_device(CameraFacing::Front).map(str::to_string),
            config.pinned_device(CameraFacing::Back).map(str::to_string),
        );

    let mut app =
        ScannerApp::new(config, collaborators, sender.clone()).with_config_path(config_path);
    app.attach_camera(orchestrator);
    app.start_camera();

    let input_sender = sender.clone();
    std::thread::spawn(move || input_loop(input_sender));

    let mut ticker = tokio::time::interval(animation::TICK_INTERVAL);

    while !app.should_quit() {
        let notice = notices.current();
        terminal.draw(|f| {
            let area = f.area();

            // Reserve the bottom two lines for notice and status
            let camera_area = Rect {
                height: area.height.saturating_sub(2),
                ..area
            };
            let notice_area = Rect {
                y: area.y + area.height.saturating_sub(2),
                height: area.height.min(1),
                ..area
            };
            let status_area = Rect {
                y: area.y + area.height.saturating_sub(1),
                height: area.height.min(1),
                ..area
            };

            f.render_widget(
                FrameWidget {
                    frame: app.preview().map(|frame| frame.as_ref()),
                    scan_line: app.is_scanning().then(|| app.animation().position()),
                },
                camera_area,
            );
            if let Some(notice) = &notice {
                let color = match notice.level {
                    NoticeLevel::Info => Color::Green,
                    NoticeLevel::Error => Color::Red,
                };
                f.render_widget(
                    StatusBar {
                        message: &notice.text,
                        fg: Color::Black,
                        bg: color,
                    },
                    notice_area,
                );
            }
            f.render_widget(
                StatusBar {
                    message: &build_status_message(&app),
                    fg: Color::White,
                    bg: Color::DarkGray,
                },
                status_area,
            );
        })?;

        tokio::select! {
            Some(message) = messages.recv() => app.update(message),
            Some(frame) = frames.recv() => app.update(Message::FrameCaptured(frame)),
            _ = ticker.tick() => app.update(Message::Tick),
        }
    }

    info!("Scanner closed");
    app.shutdown();
    Ok(())
}

/// Read key presses until the scanner goes away
fn input_loop(sender: mpsc::UnboundedSender<Message>) {
    while !sender.is_closed() {
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                debug!(error = %e, "Input polling failed");
                let _ = sender.send(Message::Quit);
                return;
            }
        }

        match event::read() {
            Ok(Event::Key(key)) => {
                if let Some(message) = key_to_message(key)
                    && sender.send(message).is_err()
                {
                    return;
                }
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "Failed to read input event"),
        }
    }
}

/// Key bindings
pub fn key_to_message(key: KeyEvent) -> Option<Message> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Message::Quit);
    }
    match key.code {
        KeyCode::Char('v') => Some(Message::ToggleVibration),
        KeyCode::Char('s') => Some(Message::ToggleSound),
        KeyCode::Char('c') => Some(Message::SwitchCamera),
        KeyCode::Char('g') => Some(Message::OpenGallery),
        KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
        _ => None,
    }
}

fn build_status_message(app: &ScannerApp) -> String {
    let prefs = app.preferences();
    let camera = app
        .current_device()
        .map(|device| device.name.as_str())
        .unwrap_or("no camera");
    format!(
        "'v' vibration: {} | 's' sound: {} | 'c' {} ({}) | 'g' gallery | 'q' quit",
        prefs.vibration_indicator().label(),
        prefs.sound_indicator().label(),
        app.facing().display_name(),
        camera,
    )
}

/// Widget that renders a camera frame using half-block characters
struct FrameWidget<'a> {
    frame: Option<&'a CameraFrame>,
    /// Scan line position in [0, 1] while scanning
    scan_line: Option<f32>,
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let Some(frame) = self.frame.filter(|frame| frame.is_complete()) else {
            // No frame yet - show placeholder
            let msg = "Waiting for camera...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            buf.set_string(x, y, msg, Style::default());
            return;
        };

        let (display_width, display_height) = fit_dimensions(frame, area);
        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        // Scale factors
        let x_scale = frame.width as f64 / display_width as f64;
        let y_scale = frame.height as f64 / (display_height * 2) as f64;

        let scan_row = self
            .scan_line
            .map(|pos| ((pos * (display_height * 2 - 1) as f32) as u16).min(display_height * 2 - 1));

        // Render using half-block characters
        // Each terminal cell represents 2 vertical pixels:
        // - Upper half (▀) colored with fg
        // - Lower half colored with bg
        for ty in 0..display_height {
            for tx in 0..display_width {
                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let mut top_color = sample_pixel(frame, src_x, src_y_top);
                let mut bottom_color = sample_pixel(frame, src_x, src_y_bottom);
                if scan_row == Some(ty * 2) {
                    top_color = SCAN_LINE_COLOR;
                } else if scan_row == Some(ty * 2 + 1) {
                    bottom_color = SCAN_LINE_COLOR;
                }

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(top_color);
                    cell.set_bg(bottom_color);
                }
            }
        }
    }
}

const SCAN_LINE_COLOR: Color = Color::Rgb(0, 230, 118);

/// Largest size (in cells) that keeps the frame's aspect ratio
fn fit_dimensions(frame: &CameraFrame, area: Rect) -> (u16, u16) {
    // Each terminal cell displays 2 vertical pixels using half-block characters
    let frame_aspect = frame.width as f64 / frame.height as f64;
    let term_width = area.width as f64;
    let term_height = (area.height * 2) as f64;

    if term_width / term_height > frame_aspect {
        // Terminal is wider - fit to height
        let h = term_height;
        let w = h * frame_aspect;
        ((w as u16).min(area.width), (h / 2.0) as u16)
    } else {
        // Terminal is taller - fit to width
        let w = term_width;
        let h = w / frame_aspect;
        (w as u16, ((h / 2.0) as u16).min(area.height))
    }
}

fn sample_pixel(frame: &CameraFrame, x: u32, y: u32) -> Color {
    let (r, g, b) = frame.rgb_at(x, y);
    Color::Rgb(r, g, b)
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
    fg: Color,
    bg: Color,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(self.bg);
            }
        }

        let text: String = self.message.chars().take(area.width as usize).collect();
        buf.set_string(area.x, area.y, text, Style::default().fg(self.fg).bg(self.bg));
    }
}
