//! Console stand-ins for the kiosk window
//!
//! The real rendering surface is an external collaborator; these shims make
//! the binary runnable headless. Status lines go to stdout, presented frames
//! are counted, and the applied palette is tracked for diagnostics.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc::UnboundedSender;

use crate::ui::feedback::Frame;
use crate::ui::theme::{ColorRole, Styleable, Theme, ThemeName};
use crate::ui::{FrameSurface, StatusSurface, UiEvent};

/// Console stand-in for the window's status region
pub struct ConsoleSurface {
    events: UnboundedSender<UiEvent>,
    theme: Mutex<ThemeName>,
}

impl ConsoleSurface {
    /// Create a surface that signals session exit over the given channel
    #[must_use]
    pub fn new(events: UnboundedSender<UiEvent>) -> Self {
        Self {
            events,
            theme: Mutex::new(ThemeName::Light),
        }
    }

    /// The last applied theme
    #[must_use]
    pub fn theme(&self) -> ThemeName {
        self.theme.lock().map(|t| *t).unwrap_or_default()
    }
}

impl StatusSurface for ConsoleSurface {
    fn set_status(&self, text: &str) {
        println!("» {text}");
    }

    fn request_close(&self) {
        let _ = self.events.send(UiEvent::Quit);
    }
}

impl Styleable for ConsoleSurface {
    fn restyle(&self, theme: &Theme) {
        if let Ok(mut current) = self.theme.lock() {
            *current = theme.name;
        }
        tracing::debug!(
            theme = ?theme.name,
            text = theme.color(ColorRole::Text),
            panel = theme.color(ColorRole::PanelBackground),
            "status panel restyled"
        );
    }
}

/// Console stand-in for a frame region (answer clip or greeting overlay)
pub struct ConsoleClipRegion {
    name: &'static str,
    presented: AtomicUsize,
}

impl ConsoleClipRegion {
    /// Create a named region
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            presented: AtomicUsize::new(0),
        }
    }

    /// How many frames have been presented
    #[must_use]
    pub fn frames_presented(&self) -> usize {
        self.presented.load(Ordering::Relaxed)
    }
}

impl FrameSurface for ConsoleClipRegion {
    fn present_frame(&self, frame: &Frame) {
        self.presented.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(
            region = self.name,
            frame = frame.index,
            bytes = frame.data.len(),
            "frame presented"
        );
    }
}

impl Styleable for ConsoleClipRegion {
    fn restyle(&self, theme: &Theme) {
        tracing::debug!(
            region = self.name,
            theme = ?theme.name,
            background = theme.color(ColorRole::ClipBackground),
            "clip region restyled"
        );
    }
}

/// Read trigger lines from stdin
///
/// Enter or "a" presses Ask, "t" toggles the theme, "q" quits. EOF quits.
pub fn spawn_input_reader(events: UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();

        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) => {
                    let _ = events.send(UiEvent::Quit);
                    break;
                }
                Ok(_) => {
                    let event = match line.trim() {
                        "" | "a" | "ask" => UiEvent::AskPressed,
                        "t" | "theme" => UiEvent::ToggleTheme,
                        "q" | "quit" => UiEvent::Quit,
                        other => {
                            println!(
                                "unrecognized input {other:?} — Enter asks, 't' toggles theme, 'q' quits"
                            );
                            continue;
                        }
                    };
                    if events.send(event).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "stdin read failed");
                    let _ = events.send(UiEvent::Quit);
                    break;
                }
            }
        }
    })
}
