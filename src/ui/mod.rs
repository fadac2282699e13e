//! Visual surface interfaces consumed by the interaction core
//!
//! The real windowing/rendering surface is an external collaborator; the
//! core only sees the narrow traits below. `console` provides headless
//! stand-ins so the binary runs without a display.

pub mod console;
pub mod feedback;
pub mod theme;

pub use console::{ConsoleClipRegion, ConsoleSurface, spawn_input_reader};
pub use feedback::{ClipPlayer, Frame, spawn_overlay_loop};
pub use theme::{ColorRole, Styleable, Theme, ThemeManager, ThemeName};

/// Events from the hosting surface's controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// The "Ask" control was pressed
    AskPressed,
    /// The theme-toggle control was pressed
    ToggleTheme,
    /// The hosting surface is shutting down
    Quit,
}

/// The status text region and session-exit signal of the hosting window
pub trait StatusSurface: Send + Sync {
    /// Replace the status text
    fn set_status(&self, text: &str);

    /// Ask the hosting surface to terminate the session
    fn request_close(&self);
}

/// A region that can present clip frames
pub trait FrameSurface: Send + Sync {
    /// Present one frame; the surface owns decoding and scaling
    fn present_frame(&self, frame: &Frame);
}
