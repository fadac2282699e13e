//! Theme palettes and application
//!
//! Exactly one theme is active at a time. Surfaces register with the
//! `ThemeManager` (weakly, so lazily-created or dropped surfaces are
//! tolerated) and are restyled together on every toggle.

use std::sync::{Arc, Weak};

use serde::Deserialize;

/// Named palette variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
}

impl ThemeName {
    /// The other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Semantic color roles a surface may ask a theme for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRole {
    /// Window background
    WindowBackground,
    /// Content panel background
    PanelBackground,
    /// Status and label text
    Text,
    /// Button fill
    Button,
    /// Button fill while pressed or hovered
    ButtonPressed,
    /// Button label text
    ButtonText,
    /// Clip region background
    ClipBackground,
}

/// An immutable named palette
#[derive(Debug, PartialEq, Eq)]
pub struct Theme {
    pub name: ThemeName,
    window_bg: &'static str,
    panel_bg: &'static str,
    text: &'static str,
    button: &'static str,
    button_pressed: &'static str,
    button_text: &'static str,
    clip_bg: &'static str,
}

/// Light palette
pub const LIGHT: Theme = Theme {
    name: ThemeName::Light,
    window_bg: "#ececec",
    panel_bg: "#ffffff",
    text: "#333333",
    button: "#4CAF50",
    button_pressed: "#45a049",
    button_text: "#ffffff",
    clip_bg: "#ffffff",
};

/// Dark palette
pub const DARK: Theme = Theme {
    name: ThemeName::Dark,
    window_bg: "#212121",
    panel_bg: "#303030",
    text: "#E0E0E0",
    button: "#66BB6A",
    button_pressed: "#81C784",
    button_text: "#ffffff",
    clip_bg: "#303030",
};

impl Theme {
    /// The palette for a theme name
    #[must_use]
    pub const fn named(name: ThemeName) -> &'static Self {
        match name {
            ThemeName::Light => &LIGHT,
            ThemeName::Dark => &DARK,
        }
    }

    /// The color for a semantic role
    #[must_use]
    pub const fn color(&self, role: ColorRole) -> &'static str {
        match role {
            ColorRole::WindowBackground => self.window_bg,
            ColorRole::PanelBackground => self.panel_bg,
            ColorRole::Text => self.text,
            ColorRole::Button => self.button,
            ColorRole::ButtonPressed => self.button_pressed,
            ColorRole::ButtonText => self.button_text,
            ColorRole::ClipBackground => self.clip_bg,
        }
    }
}

/// A visual surface that can be restyled when the active theme changes
pub trait Styleable: Send + Sync {
    /// Take on the given theme's colors
    fn restyle(&self, theme: &Theme);
}

/// Owns the active theme and every surface it applies to
pub struct ThemeManager {
    active: ThemeName,
    surfaces: Vec<Weak<dyn Styleable>>,
}

impl ThemeManager {
    /// Create a manager with the given initial theme
    #[must_use]
    pub const fn new(initial: ThemeName) -> Self {
        Self {
            active: initial,
            surfaces: Vec::new(),
        }
    }

    /// The active theme name
    #[must_use]
    pub const fn active(&self) -> ThemeName {
        self.active
    }

    /// The active palette
    #[must_use]
    pub const fn theme(&self) -> &'static Theme {
        Theme::named(self.active)
    }

    /// Register a surface and style it immediately
    ///
    /// Registration is weak: a surface that is later dropped is skipped and
    /// eventually pruned, never an error.
    pub fn register<S: Styleable + 'static>(&mut self, surface: &Arc<S>) {
        surface.restyle(self.theme());
        let concrete: Arc<S> = Arc::clone(surface);
        let dyn_surface: Arc<dyn Styleable> = concrete;
        self.surfaces.push(Arc::downgrade(&dyn_surface));
    }

    /// Flip between light and dark and restyle everything
    pub fn toggle(&mut self) {
        self.active = self.active.toggled();
        tracing::info!(theme = ?self.active, "theme toggled");
        self.apply_to_all();
    }

    /// Restyle every registered surface with the active theme
    ///
    /// Idempotent, and safe to call at any point in the interaction
    /// lifecycle. Dropped surfaces are pruned.
    pub fn apply_to_all(&mut self) {
        let theme = Theme::named(self.active);
        self.surfaces.retain(|weak| match weak.upgrade() {
            Some(surface) => {
                surface.restyle(theme);
                true
            }
            None => false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingSurface {
        applied: Mutex<Vec<ThemeName>>,
    }

    impl RecordingSurface {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                applied: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> Option<ThemeName> {
            self.applied.lock().unwrap().last().copied()
        }
    }

    impl Styleable for RecordingSurface {
        fn restyle(&self, theme: &Theme) {
            self.applied.lock().unwrap().push(theme.name);
        }
    }

    #[test]
    fn test_toggle_is_involution() {
        let mut manager = ThemeManager::new(ThemeName::Light);

        manager.toggle();
        assert_eq!(manager.active(), ThemeName::Dark);

        manager.toggle();
        assert_eq!(manager.active(), ThemeName::Light);
    }

    #[test]
    fn test_apply_to_all_is_idempotent() {
        let mut manager = ThemeManager::new(ThemeName::Dark);
        let surface = RecordingSurface::new();
        manager.register(&surface);

        manager.apply_to_all();
        manager.apply_to_all();

        // Same colors every time: no visible change from repeated application
        let applied = surface.applied.lock().unwrap();
        assert!(applied.iter().all(|&name| name == ThemeName::Dark));
    }

    #[test]
    fn test_toggle_restyles_all_registered_surfaces() {
        let mut manager = ThemeManager::new(ThemeName::Light);
        let a = RecordingSurface::new();
        let b = RecordingSurface::new();
        manager.register(&a);
        manager.register(&b);

        manager.toggle();

        assert_eq!(a.last(), Some(ThemeName::Dark));
        assert_eq!(b.last(), Some(ThemeName::Dark));
    }

    #[test]
    fn test_dropped_surface_is_skipped() {
        let mut manager = ThemeManager::new(ThemeName::Light);
        let kept = RecordingSurface::new();
        manager.register(&kept);

        {
            let dropped = RecordingSurface::new();
            manager.register(&dropped);
        }

        manager.toggle();
        assert_eq!(kept.last(), Some(ThemeName::Dark));
    }

    #[test]
    fn test_late_registration_gets_current_theme() {
        let mut manager = ThemeManager::new(ThemeName::Light);
        manager.toggle();

        // Created lazily after toggling, like the overlay after the greeting
        let overlay = RecordingSurface::new();
        manager.register(&overlay);

        assert_eq!(overlay.last(), Some(ThemeName::Dark));
    }

    #[test]
    fn test_palette_roles() {
        assert_eq!(LIGHT.color(ColorRole::WindowBackground), "#ececec");
        assert_eq!(DARK.color(ColorRole::Text), "#E0E0E0");
        assert_ne!(
            LIGHT.color(ColorRole::Button),
            LIGHT.color(ColorRole::ButtonPressed)
        );
    }
}
