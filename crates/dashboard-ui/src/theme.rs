//! Light/dark theme persistence and application
//!
//! At load the stored theme wins; without one the platform's color-scheme
//! preference decides, and light is the default when neither is known.
//! Applying a theme updates the document attribute, the toggle control,
//! storage and every registered observer in one call.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement, Storage, Window};

use crate::error::{DashboardError, Result};
use crate::models::Theme;

/// Local storage key
pub const STORAGE_KEY: &str = "theme";
/// Attribute set on the document element
pub const THEME_ATTRIBUTE: &str = "data-theme";
/// Checkbox that switches the theme
pub const TOGGLE_ID: &str = "theme-toggle";

const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

/// Persisted theme choice
pub trait ThemeStore {
    fn load(&self) -> Option<String>;

    /// # Errors
    ///
    /// Returns `Storage` if the value cannot be written.
    fn save(&self, theme: Theme) -> Result<()>;
}

/// Where the theme becomes visible
pub trait ThemeSurface {
    /// `None` when the platform preference cannot be detected
    fn prefers_dark(&self) -> Option<bool>;

    /// # Errors
    ///
    /// Returns an error if the attribute cannot be set.
    fn set_document_theme(&self, theme: Theme) -> Result<()>;

    fn set_toggle_checked(&self, checked: bool);
}

/// Anything that must follow theme changes, such as live charts
pub trait ThemeObserver {
    fn theme_changed(&mut self, theme: Theme);
}

/// Observer for callers with nothing to notify
pub struct NoObserver;

impl ThemeObserver for NoObserver {
    fn theme_changed(&mut self, _theme: Theme) {}
}

/// Pick the theme to show at load
///
/// An unparseable stored value counts as absent.
#[must_use]
pub fn resolve_initial_theme(stored: Option<&str>, prefers_dark: Option<bool>) -> Theme {
    stored
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| Theme::from_checked(prefers_dark.unwrap_or(false)))
}

pub struct ThemeManager<S, D> {
    store: S,
    surface: D,
    current: RwSignal<Theme>,
}

impl<S: ThemeStore, D: ThemeSurface> ThemeManager<S, D> {
    pub fn new(store: S, surface: D) -> Self {
        Self {
            store,
            surface,
            current: RwSignal::new(Theme::default()),
        }
    }

    /// Theme to show at load
    #[must_use]
    pub fn initial_theme(&self) -> Theme {
        resolve_initial_theme(self.store.load().as_deref(), self.surface.prefers_dark())
    }

    /// Resolve and apply the initial theme
    pub fn init(&self, observer: &mut dyn ThemeObserver) -> Theme {
        let theme = self.initial_theme();
        log::info!("initial theme: {theme}");
        self.apply(theme, observer);
        theme
    }

    /// Make `theme` current everywhere
    ///
    /// A failed storage write is logged; the visual switch still happens.
    pub fn apply(&self, theme: Theme, observer: &mut dyn ThemeObserver) {
        if let Err(err) = self.surface.set_document_theme(theme) {
            log::error!("could not set document theme: {err}");
        }
        self.surface.set_toggle_checked(theme.is_dark());
        if let Err(err) = self.store.save(theme) {
            log::warn!("theme not persisted: {err}");
        }
        self.current.set(theme);
        observer.theme_changed(theme);
    }

    /// Handle a change of the toggle control
    pub fn toggle_from_control(&self, checked: bool, observer: &mut dyn ThemeObserver) -> Theme {
        let theme = Theme::from_checked(checked);
        self.apply(theme, observer);
        theme
    }

    #[must_use]
    pub fn current(&self) -> Theme {
        self.current.get_untracked()
    }
}

/// `window.localStorage`
pub struct LocalThemeStore {
    storage: Option<Storage>,
}

impl LocalThemeStore {
    /// Storage may be unavailable (privacy mode); loads then return `None`
    #[must_use]
    pub fn new(window: &Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }
}

impl ThemeStore for LocalThemeStore {
    fn load(&self) -> Option<String> {
        self.storage.as_ref()?.get_item(STORAGE_KEY).ok().flatten()
    }

    fn save(&self, theme: Theme) -> Result<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| DashboardError::Storage("localStorage unavailable".to_string()))?;
        storage
            .set_item(STORAGE_KEY, theme.as_str())
            .map_err(|e| DashboardError::Storage(format!("{e:?}")))
    }
}

/// Document attribute, toggle checkbox and media query
pub struct DocumentThemeSurface {
    window: Window,
    document: Document,
    toggle: Option<HtmlInputElement>,
}

impl DocumentThemeSurface {
    /// # Errors
    ///
    /// Returns `ElementNotFound` if the window has no document.
    pub fn new(window: Window) -> Result<Self> {
        let document = window
            .document()
            .ok_or_else(|| DashboardError::ElementNotFound("document".to_string()))?;
        let toggle = document
            .get_element_by_id(TOGGLE_ID)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        if toggle.is_none() {
            log::debug!("#{TOGGLE_ID} not found, theme toggle disabled");
        }
        Ok(Self {
            window,
            document,
            toggle,
        })
    }
}

impl ThemeSurface for DocumentThemeSurface {
    fn prefers_dark(&self) -> Option<bool> {
        self.window
            .match_media(DARK_SCHEME_QUERY)
            .ok()
            .flatten()
            .map(|mql| mql.matches())
    }

    fn set_document_theme(&self, theme: Theme) -> Result<()> {
        let root = self
            .document
            .document_element()
            .ok_or_else(|| DashboardError::ElementNotFound("document element".to_string()))?;
        root.set_attribute(THEME_ATTRIBUTE, theme.as_str())
            .map_err(|e| DashboardError::js(THEME_ATTRIBUTE, &e))
    }

    fn set_toggle_checked(&self, checked: bool) {
        if let Some(toggle) = &self.toggle {
            toggle.set_checked(checked);
        }
    }
}
