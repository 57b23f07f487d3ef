//! Integration tests for the page load sequence
//!
//! These tests drive the public API the way the controller does at load:
//! config, default section, initial theme, charts, then a theme switch.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use dashboard_ui::charts::{ChartBackend, ChartConfig, ChartRenderer, CssVariables, StyleEdit};
use dashboard_ui::config::SearchMode;
use dashboard_ui::dispatch::{DispatchTable, Role};
use dashboard_ui::models::colors::grid_color;
use dashboard_ui::router::{Router, SectionHost};
use dashboard_ui::theme::{NoObserver, ThemeManager, ThemeStore, ThemeSurface};
use dashboard_ui::{DashboardConfig, DashboardError, Result, SectionId, Theme};

#[derive(Clone, Default)]
struct Storage(Rc<RefCell<Option<String>>>);

impl ThemeStore for Storage {
    fn load(&self) -> Option<String> {
        self.0.borrow().clone()
    }

    fn save(&self, theme: Theme) -> Result<()> {
        *self.0.borrow_mut() = Some(theme.as_str().to_string());
        Ok(())
    }
}

struct DarkSystem;

impl ThemeSurface for DarkSystem {
    fn prefers_dark(&self) -> Option<bool> {
        Some(true)
    }

    fn set_document_theme(&self, _theme: Theme) -> Result<()> {
        Ok(())
    }

    fn set_toggle_checked(&self, _checked: bool) {}
}

#[derive(Default)]
struct Page {
    active: RefCell<HashSet<String>>,
}

impl SectionHost for Page {
    fn section_ids(&self) -> Vec<SectionId> {
        vec![SectionId::new("home-content"), SectionId::new("user-central-content")]
    }

    fn link_targets(&self) -> Vec<Option<SectionId>> {
        Vec::new()
    }

    fn set_section_active(&self, id: &SectionId, active: bool) {
        if active {
            self.active.borrow_mut().insert(id.as_str().to_string());
        } else {
            self.active.borrow_mut().remove(id.as_str());
        }
    }

    fn set_link_active(&self, _id: &SectionId, _active: bool) {}

    fn clear_untargeted_links(&self) {}
}

/// Every canvas carries the same three-day series
#[derive(Default)]
struct Canvases {
    configs: RefCell<Vec<ChartConfig>>,
    patches: RefCell<Vec<Vec<StyleEdit>>>,
}

impl ChartBackend for Canvases {
    type Handle = usize;

    fn is_available(&self) -> bool {
        true
    }

    fn read_data(&self, _canvas_id: &str) -> Result<(Option<String>, Option<String>)> {
        Ok((
            Some(r#"["Mon","Tue","Wed"]"#.to_string()),
            Some("[4,7,1]".to_string()),
        ))
    }

    fn create(&self, _canvas_id: &str, config: &ChartConfig) -> Result<usize> {
        self.configs.borrow_mut().push(config.clone());
        Ok(self.configs.borrow().len())
    }

    fn restyle(&self, _handle: &usize, patch: &[StyleEdit]) -> Result<()> {
        self.patches.borrow_mut().push(patch.to_vec());
        Ok(())
    }

    fn destroy(&self, _handle: usize) {}
}

struct Unstyled;

impl CssVariables for Unstyled {
    fn variable(&self, _name: &str) -> Option<String> {
        None
    }
}

#[test]
fn test_fresh_visit_on_dark_system_loads_dark_dashboard() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = DashboardConfig::from_json("{}")?;

    let router = Router::new(Page::default());
    router.activate(&SectionId::new(config.default_section.as_str()));
    assert_eq!(router.active(), Some(SectionId::new("home-content")));

    let storage = Storage::default();
    let theme = ThemeManager::new(storage.clone(), DarkSystem);
    let initial = theme.init(&mut NoObserver);
    assert_eq!(initial, Theme::Dark);
    assert_eq!(storage.load().as_deref(), Some("dark"));

    let mut charts = ChartRenderer::new(Canvases::default(), Unstyled);
    assert_eq!(charts.build_all(&config.charts, initial), 2);

    let trend = serde_json::to_value(&charts.backend().configs.borrow()[0])?;
    assert_eq!(trend["options"]["scales"]["x"]["grid"]["color"], grid_color(Theme::Dark));

    theme.toggle_from_control(false, &mut charts);
    assert_eq!(theme.current(), Theme::Light);
    assert_eq!(charts.backend().patches.borrow().len(), 2);
    assert!(
        charts.backend().patches.borrow()[0]
            .iter()
            .any(|edit| edit.value == grid_color(Theme::Light))
    );
    Ok(())
}

#[test]
fn test_remote_config_enables_pagination_dispatch() -> Result<()> {
    let config = DashboardConfig::from_json(
        r#"{"search": {"mode": "remote", "url": "/dashboard/users/", "debounce_ms": 250}}"#,
    )?;
    assert_eq!(config.search.effective_mode(), SearchMode::Remote);

    let table = DispatchTable::standard(&config)?;
    assert!(table.bindings().iter().any(|b| b.role == Role::PaginationLink));
    Ok(())
}

#[test]
fn test_bad_config_is_reported() {
    let result = DashboardConfig::from_json(r#"{"default_section": ""}"#);
    assert!(matches!(result, Err(DashboardError::InvalidConfig(_))));
}
