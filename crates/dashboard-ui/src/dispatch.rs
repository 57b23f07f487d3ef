//! Typed event dispatch
//!
//! The controller listens once per event kind on the document and resolves
//! each event to the [`Role`] of the element it hit. Bindings are checked when
//! the table is built, so a broken selector list fails at setup instead of
//! silently never matching.

use std::collections::HashSet;

use crate::config::{DashboardConfig, SearchMode};
use crate::error::{DashboardError, Result};
use crate::router::selectors;

/// What an interactive element does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    SidebarToggle,
    SupportButton,
    ThemeToggle,
    NavLink,
    QuickLink,
    CelebrateButton,
    SearchInput,
    StatusToggle,
    PaginationLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    Input,
}

impl EventKind {
    /// DOM event name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Change => "change",
            Self::Input => "input",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub role: Role,
    pub event: EventKind,
    pub selector: String,
}

impl Binding {
    pub fn new(role: Role, event: EventKind, selector: impl Into<String>) -> Self {
        Self {
            role,
            event,
            selector: selector.into(),
        }
    }
}

pub const CELEBRATE_BUTTON: &str = "#celebrate-btn";
pub const STATUS_TOGGLE: &str = ".btn-toggle-status";
pub const PAGINATION_LINKS: &str = ".pagination a";

/// Validated (role, event) → selector bindings, in match priority order
#[derive(Debug, Clone)]
pub struct DispatchTable {
    bindings: Vec<Binding>,
}

impl DispatchTable {
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an empty selector or a (role, event) pair
    /// bound twice.
    pub fn new(bindings: Vec<Binding>) -> Result<Self> {
        let mut seen = HashSet::new();
        for binding in &bindings {
            if binding.selector.trim().is_empty() {
                return Err(DashboardError::InvalidConfig(format!(
                    "empty selector for {:?} on {}",
                    binding.role,
                    binding.event.as_str()
                )));
            }
            if !seen.insert((binding.role, binding.event)) {
                return Err(DashboardError::InvalidConfig(format!(
                    "{:?} is bound to {} twice",
                    binding.role,
                    binding.event.as_str()
                )));
            }
        }
        Ok(Self { bindings })
    }

    /// Bindings for the dashboard markup
    ///
    /// Pagination links are only intercepted in remote search mode.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configured ids produce an invalid table.
    pub fn standard(config: &DashboardConfig) -> Result<Self> {
        let search = &config.search;
        let mut bindings = vec![
            Binding::new(Role::SidebarToggle, EventKind::Click, selectors::SIDEBAR_TOGGLE),
            Binding::new(Role::SupportButton, EventKind::Click, selectors::SUPPORT_BUTTON),
            Binding::new(Role::ThemeToggle, EventKind::Change, format!("#{}", crate::theme::TOGGLE_ID)),
            Binding::new(Role::NavLink, EventKind::Click, selectors::SIDEBAR_LINKS),
            Binding::new(Role::QuickLink, EventKind::Click, selectors::QUICK_LINKS),
            Binding::new(Role::CelebrateButton, EventKind::Click, CELEBRATE_BUTTON),
            Binding::new(Role::StatusToggle, EventKind::Click, STATUS_TOGGLE),
            Binding::new(Role::SearchInput, EventKind::Input, id_selector(&search.input_id)),
        ];
        if search.effective_mode() == SearchMode::Remote {
            bindings.push(Binding::new(
                Role::PaginationLink,
                EventKind::Click,
                format!("{} {PAGINATION_LINKS}", id_selector(&search.container_id)),
            ));
        }
        Self::new(bindings)
    }

    /// Distinct event kinds that need a listener
    #[must_use]
    pub fn events(&self) -> Vec<EventKind> {
        let mut events = Vec::new();
        for binding in &self.bindings {
            if !events.contains(&binding.event) {
                events.push(binding.event);
            }
        }
        events
    }

    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// First binding for `event` whose selector `matcher` accepts
    ///
    /// `matcher` typically returns the closest matching element.
    pub fn resolve<T>(
        &self,
        event: EventKind,
        mut matcher: impl FnMut(&str) -> Option<T>,
    ) -> Option<(Role, T)> {
        self.bindings
            .iter()
            .filter(|b| b.event == event)
            .find_map(|b| matcher(&b.selector).map(|hit| (b.role, hit)))
    }
}

fn id_selector(id: &str) -> String {
    if id.trim().is_empty() {
        String::new()
    } else {
        format!("#{}", id.trim())
    }
}
