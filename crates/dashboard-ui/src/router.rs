//! Sidebar/tab routing between page sections
//!
//! Sections are the `.page-content` panels rendered by the server. Exactly one
//! is active at a time; the router owns that invariant and the matching
//! highlight on the sidebar link.

use leptos::prelude::*;
use web_sys::{Document, Element};

use crate::dom;
use crate::models::SectionId;

/// Selectors and class names of the navigation markup
pub mod selectors {
    /// Section panels
    pub const SECTIONS: &str = ".page-content";
    /// Sidebar navigation links
    pub const SIDEBAR_LINKS: &str = ".sidebar ul a";
    /// Cards on the home section that jump to another section
    pub const QUICK_LINKS: &str = ".quick-link-card";
    /// Control that expands/collapses the sidebar
    pub const SIDEBAR_TOGGLE: &str = "#sidebar-toggle";
    /// Standalone button in the sidebar footer
    pub const SUPPORT_BUTTON: &str = ".sidebar .support button";
    /// Attribute naming the section a link activates
    pub const TARGET_ATTRIBUTE: &str = "data-target";
    pub const ACTIVE_CLASS: &str = "active";
    /// Body class while the sidebar is expanded
    pub const SIDEBAR_OPEN_CLASS: &str = "sidebar-open";
}

/// Link labels with special handling
pub const QUIT_LABEL: &str = "Quit";
pub const SUPPORT_LABEL: &str = "Support";

/// What a click on a navigation link should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Suppress navigation and show the section
    Activate(SectionId),
    /// Suppress navigation and ask before following `href`
    ConfirmQuit { href: String },
    /// Suppress navigation and show the support notice
    ShowSupport,
    /// Let the browser follow the link
    FollowDefault,
}

/// Decide how to handle a navigation link click
#[must_use]
pub fn classify_link(target: Option<&str>, label: &str, href: Option<&str>) -> LinkAction {
    if let Some(target) = target.map(str::trim).filter(|t| !t.is_empty()) {
        return LinkAction::Activate(SectionId::new(target));
    }
    match (label.trim(), href) {
        (QUIT_LABEL, Some(href)) => LinkAction::ConfirmQuit {
            href: href.to_string(),
        },
        (SUPPORT_LABEL, _) => LinkAction::ShowSupport,
        _ => LinkAction::FollowDefault,
    }
}

/// The section panels and nav links the router switches between
pub trait SectionHost {
    fn section_ids(&self) -> Vec<SectionId>;

    /// Targets of the sidebar links, in document order
    fn link_targets(&self) -> Vec<Option<SectionId>>;

    fn set_section_active(&self, id: &SectionId, active: bool);

    /// Highlight every sidebar link whose target is `id`
    fn set_link_active(&self, id: &SectionId, active: bool);

    /// Clear the highlight of links that have no target
    fn clear_untargeted_links(&self);
}

/// Outcome of one [`Router::activate`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub section: Option<SectionId>,
    pub link: Option<SectionId>,
}

pub struct Router<H> {
    host: H,
    active: RwSignal<Option<SectionId>>,
}

impl<H: SectionHost> Router<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            active: RwSignal::new(None),
        }
    }

    /// Deactivate everything, then activate `id` and its link if they exist
    ///
    /// An unknown id leaves every section and link inactive.
    pub fn activate(&self, id: &SectionId) -> Activation {
        let sections = self.host.section_ids();
        let links = self.host.link_targets();

        for section in &sections {
            self.host.set_section_active(section, false);
        }
        for target in links.iter().flatten() {
            self.host.set_link_active(target, false);
        }
        self.host.clear_untargeted_links();

        let section = sections.iter().find(|s| *s == id).cloned();
        let link = links.iter().flatten().find(|t| *t == id).cloned();

        if let Some(section) = &section {
            self.host.set_section_active(section, true);
        } else {
            log::debug!("no section with id '{id}'");
        }
        if let Some(link) = &link {
            self.host.set_link_active(link, true);
        }

        self.active.set(section.clone());
        Activation { section, link }
    }

    /// Currently visible section
    #[must_use]
    pub fn active(&self) -> Option<SectionId> {
        self.active.get_untracked()
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }
}

/// Sections and sidebar links in the live document
pub struct DomSections {
    document: Document,
}

impl DomSections {
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    fn sections(&self) -> Vec<Element> {
        dom::query_all(&self.document, selectors::SECTIONS)
    }

    fn links(&self) -> Vec<Element> {
        dom::query_all(&self.document, selectors::SIDEBAR_LINKS)
    }
}

impl SectionHost for DomSections {
    fn section_ids(&self) -> Vec<SectionId> {
        self.sections()
            .iter()
            .map(Element::id)
            .filter(|id| !id.is_empty())
            .map(SectionId::new)
            .collect()
    }

    fn link_targets(&self) -> Vec<Option<SectionId>> {
        self.links()
            .iter()
            .map(|link| link.get_attribute(selectors::TARGET_ATTRIBUTE).map(SectionId::new))
            .collect()
    }

    fn set_section_active(&self, id: &SectionId, active: bool) {
        if let Some(section) = self.document.get_element_by_id(id.as_str()) {
            dom::set_class(&section, selectors::ACTIVE_CLASS, active);
        }
    }

    fn set_link_active(&self, id: &SectionId, active: bool) {
        self.links()
            .iter()
            .filter(|link| link.get_attribute(selectors::TARGET_ATTRIBUTE).as_deref() == Some(id.as_str()))
            .for_each(|link| dom::set_class(link, selectors::ACTIVE_CLASS, active));
    }

    fn clear_untargeted_links(&self) {
        self.links()
            .iter()
            .filter(|link| !link.has_attribute(selectors::TARGET_ATTRIBUTE))
            .for_each(|link| dom::set_class(link, selectors::ACTIVE_CLASS, false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_constants() {
        assert_eq!(selectors::SECTIONS, ".page-content");
        assert_eq!(selectors::SIDEBAR_LINKS, ".sidebar ul a");
        assert_eq!(selectors::TARGET_ATTRIBUTE, "data-target");
    }

    #[test]
    fn test_target_link_activates_section() {
        assert_eq!(
            classify_link(Some("user-central-content"), "Users", Some("#")),
            LinkAction::Activate(SectionId::new("user-central-content"))
        );
    }

    #[test]
    fn test_target_takes_precedence_over_label() {
        assert_eq!(
            classify_link(Some("home-content"), "Quit", Some("/logout/")),
            LinkAction::Activate(SectionId::new("home-content"))
        );
    }

    #[test]
    fn test_quit_link_asks_for_confirmation() {
        assert_eq!(
            classify_link(None, " Quit ", Some("/accounts/logout/")),
            LinkAction::ConfirmQuit {
                href: "/accounts/logout/".to_string()
            }
        );
    }

    #[test]
    fn test_quit_without_href_follows_default() {
        assert_eq!(classify_link(None, "Quit", None), LinkAction::FollowDefault);
    }

    #[test]
    fn test_support_link_shows_notice() {
        assert_eq!(classify_link(None, "Support", Some("#")), LinkAction::ShowSupport);
    }

    #[test]
    fn test_empty_target_is_not_navigable() {
        assert_eq!(
            classify_link(Some("  "), "Docs", Some("/docs/")),
            LinkAction::FollowDefault
        );
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert_eq!(classify_link(None, "quit", Some("/x")), LinkAction::FollowDefault);
    }
}
