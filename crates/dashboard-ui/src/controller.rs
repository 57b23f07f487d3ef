//! Page-level wiring of every dashboard behavior
//!
//! `DashboardController::init` runs the load sequence (default section,
//! theme, charts) and then installs one delegated listener per event kind.
//! Each event is resolved through the [`DispatchTable`] to the role of the
//! element it hit. `teardown` undoes all of it and runs on a `pagehide` that
//! unloads the page; a page parked in the back/forward cache keeps its
//! listeners and charts so it comes back working.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlInputElement, PageTransitionEvent, Window};

use crate::charts::{ChartJs, ChartRenderer, ComputedStyleVariables};
use crate::config::{DashboardConfig, SearchMode};
use crate::directory::{
    DebouncedTrigger, DomDirectoryView, HttpDirectoryApi, LocalDirectory, RemoteDirectory,
    page_from_href,
};
use crate::dispatch::{DispatchTable, EventKind, Role};
use crate::dom::{self, BrowserNotifier, Listener, Notifier};
use crate::effects::{self, ConfettiOptions};
use crate::error::Result;
use crate::models::{SectionId, Theme};
use crate::router::{DomSections, LinkAction, Router, classify_link, selectors};
use crate::status::{self, DomStatusRow, HttpStatusApi};
use crate::theme::{DocumentThemeSurface, LocalThemeStore, NoObserver, ThemeManager};

type BrowserTheme = ThemeManager<LocalThemeStore, DocumentThemeSurface>;
type BrowserCharts = ChartRenderer<ChartJs, ComputedStyleVariables>;
type BrowserDirectory = RemoteDirectory<HttpDirectoryApi, DomDirectoryView>;

/// How the page is left on `pagehide`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageExit {
    /// Kept in the back/forward cache and shown again as it was
    Cached,
    Unloaded,
}

impl PageExit {
    #[must_use]
    pub const fn from_persisted(persisted: bool) -> Self {
        if persisted { Self::Cached } else { Self::Unloaded }
    }

    #[must_use]
    pub fn of(event: &Event) -> Self {
        Self::from_persisted(
            event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(PageTransitionEvent::persisted),
        )
    }
}

enum DirectoryMode {
    Local(LocalDirectory),
    Remote {
        directory: Rc<BrowserDirectory>,
        debounce: DebouncedTrigger<String>,
    },
}

pub struct DashboardController {
    config: DashboardConfig,
    window: Window,
    document: Document,
    dispatch: DispatchTable,
    router: Router<DomSections>,
    theme: BrowserTheme,
    charts: RefCell<BrowserCharts>,
    directory: DirectoryMode,
    notifier: BrowserNotifier,
    sidebar_open: RwSignal<bool>,
    listeners: RefCell<Vec<Listener>>,
    lifecycle: RefCell<Option<Listener>>,
    torn_down: Cell<bool>,
}

impl DashboardController {
    /// Run the load sequence and start listening
    ///
    /// # Errors
    ///
    /// Returns an error if there is no document, the dispatch table is
    /// invalid, or a listener cannot be attached. Missing optional widgets
    /// are logged, not errors.
    pub fn init(config: DashboardConfig) -> Result<Rc<Self>> {
        let window = dom::window()?;
        let document = dom::document()?;
        let dispatch = DispatchTable::standard(&config)?;

        let router = Router::new(DomSections::new(document.clone()));
        router.activate(&SectionId::new(config.default_section.as_str()));

        let theme = ThemeManager::new(
            LocalThemeStore::new(&window),
            DocumentThemeSurface::new(window.clone())?,
        );
        let initial = theme.init(&mut NoObserver);

        let mut charts = ChartRenderer::new(
            ChartJs::new(window.clone())?,
            ComputedStyleVariables::new(window.clone())?,
        );
        let built = charts.build_all(&config.charts, initial);
        log::info!("{built} of {} charts rendered", config.charts.len());

        let directory = Self::directory_mode(&config, &document);
        let sidebar_open = document
            .body()
            .is_some_and(|body| body.class_list().contains(selectors::SIDEBAR_OPEN_CLASS));

        let controller = Rc::new(Self {
            notifier: BrowserNotifier::new(window.clone()),
            config,
            window,
            document,
            dispatch,
            router,
            theme,
            charts: RefCell::new(charts),
            directory,
            sidebar_open: RwSignal::new(sidebar_open),
            listeners: RefCell::new(Vec::new()),
            lifecycle: RefCell::new(None),
            torn_down: Cell::new(false),
        });
        controller.attach()?;
        Ok(controller)
    }

    fn directory_mode(config: &DashboardConfig, document: &Document) -> DirectoryMode {
        let search = &config.search;
        match search.effective_mode() {
            SearchMode::Local => {
                log::debug!("user search: local filter");
                DirectoryMode::Local(LocalDirectory::new(document.clone()))
            }
            SearchMode::Remote => {
                let view = match DomDirectoryView::new(document.clone(), &search.container_id) {
                    Ok(view) => view,
                    Err(err) => {
                        log::warn!("remote search unavailable ({err}), using the local filter");
                        return DirectoryMode::Local(LocalDirectory::new(document.clone()));
                    }
                };
                let directory = Rc::new(RemoteDirectory::new(
                    HttpDirectoryApi,
                    view,
                    search.url.clone().unwrap_or_default(),
                    config.messages.directory_error.clone(),
                ));
                let target = Rc::clone(&directory);
                let debounce = DebouncedTrigger::new(search.debounce_ms, move |query: String| {
                    target.set_query(&query);
                    spawn_load(Rc::clone(&target), 1);
                });
                log::debug!("user search: remote, {}ms debounce", search.debounce_ms);
                DirectoryMode::Remote {
                    directory,
                    debounce,
                }
            }
        }
    }

    fn attach(self: &Rc<Self>) -> Result<()> {
        let mut listeners = Vec::new();
        for kind in self.dispatch.events() {
            let weak: Weak<Self> = Rc::downgrade(self);
            listeners.push(Listener::attach(&self.document, kind.as_str(), move |event| {
                if let Some(controller) = weak.upgrade() {
                    controller.handle(kind, &event);
                }
            })?);
        }
        *self.listeners.borrow_mut() = listeners;

        let weak = Rc::downgrade(self);
        let pagehide = Listener::attach(&self.window, "pagehide", move |event| {
            let Some(controller) = weak.upgrade() else {
                return;
            };
            match PageExit::of(&event) {
                PageExit::Cached => log::debug!("page cached, dashboard kept alive"),
                PageExit::Unloaded => controller.teardown(),
            }
        })?;
        *self.lifecycle.borrow_mut() = Some(pagehide);
        Ok(())
    }

    fn handle(&self, kind: EventKind, event: &Event) {
        let Some(target) = event.target() else {
            return;
        };
        let Some((role, element)) = self
            .dispatch
            .resolve(kind, |selector| dom::closest(&target, selector))
        else {
            return;
        };
        log::trace!("{role:?} {}", kind.as_str());

        match role {
            Role::SidebarToggle => self.toggle_sidebar(),
            Role::SupportButton => self.notifier.alert(&self.config.messages.support_info),
            Role::ThemeToggle => self.on_theme_toggle(&element),
            Role::NavLink | Role::QuickLink => self.on_link(&element, event),
            Role::CelebrateButton => {
                if let Err(err) = effects::celebrate(&self.window, &ConfettiOptions::default()) {
                    log::error!("celebrate failed: {err}");
                }
            }
            Role::SearchInput => self.on_search_input(&element),
            Role::StatusToggle => self.on_status_toggle(element, event),
            Role::PaginationLink => self.on_pagination(&element, event),
        }
    }

    fn toggle_sidebar(&self) {
        let Some(body) = self.document.body() else {
            return;
        };
        match body.class_list().toggle(selectors::SIDEBAR_OPEN_CLASS) {
            Ok(open) => self.sidebar_open.set(open),
            Err(err) => log::warn!("could not toggle sidebar: {err:?}"),
        }
    }

    fn on_theme_toggle(&self, element: &Element) {
        let Some(toggle) = element.dyn_ref::<HtmlInputElement>() else {
            return;
        };
        let mut charts = self.charts.borrow_mut();
        let theme = self.theme.toggle_from_control(toggle.checked(), &mut *charts);
        log::info!("theme switched to {theme}");
    }

    fn on_link(&self, link: &Element, event: &Event) {
        let action = classify_link(
            link.get_attribute(selectors::TARGET_ATTRIBUTE).as_deref(),
            &dom::text(link),
            link.get_attribute("href").as_deref(),
        );
        let messages = &self.config.messages;
        match action {
            LinkAction::Activate(id) => {
                event.prevent_default();
                self.router.activate(&id);
            }
            LinkAction::ConfirmQuit { href } => {
                event.prevent_default();
                if self.notifier.confirm(&messages.quit_confirm) {
                    if let Err(err) = self.window.location().set_href(&href) {
                        log::error!("could not navigate to {href}: {err:?}");
                    }
                }
            }
            LinkAction::ShowSupport => {
                event.prevent_default();
                self.notifier.alert(&messages.support_info);
            }
            LinkAction::FollowDefault => {}
        }
    }

    fn on_search_input(&self, element: &Element) {
        let Some(input) = element.dyn_ref::<HtmlInputElement>() else {
            return;
        };
        match &self.directory {
            DirectoryMode::Local(local) => match local.apply(&input.value()) {
                Ok(Some(outcome)) => log::trace!("{} rows visible", outcome.visible_count),
                Ok(None) => {}
                Err(err) => log::error!("local filter failed: {err}"),
            },
            DirectoryMode::Remote { debounce, .. } => debounce.trigger(input.value()),
        }
    }

    fn on_pagination(&self, link: &Element, event: &Event) {
        let DirectoryMode::Remote {
            directory,
            debounce,
        } = &self.directory
        else {
            return;
        };
        event.prevent_default();

        let page = link
            .get_attribute("href")
            .as_deref()
            .and_then(page_from_href)
            .unwrap_or(1);

        // A pending keystroke is folded into this load
        if debounce.is_pending() {
            debounce.cancel();
            if let Some(input) = self
                .document
                .get_element_by_id(&self.config.search.input_id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            {
                directory.set_query(&input.value());
            }
        }
        spawn_load(Rc::clone(directory), page);
    }

    fn on_status_toggle(&self, button: Element, event: &Event) {
        event.prevent_default();
        let row = DomStatusRow::new(button);
        if row.is_pending() {
            return;
        }
        let Some(url) = row.url() else {
            log::warn!("toggle button without {}", status::URL_ATTRIBUTE);
            return;
        };
        let csrf = status::csrf_token(&self.document);
        let messages = self.config.messages.clone();
        let notifier = BrowserNotifier::new(self.window.clone());

        spawn_local(async move {
            let result =
                status::toggle_status(&HttpStatusApi, &row, &notifier, &url, csrf.as_deref(), &messages)
                    .await;
            if let Ok(outcome) = result {
                log::debug!("toggle finished: {outcome:?}");
            }
        });
    }

    /// Remove listeners, stop pending work and destroy charts
    ///
    /// Runs once; later calls do nothing.
    pub fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        // Unregistered only: this may run inside the pagehide callback
        if let Some(lifecycle) = self.lifecycle.borrow().as_ref() {
            lifecycle.remove();
        }
        for listener in self.listeners.borrow_mut().drain(..) {
            listener.detach();
        }
        if let DirectoryMode::Remote {
            directory,
            debounce,
        } = &self.directory
        {
            debounce.cancel();
            directory.cancel();
        }
        self.charts.borrow_mut().teardown();
        log::info!("dashboard torn down");
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down.get()
    }

    #[must_use]
    pub fn active_section(&self) -> Option<SectionId> {
        self.router.active()
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    #[must_use]
    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open.get_untracked()
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }
}

fn spawn_load(directory: Rc<BrowserDirectory>, page: u32) {
    spawn_local(async move {
        let outcome = directory.load(page).await;
        log::debug!("directory page {page}: {outcome:?}");
    });
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("active_section", &self.active_section())
            .field("theme", &self.theme())
            .field("sidebar_open", &self.sidebar_open())
            .finish_non_exhaustive()
    }
}
