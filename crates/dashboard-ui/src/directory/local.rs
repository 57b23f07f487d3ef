//! In-page filtering of the rendered user table
//!
//! Rows stay in the DOM and are only shown or hidden. When nothing matches a
//! non-empty query a single placeholder row says so.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::dom;
use crate::error::{DashboardError, Result};
use crate::models::{SearchQuery, UserRow};

/// Body of the user table
pub const TABLE_BODY: &str = "#user-central-content .data-table tbody";
/// Class of the placeholder row
pub const NO_RESULTS_CLASS: &str = "no-search-results";
/// Data and header cells, in column order
pub const CELLS: &str = "td, th";
/// Width of the placeholder cell
pub const NO_RESULTS_COLSPAN: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowVisibility {
    Shown,
    Hidden,
    /// Placeholder rows are left as they are
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub visibility: Vec<RowVisibility>,
    pub visible_count: usize,
    /// Whether the "no results" row should exist
    pub show_no_results: bool,
}

/// Match every row against `query`
///
/// `None` entries are rows without enough cells to search.
#[must_use]
pub fn filter_rows(query: &SearchQuery, rows: &[Option<UserRow>]) -> FilterOutcome {
    let visibility: Vec<_> = rows
        .iter()
        .map(|row| match row {
            None => RowVisibility::Skipped,
            Some(row) if row.matches(query) => RowVisibility::Shown,
            Some(_) => RowVisibility::Hidden,
        })
        .collect();
    let visible_count = visibility
        .iter()
        .filter(|v| **v == RowVisibility::Shown)
        .count();
    FilterOutcome {
        show_no_results: visible_count == 0 && !query.is_empty(),
        visibility,
        visible_count,
    }
}

/// Placeholder text, with the query as typed
#[must_use]
pub fn no_results_text(raw: &str) -> String {
    format!("No results for '{raw}'")
}

/// Change to make to the placeholder row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoResultsAction {
    Insert(String),
    Update(String),
    Remove,
    None,
}

/// Reconcile the wanted placeholder with the one already in the table
#[must_use]
pub fn plan_no_results(wanted: Option<String>, existing: Option<&str>) -> NoResultsAction {
    match (wanted, existing) {
        (Some(text), None) => NoResultsAction::Insert(text),
        (Some(text), Some(current)) if text != current => NoResultsAction::Update(text),
        (None, Some(_)) => NoResultsAction::Remove,
        _ => NoResultsAction::None,
    }
}

/// The rendered user table
pub struct LocalDirectory {
    document: Document,
}

impl LocalDirectory {
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    fn body(&self) -> Option<Element> {
        self.document.query_selector(TABLE_BODY).ok().flatten()
    }

    /// Filter the table for `input`
    ///
    /// Returns `None` when the table is not on the page.
    ///
    /// # Errors
    ///
    /// Returns `Js` if the placeholder row cannot be created.
    pub fn apply(&self, input: &str) -> Result<Option<FilterOutcome>> {
        let Some(body) = self.body() else {
            log::debug!("{TABLE_BODY} not found, local filter idle");
            return Ok(None);
        };

        let query = SearchQuery::new(input);
        let elements: Vec<Element> = dom::query_all_in(&body, "tr")
            .into_iter()
            .filter(|row| !row.class_list().contains(NO_RESULTS_CLASS))
            .collect();
        let rows: Vec<Option<UserRow>> = elements
            .iter()
            .map(|row| {
                let cells: Vec<String> = dom::query_all_in(row, CELLS).iter().map(dom::text).collect();
                UserRow::from_cells(&cells)
            })
            .collect();

        let outcome = filter_rows(&query, &rows);
        for (row, visibility) in elements.iter().zip(&outcome.visibility) {
            match visibility {
                RowVisibility::Shown => set_display(row, ""),
                RowVisibility::Hidden => set_display(row, "none"),
                RowVisibility::Skipped => {}
            }
        }

        let existing = body
            .query_selector(&format!(".{NO_RESULTS_CLASS}"))
            .ok()
            .flatten();
        let wanted = outcome
            .show_no_results
            .then(|| no_results_text(query.raw()));
        let current = existing.as_ref().map(dom::text);

        match plan_no_results(wanted, current.as_deref()) {
            NoResultsAction::Insert(text) => {
                let row = self.no_results_row(&text)?;
                body.append_child(&row)
                    .map_err(|e| DashboardError::js("appendChild", &e))?;
            }
            NoResultsAction::Update(text) => {
                if let Some(cell) = existing.as_ref().and_then(|row| row.query_selector("td").ok().flatten()) {
                    cell.set_text_content(Some(&text));
                }
            }
            NoResultsAction::Remove => {
                if let Some(row) = existing {
                    row.remove();
                }
            }
            NoResultsAction::None => {}
        }

        Ok(Some(outcome))
    }

    fn no_results_row(&self, text: &str) -> Result<Element> {
        let row = self
            .document
            .create_element("tr")
            .map_err(|e| DashboardError::js("createElement", &e))?;
        row.set_class_name(NO_RESULTS_CLASS);

        let cell = self
            .document
            .create_element("td")
            .map_err(|e| DashboardError::js("createElement", &e))?;
        cell.set_attribute("colspan", &NO_RESULTS_COLSPAN.to_string())
            .map_err(|e| DashboardError::js("colspan", &e))?;
        // Text node, so the query is never parsed as markup
        cell.set_text_content(Some(text));

        row.append_child(&cell)
            .map_err(|e| DashboardError::js("appendChild", &e))?;
        Ok(row)
    }
}

fn set_display(row: &Element, value: &str) {
    if let Some(row) = row.dyn_ref::<HtmlElement>() {
        if let Err(err) = row.style().set_property("display", value) {
            log::warn!("could not set row display: {err:?}");
        }
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use crate::tests::browser::{Fixture, document, js};
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const USER_TABLE: &str = r#"
        <section id="user-central-content">
          <table class="data-table"><tbody>
            <tr><th scope="row">alice</th><td>alice@example.com</td><td>Alice Kim</td></tr>
            <tr><th scope="row">bob</th><td>bob@corp.io</td><td>Robert Park</td></tr>
          </tbody></table>
        </section>"#;

    fn display(row: &Element) -> std::result::Result<String, JsValue> {
        let row = row.dyn_ref::<HtmlElement>().ok_or("row is not an HTML element")?;
        row.style().get_property_value("display")
    }

    #[wasm_bindgen_test]
    fn test_placeholder_row_is_inserted_updated_and_removed() -> std::result::Result<(), JsValue> {
        let fixture = Fixture::mount(USER_TABLE)?;
        let directory = LocalDirectory::new(document()?);
        let placeholder = format!(".{NO_RESULTS_CLASS}");

        directory.apply("zed").map_err(js)?;
        assert_eq!(fixture.count(&placeholder)?, 1);
        assert_eq!(dom::text(&fixture.find(&placeholder)?), "No results for 'zed'");
        assert_eq!(
            fixture.find(&format!("{placeholder} td"))?.get_attribute("colspan").as_deref(),
            Some("6")
        );

        directory.apply("zedd").map_err(js)?;
        assert_eq!(fixture.count(&placeholder)?, 1);
        assert_eq!(dom::text(&fixture.find(&placeholder)?), "No results for 'zedd'");

        directory.apply("").map_err(js)?;
        assert_eq!(fixture.count(&placeholder)?, 0);
        Ok(())
    }

    #[wasm_bindgen_test]
    fn test_query_markup_stays_text() -> std::result::Result<(), JsValue> {
        let fixture = Fixture::mount(USER_TABLE)?;
        let directory = LocalDirectory::new(document()?);

        directory.apply("<b>x</b>").map_err(js)?;

        let cell = fixture.find(&format!(".{NO_RESULTS_CLASS} td"))?;
        assert_eq!(cell.child_element_count(), 0);
        assert_eq!(dom::text(&cell), "No results for '<b>x</b>'");
        Ok(())
    }

    #[wasm_bindgen_test]
    fn test_header_cell_username_is_searched() -> std::result::Result<(), JsValue> {
        let fixture = Fixture::mount(USER_TABLE)?;
        let directory = LocalDirectory::new(document()?);

        let outcome = directory.apply("BOB").map_err(js)?.ok_or("table not found")?;

        assert_eq!(outcome.visible_count, 1);
        assert_eq!(display(&fixture.find("tbody tr:nth-child(1)")?)?, "none");
        assert_eq!(display(&fixture.find("tbody tr:nth-child(2)")?)?, "");
        Ok(())
    }
}
