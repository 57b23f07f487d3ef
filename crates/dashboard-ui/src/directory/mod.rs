//! User directory search
//!
//! Two mutually exclusive modes, picked from
//! [`SearchConfig`](crate::config::SearchConfig):
//! - `local`: hide non-matching rows of the table already on the page
//! - `remote`: debounced server search with AJAX pagination

pub mod debounce;
pub mod local;
pub mod remote;

pub use debounce::{DebouncedTrigger, Debouncer, Ticket};
pub use local::{FilterOutcome, LocalDirectory, RowVisibility, filter_rows};
pub use remote::{
    DirectoryApi, DirectoryRequest, DirectoryView, DomDirectoryView, HttpDirectoryApi, LoadOutcome,
    RemoteDirectory, page_from_href,
};
