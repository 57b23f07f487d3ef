//! User directory rows and their active/inactive status

use crate::models::query::SearchQuery;

/// Whether a user account is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserStatus {
    Active,
    Inactive,
}

/// Classes and text for the status indicator and the toggle button of one row
///
/// Both halves come from the same status so they cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusPresentation {
    pub indicator_class: &'static str,
    pub indicator_text: &'static str,
    pub button_class: &'static str,
    pub button_label: &'static str,
}

impl UserStatus {
    #[must_use]
    pub const fn from_active(is_active: bool) -> Self {
        if is_active { Self::Active } else { Self::Inactive }
    }

    /// An active user gets a "deactivate" button and vice versa
    #[must_use]
    pub const fn presentation(self) -> StatusPresentation {
        match self {
            Self::Active => StatusPresentation {
                indicator_class: "status-span status-active",
                indicator_text: "Active",
                button_class: "btn-toggle-status btn-deactivate",
                button_label: "Deactivate",
            },
            Self::Inactive => StatusPresentation {
                indicator_class: "status-span status-inactive",
                indicator_text: "Inactive",
                button_class: "btn-toggle-status btn-activate",
                button_label: "Activate",
            },
        }
    }
}

/// The searchable text of one rendered directory row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserRow {
    pub username: String,
    pub email: String,
    pub display_name: String,
}

impl UserRow {
    /// Build from the row's cell texts, in column order
    ///
    /// Returns `None` for placeholder rows with fewer than two cells.
    #[must_use]
    pub fn from_cells(cells: &[String]) -> Option<Self> {
        match cells {
            [username, email, rest @ ..] => Some(Self {
                username: username.clone(),
                email: email.clone(),
                display_name: rest.first().cloned().unwrap_or_default(),
            }),
            _ => None,
        }
    }

    /// True when the query occurs in the username, email or display name
    #[must_use]
    pub fn matches(&self, query: &SearchQuery) -> bool {
        query.matches(&self.username)
            || query.matches(&self.email)
            || query.matches(&self.display_name)
    }
}
