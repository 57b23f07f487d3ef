//! Data models shared by the dashboard behaviors

pub mod colors;
pub mod query;
pub mod section;
pub mod theme;
pub mod user;

pub use colors::RgbColor;
pub use query::SearchQuery;
pub use section::SectionId;
pub use theme::Theme;
pub use user::{StatusPresentation, UserRow, UserStatus};
