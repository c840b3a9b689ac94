//! Output formatting for section reports

mod text;

pub use text::{TextFormatter, VersionChangeType};
