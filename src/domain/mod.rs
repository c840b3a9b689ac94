//! Core domain models for peerbump
//!
//! This module contains the fundamental types used throughout the application:
//! - Dependency sections of package.json
//! - Registry metadata and per-package update state
//! - Planned updates and section reports

mod package;
mod report;
mod section;

pub use package::{PackageInfo, PackageRecord, PlannedUpdate};
pub use report::{SectionOutcome, SectionReport};
pub use section::DependencySection;
