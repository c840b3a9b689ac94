//! Dependency sections of package.json

use std::fmt;

/// A dependency section updated as one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencySection {
    /// Runtime dependencies (`dependencies`)
    Dependencies,
    /// Development dependencies (`devDependencies`)
    DevDependencies,
}

impl DependencySection {
    /// Returns the key of this section in package.json
    pub fn key(&self) -> &'static str {
        match self {
            DependencySection::Dependencies => "dependencies",
            DependencySection::DevDependencies => "devDependencies",
        }
    }

    /// Returns all sections in update order
    pub fn all() -> &'static [DependencySection] {
        &[
            DependencySection::Dependencies,
            DependencySection::DevDependencies,
        ]
    }
}

impl fmt::Display for DependencySection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_keys() {
        assert_eq!(DependencySection::Dependencies.key(), "dependencies");
        assert_eq!(DependencySection::DevDependencies.key(), "devDependencies");
    }

    #[test]
    fn test_update_order() {
        assert_eq!(
            DependencySection::all(),
            &[
                DependencySection::Dependencies,
                DependencySection::DevDependencies
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            DependencySection::DevDependencies.to_string(),
            "devDependencies"
        );
    }
}
