//! Registry setting from the project's .npmrc

use std::path::Path;

/// Read the `registry=` value from `<dir>/.npmrc`
pub fn read_registry(dir: &Path) -> Option<String> {
    let content = std::fs::read_to_string(dir.join(".npmrc")).ok()?;
    parse_registry(&content)
}

fn parse_registry(content: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        // Scoped keys such as `@acme:registry=` are not the default registry
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim() == "registry" {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    None
}
