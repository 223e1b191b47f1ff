use std::fs;
use std::path::Path;

/// Read a domain/URL list: one entry per line, trimmed, with blank lines and
/// `#` comments skipped.
pub fn read_domain_lines(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    Ok(domain_lines(&content))
}

pub fn domain_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
