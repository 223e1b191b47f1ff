/// Parse a plain domain list into cleaned domain entries.
///
/// Blank lines and `#` comment lines are skipped, inline `# ...` comments are
/// stripped, and each entry is lowercased with a leading scheme, a leading
/// `www.` and one trailing dot removed. Duplicates are kept; see
/// [`crate::optimizer::dedupe_domains`].
pub fn parse_domain_list(text: &str) -> Vec<String> {
    let mut domains = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = match line.find('#') {
            Some(pos) => line[..pos].trim(),
            None => line,
        };

        if let Some(domain) = clean_domain(line) {
            domains.push(domain);
        }
    }

    domains
}

fn clean_domain(entry: &str) -> Option<String> {
    let lowered = entry.to_lowercase();
    let mut s = lowered.as_str();
    s = s.strip_prefix("https://").unwrap_or(s);
    s = s.strip_prefix("http://").unwrap_or(s);
    s = s.strip_prefix("www.").unwrap_or(s);
    s = s.strip_suffix('.').unwrap_or(s);

    if s.is_empty() {
        return None;
    }
    Some(s.to_string())
}
