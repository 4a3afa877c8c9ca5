//! Markdown filtering of changed paths.

/// Whether a path names a Markdown file (`.md`, any case).
pub fn is_markdown_path(path: &str) -> bool {
    path.trim().to_ascii_lowercase().ends_with(".md")
}

/// Keep only Markdown paths, trimmed, in their original order.
pub fn markdown_paths<I, S>(paths: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    paths
        .into_iter()
        .filter_map(|p| {
            let p = p.as_ref().trim();
            (!p.is_empty() && is_markdown_path(p)).then(|| p.to_string())
        })
        .collect()
}
