//! The handful of Markdown constructs the index needs.

/// `# text`, with as many `#` as `level`.
pub fn heading(text: &str, level: usize) -> String {
    format!("{} {text}", "#".repeat(level))
}

/// `- item`
pub fn list_item(item: &str) -> String {
    format!("- {item}")
}

/// `[name](target)`, with spaces in the target encoded as `%20`.
pub fn link(name: &str, target: &str) -> String {
    format!("[{name}]({})", target.replace(' ', "%20"))
}
