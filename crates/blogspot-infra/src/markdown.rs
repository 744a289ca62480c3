//! Markdown rendering for post content.

use comrak::Options;

/// Render untrusted Markdown to sanitized HTML.
///
/// Comrak does the rendering, ammonia strips anything that could execute.
pub fn render_markdown(source: &str) -> String {
    let mut options = Options::default();
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;

    let html = comrak::markdown_to_html(source, &options);
    ammonia::clean(&html)
}
