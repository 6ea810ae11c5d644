use pulldown_cmark::{
    html,
    Options,
    Parser,
};

use crate::core::SyncError;

/// Turns card markup into the HTML stored in a note field.
pub trait CardRenderer: Send + Sync {
    fn render(&self, markdown: &str, document_path: &str) -> Result<String, SyncError>;
}

/// CommonMark renderer with the GitHub extensions notes usually rely on.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl CardRenderer for MarkdownRenderer {
    fn render(&self, markdown: &str, _document_path: &str) -> Result<String, SyncError> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, Parser::new_ext(markdown, options));
        Ok(out)
    }
}

fn breadcrumb_block(breadcrumb: &str) -> String {
    format!(r#"<div class="vaultcards-breadcrumb">{}</div>"#, html_escape::encode_text(breadcrumb))
}

pub fn build_front_field(
    renderer: &dyn CardRenderer,
    front: &str,
    document_path: &str,
    breadcrumb: &str,
    link: &str,
) -> Result<String, SyncError> {
    let rendered = renderer.render(front, document_path)?;
    Ok(format!(
        r#"{}<div class="vaultcards-link"><a href="{}">Open in Obsidian</a></div><div class="vaultcards-front">{}</div>"#,
        breadcrumb_block(breadcrumb),
        html_escape::encode_double_quoted_attribute(link),
        rendered
    ))
}

pub fn build_back_field(
    renderer: &dyn CardRenderer,
    back: &str,
    document_path: &str,
    breadcrumb: &str,
) -> Result<String, SyncError> {
    let rendered = renderer.render(back, document_path)?;
    Ok(format!(
        r#"{}<div class="vaultcards-back">{}</div>"#,
        breadcrumb_block(breadcrumb),
        rendered
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_renderer() {
        let html = MarkdownRenderer.render("**bold** and ~~gone~~", "a.md").unwrap();
        assert_eq!(html, "<p><strong>bold</strong> and <del>gone</del></p>\n");
    }

    #[test]
    fn test_front_field_layout() {
        let field = build_front_field(
            &MarkdownRenderer,
            "What is `Send`?",
            "lang/rust.md",
            "lang / <rust> & \"traits\"",
            "obsidian://open?vault=v&file=lang%2Frust.md&line=3",
        )
        .unwrap();

        assert_eq!(
            field,
            "<div class=\"vaultcards-breadcrumb\">lang / &lt;rust&gt; &amp; \"traits\"</div>\
             <div class=\"vaultcards-link\"><a href=\"obsidian://open?vault=v&amp;file=lang%2Frust.md&amp;line=3\">Open in Obsidian</a></div>\
             <div class=\"vaultcards-front\"><p>What is <code>Send</code>?</p>\n</div>"
        );
    }

    #[test]
    fn test_back_field_has_no_link() {
        let field = build_back_field(&MarkdownRenderer, "A marker trait.", "lang/rust.md", "lang / rust")
            .unwrap();
        assert!(field.starts_with("<div class=\"vaultcards-breadcrumb\">lang / rust</div>"));
        assert!(field.ends_with("<div class=\"vaultcards-back\"><p>A marker trait.</p>\n</div>"));
        assert!(!field.contains("Open in Obsidian"));
    }
}
