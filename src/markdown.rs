//! Markdown Preview
//!
//! Renders the exported checklist with pulldown-cmark. Task list items
//! (`- [x]`) become disabled checkboxes.

use pulldown_cmark::{html::push_html, Options, Parser};

/// Render markdown to HTML
pub fn parse_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, get_options());
    let mut html_output = String::new();
    push_html(&mut html_output, parser);
    html_output
}

fn get_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_items_render_as_checkboxes() {
        let html = parse_markdown("## Pending\n\n- [ ] Milk\n- [x] Eggs\n");
        assert!(html.contains("<h2>Pending</h2>"));
        assert_eq!(html.matches(r#"type="checkbox""#).count(), 2);
        assert_eq!(html.matches("checked").count(), 1);
        assert!(html.contains("Milk"));
    }

    #[test]
    fn test_bold_summary() {
        let html = parse_markdown("**Summary:** 1 / 2 completed");
        assert!(html.contains("<strong>Summary:</strong> 1 / 2 completed"));
    }
}
