//! Markdown checklist rendering

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::{Project, TodoItem};

static WHITESPACE: OnceLock<Regex> = OnceLock::new();

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

fn checklist_line(todo: &TodoItem) -> String {
    format!("- [{}] {}", if todo.completed { 'x' } else { ' ' }, todo.text)
}

fn checklist<'a>(todos: impl Iterator<Item = &'a TodoItem>) -> String {
    todos.map(checklist_line).collect::<Vec<_>>().join("\n")
}

/// Title heading, completion summary, then Pending and Completed sections
pub fn render_checklist(project: &Project) -> String {
    format!(
        "# {}\n\n**Summary:** {} / {} completed\n\n## Pending\n\n{}\n\n## Completed\n\n{}",
        project.title,
        project.completed_count(),
        project.todos.len(),
        checklist(project.pending()),
        checklist(project.completed()),
    )
}

/// Title with each whitespace run replaced by `_`, plus `.md`
pub fn gist_filename(title: &str) -> String {
    format!("{}.md", whitespace().replace_all(title, "_"))
}

pub fn gist_description(title: &str) -> String {
    format!("{} Todo List", title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str, items: &[(&str, bool)]) -> Project {
        Project {
            id: "id".to_string(),
            title: title.to_string(),
            user: "alice".to_string(),
            todos: items
                .iter()
                .map(|(text, completed)| TodoItem { text: text.to_string(), completed: *completed })
                .collect(),
        }
    }

    #[test]
    fn test_render_two_items() {
        let markdown = render_checklist(&project("T", &[("a", false), ("b", true)]));
        assert_eq!(
            markdown,
            "# T\n\n**Summary:** 1 / 2 completed\n\n## Pending\n\n- [ ] a\n\n## Completed\n\n- [x] b"
        );
    }

    #[test]
    fn test_sections_keep_item_order() {
        let markdown = render_checklist(&project(
            "Week",
            &[("one", true), ("two", false), ("three", true), ("four", false)],
        ));
        assert!(markdown.contains("**Summary:** 2 / 4 completed"));
        assert!(markdown.contains("## Pending\n\n- [ ] two\n- [ ] four\n\n"));
        assert!(markdown.ends_with("## Completed\n\n- [x] one\n- [x] three"));
    }

    #[test]
    fn test_render_empty_project() {
        let markdown = render_checklist(&project("Empty", &[]));
        assert_eq!(
            markdown,
            "# Empty\n\n**Summary:** 0 / 0 completed\n\n## Pending\n\n\n\n## Completed\n\n"
        );
    }

    #[test]
    fn test_gist_filename_collapses_whitespace() {
        assert_eq!(gist_filename("T"), "T.md");
        assert_eq!(gist_filename("My  big\tproject"), "My_big_project.md");
        assert_eq!(gist_filename(" padded "), "_padded_.md");
    }

    #[test]
    fn test_gist_description() {
        assert_eq!(gist_description("Trip"), "Trip Todo List");
    }
}
