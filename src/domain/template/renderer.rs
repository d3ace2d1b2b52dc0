//! Fills answer templates with result rows
//!
//! A single row is substituted into the template's `{field}` placeholders.
//! Several rows are grouped by the first field and listed, since one template
//! sentence cannot describe a variable number of results.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::domain::graph::Row;

/// `{field}` placeholder. Names are anything without braces or whitespace,
/// so unaliased Cypher columns like `{count(s)}` are matched too.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}\s]+)\}").unwrap());

/// Rendered answer plus any placeholders that had no matching field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub text: String,
    pub missing_fields: Vec<String>,
}

impl RenderOutput {
    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render rows into an answer. Pure: the same input always yields the
    /// same output.
    pub fn render(&self, template: &str, rows: &[Row]) -> RenderOutput {
        match rows {
            [] => RenderOutput {
                text: String::new(),
                missing_fields: Vec::new(),
            },
            [row] => self.render_single(template, row),
            _ => RenderOutput {
                text: self.render_grouped(rows),
                missing_fields: Vec::new(),
            },
        }
    }

    /// One pass over the template: substituted values are never rescanned
    fn render_single(&self, template: &str, row: &Row) -> RenderOutput {
        let mut missing_fields: Vec<String> = Vec::new();

        let text = PLACEHOLDER.replace_all(template, |caps: &Captures| match row.get(&caps[1]) {
            Some(value) => value.display(),
            None => {
                let name = caps[1].to_string();
                if !missing_fields.contains(&name) {
                    missing_fields.push(name);
                }
                caps[0].to_string()
            }
        });

        RenderOutput {
            text: text.into_owned(),
            missing_fields,
        }
    }

    fn render_grouped(&self, rows: &[Row]) -> String {
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();

        for row in rows {
            let Some((group_key, group_value)) = row.first() else {
                continue;
            };
            let label = group_value.group_label();

            let details = row
                .fields()
                .iter()
                .filter(|(name, _)| name != group_key)
                .map(|(name, value)| format!("- {}: {}", name, value.display()));

            match groups.iter().position(|(existing, _)| *existing == label) {
                Some(index) => groups[index].1.extend(details),
                None => groups.push((label, details.collect())),
            }
        }

        groups
            .into_iter()
            .map(|(label, lines)| {
                if lines.is_empty() {
                    label
                } else {
                    format!("{}\n{}", label, lines.join("\n"))
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::FieldValue;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        match value {
            serde_json::Value::Object(map) => Row::from_json_object(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_single_row_substitution() {
        let rows = vec![row(json!({"student": "Ana", "progress": 85}))];
        let output = TemplateRenderer::new().render("{student} has progressed {progress}%.", &rows);

        assert_eq!(output.text, "Ana has progressed 85%.");
        assert!(output.is_complete());
    }

    #[test]
    fn test_repeated_placeholder() {
        let rows = vec![row(json!({"name": "Bo"}))];
        let output = TemplateRenderer::new().render("{name}, yes {name}.", &rows);

        assert_eq!(output.text, "Bo, yes Bo.");
    }

    #[test]
    fn test_missing_field_left_intact_and_reported() {
        let rows = vec![row(json!({"student": "Ana"}))];
        let output = TemplateRenderer::new().render("{student} finished {course}.", &rows);

        assert_eq!(output.text, "Ana finished {course}.");
        assert_eq!(output.missing_fields, vec!["course".to_string()]);
        assert!(!output.is_complete());
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let rows = vec![row(json!({"a": "{b}", "b": "X"}))];
        let output = TemplateRenderer::new().render("A={a} B={b}", &rows);

        assert_eq!(output.text, "A={b} B=X");
        assert!(output.is_complete());
    }

    #[test]
    fn test_braces_in_values_are_not_missing_fields() {
        let rows = vec![row(json!({"name": "{city}"}))];
        let output = TemplateRenderer::new().render("Hello {name}", &rows);

        assert_eq!(output.text, "Hello {city}");
        assert!(output.is_complete());
    }

    #[test]
    fn test_unaliased_column_placeholder() {
        let rows = vec![row(json!({"count(s)": 3}))];
        let output = TemplateRenderer::new().render("{count(s)} students, {max(s.age)} max age", &rows);

        assert_eq!(output.text, "3 students, {max(s.age)} max age");
        assert_eq!(output.missing_fields, vec!["max(s.age)".to_string()]);
    }

    #[test]
    fn test_nested_and_null_values() {
        let rows = vec![row(json!({"course": {"title": "Rust", "hours": 10}, "mentor": null}))];
        let output = TemplateRenderer::new().render("Course: {course}. Mentor: {mentor}.", &rows);

        assert_eq!(output.text, "Course: title: Rust, hours: 10. Mentor: null.");
    }

    #[test]
    fn test_multi_row_grouping() {
        let rows = vec![
            row(json!({"student": "Ana", "course": "Rust", "progress": 85})),
            row(json!({"student": "Bo", "course": "Go", "progress": 90})),
            row(json!({"student": "Ana", "course": "SQL", "progress": 92})),
        ];
        let output = TemplateRenderer::new().render("{student} is at {progress}%", &rows);

        assert_eq!(
            output.text,
            "Ana\n- course: Rust\n- progress: 85\n- course: SQL\n- progress: 92\n\nBo\n- course: Go\n- progress: 90"
        );
        assert!(output.is_complete());
    }

    #[test]
    fn test_multi_row_groups_by_node_name() {
        let rows = vec![
            row(json!({"s": {"name": "Ana", "age": 20}, "c": {"title": "Rust"}})),
            row(json!({"s": {"name": "Ana", "age": 20}, "c": {"title": "Go"}})),
        ];
        let output = TemplateRenderer::new().render("", &rows);

        assert_eq!(output.text, "Ana\n- c: title: Rust\n- c: title: Go");
    }

    #[test]
    fn test_single_field_rows() {
        let rows = vec![
            Row::new().with_field("name", FieldValue::text("Ana")),
            Row::new().with_field("name", FieldValue::text("Bo")),
        ];
        let output = TemplateRenderer::new().render("{name}", &rows);

        assert_eq!(output.text, "Ana\n\nBo");
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let renderer = TemplateRenderer::new();
        let rows = vec![row(json!({"a": 1, "b": [1, 2]}))];

        let first = renderer.render("{a} and {b}", &rows);
        let second = renderer.render("{a} and {b}", &rows);

        assert_eq!(first, second);
        assert_eq!(first.text, "1 and 1, 2");
    }
}
