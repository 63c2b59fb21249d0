//! Prompt templates with `{name}` placeholders.
//!
//! Substitution follows `str.format(**context)` rules: `{{` and `}}` render
//! literal braces, every named placeholder must be present in the context,
//! and anything after `:` or `!` inside a placeholder is ignored.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Missing context variable '{0}'")]
    MissingVariable(String),

    #[error("Positional placeholder at byte {0} is not supported")]
    Positional(usize),

    #[error("Unbalanced '{brace}' at byte {position}")]
    Unbalanced { brace: char, position: usize },
}

pub type TemplateResult<T> = Result<T, TemplateError>;

#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Literal(&'a str),
    Brace(char),
    Field(&'a str),
}

/// A prompt template borrowed from an agent definition.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate<'a> {
    source: &'a str,
}

impl<'a> PromptTemplate<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Named placeholders in order of first appearance.
    pub fn placeholders(&self) -> TemplateResult<Vec<&'a str>> {
        let mut names: Vec<&'a str> = Vec::new();
        for segment in parse(self.source)? {
            if let Segment::Field(name) = segment {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    pub fn render<V: AsRef<str>>(&self, context: &HashMap<String, V>) -> TemplateResult<String> {
        let mut out = String::with_capacity(self.source.len());
        for segment in parse(self.source)? {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Brace(c) => out.push(c),
                Segment::Field(name) => {
                    let value = context
                        .get(name)
                        .ok_or_else(|| TemplateError::MissingVariable(name.to_string()))?;
                    out.push_str(value.as_ref());
                }
            }
        }
        Ok(out)
    }
}

/// Renders `template` with a single `key = value` binding.
pub fn render_with(template: &str, key: &str, value: &str) -> TemplateResult<String> {
    let mut context = HashMap::with_capacity(1);
    context.insert(key.to_string(), value);
    PromptTemplate::new(template).render(&context)
}

fn parse(source: &str) -> TemplateResult<Vec<Segment<'_>>> {
    let bytes = source.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                if literal_start < i {
                    segments.push(Segment::Literal(&source[literal_start..i]));
                }
                if bytes.get(i + 1) == Some(&b'{') {
                    segments.push(Segment::Brace('{'));
                    i += 2;
                } else {
                    let close = source[i + 1..]
                        .find('}')
                        .map(|offset| i + 1 + offset)
                        .ok_or(TemplateError::Unbalanced {
                            brace: '{',
                            position: i,
                        })?;
                    let inner = &source[i + 1..close];
                    if inner.contains('{') {
                        return Err(TemplateError::Unbalanced {
                            brace: '{',
                            position: i,
                        });
                    }
                    let name = inner
                        .split(|c: char| c == ':' || c == '!')
                        .next()
                        .unwrap_or_default()
                        .trim();
                    if name.is_empty() || name.chars().all(|c| c.is_ascii_digit()) {
                        return Err(TemplateError::Positional(i));
                    }
                    segments.push(Segment::Field(name));
                    i = close + 1;
                }
                literal_start = i;
            }
            b'}' => {
                if literal_start < i {
                    segments.push(Segment::Literal(&source[literal_start..i]));
                }
                if bytes.get(i + 1) == Some(&b'}') {
                    segments.push(Segment::Brace('}'));
                    i += 2;
                    literal_start = i;
                } else {
                    return Err(TemplateError::Unbalanced {
                        brace: '}',
                        position: i,
                    });
                }
            }
            _ => i += 1,
        }
    }

    if literal_start < bytes.len() {
        segments.push(Segment::Literal(&source[literal_start..]));
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn renders_named_placeholders() {
        let template = PromptTemplate::new("Report for {topic} based on: {guidance_text}");
        let rendered = template
            .render(&ctx(&[("topic", "Infusion Pump"), ("guidance_text", "Section 5")]))
            .unwrap();
        assert_eq!(rendered, "Report for Infusion Pump based on: Section 5");
    }

    #[test]
    fn repeated_placeholder_is_substituted_everywhere() {
        let rendered = render_with("{x} and {x}", "x", "y").unwrap();
        assert_eq!(rendered, "y and y");
    }

    #[test]
    fn doubled_braces_render_literally() {
        let rendered = render_with("JSON: {{\"k\": \"{v}\"}}", "v", "1").unwrap();
        assert_eq!(rendered, "JSON: {\"k\": \"1\"}");
    }

    #[test]
    fn missing_variable_is_reported_by_name() {
        let err = PromptTemplate::new("Review {mock_report} using {guideline}")
            .render(&ctx(&[("mock_report", "r")]))
            .unwrap_err();
        assert_eq!(err, TemplateError::MissingVariable("guideline".to_string()));
        assert!(err.to_string().contains("guideline"));
    }

    #[test]
    fn extra_context_values_are_ignored() {
        let rendered = PromptTemplate::new("Only {a}")
            .render(&ctx(&[("a", "1"), ("b", "2")]))
            .unwrap();
        assert_eq!(rendered, "Only 1");
    }

    #[test]
    fn template_without_placeholders_is_returned_unchanged() {
        let rendered = render_with("Summarize the document.", "input_text", "ignored").unwrap();
        assert_eq!(rendered, "Summarize the document.");
    }

    #[test]
    fn format_spec_is_ignored() {
        let rendered = render_with("[{name:>10}] [{name!r}]", "name", "v").unwrap();
        assert_eq!(rendered, "[v] [v]");
    }

    #[test]
    fn positional_placeholders_are_rejected() {
        assert_eq!(
            render_with("a {} b", "x", "y").unwrap_err(),
            TemplateError::Positional(2)
        );
        assert!(matches!(
            render_with("{0}", "x", "y"),
            Err(TemplateError::Positional(0))
        ));
    }

    #[test]
    fn unbalanced_braces_are_rejected() {
        assert!(matches!(
            render_with("open {x", "x", "y"),
            Err(TemplateError::Unbalanced { brace: '{', .. })
        ));
        assert!(matches!(
            render_with("close x}", "x", "y"),
            Err(TemplateError::Unbalanced { brace: '}', .. })
        ));
    }

    #[test]
    fn placeholders_are_listed_once_in_order() {
        let names = PromptTemplate::new("{b} {a} {b} {{literal}}")
            .placeholders()
            .unwrap();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn multibyte_text_is_preserved() {
        let rendered = render_with("📋 {x} → ✅", "x", "médical").unwrap();
        assert_eq!(rendered, "📋 médical → ✅");
    }
}
