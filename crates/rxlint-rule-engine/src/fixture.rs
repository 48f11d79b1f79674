//! Fixture mini-language for rule tests
//!
//! A fixture is source text with annotation lines under the code they
//! describe:
//!
//! ```text
//! a.subscribe(v => b.subscribe());
//!                    ~~~~~~~~~ [forbidden]
//! ```
//!
//! An annotation line holds a run of `~` or `^` markers covering the expected
//! span, then `[messageId]`. The brackets may also carry a JSON object of
//! template data and `suggest` followed by suggestion indices:
//! `[forbidden {"name": "tap"} suggest 0]`. Annotations attach to the closest
//! preceding source line and are removed from the cleaned source.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixtureError {
    #[error("annotation on fixture line {line} has no source line above it")]
    MissingSourceLine { line: usize },

    #[error("malformed annotation on fixture line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("markers on fixture line {line} extend past the end of the annotated line")]
    MarkerOutOfRange { line: usize },
}

/// A diagnostic a fixture expects, with 1-based positions in the cleaned
/// source. `end_column` is one past the last marked character.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedDiagnostic {
    pub message_id: String,
    pub data: Option<Map<String, Value>>,
    pub line: u32,
    pub column: u32,
    pub end_line: u32,
    pub end_column: u32,
    /// Present when the annotation carries `suggest`.
    pub suggestions: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    /// Source with every annotation line removed.
    pub source: String,
    pub expected: Vec<ExpectedDiagnostic>,
}

/// Split a fixture into clean source and expected diagnostics.
pub fn parse_fixture(text: &str) -> Result<Fixture, FixtureError> {
    let mut kept: Vec<&str> = Vec::new();
    let mut expected = Vec::new();

    for (index, raw) in text.split('\n').enumerate() {
        let fixture_line = index + 1;
        let Some(annotation) = split_annotation(raw.trim_end_matches('\r')) else {
            kept.push(raw);
            continue;
        };

        let Some(annotated) = kept.last() else {
            return Err(FixtureError::MissingSourceLine { line: fixture_line });
        };
        let width = annotated.trim_end_matches('\r').chars().count();
        if annotation.end > width {
            return Err(FixtureError::MarkerOutOfRange { line: fixture_line });
        }

        let body = parse_body(annotation.body).map_err(|message| FixtureError::Malformed {
            line: fixture_line,
            message,
        })?;

        let line = kept.len() as u32;
        expected.push(ExpectedDiagnostic {
            message_id: body.message_id,
            data: body.data,
            line,
            column: annotation.start as u32 + 1,
            end_line: line,
            end_column: annotation.end as u32 + 1,
            suggestions: body.suggestions,
        });
    }

    Ok(Fixture {
        source: kept.join("\n"),
        expected,
    })
}

struct Annotation<'a> {
    /// Character offsets of the marker run, end exclusive.
    start: usize,
    end: usize,
    /// Text between the brackets.
    body: &'a str,
}

/// Recognize `<ws><markers><ws>[...]<ws>`. Anything else is source.
fn split_annotation(line: &str) -> Option<Annotation<'_>> {
    let trimmed = line.trim_start();
    let indent = line.len() - trimmed.len();
    let markers = trimmed
        .find(|c| c != '~' && c != '^')
        .unwrap_or(trimmed.len());
    if markers == 0 {
        return None;
    }

    let rest = trimmed[markers..].trim_start();
    let rest = rest.trim_end();
    if !rest.starts_with('[') || !rest.ends_with(']') || rest.len() < 2 {
        return None;
    }

    let start = line[..indent].chars().count();
    Some(Annotation {
        start,
        end: start + markers,
        body: &rest[1..rest.len() - 1],
    })
}

struct Body {
    message_id: String,
    data: Option<Map<String, Value>>,
    suggestions: Option<Vec<usize>>,
}

fn parse_body(body: &str) -> Result<Body, String> {
    let body = body.trim();
    let id_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(body.len());
    if id_len == 0 {
        return Err("expected a message id".to_string());
    }
    let message_id = body[..id_len].to_string();
    let mut rest = body[id_len..].trim_start();

    let mut data = None;
    if rest.starts_with('{') {
        let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Object(map))) => {
                data = Some(map);
                rest = rest[stream.byte_offset()..].trim_start();
            }
            Some(Ok(_)) => return Err("template data must be a JSON object".to_string()),
            Some(Err(e)) => return Err(format!("invalid template data: {}", e)),
            None => return Err("expected template data".to_string()),
        }
    }

    let mut suggestions = None;
    if !rest.is_empty() {
        let mut words = rest.split_whitespace();
        if words.next() != Some("suggest") {
            return Err(format!("unexpected '{}'", rest));
        }
        let indices = words
            .map(|word| {
                word.parse::<usize>()
                    .map_err(|_| format!("invalid suggestion index '{}'", word))
            })
            .collect::<Result<Vec<_>, _>>()?;
        suggestions = Some(indices);
    }

    Ok(Body {
        message_id,
        data,
        suggestions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_annotation() {
        let fixture = parse_fixture(
            "a.subscribe(v => b.subscribe());\n                   ~~~~~~~~~ [forbidden]\n",
        )
        .unwrap();
        assert_eq!(fixture.source, "a.subscribe(v => b.subscribe());\n");
        assert_eq!(fixture.expected.len(), 1);
        let e = &fixture.expected[0];
        assert_eq!(e.message_id, "forbidden");
        assert_eq!((e.line, e.column, e.end_line, e.end_column), (1, 20, 1, 29));
        assert_eq!(e.data, None);
        assert_eq!(e.suggestions, None);
    }

    #[test]
    fn test_annotation_binds_to_closest_source_line() {
        let text = "const a = 1;\nconst b = a.value;\n            ~~~~~ [forbidden]\n            ^^^^^ [other]\nb;";
        let fixture = parse_fixture(text).unwrap();
        assert_eq!(fixture.source, "const a = 1;\nconst b = a.value;\nb;");
        assert!(fixture.expected.iter().all(|e| e.line == 2));
        assert_eq!(fixture.expected[1].message_id, "other");
    }

    #[test]
    fn test_data_and_suggestions() {
        let text = "import { tap } from \"rxjs\";\n         ~~~ [forbidden {\"name\": \"tap\", \"explanation\": \"\"} suggest 0 1]";
        let fixture = parse_fixture(text).unwrap();
        let e = &fixture.expected[0];
        assert_eq!(e.data.as_ref().unwrap()["name"], "tap");
        assert_eq!(e.suggestions, Some(vec![0, 1]));
        assert_eq!((e.column, e.end_column), (10, 13));
    }

    #[test]
    fn test_bare_suggest() {
        let fixture = parse_fixture("x\n~ [forbidden suggest]").unwrap();
        assert_eq!(fixture.expected[0].suggestions, Some(vec![]));
    }

    #[test]
    fn test_annotation_without_source_line() {
        assert_eq!(
            parse_fixture("~~~ [forbidden]\nabc"),
            Err(FixtureError::MissingSourceLine { line: 1 })
        );
    }

    #[test]
    fn test_malformed_annotations() {
        assert!(matches!(
            parse_fixture("abc\n~~~ [ {\"a\": 1}]"),
            Err(FixtureError::Malformed { line: 2, .. })
        ));
        assert!(matches!(
            parse_fixture("abc\n~~~ [forbidden {\"a\": }]"),
            Err(FixtureError::Malformed { .. })
        ));
        assert!(matches!(
            parse_fixture("abc\n~~~ [forbidden please]"),
            Err(FixtureError::Malformed { .. })
        ));
        assert!(matches!(
            parse_fixture("abc\n~~~ [forbidden suggest x]"),
            Err(FixtureError::Malformed { .. })
        ));
    }

    #[test]
    fn test_marker_out_of_range() {
        assert_eq!(
            parse_fixture("ab\n~~~ [forbidden]"),
            Err(FixtureError::MarkerOutOfRange { line: 2 })
        );
    }

    #[test]
    fn test_code_starting_with_tilde_is_source() {
        let fixture = parse_fixture("~a [0];\nx").unwrap();
        assert_eq!(fixture.source, "~a [0];\nx");
        assert!(fixture.expected.is_empty());
    }

    proptest! {
        #[test]
        fn prop_annotations_locate_marked_columns(
            lines in proptest::collection::vec("[a-z(). ;]{1,30}", 1..6),
            picks in proptest::collection::vec((0usize..6, 0usize..30, 1usize..10), 0..4),
        ) {
            let mut text = Vec::new();
            let mut want = Vec::new();
            for (i, line) in lines.iter().enumerate() {
                text.push(line.clone());
                for (target, start, len) in &picks {
                    if *target != i {
                        continue;
                    }
                    let start = (*start).min(line.len() - 1);
                    let end = (start + len).min(line.len());
                    text.push(format!("{}{} [m]", " ".repeat(start), "~".repeat(end - start)));
                    want.push((i as u32 + 1, start as u32 + 1, end as u32 + 1));
                }
            }

            let fixture = parse_fixture(&text.join("\n")).unwrap();
            prop_assert_eq!(fixture.source, lines.join("\n"));
            let got: Vec<_> = fixture
                .expected
                .iter()
                .map(|e| (e.line, e.column, e.end_column))
                .collect();
            prop_assert_eq!(got, want);
        }
    }
}
