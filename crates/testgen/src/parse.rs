//! Best-effort parsing of the generation service's reply.
//!
//! Two shapes are understood:
//! - a JSON object with `code`, `description`, `edgeCases` and
//!   `estimatedCoverage` (snake_case accepted too)
//! - free-form text: the first fenced code block is the code, a
//!   `Description:` section (or the prose before the code) is the
//!   description, bullet lines under an `Edge Cases` heading are the edge
//!   cases, and the first integer on a `Coverage` line is the coverage
//!
//! Parsing never fails; missing or mistyped sections fall back to the
//! [`GeneratedSuite`] defaults.

use serde_json::Value as JsonValue;

use crate::suite::GeneratedSuite;

pub fn parse_response(raw: &str) -> GeneratedSuite {
    if let Ok(JsonValue::Object(obj)) = serde_json::from_str::<JsonValue>(raw.trim()) {
        return from_json(&obj);
    }
    from_text(raw)
}

fn from_json(obj: &serde_json::Map<String, JsonValue>) -> GeneratedSuite {
    let field = |camel: &str, snake: &str| obj.get(camel).or_else(|| obj.get(snake));

    let text = |v: Option<&JsonValue>| {
        v.and_then(JsonValue::as_str)
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let edge_cases = field("edgeCases", "edge_cases")
        .and_then(JsonValue::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(JsonValue::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let estimated_coverage = match field("estimatedCoverage", "estimated_coverage") {
        Some(JsonValue::Number(n)) => n
            .as_f64()
            .map(|f| clamp_coverage(f.round()))
            .unwrap_or(0),
        Some(JsonValue::String(s)) => first_percentage(s).unwrap_or(0),
        _ => 0,
    };

    GeneratedSuite {
        code: text(field("code", "code")),
        description: text(field("description", "description")),
        edge_cases,
        estimated_coverage,
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Section {
    Preamble,
    Description,
    EdgeCases,
    Other,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Fence {
    Outside,
    InFirst,
    InOther,
}

enum Marker<'a> {
    Description(&'a str),
    EdgeCases,
    Coverage(&'a str),
    Heading,
}

fn from_text(raw: &str) -> GeneratedSuite {
    let mut section = Section::Preamble;
    let mut fence = Fence::Outside;
    let mut code: Option<Vec<&str>> = None;
    let mut preamble: Vec<&str> = Vec::new();
    let mut description: Vec<&str> = Vec::new();
    let mut edge_cases: Vec<String> = Vec::new();
    let mut coverage: Option<u8> = None;

    for line in raw.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            fence = match fence {
                Fence::Outside if code.is_none() => {
                    code = Some(Vec::new());
                    section = Section::Other;
                    Fence::InFirst
                }
                Fence::Outside => Fence::InOther,
                Fence::InFirst | Fence::InOther => Fence::Outside,
            };
            continue;
        }

        match fence {
            Fence::InFirst => {
                if let Some(lines) = code.as_mut() {
                    lines.push(line);
                }
                continue;
            }
            Fence::InOther => continue,
            Fence::Outside => {}
        }

        if let Some(marker) = marker(trimmed) {
            match marker {
                Marker::Description(rest) => {
                    section = Section::Description;
                    if !rest.is_empty() {
                        description.push(rest);
                    }
                }
                Marker::EdgeCases => section = Section::EdgeCases,
                Marker::Coverage(rest) => {
                    if coverage.is_none() {
                        coverage = first_percentage(rest);
                    }
                    section = Section::Other;
                }
                Marker::Heading => section = Section::Other,
            }
            continue;
        }

        match section {
            Section::Preamble => {
                if !trimmed.is_empty() {
                    preamble.push(trimmed);
                }
            }
            Section::Description => {
                if trimmed.is_empty() {
                    if !description.is_empty() {
                        section = Section::Other;
                    }
                } else {
                    description.push(trimmed);
                }
            }
            Section::EdgeCases => {
                if trimmed.is_empty() {
                    continue;
                }
                match bullet(trimmed) {
                    Some(item) => edge_cases.push(item.to_string()),
                    None => section = Section::Other,
                }
            }
            Section::Other => {}
        }
    }

    let description = if description.is_empty() {
        preamble.join("\n")
    } else {
        description.join("\n")
    };

    GeneratedSuite {
        code: code.map(|lines| lines.join("\n")).unwrap_or_default(),
        description,
        edge_cases,
        estimated_coverage: coverage.unwrap_or(0),
    }
}

/// Recognize a section marker: a `#` heading, or `Keyword:` on its own line.
fn marker(trimmed: &str) -> Option<Marker<'_>> {
    let is_heading = trimmed.starts_with('#');
    let stripped = trimmed.trim_start_matches(['#', '*', '_', ' ']);
    let normalized = stripped.to_ascii_lowercase().replace('_', " ");

    let colon = stripped.find(':');
    if !is_heading && colon.is_none() {
        return None;
    }
    let rest = colon
        .map(|i| stripped[i + 1..].trim().trim_matches(['*', '_']).trim())
        .unwrap_or("");

    if normalized.starts_with("description") {
        Some(Marker::Description(rest))
    } else if normalized.starts_with("edge cases") || normalized.starts_with("edge-cases") {
        Some(Marker::EdgeCases)
    } else if normalized.starts_with("coverage")
        || normalized.starts_with("estimated coverage")
        || normalized.starts_with("estimated test coverage")
    {
        Some(Marker::Coverage(if rest.is_empty() { stripped } else { rest }))
    } else if is_heading {
        Some(Marker::Heading)
    } else {
        None
    }
}

/// Text of a `-`, `*`, `+`, `•` or `1.`/`1)` list item.
fn bullet(trimmed: &str) -> Option<&str> {
    for prefix in ["- ", "* ", "+ ", "• "] {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return non_empty(rest);
        }
    }

    let digits = trimmed.find(|c: char| !c.is_ascii_digit())?;
    if digits == 0 {
        return None;
    }
    let rest = &trimmed[digits..];
    let rest = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))?;
    non_empty(rest)
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s) }
}

/// First integer in `s`, clamped to 0..=100. A leading `-` clamps to 0.
fn first_percentage(s: &str) -> Option<u8> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let negative = s[..start].ends_with('-');
    let digits: String = s[start..].chars().take_while(char::is_ascii_digit).collect();
    let value = digits.parse::<u64>().unwrap_or(u64::MAX);
    if negative {
        return Some(0);
    }
    Some(value.min(100) as u8)
}

fn clamp_coverage(f: f64) -> u8 {
    if f.is_nan() || f <= 0.0 {
        0
    } else if f >= 100.0 {
        100
    } else {
        f as u8
    }
}
