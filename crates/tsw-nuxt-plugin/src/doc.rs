use std::cmp::Ordering;

use tsw_core::ir::{Operation, SchemaMeta};

use crate::params::Argument;

/// Render documentation text as a `/** ... */` block, each line prefixed
/// with `indent`. Returns `None` when there is nothing to say.
///
/// `<br>` tags become line breaks and `*/` is escaped so the block cannot
/// be closed early.
pub fn render_block(text: &str, indent: &str) -> Option<String> {
    let text = normalize_text(text);
    if text.is_empty() {
        return None;
    }
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() == 1 {
        return Some(format!("{indent}/** {} */", lines[0]));
    }
    let mut block = format!("{indent}/**\n");
    for line in lines {
        block.push_str(format!("{indent} * {line}").trim_end());
        block.push('\n');
    }
    block.push_str(&format!("{indent} */"));
    Some(block)
}

fn normalize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text.trim();
    while let Some((index, tag_len)) = find_break(rest) {
        result.push_str(&rest[..index]);
        result.push('\n');
        rest = rest[index + tag_len..].trim_start_matches([' ', '\t']);
    }
    result.push_str(rest);
    result.trim().replace("*/", "*\\/")
}

fn find_break(text: &str) -> Option<(usize, usize)> {
    let lower = text.to_ascii_lowercase();
    let open = lower.find("<br>").map(|i| (i, 4));
    let closed = lower.find("<br/>").map(|i| (i, 5));
    match (open, closed) {
        (Some(a), Some(b)) => Some(if a.0 < b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// Free text for an example or other JSON value: strings verbatim, anything
/// else as compact JSON.
pub fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Title, description and example of a schema, combined.
pub fn schema_doc(meta: &SchemaMeta) -> Option<String> {
    let title = meta.title.as_deref().map(str::trim).unwrap_or("");
    let description = meta.description.as_deref().map(str::trim).unwrap_or("");
    let mut text = match (title.is_empty(), description.is_empty()) {
        (false, false) => {
            let separator = if description.contains('\n') { "\n" } else { " - " };
            format!("{title}{separator}{description}")
        }
        (false, true) => title.to_string(),
        (true, false) => description.to_string(),
        (true, true) => String::new(),
    };
    let example = meta.example.as_ref().map(value_text).unwrap_or_default();
    let example = example.trim();
    if !example.is_empty() {
        let multiline = text.contains('\n') || example.contains('\n');
        text.push_str("\n@example");
        text.push_str(if multiline { "\n" } else { "  " });
        text.push_str(example);
    }
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// `@param` lines for a call's arguments.
///
/// A bundled argument is documented as `arg<i>` followed by one
/// `arg<i>.<name>` line per described member. Trailing undocumented
/// arguments are left out.
pub fn params_doc(args: &[Argument]) -> String {
    let mut entries: Vec<(String, String)> = Vec::new();
    for (i, arg) in args.iter().enumerate() {
        match arg {
            Argument::Single(param) => {
                entries.push((param.val_name.clone(), param.description.trim().to_string()));
            }
            Argument::Bundle(members) => {
                let described: Vec<_> = members
                    .iter()
                    .filter(|m| !m.description.trim().is_empty())
                    .collect();
                if described.is_empty() {
                    continue;
                }
                entries.push((format!("arg{i}"), String::new()));
                for member in described {
                    entries.push((
                        format!("arg{i}.{}", member.val_name),
                        member.description.trim().to_string(),
                    ));
                }
            }
        }
    }
    let documented = entries
        .iter()
        .rposition(|(_, description)| !description.is_empty())
        .map_or(0, |last| last + 1);
    entries[..documented]
        .iter()
        .map(|(name, description)| {
            if description.is_empty() {
                format!("@param {name}")
            } else {
                format!("@param {name}  {description}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_useless(description: &str) -> bool {
    description.eq_ignore_ascii_case("ok") || description.eq_ignore_ascii_case("successful")
}

/// Numeric status codes ascending, then the rest in document order.
fn compare_status(a: &str, b: &str) -> Ordering {
    match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => Ordering::Equal,
    }
}

/// Documentation for one call site.
///
/// Paragraphs: the description (or the summary when there is none), the
/// non-trivial responses as `code: description` lines, then the `@param`,
/// `@returns`, `@summary` and `@deprecated` tags.
pub fn operation_doc(op: &Operation, args: &[Argument]) -> Option<String> {
    let response = op
        .responses
        .get("200")
        .or_else(|| op.responses.get("default"));
    let response_description = response
        .and_then(|r| r.description.as_deref())
        .map(str::trim)
        .unwrap_or("");
    let useless = is_useless(response_description);
    let returns = if !useless && !response_description.is_empty() {
        format!("@returns {response_description}")
    } else {
        String::new()
    };

    let mut statuses: Vec<&String> = op.responses.keys().collect();
    statuses.sort_by(|a, b| compare_status(a, b));
    let response_lines: Vec<String> = if statuses.len() == 1 && useless {
        Vec::new()
    } else {
        statuses
            .into_iter()
            .filter_map(|status| {
                let candidate = &op.responses[status];
                let description = candidate.description.as_deref().map(str::trim).unwrap_or("");
                let documented_as_returns =
                    !returns.is_empty() && response.is_some_and(|r| std::ptr::eq(r, candidate));
                if description.is_empty() || documented_as_returns {
                    None
                } else {
                    Some(format!("{status}: {description}"))
                }
            })
            .collect()
    };

    let summary = op.summary.as_deref().map(str::trim).unwrap_or("");
    let description = op.description.as_deref().map(str::trim).unwrap_or("");
    let (description, summary) = if description.is_empty() {
        (summary, "")
    } else {
        (description, summary)
    };

    let tags: Vec<String> = [
        params_doc(args),
        returns,
        if summary.is_empty() {
            String::new()
        } else {
            format!("@summary {summary}")
        },
        if op.deprecated {
            "@deprecated".to_string()
        } else {
            String::new()
        },
    ]
    .into_iter()
    .filter(|tag| !tag.is_empty())
    .collect();

    let text = [
        description.to_string(),
        response_lines.join("\n"),
        tags.join("\n"),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join("\n\n");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
