use std::cmp::Ordering;

const REF_PREFIXES: [&str; 2] = ["#/components/schemas/", "#/definitions/"];

/// Turn a schema key or `$ref` into the identifier used for its type.
///
/// - `#/definitions/Foo` → `Foo`
/// - `Page«User»` → `Page<User>`
/// - `List<User>` → `Array<User>`
/// - `foo.bar`, `foo-bar`, `foo_bar` → `fooBar`
///
/// Applying it twice gives the same result as applying it once.
pub fn sanitize_name(raw: &str) -> String {
    let stripped = REF_PREFIXES
        .iter()
        .find_map(|prefix| raw.strip_prefix(prefix))
        .unwrap_or(raw);
    let angled = stripped.replace('«', "<").replace('»', ">");
    let arrays = rename_list_generics(&angled);
    let kept: String = arrays
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "_$<>, .-".contains(*c))
        .collect();
    let camel = camel_case(&kept);
    let cleaned: String = camel.chars().filter(|c| *c != '.' && *c != '-').collect();
    cleaned.trim_end_matches(' ').to_string()
}

/// Upper-case a letter that follows a run of `-`, `_`, `.` or space,
/// dropping the run.
pub fn camel_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut pending = String::new();
    for ch in input.chars() {
        if matches!(ch, '-' | '_' | '.' | ' ') {
            pending.push(ch);
        } else if !pending.is_empty() && ch.is_ascii_alphabetic() {
            pending.clear();
            result.push(ch.to_ascii_uppercase());
        } else {
            result.push_str(&pending);
            pending.clear();
            result.push(ch);
        }
    }
    result.push_str(&pending);
    result
}

/// A parameter name as a usable TypeScript identifier.
pub fn value_identifier(name: &str) -> String {
    let ident: String = camel_case(name)
        .chars()
        .filter(|c| is_identifier_char(*c))
        .collect();
    match ident.chars().next() {
        None => "_".to_string(),
        Some(first) if first.is_ascii_digit() => format!("_{ident}"),
        Some(_) => ident,
    }
}

/// Whether `name` can be written as a bare property key.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(is_identifier_char)
        }
        _ => false,
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

fn rename_list_generics(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(index) = rest.find("List<") {
        let boundary = rest[..index]
            .chars()
            .next_back()
            .is_none_or(|prev| !is_identifier_char(prev));
        result.push_str(&rest[..index]);
        result.push_str(if boundary { "Array<" } else { "List<" });
        rest = &rest[index + "List<".len()..];
    }
    result.push_str(rest);
    result
}

/// Locale-style ordering: punctuation before digits before letters,
/// case-insensitive first, then lowercase before uppercase.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let primary = |s: &str| -> Vec<(u8, char)> {
        s.chars()
            .map(|c| {
                let class = if c.is_alphabetic() {
                    2
                } else if c.is_ascii_digit() {
                    1
                } else {
                    0
                };
                (class, c.to_ascii_lowercase())
            })
            .collect()
    };
    primary(a).cmp(&primary(b)).then_with(|| {
        // Only case differs from here on; lowercase sorts first.
        a.chars()
            .zip(b.chars())
            .find(|(x, y)| x != y)
            .map(|(x, y)| y.is_ascii_lowercase().cmp(&x.is_ascii_lowercase()))
            .unwrap_or(Ordering::Equal)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_ref_prefixes() {
        assert_eq!(sanitize_name("#/definitions/User"), "User");
        assert_eq!(sanitize_name("#/components/schemas/User"), "User");
    }

    #[test]
    fn test_guillemets_become_angle_brackets() {
        assert_eq!(sanitize_name("Page«User»"), "Page<User>");
    }

    #[test]
    fn test_list_becomes_array() {
        assert_eq!(sanitize_name("List«User»"), "Array<User>");
        assert_eq!(sanitize_name("Page«List«User»»"), "Page<Array<User>>");
        assert_eq!(sanitize_name("TodoList<Item>"), "TodoList<Item>");
    }

    #[test]
    fn test_separators_camel_case() {
        assert_eq!(sanitize_name("foo.bar"), "fooBar");
        assert_eq!(sanitize_name("foo-bar"), "fooBar");
        assert_eq!(sanitize_name("foo_bar"), "fooBar");
        assert_eq!(sanitize_name("com.example.UserDto"), "comExampleUserDto");
    }

    #[test]
    fn test_drops_invalid_chars() {
        assert_eq!(sanitize_name("User (v2)"), "UserV2");
        assert_eq!(sanitize_name("Map«string,User»"), "Map<string,User>");
        assert_eq!(sanitize_name("Result«Map«String, int»» "), "Result<Map<String,Int>>");
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "#/definitions/Page«List«com.example.User»»",
            "foo_bar-baz.qux",
            "Map«string, List«int»»",
            "a_1",
            "weird name  ",
        ] {
            let once = sanitize_name(raw);
            assert_eq!(sanitize_name(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(sanitize_name("«»"), "<>");
        assert_eq!(sanitize_name("#/definitions/"), "");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("user_id"), "userId");
        assert_eq!(camel_case("X-Request-Id"), "XRequestId");
        assert_eq!(camel_case("$body"), "$body");
        assert_eq!(camel_case("a_1"), "a_1");
    }

    #[test]
    fn test_value_identifier() {
        assert_eq!(value_identifier("user_id"), "userId");
        assert_eq!(value_identifier("filter[name]"), "filtername");
        assert_eq!(value_identifier("2fa"), "_2fa");
        assert_eq!(value_identifier("$config"), "$config");
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("users"));
        assert!(is_identifier("$root"));
        assert!(is_identifier("_id"));
        assert!(!is_identifier("content-type"));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_compare_names() {
        let mut names = vec!["b", "B", "a", "_x", "10", "Apple"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["_x", "10", "a", "Apple", "b", "B"]);
    }
}
