//! Accessor object as data. Documentation stays attached to the property
//! it describes until [`render_object`] lays out the final text.

use tsw_core::transform::name_sanitizer::is_identifier;

use crate::doc::render_block;

const INDENT: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeNode {
    Object(Vec<Property>),
    /// A complete single-line expression, typically an arrow function.
    Call(String),
    Curried(Curried),
}

/// `(param: type) => ({ body })`, merged with `members` through
/// `Object.assign` when the key also has literal children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curried {
    pub param: String,
    pub param_type: String,
    pub body: Vec<Property>,
    pub members: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub doc: Option<String>,
    pub value: CodeNode,
}

impl Property {
    fn render(&self, depth: usize) -> String {
        let pad = INDENT.repeat(depth);
        let mut out = String::new();
        if let Some(block) = self.doc.as_deref().and_then(|doc| render_block(doc, &pad)) {
            out.push_str(&block);
            out.push('\n');
        }
        out.push_str(&pad);
        out.push_str(&property_key(&self.key));
        out.push_str(": ");
        out.push_str(&self.value.render(depth));
        out
    }
}

impl CodeNode {
    /// Render with nested lines indented one level deeper than `depth`.
    pub fn render(&self, depth: usize) -> String {
        match self {
            CodeNode::Object(properties) => render_object(properties, depth),
            CodeNode::Call(code) => code.clone(),
            CodeNode::Curried(curried) => {
                let function = format!(
                    "({}: {}) => ({})",
                    curried.param,
                    curried.param_type,
                    render_object(&curried.body, depth)
                );
                if curried.members.is_empty() {
                    function
                } else {
                    format!(
                        "Object.assign({function}, {})",
                        render_object(&curried.members, depth)
                    )
                }
            }
        }
    }
}

/// Render properties as an object literal whose closing brace sits at
/// `depth`.
pub fn render_object(properties: &[Property], depth: usize) -> String {
    if properties.is_empty() {
        return "{}".to_string();
    }
    let lines: Vec<String> = properties.iter().map(|p| p.render(depth + 1)).collect();
    format!("{{\n{}\n{}}}", lines.join(",\n"), INDENT.repeat(depth))
}

fn property_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        format!("'{}'", key.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(key: &str, code: &str, doc: Option<&str>) -> Property {
        Property {
            key: key.to_string(),
            doc: doc.map(str::to_string),
            value: CodeNode::Call(code.to_string()),
        }
    }

    #[test]
    fn test_render_nested_object_with_docs() {
        let tree = vec![Property {
            key: "users".into(),
            doc: None,
            value: CodeNode::Object(vec![call("get", "() => 1", Some("List users"))]),
        }];
        assert_eq!(
            render_object(&tree, 0),
            "{\n  users: {\n    /** List users */\n    get: () => 1\n  }\n}"
        );
    }

    #[test]
    fn test_render_curried_with_members() {
        let tree = vec![Property {
            key: "id".into(),
            doc: Some("@param id  User id".into()),
            value: CodeNode::Curried(Curried {
                param: "id".into(),
                param_type: "integer".into(),
                body: vec![call("get", "() => 2", None)],
                members: vec![call("list", "() => 3", None)],
            }),
        }];
        assert_eq!(
            render_object(&tree, 0),
            "{\n  /** @param id  User id */\n  id: Object.assign((id: integer) => ({\n    get: () => 2\n  }), {\n    list: () => 3\n  })\n}"
        );
    }

    #[test]
    fn test_multi_line_doc_is_indented() {
        let tree = vec![call("get", "() => 1", Some("One\nTwo"))];
        assert_eq!(
            render_object(&tree, 1),
            "{\n    /**\n     * One\n     * Two\n     */\n    get: () => 1\n  }"
        );
    }

    #[test]
    fn test_quoted_keys() {
        let tree = vec![call("2fa", "() => 1", None)];
        assert_eq!(render_object(&tree, 0), "{\n  '2fa': () => 1\n}");
    }
}
