use indexmap::IndexMap;
use indexmap::map::Entry;
use tsw_core::config::ArgumentForm;
use tsw_core::ir::Operation;
use tsw_core::transform::name_sanitizer::{compare_names, value_identifier};

/// Key used for a path that ends in `/`.
pub const ROOT_KEY: &str = "$root";

/// One step from a node to its child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    /// Descend into the function bound by the preceding key's path
    /// parameter (default form only).
    Curry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathEntry {
    Branch(PathNode),
    /// Index into the operation list the tree was built from.
    Leaf(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathNode {
    pub entries: IndexMap<String, PathEntry>,
    /// Subtree reached by calling this node with its path parameter.
    pub curried: Option<Box<PathNode>>,
}

/// Operations arranged by URL segment, with HTTP verbs as leaf keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTree {
    pub root: PathNode,
}

impl PathTree {
    /// Paths are visited in locale order. The default form keeps each
    /// path's verbs in document order, the underscore form sorts them.
    pub fn build(operations: &[Operation], base_path: &str, form: ArgumentForm) -> Self {
        let mut order: Vec<usize> = (0..operations.len()).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&operations[a], &operations[b]);
            let by_path = compare_names(&a.path, &b.path);
            match form {
                ArgumentForm::Default => by_path,
                ArgumentForm::Underscore => {
                    by_path.then_with(|| compare_names(a.method.as_str(), b.method.as_str()))
                }
            }
        });

        let mut tree = PathTree::default();
        for index in order {
            let op = &operations[index];
            let segments = path_segments(&op.path, base_path, form);
            insert(&mut tree.root, &segments, op.method.as_str(), index);
        }
        tree
    }
}

fn insert(node: &mut PathNode, segments: &[Segment], verb: &str, index: usize) {
    match segments.split_first() {
        None => match node.entries.entry(verb.to_string()) {
            Entry::Occupied(_) => {
                log::warn!("`{verb}` is already defined at this path, skipping a duplicate operation");
            }
            Entry::Vacant(slot) => {
                slot.insert(PathEntry::Leaf(index));
            }
        },
        Some((Segment::Curry, rest)) => {
            let child = node.curried.get_or_insert_with(Box::default);
            insert(child, rest, verb, index);
        }
        Some((Segment::Key(key), rest)) => {
            let entry = node
                .entries
                .entry(key.clone())
                .or_insert_with(|| PathEntry::Branch(PathNode::default()));
            match entry {
                PathEntry::Branch(child) => insert(child, rest, verb, index),
                PathEntry::Leaf(_) => {
                    log::warn!("`{key}` is both an operation and a path segment, skipping the path");
                }
            }
        }
    }
}

/// Accessor keys for a URL path.
///
/// The base path prefix is stripped, characters other than word
/// characters, `/`, `{` and `}` become `_`, and `snake_case` runs become
/// camel case. The default form moves a leading `vN` segment to the end
/// and turns `{param}` into a key followed by [`Segment::Curry`]; the
/// underscore form turns it into the key `_param`.
pub fn path_segments(path: &str, base_path: &str, form: ArgumentForm) -> Vec<Segment> {
    let stripped = match path.strip_prefix(base_path) {
        Some(rest) if !base_path.is_empty() && rest.starts_with('/') => rest,
        _ => path,
    };
    let cleaned: String = stripped
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '/' | '{' | '}') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let camel = snake_to_camel(&cleaned);

    let mut raw: Vec<&str> = camel.split('/').collect();
    if raw.first() == Some(&"") {
        raw.remove(0);
    }
    let trailing_slash = raw.last() == Some(&"");
    let mut parts: Vec<&str> = raw.into_iter().filter(|s| !s.is_empty()).collect();
    if form == ArgumentForm::Default && parts.len() > 1 && is_version(parts[0]) {
        let version = parts.remove(0);
        parts.push(version);
    }
    if trailing_slash {
        parts.push(ROOT_KEY);
    }

    let mut segments = Vec::new();
    for part in parts {
        match part.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
            Some(name) if !name.contains(['{', '}']) => {
                let ident = value_identifier(name);
                match form {
                    ArgumentForm::Default => {
                        segments.push(Segment::Key(ident));
                        segments.push(Segment::Curry);
                    }
                    ArgumentForm::Underscore => segments.push(Segment::Key(format!("_{ident}"))),
                }
            }
            _ => {
                let key = part.replace(['{', '}'], "");
                if !key.is_empty() {
                    segments.push(Segment::Key(key));
                }
            }
        }
    }
    segments
}

/// Path parameter identifiers bound by curried functions along `path`.
pub fn curried_parameters(path: &str, base_path: &str, form: ArgumentForm) -> Vec<String> {
    let segments = path_segments(path, base_path, form);
    segments
        .windows(2)
        .filter_map(|pair| match pair {
            [Segment::Key(key), Segment::Curry] => Some(key.clone()),
            _ => None,
        })
        .collect()
}

fn is_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

/// `a_b` → `aB` where the `_` sits between a lowercase letter or digit and
/// a lowercase letter. Matches do not overlap: `a_b_c` → `aB_c`.
fn snake_to_camel(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut result = String::with_capacity(input.len());
    let mut upper_next = false;
    for (i, &c) in chars.iter().enumerate() {
        if upper_next {
            result.push(c.to_ascii_uppercase());
            upper_next = false;
            continue;
        }
        // The letter a join upper-cases cannot start the next match.
        let joins = c == '_'
            && result
                .chars()
                .next_back()
                .is_some_and(|prev| prev.is_ascii_lowercase() || prev.is_ascii_digit())
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
        if joins {
            upper_next = true;
        } else {
            result.push(c);
        }
    }
    result
}
