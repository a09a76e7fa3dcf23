//! CSS selector subset used by component queries
//!
//! Supported: type (`div`), universal (`*`), class (`.bar`), id (`#main`),
//! attribute presence and equality (`[data-index]`, `[data-index="3"]`),
//! compound selectors, descendant (` `) and child (`>`) combinators, and
//! comma-separated lists.

use super::{NodeId, RenderTree};

/// Error returned for selectors outside the supported subset
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid selector {selector:?}: {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeMatch {
    name: String,
    value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

/// A compound selector and the combinator linking it to the one on its left
type Step = (Combinator, Compound);

/// Parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Vec<Step>>,
}

impl Selector {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let error = |reason: &str| SelectorError {
            selector: input.to_string(),
            reason: reason.to_string(),
        };

        let mut alternatives = Vec::new();
        for part in input.split(',') {
            let steps = parse_complex(part).map_err(|reason| error(&reason))?;
            if steps.is_empty() {
                return Err(error("empty selector"));
            }
            alternatives.push(steps);
        }

        Ok(Self { alternatives })
    }

    /// Whether the element `id` in `tree` matches
    pub fn matches(&self, tree: &RenderTree, id: NodeId) -> bool {
        self.alternatives
            .iter()
            .any(|steps| matches_steps(tree, id, steps))
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

type Chars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

fn read_name(chars: &mut Chars<'_>) -> String {
    let mut name = String::new();
    while let Some(ch) = chars.peek().copied() {
        if !is_name_char(ch) {
            break;
        }
        name.push(ch);
        chars.next();
    }
    name
}

fn parse_complex(input: &str) -> Result<Vec<Step>, String> {
    let mut steps = Vec::new();
    let mut chars = input.trim().chars().peekable();
    let mut combinator = Combinator::Descendant;
    let mut current = Compound::default();
    let mut has_current = false;

    while let Some(ch) = chars.peek().copied() {
        match ch {
            ' ' | '\t' | '\n' | '>' => {
                let mut child = false;
                while let Some(next) = chars.peek().copied() {
                    if next == '>' {
                        child = true;
                    } else if !next.is_whitespace() {
                        break;
                    }
                    chars.next();
                }
                if !has_current {
                    return Err("combinator without a left-hand selector".to_string());
                }
                steps.push((combinator, std::mem::take(&mut current)));
                has_current = false;
                combinator = if child {
                    Combinator::Child
                } else {
                    Combinator::Descendant
                };
            }
            '*' => {
                chars.next();
                has_current = true;
            }
            '.' => {
                chars.next();
                let name = read_name(&mut chars);
                if name.is_empty() {
                    return Err("empty class name".to_string());
                }
                current.classes.push(name);
                has_current = true;
            }
            '#' => {
                chars.next();
                let name = read_name(&mut chars);
                if name.is_empty() {
                    return Err("empty id".to_string());
                }
                current.id = Some(name);
                has_current = true;
            }
            '[' => {
                chars.next();
                current.attributes.push(parse_attribute(&mut chars)?);
                has_current = true;
            }
            ch if is_name_char(ch) => {
                current.tag = Some(read_name(&mut chars).to_ascii_lowercase());
                has_current = true;
            }
            other => return Err(format!("unsupported character {other:?}")),
        }
    }

    if has_current {
        steps.push((combinator, current));
    } else if !steps.is_empty() {
        return Err("dangling combinator".to_string());
    }

    Ok(steps)
}

fn parse_attribute(chars: &mut Chars<'_>) -> Result<AttributeMatch, String> {
    let mut name = String::new();
    let mut value = None;

    while let Some(ch) = chars.next() {
        match ch {
            ']' => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err("empty attribute name".to_string());
                }
                return Ok(AttributeMatch { name, value });
            }
            '=' => {
                let mut raw = String::new();
                let mut quote = None;
                for ch in chars.by_ref() {
                    match (quote, ch) {
                        (None, '"' | '\'') if raw.trim().is_empty() => quote = Some(ch),
                        (Some(open), ch) if ch == open => quote = None,
                        (None, ']') => break,
                        (_, ch) => raw.push(ch),
                    }
                }
                value = Some(raw.trim().to_string());
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err("empty attribute name".to_string());
                }
                return Ok(AttributeMatch { name, value });
            }
            ch => name.push(ch),
        }
    }

    Err("unterminated attribute selector".to_string())
}

fn matches_compound(tree: &RenderTree, id: NodeId, compound: &Compound) -> bool {
    let Some(element) = tree.element(id) else {
        return false;
    };

    if let Some(tag) = &compound.tag {
        if element.tag() != tag {
            return false;
        }
    }
    if let Some(expected) = &compound.id {
        if element.id() != Some(expected.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|class| element.has_class(class)) {
        return false;
    }
    compound.attributes.iter().all(|attr| match &attr.value {
        Some(value) => element.attribute(&attr.name) == Some(value.as_str()),
        None => element.has_attribute(&attr.name),
    })
}

fn matches_steps(tree: &RenderTree, id: NodeId, steps: &[Step]) -> bool {
    let Some(((combinator, compound), rest)) = steps.split_last() else {
        return true;
    };
    if !matches_compound(tree, id, compound) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }

    match combinator {
        Combinator::Child => tree
            .parent(id)
            .is_some_and(|parent| matches_steps(tree, parent, rest)),
        Combinator::Descendant => {
            let mut ancestor = tree.parent(id);
            while let Some(candidate) = ancestor {
                if matches_steps(tree, candidate, rest) {
                    return true;
                }
                ancestor = tree.parent(candidate);
            }
            false
        }
    }
}
