//! String templates for component markup
//!
//! A template is a sequence of literal fragments interleaved with typed
//! [`Value`]s. Rendering resolves every value against the fragment that
//! precedes it:
//!
//! - booleans toggle a presence-style attribute (`?required=` / `required=`)
//! - handler names are embedded as the quoted value of an `@event=` binding
//! - any other value directly after `attr=` is escaped and double-quoted
//! - everything else is appended as-is, `None` becoming empty text
//!
//! Text position values are not escaped, because nested templates are
//! interpolated as plain strings. Wrap user data shown as text in
//! [`escape_text`].
//!
//! The [`html!`](crate::html) macro builds a [`Template`] from literals and
//! `{expr}` groups and renders it in one go:
//!
//! ```
//! use dataview::{handler, html};
//!
//! fn on_click() {}
//!
//! let markup = html!(
//!     "<button data-index=" {3} " @click=" {handler!(on_click)} ">"
//!         {"Add"}
//!     "</button>"
//! )
//! .unwrap();
//!
//! assert_eq!(markup, r#"<button data-index="3" @click="on_click">Add</button>"#);
//! ```

mod list;
mod value;


pub use list::{render_list, try_render_list};
pub use value::{format_number, Value};

use std::sync::OnceLock;

use regex::Regex;

/// Marker character that prefixes declarative event-handler attributes
pub const EVENT_PREFIX: char = '@';

/// Errors produced while rendering a template
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// A handler without a usable name was interpolated
    #[error("Anonymous handlers are not supported, use a named handler (got {name:?})")]
    InvalidHandler { name: String },

    /// A built-in pattern failed to compile
    #[error("Invalid template pattern: {0}")]
    Pattern(String),
}

impl From<regex::Error> for TemplateError {
    fn from(error: regex::Error) -> Self {
        TemplateError::Pattern(error.to_string())
    }
}

type CachedRegex = OnceLock<Result<Regex, regex::Error>>;

/// Compile `pattern` once and hand out the cached result
pub(crate) fn cached_regex(
    cell: &'static CachedRegex,
    pattern: &str,
) -> Result<&'static Regex, regex::Error> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(Clone::clone)
}

fn conditional_attr() -> Result<&'static Regex, TemplateError> {
    static RE: CachedRegex = OnceLock::new();
    Ok(cached_regex(&RE, r"\??([A-Za-z_][\w-]*)=$")?)
}

fn attr_assignment() -> Result<&'static Regex, TemplateError> {
    static RE: CachedRegex = OnceLock::new();
    Ok(cached_regex(&RE, r"=\s*$")?)
}

fn quoted() -> Result<&'static Regex, TemplateError> {
    static RE: CachedRegex = OnceLock::new();
    Ok(cached_regex(&RE, r#"^".*"$"#)?)
}

/// Escape `text` for use as element content
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escape `value` for use inside a double-quoted attribute
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Render literal fragments interleaved with values into one markup string.
///
/// `values[i]` is resolved against `fragments[i]`; a trailing fragment with
/// no value is appended as-is and surplus values are ignored.
pub fn html<S: AsRef<str>>(fragments: &[S], values: &[Value]) -> Result<String, TemplateError> {
    let mut result = String::new();

    for (index, fragment) in fragments.iter().enumerate() {
        let fragment = fragment.as_ref();

        match values.get(index) {
            None => result.push_str(fragment),
            Some(Value::Bool(enabled)) => {
                let replacement = if *enabled { "$1" } else { "" };
                result.push_str(&conditional_attr()?.replace(fragment, replacement));
            }
            Some(Value::Handler(name)) => {
                if !is_handler_name(name) {
                    return Err(TemplateError::InvalidHandler {
                        name: (*name).to_string(),
                    });
                }
                result.push_str(fragment);
                if attr_assignment()?.is_match(fragment) {
                    result.push('"');
                    result.push_str(name);
                    result.push('"');
                } else {
                    result.push_str(name);
                }
            }
            Some(value) => {
                let text = value.to_text();
                result.push_str(fragment);

                if attr_assignment()?.is_match(fragment) && !quoted()?.is_match(&text) {
                    result.push('"');
                    result.push_str(&escape_attribute(&text));
                    result.push('"');
                } else {
                    result.push_str(&text);
                }
            }
        }
    }

    Ok(result)
}

fn is_handler_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        }
        _ => false,
    }
}

/// Incrementally built template, used by [`html!`](crate::html)
#[derive(Debug, Default, Clone)]
pub struct Template {
    fragments: Vec<String>,
    values: Vec<Value>,
}

impl Template {
    /// Create an empty template
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal markup. Consecutive literals join into one fragment.
    pub fn push_str(&mut self, literal: &str) {
        if self.fragments.len() > self.values.len() {
            if let Some(last) = self.fragments.last_mut() {
                last.push_str(literal);
            }
        } else {
            self.fragments.push(literal.to_string());
        }
    }

    /// Interpolate a value after the current fragment
    pub fn push_value(&mut self, value: impl Into<Value>) {
        if self.fragments.len() == self.values.len() {
            self.fragments.push(String::new());
        }
        self.values.push(value.into());
    }

    /// Render the template
    pub fn render(&self) -> Result<String, TemplateError> {
        html(&self.fragments, &self.values)
    }
}

/// Build and render a template from string literals and `{expr}` values.
///
/// Evaluates to `Result<String, TemplateError>`; nested templates are
/// interpolated with `{html!(...)?}`.
#[macro_export]
macro_rules! html {
    ($($body:tt)*) => {{
        let mut template = $crate::template::Template::new();
        $crate::__html_push!(template; $($body)*);
        template.render()
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __html_push {
    ($template:ident;) => {};
    ($template:ident; $literal:literal $($rest:tt)*) => {
        $template.push_str($literal);
        $crate::__html_push!($template; $($rest)*);
    };
    ($template:ident; { $value:expr } $($rest:tt)*) => {
        $template.push_value($value);
        $crate::__html_push!($template; $($rest)*);
    };
}

/// Reference a named handler for interpolation into an `@event=` binding.
///
/// The path must name an existing function or method; only its last
/// segment ends up in the markup.
#[macro_export]
macro_rules! handler {
    ($($segment:ident)::+) => {{
        let _ = $($segment)::+;
        $crate::template::Value::Handler($crate::__last_segment!($($segment)::+))
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __last_segment {
    ($name:ident) => {
        stringify!($name)
    };
    ($head:ident :: $($rest:ident)::+) => {
        $crate::__last_segment!($($rest)::+)
    };
}
