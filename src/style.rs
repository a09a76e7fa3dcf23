// Stylesheet helpers shared by every component root


use crate::template::Value;

/// Stylesheet applied first inside every isolated root.
///
/// Neutralizes default element styling for that root only.
pub const RESET_STYLES: &str = r#"
  * {
    margin: 0;
    padding: 0;
    border: 0;
    box-sizing: border-box;
    font: inherit
  }

  li {
    display: block;
  }

  input::-webkit-outer-spin-button,
  input::-webkit-inner-spin-button {
    -webkit-appearance: none;
    margin: 0;
  }

  input[type=number] {
    -moz-appearance: textfield;
  }

  ::-webkit-scrollbar {
    width:  10px;
    height: 10px;
  }

  ::-webkit-scrollbar-thumb {
    background-color: #b8b8b8;
    border-radius: 999px;
    background-clip: padding-box;
    border: 3px solid transparent;
    cursor: pointer;
  }

  ::-webkit-scrollbar-track {
    background-color: transparent;
    border-radius: 999px;
  }
"#;

/// Button and action styling shared by all components
pub const GLOBAL_STYLES: &str = r#"
  button, .button {
    border-radius: 999px;
    padding: 7px 16px;
    color: var(--white);
    font-size: 14px;
    cursor: pointer;
  }

  .reset-btn {
    background-color: var(--black);
  }

  .remove-btn {
    background-color: var(--raspberry-punch);
  }

  .apply-btn {
    background-color: var(--blue);
  }
"#;

/// Concatenate stylesheet fragments with interpolated values.
///
/// Empty values (`None`, empty text) contribute nothing.
pub fn css<S: AsRef<str>>(fragments: &[S], values: &[Value]) -> String {
    let mut sheet = String::new();
    for (index, fragment) in fragments.iter().enumerate() {
        sheet.push_str(fragment.as_ref());
        if let Some(value) = values.get(index) {
            sheet.push_str(&value.to_text());
        }
    }
    sheet
}

/// The full stylesheet of an isolated root: reset, shared, then own styles
pub fn root_stylesheet(own: &str) -> String {
    [RESET_STYLES, GLOBAL_STYLES, own]
        .iter()
        .map(|sheet| sheet.trim())
        .filter(|sheet| !sheet.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a camelCase property name to its kebab-case CSS form
pub fn kebab_case(property: &str) -> String {
    let mut name = String::with_capacity(property.len() + 4);
    for ch in property.chars() {
        if ch.is_ascii_uppercase() {
            name.push('-');
            name.push(ch.to_ascii_lowercase());
        } else {
            name.push(ch);
        }
    }
    name
}

/// Build an inline style string from `(property, value)` pairs.
///
/// Property names may be camelCase; pairs with an empty value are skipped.
///
/// ```
/// use dataview::style::style_map;
///
/// let style = style_map(&[("backgroundColor", "#FF6B6B"), ("height", "")]);
/// assert_eq!(style, "background-color: #FF6B6B");
/// ```
pub fn style_map<K, V>(styles: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    styles
        .iter()
        .filter(|(_, value)| !value.as_ref().is_empty())
        .map(|(property, value)| format!("{}: {}", kebab_case(property.as_ref()), value.as_ref()))
        .collect::<Vec<_>>()
        .join("; ")
}
