//! Element data: tag, ordered attributes and the helpers widgets use on them

use crate::template::escape_attribute;

/// Tag name and attributes of one element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementData {
    tag: String,
    attributes: Vec<(String, String)>,
}

impl ElementData {
    /// Create an element. Tag names are stored lowercase.
    pub fn new(tag: &str, attributes: Vec<(String, String)>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in source order; bare attributes have an empty value
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(attr, _)| attr == name) {
            Some((_, current)) => *current = value.to_string(),
            None => self
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(attr, _)| attr != name);
    }

    /// `data-*` attribute, named without the prefix
    pub fn data(&self, name: &str) -> Option<&str> {
        self.attribute(&format!("data-{name}"))
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or_default()
            .split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|candidate| candidate == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut classes: Vec<&str> = self.classes().collect();
        classes.push(class);
        let joined = classes.join(" ");
        self.set_attribute("class", &joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let joined = self
            .classes()
            .filter(|candidate| *candidate != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute("class", &joined);
    }

    /// Inline style declarations as `(property, value)` pairs
    pub fn styles(&self) -> Vec<(String, String)> {
        self.attribute("style")
            .unwrap_or_default()
            .split(';')
            .filter_map(|declaration| {
                let (property, value) = declaration.split_once(':')?;
                let property = property.trim();
                (!property.is_empty())
                    .then(|| (property.to_string(), value.trim().to_string()))
            })
            .collect()
    }

    /// Value of one inline style property
    pub fn style(&self, property: &str) -> Option<String> {
        self.styles()
            .into_iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Set an inline style property; an empty value removes it
    pub fn set_style(&mut self, property: &str, value: &str) {
        let mut styles = self.styles();
        styles.retain(|(name, _)| name != property);
        if !value.is_empty() {
            styles.push((property.to_string(), value.to_string()));
        }

        let joined = styles
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");

        if joined.is_empty() {
            self.remove_attribute("style");
        } else {
            self.set_attribute("style", &joined);
        }
    }

    pub(crate) fn write_open_tag(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            if !value.is_empty() {
                out.push_str("=\"");
                out.push_str(&escape_attribute(value));
                out.push('"');
            }
        }
        out.push('>');
    }
}
