use std::collections::BTreeMap;

use super::{LinkElement, StyleError, StyleSurface};

/// In-memory page head, rendered into every page's `<head>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentHead {
    css_variables: BTreeMap<String, String>,
    links: Vec<LinkElement>,
    title: Option<String>,
}

impl DocumentHead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn css_variable(&self, name: &str) -> Option<&str> {
        self.css_variables.get(name).map(String::as_str)
    }

    /// Declarations for the `:root` rule, e.g. `--primary: 221.2 83.2% 53.3%;`.
    pub fn root_style(&self) -> String {
        self.css_variables
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn links(&self) -> &[LinkElement] {
        &self.links
    }

    pub fn favicon_href(&self) -> Option<&str> {
        self.links
            .iter()
            .find(|link| link.is_icon())
            .map(|link| link.href.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(fallback)
    }
}

fn is_valid_variable_name(name: &str) -> bool {
    name.len() > 2
        && name.starts_with("--")
        && name[2..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// Values end up inside a <style> block, so anything that could close the
// declaration, the rule or the element is rejected.
fn is_valid_variable_value(value: &str) -> bool {
    !value.trim().is_empty()
        && !value
            .chars()
            .any(|c| matches!(c, ';' | '{' | '}' | '<' | '>' | '\\') || c.is_control())
}

impl StyleSurface for DocumentHead {
    fn set_css_variable(&mut self, name: &str, value: &str) -> Result<(), StyleError> {
        if !is_valid_variable_name(name) {
            return Err(StyleError::InvalidVariableName(name.to_string()));
        }
        if !is_valid_variable_value(value) {
            return Err(StyleError::InvalidVariableValue {
                name: name.to_string(),
                value: value.to_string(),
            });
        }

        self.css_variables
            .insert(name.to_string(), value.trim().to_string());
        Ok(())
    }

    fn icon_link_mut(&mut self) -> Option<&mut LinkElement> {
        self.links.iter_mut().find(|link| link.is_icon())
    }

    fn append_icon_link(&mut self) -> &mut LinkElement {
        let index = self.links.len();
        self.links.push(LinkElement {
            rel: "icon".to_string(),
            href: String::new(),
        });
        &mut self.links[index]
    }

    fn set_title(&mut self, title: &str) -> Result<(), StyleError> {
        self.title = Some(title.to_string());
        Ok(())
    }
}
