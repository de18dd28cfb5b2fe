//! Placeholder templates for synthetic tool content.
//!
//! Templates are plain text with `{{name}}` placeholders. Filling is a single
//! left-to-right pass, so substituted values are never re-scanned.

use crate::error::TemplateError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A borrowed template string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template<'a> {
    source: &'a str,
}

impl<'a> Template<'a> {
    pub const fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Names of all placeholders, in order of appearance.
    pub fn placeholders(&self) -> Result<Vec<&'a str>, TemplateError> {
        let mut names = Vec::new();
        let mut rest = self.source;
        let mut offset = 0;
        while let Some(start) = rest.find(OPEN) {
            let after = &rest[start + OPEN.len()..];
            let end = after
                .find(CLOSE)
                .ok_or(TemplateError::Unterminated(offset + start))?;
            names.push(after[..end].trim());
            let consumed = start + OPEN.len() + end + CLOSE.len();
            offset += consumed;
            rest = &rest[consumed..];
        }
        Ok(names)
    }

    /// Replace every placeholder with its value from `vars`.
    pub fn render(&self, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        let mut rest = self.source;
        let mut offset = 0;

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + OPEN.len()..];
            let end = after
                .find(CLOSE)
                .ok_or(TemplateError::Unterminated(offset + start))?;
            let name = after[..end].trim();
            let value = vars
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| *v)
                .ok_or_else(|| TemplateError::UnresolvedPlaceholder(name.to_string()))?;
            out.push_str(value);

            let consumed = start + OPEN.len() + end + CLOSE.len();
            offset += consumed;
            rest = &rest[consumed..];
        }

        out.push_str(rest);
        Ok(out)
    }
}

/// Shorthand for `Template::new(source).render(vars)`.
pub fn fill(source: &str, vars: &[(&str, &str)]) -> Result<String, TemplateError> {
    Template::new(source).render(vars)
}
