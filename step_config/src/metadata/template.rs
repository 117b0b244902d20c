//! Vault path templates with `$(name)` placeholders.

use std::fmt;

use thiserror::Error;

/// Reasons a path template cannot be parsed.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TemplateError {
    /// A `$(` opener has no closing parenthesis.
    #[error("unterminated placeholder starting at byte {offset}")]
    Unterminated {
        /// Byte offset of the `$(` opener.
        offset: usize,
    },
    /// A placeholder names nothing, as in `$()`.
    #[error("empty placeholder at byte {offset}")]
    EmptyPlaceholder {
        /// Byte offset of the `$(` opener.
        offset: usize,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A vault path containing `$(name)` placeholders.
///
/// Templates are parsed when constructed; a malformed template is kept so
/// that [`crate::StepMetadata`] can report it, but it never renders.
///
/// # Examples
///
/// ```
/// use step_config::PathTemplate;
///
/// let template = PathTemplate::new("cloudfoundry-$(cfOrg)-$(cfSpace)");
/// let path = template.render(|name| match name {
///     "cfOrg" => Some("org1".to_owned()),
///     "cfSpace" => Some("space1".to_owned()),
///     _ => None,
/// });
/// assert_eq!(path.as_deref(), Some("cloudfoundry-org1-space1"));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathTemplate {
    raw: String,
    parsed: Result<Vec<Segment>, TemplateError>,
}

impl PathTemplate {
    /// Parses `raw` into a template.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let text = raw.into();
        let parsed = parse_segments(&text);
        Self { raw: text, parsed }
    }

    /// The template text as declared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Confirms the template parsed successfully.
    ///
    /// # Errors
    ///
    /// Returns the [`TemplateError`] found while parsing.
    pub fn validate(&self) -> Result<(), TemplateError> {
        self.parsed.as_ref().map(|_| ()).map_err(Clone::clone)
    }

    /// Names referenced by the template's placeholders, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.parsed
            .as_ref()
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
    }

    /// Substitutes every placeholder using `lookup`.
    ///
    /// Returns `None` when any placeholder has no value, or when the template
    /// is malformed: no valid path can be built in either case.
    pub fn render<F>(&self, mut lookup: F) -> Option<String>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let segments = self.parsed.as_ref().ok()?;
        let mut path = String::with_capacity(self.raw.len());
        for segment in segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Placeholder(name) => path.push_str(&lookup(name)?),
            }
        }
        Some(path)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_segments(raw: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut rest = raw;
    let mut consumed = 0;
    while let Some(start) = rest.find("$(") {
        let offset = consumed + start;
        let (literal, tail) = rest.split_at(start);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal.to_owned()));
        }
        let body = tail.get(2..).unwrap_or_default();
        let end = body
            .find(')')
            .ok_or(TemplateError::Unterminated { offset })?;
        let (raw_name, after) = body.split_at(end);
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(TemplateError::EmptyPlaceholder { offset });
        }
        segments.push(Segment::Placeholder(name.to_owned()));
        let remainder = after.get(1..).unwrap_or_default();
        consumed += rest.len() - remainder.len();
        rest = remainder;
    }
    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_owned()));
    }
    Ok(segments)
}
