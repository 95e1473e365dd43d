//! Front-matter parsing

use serde::{Deserialize, Deserializer, Serialize};

use super::ParseError;

/// Delimiter line that opens and closes the header block
const MARKER: &str = "---";

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Header block exactly as written, before validation
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawFrontMatter {
    title: Option<String>,
    description: Option<String>,
    published_at: Option<String>,
    updated_at: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    tags: Vec<String>,
    published: Option<bool>,
}

/// Validated metadata of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFrontmatter {
    pub title: String,
    pub description: String,
    /// ISO-like date, compared as a plain string
    pub published_at: String,
    pub updated_at: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
}

impl PostFrontmatter {
    /// Parse front-matter from a content file.
    /// Returns (front_matter, body)
    pub fn parse(source: &str) -> Result<(Self, &str), ParseError> {
        let (header, body) = split(source)?;

        let raw = if header.trim().is_empty() {
            RawFrontMatter::default()
        } else {
            serde_yaml::from_str::<RawFrontMatter>(header)?
        };

        Ok((Self::validate(raw)?, body))
    }

    fn validate(raw: RawFrontMatter) -> Result<Self, ParseError> {
        Ok(Self {
            title: required(raw.title, "title")?,
            description: required(raw.description, "description")?,
            published_at: required(raw.published_at, "publishedAt")?,
            updated_at: raw.updated_at.filter(|s| !s.trim().is_empty()),
            tags: raw.tags,
            // An absent flag keeps the post hidden from listings
            published: raw.published.unwrap_or(false),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ParseError> {
    match value {
        None => Err(ParseError::MissingField(field)),
        Some(s) if s.trim().is_empty() => Err(ParseError::EmptyField(field)),
        Some(s) => Ok(s),
    }
}

/// Split a file into its header block and body.
///
/// A file that does not open with the marker line has an empty header and is
/// returned whole as the body.
fn split(source: &str) -> Result<(&str, &str), ParseError> {
    let source = source.strip_prefix('\u{FEFF}').unwrap_or(source);
    let trimmed = source.trim_start();
    let Some(rest) = strip_marker_line(trimmed) else {
        return Ok(("", source));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == MARKER {
            return Ok((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(ParseError::Unterminated)
}

fn strip_marker_line(s: &str) -> Option<&str> {
    let rest = s.strip_prefix(MARKER)?.trim_start_matches([' ', '\t']);
    rest.strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
}
