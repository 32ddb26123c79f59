//! Book record model, editable fields and the update payload

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Maximum description length, counted in UTF-16 code units like the server does
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Opaque book identifier.
///
/// The API sends it either as a string or as a number; it is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BookId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = Scalar::deserialize(deserializer)?.into_text();
        BookId::new(id).map_err(serde::de::Error::custom)
    }
}

/// Scalar JSON value the API may send for a text field
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
        }
    }
}

/// Null or absent decodes as an empty string so validation reports it later
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_text)
        .unwrap_or_default())
}

/// Missing, null or empty ids decode as `None`
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<BookId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .and_then(|id| BookId::new(id.into_text()).ok()))
}

/// Fields of a book that can be edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Title,
    Author,
    Publisher,
    Genre,
    Tag,
    Price,
    Description,
}

impl BookField {
    /// All editable fields, in form order. Every one of them is required.
    pub const ALL: [BookField; 7] = [
        BookField::Title,
        BookField::Author,
        BookField::Publisher,
        BookField::Genre,
        BookField::Tag,
        BookField::Price,
        BookField::Description,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Publisher => "publisher",
            BookField::Genre => "genre",
            BookField::Tag => "tag",
            BookField::Price => "price",
            BookField::Description => "description",
        }
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookField::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

/// Book record as returned by the API, also used as the editing draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// Set by the editor from the id the book was requested with
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub publisher: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub genre: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tag: String,
    /// Price as typed by the user; converted to a number on submission
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    /// Cover image, display only
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

impl BookRecord {
    pub fn field(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Publisher => &self.publisher,
            BookField::Genre => &self.genre,
            BookField::Tag => &self.tag,
            BookField::Price => &self.price,
            BookField::Description => &self.description,
        }
    }

    pub fn set_field(&mut self, field: BookField, value: impl Into<String>) {
        let value = value.into();
        match field {
            BookField::Title => self.title = value,
            BookField::Author => self.author = value,
            BookField::Publisher => self.publisher = value,
            BookField::Genre => self.genre = value,
            BookField::Tag => self.tag = value,
            BookField::Price => self.price = value,
            BookField::Description => self.description = value,
        }
    }

    /// Check the submission rules: every field non-empty and the description limit
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<BookField> = BookField::ALL
            .into_iter()
            .filter(|f| self.field(*f).is_empty())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let actual = self.description.encode_utf16().count();
        if actual > DESCRIPTION_MAX_CHARS {
            return Err(ValidationError::DescriptionTooLong {
                actual,
                max: DESCRIPTION_MAX_CHARS,
            });
        }

        Ok(())
    }

    /// Validate and build the update payload
    pub fn to_payload(&self) -> Result<BookPayload, ValidationError> {
        self.validate()?;

        Ok(BookPayload {
            title: self.title.clone(),
            author: self.author.clone(),
            publisher: self.publisher.clone(),
            genre: self.genre.clone(),
            tag: self.tag.clone(),
            price: parse_price(&self.price)?,
            description: self.description.clone(),
        })
    }
}

/// Update request body. Never carries the id or the cover image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub genre: String,
    pub tag: String,
    pub price: serde_json::Number,
    pub description: String,
}

/// Convert user input to a JSON number.
///
/// Integral values become JSON integers so `"2000"` is sent as `2000`.
pub fn parse_price(text: &str) -> Result<serde_json::Number, ValidationError> {
    let trimmed = text.trim();
    let invalid = || ValidationError::InvalidPrice(text.to_string());

    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n.into());
    }

    let value: f64 = trimmed.parse().map_err(|_| invalid())?;
    if !value.is_finite() {
        return Err(invalid());
    }
    // 2^53, the last point where every integer is exact in an f64
    if value.fract() == 0.0 && value.abs() <= 9_007_199_254_740_992.0 {
        return Ok((value as i64).into());
    }
    serde_json::Number::from_f64(value).ok_or_else(invalid)
}
