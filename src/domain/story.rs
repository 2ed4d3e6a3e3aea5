//! Story record

use crate::domain::calendar;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A dated journal entry with optional photos.
///
/// `date` is the instant the story is about. It defaults to the moment of
/// creation but may be moved anywhere in time by the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: Uuid,
    pub title: String,
    #[serde(alias = "text")]
    pub body: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub date: DateTime<Utc>,
    /// Raw photo bytes in display order.
    #[serde(default, alias = "imageData", with = "base64_images")]
    pub images: Vec<Vec<u8>>,
}

impl Story {
    /// Create a story with a fresh id and no photos
    pub fn new(title: impl Into<String>, body: impl Into<String>, date: DateTime<Utc>) -> Self {
        Story {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
            date,
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<Vec<u8>>) -> Self {
        self.images = images;
        self
    }

    /// Calendar day of this story in the local timezone
    pub fn local_day(&self) -> NaiveDate {
        calendar::local_day(&self.date)
    }

    /// Case-insensitive substring match on title or body.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.body.to_lowercase().contains(needle)
    }
}

/// RFC 3339 date; a bad value reports the field and the offending text
fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;

    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| D::Error::custom(format!("invalid story date '{}': {}", raw, e)))
}

/// Photos are written as standard base64 strings.
mod base64_images {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::de::Error as _;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(images: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(images.len()))?;
        for image in images {
            seq.serialize_element(&STANDARD.encode(image))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|image| {
                STANDARD.decode(image).map_err(|e| {
                    D::Error::custom(format!("invalid base64 in story images: {}", e))
                })
            })
            .collect()
    }
}
