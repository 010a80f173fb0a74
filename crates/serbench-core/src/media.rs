//! The canonical media data model used as round-trip ground truth.
//!
//! Every scalar field is an integer or string, so full value equality
//! (`Eq`) is exact — the compare stage is a reliable oracle with no
//! floating-point tolerance questions. The sample value is owned by the
//! driver and read-only to the core for the duration of a run.

use serde::{Deserialize, Serialize};

/// Media player required for a [`Media`] item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    Java,
    Flash,
}

/// Thumbnail size class for an [`Image`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Size {
    Small,
    Large,
}

/// An image associated with a media item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub uri: String,
    pub title: Option<String>,
    pub width: i32,
    pub height: i32,
    pub size: Size,
}

/// A single media item: location, dimensions, encoding, and credits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Media {
    pub uri: String,
    pub title: Option<String>,
    pub width: i32,
    pub height: i32,
    pub format: String,
    /// Duration in milliseconds.
    pub duration: i64,
    /// Size in bytes.
    pub size: i64,
    /// Bitrate in bits per second; absent when unknown.
    pub bitrate: Option<i32>,
    pub persons: Vec<String>,
    pub player: Player,
    pub copyright: Option<String>,
}

/// The domain object every codec under test must reproduce exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaContent {
    pub media: Media,
    pub images: Vec<Image>,
}

impl MediaContent {
    /// The benchmark's well-known ground-truth value.
    pub fn standard_sample() -> Self {
        MediaContent {
            media: Media {
                uri: "http://javaone.com/keynote.mpg".to_string(),
                title: Some("Javaone Keynote".to_string()),
                width: 640,
                height: 480,
                format: "video/mpg4".to_string(),
                duration: 18_000_000,
                size: 58_982_400,
                bitrate: Some(262_144),
                persons: vec!["Bill Gates".to_string(), "Steve Jobs".to_string()],
                player: Player::Java,
                copyright: None,
            },
            images: vec![
                Image {
                    uri: "http://javaone.com/keynote_large.jpg".to_string(),
                    title: Some("Javaone Keynote".to_string()),
                    width: 1024,
                    height: 768,
                    size: Size::Large,
                },
                Image {
                    uri: "http://javaone.com/keynote_small.jpg".to_string(),
                    title: None,
                    width: 320,
                    height: 240,
                    size: Size::Small,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_sample_structure() {
        let sample = MediaContent::standard_sample();
        assert_eq!(sample.media.persons.len(), 2);
        assert_eq!(sample.images.len(), 2);
        assert_eq!(sample.images[0].size, Size::Large);
        assert_eq!(sample.images[1].size, Size::Small);
        assert!(sample.media.copyright.is_none());
    }

    #[test]
    fn test_value_equality_catches_field_drift() {
        let a = MediaContent::standard_sample();
        let mut b = a.clone();
        assert_eq!(a, b);

        // Mutating any nested field must break equality — this is the
        // compare stage's whole job.
        b.media.persons.pop();
        assert_ne!(a, b);
    }

    #[test]
    fn test_enum_serde_names_are_snake_case() {
        let json = serde_json::to_string(&Player::Java).expect("serialize");
        assert_eq!(json, "\"java\"");
        let json = serde_json::to_string(&Size::Large).expect("serialize");
        assert_eq!(json, "\"large\"");
    }
}
