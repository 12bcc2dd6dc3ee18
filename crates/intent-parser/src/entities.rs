//! Slot values pulled out of an utterance: garment size and quantity.

use crate::normalize::{normalize, tokens};
use crate::IntentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Garment size, ordered small to large.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Size {
    #[serde(rename = "XS")]
    ExtraSmall,
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "L")]
    Large,
    #[serde(rename = "XL")]
    ExtraLarge,
    #[serde(rename = "XXL")]
    DoubleExtraLarge,
}

impl Size {
    pub const ALL: [Size; 6] = [
        Size::ExtraSmall,
        Size::Small,
        Size::Medium,
        Size::Large,
        Size::ExtraLarge,
        Size::DoubleExtraLarge,
    ];

    /// Canonical size code ("XS", "S", ...).
    pub fn code(&self) -> &'static str {
        match self {
            Size::ExtraSmall => "XS",
            Size::Small => "S",
            Size::Medium => "M",
            Size::Large => "L",
            Size::ExtraLarge => "XL",
            Size::DoubleExtraLarge => "XXL",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Size {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Size::ALL
            .into_iter()
            .find(|size| size.code() == code)
            .ok_or_else(|| IntentError::UnknownSize(s.to_string()))
    }
}

/// Spoken size vocabulary. Several entries ("median", "mids") are speech-to-text
/// misrecognitions of "medium".
const SIZE_WORDS: &[(&str, Size)] = &[
    ("xs", Size::ExtraSmall),
    ("xsmall", Size::ExtraSmall),
    ("small", Size::Small),
    ("s", Size::Small),
    ("medium", Size::Medium),
    ("med", Size::Medium),
    ("mids", Size::Medium),
    ("mid", Size::Medium),
    ("median", Size::Medium),
    ("mediums", Size::Medium),
    ("m", Size::Medium),
    ("large", Size::Large),
    ("l", Size::Large),
    ("xlarge", Size::ExtraLarge),
    ("xl", Size::ExtraLarge),
    ("xxl", Size::DoubleExtraLarge),
];

const NUMBER_WORDS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// First size mentioned in `text`, if any.
pub fn parse_size(text: &str) -> Option<Size> {
    let normalized = normalize(text);
    tokens(&normalized).into_iter().find_map(|token| {
        let letters: String = token.chars().filter(|c| c.is_ascii_lowercase()).collect();
        SIZE_WORDS
            .iter()
            .find(|(word, _)| *word == letters)
            .map(|(_, size)| *size)
    })
}

/// First positive quantity mentioned in `text` as digits or a number word, else 1.
pub fn extract_quantity(text: &str) -> u32 {
    let normalized = normalize(text);
    for token in tokens(&normalized) {
        if token.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = token.parse::<u32>() {
                if n > 0 {
                    return n;
                }
            }
        }
        if let Some((_, n)) = NUMBER_WORDS.iter().find(|(word, _)| *word == token) {
            return *n;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_vocabulary() {
        assert_eq!(parse_size("size medium"), Some(Size::Medium));
        assert_eq!(parse_size("make it a median"), Some(Size::Medium));
        assert_eq!(parse_size("small please"), Some(Size::Small));
        assert_eq!(parse_size("XL"), Some(Size::ExtraLarge));
        assert_eq!(parse_size("xxl"), Some(Size::DoubleExtraLarge));
        assert_eq!(parse_size("x-small"), Some(Size::Small));
        assert_eq!(parse_size("xsmall"), Some(Size::ExtraSmall));
        assert_eq!(parse_size("large"), Some(Size::Large));
    }

    #[test]
    fn test_parse_size_first_match_wins() {
        assert_eq!(parse_size("large or small"), Some(Size::Large));
    }

    #[test]
    fn test_parse_size_strips_digits_inside_token() {
        assert_eq!(parse_size("xl2"), Some(Size::ExtraLarge));
    }

    #[test]
    fn test_parse_size_none() {
        assert_eq!(parse_size("add to cart the stadium mesh pants"), None);
        assert_eq!(parse_size("open size guide for studio cargo shorts"), None);
        assert_eq!(parse_size(""), None);
    }

    #[test]
    fn test_extract_quantity() {
        assert_eq!(extract_quantity("add 3 track jackets"), 3);
        assert_eq!(extract_quantity("add two cargo shorts"), 2);
        assert_eq!(extract_quantity("remove the velocity track jacket"), 1);
        assert_eq!(extract_quantity("add 0 shorts"), 1);
        assert_eq!(extract_quantity("buy ten then 4"), 10);
        assert_eq!(extract_quantity("size 2xl"), 1);
    }

    #[test]
    fn test_size_codes_round_trip_through_from_str() {
        for size in Size::ALL {
            assert_eq!(size.code().parse::<Size>(), Ok(size));
        }
        assert_eq!("m".parse::<Size>(), Ok(Size::Medium));
        assert!("huge".parse::<Size>().is_err());
    }

    #[test]
    fn test_size_serde_uses_codes() {
        let json = serde_json::to_string(&Size::ExtraLarge).unwrap();
        assert_eq!(json, "\"XL\"");
        let back: Size = serde_json::from_str("\"XS\"").unwrap();
        assert_eq!(back, Size::ExtraSmall);
    }
}
