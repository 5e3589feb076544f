use std::fmt::Display;

use unicode_segmentation::UnicodeSegmentation;

/// The name or alias an artist signs up under.
/// Can only be created through [`ArtistName::parse`], so holding one is a
/// guarantee that the name has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistName(String);

impl ArtistName {
    /// Returns an `ArtistName` if the input satisfies the constraints on
    /// artist names, and an error describing the problem otherwise.
    pub fn parse(s: String) -> Result<Self, String> {
        let is_empty_or_whitespace = s.trim().is_empty();

        // Counted in graphemes rather than chars: stage names regularly mix
        // scripts and combining marks.
        let is_too_long = s.graphemes(true).count() > 64;

        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let contains_forbidden_characters = s.chars().any(|g| forbidden_characters.contains(&g));

        if is_empty_or_whitespace || is_too_long || contains_forbidden_characters {
            Err(format!("{s} is not a valid artist name."))
        } else {
            Ok(Self(s))
        }
    }
}

impl Display for ArtistName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ArtistName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
