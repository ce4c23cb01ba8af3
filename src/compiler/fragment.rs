//! Script fragments
//!
//! Generated script is plain text, so each fragment carries the one bit of
//! structure composition needs: whether it is already a single parenthesized
//! group, and whether a member access (`.match(..)`, `.indexOf(..)`) can be
//! appended to it as is.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// Field path, string, array, keyword: `x.f()` binds to the whole text
    Member,
    /// `( ... )` enclosing the whole text
    Grouped,
    /// Anything else: numbers, prefix operators
    Loose,
}

/// Piece of generated script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    text: String,
    shape: Shape,
}

impl Fragment {
    /// Text that member access binds to as a whole
    pub fn member(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shape: Shape::Member,
        }
    }

    /// Text with no grouping guarantee
    pub fn loose(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shape: Shape::Loose,
        }
    }

    /// Encloses `inner` in one pair of parentheses
    pub fn group(inner: impl fmt::Display) -> Self {
        Self {
            text: format!("({})", inner),
            shape: Shape::Grouped,
        }
    }

    /// Parenthesizes unless already grouped
    pub fn wrap(self) -> Self {
        match self.shape {
            Shape::Grouped => self,
            _ => Self::group(self.text),
        }
    }

    /// Form safe to append `.method(..)` to
    pub fn receiver(self) -> Self {
        match self.shape {
            Shape::Loose => self.wrap(),
            _ => self,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
