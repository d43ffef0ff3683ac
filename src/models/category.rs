//! Spending categories
//!
//! The category set is fixed. Each category's label doubles as its
//! persisted form, so existing labels must never be renamed: stored records
//! carrying an unknown label no longer decode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed spending category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Entertainment,
    Bills,
    Health,
    Education,
    Other,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Entertainment,
        Category::Bills,
        Category::Health,
        Category::Education,
        Category::Other,
    ];

    /// Display label, also the persisted discriminant
    pub fn label(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Bills => "Bills",
            Self::Health => "Health",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }

    /// Icon tag used by the presentation layer
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Food => "fork.knife",
            Self::Transport => "car.fill",
            Self::Shopping => "cart.fill",
            Self::Entertainment => "tv.fill",
            Self::Bills => "doc.text.fill",
            Self::Health => "cross.case.fill",
            Self::Education => "book.fill",
            Self::Other => "ellipsis.circle.fill",
        }
    }

    /// Color tag used by the presentation layer
    pub fn color(&self) -> &'static str {
        match self {
            Self::Food => "orange",
            Self::Transport => "blue",
            Self::Shopping => "purple",
            Self::Entertainment => "pink",
            Self::Bills => "red",
            Self::Health => "green",
            Self::Education => "cyan",
            Self::Other => "gray",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive match on the label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Error returned when input names no known category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        write!(
            f,
            "Unknown category '{}' (expected one of: {})",
            self.0,
            labels.join(", ")
        )
    }
}

impl std::error::Error for UnknownCategory {}
