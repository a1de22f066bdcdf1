use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The visual category of a flare, derived from how many people joined it.
///
/// Categories are ordered by severity, so `Regular < Violet < Blue`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Regular,
    Violet,
    Blue,
}

impl Category {
    /// From this many participants a flare is violet
    pub const VIOLET_THRESHOLD: u32 = 18;
    /// From this many participants a flare is blue
    pub const BLUE_THRESHOLD: u32 = 100;

    pub const ALL: [Category; 3] = [Category::Regular, Category::Violet, Category::Blue];

    /// Returns the category for a participant count.
    pub fn from_participants(count: u32) -> Self {
        if count >= Self::BLUE_THRESHOLD {
            return Self::Blue;
        }

        if count >= Self::VIOLET_THRESHOLD {
            return Self::Violet;
        }

        Self::Regular
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Regular => "regular",
            Category::Violet => "violet",
            Category::Blue => "blue",
        }
    }

    /// The inclusive range of participant counts this category covers,
    /// `None` meaning unbounded.
    pub fn participant_range(&self) -> (u32, Option<u32>) {
        match self {
            Category::Regular => (1, Some(Self::VIOLET_THRESHOLD - 1)),
            Category::Violet => (Self::VIOLET_THRESHOLD, Some(Self::BLUE_THRESHOLD - 1)),
            Category::Blue => (Self::BLUE_THRESHOLD, None),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::Category;

    #[test]
    fn thresholds() {
        assert_eq!(Category::from_participants(0), Category::Regular);
        assert_eq!(Category::from_participants(1), Category::Regular);
        assert_eq!(Category::from_participants(17), Category::Regular);
        assert_eq!(Category::from_participants(18), Category::Violet);
        assert_eq!(Category::from_participants(99), Category::Violet);
        assert_eq!(Category::from_participants(100), Category::Blue);
        assert_eq!(Category::from_participants(u32::MAX), Category::Blue);
    }

    #[test]
    fn monotonic_in_participants() {
        let mut previous = Category::from_participants(0);

        for count in 1..=250 {
            let current = Category::from_participants(count);
            assert!(current >= previous, "{} dropped below {}", count, previous);
            previous = current;
        }
    }

    #[test]
    fn ranges_line_up_with_thresholds() {
        for category in Category::ALL {
            let (low, high) = category.participant_range();

            assert_eq!(Category::from_participants(low), category);
            if let Some(high) = high {
                assert_eq!(Category::from_participants(high), category);
                assert_ne!(Category::from_participants(high + 1), category);
            }
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Violet).unwrap(),
            "\"violet\""
        );
        assert_eq!(
            serde_json::from_str::<Category>("\"blue\"").unwrap(),
            Category::Blue
        );
    }
}
