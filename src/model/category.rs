use crate::prefs::Language;
use serde::{Deserialize, Serialize};

/// The fixed set of tags a transaction or budget can carry.
///
/// Unknown names fail to parse; they are never mapped onto one of these.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Shopping,
    Healthcare,
    Foods,
    Entertainment,
    Travel,
    Learning,
    House,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    /// Every category, in the order they are presented for selection.
    pub const ALL: [Category; 7] = [
        Category::Shopping,
        Category::Healthcare,
        Category::Foods,
        Category::Entertainment,
        Category::Travel,
        Category::Learning,
        Category::House,
    ];

    /// The human-readable name of the category in `language`.
    pub fn label(&self, language: Language) -> &'static str {
        match language {
            Language::En => match self {
                Category::Shopping => "Shopping",
                Category::Healthcare => "Healthcare",
                Category::Foods => "Foods",
                Category::Entertainment => "Entertainment",
                Category::Travel => "Travel",
                Category::Learning => "Learning",
                Category::House => "House",
            },
            Language::Vi => match self {
                Category::Shopping => "Mua sắm",
                Category::Healthcare => "Sức khỏe",
                Category::Foods => "Ăn uống",
                Category::Entertainment => "Giải trí",
                Category::Travel => "Du lịch",
                Category::Learning => "Học tập",
                Category::House => "Nhà cửa",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_category_string_round_trip() {
        for category in Category::ALL {
            let s = category.to_string();
            assert_eq!(Category::from_str(&s).unwrap(), category);
        }
        assert_eq!(Category::Healthcare.to_string(), "healthcare");
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        assert!(Category::from_str("groceries").is_err());
        assert!(Category::from_str("Foods").is_err());
        assert!(serde_json::from_str::<Category>("\"pets\"").is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Category::Foods.label(Language::En), "Foods");
        assert_eq!(Category::Foods.label(Language::Vi), "Ăn uống");
    }
}
