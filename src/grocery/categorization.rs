use std::fmt;

/// Grocery aisle an ingredient is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Vegetables,
    Fruits,
    Dairy,
    Protein,
    Grains,
    Spices,
    Pantry,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Vegetables => "vegetables",
            Category::Fruits => "fruits",
            Category::Dairy => "dairy",
            Category::Protein => "protein",
            Category::Grains => "grains",
            Category::Spices => "spices",
            Category::Pantry => "pantry",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword table, checked in order. A name matches a category when it
/// contains any of the keywords as a substring.
const KEYWORDS: [(Category, &[&str]); 7] = [
    (
        Category::Vegetables,
        &[
            "tomato",
            "onion",
            "garlic",
            "carrot",
            "potato",
            "bell pepper",
            "spinach",
            "lettuce",
            "cucumber",
            "broccoli",
            "cauliflower",
            "celery",
            "mushroom",
        ],
    ),
    (
        Category::Fruits,
        &[
            "apple", "banana", "orange", "lemon", "lime", "berry", "grape", "avocado",
        ],
    ),
    (
        Category::Dairy,
        &["milk", "cheese", "butter", "yogurt", "cream", "egg"],
    ),
    (
        Category::Protein,
        &[
            "chicken", "beef", "pork", "fish", "salmon", "tuna", "turkey", "tofu", "beans",
            "lentils",
        ],
    ),
    (
        Category::Grains,
        &["rice", "pasta", "bread", "flour", "oats", "quinoa", "barley"],
    ),
    (
        Category::Spices,
        &[
            "salt", "pepper", "oregano", "basil", "thyme", "cumin", "paprika", "cinnamon",
        ],
    ),
    (
        Category::Pantry,
        &["oil", "vinegar", "sugar", "honey", "stock", "broth", "sauce"],
    ),
];

/// Categorize an ingredient by name
///
/// Matching is case-insensitive and substring based, so "Eggplant" lands in
/// dairy through "egg" and "Black pepper" lands in spices. Unmatched names
/// are [`Category::Other`].
pub fn categorize_ingredient(name: &str) -> Category {
    let name = name.to_lowercase();

    KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| name.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Tomato", Category::Vegetables)]
    #[case("cherry tomatoes", Category::Vegetables)]
    #[case("Red Bell Pepper", Category::Vegetables)]
    #[case("Strawberry", Category::Fruits)]
    #[case("Greek yogurt", Category::Dairy)]
    #[case("Salmon fillet", Category::Protein)]
    #[case("Brown rice", Category::Grains)]
    #[case("smoked paprika", Category::Spices)]
    #[case("Olive oil", Category::Pantry)]
    #[case("Tahini", Category::Other)]
    fn test_categorize_ingredient(#[case] name: &str, #[case] expected: Category) {
        assert_eq!(categorize_ingredient(name), expected);
    }

    #[test]
    fn test_first_matching_category_wins() {
        // "butter" is checked before "bread"
        assert_eq!(categorize_ingredient("buttered bread"), Category::Dairy);
        // "black pepper" is not a bell pepper, falls through to spices
        assert_eq!(categorize_ingredient("black pepper"), Category::Spices);
    }

    #[test]
    fn test_substring_false_positives_are_kept() {
        assert_eq!(categorize_ingredient("Eggplant"), Category::Dairy);
        assert_eq!(categorize_ingredient("Pineapple"), Category::Fruits);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Vegetables.to_string(), "vegetables");
        assert_eq!(Category::Other.as_str(), "other");
    }
}
