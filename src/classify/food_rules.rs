use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::Category;

/// Default category per CNF food group code.
///
/// Groups not listed here (and unknown codes) map to `Food`.
pub static FOOD_GROUP_CATEGORIES: LazyLock<HashMap<u32, Category>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert(1, Category::DairyFood); // Dairy and Egg Products
    m.insert(2, Category::Food); // Spices and Herbs
    m.insert(3, Category::Food); // Baby Foods
    m.insert(4, Category::OilsAndSpreads); // Fats and Oils
    m.insert(5, Category::Food); // Poultry Products
    m.insert(6, Category::Food); // Soups, Sauces and Gravies
    m.insert(7, Category::Food); // Sausages and Luncheon Meats
    m.insert(8, Category::Food); // Breakfast Cereals
    m.insert(9, Category::Food); // Fruits and Fruit Juices
    m.insert(10, Category::Food); // Pork Products
    m.insert(11, Category::Food); // Vegetables and Vegetable Products
    m.insert(12, Category::Food); // Nuts and Seeds
    m.insert(13, Category::Food); // Beef Products
    m.insert(14, Category::Beverage); // Beverages
    m.insert(15, Category::Food); // Finfish and Shellfish Products
    m.insert(16, Category::Food); // Legumes and Legume Products
    m.insert(17, Category::Food); // Lamb, Veal and Game
    m.insert(18, Category::Food); // Baked Products
    m.insert(19, Category::Food); // Sweets
    m.insert(20, Category::Food); // Cereals, Grains and Pasta
    m.insert(21, Category::Food); // Fast Foods
    m.insert(22, Category::Food); // Mixed Dishes
    m.insert(25, Category::Food); // Snacks
    m
});

/// Compile a whole-word alternation over a keyword list.
///
/// Word boundaries keep "boiled" from matching "oil" and similar
/// substring false positives.
fn keyword_regex(keywords: &[&str]) -> Regex {
    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).expect("static keyword regex")
}

static CHEESE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&[
        "cheese",
        "cheddar",
        "mozzarella",
        "parmesan",
        "brie",
        "camembert",
        "gouda",
        "swiss",
        "blue",
        "feta",
        "cottage cheese",
        "cream cheese",
        "ricotta",
        "provolone",
        "gruyere",
    ])
});

static BEVERAGE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&[
        "juice", "drink", "beverage", "soda", "cola", "water", "tea", "coffee", "smoothie",
        "shake", "lemonade", "cocktail", "beer", "wine", "alcohol",
    ])
});

static DAIRY_BEVERAGE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&[
        "milk",
        "yogurt drink",
        "kefir",
        "buttermilk",
        "chocolate milk",
        "flavoured milk",
        "milk shake",
        "dairy drink",
    ])
});

static OIL_SPREAD_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    keyword_regex(&[
        "oil",
        "butter",
        "margarine",
        "spread",
        "shortening",
        "lard",
        "ghee",
        "cooking fat",
        "vegetable oil",
        "olive oil",
    ])
});

/// One name-keyword override: when the food group matches (or the rule is
/// group-independent) and a keyword hits, the rule's category wins.
struct OverrideRule {
    group: Option<u32>,
    keywords: &'static LazyLock<Regex>,
    category: Category,
}

/// Override rules in priority order; the first match wins.
static OVERRIDE_RULES: LazyLock<[OverrideRule; 5]> = LazyLock::new(|| {
    [
        // Cheese inside the dairy group.
        OverrideRule {
            group: Some(1),
            keywords: &CHEESE_KEYWORDS,
            category: Category::Cheese,
        },
        // Drinkable dairy inside the dairy group.
        OverrideRule {
            group: Some(1),
            keywords: &DAIRY_BEVERAGE_KEYWORDS,
            category: Category::DairyBeverage,
        },
        // Juices and drinks inside the fruit group.
        OverrideRule {
            group: Some(9),
            keywords: &BEVERAGE_KEYWORDS,
            category: Category::Beverage,
        },
        // Dairy drinks filed under the beverage group.
        OverrideRule {
            group: Some(14),
            keywords: &DAIRY_BEVERAGE_KEYWORDS,
            category: Category::DairyBeverage,
        },
        // Oils and spreads in any group.
        OverrideRule {
            group: None,
            keywords: &OIL_SPREAD_KEYWORDS,
            category: Category::OilsAndSpreads,
        },
    ]
});

/// Classify a food from its CNF food group and name.
///
/// Pure function: the group gives the default category, then the override
/// rules are tried in order.
pub fn classify_food(food_group_id: u32, food_name: &str) -> Category {
    for rule in OVERRIDE_RULES.iter() {
        let group_matches = rule.group.is_none_or(|g| g == food_group_id);
        if group_matches && rule.keywords.is_match(food_name) {
            return rule.category;
        }
    }

    FOOD_GROUP_CATEGORIES
        .get(&food_group_id)
        .copied()
        .unwrap_or(Category::Food)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_defaults() {
        assert_eq!(classify_food(1, "Egg, whole, raw"), Category::DairyFood);
        assert_eq!(classify_food(4, "Shortening, household"), Category::OilsAndSpreads);
        assert_eq!(classify_food(14, "Carbonated cola"), Category::Beverage);
        assert_eq!(classify_food(13, "Beef, ground, lean"), Category::Food);
        assert_eq!(classify_food(99, "Unknown group item"), Category::Food);
    }

    #[test]
    fn test_cheese_overrides_dairy() {
        assert_eq!(classify_food(1, "Cheese, cheddar, old"), Category::Cheese);
        assert_eq!(classify_food(1, "Ricotta, part skim"), Category::Cheese);
    }

    #[test]
    fn test_dairy_beverage_overrides() {
        assert_eq!(classify_food(1, "Milk, 2% fat"), Category::DairyBeverage);
        assert_eq!(classify_food(14, "Chocolate milk, low fat"), Category::DairyBeverage);
    }

    #[test]
    fn test_fruit_juice_is_beverage() {
        assert_eq!(classify_food(9, "Apple juice, canned"), Category::Beverage);
        assert_eq!(classify_food(9, "Apple, raw, with skin"), Category::Food);
    }

    #[test]
    fn test_oil_spread_anywhere() {
        assert_eq!(classify_food(11, "Salad with olive oil"), Category::OilsAndSpreads);
        assert_eq!(classify_food(6, "Garlic butter sauce"), Category::OilsAndSpreads);
    }

    #[test]
    fn test_whole_word_matching_only() {
        // "boiled" contains "oil" but must not trigger the oil rule.
        assert_eq!(classify_food(20, "Rice, boiled"), Category::Food);
        // "waterless" must not trigger the beverage rule.
        assert_eq!(classify_food(9, "Waterless cooked apple"), Category::Food);
    }

    #[test]
    fn test_cheese_beats_oil_rule_in_order() {
        // Both cheese and spread keywords present; the cheese rule is
        // earlier in the table for group 1.
        assert_eq!(classify_food(1, "Cheese spread, processed"), Category::Cheese);
    }
}
