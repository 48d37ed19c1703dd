//! FVNL (fruit/vegetable/nut/legume) content estimation from CNF-style
//! food names, used when the upstream database supplies no value.

use std::sync::LazyLock;

use regex::Regex;

use crate::nutrients::FVNL_GROUPS;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static fvnl regex")
}

/// Heavy processing: 50% penalty.
static HIGH_PROCESSING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        re(r"\b(battered|breaded|fried|deep.?fried)\b"),
        re(r"\b(candied|sweetened.*syrup|extra heavy syrup)\b"),
        re(r"\b(jam|jelly|preserve|marmalade)\b"),
    ]
});

/// Medium processing: 25% penalty.
static MEDIUM_PROCESSING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        re(r"\bcanned.*(?:heavy syrup|light syrup|syrup pack)\b"),
        re(r"\b(canned|preserved|pickled)\b"),
        re(r"\b(dried|dehydrated|freeze.?dried)\b"),
        re(r"\b(frozen.*sweetened|frozen.*heated)\b"),
    ]
});

/// Light processing (basic cooking): 5% penalty.
static LIGHT_PROCESSING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        re(r"\bcanned.*(?:water pack|juice pack|no.*sugar)\b"),
        re(r"\b(frozen.*unsweetened|frozen.*unprepared)\b"),
        re(r"\bunsweetened\b"),
        re(r"\b(cooked|boiled|steamed|baked|roasted|grilled|drained)\b"),
    ]
});

/// Minimal processing: no penalty.
static MINIMAL_PROCESSING: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![re(r"\b(raw|fresh)\b"), re(r"\bwith skin\b"), re(r"\bunprepared\b")]
});

/// Named-ingredient patterns with their FVNL estimate for mixed foods.
static MIXED_FOOD_PATTERNS: LazyLock<Vec<(Regex, f64)>> = LazyLock::new(|| {
    vec![
        (
            re(r"\b(apple|apricot|banana|berry|blueberry|blackberry|cherry|cranberry|grape|grapefruit|lemon|lime|orange|peach|pear|pineapple|plum|strawberry|watermelon|melon)\b"),
            45.0,
        ),
        (re(r"\bfruit\b"), 35.0),
        (
            re(r"\b(tomato|carrot|broccoli|spinach|lettuce|onion|pepper|potato|sweet potato|corn|peas|beans|bean|celery|mushroom|cabbage|cucumber|asparagus)\b"),
            40.0,
        ),
        (re(r"\bvegetable\b"), 35.0),
        (
            re(r"\b(almond|walnut|peanut|cashew|pecan|hazelnut|pine nut|coconut|sesame|sunflower)\b"),
            25.0,
        ),
        (re(r"\bnut\b"), 20.0),
        (re(r"\b(lentil|chickpea|kidney bean|lima bean|navy bean|black bean|soy|tofu)\b"), 30.0),
        (re(r"\bsalad\b"), 70.0),
        (re(r"\bsoup.*(?:vegetable|tomato|pea|bean|lentil)\b"), 45.0),
        (re(r"\bstir.?fry\b"), 35.0),
        (re(r"\bchow mein\b"), 25.0),
        (re(r"\bpot roast.*(?:potato|peas|corn)\b"), 30.0),
        (re(r"\bsauce.*(?:tomato|onion|pepper|mushroom)\b"), 40.0),
    ]
});

static WITH_VEGETABLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        re(r"\bwith.*(?:potato|peas|corn|carrot|onion|pepper|tomato|mushroom|vegetable)\b"),
        re(r"\band.*(?:potato|peas|corn|carrot|onion|pepper|tomato|mushroom|vegetable)\b"),
    ]
});

/// Estimate FVNL content percentage (0-100) for a food.
pub fn estimate_fvnl_percent(food_name: &str, food_group_id: Option<u32>) -> f64 {
    let name = food_name.to_lowercase();

    match food_group_id {
        Some(group) if FVNL_GROUPS.contains(&group) => {
            base_fvnl_for_group(group, &name) * processing_factor(&name)
        }
        Some(group) => mixed_food_fvnl(&name, group),
        None => 0.0,
    }
}

/// Base FVNL percentage for pure FVNL food groups.
fn base_fvnl_for_group(food_group_id: u32, name: &str) -> f64 {
    match food_group_id {
        9 => {
            // "Apple juice, canned" vs "Apple, raw, with skin".
            if ["juice", "nectar", "drink", "cocktail"].iter().any(|t| name.contains(t)) {
                if name.contains("concentrate") {
                    50.0
                } else {
                    67.0
                }
            } else if ["dried", "dehydrated"].iter().any(|t| name.contains(t)) {
                90.0
            } else {
                100.0
            }
        }
        11 | 12 | 16 => 100.0,
        _ => 0.0,
    }
}

/// Processing penalty factor, 0.5-1.0, from the name's processing terms.
fn processing_factor(name: &str) -> f64 {
    if HIGH_PROCESSING.iter().any(|p| p.is_match(name)) {
        0.5
    } else if MEDIUM_PROCESSING.iter().any(|p| p.is_match(name)) {
        0.75
    } else if LIGHT_PROCESSING.iter().any(|p| p.is_match(name)) {
        0.95
    } else if MINIMAL_PROCESSING.iter().any(|p| p.is_match(name)) {
        1.0
    } else {
        0.9
    }
}

/// Estimate FVNL content for mixed foods from named ingredients.
fn mixed_food_fvnl(name: &str, food_group_id: u32) -> f64 {
    let mut max_fvnl: f64 = 0.0;

    for (pattern, value) in MIXED_FOOD_PATTERNS.iter() {
        if pattern.is_match(name) {
            max_fvnl = max_fvnl.max(*value);
        }
    }

    if WITH_VEGETABLE_PATTERNS.iter().any(|p| p.is_match(name)) {
        max_fvnl = max_fvnl.max(25.0);
    }

    match food_group_id {
        // Mixed dishes: assume a minimum, boost detected content.
        22 => {
            if max_fvnl == 0.0 {
                5.0
            } else {
                (max_fvnl * 1.2).min(80.0)
            }
        }
        // Soups, sauces and gravies.
        6 => {
            if ["vegetable", "tomato", "onion", "mushroom", "celery"]
                .iter()
                .any(|t| name.contains(t))
            {
                max_fvnl.max(35.0)
            } else if name.contains("soup") && max_fvnl == 0.0 {
                10.0
            } else {
                max_fvnl
            }
        }
        // Baked products: reduced for the baked matrix.
        18 => {
            if max_fvnl > 0.0 {
                (max_fvnl * 0.7).min(60.0)
            } else {
                max_fvnl
            }
        }
        // Fast foods: reduced for processing.
        21 => {
            if max_fvnl > 0.0 {
                (max_fvnl * 0.8).min(50.0)
            } else {
                max_fvnl
            }
        }
        _ => max_fvnl,
    }
}
