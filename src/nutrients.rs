//! Nutrient name constants matching the Canadian Nutrient File naming.

/// Energy in kilocalories per 100g.
pub const ENERGY_KCAL: &str = "ENERGY (KILOCALORIES)";

/// Protein in g per 100g.
pub const PROTEIN: &str = "PROTEIN";

/// Total fat in g per 100g.
pub const FAT_TOTAL: &str = "FAT, TOTAL";

/// Saturated fatty acids in g per 100g.
pub const SATURATED_FAT: &str = "FATTY ACIDS, SATURATED, TOTAL";

/// Total carbohydrate in g per 100g.
pub const CARBOHYDRATE: &str = "CARBOHYDRATE, TOTAL";

/// Total sugars in g per 100g.
pub const SUGARS: &str = "SUGARS, TOTAL";

/// Total dietary fibre in g per 100g.
pub const FIBRE: &str = "FIBRE, TOTAL DIETARY";

/// Sodium in mg per 100g.
pub const SODIUM: &str = "SODIUM";

/// Calcium in mg per 100g.
pub const CALCIUM: &str = "CALCIUM";

/// Conversion factor from kilocalories to kilojoules.
pub const KCAL_TO_KJ: f64 = 4.184;

/// Food group codes counted as fruit/vegetable/nut/legume sources.
pub const FVNL_GROUPS: [u32; 4] = [9, 11, 12, 16];

/// Food group codes with complete amino acid profiles (poultry, soups,
/// luncheon meats, cereals, fish, legumes per CNF coding).
pub const HIGH_QUALITY_PROTEIN_GROUPS: [u32; 6] = [5, 6, 7, 8, 15, 16];

/// Food group codes whose sugars are predominantly natural (fruits, vegetables).
pub const NATURAL_SUGAR_GROUPS: [u32; 2] = [9, 11];

/// Food group codes counted as processed sugar sources (dairy, spices,
/// baby foods, sweets).
pub const PROCESSED_SUGAR_GROUPS: [u32; 4] = [1, 2, 3, 19];
