use crate::models::{FoodItem, Per100g, SearchResult};
use tracing::warn;

pub const DEFAULT_SEARCH_LIMIT: usize = 8;
pub const MAX_SEARCH_LIMIT: usize = 20;
const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone)]
pub struct FoodCatalog {
    items: Vec<FoodItem>,
}

impl FoodCatalog {
    pub fn new(items: Vec<FoodItem>) -> Self {
        let items = items
            .into_iter()
            .filter_map(|mut item| {
                if item.serving_grams.is_nan() || item.serving_grams <= 0.0 {
                    warn!("dropping food {:?}: serving grams must be positive", item.name);
                    return None;
                }
                item.tags = item.tags.iter().map(|tag| tag.to_lowercase()).collect();
                Some(item)
            })
            .collect();
        Self { items }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_FOODS.iter().map(FoodSeed::to_item).collect())
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn get(&self, name: &str) -> Option<&FoodItem> {
        let needle = name.trim().to_lowercase();
        self.items
            .iter()
            .find(|item| item.name.to_lowercase() == needle)
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        if !is_searchable(query) {
            return Vec::new();
        }
        let query = query.trim().to_lowercase();
        let limit = limit.clamp(1, MAX_SEARCH_LIMIT);
        let words = query_words(&query);

        let mut scored: Vec<(u32, &FoodItem)> = self
            .items
            .iter()
            .map(|item| (score(item, &query, &words), item))
            .filter(|(score, _)| *score > 0)
            .collect();
        // Stable: equal scores keep catalog order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .take(limit)
            .map(|(_, item)| to_result(item))
            .collect()
    }
}

/// Distinct whitespace-separated tokens, in first-seen order.
pub fn query_words(query: &str) -> Vec<&str> {
    let mut words: Vec<&str> = Vec::new();
    for word in query.split_whitespace() {
        if !words.contains(&word) {
            words.push(word);
        }
    }
    words
}

pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

/// First matching name rule wins; tags are consulted only when no name rule
/// matched, and the per-word fallback only when no tag rule matched either.
pub fn score(item: &FoodItem, query: &str, words: &[&str]) -> u32 {
    let name = item.name.to_lowercase();

    if name == query {
        100
    } else if name.starts_with(query) {
        80
    } else if name.contains(query) {
        60
    } else if !words.is_empty() && words.iter().all(|word| name.contains(word)) {
        50
    } else if item.tags.iter().any(|tag| tag == query) {
        70
    } else if item.tags.iter().any(|tag| tag.contains(query)) {
        40
    } else {
        let hits = words
            .iter()
            .filter(|word| name.contains(*word) || item.tags.iter().any(|tag| tag.contains(*word)))
            .count() as u32;
        20 * hits
    }
}

fn to_result(item: &FoodItem) -> SearchResult {
    let factor = item.serving_grams / 100.0;
    SearchResult {
        name: item.name.clone(),
        serving_label: item.serving_label.clone(),
        serving_grams: item.serving_grams,
        calories: (item.calories_per_100g * factor).round() as i64,
        protein: round_tenth(item.protein_per_100g * factor),
        carbs: round_tenth(item.carbs_per_100g * factor),
        fat: round_tenth(item.fat_per_100g * factor),
        per_100g: Per100g {
            calories: item.calories_per_100g,
            protein: item.protein_per_100g,
            carbs: item.carbs_per_100g,
            fat: item.fat_per_100g,
        },
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

struct FoodSeed {
    name: &'static str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    serving_label: &'static str,
    serving_grams: f64,
    tags: &'static [&'static str],
}

impl FoodSeed {
    fn to_item(&self) -> FoodItem {
        FoodItem {
            name: self.name.to_string(),
            calories_per_100g: self.calories,
            protein_per_100g: self.protein,
            carbs_per_100g: self.carbs,
            fat_per_100g: self.fat,
            serving_label: self.serving_label.to_string(),
            serving_grams: self.serving_grams,
            tags: self.tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

macro_rules! food {
    ($name:expr, $cal:expr, $p:expr, $c:expr, $f:expr, $label:expr, $grams:expr, [$($tag:expr),* $(,)?]) => {
        FoodSeed {
            name: $name,
            calories: $cal,
            protein: $p,
            carbs: $c,
            fat: $f,
            serving_label: $label,
            serving_grams: $grams,
            tags: &[$($tag),*],
        }
    };
}

const BUILTIN_FOODS: &[FoodSeed] = &[
    food!("Chicken Breast", 165.0, 31.0, 0.0, 3.6, "1 breast (150g)", 150.0, ["chicken", "poultry", "protein", "meat", "lean"]),
    food!("Chicken Thigh", 209.0, 26.0, 0.0, 10.9, "1 thigh (120g)", 120.0, ["chicken", "poultry", "protein", "meat"]),
    food!("Ground Beef (90% lean)", 176.0, 20.0, 0.0, 10.0, "4 oz (113g)", 113.0, ["beef", "meat", "protein", "red meat"]),
    food!("Salmon Fillet", 208.0, 20.0, 0.0, 13.0, "1 fillet (170g)", 170.0, ["fish", "seafood", "protein", "omega-3"]),
    food!("Tuna (canned in water)", 116.0, 26.0, 0.0, 0.8, "1 can (142g)", 142.0, ["fish", "seafood", "protein", "canned"]),
    food!("Shrimp", 99.0, 24.0, 0.2, 0.3, "3 oz (85g)", 85.0, ["seafood", "shellfish", "protein"]),
    food!("Turkey Breast", 135.0, 30.0, 0.0, 1.0, "3 oz (85g)", 85.0, ["turkey", "poultry", "protein", "meat", "lean"]),
    food!("Egg", 155.0, 13.0, 1.1, 11.0, "1 large (50g)", 50.0, ["eggs", "protein", "breakfast"]),
    food!("Egg Whites", 52.0, 11.0, 0.7, 0.2, "3 large (99g)", 99.0, ["eggs", "protein", "breakfast", "lean"]),
    food!("Tofu (firm)", 144.0, 17.0, 3.0, 9.0, "1/2 cup (126g)", 126.0, ["soy", "vegan", "vegetarian", "protein"]),
    food!("Greek Yogurt (plain, nonfat)", 59.0, 10.0, 3.6, 0.4, "1 container (170g)", 170.0, ["yogurt", "dairy", "protein", "breakfast"]),
    food!("Cottage Cheese (low fat)", 72.0, 12.0, 2.7, 1.0, "1/2 cup (113g)", 113.0, ["cheese", "dairy", "protein"]),
    food!("Cheddar Cheese", 403.0, 25.0, 1.3, 33.0, "1 slice (28g)", 28.0, ["cheese", "dairy"]),
    food!("Milk (2%)", 50.0, 3.3, 4.8, 2.0, "1 cup (244g)", 244.0, ["dairy", "drink", "breakfast"]),
    food!("Almond Milk (unsweetened)", 15.0, 0.6, 0.3, 1.2, "1 cup (240g)", 240.0, ["nuts", "dairy-free", "vegan", "drink"]),
    food!("Whey Protein Powder", 400.0, 80.0, 8.0, 6.0, "1 scoop (30g)", 30.0, ["protein", "supplement", "shake"]),
    food!("Protein Shake", 110.0, 12.5, 5.0, 1.5, "1 bottle (325g)", 325.0, ["protein", "drink", "supplement"]),
    food!("Brown Rice (cooked)", 112.0, 2.6, 23.5, 0.9, "1 cup (195g)", 195.0, ["rice", "grain", "carbs", "whole grain"]),
    food!("White Rice (cooked)", 130.0, 2.7, 28.0, 0.3, "1 cup (158g)", 158.0, ["rice", "grain", "carbs"]),
    food!("Quinoa (cooked)", 120.0, 4.4, 21.3, 1.9, "1 cup (185g)", 185.0, ["grain", "carbs", "whole grain", "vegan"]),
    food!("Oatmeal (cooked)", 71.0, 2.5, 12.0, 1.5, "1 cup (234g)", 234.0, ["oats", "grain", "breakfast", "whole grain"]),
    food!("Whole Wheat Bread", 247.0, 13.0, 41.0, 3.4, "1 slice (32g)", 32.0, ["bread", "grain", "whole grain", "carbs"]),
    food!("Sweet Potato", 86.0, 1.6, 20.0, 0.1, "1 medium (130g)", 130.0, ["potato", "vegetable", "carbs"]),
    food!("Pasta (cooked)", 131.0, 5.0, 25.0, 1.1, "1 cup (140g)", 140.0, ["grain", "carbs", "noodles"]),
    food!("Banana", 89.0, 1.1, 22.8, 0.3, "1 medium (120g)", 120.0, ["fruit", "snack", "breakfast"]),
    food!("Apple", 52.0, 0.3, 13.8, 0.2, "1 medium (182g)", 182.0, ["fruit", "snack"]),
    food!("Blueberries", 57.0, 0.7, 14.5, 0.3, "1 cup (148g)", 148.0, ["fruit", "berries", "breakfast"]),
    food!("Strawberries", 32.0, 0.7, 7.7, 0.3, "1 cup (152g)", 152.0, ["fruit", "berries"]),
    food!("Orange", 47.0, 0.9, 11.8, 0.1, "1 medium (131g)", 131.0, ["fruit", "citrus", "snack"]),
    food!("Avocado", 160.0, 2.0, 8.5, 14.7, "1/2 fruit (100g)", 100.0, ["fruit", "healthy fat", "vegan"]),
    food!("Broccoli", 34.0, 2.8, 6.6, 0.4, "1 cup chopped (91g)", 91.0, ["vegetable", "greens"]),
    food!("Spinach", 23.0, 2.9, 3.6, 0.4, "2 cups raw (60g)", 60.0, ["vegetable", "greens", "salad"]),
    food!("Mixed Salad Greens", 17.0, 1.3, 3.3, 0.2, "2 cups (85g)", 85.0, ["salad", "vegetable", "greens"]),
    food!("Carrots", 41.0, 0.9, 9.6, 0.2, "1 medium (61g)", 61.0, ["vegetable", "snack"]),
    food!("Black Beans (cooked)", 132.0, 8.9, 23.7, 0.5, "1/2 cup (86g)", 86.0, ["beans", "legumes", "vegan", "protein"]),
    food!("Lentils (cooked)", 116.0, 9.0, 20.0, 0.4, "1/2 cup (99g)", 99.0, ["legumes", "vegan", "protein"]),
    food!("Almonds", 579.0, 21.0, 22.0, 50.0, "1 oz (28g)", 28.0, ["nuts", "snack", "healthy fat"]),
    food!("Peanut Butter", 588.0, 25.0, 20.0, 50.0, "2 tbsp (32g)", 32.0, ["nuts", "spread", "healthy fat"]),
    food!("Olive Oil", 884.0, 0.0, 0.0, 100.0, "1 tbsp (14g)", 14.0, ["oil", "healthy fat", "cooking"]),
    food!("Dark Chocolate (70%)", 598.0, 7.8, 46.0, 43.0, "1 oz (28g)", 28.0, ["chocolate", "snack", "dessert"]),
    food!("Granola Bar", 471.0, 10.0, 64.0, 20.0, "1 bar (42g)", 42.0, ["snack", "bar", "oats"]),
    food!("Hummus", 166.0, 7.9, 14.3, 9.6, "2 tbsp (30g)", 30.0, ["dip", "legumes", "vegan", "snack"]),
    food!("Orange Juice", 45.0, 0.7, 10.4, 0.2, "1 cup (248g)", 248.0, ["juice", "drink", "citrus", "breakfast"]),
    food!("Coffee (black)", 2.0, 0.3, 0.0, 0.0, "1 cup (240g)", 240.0, ["coffee", "drink", "caffeine"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, tags: &[&str]) -> FoodItem {
        FoodItem {
            name: name.to_string(),
            calories_per_100g: 100.0,
            protein_per_100g: 10.0,
            carbs_per_100g: 10.0,
            fat_per_100g: 1.0,
            serving_label: "100g".to_string(),
            serving_grams: 100.0,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    fn names(results: &[SearchResult]) -> Vec<&str> {
        results.iter().map(|result| result.name.as_str()).collect()
    }

    #[test]
    fn exact_name_beats_exact_tag() {
        let catalog = FoodCatalog::new(vec![
            item("Grilled Poultry", &["chicken breast"]),
            item("Chicken Breast", &["poultry"]),
        ]);
        let results = catalog.search("chicken breast", 8);
        assert_eq!(names(&results), vec!["Chicken Breast", "Grilled Poultry"]);

        let words = ["chicken", "breast"];
        assert_eq!(score(&catalog.items()[1], "chicken breast", &words), 100);
        assert_eq!(score(&catalog.items()[0], "chicken breast", &words), 70);
    }

    #[test]
    fn substring_beats_all_words() {
        let catalog = FoodCatalog::new(vec![
            item("Shake with Protein Powder", &[]),
            item("Vanilla Protein Shake", &[]),
        ]);
        let results = catalog.search("protein shake", 8);
        assert_eq!(
            names(&results),
            vec!["Vanilla Protein Shake", "Shake with Protein Powder"]
        );

        let words = ["protein", "shake"];
        assert_eq!(score(&catalog.items()[0], "protein shake", &words), 50);
        assert_eq!(score(&catalog.items()[1], "protein shake", &words), 60);
    }

    #[test]
    fn score_ladder_follows_rule_order() {
        let query = "rice";
        let words = ["rice"];
        assert_eq!(score(&item("Rice", &[]), query, &words), 100);
        assert_eq!(score(&item("Rice Cakes", &[]), query, &words), 80);
        assert_eq!(score(&item("Brown Rice", &[]), query, &words), 60);
        assert_eq!(score(&item("Risotto", &["rice"]), query, &words), 70);
        assert_eq!(score(&item("Paella", &["ricey dishes"]), query, &words), 40);
        assert_eq!(score(&item("Bread", &["grain"]), query, &words), 0);
    }

    #[test]
    fn tag_exact_sits_between_substring_and_all_words() {
        let query = "green tea";
        let words = ["green", "tea"];
        let contains = item("Iced Green Tea", &[]);
        let tagged = item("Matcha", &["green tea"]);
        let all_words = item("Tea, Green Blend", &[]);
        assert_eq!(score(&contains, query, &words), 60);
        assert_eq!(score(&tagged, query, &words), 70);
        assert_eq!(score(&all_words, query, &words), 50);
    }

    #[test]
    fn partial_word_hits_score_twenty_each() {
        let words = ["salmon", "fish", "taco"];
        let food = item("Salmon Fillet", &["fish", "seafood"]);
        assert_eq!(score(&food, "salmon fish taco", &words), 40);
    }

    #[test]
    fn repeated_query_words_count_once() {
        assert_eq!(query_words("rice  rice brown rice"), vec!["rice", "brown"]);

        let food = item("Paella", &["rice dish", "seafood"]);
        let words = query_words("rice rice");
        assert_eq!(score(&food, "rice rice", &words), 20);
    }

    #[test]
    fn ties_keep_catalog_order() {
        let catalog = FoodCatalog::new(vec![
            item("Brown Rice", &[]),
            item("White Rice", &[]),
            item("Wild Rice", &[]),
        ]);
        let results = catalog.search("rice", 8);
        assert_eq!(names(&results), vec!["Brown Rice", "White Rice", "Wild Rice"]);
    }

    #[test]
    fn serving_scaling_rounds_macros() {
        let catalog = FoodCatalog::builtin();
        let results = catalog.search("chicken breast", 1);
        assert_eq!(results.len(), 1);
        let chicken = &results[0];
        assert_eq!(chicken.name, "Chicken Breast");
        assert_eq!(chicken.calories, 248);
        assert_eq!(chicken.protein, 46.5);
        assert_eq!(chicken.fat, 5.4);
        assert_eq!(chicken.per_100g.calories, 165.0);
        assert_eq!(chicken.serving_grams, 150.0);
    }

    #[test]
    fn short_or_empty_query_returns_nothing() {
        let catalog = FoodCatalog::builtin();
        assert!(catalog.search("", 8).is_empty());
        assert!(catalog.search("a", 8).is_empty());
        assert!(catalog.search("   a  ", 8).is_empty());
    }

    #[test]
    fn limit_is_clamped() {
        let catalog = FoodCatalog::builtin();
        assert_eq!(catalog.search("protein", 0).len(), 1);
        assert!(catalog.search("protein", 100).len() <= MAX_SEARCH_LIMIT);
        assert_eq!(catalog.search("protein", 3).len(), 3);
    }

    #[test]
    fn query_is_case_insensitive() {
        let catalog = FoodCatalog::builtin();
        let results = catalog.search("  BANANA ", 8);
        assert_eq!(results[0].name, "Banana");
    }

    #[test]
    fn invalid_serving_grams_are_dropped() {
        let mut broken = item("Air", &[]);
        broken.serving_grams = 0.0;
        let catalog = FoodCatalog::new(vec![broken, item("Bread", &["Grain"])]);
        assert_eq!(catalog.items().len(), 1);
        assert_eq!(catalog.items()[0].tags, vec!["grain".to_string()]);
    }

    #[test]
    fn get_is_case_insensitive() {
        let catalog = FoodCatalog::builtin();
        assert_eq!(catalog.get("salmon fillet").map(|f| f.serving_grams), Some(170.0));
        assert!(catalog.get("unicorn steak").is_none());
    }

    #[test]
    fn builtin_catalog_names_are_unique() {
        let catalog = FoodCatalog::builtin();
        let mut names: Vec<String> = catalog.items().iter().map(|f| f.name.to_lowercase()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
