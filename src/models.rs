use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub name: String,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub serving_label: String,
    pub serving_grams: f64,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Per100g {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub name: String,
    pub serving_label: String,
    pub serving_grams: f64,
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub per_100g: Per100g,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Nutrition,
    Fitness,
    Mindfulness,
    Hydration,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Nutrition,
        Category::Fitness,
        Category::Mindfulness,
        Category::Hydration,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

// Informational only: nothing checks how a completion was verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verification {
    Auto,
    #[serde(rename = "self")]
    SelfReported,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeTemplate {
    pub id: String,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub points: u32,
    pub difficulty: Difficulty,
    pub verification: Verification,
}

/// A template snapshot assigned to a user for one calendar day.
///
/// Template fields are copied at assignment time so later catalog edits
/// never rewrite challenges that were already handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChallenge {
    pub id: String,
    pub date: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub points: u32,
    pub difficulty: Difficulty,
    pub verification: Verification,
    pub completed: bool,
    pub completed_timestamp: Option<String>,
}

impl UserChallenge {
    pub fn assign(template: &ChallengeTemplate, date: &str) -> Self {
        Self {
            id: template.id.clone(),
            date: date.to_string(),
            title: template.title.clone(),
            description: template.description.clone(),
            category: template.category,
            points: template.points,
            difficulty: template.difficulty,
            verification: template.verification,
            completed: false,
            completed_timestamp: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completed_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub points: u32,
    pub timestamp: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoints {
    pub date: String,
    pub completed: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completed: u32,
    pub total_points: u32,
    pub today_completed: u32,
    pub today_total: u32,
    pub last_7_days: Vec<DailyPoints>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FoodSearchResponse {
    pub success: bool,
    pub foods: Vec<SearchResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    pub date: String,
    pub challenges: Vec<UserChallenge>,
    pub all_completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub success: bool,
    pub streak: StreakState,
}
