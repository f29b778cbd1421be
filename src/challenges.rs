use crate::models::{Category, ChallengeTemplate, Difficulty, Verification};
use rand::{RngCore, seq::SliceRandom};

pub const DEFAULT_CHALLENGES_PER_DAY: usize = 3;

/// Walks the categories in fixed order taking one random template from each
/// until `count` are picked, then tops up from the unpicked remainder.
///
/// With fewer slots than categories the trailing categories are simply never
/// visited, so coverage is not one-of-each.
pub fn select_challenges<'a>(
    templates: &'a [ChallengeTemplate],
    count: usize,
    rng: &mut dyn RngCore,
) -> Vec<&'a ChallengeTemplate> {
    let mut picked: Vec<&ChallengeTemplate> = Vec::with_capacity(count);

    for category in Category::ALL {
        if picked.len() >= count {
            break;
        }
        let pool: Vec<&ChallengeTemplate> = templates
            .iter()
            .filter(|template| template.category == category)
            .collect();
        if let Some(template) = pool.choose(&mut *rng).copied() {
            picked.push(template);
        }
    }

    while picked.len() < count {
        let remaining: Vec<&ChallengeTemplate> = templates
            .iter()
            .filter(|template| !picked.iter().any(|chosen| chosen.id == template.id))
            .collect();
        match remaining.choose(&mut *rng).copied() {
            Some(template) => picked.push(template),
            None => break,
        }
    }

    picked
}

pub fn builtin_templates() -> Vec<ChallengeTemplate> {
    BUILTIN_TEMPLATES
        .iter()
        .map(|(id, category, title, description, points, difficulty, verification)| {
            ChallengeTemplate {
                id: id.to_string(),
                category: *category,
                title: title.to_string(),
                description: description.to_string(),
                points: *points,
                difficulty: *difficulty,
                verification: *verification,
            }
        })
        .collect()
}

type TemplateSeed = (
    &'static str,
    Category,
    &'static str,
    &'static str,
    u32,
    Difficulty,
    Verification,
);

const BUILTIN_TEMPLATES: &[TemplateSeed] = &[
    ("log-breakfast", Category::Nutrition, "Log Your Breakfast", "Record everything you eat for breakfast today.", 10, Difficulty::Easy, Verification::Auto),
    ("protein-goal", Category::Nutrition, "Hit Your Protein Goal", "Reach your daily protein target.", 25, Difficulty::Medium, Verification::Auto),
    ("veggie-servings", Category::Nutrition, "Five Servings of Veggies", "Eat at least five servings of vegetables.", 20, Difficulty::Medium, Verification::SelfReported),
    ("no-added-sugar", Category::Nutrition, "No Added Sugar", "Skip foods and drinks with added sugar all day.", 35, Difficulty::Hard, Verification::SelfReported),
    ("log-all-meals", Category::Nutrition, "Log Every Meal", "Log breakfast, lunch, dinner and snacks.", 30, Difficulty::Hard, Verification::Auto),
    ("walk-10k", Category::Fitness, "10,000 Steps", "Walk at least 10,000 steps today.", 25, Difficulty::Medium, Verification::Auto),
    ("stretch-10", Category::Fitness, "Stretch Break", "Spend 10 minutes stretching.", 10, Difficulty::Easy, Verification::SelfReported),
    ("complete-workout", Category::Fitness, "Finish a Workout", "Complete one workout from your plan.", 30, Difficulty::Medium, Verification::Auto),
    ("pushups-50", Category::Fitness, "50 Push-ups", "Do 50 push-ups, split into as many sets as you need.", 35, Difficulty::Hard, Verification::SelfReported),
    ("take-stairs", Category::Fitness, "Take the Stairs", "Use the stairs instead of the elevator all day.", 10, Difficulty::Easy, Verification::SelfReported),
    ("meditate-5", Category::Mindfulness, "Five Minute Meditation", "Sit quietly and focus on your breath for five minutes.", 10, Difficulty::Easy, Verification::SelfReported),
    ("gratitude-list", Category::Mindfulness, "Gratitude List", "Write down three things you are grateful for.", 15, Difficulty::Easy, Verification::SelfReported),
    ("screen-free-hour", Category::Mindfulness, "Screen-Free Hour", "Spend one hour before bed without screens.", 25, Difficulty::Medium, Verification::SelfReported),
    ("mindful-meal", Category::Mindfulness, "Mindful Meal", "Eat one meal slowly with no distractions.", 20, Difficulty::Medium, Verification::SelfReported),
    ("sleep-8", Category::Mindfulness, "Eight Hours of Sleep", "Get at least eight hours of sleep tonight.", 30, Difficulty::Hard, Verification::SelfReported),
    ("water-8", Category::Hydration, "Eight Glasses of Water", "Drink eight glasses of water today.", 20, Difficulty::Medium, Verification::Auto),
    ("morning-water", Category::Hydration, "Morning Glass", "Drink a glass of water right after waking up.", 10, Difficulty::Easy, Verification::SelfReported),
    ("no-soda", Category::Hydration, "Skip the Soda", "Replace every soft drink with water or tea.", 20, Difficulty::Medium, Verification::SelfReported),
    ("water-3l", Category::Hydration, "Three Liters", "Drink three liters of water before bedtime.", 35, Difficulty::Hard, Verification::Auto),
];
