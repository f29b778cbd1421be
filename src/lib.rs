pub mod app;
pub mod challenges;
pub mod clock;
pub mod config;
pub mod engine;
pub mod errors;
pub mod events;
pub mod foods;
pub mod handlers;
pub mod models;
pub mod state;
pub mod stats;
pub mod storage;

pub use app::router;
pub use config::Config;
pub use engine::ChallengeEngine;
pub use foods::FoodCatalog;
pub use state::AppState;
