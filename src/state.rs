use crate::challenges::builtin_templates;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::engine::ChallengeEngine;
use crate::foods::FoodCatalog;
use crate::models::ChallengeTemplate;
use crate::storage::JsonFileStore;
use rand::{SeedableRng, rngs::StdRng};
use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::PathBuf,
    sync::Arc,
};
use tokio::{sync::Mutex, task::JoinError};

const USER_LOCK_STRIPES: usize = 64;

#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub challenges_per_day: usize,
    pub foods: Arc<FoodCatalog>,
    pub templates: Arc<[ChallengeTemplate]>,
    pub clock: Arc<dyn Clock>,
    user_locks: Arc<[Mutex<()>]>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            config,
            FoodCatalog::builtin(),
            builtin_templates(),
            Arc::new(SystemClock),
        )
    }

    pub fn with_parts(
        config: &Config,
        foods: FoodCatalog,
        templates: Vec<ChallengeTemplate>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            data_dir: config.data_dir.clone(),
            challenges_per_day: config.challenges_per_day,
            foods: Arc::new(foods),
            templates: templates.into(),
            clock,
            user_locks: (0..USER_LOCK_STRIPES).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Loads the user's engine from disk, runs `op` on a blocking thread, and
    /// drops the engine again. Requests for the same user are serialized by a
    /// fixed set of striped locks, so nothing grows with the number of users.
    pub async fn with_engine<T, F>(&self, user: &str, op: F) -> Result<T, JoinError>
    where
        F: FnOnce(&mut ChallengeEngine) -> T + Send + 'static,
        T: Send + 'static,
    {
        let _guard = self.user_lock(user).lock().await;
        let state = self.clone();
        let user = user.to_string();
        tokio::task::spawn_blocking(move || {
            let mut engine = state.build_engine(&user);
            op(&mut engine)
        })
        .await
    }

    pub fn build_engine(&self, user: &str) -> ChallengeEngine {
        ChallengeEngine::new(
            Arc::clone(&self.templates),
            Arc::clone(&self.clock),
            Box::new(JsonFileStore::for_user(&self.data_dir, user)),
            Box::new(StdRng::from_entropy()),
        )
        .with_challenges_per_day(self.challenges_per_day)
    }

    fn user_lock(&self, user: &str) -> &Mutex<()> {
        let mut hasher = DefaultHasher::new();
        user.hash(&mut hasher);
        &self.user_locks[hasher.finish() as usize % self.user_locks.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn test_state(name: &str, clock: &FixedClock) -> AppState {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut data_dir = std::env::temp_dir();
        data_dir.push(format!("fitmunch_state_{name}_{}_{nanos}", std::process::id()));
        let config = Config {
            port: 0,
            data_dir,
            challenges_per_day: 3,
        };
        AppState::with_parts(
            &config,
            FoodCatalog::builtin(),
            builtin_templates(),
            Arc::new(clock.clone()),
        )
    }

    #[test]
    fn same_user_always_maps_to_the_same_lock() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        let state = test_state("locks", &clock);
        assert!(std::ptr::eq(state.user_lock("alice"), state.user_lock("alice")));
        assert_eq!(state.user_locks.len(), USER_LOCK_STRIPES);
    }

    #[tokio::test]
    async fn each_call_reloads_engine_from_disk() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        let state = test_state("reload", &clock);

        let first = state
            .with_engine("alice", |engine| engine.todays_challenges())
            .await
            .unwrap();
        let id = first[0].id.clone();
        let completed = state
            .with_engine("alice", move |engine| engine.complete_challenge(&id))
            .await
            .unwrap();
        assert!(completed);

        let again = state
            .with_engine("alice", |engine| engine.todays_challenges())
            .await
            .unwrap();
        assert_eq!(again.len(), 3);
        assert!(again[0].completed);

        clock.advance_days(3);
        let stats = state
            .with_engine("alice", |engine| engine.stats())
            .await
            .unwrap();
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 1);
    }
}
