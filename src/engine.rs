use crate::challenges::{DEFAULT_CHALLENGES_PER_DAY, select_challenges};
use crate::clock::{Clock, date_key, parse_date_key};
use crate::events::{ChallengeEvent, Listener, Listeners};
use crate::models::{ChallengeStats, ChallengeTemplate, HistoryEntry, StreakState, UserChallenge};
use crate::stats::build_stats_at;
use crate::storage::Persistence;
use chrono::NaiveDate;
use rand::RngCore;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const CHALLENGES_KEY: &str = "fitmunch_user_challenges";
pub const CURRENT_STREAK_KEY: &str = "fitmunch_challenge_streak";
pub const LONGEST_STREAK_KEY: &str = "fitmunch_longest_streak";
pub const LAST_COMPLETED_KEY: &str = "fitmunch_last_completed_date";
pub const HISTORY_KEY: &str = "fitmunch_challenge_history";
pub const HISTORY_LIMIT: usize = 100;

/// Daily challenge assignment and streak tracking for a single user.
///
/// Every read of stored state fails open: anything missing or malformed is
/// logged and replaced by its empty default, so callers never see a storage
/// error.
pub struct ChallengeEngine {
    templates: Arc<[ChallengeTemplate]>,
    clock: Arc<dyn Clock>,
    store: Box<dyn Persistence>,
    rng: Box<dyn RngCore + Send + Sync>,
    per_day: usize,
    challenges: Vec<UserChallenge>,
    history: Vec<HistoryEntry>,
    streak: StreakState,
    streak_checked_on: Option<NaiveDate>,
    listeners: Listeners,
}

impl ChallengeEngine {
    pub fn new(
        templates: Arc<[ChallengeTemplate]>,
        clock: Arc<dyn Clock>,
        store: Box<dyn Persistence>,
        rng: Box<dyn RngCore + Send + Sync>,
    ) -> Self {
        let challenges = load_or_default(store.as_ref(), CHALLENGES_KEY);
        let history = load_or_default(store.as_ref(), HISTORY_KEY);
        let streak = StreakState {
            current_streak: load_or_default(store.as_ref(), CURRENT_STREAK_KEY),
            longest_streak: load_or_default(store.as_ref(), LONGEST_STREAK_KEY),
            last_completed_date: load_or_default(store.as_ref(), LAST_COMPLETED_KEY),
        };

        let mut engine = Self {
            templates,
            clock,
            store,
            rng,
            per_day: DEFAULT_CHALLENGES_PER_DAY,
            challenges,
            history,
            streak,
            streak_checked_on: None,
            listeners: Listeners::default(),
        };
        engine.update_streak();
        engine
    }

    pub fn with_challenges_per_day(mut self, per_day: usize) -> Self {
        self.per_day = per_day.max(1);
        self
    }

    pub fn add_listener(&mut self, listener: Listener) {
        self.listeners.add(listener);
    }

    pub fn today(&self) -> String {
        date_key(self.clock.today())
    }

    /// Re-evaluates the streak once the calendar day has moved on since the
    /// last evaluation. Same-day calls are free.
    pub fn refresh(&mut self) {
        if self.streak_checked_on != Some(self.clock.today()) {
            self.update_streak();
        }
    }

    pub fn todays_challenges(&mut self) -> Vec<UserChallenge> {
        self.refresh();
        let today = self.today();
        if !self.challenges.iter().any(|challenge| challenge.date == today) {
            self.assign_challenges(&today);
        }
        self.challenges_for(&today).cloned().collect()
    }

    fn assign_challenges(&mut self, today: &str) {
        let assigned: Vec<UserChallenge> =
            select_challenges(&self.templates, self.per_day, self.rng.as_mut())
                .into_iter()
                .map(|template| UserChallenge::assign(template, today))
                .collect();
        let ids: Vec<String> = assigned.iter().map(|challenge| challenge.id.clone()).collect();
        info!("assigned {} challenges for {today}: {ids:?}", ids.len());

        self.challenges.retain(|challenge| challenge.date != today);
        self.challenges.extend(assigned);
        self.persist(CHALLENGES_KEY, &self.challenges);

        self.listeners.notify(&ChallengeEvent::ChallengesAssigned {
            date: today.to_string(),
            ids,
        });
    }

    pub fn complete_challenge(&mut self, id: &str) -> bool {
        let today = self.today();
        let timestamp = self.clock.now_timestamp();
        let Some(challenge) = self
            .challenges
            .iter_mut()
            .find(|challenge| challenge.id == id && challenge.date == today)
        else {
            warn!("cannot complete {id:?}: not assigned for {today}");
            return false;
        };
        if challenge.completed {
            return true;
        }

        challenge.completed = true;
        challenge.completed_timestamp = Some(timestamp.clone());
        let entry = HistoryEntry {
            id: challenge.id.clone(),
            title: challenge.title.clone(),
            category: challenge.category,
            points: challenge.points,
            timestamp,
            date: today,
        };
        let points = challenge.points;

        self.persist(CHALLENGES_KEY, &self.challenges);
        self.record_history(entry);
        self.listeners.notify(&ChallengeEvent::ChallengeCompleted {
            id: id.to_string(),
            points,
        });
        self.update_streak();
        true
    }

    /// Clears a completion. History keeps the original entry, and a streak
    /// already extended today is left as is.
    pub fn uncomplete_challenge(&mut self, id: &str) -> bool {
        let today = self.today();
        let Some(challenge) = self
            .challenges
            .iter_mut()
            .find(|challenge| challenge.id == id && challenge.date == today)
        else {
            warn!("cannot uncomplete {id:?}: not assigned for {today}");
            return false;
        };
        if !challenge.completed {
            return true;
        }

        challenge.completed = false;
        challenge.completed_timestamp = None;

        self.persist(CHALLENGES_KEY, &self.challenges);
        self.listeners.notify(&ChallengeEvent::ChallengeUncompleted { id: id.to_string() });
        self.update_streak();
        true
    }

    pub fn update_streak(&mut self) -> StreakState {
        let today = self.clock.today();
        let yesterday = self.clock.yesterday();
        let today_key = date_key(today);
        let previous = self.streak.clone();
        self.streak_checked_on = Some(today);

        let completed_today = self
            .challenges_for(&today_key)
            .any(|challenge| challenge.completed);
        let last = self
            .streak
            .last_completed_date
            .as_deref()
            .and_then(parse_date_key);

        if completed_today {
            if last == Some(yesterday) {
                self.streak.current_streak += 1;
            } else if last != Some(today) {
                self.streak.current_streak = 1;
            }
            self.streak.last_completed_date = Some(today_key);
        } else if self.streak.last_completed_date.is_some()
            && last.is_none_or(|date| date < yesterday)
        {
            self.streak.current_streak = 0;
        }
        self.streak.longest_streak = self.streak.longest_streak.max(self.streak.current_streak);

        self.persist(CURRENT_STREAK_KEY, &self.streak.current_streak);
        self.persist(LONGEST_STREAK_KEY, &self.streak.longest_streak);
        self.persist(LAST_COMPLETED_KEY, &self.streak.last_completed_date);

        if previous.current_streak != self.streak.current_streak
            || previous.longest_streak != self.streak.longest_streak
        {
            self.listeners.notify(&ChallengeEvent::StreakUpdated {
                current: self.streak.current_streak,
                longest: self.streak.longest_streak,
            });
        }
        self.streak.clone()
    }

    pub fn are_todays_challenges_completed(&self) -> bool {
        let today = self.today();
        let mut todays = self.challenges_for(&today).peekable();
        todays.peek().is_some() && todays.all(|challenge| challenge.completed)
    }

    /// Streak as of the last evaluation; call [`Self::refresh`] first on a
    /// long-lived engine.
    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn challenges(&self) -> &[UserChallenge] {
        &self.challenges
    }

    pub fn total_points(&self) -> u32 {
        self.challenges
            .iter()
            .filter(|challenge| challenge.completed)
            .map(|challenge| challenge.points)
            .sum()
    }

    pub fn stats(&mut self) -> ChallengeStats {
        self.refresh();
        build_stats_at(self.clock.today(), &self.challenges, &self.streak)
    }

    fn challenges_for<'a>(&'a self, date: &'a str) -> impl Iterator<Item = &'a UserChallenge> + 'a {
        self.challenges
            .iter()
            .filter(move |challenge| challenge.date == date)
    }

    fn record_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
        self.persist(HISTORY_KEY, &self.history);
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let result = serde_json::to_value(value)
            .map_err(Into::into)
            .and_then(|value| self.store.save(key, value));
        if let Err(err) = result {
            error!("failed to persist {key}: {err}");
        }
    }
}

impl std::fmt::Debug for ChallengeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChallengeEngine")
            .field("per_day", &self.per_day)
            .field("challenges", &self.challenges.len())
            .field("history", &self.history.len())
            .field("streak", &self.streak)
            .field("listeners", &self.listeners)
            .finish()
    }
}

fn load_or_default<T: DeserializeOwned + Default>(store: &dyn Persistence, key: &str) -> T {
    match store.load(key) {
        Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|err| {
            error!("malformed stored value for {key}, using default: {err}");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(err) => {
            error!("failed to load {key}, using default: {err}");
            T::default()
        }
    }
}
