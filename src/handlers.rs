use crate::engine::ChallengeEngine;
use crate::errors::AppError;
use crate::foods::{DEFAULT_SEARCH_LIMIT, is_searchable};
use crate::models::{
    ChallengeStats, CompletionResponse, FoodSearchResponse, HistoryEntry, SearchParams,
    TodayResponse, UserQuery,
};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::error;

const DEFAULT_USER: &str = "default";
const MAX_USER_LEN: usize = 64;

pub async fn search_foods(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<FoodSearchResponse> {
    let query = params.q.unwrap_or_default();
    if !is_searchable(&query) {
        return Json(FoodSearchResponse {
            success: true,
            foods: Vec::new(),
            query: None,
        });
    }

    let limit = params
        .limit
        .as_deref()
        .and_then(|value| value.trim().parse::<i64>().ok())
        .map(|value| value.max(1) as usize)
        .unwrap_or(DEFAULT_SEARCH_LIMIT);
    let foods = state.foods.search(&query, limit);

    Json(FoodSearchResponse {
        success: true,
        foods,
        query: Some(query),
    })
}

pub async fn get_today(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<TodayResponse>, AppError> {
    let response = with_user_engine(&state, params, |engine| {
        let challenges = engine.todays_challenges();
        TodayResponse {
            date: engine.today(),
            all_completed: engine.are_todays_challenges_completed(),
            challenges,
        }
    })
    .await?;
    Ok(Json(response))
}

pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<UserQuery>,
) -> Result<Json<CompletionResponse>, AppError> {
    let challenge = id.clone();
    let streak = with_user_engine(&state, params, move |engine| {
        engine
            .complete_challenge(&challenge)
            .then(|| engine.streak().clone())
    })
    .await?
    .ok_or_else(|| AppError::not_found(format!("challenge {id} is not assigned today")))?;

    Ok(Json(CompletionResponse {
        success: true,
        streak,
    }))
}

pub async fn uncomplete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<UserQuery>,
) -> Result<Json<CompletionResponse>, AppError> {
    let challenge = id.clone();
    let streak = with_user_engine(&state, params, move |engine| {
        engine
            .uncomplete_challenge(&challenge)
            .then(|| engine.streak().clone())
    })
    .await?
    .ok_or_else(|| AppError::not_found(format!("challenge {id} is not assigned today")))?;

    Ok(Json(CompletionResponse {
        success: true,
        streak,
    }))
}

pub async fn get_history(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let history = with_user_engine(&state, params, |engine| engine.history().to_vec()).await?;
    Ok(Json(history))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> Result<Json<ChallengeStats>, AppError> {
    let stats = with_user_engine(&state, params, |engine| engine.stats()).await?;
    Ok(Json(stats))
}

async fn with_user_engine<T, F>(state: &AppState, params: UserQuery, op: F) -> Result<T, AppError>
where
    F: FnOnce(&mut ChallengeEngine) -> T + Send + 'static,
    T: Send + 'static,
{
    let user = params.user.unwrap_or_else(|| DEFAULT_USER.to_string());
    let user = user.trim();
    if !valid_user(user) {
        return Err(AppError::bad_request(
            "user must be 1-64 characters of letters, digits, '-' or '_'",
        ));
    }
    state.with_engine(user, op).await.map_err(|err| {
        error!("challenge task for {user} failed: {err}");
        AppError::internal(err)
    })
}

fn valid_user(user: &str) -> bool {
    !user.is_empty()
        && user.len() <= MAX_USER_LEN
        && user
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenges::builtin_templates;
    use crate::clock::FixedClock;
    use crate::config::Config;
    use crate::foods::FoodCatalog;
    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn test_state(name: &str, clock: &FixedClock) -> AppState {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut data_dir = std::env::temp_dir();
        data_dir.push(format!("fitmunch_handlers_{name}_{}_{nanos}", std::process::id()));
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

    fn user(name: &str) -> Query<UserQuery> {
        Query(UserQuery {
            user: Some(name.to_string()),
        })
    }

    #[tokio::test]
    async fn stats_drop_streak_after_missed_days() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        let state = test_state("stale", &clock);

        let today = get_today(State(state.clone()), user("carol")).await.unwrap().0;
        let id = today.challenges[0].id.clone();
        let done = complete(State(state.clone()), Path(id), user("carol"))
            .await
            .unwrap()
            .0;
        assert_eq!(done.streak.current_streak, 1);

        clock.advance_days(3);
        let stats = get_stats(State(state.clone()), user("carol")).await.unwrap().0;
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.total_completed, 1);
    }

    #[tokio::test]
    async fn unknown_challenge_is_not_found() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        let state = test_state("unknown", &clock);

        let err = complete(State(state), Path("nope".to_string()), user("dave"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn failed_engine_task_is_an_internal_error() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        let state = test_state("panic", &clock);

        let err = with_user_engine(&state, UserQuery { user: None }, |_| -> u32 {
            panic!("engine blew up")
        })
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn user_names_cannot_escape_the_data_dir() {
        assert!(valid_user("default"));
        assert!(valid_user("jane_doe-42"));
        assert!(!valid_user(""));
        assert!(!valid_user("../etc/passwd"));
        assert!(!valid_user("a b"));
        assert!(!valid_user(&"x".repeat(65)));
    }
}
