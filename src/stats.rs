use crate::clock::date_key;
use crate::models::{ChallengeStats, DailyPoints, StreakState, UserChallenge};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

pub fn build_stats_at(
    today: NaiveDate,
    challenges: &[UserChallenge],
    streak: &StreakState,
) -> ChallengeStats {
    let mut per_day: BTreeMap<&str, DailyPoints> = BTreeMap::new();
    let mut total_completed = 0u32;
    let mut total_points = 0u32;

    for challenge in challenges.iter().filter(|challenge| challenge.completed) {
        total_completed = total_completed.saturating_add(1);
        total_points = total_points.saturating_add(challenge.points);
        let day = per_day
            .entry(challenge.date.as_str())
            .or_insert_with(|| DailyPoints {
                date: challenge.date.clone(),
                completed: 0,
                points: 0,
            });
        day.completed = day.completed.saturating_add(1);
        day.points = day.points.saturating_add(challenge.points);
    }

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = date_key(today - Duration::days(offset));
        let point = per_day.get(date.as_str()).cloned().unwrap_or(DailyPoints {
            date,
            completed: 0,
            points: 0,
        });
        last_7_days.push(point);
    }

    let today_key = date_key(today);
    let todays = challenges.iter().filter(|challenge| challenge.date == today_key);
    let today_total = todays.clone().count() as u32;
    let today_completed = todays.filter(|challenge| challenge.completed).count() as u32;

    ChallengeStats {
        current_streak: streak.current_streak,
        longest_streak: streak.longest_streak,
        total_completed,
        total_points,
        today_completed,
        today_total,
        last_7_days,
    }
}
