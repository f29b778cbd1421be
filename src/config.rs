use crate::challenges::DEFAULT_CHALLENGES_PER_DAY;
use std::{env, fmt::Display, path::PathBuf, str::FromStr};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub challenges_per_day: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: parse_or("PORT", 8080),
            data_dir: env::var("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            challenges_per_day: parse_or("CHALLENGES_PER_DAY", DEFAULT_CHALLENGES_PER_DAY).max(1),
        }
    }
}

fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|err| {
            warn!("invalid {key} value {raw:?} ({err}), using default: {default}");
            default
        }),
        Err(_) => default,
    }
}
