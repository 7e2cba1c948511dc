use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::env;
use std::time::Duration;

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Connect to Postgres with pool settings from the environment. Feed and
/// moderation queue queries hold connections briefly, so the pool stays
/// small by default and gives up acquiring after eight seconds instead of
/// queueing forever.
pub async fn get_database() -> Result<DatabaseConnection, DbErr> {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(env_u64("DB_MAX_CONNECTIONS", 10) as u32)
        .min_connections(env_u64("DB_MIN_CONNECTIONS", 2) as u32)
        .connect_timeout(Duration::from_secs(env_u64("DB_CONNECT_TIMEOUT_SECS", 5)))
        .acquire_timeout(Duration::from_secs(env_u64("DB_ACQUIRE_TIMEOUT_SECS", 8)))
        .idle_timeout(Duration::from_secs(env_u64("DB_IDLE_TIMEOUT_SECS", 300)))
        .max_lifetime(Duration::from_secs(env_u64("DB_MAX_LIFETIME_SECS", 1800)))
        .sqlx_logging(env::var("DB_SQLX_LOGGING").map_or(true, |v| v != "0" && v != "false"));

    Database::connect(opt).await
}

#[cfg(test)]
mod tests {
    use super::env_u64;

    #[test]
    fn env_u64_falls_back_on_missing_or_garbage() {
        assert_eq!(env_u64("WAYFARE_NO_SUCH_VAR", 7), 7);
        std::env::set_var("WAYFARE_GARBAGE_VAR", "not-a-number");
        assert_eq!(env_u64("WAYFARE_GARBAGE_VAR", 3), 3);
    }
}
