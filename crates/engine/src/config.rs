//! Runtime configuration read from the environment.

use chrono::Duration;

pub const DEFAULT_IDLE_WORLD_TIMEOUT_MS: i64 = 5 * 60 * 1000;
pub const DEFAULT_WORLD_HEARTBEAT_INTERVAL_MS: i64 = 60 * 1000;
pub const DEFAULT_ENGINE_ACTION_DURATION_MS: i64 = 30 * 1000;
pub const DEFAULT_DEAD_SWEEP_PERIOD_MS: i64 = 60 * 1000;

/// Lifecycle timings shared by the heartbeat handler and the liveness sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleConfig {
    /// A running world with no view for this long is stopped.
    pub idle_timeout: Duration,
    /// Expected client heartbeat period. Views are persisted at most every half interval.
    pub heartbeat_interval: Duration,
    /// Nominal wall-clock budget of one engine tick cycle.
    pub action_duration: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::milliseconds(DEFAULT_IDLE_WORLD_TIMEOUT_MS),
            heartbeat_interval: Duration::milliseconds(DEFAULT_WORLD_HEARTBEAT_INTERVAL_MS),
            action_duration: Duration::milliseconds(DEFAULT_ENGINE_ACTION_DURATION_MS),
        }
    }
}

/// Full process configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub database_path: String,
    pub server_host: String,
    pub server_port: u16,
    pub lifecycle: LifecycleConfig,
    pub idle_sweep_period: std::time::Duration,
    pub dead_sweep_period: std::time::Duration,
}

impl EngineConfig {
    /// Read configuration from environment variables.
    ///
    /// Supported environment variables:
    /// - DATABASE_PATH (default `worldkeeper.db`)
    /// - SERVER_HOST / SERVER_PORT or PORT
    /// - IDLE_WORLD_TIMEOUT_MS, WORLD_HEARTBEAT_INTERVAL_MS, ENGINE_ACTION_DURATION_MS
    /// - IDLE_SWEEP_PERIOD_MS (defaults to the idle timeout), DEAD_SWEEP_PERIOD_MS
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_path = lookup("DATABASE_PATH").unwrap_or_else(|| "worldkeeper.db".into());
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let server_port = match lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            Some(val) => val.parse::<u16>().unwrap_or_else(|_| {
                tracing::warn!(val = %val, "SERVER_PORT is not a valid port, using 3000");
                3000
            }),
            None => 3000,
        };

        let idle_timeout_ms = positive_millis(
            &lookup,
            "IDLE_WORLD_TIMEOUT_MS",
            DEFAULT_IDLE_WORLD_TIMEOUT_MS,
        );
        let heartbeat_interval_ms = positive_millis(
            &lookup,
            "WORLD_HEARTBEAT_INTERVAL_MS",
            DEFAULT_WORLD_HEARTBEAT_INTERVAL_MS,
        );
        let action_duration_ms = positive_millis(
            &lookup,
            "ENGINE_ACTION_DURATION_MS",
            DEFAULT_ENGINE_ACTION_DURATION_MS,
        );
        let idle_sweep_ms = positive_millis(&lookup, "IDLE_SWEEP_PERIOD_MS", idle_timeout_ms);
        let dead_sweep_ms =
            positive_millis(&lookup, "DEAD_SWEEP_PERIOD_MS", DEFAULT_DEAD_SWEEP_PERIOD_MS);

        Self {
            database_path,
            server_host,
            server_port,
            lifecycle: LifecycleConfig {
                idle_timeout: Duration::milliseconds(idle_timeout_ms),
                heartbeat_interval: Duration::milliseconds(heartbeat_interval_ms),
                action_duration: Duration::milliseconds(action_duration_ms),
            },
            idle_sweep_period: std::time::Duration::from_millis(idle_sweep_ms.unsigned_abs()),
            dead_sweep_period: std::time::Duration::from_millis(dead_sweep_ms.unsigned_abs()),
        }
    }
}

fn positive_millis(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: i64) -> i64 {
    let Some(val) = lookup(key) else {
        return default;
    };

    match val.trim().parse::<i64>() {
        Ok(ms) if ms > 0 => {
            tracing::info!(key, ms, "Applied environment override");
            ms
        }
        Ok(ms) => {
            tracing::warn!(key, ms, default, "Value must be positive, ignoring");
            default
        }
        Err(_) => {
            tracing::warn!(key, val = %val, default, "Value is not a valid integer, ignoring");
            default
        }
    }
}
