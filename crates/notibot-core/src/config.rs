use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, linking::MAX_STORE_CALLS, Result};

/// Typed configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,

    // Store
    pub supabase_url: String,
    pub supabase_key: String,
    pub bind_codes_table: String,
    pub users_table: String,
    pub store_timeout: Duration,

    // Behavior
    pub command_timeout: Duration,
    pub fallback_user_name: String,

    // Health endpoint
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `load` uses the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let telegram_bot_token = get("TELEGRAM_TOKEN")
            .or_else(|| get("TELEGRAM_BOT_TOKEN"))
            .ok_or_else(|| {
                Error::Config("TELEGRAM_TOKEN environment variable is required".to_string())
            })?;

        let supabase_url = get("SUPABASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .ok_or_else(|| {
                Error::Config("SUPABASE_URL environment variable is required".to_string())
            })?;
        let supabase_key = get("SUPABASE_ANON_KEY")
            .or_else(|| get("SUPABASE_KEY"))
            .ok_or_else(|| {
                Error::Config("SUPABASE_ANON_KEY environment variable is required".to_string())
            })?;

        let bind_codes_table =
            get("BIND_CODES_TABLE").unwrap_or_else(|| "telegram_bind_codes".to_string());
        let users_table = get("USERS_TABLE").unwrap_or_else(|| "users".to_string());

        let store_timeout =
            Duration::from_millis(parse_u64(&get, "STORE_TIMEOUT_MS")?.unwrap_or(10_000));
        // A command must outlive a worst-case bind, or a bind that already
        // updated the user could be reported as a failure.
        let bind_worst_case = store_timeout * MAX_STORE_CALLS;
        let command_timeout = match parse_u64(&get, "COMMAND_TIMEOUT_MS")? {
            Some(ms) => Duration::from_millis(ms),
            None => bind_worst_case + Duration::from_secs(5),
        };
        if command_timeout <= bind_worst_case {
            return Err(Error::Config(format!(
                "COMMAND_TIMEOUT_MS must exceed {MAX_STORE_CALLS} x STORE_TIMEOUT_MS ({} ms)",
                bind_worst_case.as_millis()
            )));
        }
        let fallback_user_name = get("FALLBACK_USER_NAME").unwrap_or_else(|| "User".to_string());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("PORT must be a port number: {e}")))?,
            None => 3000,
        };

        Ok(Self {
            telegram_bot_token,
            supabase_url,
            supabase_key,
            bind_codes_table,
            users_table,
            store_timeout,
            command_timeout,
            fallback_user_name,
            port,
        })
    }
}

fn parse_u64(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    get(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| Error::Config(format!("{key} must be an integer: {e}")))
        })
        .transpose()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let Some((key, val)) = parse_dotenv_line(raw) else {
            continue;
        };
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv_line(raw: &str) -> Option<(String, String)> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (k, v) = line.split_once('=')?;
    let key = k.trim();
    if key.is_empty() {
        return None;
    }

    let mut val = v.trim();
    // Strip optional surrounding quotes.
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        val = &val[1..val.len() - 1];
    }

    Some((key.to_string(), val.to_string()))
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
