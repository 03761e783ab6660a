use std::{env, fs, path::Path, time::Duration};

use crate::{delivery::DeliveryPolicy, domain::UserId, errors::Error, Result};

pub const DEFAULT_FRONTEND_URL: &str = "https://your-pages-project.pages.dev";

/// Typed configuration for the relay.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,
    pub admin_ids: Vec<UserId>,

    // Backend
    pub worker_url: Option<String>,
    pub api_token: Option<String>,
    pub frontend_url: String,

    // Delivery policy
    pub delivery_max_attempts: u32,
    pub delivery_retry_delay: Duration,
    pub delivery_timeout: Duration,
}

/// Backend address + credential, present only when both are set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    pub endpoint: String,
    pub token: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process env in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let admin_ids = parse_csv_i64(lookup("NEKOINBOX_ADMIN_IDS"))
            .into_iter()
            .map(UserId)
            .collect();

        let worker_url = lookup("CF_WORKER_URL").and_then(non_empty);
        let api_token = lookup("CF_API_TOKEN").and_then(non_empty);
        let frontend_url = lookup("NEKOINBOX_FRONTEND_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string());

        let defaults = DeliveryPolicy::default();
        let delivery_max_attempts = parse_num::<u32>(lookup("DELIVERY_MAX_ATTEMPTS"))
            .unwrap_or(defaults.max_attempts)
            .max(1);
        let delivery_retry_delay = parse_num::<u64>(lookup("DELIVERY_RETRY_DELAY_MS"))
            .map(Duration::from_millis)
            .unwrap_or(defaults.retry_delay);
        let delivery_timeout = parse_num::<u64>(lookup("DELIVERY_TIMEOUT_MS"))
            .map(Duration::from_millis)
            .unwrap_or(defaults.request_timeout);

        Ok(Self {
            telegram_bot_token,
            admin_ids,
            worker_url,
            api_token,
            frontend_url,
            delivery_max_attempts,
            delivery_retry_delay,
            delivery_timeout,
        })
    }

    pub fn backend(&self) -> Option<BackendConfig> {
        let endpoint = self.worker_url.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let token = self.api_token.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some(BackendConfig {
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }

    pub fn delivery_policy(&self) -> DeliveryPolicy {
        DeliveryPolicy {
            max_attempts: self.delivery_max_attempts,
            retry_delay: self.delivery_retry_delay,
            request_timeout: self.delivery_timeout,
        }
    }

    /// Startup advisory; the pipeline re-checks per invocation.
    pub fn warn_if_incomplete(&self) -> bool {
        if self.backend().is_some() {
            return true;
        }
        tracing::warn!(
            worker_url_set = self.worker_url.is_some(),
            api_token_set = self.api_token.is_some(),
            "backend not configured: set CF_WORKER_URL and CF_API_TOKEN (submissions will be refused)"
        );
        false
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = &val[1..val.len() - 1];
        }

        out.push((key.to_string(), val.to_string()));
    }
    out
}

fn parse_num<T: std::str::FromStr>(v: Option<String>) -> Option<T> {
    v.and_then(|s| s.trim().parse::<T>().ok())
}

fn parse_csv_i64(v: Option<String>) -> Vec<i64> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn bot_token_is_required() {
        let err = load(&[("CF_WORKER_URL", "https://w")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn defaults_apply() {
        let cfg = load(&[("TELEGRAM_BOT_TOKEN", "t")]).unwrap();
        assert_eq!(cfg.frontend_url, DEFAULT_FRONTEND_URL);
        assert!(cfg.admin_ids.is_empty());
        assert!(cfg.backend().is_none());

        let policy = cfg.delivery_policy();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.retry_delay, Duration::from_secs(5));
        assert_eq!(policy.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn backend_requires_both_values() {
        let only_url = load(&[("TELEGRAM_BOT_TOKEN", "t"), ("CF_WORKER_URL", "https://w")]).unwrap();
        assert!(only_url.backend().is_none());
        assert!(!only_url.warn_if_incomplete());

        let blank_token = load(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("CF_WORKER_URL", "https://w"),
            ("CF_API_TOKEN", "   "),
        ])
        .unwrap();
        assert!(blank_token.backend().is_none());

        let full = load(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("CF_WORKER_URL", " https://w "),
            ("CF_API_TOKEN", "secret"),
        ])
        .unwrap();
        assert_eq!(
            full.backend(),
            Some(BackendConfig {
                endpoint: "https://w".to_string(),
                token: "secret".to_string(),
            })
        );
    }

    #[test]
    fn admin_ids_and_policy_overrides() {
        let cfg = load(&[
            ("TELEGRAM_BOT_TOKEN", "t"),
            ("NEKOINBOX_ADMIN_IDS", "10, 20,,abc,30"),
            ("DELIVERY_MAX_ATTEMPTS", "0"),
            ("DELIVERY_RETRY_DELAY_MS", "250"),
        ])
        .unwrap();
        assert_eq!(cfg.admin_ids, vec![UserId(10), UserId(20), UserId(30)]);
        assert_eq!(cfg.delivery_max_attempts, 1);
        assert_eq!(cfg.delivery_retry_delay, Duration::from_millis(250));
    }

    #[test]
    fn dotenv_lines_strip_quotes_and_comments() {
        let parsed = parse_dotenv("# comment\nCF_API_TOKEN=\"abc\"\n\nBAD LINE\nX = 'y'\n=novalue\n");
        assert_eq!(
            parsed,
            vec![
                ("CF_API_TOKEN".to_string(), "abc".to_string()),
                ("X".to_string(), "y".to_string()),
            ]
        );
    }
}
