//! HTTP client for the program-evaluation and preferences providers.
//!
//! Both lookups are plain REST GETs keyed by the user's identity. Results
//! are cached per user with a short TTL; 404 means the user has no stored
//! record and is cached as absent like any other result.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

use super::error::EvaluationError;
use super::types::{ParsedEvaluation, SchedulingPreferences};

/// Configuration for the evaluation provider client.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// Base URL of the evaluation/preferences provider
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// How long cached lookups stay fresh
    pub cache_ttl: Duration,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8100".to_string(),
            request_timeout: Duration::from_secs(15),
            cache_ttl: Duration::from_secs(5 * 60),
        }
    }
}

impl EvaluationConfig {
    /// Builds a config from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("EVALUATION_BASE_URL") {
            if !base_url.is_empty() {
                config.base_url = base_url;
            }
        }
        config
    }
}

struct CachedEntry<T> {
    value: Option<T>,
    cached_at: Instant,
}

/// Client for per-user evaluation and preferences lookups.
pub struct EvaluationClient {
    client: Client,
    config: EvaluationConfig,
    evaluations: DashMap<String, CachedEntry<ParsedEvaluation>>,
    preferences: DashMap<String, CachedEntry<SchedulingPreferences>>,
}

impl EvaluationClient {
    pub fn new(config: EvaluationConfig) -> Result<Self, EvaluationError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| EvaluationError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            config,
            evaluations: DashMap::new(),
            preferences: DashMap::new(),
        })
    }

    /// Fetches the user's parsed program evaluation, or `None` when the
    /// provider has no record for them.
    pub async fn get_evaluation(
        &self,
        user_id: &str,
    ) -> Result<Option<ParsedEvaluation>, EvaluationError> {
        if let Some(entry) = self.evaluations.get(user_id) {
            if entry.cached_at.elapsed() < self.config.cache_ttl {
                debug!(user = %user_id, "Evaluation cache hit");
                return Ok(entry.value.clone());
            }
            drop(entry);
            self.evaluations.remove(user_id);
        }

        let url = self.endpoint("evaluations", user_id)?;
        let result = self.fetch_optional::<ParsedEvaluation>(&url).await?;
        info!(
            user = %user_id,
            found = result.is_some(),
            "Fetched program evaluation"
        );

        self.evaluations.insert(
            user_id.to_string(),
            CachedEntry {
                value: result.clone(),
                cached_at: Instant::now(),
            },
        );
        Ok(result)
    }

    /// Fetches the user's scheduling preferences merged over defaults.
    /// A missing record or provider failure yields the defaults.
    pub async fn get_preferences(&self, user_id: &str) -> SchedulingPreferences {
        if let Some(entry) = self.preferences.get(user_id) {
            if entry.cached_at.elapsed() < self.config.cache_ttl {
                return entry.value.clone().unwrap_or_default();
            }
            drop(entry);
            self.preferences.remove(user_id);
        }

        let fetched = match self.endpoint("preferences", user_id) {
            Ok(url) => match self.fetch_optional::<SchedulingPreferences>(&url).await {
                Ok(value) => value,
                Err(e) => {
                    warn!(user = %user_id, error = %e, "Preferences lookup failed, using defaults");
                    None
                }
            },
            Err(e) => {
                warn!(user = %user_id, error = %e, "Bad preferences URL, using defaults");
                None
            }
        };

        self.preferences.insert(
            user_id.to_string(),
            CachedEntry {
                value: fetched.clone(),
                cached_at: Instant::now(),
            },
        );
        fetched.unwrap_or_default()
    }

    /// Drops cached lookups for one user.
    pub fn invalidate_user(&self, user_id: &str) {
        self.evaluations.remove(user_id);
        self.preferences.remove(user_id);
    }

    fn endpoint(&self, resource: &str, user_id: &str) -> Result<Url, EvaluationError> {
        let base = Url::parse(&self.config.base_url)?;
        let url = base.join(&format!("{}/{}", resource, user_id))?;
        Ok(url)
    }

    async fn fetch_optional<T: serde::de::DeserializeOwned>(
        &self,
        url: &Url,
    ) -> Result<Option<T>, EvaluationError> {
        let response = self.client.get(url.clone()).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let value = response.json::<T>().await.map_err(|e| {
                    EvaluationError::Malformed {
                        message: e.to_string(),
                    }
                })?;
                Ok(Some(value))
            }
            status => Err(EvaluationError::UnexpectedStatus {
                status: status.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_resource_and_user() {
        let client = EvaluationClient::new(EvaluationConfig {
            base_url: "http://provider.local:8100/".to_string(),
            ..Default::default()
        })
        .unwrap();

        let url = client.endpoint("evaluations", "student@example.edu").unwrap();
        assert_eq!(
            url.as_str(),
            "http://provider.local:8100/evaluations/student@example.edu"
        );
    }

    #[test]
    fn test_config_default_ttl() {
        let config = EvaluationConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
    }
}
