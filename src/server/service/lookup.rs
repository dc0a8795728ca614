//! Entry point of the lookup core: names in, profiles out.

use dioxus_logger::tracing;

use crate::{
    model::character::CharacterProfile,
    server::{
        client::{DirectoryService, StatisticsService},
        config::LookupConfig,
        error::lookup::LookupError,
        model::directory::Identity,
        service::{
            batch::BatchExecutor,
            cache::{Cache, CacheKey, EntityKind, Ttl},
            directory::DirectoryLookup,
            identity::IdentityResolver,
            profile::ProfileAggregator,
            retry::RetryPolicy,
            statistics::StatisticsLookup,
        },
    },
};

/// Result of a bounded lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupOutcome {
    /// Number of names that were looked up after trimming and truncation
    pub accepted: usize,
    /// Resolved profiles in input order
    pub characters: Vec<CharacterProfile>,
}

/// Wires the cache, retry policies, resolver and aggregator together for one request.
///
/// Directory calls retry server errors only; statistics calls retry everything but client
/// errors. Both run every attempt under the configured request timeout.
pub struct LookupOrchestrator<'a> {
    cache: &'a Cache,
    config: &'a LookupConfig,
    resolver: IdentityResolver<'a>,
    aggregator: ProfileAggregator<'a>,
}

impl<'a> LookupOrchestrator<'a> {
    /// Creates a new instance of [`LookupOrchestrator`]
    pub fn new(
        directory: &'a dyn DirectoryService,
        statistics: &'a dyn StatisticsService,
        cache: &'a Cache,
        config: &'a LookupConfig,
    ) -> Self {
        let batch = BatchExecutor::new(config.concurrency);

        let directory = DirectoryLookup::new(
            directory,
            cache,
            RetryPolicy::server_errors()
                .with_backoff(config.retry_backoff)
                .with_attempt_timeout(config.request_timeout),
            Ttl::Fixed(config.long_ttl),
        );
        let statistics = StatisticsLookup::new(
            statistics,
            cache,
            RetryPolicy::non_client_errors()
                .with_backoff(config.retry_backoff)
                .with_attempt_timeout(config.request_timeout),
            Ttl::Suggested {
                fallback: config.default_ttl,
            },
        );

        let resolver = IdentityResolver::new(directory, cache, batch, config.long_ttl);
        let mut aggregator = ProfileAggregator::new(directory, statistics, batch);
        if config.kill_history_enabled {
            aggregator = aggregator.with_kill_history(config.recent_kill_window);
        }

        Self {
            cache,
            config,
            resolver,
            aggregator,
        }
    }

    /// Looks up profiles for a list of names.
    ///
    /// Names that do not resolve or whose profile fails are omitted; the remaining profiles
    /// keep the order of their names. Duplicate names each produce a profile. Within one call
    /// a duplicate uncached name is resolved only once and its copies share the outcome;
    /// across calls, repeated names are served from the profile cache.
    pub async fn lookup(&self, names: &[String]) -> Vec<CharacterProfile> {
        self.lookup_each(names)
            .await
            .into_iter()
            .filter_map(Result::ok)
            .collect()
    }

    /// Trims names, drops blank ones and truncates to the configured maximum before looking up
    pub async fn lookup_bounded(&self, names: Vec<String>) -> LookupOutcome {
        let names: Vec<String> = names
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .take(self.config.max_characters)
            .collect();

        LookupOutcome {
            accepted: names.len(),
            characters: self.lookup(&names).await,
        }
    }

    /// Looks up a single name, keeping the reason it failed
    pub async fn lookup_one(&self, name: &str) -> Result<CharacterProfile, LookupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LookupError::NotFound(name.to_string()));
        }

        self.lookup_each(&[name.to_string()])
            .await
            .pop()
            .unwrap_or_else(|| Err(LookupError::NotFound(name.to_string())))
    }

    /// Profile or failure per name, in input order
    async fn lookup_each(&self, names: &[String]) -> Vec<Result<CharacterProfile, LookupError>> {
        if names.is_empty() {
            return Vec::new();
        }

        let mut outcomes: Vec<Option<Result<CharacterProfile, LookupError>>> = names
            .iter()
            .map(|name| {
                self.cache
                    .get::<CharacterProfile>(&profile_key(name))
                    .map(Ok)
            })
            .collect();

        // Each distinct missing name is resolved once, duplicates share the outcome
        let mut misses: Vec<String> = Vec::new();
        for (name, outcome) in names.iter().zip(&outcomes) {
            if outcome.is_none() && !misses.contains(name) {
                misses.push(name.clone());
            }
        }

        tracing::debug!(
            "Looking up {} names, {} cached, {} to resolve",
            names.len(),
            names.len() - outcomes.iter().filter(|o| o.is_none()).count(),
            misses.len()
        );

        if !misses.is_empty() {
            let resolved = self.resolve_and_build(&misses).await;

            for (name, outcome) in names.iter().zip(outcomes.iter_mut()) {
                if outcome.is_none() {
                    let index = misses.iter().position(|miss| miss == name);
                    *outcome = index.map(|index| resolved[index].clone());
                }
            }
        }

        names
            .iter()
            .zip(outcomes)
            .map(|(name, outcome)| {
                let outcome =
                    outcome.unwrap_or_else(|| Err(LookupError::NotFound(name.to_string())));
                if let Err(e) = &outcome {
                    log_failure(name, e);
                }
                outcome
            })
            .collect()
    }

    /// Resolves names and builds profiles for those that resolved.
    ///
    /// Complete profiles are cached under their query name. Degraded profiles are returned
    /// but not cached, so the next lookup retries the enrichments that failed.
    async fn resolve_and_build(&self, names: &[String]) -> Vec<Result<CharacterProfile, LookupError>> {
        let identities = self.resolver.resolve(names).await;

        let resolved: Vec<Identity> = identities
            .iter()
            .filter_map(|identity| identity.as_ref().ok().cloned())
            .collect();
        let mut profiles = self.aggregator.build(&resolved).await.into_iter();

        identities
            .into_iter()
            .zip(names)
            .map(|(identity, name)| {
                if let Err(e) = identity {
                    return Err(e);
                }

                let built = profiles.next().unwrap_or_else(|| {
                    Err(LookupError::NotFound(name.to_string()))
                })?;

                if built.degraded {
                    tracing::debug!("Not caching degraded profile for {:?}", name);
                } else {
                    self.cache
                        .set(profile_key(name), &built.profile, self.config.default_ttl);
                }

                Ok(built.profile)
            })
            .collect()
    }
}

fn profile_key(name: &str) -> CacheKey {
    CacheKey::by_name(EntityKind::Profile, name)
}

fn log_failure(name: &str, error: &LookupError) {
    match error {
        LookupError::NotFound(_) => tracing::debug!("Skipping {:?}: {}", name, error),
        e if e.is_transient() => tracing::warn!("Skipping {:?} after upstream trouble: {}", name, e),
        e => tracing::warn!("Skipping {:?}: {}", name, e),
    }
}
