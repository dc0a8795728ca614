//! Character name to identity resolution.

use std::time::Duration;

use dioxus_logger::tracing;

use crate::server::{
    error::lookup::LookupError,
    model::directory::Identity,
    service::{
        batch::BatchExecutor,
        cache::{Cache, CacheKey, EntityKind},
        directory::DirectoryLookup,
    },
};

/// Resolves character names to identities.
///
/// A name search that returns a single candidate is accepted as-is without fetching the
/// candidate's record. Multiple candidates are disambiguated by fetching every candidate
/// record and keeping the one whose name matches the query exactly (case-sensitive, no fuzzy
/// matching). Successful resolutions are cached by name.
pub struct IdentityResolver<'a> {
    directory: DirectoryLookup<'a>,
    cache: &'a Cache,
    batch: BatchExecutor,
    ttl: Duration,
}

impl<'a> IdentityResolver<'a> {
    /// Creates a new instance of [`IdentityResolver`]
    pub fn new(
        directory: DirectoryLookup<'a>,
        cache: &'a Cache,
        batch: BatchExecutor,
        ttl: Duration,
    ) -> Self {
        Self {
            directory,
            cache,
            batch,
            ttl,
        }
    }

    /// Resolves every name concurrently.
    ///
    /// # Returns
    /// One result per name, in input order:
    /// - `Ok(Identity)` - Name resolved to exactly one character
    /// - `Err(LookupError::NotFound)` - No candidate, no exact match or more than one exact match
    /// - `Err(_)` - Upstream failure after retries
    pub async fn resolve(&self, names: &[String]) -> Vec<Result<Identity, LookupError>> {
        self.batch
            .execute("resolve identities", names.iter().collect(), |name| {
                self.resolve_name(name)
            })
            .await
    }

    /// Resolves a single name, consulting the cache first
    pub async fn resolve_name(&self, name: &str) -> Result<Identity, LookupError> {
        let key = CacheKey::by_name(EntityKind::Identity, name);

        self.cache
            .get_or_fetch(key, || async {
                let candidates = self.directory.search(name).await?;

                let character_id = match candidates.len() {
                    0 => return Err(LookupError::NotFound(name.to_string())),
                    1 => candidates[0],
                    _ => self.disambiguate(name, candidates).await?,
                };

                let identity = Identity {
                    character_id,
                    name: name.to_string(),
                };

                Ok((identity, self.ttl))
            })
            .await
    }

    async fn disambiguate(&self, name: &str, candidates: Vec<i64>) -> Result<i64, LookupError> {
        tracing::debug!(
            "Disambiguating {:?} between {} candidates",
            name,
            candidates.len()
        );

        let records = self
            .batch
            .execute("fetch candidate records", candidates.clone(), |character_id| {
                self.directory.character(character_id)
            })
            .await;

        let mut matches = Vec::new();
        let mut transient_failure = None;

        for (character_id, record) in candidates.into_iter().zip(records) {
            match record {
                Ok(record) if record.name == name => matches.push(character_id),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        "Failed to fetch candidate {} for {:?}: {}",
                        character_id,
                        name,
                        e
                    );
                    if e.is_transient() && transient_failure.is_none() {
                        transient_failure = Some(e);
                    }
                }
            }
        }

        // A candidate we could not fetch may have been a match, or a second one
        if matches.len() < 2 {
            if let Some(e) = transient_failure {
                return Err(e);
            }
        }

        match matches.as_slice() {
            [character_id] => Ok(*character_id),
            [] => Err(LookupError::NotFound(name.to_string())),
            _ => {
                tracing::warn!(
                    "Name {:?} exactly matches {} characters {:?}, refusing to pick one",
                    name,
                    matches.len(),
                    matches
                );
                Err(LookupError::NotFound(name.to_string()))
            }
        }
    }
}
