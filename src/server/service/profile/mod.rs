//! Character profile aggregation.
//!
//! Combines the directory record, killboard statistics, corporation and alliance details and
//! an optional kill history summary into one [`CharacterProfile`] per identity. Only the
//! directory record is essential: every other lookup degrades to a default value when it
//! fails, so a flaky statistics provider never drops a character from the results. A profile
//! that degraded after a transient failure is marked as such, so callers can avoid keeping it.

pub mod activity;

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use chrono::Utc;
use dioxus_logger::tracing;

use crate::{
    model::character::{CharacterProfile, KillHistorySummary},
    server::{
        error::lookup::LookupError,
        model::directory::Identity,
        service::{
            batch::BatchExecutor, directory::DirectoryLookup, statistics::StatisticsLookup,
        },
        util::{
            eve::{display_name, is_npc_corporation},
            time::{format_age, whole_days},
        },
    },
};

use self::activity::{describe_last_kill, summarize_kill_history};

/// A built profile together with whether it is missing data that may load on a later try.
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltProfile {
    pub profile: CharacterProfile,
    /// At least one enrichment fell back to its default after a transient failure
    pub degraded: bool,
}

pub struct ProfileAggregator<'a> {
    directory: DirectoryLookup<'a>,
    statistics: StatisticsLookup<'a>,
    batch: BatchExecutor,
    recent_kill_window: Option<Duration>,
}

impl<'a> ProfileAggregator<'a> {
    /// Creates a new instance of [`ProfileAggregator`] with kill history disabled
    pub fn new(
        directory: DirectoryLookup<'a>,
        statistics: StatisticsLookup<'a>,
        batch: BatchExecutor,
    ) -> Self {
        Self {
            directory,
            statistics,
            batch,
            recent_kill_window: None,
        }
    }

    /// Enables kill history summaries, counting recent kills within `recent_kill_window`
    pub fn with_kill_history(mut self, recent_kill_window: Duration) -> Self {
        self.recent_kill_window = Some(recent_kill_window);
        self
    }

    /// Builds profiles for all identities concurrently.
    ///
    /// # Returns
    /// One result per identity, in input order. An identity fails only when its directory
    /// record cannot be fetched.
    pub async fn build(&self, identities: &[Identity]) -> Vec<Result<BuiltProfile, LookupError>> {
        self.batch
            .execute("build profiles", identities.iter().collect(), |identity| {
                self.build_one(identity)
            })
            .await
    }

    pub async fn build_one(&self, identity: &Identity) -> Result<BuiltProfile, LookupError> {
        let character_id = identity.character_id;
        let record = self.directory.character(character_id).await?;
        let corporation_id = record.corporation_id;
        let fallbacks = Fallbacks::new(character_id);

        let (stats, corporation_name, corporation_joined, corporation_danger, alliance_name) = futures::join!(
            self.statistics.character_stats(character_id),
            self.directory.corporation_name(corporation_id),
            self.directory.corporation_joined(character_id),
            self.statistics.corporation_danger(corporation_id),
            self.directory.alliance_name(record.alliance_id),
        );

        let stats = fallbacks.or_default(stats, "killboard statistics");
        let has_killboard = stats.has_killboard();

        let (last_kill, kill_history) = futures::join!(
            self.last_kill(&fallbacks, has_killboard),
            self.kill_history(&fallbacks),
        );

        let now = Utc::now();
        let corp_age = fallbacks
            .or_default(corporation_joined, "corporation history")
            .map(|joined| whole_days(joined, now))
            .unwrap_or(0);

        let profile = CharacterProfile {
            name: display_name(&record.name),
            character_id,
            security: round_security(record.security_status),
            age: format_age(record.birthday, now),
            birthday: record.birthday,
            danger: stats.danger_ratio,
            gang: stats.gang_ratio,
            kills: stats.ships_destroyed,
            losses: stats.ships_lost,
            has_killboard,
            last_kill,
            corp_id: corporation_id,
            corp_name: fallbacks.or_default(corporation_name, "corporation name"),
            corp_age,
            is_npc_corp: is_npc_corporation(corporation_id),
            corp_danger: fallbacks.or_default(corporation_danger, "corporation danger"),
            alliance_id: record.alliance_id,
            alliance_name: fallbacks.or_default(alliance_name, "alliance name"),
            kill_history,
        };

        Ok(BuiltProfile {
            profile,
            degraded: fallbacks.degraded(),
        })
    }

    /// Most recent killboard activity, empty for characters without a killboard
    async fn last_kill(&self, fallbacks: &Fallbacks, has_killboard: bool) -> String {
        if !has_killboard {
            return String::new();
        }

        let character_id = fallbacks.character_id;
        let latest = self.statistics.latest_killmail(character_id).await;

        fallbacks
            .or_default(latest, "latest killmail")
            .map(|killmail| describe_last_kill(character_id, &killmail))
            .unwrap_or_default()
    }

    async fn kill_history(&self, fallbacks: &Fallbacks) -> KillHistorySummary {
        let Some(window) = self.recent_kill_window else {
            return KillHistorySummary::default();
        };

        let character_id = fallbacks.character_id;
        let (kills, recent_kills) = futures::join!(
            self.statistics.kills(character_id),
            self.statistics.recent_kills(character_id, window),
        );

        summarize_kill_history(
            &fallbacks.or_default(kills, "kill history"),
            &fallbacks.or_default(recent_kills, "recent kill history"),
        )
    }
}

/// Tracks non-essential lookups of one character that fell back to their default
struct Fallbacks {
    character_id: i64,
    transient: AtomicBool,
}

impl Fallbacks {
    fn new(character_id: i64) -> Self {
        Self {
            character_id,
            transient: AtomicBool::new(false),
        }
    }

    /// Unwraps a non-essential lookup, logging and substituting the default on failure
    fn or_default<T: Default>(&self, result: Result<T, LookupError>, what: &str) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                if e.is_transient() {
                    self.transient.store(true, Ordering::Relaxed);
                    tracing::warn!("Using default {} for character {}: {}", what, self.character_id, e);
                } else {
                    tracing::debug!("Using default {} for character {}: {}", what, self.character_id, e);
                }

                T::default()
            }
        }
    }

    fn degraded(&self) -> bool {
        self.transient.load(Ordering::Relaxed)
    }
}

fn round_security(security_status: f64) -> f64 {
    (security_status * 100.0).round() / 100.0
}
