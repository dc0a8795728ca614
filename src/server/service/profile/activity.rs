//! Derived killboard activity.

use crate::{
    model::character::KillHistorySummary,
    server::{
        model::statistics::Killmail,
        util::{eve::is_notable_ship, time::format_date},
    },
};

/// Describes a character's most recent killmail.
///
/// - `died <date>` - The character was the victim
/// - `struct <date>` - The victim was a structure or other unpiloted target
/// - `kill <date>` - The character killed another pilot
pub fn describe_last_kill(character_id: i64, killmail: &Killmail) -> String {
    let date = format_date(killmail.killmail_time);

    match killmail.victim.character_id {
        Some(victim) if victim == character_id => format!("died {}", date),
        None | Some(0) => format!("struct {}", date),
        Some(_) => format!("kill {}", date),
    }
}

/// Summarizes kill lists into counts.
///
/// # Arguments
/// - `kills` - Full kill history
/// - `recent_kills` - Kills within the recent window
pub fn summarize_kill_history(kills: &[Killmail], recent_kills: &[Killmail]) -> KillHistorySummary {
    KillHistorySummary {
        recent_kills: recent_kills.len(),
        total_kills: kills.len(),
        notable_kills: kills
            .iter()
            .filter(|killmail| is_notable_ship(killmail.victim.ship_type_id))
            .count(),
        last_kill_at: kills
            .iter()
            .chain(recent_kills)
            .map(|killmail| killmail.killmail_time)
            .max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::util::test::killmail;

    mod describe_last_kill {
        use super::*;

        /// Tests describing a loss.
        ///
        /// Expected: "died" with the killmail date
        #[test]
        fn describes_death() {
            let loss = killmail(1, "2024-05-01T12:34:56Z", Some(42), 587);

            assert_eq!(describe_last_kill(42, &loss), "died 2024-05-01");
        }

        /// Tests describing a structure kill.
        ///
        /// Verifies that killmails without a victim character are attributed to structures.
        ///
        /// Expected: "struct" with the killmail date
        #[test]
        fn describes_structure_kill() {
            let structure = killmail(2, "2024-04-30T23:59:59Z", None, 35832);

            assert_eq!(describe_last_kill(42, &structure), "struct 2024-04-30");
        }

        /// Tests describing a kill of another pilot.
        ///
        /// Expected: "kill" with the killmail date
        #[test]
        fn describes_pilot_kill() {
            let kill = killmail(3, "2024-01-02T00:00:00Z", Some(7), 587);

            assert_eq!(describe_last_kill(42, &kill), "kill 2024-01-02");
        }
    }

    mod summarize_kill_history {
        use super::*;

        /// Tests summarizing kill lists.
        ///
        /// Verifies counting of total, recent and notable kills and selection of the most
        /// recent kill time across both lists.
        ///
        /// Expected: 3 total, 1 recent, 1 notable, latest time from the recent list
        #[test]
        fn counts_kills() {
            let kills = vec![
                killmail(3, "2024-05-01T00:00:00Z", Some(7), 671),
                killmail(2, "2024-04-01T00:00:00Z", Some(8), 587),
                killmail(1, "2024-03-01T00:00:00Z", None, 35832),
            ];
            let recent = vec![killmail(4, "2024-05-02T00:00:00Z", Some(9), 587)];

            let summary = summarize_kill_history(&kills, &recent);

            assert_eq!(summary.total_kills, 3);
            assert_eq!(summary.recent_kills, 1);
            assert_eq!(summary.notable_kills, 1);
            assert_eq!(summary.last_kill_at, Some("2024-05-02T00:00:00Z".parse().unwrap()));
        }

        /// Tests summarizing empty kill lists.
        ///
        /// Expected: the default summary
        #[test]
        fn defaults_empty_history() {
            assert_eq!(summarize_kill_history(&[], &[]), KillHistorySummary::default());
        }
    }
}
