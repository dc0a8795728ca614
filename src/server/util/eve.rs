//! EVE Online-specific utility functions and constants.
//!
//! This module provides the game rules the profile builder applies to raw directory and
//! killboard data: NPC corporation detection, notable hull classification and display
//! name overrides.

/// Corporation IDs below this value belong to NPC corporations.
///
/// Player corporations are assigned IDs from `98,000,000` upwards (or in the legacy
/// `1,000,000,000+` range); NPC corporations use `1,000,000 - 1,999,999`.
pub const NPC_CORPORATION_ID_LIMIT: i64 = 2_000_000;

/// Ship type IDs counted as notable kills in kill history summaries.
///
/// Covers supercarriers, titans and the faction supercapitals: Nyx, Aeon, Hel, Wyvern,
/// Avatar, Erebus, Ragnarok, Leviathan, Vendetta, Revenant, Molok and Komodo.
pub const NOTABLE_SHIP_TYPE_IDS: [i64; 12] = [
    23913, 23919, 22852, 23917, 11567, 671, 23773, 3764, 42125, 3514, 42241, 45649,
];

/// Display names shown instead of the in-game name for a few well known characters
const NICKNAMES: [(&str, &str); 2] = [("Mynxee", "Space Mom"), ("Portia Tigana", "Tiggs")];

/// Whether the corporation is an NPC corporation.
///
/// # Example
/// ```ignore
/// assert!(is_npc_corporation(1_000_125)); // Center for Advanced Studies
/// assert!(!is_npc_corporation(98_000_001));
/// ```
pub fn is_npc_corporation(corporation_id: i64) -> bool {
    corporation_id < NPC_CORPORATION_ID_LIMIT
}

pub fn is_notable_ship(ship_type_id: i64) -> bool {
    NOTABLE_SHIP_TYPE_IDS.contains(&ship_type_id)
}

/// Applies the nickname override table to a character name
pub fn display_name(name: &str) -> String {
    NICKNAMES
        .iter()
        .find(|(character, _)| *character == name)
        .map(|(_, nickname)| nickname.to_string())
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    mod is_npc_corporation {
        use super::*;

        /// Tests the NPC corporation threshold.
        ///
        /// Verifies that IDs below 2,000,000 are NPC corporations and IDs at or above it
        /// are not.
        ///
        /// Expected: true below the limit, false at and above it
        #[test]
        fn applies_threshold() {
            assert!(is_npc_corporation(1_000_125));
            assert!(is_npc_corporation(1_999_999));
            assert!(!is_npc_corporation(2_000_000));
            assert!(!is_npc_corporation(98_000_001));
        }
    }

    mod display_name {
        use super::*;

        /// Tests applying nickname overrides.
        ///
        /// Expected: overridden names for listed characters, unchanged names otherwise
        #[test]
        fn overrides_listed_names_only() {
            assert_eq!(display_name("Mynxee"), "Space Mom");
            assert_eq!(display_name("Portia Tigana"), "Tiggs");
            assert_eq!(display_name("Solo Candidate"), "Solo Candidate");
            assert_eq!(display_name("mynxee"), "mynxee");
        }
    }

    /// Tests notable hull classification.
    ///
    /// Expected: titans and supercarriers are notable, a Rifter is not
    #[test]
    fn classifies_notable_ships() {
        assert!(is_notable_ship(671));
        assert!(is_notable_ship(23913));
        assert!(!is_notable_ship(587));
    }
}
