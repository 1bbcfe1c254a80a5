//! Player resolution - maps a spoken player name to a known player

use crate::core::types::{Player, PlayerSet};

/// A resolved player and how it was found
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerMatch<'a> {
    pub player: &'a Player,
    pub match_reason: MatchReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    /// The name asked for in this request
    Requested,
    /// The player remembered from an earlier request
    LastUsed,
}

/// Resolves requested player names against the server's players
///
/// Resolution never mutates the player set and depends only on its inputs.
pub struct PlayerResolver<'a> {
    players: &'a PlayerSet,
}

impl<'a> PlayerResolver<'a> {
    pub fn new(players: &'a PlayerSet) -> Self {
        Self { players }
    }

    /// Resolve `requested`, falling back to `last_used`
    ///
    /// Both lookups are exact and case-insensitive. Blank names never match.
    /// `None` means neither name matched a player.
    pub fn resolve(&self, requested: &str, last_used: &str) -> Option<PlayerMatch<'a>> {
        if let Some(player) = self.find_by_name(requested) {
            return Some(PlayerMatch {
                player,
                match_reason: MatchReason::Requested,
            });
        }

        self.find_by_name(last_used).map(|player| PlayerMatch {
            player,
            match_reason: MatchReason::LastUsed,
        })
    }

    fn find_by_name(&self, name: &str) -> Option<&'a Player> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.players.find_by_name(name)
    }
}

/// Resolve a player by requested name, then by last-used name
pub fn resolve<'a>(players: &'a PlayerSet, requested: &str, last_used: &str) -> Option<&'a Player> {
    PlayerResolver::new(players)
        .resolve(requested, last_used)
        .map(|m| m.player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn house() -> PlayerSet {
        PlayerSet::new(vec![
            Player::new("00:04:20:00:00:01", "Kitchen"),
            Player::new("00:04:20:00:00:02", "Living Room"),
            Player::new("00:04:20:00:00:03", "Bedroom"),
        ])
    }

    #[test]
    fn test_resolve_by_name() {
        let players = house();
        let resolver = PlayerResolver::new(&players);

        let m = resolver.resolve("living room", "").unwrap();
        assert_eq!(m.player.name, "Living Room");
        assert_eq!(m.match_reason, MatchReason::Requested);
    }

    #[test]
    fn test_requested_wins_over_last_used() {
        let players = house();
        let player = resolve(&players, "Bedroom", "kitchen").unwrap();
        assert_eq!(player.name, "Bedroom");
    }

    #[test]
    fn test_empty_request_falls_back_to_last_used() {
        let players = house();
        let resolver = PlayerResolver::new(&players);

        let m = resolver.resolve("", "kitchen").unwrap();
        assert_eq!(m.player.name, "Kitchen");
        assert_eq!(m.match_reason, MatchReason::LastUsed);

        let m = resolver.resolve("   ", "KITCHEN").unwrap();
        assert_eq!(m.match_reason, MatchReason::LastUsed);
    }

    #[test]
    fn test_unknown_request_falls_back_to_last_used() {
        let players = house();
        let player = resolve(&players, "garage", "bedroom").unwrap();
        assert_eq!(player.name, "Bedroom");
    }

    #[test]
    fn test_not_found() {
        let players = house();
        assert!(resolve(&players, "garage", "attic").is_none());
        assert!(resolve(&players, "", "").is_none());
        assert!(resolve(&PlayerSet::default(), "kitchen", "kitchen").is_none());
    }

    #[test]
    fn test_partial_names_do_not_match() {
        let players = house();
        assert!(resolve(&players, "living", "").is_none());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let players = PlayerSet::new(vec![
            Player::new("a", "Kitchen"),
            Player::new("b", "kitchen"),
        ]);
        assert_eq!(resolve(&players, "KITCHEN", "").unwrap().id.as_str(), "a");
    }

    proptest! {
        #[test]
        fn prop_unique_name_resolves_in_any_case(
            names in prop::collection::hash_set("[a-z]{1,12}", 1..8),
            pick in any::<prop::sample::Index>(),
            upper in any::<bool>(),
        ) {
            let names: Vec<String> = names.into_iter().collect();
            let players = PlayerSet::new(
                names
                    .iter()
                    .enumerate()
                    .map(|(i, n)| Player::new(format!("id-{}", i), n.clone()))
                    .collect(),
            );
            let target = &names[pick.index(names.len())];
            let spoken = if upper { target.to_uppercase() } else { target.clone() };

            let player = resolve(&players, &spoken, "");
            prop_assert_eq!(player.map(|p| p.name.as_str()), Some(target.as_str()));
        }

        #[test]
        fn prop_resolution_is_pure(
            names in prop::collection::vec("[a-zA-Z ]{0,10}", 0..6),
            requested in "[a-zA-Z ]{0,10}",
            last_used in "[a-zA-Z ]{0,10}",
        ) {
            let players = PlayerSet::new(
                names.iter().map(|n| Player::new(n.clone(), n.clone())).collect(),
            );
            let before = players.clone();

            let first = resolve(&players, &requested, &last_used).cloned();
            let second = resolve(&players, &requested, &last_used).cloned();

            prop_assert_eq!(first, second);
            prop_assert_eq!(players, before);
        }
    }
}
