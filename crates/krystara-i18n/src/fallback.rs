//! Ordered key rewrites tried when a translation key has no entry
//!
//! The dumps are not consistent about key shapes: some types are filed
//! under a plural, some names lack their `_NAME` suffix, some keys carry a
//! category prefix the table omits. These chains are heuristics; each one
//! lists the rewrites worth trying for one family of keys.

/// One rewrite of a bracketed key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rewrite {
    /// `[GOBLINS]` to `[GOBLIN]`
    StripPlural,
    /// `[TROOP_1_NAME]` to `[TROOP_1]`
    StripNameSuffix,
    /// `[TROOPTYPE_UNDEAD]` to `[UNDEAD]` for any of the prefixes
    StripPrefix(&'static [&'static str]),
}

impl Rewrite {
    /// Apply to a bracketed key; `None` if the rewrite does not fit
    pub fn apply(&self, key: &str) -> Option<String> {
        let inner = key.strip_prefix('[')?.strip_suffix(']')?;
        let rewritten = match self {
            Rewrite::StripPlural => inner.strip_suffix('S')?,
            Rewrite::StripNameSuffix => inner.strip_suffix("_NAME")?,
            Rewrite::StripPrefix(prefixes) => prefixes
                .iter()
                .find_map(|prefix| inner.strip_prefix(prefix))?,
        };
        if rewritten.is_empty() {
            return None;
        }
        Some(format!("[{}]", rewritten))
    }
}

/// A named list of rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackChain {
    pub name: &'static str,
    pub rewrites: &'static [Rewrite],
}

const TYPE_PREFIXES: &[&str] = &["TROOPTYPE_"];
const ROLE_PREFIXES: &[&str] = &["TROOP_ROLE_", "WEAPON_ROLE_"];
const REWARD_PREFIXES: &[&str] = &["REWARD_"];
const ANY_PREFIXES: &[&str] = &["TROOPTYPE_", "TROOP_ROLE_"];

impl FallbackChain {
    pub const TROOP_TYPES: FallbackChain = FallbackChain {
        name: "troop_types",
        rewrites: &[Rewrite::StripPlural, Rewrite::StripPrefix(TYPE_PREFIXES)],
    };

    pub const ROLES: FallbackChain = FallbackChain {
        name: "roles",
        rewrites: &[Rewrite::StripPlural, Rewrite::StripPrefix(ROLE_PREFIXES)],
    };

    pub const NAMES: FallbackChain = FallbackChain {
        name: "names",
        rewrites: &[Rewrite::StripNameSuffix],
    };

    pub const REWARD_TYPES: FallbackChain = FallbackChain {
        name: "reward_types",
        rewrites: &[Rewrite::StripPlural, Rewrite::StripPrefix(REWARD_PREFIXES)],
    };

    /// Used for any field without a more specific chain
    pub const DEFAULT: FallbackChain = FallbackChain {
        name: "default",
        rewrites: &[
            Rewrite::StripPlural,
            Rewrite::StripNameSuffix,
            Rewrite::StripPrefix(ANY_PREFIXES),
        ],
    };

    /// The chain for values stored under a record field
    pub fn for_field(field: &str) -> FallbackChain {
        match field {
            "types" | "type" => Self::TROOP_TYPES,
            "roles" => Self::ROLES,
            "name" => Self::NAMES,
            "rewards" | "reward" => Self::REWARD_TYPES,
            _ => Self::DEFAULT,
        }
    }

    /// The key itself, then each rewrite that applies, without repeats
    pub fn candidates(&self, key: &str) -> Vec<String> {
        let mut candidates = vec![key.to_string()];
        for rewrite in self.rewrites {
            if let Some(candidate) = rewrite.apply(key) {
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites() {
        assert_eq!(Rewrite::StripPlural.apply("[GOBLINS]").as_deref(), Some("[GOBLIN]"));
        assert_eq!(Rewrite::StripPlural.apply("[GOBLIN]"), None);
        assert_eq!(
            Rewrite::StripNameSuffix.apply("[TROOP_1_NAME]").as_deref(),
            Some("[TROOP_1]")
        );
        assert_eq!(
            Rewrite::StripPrefix(TYPE_PREFIXES).apply("[TROOPTYPE_UNDEAD]").as_deref(),
            Some("[UNDEAD]")
        );
        assert_eq!(Rewrite::StripPlural.apply("GOBLINS"), None);
        assert_eq!(Rewrite::StripPlural.apply("[S]"), None);
    }

    #[test]
    fn test_default_chain_order() {
        let candidates = FallbackChain::DEFAULT.candidates("[TROOPTYPE_DRAGONS]");
        assert_eq!(
            candidates,
            vec!["[TROOPTYPE_DRAGONS]", "[TROOPTYPE_DRAGON]", "[DRAGONS]"]
        );
    }

    #[test]
    fn test_chain_for_field() {
        assert_eq!(FallbackChain::for_field("types"), FallbackChain::TROOP_TYPES);
        assert_eq!(FallbackChain::for_field("roles").name, "roles");
        assert_eq!(FallbackChain::for_field("description"), FallbackChain::DEFAULT);
    }

    #[test]
    fn test_candidates_are_a_heuristic() {
        // A key that happens to end in S still yields the stripped form;
        // the translator only uses it when the key itself has no entry.
        let candidates = FallbackChain::NAMES.candidates("[BOSS_NAME]");
        assert_eq!(candidates, vec!["[BOSS_NAME]", "[BOSS]"]);
    }
}
