//! Team-code decoding
//!
//! A team code is a list of integers. Ids are only unique per namespace, so
//! each element is tried against troops, weapons, classes and banners in
//! that order. What an element means when nothing matches depends on its
//! position:
//!
//! | position | unresolved element becomes |
//! |----------|----------------------------|
//! | 0 to 3   | the placeholder troop      |
//! | 4        | a locked banner            |
//! | 12       | an unknown class, talents cleared |
//! | other    | a talent choice if in `0..=3`, else ignored |

use crate::error::{Error, Result};
use krystara_core::{Banner, EntityGraph, EntityId, HeroClass, Record, UNKNOWN_NAME};
use krystara_i18n::{is_untranslated, select_plural, FallbackChain, Translator};
use serde::Serialize;

/// Last position that holds a troop slot
pub const LAST_TROOP_POSITION: usize = 3;
pub const BANNER_POSITION: usize = 4;
pub const CLASS_POSITION: usize = 12;

/// Largest talent choice; `0` picks nothing, `n` picks from tree `n - 1`
pub const MAX_TALENT_CHOICE: i64 = 3;

/// Rendered for a talent tier with no choice
pub const NO_TALENT: &str = "-";

/// A decoded team
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    /// Troops and weapons in code order, placeholders included
    pub troops: Vec<Record>,
    pub banner: Option<Record>,
    /// Class name; `None` unless the code holds both a weapon and a class
    pub class: Option<String>,
    /// One entry per talent choice, under the same condition as `class`
    pub talents: Option<Vec<String>>,
}

/// Parse `"1075, 6251, 3010"` into its integers
///
/// Surrounding brackets are accepted, so a pasted `[1,2,3]` parses too.
pub fn parse_code(text: &str) -> Result<Vec<i64>> {
    let inner = text.trim();
    let inner = inner
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(inner);
    if inner.trim().is_empty() {
        return Err(Error::EmptyCode);
    }
    inner
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<i64>()
                .map_err(|_| Error::InvalidCode(part.to_string()))
        })
        .collect()
}

/// Decodes team codes against one graph and translator
pub struct TeamDecoder<'a> {
    graph: &'a EntityGraph,
    translator: &'a Translator,
}

impl<'a> TeamDecoder<'a> {
    pub fn new(graph: &'a EntityGraph, translator: &'a Translator) -> Self {
        Self { graph, translator }
    }

    /// Decode a code into a team rendered in `locale`
    ///
    /// Never fails: anything unresolvable degrades per the position rules.
    pub fn decode(&self, codes: &[i64], locale: &str) -> Team {
        let locale = self.translator.resolve_locale(locale);
        let graph = self.graph;
        let mut troops = Vec::new();
        let mut banner = None;
        let mut class: Option<&HeroClass> = None;
        let mut class_name: Option<String> = None;
        let mut has_weapon = false;
        let mut has_class = false;
        let mut choices: Vec<i64> = Vec::new();

        for (position, &code) in codes.iter().enumerate() {
            if let Some(id) = u32::try_from(code).ok().map(EntityId) {
                if let Some(troop) = graph.troop(id) {
                    troops.push(self.translator.translate(troop, graph, locale));
                    continue;
                }
                if let Some(weapon) = graph.weapons.get(&id) {
                    has_weapon = true;
                    troops.push(self.translator.translate(weapon, graph, locale));
                    continue;
                }
                if let Some(found) = graph.classes.get(&id) {
                    has_class = true;
                    class_name = Some(self.translator.translate(found, graph, locale).name().to_string());
                    class = Some(found);
                    continue;
                }
                if let Some(found) = graph.banners.get(&id) {
                    banner = Some(self.translator.translate(found, graph, locale));
                    continue;
                }
            }

            if position <= LAST_TROOP_POSITION {
                troops.push(self.translator.translate(graph.placeholder_troop(), graph, locale));
            } else if position == BANNER_POSITION {
                banner = Some(self.translator.translate(&Banner::locked(), graph, locale));
            } else if position == CLASS_POSITION {
                class = None;
                class_name = Some(UNKNOWN_NAME.to_string());
                choices.clear();
            } else if (0..=MAX_TALENT_CHOICE).contains(&code) {
                choices.push(code);
            } else {
                tracing::debug!(position, code, "unresolved team code element");
            }
        }

        if !(has_weapon && has_class) {
            return Team {
                troops,
                banner,
                class: None,
                talents: None,
            };
        }
        let talents = choices
            .iter()
            .enumerate()
            .map(|(tier, &choice)| self.talent_name(class, tier, choice, locale))
            .collect();
        Team {
            troops,
            banner,
            class: class_name,
            talents: Some(talents),
        }
    }

    /// Name of the talent picked at `tier`, or [`NO_TALENT`]
    fn talent_name(&self, class: Option<&HeroClass>, tier: usize, choice: i64, locale: &str) -> String {
        let talent = class.zip(usize::try_from(choice).ok()).and_then(|(class, choice)| {
            let code = class.talent_trees.get(choice.checked_sub(1)?)?;
            self.graph.talent_trees.get(code)?.talents.get(tier)
        });
        let Some(talent) = talent else {
            return NO_TALENT.to_string();
        };
        let text = self
            .translator
            .translate_key_with(&talent.name, locale, FallbackChain::NAMES);
        let text = select_plural(&text, false);
        if is_untranslated(text) {
            talent.code.clone()
        } else {
            text.to_string()
        }
    }

    /// Parse and decode a comma-separated code
    pub fn decode_str(&self, code: &str, locale: &str) -> Result<Team> {
        Ok(self.decode(&parse_code(code)?, locale))
    }
}

/// Decode with a one-off [`TeamDecoder`]
pub fn decode(codes: &[i64], graph: &EntityGraph, translator: &Translator, locale: &str) -> Team {
    TeamDecoder::new(graph, translator).decode(codes, locale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use krystara_data::fixtures;
    use krystara_i18n::BASE_LOCALE;

    const EXAMPLE: [i64; 13] = [1075, 6251, 6699, 6007, 3010, 3, 1, 1, 1, 3, 1, 1, 14007];

    fn translator() -> Translator {
        let mut translator = Translator::new(BASE_LOCALE);
        for locale in ["en", "de"] {
            translator
                .load_str(locale, &fixtures::translations(locale).unwrap())
                .unwrap();
        }
        translator
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("1, 2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_code("[1075,6251]").unwrap(), vec![1075, 6251]);
        assert!(matches!(parse_code(" "), Err(Error::EmptyCode)));
        assert!(matches!(parse_code("1,x"), Err(Error::InvalidCode(s)) if s == "x"));
    }

    #[test]
    fn test_decode_full_team() {
        let graph = fixtures::graph().unwrap();
        let translator = translator();
        let team = decode(&EXAMPLE, &graph, &translator, "en");

        assert_eq!(team.troops.len(), 4);
        assert_eq!(team.troops[0].id(), Some(EntityId(1075)));
        assert_eq!(team.troops[0].name(), "Spire Blade");
        assert_eq!(team.troops[2].name(), "Éclair");
        assert_eq!(team.banner.as_ref().unwrap().name(), "Zaejin Banner");
        assert_eq!(team.class.as_deref(), Some("Sorcerer"));

        let talents = team.talents.unwrap();
        assert_eq!(talents.len(), 7);
        assert_eq!(talents[0], fixtures::talent_name("Brawler", 0));
        assert_eq!(talents[1], fixtures::talent_name("Magic", 1));
        assert_eq!(talents[6], fixtures::talent_name("Magic", 6));
    }

    #[test]
    fn test_decode_localized() {
        let graph = fixtures::graph().unwrap();
        let translator = translator();
        let team = decode(&EXAMPLE, &graph, &translator, "de");
        assert_eq!(team.class.as_deref(), Some("Zauberer"));
        // no German name, falls back to English
        assert_eq!(team.troops[2].name(), "Éclair");
    }

    #[test]
    fn test_talents_need_a_weapon() {
        let graph = fixtures::graph().unwrap();
        let translator = translator();
        let mut codes = EXAMPLE;
        codes[0] = 6000;
        let team = decode(&codes, &graph, &translator, "en");
        assert_eq!(team.troops.len(), 4);
        assert_eq!(team.class, None);
        assert_eq!(team.talents, None);
    }

    #[test]
    fn test_unresolved_slots_become_placeholders() {
        let graph = fixtures::graph().unwrap();
        let translator = translator();
        let team = decode(&[1, 2], &graph, &translator, "en");
        assert_eq!(team.troops.len(), 2);
        assert!(team.troops.iter().all(|t| t.name() == UNKNOWN_NAME));
        assert_eq!(team.banner, None);
        assert_eq!(team.class, None);
    }

    #[test]
    fn test_locked_banner_and_unknown_class() {
        let graph = fixtures::graph().unwrap();
        let translator = translator();
        let codes = [1075, 6000, 6000, 6000, 99, 1, 14007, 0, 0, 0, 0, 0, 99];
        let team = decode(&codes, &graph, &translator, "en");
        assert_eq!(team.banner.as_ref().unwrap().name(), UNKNOWN_NAME);
        // a class was found, but position 12 overrides it
        assert_eq!(team.class.as_deref(), Some(UNKNOWN_NAME));
        assert_eq!(team.talents, Some(Vec::new()));
    }

    #[test]
    fn test_unknown_class_alone_is_cleared() {
        let graph = fixtures::graph().unwrap();
        let translator = translator();
        let codes = [1075, 6000, 6000, 6000, 3010, 1, 1, 1, 1, 1, 1, 1, 99];
        let team = decode(&codes, &graph, &translator, "en");
        // no class anywhere, so the synthesized one never surfaces
        assert_eq!(team.class, None);
        assert_eq!(team.talents, None);
    }

    #[test]
    fn test_zero_choice_is_no_talent() {
        let graph = fixtures::graph().unwrap();
        let translator = translator();
        let codes = [1075, 6000, 6000, 6000, 3010, 0, 2, 0, 0, 0, 0, 0, 14007];
        let team = decode(&codes, &graph, &translator, "en");
        let talents = team.talents.unwrap();
        assert_eq!(talents[0], NO_TALENT);
        assert_eq!(talents[1], fixtures::talent_name("Guardian", 1));
    }

    #[test]
    fn test_decode_is_deterministic_and_total() {
        let graph = fixtures::graph().unwrap();
        let translator = translator();
        let decoder = TeamDecoder::new(&graph, &translator);
        let odd = [-5, i64::MAX, 4_294_967_295, 7, 3010, -1, 99, 3];
        assert_eq!(decoder.decode(&odd, "en"), decoder.decode(&odd, "en"));
        assert_eq!(decoder.decode(&odd, "en").troops.len(), 4);
        assert!(decoder.decode(&[], "en").troops.is_empty());
    }

    #[test]
    fn test_team_serializes() {
        let graph = fixtures::graph().unwrap();
        let translator = translator();
        let team = decode(&EXAMPLE, &graph, &translator, "en");
        let json = serde_json::to_value(&team).unwrap();
        assert_eq!(json["class"], "Sorcerer");
        assert_eq!(json["troops"].as_array().unwrap().len(), 4);
        assert_eq!(json["talents"].as_array().unwrap().len(), 7);

        let bare = decode(&[6000], &graph, &translator, "en");
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json["class"].is_null());
        assert!(json["banner"].is_null());
    }

    #[test]
    fn test_decode_str() {
        let graph = fixtures::graph().unwrap();
        let translator = translator();
        let decoder = TeamDecoder::new(&graph, &translator);
        let team = decoder.decode_str("1075,6251,6699,6007", "en").unwrap();
        assert_eq!(team.troops.len(), 4);
        assert!(decoder.decode_str("nope", "en").is_err());
    }
}
