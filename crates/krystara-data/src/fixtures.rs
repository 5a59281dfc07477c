//! Small, self-consistent dumps for tests
//!
//! The world has four kingdoms:
//! - 3000 Broken Spire: surface, blue and purple, linked to 3101
//! - 3101 Dark Spire: underworld, blue and purple, no raw link back
//! - 3010 Zaejin: surface, banner, hero class 14007
//! - 3200: warband
//!
//! No entity uses ids 0 to 3, and 3010 exists only as a kingdom and banner,
//! so team codes built from these ids are unambiguous.

use crate::builder::build;
use crate::error::Result;
use crate::loader::{Loader, RawData};
use chrono::{DateTime, Utc};
use krystara_core::EntityGraph;
use serde_json::{json, Map, Value};

/// Unix seconds used as "now" by fixture consumers: 2024-01-04
pub const NOW_UNIX: i64 = 1_704_326_400;

/// 2024-01-01, start of the weekly kingdom event
pub const EVENT_START_UNIX: i64 = 1_704_067_200;

const WEEK_SECS: i64 = 7 * 24 * 60 * 60;

pub fn now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(NOW_UNIX, 0).unwrap_or_default()
}

fn colors(names: &[&str]) -> Value {
    let mut map = Map::new();
    for name in ["ColorBlue", "ColorGreen", "ColorRed", "ColorYellow", "ColorPurple", "ColorBrown"] {
        map.insert(name.to_string(), Value::Bool(names.contains(&name)));
    }
    Value::Object(map)
}

fn spell(id: u32, steps: Value) -> Value {
    json!({
        "Id": id,
        "Name": format!("[SPELL_{}_NAME]", id),
        "Description": format!("[SPELL_{}_DESC]", id),
        "Cost": 10,
        "SpellSteps": steps
    })
}

fn spells() -> Value {
    let damage = json!([{"Type": "Damage", "SpellPowerMultiplier": 1.0, "Amount": 5}]);
    let mut spells = vec![
        spell(2001, json!([
            {"Type": "Damage", "SpellPowerMultiplier": 1.0, "Amount": 4},
            {"Type": "Damage", "SpellPowerMultiplier": 1.0, "Amount": 4}
        ])),
        spell(2002, json!([
            {"Type": "CountSkulls", "Amount": 2},
            {"Type": "Damage", "SpellPowerMultiplier": 2.0, "Amount": 10}
        ])),
    ];
    for id in [2003, 2004, 2005, 2006, 2007, 2008] {
        spells.push(spell(id, damage.clone()));
    }
    for id in [3070, 3075, 3080, 3200, 3099, 3210] {
        spells.push(spell(id, damage.clone()));
    }
    Value::Array(spells)
}

fn troop(id: u32, reference: &str, rarity: &str, color_names: &[&str], types: &[&str], spell: u32) -> Value {
    json!({
        "Id": id,
        "Name": format!("[TROOP_{}_NAME]", id),
        "ReferenceName": reference,
        "Description": format!("[TROOP_{}_DESC]", id),
        "ManaColors": colors(color_names),
        "TroopRarity": rarity,
        "TroopTypes": types,
        "TroopRoles": ["Attacker"],
        "SpellId": spell,
        "Traits": ["Stealthy"]
    })
}

fn troops() -> Value {
    let mut goblin = troop(6000, "Goblin", "Common", &["ColorGreen", "ColorRed"], &["Goblin"], 2001);
    goblin["TraitStones"] = json!([{"Id": 1, "Amount": 5}]);
    let mut doomed = troop(6950, "Doomed Goblin", "Rare", &["ColorRed"], &["Goblin"], 2003);
    doomed["TraitStones"] = json!([{"Id": 1, "Amount": 3}]);
    json!([
        goblin,
        troop(6251, "Bone Dragon", "Legendary", &["ColorBlue", "ColorPurple"], &["Dragon", "Undead"], 2002),
        doomed,
        troop(6700, "Shadow Hunter", "Epic", &["ColorBlue", "ColorPurple"], &["Elf"], 2004),
        troop(6007, "Infernus", "Mythic", &["ColorRed", "ColorYellow"], &["Divine"], 2005),
        troop(6699, "Eclair", "Ultra-Rare", &["ColorYellow"], &["Fey"], 2006),
        troop(6900, "Warband Goblin", "Common", &["ColorGreen"], &["Goblin"], 2007),
        troop(6800, "Unreleased Sprite", "Sparkly", &["ColorGreen"], &["Fey"], 2008)
    ])
}

fn kingdoms() -> Value {
    json!([
        {
            "Id": 3000,
            "Name": "[KINGDOM_3000_NAME]",
            "ReferenceName": "Broken Spire",
            "ManaColors": colors(&["ColorBlue", "ColorPurple"]),
            "MapIndex": 0,
            "Troops": [6000, 6251, 6950],
            "LinkedKingdomId": 3101,
            "BannerName": "[BANNER_3000_NAME]",
            "BannerColors": {"ColorBlue": 1, "ColorPurple": 2, "ColorRed": -1},
            "FileBase": "BrokenSpire",
            "LevelData": [
                {"Stat": "Armor", "Amount": 1},
                {"Stat": "Life", "Amount": 1},
                {"Stat": "Armor", "Amount": 1}
            ]
        },
        {
            "Id": 3101,
            "Name": "[KINGDOM_3101_NAME]",
            "ReferenceName": "Dark Spire",
            "ManaColors": colors(&["ColorBlue", "ColorPurple"]),
            "MapIndex": 1,
            "Troops": [6700]
        },
        {
            "Id": 3010,
            "Name": "[KINGDOM_3010_NAME]",
            "ReferenceName": "Zaejin",
            "ManaColors": colors(&["ColorRed", "ColorYellow"]),
            "MapIndex": 0,
            "Troops": [6007, 6699, 6800],
            "BannerName": "[BANNER_3010_NAME]",
            "BannerColors": {"ColorRed": 3, "ColorYellow": 3, "ColorBlue": -1},
            "FileBase": "Zaejin",
            "LevelData": [
                {"Stat": "Magic", "Amount": 1},
                {"Stat": "Life", "Amount": 1},
                {"Stat": "Magic", "Amount": 1}
            ]
        },
        {
            "Id": 3200,
            "Name": "[KINGDOM_3200_NAME]",
            "ReferenceName": "Warband",
            "KingdomType": "Warband",
            "Troops": [6900]
        }
    ])
}

fn weapon(id: u32, reference: &str, rarity: &str, color_names: &[&str], kingdom: u32, mastery: u32, spell: u32) -> Value {
    json!({
        "Id": id,
        "ReferenceName": reference,
        "SpellId": spell,
        "ManaColors": colors(color_names),
        "WeaponRarity": rarity,
        "WeaponRoles": ["Attacker"],
        "KingdomId": kingdom,
        "MasteryRequirement": mastery
    })
}

fn weapons() -> Value {
    let spire = ["ColorBlue", "ColorPurple"];
    json!([
        weapon(1070, "Old Spire Blade", "Epic", &spire, 3000, 0, 3070),
        weapon(1075, "Spire Blade", "Epic", &spire, 3000, 0, 3075),
        weapon(1080, "Mastery Blade", "Epic", &spire, 3000, 500, 3080),
        weapon(1200, "Zaejin Staff", "Rare", &["ColorRed", "ColorYellow"], 3010, 0, 3200),
        weapon(1099, "Event Hammer", "Epic", &["ColorRed"], 3010, 0, 3099),
        weapon(1210, "Late Lance", "Epic", &["ColorYellow"], 3010, 0, 3210)
    ])
}

fn pets() -> Value {
    json!([
        {
            "Id": 7001,
            "Name": "[PET_7001_NAME]",
            "ReferenceName": "Spire Cat",
            "ManaColors": colors(&["ColorBlue"]),
            "Effect": "KingdomBonus",
            "KingdomId": 3000
        },
        {
            "Id": 7000,
            "Name": "[PET_7000_NAME]",
            "ReferenceName": "Shadow Cat",
            "ManaColors": colors(&["ColorPurple"]),
            "Effect": "FactionBonus",
            "EffectData": "3101",
            "KingdomId": 3101
        }
    ])
}

/// Talent tree codes of the fixture class, in class order
pub const TALENT_TREES: [&str; 3] = ["Magic", "Guardian", "Brawler"];

/// Display name of talent `tier` (0-based) in tree `tree`
pub fn talent_name(tree: &str, tier: usize) -> String {
    format!("{} Talent {}", tree, tier + 1)
}

fn talent_trees() -> Value {
    let trees: Vec<Value> = TALENT_TREES
        .iter()
        .map(|tree| {
            let talents: Vec<Value> = (0..7)
                .map(|tier| {
                    let code = format!("{}{}", tree, tier + 1);
                    json!({
                        "Code": code,
                        "Name": format!("[TALENT_{}_NAME]", code.to_uppercase()),
                        "Description": format!("[TALENT_{}_DESC]", code.to_uppercase())
                    })
                })
                .collect();
            json!({"Code": format!("TalentTree{}", tree), "Talents": talents})
        })
        .collect();
    Value::Array(trees)
}

pub fn world_json() -> Value {
    json!({
        "Spells": spells(),
        "Traits": [
            {"Code": "Stealthy", "Name": "[TRAIT_STEALTHY]", "Description": "[TRAIT_STEALTHY_DESC]"},
            {"Code": "Arcane", "Name": "[TRAIT_ARCANE]", "Description": "[TRAIT_ARCANE_DESC]", "Image": "Arcane_Icon"}
        ],
        "Troops": troops(),
        "Kingdoms": kingdoms(),
        "Weapons": weapons(),
        "Pets": pets(),
        "TalentTrees": talent_trees(),
        "HeroClasses": [{
            "Id": 14007,
            "Name": "[HEROCLASS_14007_NAME]",
            "ReferenceName": "Sorcerer",
            "Type": "Magic",
            "KingdomId": 3010,
            "WeaponId": 1200,
            "TalentTrees": ["TalentTreeMagic", "TalentTreeGuardian", "TalentTreeBrawler"],
            "Traits": ["Arcane"]
        }],
        "CampaignTasks": [
            {"Id": 1, "KingdomId": 3000, "Level": "Bronze", "Name": "[TASK_1_NAME]", "Value": 10},
            {"Id": 2, "KingdomId": 3000, "Level": "Gold", "Name": "[TASK_2_NAME]", "Value": 50}
        ],
        "SoulforgeRecipes": [{"Id": 1, "TargetId": 6007, "Category": "Mythic", "Costs": {"Souls": 1000}}],
        "Traitstones": [{"Id": 1, "Name": "[TRAITSTONE_1_NAME]", "ManaColors": colors(&["ColorBlue"])}]
    })
}

pub fn user_json() -> Value {
    json!({
        "pEconomyModel": {
            "TroopReleaseDates": [
                {"Id": 6007, "Date": 1_704_412_800},
                {"Id": 6800, "Date": 4_102_444_800_i64}
            ],
            "KingdomReleaseDates": [{"Id": 3010, "Date": 1_600_000_000}],
            "HeroClassReleaseDates": [{"Id": 14007, "Date": 1_600_000_000}],
            "PetReleaseDates": [{"Id": 7000, "Date": 1_650_000_000}],
            "WeaponReleaseDates": [{"Id": 1210, "Date": 1_735_689_600}],
            "RoomReleaseDates": [{"Id": 1, "Date": 1_700_000_000}],
            "Events": [
                {"Type": "WeeklyEvent", "StartDate": EVENT_START_UNIX, "EndDate": EVENT_START_UNIX + WEEK_SECS, "KingdomId": 3010},
                {"Type": "Raid", "StartDate": EVENT_START_UNIX, "EndDate": EVENT_START_UNIX + 86_400, "TroopId": 6251}
            ],
            "EventKingdoms": {"StartDate": EVENT_START_UNIX, "KingdomIds": [3000, 3010]},
            "AdventureBoard": [{"Name": "[ADVENTURE_1_NAME]", "Rarity": "Epic", "Rewards": {"GemKeys": 5, "Souls": 200}}],
            "DropChances": {"Gem Chest": {"Common": 50.0, "Mythic": 0.5}}
        }
    })
}

/// Parsed fixture dumps
pub fn raw_data() -> Result<RawData> {
    let mut loader = Loader::new();
    loader.load_world_str(&world_json().to_string())?;
    loader.load_user_str(&user_json().to_string())?;
    loader.finish()
}

/// The fixture world, fully built
pub fn graph() -> Result<EntityGraph> {
    build(&raw_data()?)
}

/// Translation table for a fixture locale as a JSON object string
///
/// German deliberately lacks troop 6699.
pub fn translations(locale: &str) -> Option<String> {
    let table = match locale {
        "en" => english(),
        "de" => german(),
        _ => return None,
    };
    Some(Value::Object(table).to_string())
}

fn english() -> Map<String, Value> {
    let mut table = Map::new();
    let mut put = |key: &str, text: &str| {
        table.insert(key.to_string(), Value::String(text.to_string()));
    };
    for (id, name) in [
        (6000, "Goblin"),
        (6251, "Bone Dragon"),
        (6950, "Doomed Goblin"),
        (6700, "Shadow Hunter"),
        (6007, "Infernus"),
        (6699, "Éclair"),
        (6900, "Warband Goblin"),
        (6800, "Unreleased Sprite"),
    ] {
        put(&format!("[TROOP_{}_NAME]", id), name);
        put(&format!("[TROOP_{}_DESC]", id), &format!("{} description", name));
    }
    for (id, name) in [
        (3000, "Broken Spire"),
        (3101, "Dark Spire"),
        (3010, "Zaejin"),
        (3200, "Warband"),
    ] {
        put(&format!("[KINGDOM_{}_NAME]", id), name);
    }
    put("[BANNER_3000_NAME]", "Spire Banner");
    put("[BANNER_3010_NAME]", "Zaejin Banner");
    for (id, name) in [
        (2001, "Goblin Rush"),
        (2002, "Bone Breath"),
        (2003, "Doom"),
        (2004, "Shadow Strike"),
        (2005, "Inferno"),
        (2006, "Sweet Surprise"),
        (2007, "Warcry"),
        (2008, "Sparkle"),
        (3070, "Old Spire Blade"),
        (3075, "Spire Blade"),
        (3080, "Mastery Blade"),
        (3200, "Zaejin Staff"),
        (3099, "Event Hammer"),
        (3210, "Late Lance"),
    ] {
        put(&format!("[SPELL_{}_NAME]", id), name);
        put(&format!("[SPELL_{}_DESC]", id), &format!("{} deals damage", name));
    }
    put("[PET_7000_NAME]", "Shadow Cat");
    put("[PET_7001_NAME]", "Spire Cat");
    put("[HEROCLASS_14007_NAME]", "Sorcerer");
    put("[TRAIT_STEALTHY]", "Stealthy");
    put("[TRAIT_STEALTHY_DESC]", "Hard to see");
    put("[TRAIT_ARCANE]", "Arcane");
    put("[TRAITSTONE_1_NAME]", "Minor Water Traitstone");
    put("[TASK_1_NAME]", "Gather water");
    put("[TASK_2_NAME]", "Defeat the spire");
    put("[ADVENTURE_1_NAME]", "Goblin Hunt");
    put("[GEM_KEYS]", "Gem Key\u{1f}Gem Keys");
    put("[SOULS]", "Souls");
    for (raw, text) in [("GOBLIN", "Goblin"), ("DRAGON", "Dragon"), ("DIVINE", "Divine"), ("FEY", "Fey"), ("ELF", "Elf")] {
        put(&format!("[TROOPTYPE_{}]", raw), text);
    }
    // Only reachable through the prefix-stripping fallback
    put("[UNDEAD]", "Undead");
    put("[TROOP_ROLE_ATTACKER]", "Attacker");
    for (index, text) in ["Common", "Uncommon", "Rare", "Ultra-Rare", "Epic", "Legendary", "Mythic"]
        .iter()
        .enumerate()
    {
        put(&format!("[RARITY_{}]", index), text);
    }
    for tree in TALENT_TREES {
        for tier in 0..7 {
            let code = format!("{}{}", tree, tier + 1).to_uppercase();
            put(&format!("[TALENT_{}_NAME]", code), &talent_name(tree, tier));
        }
    }
    table
}

fn german() -> Map<String, Value> {
    let mut table = english();
    table.remove("[TROOP_6699_NAME]");
    let mut put = |key: &str, text: &str| {
        table.insert(key.to_string(), Value::String(text.to_string()));
    };
    put("[TROOP_6000_NAME]", "Kobold");
    put("[TROOP_6950_NAME]", "Verdammter Kobold");
    put("[KINGDOM_3000_NAME]", "Zerbrochene Spitze");
    put("[TROOPTYPE_GOBLIN]", "Kobold");
    put("[HEROCLASS_14007_NAME]", "Zauberer");
    put("[RARITY_0]", "Gewöhnlich");
    table
}
