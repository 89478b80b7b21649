// src/specs/monster.rs
//! Scraping *spec* for a single monster page.
//!
//! Purpose:
//! - Turn one monster page into one [`MonsterRecord`].
//! - Keep **all stat-block markup coupling** in this file: the regexes below are
//!   the only place that knows how the site writes `AC 17, touch 9` or
//!   `Str 19, Dex 10, Con 15`.
//!
//! Shape of the text we read (after `core::html::document_text`):
//! ```text
//! Minotaur CR 4
//! XP 1,200
//! CE Large monstrous humanoid
//! Init +0; Senses darkvision 60 ft.; Perception +10
//! DEFENSE
//! AC 14, touch 9, flat-footed 14 (+5 natural, -1 size)
//! hp 45 (6d10+12)
//! Fort +6, Ref +5, Will +5
//! OFFENSE
//! Speed 30 ft.
//! Melee greataxe +9/+4 (3d6+6/x3) and gore +4 (1d6+2)
//! Space 10 ft.; Reach 10 ft.
//! STATISTICS
//! Str 19, Dex 10, Con 15, Int 7, Wis 10, Cha 8
//! ...
//! ```
//!
//! Required: name and CR (else `ParseError`). Every other field is optional and
//! is simply absent from the record when its line cannot be found, except the
//! domain defaults (movement modes, space, reach, counts).
//!
//! Non-Responsibilities:
//! - **No fetching, no subpages.** See `scrape` for hub pages and redirects.
//! - **No validation.** `MonsterRecord::validate` checks the core subset.

use std::collections::HashSet;

use regex::Regex;

use crate::core::html::document_text;
use crate::core::sanitize::{capitalize, is_third_party, normalize_stat_text};
use crate::error::ParseError;
use crate::record::{ChallengeRating, MonsterRecord, StatValue};
use crate::specs::attacks;
use crate::specs::feats::FeatCatalog;

const SENSES: [&str; 11] = [
    "blindsense",
    "blindsight",
    "greensight",
    "darkvision",
    "lifesense",
    "low-light vision",
    "mistsight",
    "scent",
    "thoughtsense",
    "tremorsense",
    "true seeing",
];

const MOVEMENT: [&str; 4] = ["burrow", "climb", "fly", "swim"];

const ABILITIES: [(&str, &str); 6] = [
    ("Str", "strength"),
    ("Dex", "dexterity"),
    ("Con", "constitution"),
    ("Int", "intelligence"),
    ("Wis", "wisdom"),
    ("Cha", "charisma"),
];

const DEFAULT_SPACE: f64 = 5.0;
const DEFAULT_REACH: i64 = 5;

/// Parse one monster page. `url` is stored as the record's provenance.
pub fn parse_monster(html: &str, url: &str, feats: &FeatCatalog) -> Result<MonsterRecord, ParseError> {
    let text = normalize_stat_text(&document_text(html)).replace("Diminuitive", "Diminutive");
    parse_monster_text(&text, url, feats)
}

/// Same as [`parse_monster`] on already extracted and normalized text.
pub fn parse_monster_text(text: &str, url: &str, feats: &FeatCatalog) -> Result<MonsterRecord, ParseError> {
    let Some(head) = regex!(r"CR\s*[0-9/]+\)?\s*\(?XP").find(text) else {
        return Err(if regex!(r"\bXP\s+[0-9,]+").is_match(text) {
            ParseError::MissingField("CR")
        } else {
            ParseError::NoStatBlock
        });
    };

    let name = parse_name(text)?;

    let block = &text[head.start()..];
    let sections = Sections::split(block)?;

    let cr_raw = regex!(r"CR\s*\(?\s*(\d+(?:/\d+)?)")
        .captures(sections.basic)
        .map(|c| c[1].to_string())
        .ok_or(ParseError::MissingField("CR"))?;
    let cr: ChallengeRating = cr_raw.parse()?;

    let mut rec = MonsterRecord::new(name, cr, url);
    basic_info(sections.basic, &mut rec);
    defense(sections.defense, &mut rec);
    offense(sections.offense, &mut rec);
    statistics(sections.statistics, feats, &mut rec);
    Ok(rec)
}

/// The line right before `CR … XP`. A title written as `goblin (CR 1/3)`
/// leaves a dangling `(`; such names get their first letter upper-cased.
fn parse_name(text: &str) -> Result<String, ParseError> {
    let caps = regex!(r"(?:^|\n)([^\n]+?)\s*(\()?\s*CR\s*[0-9/]*\s*\)?\s*\(?XP")
        .captures(text)
        .ok_or(ParseError::MissingField("name"))?;
    let raw = caps[1].trim();
    let name = if caps.get(2).is_some() { capitalize(raw) } else { s!(raw) };
    if name.is_empty() {
        return Err(ParseError::MissingField("name"));
    }
    if is_third_party(&name) {
        return Err(ParseError::ThirdParty(name));
    }
    Ok(name)
}

/// Stat block split at its headings.
struct Sections<'a> {
    basic: &'a str,
    defense: &'a str,
    offense: &'a str,
    statistics: &'a str,
}

impl<'a> Sections<'a> {
    fn split(block: &'a str) -> Result<Self, ParseError> {
        let def = block.find("DEFENSE").ok_or(ParseError::MissingSection("DEFENSE"))?;
        let after_def = &block[def + "DEFENSE".len()..];

        let off = after_def.find("OFFENSE").ok_or(ParseError::MissingSection("OFFENSE"))?;
        let after_off = &after_def[off + "OFFENSE".len()..];

        let stats = after_off
            .find("STATISTICS")
            .ok_or(ParseError::MissingSection("STATISTICS"))?;
        // TACTICS sits between OFFENSE and STATISTICS on some pages
        let off_end = after_off[..stats].find("TACTICS").unwrap_or(stats);

        let after_stats = &after_off[stats + "STATISTICS".len()..];
        let stats_end = regex!(r"SPECIAL ABILITIES|ECOLOGY|DESCRIPTION")
            .find(after_stats)
            .map_or(after_stats.len(), |m| m.start());

        Ok(Self {
            basic: &block[..def],
            defense: &after_def[..off],
            offense: &after_off[..off_end],
            statistics: &after_stats[..stats_end],
        })
    }
}

fn int_at(re: &Regex, hay: &str, group: usize) -> Option<i64> {
    re.captures(hay)
        .and_then(|c| c.get(group))
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

fn set_opt(rec: &mut MonsterRecord, key: &str, value: Option<impl Into<StatValue>>) {
    if let Some(v) = value {
        rec.set(key, v);
    }
}

fn basic_info(s: &str, rec: &mut MonsterRecord) {
    set_opt(rec, "xp", int_at(regex!(r"XP\s+([0-9][0-9,]*)"), s, 1));

    let alignment = regex!(r"\b(LG|NG|CG|LN|CN|LE|NE|CE|N)\b")
        .captures(s)
        .map(|c| c[1].to_string());
    set_opt(rec, "alignment", alignment);

    let size = regex!(r"\b(Fine|Diminutive|Tiny|Small|Medium|Large|Huge|Gargantuan|Colossal)\b")
        .captures(s)
        .map(|c| c[1].to_string());
    set_opt(rec, "size", size);

    let kind = regex!(
        r"\b(aberration|animal|construct|dragon|fey|humanoid|magical beast|monstrous humanoid|ooze|outsider|plant|undead|vermin)\b"
    )
    .captures(s)
    .map(|c| capitalize(&c[1]));
    set_opt(rec, "type", kind);

    set_opt(rec, "init", int_at(regex!(r"Init\s+([+-]?\d+)"), s, 1));

    // "Senses darkvision 60 ft., detect good, scent; Perception +10"
    let senses = regex!(r"Senses\s+([^\n]*)")
        .captures(s)
        .map(|c| {
            let line = c.get(1).map_or("", |m| m.as_str());
            let line = line.split("Perception").next().unwrap_or(line);
            let detects = line.matches("detect").count();
            let known = SENSES.iter().filter(|name| line.contains(*name)).count();
            (detects + known) as i64
        })
        .unwrap_or(0);
    rec.set("senses", senses);

    set_opt(rec, "perception", int_at(regex!(r"Perception\s+([+-]?\d+)"), s, 1));
}

fn defense(s: &str, rec: &mut MonsterRecord) {
    if let Some(c) = regex!(r"\bAC\s+(\d+)[\s\S]*?touch\s+(\d+)[\s\S]*?flat-footed\s+(\d+)").captures(s) {
        for (key, idx) in [("ac", 1usize), ("touch", 2), ("flat_footed", 3)] {
            set_opt(rec, key, c[idx].parse::<i64>().ok());
        }
    } else {
        set_opt(rec, "ac", int_at(regex!(r"\bAC\s+(\d+)"), s, 1));
    }

    // "hp 45 (6d10+12)"
    let hp = regex!(r"\bhp\s+(\d+)\s*\((\d+)\s*(?:d|HD)");
    match hp.captures(s) {
        Some(c) => {
            set_opt(rec, "hp", c[1].parse::<i64>().ok());
            set_opt(rec, "hd", c[2].parse::<i64>().ok());
        }
        None => set_opt(rec, "hp", int_at(regex!(r"\bhp\s+(\d+)"), s, 1)),
    }

    if let Some(c) = regex!(r"Fort\s+([+-]?\d+)[\s\S]*?Ref\s+([+-]?\d+)[\s\S]*?Will\s+([+-]?\d+)").captures(s) {
        for (key, idx) in [("fortitude", 1usize), ("reflex", 2), ("will", 3)] {
            set_opt(rec, key, c[idx].parse::<i64>().ok());
        }
    }
}

fn offense(s: &str, rec: &mut MonsterRecord) {
    set_opt(rec, "speed", int_at(regex!(r"Speed\s+(\d+)"), s, 1));

    let mut modes = [0i64; MOVEMENT.len()];
    for c in regex!(r"\b(burrow|climb|fly|swim)\s+(\d+)").captures_iter(s) {
        if let Some(i) = MOVEMENT.iter().position(|m| *m == &c[1]) {
            // first mention wins
            if modes[i] == 0 {
                modes[i] = c[2].parse().unwrap_or(0);
            }
        }
    }
    for (mode, speed) in MOVEMENT.iter().zip(modes) {
        rec.set(mode, speed);
    }

    let summary = attacks::summarize(s);
    set_opt(rec, "highest_attack_bonus", summary.map(|a| a.highest_bonus));
    let summary = summary.unwrap_or_default();
    rec.set("melee_attacks_num", summary.melee_count);
    rec.set("melee_median_dmg", summary.melee_median_dmg);
    rec.set("ranged_attacks_num", summary.ranged_count);
    rec.set("ranged_median_dmg", summary.ranged_median_dmg);

    let space = regex!(r"Space\s+(\d+(?:\.\d+)?)")
        .captures(s)
        .and_then(|c| c[1].parse::<f64>().ok())
        .map(|v| (v * 10.0).round() / 10.0)
        .unwrap_or(DEFAULT_SPACE);
    rec.set("space", space);
    rec.set("reach", int_at(regex!(r"Reach\s+(\d+)"), s, 1).unwrap_or(DEFAULT_REACH));
}

fn statistics(s: &str, feats: &FeatCatalog, rec: &mut MonsterRecord) {
    let ability = regex!(r"\b(Str|Dex|Con|Int|Wis|Cha)\s+(-|\d+)");
    let mut scores: Vec<(&str, StatValue)> = Vec::with_capacity(ABILITIES.len());
    for c in ability.captures_iter(s) {
        let short = c.get(1).map_or("", |m| m.as_str());
        if scores.iter().any(|(k, _)| *k == short) {
            continue;
        }
        let value = match &c[2] {
            "-" => StatValue::from("-"),
            n => match n.parse::<i64>() {
                Ok(v) => StatValue::Int(v),
                Err(_) => continue,
            },
        };
        scores.push((short, value));
    }
    for (short, long) in ABILITIES {
        if let Some((_, v)) = scores.iter().find(|(k, _)| *k == short) {
            rec.set(long, v.clone());
        }
    }

    set_opt(rec, "bab", int_at(regex!(r"Base\s*Atk\s*([+-]?\d+)"), s, 1));
    set_opt(rec, "cmb", int_at(regex!(r"CMB\s*([+-]?\d+)"), s, 1));
    set_opt(rec, "cmd", int_at(regex!(r"CMD\s*[-+]?(\d+)"), s, 1));

    let feats_num = regex!(r"\bFeats\b([\s\S]*?)(?:Skills|Languages|SQ|\n|$)")
        .captures(s)
        .map(|c| feats.count(c.get(1).map_or("", |m| m.as_str())))
        .unwrap_or(0);
    rec.set("feats_num", feats_num);

    let skills_num = regex!(r"\bSkills\b([\s\S]*?)(?:Languages|SQ|\n|$)")
        .captures(s)
        .map(|c| count_skills(c.get(1).map_or("", |m| m.as_str())))
        .unwrap_or(0);
    rec.set("skills_num", skills_num);
}

/// Distinct named skills, plus one per `Knowledge`/`Craft` mention.
pub fn count_skills(line: &str) -> i64 {
    let named: HashSet<&str> = regex!(
        r"\b(Acrobatics|Appraise|Bluff|Climb|Diplomacy|Disable Device|Disguise|Escape Artist|Fly|Handle Animal|Heal|Intimidate|Linguistics|Perception|Perform|Profession|Ride|Sense Motive|Sleight of Hand|Spellcraft|Stealth|Survival|Swim|Use Magic Device)\b"
    )
    .find_iter(line)
    .map(|m| m.as_str())
    .collect();
    let grouped = regex!(r"\b(?:Knowledge|Craft)\b").find_iter(line).count();
    (named.len() + grouped) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINOTAUR: &str = "\
Minotaur CR 4
XP 1,200
CE Large monstrous humanoid
Init +0; Senses darkvision 60 ft.; Perception +10
DEFENSE
AC 14, touch 9, flat-footed 14 (+5 natural, -1 size)
hp 45 (6d10+12)
Fort +6, Ref +5, Will +5
Defensive Abilities natural cunning
OFFENSE
Speed 30 ft.
Melee greataxe +9/+4 (3d6+6/x3) and gore +4 (1d6+2)
Space 10 ft.; Reach 10 ft.
Special Attacks powerful charge (gore, 2d6+6)
STATISTICS
Str 19, Dex 10, Con 15, Int 7, Wis 10, Cha 8
Base Atk +6; CMB +11 (+13 bull rush); CMD 21 (23 vs. bull rush)
Feats Great Fortitude, Improved Bull Rush, Power Attack
Skills Intimidate +2, Perception +10, Stealth +2, Survival +10
Languages Giant
ECOLOGY
Environment temperate plains";

    #[test]
    fn minotaur_text() {
        let rec = parse_monster_text(MINOTAUR, "u", &FeatCatalog::empty()).unwrap();
        assert_eq!(rec.name, "Minotaur");
        assert_eq!(rec.cr.to_string(), "4");
        assert_eq!(rec.int("xp"), Some(1200));
        assert_eq!(rec.text("alignment"), Some("CE"));
        assert_eq!(rec.text("size"), Some("Large"));
        assert_eq!(rec.text("type"), Some("Monstrous humanoid"));
        assert_eq!(rec.int("init"), Some(0));
        assert_eq!(rec.int("senses"), Some(1));
        assert_eq!(rec.int("perception"), Some(10));

        assert_eq!(rec.int("ac"), Some(14));
        assert_eq!(rec.int("touch"), Some(9));
        assert_eq!(rec.int("flat_footed"), Some(14));
        assert_eq!(rec.int("hp"), Some(45));
        assert_eq!(rec.int("hd"), Some(6));
        assert_eq!(rec.int("fortitude"), Some(6));
        assert_eq!(rec.int("reflex"), Some(5));
        assert_eq!(rec.int("will"), Some(5));

        assert_eq!(rec.int("speed"), Some(30));
        assert_eq!(rec.int("fly"), Some(0));
        assert_eq!(rec.int("highest_attack_bonus"), Some(9));
        assert_eq!(rec.int("melee_attacks_num"), Some(3));
        assert_eq!(rec.float("melee_median_dmg"), Some(42.0));
        assert_eq!(rec.int("ranged_attacks_num"), Some(0));
        assert_eq!(rec.float("space"), Some(10.0));
        assert_eq!(rec.int("reach"), Some(10));

        assert_eq!(rec.int("strength"), Some(19));
        assert_eq!(rec.int("charisma"), Some(8));
        assert_eq!(rec.int("bab"), Some(6));
        assert_eq!(rec.int("cmb"), Some(11));
        assert_eq!(rec.int("cmd"), Some(21));
        assert_eq!(rec.int("feats_num"), Some(3));
        assert_eq!(rec.int("skills_num"), Some(4));
        assert!(rec.validate().is_ok());
    }

    #[test]
    fn keys_follow_section_order() {
        let rec = parse_monster_text(MINOTAUR, "u", &FeatCatalog::empty()).unwrap();
        let keys: Vec<&str> = rec.stats.keys().map(String::as_str).collect();
        assert_eq!(&keys[..3], &["xp", "alignment", "size"]);
        let ac = keys.iter().position(|k| *k == "ac").unwrap();
        let speed = keys.iter().position(|k| *k == "speed").unwrap();
        let str_ = keys.iter().position(|k| *k == "strength").unwrap();
        assert!(ac < speed && speed < str_);
        assert_eq!(keys.last(), Some(&"skills_num"));
    }

    #[test]
    fn missing_cr_vs_no_block() {
        let no_cr = MINOTAUR.replace("Minotaur CR 4", "Minotaur");
        assert_eq!(
            parse_monster_text(&no_cr, "u", &FeatCatalog::empty()),
            Err(ParseError::MissingField("CR"))
        );
        assert_eq!(
            parse_monster_text("Just an article.", "u", &FeatCatalog::empty()),
            Err(ParseError::NoStatBlock)
        );
    }

    #[test]
    fn missing_section_is_an_error() {
        let broken = MINOTAUR.replace("OFFENSE", "OFFENCE");
        assert_eq!(
            parse_monster_text(&broken, "u", &FeatCatalog::empty()),
            Err(ParseError::MissingSection("OFFENSE"))
        );
    }

    #[test]
    fn parenthesised_cr_capitalizes_name() {
        let t = MINOTAUR.replace("Minotaur CR 4", "minotaur (CR 4)");
        let rec = parse_monster_text(&t, "u", &FeatCatalog::empty()).unwrap();
        assert_eq!(rec.name, "Minotaur");
        assert_eq!(rec.cr.to_string(), "4");

        let t = MINOTAUR.replace("Minotaur CR 4", "minotaur CR 4");
        let rec = parse_monster_text(&t, "u", &FeatCatalog::empty()).unwrap();
        assert_eq!(rec.name, "minotaur");
    }

    #[test]
    fn third_party_name_rejected() {
        let t = MINOTAUR.replace("Minotaur CR 4", "Minotaur (3pp) CR 4");
        assert!(matches!(
            parse_monster_text(&t, "u", &FeatCatalog::empty()),
            Err(ParseError::ThirdParty(_))
        ));
    }

    #[test]
    fn dashed_ability_and_defaults() {
        let t = MINOTAUR
            .replace("Con 15", "Con -")
            .replace("Space 10 ft.; Reach 10 ft.\n", "")
            .replace("Speed 30 ft.", "Speed 30 ft., climb 20 ft., fly 60 ft. (good)");
        let rec = parse_monster_text(&t, "u", &FeatCatalog::empty()).unwrap();
        assert_eq!(rec.text("constitution"), Some("-"));
        assert_eq!(rec.int("intelligence"), Some(7));
        assert_eq!(rec.float("space"), Some(5.0));
        assert_eq!(rec.int("reach"), Some(5));
        assert_eq!(rec.int("climb"), Some(20));
        assert_eq!(rec.int("fly"), Some(60));
        assert_eq!(rec.int("swim"), Some(0));
    }

    #[test]
    fn skills_counting() {
        assert_eq!(count_skills("Knowledge (arcana) +5, Knowledge (planes) +5, Stealth +3"), 3);
        assert_eq!(count_skills("Stealth +3, Stealth +7 in forests, Craft (traps) +2"), 2);
        assert_eq!(count_skills(""), 0);
    }
}
