// src/specs/attacks.rs
//! Attack lines of the OFFENSE section.
//!
//! Input looks like
//! `Melee mwk longsword +9/+4 (1d8+3/19-20) or 2 claws +8 (1d4+2) and bite +3 (1d6+1)`.
//! Every entry becomes an [`Attack`]: how many swings it gives, the best
//! bonus, and the expected damage per swing with critical hits folded in.
//! Entries joined by `and` are taken together; `or` keeps the stronger side.

use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Attack {
    pub count: i64,
    pub highest_bonus: i64,
    pub avg_dmg: f64,
    pub full_dmg: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Joiner {
    Plain,
    And,
    Or,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AttackSummary {
    pub highest_bonus: i64,
    pub melee_count: i64,
    pub melee_median_dmg: f64,
    pub ranged_count: i64,
    pub ranged_median_dmg: f64,
}

/// Summarise the Melee/Ranged lines of an OFFENSE section.
/// `None` when the section has no damage-dealing attack entries.
pub fn summarize(offense: &str) -> Option<AttackSummary> {
    let start = regex!(r"\b(?:Melee|Ranged)\b").find(offense)?.start();
    let rest = &offense[start..];
    let end = regex!(r"\b(?:Space|Reach|Special Attacks|Spell-Like Abilities|Spells)\b")
        .find(rest)
        .map_or(rest.len(), |m| m.start());

    let entries: Vec<&str> = rest[..end]
        .split(')')
        .filter(|e| regex!(r"\(\s*\d+d\d+").is_match(e))
        .collect();
    if entries.is_empty() {
        return None;
    }

    let first_ranged = entries
        .iter()
        .position(|e| e.contains("Ranged"))
        .unwrap_or(entries.len());

    let parsed: Vec<(Attack, Joiner)> = entries
        .iter()
        .map(|e| (parse_attack(&clean_entry(e)), joiner(e)))
        .collect();

    let highest_bonus = parsed.iter().map(|(a, _)| a.highest_bonus).max().unwrap_or(0);
    let (melee, ranged) = parsed.split_at(first_ranged);
    let melee = resolve(melee.to_vec());
    let ranged = resolve(ranged.to_vec());

    Some(AttackSummary {
        highest_bonus,
        melee_count: melee.iter().map(|a| a.count).sum(),
        melee_median_dmg: median_full_dmg(&melee),
        ranged_count: ranged.iter().map(|a| a.count).sum(),
        ranged_median_dmg: median_swing_dmg(&ranged),
    })
}

/// Joiner words are only looked for before the damage parenthesis; effect
/// text ("fire or cold") may contain them too.
fn joiner(entry: &str) -> Joiner {
    let head = entry.split('(').next().unwrap_or("");
    if regex!(r"\bor\b").is_match(head) {
        Joiner::Or
    } else if regex!(r"\band\b").is_match(head) {
        Joiner::And
    } else {
        Joiner::Plain
    }
}

fn clean_entry(entry: &str) -> String {
    let head_end = entry.find('(').unwrap_or(entry.len());
    let head = regex!(r"\b(?:Melee|Ranged|and|or)\b").replace_all(&entry[..head_end], "");
    let joined = format!("{head}{}", &entry[head_end..]);
    joined
        .trim_start_matches(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .trim_end()
        .to_string()
}

/// One attack entry without its closing parenthesis:
/// `mwk longsword +9/+4 (1d8+3/19-20`, `2 claws +8 (1d4+2`.
pub fn parse_attack(text: &str) -> Attack {
    let cleaned = regex!(r"\b(?:melee|Melee|ranged|Ranged|touch)\b").replace_all(text, "");
    let text = cleaned.trim();
    let mut out = Attack::default();

    // "+1 longsword +6/+1 (" must yield "+6/+1"; the second form catches a
    // misplaced bonus as in "+1 javelin (".
    let bonuses = regex!(r"([0-9+\-/]+)\s+\(")
        .captures(text)
        .or_else(|| regex!(r"([0-9+\-/]+)\s*[a-zA-Z\-]+\s*\(").captures(text))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());
    let Some(bonuses) = bonuses else {
        return out;
    };
    let Some(best) = regex!(r"[+-]\d+")
        .find(bonuses)
        .and_then(|m| m.as_str().parse::<i64>().ok())
    else {
        return out;
    };
    // iterative attacks are listed best first
    out.highest_bonus = best;
    out.count = bonuses.matches('/').count() as i64 + 1;

    // natural attacks: "2 claws +8"
    if out.count == 1 {
        if let Some(n) = regex!(r"^(\d+)\s").captures(text).and_then(|c| c[1].parse().ok()) {
            out.count = n;
        }
    }

    let Some(effects) = text.split_once('(').map(|(_, e)| e) else {
        return out;
    };
    let Some(dice) = regex!(r"(\d+)d(\d+)([+-]\d+)?(.*)").captures(effects) else {
        return out;
    };
    let num: f64 = dice[1].parse().unwrap_or(0.0);
    let size: f64 = dice[2].parse().unwrap_or(0.0);
    let flat: f64 = dice.get(3).and_then(|m| m.as_str().parse().ok()).unwrap_or(0.0);
    let (chance, mult) = crit_info(dice.get(4).map_or("", |m| m.as_str()));

    let mut avg = num * (1.0 + size) / 2.0 + flat;
    // a crit is an extra (mult - 1) hits with `chance` probability
    avg += chance * avg * (mult - 1) as f64;
    avg = (avg * 2.0).round() / 2.0;

    // "plus 1d6 fire", "+2d6 sneak attack"
    for extra in regex!(r"(?:\+|plus)\s*(\d+)d(\d+)").captures_iter(effects) {
        let n: f64 = extra[1].parse().unwrap_or(0.0);
        let s: f64 = extra[2].parse().unwrap_or(0.0);
        avg += n * (1.0 + s) / 2.0;
    }

    out.avg_dmg = avg;
    out.full_dmg = out.count as f64 * avg;
    out
}

/// Critical chance and multiplier from the text after the damage dice:
/// `/19-20` → 10 %, `/x3` → ×3. Defaults: 20 only (5 %), ×2.
pub fn crit_info(text: &str) -> (f64, i64) {
    let chance = regex!(r"(1\d)-20")
        .captures(text)
        .and_then(|c| c[1].parse::<i64>().ok())
        .map(|low| (((20 - low + 1) as f64 * 0.05) * 100.0).round() / 100.0)
        .unwrap_or(0.05);
    let mult = regex!(r"[x×](\d)")
        .captures(text)
        .and_then(|c| c[1].parse::<i64>().ok())
        .unwrap_or(2);
    (chance, mult)
}

/// Apply joiners: `and` binds tighter than `or`.
fn resolve(mut attacks: Vec<(Attack, Joiner)>) -> Vec<Attack> {
    let mut i = attacks.len();
    while i > 1 {
        i -= 1;
        if attacks[i].1 == Joiner::And {
            let (cur, _) = attacks.remove(i);
            let prev = &mut attacks[i - 1].0;
            prev.highest_bonus = prev.highest_bonus.max(cur.highest_bonus);
            prev.avg_dmg += cur.avg_dmg;
            prev.count += cur.count;
            prev.full_dmg += cur.full_dmg;
        }
    }

    let mut i = attacks.len();
    while i > 1 {
        i -= 1;
        if attacks[i].1 == Joiner::Or {
            if stronger(&attacks[i].0, &attacks[i - 1].0) {
                // the survivor takes the loser's place in the chain
                let joiner = attacks[i - 1].1;
                attacks.remove(i - 1);
                attacks[i - 1].1 = joiner;
            } else {
                attacks.remove(i);
            }
        }
    }

    attacks.into_iter().map(|(a, _)| a).collect()
}

/// Strictly stronger: full damage, then average damage, swings, bonus.
fn stronger(a: &Attack, b: &Attack) -> bool {
    let ord = a.full_dmg.total_cmp(&b.full_dmg)
        .then(a.avg_dmg.total_cmp(&b.avg_dmg))
        .then(a.count.cmp(&b.count))
        .then(a.highest_bonus.cmp(&b.highest_bonus));
    ord == Ordering::Greater
}

/// Melee: median over whole attack groups.
fn median_full_dmg(attacks: &[Attack]) -> f64 {
    median(attacks.iter().map(|a| a.full_dmg).collect())
}

/// Ranged: median over single swings, each group contributing `count` swings.
fn median_swing_dmg(attacks: &[Attack]) -> f64 {
    let swings = attacks
        .iter()
        .flat_map(|a| std::iter::repeat_n(a.avg_dmg, a.count.max(0) as usize))
        .collect();
    median(swings)
}

fn median(mut v: Vec<f64>) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    v.sort_by(f64::total_cmp);
    let mid = v.len() / 2;
    let m = if v.len() % 2 == 0 { (v[mid - 1] + v[mid]) / 2.0 } else { v[mid] };
    m.max(0.0)
}
