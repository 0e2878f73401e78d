//! Locale-independent stat vocabulary and label canonicalization.
//!
//! Catalog labels arrive in the client language and often carry their
//! numeric value ("+50 Strength", ": - AP"). [`canonicalize`] strips the value
//! and walks the ordered rule table of the locale (see [`super::rules`]).

use std::{fmt, sync::OnceLock};

use regex::Regex;

use super::{entities::Locale, rules};

/// Canonical stat keys. Display strings are stable and locale independent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatKey {
    Strength,
    Intelligence,
    Chance,
    Agility,
    Vitality,
    Wisdom,
    Initiative,
    Pods,
    Power,
    Ap,
    Mp,
    Range,
    Summons,
    Critical,
    Heals,
    Prospecting,
    Lock,
    Dodge,
    NeutralDamage,
    EarthDamage,
    FireDamage,
    WaterDamage,
    AirDamage,
    Damage,
    TrapDamage,
    CriticalDamage,
    PushbackDamage,
    ReflectedDamage,
    TrapPower,
    ApReduction,
    MpReduction,
    ApParry,
    MpParry,
    FireResistance,
    AirResistance,
    EarthResistance,
    WaterResistance,
    NeutralResistance,
    PushbackResistance,
    CriticalResistance,
    PctFireResistance,
    PctAirResistance,
    PctEarthResistance,
    PctWaterResistance,
    PctNeutralResistance,
    PctSpellDamage,
    PctWeaponDamage,
    PctRangedDamage,
    PctMeleeDamage,
    PctMeleeResistance,
    PctRangedResistance,
    HuntingWeapon,
}

impl StatKey {
    pub const ALL: [StatKey; 52] = [
        StatKey::Strength,
        StatKey::Intelligence,
        StatKey::Chance,
        StatKey::Agility,
        StatKey::Vitality,
        StatKey::Wisdom,
        StatKey::Initiative,
        StatKey::Pods,
        StatKey::Power,
        StatKey::Ap,
        StatKey::Mp,
        StatKey::Range,
        StatKey::Summons,
        StatKey::Critical,
        StatKey::Heals,
        StatKey::Prospecting,
        StatKey::Lock,
        StatKey::Dodge,
        StatKey::NeutralDamage,
        StatKey::EarthDamage,
        StatKey::FireDamage,
        StatKey::WaterDamage,
        StatKey::AirDamage,
        StatKey::Damage,
        StatKey::TrapDamage,
        StatKey::CriticalDamage,
        StatKey::PushbackDamage,
        StatKey::ReflectedDamage,
        StatKey::TrapPower,
        StatKey::ApReduction,
        StatKey::MpReduction,
        StatKey::ApParry,
        StatKey::MpParry,
        StatKey::FireResistance,
        StatKey::AirResistance,
        StatKey::EarthResistance,
        StatKey::WaterResistance,
        StatKey::NeutralResistance,
        StatKey::PushbackResistance,
        StatKey::CriticalResistance,
        StatKey::PctFireResistance,
        StatKey::PctAirResistance,
        StatKey::PctEarthResistance,
        StatKey::PctWaterResistance,
        StatKey::PctNeutralResistance,
        StatKey::PctSpellDamage,
        StatKey::PctWeaponDamage,
        StatKey::PctRangedDamage,
        StatKey::PctMeleeDamage,
        StatKey::PctMeleeResistance,
        StatKey::PctRangedResistance,
        StatKey::HuntingWeapon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatKey::Strength => "Strength",
            StatKey::Intelligence => "Intelligence",
            StatKey::Chance => "Chance",
            StatKey::Agility => "Agility",
            StatKey::Vitality => "Vitality",
            StatKey::Wisdom => "Wisdom",
            StatKey::Initiative => "Initiative",
            StatKey::Pods => "Pods",
            StatKey::Power => "Power",
            StatKey::Ap => "AP",
            StatKey::Mp => "MP",
            StatKey::Range => "Range",
            StatKey::Summons => "Summons",
            StatKey::Critical => "Critical",
            StatKey::Heals => "Heals",
            StatKey::Prospecting => "Prospecting",
            StatKey::Lock => "Lock",
            StatKey::Dodge => "Dodge",
            StatKey::NeutralDamage => "Neutral Damage",
            StatKey::EarthDamage => "Earth Damage",
            StatKey::FireDamage => "Fire Damage",
            StatKey::WaterDamage => "Water Damage",
            StatKey::AirDamage => "Air Damage",
            StatKey::Damage => "Damage",
            StatKey::TrapDamage => "Trap Damage",
            StatKey::CriticalDamage => "Critical Damage",
            StatKey::PushbackDamage => "Pushback Damage",
            StatKey::ReflectedDamage => "Reflected Damage",
            StatKey::TrapPower => "Trap Power",
            StatKey::ApReduction => "AP Reduction",
            StatKey::MpReduction => "MP Reduction",
            StatKey::ApParry => "AP Parry",
            StatKey::MpParry => "MP Parry",
            StatKey::FireResistance => "Fire Resistance",
            StatKey::AirResistance => "Air Resistance",
            StatKey::EarthResistance => "Earth Resistance",
            StatKey::WaterResistance => "Water Resistance",
            StatKey::NeutralResistance => "Neutral Resistance",
            StatKey::PushbackResistance => "Pushback Resistance",
            StatKey::CriticalResistance => "Critical Resistance",
            StatKey::PctFireResistance => "% Fire Resistance",
            StatKey::PctAirResistance => "% Air Resistance",
            StatKey::PctEarthResistance => "% Earth Resistance",
            StatKey::PctWaterResistance => "% Water Resistance",
            StatKey::PctNeutralResistance => "% Neutral Resistance",
            StatKey::PctSpellDamage => "% Spell Damage",
            StatKey::PctWeaponDamage => "% Weapon Damage",
            StatKey::PctRangedDamage => "% Ranged Damage",
            StatKey::PctMeleeDamage => "% Melee Damage",
            StatKey::PctMeleeResistance => "% Melee Resistance",
            StatKey::PctRangedResistance => "% Ranged Resistance",
            StatKey::HuntingWeapon => "Hunting Weapon",
        }
    }

    /// Case-insensitive match against the canonical display strings.
    pub fn from_display(label: &str) -> Option<StatKey> {
        let label = label.trim();
        StatKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str().eq_ignore_ascii_case(label))
    }

    /// Stats that are effectively binary: a roll of 0 or 1 is worth one point.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            StatKey::Ap | StatKey::Mp | StatKey::Range | StatKey::Summons
        )
    }

    pub fn is_carrying_capacity(&self) -> bool {
        matches!(self, StatKey::Pods)
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of canonicalizing a label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Canonical {
    Known(StatKey),
    /// No rule matched; holds the cleaned label.
    Unrecognized(String),
}

impl Canonical {
    pub fn key(&self) -> Option<StatKey> {
        match self {
            Canonical::Known(key) => Some(*key),
            Canonical::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Canonical::Known(key) => key.as_str(),
            Canonical::Unrecognized(label) => label,
        }
    }
}

struct CompiledRule {
    pattern: Regex,
    key: StatKey,
}

fn value_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| {
        Regex::new(
            r"^[\s:+\-−]*(?:\d+(?:[.,]\d+)?)?(?:\s*(?:to|a|à)\s*[+\-−]?\d+(?:[.,]\d+)?)?[\s:]*",
        )
        .unwrap_or_else(|err| panic!("invalid value prefix pattern: {err}"))
    })
}

fn compile(table: &[(&str, StatKey)]) -> Vec<CompiledRule> {
    table
        .iter()
        .map(|(pattern, key)| CompiledRule {
            pattern: Regex::new(&format!("(?i){pattern}"))
                .unwrap_or_else(|err| panic!("invalid stat rule {pattern:?}: {err}")),
            key: *key,
        })
        .collect()
}

fn compiled_rules(locale: Locale) -> &'static [CompiledRule] {
    static ES: OnceLock<Vec<CompiledRule>> = OnceLock::new();
    static EN: OnceLock<Vec<CompiledRule>> = OnceLock::new();
    static FR: OnceLock<Vec<CompiledRule>> = OnceLock::new();

    match locale {
        Locale::Es => ES.get_or_init(|| compile(rules::ES)),
        Locale::En => EN.get_or_init(|| compile(rules::EN)),
        Locale::Fr => FR.get_or_init(|| compile(rules::FR)),
    }
}

/// Removes the leading value and sign tokens from a label.
pub fn clean_label(raw_label: &str) -> &str {
    let trimmed = raw_label.trim();
    match value_prefix().find(trimmed) {
        Some(prefix) => trimmed[prefix.end()..].trim(),
        None => trimmed,
    }
}

/// Maps a raw, locale-specific label to its canonical stat.
///
/// Rules are evaluated top to bottom and the first match wins, so the rule
/// tables list the most specific patterns first. Never fails: labels nothing
/// matches come back as [`Canonical::Unrecognized`].
pub fn canonicalize(raw_label: &str, locale: Locale) -> Canonical {
    let cleaned = clean_label(raw_label);

    if let Some(rule) = compiled_rules(locale)
        .iter()
        .find(|rule| rule.pattern.is_match(cleaned))
    {
        return Canonical::Known(rule.key);
    }

    match StatKey::from_display(cleaned) {
        Some(key) => Canonical::Known(key),
        None => Canonical::Unrecognized(cleaned.to_string()),
    }
}
