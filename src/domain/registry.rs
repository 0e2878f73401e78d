//! Static rune table: which rune a stat breaks into, how much VR one rune
//! costs (weight) and how strongly magnitude turns into VR (density).

use std::{collections::HashSet, sync::OnceLock};

use thiserror::Error;

use super::{canonical::StatKey, entities::Locale};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuneNames {
    pub es: &'static str,
    pub en: &'static str,
    pub fr: &'static str,
}

impl RuneNames {
    pub fn get(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Es => self.es,
            Locale::En => self.en,
            Locale::Fr => self.fr,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuneSpec {
    pub key: StatKey,
    pub density: f64,
    pub weight: f64,
    pub names: RuneNames,
}

/// Registry view of one stat for one locale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RuneInfo {
    pub rune_name: &'static str,
    pub weight: f64,
    pub density: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("rune for {key} has non-positive weight {weight}")]
    InvalidWeight { key: StatKey, weight: f64 },
    #[error("rune for {key} has invalid density {density}")]
    InvalidDensity { key: StatKey, density: f64 },
    #[error("stat {0} is registered twice")]
    DuplicateKey(StatKey),
    #[error("rune for {key} has no {locale} name")]
    MissingName { key: StatKey, locale: Locale },
}

const fn rune(
    key: StatKey,
    density: f64,
    weight: f64,
    es: &'static str,
    en: &'static str,
    fr: &'static str,
) -> RuneSpec {
    RuneSpec {
        key,
        density,
        weight,
        names: RuneNames { es, en, fr },
    }
}

#[rustfmt::skip]
const BUILTIN: &[RuneSpec] = &[
    // Elements
    rune(StatKey::Strength, 1.0, 1.0, "Runa Fu", "Str Rune", "Rune Fo"),
    rune(StatKey::Intelligence, 1.0, 1.0, "Runa Inte", "Int Rune", "Rune Ine"),
    rune(StatKey::Chance, 1.0, 1.0, "Runa Sue", "Cha Rune", "Rune Cha"),
    rune(StatKey::Agility, 1.0, 1.0, "Runa Agi", "Agi Rune", "Rune Age"),
    // Secondary
    rune(StatKey::Vitality, 0.2, 1.0, "Runa Vi", "Vi Rune", "Rune Vi"),
    rune(StatKey::Wisdom, 3.0, 3.0, "Runa Sa", "Wis Rune", "Rune Sa"),
    rune(StatKey::Initiative, 0.1, 1.0, "Runa Ini", "Ini Rune", "Rune Ini"),
    rune(StatKey::Pods, 0.25, 2.5, "Runa Pod", "Pod Rune", "Rune Pod"),
    rune(StatKey::Power, 2.0, 2.0, "Runa Pot", "Pow Rune", "Rune Pui"),
    // Major
    rune(StatKey::Ap, 100.0, 100.0, "Runa Ga PA", "Ga AP Rune", "Rune Ga Pa"),
    rune(StatKey::Mp, 90.0, 90.0, "Runa Ga PM", "Ga MP Rune", "Rune Ga Pme"),
    rune(StatKey::Range, 51.0, 51.0, "Runa Al", "Ra Rune", "Rune Po"),
    rune(StatKey::Summons, 30.0, 30.0, "Runa Invo", "Summo Rune", "Rune Invo"),
    // Combat
    rune(StatKey::Critical, 10.0, 10.0, "Runa Cri", "Cri Rune", "Rune Cri"),
    rune(StatKey::Heals, 10.0, 10.0, "Runa Cu", "Hea Rune", "Rune So"),
    rune(StatKey::Prospecting, 3.0, 3.0, "Runa Prospe", "Prospe Rune", "Rune Prospe"),
    rune(StatKey::Lock, 4.0, 4.0, "Runa Pla", "Lock Rune", "Rune Tac"),
    rune(StatKey::Dodge, 4.0, 4.0, "Runa Hui", "Dodge Rune", "Rune Fui"),
    // Elemental damage
    rune(StatKey::NeutralDamage, 5.0, 5.0, "Runa Da Neutral", "Neutral Da Rune", "Rune Do Neutre"),
    rune(StatKey::EarthDamage, 5.0, 5.0, "Runa Da Tierra", "Earth Da Rune", "Rune Do Terre"),
    rune(StatKey::FireDamage, 5.0, 5.0, "Runa Da Fuego", "Fire Da Rune", "Rune Do Feu"),
    rune(StatKey::WaterDamage, 5.0, 5.0, "Runa Da Agua", "Water Da Rune", "Rune Do Eau"),
    rune(StatKey::AirDamage, 5.0, 5.0, "Runa Da Aire", "Air Da Rune", "Rune Do Air"),
    // Other damage
    rune(StatKey::Damage, 20.0, 20.0, "Runa Da", "Da Rune", "Rune Do"),
    rune(StatKey::TrapDamage, 5.0, 5.0, "Runa Da Tram", "Trap Da Rune", "Rune Do Pi"),
    rune(StatKey::CriticalDamage, 5.0, 5.0, "Runa Da Cri", "Cri Da Rune", "Rune Do Cri"),
    rune(StatKey::PushbackDamage, 5.0, 5.0, "Runa Da Emp", "Push Da Rune", "Rune Do Pou"),
    rune(StatKey::ReflectedDamage, 5.0, 5.0, "Runa Da Reen", "Ref Da Rune", "Rune Do Ren"),
    rune(StatKey::TrapPower, 2.0, 2.0, "Runa Por Tram", "Trap Pow Rune", "Rune Pi Per"),
    // Reductions and parries
    rune(StatKey::ApReduction, 7.0, 7.0, "Runa Ret PA", "AP Red Rune", "Rune Ret Pa"),
    rune(StatKey::MpReduction, 7.0, 7.0, "Runa Ret PM", "MP Red Rune", "Rune Ret Pme"),
    rune(StatKey::ApParry, 7.0, 7.0, "Runa Re PA", "AP Par Rune", "Rune Ré Pa"),
    rune(StatKey::MpParry, 7.0, 7.0, "Runa Re PM", "MP Par Rune", "Rune Ré Pme"),
    // Flat resistances
    rune(StatKey::FireResistance, 2.0, 2.0, "Runa Re Fuego", "Fire Res Rune", "Rune Ré Feu"),
    rune(StatKey::AirResistance, 2.0, 2.0, "Runa Re Aire", "Air Res Rune", "Rune Ré Air"),
    rune(StatKey::EarthResistance, 2.0, 2.0, "Runa Re Tierra", "Earth Res Rune", "Rune Ré Terre"),
    rune(StatKey::WaterResistance, 2.0, 2.0, "Runa Re Agua", "Water Res Rune", "Rune Ré Eau"),
    rune(StatKey::NeutralResistance, 2.0, 2.0, "Runa Re Neutral", "Neutral Res Rune", "Rune Ré Neutre"),
    rune(StatKey::PushbackResistance, 2.0, 2.0, "Runa Re Emp", "Push Res Rune", "Rune Ré Pou"),
    rune(StatKey::CriticalResistance, 2.0, 2.0, "Runa Re Cri", "Cri Res Rune", "Rune Ré Cri"),
    // Percent resistances
    rune(StatKey::PctFireResistance, 6.0, 6.0, "Runa Re Fuego Por", "Fire Res Per Rune", "Rune Ré Per Feu"),
    rune(StatKey::PctAirResistance, 6.0, 6.0, "Runa Re Aire Por", "Air Res Per Rune", "Rune Ré Per Air"),
    rune(StatKey::PctEarthResistance, 6.0, 6.0, "Runa Re Tierra Por", "Earth Res Per Rune", "Rune Ré Per Terre"),
    rune(StatKey::PctWaterResistance, 6.0, 6.0, "Runa Re Agua Por", "Water Res Per Rune", "Rune Ré Per Eau"),
    rune(StatKey::PctNeutralResistance, 6.0, 6.0, "Runa Re Neutral Por", "Neutral Res Per Rune", "Rune Ré Per Neutre"),
    // Percent damage and melee/ranged resistances
    rune(StatKey::PctSpellDamage, 15.0, 15.0, "Runa Da Por He", "Spell Da Per Rune", "Rune Do Per So"),
    rune(StatKey::PctWeaponDamage, 15.0, 15.0, "Runa Da Por Ar", "Weapon Da Per Rune", "Rune Do Per Ar"),
    rune(StatKey::PctRangedDamage, 15.0, 15.0, "Runa Da Por Di", "Ranged Da Per Rune", "Rune Do Per Di"),
    rune(StatKey::PctMeleeDamage, 15.0, 15.0, "Runa Da Por CC", "Melee Da Per Rune", "Rune Do Per Mé"),
    rune(StatKey::PctMeleeResistance, 10.0, 10.0, "Runa Re Por CC", "Melee Res Per Rune", "Rune Ré Per Mé"),
    rune(StatKey::PctRangedResistance, 10.0, 10.0, "Runa Re Por Di", "Ranged Res Per Rune", "Rune Ré Per Di"),
    rune(StatKey::HuntingWeapon, 5.0, 5.0, "Runa de caza", "Hunting Rune", "Rune de chasse"),
];

#[derive(Clone, Debug)]
pub struct RuneRegistry {
    specs: Vec<RuneSpec>,
}

impl RuneRegistry {
    pub fn from_specs(specs: Vec<RuneSpec>) -> Self {
        Self { specs }
    }

    /// The built-in game table.
    pub fn builtin() -> &'static RuneRegistry {
        static REGISTRY: OnceLock<RuneRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| RuneRegistry::from_specs(BUILTIN.to_vec()))
    }

    pub fn spec(&self, key: StatKey) -> Option<&RuneSpec> {
        self.specs.iter().find(|spec| spec.key == key)
    }

    pub fn lookup(&self, key: StatKey, locale: Locale) -> Option<RuneInfo> {
        self.spec(key).map(|spec| RuneInfo {
            rune_name: spec.names.get(locale),
            weight: spec.weight,
            density: spec.density,
        })
    }

    /// Density of a stat; zero when the stat carries no rune.
    pub fn density(&self, key: StatKey) -> f64 {
        self.spec(key).map(|spec| spec.density).unwrap_or(0.0)
    }

    /// All rune names of a locale, in table order.
    pub fn rune_names(&self, locale: Locale) -> Vec<&'static str> {
        self.specs.iter().map(|spec| spec.names.get(locale)).collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Checks the table invariants. Weights divide rune counts, so a
    /// non-positive weight is a table defect and must stop startup.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let mut seen = HashSet::new();
        for spec in &self.specs {
            if !seen.insert(spec.key) {
                return Err(RegistryError::DuplicateKey(spec.key));
            }
            if !(spec.weight.is_finite() && spec.weight > 0.0) {
                return Err(RegistryError::InvalidWeight {
                    key: spec.key,
                    weight: spec.weight,
                });
            }
            if !(spec.density.is_finite() && spec.density >= 0.0) {
                return Err(RegistryError::InvalidDensity {
                    key: spec.key,
                    density: spec.density,
                });
            }
            for locale in Locale::ALL {
                if spec.names.get(locale).trim().is_empty() {
                    return Err(RegistryError::MissingName {
                        key: spec.key,
                        locale,
                    });
                }
            }
        }
        Ok(())
    }
}
