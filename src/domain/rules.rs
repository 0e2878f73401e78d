//! Ordered label rules per locale.
//!
//! Each table is evaluated top to bottom against the cleaned label with
//! case-insensitive matching; the first hit wins. Order is significant:
//! percentage variants come before flat ones, specific damage and resistance
//! lines before the generic ones, and two-token stats ("AP Reduction") before
//! the bare token ("AP").

use super::canonical::StatKey;

pub type Rule = (&'static str, StatKey);

pub const EN: &[Rule] = &[
    (r"%\s*fire resistance", StatKey::PctFireResistance),
    (r"%\s*air resistance", StatKey::PctAirResistance),
    (r"%\s*earth resistance", StatKey::PctEarthResistance),
    (r"%\s*water resistance", StatKey::PctWaterResistance),
    (r"%\s*neutral resistance", StatKey::PctNeutralResistance),
    (r"%\s*melee resistance", StatKey::PctMeleeResistance),
    (r"%\s*ranged resistance", StatKey::PctRangedResistance),
    (r"%\s*spell damage", StatKey::PctSpellDamage),
    (r"%\s*weapon damage", StatKey::PctWeaponDamage),
    (r"%\s*ranged damage", StatKey::PctRangedDamage),
    (r"%\s*melee damage", StatKey::PctMeleeDamage),
    (r"%\s*critical", StatKey::Critical),
    (r"hunting weapon", StatKey::HuntingWeapon),
    (r"critical damage", StatKey::CriticalDamage),
    (r"trap damage", StatKey::TrapDamage),
    (r"pushback damage", StatKey::PushbackDamage),
    (r"reflected damage", StatKey::ReflectedDamage),
    (r"neutral damage", StatKey::NeutralDamage),
    (r"earth damage", StatKey::EarthDamage),
    (r"fire damage", StatKey::FireDamage),
    (r"water damage", StatKey::WaterDamage),
    (r"air damage", StatKey::AirDamage),
    (r"critical resistance", StatKey::CriticalResistance),
    (r"pushback resistance", StatKey::PushbackResistance),
    (r"fire resistance", StatKey::FireResistance),
    (r"air resistance", StatKey::AirResistance),
    (r"earth resistance", StatKey::EarthResistance),
    (r"water resistance", StatKey::WaterResistance),
    (r"neutral resistance", StatKey::NeutralResistance),
    (r"\bap reduction\b", StatKey::ApReduction),
    (r"\bmp reduction\b", StatKey::MpReduction),
    (r"\bap parry\b", StatKey::ApParry),
    (r"\bmp parry\b", StatKey::MpParry),
    (r"power \(traps\)|trap power", StatKey::TrapPower),
    (r"\bpower\b", StatKey::Power),
    (r"\bstrength\b", StatKey::Strength),
    (r"\bintelligence\b", StatKey::Intelligence),
    (r"\bchance\b", StatKey::Chance),
    (r"\bagility\b", StatKey::Agility),
    (r"\bvitality\b", StatKey::Vitality),
    (r"\bwisdom\b", StatKey::Wisdom),
    (r"\binitiative\b", StatKey::Initiative),
    (r"\bpods?\b", StatKey::Pods),
    (r"\bsummons?\b", StatKey::Summons),
    (r"\bheals?\b", StatKey::Heals),
    (r"\bprospecting\b", StatKey::Prospecting),
    (r"\block\b", StatKey::Lock),
    (r"\bdodge\b", StatKey::Dodge),
    (r"\brange\b", StatKey::Range),
    (r"\bcritical\b", StatKey::Critical),
    (r"\bap\b", StatKey::Ap),
    (r"\bmp\b", StatKey::Mp),
    (r"\bdamage\b", StatKey::Damage),
];

pub const ES: &[Rule] = &[
    (r"^%\s*cr[ií]tico", StatKey::Critical),
    (r"%\s*da[ñn]os?\s+(?:cac|cuerpo a cuerpo)", StatKey::PctMeleeDamage),
    (r"%\s*da[ñn]os?\s+(?:a\s+|de\s+)?distancia", StatKey::PctRangedDamage),
    (
        r"%\s*da[ñn]os?\s+(?:(?:a|de)\s+(?:los\s+)?)?hechizos",
        StatKey::PctSpellDamage,
    ),
    (r"%\s*da[ñn]os?\s+(?:de\s+)?armas", StatKey::PctWeaponDamage),
    (r"%\s*resistencia\s+(?:cac|cuerpo a cuerpo)", StatKey::PctMeleeResistance),
    (r"%\s*resistencia\s+(?:a\s+)?distancia", StatKey::PctRangedResistance),
    (r"%\s*resistencia\s+(?:a\s+la\s+)?tierra", StatKey::PctEarthResistance),
    (r"%\s*resistencia\s+(?:al\s+)?agua", StatKey::PctWaterResistance),
    (r"%\s*resistencia\s+(?:al\s+)?aire", StatKey::PctAirResistance),
    (r"%\s*resistencia\s+(?:al\s+)?fuego", StatKey::PctFireResistance),
    (r"%\s*resistencia\s+(?:al\s+)?neutr(?:o|al)", StatKey::PctNeutralResistance),
    (r"da[ñn]os?\s+cr[ií]ticos?", StatKey::CriticalDamage),
    (r"da[ñn]os?\s+(?:de\s+)?trampas?", StatKey::TrapDamage),
    (r"da[ñn]os?\s+(?:de\s+)?empuje", StatKey::PushbackDamage),
    (r"da[ñn]os\s+(?:devueltos|reenv[ií]o)", StatKey::ReflectedDamage),
    (r"da[ñn]os?\s+neutr(?:o|al|ales)", StatKey::NeutralDamage),
    (r"da[ñn]os?\s+(?:de\s+)?tierra", StatKey::EarthDamage),
    (r"da[ñn]os?\s+(?:de\s+)?agua", StatKey::WaterDamage),
    (r"da[ñn]os?\s+(?:de\s+)?aire", StatKey::AirDamage),
    (r"da[ñn]os?\s+(?:de\s+)?fuego", StatKey::FireDamage),
    (
        r"resistencia\s+(?:a\s+(?:los\s+)?)?cr[ií]ticos",
        StatKey::CriticalResistance,
    ),
    (r"resistencia\s+(?:al\s+)?empuje", StatKey::PushbackResistance),
    (r"^empuje$", StatKey::PushbackDamage),
    (r"resistencia\s+(?:a\s+la\s+)?tierra", StatKey::EarthResistance),
    (r"resistencia\s+(?:al\s+)?agua", StatKey::WaterResistance),
    (r"resistencia\s+(?:al\s+)?aire", StatKey::AirResistance),
    (r"resistencia\s+(?:al\s+)?fuego", StatKey::FireResistance),
    (r"resistencia\s+(?:al\s+)?neutr(?:o|al)", StatKey::NeutralResistance),
    (r"potencia.*trampas", StatKey::TrapPower),
    (r"potencia", StatKey::Power),
    (r"(?:retiro|supresi[óo]n)\b.*\bpa\b", StatKey::ApReduction),
    (r"(?:retiro|supresi[óo]n)\b.*\bpm\b", StatKey::MpReduction),
    (r"esquiva\b.*\bpa\b", StatKey::ApParry),
    (r"esquiva\b.*\bpm\b", StatKey::MpParry),
    (r"vitalidad", StatKey::Vitality),
    (r"fuerza", StatKey::Strength),
    (r"inteligencia", StatKey::Intelligence),
    (r"suerte", StatKey::Chance),
    (r"agilidad", StatKey::Agility),
    (r"sabidur[ií]a", StatKey::Wisdom),
    (r"iniciativa", StatKey::Initiative),
    (r"prospecci[óo]n", StatKey::Prospecting),
    (r"\bpods?\b", StatKey::Pods),
    (r"invocaci[óo]n(?:es)?", StatKey::Summons),
    (r"\bcuras?\b|\bcuraciones\b", StatKey::Heals),
    (r"placaje", StatKey::Lock),
    (r"huida", StatKey::Dodge),
    (r"alcance", StatKey::Range),
    (r"arma de caza", StatKey::HuntingWeapon),
    (r"cr[ií]tico", StatKey::Critical),
    (r"\bpa\b", StatKey::Ap),
    (r"\bpm\b", StatKey::Mp),
    (r"\bda[ñn]os?\b", StatKey::Damage),
];

pub const FR: &[Rule] = &[
    (r"^%\s*critique", StatKey::Critical),
    (r"%\s*dommages?\s+m[êe]l[ée]e", StatKey::PctMeleeDamage),
    (r"%\s*dommages?\s+distance", StatKey::PctRangedDamage),
    (r"%\s*dommages?\s+aux\s+sorts", StatKey::PctSpellDamage),
    (r"%\s*dommages?\s+d['’]armes", StatKey::PctWeaponDamage),
    (r"%\s*r[ée]sistance\s+m[êe]l[ée]e", StatKey::PctMeleeResistance),
    (r"%\s*r[ée]sistance\s+distance", StatKey::PctRangedResistance),
    (r"%\s*r[ée]sistance\s+terre", StatKey::PctEarthResistance),
    (r"%\s*r[ée]sistance\s+eau", StatKey::PctWaterResistance),
    (r"%\s*r[ée]sistance\s+air", StatKey::PctAirResistance),
    (r"%\s*r[ée]sistance\s+feu", StatKey::PctFireResistance),
    (r"%\s*r[ée]sistance\s+neutre", StatKey::PctNeutralResistance),
    (r"dommages?\s+critiques?", StatKey::CriticalDamage),
    (r"dommages?\s+pi[èe]ges?", StatKey::TrapDamage),
    (r"dommages?\s+pouss[ée]e", StatKey::PushbackDamage),
    (r"dommages?\s+renvoy[ée]s?", StatKey::ReflectedDamage),
    (r"dommages?\s+neutre", StatKey::NeutralDamage),
    (r"dommages?\s+terre", StatKey::EarthDamage),
    (r"dommages?\s+feu", StatKey::FireDamage),
    (r"dommages?\s+eau", StatKey::WaterDamage),
    (r"dommages?\s+air", StatKey::AirDamage),
    (r"r[ée]sistance\s+critiques?", StatKey::CriticalResistance),
    (r"r[ée]sistance\s+pouss[ée]e", StatKey::PushbackResistance),
    (r"r[ée]sistance\s+terre", StatKey::EarthResistance),
    (r"r[ée]sistance\s+eau", StatKey::WaterResistance),
    (r"r[ée]sistance\s+air", StatKey::AirResistance),
    (r"r[ée]sistance\s+feu", StatKey::FireResistance),
    (r"r[ée]sistance\s+neutre", StatKey::NeutralResistance),
    (r"puissance\s+(?:aux\s+)?pi[èe]ges?", StatKey::TrapPower),
    (r"puissance", StatKey::Power),
    (r"retrait\s+pa\b", StatKey::ApReduction),
    (r"retrait\s+pm\b", StatKey::MpReduction),
    (r"esquive\s+pa\b", StatKey::ApParry),
    (r"esquive\s+pm\b", StatKey::MpParry),
    (r"vitalit[ée]", StatKey::Vitality),
    (r"\bforce\b", StatKey::Strength),
    (r"intelligence", StatKey::Intelligence),
    (r"\bchance\b", StatKey::Chance),
    (r"agilit[ée]", StatKey::Agility),
    (r"sagesse", StatKey::Wisdom),
    (r"initiative", StatKey::Initiative),
    (r"prospection", StatKey::Prospecting),
    (r"\bpods?\b", StatKey::Pods),
    (r"invocations?", StatKey::Summons),
    (r"\bsoins?\b", StatKey::Heals),
    (r"\btacle\b", StatKey::Lock),
    (r"\bfuite\b", StatKey::Dodge),
    (r"port[ée]e", StatKey::Range),
    (r"arme de chasse", StatKey::HuntingWeapon),
    (r"critique", StatKey::Critical),
    (r"\bpa\b", StatKey::Ap),
    (r"\bpm\b", StatKey::Mp),
    (r"\bdommages?\b", StatKey::Damage),
];
