//! GearSource - Stats from an equipped item

use crate::character::Item;
use crate::modifier::{parse_modifiers, DamageCategory, Effect, EffectKind, Stat};
use crate::source::StatSource;
use crate::stat_block::StatValue;
use crate::types::EquipmentSlot;
use tracing::debug;

/// Defence properties and the stat each one feeds
const DEFENCE_PROPERTIES: [(&str, Stat); 3] = [
    ("Armour", Stat::Armour),
    ("Evasion Rating", Stat::Evasion),
    ("Energy Shield", Stat::EnergyShield),
];

/// Stats from one equipped item
///
/// Weapon-local modifiers are emitted tagged local so the weapon resolver can
/// fold them into the weapon's own numbers; the aggregator ignores them.
/// Defence modifiers on armour pieces are folded into the piece's base
/// defences here and contributed as one flat total per defence.
pub struct GearSource<'a> {
    item: &'a Item,
    id: String,
}

impl<'a> GearSource<'a> {
    pub fn new(item: &'a Item) -> Self {
        let label = if item.name.is_empty() {
            format!("{:?}", item.slot).to_lowercase()
        } else {
            item.name.clone()
        };
        GearSource {
            item,
            id: format!("gear:{label}"),
        }
    }

    pub fn slot(&self) -> EquipmentSlot {
        self.item.slot
    }

    fn is_weapon(&self) -> bool {
        matches!(self.item.slot, EquipmentSlot::MainHand | EquipmentSlot::OffHand)
            && self.item.weapon_class().is_some()
    }

    fn is_armour_piece(&self) -> bool {
        match self.item.slot {
            EquipmentSlot::Helmet
            | EquipmentSlot::BodyArmour
            | EquipmentSlot::Gloves
            | EquipmentSlot::Boots => true,
            EquipmentSlot::OffHand => self.item.weapon_class().is_none(),
            _ => false,
        }
    }

    fn local_defences(&self, local: &[Effect]) -> Vec<Effect> {
        DEFENCE_PROPERTIES
            .iter()
            .filter_map(|(property, stat)| {
                let mut value = StatValue::with_base(self.item.property_number(property).unwrap_or(0.0));
                for effect in local.iter().filter(|e| e.stat() == *stat) {
                    value.apply(effect.kind(), effect.value());
                }
                let total = value.compute();
                (total > 0.0).then(|| Effect::new(*stat, EffectKind::Added, total).with_source(&self.id))
            })
            .collect()
    }
}

/// Modifiers that only affect the weapon carrying them
fn is_weapon_local(effect: &Effect) -> bool {
    if effect.qualifier().is_some() {
        return false;
    }
    match (effect.stat(), effect.kind()) {
        (Stat::Damage(category), EffectKind::Added) => {
            !matches!(category, DamageCategory::All | DamageCategory::Elemental)
        }
        (Stat::Damage(DamageCategory::Physical), EffectKind::Increased) => true,
        (Stat::AttackSpeed, EffectKind::Increased) => true,
        (Stat::CritChance, EffectKind::Added | EffectKind::Increased) => true,
        (Stat::Accuracy, EffectKind::Added) => true,
        _ => false,
    }
}

/// Modifiers that only affect the armour piece carrying them
fn is_defence_local(effect: &Effect) -> bool {
    effect.qualifier().is_none()
        && matches!(effect.stat(), Stat::Armour | Stat::Evasion | Stat::EnergyShield)
        && matches!(effect.kind(), EffectKind::Added | EffectKind::Increased)
}

impl StatSource for GearSource<'_> {
    fn id(&self) -> &str {
        &self.id
    }

    fn effects(&self) -> Vec<Effect> {
        if !self.item.slot.contributes_stats() {
            debug!(slot = ?self.item.slot, item = %self.item.name, "slot does not contribute static stats");
            return Vec::new();
        }

        let parsed = parse_modifiers(self.item.all_mods(), &self.id);
        if self.is_weapon() {
            return parsed
                .effects
                .into_iter()
                .map(|effect| if is_weapon_local(&effect) { effect.localized() } else { effect })
                .collect();
        }

        if self.is_armour_piece() {
            let (local, mut global): (Vec<_>, Vec<_>) =
                parsed.effects.into_iter().partition(is_defence_local);
            global.extend(self.local_defences(&local));
            if let Some(block) = self.item.property_number("Block chance") {
                global.push(Effect::new(Stat::BlockChance, EffectKind::Added, block).with_source(&self.id));
            }
            return global;
        }

        parsed.effects
    }
}
