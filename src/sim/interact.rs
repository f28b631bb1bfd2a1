//! Player vs collectible overlap
//!
//! Every tick the player hitbox is tested against each collectible still in
//! play. Touching a pickup takes it, touching a chest opens it and touching
//! an NPC starts a conversation. Every outcome is idempotent: a collected
//! item stays collected and is never counted twice.

use super::collision::Rect;
use super::state::{Collectible, CollectibleKind, Inventory};

/// Something that changed when the player touched a collectible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Collected(CollectibleKind),
    ChestOpened,
    NpcTalking,
}

/// Mark one collectible as taken/used and update the inventory
fn apply(item: &mut Collectible, inventory: &mut Inventory) -> Interaction {
    item.collected = true;
    match item.kind {
        CollectibleKind::Key => {
            inventory.keys += 1;
            Interaction::Collected(item.kind)
        }
        CollectibleKind::BloodShard { value } => {
            inventory.blood_shards += value;
            Interaction::Collected(item.kind)
        }
        CollectibleKind::Chest => Interaction::ChestOpened,
        CollectibleKind::Npc { .. } => {
            item.kind = CollectibleKind::Npc { talking: true };
            Interaction::NpcTalking
        }
    }
}

/// Resolve every not-yet-collected collectible the player hitbox overlaps
pub fn collect_overlapping(
    player: Rect,
    items: &mut [Collectible],
    inventory: &mut Inventory,
) -> Vec<Interaction> {
    items
        .iter_mut()
        .filter(|c| !c.collected && c.has_collision && player.intersects(&c.bounds()))
        .map(|c| {
            let interaction = apply(c, inventory);
            log::info!("Collected {:?} at {}", c.kind.tag(), c.pos);
            interaction
        })
        .collect()
}
