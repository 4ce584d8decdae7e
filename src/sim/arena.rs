//! Slot storage for entities
//!
//! Dense `Vec` of slots with a free list. Removing an entity vacates its slot
//! and bumps the slot generation, so stale ids never alias a newer entity.
//! Iteration follows slot order, which is deterministic for a given history.

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use crate::error::SimError;

/// Stable handle to an entity in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Occupied { generation: u32, entity: Entity },
    Vacant { generation: u32, next_free: Option<u32> },
}

/// Entity storage with stable ids and slot reuse
#[derive(Debug, Clone, Default)]
pub struct EntityArena {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    len: usize,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entity, reusing the most recently vacated slot if any
    pub fn insert(&mut self, entity: Entity) -> Result<EntityId, SimError> {
        if let Some(index) = self.free_head {
            let slot = self
                .slots
                .get_mut(index as usize)
                .ok_or(SimError::CorruptArena(index))?;
            let Slot::Vacant {
                generation,
                next_free,
            } = *slot
            else {
                return Err(SimError::CorruptArena(index));
            };
            self.free_head = next_free;
            *slot = Slot::Occupied { generation, entity };
            self.len += 1;
            return Ok(EntityId { index, generation });
        }

        let index =
            u32::try_from(self.slots.len()).map_err(|_| SimError::ArenaFull(self.slots.len()))?;
        self.slots.push(Slot::Occupied {
            generation: 0,
            entity,
        });
        self.len += 1;
        Ok(EntityId {
            index,
            generation: 0,
        })
    }

    /// Take an entity out; `None` if the id is stale
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index())?;
        match slot {
            Slot::Occupied { generation, .. } if *generation == id.generation => {}
            _ => return None,
        }
        let vacant = Slot::Vacant {
            generation: id.generation.wrapping_add(1),
            next_free: self.free_head,
        };
        let Slot::Occupied { entity, .. } = std::mem::replace(slot, vacant) else {
            return None;
        };
        self.free_head = Some(id.index);
        self.len -= 1;
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        match self.slots.get(id.index())? {
            Slot::Occupied { generation, entity } if *generation == id.generation => Some(entity),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match self.slots.get_mut(id.index())? {
            Slot::Occupied { generation, entity } if *generation == id.generation => Some(entity),
            _ => None,
        }
    }

    /// Mutable access to two distinct entities at once
    pub fn pair_mut(&mut self, a: EntityId, b: EntityId) -> Option<(&mut Entity, &mut Entity)> {
        if a.index == b.index {
            return None;
        }
        let (lo, hi, swapped) = if a.index < b.index {
            (a, b, false)
        } else {
            (b, a, true)
        };
        let (head, tail) = self.slots.split_at_mut(hi.index());
        let first = match &mut head[lo.index()] {
            Slot::Occupied { generation, entity } if *generation == lo.generation => entity,
            _ => return None,
        };
        let second = match &mut tail[0] {
            Slot::Occupied { generation, entity } if *generation == hi.generation => entity,
            _ => return None,
        };
        Some(if swapped {
            (second, first)
        } else {
            (first, second)
        })
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Live entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied { generation, entity } => Some((
                    EntityId {
                        index: index as u32,
                        generation: *generation,
                    },
                    entity,
                )),
                Slot::Vacant { .. } => None,
            })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Occupied { generation, entity } => Some((
                    EntityId {
                        index: index as u32,
                        generation: *generation,
                    },
                    entity,
                )),
                Slot::Vacant { .. } => None,
            })
    }

    /// Snapshot of live ids, for passes that insert or remove while walking
    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn rock(x: f32) -> Entity {
        Entity::asteroid(3, Vec2::new(x, 0.0), 0.0, 2.0, 0)
    }

    #[test]
    fn test_insert_get_remove() {
        let mut arena = EntityArena::new();
        let a = arena.insert(rock(1.0)).unwrap();
        let b = arena.insert(rock(2.0)).unwrap();
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a).unwrap().pos.x, 1.0);

        let removed = arena.remove(a).unwrap();
        assert_eq!(removed.pos.x, 1.0);
        assert!(arena.get(a).is_none());
        assert!(arena.remove(a).is_none());
        assert_eq!(arena.len(), 1);
        assert!(arena.contains(b));
    }

    #[test]
    fn test_reused_slot_gets_new_generation() {
        let mut arena = EntityArena::new();
        let a = arena.insert(rock(1.0)).unwrap();
        arena.remove(a);
        let b = arena.insert(rock(2.0)).unwrap();

        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(arena.get(a).is_none());
        assert_eq!(arena.get(b).unwrap().pos.x, 2.0);
    }

    #[test]
    fn test_iteration_follows_slot_order() {
        let mut arena = EntityArena::new();
        let ids: Vec<_> = (0..4).map(|i| arena.insert(rock(i as f32)).unwrap()).collect();
        arena.remove(ids[1]);

        let xs: Vec<f32> = arena.iter().map(|(_, e)| e.pos.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 3.0]);

        // The vacated slot is filled first
        arena.insert(rock(9.0)).unwrap();
        let xs: Vec<f32> = arena.iter().map(|(_, e)| e.pos.x).collect();
        assert_eq!(xs, vec![0.0, 9.0, 2.0, 3.0]);
    }

    #[test]
    fn test_broken_free_list_is_an_error() {
        let mut arena = EntityArena::new();
        arena.insert(rock(1.0)).unwrap();
        arena.free_head = Some(0);
        assert!(matches!(
            arena.insert(rock(2.0)),
            Err(SimError::CorruptArena(0))
        ));

        arena.free_head = Some(5);
        assert!(matches!(
            arena.insert(rock(3.0)),
            Err(SimError::CorruptArena(5))
        ));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut arena = EntityArena::new();
        let ship = arena.insert(Entity::ship(&Tuning::default(), 0)).unwrap();
        let asteroid = arena.insert(rock(5.0)).unwrap();

        let (a, b) = arena.pair_mut(asteroid, ship).unwrap();
        assert_eq!(a.kind, EntityKind::Asteroid);
        assert_eq!(b.kind, EntityKind::Ship);
        b.lose_life();

        assert_eq!(arena.get(ship).unwrap().health, 2);
        assert!(arena.pair_mut(ship, ship).is_none());
    }
}
