//! Read-only views of the world for the render and debug side
//!
//! Nothing here hands out mutable access; renderers copy what they need.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{EntityKind, World};

/// Per-entity instance record, laid out for a GPU instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    pub position: Vec2,
    pub angle: f32,
    /// 0 = ship, 1 = bullet, 2 = asteroid
    pub kind: u32,
    /// Asteroid tier, 0 for other kinds
    pub tier: u32,
    pub geometry: u32,
}

impl RenderInstance {
    pub const fn kind_code(kind: EntityKind) -> u32 {
        match kind {
            EntityKind::Ship => 0,
            EntityKind::Bullet => 1,
            EntityKind::Asteroid => 2,
        }
    }
}

/// Instances for every entity that has geometry, in world order.
///
/// Entities whose geometry failed to load are skipped: they keep simulating
/// but draw nothing.
pub fn instances(world: &World) -> Vec<RenderInstance> {
    world
        .entities()
        .filter_map(|(_, e)| {
            let geometry = e.geometry?;
            Some(RenderInstance {
                position: e.pos,
                angle: e.angle,
                kind: RenderInstance::kind_code(e.kind),
                tier: u32::from(e.tier().unwrap_or(0)),
                geometry: geometry.0,
            })
        })
        .collect()
}

/// Raw bytes of the instance list, ready for a buffer upload
pub fn instance_bytes(instances: &[RenderInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

/// One entity in a [`WorldSnapshot`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub kind: EntityKind,
    pub pos: [f32; 2],
    pub vel: [f32; 2],
    pub angle: f32,
    pub health: u8,
}

/// Serializable summary of the world (debug dumps, replay comparison)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub score: u32,
    pub lives: u8,
    pub entity_weight: i32,
    pub entities: Vec<EntitySnapshot>,
}

pub fn snapshot(world: &World) -> WorldSnapshot {
    WorldSnapshot {
        tick: world.time_ticks(),
        score: world.score(),
        lives: world.ship().map(|s| s.health).unwrap_or(0),
        entity_weight: world.entity_weight(),
        entities: world
            .entities()
            .map(|(_, e)| EntitySnapshot {
                kind: e.kind,
                pos: e.pos.to_array(),
                vel: e.vel.to_array(),
                angle: e.angle,
                health: e.health,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GeometryHandle, GeometrySource, StaticGeometry};
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), 24);
    }

    #[test]
    fn test_instances_follow_world() {
        let mut world = World::new(3, 0).unwrap();
        world.spawn_asteroid(0).unwrap();

        let list = instances(&world);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].kind, 0);
        assert_eq!(list[1].kind, 2);
        assert_eq!(list[1].tier, 3);
        assert_eq!(
            list[1].geometry,
            StaticGeometry::handle_for(EntityKind::Asteroid, Some(3)).0
        );
        assert_eq!(instance_bytes(&list).len(), 48);
    }

    #[test]
    fn test_position_leads_the_record() {
        let mut world = World::new(4, 0).unwrap();
        world.ship_mut().unwrap().pos = Vec2::new(12.5, -40.0);

        let list = instances(&world);
        assert_eq!(list[0].position, Vec2::new(12.5, -40.0));
        let floats: &[f32] = bytemuck::cast_slice(&list);
        assert_eq!(&floats[..2], &[12.5, -40.0]);
    }

    #[test]
    fn test_entities_without_geometry_are_not_drawn() {
        #[derive(Debug)]
        struct ShipOnly;
        impl GeometrySource for ShipOnly {
            fn acquire(&mut self, kind: EntityKind, _: Option<u8>) -> Option<GeometryHandle> {
                (kind == EntityKind::Ship).then_some(GeometryHandle(7))
            }
            fn release(&mut self, _: GeometryHandle) {}
        }

        let mut world = World::with_parts(
            Tuning::default(),
            Pcg32::seed_from_u64(0),
            Box::new(ShipOnly),
            0,
        )
        .unwrap();
        world.spawn_asteroid(0).unwrap();

        assert_eq!(world.len(), 2);
        let list = instances(&world);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].geometry, 7);
    }

    #[test]
    fn test_snapshot_serializes() {
        let world = World::new(1, 0).unwrap();
        let snap = snapshot(&world);
        assert_eq!(snap.lives, 3);
        assert_eq!(snap.entities.len(), 1);

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"Ship\""));
        let back: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.score, 0);
    }
}
