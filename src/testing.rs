//! Fixtures for unit tests.

use crate::{
    tank::{GameId, Gun, TankId, TankSnapshot, TraversibilityMap, WorldId},
    world::MemoryWorld,
};

pub(crate) const GAME: GameId = GameId(1);
pub(crate) const WORLD: WorldId = WorldId(7);

pub(crate) fn tank(id: u64, pos: [f64; 2], alliance: u32) -> TankSnapshot {
    TankSnapshot {
        id: TankId(id),
        game_id: GAME,
        world_id: WORLD,
        code: format!("T{id}"),
        pos,
        velocity: [0., 0.],
        alliance,
        health: 3,
        turret_rotation: 0.,
        turret_target_rotation: 0.,
        turret_angular_velocity: 0.,
        target: None,
        guns: vec![Gun::new(5)],
        message: None,
        archetype: None,
    }
}

pub(crate) fn open_map(width: usize, height: usize) -> TraversibilityMap {
    TraversibilityMap::filled(WORLD, width, height, true)
}

pub(crate) fn world_with(tanks: Vec<TankSnapshot>) -> MemoryWorld {
    let mut world = MemoryWorld::new();
    world.add_game(GAME, open_map(50, 50));
    for tank in tanks {
        world.add_tank(tank);
    }
    world
}
