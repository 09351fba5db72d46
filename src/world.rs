//! Seams to the entity store that owns tanks, pickups, maps and paths.
//!
//! The AI layer only reads through [`WorldReader`] and only writes through [`Actuator`].
//! [`MemoryWorld`] implements both on plain collections, which is enough to run headless
//! matches and to test the archetypes end to end.

use std::{cell::Cell, collections::HashMap};

use cgmath::{InnerSpace, MetricSpace, Vector2};

use crate::{
    kinematics::{angle_difference, heading_to, normalize_angle_to_target},
    tank::{
        GameId, PickupSnapshot, TankId, TankPath, TankSnapshot, TraversibilityMap, WorldId,
    },
};

pub trait WorldReader {
    fn world_of_game(&self, game: GameId) -> Option<WorldId>;
    fn tanks_by_game(&self, game: GameId) -> Vec<TankSnapshot>;
    fn pickups_by_world(&self, world: WorldId) -> Vec<PickupSnapshot>;
    fn traversibility_map(&self, world: WorldId) -> Option<TraversibilityMap>;
    fn tank_path(&self, tank: TankId) -> Option<TankPath>;
}

/// Write and actuation primitives. Every write is an upsert keyed by a stable id, so
/// callers never need to know whether a row existed before.
pub trait Actuator {
    fn fire_weapon(&mut self, tank: TankId);
    /// Lock onto whichever living tank of the same game answers to `code`.
    fn target_by_code(&mut self, tank: TankId, code: &str);
    fn set_target(&mut self, tank: TankId, target: Option<TankId>);
    fn set_turret_target_rotation(&mut self, tank: TankId, rotation: f64);
    fn upsert_path(&mut self, path: TankPath);
    fn delete_path(&mut self, tank: TankId);
    fn zero_velocity(&mut self, tank: TankId);
    fn set_message(&mut self, tank: TankId, message: &str);
}

pub(crate) const BULLET_SPEED: f64 = 2.;
pub(crate) const BULLET_RANGE: f64 = 30.;
pub(crate) const BULLET_DAMAGE: i32 = 1;
pub(crate) const TANK_RADIUS: f64 = 0.6;
pub(crate) const TURRET_SPEED: f64 = std::f64::consts::PI / 50.;

#[derive(Clone, Debug)]
pub struct Bullet {
    pub pos: [f64; 2],
    pub velo: [f64; 2],
    pub alliance: u32,
    pub source: TankId,
    /// Distance traveled, bullets expire after [`BULLET_RANGE`]
    pub traveled: f64,
}

#[derive(Debug, Default)]
pub struct MemoryWorld {
    pub games: HashMap<GameId, WorldId>,
    pub maps: HashMap<WorldId, TraversibilityMap>,
    pub tanks: Vec<TankSnapshot>,
    pub pickups: Vec<PickupSnapshot>,
    pub paths: HashMap<TankId, TankPath>,
    pub bullets: Vec<Bullet>,
    query_calls: Cell<usize>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_game(&mut self, game: GameId, map: TraversibilityMap) {
        self.games.insert(game, map.world_id);
        self.maps.insert(map.world_id, map);
    }

    pub fn add_tank(&mut self, tank: TankSnapshot) {
        self.tanks.push(tank);
    }

    /// Removing a tank also drops its path row.
    pub fn remove_tank(&mut self, id: TankId) -> Option<TankSnapshot> {
        self.paths.remove(&id);
        let idx = self.tanks.iter().position(|tank| tank.id == id)?;
        Some(self.tanks.remove(idx))
    }

    pub fn tank(&self, id: TankId) -> Option<&TankSnapshot> {
        self.tanks.iter().find(|tank| tank.id == id)
    }

    fn tank_mut(&mut self, id: TankId) -> Option<&mut TankSnapshot> {
        self.tanks.iter_mut().find(|tank| tank.id == id)
    }

    /// Number of store reads served so far.
    pub fn query_calls(&self) -> usize {
        self.query_calls.get()
    }

    fn count_query(&self) {
        self.query_calls.set(self.query_calls.get() + 1);
    }

    /// Advance everything the AI layer does not own by one tick: gun cooldowns, turret
    /// slewing, waypoint arrival and bullets.
    pub fn step(&mut self) {
        let positions: HashMap<TankId, [f64; 2]> = self
            .tanks
            .iter()
            .filter(|tank| tank.is_alive())
            .map(|tank| (tank.id, tank.pos))
            .collect();

        for tank in self.tanks.iter_mut().filter(|tank| tank.is_alive()) {
            for gun in &mut tank.guns {
                gun.cooldown = gun.cooldown.saturating_sub(1);
            }

            if let Some(target_pos) = tank.target.and_then(|target| positions.get(&target)) {
                tank.turret_target_rotation = normalize_angle_to_target(
                    heading_to(tank.pos, *target_pos),
                    tank.turret_rotation,
                );
            }
            let delta = angle_difference(tank.turret_target_rotation, tank.turret_rotation);
            if delta.abs() < TURRET_SPEED {
                tank.turret_rotation = tank.turret_target_rotation;
                tank.turret_angular_velocity = 0.;
            } else {
                tank.turret_angular_velocity = TURRET_SPEED.copysign(delta);
                tank.turret_rotation += tank.turret_angular_velocity;
            }

            // Arrival is immediate; how a tank drives there is the movement system's business.
            if let Some(path) = self.paths.get_mut(&tank.id) {
                if !path.nodes.is_empty() {
                    let node = path.nodes.remove(0);
                    tank.velocity = (Vector2::from(node.pos) - Vector2::from(tank.pos)).into();
                    tank.pos = node.pos;
                }
            }
        }

        let maps = &self.maps;
        let tanks = &mut self.tanks;
        self.bullets = std::mem::take(&mut self.bullets)
            .into_iter()
            .filter_map(|bullet| {
                let newpos: [f64; 2] =
                    (Vector2::from(bullet.pos) + Vector2::from(bullet.velo)).into();
                for tank in tanks.iter_mut() {
                    if !tank.is_alive() || tank.alliance == bullet.alliance {
                        continue;
                    }
                    if Vector2::from(tank.pos).distance(Vector2::from(newpos)) < TANK_RADIUS {
                        tank.health -= BULLET_DAMAGE;
                        if !tank.is_alive() {
                            log::debug!("{} destroyed by {}", tank.id, bullet.source);
                        }
                        return None;
                    }
                }
                let passable = maps
                    .values()
                    .any(|map| map.is_passable(crate::tank::cell_of(newpos)));
                let traveled = bullet.traveled + Vector2::from(bullet.velo).magnitude();
                if !passable || BULLET_RANGE < traveled {
                    return None;
                }
                Some(Bullet {
                    pos: newpos,
                    traveled,
                    ..bullet
                })
            })
            .collect();
    }
}

impl WorldReader for MemoryWorld {
    fn world_of_game(&self, game: GameId) -> Option<WorldId> {
        self.games.get(&game).copied()
    }

    fn tanks_by_game(&self, game: GameId) -> Vec<TankSnapshot> {
        self.count_query();
        self.tanks
            .iter()
            .filter(|tank| tank.game_id == game)
            .cloned()
            .collect()
    }

    fn pickups_by_world(&self, world: WorldId) -> Vec<PickupSnapshot> {
        self.count_query();
        self.pickups
            .iter()
            .filter(|pickup| pickup.world_id == world)
            .cloned()
            .collect()
    }

    fn traversibility_map(&self, world: WorldId) -> Option<TraversibilityMap> {
        self.count_query();
        self.maps.get(&world).cloned()
    }

    fn tank_path(&self, tank: TankId) -> Option<TankPath> {
        self.count_query();
        self.paths.get(&tank).cloned()
    }
}

impl Actuator for MemoryWorld {
    fn fire_weapon(&mut self, id: TankId) {
        let Some(tank) = self.tank_mut(id) else {
            return;
        };
        let Some(gun) = tank.guns.iter_mut().find(|gun| gun.is_ready()) else {
            return;
        };
        gun.cooldown = gun.reload_ticks;
        let dir = Vector2::new(tank.turret_rotation.cos(), tank.turret_rotation.sin());
        let bullet = Bullet {
            pos: tank.pos,
            velo: (dir * BULLET_SPEED).into(),
            alliance: tank.alliance,
            source: tank.id,
            traveled: 0.,
        };
        self.bullets.push(bullet);
    }

    fn target_by_code(&mut self, id: TankId, code: &str) {
        let Some(game) = self.tank(id).map(|tank| tank.game_id) else {
            return;
        };
        let found = self
            .tanks
            .iter()
            .find(|tank| tank.game_id == game && tank.is_alive() && tank.code == code)
            .map(|tank| tank.id);
        if let Some(tank) = self.tank_mut(id) {
            tank.target = found;
        }
    }

    fn set_target(&mut self, id: TankId, target: Option<TankId>) {
        if let Some(tank) = self.tank_mut(id) {
            tank.target = target;
        }
    }

    fn set_turret_target_rotation(&mut self, id: TankId, rotation: f64) {
        if let Some(tank) = self.tank_mut(id) {
            tank.turret_target_rotation = rotation;
        }
    }

    fn upsert_path(&mut self, path: TankPath) {
        self.paths.insert(path.tank_id, path);
    }

    fn delete_path(&mut self, id: TankId) {
        self.paths.remove(&id);
    }

    fn zero_velocity(&mut self, id: TankId) {
        if let Some(tank) = self.tank_mut(id) {
            tank.velocity = [0., 0.];
        }
    }

    fn set_message(&mut self, id: TankId, message: &str) {
        if let Some(tank) = self.tank_mut(id) {
            tank.message = Some(message.to_string());
        }
    }
}
