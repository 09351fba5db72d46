use std::fmt::Display;

use cgmath::{MetricSpace, Vector2};

use crate::archetype::Archetype;

macro_rules! id_type {
    {$name:ident} => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    }
}

id_type!(TankId);
id_type!(GameId);
id_type!(WorldId);
id_type!(PickupId);

/// Integer grid cell containing `pos`.
pub fn cell_of(pos: [f64; 2]) -> [i32; 2] {
    [pos[0].floor() as i32, pos[1].floor() as i32]
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gun {
    /// Ticks until this gun may fire again.
    pub cooldown: u32,
    pub reload_ticks: u32,
}

impl Gun {
    pub fn new(reload_ticks: u32) -> Self {
        Self {
            cooldown: 0,
            reload_ticks,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown == 0
    }
}

/// Read-only view of a tank for one tick. The store holds the authoritative copy.
#[derive(Debug, Clone, PartialEq)]
pub struct TankSnapshot {
    pub id: TankId,
    pub game_id: GameId,
    pub world_id: WorldId,
    /// Short code the targeting primitive resolves back to this tank.
    pub code: String,
    pub pos: [f64; 2],
    pub velocity: [f64; 2],
    pub alliance: u32,
    pub health: i32,
    pub turret_rotation: f64,
    pub turret_target_rotation: f64,
    pub turret_angular_velocity: f64,
    pub target: Option<TankId>,
    pub guns: Vec<Gun>,
    pub message: Option<String>,
    /// `None` for human controlled tanks.
    pub archetype: Option<Archetype>,
}

impl TankSnapshot {
    pub fn is_alive(&self) -> bool {
        0 < self.health
    }

    pub fn cell(&self) -> [i32; 2] {
        cell_of(self.pos)
    }

    /// Coarse tile index used to bound local behaviors.
    pub fn tile(&self, tile_size: i32) -> [i32; 2] {
        let cell = self.cell();
        [cell[0].div_euclid(tile_size), cell[1].div_euclid(tile_size)]
    }

    pub fn distance2(&self, other: &TankSnapshot) -> f64 {
        Vector2::from(self.pos).distance2(Vector2::from(other.pos))
    }

    pub fn distance(&self, other: &TankSnapshot) -> f64 {
        Vector2::from(self.pos).distance(Vector2::from(other.pos))
    }

    pub fn can_fire(&self) -> bool {
        self.guns.iter().any(Gun::is_ready)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupType {
    Health,
    Ammo,
    Speed,
}

impl Display for PickupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Health => "Health",
                Self::Ammo => "Ammo",
                Self::Speed => "Speed",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickupSnapshot {
    pub id: PickupId,
    pub world_id: WorldId,
    pub pos: [f64; 2],
    pub ty: PickupType,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathNode {
    pub pos: [f64; 2],
    /// Fraction of full speed, in [0, 1].
    pub throttle: f64,
    pub reverse: bool,
}

impl PathNode {
    pub fn full_throttle(pos: [f64; 2]) -> Self {
        Self {
            pos,
            throttle: 1.,
            reverse: false,
        }
    }
}

/// Waypoints a tank drives through, in order. An empty path means the same as no path.
#[derive(Debug, Clone, PartialEq)]
pub struct TankPath {
    pub tank_id: TankId,
    pub nodes: Vec<PathNode>,
}

impl TankPath {
    pub fn new(tank_id: TankId, nodes: Vec<PathNode>) -> Self {
        Self { tank_id, nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Whether a tank is idle, treating a missing and a zero-length path alike.
pub fn is_idle(path: Option<&TankPath>) -> bool {
    path.map_or(true, TankPath::is_empty)
}

/// Boolean grid of cells a tank may occupy, indexed `y * width + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct TraversibilityMap {
    pub world_id: WorldId,
    pub width: usize,
    pub height: usize,
    pub board: Vec<bool>,
}

impl TraversibilityMap {
    pub fn new(world_id: WorldId, width: usize, height: usize, board: Vec<bool>) -> Self {
        assert_eq!(board.len(), width * height, "board size mismatch");
        Self {
            world_id,
            width,
            height,
            board,
        }
    }

    pub fn filled(world_id: WorldId, width: usize, height: usize, passable: bool) -> Self {
        Self::new(world_id, width, height, vec![passable; width * height])
    }

    pub fn contains(&self, cell: [i32; 2]) -> bool {
        0 <= cell[0]
            && (cell[0] as usize) < self.width
            && 0 <= cell[1]
            && (cell[1] as usize) < self.height
    }

    /// Out of bounds cells are never passable.
    pub fn is_passable(&self, cell: [i32; 2]) -> bool {
        self.contains(cell) && self.board[cell[0] as usize + cell[1] as usize * self.width]
    }

    pub fn set_passable(&mut self, cell: [i32; 2], passable: bool) {
        if self.contains(cell) {
            self.board[cell[0] as usize + cell[1] as usize * self.width] = passable;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_tile_of_negative_cells() {
        let mut tank = crate::testing::tank(1, [-0.5, 13.9], 0);
        assert_eq!(tank.tile(6), [-1, 2]);
        tank.pos = [5.99, 6.];
        assert_eq!(tank.tile(6), [0, 1]);
    }

    #[test]
    fn test_map_indexing() {
        let mut map = TraversibilityMap::filled(WorldId(0), 4, 3, false);
        map.set_passable([3, 1], true);
        assert_eq!(map.board[1 * 4 + 3], true);
        assert!(map.is_passable([3, 1]));
        assert!(!map.is_passable([4, 1]));
        assert!(!map.is_passable([-1, 0]));
    }

    #[test]
    fn test_idle_path() {
        assert!(is_idle(None));
        let path = TankPath::new(TankId(1), vec![]);
        assert!(is_idle(Some(&path)));
        let path = TankPath::new(TankId(1), vec![PathNode::full_throttle([1., 1.])]);
        assert!(!is_idle(Some(&path)));
    }
}
