use std::collections::HashMap;

use crate::tank::{TankId, WorldId};

/// Where a [`RandomAim`](crate::archetype::random_aim) bot is currently sweeping its turret.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomAimState {
    pub world_id: WorldId,
    pub target_angle: f64,
}

/// Hysteresis timing for [`Turret`](crate::archetype::turret) bots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurretAiState {
    pub world_id: WorldId,
    pub last_switch_micros: u64,
}

/// Rows of archetype memory, one per tank, that survive between ticks.
///
/// Rows are created lazily the first time a tank is evaluated and updated in place
/// afterwards. Each row is owned by exactly one tank id, so two archetypes never alias
/// the same mutable state.
#[derive(Debug)]
pub struct AiStateTable<S> {
    rows: HashMap<TankId, S>,
}

impl<S> Default for AiStateTable<S> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }
}

impl<S> AiStateTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tank: TankId) -> Option<&S> {
        self.rows.get(&tank)
    }

    pub fn get_or_insert_with(&mut self, tank: TankId, init: impl FnOnce() -> S) -> &mut S {
        self.rows.entry(tank).or_insert_with(init)
    }

    pub fn upsert(&mut self, tank: TankId, row: S) {
        self.rows.insert(tank, row);
    }

    pub fn remove(&mut self, tank: TankId) -> Option<S> {
        self.rows.remove(&tank)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Every kind of archetype memory the controller keeps.
#[derive(Debug, Default)]
pub struct ArchetypeStates {
    pub random_aim: AiStateTable<RandomAimState>,
    pub turret: AiStateTable<TurretAiState>,
}

impl ArchetypeStates {
    pub fn remove_tank(&mut self, tank: TankId) {
        self.random_aim.remove(tank);
        self.turret.remove(tank);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get_or_insert_then_mutate() {
        let mut table = AiStateTable::new();
        let row = table.get_or_insert_with(TankId(3), || TurretAiState {
            world_id: WorldId(0),
            last_switch_micros: 10,
        });
        row.last_switch_micros = 20;
        let row = table.get_or_insert_with(TankId(3), || unreachable!());
        assert_eq!(row.last_switch_micros, 20);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_tank_drops_all_rows() {
        let mut states = ArchetypeStates::default();
        states.turret.upsert(
            TankId(1),
            TurretAiState {
                world_id: WorldId(0),
                last_switch_micros: 0,
            },
        );
        states.random_aim.upsert(
            TankId(1),
            RandomAimState {
                world_id: WorldId(0),
                target_angle: 1.,
            },
        );
        states.remove_tank(TankId(1));
        assert!(states.turret.is_empty());
        assert!(states.random_aim.is_empty());
    }
}
