//! Stationary defender that picks a target among the enemies on its own tile.
//!
//! A target is kept for at least `target_switch_interval_micros` so that two equally
//! close enemies do not make the turret flicker between them. The window is ignored when
//! the current target dies or leaves the tile.

use rand::seq::SliceRandom;

use crate::{
    cache::EntityQueryCache,
    command::{Commands, TankCommand},
    kinematics::angle_difference,
    params::AiParams,
    state::{AiStateTable, TurretAiState},
    tank::TankSnapshot,
    world::WorldReader,
};

pub fn evaluate<R: WorldReader + ?Sized>(
    tank: &TankSnapshot,
    cache: &mut EntityQueryCache<R>,
    params: &AiParams,
    table: &mut AiStateTable<TurretAiState>,
) -> Commands {
    let now = cache.tick_context().now_micros;
    let tile = tank.tile(params.tile_size);

    let expired = table.get(tank.id).map_or(true, |state| {
        params.target_switch_interval_micros <= now.saturating_sub(state.last_switch_micros)
    });
    let lost = tank.target.is_some_and(|target| {
        !cache
            .get_tank(target)
            .is_some_and(|target| target.is_alive() && target.tile(params.tile_size) == tile)
    });

    let mut commands = vec![];
    let target = if expired || lost {
        let selected = select_new_target(tank, cache, params);
        log::debug!(
            "{}: turret target {:?} -> {:?}",
            tank.id,
            tank.target,
            selected
        );
        table.upsert(
            tank.id,
            TurretAiState {
                world_id: tank.world_id,
                last_switch_micros: now,
            },
        );
        commands.push(TankCommand::SetTarget(selected));
        selected
    } else {
        tank.target
    };

    if target.is_some()
        && angle_difference(tank.turret_target_rotation, tank.turret_rotation).abs()
            < params.aim_tolerance
    {
        commands.push(TankCommand::Fire);
    }
    commands
}

/// Uniformly random living enemy on the shooter's tile.
pub fn select_new_target<R: WorldReader + ?Sized>(
    tank: &TankSnapshot,
    cache: &mut EntityQueryCache<R>,
    params: &AiParams,
) -> Option<crate::tank::TankId> {
    let tile = tank.tile(params.tile_size);
    let tanks = cache.get_all_tanks();
    let candidates: Vec<_> = tanks
        .iter()
        .filter(|other| {
            other.id != tank.id
                && other.alliance != tank.alliance
                && other.is_alive()
                && other.tile(params.tile_size) == tile
        })
        .map(|other| other.id)
        .collect();
    candidates.choose(cache.get_random()).copied()
}
