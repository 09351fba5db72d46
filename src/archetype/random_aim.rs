//! Sweeps the turret towards random headings and fires whenever it gets there.

use std::f64::consts::TAU;

use rand::Rng;

use crate::{
    cache::EntityQueryCache,
    command::{Commands, TankCommand},
    kinematics::{angle_difference, normalize_angle_to_target, Compass},
    params::AiParams,
    state::{AiStateTable, RandomAimState},
    tank::TankSnapshot,
    world::WorldReader,
};

/// Half of the draws snap to a compass heading, the rest are uniform in [0, 2pi).
pub fn draw_target_angle(rng: &mut impl Rng) -> f64 {
    if rng.gen_bool(0.5) {
        Compass::ALL[rng.gen_range(0..Compass::ALL.len())].angle()
    } else {
        rng.gen_range(0.0..TAU)
    }
}

pub fn evaluate<R: WorldReader + ?Sized>(
    tank: &TankSnapshot,
    cache: &mut EntityQueryCache<R>,
    params: &AiParams,
    table: &mut AiStateTable<RandomAimState>,
) -> Commands {
    let state = *table.get_or_insert_with(tank.id, || RandomAimState {
        world_id: tank.world_id,
        target_angle: draw_target_angle(cache.get_random()),
    });

    if angle_difference(state.target_angle, tank.turret_rotation).abs() < params.aim_tolerance {
        let target_angle = draw_target_angle(cache.get_random());
        log::debug!(
            "{}: random aim reached {:.3}, next {:.3}",
            tank.id,
            state.target_angle,
            target_angle
        );
        table.upsert(
            tank.id,
            RandomAimState {
                target_angle,
                ..state
            },
        );
        vec![TankCommand::Fire]
    } else {
        vec![
            TankCommand::SetRotationTarget(normalize_angle_to_target(
                state.target_angle,
                tank.turret_rotation,
            )),
            TankCommand::SetTarget(None),
        ]
    }
}
