//! Bots that alternate between acquiring the nearest enemy on even ticks and firing on odd
//! ticks.

use crate::{
    cache::EntityQueryCache,
    command::{Commands, TankCommand},
    kinematics::{heading_to, normalize_angle_to_target},
    tank::TankSnapshot,
    world::WorldReader,
};

pub const FIRE_MESSAGE: &str = "fire";

/// Steers the turret at the nearest enemy, without locking it as a target.
pub fn evaluate_aim_bot<R: WorldReader + ?Sized>(
    tank: &TankSnapshot,
    cache: &mut EntityQueryCache<R>,
) -> Commands {
    if cache.tick_context().is_even() {
        let Some(enemy) = cache.get_closest_enemy_tank(tank) else {
            return vec![];
        };
        let rotation =
            normalize_angle_to_target(heading_to(tank.pos, enemy.pos), tank.turret_rotation);
        vec![TankCommand::SetRotationTarget(rotation)]
    } else {
        vec![
            TankCommand::Fire,
            TankCommand::SetMessage(FIRE_MESSAGE.to_string()),
        ]
    }
}

/// Locks the nearest enemy as the target and leaves aiming to the targeting system.
pub fn evaluate_target_bot<R: WorldReader + ?Sized>(
    tank: &TankSnapshot,
    cache: &mut EntityQueryCache<R>,
) -> Commands {
    if cache.tick_context().is_even() {
        cache
            .get_closest_enemy_tank(tank)
            .map(|enemy| vec![TankCommand::SetTarget(Some(enemy.id))])
            .unwrap_or_default()
    } else {
        vec![TankCommand::Fire]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        cache::TickContext,
        tank::TankId,
        testing::{tank, world_with, GAME},
    };

    #[test]
    fn test_aim_bot_cadence() {
        let mut shooter = tank(1, [10., 10.], 0);
        shooter.turret_rotation = 4. * std::f64::consts::PI;
        let mut dead = tank(3, [11., 10.], 1);
        dead.health = 0;
        let world = world_with(vec![shooter.clone(), tank(2, [10., 13.], 1), dead]);

        let mut cache = EntityQueryCache::new(&world, TickContext::new(4, 0, 0), GAME);
        let commands = evaluate_aim_bot(&shooter, &mut cache);
        let expected = 4. * std::f64::consts::PI + 3f64.atan2(0.);
        match commands.as_slice() {
            [TankCommand::SetRotationTarget(rotation)] => {
                assert!((rotation - expected).abs() < 1e-9)
            }
            other => panic!("unexpected commands {other:?}"),
        }

        cache.reset(TickContext::new(5, 0, 0), GAME);
        assert_eq!(
            evaluate_aim_bot(&shooter, &mut cache),
            vec![
                TankCommand::Fire,
                TankCommand::SetMessage("fire".to_string())
            ]
        );
    }

    #[test]
    fn test_aim_bot_without_enemy_idles() {
        let shooter = tank(1, [10., 10.], 0);
        let world = world_with(vec![shooter.clone(), tank(2, [10., 13.], 0)]);
        let mut cache = EntityQueryCache::new(&world, TickContext::new(2, 0, 0), GAME);
        assert!(evaluate_aim_bot(&shooter, &mut cache).is_empty());
    }

    #[test]
    fn test_target_bot_cadence() {
        let shooter = tank(1, [10., 10.], 0);
        let world = world_with(vec![
            shooter.clone(),
            tank(2, [20., 10.], 1),
            tank(3, [12., 12.], 2),
        ]);
        let mut cache = EntityQueryCache::new(&world, TickContext::new(0, 0, 0), GAME);
        assert_eq!(
            evaluate_target_bot(&shooter, &mut cache),
            vec![TankCommand::SetTarget(Some(TankId(3)))]
        );
        cache.reset(TickContext::new(1, 0, 0), GAME);
        assert_eq!(
            evaluate_target_bot(&shooter, &mut cache),
            vec![TankCommand::Fire]
        );
    }
}
