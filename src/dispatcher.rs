//! Turns the decision of an external behavior tree into commands for one tank.

use std::rc::Rc;

use crate::{
    archetype::driving::drive_towards,
    cache::{EntityQueryCache, TickContext},
    command::{Commands, TankCommand},
    params::AiParams,
    tank::{cell_of, PathNode, PickupSnapshot, TankPath, TankSnapshot, TraversibilityMap},
    world::WorldReader,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    MoveTowardsPickup,
    AimAndFire,
    StopMoving,
    MoveTowardsEnemy,
    Escape,
    #[default]
    None,
}

/// What the behavior tree wants a tank to do this tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub target_tank: Option<TankSnapshot>,
    pub target_pickup: Option<PickupSnapshot>,
    /// Waypoints in world coordinates, nearest first.
    pub path: Vec<[f64; 2]>,
    pub target_point: Option<[f64; 2]>,
    pub should_fire: bool,
}

impl Decision {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            ..Self::default()
        }
    }
}

/// The world as the behavior tree gets to see it, shared with the archetypes through the
/// tick's cache.
#[derive(Debug, Clone)]
pub struct DecisionContext {
    pub tick: TickContext,
    pub tanks: Rc<Vec<TankSnapshot>>,
    pub pickups: Rc<Vec<PickupSnapshot>>,
    pub map: Option<Rc<TraversibilityMap>>,
}

impl DecisionContext {
    pub fn from_cache<R: WorldReader + ?Sized>(cache: &mut EntityQueryCache<R>) -> Self {
        Self {
            tick: cache.tick_context(),
            tanks: cache.get_all_tanks(),
            pickups: cache.get_all_pickups(),
            map: cache.get_traversibility_map(),
        }
    }
}

/// The behavior tree evaluator. How it reaches its decision is up to the implementor.
pub trait DecisionSource {
    fn evaluate_behavior_tree(
        &mut self,
        tank: &TankSnapshot,
        context: &DecisionContext,
        can_fire_this_tick: bool,
    ) -> Decision;
}

impl<F> DecisionSource for F
where
    F: FnMut(&TankSnapshot, &DecisionContext, bool) -> Decision,
{
    fn evaluate_behavior_tree(
        &mut self,
        tank: &TankSnapshot,
        context: &DecisionContext,
        can_fire_this_tick: bool,
    ) -> Decision {
        self(tank, context, can_fire_this_tick)
    }
}

fn full_throttle_path(tank: &TankSnapshot, waypoints: &[[f64; 2]]) -> TankPath {
    TankPath::new(
        tank.id,
        waypoints
            .iter()
            .copied()
            .map(PathNode::full_throttle)
            .collect(),
    )
}

pub fn dispatch(
    tank: &TankSnapshot,
    decision: &Decision,
    params: &AiParams,
    tick: TickContext,
) -> Commands {
    log::debug!("{} tick {}: {:?}", tank.id, tick.tick, decision.action);
    let target_code = || {
        decision
            .target_tank
            .as_ref()
            .map(|target| TankCommand::TargetByCode(target.code.clone()))
    };

    let mut commands = vec![];
    match decision.action {
        Action::MoveTowardsPickup => {
            if decision.target_pickup.is_some() && !decision.path.is_empty() {
                commands.push(TankCommand::UpsertPath(full_throttle_path(
                    tank,
                    &decision.path,
                )));
            }
        }
        Action::AimAndFire => {
            commands.extend(target_code());
            if decision.should_fire {
                commands.push(TankCommand::Fire);
            }
        }
        Action::StopMoving => {
            // Stop and engage: fires regardless of how well the turret is aimed.
            commands.push(TankCommand::DeletePath);
            commands.push(TankCommand::ZeroVelocity);
            commands.extend(target_code());
            commands.push(TankCommand::Fire);
        }
        Action::MoveTowardsEnemy => {
            if !decision.path.is_empty() {
                if let Some(target) = &decision.target_tank {
                    if tank.distance(target) <= params.max_targeting_range {
                        commands.extend(target_code());
                    }
                }
                commands.push(TankCommand::UpsertPath(full_throttle_path(
                    tank,
                    &decision.path,
                )));
            }
        }
        Action::Escape => {
            if let Some(point) = decision.target_point {
                commands.push(TankCommand::UpsertPath(drive_towards(
                    tank,
                    cell_of(point),
                )));
            }
        }
        Action::None => {}
    }
    commands
}

/// Ask `source` for a decision and dispatch it.
pub fn evaluate_behavior_tree_bot<R: WorldReader + ?Sized>(
    tank: &TankSnapshot,
    source: &mut (impl DecisionSource + ?Sized),
    cache: &mut EntityQueryCache<R>,
    params: &AiParams,
) -> Commands {
    let context = DecisionContext::from_cache(cache);
    let decision = source.evaluate_behavior_tree(tank, &context, tank.can_fire());
    dispatch(tank, &decision, params, context.tick)
}
