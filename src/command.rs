use crate::{
    tank::{TankId, TankPath},
    world::Actuator,
};

/// A single mutation an archetype wants applied to its own tank.
///
/// Archetypes never touch the store; they return an ordered list of these and the
/// controller replays it, so the order of effects is explicit.
#[derive(Debug, Clone, PartialEq)]
pub enum TankCommand {
    SetTarget(Option<TankId>),
    TargetByCode(String),
    SetRotationTarget(f64),
    Fire,
    UpsertPath(TankPath),
    DeletePath,
    ZeroVelocity,
    SetMessage(String),
}

pub type Commands = Vec<TankCommand>;

pub fn apply_commands(
    actuator: &mut (impl Actuator + ?Sized),
    tank: TankId,
    commands: &[TankCommand],
) {
    for command in commands {
        log::trace!("{tank}: {command:?}");
        match command {
            TankCommand::SetTarget(target) => actuator.set_target(tank, *target),
            TankCommand::TargetByCode(code) => actuator.target_by_code(tank, code),
            TankCommand::SetRotationTarget(rotation) => {
                actuator.set_turret_target_rotation(tank, *rotation)
            }
            TankCommand::Fire => actuator.fire_weapon(tank),
            TankCommand::UpsertPath(path) => actuator.upsert_path(path.clone()),
            TankCommand::DeletePath => actuator.delete_path(tank),
            TankCommand::ZeroVelocity => actuator.zero_velocity(tank),
            TankCommand::SetMessage(message) => actuator.set_message(tank, message),
        }
    }
}
