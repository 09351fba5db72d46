//! Per-tick decision making for bot tanks.
//!
//! Each tick the [`BotController`] opens an [`EntityQueryCache`] over the entity store,
//! lets every bot's [`Archetype`] (or an external behavior tree, through the
//! [`dispatcher`]) turn the cached world into a list of [`TankCommand`]s, and replays
//! those commands through the store's [`Actuator`].

pub mod archetype;
pub mod cache;
pub mod command;
pub mod controller;
pub mod dispatcher;
pub mod kinematics;
pub mod params;
pub mod state;
pub mod tank;
pub mod world;

#[cfg(test)]
mod testing;

pub use crate::{
    archetype::Archetype,
    cache::{EntityQueryCache, TickContext},
    command::{apply_commands, TankCommand},
    controller::{BotController, TickReport},
    dispatcher::{Action, Decision, DecisionContext, DecisionSource},
    params::{AiParams, ParamsError},
    tank::{
        GameId, Gun, PathNode, PickupId, PickupSnapshot, PickupType, TankId, TankPath,
        TankSnapshot, TraversibilityMap, WorldId,
    },
    world::{Actuator, MemoryWorld, WorldReader},
};
