pub mod aim_bot;
pub mod driving;
pub mod random_aim;
pub mod tilebound;
pub mod turret;

use std::fmt::Display;

use crate::{
    cache::EntityQueryCache, command::Commands, params::AiParams, state::ArchetypeStates,
    tank::TankSnapshot, world::WorldReader,
};

/// Strategy a bot tank is driven by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Archetype {
    Turret,
    AimBot,
    TargetBot,
    RandomAim,
    Tilebound,
    Tutorial,
    /// Delegates the decision to an external behavior tree, see [`crate::dispatcher`].
    BehaviorTree,
}

impl Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Turret => "Turret",
                Self::AimBot => "AimBot",
                Self::TargetBot => "TargetBot",
                Self::RandomAim => "RandomAim",
                Self::Tilebound => "Tilebound",
                Self::Tutorial => "Tutorial",
                Self::BehaviorTree => "BehaviorTree",
            }
        )
    }
}

impl Archetype {
    pub const ALL: [Archetype; 7] = [
        Archetype::Turret,
        Archetype::AimBot,
        Archetype::TargetBot,
        Archetype::RandomAim,
        Archetype::Tilebound,
        Archetype::Tutorial,
        Archetype::BehaviorTree,
    ];

    /// Run a self-contained archetype. Returns `None` for archetypes that need an external
    /// decision source.
    pub fn evaluate<R: WorldReader + ?Sized>(
        &self,
        tank: &TankSnapshot,
        cache: &mut EntityQueryCache<R>,
        params: &AiParams,
        states: &mut ArchetypeStates,
    ) -> Option<Commands> {
        let commands = match self {
            Self::Turret => turret::evaluate(tank, cache, params, &mut states.turret),
            Self::AimBot => aim_bot::evaluate_aim_bot(tank, cache),
            Self::TargetBot => aim_bot::evaluate_target_bot(tank, cache),
            Self::RandomAim => random_aim::evaluate(tank, cache, params, &mut states.random_aim),
            Self::Tilebound => tilebound::evaluate_tilebound(tank, cache, params),
            Self::Tutorial => tilebound::evaluate_tutorial(tank, cache, params),
            Self::BehaviorTree => return None,
        };
        Some(commands)
    }
}
