use crate::{
    cache::{EntityQueryCache, TickContext},
    command::{apply_commands, Commands},
    dispatcher::{evaluate_behavior_tree_bot, DecisionSource},
    params::AiParams,
    state::ArchetypeStates,
    tank::{GameId, TankId},
    world::{Actuator, WorldReader},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub evaluated: usize,
    pub commands: usize,
}

/// Runs every bot of a game once per tick.
pub struct BotController {
    params: AiParams,
    states: ArchetypeStates,
    decisions: Option<Box<dyn DecisionSource>>,
}

impl std::fmt::Debug for BotController {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("BotController")
            .field("params", &self.params)
            .field("states", &self.states)
            .field("decisions", &self.decisions.is_some())
            .finish()
    }
}

impl BotController {
    pub fn new(params: AiParams) -> Self {
        Self {
            params,
            states: ArchetypeStates::default(),
            decisions: None,
        }
    }

    pub fn with_decision_source(mut self, source: impl DecisionSource + 'static) -> Self {
        self.decisions = Some(Box::new(source));
        self
    }

    pub fn states(&self) -> &ArchetypeStates {
        &self.states
    }

    /// Forget all archetype memory of a tank that left the game.
    pub fn remove_tank(&mut self, tank: TankId) {
        self.states.remove_tank(tank);
    }

    /// Evaluate every living bot of `game` against one consistent snapshot, then apply the
    /// resulting commands tank by tank in evaluation order.
    pub fn tick<W: WorldReader + Actuator>(
        &mut self,
        world: &mut W,
        ctx: TickContext,
        game: GameId,
    ) -> TickReport {
        let planned = self.plan(&*world, ctx, game);

        let mut report = TickReport {
            evaluated: planned.len(),
            commands: 0,
        };
        for (tank, commands) in &planned {
            apply_commands(world, *tank, commands);
            report.commands += commands.len();
        }
        log::info!(
            "tick {} {game}: {} bots, {} commands",
            ctx.tick,
            report.evaluated,
            report.commands
        );
        report
    }

    /// Evaluate without applying anything.
    pub fn plan<R: WorldReader + ?Sized>(
        &mut self,
        reader: &R,
        ctx: TickContext,
        game: GameId,
    ) -> Vec<(TankId, Commands)> {
        let mut cache = EntityQueryCache::new(reader, ctx, game);
        let tanks = cache.get_all_tanks();
        let mut planned = vec![];
        for tank in tanks.iter().filter(|tank| tank.is_alive()) {
            let Some(archetype) = tank.archetype else {
                continue;
            };
            log::trace!("{}: evaluating as {archetype}", tank.id);
            let commands = match archetype.evaluate(tank, &mut cache, &self.params, &mut self.states)
            {
                Some(commands) => commands,
                None => {
                    let Some(source) = self.decisions.as_mut() else {
                        log::warn!("{} needs a behavior tree but none is installed", tank.id);
                        continue;
                    };
                    evaluate_behavior_tree_bot(tank, &mut **source, &mut cache, &self.params)
                }
            };
            planned.push((tank.id, commands));
        }
        planned
    }
}
