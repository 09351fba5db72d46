//! Headless match between bot tanks of every archetype.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tank_bots::{
    Action, AiParams, Archetype, BotController, Decision, DecisionContext, GameId, Gun,
    MemoryWorld, PickupId, PickupSnapshot, PickupType, TankId, TankSnapshot, TickContext,
    TraversibilityMap, WorldId,
};

/// One tick of simulated time.
const TICK_MICROS: u64 = 100_000;

#[derive(Parser, Debug)]
#[command(about = "Run a headless match between bot tanks")]
struct Args {
    #[arg(long, default_value_t = 9318245)]
    seed: u64,
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Width and height of the board in cells.
    #[arg(long, default_value_t = 48)]
    size: usize,
    #[arg(long, default_value_t = 14)]
    bots: usize,
    /// RON file overriding the AI parameters.
    #[arg(long)]
    params: Option<PathBuf>,
}

fn measure_time<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = std::time::Instant::now();
    let ret = f();
    (ret, start.elapsed().as_secs_f64())
}

fn create_board(rng: &mut StdRng, world_id: WorldId, size: usize) -> TraversibilityMap {
    let mut map = TraversibilityMap::filled(world_id, size, size, true);
    for y in 0..size as i32 {
        for x in 0..size as i32 {
            let border = x == 0 || y == 0 || x == size as i32 - 1 || y == size as i32 - 1;
            if border || rng.gen_bool(0.12) {
                map.set_passable([x, y], false);
            }
        }
    }
    map
}

fn random_passable(rng: &mut StdRng, map: &TraversibilityMap) -> Option<[f64; 2]> {
    for _ in 0..10 {
        let pos = [
            rng.gen::<f64>() * map.width as f64,
            rng.gen::<f64>() * map.height as f64,
        ];
        if map.is_passable(tank_bots::tank::cell_of(pos)) {
            return Some(pos);
        }
    }
    None
}

/// Stand-in for a real behavior tree: shoot what is close, otherwise go for pickups, then
/// for the nearest enemy.
fn simple_tree(me: &TankSnapshot, ctx: &DecisionContext, can_fire: bool) -> Decision {
    let enemy = ctx
        .tanks
        .iter()
        .filter(|t| t.alliance != me.alliance && t.is_alive())
        .min_by(|a, b| me.distance2(a).total_cmp(&me.distance2(b)));
    let pickup = ctx.pickups.first();
    match (enemy, pickup) {
        (Some(enemy), _) if me.distance(enemy) < 6. => Decision {
            target_tank: Some(enemy.clone()),
            should_fire: can_fire,
            ..Decision::new(Action::AimAndFire)
        },
        (_, Some(pickup)) => Decision {
            target_pickup: Some(pickup.clone()),
            path: vec![pickup.pos],
            ..Decision::new(Action::MoveTowardsPickup)
        },
        (Some(enemy), None) => Decision {
            target_tank: Some(enemy.clone()),
            path: vec![enemy.pos],
            ..Decision::new(Action::MoveTowardsEnemy)
        },
        (None, None) => Decision::default(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let params = match &args.params {
        Some(path) => {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            AiParams::from_ron_str(&source)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => AiParams::default(),
    };

    let game = GameId(1);
    let world_id = WorldId(1);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut world = MemoryWorld::new();
    let map = create_board(&mut rng, world_id, args.size);

    for i in 0..args.bots {
        let Some(pos) = random_passable(&mut rng, &map) else {
            log::warn!("no room for bot {i}");
            continue;
        };
        world.add_tank(TankSnapshot {
            id: TankId(i as u64),
            game_id: game,
            world_id,
            code: format!("B{i:02}"),
            pos,
            velocity: [0., 0.],
            alliance: (i % 2) as u32,
            health: 3,
            turret_rotation: 0.,
            turret_target_rotation: 0.,
            turret_angular_velocity: 0.,
            target: None,
            guns: vec![Gun::new(10)],
            message: None,
            archetype: Some(Archetype::ALL[(i / 2) % Archetype::ALL.len()]),
        });
    }
    if let Some(pos) = random_passable(&mut rng, &map) {
        world.pickups.push(PickupSnapshot {
            id: PickupId(0),
            world_id,
            pos,
            ty: PickupType::Health,
        });
    }
    world.add_game(game, map);

    let mut controller = BotController::new(params).with_decision_source(simple_tree);
    let mut total_time = 0.;
    for tick in 0..args.ticks {
        let ctx = TickContext::new(tick, tick * TICK_MICROS, rng.gen());
        let (_report, time) = measure_time(|| controller.tick(&mut world, ctx, game));
        total_time += time;
        world.step();
    }

    let alive: Vec<_> = world.tanks.iter().filter(|t| t.is_alive()).collect();
    println!(
        "{} ticks, {:.06}s per tick, {} of {} tanks alive",
        args.ticks,
        total_time / args.ticks.max(1) as f64,
        alive.len(),
        world.tanks.len()
    );
    for tank in alive {
        println!(
            "  {} {:>12} alliance {} health {} at [{:.1}, {:.1}]",
            tank.code,
            tank.archetype.map(|a| a.to_string()).unwrap_or_default(),
            tank.alliance,
            tank.health,
            tank.pos[0],
            tank.pos[1]
        );
    }
    Ok(())
}
