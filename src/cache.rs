use std::{collections::HashMap, rc::Rc};

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    tank::{GameId, PickupSnapshot, TankId, TankPath, TankSnapshot, TraversibilityMap, WorldId},
    world::WorldReader,
};

/// Per tick inputs supplied by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickContext {
    pub tick: u64,
    /// Monotonic clock in microseconds.
    pub now_micros: u64,
    /// Seed of the single random stream shared by every bot this tick.
    pub seed: u64,
}

impl TickContext {
    pub fn new(tick: u64, now_micros: u64, seed: u64) -> Self {
        Self {
            tick,
            now_micros,
            seed,
        }
    }

    pub fn is_even(&self) -> bool {
        self.tick % 2 == 0
    }
}

/// Read-through memoization of store queries for one game during one tick.
///
/// Every lookup is performed at most once between two [`reset`](Self::reset) calls,
/// including lookups that found nothing. The cache must be reset before it is used for
/// another tick or another game.
pub struct EntityQueryCache<'w, R: WorldReader + ?Sized> {
    reader: &'w R,
    ctx: TickContext,
    game_id: GameId,
    world_id: Option<WorldId>,
    tanks: Option<Rc<Vec<TankSnapshot>>>,
    pickups: Option<Rc<Vec<PickupSnapshot>>>,
    map: Option<Option<Rc<TraversibilityMap>>>,
    paths: HashMap<TankId, Option<Rc<TankPath>>>,
    rng: StdRng,
}

impl<'w, R: WorldReader + ?Sized> EntityQueryCache<'w, R> {
    pub fn new(reader: &'w R, ctx: TickContext, game_id: GameId) -> Self {
        Self {
            reader,
            ctx,
            game_id,
            world_id: reader.world_of_game(game_id),
            tanks: None,
            pickups: None,
            map: None,
            paths: HashMap::new(),
            rng: StdRng::seed_from_u64(ctx.seed),
        }
    }

    pub fn reset(&mut self, ctx: TickContext, game_id: GameId) {
        self.ctx = ctx;
        self.game_id = game_id;
        self.world_id = self.reader.world_of_game(game_id);
        self.tanks = None;
        self.pickups = None;
        self.map = None;
        self.paths.clear();
        self.rng = StdRng::seed_from_u64(ctx.seed);
    }

    pub fn tick_context(&self) -> TickContext {
        self.ctx
    }

    pub fn get_all_tanks(&mut self) -> Rc<Vec<TankSnapshot>> {
        let (reader, game_id) = (self.reader, self.game_id);
        self.tanks
            .get_or_insert_with(|| Rc::new(reader.tanks_by_game(game_id)))
            .clone()
    }

    pub fn get_all_pickups(&mut self) -> Rc<Vec<PickupSnapshot>> {
        let (reader, world_id) = (self.reader, self.world_id);
        self.pickups
            .get_or_insert_with(|| {
                Rc::new(
                    world_id
                        .map(|world| reader.pickups_by_world(world))
                        .unwrap_or_default(),
                )
            })
            .clone()
    }

    pub fn get_traversibility_map(&mut self) -> Option<Rc<TraversibilityMap>> {
        let (reader, world_id) = (self.reader, self.world_id);
        self.map
            .get_or_insert_with(|| {
                world_id
                    .and_then(|world| reader.traversibility_map(world))
                    .map(Rc::new)
            })
            .clone()
    }

    pub fn get_tank_path(&mut self, tank: TankId) -> Option<Rc<TankPath>> {
        let reader = self.reader;
        self.paths
            .entry(tank)
            .or_insert_with(|| reader.tank_path(tank).map(Rc::new))
            .clone()
    }

    /// Look a tank up among the cached tanks of this game.
    pub fn get_tank(&mut self, id: TankId) -> Option<TankSnapshot> {
        self.get_all_tanks()
            .iter()
            .find(|tank| tank.id == id)
            .cloned()
    }

    /// Nearest living tank of another alliance, by squared distance. On equal distances
    /// the earliest tank in store order wins.
    pub fn get_closest_enemy_tank(&mut self, source: &TankSnapshot) -> Option<TankSnapshot> {
        self.get_all_tanks()
            .iter()
            .filter(|tank| {
                tank.id != source.id && tank.alliance != source.alliance && tank.is_alive()
            })
            .map(|tank| (source.distance2(tank), tank))
            .fold(None, |acc: Option<(f64, &TankSnapshot)>, cur| match acc {
                Some(acc) if acc.0 <= cur.0 => Some(acc),
                _ => Some(cur),
            })
            .map(|(_, tank)| tank.clone())
    }

    /// The tick's only random stream. Draws are shared by every archetype in evaluation order.
    pub fn get_random(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        tank::{PickupId, PickupType},
        testing::{tank, world_with, GAME, WORLD},
    };
    use proptest::prelude::*;
    use rand::Rng;

    fn ctx() -> TickContext {
        TickContext::new(0, 0, 42)
    }

    #[test]
    fn test_memoizes_tanks_and_paths() {
        let world = world_with(vec![tank(1, [1., 1.], 0), tank(2, [3., 3.], 1)]);
        let mut cache = EntityQueryCache::new(&world, ctx(), GAME);
        let first = cache.get_all_tanks();
        let second = cache.get_all_tanks();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.get_tank_path(TankId(1)), None);
        assert_eq!(cache.get_tank_path(TankId(1)), None);
        assert!(cache.get_traversibility_map().is_some());
        assert!(cache.get_traversibility_map().is_some());
        assert_eq!(world.query_calls(), 3);
    }

    #[test]
    fn test_memoizes_pickups() {
        let mut world = world_with(vec![]);
        for (id, world_id) in [(1, WORLD), (2, WorldId(99)), (3, WORLD)] {
            world.pickups.push(PickupSnapshot {
                id: PickupId(id),
                world_id,
                pos: [id as f64, 0.],
                ty: PickupType::Ammo,
            });
        }
        let mut cache = EntityQueryCache::new(&world, ctx(), GAME);
        let first = cache.get_all_pickups();
        let second = cache.get_all_pickups();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(
            first.iter().map(|pickup| pickup.id).collect::<Vec<_>>(),
            vec![PickupId(1), PickupId(3)]
        );
        assert_eq!(world.query_calls(), 1);
    }

    #[test]
    fn test_missing_map_is_cached() {
        let mut world = world_with(vec![]);
        world.maps.clear();
        let mut cache = EntityQueryCache::new(&world, ctx(), GAME);
        assert!(cache.get_traversibility_map().is_none());
        assert!(cache.get_traversibility_map().is_none());
        assert_eq!(world.query_calls(), 1);
    }

    #[test]
    fn test_reset_clears_memo_and_reseeds() {
        let world = world_with(vec![tank(1, [1., 1.], 0)]);
        let mut cache = EntityQueryCache::new(&world, ctx(), GAME);
        cache.get_all_tanks();
        let a: u64 = cache.get_random().gen();
        cache.reset(ctx(), GAME);
        cache.get_all_tanks();
        let b: u64 = cache.get_random().gen();
        assert_eq!(world.query_calls(), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_closest_enemy_filters() {
        let source = tank(1, [0., 0.], 0);
        let ally = tank(2, [1., 0.], 0);
        let mut dead = tank(3, [1., 1.], 1);
        dead.health = 0;
        let far = tank(4, [5., 0.], 1);
        let near = tank(5, [3., 0.], 1);
        let world = world_with(vec![source.clone(), ally, dead, far, near]);
        let mut cache = EntityQueryCache::new(&world, ctx(), GAME);
        assert_eq!(
            cache.get_closest_enemy_tank(&source).map(|t| t.id),
            Some(TankId(5))
        );
    }

    #[test]
    fn test_closest_enemy_none() {
        let source = tank(1, [0., 0.], 0);
        let world = world_with(vec![source.clone(), tank(2, [1., 0.], 0)]);
        let mut cache = EntityQueryCache::new(&world, ctx(), GAME);
        assert_eq!(cache.get_closest_enemy_tank(&source), None);
    }

    proptest! {
        #[test]
        fn closest_enemy_is_never_dead(
            tanks in prop::collection::vec((0.0f64..50.0, 0.0f64..50.0, 0u32..3, -2i32..3), 1..20)
        ) {
            let source = tank(0, [25., 25.], 0);
            let mut all = vec![source.clone()];
            all.extend(tanks.iter().enumerate().map(|(i, &(x, y, alliance, health))| {
                let mut t = tank(i as u64 + 1, [x, y], alliance);
                t.health = health;
                t
            }));
            let world = world_with(all);
            let mut cache = EntityQueryCache::new(&world, ctx(), GAME);
            if let Some(found) = cache.get_closest_enemy_tank(&source) {
                prop_assert!(found.is_alive());
                prop_assert!(found.alliance != source.alliance);
            }
        }
    }
}
