//! Idle wanderers that drive to a random passable cell near where they are.
//!
//! Tilebound bots stay inside the grid aligned tile they are on, while tutorial bots roam a
//! square centered on their current cell. Both only pick a new destination once the
//! previous path is used up.

use rand::Rng;

use super::driving::drive_towards;
use crate::{
    cache::EntityQueryCache,
    command::{Commands, TankCommand},
    params::AiParams,
    tank::{is_idle, TankSnapshot, TraversibilityMap},
    world::WorldReader,
};

/// Inclusive cell rectangle `[min_x, min_y, max_x, max_y]`. Empty when a max is below its
/// min.
pub type CellRect = [i32; 4];

/// Intersect `rect` with the map. A rectangle lying entirely off the map, on any side,
/// comes out empty.
fn clamp_to_map(rect: CellRect, map: &TraversibilityMap) -> CellRect {
    let max_x = i32::try_from(map.width).unwrap_or(i32::MAX) - 1;
    let max_y = i32::try_from(map.height).unwrap_or(i32::MAX) - 1;
    [
        rect[0].max(0),
        rect[1].max(0),
        rect[2].min(max_x),
        rect[3].min(max_y),
    ]
}

/// The tile containing `cell`, clipped to the map.
pub fn tile_bounds(cell: [i32; 2], tile_size: i32, map: &TraversibilityMap) -> CellRect {
    let min_x = cell[0].div_euclid(tile_size).saturating_mul(tile_size);
    let min_y = cell[1].div_euclid(tile_size).saturating_mul(tile_size);
    clamp_to_map(
        [
            min_x,
            min_y,
            min_x.saturating_add(tile_size - 1),
            min_y.saturating_add(tile_size - 1),
        ],
        map,
    )
}

/// A square of `half_extent` cells around `cell`, clipped to the map.
pub fn centered_bounds(cell: [i32; 2], half_extent: i32, map: &TraversibilityMap) -> CellRect {
    clamp_to_map(
        [
            cell[0].saturating_sub(half_extent),
            cell[1].saturating_sub(half_extent),
            cell[0].saturating_add(half_extent),
            cell[1].saturating_add(half_extent),
        ],
        map,
    )
}

/// Rejection sample a passable cell in `rect`, falling back to `fallback` once `attempts`
/// draws have all hit walls.
pub fn sample_passable_cell(
    rng: &mut impl Rng,
    map: &TraversibilityMap,
    rect: CellRect,
    attempts: usize,
    fallback: [i32; 2],
) -> [i32; 2] {
    if rect[2] < rect[0] || rect[3] < rect[1] {
        return fallback;
    }
    for _ in 0..attempts {
        let cell = [
            rng.gen_range(rect[0]..=rect[2]),
            rng.gen_range(rect[1]..=rect[3]),
        ];
        if map.is_passable(cell) {
            return cell;
        }
    }
    log::debug!("no passable cell in {rect:?} after {attempts} attempts");
    fallback
}

fn wander<R: WorldReader + ?Sized>(
    tank: &TankSnapshot,
    cache: &mut EntityQueryCache<R>,
    params: &AiParams,
    bounds: impl FnOnce([i32; 2], &TraversibilityMap) -> CellRect,
) -> Commands {
    if !is_idle(cache.get_tank_path(tank.id).as_deref()) {
        return vec![];
    }
    let Some(map) = cache.get_traversibility_map() else {
        return vec![];
    };
    let cell = tank.cell();
    let rect = bounds(cell, &*map);
    let target = sample_passable_cell(
        cache.get_random(),
        &*map,
        rect,
        params.max_sample_attempts,
        cell,
    );
    vec![TankCommand::UpsertPath(drive_towards(tank, target))]
}

pub fn evaluate_tilebound<R: WorldReader + ?Sized>(
    tank: &TankSnapshot,
    cache: &mut EntityQueryCache<R>,
    params: &AiParams,
) -> Commands {
    wander(tank, cache, params, |cell, map| {
        tile_bounds(cell, params.tile_size, map)
    })
}

pub fn evaluate_tutorial<R: WorldReader + ?Sized>(
    tank: &TankSnapshot,
    cache: &mut EntityQueryCache<R>,
    params: &AiParams,
) -> Commands {
    wander(tank, cache, params, |cell, map| {
        centered_bounds(cell, params.tutorial_half_extent, map)
    })
}
