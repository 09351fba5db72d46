use crate::tank::{cell_of, PathNode, TankPath, TankSnapshot};

/// A single full throttle waypoint that moves the tank into `target_cell` while keeping its
/// offset inside the cell, so the tank does not snap to the cell corner.
pub fn drive_towards(tank: &TankSnapshot, target_cell: [i32; 2]) -> TankPath {
    let cell = cell_of(tank.pos);
    let waypoint = [
        tank.pos[0] + (target_cell[0] - cell[0]) as f64,
        tank.pos[1] + (target_cell[1] - cell[1]) as f64,
    ];
    TankPath::new(tank.id, vec![PathNode::full_throttle(waypoint)])
}
