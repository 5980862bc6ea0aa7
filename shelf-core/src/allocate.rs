//! Corner reconciliation and per-wall usable run lengths.

use tracing::debug;

use crate::catalog::{DOOR_CLEARANCE, DepthMax, MAX_LEN};
use crate::input::{Room, Shape, Wall};

/// Force A, B and E onto one depth when a U-shaped room shelves all three.
///
/// Each corner is shared by two shelves; with a common depth neither one
/// overhangs the other. Reconciliation only happens when every wall has a
/// feasible depth, otherwise the depths are returned untouched and the
/// missing wall fails later.
pub fn reconcile_depths(room: &Room, max: DepthMax) -> DepthMax {
    if room.shape != Shape::U || room.walls.len() < 3 {
        return max;
    }
    match (max.a, max.b, max.e) {
        (Some(a), Some(b), Some(e)) => {
            let common = a.min(b).min(e);
            debug!(common, "Reconciled U-shape corner depths");
            DepthMax {
                a: Some(common),
                b: Some(common),
                e: Some(common),
            }
        }
        _ => max,
    }
}

/// Run length of wall E after leaving room for the door.
///
/// The door sits at the end of wall E when there is no clearance wall (D = 0).
pub fn usable_length_e(e: f64, d: f64) -> f64 {
    if d == 0.0 {
        (e - DOOR_CLEARANCE).max(0.0)
    } else {
        e
    }
}

/// Usable run per wall, in cm. Walls the allocation never touches keep their
/// raw length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallLengths {
    pub a: f64,
    pub b: f64,
    pub e: f64,
}

impl WallLengths {
    pub fn get(&self, wall: Wall) -> f64 {
        match wall {
            Wall::A => self.a,
            Wall::B => self.b,
            Wall::E => self.e,
        }
    }
}

/// Subtract corner overlaps and door clearance from the raw wall lengths.
pub fn allocate_lengths(room: &Room, depths: &DepthMax) -> WallLengths {
    let use_a = room.walls.contains(Wall::A);
    let use_b = room.walls.contains(Wall::B);
    let use_e = room.walls.contains(Wall::E);
    let usable_e = usable_length_e(room.e, room.d);

    let mut len = WallLengths {
        a: room.a,
        b: room.b,
        e: room.e,
    };

    if room.shape == Shape::L {
        let only_b = use_a && use_b && !use_e;
        let only_e = use_a && use_e && !use_b;
        // A short back wall stays whole; the long return gives up the corner.
        let keep_a = room.a <= MAX_LEN;
        match depths.a {
            Some(depth_a) if only_b && room.b > MAX_LEN && keep_a => {
                debug!(depth_a, "L-shape: keeping A whole, B yields the corner");
                len.b = (room.b - f64::from(depth_a)).max(0.0);
            }
            Some(depth_a) if only_e && usable_e > MAX_LEN && keep_a => {
                debug!(depth_a, "L-shape: keeping A whole, E yields the corner");
                len.e = (usable_e - f64::from(depth_a)).max(0.0);
            }
            _ => {
                if use_a && use_b {
                    len.a = (room.a - corner(depths.b)).max(0.0);
                }
                if use_a && use_e {
                    len.a = (room.a - corner(depths.e)).max(0.0);
                }
                if use_e {
                    len.e = usable_e;
                }
            }
        }
    }

    if room.shape == Shape::U && use_a && use_b && use_e {
        len.a = (room.a - corner(depths.b) - corner(depths.e)).max(0.0);
    }
    if room.shape != Shape::L && use_e {
        len.e = usable_e;
    }

    debug!(
        shape = %room.shape,
        len_a = len.a,
        len_b = len.b,
        len_e = len.e,
        "Allocated usable wall lengths"
    );
    len
}

fn corner(depth: Option<u32>) -> f64 {
    depth.map_or(0.0, f64::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::max_depth_per_wall;
    use crate::input::WallSet;

    fn room(shape: Shape, walls: &[Wall]) -> Room {
        Room {
            a: 200.0,
            b: 150.0,
            c: 100.0,
            d: 0.0,
            e: 300.0,
            room_height: 280.0,
            walls: walls.iter().copied().collect::<WallSet>(),
            shape,
        }
    }

    fn depths_for(r: &Room) -> DepthMax {
        reconcile_depths(r, max_depth_per_wall(Some(r.c), Some(r.d)))
    }

    #[test]
    fn test_door_clearance() {
        assert_eq!(usable_length_e(300.0, 0.0), 220.0);
        assert_eq!(usable_length_e(50.0, 0.0), 0.0);
        assert_eq!(usable_length_e(300.0, 45.0), 300.0);
    }

    #[test]
    fn test_reconcile_only_for_full_u() {
        let max = max_depth_per_wall(Some(50.0), Some(30.0));
        assert_eq!(max.b, Some(48));
        assert_eq!(max.e, Some(28));

        let u = Room {
            c: 50.0,
            d: 30.0,
            ..room(Shape::U, &[Wall::A, Wall::B, Wall::E])
        };
        let d = reconcile_depths(&u, max);
        assert_eq!((d.a, d.b, d.e), (Some(28), Some(28), Some(28)));

        let l = Room {
            shape: Shape::L,
            ..u
        };
        assert_eq!(reconcile_depths(&l, max), max);

        let partial = room(Shape::U, &[Wall::A, Wall::B]);
        assert_eq!(reconcile_depths(&partial, max), max);
    }

    #[test]
    fn test_reconcile_skipped_when_a_depth_is_missing() {
        let u = room(Shape::U, &[Wall::A, Wall::B, Wall::E]);
        let max = max_depth_per_wall(Some(10.0), Some(50.0));
        assert_eq!(reconcile_depths(&u, max), max);
    }

    #[test]
    fn test_l_general_case_shortens_a() {
        let r = room(Shape::L, &[Wall::A, Wall::B]);
        let len = allocate_lengths(&r, &depths_for(&r));
        assert_eq!(len.a, 132.0);
        assert_eq!(len.b, 150.0);
        assert_eq!(len.e, 300.0);
    }

    #[test]
    fn test_l_long_b_keeps_a_whole() {
        let r = Room {
            b: 400.0,
            ..room(Shape::L, &[Wall::A, Wall::B])
        };
        let len = allocate_lengths(&r, &depths_for(&r));
        assert_eq!(len.a, 200.0);
        assert_eq!(len.b, 332.0);
    }

    #[test]
    fn test_l_long_a_does_not_trigger_special_case() {
        let r = Room {
            a: 250.0,
            b: 400.0,
            ..room(Shape::L, &[Wall::A, Wall::B])
        };
        let len = allocate_lengths(&r, &depths_for(&r));
        assert_eq!(len.a, 182.0);
        assert_eq!(len.b, 400.0);
    }

    #[test]
    fn test_l_long_e_keeps_a_whole() {
        // 400 - 80 door = 320 > 243.
        let r = Room {
            e: 400.0,
            ..room(Shape::L, &[Wall::A, Wall::E])
        };
        let len = allocate_lengths(&r, &depths_for(&r));
        assert_eq!(len.a, 200.0);
        assert_eq!(len.e, 252.0);
    }

    #[test]
    fn test_l_short_e_shortens_a() {
        let r = Room {
            e: 200.0,
            d: 40.0,
            ..room(Shape::L, &[Wall::A, Wall::E])
        };
        let len = allocate_lengths(&r, &depths_for(&r));
        assert_eq!(len.a, 162.0);
        assert_eq!(len.e, 200.0);
    }

    #[test]
    fn test_l_door_side_without_depth_leaves_a_whole() {
        // D = 0 leaves E without a depth, so nothing is taken from A.
        let r = room(Shape::L, &[Wall::A, Wall::E]);
        let len = allocate_lengths(&r, &depths_for(&r));
        assert_eq!(len.a, 200.0);
        assert_eq!(len.e, 220.0);
    }

    #[test]
    fn test_l_all_three_uses_e_corner() {
        let r = Room {
            d: 40.0,
            ..room(Shape::L, &[Wall::A, Wall::B, Wall::E])
        };
        let len = allocate_lengths(&r, &depths_for(&r));
        // depth E = 38 wins over depth B = 68, both computed from raw A.
        assert_eq!(len.a, 162.0);
        assert_eq!(len.e, 300.0);
    }

    #[test]
    fn test_u_subtracts_both_corners() {
        let r = Room {
            a: 300.0,
            c: 50.0,
            d: 30.0,
            ..room(Shape::U, &[Wall::A, Wall::B, Wall::E])
        };
        let len = allocate_lengths(&r, &depths_for(&r));
        assert_eq!(len.a, 244.0);
        assert_eq!(len.b, 150.0);
        assert_eq!(len.e, 300.0);
    }

    #[test]
    fn test_u_partial_keeps_a_raw_and_applies_door() {
        let r = room(Shape::U, &[Wall::A, Wall::E]);
        let len = allocate_lengths(&r, &depths_for(&r));
        assert_eq!(len.a, 200.0);
        assert_eq!(len.e, 220.0);
    }

    #[test]
    fn test_lengths_clamp_at_zero() {
        let r = Room {
            a: 50.0,
            ..room(Shape::U, &[Wall::A, Wall::B, Wall::E])
        };
        let len = allocate_lengths(&r, &depths_for(&r));
        assert_eq!(len.a, 0.0);
    }
}
