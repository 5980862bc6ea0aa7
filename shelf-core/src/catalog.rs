//! Standard shelf dimensions and the catalog scans that pick from them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::Wall;

/// Shelf depths in cm, deepest first.
pub const DEPTHS: [u32; 4] = [68, 48, 38, 28];
/// Longest single shelf segment, cm.
pub const MAX_LEN: f64 = 243.0;
/// Shortest offcut worth building, cm.
pub const MIN_LEN: f64 = 40.0;
/// Run kept free for the door when wall E has no clearance wall, cm.
pub const DOOR_CLEARANCE: f64 = 80.0;
/// Gap kept between the top of a shelf and the ceiling, cm.
pub const CEILING_CLEARANCE: f64 = 40.0;
/// Largest measurement accepted for any room dimension, cm (1 km).
pub const MAX_MEASUREMENT: f64 = 100_000.0;

/// A standard shelf height and the level counts it can be built with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierOption {
    pub height: u32,
    pub levels: &'static [u32],
}

impl TierOption {
    pub fn max_levels(&self) -> u32 {
        self.levels.iter().copied().max().unwrap_or(0)
    }
}

/// Height tiers, tallest first.
pub const TIERS: [TierOption; 3] = [
    TierOption {
        height: 300,
        levels: &[6, 4],
    },
    TierOption {
        height: 250,
        levels: &[5, 4],
    },
    TierOption {
        height: 200,
        levels: &[4],
    },
];

/// The tier chosen for a room. Serialized as `{"height":..,"levels":..}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub height: u32,
    pub levels: u32,
}

/// Round to one decimal, ties to even.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}

/// First option that does not exceed `limit`. Options must be sorted
/// descending, so this is also the largest one that fits.
pub fn pick_max_le(options: &[u32], limit: f64) -> Option<u32> {
    options.iter().copied().find(|&v| f64::from(v) <= limit)
}

/// Tallest tier that fits under the ceiling clearance, with its maximum level
/// count.
pub fn pick_tier(room_height: f64) -> Option<Tier> {
    let usable = room_height - CEILING_CLEARANCE;
    let tier = TIERS
        .iter()
        .find(|t| f64::from(t.height) <= usable)
        .map(|t| Tier {
            height: t.height,
            levels: t.max_levels(),
        });
    debug!(room_height, usable, ?tier, "Selected height tier");
    tier
}

/// Largest depth per wall, each wall judged on its own clearance.
///
/// `None` clearance means unconstrained. Wall A is always unconstrained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthMax {
    #[serde(rename = "A")]
    pub a: Option<u32>,
    #[serde(rename = "B")]
    pub b: Option<u32>,
    #[serde(rename = "E")]
    pub e: Option<u32>,
}

impl DepthMax {
    pub fn get(&self, wall: Wall) -> Option<u32> {
        match wall {
            Wall::A => self.a,
            Wall::B => self.b,
            Wall::E => self.e,
        }
    }
}

pub fn max_depth_per_wall(clearance_b: Option<f64>, clearance_e: Option<f64>) -> DepthMax {
    let b = pick_max_le(&DEPTHS, clearance_b.unwrap_or(f64::INFINITY));
    let e = pick_max_le(&DEPTHS, clearance_e.unwrap_or(f64::INFINITY));
    let a = pick_max_le(&DEPTHS, f64::INFINITY);
    DepthMax { a, b, e }
}
