//! Plan assembly: tier, depths, lengths and segments for one room.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::allocate::{allocate_lengths, reconcile_depths};
use crate::catalog::{
    CEILING_CLEARANCE, DepthMax, MAX_LEN, Tier, max_depth_per_wall, pick_tier, round1,
};
use crate::error::{PlanError, PlanResult};
use crate::input::{Room, RoomInput, Wall};
use crate::pack::pack_lengths;

/// One physical shelf unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub wall: Wall,
    pub length: f64,
    pub depth: u32,
    pub height: u32,
    pub levels: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(rename = "totalLen")]
    pub total_len: f64,
    pub pieces: usize,
    /// Segments shorter than a full board, i.e. boards that need a cut.
    pub cuts: usize,
}

/// The choices behind a plan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Largest depth each wall allows on its own, before corner reconciliation.
    #[serde(rename = "depthMax")]
    pub depth_max: DepthMax,
    pub hl: Tier,
    #[serde(rename = "lenA")]
    pub len_a: f64,
    #[serde(rename = "lenB")]
    pub len_b: f64,
    #[serde(rename = "lenE")]
    pub len_e: f64,
}

/// Segments in build order (B, A, E) with their totals and metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub plan: Vec<Segment>,
    pub totals: Totals,
    pub meta: Meta,
}

impl Plan {
    /// Summed planned length on one wall.
    pub fn wall_total(&self, wall: Wall) -> f64 {
        self.segments_on(wall).map(|s| s.length).sum()
    }

    /// Depth used on a wall, if it carries any segment.
    pub fn wall_depth(&self, wall: Wall) -> Option<u32> {
        self.segments_on(wall).next().map(|s| s.depth)
    }

    pub fn has_wall(&self, wall: Wall) -> bool {
        self.segments_on(wall).next().is_some()
    }

    pub fn segments_on(&self, wall: Wall) -> impl Iterator<Item = &Segment> {
        self.plan.iter().filter(move |s| s.wall == wall)
    }
}

/// Lay out shelves for a validated room.
pub fn plan_shelves(room: &Room) -> PlanResult<Plan> {
    let Some(hl) = pick_tier(room.room_height) else {
        let err = PlanError::NoFeasibleTier {
            usable: room.room_height - CEILING_CLEARANCE,
        };
        warn!(%err, "Planning failed");
        return Err(err);
    };

    let depth_max = max_depth_per_wall(Some(room.c), Some(room.d));
    let depths = reconcile_depths(room, depth_max);
    let lengths = allocate_lengths(room, &depths);

    let mut plan = Vec::new();
    for wall in Wall::BUILD_ORDER {
        if !room.walls.contains(wall) {
            continue;
        }
        let Some(depth) = depths.get(wall) else {
            let err = PlanError::NoFeasibleDepth { wall };
            warn!(%err, "Planning failed");
            return Err(err);
        };
        plan.extend(pack_lengths(lengths.get(wall)).into_iter().map(|length| Segment {
            wall,
            length,
            depth,
            height: hl.height,
            levels: hl.levels,
        }));
    }

    let totals = Totals {
        total_len: round1(plan.iter().map(|s| s.length).sum()),
        pieces: plan.len(),
        cuts: plan.iter().filter(|s| s.length < MAX_LEN).count(),
    };
    let meta = Meta {
        depth_max,
        hl,
        len_a: round1(lengths.a),
        len_b: round1(lengths.b),
        len_e: round1(lengths.e),
    };
    info!(
        pieces = totals.pieces,
        total_len = totals.total_len,
        cuts = totals.cuts,
        height = hl.height,
        "Shelf plan assembled"
    );
    Ok(Plan { plan, totals, meta })
}

/// Wire form of a planning outcome: `{"ok":true,...plan}` or
/// `{"ok":false,"error":"..."}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanEnvelope {
    pub ok: bool,
    #[serde(flatten)]
    pub plan: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlanEnvelope {
    pub fn failure(message: impl Into<String>) -> Self {
        PlanEnvelope {
            ok: false,
            plan: None,
            error: Some(message.into()),
        }
    }

    pub fn into_result(self) -> Result<Plan, String> {
        match (self.ok, self.plan) {
            (true, Some(plan)) => Ok(plan),
            _ => Err(self.error.unwrap_or_else(|| "unknown planning error".to_string())),
        }
    }
}

impl From<PlanResult<Plan>> for PlanEnvelope {
    fn from(res: PlanResult<Plan>) -> Self {
        match res {
            Ok(plan) => PlanEnvelope {
                ok: true,
                plan: Some(plan),
                error: None,
            },
            Err(e) => PlanEnvelope::failure(e.to_string()),
        }
    }
}

/// Validate a raw room record and plan it, folding every failure into the
/// envelope.
pub fn plan_request(input: &RoomInput) -> PlanEnvelope {
    match input.validate() {
        Ok(room) => plan_shelves(&room).into(),
        Err(e) => PlanEnvelope::failure(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Shape, WallSet};

    fn l_room() -> Room {
        Room {
            a: 200.0,
            b: 150.0,
            c: 100.0,
            d: 0.0,
            e: 0.0,
            room_height: 280.0,
            walls: [Wall::A, Wall::B].into_iter().collect::<WallSet>(),
            shape: Shape::L,
        }
    }

    #[test]
    fn test_segments_follow_build_order() {
        let plan = plan_shelves(&l_room()).unwrap();
        let walls: Vec<Wall> = plan.plan.iter().map(|s| s.wall).collect();
        assert_eq!(walls, vec![Wall::B, Wall::A]);
        assert_eq!(plan.plan[0].length, 150.0);
        assert_eq!(plan.plan[1].length, 132.0);
        assert!(plan.plan.iter().all(|s| s.depth == 68 && s.height == 200 && s.levels == 4));
        assert_eq!(plan.totals.total_len, 282.0);
        assert_eq!(plan.totals.pieces, 2);
        assert_eq!(plan.totals.cuts, 2);
    }

    #[test]
    fn test_tier_gate_runs_first() {
        // Wall E is infeasible too, but the tier failure wins.
        let room = Room {
            room_height: 200.0,
            walls: WallSet::all(),
            ..l_room()
        };
        assert_eq!(
            plan_shelves(&room),
            Err(PlanError::NoFeasibleTier { usable: 160.0 })
        );
    }

    #[test]
    fn test_missing_depth_names_wall() {
        let room = Room {
            walls: WallSet::all(),
            ..l_room()
        };
        assert_eq!(
            plan_shelves(&room),
            Err(PlanError::NoFeasibleDepth { wall: Wall::E })
        );

        let room = Room {
            c: 20.0,
            ..l_room()
        };
        assert_eq!(
            plan_shelves(&room),
            Err(PlanError::NoFeasibleDepth { wall: Wall::B })
        );
    }

    #[test]
    fn test_unselected_infeasible_wall_is_ignored() {
        let room = Room {
            c: 0.0,
            walls: [Wall::A].into_iter().collect(),
            ..l_room()
        };
        let plan = plan_shelves(&room).unwrap();
        assert_eq!(plan.meta.depth_max.b, None);
        assert_eq!(plan.plan.len(), 1);
        assert_eq!(plan.plan[0].length, 200.0);
    }

    #[test]
    fn test_no_walls_gives_empty_plan() {
        let room = Room {
            walls: WallSet::default(),
            ..l_room()
        };
        let plan = plan_shelves(&room).unwrap();
        assert!(plan.plan.is_empty());
        assert_eq!(plan.totals.total_len, 0.0);
        assert_eq!(plan.totals.pieces, 0);
    }

    #[test]
    fn test_wall_helpers() {
        let plan = plan_shelves(&l_room()).unwrap();
        assert_eq!(plan.wall_total(Wall::B), 150.0);
        assert_eq!(plan.wall_depth(Wall::A), Some(68));
        assert!(!plan.has_wall(Wall::E));
        assert_eq!(plan.wall_depth(Wall::E), None);
    }

    #[test]
    fn test_envelope_json_shape() {
        let env = PlanEnvelope::from(plan_shelves(&l_room()));
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["ok"], true);
        assert_eq!(v["plan"][0]["wall"], "B");
        assert_eq!(v["totals"]["totalLen"], 282.0);
        assert_eq!(v["meta"]["hl"]["height"], 200);
        assert_eq!(v["meta"]["depthMax"]["E"], serde_json::Value::Null);
        assert_eq!(v["meta"]["lenA"], 132.0);
        assert!(v.get("error").is_none());

        let back: PlanEnvelope = serde_json::from_value(v).unwrap();
        assert_eq!(back, env);
    }

    #[test]
    fn test_failure_envelope() {
        let input = RoomInput {
            room_height: 100.0,
            ..RoomInput::default()
        };
        let env = plan_request(&input);
        assert!(!env.ok);
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["ok"], false);
        assert!(v["error"].as_str().unwrap().contains("ceiling clearance"));
        assert!(v.get("plan").is_none());
        assert!(env.into_result().is_err());
    }

    #[test]
    fn test_invalid_input_becomes_failure() {
        let input = RoomInput {
            shape: "X".into(),
            room_height: 300.0,
            ..RoomInput::default()
        };
        let env = plan_request(&input);
        assert!(!env.ok);
        assert!(env.error.unwrap().contains("unknown shape"));
    }
}
