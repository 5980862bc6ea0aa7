//! Shelf layout planning for L- and U-shaped rooms.
//!
//! [`plan_shelves`] turns a validated [`Room`] into a [`Plan`]: the tallest
//! height tier under the ceiling clearance, the deepest shelf each wall's
//! clearance allows, usable run lengths after corners and the door, and each
//! run cut into boards of at most [`catalog::MAX_LEN`] cm.
//!
//! ```
//! use shelf_core::{RoomInput, plan_request};
//!
//! let input = RoomInput::from_json_str(
//!     r#"{"A":200,"B":150,"C":100,"roomHeight":280,"walls":["A","B"]}"#,
//! ).unwrap();
//! let envelope = plan_request(&input);
//! assert!(envelope.ok);
//! ```

pub mod allocate;
pub mod catalog;
pub mod error;
pub mod input;
pub mod pack;
pub mod plan;

pub use catalog::{DepthMax, Tier};
pub use error::{InputError, PlanError, PlanResult};
pub use input::{Room, RoomInput, Shape, Wall, WallSet};
pub use plan::{Meta, Plan, PlanEnvelope, Segment, Totals, plan_request, plan_shelves};
