//! Room measurements as received from callers, and their validated form.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::MAX_MEASUREMENT;
use crate::error::InputError;

/// A wall that can carry shelves.
///
/// A is the back wall and the corner pivot, B the right wall, E the left wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Wall {
    A,
    B,
    E,
}

impl Wall {
    /// Build order used when concatenating segments.
    pub const BUILD_ORDER: [Wall; 3] = [Wall::B, Wall::A, Wall::E];

    pub fn as_str(self) -> &'static str {
        match self {
            Wall::A => "A",
            Wall::B => "B",
            Wall::E => "E",
        }
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Wall {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Wall::A),
            "B" | "b" => Ok(Wall::B),
            "E" | "e" => Ok(Wall::E),
            other => Err(InputError::UnknownWall(other.to_string())),
        }
    }
}

/// Room footprint: shelves on two walls around one corner, or three walls
/// around two corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    L,
    U,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::L => "L",
            Shape::U => "U",
        })
    }
}

impl FromStr for Shape {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" => Ok(Shape::L),
            "U" | "u" => Ok(Shape::U),
            other => Err(InputError::UnknownShape(other.to_string())),
        }
    }
}

/// Which of the shelving walls were requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WallSet {
    a: bool,
    b: bool,
    e: bool,
}

impl WallSet {
    pub fn all() -> Self {
        WallSet {
            a: true,
            b: true,
            e: true,
        }
    }

    pub fn contains(&self, wall: Wall) -> bool {
        match wall {
            Wall::A => self.a,
            Wall::B => self.b,
            Wall::E => self.e,
        }
    }

    pub fn insert(&mut self, wall: Wall) {
        match wall {
            Wall::A => self.a = true,
            Wall::B => self.b = true,
            Wall::E => self.e = true,
        }
    }

    pub fn len(&self) -> usize {
        [self.a, self.b, self.e].iter().filter(|x| **x).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Wall> for WallSet {
    fn from_iter<I: IntoIterator<Item = Wall>>(iter: I) -> Self {
        let mut set = WallSet::default();
        for w in iter {
            set.insert(w);
        }
        set
    }
}

/// Raw room record, all measurements in centimetres.
///
/// Missing fields default to 0 (and shape to `"L"`). Measurements may be JSON
/// numbers or numeric strings such as `"200"`. `walls` accepts either a JSON
/// list or a comma-separated string. Nothing is checked here; call
/// [`RoomInput::validate`] before planning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomInput {
    #[serde(rename = "A", deserialize_with = "number_or_numeric_str")]
    pub a: f64,
    #[serde(rename = "B", deserialize_with = "number_or_numeric_str")]
    pub b: f64,
    /// Clearance in front of wall B.
    #[serde(rename = "C", deserialize_with = "number_or_numeric_str")]
    pub c: f64,
    /// Clearance in front of wall E; 0 means wall E runs up to the door.
    #[serde(rename = "D", deserialize_with = "number_or_numeric_str")]
    pub d: f64,
    #[serde(rename = "E", deserialize_with = "number_or_numeric_str")]
    pub e: f64,
    #[serde(rename = "roomHeight", alias = "H", deserialize_with = "number_or_numeric_str")]
    pub room_height: f64,
    #[serde(deserialize_with = "walls_from_list_or_csv")]
    pub walls: Vec<String>,
    pub shape: String,
}

impl Default for RoomInput {
    fn default() -> Self {
        RoomInput {
            a: 0.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 0.0,
            room_height: 0.0,
            walls: Vec::new(),
            shape: "L".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WallsRepr {
    List(Vec<String>),
    Csv(String),
}

/// Split a comma-separated wall list, dropping empty items.
pub fn parse_wall_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn walls_from_list_or_csv<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<WallsRepr>::deserialize(de)? {
        Some(WallsRepr::List(v)) => v,
        Some(WallsRepr::Csv(s)) => parse_wall_list(&s),
        None => Vec::new(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Num(f64),
    Text(String),
}

fn number_or_numeric_str<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberRepr::deserialize(de)? {
        NumberRepr::Num(v) => Ok(v),
        NumberRepr::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| D::Error::custom(format!("expected a number, got {s:?}"))),
    }
}

impl RoomInput {
    /// Parse a room record from JSON. The record may sit at the top level or
    /// under an `"input"` key.
    pub fn from_json_str(txt: &str) -> serde_json::Result<Self> {
        let mut v: serde_json::Value = serde_json::from_str(txt)?;
        if let Some(inner) = v.get_mut("input").filter(|i| i.is_object()) {
            let inner = inner.take();
            return serde_json::from_value(inner);
        }
        serde_json::from_value(v)
    }

    /// Check measurements and tags, producing the typed room the planner uses.
    pub fn validate(&self) -> Result<Room, InputError> {
        let fields = [
            ("A", self.a),
            ("B", self.b),
            ("C", self.c),
            ("D", self.d),
            ("E", self.e),
            ("roomHeight", self.room_height),
        ];
        for (field, value) in fields {
            if !(0.0..=MAX_MEASUREMENT).contains(&value) {
                return Err(InputError::InvalidMeasurement { field, value });
            }
        }
        let walls = self
            .walls
            .iter()
            .map(|w| w.parse::<Wall>())
            .collect::<Result<WallSet, _>>()?;
        let shape = self.shape.parse::<Shape>()?;
        Ok(Room {
            a: self.a,
            b: self.b,
            c: self.c,
            d: self.d,
            e: self.e,
            room_height: self.room_height,
            walls,
            shape,
        })
    }
}

/// A validated room: non-negative finite measurements, known walls and shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Room {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub room_height: f64,
    pub walls: WallSet,
    pub shape: Shape,
}

impl Room {
    /// Raw length of a shelving wall.
    pub fn raw_len(&self, wall: Wall) -> f64 {
        match wall {
            Wall::A => self.a,
            Wall::B => self.b,
            Wall::E => self.e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let input: RoomInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input, RoomInput::default());
        assert_eq!(input.shape, "L");
    }

    #[test]
    fn test_walls_as_list_or_csv() {
        let list: RoomInput = serde_json::from_str(r#"{"walls":["A","B"]}"#).unwrap();
        let csv: RoomInput = serde_json::from_str(r#"{"walls":" A, B ,"}"#).unwrap();
        assert_eq!(list.walls, vec!["A", "B"]);
        assert_eq!(csv.walls, vec!["A", "B"]);
    }

    #[test]
    fn test_room_height_alias_and_nesting() {
        let input = RoomInput::from_json_str(r#"{"input":{"A":300,"H":280}}"#).unwrap();
        assert_eq!(input.a, 300.0);
        assert_eq!(input.room_height, 280.0);

        let flat = RoomInput::from_json_str(r#"{"roomHeight":250,"shape":"U"}"#).unwrap();
        assert_eq!(flat.room_height, 250.0);
        assert_eq!(flat.shape, "U");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let neg = RoomInput {
            b: -1.0,
            ..RoomInput::default()
        };
        assert_eq!(
            neg.validate(),
            Err(InputError::InvalidMeasurement {
                field: "B",
                value: -1.0
            })
        );

        let wall = RoomInput {
            walls: vec!["C".into()],
            ..RoomInput::default()
        };
        assert_eq!(wall.validate(), Err(InputError::UnknownWall("C".into())));

        let shape = RoomInput {
            shape: "T".into(),
            ..RoomInput::default()
        };
        assert_eq!(shape.validate(), Err(InputError::UnknownShape("T".into())));
    }

    #[test]
    fn test_measurements_accept_numeric_strings() {
        let input =
            RoomInput::from_json_str(r#"{"A":"200","B":" 150.5 ","H":"280","E":90}"#).unwrap();
        assert_eq!(input.a, 200.0);
        assert_eq!(input.b, 150.5);
        assert_eq!(input.room_height, 280.0);
        assert_eq!(input.e, 90.0);

        assert!(RoomInput::from_json_str(r#"{"A":"two metres"}"#).is_err());
        assert!(RoomInput::from_json_str(r#"{"A":true}"#).is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_measurements() {
        let input = RoomInput::from_json_str(r#"{"A":1e30,"roomHeight":300,"walls":["A"]}"#)
            .unwrap();
        assert_eq!(
            input.validate(),
            Err(InputError::InvalidMeasurement {
                field: "A",
                value: 1e30
            })
        );

        let at_limit = RoomInput {
            a: MAX_MEASUREMENT,
            ..RoomInput::default()
        };
        assert!(at_limit.validate().is_ok());

        let nan = RoomInput {
            room_height: f64::NAN,
            ..RoomInput::default()
        };
        assert!(matches!(
            nan.validate(),
            Err(InputError::InvalidMeasurement {
                field: "roomHeight",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_builds_wall_set() {
        let input = RoomInput {
            walls: vec!["E".into(), "A".into(), "A".into()],
            shape: "U".into(),
            ..RoomInput::default()
        };
        let room = input.validate().unwrap();
        assert!(room.walls.contains(Wall::A));
        assert!(room.walls.contains(Wall::E));
        assert!(!room.walls.contains(Wall::B));
        assert_eq!(room.walls.len(), 2);
        assert_eq!(room.shape, Shape::U);
    }
}
