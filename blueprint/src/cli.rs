use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use shelf_core::RoomInput;
use shelf_core::input::parse_wall_list;

#[derive(Parser)]
#[command(name = "blueprint")]
#[command(author, version, about)]
#[command(long_about = "Plan shelving for a room and draw the result.\n\n\
    Walls A (back), B (right) and E (left) can carry shelves; C and D are the\n\
    clearances in front of B and E. All measurements are in centimetres.\n\n\
    Examples:\n  \
    blueprint plan room.json                         Print the plan as JSON\n  \
    blueprint plan -a 200 -b 150 -c 100 -H 280 --walls A,B\n  \
    blueprint render room.json -o plan.png           Draw the plan\n  \
    blueprint sheet room.json -o plan.pdf            A4 sheet with the drawing")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the shelf plan and print it as JSON
    Plan {
        #[command(flatten)]
        room: RoomArgs,
    },

    /// Draw the plan as SVG or PNG (chosen by the output extension)
    Render {
        #[command(flatten)]
        room: RoomArgs,

        /// Output file (.svg or .png)
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        image: ImageArgs,
    },

    /// Write an A4 PDF sheet with a titled banner and the plan drawing
    Sheet {
        #[command(flatten)]
        room: RoomArgs,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Banner title (defaults to the language's "proposed layout")
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        image: ImageArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ImageArgs {
    /// Raster width in pixels
    #[arg(long, default_value = "1200")]
    pub width: u32,

    /// Raster height in pixels
    #[arg(long, default_value = "900")]
    pub height: u32,

    /// Language for captions (en, es)
    #[arg(long, default_value = "en")]
    pub lang: String,
}

/// Room measurements from a JSON file, individual flags, or both (flags win).
#[derive(Args, Debug, Clone, Default)]
pub struct RoomArgs {
    /// Room JSON file, `-` for stdin
    pub input: Option<PathBuf>,

    /// Back wall A length
    #[arg(short = 'a', long = "wall-a", value_name = "CM")]
    pub a: Option<f64>,

    /// Right wall B length
    #[arg(short = 'b', long = "wall-b", value_name = "CM")]
    pub b: Option<f64>,

    /// Clearance C in front of wall B
    #[arg(short = 'c', long = "clearance-c", value_name = "CM")]
    pub c: Option<f64>,

    /// Clearance D in front of wall E (0 = door side)
    #[arg(short = 'd', long = "clearance-d", value_name = "CM")]
    pub d: Option<f64>,

    /// Left wall E length
    #[arg(short = 'e', long = "wall-e", value_name = "CM")]
    pub e: Option<f64>,

    /// Room height
    #[arg(short = 'H', long = "room-height", value_name = "CM")]
    pub room_height: Option<f64>,

    /// Walls to shelve, comma separated (A,B,E)
    #[arg(short = 'w', long)]
    pub walls: Option<String>,

    /// Room shape: L or U
    #[arg(short = 's', long)]
    pub shape: Option<String>,
}

impl RoomArgs {
    pub fn to_input(&self) -> Result<RoomInput> {
        let mut input = match &self.input {
            Some(path) => {
                let txt = if path.as_os_str() == "-" {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read room JSON from stdin")?;
                    buf
                } else {
                    std::fs::read_to_string(path)
                        .with_context(|| format!("Failed to read {}", path.display()))?
                };
                RoomInput::from_json_str(&txt)
                    .with_context(|| format!("Invalid room JSON in {}", path.display()))?
            }
            None => RoomInput::default(),
        };
        self.apply_overrides(&mut input);
        Ok(input)
    }

    fn apply_overrides(&self, input: &mut RoomInput) {
        let fields = [
            (self.a, &mut input.a),
            (self.b, &mut input.b),
            (self.c, &mut input.c),
            (self.d, &mut input.d),
            (self.e, &mut input.e),
            (self.room_height, &mut input.room_height),
        ];
        for (flag, slot) in fields {
            if let Some(v) = flag {
                *slot = v;
            }
        }
        if let Some(w) = &self.walls {
            input.walls = parse_wall_list(w);
        }
        if let Some(s) = &self.shape {
            input.shape = s.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_from_flags() {
        let cli = Cli::try_parse_from([
            "blueprint", "plan", "-a", "200", "-b", "150", "-c", "100", "-H", "280", "--walls",
            "A,B", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Plan { room } = cli.command else {
            panic!("expected plan");
        };
        let input = room.to_input().unwrap();
        assert_eq!(input.a, 200.0);
        assert_eq!(input.room_height, 280.0);
        assert_eq!(input.walls, vec!["A", "B"]);
        assert_eq!(input.shape, "L");
        assert_eq!(input.e, 0.0);
    }

    #[test]
    fn test_render_defaults() {
        let cli =
            Cli::try_parse_from(["blueprint", "render", "room.json", "-o", "out.png"]).unwrap();
        let Commands::Render { room, output, image } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(room.input, Some(PathBuf::from("room.json")));
        assert_eq!(output, PathBuf::from("out.png"));
        assert_eq!((image.width, image.height), (1200, 900));
        assert_eq!(image.lang, "en");
    }

    #[test]
    fn test_sheet_requires_output() {
        assert!(Cli::try_parse_from(["blueprint", "sheet", "room.json"]).is_err());
    }

    #[test]
    fn test_flags_override_file_values() {
        let mut input = RoomInput {
            a: 500.0,
            shape: "U".into(),
            ..RoomInput::default()
        };
        let args = RoomArgs {
            a: Some(250.0),
            walls: Some("A, E".into()),
            ..RoomArgs::default()
        };
        args.apply_overrides(&mut input);
        assert_eq!(input.a, 250.0);
        assert_eq!(input.shape, "U");
        assert_eq!(input.walls, vec!["A", "E"]);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let args = RoomArgs {
            input: Some(PathBuf::from("/nonexistent/room.json")),
            ..RoomArgs::default()
        };
        let err = args.to_input().unwrap_err();
        assert!(format!("{err}").contains("/nonexistent/room.json"));
    }
}
