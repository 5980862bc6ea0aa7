mod cli;
mod raster;
mod sheet;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use blueprint_core::{Language, build_plan_svg};
use clap::Parser;
use serde::Serialize;
use shelf_core::{Plan, PlanEnvelope, Room, RoomInput, plan_request, plan_shelves};
use tracing::{Level, info};

use crate::cli::{Cli, Commands, ImageArgs, RoomArgs};

#[derive(Serialize)]
struct PlanReport<'a> {
    input: &'a RoomInput,
    result: &'a PlanEnvelope,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Plan { room } => {
            let input = room.to_input()?;
            let result = plan_request(&input);
            let report = PlanReport {
                input: &input,
                result: &result,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !result.ok {
                std::process::exit(1);
            }
        }
        Commands::Render {
            room,
            output,
            image,
        } => {
            let (room, plan) = plan_room(&room)?;
            let (svg, _w, _h) = build_plan_svg(&room, &plan, Language::from_tag(&image.lang));
            match extension(&output).as_deref() {
                Some("svg") => write_output(&output, svg.as_bytes())?,
                Some("png") => {
                    let png = raster::rasterize(&svg, image.width, image.height)?.to_png()?;
                    write_output(&output, &png)?;
                }
                _ => bail!(
                    "Unsupported output format for {} (expected .svg or .png)",
                    output.display()
                ),
            }
        }
        Commands::Sheet {
            room,
            output,
            title,
            image,
        } => {
            let (room, plan) = plan_room(&room)?;
            let pdf = render_sheet(&room, &plan, title.as_deref(), &image)?;
            write_output(&output, &pdf)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn plan_room(args: &RoomArgs) -> Result<(Room, Plan)> {
    let room = args.to_input()?.validate()?;
    let plan = plan_shelves(&room)?;
    Ok((room, plan))
}

fn render_sheet(room: &Room, plan: &Plan, title: Option<&str>, image: &ImageArgs) -> Result<Vec<u8>> {
    let lang = Language::from_tag(&image.lang);
    let (svg, _w, _h) = build_plan_svg(room, plan, lang);
    let raster = raster::rasterize(&svg, image.width, image.height)?;
    let title = title.unwrap_or(lang.sheet_title());
    Ok(sheet::build_sheet(&raster, title)?)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "Wrote output");
    Ok(())
}
