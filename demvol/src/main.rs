mod error;
mod options;
mod progress;

use chrono::Local;
use clap::Parser;
use dem::Raster;
use error::DemvolError;
use log::info;
use options::Cli;
use std::process::ExitCode;
use volume::{Estimate, Format, Report};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), DemvolError> {
    let started = Local::now();

    // The raster file is closed once `open` returns; only the grid
    // and transform are kept.
    let Raster {
        grid, transform, ..
    } = dem::open(&cli.dem)?;
    let (pixel_width, pixel_height) = (transform.pixel_width(), transform.pixel_height());
    info!(
        "pixel size {pixel_width} x {pixel_height}, origin {:?}",
        transform.origin()
    );

    let pb = progress::bar(
        format!("Scanning {}", cli.dem.display()),
        grid.len() as u64,
        cli.quiet,
    );
    let estimate = Estimate::builder()
        .floor(cli.floor.meters)
        .pixel_size(pixel_width, pixel_height)
        .build_with_progress(&grid, |n| pb.inc(n))?;
    pb.finish_and_clear();

    let finished = Local::now();
    let report = Report::new(cli.dem.display().to_string(), started, finished, &estimate)?
        .with_floor_text(&cli.floor.text);

    let format = cli.format();
    let rendered = report.render(format)?;
    match format {
        Format::Text => println!("{rendered}"),
        Format::Json => print!("{rendered}"),
    }

    if let Some(path) = cli.output() {
        report
            .append_to(path, format)
            .map_err(|e| DemvolError::Output(path.to_owned(), e))?;
        info!("appended report to {}", path.display());
    }

    Ok(())
}
