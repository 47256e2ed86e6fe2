use std::env;
use std::error::Error;

use line_follower_app::{SimConfig, Simulation, track};
use log::{LevelFilter, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

const LOG_ENV: &str = "LINE_FOLLOWER_LOG";

fn log_level() -> LevelFilter {
    env::var(LOG_ENV)
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

fn main() -> Result<(), Box<dyn Error>> {
    TermLogger::init(log_level(), Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;

    let config = match env::args().nth(1) {
        Some(path) => {
            info!("loading configuration from {path}");
            SimConfig::from_json_file(&path)?
        }
        None => SimConfig::default(),
    };
    let run = config.run;

    let map = track::ring_through(config.map, config.start.position(), 6.0);
    let mut sim = Simulation::new(config)?;
    let mut report = sim.report();

    for _ in 0..run.max_ticks {
        report = sim.step(&map, run.dt);
        if run.report_every > 0 && report.tick % run.report_every == 0 {
            info!(
                "tick {}: pose=({:.2}, {:.2}, {:.3}) error={:.2} correction={:.2}",
                report.tick,
                report.pose.x,
                report.pose.y,
                report.pose.heading,
                report.error,
                report.correction
            );
        }
        if report.status.is_terminated() {
            break;
        }
    }

    info!("finished after {} ticks ({:.2} s)", report.tick, report.t);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
