// src/main.rs
// Entry point for Firebot: loads the calibration and a replay script, wires
// the replay robot and runs the tick loop.
//
// Usage: firebot [CONFIG_YAML] [SCRIPT_YAML] [MAX_TICKS]
// Without arguments config/firebot.yaml is used when present.

use std::error::Error;
use std::path::Path;

use firebot::{Firebot, FirebotConfig, ReplayScript};
use log::{error, info};

const DEFAULT_CONFIG: &str = "config/firebot.yaml";
const DEFAULT_SCRIPT: &str = "scenarios/demo.yaml";
const DEFAULT_MAX_TICKS: u64 = 40;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let mut args = std::env::args().skip(1);

    let config_path = args
        .next()
        .or_else(|| Path::new(DEFAULT_CONFIG).exists().then(|| DEFAULT_CONFIG.to_string()));
    let config = match config_path {
        Some(path) => {
            info!("Loading configuration from {}", path);
            FirebotConfig::load(&path)?
        }
        None => FirebotConfig::default(),
    };

    let script_path = args.next().unwrap_or_else(|| DEFAULT_SCRIPT.to_string());
    let script = ReplayScript::load(&script_path).map_err(|e| {
        error!("Cannot read replay script {}: {}", script_path, e);
        e
    })?;

    let max_ticks = match args.next() {
        Some(raw) => raw.parse::<u64>()?,
        None => DEFAULT_MAX_TICKS,
    };

    let (robot, log) = script.build();
    let mut firebot = Firebot::new(config, robot);
    firebot.run(Some(max_ticks));

    let log = log.borrow();
    let context = firebot.context();
    info!(
        "Final state {} after {} ticks, {} ms of maneuvers",
        firebot.state(),
        firebot.ticks(),
        log.elapsed_ms
    );
    info!(
        "Rooms visited {}, flame found {}, candle lit {}, lines crossed home {}",
        context.current_room, context.flame_detected_in_room, context.flame_still_lit, context.lines_crossed
    );
    Ok(())
}
