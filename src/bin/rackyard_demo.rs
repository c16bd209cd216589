//! # Rackyard Demo
//!
//! Loads warehouse records, frames the first stored pallet and logs where the
//! camera ends up.
//!
//! ## Usage:
//! ```bash
//! cargo run --bin rackyard-demo -- [records.json] [config.json]
//! RUST_LOG=debug cargo run --bin rackyard-demo
//! ```

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use rackyard::location::encode;
use rackyard::prelude::*;

const SAMPLE_RECORDS: &str = include_str!("../../demos/sample_records.json");
const FRAME_TIME: f32 = 1.0 / 60.0;
const MAX_FRAMES: usize = 1200;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let records_path = args.next();
    let config = match args.next() {
        Some(path) => WarehouseConfig::from_path(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => WarehouseConfig::default(),
    };

    let store = WarehouseStore::init(config).context("invalid warehouse layout")?;
    let mut session = WarehouseSession::new(store);

    let state = match &records_path {
        Some(path) => pollster::block_on(session.load(&JsonFileSource::new(path))).clone(),
        None => {
            let source = StaticSource::from_json(SAMPLE_RECORDS)
                .context("built-in sample records are malformed")?;
            pollster::block_on(session.load(&source)).clone()
        }
    };
    if let LoadState::Failed(reason) = state {
        bail!("warehouse data unavailable: {reason}");
    }

    let store = session.store();
    let footprint = store.footprint();
    log::info!(
        "warehouse {}: {} cells, floor {:.2} x {:.2}",
        store.active_warehouse(),
        store.records().len(),
        footprint.width,
        footprint.depth
    );

    let Some(first) = store.records().iter().find(|r| r.present) else {
        log::warn!("no stored pallets in warehouse {}", store.active_warehouse());
        return Ok(());
    };
    let target = BoxRef::main(first.grid_coordinate);
    let code = encode(store.active_warehouse(), target.coord)?;
    log::info!("focusing {code} ({})", first.content);

    session.focus(target)?;

    let mut now = Instant::now();
    let mut frames = 0;
    let frame = loop {
        now += Duration::from_secs_f32(FRAME_TIME);
        let frame = session.frame(now, FRAME_TIME);
        frames += 1;
        if frame.phase == PlannerPhase::Idle || frames >= MAX_FRAMES {
            break frame;
        }
    };

    log::info!(
        "camera settled after {frames} frames: eye ({:.2}, {:.2}, {:.2}) looking at ({:.2}, {:.2}, {:.2})",
        frame.pose.eye.x,
        frame.pose.eye.y,
        frame.pose.eye.z,
        frame.pose.look_at.x,
        frame.pose.look_at.y,
        frame.pose.look_at.z
    );
    log::info!("{} pallet instances to draw", frame.instances.len());

    session.set_camera_mode(CameraMode::FirstPerson);
    let frame = session.frame(now, FRAME_TIME);
    log::info!(
        "first-person view draws {} pallet instances",
        frame.instances.len()
    );

    Ok(())
}
