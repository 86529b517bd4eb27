use std::path::PathBuf;
use std::time::Duration;

use bevy::app::{AppExit, ScheduleRunnerPlugin};
use bevy::log::LogPlugin;
use bevy::prelude::*;

use voxelshare::{
    BlockType, ChunkMeshReady, ChunkUnloaded, InMemoryBlockStore, InputState, Observer,
    VoxelWorldPlugin, WorldConfig, WorldSet,
};

const DEFAULT_CONFIG: &str = "voxelshare.toml";
const RUN_FRAMES: u32 = 1200;

fn main() {
    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
    )
    .add_plugins(LogPlugin::default());

    // Logging is up from here on
    let config = load_config();

    let world = match VoxelWorldPlugin::new(config, InMemoryBlockStore::new()) {
        Ok(world) => world,
        Err(err) => {
            error!("Cannot create world: {}", err);
            return;
        }
    };

    app.add_plugins(world)
        .add_systems(Update, autopilot.before(WorldSet::Physics))
        .add_systems(Update, (report_meshes, stop_after_frames).after(WorldSet::Streaming))
        .run();
}

/// First argument, else `voxelshare.toml` if it exists, else defaults
fn load_config() -> WorldConfig {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    if !path.exists() {
        info!("No config at {}, using defaults", path.display());
        return WorldConfig::default();
    }
    match WorldConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            warn!("Ignoring {}: {}", path.display(), err);
            WorldConfig::default()
        }
    }
}

/// Stand-in for a device layer: walk forward while slowly turning, and
/// place then break a block every few seconds.
fn autopilot(mut input: ResMut<InputState>, mut frame: Local<u32>) {
    *frame += 1;

    input.forward = true;
    input.look_delta = Vec2::new(2.0, 0.0);
    input.jump = *frame % 90 == 0;
    input.selected = Some(BlockType::Stone);
    input.place_block = *frame % 240 == 120;
    input.break_block = *frame % 240 == 0;
}

#[derive(Default)]
struct MeshTotals {
    frames: u32,
    meshes: usize,
    quads: usize,
    unloaded: usize,
}

/// Renderer stand-in: tally what the world hands over
fn report_meshes(
    mut mesh_ready: EventReader<ChunkMeshReady>,
    mut unloaded: EventReader<ChunkUnloaded>,
    mut totals: Local<MeshTotals>,
) {
    totals.frames += 1;
    for event in mesh_ready.read() {
        totals.meshes += 1;
        totals.quads += event.mesh.as_ref().map_or(0, |mesh| mesh.quad_count());
    }
    totals.unloaded += unloaded.read().count();

    if totals.frames % 300 == 0 {
        info!(
            "{} meshes handed off ({} quads), {} chunks unloaded",
            totals.meshes, totals.quads, totals.unloaded
        );
    }
}

fn stop_after_frames(
    mut frame: Local<u32>,
    mut exit: EventWriter<AppExit>,
    observers: Query<&Observer>,
) {
    *frame += 1;
    if *frame < RUN_FRAMES {
        return;
    }
    if let Ok(observer) = observers.get_single() {
        info!("Finished {} frames, observer at {:?}", RUN_FRAMES, observer.eye);
    }
    exit.send(AppExit::Success);
}
