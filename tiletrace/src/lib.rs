//! Tile-parallel stochastic ray tracing kernels.
//!
//! The crate exposes the per-tile trace entry points through
//! [renderer::Renderer]: scene rebuild, camera ray generation, path trace,
//! shadow trace, and the two-phase escaped-ray environment resolution.
//! Scene data arrives as aligned binary buffers and is decoded into an
//! owned, validated [scene::SceneContext] once per scene version.

mod macros;

pub mod bvh;
pub mod camera;
pub mod environment;
pub mod hit;
pub mod integrators;
pub mod materials;
pub mod math;
pub mod renderer;
pub mod sampling;
pub mod scene;
pub mod serialization;
pub mod shapes;

/// Logs to stdout and `tiletrace.log`.
pub fn setup_logger(level: log::LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}:{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .chain(std::fs::File::create("tiletrace.log")?)
        .apply()?;
    Ok(())
}
