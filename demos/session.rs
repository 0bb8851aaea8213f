//! Scripted clay session.
//!
//! Usage:
//! ```text
//! cargo run --example session
//! RUST_LOG=clayform=trace cargo run --example session
//! ```

use clayform::brush::{BlobTool, BrushConfig, ClayColor, InputModality, SculptTool};
use clayform::math::Point3;
use clayform::session::{ClaySession, SessionParams};

fn main() -> clayform::Result<()> {
    // Default: WARN for everything, INFO for clayform.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("session=info".parse().unwrap_or_default())
        .add_directive("clayform=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut session = ClaySession::new(SessionParams::default().with_seed(42))?;
    println!(
        "start: {} particles (max {}), {} vertices",
        session.particle_count(),
        session.max_particles(),
        session.vertex_count()
    );

    // Drag an add stroke across the top of the lump.
    session.set_tool_by_name("add")?;
    for step in 0..6 {
        let x = -15.0 + 6.0 * f64::from(step);
        session.interact(Point3::new(x, 0.0, 24.0), InputModality::Pointer);
    }
    session.end_stroke();
    println!("after stroke: {} particles", session.particle_count());

    session.set_brush(BrushConfig::new(BlobTool::StampSphere, 8.0, 0.1));
    let outcome = session.interact(Point3::new(0.0, 28.0, 0.0), InputModality::Pointer);
    println!("stamp: {outcome:?}");

    session.set_brush(BrushConfig::new(BlobTool::Remove, 15.0, 0.1));
    let outcome = session.interact(Point3::new(20.0, 0.0, 0.0), InputModality::Touch);
    println!("remove: {outcome:?}");

    session.set_brush(BrushConfig::new(SculptTool::Pull, 0.4, 0.05));
    let outcome = session.interact(Point3::new(0.0, 0.0, 2.0), InputModality::Pointer);
    println!("pull: {outcome:?}");

    session.set_color(ClayColor::from_rgb(0xb0, 0x6a, 0x3b));
    let moved: usize = (0..30).map(|_| session.tick()).sum();
    println!("ambient: {moved} elements nudged over 30 frames");

    session.reset();
    println!(
        "reset: {} particles, color #{:06x}",
        session.particle_count(),
        session.color().hex()
    );
    Ok(())
}
