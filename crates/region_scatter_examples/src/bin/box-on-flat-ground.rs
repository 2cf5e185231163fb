use glam::{Vec2, Vec3};
use region_scatter::prelude::*;
use region_scatter_examples::{init_tracing, Canvas, MarkerStyle, RenderConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // 40 m x 16 m box turned by 30 degrees, hovering 5 m above the ground.
    let region = BoxRegion::new(
        Transform::from_position_yaw(Vec3::new(0.0, 0.0, 500.0), 30.0),
        Vec3::new(2_000.0, 800.0, 0.0),
    );

    // Ground plus a raised, slightly tilted platform in the middle.
    let platform = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(600.0, 600.0, 0.0));
    let surfaces = StaticSurfaces::new()
        .with_patch(SurfacePatch::flat(
            SurfaceId(1),
            Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(5_000.0, 5_000.0, 0.0)),
            0.0,
        ))
        .with_patch(SurfacePatch::sloped(
            SurfaceId(2),
            platform,
            Vec3::new(0.0, 0.0, 120.0),
            Vec3::new(0.15, 0.0, 1.0),
        ));

    let request = PlacementRequest::new(Region::Box(region))
        .with_seed(2025)
        .with_density(0.3, 0.5)
        .with_rotation(0.0, 360.0)
        .with_snap(SnapMode::On);

    let engine = PlacementEngine::try_new(ScatterConfig::default())?;
    let mut sink = VecSink::new();
    let result = engine.generate_with_events(&request, &surfaces, &mut sink);
    for warning in sink.warnings() {
        info!("Warning: {warning}");
    }

    let tilted = result
        .placements
        .iter()
        .filter(|t| (t.rotation * WORLD_UP).z < 0.999)
        .count();
    info!(
        "Placed {} of {} attempts ({} on the platform).",
        result.len(),
        result.attempts,
        tilted
    );

    let mut canvas = Canvas::new(RenderConfig::centered((1000, 1000), Vec2::ZERO, 2_500.0));
    canvas.draw_box_region(&region, [90, 90, 110]);
    canvas.draw_footprint(&platform, [140, 110, 60]);
    canvas.draw_placements(
        &result.placements,
        MarkerStyle::dot([220, 230, 210], 4).with_heading(10),
    );
    canvas.save("box-on-flat-ground.png")?;

    Ok(())
}
