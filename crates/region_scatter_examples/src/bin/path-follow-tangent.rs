use glam::{Vec2, Vec3};
use region_scatter::prelude::*;
use region_scatter_examples::{init_tracing, Canvas, MarkerStyle, RenderConfig};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // S-shaped road built from Hermite control points.
    let points = vec![
        SplinePoint::curve(Vec3::new(-4_000.0, -2_000.0, 0.0), Vec3::new(4_000.0, 0.0, 0.0)),
        SplinePoint::curve(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2_000.0, 3_000.0, 0.0)),
        SplinePoint::curve(Vec3::new(4_000.0, 2_000.0, 0.0), Vec3::new(4_000.0, 0.0, 0.0)),
    ];
    let road = Spline::new(points, false);
    info!("Road length: {:.1} m.", road.length() / 100.0);

    let engine = PlacementEngine::default();
    let no_surface = |_: Vec3, _: f32| -> Option<SurfaceHit> { None };

    // Random bushes along the road, turned with it plus a little jitter.
    let request = PlacementRequest::new(Region::spline(road.clone()))
        .with_seed(7)
        .with_density(0.4, 0.6)
        .with_rotation(-15.0, 15.0)
        .with_follow_tangent(true);
    let bushes = engine.generate(&request, &no_surface);

    // Lamp posts every 10 m.
    let lamps = engine.generate_fixed_along_path(&road, DEFAULT_FIXED_SPACING);
    info!("Placed {} bushes and {} lamps.", bushes.len(), lamps.len());

    let mut canvas = Canvas::new(
        RenderConfig::centered((1200, 1200), Vec2::ZERO, 5_000.0).with_background([30, 34, 30]),
    );
    canvas.draw_path(&road, 400, [120, 120, 120]);
    canvas.draw_placements(
        &bushes.placements,
        MarkerStyle::dot([90, 200, 90], 3).with_heading(12),
    );
    canvas.draw_placements(
        &lamps.placements,
        MarkerStyle::dot([250, 220, 120], 6).with_heading(18),
    );
    canvas.save("path-follow-tangent.png")?;

    Ok(())
}
