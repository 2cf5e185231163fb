use glam::{Vec2, Vec3};
use region_scatter::prelude::*;
use region_scatter_examples::{init_tracing, Canvas, MarkerStyle, RenderConfig};
use tracing::{debug, info};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // A small room: floor, three tables and a rug.
    let floor = Aabb::new(Vec3::new(-1_500.0, -1_500.0, -10.0), Vec3::new(1_500.0, 1_500.0, 0.0));
    let tables = [
        Aabb::new(Vec3::new(-1_200.0, -1_000.0, 0.0), Vec3::new(-600.0, -600.0, 80.0)),
        Aabb::new(Vec3::new(200.0, -300.0, 0.0), Vec3::new(1_000.0, 300.0, 80.0)),
        Aabb::new(Vec3::new(-800.0, 600.0, 0.0), Vec3::new(-200.0, 1_200.0, 75.0)),
    ];
    // A tray lying on the middle table rejects candidates that land on it.
    let tray = Aabb::new(Vec3::new(400.0, -100.0, 80.0), Vec3::new(700.0, 100.0, 80.5));

    let mut catalog = vec![SurfaceActor::new(SurfaceId(1), "SM_Floor", floor).with_tags(["floor"])];
    for (i, bounds) in tables.iter().enumerate() {
        catalog.push(
            SurfaceActor::new(SurfaceId(10 + i as u64), format!("SM_Table_{i:02}"), *bounds)
                .with_tags(["furniture", "table"]),
        );
    }

    let mut surfaces = StaticSurfaces::new().with_patch(SurfacePatch::flat(SurfaceId(1), floor, 0.0));
    for actor in &catalog[1..] {
        surfaces.push(SurfacePatch::flat(actor.id, actor.bounds, actor.bounds.max.z));
    }
    surfaces.push(SurfacePatch::flat(SurfaceId(99), tray, tray.max.z));

    let selector = SurfaceSelector::new(MatchBy::NameAndTags)
        .with_name_pattern("Table")
        .with_tags(["table"]);
    let region = selector.actor_set(&catalog);

    let (density, messages) = DensityRange::new(2.0, 12.0).clamped(0.0, 10.0);
    for message in &messages {
        info!("{message}");
    }

    let request = PlacementRequest::new(region)
        .with_seed(31)
        .with_density(density.min, density.max.min(6.0))
        .with_rotation(0.0, 90.0);
    let engine = PlacementEngine::default();
    let mut sink = VecSink::new();
    let mut log_rejections = FnSink::new(|event| {
        if let ScatterEvent::CandidateRejected { index, position, reason } = event {
            debug!("Candidate {index} at {position} rejected: {reason:?}.");
        }
    });
    let result = {
        let sinks: Vec<&mut dyn EventSink> = vec![&mut sink, &mut log_rejections];
        engine.generate_with_events(&request, &surfaces, &mut MultiSink::with_sinks(sinks))
    };
    info!(
        "Placed {} items on {} tables; {} rejected, {} warnings.",
        result.len(),
        tables.len(),
        result.rejected,
        sink.warnings().len()
    );

    let mut canvas = Canvas::new(RenderConfig::centered((900, 900), Vec2::ZERO, 1_600.0));
    canvas.draw_footprint(&floor, [70, 70, 70]);
    for bounds in &tables {
        canvas.draw_footprint(bounds, [150, 120, 80]);
    }
    canvas.draw_footprint(&tray, [200, 80, 80]);
    canvas.draw_placements(&result.placements, MarkerStyle::dot([120, 200, 240], 3).with_heading(8));
    canvas.save("actor-footprints.png")?;

    Ok(())
}
