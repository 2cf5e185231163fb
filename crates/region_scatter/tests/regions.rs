use glam::Vec3;
use region_scatter::prelude::*;

fn no_surface(_: Vec3, _: f32) -> Option<SurfaceHit> {
    None
}

/// Two legs of 10 m and 30 m. Equal parameter spans, unequal lengths.
fn l_shaped_path() -> Spline {
    Spline::polyline(
        [
            Vec3::ZERO,
            Vec3::new(1_000.0, 0.0, 0.0),
            Vec3::new(1_000.0, 3_000.0, 0.0),
        ],
        false,
    )
}

#[test]
fn spline_samples_are_uniform_in_arc_length() {
    let engine = PlacementEngine::default();
    let region = Region::spline(l_shaped_path());
    let mut on_first_leg = 0usize;
    let mut total = 0usize;
    for seed in 0..100 {
        let request = PlacementRequest::new(region.clone())
            .with_seed(seed)
            .with_density(1.0, 1.0);
        let result = engine.generate(&request, &no_surface);
        assert_eq!(result.len(), 40);
        total += result.len();
        on_first_leg += result
            .placements
            .iter()
            .filter(|t| t.position.y.abs() < 1e-3)
            .count();
    }
    let fraction = on_first_leg as f32 / total as f32;
    assert!((fraction - 0.25).abs() < 0.03, "fraction on first leg: {fraction}");
}

#[test]
fn straight_curve_is_sampled_uniformly_along_its_length() {
    // Uneven tangents: half of the curve parameter covers less than a third of the length.
    let path = Spline::new(
        vec![
            SplinePoint::curve(Vec3::ZERO, Vec3::new(500.0, 0.0, 0.0)),
            SplinePoint::curve(Vec3::new(2_000.0, 0.0, 0.0), Vec3::new(3_500.0, 0.0, 0.0)),
        ],
        false,
    );
    let engine = PlacementEngine::default();
    let region = Region::spline(path);
    let mut buckets = [0usize; 4];
    for seed in 0..200 {
        let request = PlacementRequest::new(region.clone())
            .with_seed(seed)
            .with_density(1.0, 1.0);
        for t in engine.generate(&request, &no_surface).placements {
            let x = t.position.x.clamp(0.0, 1_999.9);
            buckets[(x / 500.0) as usize] += 1;
        }
    }
    let total: usize = buckets.iter().sum();
    assert!(total > 0);
    for count in buckets {
        let share = count as f32 / total as f32;
        assert!((share - 0.25).abs() < 0.03, "{buckets:?}");
    }
}

#[test]
fn follow_tangent_adds_path_heading() {
    let engine = PlacementEngine::default();
    let path = Spline::polyline([Vec3::ZERO, Vec3::new(0.0, 5_000.0, 0.0)], false);
    let request = PlacementRequest::new(Region::spline(path))
        .with_seed(4)
        .with_density(1.0, 1.0)
        .with_rotation(10.0, 10.0)
        .with_follow_tangent(true);
    let result = engine.generate(&request, &no_surface);
    assert_eq!(result.len(), 50);
    for t in &result.placements {
        assert!((t.yaw_degrees() - 100.0).abs() < 1e-2, "{}", t.yaw_degrees());
    }
}

#[test]
fn actor_set_keeps_hits_on_their_own_actor() {
    let engine = PlacementEngine::default();
    let table = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(400.0, 400.0, 80.0));
    // A thin mat covering half of the table, just below the probe origin.
    let mat = Aabb::new(Vec3::new(0.0, 0.0, 80.0), Vec3::new(200.0, 400.0, 80.5));
    let surfaces = StaticSurfaces::new()
        .with_patch(SurfacePatch::flat(SurfaceId(10), table, 80.0))
        .with_patch(SurfacePatch::flat(SurfaceId(11), mat, 80.5));

    let request = PlacementRequest::new(Region::ActorSet(vec![ActorBounds::new(SurfaceId(10), table)]))
        .with_seed(12)
        .with_density(2.0, 2.0)
        // Ignored for actor sets.
        .with_target_surfaces([SurfaceId(11)]);
    let result = engine.generate(&request, &surfaces);

    assert_eq!(result.attempts, 32);
    assert!(result.rejected > 0, "candidates over the mat must be rejected");
    assert_eq!(result.len() + result.rejected, 32);
    for t in &result.placements {
        assert!((t.position.z - 80.0).abs() < 1e-3);
        assert!(t.position.x >= 200.0, "{:?}", t.position);
    }
}

#[test]
fn actor_set_is_deterministic_across_actors() {
    let engine = PlacementEngine::default();
    let a = Aabb::new(Vec3::ZERO, Vec3::new(300.0, 300.0, 10.0));
    let b = Aabb::new(Vec3::new(1_000.0, 0.0, 0.0), Vec3::new(1_300.0, 300.0, 10.0));
    let surfaces = StaticSurfaces::new()
        .with_patch(SurfacePatch::flat(SurfaceId(1), a, 10.0))
        .with_patch(SurfacePatch::flat(SurfaceId(2), b, 10.0));
    let request = PlacementRequest::new(Region::ActorSet(vec![
        ActorBounds::new(SurfaceId(1), a),
        ActorBounds::new(SurfaceId(2), b),
    ]))
    .with_seed(-7)
    .with_density(1.0, 1.0);

    let first = engine.generate(&request, &surfaces);
    let second = engine.generate(&request, &surfaces);
    assert_eq!(first, second);
    assert_eq!(first.len(), 18);
    // Placements are grouped by actor in the supplied order.
    assert!(first.placements[..9].iter().all(|t| t.position.x <= 300.0));
    assert!(first.placements[9..].iter().all(|t| t.position.x >= 1_000.0));
}

#[test]
fn fixed_interval_is_evenly_spaced() {
    let engine = PlacementEngine::default();
    let result = engine.generate_fixed_along_path(&l_shaped_path(), 500.0);
    assert_eq!(result.len(), 9);
    let distances: Vec<f32> = result
        .placements
        .windows(2)
        .map(|w| (w[1].position - w[0].position).length())
        .collect();
    for d in distances {
        assert!((d - 500.0).abs() < 1.0, "{d}");
    }
    assert!((result.placements[0].yaw_degrees()).abs() < 1e-3);
    assert!((result.placements[8].yaw_degrees() - 90.0).abs() < 1e-3);
}

#[test]
fn fixed_interval_rejects_spacing_longer_than_path() {
    let engine = PlacementEngine::default();
    let mut sink = VecSink::new();
    let result = engine.generate_fixed_along_path_with_events(&l_shaped_path(), 10_000.0, &mut sink);
    assert!(result.is_empty());
    assert_eq!(sink.warnings().len(), 1);
}

#[test]
fn selector_drives_target_surfaces_and_actor_sets() {
    let engine = PlacementEngine::default();
    let road = Aabb::new(Vec3::new(-1_000.0, -200.0, 0.0), Vec3::new(1_000.0, 200.0, 5.0));
    let grass = Aabb::new(Vec3::new(-1_000.0, -1_000.0, 0.0), Vec3::new(1_000.0, 1_000.0, 0.0));
    let catalog = vec![
        SurfaceActor::new(SurfaceId(1), "Landscape", grass).with_tags(["ground"]),
        SurfaceActor::new(SurfaceId(2), "Road_01", road).with_tags(["road", "walkable"]),
    ];
    let surfaces = StaticSurfaces::new()
        .with_patch(SurfacePatch::flat(SurfaceId(1), grass, 0.0))
        .with_patch(SurfacePatch::flat(SurfaceId(2), road, 5.0));

    let roads = SurfaceSelector::new(MatchBy::NameAndTags)
        .with_name_pattern("Road")
        .with_tags(["road"]);
    assert_eq!(roads.target_surfaces(&catalog), vec![SurfaceId(2)]);

    let request = PlacementRequest::new(Region::Box(BoxRegion::centered(
        Vec3::new(0.0, 0.0, 500.0),
        Vec3::new(1_000.0, 1_000.0, 0.0),
    )))
    .with_seed(2)
    .with_density(0.5, 0.5)
    .with_target_surfaces(roads.target_surfaces(&catalog));
    let result = engine.generate(&request, &surfaces);
    assert!(!result.is_empty());
    for t in &result.placements {
        assert!(t.position.y.abs() <= 200.0);
        assert!((t.position.z - 5.0).abs() < 1e-3);
    }

    let region = roads.actor_set(&catalog);
    let on_road = engine.generate(&PlacementRequest::new(region).with_density(1.0, 1.0), &surfaces);
    assert_eq!(on_road.attempts, 80);
    assert_eq!(on_road.len(), 80);
    assert!(on_road.placements.iter().all(|t| (t.position.z - 5.0).abs() < 1e-3));
}

#[test]
fn imported_density_is_clamped_with_message() {
    let (range, messages) = DensityRange::new(-0.5, 12.0).clamped(0.0, 10.0);
    assert_eq!(range, DensityRange::new(0.0, 10.0));
    assert_eq!(
        messages,
        vec![
            "The imported DensityMin (-0.5) is lower than 0 and will be clamped to 0.".to_string(),
            "The imported DensityMax (12) is greater than 10 and will be clamped to 10.".to_string(),
        ]
    );
}
