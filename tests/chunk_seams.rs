use cgmath::{MetricSpace, Point3};
use voxel_planet::{Brush, ChunkStore, DensityLattice, LodLevel, TerraformSculptor, WorldConfig};

const CHUNK_SIZE: usize = 8;

/// A bumpy ball whose surface crosses every chunk face of a 2x2x2 world.
fn planet_lattice() -> DensityLattice {
    let mut rng = fastrand::Rng::with_seed(2024);
    let bumps: Vec<f32> = (0..17 * 17 * 17).map(|_| rng.f32() * 0.2 - 0.1).collect();
    let mut lattice = DensityLattice::from_fn(2 * CHUNK_SIZE, |p| {
        let point = Point3::new(p.x as f32, p.y as f32, p.z as f32);
        1.0 - point.distance(Point3::new(8.0, 8.0, 8.0)) / 5.3
    });
    for (value, bump) in lattice.values_mut().iter_mut().zip(bumps) {
        *value += bump;
    }
    lattice
}

fn store() -> ChunkStore {
    let world = WorldConfig {
        world_size_in_chunks: 2,
        chunk_size: CHUNK_SIZE,
        lods: vec![LodLevel::default()],
        ..Default::default()
    };
    ChunkStore::build(&planet_lattice(), &world).unwrap()
}

fn neighbours() -> Vec<(Point3<i32>, Point3<i32>, usize)> {
    let mut pairs = Vec::new();
    for a in 0..2 {
        for b in 0..2 {
            pairs.push((Point3::new(0, a, b), Point3::new(1, a, b), 0));
            pairs.push((Point3::new(a, 0, b), Point3::new(a, 1, b), 1));
            pairs.push((Point3::new(a, b, 0), Point3::new(a, b, 1), 2));
        }
    }
    pairs
}

/// `store` after strokes that cut into and build onto the surface across chunk faces.
fn sculpted_store() -> ChunkStore {
    let mut store = store();
    let strokes = [
        (Point3::new(8.0, 8.0, 12.5), 3.0, false),
        (Point3::new(8.0, 12.5, 8.0), 2.5, true),
        (Point3::new(3.5, 8.0, 8.0), 2.0, false),
    ];
    for (center, radius, add) in strokes {
        let brush = Brush::new(center, radius, 4.0, add, 1.0).unwrap();
        let center_chunk = store.chunk_coord_of(store.lattice_to_world(center));
        let outcome = TerraformSculptor::new(&mut store).apply(center_chunk, 0, &brush, 0.25);
        assert!(outcome.touched > 1);
    }
    store
}

#[test]
fn neighbours_share_boundary_samples() {
    assert_shared_samples_match(&store());
}

#[test]
fn neighbours_share_boundary_samples_after_sculpting() {
    assert_shared_samples_match(&sculpted_store());
}

#[test]
fn neighbours_produce_coincident_boundary_vertices() {
    assert_boundary_vertices_coincide(&store());
}

#[test]
fn neighbours_produce_coincident_boundary_vertices_after_sculpting() {
    let sculpted = sculpted_store();
    let coord = Point3::new(0, 0, 1);
    assert_ne!(sculpted.chunk_map(coord), store().chunk_map(coord));
    assert_boundary_vertices_coincide(&sculpted);
}

fn assert_shared_samples_match(store: &ChunkStore) {
    for (low, high, axis) in neighbours() {
        let low_map = store.chunk_map(low).unwrap();
        let high_map = store.chunk_map(high).unwrap();

        for i in 0..=CHUNK_SIZE {
            for j in 0..=CHUNK_SIZE {
                let mut far = [0; 3];
                far[axis] = CHUNK_SIZE;
                far[(axis + 1) % 3] = i;
                far[(axis + 2) % 3] = j;
                let mut near = far;
                near[axis] = 0;

                assert_eq!(
                    low_map.get(Point3::from(far)).unwrap().to_bits(),
                    high_map.get(Point3::from(near)).unwrap().to_bits()
                );
            }
        }
    }
}

fn assert_boundary_vertices_coincide(store: &ChunkStore) {
    let edge = CHUNK_SIZE as f32;

    for (low, high, axis) in neighbours() {
        let low_chunk = store.chunk(low).unwrap();
        let high_chunk = store.chunk(high).unwrap();
        let low_surface = low_chunk.get().surface().clone();
        let high_surface = high_chunk.get().surface().clone();

        let mut on_far_face = boundary_vertices(&low_surface.vertices, axis, edge);
        let mut on_near_face = boundary_vertices(&high_surface.vertices, axis, 0.0);

        assert!(!on_far_face.is_empty(), "no boundary vertices between {low:?} and {high:?}");
        on_far_face.sort_unstable();
        on_near_face.sort_unstable();
        assert_eq!(on_far_face, on_near_face);
    }
}

/// Bit patterns of the in-plane coordinates of every vertex lying on a face.
fn boundary_vertices(vertices: &[Point3<f32>], axis: usize, plane: f32) -> Vec<[u32; 2]> {
    vertices
        .iter()
        .map(|v| [v.x, v.y, v.z])
        .filter(|v| v[axis] == plane)
        .map(|v| [v[(axis + 1) % 3].to_bits(), v[(axis + 2) % 3].to_bits()])
        .collect()
}
