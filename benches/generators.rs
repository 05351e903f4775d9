use criterion::{criterion_group, criterion_main, Criterion};
use mazefabric::{
    fabric::Fabric,
    generators::{carve_tile, rng_from_seed},
    tile::{GridPosition, Tile},
    units::{Height, Width},
};

fn bench_carve_tile_32(c: &mut Criterion) {
    c.bench_function("carve_tile_32", move |b| {
        b.iter(|| {
            let mut tile = Tile::new(Height(32), Width(32), GridPosition::new(0, 0));
            let mut rng = rng_from_seed(0xbe11c);
            carve_tile(&mut tile, &mut rng);
            tile
        })
    });
}

fn bench_fabric_seed_ring_25(c: &mut Criterion) {
    // Construction carves the origin tile plus its four neighbours.
    c.bench_function("fabric_seed_ring_25", move |b| {
        b.iter(|| Fabric::new(Height(25), Width(25), 0xbe11c).unwrap())
    });
}

criterion_group!(
    benches,
    bench_carve_tile_32,
    bench_fabric_seed_ring_25
);
criterion_main!(benches);
