use criterion::{black_box, criterion_group, criterion_main, Criterion};
use protoplast_core::description_helper::{create_rect, reconnect_cells, CreateRectParameters};
use protoplast_core::slot_grid::SlotGrid;
use protoplast_core::IdGenerator;
use protoplast_data::Vector2D;

fn bench_reconnect_rect(c: &mut Criterion) {
    let params = CreateRectParameters {
        width: 30,
        height: 30,
        ..Default::default()
    };
    let mut ids = IdGenerator::new(42);
    let Ok(rect) = create_rect(&params, &mut ids) else {
        return;
    };

    c.bench_function("reconnect_cells_900", |b| {
        b.iter(|| {
            let mut data = rect.clone();
            let _ = reconnect_cells(&mut data, 1.1);
            black_box(data)
        })
    });
}

fn bench_slot_grid_query(c: &mut Criterion) {
    let positions: Vec<Vector2D> = (0..1000)
        .map(|i| Vector2D::new((i % 100) as f32, (i / 100) as f32))
        .collect();
    let grid = SlotGrid::build(&positions);

    c.bench_function("slot_grid_query_radius_3", |b| {
        b.iter(|| black_box(grid.query_within(black_box(Vector2D::new(50.0, 5.0)), 3.0)))
    });
}

criterion_group!(benches, bench_reconnect_rect, bench_slot_grid_query);
criterion_main!(benches);
