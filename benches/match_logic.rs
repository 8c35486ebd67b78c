use criterion::{black_box, criterion_group, criterion_main, Criterion};
use match_grid::core::{find_all_matches, find_hint, GameSession, Grid, SimpleRng};
use match_grid::types::{Theme, MAX_GRID_SIZE};

fn bench_generate(c: &mut Criterion) {
    let theme = Theme::classic();
    let mut rng = SimpleRng::new(12345);

    c.bench_function("generate_8x8", |b| {
        b.iter(|| Grid::generate(black_box(8), &theme, &mut rng))
    });
}

fn bench_scan(c: &mut Criterion) {
    let grid = Grid::generate(8, &Theme::classic(), &mut SimpleRng::new(12345));

    c.bench_function("find_all_matches_8x8", |b| {
        b.iter(|| find_all_matches(black_box(&grid)))
    });
}

fn bench_hint_sweep(c: &mut Criterion) {
    // The (2r + c) mod 5 layout has no legal move, so the sweep runs to the end
    let rows: Vec<String> = (0..8)
        .map(|r| {
            (0..8)
                .map(|col| (b'A' + ((2 * r + col) % 5) as u8) as char)
                .collect()
        })
        .collect();
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let stalemate = Grid::from_rows(&rows).expect("stalemate board");

    c.bench_function("stalemate_sweep_8x8", |b| {
        b.iter(|| find_hint(black_box(&stalemate)))
    });

    let large = Grid::generate(MAX_GRID_SIZE, &Theme::classic(), &mut SimpleRng::new(7));
    c.bench_function("find_hint_32x32", |b| b.iter(|| find_hint(black_box(&large))));
}

fn bench_cascade(c: &mut Criterion) {
    let session = GameSession::new(8, Theme::classic(), SimpleRng::new(12345));

    c.bench_function("hinted_move_full_cascade", |b| {
        b.iter_batched(
            || session.clone(),
            |mut s| {
                if let Some(hint) = s.hint() {
                    s.swap_and_resolve(hint.from, hint.to);
                }
                s
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_generate,
    bench_scan,
    bench_hint_sweep,
    bench_cascade
);
criterion_main!(benches);
