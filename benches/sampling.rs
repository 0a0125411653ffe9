//! Benchmarks for category lookup and sampling.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;

use locc_sampler::category::{CategoryTree, VolumeRecord};
use locc_sampler::outline::BUILTIN_QH;

fn loaded_tree(volumes: usize) -> CategoryTree {
    let mut tree = CategoryTree::from_outline(BUILTIN_QH);
    tree.load_ids((0..volumes).map(|i| {
        let class = 1 + (i * 7) % 705;
        VolumeRecord::new(format!("QH{class}"), format!("mdp.{i:014}"))
    }));
    tree
}

fn bench_find(c: &mut Criterion) {
    let tree = CategoryTree::from_outline(BUILTIN_QH);

    c.bench_function("find_qh547", |bench| {
        bench.iter(|| black_box(tree.find(black_box("QH547.3"))))
    });
}

fn bench_count(c: &mut Criterion) {
    let tree = loaded_tree(100_000);

    c.bench_function("count_qh_100k", |bench| {
        bench.iter(|| black_box(tree.count("QH").unwrap()))
    });
}

fn bench_sample(c: &mut Criterion) {
    let tree = loaded_tree(100_000);
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);

    c.bench_function("sample_100_of_100k", |bench| {
        bench.iter(|| black_box(tree.sample_with("QH", 100, &mut rng).unwrap()))
    });
}

criterion_group!(benches, bench_find, bench_count, bench_sample);
criterion_main!(benches);
