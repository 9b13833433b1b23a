// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_tree_model::{FilterResult, Model, ModelOptions, TreeElement, Visibility};

/// `fanout` folders per level, `depth` levels, leaves at the bottom.
fn gen_tree(fanout: u32, depth: u32, prefix: u32) -> Vec<TreeElement<u32>> {
    (0..fanout)
        .map(|i| {
            let id = prefix * fanout + i + 1;
            let element = TreeElement::new(id);
            if depth == 0 {
                element
            } else {
                element.with_children(gen_tree(fanout, depth - 1, id))
            }
        })
        .collect()
}

fn node_total(fanout: u32, depth: u32) -> u64 {
    (1..=depth + 1).map(|d| u64::from(fanout).pow(d)).sum()
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &(fanout, depth) in &[(10u32, 2u32), (8, 3), (4, 6)] {
        group.throughput(Throughput::Elements(node_total(fanout, depth)));
        group.bench_function(format!("set_children_f{fanout}_d{depth}"), |b| {
            b.iter_batched(
                || gen_tree(fanout, depth, 0),
                |children| {
                    let mut model = Model::new();
                    let root = model.root();
                    model.set_children(root, children).unwrap();
                    black_box(model.rendered_len());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");
    let mut model = Model::new();
    let root = model.root();
    model.set_children(root, gen_tree(8, 3, 0)).unwrap();
    let len = model.rendered_len();
    let mut rng = Rng::new(0x9E37_79B9_7F4A_7C15);
    let rows: Vec<usize> = (0..1024).map(|_| rng.below(len)).collect();
    group.throughput(Throughput::Elements(rows.len() as u64));
    group.bench_function("node_at_random", |b| {
        b.iter(|| {
            for &i in &rows {
                black_box(model.node_at(i).unwrap().location());
            }
        });
    });
    let locations: Vec<_> = rows
        .iter()
        .map(|&i| model.node_at(i).unwrap().location())
        .collect();
    group.bench_function("list_index_random", |b| {
        b.iter(|| {
            for &l in &locations {
                black_box(model.list_index(l).unwrap());
            }
        });
    });
    group.bench_function("rendered_walk", |b| {
        b.iter(|| black_box(model.rendered().count()));
    });
    group.finish();
}

fn bench_collapse(c: &mut Criterion) {
    let mut group = c.benchmark_group("collapse");
    let mut model = Model::new();
    let root = model.root();
    model.set_children(root, gen_tree(8, 3, 0)).unwrap();
    let folders: Vec<_> = (1..=8u32).filter_map(|id| model.location_of(&id)).collect();
    group.bench_function("toggle_top_level", |b| {
        b.iter(|| {
            for &folder in &folders {
                black_box(model.set_collapsed(folder, None, false).unwrap());
            }
        });
    });
    group.bench_function("toggle_recursive", |b| {
        b.iter(|| {
            for &folder in &folders {
                black_box(model.set_collapsed(folder, None, true).unwrap());
            }
        });
    });
    group.finish();
}

fn bench_refilter(c: &mut Criterion) {
    let mut group = c.benchmark_group("refilter");
    for &modulus in &[2u32, 7, 97] {
        let filter = move |e: &u32, _: Visibility| -> FilterResult<()> {
            if e % modulus == 0 {
                FilterResult::visible()
            } else {
                FilterResult::recurse()
            }
        };
        let mut model = Model::with_options(ModelOptions::new().with_filter(filter));
        let root = model.root();
        model.set_children(root, gen_tree(8, 3, 0)).unwrap();
        group.throughput(Throughput::Elements(node_total(8, 3)));
        group.bench_function(format!("recurse_mod{modulus}"), |b| {
            b.iter(|| {
                model.refilter().unwrap();
                black_box(model.rendered_len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_lookup,
    bench_collapse,
    bench_refilter
);
criterion_main!(benches);
