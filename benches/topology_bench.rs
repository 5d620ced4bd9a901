use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use fe_kernel::data::Field;
use fe_kernel::topology::Topology;

/// Structured `n x n x n` hexahedral block.
fn hex_block(n: usize) -> Vec<Vec<usize>> {
    let np = n + 1;
    let id = |i: usize, j: usize, k: usize| i + np * (j + np * k);
    let mut conn = Vec::with_capacity(n * n * n);
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                conn.push(vec![
                    id(i, j, k),
                    id(i + 1, j, k),
                    id(i + 1, j + 1, k),
                    id(i, j + 1, k),
                    id(i, j, k + 1),
                    id(i + 1, j, k + 1),
                    id(i + 1, j + 1, k + 1),
                    id(i, j + 1, k + 1),
                ]);
            }
        }
    }
    conn
}

fn bench_topology(c: &mut Criterion) {
    let mut group = c.benchmark_group("topology");
    for &n in &[8usize, 16usize] {
        let conn = hex_block(n);
        group.bench_with_input(BenchmarkId::new("derive_hex", n), &conn, |b, conn| {
            b.iter(|| Topology::hypercube(black_box(conn.clone()), 3))
        });
        let topo = Topology::hypercube(conn, 3).unwrap();
        group.bench_with_input(BenchmarkId::new("boundary_hex", n), &topo, |b, topo| {
            b.iter(|| black_box(topo).boundary())
        });
    }
    group.finish();
}

fn bench_numbering(c: &mut Criterion) {
    let mut group = c.benchmark_group("numbering");
    for &nfens in &[10_000usize, 100_000usize] {
        let mut field = Field::zeros(nfens, 3).unwrap();
        for node in (0..nfens).step_by(7) {
            field.set_ebc(node, node % 3, 0.0).unwrap();
        }
        group.bench_with_input(BenchmarkId::new("number_equations", nfens), &nfens, |b, _| {
            b.iter(|| black_box(&mut field).number_equations())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_topology, bench_numbering);
criterion_main!(benches);
