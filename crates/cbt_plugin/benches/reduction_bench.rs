//! Benchmarks for sum reduction - naive vs bit-parallel.
//!
//! Every iteration reduces a heap whose deepest level holds random leaf
//! markers, which is the worst case for both strategies.

use cbt_plugin::cbt::reduction::{reduce_bit_parallel, reduce_naive};
use cbt_plugin::{Node, NodeStore, PackedHeap};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_marker_heap(max_depth: u32) -> PackedHeap {
  let mut rng = StdRng::seed_from_u64(42);
  let mut heap = PackedHeap::new(max_depth);
  for heap_index in (1u32 << max_depth)..(2u32 << max_depth) {
    if rng.random_bool(0.5) {
      heap.set_value(Node::new(heap_index, max_depth), 1);
    }
  }
  heap
}

fn bench_reduction(c: &mut Criterion) {
  let mut group = c.benchmark_group("reduction");

  for max_depth in [12u32, 16, 20] {
    let heap = random_marker_heap(max_depth);
    group.throughput(Throughput::Elements(1u64 << max_depth));

    group.bench_with_input(BenchmarkId::new("naive", max_depth), &heap, |b, heap| {
      let mut heap = heap.clone();
      b.iter(|| {
        reduce_naive(&mut heap);
        black_box(heap.value(Node::ROOT))
      })
    });

    group.bench_with_input(BenchmarkId::new("bit_parallel", max_depth), &heap, |b, heap| {
      let mut heap = heap.clone();
      b.iter(|| {
        reduce_bit_parallel(&mut heap);
        black_box(heap.value(Node::ROOT))
      })
    });
  }

  group.finish();
}

criterion_group!(benches, bench_reduction);
criterion_main!(benches);
