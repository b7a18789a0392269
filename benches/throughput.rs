use criterion::{black_box, criterion_group, criterion_main, Criterion};
use slotring::{Registry, RingBuffer, SharedRingBuffer};

fn bench_throughput(c: &mut Criterion) {
    let mut rb = RingBuffer::new(1 << 12, 0u64).unwrap();

    c.bench_function("set_get_wrapping_position", |b| {
        let mut position = 0usize;
        b.iter(|| {
            rb.set(position, position as u64);
            let v = rb.get(black_box(position));
            position = position.wrapping_add(7);
            v
        })
    });

    c.bench_function("to_list_4096", |b| b.iter(|| black_box(rb.to_list())));

    c.bench_function("clear_4096", |b| {
        b.iter(|| {
            rb.clear();
        })
    });

    let mut buffers = Registry::new();
    let h = buffers.create(1 << 12, 0u64).unwrap();
    c.bench_function("registry_set_get", |b| {
        b.iter(|| {
            buffers.set(h, black_box(17), 1).unwrap();
            buffers.get(h, black_box(17)).unwrap()
        })
    });

    let shared = SharedRingBuffer::new(1 << 12, 0u64).unwrap();
    c.bench_function("shared_set_get", |b| {
        b.iter(|| {
            shared.set(black_box(17), 1);
            shared.get(black_box(17))
        })
    });
}

criterion_group!(benches, bench_throughput);
criterion_main!(benches);
