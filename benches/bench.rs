use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    Criterion,
};

use pagealloc::{AllocatorConfig, PageAllocator};

fn small_blocks(c: &mut Criterion) {
    let mut alloc = PageAllocator::new(AllocatorConfig::new(4096, 4096 * 64)).unwrap();

    c.bench_function("alloc free 24 bytes", |b| {
        b.iter(|| {
            let addr = alloc.allocate(black_box(24)).unwrap();

            alloc.free(addr);
        });
    });

    c.bench_function("fill a page of class 16", |b| {
        b.iter(|| {
            let addrs: Vec<_> = (0..256).filter_map(|_| alloc.allocate(10)).collect();

            for addr in addrs {
                alloc.free(addr);
            }
        });
    });
}

fn page_chains(c: &mut Criterion) {
    let mut alloc = PageAllocator::new(AllocatorConfig::new(4096, 4096 * 64)).unwrap();

    c.bench_function("alloc free 4 page chain", |b| {
        b.iter(|| {
            let addr = alloc.allocate(black_box(4 * 4096)).unwrap();

            alloc.free(addr);
        });
    });

    c.bench_function("grow and shrink chain", |b| {
        b.iter(|| {
            let addr = alloc.allocate(3000).unwrap();
            let addr = alloc.reallocate(Some(addr), 8 * 4096).unwrap();
            let addr = alloc.reallocate(Some(addr), 2 * 4096).unwrap();

            alloc.free(addr);
        });
    });
}

criterion_group!(benches, small_blocks, page_chains);
criterion_main!(benches);
