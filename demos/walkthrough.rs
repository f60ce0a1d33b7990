use pagealloc::{AllocatorConfig, PageAllocator};

// Run with RUST_LOG=debug to see every allocator decision.
fn main() {
    env_logger::init();

    let mut alloc = match PageAllocator::new(AllocatorConfig::new(4096, 4 * 4096)) {
        Ok(alloc) => alloc,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    // 10 bytes plus the flag byte round up to class 16
    let small = alloc.allocate(10);
    println!("allocate(10)   -> {small:?}");

    // more than half a page, so it takes a whole page
    let one_page = alloc.allocate(3000);
    println!("allocate(3000) -> {one_page:?}");

    let two_pages = alloc.allocate(5000);
    println!("allocate(5000) -> {two_pages:?}");

    // every page is spoken for and class 8 has no page yet
    let nothing = alloc.allocate(1);
    println!("allocate(1)    -> {nothing:?}");

    alloc.dump();

    let moved = alloc.reallocate(two_pages, 100);
    println!("reallocate({two_pages:?}, 100) -> {moved:?}");

    let grown = alloc.reallocate(one_page, 2 * 4096);
    println!("reallocate({one_page:?}, 8192) -> {grown:?}");

    alloc.dump();

    for addr in [small, grown, moved].into_iter().flatten() {
        alloc.free(addr);
    }

    println!("{:?}", alloc.metrics());
}
