use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    rtdb::bench_write_request,
    rtdb::bench_read_response,
    rtdb::bench_read_response_chunked,
    rtdb::bench_poll_registry
);
criterion_main!(benches);
