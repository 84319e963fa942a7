// Encoder throughput benchmarks
//
// Run with: cargo bench -p dyncomp-compression --bench encoder_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dyncomp_compression::{CompressionDecision, NegotiationPolicy, StreamEncoder};
use dyncomp_config::{CompressionSettings, CompressionStrategy};
use dyncomp_core::{BufferedResponse, HeaderMap};
use http::header::ACCEPT_ENCODING;
use http::HeaderValue;

fn json_body(len: usize) -> Vec<u8> {
    br#"{"id":42,"name":"widget","tags":["a","b","c"],"price":19.99}"#
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

fn benchmark_encoders(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_encoder");
    let encoder = StreamEncoder::new();

    for size in [2 * 1024, 64 * 1024, 512 * 1024] {
        let body = json_body(size);
        group.throughput(Throughput::Bytes(size as u64));

        for decision in [
            CompressionDecision::NoCompression,
            CompressionDecision::Gzip(6),
            CompressionDecision::Brotli(4),
        ] {
            group.bench_with_input(
                BenchmarkId::new(decision.to_string(), size),
                &body,
                |b, body| {
                    b.iter(|| {
                        let mut out = Vec::with_capacity(body.len());
                        let mut headers = HeaderMap::new();
                        encoder
                            .apply(decision, &mut body.as_slice(), &mut out, &mut headers)
                            .unwrap();
                        black_box(out)
                    })
                },
            );
        }
    }

    group.finish();
}

fn benchmark_negotiation(c: &mut Criterion) {
    let policy = NegotiationPolicy::new(CompressionSettings::with_strategy(
        CompressionStrategy::new(true, true),
    ));

    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate, br;q=0.9, zstd"),
    );
    let ctx = BufferedResponse::new(headers).with_body(json_body(4096));

    c.bench_function("negotiate", |b| b.iter(|| black_box(policy.decide(&ctx))));
}

criterion_group!(benches, benchmark_encoders, benchmark_negotiation);
criterion_main!(benches);
