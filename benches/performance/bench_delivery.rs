//! Performance benchmark for the chunked-delivery loop
//!
//! Measures write_batch over an in-process endpoint so the numbers reflect
//! chunking, classification, and requeue costs rather than network time.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use delivery_stream_sink::{
    BatchIngest, BatchWriter, RecordResult, SinkConfiguration, SinkError, WireRecord,
};
use tokio_util::sync::CancellationToken;

struct AcceptAll;

impl BatchIngest for AcceptAll {
    async fn put_record_batch(
        &self,
        _stream_name: &str,
        records: Vec<WireRecord>,
    ) -> Result<Vec<RecordResult>, SinkError> {
        Ok(vec![RecordResult::ok(); records.len()])
    }
}

/// Rejects the second half of every other call, forcing requeue work.
struct ThrottleHalf {
    calls: std::sync::atomic::AtomicUsize,
}

impl BatchIngest for ThrottleHalf {
    async fn put_record_batch(
        &self,
        _stream_name: &str,
        records: Vec<WireRecord>,
    ) -> Result<Vec<RecordResult>, SinkError> {
        let call = self.calls.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Ok(records
            .iter()
            .enumerate()
            .map(|(i, _)| {
                if call % 2 == 0 && i >= records.len() / 2 {
                    RecordResult::failed("ServiceUnavailableException", "throttled")
                } else {
                    RecordResult::ok()
                }
            })
            .collect())
    }
}

fn payloads(n: usize) -> Vec<Vec<u8>> {
    (0..n)
        .map(|i| format!(r#"{{"event":"bench","id":{}}}"#, i).into_bytes())
        .collect()
}

fn bench_clean_delivery(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("clean_delivery");

    for &n in &[100usize, 1000, 10000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let writer =
                BatchWriter::new(SinkConfiguration::new("bench".to_string()), AcceptAll).unwrap();
            let cancel = CancellationToken::new();
            b.iter(|| {
                runtime
                    .block_on(writer.write_batch(&cancel, black_box(payloads(n))))
                    .unwrap();
            });
        });
    }
    group.finish();
}

fn bench_throttled_delivery(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("throttled_delivery_1200", |b| {
        b.iter(|| {
            let writer = BatchWriter::new(
                SinkConfiguration::new("bench".to_string())
                    // millisecond waits keep the bench about queue work
                    .with_retry_config(100, 1, 1)
                    .with_jitter(true),
                ThrottleHalf {
                    calls: std::sync::atomic::AtomicUsize::new(0),
                },
            )
            .unwrap();
            let cancel = CancellationToken::new();
            runtime
                .block_on(writer.write_batch(&cancel, black_box(payloads(1200))))
                .unwrap();
        });
    });
}

criterion_group!(benches, bench_clean_delivery, bench_throttled_delivery);
criterion_main!(benches);
