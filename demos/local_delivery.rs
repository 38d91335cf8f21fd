//! Rust example for using the delivery stream sink
//!
//! This example wires the writer to a fake in-process endpoint that
//! throttles a slice of each call, demonstrating chunked delivery and
//! requeue of rejected records without any network access.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use delivery_stream_sink::{
    BatchIngest, BatchWriter, RecordResult, SinkConfiguration, SinkError, WireRecord,
};
use tokio_util::sync::CancellationToken;

/// In-process endpoint that rejects the tail of every call once, then
/// accepts everything.
struct FlakyEndpoint {
    calls: AtomicUsize,
}

impl BatchIngest for FlakyEndpoint {
    async fn put_record_batch(
        &self,
        stream_name: &str,
        records: Vec<WireRecord>,
    ) -> Result<Vec<RecordResult>, SinkError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        println!(
            "put_record_batch #{} -> stream {} with {} records",
            call + 1,
            stream_name,
            records.len()
        );

        Ok(records
            .iter()
            .enumerate()
            .map(|(i, _)| {
                if call == 0 && i >= records.len() / 2 {
                    RecordResult::failed("ServiceUnavailableException", "simulated throttling")
                } else {
                    RecordResult::ok()
                }
            })
            .collect())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let config = SinkConfiguration::new("demo_stream".to_string())
        .with_retry_config(5, 100, 30000); // 5 retries, 100ms base delay, 30s max delay
    let writer = BatchWriter::new(
        config,
        FlakyEndpoint {
            calls: AtomicUsize::new(0),
        },
    )?;

    let payloads: Vec<Vec<u8>> = (0..1200)
        .map(|i| format!(r#"{{"event":"demo","id":{}}}"#, i).into_bytes())
        .collect();

    println!("Delivering {} payloads...", payloads.len());
    let cancel = CancellationToken::new();
    writer.write_batch(&cancel, payloads).await?;
    println!("All payloads confirmed");

    Ok(())
}
