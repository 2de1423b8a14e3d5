use anyhow::{Context, Result, bail};
use clap::Parser;
use ringfifo::dump::HexDump;
use ringfifo::record::{self, Sample};
use ringfifo::ring::{RawRingBuffer, RingError, Status};
use ringfifo::storage::MmapRegion;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pumps sample records through a memory-mapped FIFO until Ctrl+C.
#[derive(Parser, Debug)]
#[command(name = "ringfifo", version)]
struct Args {
    /// FIFO capacity in records.
    #[arg(long, default_value_t = 16)]
    capacity: usize,

    /// Records the producer offers per tick.
    #[arg(long, default_value_t = 4)]
    batch: usize,

    /// Records the consumer takes per tick.
    #[arg(long, default_value_t = 3)]
    read_batch: usize,

    /// Back the FIFO with this file instead of anonymous memory.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Pin the storage pages in RAM.
    #[arg(long)]
    lock: bool,

    #[arg(long, default_value_t = 10)]
    interval_ms: u64,

    #[arg(long, default_value_t = 5)]
    report_secs: u64,

    /// Hex-dump the storage on shutdown.
    #[arg(long)]
    dump: bool,
}

#[derive(Debug, Default)]
struct PumpStats {
    written: u64,
    read: u64,
    saturated: u64,
    drained: u64,
    refused: u64,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    if args.capacity == 0 || args.batch == 0 || args.read_batch == 0 {
        bail!("capacity, batch and read-batch must be non-zero");
    }

    info!("ringfifo v{}", env!("CARGO_PKG_VERSION"));

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("shutting down");
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    let bytes = args.capacity * Sample::SIZE;
    let mut region = match &args.file {
        Some(path) => MmapRegion::create(path, bytes)
            .with_context(|| format!("failed to map {}", path.display()))?,
        None => MmapRegion::anonymous(bytes).context("failed to map anonymous storage")?,
    };
    region.fill(0xFF);
    if args.lock {
        if let Err(e) = region.lock() {
            warn!(error = %e, "could not lock storage pages, continuing unlocked");
        }
    }

    let stats = pump(&args, region.as_mut_slice(), &running)?;

    info!(
        written = stats.written,
        read = stats.read,
        saturated = stats.saturated,
        drained = stats.drained,
        refused = stats.refused,
        "stopped"
    );

    if args.dump {
        println!("{}", HexDump::new(&region.as_slice()[..bytes]).with_desc("storage"));
    }
    if args.file.is_some() {
        region.flush().context("failed to flush storage")?;
    }

    Ok(())
}

fn pump(args: &Args, storage: &mut [u8], running: &AtomicBool) -> Result<PumpStats> {
    let mut ring = RawRingBuffer::new(storage, args.capacity, Sample::SIZE)?;
    let mut stats = PumpStats::default();

    let mut staged = vec![Sample::default(); args.batch];
    let mut out_bytes = vec![0u8; args.read_batch * Sample::SIZE];
    let mut in_bytes = vec![0u8; args.batch * Sample::SIZE];
    let mut decoded = vec![Sample::default(); args.read_batch];

    let mut next_word = 0u32;
    let mut expected_word = 0u32;
    let mut last_report = Instant::now();

    info!(
        capacity = ring.capacity(),
        element_size = ring.element_size(),
        "pump running"
    );

    while running.load(Ordering::SeqCst) {
        // producer: offer a batch, shrink it to the free space if refused
        for (i, slot) in staged.iter_mut().enumerate() {
            *slot = Sample::new(next_word.wrapping_add(i as u32));
        }
        let len = record::encode_into(&staged, &mut in_bytes)
            .context("staging buffer too short")?;
        let mut n = args.batch;
        let mut result = ring.write(&in_bytes[..len], n);
        if let Err(RingError::InsufficientSpace { available, .. }) = result {
            n = available;
            result = ring.write(&in_bytes[..len], n);
        }
        match result {
            Ok(status) => {
                stats.written += n as u64;
                next_word = next_word.wrapping_add(n as u32);
                if status == Status::Full {
                    stats.saturated += 1;
                }
            }
            Err(e) => {
                debug!(error = %e, "write refused");
                stats.refused += 1;
            }
        }

        // consumer: take what is there, up to read_batch
        let n = args.read_batch.min(ring.occupied_count());
        match ring.read(&mut out_bytes, n) {
            Ok(status) => {
                stats.read += n as u64;
                if status == Status::Empty {
                    stats.drained += 1;
                }
                let count = record::decode_from(&out_bytes[..n * Sample::SIZE], &mut decoded);
                for sample in &decoded[..count] {
                    if !sample.is_marked() || sample.word != expected_word {
                        bail!(
                            "out of order record: expected word {}, got {:?}",
                            expected_word,
                            sample
                        );
                    }
                    expected_word = expected_word.wrapping_add(1);
                }
            }
            Err(e) => {
                debug!(error = %e, "read refused");
                stats.refused += 1;
            }
        }

        if last_report.elapsed() >= Duration::from_secs(args.report_secs) {
            info!(
                written = stats.written,
                read = stats.read,
                occupied = ring.occupied_count(),
                available = ring.available(),
                "status"
            );
            last_report = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(args.interval_ms));
    }

    Ok(stats)
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ringfifo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
