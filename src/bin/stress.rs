use anyhow::{Context, Result, bail};
use clap::Parser;
use parking_lot::Mutex;
use ringfifo::record::Sample;
use ringfifo::ring::{RingBuffer, RingError, Status};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// One producer and one consumer thread sharing a FIFO behind a mutex.
#[derive(Parser, Debug)]
#[command(name = "stress")]
struct Args {
    #[arg(long, default_value_t = 4096)]
    capacity: usize,

    /// Records per write and per read.
    #[arg(long, default_value_t = 64)]
    batch: usize,

    #[arg(long, default_value_t = 5)]
    seconds: u64,
}

#[derive(Debug, Default)]
struct Counts {
    records: u64,
    saturated: u64,
    refused: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stress=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    if args.capacity == 0 || args.batch == 0 || args.batch > args.capacity {
        bail!("need 0 < batch <= capacity");
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    let mut storage = vec![Sample::default(); args.capacity];
    let ring = Mutex::new(RingBuffer::new(&mut storage));
    let producer_done = AtomicBool::new(false);
    let started = Instant::now();

    info!(
        capacity = args.capacity,
        batch = args.batch,
        seconds = args.seconds,
        "stress running"
    );

    let (written, read) = std::thread::scope(|scope| -> Result<(Counts, Counts)> {
        let producer = scope.spawn(|| {
            let mut counts = Counts::default();
            let mut batch = vec![Sample::default(); args.batch];
            let mut word = 0u32;

            while running.load(Ordering::Relaxed) {
                for (i, slot) in batch.iter_mut().enumerate() {
                    *slot = Sample::new(word.wrapping_add(i as u32));
                }
                let result = ring.lock().write(&batch);
                match result {
                    Ok(status) => {
                        counts.records += batch.len() as u64;
                        word = word.wrapping_add(batch.len() as u32);
                        if status == Status::Full {
                            counts.saturated += 1;
                        }
                    }
                    Err(RingError::Full | RingError::InsufficientSpace { .. }) => {
                        counts.refused += 1;
                        std::thread::yield_now();
                    }
                    Err(e) => unreachable!("unexpected write error: {}", e),
                }
            }

            producer_done.store(true, Ordering::Release);
            counts
        });

        let consumer = scope.spawn(|| -> Result<Counts> {
            let mut counts = Counts::default();
            let mut batch = vec![Sample::default(); args.batch];
            let mut expected = 0u32;

            loop {
                let result = ring.lock().read(&mut batch);
                match result {
                    Ok(status) => {
                        for sample in &batch {
                            if sample.word != expected {
                                bail!("expected word {}, got {}", expected, sample.word);
                            }
                            expected = expected.wrapping_add(1);
                        }
                        counts.records += batch.len() as u64;
                        if status == Status::Empty {
                            counts.saturated += 1;
                        }
                    }
                    Err(RingError::Empty | RingError::InsufficientSpace { .. }) => {
                        counts.refused += 1;
                        if producer_done.load(Ordering::Acquire) && ring.lock().is_empty() {
                            break;
                        }
                        std::thread::yield_now();
                    }
                    Err(e) => unreachable!("unexpected read error: {}", e),
                }
            }

            Ok(counts)
        });

        let deadline = started + Duration::from_secs(args.seconds);
        while running.load(Ordering::Relaxed) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(50));
        }
        running.store(false, Ordering::SeqCst);

        let written = producer
            .join()
            .map_err(|_| anyhow::anyhow!("producer panicked"))?;
        let read = consumer
            .join()
            .map_err(|_| anyhow::anyhow!("consumer panicked"))??;
        Ok((written, read))
    })?;

    let elapsed = started.elapsed().as_secs_f64();
    info!(
        written = written.records,
        read = read.records,
        filled = written.saturated,
        drained = read.saturated,
        write_refusals = written.refused,
        read_refusals = read.refused,
        "done"
    );
    info!(
        "throughput: {:.2}M records/sec",
        read.records as f64 / elapsed / 1_000_000.0
    );

    if written.records != read.records {
        bail!(
            "lost records: wrote {}, read {}",
            written.records,
            read.records
        );
    }

    Ok(())
}
