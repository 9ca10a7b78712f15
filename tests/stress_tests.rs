//! Stress tests for concurrent debounced delivery
//!
//! These tests verify:
//! - No record is lost or duplicated: every submit is either forwarded or evicted
//! - Records from one producer are forwarded in submission order
//! - Every severe record triggers an immediate flush
//! - Stop racing with producers leaves the appender consistent

use rust_event_logger::appenders::{ChannelAppender, DebounceAppender, DebounceConfig};
use rust_event_logger::core::{EventLogger, LogContext, LogLevel, LogRecord, Logger, LoggerError};
use rust_event_logger::fields;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

fn parse_origin(record: &LogRecord) -> (usize, usize) {
    let (thread_id, seq) = record
        .message
        .split_once(':')
        .expect("message has thread:seq form");
    (thread_id.parse().unwrap(), seq.parse().unwrap())
}

#[test]
fn test_concurrent_submits_are_accounted_for() {
    let (downstream, rx) = ChannelAppender::unbounded();
    let debounce = Arc::new(
        DebounceAppender::new(
            DebounceConfig::new(16, Duration::from_millis(2), LogLevel::Fatal),
            downstream,
        )
        .expect("valid config"),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let debounce = Arc::clone(&debounce);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let record =
                        LogRecord::new(LogLevel::Info, format!("{}:{}", t, i), chrono::Utc::now());
                    debounce.submit(record).expect("appender is running");
                    if i % 50 == 0 {
                        thread::sleep(Duration::from_millis(5));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("producer thread panicked");
    }
    debounce.stop();

    let metrics = debounce.metrics();
    let total = (THREADS * PER_THREAD) as u64;
    assert_eq!(metrics.submitted(), total);
    assert_eq!(metrics.forwarded() + metrics.evicted(), total);
    assert_eq!(metrics.failed(), 0);

    let delivered: Vec<LogRecord> = rx.try_iter().collect();
    assert_eq!(delivered.len() as u64, metrics.forwarded());

    let mut last_seen: HashMap<usize, usize> = HashMap::new();
    for record in &delivered {
        let (thread_id, seq) = parse_origin(record);
        if let Some(previous) = last_seen.insert(thread_id, seq) {
            assert!(
                seq > previous,
                "thread {} delivered {} after {}",
                thread_id,
                seq,
                previous
            );
        }
    }
}

#[test]
fn test_severe_records_flush_immediately() {
    let (downstream, rx) = ChannelAppender::unbounded();
    let debounce = Arc::new(
        DebounceAppender::new(
            DebounceConfig::new(2, Duration::from_millis(50), LogLevel::Error),
            downstream,
        )
        .unwrap(),
    );
    let errors_sent = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let debounce = Arc::clone(&debounce);
            let errors_sent = Arc::clone(&errors_sent);
            thread::spawn(move || {
                for i in 0..200 {
                    let level = if i % 20 == 0 {
                        errors_sent.fetch_add(1, Ordering::Relaxed);
                        LogLevel::Error
                    } else {
                        LogLevel::Debug
                    };
                    debounce
                        .submit(LogRecord::new(level, format!("{}:{}", t, i), chrono::Utc::now()))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    debounce.stop();

    let delivered_errors = rx
        .try_iter()
        .filter(|r| r.level == LogLevel::Error)
        .count();
    // another thread's submit can evict a severe record before its flush drains it
    assert!(delivered_errors <= errors_sent.load(Ordering::Relaxed));
    assert!(delivered_errors > 0);
    assert_eq!(
        debounce.metrics().immediate_flushes(),
        errors_sent.load(Ordering::Relaxed) as u64
    );
}

#[test]
fn test_stop_racing_with_producers() {
    let (downstream, rx) = ChannelAppender::unbounded();
    let debounce = Arc::new(
        DebounceAppender::new(
            DebounceConfig::new(8, Duration::from_millis(1), LogLevel::Warn),
            downstream,
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let debounce = Arc::clone(&debounce);
            thread::spawn(move || {
                let mut rejected = 0u64;
                for i in 0..1_000 {
                    let record =
                        LogRecord::new(LogLevel::Info, format!("{}:{}", t, i), chrono::Utc::now());
                    match debounce.submit(record) {
                        Ok(()) => {}
                        Err(LoggerError::AppenderStopped { .. }) => rejected += 1,
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
                rejected
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(5));
    debounce.stop();

    let rejected: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    let metrics = debounce.metrics();
    assert_eq!(metrics.rejected_after_stop(), rejected);
    assert_eq!(metrics.submitted() + rejected, 4_000);
    assert_eq!(metrics.forwarded() + metrics.evicted(), metrics.submitted());
    assert_eq!(rx.try_iter().count() as u64, metrics.forwarded());
    assert_eq!(debounce.buffered_len(), 0);
}

#[test]
fn test_many_event_loggers_share_one_logger() {
    let (downstream, rx) = ChannelAppender::unbounded();
    let debounce = DebounceAppender::new(
        DebounceConfig::new(10_000, Duration::from_millis(20), LogLevel::Error),
        downstream,
    )
    .unwrap();
    let logger = Arc::new(Logger::builder().appender(debounce).build());

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                let events = EventLogger::with_system_clock(logger, fields!(worker = t));
                for i in 0..25 {
                    let _outer = events.step("batch {i}", fields!(i = i));
                    let _inner = events.step("row", LogContext::new());
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.shutdown();

    let records: Vec<LogRecord> = rx.try_iter().collect();
    assert_eq!(records.len(), THREADS * 25 * 4);
    for record in &records {
        let depth = record.breadcrumb.len();
        assert!(depth == 1 || depth == 2, "unexpected breadcrumb {:?}", record.breadcrumb);
    }
}
