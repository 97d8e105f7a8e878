//! End-to-end tests for region durability, overflow, concurrency, and
//! teardown.

use mmlog_core::{
    LogContext, OverflowPolicy, Region, RegionConfig, RegionError, RegionSnapshot, HEADER_SIZE,
};
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

#[test]
fn concrete_append_scenario() {
    // capacity = 1024, header = 16. "hello" -> 22, "world" -> 28,
    // reopen -> 28, "!" -> 30, bytes [16, 30) = "hello\nworld\n!\n".
    let dir = tempdir().unwrap();
    let config = RegionConfig::new().capacity(1024);

    {
        let region = Region::open(dir.path(), config.clone()).unwrap();
        region.append("hello").unwrap();
        assert_eq!(region.cursor().unwrap(), 22);
        region.append("world").unwrap();
        assert_eq!(region.cursor().unwrap(), 28);
        region.flush().unwrap();
        region.release().unwrap();
    }

    let region = Region::open(dir.path(), config).unwrap();
    assert_eq!(region.cursor().unwrap(), 28);
    region.append("!").unwrap();
    assert_eq!(region.cursor().unwrap(), 30);

    let path = region.active_path().unwrap();
    region.release().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[16..30], b"hello\nworld\n!\n");
}

#[test]
fn cursor_durability_across_reopen() {
    let dir = tempdir().unwrap();
    let config = RegionConfig::new().capacity(4096);

    let old_cursor = {
        let region = Region::open(dir.path(), config.clone()).unwrap();
        for i in 0..100 {
            region.append(&format!("record {i}")).unwrap();
        }
        region.flush().unwrap();
        let cursor = region.cursor().unwrap();
        region.release().unwrap();
        cursor
    };

    let region = Region::open(dir.path(), config).unwrap();
    assert_eq!(region.cursor().unwrap(), old_cursor);

    // Next append lands immediately after the prior one: no overwrite,
    // no gap.
    region.append("after restart").unwrap();
    let snap = RegionSnapshot::load(&region.active_path().unwrap()).unwrap();
    assert_eq!(snap.records.len(), 101);
    assert_eq!(snap.records[99], "record 99");
    assert_eq!(snap.records[100], "after restart");
}

#[test]
fn concurrent_producers_never_interleave_records() {
    let dir = tempdir().unwrap();
    let config = RegionConfig::new().capacity(512 * 1024);
    let region = Arc::new(Region::open(dir.path(), config).unwrap());

    let threads = 8;
    let per_thread = 200;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let region = Arc::clone(&region);
            thread::spawn(move || {
                for i in 0..per_thread {
                    region.append(&format!("producer-{t} record-{i}")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snap = RegionSnapshot::load(&region.active_path().unwrap()).unwrap();
    assert_eq!(snap.records.len(), threads * per_thread);

    // Every record is intact, and each producer's records stay in its
    // own order.
    let mut next = vec![0usize; threads];
    for record in &snap.records {
        let (producer, index) = record
            .strip_prefix("producer-")
            .and_then(|rest| rest.split_once(" record-"))
            .map(|(p, i)| (p.parse::<usize>().unwrap(), i.parse::<usize>().unwrap()))
            .unwrap();
        assert_eq!(index, next[producer]);
        next[producer] += 1;
    }
    assert!(next.iter().all(|&n| n == per_thread));
}

#[test]
fn reject_region_fills_then_drops() {
    let dir = tempdir().unwrap();
    let config = RegionConfig::new()
        .capacity(256)
        .overflow(OverflowPolicy::Reject);
    let region = Region::open(dir.path(), config).unwrap();

    let mut accepted = 0;
    for i in 0..100 {
        match region.append(&format!("record number {i}")) {
            Ok(()) => accepted += 1,
            Err(RegionError::CapacityExceeded { .. }) => break,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert!(accepted > 0);

    let snap = RegionSnapshot::load(&region.active_path().unwrap()).unwrap();
    assert_eq!(snap.records.len(), accepted);
    assert!(snap.cursor <= 256);
}

#[test]
fn wrap_region_keeps_most_recent_history() {
    let dir = tempdir().unwrap();
    let config = RegionConfig::new().capacity(128); // wrap by default
    let region = Region::open(dir.path(), config).unwrap();

    for i in 0..50 {
        region.append(&format!("record {i:02}")).unwrap();
    }
    assert!(region.stats().snapshot().wraps > 0);
    assert_eq!(region.stats().snapshot().appended_records, 50);

    // The most recent record is always readable below the cursor.
    let snap = RegionSnapshot::load(&region.active_path().unwrap()).unwrap();
    assert_eq!(snap.records.last().map(String::as_str), Some("record 49"));
    assert!(snap.cursor >= HEADER_SIZE);
    assert!(snap.cursor <= 128);
}

#[test]
fn release_allows_immediate_reopen() {
    let dir = tempdir().unwrap();
    let config = RegionConfig::new().capacity(1024);

    let region = Region::open(dir.path(), config.clone()).unwrap();
    region.append("x").unwrap();
    region.release().unwrap();
    region.release().unwrap(); // idempotent

    let reopened = Region::open(dir.path(), config).unwrap();
    assert_eq!(reopened.cursor().unwrap(), HEADER_SIZE + 2);
}

#[test]
fn open_failure_is_observable() {
    let dir = tempdir().unwrap();

    // Too-small capacity must be a typed error, never a silent no-op sink.
    let result = Region::open(dir.path(), RegionConfig::new().capacity(8));
    assert!(matches!(result, Err(RegionError::Store(_))));
}

#[test]
fn two_streams_are_independent() {
    let dir = tempdir().unwrap();
    let ctx = LogContext::open(dir.path(), RegionConfig::new().capacity(4096)).unwrap();

    let logger = ctx.logger();
    logger.i("app", "main only");
    ctx.write_logcat_line("logcat only");
    ctx.flush().unwrap();

    let main = RegionSnapshot::load(&ctx.main().active_path().unwrap()).unwrap();
    let logcat = RegionSnapshot::load(&ctx.logcat().active_path().unwrap()).unwrap();
    assert_eq!(main.records.len(), 1);
    assert!(main.records[0].contains("I/app: main only"));
    assert_eq!(logcat.records, vec!["logcat only"]);

    ctx.release().unwrap();
}

#[test]
fn tailer_thread_shares_the_append_interface() {
    let dir = tempdir().unwrap();
    let ctx = Arc::new(LogContext::open(dir.path(), RegionConfig::new().capacity(64 * 1024)).unwrap());

    // One background tailer feeding logcat while the app logs to main.
    let tailer = {
        let ctx = Arc::clone(&ctx);
        thread::spawn(move || {
            for i in 0..100 {
                ctx.write_logcat_line(&format!("captured {i}"));
            }
        })
    };

    let logger = ctx.logger();
    for i in 0..100 {
        logger.d("app", &format!("message {i}"));
    }
    tailer.join().unwrap();

    let main = RegionSnapshot::load(&ctx.main().active_path().unwrap()).unwrap();
    let logcat = RegionSnapshot::load(&ctx.logcat().active_path().unwrap()).unwrap();
    assert_eq!(main.records.len(), 100);
    assert_eq!(logcat.records.len(), 100);
}
