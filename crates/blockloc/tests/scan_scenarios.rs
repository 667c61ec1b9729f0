//! End-to-end scan scenarios through `BlockLocService`.

mod common;

use std::sync::Arc;
use std::time::Duration;

use blockloc::block::blocks;
use blockloc::prelude::*;
use blockloc::{BlockPos, ChunkPos};
use common::{CountingWorld, Harness};
use crossbeam_channel::{Receiver, Sender, bounded};
use pretty_assertions::assert_eq;

fn steve() -> RequesterId {
    RequesterId::new("Steve")
}

#[test]
fn test_two_corner_matches() {
    let harness = Harness::sequential();
    let world = CountingWorld::new(MemoryWorld::new("world"));
    world.world().set_block(BlockPos::new(0, 0, 0), blocks::DIAMOND_ORE);
    world.world().set_block(BlockPos::new(1, 1, 1), blocks::DIAMOND_ORE);
    harness.select(&steve(), Arc::clone(&world) as Arc<dyn BlockSource>, (1, 1, 1), (0, 0, 0));

    let state = harness.run(&steve(), "DIAMOND_ORE");

    assert_eq!(state, ScanState::Done);
    assert_eq!(world.reads(), 8);
    assert_eq!(
        harness.recorder.notices(),
        vec![Notice::Calculating, Notice::PrintedToConsole]
    );

    let reports = harness.recorder.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(
        reports[0].lines(),
        &[
            "---------- Locations of DIAMOND_ORE in world (2) ----------".to_string(),
            "0, 0, 0".to_string(),
            "1, 1, 1".to_string(),
            "-----------------------------------------------------------".to_string(),
        ]
    );
}

#[test]
fn test_single_cell_without_match_only_notifies() {
    let harness = Harness::sequential();
    let world = CountingWorld::new(MemoryWorld::with_generator("world", |_| blocks::STONE));
    harness.select(&steve(), Arc::clone(&world) as Arc<dyn BlockSource>, (5, 5, 5), (5, 5, 5));

    let state = harness.run(&steve(), "minecraft:gold_ore");

    assert_eq!(state, ScanState::Done);
    assert_eq!(world.reads(), 1);
    assert_eq!(
        harness.recorder.notices(),
        vec![
            Notice::Calculating,
            Notice::NoMatches {
                kind: "GOLD_ORE".to_string()
            },
        ]
    );
    assert!(harness.recorder.reports().is_empty());
}

#[test]
fn test_no_selection_reads_nothing() {
    let harness = Harness::sequential();
    let world = CountingWorld::new(MemoryWorld::new("world"));
    // Only one corner set: the selection is incomplete.
    harness
        .selections
        .set_pos1(&steve(), Arc::clone(&world) as Arc<dyn BlockSource>, BlockPos::new(0, 0, 0));

    let state = harness.run(&steve(), "STONE");

    assert_eq!(state, ScanState::Failed(ScanError::NoActiveVolume));
    assert_eq!(world.reads(), 0);
    assert_eq!(harness.recorder.notices(), vec![Notice::SelectionRequired]);
    assert!(harness.recorder.reports().is_empty());
}

#[test]
fn test_unknown_type_echoes_input_and_reads_nothing() {
    let harness = Harness::sequential();
    let world = CountingWorld::new(MemoryWorld::new("world"));
    harness.select(&steve(), Arc::clone(&world) as Arc<dyn BlockSource>, (0, 0, 0), (3, 3, 3));

    let state = harness.run(&steve(), "Diamond_Ore");

    assert_eq!(
        state,
        ScanState::Failed(ScanError::UnknownType("Diamond_Ore".to_string()))
    );
    assert_eq!(world.reads(), 0);

    let notices = harness.recorder.notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].to_string().contains("Diamond_Ore"));
}

#[test]
fn test_unloaded_chunk_fails_without_report() {
    let harness = Harness::sequential();
    let world = Arc::new(MemoryWorld::with_generator("world", |_| blocks::STONE));
    world.unload_chunk(ChunkPos::new(0, 1));
    harness.select(&steve(), world, (0, 0, 0), (4, 0, 20));

    let state = harness.run(&steve(), "STONE");

    assert_eq!(
        state,
        ScanState::Failed(ScanError::Unavailable {
            pos: BlockPos::new(0, 0, 16)
        })
    );
    assert_eq!(
        harness.recorder.notices(),
        vec![Notice::Calculating, Notice::ScanFailed]
    );
    assert!(harness.recorder.reports().is_empty());
}

#[test]
fn test_parallel_and_sequential_reports_match() {
    let generator = |pos: BlockPos| {
        if (pos.x ^ pos.z).rem_euclid(5) == 0 && pos.y % 2 == 0 {
            blocks::IRON_ORE
        } else {
            blocks::STONE
        }
    };

    let mut reports = Vec::new();
    for harness in [Harness::sequential(), Harness::parallel()] {
        let world = Arc::new(MemoryWorld::with_generator("world", generator));
        harness.select(&steve(), world, (-12, 0, -12), (12, 6, 12));
        assert_eq!(harness.run(&steve(), "iron_ore"), ScanState::Done);
        reports.extend(harness.recorder.reports());
    }

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0], reports[1]);
}

#[test]
fn test_concurrent_requesters_get_their_own_reports() {
    let harness = Harness::parallel();
    let world = Arc::new(MemoryWorld::new("world"));
    world.set_block(BlockPos::new(1, 1, 1), blocks::CHEST);
    world.set_block(BlockPos::new(50, 1, 50), blocks::CHEST);

    let alex = RequesterId::new("Alex");
    harness.select(&steve(), Arc::clone(&world) as Arc<dyn BlockSource>, (0, 0, 0), (10, 2, 10));
    harness.select(&alex, world, (40, 0, 40), (60, 2, 60));

    let audience = Arc::clone(&harness.recorder) as Arc<dyn Audience>;
    let first = harness.service.run_scan(&steve(), "CHEST", Arc::clone(&audience));
    let second = harness.service.run_scan(&alex, "CHEST", audience);

    assert_eq!(first.wait(), ScanState::Done);
    assert_eq!(second.wait(), ScanState::Done);

    let mut locations: Vec<Vec<String>> = harness
        .recorder
        .reports()
        .iter()
        .map(|report| report.locations().to_vec())
        .collect();
    locations.sort();
    assert_eq!(
        locations,
        vec![vec!["1, 1, 1".to_string()], vec!["50, 1, 50".to_string()]]
    );
}

/// Blocks on the first read until released, so a test can cancel mid-scan.
struct Gate {
    started: Sender<()>,
    release: Receiver<()>,
}

impl BlockSource for Gate {
    fn name(&self) -> &str {
        "gate"
    }

    fn block_at(&self, pos: BlockPos) -> Option<BlockKind> {
        if pos == BlockPos::new(0, 0, 0) {
            let _ = self.started.send(());
            let _ = self.release.recv_timeout(Duration::from_secs(5));
        }
        Some(blocks::STONE)
    }
}

#[test]
fn test_cancelled_scan_reports_nothing() {
    let harness = Harness::sequential();
    let (started_tx, started_rx) = bounded(1);
    let (release_tx, release_rx) = bounded(1);
    let world = Arc::new(Gate {
        started: started_tx,
        release: release_rx,
    });
    harness.select(&steve(), world, (0, 0, 0), (3, 0, 0));

    let handle = harness.service.run_scan(
        &steve(),
        "STONE",
        Arc::clone(&harness.recorder) as Arc<dyn Audience>,
    );
    started_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("scan never started");
    handle.cancel();
    release_tx.send(()).unwrap();

    assert_eq!(handle.wait(), ScanState::Failed(ScanError::Cancelled));
    assert_eq!(
        harness.recorder.notices(),
        vec![Notice::Calculating, Notice::Cancelled]
    );
    assert!(harness.recorder.reports().is_empty());
}

#[test]
fn test_run_scan_returns_before_scan_finishes() {
    let harness = Harness::sequential();
    let (started_tx, started_rx) = bounded(1);
    let (release_tx, release_rx) = bounded(1);
    let world = Arc::new(Gate {
        started: started_tx,
        release: release_rx,
    });
    harness.select(&steve(), world, (0, 0, 0), (0, 0, 0));

    let handle = harness.service.run_scan(
        &steve(),
        "STONE",
        Arc::clone(&harness.recorder) as Arc<dyn Audience>,
    );
    // The caller is free while the worker is parked inside the scan.
    started_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("scan never started");
    assert_eq!(harness.recorder.notices(), vec![Notice::Calculating]);

    let handle = handle
        .wait_timeout(Duration::from_millis(20))
        .expect_err("scan finished while gated");
    release_tx.send(()).unwrap();

    assert_eq!(handle.wait(), ScanState::Done);
    assert_eq!(harness.recorder.reports().len(), 1);
}
