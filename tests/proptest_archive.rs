//! Property-based tests for temporal queries, the diff engine and timestamps.
//!
//! Read operations are also checked for repeatability: the same call against
//! an unchanged store must give the same answer, whatever order the backend
//! enumerates its entries in.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use conftrail::store::{FileStore, MemoryStore, SnapshotStore};
use conftrail::{Archive, ArchiveError, DiffTag, Timestamp, diff};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

/// 2000-01-01 .. 2100-01-01, in seconds.
const MIN_UNIX: i64 = 946_684_800;
const MAX_UNIX: i64 = 4_102_444_800;

fn timestamp(secs: i64) -> Timestamp {
    Timestamp::from_unix(secs).unwrap()
}

/// Lines drawn from a tiny vocabulary so random texts share content.
fn config_text() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(
            prop::sample::select(vec!["a", "b", "c", "ntp server 1", "", "  indent"]),
            0..24,
        ),
        any::<bool>(),
    )
        .prop_map(|(lines, trailing_newline)| {
            let mut text = lines.join("\n");
            if trailing_newline && !text.is_empty() {
                text.push('\n');
            }
            text
        })
}

/// Hosts mapped to the unix seconds of their snapshots. Hosts may have none.
fn history() -> impl Strategy<Value = BTreeMap<&'static str, BTreeSet<i64>>> {
    prop::collection::btree_map(
        prop::sample::select(vec!["web01", "db01", "core-sw1"]),
        prop::collection::btree_set(MIN_UNIX..MAX_UNIX, 0..6),
        0..4,
    )
}

fn content(host: &str, secs: i64) -> String {
    format!("hostname {}\nserial {}\n", host, secs)
}

fn same_outcome<T: PartialEq + Debug>(
    first: Result<T, ArchiveError>,
    second: Result<T, ArchiveError>,
) -> Result<(), TestCaseError> {
    match (first, second) {
        (Ok(a), Ok(b)) => {
            prop_assert_eq!(a, b);
        }
        (Err(a), Err(b)) => {
            prop_assert_eq!(a.to_string(), b.to_string());
        }
        (a, b) => {
            prop_assert!(false, "outcome changed between calls: {:?} then {:?}", a, b);
        }
    }
    Ok(())
}

/// Run every read twice with the same arguments and compare.
fn assert_reads_repeat<S: SnapshotStore>(
    archive: &Archive<S>,
    probes: &[Timestamp],
) -> Result<(), TestCaseError> {
    same_outcome(archive.list_hosts(), archive.list_hosts())?;

    let mut hosts = archive.list_hosts().unwrap();
    hosts.push("ghost".to_string());

    for host in &hosts {
        same_outcome(archive.list_timestamps(host), archive.list_timestamps(host))?;

        let stored = archive.list_timestamps(host).unwrap_or_default();
        let candidates: Vec<Timestamp> = stored.iter().chain(probes).copied().collect();

        for &t in &candidates {
            same_outcome(archive.get_exact(host, t), archive.get_exact(host, t))?;
            same_outcome(
                archive.get_nearest_at_or_before(host, t),
                archive.get_nearest_at_or_before(host, t),
            )?;
        }
        for &from in candidates.iter().take(3) {
            for &to in candidates.iter().take(3) {
                same_outcome(archive.diff(host, from, to), archive.diff(host, from, to))?;
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn nearest_is_latest_at_or_before(
        secs in prop::collection::btree_set(MIN_UNIX..MAX_UNIX, 0..16),
        target in MIN_UNIX..MAX_UNIX,
    ) {
        let store = MemoryStore::new();
        store.add_host("web01").unwrap();
        // Inserted newest first so the store order disagrees with time order.
        for s in secs.iter().rev() {
            store.put("web01", timestamp(*s), format!("taken at {}\n", s)).unwrap();
        }
        let archive = Archive::new(store);

        let expected = secs.range(..=target).next_back().copied();
        match archive.get_nearest_at_or_before("web01", timestamp(target)) {
            Ok(snapshot) => {
                prop_assert_eq!(Some(snapshot.timestamp), expected.map(timestamp));
                prop_assert_eq!(snapshot.content, format!("taken at {}\n", snapshot.timestamp.unix()));
            }
            Err(ArchiveError::NoSnapshotBeforeDate { .. }) => {
                prop_assert_eq!(expected, None);
            }
            Err(e) => {
                prop_assert!(false, "unexpected error: {}", e);
            }
        }
    }

    #[test]
    fn timestamps_are_listed_newest_first(
        secs in prop::collection::vec(MIN_UNIX..MAX_UNIX, 0..16),
    ) {
        let store = MemoryStore::new();
        store.add_host("web01").unwrap();
        for s in &secs {
            store.put("web01", timestamp(*s), "x").unwrap();
        }
        let archive = Archive::new(store);

        let listed = archive.list_timestamps("web01").unwrap();
        let distinct: BTreeSet<i64> = secs.iter().copied().collect();
        let expected: Vec<Timestamp> = distinct.iter().rev().map(|s| timestamp(*s)).collect();
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn diff_reconstructs_both_sides(old in config_text(), new in config_text()) {
        let result = diff(&old, &new);

        prop_assert_eq!(result.old_text(), old.clone());
        prop_assert_eq!(result.new_text(), new.clone());
        prop_assert!(result.ops().iter().all(|op| !op.text.is_empty()));
        let adjacent_tags_differ = result.ops().windows(2).all(|pair| match pair {
            [a, b] => a.tag != b.tag,
            _ => true,
        });
        prop_assert!(adjacent_tags_differ);
        prop_assert_eq!(result.is_unchanged(), old == new);
    }

    #[test]
    fn diff_of_identical_texts_is_one_equal_op(text in config_text()) {
        let result = diff(&text, &text);

        if text.is_empty() {
            prop_assert!(result.is_empty());
        } else {
            prop_assert_eq!(result.ops().len(), 1);
            prop_assert_eq!(result.ops()[0].tag, DiffTag::Equal);
        }
    }

    #[test]
    fn timestamp_text_round_trips(secs in MIN_UNIX..MAX_UNIX) {
        let t = timestamp(secs);
        let text = t.format();

        prop_assert_eq!(text.len(), 20);
        prop_assert_eq!(Timestamp::parse(&text).unwrap(), t);
        prop_assert_eq!(t.unix(), secs);
    }

    #[test]
    fn canonical_text_sorts_like_time(a in MIN_UNIX..MAX_UNIX, b in MIN_UNIX..MAX_UNIX) {
        let (ta, tb) = (timestamp(a), timestamp(b));
        prop_assert_eq!(ta.format().cmp(&tb.format()), ta.cmp(&tb));
    }
}

proptest! {
    #[test]
    fn memory_reads_are_repeatable(
        hosts in history(),
        probes in prop::collection::vec(MIN_UNIX..MAX_UNIX, 0..4),
    ) {
        let store = MemoryStore::new();
        for (host, secs) in &hosts {
            store.add_host(host).unwrap();
            for s in secs {
                store.put(host, timestamp(*s), content(host, *s)).unwrap();
            }
        }
        let probes: Vec<Timestamp> = probes.into_iter().map(timestamp).collect();

        assert_reads_repeat(&Archive::new(store), &probes)?;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn file_reads_are_repeatable(
        hosts in history(),
        probes in prop::collection::vec(MIN_UNIX..MAX_UNIX, 0..4),
    ) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = FileStore::init(dir.path()).unwrap();
        for (host, secs) in &hosts {
            std::fs::create_dir_all(dir.path().join(host)).unwrap();
            for s in secs {
                store.put(host, timestamp(*s), &content(host, *s)).unwrap();
            }
        }
        let probes: Vec<Timestamp> = probes.into_iter().map(timestamp).collect();

        assert_reads_repeat(&Archive::new(store), &probes)?;
    }
}
