//! Per-frame entity sweep
//!
//! Every collection in the world is updated by one pass that visits each
//! element exactly once, drops the ones that are finished and keeps the rest
//! in their original order. Entities spawned during a pass are queued and
//! appended afterwards, so they are not visited until the next frame.
//!
//! A visit that fails only costs its own entity: the error is logged, the
//! entity is dropped and the pass carries on.

use crate::SimError;

/// What happens to an entity after its visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Keep,
    Remove,
}

impl Fate {
    pub fn keep_if(alive: bool) -> Self {
        if alive { Fate::Keep } else { Fate::Remove }
    }
}

#[derive(Debug, Default)]
pub struct SweepReport {
    pub visited: usize,
    pub removed: usize,
    pub spawned: usize,
    /// Visits that failed; those entities were dropped
    pub faults: Vec<SimError>,
}

/// Visit every item once, removing those whose visit returns `Fate::Remove`
/// or an error
pub fn sweep<T, F>(items: &mut Vec<T>, mut visit: F) -> SweepReport
where
    F: FnMut(&mut T) -> Result<Fate, SimError>,
{
    sweep_spawning(items, |item, _| visit(item))
}

/// Like [`sweep`], but each visit may queue new items. Queued items are
/// appended after the pass in the order they were queued.
pub fn sweep_spawning<T, F>(items: &mut Vec<T>, mut visit: F) -> SweepReport
where
    F: FnMut(&mut T, &mut Vec<T>) -> Result<Fate, SimError>,
{
    let mut report = SweepReport::default();
    let mut queued = Vec::new();
    items.retain_mut(|item| {
        report.visited += 1;
        match visit(item, &mut queued) {
            Ok(Fate::Keep) => true,
            Ok(Fate::Remove) => {
                report.removed += 1;
                false
            }
            Err(err) => {
                log::warn!("dropping entity after failed update: {err}");
                report.removed += 1;
                report.faults.push(err);
                false
            }
        }
    });
    report.spawned = queued.len();
    items.append(&mut queued);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_removal_keeps_survivor_order() {
        let mut items = vec![1, 2, 3, 4, 5, 6];
        let report = sweep(&mut items, |n| Ok(Fate::keep_if(*n % 2 == 0)));
        assert_eq!(items, vec![2, 4, 6]);
        assert_eq!(report.visited, 6);
        assert_eq!(report.removed, 3);
        assert!(report.faults.is_empty());
    }

    #[test]
    fn test_fault_drops_only_that_entity() {
        let mut items = vec![1, 2, 3];
        let mut seen = Vec::new();
        let report = sweep(&mut items, |n| {
            seen.push(*n);
            if *n == 2 {
                Err(SimError::NonFinite { entity: "test" })
            } else {
                Ok(Fate::Keep)
            }
        });
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(items, vec![1, 3]);
        assert_eq!(report.faults.len(), 1);
    }

    #[test]
    fn test_spawns_are_appended_unvisited() {
        let mut items = vec![10, 20];
        let mut seen = Vec::new();
        let report = sweep_spawning(&mut items, |n, spawn| {
            seen.push(*n);
            spawn.push(*n + 1);
            Ok(Fate::Remove)
        });
        assert_eq!(seen, vec![10, 20]);
        assert_eq!(items, vec![11, 21]);
        assert_eq!(report.spawned, 2);
    }

    #[test]
    fn test_empty_collection() {
        let mut items: Vec<u8> = Vec::new();
        let report = sweep(&mut items, |_| Ok(Fate::Keep));
        assert_eq!(report.visited, 0);
    }

    proptest! {
        #[test]
        fn visits_each_once_in_order(
            values in prop::collection::vec(any::<u16>(), 0..64),
            modulus in 1u16..5,
        ) {
            let mut items = values.clone();
            let mut seen = Vec::new();
            sweep(&mut items, |v| {
                seen.push(*v);
                Ok(Fate::keep_if(*v % modulus != 0))
            });
            prop_assert_eq!(&seen, &values);
            let expected: Vec<u16> = values.into_iter().filter(|v| v % modulus != 0).collect();
            prop_assert_eq!(items, expected);
        }
    }
}
