//! Observation seam for between-level buffer state.
//!
//! The leveled engines call the observer on the coordinating thread after
//! each level's barrier, never inside a parallel step. Implementations can
//! therefore borrow the buffer freely, print, or record without any
//! synchronization of their own.

/// Which traversal produced the completed level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Tree reduction, leaves toward the root.
    Reduce,
    /// Scan phase one, partial aggregates bottom-up.
    Upsweep,
    /// Scan phase two, exclusive prefixes top-down.
    Downsweep,
}

/// Receives the working buffer after each completed level.
pub trait LevelObserver<T> {
    fn level_done(&mut self, phase: Phase, level: u32, stride: usize, buffer: &[T]);
}

/// No-op observer for plain runs.
impl<T> LevelObserver<T> for () {
    fn level_done(&mut self, _phase: Phase, _level: u32, _stride: usize, _buffer: &[T]) {}
}

/// Buffer prefix length recorded by default, enough to follow a small
/// example end to end without flooding the output on large inputs.
pub const DEFAULT_SNAPSHOT_PREFIX: usize = 16;

/// State of the working buffer right after one level's barrier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot<T> {
    pub phase: Phase,
    pub level: u32,
    pub stride: usize,
    /// Leading slots of the buffer, capped at the recorder's prefix limit.
    pub prefix: Vec<T>,
}

/// Observer that records a bounded prefix of the buffer per level.
#[derive(Clone, Debug)]
pub struct SnapshotRecorder<T> {
    max_prefix: usize,
    snapshots: Vec<Snapshot<T>>,
}

impl<T: Copy> SnapshotRecorder<T> {
    pub fn new(max_prefix: usize) -> Self {
        Self {
            max_prefix,
            snapshots: Vec::new(),
        }
    }

    pub fn snapshots(&self) -> &[Snapshot<T>] {
        &self.snapshots
    }
}

impl<T: Copy> LevelObserver<T> for SnapshotRecorder<T> {
    fn level_done(&mut self, phase: Phase, level: u32, stride: usize, buffer: &[T]) {
        let take = buffer.len().min(self.max_prefix);
        self.snapshots.push(Snapshot {
            phase,
            level,
            stride,
            prefix: buffer[..take].to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_caps_the_prefix() {
        let mut recorder = SnapshotRecorder::new(4);
        recorder.level_done(Phase::Reduce, 0, 1, &[9i64, 8, 7, 6, 5, 4]);
        let snaps = recorder.snapshots();
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].prefix, vec![9, 8, 7, 6]);
        assert_eq!(snaps[0].stride, 1);
    }

    #[test]
    fn recorder_takes_short_buffers_whole() {
        let mut recorder = SnapshotRecorder::new(16);
        recorder.level_done(Phase::Upsweep, 2, 8, &[1i32, 2]);
        assert_eq!(recorder.snapshots()[0].prefix, vec![1, 2]);
    }
}
