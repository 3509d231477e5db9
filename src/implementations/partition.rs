use std::ops::Range;

/// Half-open band of rows `[from, to)` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRange {
    pub from: usize,
    pub to: usize,
}

impl RowRange {
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn rows(&self) -> Range<usize> {
        self.from..self.to
    }
}

/// Band of worker `worker_id`. Remainder rows go to the later workers.
pub fn row_range(rows: usize, worker_id: usize, worker_count: usize) -> RowRange {
    RowRange {
        from: worker_id * rows / worker_count,
        to: (worker_id + 1) * rows / worker_count,
    }
}

/// Disjoint bands covering `[0, rows)`, one per worker. With fewer rows than
/// workers some bands are empty.
pub fn partition_rows(rows: usize, worker_count: usize) -> Vec<RowRange> {
    (0..worker_count)
        .map(|id| row_range(rows, id, worker_count))
        .collect()
}
