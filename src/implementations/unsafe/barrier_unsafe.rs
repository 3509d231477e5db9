use std::io;
use std::slice;
use std::thread;

use tracing::{debug, error, trace};

use crate::config::SimulationConfig;
use crate::error::LifeError;
use crate::grid::{check_pair, BoardId, Grid, GridDims};
use crate::implementations::barrier::{GenerationBarrier, StartGate};
use crate::implementations::neighbors::evolve_row;
use crate::implementations::partition::{partition_rows, RowRange};

// ラッパー構造体
#[derive(Clone, Copy)]
struct BoardPtr {
    data: *mut u8,
}

// 書き込みは行帯ごとに分離され、世代の境目はバリアで区切られる
unsafe impl Send for BoardPtr {}
unsafe impl Sync for BoardPtr {}

impl BoardPtr {
    // クロージャがフィールドではなく構造体ごとキャプチャするようにメソッド経由で取得
    fn as_ptr(self) -> *mut u8 {
        self.data
    }
}

/// ワーカー1本が実行全体で使う情報
///
/// 変化するのはローカルの current/next ポインタだけで、バリアを抜けるたびに入れ替える。
struct WorkerContext<'a> {
    id: usize,
    outboard: BoardPtr,
    inboard: BoardPtr,
    dims: GridDims,
    range: RowRange,
    gens_max: usize,
    barrier: &'a GenerationBarrier,
    gate: &'a StartGate,
}

impl WorkerContext<'_> {
    fn run(self) {
        if !self.gate.wait() {
            debug!(worker = self.id, "start aborted");
            return;
        }
        debug!(
            worker = self.id,
            from = self.range.from,
            to = self.range.to,
            "worker started"
        );

        let mut current = self.inboard.as_ptr();
        let mut next = self.outboard.as_ptr();

        for generation in 0..self.gens_max {
            // 空の行帯でもバリアには必ず参加する
            unsafe {
                evolve_band(current, next, &self.dims, self.range);
            }
            if self.barrier.wait() {
                trace!(generation, "generation complete");
            }
            std::mem::swap(&mut current, &mut next);
        }

        debug!(worker = self.id, "worker finished");
    }
}

/// `src` だけを読み、`range` の行の次世代を `dst` に書き込む
///
/// # Safety
/// `src` と `dst` はそれぞれ別バッファの `dims.len()` バイトを指すこと。
/// 呼び出し中は誰も `src` に書き込まず、`dst` の `range` 内の行には他スレッドが触れないこと。
#[inline(always)]
unsafe fn evolve_band(src: *const u8, dst: *mut u8, dims: &GridDims, range: RowRange) {
    if range.is_empty() {
        return;
    }
    let stride = dims.stride;
    // SAFETY: 呼び出し側の契約により src は読み取り専用、dst の行帯は排他
    let (src, band) = unsafe {
        (
            slice::from_raw_parts(src, dims.len()),
            slice::from_raw_parts_mut(dst.add(range.from * stride), range.len() * stride),
        )
    };
    for (row, i) in band.chunks_exact_mut(stride).zip(range.rows()) {
        evolve_row(src, row, dims, i);
    }
}

/// `inboard` を `gens_max` 世代進める（`config.worker_count` 本の常駐スレッド）
///
/// `outboard` は作業用の2枚目として使い、どちらのバッファも再確保しない。
/// 戻り値の [`BoardId`] が最終世代を持つ盤面: 偶数なら `Inboard`、奇数なら `Outboard`。
/// ワーカーを1本でも生成できなければ、生成済みのワーカーは何も計算せずに終了し、
/// 生成エラーを返す。
pub fn barrier_parallel(
    outboard: &mut Grid,
    inboard: &mut Grid,
    gens_max: usize,
    config: &SimulationConfig,
) -> Result<BoardId, LifeError> {
    run_workers(outboard, inboard, gens_max, config, |id| {
        Ok(thread::Builder::new().name(format!("life-worker-{id}")))
    })
}

/// ワーカー `id` 用の `thread::Builder` を `worker_builder` から受け取って起動する
fn run_workers<F>(
    outboard: &mut Grid,
    inboard: &mut Grid,
    gens_max: usize,
    config: &SimulationConfig,
    mut worker_builder: F,
) -> Result<BoardId, LifeError>
where
    F: FnMut(usize) -> io::Result<thread::Builder>,
{
    let dims = check_pair(outboard, inboard)?;
    let worker_count = config.worker_count;
    if worker_count == 0 {
        return Err(LifeError::NoWorkers);
    }
    if gens_max == 0 {
        return Ok(BoardId::Inboard);
    }

    let ranges = partition_rows(dims.rows, worker_count);
    debug!(
        rows = dims.rows,
        cols = dims.cols,
        stride = dims.stride,
        gens_max,
        worker_count,
        "starting run"
    );

    let barrier = GenerationBarrier::new(worker_count);
    let gate = StartGate::new();
    let outboard = BoardPtr { data: outboard.data.as_mut_ptr() };
    let inboard = BoardPtr { data: inboard.data.as_mut_ptr() };

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(worker_count);
        for (id, range) in ranges.into_iter().enumerate() {
            let ctx = WorkerContext {
                id,
                outboard,
                inboard,
                dims,
                range,
                gens_max,
                barrier: &barrier,
                gate: &gate,
            };
            let spawned =
                worker_builder(id).and_then(|builder| builder.spawn_scoped(scope, move || ctx.run()));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    error!(worker = id, %source, "failed to spawn worker, aborting run");
                    // 起動済みのワーカーはゲートで止まっているので、解放して終了させる
                    gate.abort();
                    return Err(LifeError::WorkerSpawn { worker: id, source });
                }
            }
        }
        gate.open();

        let mut result = Ok(());
        for (id, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() && result.is_ok() {
                result = Err(LifeError::WorkerPanicked { worker: id });
            }
        }
        result
    })?;

    Ok(BoardId::for_generations(gens_max))
}

/// 既定のワーカー数で [`barrier_parallel`] を実行
pub fn game_of_life(
    outboard: &mut Grid,
    inboard: &mut Grid,
    gens_max: usize,
) -> Result<BoardId, LifeError> {
    barrier_parallel(outboard, inboard, gens_max, &SimulationConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn band_writes_only_its_rows() {
        let dims = GridDims::new(6, 4);
        let src = Grid::from_cells(dims, &[(2, 0), (2, 1), (2, 2)]);
        let mut dst = Grid::new(dims);
        dst.data.fill(9);
        let range = RowRange { from: 1, to: 3 };
        unsafe {
            evolve_band(src.data.as_ptr(), dst.data.as_mut_ptr(), &dims, range);
        }
        for i in 0..dims.rows {
            let row = &dst.data[i * 4..(i + 1) * 4];
            if range.rows().contains(&i) {
                assert!(row.iter().all(|&c| c <= 1), "row {i} not evolved: {row:?}");
            } else {
                assert!(row.iter().all(|&c| c == 9), "row {i} touched: {row:?}");
            }
        }
        // 横3連の中心列が縦に伸びる
        assert_eq!(&dst.data[4..8], &[0, 1, 0, 0]);
    }

    #[test]
    fn padding_bytes_untouched() {
        let dims = GridDims::with_stride(4, 3, 5);
        let src = Grid::from_cells(dims, &[(1, 1), (1, 2), (2, 1), (2, 2)]);
        let mut dst = Grid::new(dims);
        dst.data.fill(7);
        unsafe {
            evolve_band(src.data.as_ptr(), dst.data.as_mut_ptr(), &dims, RowRange { from: 0, to: 4 });
        }
        for i in 0..dims.rows {
            assert_eq!(&dst.data[i * 5 + 3..i * 5 + 5], &[7, 7]);
        }
    }

    #[test]
    fn zero_workers_rejected() {
        let mut a = Grid::new(GridDims::new(4, 4));
        let mut b = Grid::new(GridDims::new(4, 4));
        let config = SimulationConfig::default().worker_count(0);
        assert!(matches!(
            barrier_parallel(&mut a, &mut b, 3, &config),
            Err(LifeError::NoWorkers)
        ));
    }

    #[test]
    fn spawn_failure_aborts_started_workers() {
        let dims = GridDims::new(8, 6);
        let inboard = Grid::from_cells(dims, &[(1, 1), (1, 2), (1, 3), (5, 0), (6, 4)]);
        let mut outboard = Grid::new(dims);
        outboard.data.fill(3);
        let (in_before, out_before) = (inboard.clone(), outboard.clone());

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let (mut inboard, mut outboard) = (inboard, outboard);
            let mut requested = Vec::new();
            let config = SimulationConfig::default().worker_count(4);
            // 3本目（id 2）の生成だけ失敗させる
            let result = run_workers(&mut outboard, &mut inboard, 5, &config, |id| {
                requested.push(id);
                if id == 2 {
                    Err(io::Error::new(io::ErrorKind::WouldBlock, "thread limit reached"))
                } else {
                    Ok(thread::Builder::new())
                }
            });
            let _ = tx.send((result, requested, outboard, inboard));
        });

        // 起動済みワーカーが解放されなければここでタイムアウトする
        let (result, requested, outboard, inboard) = rx
            .recv_timeout(Duration::from_secs(10))
            .expect("run did not return after spawn failure");

        assert!(
            matches!(result, Err(LifeError::WorkerSpawn { worker: 2, .. })),
            "unexpected result: {result:?}"
        );
        assert_eq!(requested, vec![0, 1, 2]);
        assert_eq!(inboard, in_before);
        assert_eq!(outboard, out_before);
    }

    #[test]
    fn every_worker_gets_a_builder() {
        let dims = GridDims::new(6, 6);
        let mut inboard = Grid::from_cells(dims, &[(2, 1), (2, 2), (2, 3)]);
        let mut outboard = Grid::new(dims);
        let mut requested = Vec::new();
        let config = SimulationConfig::default().worker_count(3);

        let last = run_workers(&mut outboard, &mut inboard, 1, &config, |id| {
            requested.push(id);
            Ok(thread::Builder::new())
        })
        .unwrap();

        assert_eq!(requested, vec![0, 1, 2]);
        assert_eq!(last, BoardId::Outboard);
        assert_eq!(outboard.live_cells(), vec![(1, 2), (2, 2), (3, 2)]);
    }
}
