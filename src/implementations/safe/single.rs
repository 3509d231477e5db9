use std::mem;

use crate::error::LifeError;
use crate::grid::{check_pair, BoardId, Grid};
use crate::implementations::neighbors::{alivep, count_neighbors_wrapped};

/// シングルスレッド版（正解データ）
///
/// すべての近傍で剰余をとるので並列版の高速パスと共有部分がなく、
/// 並列版の検証に使える。
pub fn sequential_game_of_life(
    outboard: &mut Grid,
    inboard: &mut Grid,
    gens_max: usize,
) -> Result<BoardId, LifeError> {
    let dims = check_pair(outboard, inboard)?;

    let mut src = &mut inboard.data;
    let mut dst = &mut outboard.data;

    for _ in 0..gens_max {
        for i in 0..dims.rows {
            for j in 0..dims.cols {
                let idx = dims.index(i, j);
                let neighbors = count_neighbors_wrapped(src, &dims, i, j);
                dst[idx] = alivep(neighbors, src[idx]);
            }
        }
        mem::swap(&mut src, &mut dst);
    }

    Ok(BoardId::for_generations(gens_max))
}
