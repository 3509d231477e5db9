use crate::grid::{GridDims, ALIVE, DEAD};

#[inline(always)]
fn alive(cell: u8) -> u8 {
    (cell != DEAD) as u8
}

/// B3/S23: 生存セルは隣接2か3で生存、死セルは隣接3で誕生
#[inline(always)]
pub fn alivep(neighbors: u8, cell: u8) -> u8 {
    match (neighbors, cell != DEAD) {
        (3, _) | (2, true) => ALIVE,
        _ => DEAD,
    }
}

#[inline(always)]
fn sum_neighbors(
    src: &[u8],
    stride: usize,
    (inorth, i, isouth): (usize, usize, usize),
    (jwest, j, jeast): (usize, usize, usize),
) -> u8 {
    let n = inorth * stride;
    let c = i * stride;
    let s = isouth * stride;
    alive(src[n + jwest])
        + alive(src[n + j])
        + alive(src[n + jeast])
        + alive(src[c + jwest])
        + alive(src[c + jeast])
        + alive(src[s + jwest])
        + alive(src[s + j])
        + alive(src[s + jeast])
}

/// `(i, j)` のトーラス上の8近傍の生存数
///
/// 剰余を使うのは先頭・末尾の行と列だけで、内部は単純な `±1`。
/// 結果は [`count_neighbors_wrapped`] と常に一致する。
#[inline(always)]
pub fn count_neighbors(src: &[u8], dims: &GridDims, i: usize, j: usize) -> u8 {
    let GridDims { rows, cols, stride } = *dims;

    let (inorth, isouth) = if i == 0 || i == rows - 1 {
        ((i + rows - 1) % rows, (i + 1) % rows)
    } else {
        (i - 1, i + 1)
    };
    let (jwest, jeast) = if j == 0 || j == cols - 1 {
        ((j + cols - 1) % cols, (j + 1) % cols)
    } else {
        (j - 1, j + 1)
    };

    sum_neighbors(src, stride, (inorth, i, isouth), (jwest, j, jeast))
}

/// 素朴版: すべての近傍インデックスで剰余をとる
pub fn count_neighbors_wrapped(src: &[u8], dims: &GridDims, i: usize, j: usize) -> u8 {
    let wrap = |x: usize, d: isize, n: usize| (x as isize + d).rem_euclid(n as isize) as usize;
    let rows = (wrap(i, -1, dims.rows), i, wrap(i, 1, dims.rows));
    let cols = (wrap(j, -1, dims.cols), j, wrap(j, 1, dims.cols));
    sum_neighbors(src, dims.stride, rows, cols)
}

/// `src` の論理行 `i` の次世代を `dst_row[..cols]` に書き込む
#[inline(always)]
pub fn evolve_row(src: &[u8], dst_row: &mut [u8], dims: &GridDims, i: usize) {
    let row = i * dims.stride;
    for (j, out) in dst_row[..dims.cols].iter_mut().enumerate() {
        let neighbors = count_neighbors(src, dims, i, j);
        *out = alivep(neighbors, src[row + j]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_grid(dims: GridDims, seed: u64) -> Grid {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut grid = Grid::new(dims);
        for i in 0..dims.rows {
            for j in 0..dims.cols {
                grid.set(i, j, rng.gen_bool(0.4));
            }
        }
        grid
    }

    fn assert_paths_agree(grid: &Grid) {
        for i in 0..grid.rows() {
            for j in 0..grid.cols() {
                assert_eq!(
                    count_neighbors(&grid.data, &grid.dims, i, j),
                    count_neighbors_wrapped(&grid.data, &grid.dims, i, j),
                    "neighbour mismatch at ({i}, {j}) on {:?}",
                    grid.dims
                );
            }
        }
    }

    #[test]
    fn fast_path_matches_modulo() {
        assert_paths_agree(&random_grid(GridDims::new(3, 3), 1));
        assert_paths_agree(&random_grid(GridDims::new(17, 23), 2));
        assert_paths_agree(&random_grid(GridDims::with_stride(9, 5, 8), 3));
    }

    #[test]
    fn degenerate_single_row_or_column() {
        assert_paths_agree(&random_grid(GridDims::new(1, 7), 4));
        assert_paths_agree(&random_grid(GridDims::new(6, 1), 5));
        assert_paths_agree(&random_grid(GridDims::new(1, 1), 6));
        assert_paths_agree(&random_grid(GridDims::new(2, 2), 7));
    }

    #[test]
    fn single_live_cell_wraps_onto_itself() {
        // 1x1では8方向すべてが自分自身
        let grid = Grid::from_cells(GridDims::new(1, 1), &[(0, 0)]);
        assert_eq!(count_neighbors(&grid.data, &grid.dims, 0, 0), 8);
    }

    #[test]
    fn corner_sees_opposite_edges() {
        let dims = GridDims::new(5, 5);
        let grid = Grid::from_cells(dims, &[(4, 4), (0, 4), (4, 0)]);
        assert_eq!(count_neighbors(&grid.data, &dims, 0, 0), 3);
        assert_eq!(count_neighbors(&grid.data, &dims, 2, 2), 0);
    }

    #[test]
    fn nonzero_bytes_count_as_alive() {
        let dims = GridDims::new(3, 3);
        let mut grid = Grid::new(dims);
        grid.data[0] = 0xFF;
        grid.data[1] = 7;
        assert_eq!(count_neighbors(&grid.data, &dims, 1, 1), 2);
    }

    #[test]
    fn transition_rule() {
        for n in 0..=8 {
            let survives = alivep(n, ALIVE);
            let born = alivep(n, DEAD);
            assert_eq!(survives, (n == 2 || n == 3) as u8, "live cell, {n} neighbours");
            assert_eq!(born, (n == 3) as u8, "dead cell, {n} neighbours");
        }
        assert_eq!(alivep(2, 0x80), ALIVE);
    }
}
