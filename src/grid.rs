use std::fmt;

use crate::error::LifeError;

pub const ROWS: usize = 1024; // 既定の行数
pub const COLS: usize = 1024; // 既定の列数
pub const GENERATIONS: usize = 200; // ベンチマークの世代数
pub const WARMUP_GENERATIONS: usize = 5; // ウォームアップ世代数

pub const DEAD: u8 = 0;
pub const ALIVE: u8 = 1;

/// 盤面の論理サイズと物理的な行ピッチ
///
/// `stride` は `cols` より大きくてもよい。各行の `cols` 以降はパディングで、
/// どのカーネルも読み書きしない。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridDims {
    pub rows: usize,
    pub cols: usize,
    pub stride: usize,
}

impl GridDims {
    pub fn new(rows: usize, cols: usize) -> Self {
        GridDims { rows, cols, stride: cols }
    }

    pub fn with_stride(rows: usize, cols: usize, stride: usize) -> Self {
        GridDims { rows, cols, stride }
    }

    pub fn validate(&self) -> Result<(), LifeError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(LifeError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.stride < self.cols {
            return Err(LifeError::StrideTooSmall {
                stride: self.stride,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// この形状のバッファのバイト数
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.stride * self.rows
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline(always)]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.stride + j
    }
}

/// 呼び出し側が所有するセルバッファ（カーネルは借用するだけで再確保しない）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    pub data: Vec<u8>,
    pub dims: GridDims,
}

impl Grid {
    /// 全セルが死んだ盤面
    pub fn new(dims: GridDims) -> Self {
        Grid {
            data: vec![DEAD; dims.len()],
            dims,
        }
    }

    /// `(row, col)` のセルを生存にした盤面
    pub fn from_cells(dims: GridDims, cells: &[(usize, usize)]) -> Self {
        let mut grid = Grid::new(dims);
        for &(i, j) in cells {
            grid.set(i, j, true);
        }
        grid
    }

    pub fn rows(&self) -> usize {
        self.dims.rows
    }

    pub fn cols(&self) -> usize {
        self.dims.cols
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        self.data[self.dims.index(i, j)] != DEAD
    }

    pub fn set(&mut self, i: usize, j: usize, alive: bool) {
        let idx = self.dims.index(i, j);
        self.data[idx] = if alive { ALIVE } else { DEAD };
    }

    pub fn population(&self) -> usize {
        self.rows_iter()
            .map(|row| row.iter().filter(|&&c| c != DEAD).count())
            .sum()
    }

    /// 生存セルを行優先順で返す
    pub fn live_cells(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (i, row) in self.rows_iter().enumerate() {
            for (j, &c) in row.iter().enumerate() {
                if c != DEAD {
                    out.push((i, j));
                }
            }
        }
        out
    }

    /// 各行の論理セル（パディングを除く）
    fn rows_iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let cols = self.dims.cols;
        self.data
            .chunks(self.dims.stride)
            .take(self.dims.rows)
            .map(move |row| &row[..cols])
    }

    /// パディングを無視して論理セルが一致するか
    pub fn same_cells(&self, other: &Grid) -> bool {
        self.dims.rows == other.dims.rows
            && self.dims.cols == other.dims.cols
            && self
                .rows_iter()
                .zip(other.rows_iter())
                .all(|(a, b)| a.iter().zip(b).all(|(&x, &y)| (x != DEAD) == (y != DEAD)))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows_iter() {
            for &c in row {
                f.write_str(if c != DEAD { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// 2枚の盤面の形状とバッファ長を検査し、共通の形状を返す
pub fn check_pair(outboard: &Grid, inboard: &Grid) -> Result<GridDims, LifeError> {
    if outboard.dims != inboard.dims {
        return Err(LifeError::ShapeMismatch);
    }
    let dims = inboard.dims;
    dims.validate()?;
    for grid in [outboard, inboard] {
        if grid.data.len() != dims.len() {
            return Err(LifeError::BufferLength {
                expected: dims.len(),
                actual: grid.data.len(),
            });
        }
    }
    Ok(dims)
}

/// 最終世代を保持している盤面
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardId {
    Outboard,
    Inboard,
}

impl BoardId {
    /// 世代数が偶数なら `inboard`、奇数なら `outboard` に結果が残る
    pub fn for_generations(gens_max: usize) -> Self {
        if gens_max % 2 == 0 {
            BoardId::Inboard
        } else {
            BoardId::Outboard
        }
    }

    pub fn select<'a>(self, outboard: &'a Grid, inboard: &'a Grid) -> &'a Grid {
        match self {
            BoardId::Outboard => outboard,
            BoardId::Inboard => inboard,
        }
    }
}
