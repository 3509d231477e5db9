use rayon::prelude::*;

use crate::error::LifeError;
use crate::grid::{check_pair, BoardId, Grid};
use crate::implementations::neighbors::evolve_row;

/*
  Rayon-based parallel implementation

  1. Rows are handed to Rayon's work-stealing pool each generation
  2. Each output row is a disjoint &mut chunk, so no unsafe is needed
  3. The end of the parallel iterator is the generation boundary
*/

pub fn rayon_parallel(
    outboard: &mut Grid,
    inboard: &mut Grid,
    gens_max: usize,
) -> Result<BoardId, LifeError> {
    let dims = check_pair(outboard, inboard)?;

    for generation in 0..gens_max {
        let (src, dst) = if generation % 2 == 0 {
            (&inboard.data[..], &mut outboard.data[..])
        } else {
            (&outboard.data[..], &mut inboard.data[..])
        };

        dst.par_chunks_exact_mut(dims.stride)
            .enumerate()
            .for_each(|(i, row)| evolve_row(src, row, &dims, i));
    }

    Ok(BoardId::for_generations(gens_max))
}
