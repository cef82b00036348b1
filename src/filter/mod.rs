// Pixel pre-filters applied before LZSS.
//
// - `delta`: two-stage spatial prediction (vertical, then first-row horizontal)
// - `flip`: row order reversal
//
// Encode order is delta then flip; decode undoes them in reverse.

pub mod delta;
pub mod flip;

pub use delta::{apply as apply_delta, revert as revert_delta};
pub use flip::flip_rows;
