//! Spatial delta filter.
//!
//! Every byte below the first row becomes its wrapping difference from the
//! byte directly above it; bytes of the first row (except the first pixel)
//! become the difference from the same channel of the previous pixel.
//!
//! Both passes run back to front so each prediction reads an unfiltered
//! neighbour. [`revert`] performs the matching additions front to back.

/// Apply the filter in place.
///
/// `pixel_size` is the byte count per pixel and `stride` the byte count per
/// row. Buffers shorter than a row only get the horizontal pass over what is
/// there.
pub fn apply(pixels: &mut [u8], pixel_size: usize, stride: usize) {
    for i in (stride..pixels.len()).rev() {
        pixels[i] = pixels[i].wrapping_sub(pixels[i - stride]);
    }

    let row = stride.min(pixels.len());
    for i in (pixel_size..row).rev() {
        pixels[i] = pixels[i].wrapping_sub(pixels[i - pixel_size]);
    }
}

/// Undo [`apply`] in place.
pub fn revert(pixels: &mut [u8], pixel_size: usize, stride: usize) {
    let row = stride.min(pixels.len());
    for i in pixel_size..row {
        pixels[i] = pixels[i].wrapping_add(pixels[i - pixel_size]);
    }

    for i in stride..pixels.len() {
        pixels[i] = pixels[i].wrapping_add(pixels[i - stride]);
    }
}
