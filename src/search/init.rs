//! Bulk initialization of distance and predecessor buffers.
//!
//! Above the configured threshold the fill fans out over rayon's pool.
//! Every slot is written independently, so order does not matter; the fan
//! out joins before the search itself starts.

use tracing::trace;

pub(crate) fn fill<T: Copy + Send + Sync>(buf: &mut [T], value: T, threshold: usize) {
    if buf.len() > threshold {
        trace!(len = buf.len(), "parallel sentinel fill");
        fanout::fill(buf, value);
    } else {
        buf.fill(value);
    }
}

/// `buf[i] = i` for every slot.
pub(crate) fn fill_identity(buf: &mut [i64], threshold: usize) {
    if buf.len() > threshold {
        fanout::fill_identity(buf);
    } else {
        buf.iter_mut().enumerate().for_each(|(i, slot)| *slot = i as i64);
    }
}

#[cfg(feature = "parallel")]
mod fanout {
    use rayon::prelude::*;

    pub fn fill<T: Copy + Send + Sync>(buf: &mut [T], value: T) {
        buf.par_iter_mut().for_each(|slot| *slot = value);
    }

    pub fn fill_identity(buf: &mut [i64]) {
        buf.par_iter_mut().enumerate().for_each(|(i, slot)| *slot = i as i64);
    }
}

#[cfg(not(feature = "parallel"))]
mod fanout {
    pub fn fill<T: Copy>(buf: &mut [T], value: T) {
        buf.fill(value);
    }

    pub fn fill_identity(buf: &mut [i64]) {
        buf.iter_mut().enumerate().for_each(|(i, slot)| *slot = i as i64);
    }
}
