//! Path reconstruction from a predecessor map.

use crate::property::VectorPropertyMap;
use crate::{Error, Result};

/// Vertices from `source` to `target` inclusive, following `pred` backwards.
///
/// `None` when `target` was not reached: its chain ends at a vertex that is
/// its own predecessor without being `source`.
pub fn shortest_path(pred: &VectorPropertyMap<i64>, source: usize, target: usize) -> Result<Option<Vec<usize>>> {
    let pred = pred.read();
    let len = pred.len();
    if source >= len {
        return Err(Error::IndexOutOfRange { index: source, len });
    }

    let mut path = vec![target];
    let mut v = target;
    while v != source {
        let p = *pred.get(v).ok_or(Error::IndexOutOfRange { index: v, len })?;
        let p = usize::try_from(p).map_err(|_| Error::IndexOutOfRange { index: v, len })?;
        // A chain longer than the map means the predecessors loop.
        if p == v || path.len() > len {
            return Ok(None);
        }
        path.push(p);
        v = p;
    }
    path.reverse();
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Key;

    #[test]
    fn test_reconstructs_path() {
        let pred = VectorPropertyMap::from_vec(Key::Vertex, vec![0, 0, 1, 2, 4]);
        assert_eq!(shortest_path(&pred, 0, 3).unwrap(), Some(vec![0, 1, 2, 3]));
        assert_eq!(shortest_path(&pred, 0, 0).unwrap(), Some(vec![0]));
    }

    #[test]
    fn test_unreached_target() {
        let pred = VectorPropertyMap::from_vec(Key::Vertex, vec![0, 0, 1, 2, 4]);
        assert_eq!(shortest_path(&pred, 0, 4).unwrap(), None);
    }

    #[test]
    fn test_out_of_range() {
        let pred = VectorPropertyMap::from_vec(Key::Vertex, vec![0, 0]);
        assert!(matches!(shortest_path(&pred, 0, 7), Err(Error::IndexOutOfRange { index: 7, len: 2 })));
    }

    #[test]
    fn test_predecessor_loop() {
        let pred = VectorPropertyMap::from_vec(Key::Vertex, vec![0, 2, 1]);
        assert_eq!(shortest_path(&pred, 0, 2).unwrap(), None);
    }
}
