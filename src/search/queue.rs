//! Binary min-heap ordered by a fallible, caller-supplied comparator.
//!
//! `std::collections::BinaryHeap` needs a total `Ord`; A* orders by a user
//! callback that can fail, so sifting here returns `Result`.

use crate::Result;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry<D> {
    pub cost: D,
    pub vertex: usize,
    /// Stale once the vertex has been re-queued with a newer version.
    pub version: u32,
}

#[derive(Debug)]
pub(crate) struct CostQueue<D> {
    heap: Vec<Entry<D>>,
}

impl<D: Copy> CostQueue<D> {
    pub fn new() -> Self {
        Self { heap: Vec::new() }
    }

    pub fn push<F>(&mut self, entry: Entry<D>, less: &mut F) -> Result<()>
    where
        F: FnMut(D, D) -> Result<bool>,
    {
        self.heap.push(entry);
        let mut child = self.heap.len() - 1;
        while child > 0 {
            let parent = (child - 1) / 2;
            if !less(self.heap[child].cost, self.heap[parent].cost)? {
                break;
            }
            self.heap.swap(child, parent);
            child = parent;
        }
        Ok(())
    }

    pub fn pop<F>(&mut self, less: &mut F) -> Result<Option<Entry<D>>>
    where
        F: FnMut(D, D) -> Result<bool>,
    {
        if self.heap.is_empty() {
            return Ok(None);
        }
        let top = self.heap.swap_remove(0);
        let len = self.heap.len();
        let mut parent = 0;
        loop {
            let left = 2 * parent + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut best = left;
            if right < len && less(self.heap[right].cost, self.heap[left].cost)? {
                best = right;
            }
            if !less(self.heap[best].cost, self.heap[parent].cost)? {
                break;
            }
            self.heap.swap(parent, best);
            parent = best;
        }
        Ok(Some(top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn less(a: i32, b: i32) -> Result<bool> {
        Ok(a < b)
    }

    #[test]
    fn test_pops_in_order() {
        let mut q = CostQueue::new();
        for (i, cost) in [5, 1, 4, 2, 3, 0].into_iter().enumerate() {
            q.push(Entry { cost, vertex: i, version: 0 }, &mut less).unwrap();
        }
        let mut costs = Vec::new();
        while let Some(e) = q.pop(&mut less).unwrap() {
            costs.push(e.cost);
        }
        assert_eq!(costs, vec![0, 1, 2, 3, 4, 5]);
        assert!(q.pop(&mut less).unwrap().is_none());
    }

    #[test]
    fn test_comparator_error_propagates() {
        let mut q = CostQueue::new();
        let mut failing = |_: i32, _: i32| -> Result<bool> { Err(Error::Callback("boom".into())) };
        q.push(Entry { cost: 1, vertex: 0, version: 0 }, &mut failing).unwrap();
        let err = q.push(Entry { cost: 2, vertex: 1, version: 0 }, &mut failing).unwrap_err();
        assert!(matches!(err, Error::Callback(_)));
    }
}
