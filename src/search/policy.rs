//! Early-termination policy: target set plus distance cutoff.

use hashbrown::HashSet;
use tracing::trace;

use crate::model::Distance;
use super::Control;

/// Vertices whose arrival ends a search.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Targets {
    #[default]
    None,
    Single(usize),
    /// Shrinks as targets are reached; the search stops when it empties.
    Multi(HashSet<usize>),
}

impl Targets {
    /// Duplicates collapse, so `[t, t]` is a single target.
    pub fn from_slice(targets: &[usize]) -> Self {
        match targets {
            [] => Targets::None,
            [t] => Targets::Single(*t),
            many => {
                let set: HashSet<usize> = many.iter().copied().collect();
                if set.len() == 1 {
                    Targets::Single(many[0])
                } else {
                    Targets::Multi(set)
                }
            }
        }
    }

    /// Record that `v` was reached. True when nothing is left outstanding.
    pub fn reached(&mut self, v: usize) -> bool {
        match self {
            Targets::None => false,
            Targets::Single(t) => *t == v,
            Targets::Multi(set) => set.remove(&v) && set.is_empty(),
        }
    }

    /// Targets still outstanding.
    pub fn remaining(&self) -> usize {
        match self {
            Targets::None => 0,
            Targets::Single(_) => 1,
            Targets::Multi(set) => set.len(),
        }
    }
}

/// When a running search should stop.
#[derive(Debug, Clone)]
pub struct TerminationPolicy<D> {
    targets: Targets,
    max_distance: D,
}

impl<D: Distance> TerminationPolicy<D> {
    /// A non-positive or NaN `max_distance` disables the cutoff.
    pub fn new(targets: &[usize], max_distance: f64) -> Self {
        let max_distance = if max_distance > 0.0 {
            D::from_weight(max_distance)
        } else {
            D::infinity()
        };
        Self { targets: Targets::from_slice(targets), max_distance }
    }

    /// Never stops.
    pub fn unbounded() -> Self {
        Self { targets: Targets::None, max_distance: D::infinity() }
    }

    pub fn with_targets(targets: Targets, max_distance: D) -> Self {
        Self { targets, max_distance }
    }

    pub fn targets(&self) -> &Targets {
        &self.targets
    }

    pub fn max_distance(&self) -> D {
        self.max_distance
    }

    /// Stop if a vertex at `dist` is past the cutoff.
    pub fn cutoff(&self, v: usize, dist: D) -> Control {
        if dist > self.max_distance {
            trace!(vertex = v, "distance cutoff exceeded");
            Control::Stop
        } else {
            Control::Continue
        }
    }

    /// Stop if reaching `v` leaves no target outstanding.
    pub fn reach(&mut self, v: usize) -> Control {
        if self.targets.reached(v) {
            trace!(vertex = v, "last target reached");
            Control::Stop
        } else {
            Control::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_from_slice() {
        assert_eq!(Targets::from_slice(&[]), Targets::None);
        assert_eq!(Targets::from_slice(&[4]), Targets::Single(4));
        assert_eq!(Targets::from_slice(&[4, 4]), Targets::Single(4));
        assert_eq!(Targets::from_slice(&[1, 2, 2]).remaining(), 2);
    }

    #[test]
    fn test_multi_target_exhaustion() {
        let mut targets = Targets::from_slice(&[1, 2]);
        assert!(!targets.reached(3));
        assert!(!targets.reached(1));
        assert!(!targets.reached(1));
        assert!(targets.reached(2));
    }

    #[test]
    fn test_cutoff_disabled_when_non_positive() {
        let policy = TerminationPolicy::<i32>::new(&[], 0.0);
        assert_eq!(policy.max_distance(), i32::MAX);
        assert_eq!(policy.cutoff(0, i32::MAX - 1), Control::Continue);

        let policy = TerminationPolicy::<f64>::new(&[], f64::NAN);
        assert_eq!(policy.max_distance(), f64::INFINITY);
    }

    #[test]
    fn test_cutoff_strictly_greater() {
        let policy = TerminationPolicy::<f64>::new(&[], 2.0);
        assert_eq!(policy.cutoff(0, 2.0), Control::Continue);
        assert_eq!(policy.cutoff(0, 2.5), Control::Stop);
    }
}
