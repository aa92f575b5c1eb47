use crate::SpawnTableError;

/// Cumulative distribution over piece templates.
///
/// Weights need not be normalized: they are rescaled by their own sum to
/// percentages and accumulated. [`SpawnTable::pick`] maps a roll in
/// `[0, 100)` to the first bucket whose cumulative bound exceeds it, so ties
/// resolve to the lowest index. The last bucket with a positive weight is
/// pinned to exactly 100, which keeps floating-point drift from leaving a gap
/// at the top of the range.
///
/// # Example
///
/// ```
/// use cylindris_engine::SpawnTable;
///
/// let table = SpawnTable::new(&[1.0, 3.0]).unwrap();
/// assert_eq!(table.pick(0.0), 0);
/// assert_eq!(table.pick(24.9), 0);
/// assert_eq!(table.pick(25.0), 1);
/// assert_eq!(table.pick(99.999), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnTable {
    bounds: Vec<f64>,
    last_positive: usize,
}

impl SpawnTable {
    /// Upper end (exclusive) of the roll range.
    pub const TOTAL: f64 = 100.0;

    pub fn new(weights: &[f64]) -> Result<Self, SpawnTableError> {
        if weights.is_empty() {
            return Err(SpawnTableError::Empty);
        }
        if let Some((index, &weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(SpawnTableError::InvalidWeight { index, weight });
        }
        let sum: f64 = weights.iter().sum();
        let Some(last_positive) = weights.iter().rposition(|w| *w > 0.0) else {
            return Err(SpawnTableError::ZeroTotal);
        };

        let scale = Self::TOTAL / sum;
        let mut acc = 0.0;
        let mut bounds: Vec<f64> = weights
            .iter()
            .map(|w| {
                acc += w * scale;
                acc
            })
            .collect();
        bounds[last_positive..].fill(Self::TOTAL);

        Ok(Self {
            bounds,
            last_positive,
        })
    }

    /// Number of buckets (one per weight).
    #[must_use]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Percentage chance of bucket `index` being picked.
    #[must_use]
    pub fn chance(&self, index: usize) -> f64 {
        let lower = index
            .checked_sub(1)
            .and_then(|i| self.bounds.get(i))
            .copied()
            .unwrap_or(0.0);
        self.bounds.get(index).map_or(0.0, |upper| upper - lower)
    }

    /// Selects the bucket for `roll`, a uniform draw from `[0, 100)`.
    ///
    /// Always returns a valid index; rolls outside the range resolve to the
    /// last bucket with a positive weight.
    #[must_use]
    pub fn pick(&self, roll: f64) -> usize {
        self.bounds
            .iter()
            .position(|bound| roll < *bound)
            .unwrap_or(self.last_positive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescales_by_own_sum() {
        let table = SpawnTable::new(&[10.0, 15.0, 15.0, 15.0, 15.0, 10.0, 20.0]).unwrap();
        assert_eq!(table.len(), 7);
        assert!((table.chance(0) - 10.0).abs() < 1e-9);
        assert!((table.chance(6) - 20.0).abs() < 1e-9);

        let table = SpawnTable::new(&[1.0, 1.0, 2.0]).unwrap();
        assert!((table.chance(0) - 25.0).abs() < 1e-9);
        assert!((table.chance(2) - 50.0).abs() < 1e-9);
        assert_eq!(table.pick(24.99), 0);
        assert_eq!(table.pick(25.0), 1);
        assert_eq!(table.pick(50.0), 2);
    }

    #[test]
    fn test_top_of_range_always_resolves() {
        let table = SpawnTable::new(&[1.0, 1.0, 1.0]).unwrap();
        assert_eq!(table.pick(99.999_999_999), 2);
        assert_eq!(table.pick(SpawnTable::TOTAL), 2);
        assert_eq!(table.pick(f64::NAN), 2);
    }

    #[test]
    fn test_zero_weights_are_never_picked() {
        let table = SpawnTable::new(&[0.0, 50.0, 0.0, 50.0, 0.0]).unwrap();
        assert_eq!(table.pick(0.0), 1);
        assert_eq!(table.pick(49.9), 1);
        assert_eq!(table.pick(50.0), 3);
        assert_eq!(table.pick(99.9), 3);
        assert_eq!(table.pick(250.0), 3);
        assert!(table.chance(0).abs() < 1e-9);
        assert!(table.chance(4).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_weights() {
        assert_eq!(SpawnTable::new(&[]), Err(SpawnTableError::Empty));
        assert_eq!(
            SpawnTable::new(&[0.0, 0.0]),
            Err(SpawnTableError::ZeroTotal)
        );
        assert!(matches!(
            SpawnTable::new(&[1.0, -1.0]),
            Err(SpawnTableError::InvalidWeight { index: 1, .. })
        ));
        assert!(matches!(
            SpawnTable::new(&[f64::INFINITY]),
            Err(SpawnTableError::InvalidWeight { index: 0, .. })
        ));
    }
}
