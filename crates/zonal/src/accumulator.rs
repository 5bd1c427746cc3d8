//! Per-zone running statistics
//!
//! A [`ZoneAccumulator`] folds valid pixel values one at a time; the
//! [`AccumulatorTable`] maps zone ids to accumulators, created lazily on
//! first contact and never removed. Folding is commutative and associative
//! per zone (modulo floating-point summation order), which is what allows
//! block order independence and the parallel merge path.

use std::collections::HashMap;

/// Running statistics for a single zone.
///
/// `min`/`max` start at the extreme sentinels so the first folded value
/// always wins the comparison. The sentinels are unobservable from the
/// outside: [`ZonalRow::from_accumulator`] zeroes them out for an
/// accumulator that never received a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneAccumulator {
    pub min: f64,
    pub max: f64,
    pub count: u64,
    pub sum: f64,
}

impl ZoneAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self {
            min: f64::MAX,
            max: f64::MIN,
            count: 0,
            sum: 0.0,
        }
    }

    /// Fold one valid sample into the running statistics
    pub fn fold(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.count += 1;
        self.sum += value;
    }

    /// Combine another accumulator into this one
    pub fn merge(&mut self, other: &ZoneAccumulator) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.count += other.count;
        self.sum += other.sum;
    }

    /// Arithmetic mean of the folded samples, or 0 when nothing was folded
    pub fn mean(&self) -> f64 {
        if self.count > 0 {
            self.sum / self.count as f64
        } else {
            0.0
        }
    }
}

impl Default for ZoneAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// One row of the final result table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZonalRow {
    pub zone: i32,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: u64,
    pub sum: f64,
}

impl ZonalRow {
    /// Derive a result row from an accumulator.
    ///
    /// An accumulator with `count == 0` reports 0 for min, max and mean so
    /// the initialization sentinels never reach the output table. Under the
    /// lazy-creation invariant such an accumulator should not exist; the
    /// guard covers callers that create entries without folding.
    pub fn from_accumulator(zone: i32, acc: &ZoneAccumulator) -> Self {
        if acc.count == 0 {
            return Self {
                zone,
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                count: 0,
                sum: acc.sum,
            };
        }

        Self {
            zone,
            min: acc.min,
            max: acc.max,
            mean: acc.mean(),
            count: acc.count,
            sum: acc.sum,
        }
    }
}

/// Mapping from zone id to its running accumulator.
///
/// Entries are created on first access through [`entry`](Self::entry) and
/// never removed; final emission order is ascending zone id regardless of
/// insertion order.
#[derive(Debug, Default)]
pub struct AccumulatorTable {
    zones: HashMap<i32, ZoneAccumulator>,
}

impl AccumulatorTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the accumulator for `zone`, inserting an empty one on first use
    pub fn entry(&mut self, zone: i32) -> &mut ZoneAccumulator {
        self.zones.entry(zone).or_default()
    }

    /// Look up a zone without inserting
    pub fn get(&self, zone: i32) -> Option<&ZoneAccumulator> {
        self.zones.get(&zone)
    }

    /// Number of distinct zones observed
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether any zone has been observed
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Union another table into this one, combining shared zones
    pub fn merge(&mut self, other: AccumulatorTable) {
        for (zone, acc) in other.zones {
            self.entry(zone).merge(&acc);
        }
    }

    /// Consume the table into result rows sorted by ascending zone id
    pub fn into_rows(self) -> Vec<ZonalRow> {
        let mut rows: Vec<ZonalRow> = self
            .zones
            .iter()
            .map(|(&zone, acc)| ZonalRow::from_accumulator(zone, acc))
            .collect();
        rows.sort_by_key(|row| row.zone);
        rows
    }
}
