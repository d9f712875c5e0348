use std::collections::HashMap;

use indexmap::IndexSet;
use ordered_float::OrderedFloat;

use crate::core::DataPoint;
use crate::model::series::SeriesKind;

/// What a series contributes to the shared pass context.
#[derive(Debug, Clone, Copy)]
pub struct SeriesContextEntry<'a> {
    pub kind: SeriesKind,
    pub stack_group: Option<u32>,
    pub secondary_axis: usize,
    pub primary_axis: usize,
    pub points: &'a [DataPoint],
}

/// Slot a column series occupies inside one secondary unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSlot {
    pub index: usize,
    pub count: usize,
}

impl Default for ColumnSlot {
    fn default() -> Self {
        Self { index: 0, count: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SlotKey {
    Group(u32),
    Own(usize),
}

type StackKey = (u32, usize, usize, OrderedFloat<f64>);

/// Cross-series facts of one pass, indexed by the series' pass position.
///
/// Stacked columns sharing a group share a slot; positive and negative
/// values of a group accumulate on separate stacks.
#[derive(Debug, Clone, Default)]
pub struct SeriesContext {
    slots: Vec<Option<ColumnSlot>>,
    stacks: Vec<Option<Vec<Option<(f64, f64)>>>>,
}

impl SeriesContext {
    #[must_use]
    pub fn new(entries: &[SeriesContextEntry<'_>]) -> Self {
        let mut slot_keys = IndexSet::new();
        let mut slot_indices = Vec::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if entry.kind != SeriesKind::Column {
                slot_indices.push(None);
                continue;
            }
            let key = entry
                .stack_group
                .map_or(SlotKey::Own(position), SlotKey::Group);
            let (index, _) = slot_keys.insert_full(key);
            slot_indices.push(Some(index));
        }
        let count = slot_keys.len().max(1);
        let slots = slot_indices
            .into_iter()
            .map(|index| index.map(|index| ColumnSlot { index, count }))
            .collect();

        let mut accumulators: HashMap<StackKey, (f64, f64)> = HashMap::new();
        let stacks = entries
            .iter()
            .map(|entry| {
                let group = entry.stack_group.filter(|_| entry.kind == SeriesKind::Column)?;
                Some(
                    entry
                        .points
                        .iter()
                        .map(|point| {
                            if !point.is_finite() {
                                return None;
                            }
                            let key = (
                                group,
                                entry.secondary_axis,
                                entry.primary_axis,
                                OrderedFloat(point.x),
                            );
                            let (positive, negative) = accumulators.entry(key).or_insert((0.0, 0.0));
                            if point.y >= 0.0 {
                                let start = *positive;
                                *positive += point.y;
                                Some((start, *positive))
                            } else {
                                let start = *negative;
                                *negative += point.y;
                                Some((start, *negative))
                            }
                        })
                        .collect(),
                )
            })
            .collect();

        Self { slots, stacks }
    }

    #[must_use]
    pub fn column_slot(&self, position: usize) -> ColumnSlot {
        self.slots
            .get(position)
            .copied()
            .flatten()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_stacked(&self, position: usize) -> bool {
        matches!(self.stacks.get(position), Some(Some(_)))
    }

    /// `(start, end)` of a stacked point, `None` for gaps or unstacked series.
    #[must_use]
    pub fn stacked_extent(&self, position: usize, index: usize) -> Option<(f64, f64)> {
        self.stacks
            .get(position)?
            .as_ref()?
            .get(index)
            .copied()
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnSlot, SeriesContext, SeriesContextEntry};
    use crate::core::DataPoint;
    use crate::model::series::SeriesKind;

    fn entry(kind: SeriesKind, stack_group: Option<u32>, points: &[DataPoint]) -> SeriesContextEntry<'_> {
        SeriesContextEntry {
            kind,
            stack_group,
            secondary_axis: 0,
            primary_axis: 0,
            points,
        }
    }

    #[test]
    fn stacked_columns_share_a_slot() {
        let a = [DataPoint::new(0.0, 2.0)];
        let b = [DataPoint::new(0.0, 3.0)];
        let c = [DataPoint::new(0.0, 1.0)];
        let line = [DataPoint::new(0.0, 1.0)];
        let context = SeriesContext::new(&[
            entry(SeriesKind::Column, Some(1), &a),
            entry(SeriesKind::Line, None, &line),
            entry(SeriesKind::Column, Some(1), &b),
            entry(SeriesKind::Column, None, &c),
        ]);

        assert_eq!(context.column_slot(0), ColumnSlot { index: 0, count: 2 });
        assert_eq!(context.column_slot(2), ColumnSlot { index: 0, count: 2 });
        assert_eq!(context.column_slot(3), ColumnSlot { index: 1, count: 2 });
        assert_eq!(context.column_slot(1), ColumnSlot::default());
        assert_eq!(context.stacked_extent(2, 0), Some((2.0, 5.0)));
        assert!(!context.is_stacked(3));
    }

    #[test]
    fn negative_values_stack_downward() {
        let a = [DataPoint::new(0.0, 2.0), DataPoint::new(1.0, -1.0)];
        let b = [DataPoint::new(0.0, -3.0), DataPoint::new(1.0, -2.0)];
        let context = SeriesContext::new(&[
            entry(SeriesKind::Column, Some(0), &a),
            entry(SeriesKind::Column, Some(0), &b),
        ]);

        assert_eq!(context.stacked_extent(1, 0), Some((0.0, -3.0)));
        assert_eq!(context.stacked_extent(1, 1), Some((-1.0, -3.0)));
    }
}
