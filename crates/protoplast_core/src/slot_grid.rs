use protoplast_data::Vector2D;
use std::collections::HashMap;

/// Uniform grid of unit slots keyed by truncated integer position.
///
/// Built once per batch from a position list; queries return indices into
/// that list. Unlike a bounded hash over the world rectangle, slots are
/// sparse so positions outside the world (mid-transform snapshots) still
/// index correctly.
///
/// # Examples
/// ```
/// use protoplast_core::slot_grid::SlotGrid;
/// use protoplast_data::Vector2D;
///
/// let grid = SlotGrid::build(&[Vector2D::new(0.0, 0.0), Vector2D::new(1.0, 0.0)]);
/// assert_eq!(grid.query_within(Vector2D::new(0.0, 0.0), 1.1), vec![0, 1]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SlotGrid {
    positions: Vec<Vector2D>,
    slots: HashMap<(i32, i32), Vec<usize>>,
}

impl SlotGrid {
    #[inline]
    fn slot_of(x: f32, y: f32) -> (i32, i32) {
        (x as i32, y as i32)
    }

    /// Buckets every finite position; non-finite ones are never returned.
    pub fn build(positions: &[Vector2D]) -> Self {
        let mut slots: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
        for (index, pos) in positions.iter().enumerate() {
            if pos.is_finite() {
                slots
                    .entry(Self::slot_of(pos.x, pos.y))
                    .or_default()
                    .push(index);
            }
        }
        Self {
            positions: positions.to_vec(),
            slots,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Calls `callback` for every index bucketed in a slot the circle around
    /// `pos` may touch. Slot bounds are widened by half a unit.
    ///
    /// Slots are visited row by row in both cases; when the bounding square
    /// is larger than the map, only occupied slots are looked at.
    pub fn query_callback<F>(&self, pos: Vector2D, radius: f32, mut callback: F)
    where
        F: FnMut(usize),
    {
        if !pos.is_finite() || !radius.is_finite() {
            return;
        }
        let reach = radius.abs() + 0.5;
        let (min_x, min_y) = Self::slot_of(pos.x - reach, pos.y - reach);
        let (max_x, max_y) = Self::slot_of(pos.x + reach, pos.y + reach);

        let span_x = i64::from(max_x) - i64::from(min_x) + 1;
        let span_y = i64::from(max_y) - i64::from(min_y) + 1;
        if span_x.saturating_mul(span_y) > self.slots.len() as i64 {
            let mut touched: Vec<(&(i32, i32), &Vec<usize>)> = self
                .slots
                .iter()
                .filter(|((sx, sy), _)| {
                    (min_x..=max_x).contains(sx) && (min_y..=max_y).contains(sy)
                })
                .collect();
            touched.sort_unstable_by_key(|((sx, sy), _)| (*sy, *sx));
            for (_, indices) in touched {
                for &index in indices {
                    callback(index);
                }
            }
            return;
        }

        for sy in min_y..=max_y {
            for sx in min_x..=max_x {
                if let Some(indices) = self.slots.get(&(sx, sy)) {
                    for &index in indices {
                        callback(index);
                    }
                }
            }
        }
    }

    /// Indices of all positions within `radius` of `pos` (inclusive),
    /// nearest first. Ties keep slot scan order.
    pub fn query_within(&self, pos: Vector2D, radius: f32) -> Vec<usize> {
        let mut found: Vec<(usize, f32)> = Vec::new();
        self.query_callback(pos, radius, |index| {
            let distance = (self.positions[index] - pos).length();
            if distance <= radius {
                found.push((index, distance));
            }
        });
        found.sort_by(|a, b| a.1.total_cmp(&b.1));
        found.into_iter().map(|(index, _)| index).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_sorted_by_distance() {
        let grid = SlotGrid::build(&[
            Vector2D::new(3.0, 0.0),
            Vector2D::new(1.0, 0.0),
            Vector2D::new(0.0, 0.0),
            Vector2D::new(2.0, 0.0),
        ]);
        assert_eq!(grid.query_within(Vector2D::ZERO, 2.5), vec![2, 1, 3]);
    }

    #[test]
    fn test_query_includes_boundary() {
        let grid = SlotGrid::build(&[Vector2D::new(5.0, 5.0), Vector2D::new(3.9, 5.0)]);
        assert_eq!(grid.query_within(Vector2D::new(5.0, 5.0), 1.1), vec![0, 1]);
        assert_eq!(grid.query_within(Vector2D::new(5.0, 5.0), 1.0), vec![0]);
    }

    #[test]
    fn test_negative_coordinates() {
        let grid = SlotGrid::build(&[Vector2D::new(-0.4, -0.4), Vector2D::new(0.4, 0.4)]);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.query_within(Vector2D::new(-0.4, -0.4), 1.2).len(), 2);
    }

    #[test]
    fn test_large_radius_visits_occupied_slots_in_scan_order() {
        // three points tied at distance 3, plus enough filler to make the
        // map larger than a small query square
        let mut positions = vec![
            Vector2D::new(0.0, 3.0),
            Vector2D::new(3.0, 0.0),
            Vector2D::new(-3.0, 0.0),
        ];
        positions.extend((0..200).map(|i| Vector2D::new(1000.0 + i as f32, 0.0)));
        let grid = SlotGrid::build(&positions);

        let near = grid.query_within(Vector2D::ZERO, 3.5);
        assert_eq!(near, vec![2, 1, 0]);

        let all = grid.query_within(Vector2D::ZERO, 1.0e6);
        assert_eq!(all.len(), positions.len());
        assert_eq!(&all[..3], near.as_slice());
        assert_eq!(all[3], 3);
        assert_eq!(all[202], 202);
    }

    #[test]
    fn test_non_finite_positions_are_ignored() {
        let grid = SlotGrid::build(&[Vector2D::new(f32::NAN, 0.0), Vector2D::ZERO]);
        assert_eq!(grid.query_within(Vector2D::ZERO, 10.0), vec![1]);
        assert!(grid.query_within(Vector2D::new(f32::INFINITY, 0.0), 1.0).is_empty());
        assert!(SlotGrid::default().is_empty());
    }
}
