//! Angular connection rings between cells.
//!
//! Each cell keeps its connections as a circular sequence ordered clockwise
//! by direction. `angle_from_previous` of entry `i` is the clockwise angle
//! from entry `i - 1` (entry 0 measures from the last one), so the values of
//! a non-empty ring add up to 360.

use crate::error::{DescriptionError, Result};
use crate::math::{angle_of_vector, normalize_angle};
use protoplast_data::{CellDescription, ConnectionDescription, DataDescription, Vector2D};
use std::collections::HashMap;

/// Id to index lookup for `DataDescription::cells`.
///
/// Entries are checked on every hit, so a stale cache costs a rescan but
/// never yields a wrong cell. Clear it when switching snapshots.
#[derive(Debug, Clone, Default)]
pub struct CellIndexCache {
    index_by_id: HashMap<u64, usize>,
}

impl CellIndexCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.index_by_id.clear();
    }

    /// Index of the cell with `id`, scanning `cells` on a miss.
    pub fn resolve(&mut self, cells: &[CellDescription], id: u64) -> Result<usize> {
        if let Some(&idx) = self.index_by_id.get(&id) {
            if cells.get(idx).is_some_and(|cell| cell.id == id) {
                return Ok(idx);
            }
        }
        let idx = cells
            .iter()
            .position(|cell| cell.id == id)
            .ok_or_else(|| DescriptionError::cell_not_found(id))?;
        self.index_by_id.insert(id, idx);
        Ok(idx)
    }
}

/// Connection editing on a flat snapshot.
pub trait ConnectionLogic {
    /// Links two cells in both directions, keeping both rings angle-ordered.
    ///
    /// Fails without modifying anything if the ids are equal, unknown,
    /// already linked, or if either cell is at `max_connections`.
    fn add_connection(&mut self, id1: u64, id2: u64, cache: &mut CellIndexCache) -> Result<()>;

    /// Unlinks two cells, giving each removed arc to the next connection.
    fn remove_connection(&mut self, id1: u64, id2: u64, cache: &mut CellIndexCache)
        -> Result<()>;

    fn get_cell_ref(&self, id: u64, cache: &mut CellIndexCache) -> Result<&CellDescription>;

    fn get_cell_mut(&mut self, id: u64, cache: &mut CellIndexCache)
        -> Result<&mut CellDescription>;
}

impl ConnectionLogic for DataDescription {
    fn add_connection(&mut self, id1: u64, id2: u64, cache: &mut CellIndexCache) -> Result<()> {
        if id1 == id2 {
            return Err(DescriptionError::precondition(format!(
                "cell {id1} cannot be connected to itself"
            )));
        }
        let idx1 = cache.resolve(&self.cells, id1)?;
        let idx2 = cache.resolve(&self.cells, id2)?;

        for (idx, other_id) in [(idx1, id2), (idx2, id1)] {
            let cell = &self.cells[idx];
            if !cell.has_free_connection_slot() {
                return Err(DescriptionError::precondition(format!(
                    "cell {} already has {} of {} connections",
                    cell.id,
                    cell.connections.len(),
                    cell.max_connections
                )));
            }
            if cell.is_connected_to(other_id) {
                return Err(DescriptionError::precondition(format!(
                    "cells {} and {other_id} are already connected",
                    cell.id
                )));
            }
        }

        let first1 = first_neighbour_pos(&self.cells, idx1, cache)?;
        let first2 = first_neighbour_pos(&self.cells, idx2, cache)?;
        insert_connection(&mut self.cells, idx1, idx2, first1);
        insert_connection(&mut self.cells, idx2, idx1, first2);

        tracing::trace!(id1, id2, "Connected cells");
        Ok(())
    }

    fn remove_connection(
        &mut self,
        id1: u64,
        id2: u64,
        cache: &mut CellIndexCache,
    ) -> Result<()> {
        let idx1 = cache.resolve(&self.cells, id1)?;
        let idx2 = cache.resolve(&self.cells, id2)?;
        if !self.cells[idx1].is_connected_to(id2) || !self.cells[idx2].is_connected_to(id1) {
            return Err(DescriptionError::not_found(format!(
                "connection between cells {id1} and {id2}"
            )));
        }
        remove_from_ring(&mut self.cells[idx1].connections, id2);
        remove_from_ring(&mut self.cells[idx2].connections, id1);

        tracing::trace!(id1, id2, "Disconnected cells");
        Ok(())
    }

    fn get_cell_ref(&self, id: u64, cache: &mut CellIndexCache) -> Result<&CellDescription> {
        let idx = cache.resolve(&self.cells, id)?;
        Ok(&self.cells[idx])
    }

    fn get_cell_mut(
        &mut self,
        id: u64,
        cache: &mut CellIndexCache,
    ) -> Result<&mut CellDescription> {
        let idx = cache.resolve(&self.cells, id)?;
        Ok(&mut self.cells[idx])
    }
}

fn first_neighbour_pos(
    cells: &[CellDescription],
    idx: usize,
    cache: &mut CellIndexCache,
) -> Result<Option<Vector2D>> {
    match cells[idx].connections.first() {
        Some(first) => {
            let neighbour = cache.resolve(cells, first.cell_id).map_err(|e| {
                e.with_context(format!("ring of cell {} references a missing cell", cells[idx].id))
            })?;
            Ok(Some(cells[neighbour].pos))
        }
        None => Ok(None),
    }
}

fn insert_connection(
    cells: &mut [CellDescription],
    idx: usize,
    other_idx: usize,
    first_neighbour: Option<Vector2D>,
) {
    let origin = cells[idx].pos;
    let delta = cells[other_idx].pos - origin;
    let connection = ConnectionDescription {
        cell_id: cells[other_idx].id,
        distance: delta.length(),
        angle_from_previous: 0.0,
    };
    let first_angle = first_neighbour.map_or(0.0, |pos| angle_of_vector(pos - origin));
    insert_into_ring(
        &mut cells[idx].connections,
        connection,
        angle_of_vector(delta),
        first_angle,
    );
}

/// Inserts `connection`, pointing in direction `new_angle`, into `ring`
/// whose first entry points in direction `first_angle`.
///
/// The new direction lands in the first arc `[start, end)` it falls into
/// when walking clockwise from the first entry. That arc is split linearly
/// by angular distance, or evenly if it has zero width.
pub fn insert_into_ring(
    ring: &mut Vec<ConnectionDescription>,
    mut connection: ConnectionDescription,
    new_angle: f32,
    first_angle: f32,
) {
    match ring.len() {
        0 => {
            connection.angle_from_previous = 360.0;
            ring.push(connection);
        }
        1 => {
            let diff = normalize_angle(new_angle - first_angle);
            connection.angle_from_previous = diff;
            ring[0].angle_from_previous = 360.0 - diff;
            ring.push(connection);
        }
        n => {
            let relative = normalize_angle(new_angle - first_angle);

            // arcs are closed by entries 1, 2, .., n-1 and finally 0
            let mut arc_start = 0.0f32;
            let mut found = None;
            for step in 1..=n {
                let closing = step % n;
                let arc_end = arc_start + ring[closing].angle_from_previous;
                if arc_start <= relative && relative < arc_end {
                    found = Some((closing, arc_start));
                    break;
                }
                arc_start = arc_end;
            }
            let (closing, arc_start) = found.unwrap_or_else(|| {
                let wrap_start = ring[1..].iter().map(|c| c.angle_from_previous).sum();
                (0, wrap_start)
            });

            let width = ring[closing].angle_from_previous;
            let factor = if width != 0.0 {
                ((relative - arc_start) / width).clamp(0.0, 1.0)
            } else {
                0.5
            };
            connection.angle_from_previous = width * factor;
            ring[closing].angle_from_previous = width * (1.0 - factor);

            let insert_at = if closing == 0 { n } else { closing };
            ring.insert(insert_at, connection);
        }
    }
}

/// Removes the entry pointing at `cell_id`, folding its arc into the
/// cyclically next entry.
pub fn remove_from_ring(
    ring: &mut Vec<ConnectionDescription>,
    cell_id: u64,
) -> Option<ConnectionDescription> {
    let pos = ring.iter().position(|c| c.cell_id == cell_id)?;
    let removed = ring.remove(pos);
    if !ring.is_empty() {
        let next = pos % ring.len();
        ring[next].angle_from_previous += removed.angle_from_previous;
    }
    Some(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(id: u64, x: f32, y: f32) -> CellDescription {
        CellDescription::new(id)
            .with_pos(Vector2D::new(x, y))
            .with_max_connections(6)
    }

    fn angle_sum(cell: &CellDescription) -> f32 {
        cell.connections.iter().map(|c| c.angle_from_previous).sum()
    }

    fn ring_ids(cell: &CellDescription) -> Vec<u64> {
        cell.connections.iter().map(|c| c.cell_id).collect()
    }

    fn star() -> DataDescription {
        let mut data = DataDescription::new();
        data.add_cells([
            cell(1, 0.0, 0.0),
            cell(2, 0.0, -1.0), // 0 degrees
            cell(3, 1.0, 0.0),  // 90
            cell(4, 0.0, 1.0),  // 180
            cell(5, -1.0, 0.0), // 270
        ]);
        data
    }

    #[test]
    fn test_first_connection_gets_full_circle() {
        let mut data = star();
        let mut cache = CellIndexCache::new();
        data.add_connection(1, 3, &mut cache).expect("connect");

        let center = &data.cells[0];
        assert_eq!(center.connections.len(), 1);
        assert_eq!(center.connections[0].angle_from_previous, 360.0);
        assert!((center.connections[0].distance - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_second_connection_splits_circle() {
        let mut data = star();
        let mut cache = CellIndexCache::new();
        data.add_connection(1, 2, &mut cache).expect("connect");
        data.add_connection(1, 3, &mut cache).expect("connect");

        let center = &data.cells[0];
        assert_eq!(ring_ids(center), vec![2, 3]);
        assert!((center.connections[1].angle_from_previous - 90.0).abs() < 1e-4);
        assert!((center.connections[0].angle_from_previous - 270.0).abs() < 1e-4);
    }

    #[test]
    fn test_second_connection_counter_clockwise() {
        let mut data = star();
        let mut cache = CellIndexCache::new();
        data.add_connection(1, 3, &mut cache).expect("connect");
        data.add_connection(1, 2, &mut cache).expect("connect");

        let center = &data.cells[0];
        assert!((center.connections[1].angle_from_previous - 270.0).abs() < 1e-4);
        assert!((center.connections[0].angle_from_previous - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_insertion_keeps_clockwise_order() {
        let mut data = star();
        let mut cache = CellIndexCache::new();
        for id in [4, 2, 5, 3] {
            data.add_connection(1, id, &mut cache).expect("connect");
        }
        let center = &data.cells[0];
        assert_eq!(ring_ids(center), vec![4, 5, 2, 3]);
        for c in &center.connections {
            assert!((c.angle_from_previous - 90.0).abs() < 1e-3);
        }
        assert!((angle_sum(center) - 360.0).abs() < 1e-3);
    }

    #[test]
    fn test_insert_into_wrap_arc() {
        let mut data = star();
        data.add_cell(cell(6, -1.0, -1.0)); // 315
        let mut cache = CellIndexCache::new();
        for id in [2, 3, 4] {
            data.add_connection(1, id, &mut cache).expect("connect");
        }
        data.add_connection(1, 6, &mut cache).expect("connect");

        let center = &data.cells[0];
        assert_eq!(ring_ids(center), vec![2, 3, 4, 6]);
        assert!((center.connections[3].angle_from_previous - 135.0).abs() < 1e-3);
        assert!((center.connections[0].angle_from_previous - 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_direction_past_rounded_arcs_uses_wrap_arc() {
        // arcs add up to slightly less than 360, leaving the direction uncovered
        let mut ring = vec![
            ConnectionDescription {
                cell_id: 1,
                distance: 1.0,
                angle_from_previous: 0.0,
            },
            ConnectionDescription {
                cell_id: 2,
                distance: 1.0,
                angle_from_previous: 359.9,
            },
        ];
        let new = ConnectionDescription {
            cell_id: 3,
            distance: 1.0,
            angle_from_previous: 0.0,
        };
        insert_into_ring(&mut ring, new, 359.95, 0.0);

        let ids: Vec<u64> = ring.iter().map(|c| c.cell_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(ring[2].angle_from_previous, 0.0);
        assert_eq!(ring[0].angle_from_previous, 0.0);
    }

    #[test]
    fn test_self_connection_rejected() {
        let mut data = star();
        let mut cache = CellIndexCache::new();
        let err = data.add_connection(1, 1, &mut cache).unwrap_err();
        assert!(matches!(err, DescriptionError::PreconditionViolation(_)));
    }

    #[test]
    fn test_capacity_respected_without_side_effects() {
        let mut data = star();
        data.cells[0].max_connections = 1;
        let mut cache = CellIndexCache::new();
        data.add_connection(1, 2, &mut cache).expect("connect");
        let before = data.clone();

        let err = data.add_connection(1, 3, &mut cache).unwrap_err();
        assert!(matches!(err, DescriptionError::PreconditionViolation(_)));
        assert_eq!(data, before);
    }

    #[test]
    fn test_duplicate_connection_rejected() {
        let mut data = star();
        let mut cache = CellIndexCache::new();
        data.add_connection(1, 2, &mut cache).expect("connect");
        assert!(data.add_connection(2, 1, &mut cache).is_err());
        assert_eq!(data.cells[0].connections.len(), 1);
    }

    #[test]
    fn test_unknown_cell_is_not_found() {
        let mut data = star();
        let mut cache = CellIndexCache::new();
        let err = data.add_connection(1, 99, &mut cache).unwrap_err();
        assert_eq!(err, DescriptionError::cell_not_found(99));
    }

    #[test]
    fn test_remove_connection_folds_angle() {
        let mut data = star();
        let mut cache = CellIndexCache::new();
        for id in [2, 3, 4] {
            data.add_connection(1, id, &mut cache).expect("connect");
        }
        data.remove_connection(1, 3, &mut cache).expect("disconnect");

        let center = &data.cells[0];
        assert_eq!(ring_ids(center), vec![2, 4]);
        assert!((center.connections[1].angle_from_previous - 180.0).abs() < 1e-3);
        assert!((angle_sum(center) - 360.0).abs() < 1e-3);
        assert!(data.cells[2].connections.is_empty());

        assert!(data.remove_connection(1, 3, &mut cache).is_err());
    }

    #[test]
    fn test_cache_detects_stale_index() {
        let mut data = star();
        let mut cache = CellIndexCache::new();
        assert_eq!(cache.resolve(&data.cells, 3).expect("found"), 2);
        data.cells.swap(2, 4);
        assert_eq!(cache.resolve(&data.cells, 3).expect("found"), 4);
    }
}
