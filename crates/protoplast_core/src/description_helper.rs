//! Batch operations over whole snapshots.
//!
//! Everything here is built from the topology engine, the snapshot
//! transforms and an explicitly passed [`IdGenerator`]. Operations that can
//! fail validate their input before writing, so an `Err` leaves the snapshot
//! as it was.

use crate::error::{DescriptionError, Result};
use crate::id_generator::IdGenerator;
use crate::slot_grid::SlotGrid;
use crate::snapshot::SnapshotLogic;
use crate::topology::{CellIndexCache, ConnectionLogic};
use protoplast_data::{
    CellDescription, CellOrParticle, ClusterDescription, ClusteredDataDescription,
    ConnectionDescription, DataDescription, IntVector2D, Vector2D,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Per-axis increments for [`grid_multiply`].
///
/// Copy `(i, j)` is shifted by `i * horizontal_distance` and
/// `j * vertical_distance`; angle, velocity and angular velocity increments
/// accumulate the same way.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GridMultiplyParameters {
    pub horizontal_number: usize,
    pub horizontal_distance: f32,
    pub horizontal_angle_inc: f32,
    pub horizontal_vel_x_inc: f32,
    pub horizontal_vel_y_inc: f32,
    pub horizontal_angular_vel_inc: f32,
    pub vertical_number: usize,
    pub vertical_distance: f32,
    pub vertical_angle_inc: f32,
    pub vertical_vel_x_inc: f32,
    pub vertical_vel_y_inc: f32,
    pub vertical_angular_vel_inc: f32,
}

impl Default for GridMultiplyParameters {
    fn default() -> Self {
        Self {
            horizontal_number: 10,
            horizontal_distance: 50.0,
            horizontal_angle_inc: 0.0,
            horizontal_vel_x_inc: 0.0,
            horizontal_vel_y_inc: 0.0,
            horizontal_angular_vel_inc: 0.0,
            vertical_number: 10,
            vertical_distance: 50.0,
            vertical_angle_inc: 0.0,
            vertical_vel_x_inc: 0.0,
            vertical_vel_y_inc: 0.0,
            vertical_angular_vel_inc: 0.0,
        }
    }
}

/// Ranges for [`random_multiply`]. `number` counts the original as well.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RandomMultiplyParameters {
    pub number: usize,
    pub min_angle: f32,
    pub max_angle: f32,
    pub min_vel_x: f32,
    pub max_vel_x: f32,
    pub min_vel_y: f32,
    pub max_vel_y: f32,
    pub min_angular_vel: f32,
    pub max_angular_vel: f32,
}

impl Default for RandomMultiplyParameters {
    fn default() -> Self {
        Self {
            number: 100,
            min_angle: 0.0,
            max_angle: 0.0,
            min_vel_x: 0.0,
            max_vel_x: 0.0,
            min_vel_y: 0.0,
            max_vel_y: 0.0,
            min_angular_vel: 0.0,
            max_angular_vel: 0.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CreateRectParameters {
    pub width: usize,
    pub height: usize,
    pub cell_distance: f32,
    pub energy: f32,
    pub max_connections: u8,
    pub color: u8,
    pub center: Vector2D,
    pub remove_stickiness: bool,
}

impl Default for CreateRectParameters {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            cell_distance: 1.0,
            energy: 100.0,
            max_connections: 4,
            color: 0,
            center: Vector2D::ZERO,
            remove_stickiness: false,
        }
    }
}

/// Rebuilds all connections from scratch by proximity.
///
/// Every cell links to the cells within `max_distance`, nearest first,
/// as long as both sides have a free slot. Duplicate cell ids are a
/// `PreconditionViolation`. Rings are rebuilt on a copy, so the old
/// connections survive any error.
pub fn reconnect_cells(data: &mut DataDescription, max_distance: f32) -> Result<()> {
    let mut seen = HashSet::with_capacity(data.cells.len());
    if let Some(duplicate) = data.cells.iter().find(|c| !seen.insert(c.id)) {
        return Err(DescriptionError::precondition(format!(
            "cell id {} occurs more than once",
            duplicate.id
        )));
    }

    let mut rebuilt = DataDescription {
        cells: data.cells.clone(),
        particles: Vec::new(),
    };
    for cell in &mut rebuilt.cells {
        cell.connections.clear();
    }
    let positions: Vec<Vector2D> = rebuilt.cells.iter().map(|c| c.pos).collect();
    let grid = SlotGrid::build(&positions);
    let mut cache = CellIndexCache::new();

    let mut added = 0usize;
    for index in 0..rebuilt.cells.len() {
        for nearby in grid.query_within(positions[index], max_distance) {
            let cell = &rebuilt.cells[index];
            let other = &rebuilt.cells[nearby];
            if cell.id != other.id
                && cell.has_free_connection_slot()
                && other.has_free_connection_slot()
                && !cell.is_connected_to(other.id)
            {
                let (id1, id2) = (cell.id, other.id);
                rebuilt.add_connection(id1, id2, &mut cache)?;
                added += 1;
            }
        }
    }
    data.cells = rebuilt.cells;
    tracing::debug!(cells = data.cells.len(), connections = added, "Reconnected cells");
    Ok(())
}

/// Caps every cell's `max_connections` at its current connection count.
pub fn remove_stickiness(data: &mut DataDescription) {
    for cell in &mut data.cells {
        cell.max_connections = u8::try_from(cell.connections.len()).unwrap_or(u8::MAX);
    }
}

/// Drops connections spanning more than `wrap_fraction` of the smaller world
/// side. Such links are artifacts of clusters wrapping around the torus.
///
/// Each dropped arc is folded into the next surviving connection, wrapping
/// around to the first one, so every ring still sums to 360.
pub fn correct_connections(
    data: &mut ClusteredDataDescription,
    world_size: IntVector2D,
    wrap_fraction: f32,
) -> Result<()> {
    let threshold = world_size.x.min(world_size.y) as f32 * wrap_fraction;
    let pos_by_id: HashMap<u64, Vector2D> = data.cells().map(|c| (c.id, c.pos)).collect();

    let mut corrected = Vec::new();
    for cell in data.cells() {
        let mut survivors: Vec<ConnectionDescription> = Vec::with_capacity(cell.connections.len());
        let mut angle_to_add = 0.0;
        for connection in &cell.connections {
            let other_pos = pos_by_id.get(&connection.cell_id).ok_or_else(|| {
                DescriptionError::cell_not_found(connection.cell_id)
                    .with_context(format!("connection of cell {}", cell.id))
            })?;
            if (cell.pos - *other_pos).length() > threshold {
                angle_to_add += connection.angle_from_previous;
            } else {
                let mut kept = *connection;
                kept.angle_from_previous += angle_to_add;
                angle_to_add = 0.0;
                survivors.push(kept);
            }
        }
        if let Some(first) = survivors.first_mut() {
            first.angle_from_previous += angle_to_add;
        }
        corrected.push(survivors);
    }

    let mut removed = 0usize;
    for (cell, survivors) in data.cells_mut().zip(corrected) {
        removed += cell.connections.len() - survivors.len();
        cell.connections = survivors;
    }
    tracing::debug!(threshold, removed, "Removed wrapped connections");
    Ok(())
}

/// Old to new id mapping for `cells`, checked before anything is renamed.
fn renumber_cells(cells: &[CellDescription], ids: &mut IdGenerator) -> Result<HashMap<u64, u64>> {
    let known: HashSet<u64> = cells.iter().map(|c| c.id).collect();
    for cell in cells {
        if let Some(dangling) = cell
            .connections
            .iter()
            .find(|connection| !known.contains(&connection.cell_id))
        {
            return Err(DescriptionError::cell_not_found(dangling.cell_id)
                .with_context(format!("connection of cell {}", cell.id)));
        }
    }
    Ok(cells.iter().map(|c| (c.id, ids.get_id())).collect())
}

fn apply_renumbering(cells: &mut [CellDescription], new_by_old: &HashMap<u64, u64>) {
    for cell in cells {
        if let Some(&id) = new_by_old.get(&cell.id) {
            cell.id = id;
        }
        for connection in &mut cell.connections {
            if let Some(&id) = new_by_old.get(&connection.cell_id) {
                connection.cell_id = id;
            }
        }
    }
}

/// Gives every cell and particle a fresh id and rewrites connection
/// references to match.
///
/// Fails with `NotFound` if a connection points outside `data`; nothing is
/// renamed in that case.
pub fn make_valid(data: &mut DataDescription, ids: &mut IdGenerator) -> Result<()> {
    let new_by_old = renumber_cells(&data.cells, ids)?;
    apply_renumbering(&mut data.cells, &new_by_old);
    for particle in &mut data.particles {
        particle.id = ids.get_id();
    }
    Ok(())
}

/// Like [`make_valid`] for a single cluster, which also gets a new id.
pub fn make_valid_cluster(cluster: &mut ClusterDescription, ids: &mut IdGenerator) -> Result<()> {
    let new_by_old = renumber_cells(&cluster.cells, ids)?;
    apply_renumbering(&mut cluster.cells, &new_by_old);
    cluster.id = ids.get_id();
    Ok(())
}

/// Tiles `count_x * count_y` transformed copies of `input`, each with
/// fresh ids.
pub fn grid_multiply(
    input: &DataDescription,
    params: &GridMultiplyParameters,
    ids: &mut IdGenerator,
) -> Result<DataDescription> {
    let mut result = DataDescription::new();
    for i in 0..params.horizontal_number {
        for j in 0..params.vertical_number {
            let (fi, fj) = (i as f32, j as f32);
            let mut copy = input.clone();
            copy.shift(Vector2D::new(
                fi * params.horizontal_distance,
                fj * params.vertical_distance,
            ));
            copy.rotate(fi * params.horizontal_angle_inc + fj * params.vertical_angle_inc);
            copy.accelerate(
                Vector2D::new(
                    fi * params.horizontal_vel_x_inc + fj * params.vertical_vel_x_inc,
                    fi * params.horizontal_vel_y_inc + fj * params.vertical_vel_y_inc,
                ),
                fi * params.horizontal_angular_vel_inc + fj * params.vertical_angular_vel_inc,
            );
            make_valid(&mut copy, ids)?;
            result.add(copy);
        }
    }
    tracing::debug!(
        copies = params.horizontal_number * params.vertical_number,
        cells = result.cells.len(),
        "Grid multiplied snapshot"
    );
    Ok(result)
}

/// Returns `input` followed by `number - 1` randomly placed, rotated and
/// accelerated copies with fresh ids.
pub fn random_multiply(
    input: &DataDescription,
    params: &RandomMultiplyParameters,
    world_size: IntVector2D,
    ids: &mut IdGenerator,
) -> Result<DataDescription> {
    let mut result = input.clone();
    for _ in 1..params.number {
        let mut copy = input.clone();
        let shift = Vector2D::new(
            ids.random_real(0.0, f64::from(world_size.x)) as f32,
            ids.random_real(0.0, f64::from(world_size.y)) as f32,
        );
        copy.shift(shift);
        let angle = ids.random_real(f64::from(params.min_angle), f64::from(params.max_angle));
        copy.rotate(angle as f32);
        let vel = Vector2D::new(
            ids.random_real(f64::from(params.min_vel_x), f64::from(params.max_vel_x)) as f32,
            ids.random_real(f64::from(params.min_vel_y), f64::from(params.max_vel_y)) as f32,
        );
        let angular_vel = ids.random_real(
            f64::from(params.min_angular_vel),
            f64::from(params.max_angular_vel),
        );
        copy.accelerate(vel, angular_vel as f32);
        make_valid(&mut copy, ids)?;
        result.add(copy);
    }
    tracing::debug!(
        copies = params.number,
        cells = result.cells.len(),
        "Random multiplied snapshot"
    );
    Ok(result)
}

/// Repeats `data` every `orig_size` until `size` is filled.
///
/// A cluster copy is kept if its center lies inside `size`, a particle copy
/// if its position does. All copies get fresh ids.
pub fn duplicate(
    data: &mut ClusteredDataDescription,
    orig_size: IntVector2D,
    size: IntVector2D,
    ids: &mut IdGenerator,
) -> Result<()> {
    if orig_size.x <= 0 || orig_size.y <= 0 {
        return Err(DescriptionError::precondition(format!(
            "tile size must be positive, got {}x{}",
            orig_size.x, orig_size.y
        )));
    }
    let (width, height) = (size.x as f32, size.y as f32);
    let mut result = ClusteredDataDescription::default();

    for inc_x in (0..size.x.max(0)).step_by(orig_size.x as usize) {
        for inc_y in (0..size.y.max(0)).step_by(orig_size.y as usize) {
            let offset = Vector2D::new(inc_x as f32, inc_y as f32);
            for cluster in &data.clusters {
                let pos = cluster.cluster_pos_from_cells() + offset;
                if pos.x < width && pos.y < height {
                    let mut copy = cluster.clone();
                    for cell in &mut copy.cells {
                        cell.pos += offset;
                    }
                    make_valid_cluster(&mut copy, ids)?;
                    result.add_cluster(copy);
                }
            }
            for particle in &data.particles {
                let mut copy = particle.clone();
                copy.pos += offset;
                if copy.pos.x < width && copy.pos.y < height {
                    copy.id = ids.get_id();
                    result.add_particle(copy);
                }
            }
        }
    }
    tracing::debug!(
        clusters = result.clusters.len(),
        particles = result.particles.len(),
        "Duplicated snapshot"
    );
    *data = result;
    Ok(())
}

/// Builds a `width` x `height` block of connected cells centered on
/// `params.center`.
pub fn create_rect(params: &CreateRectParameters, ids: &mut IdGenerator) -> Result<DataDescription> {
    let mut result = DataDescription::new();
    for i in 0..params.width {
        for j in 0..params.height {
            let cell = CellDescription::new(ids.get_id())
                .with_pos(Vector2D::new(
                    i as f32 * params.cell_distance,
                    j as f32 * params.cell_distance,
                ))
                .with_energy(params.energy)
                .with_max_connections(params.max_connections)
                .with_color(params.color);
            result.add_cell(cell);
        }
    }
    reconnect_cells(&mut result, params.cell_distance * 1.1)?;
    if params.remove_stickiness {
        remove_stickiness(&mut result);
    }
    result.set_center(params.center);
    Ok(result)
}

/// Paints every cluster in one color drawn from `color_codes`.
pub fn colorize(
    data: &mut ClusteredDataDescription,
    color_codes: &[u8],
    ids: &mut IdGenerator,
) -> Result<()> {
    if color_codes.is_empty() {
        return Err(DescriptionError::precondition("no colors to choose from"));
    }
    for cluster in &mut data.clusters {
        let color = color_codes[ids.random_int(color_codes.len())];
        for cell in &mut cluster.cells {
            cell.color = color;
        }
    }
    Ok(())
}

/// All particles followed by all cells.
pub fn get_entities(data: &DataDescription) -> Vec<CellOrParticle<'_>> {
    data.particles
        .iter()
        .map(CellOrParticle::Particle)
        .chain(data.cells.iter().map(CellOrParticle::Cell))
        .collect()
}
