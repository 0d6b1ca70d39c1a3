//! Whole-snapshot geometric transforms.
//!
//! Every cell and particle takes part, and in clustered snapshots every cell
//! counts once regardless of how cells are grouped.

use crate::math::{apply, rotation_matrix, tangential_velocity};
use protoplast_data::{ClusteredDataDescription, DataDescription, Vector2D};

pub trait SnapshotLogic {
    /// Mean position of all cells and particles; zero for an empty snapshot.
    fn calc_center(&self) -> Vector2D;

    fn shift(&mut self, delta: Vector2D);

    /// Rotates all positions by `angle` degrees about the center.
    fn rotate(&mut self, angle: f32);

    /// Adds `vel_delta` plus the tangential velocity of spinning at
    /// `angular_vel_delta` degrees per step about the center.
    fn accelerate(&mut self, vel_delta: Vector2D, angular_vel_delta: f32);

    fn set_center(&mut self, center: Vector2D) {
        let delta = center - self.calc_center();
        self.shift(delta);
    }
}

fn mean(positions: impl Iterator<Item = Vector2D>) -> Vector2D {
    let (sum, count) = positions.fold((Vector2D::ZERO, 0usize), |(sum, count), pos| {
        (sum + pos, count + 1)
    });
    if count == 0 {
        Vector2D::ZERO
    } else {
        sum / count as f32
    }
}

impl SnapshotLogic for DataDescription {
    fn calc_center(&self) -> Vector2D {
        mean(
            self.cells
                .iter()
                .map(|c| c.pos)
                .chain(self.particles.iter().map(|p| p.pos)),
        )
    }

    fn shift(&mut self, delta: Vector2D) {
        for cell in &mut self.cells {
            cell.pos += delta;
        }
        for particle in &mut self.particles {
            particle.pos += delta;
        }
    }

    fn rotate(&mut self, angle: f32) {
        let matrix = rotation_matrix(angle);
        let center = self.calc_center();
        let rotate = |pos: &mut Vector2D| *pos = center + apply(&matrix, *pos - center);
        self.cells.iter_mut().for_each(|c| rotate(&mut c.pos));
        self.particles.iter_mut().for_each(|p| rotate(&mut p.pos));
    }

    fn accelerate(&mut self, vel_delta: Vector2D, angular_vel_delta: f32) {
        let center = self.calc_center();
        for cell in &mut self.cells {
            cell.vel += tangential_velocity(cell.pos - center, vel_delta, angular_vel_delta);
        }
        for particle in &mut self.particles {
            particle.vel +=
                tangential_velocity(particle.pos - center, vel_delta, angular_vel_delta);
        }
    }
}

impl SnapshotLogic for ClusteredDataDescription {
    fn calc_center(&self) -> Vector2D {
        mean(
            self.cells()
                .map(|c| c.pos)
                .chain(self.particles.iter().map(|p| p.pos)),
        )
    }

    fn shift(&mut self, delta: Vector2D) {
        for cell in self.cells_mut() {
            cell.pos += delta;
        }
        for particle in &mut self.particles {
            particle.pos += delta;
        }
    }

    fn rotate(&mut self, angle: f32) {
        let matrix = rotation_matrix(angle);
        let center = self.calc_center();
        let rotate = |pos: &mut Vector2D| *pos = center + apply(&matrix, *pos - center);
        self.cells_mut().for_each(|c| rotate(&mut c.pos));
        self.particles.iter_mut().for_each(|p| rotate(&mut p.pos));
    }

    fn accelerate(&mut self, vel_delta: Vector2D, angular_vel_delta: f32) {
        let center = self.calc_center();
        for cell in self.cells_mut() {
            cell.vel += tangential_velocity(cell.pos - center, vel_delta, angular_vel_delta);
        }
        for particle in &mut self.particles {
            particle.vel +=
                tangential_velocity(particle.pos - center, vel_delta, angular_vel_delta);
        }
    }
}
