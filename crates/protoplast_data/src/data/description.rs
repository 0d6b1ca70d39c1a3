use super::cell_function::{CellFunction, CellFunctionType};
use super::vector::Vector2D;
use serde::{Deserialize, Serialize};

/// Directed link from a cell to one of its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDescription {
    /// Id of the neighbour. Not owning; may dangle after removals.
    pub cell_id: u64,
    /// Rest distance between both cells.
    pub distance: f32,
    /// Clockwise angle in degrees from the previous connection in the ring.
    pub angle_from_previous: f32,
}

/// Signal packet travelling through a cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenDescription {
    pub energy: f32,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellMetadata {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LivingState {
    #[default]
    Ready,
    UnderConstruction,
    JustReady,
    Dying,
}

/// A physical cell. `connections` forms a circular, angle-ordered ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellDescription {
    pub id: u64,
    pub pos: Vector2D,
    pub vel: Vector2D,
    pub energy: f32,
    pub max_connections: u8,
    pub connections: Vec<ConnectionDescription>,
    pub tokens: Vec<TokenDescription>,
    pub color: u8,
    pub execution_order_number: u8,
    pub input_blocked: bool,
    pub output_blocked: bool,
    pub age: u32,
    pub activation_time: u32,
    pub living_state: LivingState,
    pub metadata: CellMetadata,
    pub cell_function: Option<CellFunction>,
}

impl Default for CellDescription {
    fn default() -> Self {
        Self {
            id: 0,
            pos: Vector2D::ZERO,
            vel: Vector2D::ZERO,
            energy: 100.0,
            max_connections: 0,
            connections: Vec::new(),
            tokens: Vec::new(),
            color: 0,
            execution_order_number: 0,
            input_blocked: false,
            output_blocked: false,
            age: 0,
            activation_time: 0,
            living_state: LivingState::Ready,
            metadata: CellMetadata::default(),
            cell_function: None,
        }
    }
}

impl CellDescription {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_pos(mut self, pos: Vector2D) -> Self {
        self.pos = pos;
        self
    }

    #[must_use]
    pub fn with_vel(mut self, vel: Vector2D) -> Self {
        self.vel = vel;
        self
    }

    #[must_use]
    pub fn with_energy(mut self, energy: f32) -> Self {
        self.energy = energy;
        self
    }

    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u8) -> Self {
        self.max_connections = max_connections;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: u8) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_execution_order_number(mut self, value: u8) -> Self {
        self.execution_order_number = value;
        self
    }

    #[must_use]
    pub fn with_cell_function(mut self, cell_function: CellFunction) -> Self {
        self.cell_function = Some(cell_function);
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: CellMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn is_connected_to(&self, id: u64) -> bool {
        self.connections.iter().any(|c| c.cell_id == id)
    }

    #[must_use]
    pub fn has_free_connection_slot(&self) -> bool {
        self.connections.len() < usize::from(self.max_connections)
    }

    #[must_use]
    pub fn cell_function_type(&self) -> Option<CellFunctionType> {
        self.cell_function.as_ref().map(CellFunction::function_type)
    }

    pub fn add_token(&mut self, token: TokenDescription) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Inserts at `index`, appending when `index` is past the end.
    pub fn add_token_at(&mut self, index: usize, token: TokenDescription) -> &mut Self {
        let index = index.min(self.tokens.len());
        self.tokens.insert(index, token);
        self
    }

    pub fn del_token(&mut self, index: usize) -> Option<TokenDescription> {
        (index < self.tokens.len()).then(|| self.tokens.remove(index))
    }
}

/// Free-floating energy unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticleDescription {
    pub id: u64,
    pub pos: Vector2D,
    pub vel: Vector2D,
    pub energy: f32,
    pub color: u8,
}

impl ParticleDescription {
    #[must_use]
    pub fn new(id: u64, pos: Vector2D, energy: f32) -> Self {
        Self {
            id,
            pos,
            energy,
            ..Default::default()
        }
    }
}

/// Cells moving together as one quasi-rigid body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterDescription {
    pub id: u64,
    pub cells: Vec<CellDescription>,
}

impl ClusterDescription {
    /// Mean cell position; zero for an empty cluster.
    #[must_use]
    pub fn cluster_pos_from_cells(&self) -> Vector2D {
        if self.cells.is_empty() {
            return Vector2D::ZERO;
        }
        let sum = self
            .cells
            .iter()
            .fold(Vector2D::ZERO, |acc, cell| acc + cell.pos);
        sum / self.cells.len() as f32
    }
}

/// Flat snapshot of cells and particles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataDescription {
    pub cells: Vec<CellDescription>,
    pub particles: Vec<ParticleDescription>,
}

impl DataDescription {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, other: DataDescription) -> &mut Self {
        self.cells.extend(other.cells);
        self.particles.extend(other.particles);
        self
    }

    pub fn add_cell(&mut self, cell: CellDescription) -> &mut Self {
        self.cells.push(cell);
        self
    }

    pub fn add_cells(&mut self, cells: impl IntoIterator<Item = CellDescription>) -> &mut Self {
        self.cells.extend(cells);
        self
    }

    pub fn add_particle(&mut self, particle: ParticleDescription) -> &mut Self {
        self.particles.push(particle);
        self
    }

    pub fn add_particles(
        &mut self,
        particles: impl IntoIterator<Item = ParticleDescription>,
    ) -> &mut Self {
        self.particles.extend(particles);
        self
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.particles.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.particles.is_empty()
    }

    #[must_use]
    pub fn max_id(&self) -> Option<u64> {
        self.cells
            .iter()
            .map(|c| c.id)
            .chain(self.particles.iter().map(|p| p.id))
            .max()
    }
}

impl From<&ClusteredDataDescription> for DataDescription {
    fn from(clustered: &ClusteredDataDescription) -> Self {
        Self {
            cells: clustered
                .clusters
                .iter()
                .flat_map(|cluster| cluster.cells.iter().cloned())
                .collect(),
            particles: clustered.particles.clone(),
        }
    }
}

/// Snapshot with cells grouped by cluster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteredDataDescription {
    pub clusters: Vec<ClusterDescription>,
    pub particles: Vec<ParticleDescription>,
}

impl ClusteredDataDescription {
    pub fn add_cluster(&mut self, cluster: ClusterDescription) -> &mut Self {
        self.clusters.push(cluster);
        self
    }

    pub fn add_particle(&mut self, particle: ParticleDescription) -> &mut Self {
        self.particles.push(particle);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.iter().all(|c| c.cells.is_empty()) && self.particles.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = &CellDescription> {
        self.clusters.iter().flat_map(|c| c.cells.iter())
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut CellDescription> {
        self.clusters.iter_mut().flat_map(|c| c.cells.iter_mut())
    }
}

/// Borrowed view of either entity kind in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellOrParticle<'a> {
    Cell(&'a CellDescription),
    Particle(&'a ParticleDescription),
}

impl CellOrParticle<'_> {
    #[must_use]
    pub fn id(&self) -> u64 {
        match self {
            CellOrParticle::Cell(cell) => cell.id,
            CellOrParticle::Particle(particle) => particle.id,
        }
    }

    #[must_use]
    pub fn pos(&self) -> Vector2D {
        match self {
            CellOrParticle::Cell(cell) => cell.pos,
            CellOrParticle::Particle(particle) => particle.pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_clustered_data() {
        let mut clustered = ClusteredDataDescription::default();
        clustered.add_cluster(ClusterDescription {
            id: 10,
            cells: vec![CellDescription::new(1), CellDescription::new(2)],
        });
        clustered.add_cluster(ClusterDescription {
            id: 11,
            cells: vec![CellDescription::new(3)],
        });
        clustered.add_particle(ParticleDescription::new(4, Vector2D::ZERO, 1.0));

        let flat = DataDescription::from(&clustered);
        let ids: Vec<u64> = flat.cells.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(flat.particles.len(), 1);
        assert_eq!(flat.max_id(), Some(4));
    }

    #[test]
    fn test_token_editing() {
        let mut cell = CellDescription::new(1);
        cell.add_token(TokenDescription {
            energy: 1.0,
            data: vec![],
        });
        cell.add_token_at(
            0,
            TokenDescription {
                energy: 2.0,
                data: vec![],
            },
        );
        cell.add_token_at(
            99,
            TokenDescription {
                energy: 3.0,
                data: vec![],
            },
        );
        let energies: Vec<f32> = cell.tokens.iter().map(|t| t.energy).collect();
        assert_eq!(energies, vec![2.0, 1.0, 3.0]);

        assert_eq!(cell.del_token(1).map(|t| t.energy), Some(1.0));
        assert!(cell.del_token(5).is_none());
    }

    #[test]
    fn test_cluster_pos_from_cells() {
        let cluster = ClusterDescription {
            id: 1,
            cells: vec![
                CellDescription::new(1).with_pos(Vector2D::new(0.0, 0.0)),
                CellDescription::new(2).with_pos(Vector2D::new(2.0, 4.0)),
            ],
        };
        assert_eq!(cluster.cluster_pos_from_cells(), Vector2D::new(1.0, 2.0));
        assert_eq!(
            ClusterDescription::default().cluster_pos_from_cells(),
            Vector2D::ZERO
        );
    }

    #[test]
    fn test_description_serde_roundtrip() {
        let mut data = DataDescription::new();
        data.add_cell(
            CellDescription::new(7)
                .with_pos(Vector2D::new(1.5, -2.0))
                .with_max_connections(3),
        );
        let json = serde_json::to_string(&data).expect("serialize");
        let back: DataDescription = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, data);
    }
}
