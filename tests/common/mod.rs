pub mod macros;

use protoplast_lib::model::description::{
    CellDescription, ClusterDescription, ClusteredDataDescription, DataDescription,
    ParticleDescription, Vector2D,
};
use protoplast_lib::model::topology::{CellIndexCache, ConnectionLogic};

#[allow(dead_code)]
pub struct SnapshotBuilder {
    data: DataDescription,
    links: Vec<(u64, u64)>,
    next_id: u64,
    max_connections: u8,
}

#[allow(dead_code)]
impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            data: DataDescription::new(),
            links: Vec::new(),
            next_id: 1,
            max_connections: 6,
        }
    }

    pub fn with_max_connections(mut self, max_connections: u8) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Adds a cell with the next free id.
    pub fn with_cell(mut self, x: f32, y: f32) -> Self {
        let cell = CellDescription::new(self.next_id)
            .with_pos(Vector2D::new(x, y))
            .with_max_connections(self.max_connections);
        self.next_id += 1;
        self.data.add_cell(cell);
        self
    }

    pub fn with_particle(mut self, x: f32, y: f32) -> Self {
        self.data.add_particle(ParticleDescription::new(
            self.next_id,
            Vector2D::new(x, y),
            1.0,
        ));
        self.next_id += 1;
        self
    }

    /// Cells along the x axis starting at the origin.
    pub fn with_line(mut self, count: usize, spacing: f32) -> Self {
        for i in 0..count {
            self = self.with_cell(i as f32 * spacing, 0.0);
        }
        self
    }

    pub fn with_link(mut self, id1: u64, id2: u64) -> Self {
        self.links.push((id1, id2));
        self
    }

    pub fn build(self) -> DataDescription {
        let mut data = self.data;
        let mut cache = CellIndexCache::new();
        for (id1, id2) in self.links {
            data.add_connection(id1, id2, &mut cache)
                .expect("Failed to link cells in test builder");
        }
        data
    }

    /// Puts every cell into its own cluster.
    pub fn build_clustered(self) -> ClusteredDataDescription {
        let data = self.build();
        let mut clustered = ClusteredDataDescription::default();
        for cell in data.cells {
            clustered.add_cluster(ClusterDescription {
                id: cell.id + 1000,
                cells: vec![cell],
            });
        }
        for particle in data.particles {
            clustered.add_particle(particle);
        }
        clustered
    }
}

#[allow(dead_code)]
pub fn angle_sum(cell: &CellDescription) -> f32 {
    cell.connections.iter().map(|c| c.angle_from_previous).sum()
}

#[allow(dead_code)]
pub fn connected_ids(cell: &CellDescription) -> Vec<u64> {
    cell.connections.iter().map(|c| c.cell_id).collect()
}
