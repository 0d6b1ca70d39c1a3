/// Asserts that every cell with connections has a ring summing to 360 degrees.
#[macro_export]
macro_rules! assert_rings_closed {
    ($cells:expr) => {
        for cell in $cells {
            if !cell.connections.is_empty() {
                let sum: f32 = cell.connections.iter().map(|c| c.angle_from_previous).sum();
                assert!(
                    (sum - 360.0).abs() < 1e-3,
                    "Ring of cell {} sums to {} instead of 360",
                    cell.id,
                    sum
                );
            }
        }
    };
}

/// Asserts that no cell exceeds its connection capacity.
#[macro_export]
macro_rules! assert_within_capacity {
    ($cells:expr) => {
        for cell in $cells {
            assert!(
                cell.connections.len() <= usize::from(cell.max_connections),
                "Cell {} has {} connections but allows {}",
                cell.id,
                cell.connections.len(),
                cell.max_connections
            );
        }
    };
}

/// Asserts that a cell with the given id has exactly `$count` connections.
#[macro_export]
macro_rules! assert_connection_count {
    ($data:expr, $id:expr, $count:expr) => {
        let cell = $data
            .cells
            .iter()
            .find(|c| c.id == $id)
            .expect("Cell not found in snapshot");
        assert_eq!(
            cell.connections.len(),
            $count,
            "Connection count mismatch for cell {}",
            $id
        );
    };
}

/// Asserts that two vectors are within `$eps` of each other.
#[macro_export]
macro_rules! assert_vec_near {
    ($a:expr, $b:expr, $eps:expr) => {
        let (a, b) = ($a, $b);
        assert!(
            (a - b).length() < $eps,
            "{:?} is not within {} of {:?}",
            a,
            $eps,
            b
        );
    };
}
