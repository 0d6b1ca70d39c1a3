use super::cell_function::{
    AttackerDescription, CellFunctionType, EnergyDistributionMode, InjectorMode,
    MuscleDescription, NerveDescription, NeuronDescription, SensorDescription,
    TransmitterDescription,
};
use serde::{Deserialize, Serialize};

/// Ordered blueprint of the cells a constructor builds.
pub type GenomeDescription = Vec<CellGenomeDescription>;

/// Nested genome of a constructor or injector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubGenome {
    /// Replicate the enclosing genome instead of carrying one.
    MakeCopy,
    /// Independently encoded genome buffer, decoded on demand.
    Data(Vec<u8>),
}

impl Default for SubGenome {
    fn default() -> Self {
        SubGenome::Data(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorGenomeDescription {
    pub activation_mode: u8,
    pub single_construction: bool,
    pub separate_construction: bool,
    pub angle_alignment: u8,
    pub stiffness: f32,
    pub construction_activation_time: u32,
    pub sub_genome: SubGenome,
    pub current_genome_pos: u32,
}

impl Default for ConstructorGenomeDescription {
    fn default() -> Self {
        Self {
            activation_mode: 13,
            single_construction: false,
            separate_construction: true,
            angle_alignment: 0,
            stiffness: 1.0,
            construction_activation_time: 100,
            sub_genome: SubGenome::default(),
            current_genome_pos: 0,
        }
    }
}

impl ConstructorGenomeDescription {
    #[must_use]
    pub fn with_genome(mut self, genome: Vec<u8>) -> Self {
        self.sub_genome = SubGenome::Data(genome);
        self
    }

    #[must_use]
    pub fn with_make_genome_copy(mut self) -> Self {
        self.sub_genome = SubGenome::MakeCopy;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjectorGenomeDescription {
    pub mode: InjectorMode,
    pub counter: u32,
    pub sub_genome: SubGenome,
    pub current_genome_pos: u32,
}

impl InjectorGenomeDescription {
    #[must_use]
    pub fn with_genome(mut self, genome: Vec<u8>) -> Self {
        self.sub_genome = SubGenome::Data(genome);
        self
    }

    #[must_use]
    pub fn with_make_genome_copy(mut self) -> Self {
        self.sub_genome = SubGenome::MakeCopy;
        self
    }
}

/// Cell-function payload of a genome cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellFunctionGenome {
    Neuron(NeuronDescription),
    Transmitter(TransmitterDescription),
    Constructor(ConstructorGenomeDescription),
    Sensor(SensorDescription),
    Nerve(NerveDescription),
    Attacker(AttackerDescription),
    Injector(InjectorGenomeDescription),
    Muscle(MuscleDescription),
    Placeholder1,
    Placeholder2,
}

impl CellFunctionGenome {
    #[must_use]
    pub fn function_type(&self) -> CellFunctionType {
        match self {
            CellFunctionGenome::Neuron(_) => CellFunctionType::Neuron,
            CellFunctionGenome::Transmitter(_) => CellFunctionType::Transmitter,
            CellFunctionGenome::Constructor(_) => CellFunctionType::Constructor,
            CellFunctionGenome::Sensor(_) => CellFunctionType::Sensor,
            CellFunctionGenome::Nerve(_) => CellFunctionType::Nerve,
            CellFunctionGenome::Attacker(_) => CellFunctionType::Attacker,
            CellFunctionGenome::Injector(_) => CellFunctionType::Injector,
            CellFunctionGenome::Muscle(_) => CellFunctionType::Muscle,
            CellFunctionGenome::Placeholder1 => CellFunctionType::Placeholder1,
            CellFunctionGenome::Placeholder2 => CellFunctionType::Placeholder2,
        }
    }

    /// Payload with default values for the given type.
    #[must_use]
    pub fn default_for(function_type: CellFunctionType) -> Self {
        match function_type {
            CellFunctionType::Neuron => CellFunctionGenome::Neuron(NeuronDescription::default()),
            CellFunctionType::Transmitter => CellFunctionGenome::Transmitter(TransmitterDescription {
                mode: EnergyDistributionMode::default(),
            }),
            CellFunctionType::Constructor => {
                CellFunctionGenome::Constructor(ConstructorGenomeDescription::default())
            }
            CellFunctionType::Sensor => CellFunctionGenome::Sensor(SensorDescription::default()),
            CellFunctionType::Nerve => CellFunctionGenome::Nerve(NerveDescription::default()),
            CellFunctionType::Attacker => {
                CellFunctionGenome::Attacker(AttackerDescription::default())
            }
            CellFunctionType::Injector => {
                CellFunctionGenome::Injector(InjectorGenomeDescription::default())
            }
            CellFunctionType::Muscle => CellFunctionGenome::Muscle(MuscleDescription::default()),
            CellFunctionType::Placeholder1 => CellFunctionGenome::Placeholder1,
            CellFunctionType::Placeholder2 => CellFunctionGenome::Placeholder2,
        }
    }

    #[must_use]
    pub fn sub_genome(&self) -> Option<&SubGenome> {
        match self {
            CellFunctionGenome::Constructor(c) => Some(&c.sub_genome),
            CellFunctionGenome::Injector(i) => Some(&i.sub_genome),
            _ => None,
        }
    }
}

/// Blueprint of one cell to be constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellGenomeDescription {
    /// Distance to the previously constructed cell.
    pub reference_distance: f32,
    /// Bend relative to the previous construction direction, in degrees.
    pub reference_angle: f32,
    pub color: u8,
    pub max_connections: u8,
    pub execution_order_number: u8,
    pub input_blocked: bool,
    pub output_blocked: bool,
    pub cell_function: Option<CellFunctionGenome>,
}

impl Default for CellGenomeDescription {
    fn default() -> Self {
        Self {
            reference_distance: 1.0,
            reference_angle: 0.0,
            color: 0,
            max_connections: 2,
            execution_order_number: 0,
            input_blocked: false,
            output_blocked: false,
            cell_function: None,
        }
    }
}

impl CellGenomeDescription {
    #[must_use]
    pub fn with_color(mut self, color: u8) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_reference_distance(mut self, distance: f32) -> Self {
        self.reference_distance = distance;
        self
    }

    #[must_use]
    pub fn with_reference_angle(mut self, angle: f32) -> Self {
        self.reference_angle = angle;
        self
    }

    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u8) -> Self {
        self.max_connections = max_connections;
        self
    }

    #[must_use]
    pub fn with_execution_order_number(mut self, value: u8) -> Self {
        self.execution_order_number = value;
        self
    }

    #[must_use]
    pub fn with_cell_function(mut self, cell_function: CellFunctionGenome) -> Self {
        self.cell_function = Some(cell_function);
        self
    }

    #[must_use]
    pub fn cell_function_type(&self) -> Option<CellFunctionType> {
        self.cell_function
            .as_ref()
            .map(CellFunctionGenome::function_type)
    }

    /// `None` for cells without a nested genome.
    #[must_use]
    pub fn is_make_genome_copy(&self) -> Option<bool> {
        self.cell_function
            .as_ref()
            .and_then(CellFunctionGenome::sub_genome)
            .map(|sub| matches!(sub, SubGenome::MakeCopy))
    }

    /// Encoded nested genome, if this cell carries one.
    #[must_use]
    pub fn sub_genome(&self) -> Option<&[u8]> {
        match self.cell_function.as_ref()?.sub_genome()? {
            SubGenome::Data(bytes) => Some(bytes),
            SubGenome::MakeCopy => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_genome_accessors() {
        let plain = CellGenomeDescription::default();
        assert_eq!(plain.is_make_genome_copy(), None);
        assert_eq!(plain.sub_genome(), None);

        let copying = CellGenomeDescription::default().with_cell_function(
            CellFunctionGenome::Constructor(
                ConstructorGenomeDescription::default().with_make_genome_copy(),
            ),
        );
        assert_eq!(copying.is_make_genome_copy(), Some(true));
        assert_eq!(copying.sub_genome(), None);

        let carrying = CellGenomeDescription::default().with_cell_function(
            CellFunctionGenome::Injector(InjectorGenomeDescription::default().with_genome(vec![9])),
        );
        assert_eq!(carrying.is_make_genome_copy(), Some(false));
        assert_eq!(carrying.sub_genome(), Some(&[9u8][..]));
    }

    #[test]
    fn test_default_payload_matches_type() {
        for t in CellFunctionType::ALL {
            assert_eq!(CellFunctionGenome::default_for(t).function_type(), t);
        }
    }
}
