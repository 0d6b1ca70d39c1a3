use serde::{Deserialize, Serialize};

/// Number of input/output channels a neuron processes.
pub const NEURON_CHANNELS: usize = 8;

/// Discriminant of a cell function, shared by cells and genome cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellFunctionType {
    Neuron = 1,
    Transmitter = 2,
    Constructor = 3,
    Sensor = 4,
    Nerve = 5,
    Attacker = 6,
    Injector = 7,
    Muscle = 8,
    Placeholder1 = 9,
    Placeholder2 = 10,
}

impl CellFunctionType {
    pub const ALL: [CellFunctionType; 10] = [
        CellFunctionType::Neuron,
        CellFunctionType::Transmitter,
        CellFunctionType::Constructor,
        CellFunctionType::Sensor,
        CellFunctionType::Nerve,
        CellFunctionType::Attacker,
        CellFunctionType::Injector,
        CellFunctionType::Muscle,
        CellFunctionType::Placeholder1,
        CellFunctionType::Placeholder2,
    ];

    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| *t as u8 == value)
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether cells of this type carry a nested genome.
    #[must_use]
    pub fn has_sub_genome(self) -> bool {
        matches!(self, CellFunctionType::Constructor | CellFunctionType::Injector)
    }
}

/// How transmitters and attackers hand out energy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyDistributionMode {
    #[default]
    ConnectedCells,
    TransmittersAndConstructors,
}

impl EnergyDistributionMode {
    /// Out-of-range bytes are folded into range so mutated genomes stay decodable.
    #[must_use]
    pub fn from_byte(value: u8) -> Self {
        match value % 2 {
            0 => Self::ConnectedCells,
            _ => Self::TransmittersAndConstructors,
        }
    }

    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            Self::ConnectedCells => 0,
            Self::TransmittersAndConstructors => 1,
        }
    }
}

/// Which cells an injector may write its genome into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjectorMode {
    #[default]
    OnlyEmptyCells,
    AllCells,
}

impl InjectorMode {
    #[must_use]
    pub fn from_byte(value: u8) -> Self {
        match value % 2 {
            0 => Self::OnlyEmptyCells,
            _ => Self::AllCells,
        }
    }

    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            Self::OnlyEmptyCells => 0,
            Self::AllCells => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MuscleMode {
    #[default]
    Movement,
    ContractionExpansion,
    Bending,
}

impl MuscleMode {
    #[must_use]
    pub fn from_byte(value: u8) -> Self {
        match value % 3 {
            0 => Self::Movement,
            1 => Self::ContractionExpansion,
            _ => Self::Bending,
        }
    }

    #[must_use]
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Movement => 0,
            Self::ContractionExpansion => 1,
            Self::Bending => 2,
        }
    }
}

/// Fully connected single-layer network state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NeuronDescription {
    /// `weights[row][col]` maps input channel `col` to output channel `row`.
    pub weights: [[f32; NEURON_CHANNELS]; NEURON_CHANNELS],
    pub biases: [f32; NEURON_CHANNELS],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransmitterDescription {
    pub mode: EnergyDistributionMode,
}

/// Constructor state of a living cell. `genome` is an encoded genome buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructorDescription {
    /// 0 means manual activation, otherwise every n-th cycle.
    pub activation_mode: u8,
    pub single_construction: bool,
    pub separate_construction: bool,
    pub angle_alignment: u8,
    pub stiffness: f32,
    pub construction_activation_time: u32,
    pub genome: Vec<u8>,
    /// Byte offset of the next genome cell to construct.
    pub current_genome_pos: u32,
}

impl Default for ConstructorDescription {
    fn default() -> Self {
        Self {
            activation_mode: 13,
            single_construction: false,
            separate_construction: true,
            angle_alignment: 0,
            stiffness: 1.0,
            construction_activation_time: 100,
            genome: Vec::new(),
            current_genome_pos: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDescription {
    /// `None` scans all directions.
    pub fixed_angle: Option<f32>,
    pub min_density: f32,
    pub color: u8,
}

impl Default for SensorDescription {
    fn default() -> Self {
        Self {
            fixed_angle: None,
            min_density: 0.05,
            color: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NerveDescription {
    pub pulse_mode: u8,
    pub alternation_mode: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackerDescription {
    pub mode: EnergyDistributionMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjectorDescription {
    pub mode: InjectorMode,
    pub counter: u32,
    pub genome: Vec<u8>,
    pub current_genome_pos: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MuscleDescription {
    pub mode: MuscleMode,
}

/// Function payload of a living cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellFunction {
    Neuron(NeuronDescription),
    Transmitter(TransmitterDescription),
    Constructor(ConstructorDescription),
    Sensor(SensorDescription),
    Nerve(NerveDescription),
    Attacker(AttackerDescription),
    Injector(InjectorDescription),
    Muscle(MuscleDescription),
    Placeholder1,
    Placeholder2,
}

impl CellFunction {
    #[must_use]
    pub fn function_type(&self) -> CellFunctionType {
        match self {
            CellFunction::Neuron(_) => CellFunctionType::Neuron,
            CellFunction::Transmitter(_) => CellFunctionType::Transmitter,
            CellFunction::Constructor(_) => CellFunctionType::Constructor,
            CellFunction::Sensor(_) => CellFunctionType::Sensor,
            CellFunction::Nerve(_) => CellFunctionType::Nerve,
            CellFunction::Attacker(_) => CellFunctionType::Attacker,
            CellFunction::Injector(_) => CellFunctionType::Injector,
            CellFunction::Muscle(_) => CellFunctionType::Muscle,
            CellFunction::Placeholder1 => CellFunctionType::Placeholder1,
            CellFunction::Placeholder2 => CellFunctionType::Placeholder2,
        }
    }

    /// Encoded genome carried by constructors and injectors.
    #[must_use]
    pub fn genome(&self) -> Option<&[u8]> {
        match self {
            CellFunction::Constructor(c) => Some(&c.genome),
            CellFunction::Injector(i) => Some(&i.genome),
            _ => None,
        }
    }
}
