use super::{GenomeReader, FLAG_INPUT_BLOCKED, FLAG_OUTPUT_BLOCKED, TAG_OFFSET};
use crate::config::SimulationParameters;
use crate::error::{DescriptionError, Result};
use protoplast_data::{
    AttackerDescription, CellFunctionGenome, CellFunctionType, CellGenomeDescription,
    ConstructorGenomeDescription, EnergyDistributionMode, GenomeDescription,
    InjectorGenomeDescription, InjectorMode, MuscleDescription, MuscleMode, NerveDescription,
    NeuronDescription, SensorDescription, SubGenome, TransmitterDescription,
};

const SENSOR_MODE_ALL_DIRECTIONS: u8 = 0;
const SENSOR_MODE_FIXED_ANGLE: u8 = 1;

/// Encodes a genome into its byte representation.
///
/// Fails only if a nested genome does not fit a `u32` length prefix.
pub fn encode(genome: &GenomeDescription) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(genome.len() * 32);
    for (index, cell) in genome.iter().enumerate() {
        encode_cell(&mut out, cell).map_err(|err| err.with_context(format!("cell {index}")))?;
    }
    Ok(out)
}

fn encode_cell(out: &mut Vec<u8>, cell: &CellGenomeDescription) -> Result<()> {
    write_f32(out, cell.reference_distance);
    write_f32(out, cell.reference_angle);
    out.push(cell.color);
    out.push(cell.max_connections);
    out.push(cell.execution_order_number);
    let mut flags = 0;
    if cell.input_blocked {
        flags |= FLAG_INPUT_BLOCKED;
    }
    if cell.output_blocked {
        flags |= FLAG_OUTPUT_BLOCKED;
    }
    out.push(flags);
    out.push(cell.cell_function_type().map_or(0, CellFunctionType::as_u8));

    let Some(function) = &cell.cell_function else {
        return Ok(());
    };
    match function {
        CellFunctionGenome::Neuron(neuron) => {
            for row in &neuron.weights {
                for weight in row {
                    write_f32(out, *weight);
                }
            }
            for bias in &neuron.biases {
                write_f32(out, *bias);
            }
        }
        CellFunctionGenome::Transmitter(transmitter) => out.push(transmitter.mode.as_byte()),
        CellFunctionGenome::Constructor(constructor) => {
            out.push(constructor.activation_mode);
            out.push(u8::from(constructor.single_construction));
            out.push(u8::from(constructor.separate_construction));
            out.push(constructor.angle_alignment);
            write_f32(out, constructor.stiffness);
            write_u32(out, constructor.construction_activation_time);
            write_genome_block(out, &constructor.sub_genome, constructor.current_genome_pos)?;
        }
        CellFunctionGenome::Sensor(sensor) => {
            match sensor.fixed_angle {
                Some(angle) => {
                    out.push(SENSOR_MODE_FIXED_ANGLE);
                    write_f32(out, angle);
                }
                None => {
                    out.push(SENSOR_MODE_ALL_DIRECTIONS);
                    write_f32(out, 0.0);
                }
            }
            write_f32(out, sensor.min_density);
            out.push(sensor.color);
        }
        CellFunctionGenome::Nerve(nerve) => {
            out.push(nerve.pulse_mode);
            out.push(nerve.alternation_mode);
        }
        CellFunctionGenome::Attacker(attacker) => out.push(attacker.mode.as_byte()),
        CellFunctionGenome::Injector(injector) => {
            out.push(injector.mode.as_byte());
            write_u32(out, injector.counter);
            write_genome_block(out, &injector.sub_genome, injector.current_genome_pos)?;
        }
        CellFunctionGenome::Muscle(muscle) => out.push(muscle.mode.as_byte()),
        CellFunctionGenome::Placeholder1 | CellFunctionGenome::Placeholder2 => {}
    }
    Ok(())
}

fn write_f32(out: &mut Vec<u8>, value: f32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn write_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn write_genome_block(out: &mut Vec<u8>, sub_genome: &SubGenome, cursor: u32) -> Result<()> {
    match sub_genome {
        SubGenome::MakeCopy => out.push(1),
        SubGenome::Data(bytes) => {
            let len = u32::try_from(bytes.len()).map_err(|_| {
                DescriptionError::precondition(format!(
                    "nested genome of {} bytes exceeds the u32 length prefix",
                    bytes.len()
                ))
            })?;
            out.push(0);
            write_u32(out, len);
            out.extend_from_slice(bytes);
        }
    }
    write_u32(out, cursor);
    Ok(())
}

/// Decodes a whole genome buffer, normalizing values against `params`.
///
/// Nested genomes are kept as raw bytes. No partial result is returned:
/// any truncated record or unknown tag fails the whole decode.
pub fn decode(bytes: &[u8], params: &SimulationParameters) -> Result<GenomeDescription> {
    decode_cells(bytes, params).map_err(|err| {
        tracing::warn!(len = bytes.len(), error = %err, "Rejected malformed genome");
        err
    })
}

fn decode_cells(bytes: &[u8], params: &SimulationParameters) -> Result<GenomeDescription> {
    let mut reader = GenomeReader::new(bytes);
    let mut genome = GenomeDescription::new();
    while !reader.is_exhausted() {
        genome.push(decode_cell(&mut reader, params)?);
    }
    Ok(genome)
}

fn decode_cell(
    reader: &mut GenomeReader<'_>,
    params: &SimulationParameters,
) -> Result<CellGenomeDescription> {
    let start = reader.position();
    let reference_distance = reader.read_f32()?;
    let reference_angle = reader.read_f32()?;
    let color = reader.read_u8()?;
    let max_connections = reader.read_u8()?.min(params.cell.max_bonds);
    let execution_order_number =
        reader.read_u8()? % params.cell.max_execution_order_numbers.max(1);
    let flags = reader.read_u8()?;
    let tag = reader.read_u8()?;

    let cell_function = if tag == 0 {
        None
    } else {
        let function_type = CellFunctionType::from_u8(tag).ok_or_else(|| {
            DescriptionError::malformed(start + TAG_OFFSET, format!("unknown cell function tag {tag}"))
        })?;
        Some(decode_function(reader, function_type)?)
    };

    Ok(CellGenomeDescription {
        reference_distance,
        reference_angle,
        color,
        max_connections,
        execution_order_number,
        input_blocked: flags & FLAG_INPUT_BLOCKED != 0,
        output_blocked: flags & FLAG_OUTPUT_BLOCKED != 0,
        cell_function,
    })
}

fn decode_function(
    reader: &mut GenomeReader<'_>,
    function_type: CellFunctionType,
) -> Result<CellFunctionGenome> {
    let function = match function_type {
        CellFunctionType::Neuron => {
            let mut neuron = NeuronDescription::default();
            for row in neuron.weights.iter_mut() {
                for weight in row.iter_mut() {
                    *weight = reader.read_f32()?;
                }
            }
            for bias in neuron.biases.iter_mut() {
                *bias = reader.read_f32()?;
            }
            CellFunctionGenome::Neuron(neuron)
        }
        CellFunctionType::Transmitter => CellFunctionGenome::Transmitter(TransmitterDescription {
            mode: EnergyDistributionMode::from_byte(reader.read_u8()?),
        }),
        CellFunctionType::Constructor => {
            let activation_mode = reader.read_u8()?;
            let single_construction = reader.read_bool()?;
            let separate_construction = reader.read_bool()?;
            let angle_alignment = reader.read_u8()?;
            let stiffness = reader.read_f32()?;
            let construction_activation_time = reader.read_u32()?;
            let (sub_genome, current_genome_pos) = read_sub_genome(reader)?;
            CellFunctionGenome::Constructor(ConstructorGenomeDescription {
                activation_mode,
                single_construction,
                separate_construction,
                angle_alignment,
                stiffness,
                construction_activation_time,
                sub_genome,
                current_genome_pos,
            })
        }
        CellFunctionType::Sensor => {
            let mode = reader.read_u8()?;
            let angle = reader.read_f32()?;
            let min_density = reader.read_f32()?;
            let color = reader.read_u8()?;
            CellFunctionGenome::Sensor(SensorDescription {
                fixed_angle: (mode % 2 == SENSOR_MODE_FIXED_ANGLE).then_some(angle),
                min_density,
                color,
            })
        }
        CellFunctionType::Nerve => CellFunctionGenome::Nerve(NerveDescription {
            pulse_mode: reader.read_u8()?,
            alternation_mode: reader.read_u8()?,
        }),
        CellFunctionType::Attacker => CellFunctionGenome::Attacker(AttackerDescription {
            mode: EnergyDistributionMode::from_byte(reader.read_u8()?),
        }),
        CellFunctionType::Injector => {
            let mode = InjectorMode::from_byte(reader.read_u8()?);
            let counter = reader.read_u32()?;
            let (sub_genome, current_genome_pos) = read_sub_genome(reader)?;
            CellFunctionGenome::Injector(InjectorGenomeDescription {
                mode,
                counter,
                sub_genome,
                current_genome_pos,
            })
        }
        CellFunctionType::Muscle => CellFunctionGenome::Muscle(MuscleDescription {
            mode: MuscleMode::from_byte(reader.read_u8()?),
        }),
        CellFunctionType::Placeholder1 => CellFunctionGenome::Placeholder1,
        CellFunctionType::Placeholder2 => CellFunctionGenome::Placeholder2,
    };
    Ok(function)
}

fn read_sub_genome(reader: &mut GenomeReader<'_>) -> Result<(SubGenome, u32)> {
    let (nested, cursor) = reader.read_genome_block()?;
    let sub_genome = match nested {
        Some(bytes) => SubGenome::Data(bytes.to_vec()),
        None => SubGenome::MakeCopy,
    };
    Ok((sub_genome, cursor))
}

/// Decodes the nested genome of a constructor or injector cell.
///
/// Returns `None` when the cell carries no nested genome or replicates its
/// enclosing one.
pub fn decode_sub_genome(
    cell: &CellGenomeDescription,
    params: &SimulationParameters,
) -> Result<Option<GenomeDescription>> {
    cell.sub_genome()
        .map(|bytes| decode(bytes, params))
        .transpose()
}

/// Checks that a buffer and every nested genome in it decode.
///
/// Nesting deeper than `params.genome.max_nesting_depth` is reported as a
/// malformed genome.
pub fn validate(bytes: &[u8], params: &SimulationParameters) -> Result<()> {
    validate_at_depth(bytes, params, 0)
}

fn validate_at_depth(bytes: &[u8], params: &SimulationParameters, depth: usize) -> Result<()> {
    if depth > params.genome.max_nesting_depth {
        return Err(DescriptionError::malformed(
            0,
            format!(
                "nesting exceeds {} levels",
                params.genome.max_nesting_depth
            ),
        ));
    }
    let genome = decode(bytes, params)?;
    for (index, cell) in genome.iter().enumerate() {
        if let Some(nested) = cell.sub_genome() {
            validate_at_depth(nested, params, depth + 1)
                .map_err(|err| err.with_context(format!("sub-genome of cell {index}")))?;
        }
    }
    Ok(())
}
