use anyhow::Context;
use clap::Parser;
use protoplast_core::config::SimulationParameters;
use protoplast_core::genome;
use protoplast_core::logging::init_logging;
use protoplast_data::GenomeDescription;
use serde::Serialize;
use std::path::PathBuf;

/// Decodes a genome buffer and prints it as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Raw genome file
    #[arg(required_unless_present = "hex", conflicts_with = "hex")]
    input: Option<PathBuf>,

    /// Genome as a hex string instead of a file
    #[arg(long)]
    hex: Option<String>,

    /// TOML file with simulation parameters
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Also report the byte offset of this cell
    #[arg(long)]
    cell_index: Option<usize>,

    /// Also report the cell starting at or after this byte offset
    #[arg(long)]
    byte_index: Option<usize>,

    /// Decode nested genomes recursively
    #[arg(long, default_value_t = false)]
    nested: bool,
}

#[derive(Serialize, Debug)]
struct CellReport {
    offset: usize,
    #[serde(flatten)]
    cell: protoplast_data::CellGenomeDescription,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_genome: Option<Vec<CellReport>>,
}

#[derive(Serialize, Debug)]
struct Report {
    bytes: usize,
    cell_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    byte_index_of_cell: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cell_at_byte: Option<usize>,
    cells: Vec<CellReport>,
}

fn load_bytes(args: &Args) -> anyhow::Result<Vec<u8>> {
    if let Some(text) = &args.hex {
        return hex::decode(text.trim()).context("Invalid hex genome");
    }
    let path = args
        .input
        .as_ref()
        .context("Either a genome file or --hex is required")?;
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_params(args: &Args) -> anyhow::Result<SimulationParameters> {
    match &args.params {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            SimulationParameters::from_toml(&content)
        }
        None => Ok(SimulationParameters::default()),
    }
}

fn report_cells(
    bytes: &[u8],
    decoded: GenomeDescription,
    params: &SimulationParameters,
    nested: bool,
) -> anyhow::Result<Vec<CellReport>> {
    let offsets = genome::cell_offsets(bytes)?;
    let mut cells = Vec::with_capacity(decoded.len());
    for (cell, offset) in decoded.into_iter().zip(offsets) {
        let sub_genome = match cell.sub_genome() {
            Some(sub_bytes) if nested => {
                let sub_decoded = genome::decode(sub_bytes, params)?;
                Some(report_cells(sub_bytes, sub_decoded, params, nested)?)
            }
            _ => None,
        };
        cells.push(CellReport {
            offset,
            cell,
            sub_genome,
        });
    }
    Ok(cells)
}

fn inspect(args: &Args) -> anyhow::Result<Report> {
    let bytes = load_bytes(args)?;
    let params = load_params(args)?;
    if args.nested {
        genome::validate(&bytes, &params)?;
    }
    let decoded = genome::decode(&bytes, &params)?;

    Ok(Report {
        bytes: bytes.len(),
        cell_count: decoded.len(),
        byte_index_of_cell: args
            .cell_index
            .map(|k| genome::cell_index_to_byte_index(&bytes, k))
            .transpose()?,
        cell_at_byte: args
            .byte_index
            .map(|b| genome::byte_index_to_cell_index(&bytes, b))
            .transpose()?,
        cells: report_cells(&bytes, decoded, &params, args.nested)?,
    })
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();
    let report = inspect(&args)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
