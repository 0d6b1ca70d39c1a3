use protoplast_lib::model::config::SimulationParameters;
use protoplast_lib::model::description::{
    CellFunctionGenome, CellFunctionType, CellGenomeDescription, ConstructorGenomeDescription,
    InjectorGenomeDescription, NeuronDescription, SensorDescription, SubGenome,
    TransmitterDescription,
};
use protoplast_lib::model::error::DescriptionError;
use protoplast_lib::model::genome;

fn sensor_cell(color: u8) -> CellGenomeDescription {
    CellGenomeDescription::default()
        .with_color(color)
        .with_cell_function(CellFunctionGenome::Sensor(SensorDescription::default()))
}

fn three_cell_genome() -> Vec<CellGenomeDescription> {
    let nested = genome::encode(&vec![sensor_cell(5)]).expect("Failed to encode nested genome");
    vec![
        CellGenomeDescription::default()
            .with_color(1)
            .with_cell_function(CellFunctionGenome::Neuron(NeuronDescription::default())),
        CellGenomeDescription::default()
            .with_color(4)
            .with_cell_function(CellFunctionGenome::Transmitter(
                TransmitterDescription::default(),
            )),
        CellGenomeDescription::default().with_cell_function(CellFunctionGenome::Constructor(
            ConstructorGenomeDescription::default().with_genome(nested),
        )),
    ]
}

#[test]
fn test_three_cell_genome_with_nested_sensor() {
    let params = SimulationParameters::default();
    let bytes = genome::encode(&three_cell_genome()).expect("encode");

    let decoded = genome::decode(&bytes, &params).expect("decode");
    assert_eq!(decoded.len(), 3);
    assert_eq!(decoded[0].color, 1);
    assert_eq!(decoded[1].color, 4);
    assert_eq!(
        decoded[2].cell_function_type(),
        Some(CellFunctionType::Constructor)
    );
    assert_eq!(decoded[2].is_make_genome_copy(), Some(false));

    let nested = genome::decode_sub_genome(&decoded[2], &params)
        .expect("decode nested")
        .expect("constructor carries a nested genome");
    assert_eq!(nested.len(), 1);
    assert_eq!(nested[0].color, 5);
    assert_eq!(nested[0].cell_function_type(), Some(CellFunctionType::Sensor));
    assert!(genome::validate(&bytes, &params).is_ok());
}

#[test]
fn test_cursor_mapping_on_three_cell_genome() {
    let bytes = genome::encode(&three_cell_genome()).expect("encode");
    assert_eq!(genome::cell_count(&bytes).expect("count"), 3);

    let offsets: Vec<usize> = (0..3)
        .map(|k| genome::cell_index_to_byte_index(&bytes, k).expect("offset"))
        .collect();
    // header 13, neuron payload 288, transmitter payload 1
    assert_eq!(offsets, vec![0, 301, 315]);
    for (k, offset) in offsets.iter().enumerate() {
        assert_eq!(genome::byte_index_to_cell_index(&bytes, *offset).expect("index"), k);
    }
    assert_eq!(
        genome::cell_index_to_byte_index(&bytes, 3).expect("offset"),
        bytes.len()
    );
    assert_eq!(
        genome::byte_index_to_cell_index(&bytes, bytes.len()).expect("index"),
        3
    );
}

#[test]
fn test_decode_never_returns_partial_genomes() {
    let params = SimulationParameters::default();
    let bytes = genome::encode(&three_cell_genome()).expect("encode");
    for cut in [1, 13, 100, 305, 314, bytes.len() - 1] {
        let err = genome::decode(&bytes[..cut], &params).expect_err("truncated buffer");
        assert!(
            matches!(err, DescriptionError::MalformedGenome { .. }),
            "cut at {cut} gave {err:?}"
        );
    }
}

#[test]
fn test_injector_make_copy_roundtrip() {
    let params = SimulationParameters::default();
    let genome = vec![
        CellGenomeDescription::default().with_cell_function(CellFunctionGenome::Injector(
            InjectorGenomeDescription {
                counter: 7,
                current_genome_pos: 3,
                ..Default::default()
            }
            .with_make_genome_copy(),
        )),
        sensor_cell(2),
    ];
    let bytes = genome::encode(&genome).expect("encode");
    let decoded = genome::decode(&bytes, &params).expect("decode");
    assert_eq!(decoded, genome);
    assert!(matches!(
        decoded[0].cell_function.as_ref().and_then(CellFunctionGenome::sub_genome),
        Some(SubGenome::MakeCopy)
    ));
    assert_eq!(genome::decode_sub_genome(&decoded[0], &params).expect("decode"), None);
}

#[test]
fn test_decode_clamps_to_parameters() {
    let mut params = SimulationParameters::default();
    params.cell.max_bonds = 3;
    params.cell.max_execution_order_numbers = 4;
    let genome = vec![CellGenomeDescription::default()
        .with_max_connections(6)
        .with_execution_order_number(5)];

    let bytes = genome::encode(&genome).expect("encode");
    let decoded = genome::decode(&bytes, &params).expect("decode");
    assert_eq!(decoded[0].max_connections, 3);
    assert_eq!(decoded[0].execution_order_number, 1);
}

#[test]
fn test_parameters_from_file() {
    let dir = std::env::temp_dir().join("protoplast_genome_codec_params");
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("params.toml");
    std::fs::write(&path, "[genome]\nmax_nesting_depth = 1\n").expect("write params");

    let params = protoplast_lib::load_parameters(&path).expect("load params");
    assert_eq!(params.genome.max_nesting_depth, 1);

    let missing = protoplast_lib::load_parameters(&dir.join("missing.toml")).expect("defaults");
    assert_eq!(missing, SimulationParameters::default());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_validate_rejects_deep_nesting() {
    let mut params = SimulationParameters::default();
    params.genome.max_nesting_depth = 1;

    let mut bytes = genome::encode(&vec![sensor_cell(0)]).expect("encode");
    for _ in 0..2 {
        bytes = genome::encode(&vec![CellGenomeDescription::default().with_cell_function(
            CellFunctionGenome::Constructor(ConstructorGenomeDescription::default().with_genome(bytes)),
        )])
        .expect("encode level");
    }
    assert!(genome::decode(&bytes, &params).is_ok());
    let err = genome::validate(&bytes, &params).expect_err("too deep");
    assert!(err.is_malformed_genome());
}
