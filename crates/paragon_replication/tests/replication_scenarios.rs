//! # Replication Scenario Integration Test
//!
//! Drives every record codec through the public API with seeded random
//! inputs:
//!
//! 1. **Locomotion**: flag combinations in absolute and relative mode
//! 2. **Paths**: long delta-encoded paths, on and off the quantization grid
//! 3. **Power slots**: sequences with heavy previous-record inheritance
//! 4. **Missions**: batches with a shared bool tail
//! 5. **Corrupted input**: mutated frames never panic a decoder
//!
//! Run with: cargo test --package paragon_replication --test replication_scenarios

use paragon_replication::locomotion::{read_path, write_path};
use paragon_replication::wire::step;
use paragon_replication::{
    decode_missions, decode_power_slots, encode_missions, encode_power_slots, CodecConfig,
    EntityId, InteractionTag, LocomotionCodec, LocomotionFlags, LocomotionMessageFlags,
    LocomotionState, LocomotorMethod, Mission, MissionObjective, MissionObjectiveState,
    MissionState, NaviSide, PathNode, PowerIndexProperties, PowerSlotFlags, PowerSlotRecord,
    PrototypeClass, PrototypeId, PrototypeTable, TransferStatus, Vec3, WireReader, WireWriter,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEED: u64 = 0x5EED_2024;

const PROTOTYPES: &str = r#"
    [[prototype]]
    id = 7152570
    name = "Powers/IronMan/TravelPower.prototype"
    class = "power"

    [[prototype]]
    id = 9902100
    name = "Powers/IronMan/Flight.prototype"
    class = "power"

    [[prototype]]
    id = 11234000
    name = "Powers/IronMan/RepulsorBlast.prototype"
    class = "power"

    [[prototype]]
    id = 900
    name = "Missions/Tutorial/Intro.prototype"
    class = "mission"

    [[prototype]]
    id = 12000
    name = "Missions/Daily/Patrol.prototype"
    class = "mission"
"#;

const POWER_IDS: [u64; 3] = [7_152_570, 9_902_100, 11_234_000];
const MISSION_IDS: [u64; 2] = [900, 12_000];

/// Optional locomotion fields, each a presence bit.
const FIELD_BITS: [LocomotionMessageFlags; 7] = [
    LocomotionMessageFlags::HAS_LOCOMOTION_FLAGS,
    LocomotionMessageFlags::HAS_METHOD,
    LocomotionMessageFlags::HAS_MOVE_SPEED,
    LocomotionMessageFlags::HAS_HEIGHT,
    LocomotionMessageFlags::HAS_FOLLOW_ENTITY_ID,
    LocomotionMessageFlags::HAS_FOLLOW_ENTITY_RANGE,
    LocomotionMessageFlags::UPDATE_PATH_NODES,
];

fn prototypes() -> PrototypeTable {
    PrototypeTable::from_toml_str(PROTOTYPES).unwrap()
}

/// A coordinate on the 1/8 grid, so quantization at 3 bits is exact.
fn grid_coord(rng: &mut StdRng) -> f32 {
    f32::from(rng.gen_range(-4000i16..4000)) / 8.0
}

fn random_node(rng: &mut StdRng) -> PathNode {
    let vertex = Vec3::new(grid_coord(rng), grid_coord(rng), grid_coord(rng));
    match rng.gen_range(0..3) {
        0 => PathNode::point(vertex),
        1 => PathNode::new(vertex, NaviSide::Left, f32::from(rng.gen_range(1u8..64))),
        _ => PathNode::new(vertex, NaviSide::Right, f32::from(rng.gen_range(1u8..64))),
    }
}

fn random_state(rng: &mut StdRng) -> LocomotionState {
    let node_count = rng.gen_range(0..12);
    LocomotionState {
        locomotion_flags: LocomotionFlags::from_bits_retain(rng.gen_range(1..0x1000)),
        method: LocomotorMethod(rng.gen_range(0..6)),
        base_move_speed: f32::from(rng.gen_range(1u16..2000)),
        height: rng.gen_range(-500..500),
        follow_entity_id: EntityId(rng.gen_range(1..u64::MAX)),
        follow_entity_range_start: f32::from(rng.gen_range(1u16..100)),
        follow_entity_range_end: f32::from(rng.gen_range(100u16..1000)),
        path_goal_node_index: rng.gen_range(0..12),
        path_nodes: (0..node_count).map(|_| random_node(rng)).collect(),
    }
}

fn sentinel_state() -> LocomotionState {
    LocomotionState {
        locomotion_flags: LocomotionFlags::IGNORES_WORLD_COLLISION,
        method: LocomotorMethod(0xBEEF),
        base_move_speed: -9999.0,
        height: i32::MIN,
        follow_entity_id: EntityId(u64::MAX),
        follow_entity_range_start: -1.0,
        follow_entity_range_end: -1.0,
        path_goal_node_index: -1,
        path_nodes: vec![PathNode::point(Vec3::new(-1.0, -1.0, -1.0))],
    }
}

fn random_field_bits(rng: &mut StdRng) -> LocomotionMessageFlags {
    FIELD_BITS
        .iter()
        .filter(|_| rng.gen_bool(0.5))
        .fold(LocomotionMessageFlags::empty(), |acc, bit| acc | *bit)
}

// ============================================================================
// LOCOMOTION
// ============================================================================

#[test]
fn locomotion_absent_fields_follow_mode() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let codec = LocomotionCodec::default();

    for _ in 0..500 {
        let state = random_state(&mut rng);
        let fields = random_field_bits(&mut rng);

        for relative in [false, true] {
            let flags = if relative {
                fields | LocomotionMessageFlags::RELATIVE_TO_PREVIOUS_STATE
            } else {
                fields
            };
            let mut writer = WireWriter::new();
            codec.encode(&mut writer, &state, flags);

            let mut decoded = sentinel_state();
            let mut reader = WireReader::new(writer.as_slice());
            codec.decode(&mut reader, &mut decoded, flags).unwrap();
            assert!(reader.is_exhausted());

            let baseline = if relative {
                sentinel_state()
            } else {
                LocomotionState::default()
            };
            let pick = |bit: LocomotionMessageFlags| flags.contains(bit);

            assert_eq!(
                decoded.method,
                if pick(LocomotionMessageFlags::HAS_METHOD) { state.method } else { baseline.method }
            );
            assert_eq!(
                decoded.height,
                if pick(LocomotionMessageFlags::HAS_HEIGHT) { state.height } else { baseline.height }
            );
            assert_eq!(
                decoded.base_move_speed,
                if pick(LocomotionMessageFlags::HAS_MOVE_SPEED) {
                    state.base_move_speed
                } else {
                    baseline.base_move_speed
                }
            );
            assert_eq!(
                decoded.follow_entity_id,
                if pick(LocomotionMessageFlags::HAS_FOLLOW_ENTITY_ID) {
                    state.follow_entity_id
                } else {
                    baseline.follow_entity_id
                }
            );
            assert_eq!(
                decoded.follow_entity_range_end,
                if pick(LocomotionMessageFlags::HAS_FOLLOW_ENTITY_RANGE) {
                    state.follow_entity_range_end
                } else {
                    baseline.follow_entity_range_end
                }
            );
            assert_eq!(
                decoded.path_nodes,
                if pick(LocomotionMessageFlags::UPDATE_PATH_NODES) {
                    state.path_nodes.clone()
                } else {
                    baseline.path_nodes.clone()
                }
            );
        }
    }
}

#[test]
fn locomotion_delta_stream_tracks_sender() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 1);
    let codec = LocomotionCodec::default();

    let mut sender_previous: Option<LocomotionState> = None;
    let mut receiver = LocomotionState::default();

    for _ in 0..200 {
        let mut current = sender_previous.clone().unwrap_or_default();
        // Mutate a few fields per tick
        if rng.gen_bool(0.3) {
            current.method = LocomotorMethod(rng.gen_range(0..6));
        }
        if rng.gen_bool(0.3) {
            current.base_move_speed = f32::from(rng.gen_range(0u16..2000));
        }
        if rng.gen_bool(0.2) {
            current.height = rng.gen_range(-50..50);
        }
        if rng.gen_bool(0.4) {
            let count = rng.gen_range(0..6);
            current.path_nodes = (0..count).map(|_| random_node(&mut rng)).collect();
            current.path_goal_node_index = count.min(1);
        }

        let flags = current.field_flags(sender_previous.as_ref(), true, codec.config());
        let mut writer = WireWriter::new();
        codec.encode_update(&mut writer, &current, flags);

        let mut reader = WireReader::new(writer.as_slice());
        let read_flags = codec.decode_update(&mut reader, &mut receiver).unwrap();
        assert_eq!(read_flags, flags);
        assert!(reader.is_exhausted());
        assert_eq!(receiver, current);

        sender_previous = Some(current);
    }
}

#[test]
fn locomotion_flying_scenario_out_of_band_and_inline() {
    let codec = LocomotionCodec::default();
    let state = LocomotionState {
        method: LocomotorMethod::FLYING,
        base_move_speed: 12.5,
        path_nodes: vec![
            PathNode::point(Vec3::new(3.0, 0.0, 0.0)),
            PathNode::point(Vec3::new(3.0, 4.0, 0.0)),
        ],
        ..LocomotionState::default()
    };
    let flags = LocomotionMessageFlags::HAS_METHOD
        | LocomotionMessageFlags::HAS_MOVE_SPEED
        | LocomotionMessageFlags::UPDATE_PATH_NODES;
    let body = [0x02, 0x1A, 0x00, 0x02, 0x30, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00];

    let mut writer = WireWriter::new();
    codec.encode(&mut writer, &state, flags);
    assert_eq!(writer.as_slice(), &body);

    let mut inline = WireWriter::new();
    codec.encode_update(&mut inline, &state, flags);
    assert_eq!(&inline.as_slice()[..2], &[0xB0, 0x01]);
    assert_eq!(&inline.as_slice()[2..], &body);

    let mut decoded = LocomotionState::default();
    codec
        .decode_update(&mut WireReader::new(inline.as_slice()), &mut decoded)
        .unwrap();
    assert_eq!(decoded.method, LocomotorMethod::FLYING);
    assert!((decoded.base_move_speed - 12.5).abs() <= 1.0);
    assert_eq!(decoded.path_nodes, state.path_nodes);
}

// ============================================================================
// PATHS
// ============================================================================

#[test]
fn path_round_trip_on_grid_is_exact() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 2);

    for _ in 0..100 {
        let nodes: Vec<PathNode> = (0..rng.gen_range(0..200)).map(|_| random_node(&mut rng)).collect();
        let goal = rng.gen_range(0..200);

        let mut writer = WireWriter::new();
        write_path(&mut writer, goal, &nodes, 3);

        let mut reader = WireReader::new(writer.as_slice());
        let mut decoded = Vec::new();
        let mut status = TransferStatus::new();
        let decoded_goal = read_path(&mut reader, 3, 1024, &mut decoded, &mut status);

        assert!(status.finish().is_ok());
        assert_eq!(decoded_goal, goal);
        assert_eq!(decoded, nodes);
    }
}

#[test]
fn path_off_grid_stays_within_bound() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 3);
    let nodes: Vec<PathNode> = (0..64)
        .map(|_| {
            PathNode::point(Vec3::new(
                rng.gen_range(-500.0..500.0),
                rng.gen_range(-500.0..500.0),
                rng.gen_range(-20.0..20.0),
            ))
        })
        .collect();

    let mut writer = WireWriter::new();
    write_path(&mut writer, 0, &nodes, 3);

    let mut reader = WireReader::new(writer.as_slice());
    let mut decoded = Vec::new();
    let mut status = TransferStatus::new();
    read_path(&mut reader, 3, 1024, &mut decoded, &mut status);
    assert!(status.finish().is_ok());

    for (i, (sent, received)) in nodes.iter().zip(&decoded).enumerate() {
        assert!(
            sent.vertex.max_component_delta(received.vertex) <= step(3),
            "node {i}: {} vs {}",
            sent.vertex,
            received.vertex
        );
    }
}

// ============================================================================
// POWER SLOTS
// ============================================================================

#[test]
fn power_slot_sequences_round_trip() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 4);
    let table = prototypes();

    for _ in 0..200 {
        let mut records: Vec<PowerSlotRecord> = Vec::new();
        for _ in 0..rng.gen_range(0..24) {
            let props = PowerIndexProperties {
                power_rank: rng.gen_range(0..3),
                character_level: rng.gen_range(1..4),
                combat_level: rng.gen_range(1..4),
                item_level: rng.gen_range(1..3),
                item_variation: [1.0, 0.5, 1.25][rng.gen_range(0..3)],
            };
            let record = PowerSlotRecord::new(
                PrototypeId(POWER_IDS[rng.gen_range(0..POWER_IDS.len())]),
                PowerSlotFlags::empty(),
                props,
                rng.gen_range(1..4),
            )
            .with_derived_flags(records.last());
            records.push(record);
        }

        let mut writer = WireWriter::new();
        encode_power_slots(&mut writer, &records, &table).unwrap();

        let mut reader = WireReader::new(writer.as_slice());
        let decoded = decode_power_slots(&mut reader, &table).unwrap();
        assert!(reader.is_exhausted());
        assert_eq!(decoded, records);
    }
}

#[test]
fn power_slot_inheritance_saves_bytes() {
    let table = prototypes();
    let levels = PowerIndexProperties {
        power_rank: 7,
        character_level: 60,
        combat_level: 63,
        ..PowerIndexProperties::default()
    };

    let mut inherited: Vec<PowerSlotRecord> = Vec::new();
    let mut explicit = Vec::new();
    for id in POWER_IDS {
        let record = PowerSlotRecord::new(PrototypeId(id), PowerSlotFlags::empty(), levels, 1);
        let chained = record.with_derived_flags(inherited.last());
        inherited.push(chained);
        explicit.push(record.with_derived_flags(None));
    }

    let mut small = WireWriter::new();
    encode_power_slots(&mut small, &inherited, &table).unwrap();
    let mut large = WireWriter::new();
    encode_power_slots(&mut large, &explicit, &table).unwrap();

    // Two records skip both levels
    assert_eq!(large.len() - small.len(), 4);
    assert_eq!(
        decode_power_slots(&mut WireReader::new(small.as_slice()), &table)
            .unwrap()
            .iter()
            .map(|r| r.index_props)
            .collect::<Vec<_>>(),
        vec![levels; 3]
    );
}

// ============================================================================
// MISSIONS
// ============================================================================

fn random_mission(rng: &mut StdRng) -> Mission {
    let objectives = (0..rng.gen_range(0..4u8))
        .map(|index| MissionObjective {
            objective_index: index,
            state: [
                MissionObjectiveState::Available,
                MissionObjectiveState::Active,
                MissionObjectiveState::Completed,
            ][rng.gen_range(0..3)],
            time_expire_current_state: rng.gen(),
            interaction_tags: (0..rng.gen_range(0..3))
                .map(|_| InteractionTag {
                    entity_id: EntityId(rng.gen()),
                    region_id: rng.gen_range(0..100),
                    timestamp: rng.gen(),
                })
                .collect(),
            current_count: rng.gen_range(0..10),
            required_count: 10,
            fail_current_count: 0,
            fail_required_count: rng.gen_range(0..2),
        })
        .collect();

    Mission {
        state: [MissionState::Inactive, MissionState::Active, MissionState::Failed][rng.gen_range(0..3)],
        time_expire_current_state: rng.gen(),
        prototype_id: PrototypeId(MISSION_IDS[rng.gen_range(0..MISSION_IDS.len())]),
        random: rng.gen(),
        objectives,
        participants: (0..rng.gen_range(0..5)).map(|_| EntityId(rng.gen())).collect(),
        suspended: rng.gen(),
    }
}

#[test]
fn mission_batches_round_trip() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 5);
    let table = prototypes();

    for _ in 0..100 {
        let missions: Vec<Mission> = (0..rng.gen_range(0..20)).map(|_| random_mission(&mut rng)).collect();

        let mut writer = WireWriter::new();
        encode_missions(&mut writer, &missions, &table).unwrap();

        let mut reader = WireReader::new(writer.as_slice());
        let decoded = decode_missions(&mut reader, &table).unwrap();
        assert!(reader.is_exhausted());
        assert_eq!(decoded, missions);
    }
}

#[test]
fn mission_dump_names_prototype() {
    let table = prototypes();
    let mission = Mission::started(PrototypeId(12_000), 3);
    assert!(mission.dump(&table).contains("Missions/Daily/Patrol.prototype"));
    assert_eq!(
        paragon_replication::PrototypeLookup::enum_value(&table, PrototypeClass::Mission, PrototypeId(12_000)),
        Some(2)
    );
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn config_file_changes_path_precision() {
    let path = std::env::temp_dir().join(format!("paragon_codec_{}.toml", std::process::id()));
    std::fs::write(&path, "[locomotion]\npath_vertex_precision = 0\nmax_path_nodes = 8\n").unwrap();
    let config = CodecConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let codec = LocomotionCodec::new(config.locomotion).unwrap();
    let state = LocomotionState {
        path_nodes: vec![PathNode::point(Vec3::new(2.4, 0.6, 0.0))],
        ..LocomotionState::default()
    };
    let flags = LocomotionMessageFlags::UPDATE_PATH_NODES;

    let mut writer = WireWriter::new();
    codec.encode(&mut writer, &state, flags);
    let mut decoded = LocomotionState::default();
    codec
        .decode(&mut WireReader::new(writer.as_slice()), &mut decoded, flags)
        .unwrap();
    assert_eq!(decoded.path_nodes[0].vertex, Vec3::new(2.0, 1.0, 0.0));

    // A wire-default decoder reads the same bytes at a different scale
    let mut misread = LocomotionState::default();
    LocomotionCodec::default()
        .decode(&mut WireReader::new(writer.as_slice()), &mut misread, flags)
        .unwrap();
    assert_eq!(misread.path_nodes[0].vertex, Vec3::new(0.25, 0.125, 0.0));
}

// ============================================================================
// CORRUPTED INPUT
// ============================================================================

fn mutate_frame(rng: &mut StdRng, frame: &mut Vec<u8>) {
    if frame.is_empty() {
        return;
    }
    match rng.gen_range(0..3) {
        0 => {
            let index = rng.gen_range(0..frame.len());
            frame[index] ^= 1 << rng.gen_range(0..8);
        }
        1 => {
            let len = rng.gen_range(0..frame.len());
            frame.truncate(len);
        }
        _ => {
            let index = rng.gen_range(0..frame.len());
            frame[index] = 0xFF;
        }
    }
}

#[test]
fn decoders_never_panic_on_mutated_frames() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 6);
    let table = prototypes();
    let codec = LocomotionCodec::default();

    for _ in 0..512 {
        let state = random_state(&mut rng);
        let flags = state.field_flags(None, true, codec.config());
        let mut writer = WireWriter::new();
        codec.encode_update(&mut writer, &state, flags);
        let mut frame = writer.into_bytes();
        mutate_frame(&mut rng, &mut frame);

        let mut decoded = LocomotionState::default();
        let _ = codec.decode_update(&mut WireReader::new(&frame), &mut decoded);

        let missions: Vec<Mission> = (0..rng.gen_range(1..4)).map(|_| random_mission(&mut rng)).collect();
        let mut writer = WireWriter::new();
        encode_missions(&mut writer, &missions, &table).unwrap();
        let mut frame = writer.into_bytes();
        mutate_frame(&mut rng, &mut frame);
        let _ = decode_missions(&mut WireReader::new(&frame), &table);
    }
}
