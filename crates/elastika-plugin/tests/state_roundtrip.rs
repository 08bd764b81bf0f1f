//! State save/restore roundtrip tests.
//!
//! Verifies that parameter state survives JSON serialization into a fresh
//! instance, including edge values, partial blobs and hostile input.

mod common;

use common::Clipper;
use elastika_core::EngineParam;
use elastika_plugin::{ElastikaProcessor, ElastikaShared, load_state, save_state};
use proptest::prelude::*;

fn assert_same_params(a: &ElastikaShared, b: &ElastikaShared) {
    for param in EngineParam::ALL {
        assert_eq!(a.get(param), b.get(param), "{param} roundtrip mismatch");
    }
}

#[test]
fn defaults_roundtrip() {
    let shared = ElastikaShared::new();
    let json = save_state(shared.params()).unwrap();

    let fresh = ElastikaShared::new();
    assert_eq!(load_state(fresh.params(), &json), 9);
    assert_same_params(&shared, &fresh);
}

#[test]
fn extremes_roundtrip() {
    for extreme in [0.0, 1.0] {
        let shared = ElastikaShared::new();
        for param in EngineParam::ALL {
            shared.set(param, extreme);
        }
        let json = save_state(shared.params()).unwrap();

        let fresh = ElastikaShared::new();
        load_state(fresh.params(), &json);
        assert_same_params(&shared, &fresh);
    }
}

#[test]
fn non_default_values_roundtrip() {
    let shared = ElastikaShared::new();
    for (i, param) in EngineParam::ALL.into_iter().enumerate() {
        shared.set(param, (i as f32 + 1.0) / 11.0);
    }
    let json = save_state(shared.params()).unwrap();

    let fresh = ElastikaShared::new();
    load_state(fresh.params(), &json);
    assert_same_params(&shared, &fresh);
}

#[test]
fn processor_roundtrip_into_fresh_instance() {
    let mut saved = ElastikaProcessor::new(Clipper::default());
    saved.prepare_to_play(48000.0, 128);
    saved.shared().set(EngineParam::Stiffness, 0.125);
    saved.shared().set(EngineParam::OutputTilt, 0.875);
    let blob = saved.save_state().unwrap();

    let restored = ElastikaProcessor::new(Clipper::default());
    assert_eq!(restored.load_state(&blob), 9);
    assert_same_params(&saved.shared(), &restored.shared());
}

#[test]
fn missing_keys_keep_current_values() {
    let shared = ElastikaShared::new();
    shared.set(EngineParam::Mass, 0.3);
    let applied = load_state(shared.params(), br#"{"gain": 0.2}"#);
    assert_eq!(applied, 1);
    assert_eq!(shared.get(EngineParam::Gain), 0.2);
    assert_eq!(shared.get(EngineParam::Mass), 0.3);
}

#[test]
fn unknown_ids_are_ignored() {
    let shared = ElastikaShared::new();
    let applied = load_state(
        shared.params(),
        br#"{"200": 0.1, "Friction": 0.1, "InputTilt": 0.1, "inputTilt": 0.9}"#,
    );
    assert_eq!(applied, 1);
    assert_eq!(shared.get(EngineParam::Friction), 0.5);
    assert_eq!(shared.get(EngineParam::InputTilt), 0.9);
}

#[test]
fn host_keyed_tilts_are_restored() {
    let shared = ElastikaShared::new();
    let applied = load_state(
        shared.params(),
        br#"{"inputTilt": 0.2, "outputTilt": 0.8, "curl": 0.4}"#,
    );
    assert_eq!(applied, 3);
    assert_eq!(shared.get(EngineParam::InputTilt), 0.2);
    assert_eq!(shared.get(EngineParam::OutputTilt), 0.8);
}

#[test]
fn snake_case_tilts_are_accepted() {
    let shared = ElastikaShared::new();
    let applied = load_state(shared.params(), br#"{"input_tilt": 0.1, "output_tilt": 0.7}"#);
    assert_eq!(applied, 2);
    assert_eq!(shared.get(EngineParam::InputTilt), 0.1);
    assert_eq!(shared.get(EngineParam::OutputTilt), 0.7);
}

#[test]
fn saved_state_uses_host_ids() {
    let shared = ElastikaShared::new();
    let json = save_state(shared.params()).unwrap();
    let text = String::from_utf8(json).unwrap();
    assert!(text.contains("\"inputTilt\""), "{text}");
    assert!(text.contains("\"outputTilt\""), "{text}");
    assert!(!text.contains("input_tilt"), "{text}");
}

#[test]
fn garbage_blob_is_a_no_op() {
    let shared = ElastikaShared::new();
    shared.set(EngineParam::Curl, 0.6);
    let before = shared.params().snapshot();

    for blob in [&b"\x00\xff\x13"[..], b"{\"drive\": ", b"[0.1, 0.2]", b"true"] {
        assert_eq!(load_state(shared.params(), blob), 0);
    }
    assert_eq!(shared.params().snapshot(), before);
}

#[test]
fn loaded_state_reaches_cell_within_one_block() {
    let mut p = ElastikaProcessor::new(Clipper::default());
    p.prepare_to_play(48000.0, 64);
    p.load_state(br#"{"drive": 0.25}"#);

    let input = vec![0.1f32; 64];
    let mut l = vec![0.0f32; 64];
    let mut r = vec![0.0f32; 64];
    p.process_block(&[&input[..]], &mut [&mut l[..], &mut r[..]]);

    assert_eq!(p.dispatcher().cell(EngineParam::Drive).value(), 0.25);
}

#[test]
fn loaded_state_reaches_engine_on_next_block() {
    let mut p = ElastikaProcessor::new(Clipper::default());
    p.prepare_to_play(48000.0, 64);
    p.load_state(br#"{"drive": 0.25}"#);

    let input = vec![0.1f32; 64];
    let mut l = vec![0.0f32; 64];
    let mut r = vec![0.0f32; 64];
    p.process_block(&[&input[..]], &mut [&mut l[..], &mut r[..]]);
    p.process_block(&[&input[..]], &mut [&mut l[..], &mut r[..]]);

    assert_eq!(p.engine().last[EngineParam::Drive.index()], Some(0.25));
    assert_eq!(p.engine().drive, 0.25);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any in-range parameter set survives save then load bit-exactly.
    #[test]
    fn arbitrary_states_roundtrip(values in prop::array::uniform9(0.0f32..=1.0f32)) {
        let shared = ElastikaShared::new();
        for (param, v) in EngineParam::ALL.into_iter().zip(values) {
            shared.set(param, v);
        }
        let json = save_state(shared.params()).unwrap();

        let fresh = ElastikaShared::new();
        prop_assert_eq!(load_state(fresh.params(), &json), 9);
        prop_assert_eq!(fresh.params().snapshot(), shared.params().snapshot());
    }
}
