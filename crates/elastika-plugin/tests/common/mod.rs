//! Test engine shared by the integration tests.

#![allow(dead_code)]

use elastika_core::{Engine, EngineParam, PARAM_COUNT};

/// Soft-clipping engine that records the last value pushed to each setter.
#[derive(Default)]
pub struct Clipper {
    pub last: [Option<f32>; PARAM_COUNT],
    pub drive: f32,
}

impl Clipper {
    fn record(&mut self, param: EngineParam, value: f32) {
        self.last[param.index()] = Some(value);
    }
}

impl Engine for Clipper {
    fn set_friction(&mut self, value: f32) {
        self.record(EngineParam::Friction, value);
    }
    fn set_span(&mut self, value: f32) {
        self.record(EngineParam::Span, value);
    }
    fn set_stiffness(&mut self, value: f32) {
        self.record(EngineParam::Stiffness, value);
    }
    fn set_curl(&mut self, value: f32) {
        self.record(EngineParam::Curl, value);
    }
    fn set_mass(&mut self, value: f32) {
        self.record(EngineParam::Mass, value);
    }
    fn set_drive(&mut self, value: f32) {
        self.drive = value;
        self.record(EngineParam::Drive, value);
    }
    fn set_gain(&mut self, value: f32) {
        self.record(EngineParam::Gain, value);
    }
    fn set_input_tilt(&mut self, value: f32) {
        self.record(EngineParam::InputTilt, value);
    }
    fn set_output_tilt(&mut self, value: f32) {
        self.record(EngineParam::OutputTilt, value);
    }
    fn process(&mut self, _sample_rate: f32, left: f32, right: f32) -> (f32, f32) {
        let k = 1.0 + 4.0 * self.drive;
        ((left * k).tanh(), (right * k).tanh())
    }
}
