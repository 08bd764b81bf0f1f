//! The engine capability interface and its parameter set.
//!
//! The physics engine behind Elastika is opaque to the control plane. All the
//! core needs from it is one setter per [`EngineParam`] and a per-sample
//! stereo transform. Any backend implementing [`Engine`] can be dropped in
//! without affecting smoothing, dispatch or telemetry.
//!
//! # Example
//!
//! ```rust
//! use elastika_core::{Engine, EngineParam};
//!
//! #[derive(Default)]
//! struct Attenuator {
//!     gain: f32,
//! }
//!
//! impl Engine for Attenuator {
//!     fn set_friction(&mut self, _value: f32) {}
//!     fn set_span(&mut self, _value: f32) {}
//!     fn set_stiffness(&mut self, _value: f32) {}
//!     fn set_curl(&mut self, _value: f32) {}
//!     fn set_mass(&mut self, _value: f32) {}
//!     fn set_drive(&mut self, _value: f32) {}
//!     fn set_gain(&mut self, value: f32) {
//!         self.gain = value;
//!     }
//!     fn set_input_tilt(&mut self, _value: f32) {}
//!     fn set_output_tilt(&mut self, _value: f32) {}
//!
//!     fn process(&mut self, _sample_rate: f32, left: f32, right: f32) -> (f32, f32) {
//!         (left * self.gain, right * self.gain)
//!     }
//! }
//!
//! let mut engine = Attenuator::default();
//! engine.set_param(EngineParam::Gain, 0.5);
//! assert_eq!(engine.process(48000.0, 1.0, -1.0), (0.5, -0.5));
//! ```

use core::fmt;

/// Number of parameters in the engine parameter set.
pub const PARAM_COUNT: usize = 9;

/// One of the named physical quantities the engine exposes.
///
/// The set is fixed: every variant is backed by exactly one
/// [`ParamCell`](crate::ParamCell) and one host-parameter slot for the
/// lifetime of the processor. Variant order is the host-facing parameter
/// order and doubles as the slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EngineParam {
    /// Damping of the spring mesh.
    Friction,
    /// Rest length between mesh balls.
    Span,
    /// Spring constant.
    Stiffness,
    /// Magnetic curl applied to moving balls.
    Curl,
    /// Inertia of the driven balls.
    Mass,
    /// Input drive.
    Drive,
    /// Output gain.
    Gain,
    /// Stereo balance of the input injection points.
    InputTilt,
    /// Stereo balance of the output pickup points.
    OutputTilt,
}

impl EngineParam {
    /// All parameters in slot order.
    pub const ALL: [EngineParam; PARAM_COUNT] = [
        EngineParam::Friction,
        EngineParam::Span,
        EngineParam::Stiffness,
        EngineParam::Curl,
        EngineParam::Mass,
        EngineParam::Drive,
        EngineParam::Gain,
        EngineParam::InputTilt,
        EngineParam::OutputTilt,
    ];

    /// Slot index of this parameter (0..[`PARAM_COUNT`]).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parameter at the given slot index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stable identifier used for persistence and telemetry lookup.
    pub const fn id(self) -> &'static str {
        match self {
            EngineParam::Friction => "friction",
            EngineParam::Span => "span",
            EngineParam::Stiffness => "stiffness",
            EngineParam::Curl => "curl",
            EngineParam::Mass => "mass",
            EngineParam::Drive => "drive",
            EngineParam::Gain => "gain",
            EngineParam::InputTilt => "inputTilt",
            EngineParam::OutputTilt => "outputTilt",
        }
    }

    /// Human-readable name shown by hosts.
    pub const fn name(self) -> &'static str {
        match self {
            EngineParam::Friction => "Friction",
            EngineParam::Span => "Span",
            EngineParam::Stiffness => "Stiffness",
            EngineParam::Curl => "Curl",
            EngineParam::Mass => "Mass",
            EngineParam::Drive => "Drive",
            EngineParam::Gain => "Gain",
            EngineParam::InputTilt => "InputTilt",
            EngineParam::OutputTilt => "OutputTilt",
        }
    }

    /// Normalized default value.
    pub const fn default_value(self) -> f32 {
        match self {
            EngineParam::Friction
            | EngineParam::Span
            | EngineParam::Stiffness
            | EngineParam::InputTilt
            | EngineParam::OutputTilt => 0.5,
            EngineParam::Curl | EngineParam::Mass => 0.0,
            EngineParam::Drive | EngineParam::Gain => 1.0,
        }
    }

    /// Look up a parameter by its stable id.
    ///
    /// The snake_case spellings (`input_tilt`, `output_tilt`) are accepted as
    /// aliases of the tilt ids.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "input_tilt" => Some(EngineParam::InputTilt),
            "output_tilt" => Some(EngineParam::OutputTilt),
            _ => Self::ALL.iter().copied().find(|p| p.id() == id),
        }
    }
}

impl fmt::Display for EngineParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability interface of the synthesis/physics engine.
///
/// Setters take normalized values (0..=1). The core never clamps or checks
/// what it pushes; range handling and non-finite protection belong to the
/// engine.
///
/// All methods run on the audio thread and must not block or allocate.
pub trait Engine {
    /// Set friction.
    fn set_friction(&mut self, value: f32);
    /// Set span.
    fn set_span(&mut self, value: f32);
    /// Set stiffness.
    fn set_stiffness(&mut self, value: f32);
    /// Set curl.
    fn set_curl(&mut self, value: f32);
    /// Set mass.
    fn set_mass(&mut self, value: f32);
    /// Set drive.
    fn set_drive(&mut self, value: f32);
    /// Set gain.
    fn set_gain(&mut self, value: f32);
    /// Set input tilt.
    fn set_input_tilt(&mut self, value: f32);
    /// Set output tilt.
    fn set_output_tilt(&mut self, value: f32);

    /// Transform one stereo input sample into one stereo output sample.
    fn process(&mut self, sample_rate: f32, left: f32, right: f32) -> (f32, f32);

    /// Route a value to the setter for `param`.
    #[inline]
    fn set_param(&mut self, param: EngineParam, value: f32) {
        match param {
            EngineParam::Friction => self.set_friction(value),
            EngineParam::Span => self.set_span(value),
            EngineParam::Stiffness => self.set_stiffness(value),
            EngineParam::Curl => self.set_curl(value),
            EngineParam::Mass => self.set_mass(value),
            EngineParam::Drive => self.set_drive(value),
            EngineParam::Gain => self.set_gain(value),
            EngineParam::InputTilt => self.set_input_tilt(value),
            EngineParam::OutputTilt => self.set_output_tilt(value),
        }
    }
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn set_friction(&mut self, value: f32) {
        (**self).set_friction(value);
    }
    fn set_span(&mut self, value: f32) {
        (**self).set_span(value);
    }
    fn set_stiffness(&mut self, value: f32) {
        (**self).set_stiffness(value);
    }
    fn set_curl(&mut self, value: f32) {
        (**self).set_curl(value);
    }
    fn set_mass(&mut self, value: f32) {
        (**self).set_mass(value);
    }
    fn set_drive(&mut self, value: f32) {
        (**self).set_drive(value);
    }
    fn set_gain(&mut self, value: f32) {
        (**self).set_gain(value);
    }
    fn set_input_tilt(&mut self, value: f32) {
        (**self).set_input_tilt(value);
    }
    fn set_output_tilt(&mut self, value: f32) {
        (**self).set_output_tilt(value);
    }
    fn process(&mut self, sample_rate: f32, left: f32, right: f32) -> (f32, f32) {
        (**self).process(sample_rate, left, right)
    }
}
