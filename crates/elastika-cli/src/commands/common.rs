//! Shared CLI helpers used across multiple commands.

use elastika_core::{Engine, EngineParam};

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        ));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// A scheduled parameter change: `id=value` or `id=value@block`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assignment {
    /// Parameter to change.
    pub param: EngineParam,
    /// New normalized target.
    pub value: f32,
    /// Block index before which the change is applied.
    pub block: usize,
}

/// Parse an [`Assignment`] for clap's `value_parser`.
pub fn parse_assignment(s: &str) -> Result<Assignment, String> {
    let (id, rest) = parse_key_val(s)?;
    let param = EngineParam::from_id(&id).ok_or_else(|| {
        let known: Vec<&str> = EngineParam::ALL.iter().map(|p| p.id()).collect();
        format!("Unknown parameter '{}' (expected one of: {})", id, known.join(", "))
    })?;

    let (value, block) = match rest.split_once('@') {
        Some((value, block)) => (value, block),
        None => (rest.as_str(), "0"),
    };
    let value: f32 = value
        .parse()
        .map_err(|_| format!("Invalid value '{}' for '{}'", value, id))?;
    let block: usize = block
        .parse()
        .map_err(|_| format!("Invalid block index '{}' in '{}'", block, s))?;

    Ok(Assignment { param, value, block })
}

/// Stand-in engine for offline runs: drive-scaled soft clip followed by gain.
///
/// The control plane is engine-agnostic; this only gives the signal taps
/// something parameter-dependent to report.
#[derive(Debug, Clone)]
pub struct SoftClip {
    drive: f32,
    gain: f32,
}

impl Default for SoftClip {
    fn default() -> Self {
        Self {
            drive: EngineParam::Drive.default_value(),
            gain: EngineParam::Gain.default_value(),
        }
    }
}

impl Engine for SoftClip {
    fn set_friction(&mut self, _value: f32) {}
    fn set_span(&mut self, _value: f32) {}
    fn set_stiffness(&mut self, _value: f32) {}
    fn set_curl(&mut self, _value: f32) {}
    fn set_mass(&mut self, _value: f32) {}
    fn set_drive(&mut self, value: f32) {
        self.drive = value;
    }
    fn set_gain(&mut self, value: f32) {
        self.gain = value;
    }
    fn set_input_tilt(&mut self, _value: f32) {}
    fn set_output_tilt(&mut self, _value: f32) {}

    fn process(&mut self, _sample_rate: f32, left: f32, right: f32) -> (f32, f32) {
        let k = 1.0 + 9.0 * self.drive;
        let shape = |x: f32| (x * k).tanh() / k.tanh() * self.gain;
        (shape(left), shape(right))
    }
}
