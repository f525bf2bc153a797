//! Descriptor-driven report decoding and normalization.

use crate::bits::extract_bits;
use crate::descriptor::{SignalDescriptor, SignalMap};
use crate::key::{DeviceKind, SignalKey};

/// How a signal id normalizes into its canonical logical range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisClass {
    /// Full-range joystick axis: `raw / (2^bits - 1) * 2 - 1`, range [-1, 1].
    FullRange,
    /// 8-bit thumb/C-joystick axis: same normalization with max 255.
    ThumbAxis,
    /// Throttle rail: `raw / (2^bits - 1)`, range [0, 1].
    Rail,
    /// Any other analog field: raw integer as `f32`.
    RawAnalog,
    /// Digital or multi-bit discrete field: raw integer as `f32`.
    Digital,
}

fn classify(descriptor: &SignalDescriptor) -> AxisClass {
    match descriptor.key.id.as_str() {
        "joy_x" | "joy_y" | "joy_z" => AxisClass::FullRange,
        "c_joy_x" | "c_joy_y" | "thumb_joy_x" | "thumb_joy_y" => AxisClass::ThumbAxis,
        "left_throttle" | "right_throttle" => AxisClass::Rail,
        _ if descriptor.analog => AxisClass::RawAnalog,
        _ => AxisClass::Digital,
    }
}

/// Whether a signal id names a trigger rail subject to the per-trigger
/// digital-mode flags.
#[must_use]
pub fn is_trigger_id(id: &str) -> bool {
    matches!(id, "trigger" | "lt" | "rt" | "left_trigger" | "right_trigger")
}

/// One decoded signal value.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSignal {
    /// Identity of the signal.
    pub key: SignalKey,
    /// Normalized logical value.
    pub value: f32,
    /// Raw extracted integer, for re-encoding and diagnostics.
    pub raw: u64,
}

/// Applies a [`SignalMap`] to raw device reports.
///
/// Logical values use the UI-up-is-positive convention; the virtual-pad
/// Y-axis inversion happens in the publisher, never here.
#[derive(Debug, Clone)]
pub struct SignalDecoder {
    map: SignalMap,
}

impl SignalDecoder {
    /// Build a decoder over a validated map.
    #[must_use]
    pub fn new(map: SignalMap) -> Self {
        Self { map }
    }

    /// The underlying map.
    #[must_use]
    pub fn map(&self) -> &SignalMap {
        &self.map
    }

    /// Decode every signal of `device` present in `report`.
    ///
    /// A descriptor whose field extends past the end of the report is skipped
    /// for this report; decoding of the remaining signals continues.
    pub fn decode_device(&self, device: DeviceKind, report: &[u8], out: &mut Vec<DecodedSignal>) {
        for descriptor in self.map.for_device(device) {
            if report.len() < descriptor.required_report_len() {
                continue;
            }
            let raw = extract_bits(
                report,
                u32::from(descriptor.bit_start),
                u32::from(descriptor.bit_count),
            );
            out.push(DecodedSignal {
                key: descriptor.key.clone(),
                value: normalize(descriptor, raw),
                raw,
            });
        }
    }

    /// Convenience wrapper returning a fresh vector.
    #[must_use]
    pub fn decode_device_vec(&self, device: DeviceKind, report: &[u8]) -> Vec<DecodedSignal> {
        let mut out = Vec::new();
        self.decode_device(device, report, &mut out);
        out
    }
}

fn normalize(descriptor: &SignalDescriptor, raw: u64) -> f32 {
    match classify(descriptor) {
        AxisClass::FullRange => {
            let max = descriptor.max_raw() as f64;
            if max > 0.0 {
                (raw as f64 / max * 2.0 - 1.0) as f32
            } else {
                0.0
            }
        }
        AxisClass::ThumbAxis => (raw as f64 / 255.0 * 2.0 - 1.0) as f32,
        AxisClass::Rail => {
            let max = descriptor.max_raw() as f64;
            if max > 0.0 {
                (raw as f64 / max) as f32
            } else {
                0.0
            }
        }
        AxisClass::RawAnalog | AxisClass::Digital => raw as f32,
    }
}
