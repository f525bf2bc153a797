//! The virtual-gamepad wire report.

use openhotas_mapping::ButtonId;

/// Convert a logical axis value in [-1, 1] to the wire `i16`.
///
/// Positive values scale by 32767, negative by 32768, so both endpoints are
/// exactly representable. Input is clamped first.
#[inline]
#[must_use]
pub fn axis_to_wire(v: f32) -> i16 {
    let v = v.clamp(-1.0, 1.0);
    if v >= 0.0 {
        (v * 32767.0) as i16
    } else {
        (v * 32768.0) as i16
    }
}

/// Convert a logical trigger value in [0, 1] to the wire `u8` (rounded).
#[inline]
#[must_use]
pub fn trigger_to_wire(v: f32) -> u8 {
    let v = v.clamp(0.0, 1.0);
    (v * 255.0 + 0.5) as u8
}

/// Xbox-360-style report.
///
/// Button bit assignment (bits 10-11 reserved):
///
/// | bit | button |
/// |----:|--------|
/// | 0 | DPad up |
/// | 1 | DPad down |
/// | 2 | DPad left |
/// | 3 | DPad right |
/// | 4 | Start |
/// | 5 | Back |
/// | 6 | L3 |
/// | 7 | R3 |
/// | 8 | LB |
/// | 9 | RB |
/// | 12 | A |
/// | 13 | B |
/// | 14 | X |
/// | 15 | Y |
///
/// `ly`/`ry` are transmitted with inverted sign relative to logical values
/// (report up is negative); the publisher applies that inversion before
/// filling the report.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PadReport {
    /// Button mask.
    pub buttons: u16,
    /// Left trigger.
    pub lt: u8,
    /// Right trigger.
    pub rt: u8,
    /// Left stick X.
    pub lx: i16,
    /// Left stick Y (wire convention).
    pub ly: i16,
    /// Right stick X.
    pub rx: i16,
    /// Right stick Y (wire convention).
    pub ry: i16,
}

impl PadReport {
    /// The neutral report: everything centered and released.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            buttons: 0,
            lt: 0,
            rt: 0,
            lx: 0,
            ly: 0,
            rx: 0,
            ry: 0,
        }
    }

    /// Wire bit for a button.
    #[must_use]
    pub const fn button_bit(button: ButtonId) -> u16 {
        match button {
            ButtonId::DPadUp => 0,
            ButtonId::DPadDown => 1,
            ButtonId::DPadLeft => 2,
            ButtonId::DPadRight => 3,
            ButtonId::Start => 4,
            ButtonId::Back => 5,
            ButtonId::L3 => 6,
            ButtonId::R3 => 7,
            ButtonId::LB => 8,
            ButtonId::RB => 9,
            ButtonId::A => 12,
            ButtonId::B => 13,
            ButtonId::X => 14,
            ButtonId::Y => 15,
        }
    }

    /// Set or clear one button.
    pub fn set_button(&mut self, button: ButtonId, pressed: bool) {
        let mask = 1u16 << Self::button_bit(button);
        if pressed {
            self.buttons |= mask;
        } else {
            self.buttons &= !mask;
        }
    }

    /// Read one button.
    #[must_use]
    pub const fn button(&self, button: ButtonId) -> bool {
        (self.buttons >> Self::button_bit(button)) & 1 == 1
    }

    /// Serialize to the 12-byte little-endian wire form.
    #[must_use]
    pub fn to_wire_bytes(&self) -> [u8; 12] {
        let mut out = [0u8; 12];
        out[0..2].copy_from_slice(&self.buttons.to_le_bytes());
        out[2] = self.lt;
        out[3] = self.rt;
        out[4..6].copy_from_slice(&self.lx.to_le_bytes());
        out[6..8].copy_from_slice(&self.ly.to_le_bytes());
        out[8..10].copy_from_slice(&self.rx.to_le_bytes());
        out[10..12].copy_from_slice(&self.ry.to_le_bytes());
        out
    }
}
