//! Property-based tests for wire conversions.

use openhotas_pad::prelude::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn axis_conversion_is_monotone(a in -1.0f32..1.0, b in -1.0f32..1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(axis_to_wire(lo) <= axis_to_wire(hi));
    }

    #[test]
    fn axis_conversion_stays_in_range(v in -10.0f32..10.0) {
        let w = axis_to_wire(v);
        prop_assert!((-32768..=32767).contains(&i32::from(w)));
    }

    #[test]
    fn trigger_conversion_stays_in_range(v in -2.0f32..2.0) {
        let _ = trigger_to_wire(v); // u8 by construction; must not panic
    }

    #[test]
    fn wire_bytes_roundtrip_buttons(buttons in any::<u16>()) {
        let report = PadReport { buttons, ..PadReport::neutral() };
        let bytes = report.to_wire_bytes();
        prop_assert_eq!(u16::from_le_bytes([bytes[0], bytes[1]]), buttons);
    }
}
