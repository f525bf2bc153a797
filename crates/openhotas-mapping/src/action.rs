//! Mapping actions and their persisted string forms.

use crate::{MappingError, MappingResult};
use std::fmt;

/// Virtual-gamepad axis targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AxisId {
    /// Left stick X.
    LX,
    /// Left stick Y.
    LY,
    /// Right stick X.
    RX,
    /// Right stick Y.
    RY,
    /// Left trigger.
    LT,
    /// Right trigger.
    RT,
}

impl AxisId {
    /// All axes, in index order.
    pub const ALL: [Self; 6] = [Self::LX, Self::LY, Self::RX, Self::RY, Self::LT, Self::RT];

    /// Dense index for per-axis arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::LX => 0,
            Self::LY => 1,
            Self::RX => 2,
            Self::RY => 3,
            Self::LT => 4,
            Self::RT => 5,
        }
    }

    /// Whether this axis is a unipolar trigger rail.
    #[must_use]
    pub const fn is_trigger(self) -> bool {
        matches!(self, Self::LT | Self::RT)
    }

    /// Persisted token (the part after `x360:`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LX => "left_x",
            Self::LY => "left_y",
            Self::RX => "right_x",
            Self::RY => "right_y",
            Self::LT => "left_trigger",
            Self::RT => "right_trigger",
        }
    }

    fn from_token(s: &str) -> Option<Self> {
        Some(match s {
            "left_x" => Self::LX,
            "left_y" => Self::LY,
            "right_x" => Self::RX,
            "right_y" => Self::RY,
            "left_trigger" => Self::LT,
            "right_trigger" => Self::RT,
            _ => return None,
        })
    }
}

/// Virtual-gamepad button targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ButtonId {
    /// Face button A.
    A,
    /// Face button B.
    B,
    /// Face button X.
    X,
    /// Face button Y.
    Y,
    /// Left shoulder.
    LB,
    /// Right shoulder.
    RB,
    /// Start.
    Start,
    /// Back.
    Back,
    /// Left stick press.
    L3,
    /// Right stick press.
    R3,
    /// D-pad up.
    DPadUp,
    /// D-pad down.
    DPadDown,
    /// D-pad left.
    DPadLeft,
    /// D-pad right.
    DPadRight,
}

impl ButtonId {
    /// All buttons, in index order.
    pub const ALL: [Self; 14] = [
        Self::A,
        Self::B,
        Self::X,
        Self::Y,
        Self::LB,
        Self::RB,
        Self::Start,
        Self::Back,
        Self::L3,
        Self::R3,
        Self::DPadUp,
        Self::DPadDown,
        Self::DPadLeft,
        Self::DPadRight,
    ];

    /// Number of buttons.
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index for per-button arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::X => 2,
            Self::Y => 3,
            Self::LB => 4,
            Self::RB => 5,
            Self::Start => 6,
            Self::Back => 7,
            Self::L3 => 8,
            Self::R3 => 9,
            Self::DPadUp => 10,
            Self::DPadDown => 11,
            Self::DPadLeft => 12,
            Self::DPadRight => 13,
        }
    }

    /// Persisted token (the part after `x360:`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "button_a",
            Self::B => "button_b",
            Self::X => "button_x",
            Self::Y => "button_y",
            Self::LB => "left_shoulder",
            Self::RB => "right_shoulder",
            Self::Start => "start",
            Self::Back => "back",
            Self::L3 => "left_thumb",
            Self::R3 => "right_thumb",
            Self::DPadUp => "dpad_up",
            Self::DPadDown => "dpad_down",
            Self::DPadLeft => "dpad_left",
            Self::DPadRight => "dpad_right",
        }
    }

    fn from_token(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.as_str() == s)
    }
}

/// A keyboard key, identified by Win32-style virtual-key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VirtualKey(pub u32);

/// Named VK constants understood in profiles, beyond bare letters/digits.
const VK_NAMES: &[(&str, u32)] = &[
    ("VK_BACK", 0x08),
    ("VK_TAB", 0x09),
    ("VK_RETURN", 0x0D),
    ("VK_SHIFT", 0x10),
    ("VK_CONTROL", 0x11),
    ("VK_MENU", 0x12),
    ("VK_CAPITAL", 0x14),
    ("VK_ESCAPE", 0x1B),
    ("VK_SPACE", 0x20),
    ("VK_PRIOR", 0x21),
    ("VK_NEXT", 0x22),
    ("VK_END", 0x23),
    ("VK_HOME", 0x24),
    ("VK_LEFT", 0x25),
    ("VK_UP", 0x26),
    ("VK_RIGHT", 0x27),
    ("VK_DOWN", 0x28),
    ("VK_INSERT", 0x2D),
    ("VK_DELETE", 0x2E),
    ("VK_LWIN", 0x5B),
    ("VK_RWIN", 0x5C),
    ("VK_APPS", 0x5D),
    ("VK_F1", 0x70),
    ("VK_F2", 0x71),
    ("VK_F3", 0x72),
    ("VK_F4", 0x73),
    ("VK_F5", 0x74),
    ("VK_F6", 0x75),
    ("VK_F7", 0x76),
    ("VK_F8", 0x77),
    ("VK_F9", 0x78),
    ("VK_F10", 0x79),
    ("VK_F11", 0x7A),
    ("VK_F12", 0x7B),
    ("VK_RSHIFT", 0xA1),
    ("VK_RCONTROL", 0xA3),
    ("VK_RMENU", 0xA5),
    ("VK_OEM_1", 0xBA),
    ("VK_OEM_PLUS", 0xBB),
    ("VK_OEM_COMMA", 0xBC),
    ("VK_OEM_MINUS", 0xBD),
    ("VK_OEM_PERIOD", 0xBE),
    ("VK_OEM_2", 0xBF),
    ("VK_OEM_3", 0xC0),
    ("VK_OEM_4", 0xDB),
    ("VK_OEM_5", 0xDC),
    ("VK_OEM_6", 0xDD),
    ("VK_OEM_7", 0xDE),
];

impl VirtualKey {
    /// Parse a profile key name: a bare letter (`A`), a bare digit (`7`) or a
    /// `VK_*` constant.
    ///
    /// # Errors
    ///
    /// [`MappingError::UnknownKey`] for anything outside the catalogue.
    pub fn parse(name: &str) -> MappingResult<Self> {
        let bytes = name.as_bytes();
        if bytes.len() == 1 {
            let c = bytes[0].to_ascii_uppercase();
            if c.is_ascii_uppercase() || c.is_ascii_digit() {
                return Ok(Self(u32::from(c)));
            }
        }
        VK_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, code)| Self(code))
            .ok_or_else(|| MappingError::UnknownKey(name.to_string()))
    }

    /// The raw VK code.
    #[must_use]
    pub const fn code(self) -> u32 {
        self.0
    }

    /// Canonical profile name: bare letters/digits stay bare, everything else
    /// uses its `VK_*` constant.
    #[must_use]
    pub fn name(self) -> String {
        let code = self.0;
        if (0x41..=0x5A).contains(&code) || (0x30..=0x39).contains(&code) {
            return char::from_u32(code).map_or_else(String::new, String::from);
        }
        VK_NAMES
            .iter()
            .find(|&&(_, c)| c == code)
            .map_or_else(|| format!("VK_0x{code:02X}"), |&(n, _)| n.to_string())
    }
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Kind of mouse operation, inferred from the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseOpKind {
    /// One-shot click dispatched on each rising edge.
    Click,
    /// Continuous motion/scroll dispatched every active tick with magnitude.
    Motion,
}

/// An opaque mouse operation token passed through to the OS layer.
///
/// The catalogue lives outside the core; the only interpretation here is the
/// click/motion split needed for dispatch semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MouseOp(pub String);

impl MouseOp {
    /// Build from a token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }

    /// Motion tokens (`move_*`, `scroll_*`) redispatch each tick; everything
    /// else is edge-triggered.
    #[must_use]
    pub fn kind(&self) -> MouseOpKind {
        if self.0.starts_with("move_") || self.0.starts_with("scroll_") {
            MouseOpKind::Motion
        } else {
            MouseOpKind::Click
        }
    }
}

/// A mapping's output target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    /// Virtual-gamepad axis.
    Axis(AxisId),
    /// Virtual-gamepad button.
    Button(ButtonId),
    /// Keyboard key.
    Key(VirtualKey),
    /// Mouse operation.
    Mouse(MouseOp),
}

impl Action {
    /// Parse a persisted action string.
    ///
    /// Forms: `x360:<axis-or-button>`, `keyboard:<key>`, `mouse:<op>`.
    ///
    /// # Errors
    ///
    /// [`MappingError::UnknownAction`] / [`MappingError::UnknownKey`].
    pub fn parse(s: &str) -> MappingResult<Self> {
        let (scheme, rest) = s
            .split_once(':')
            .ok_or_else(|| MappingError::UnknownAction(s.to_string()))?;
        match scheme {
            "x360" => {
                if let Some(axis) = AxisId::from_token(rest) {
                    Ok(Self::Axis(axis))
                } else if let Some(button) = ButtonId::from_token(rest) {
                    Ok(Self::Button(button))
                } else {
                    Err(MappingError::UnknownAction(s.to_string()))
                }
            }
            "keyboard" => Ok(Self::Key(VirtualKey::parse(rest)?)),
            "mouse" if !rest.is_empty() => Ok(Self::Mouse(MouseOp::new(rest))),
            _ => Err(MappingError::UnknownAction(s.to_string())),
        }
    }

    /// Whether the target is an axis or trigger (deadband applies).
    #[must_use]
    pub const fn is_axis_like(&self) -> bool {
        matches!(self, Self::Axis(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Axis(a) => write!(f, "x360:{}", a.as_str()),
            Self::Button(b) => write!(f, "x360:{}", b.as_str()),
            Self::Key(k) => write!(f, "keyboard:{k}"),
            Self::Mouse(m) => write!(f, "mouse:{}", m.token()),
        }
    }
}
