// Register value types
// Typed values carried by ZE-SG3 holding registers, the enumerated code sets and bitfield layouts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generates an enumerated code set: the wire code and a short label per variant.
macro_rules! code_set {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn code(self) -> u16 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn from_code(code: u16) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Case-insensitive lookup by label
            pub fn from_label(label: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(label))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

code_set! {
    /// Engineering unit shown for weight values
    MeasureUnit {
        Kilogram = 0 => "kg",
        Gram = 1 => "g",
        Tonne = 2 => "t",
        Pound = 3 => "lb",
        Litre = 4 => "l",
        Newton = 5 => "N",
        Bar = 6 => "bar",
        Atmosphere = 7 => "atm",
        Other = 8 => "other",
    }
}

code_set! {
    /// ADC conversion rate
    AdcSpeed {
        Hz960 = 0 => "960Hz",
        Hz300 = 1 => "300Hz",
        Hz150 = 2 => "150Hz",
        Hz100 = 3 => "100Hz",
        Hz60 = 4 => "60Hz",
        Hz12 = 5 => "12Hz",
        Hz4_7 = 6 => "4.7Hz",
    }
}

code_set! {
    /// Denoise filter response time; `Advanced` uses the variation/response registers
    DenoiseFilter {
        Ms2_0 = 0 => "2.0ms",
        Ms6_7 = 1 => "6.7ms",
        Ms13_0 = 2 => "13.0ms",
        Ms30_0 = 3 => "30.0ms",
        Ms50_0 = 4 => "50.0ms",
        Ms250_0 = 5 => "250.0ms",
        Ms850_0 = 6 => "850.0ms",
        Advanced = 7 => "advanced",
    }
}

code_set! {
    /// Weight resolution selection
    ResolutionMode {
        /// Derived from the full scale to give about 20000 points
        Automatic = 0 => "automatic",
        /// Taken from the manual resolution register
        Manual = 1 => "manual",
        /// Full 24 bits
        Maximum = 2 => "max",
    }
}

code_set! {
    /// Commands accepted by the command register
    Command {
        Reboot = 43948 => "reboot",
        AcquireTareRam = 49594 => "tare_ram",
        AcquireTareFlashCalibration = 49914 => "tare_flash_calibration",
        AcquireSampleWeightFlashCalibration = 50700 => "sample_weight_flash_calibration",
        AcquireTareFromRegister = 50773 => "tare_from_register",
        ResetMaxNetWeight = 49151 => "reset_max_net_weight",
        ResetMinNetWeight = 45056 => "reset_min_net_weight",
    }
}

/// Identifies which code set an enumerated register uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeSet {
    MeasureUnit,
    AdcSpeed,
    DenoiseFilter,
    ResolutionMode,
    Command,
}

impl CodeSet {
    pub const fn name(self) -> &'static str {
        match self {
            CodeSet::MeasureUnit => "measure unit",
            CodeSet::AdcSpeed => "ADC speed",
            CodeSet::DenoiseFilter => "denoise filter",
            CodeSet::ResolutionMode => "resolution mode",
            CodeSet::Command => "command",
        }
    }

    pub fn decode(self, code: u16) -> Option<Code> {
        match self {
            CodeSet::MeasureUnit => MeasureUnit::from_code(code).map(Code::MeasureUnit),
            CodeSet::AdcSpeed => AdcSpeed::from_code(code).map(Code::AdcSpeed),
            CodeSet::DenoiseFilter => DenoiseFilter::from_code(code).map(Code::DenoiseFilter),
            CodeSet::ResolutionMode => ResolutionMode::from_code(code).map(Code::ResolutionMode),
            CodeSet::Command => Command::from_code(code).map(Code::Command),
        }
    }

    /// Like `decode`, but keeps codes outside the set as `Code::Unknown`
    pub fn decode_raw(self, code: u16) -> Code {
        self.decode(code).unwrap_or(Code::Unknown { set: self, code })
    }

    pub fn from_label(self, label: &str) -> Option<Code> {
        match self {
            CodeSet::MeasureUnit => MeasureUnit::from_label(label).map(Code::MeasureUnit),
            CodeSet::AdcSpeed => AdcSpeed::from_label(label).map(Code::AdcSpeed),
            CodeSet::DenoiseFilter => DenoiseFilter::from_label(label).map(Code::DenoiseFilter),
            CodeSet::ResolutionMode => ResolutionMode::from_label(label).map(Code::ResolutionMode),
            CodeSet::Command => Command::from_label(label).map(Code::Command),
        }
    }

    /// Labels of every code in the set, for help and error messages
    pub fn labels(self) -> Vec<&'static str> {
        match self {
            CodeSet::MeasureUnit => MeasureUnit::ALL.iter().map(|c| c.label()).collect(),
            CodeSet::AdcSpeed => AdcSpeed::ALL.iter().map(|c| c.label()).collect(),
            CodeSet::DenoiseFilter => DenoiseFilter::ALL.iter().map(|c| c.label()).collect(),
            CodeSet::ResolutionMode => ResolutionMode::ALL.iter().map(|c| c.label()).collect(),
            CodeSet::Command => Command::ALL.iter().map(|c| c.label()).collect(),
        }
    }
}

/// A decoded enumerated register value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    MeasureUnit(MeasureUnit),
    AdcSpeed(AdcSpeed),
    DenoiseFilter(DenoiseFilter),
    ResolutionMode(ResolutionMode),
    Command(Command),
    /// A code the device reported that none of the set's members carries
    Unknown { set: CodeSet, code: u16 },
}

impl Code {
    pub const fn set(self) -> CodeSet {
        match self {
            Code::MeasureUnit(_) => CodeSet::MeasureUnit,
            Code::AdcSpeed(_) => CodeSet::AdcSpeed,
            Code::DenoiseFilter(_) => CodeSet::DenoiseFilter,
            Code::ResolutionMode(_) => CodeSet::ResolutionMode,
            Code::Command(_) => CodeSet::Command,
            Code::Unknown { set, .. } => set,
        }
    }

    pub const fn code(self) -> u16 {
        match self {
            Code::MeasureUnit(c) => c.code(),
            Code::AdcSpeed(c) => c.code(),
            Code::DenoiseFilter(c) => c.code(),
            Code::ResolutionMode(c) => c.code(),
            Code::Command(c) => c.code(),
            Code::Unknown { code, .. } => code,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Code::MeasureUnit(c) => c.label(),
            Code::AdcSpeed(c) => c.label(),
            Code::DenoiseFilter(c) => c.label(),
            Code::ResolutionMode(c) => c.label(),
            Code::Command(c) => c.label(),
            Code::Unknown { .. } => "unknown",
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Code::Unknown { .. })
    }
}

/// Logical value of a register field after decoding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Unsigned(u32),
    Signed(i32),
    Float(f32),
    Code(Code),
}

impl Value {
    /// Short name of the variant, used in error messages
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Unsigned(_) => "unsigned",
            Value::Signed(_) => "signed",
            Value::Float(_) => "float",
            Value::Code(_) => "code",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Value::Unsigned(n) => write!(f, "{}", n),
            Value::Signed(n) => write!(f, "{}", n),
            Value::Float(v) => write!(f, "{}", v),
            Value::Code(c) => write!(f, "{} ({})", c.label(), c.code()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Value::Unsigned(n) => serializer.serialize_u32(n),
            Value::Signed(n) => serializer.serialize_i32(n),
            Value::Float(v) => serializer.serialize_f32(v),
            Value::Code(Code::Unknown { code, .. }) => serializer.serialize_u16(code),
            Value::Code(c) => serializer.serialize_str(c.label()),
        }
    }
}

/// Compose a 32-bit word pair, most significant word first
pub fn u32_from_words(msw: u16, lsw: u16) -> u32 {
    (u32::from(msw) << 16) | u32::from(lsw)
}

/// Split into `[msw, lsw]`
pub fn u32_to_words(value: u32) -> [u16; 2] {
    [(value >> 16) as u16, (value & 0xFFFF) as u16]
}

/// Big-endian IEEE-754 single precision spread over two registers
pub fn f32_from_words(msw: u16, lsw: u16) -> f32 {
    f32::from_bits(u32_from_words(msw, lsw))
}

pub fn f32_to_words(value: f32) -> [u16; 2] {
    u32_to_words(value.to_bits())
}

/// Analog output configuration register (type in bits 0-1, source in bits 2-15)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalogOutputType {
    pub output_type: u8,
    /// 14-bit field, higher bits are dropped by `to_word`
    pub linked_to: u16,
}

impl AnalogOutputType {
    const TYPE_MASK: u16 = 0b11;
    const LINKED_TO_BP: u16 = 2;
    const LINKED_TO_MASK: u16 = 0x3FFF;

    pub fn from_word(word: u16) -> Self {
        Self {
            output_type: (word & Self::TYPE_MASK) as u8,
            linked_to: (word >> Self::LINKED_TO_BP) & Self::LINKED_TO_MASK,
        }
    }

    pub fn to_word(self) -> u16 {
        (u16::from(self.output_type) & Self::TYPE_MASK)
            | ((self.linked_to & Self::LINKED_TO_MASK) << Self::LINKED_TO_BP)
    }
}

/// Digital input type register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DigitalInputType {
    pub dio1: bool,
    pub dio2: bool,
    pub di1: bool,
    pub di2: bool,
}

impl DigitalInputType {
    const DIO1_BP: u16 = 0;
    const DIO2_BP: u16 = 1;
    const DI1_BP: u16 = 8;
    const DI2_BP: u16 = 9;

    pub fn from_word(word: u16) -> Self {
        Self {
            dio1: bit(word, Self::DIO1_BP),
            dio2: bit(word, Self::DIO2_BP),
            di1: bit(word, Self::DI1_BP),
            di2: bit(word, Self::DI2_BP),
        }
    }

    pub fn to_word(self) -> u16 {
        u16::from(self.dio1) << Self::DIO1_BP
            | u16::from(self.dio2) << Self::DIO2_BP
            | u16::from(self.di1) << Self::DI1_BP
            | u16::from(self.di2) << Self::DI2_BP
    }
}

/// Digital output mode register.
///
/// DOUT1 mode occupies bits 11-14. DOUT2 mode starts at bit 15, so only its lowest bit is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DoutMode {
    /// Open/close selection bit of DOUT1
    pub dout1_closed: bool,
    /// Open/close selection bit of DOUT2
    pub dout2_closed: bool,
    pub dout1_mode: u8,
    pub dout2_mode: u8,
}

impl DoutMode {
    const DOUT1_OPEN_CLOSE_BP: u16 = 0;
    const DOUT2_OPEN_CLOSE_BP: u16 = 1;
    const DOUT1_MODE_BP: u16 = 11;
    const DOUT2_MODE_BP: u16 = 15;
    const DOUT1_MODE_MASK: u16 = 0x000F;
    const DOUT2_MODE_MASK: u16 = 0x0001;

    pub fn from_word(word: u16) -> Self {
        Self {
            dout1_closed: bit(word, Self::DOUT1_OPEN_CLOSE_BP),
            dout2_closed: bit(word, Self::DOUT2_OPEN_CLOSE_BP),
            dout1_mode: ((word >> Self::DOUT1_MODE_BP) & Self::DOUT1_MODE_MASK) as u8,
            dout2_mode: ((word >> Self::DOUT2_MODE_BP) & Self::DOUT2_MODE_MASK) as u8,
        }
    }

    pub fn to_word(self) -> u16 {
        u16::from(self.dout1_closed) << Self::DOUT1_OPEN_CLOSE_BP
            | u16::from(self.dout2_closed) << Self::DOUT2_OPEN_CLOSE_BP
            | (u16::from(self.dout1_mode) & Self::DOUT1_MODE_MASK) << Self::DOUT1_MODE_BP
            | (u16::from(self.dout2_mode) & Self::DOUT2_MODE_MASK) << Self::DOUT2_MODE_BP
    }
}

/// Flags of the status register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub threshold_and_stable_weight_dido1: bool,
    pub cell_full_scale: bool,
    pub net_weight_below_zero: bool,
    pub threshold_and_stable_weight_dido2: bool,
    pub stable_weight: bool,
    pub digital_output_2_on: bool,
    pub digital_output_1_on: bool,
    pub threshold_with_hysteresis_dido1: bool,
    pub tare_tracker: bool,
    pub threshold_with_hysteresis_dido2: bool,
}

impl DeviceStatus {
    pub fn from_word(word: u16) -> Self {
        Self {
            threshold_and_stable_weight_dido1: bit(word, 0),
            cell_full_scale: bit(word, 1),
            net_weight_below_zero: bit(word, 2),
            threshold_and_stable_weight_dido2: bit(word, 3),
            stable_weight: bit(word, 4),
            digital_output_2_on: bit(word, 5),
            digital_output_1_on: bit(word, 6),
            threshold_with_hysteresis_dido1: bit(word, 7),
            tare_tracker: bit(word, 8),
            threshold_with_hysteresis_dido2: bit(word, 9),
        }
    }
}

fn bit(word: u16, position: u16) -> bool {
    (word >> position) & 0x01 == 1
}
