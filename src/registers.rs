// ZE-SG3 holding register map
// Static field → register descriptor table, plus per-descriptor word decoding and encoding

use crate::error::DeviceError;
use crate::types::{f32_from_words, f32_to_words, u32_from_words, u32_to_words, CodeSet, Value};
use std::fmt;

use self::Access::{ReadOnly, ReadWrite};
use self::ValueKind::{Enumerated, Float, Signed, Unsigned};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Access::ReadOnly => "R-",
            Access::ReadWrite => "RW",
        })
    }
}

/// Semantic type of the words behind a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Unsigned,
    Signed,
    /// IEEE-754 single precision, always two words
    Float,
    Enumerated(CodeSet),
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Unsigned => f.write_str("unsigned"),
            ValueKind::Signed => f.write_str("signed"),
            ValueKind::Float => f.write_str("float"),
            ValueKind::Enumerated(set) => write!(f, "{}", set.name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDescriptor {
    pub name: &'static str,
    pub address: u16,
    /// Number of 16-bit registers, 1 or 2
    pub words: u16,
    pub kind: ValueKind,
    pub access: Access,
}

impl RegisterDescriptor {
    const fn new(name: &'static str, address: u16, words: u16, kind: ValueKind, access: Access) -> Self {
        Self {
            name,
            address,
            words,
            kind,
            access,
        }
    }

    pub fn is_writable(&self) -> bool {
        self.access == Access::ReadWrite
    }

    /// Decode the raw words of a holding register read
    pub fn decode(&self, words: &[u16]) -> Result<Value, DeviceError> {
        if words.len() != usize::from(self.words) {
            return Err(DeviceError::decode(
                self.name,
                format!("expected {} words, got {}", self.words, words.len()),
            ));
        }

        match (self.kind, words) {
            (Unsigned, &[w]) => Ok(Value::Unsigned(u32::from(w))),
            (Unsigned, &[msw, lsw]) => Ok(Value::Unsigned(u32_from_words(msw, lsw))),
            (Signed, &[w]) => Ok(Value::Signed(i32::from(w as i16))),
            (Signed, &[msw, lsw]) => Ok(Value::Signed(u32_from_words(msw, lsw) as i32)),
            (Float, &[msw, lsw]) => Ok(Value::Float(f32_from_words(msw, lsw))),
            (Enumerated(set), &[w]) => Ok(Value::Code(set.decode_raw(w))),
            (kind, _) => Err(DeviceError::decode(
                self.name,
                format!("{} cannot span {} words", kind, self.words),
            )),
        }
    }

    /// Encode a value into the words written to the device, most significant word first
    pub fn encode(&self, value: &Value) -> Result<Vec<u16>, DeviceError> {
        let words = match (self.kind, self.words, *value) {
            (Unsigned, 1, Value::Unsigned(v)) => {
                let word = u16::try_from(v)
                    .map_err(|_| DeviceError::encode(self.name, format!("{} does not fit in 16 bits", v)))?;
                vec![word]
            }
            (Unsigned, 2, Value::Unsigned(v)) => u32_to_words(v).to_vec(),
            (Signed, 1, Value::Signed(v)) => {
                let word = i16::try_from(v)
                    .map_err(|_| DeviceError::encode(self.name, format!("{} does not fit in 16 bits", v)))?;
                vec![word as u16]
            }
            (Signed, 2, Value::Signed(v)) => u32_to_words(v as u32).to_vec(),
            (Float, 2, Value::Float(v)) => f32_to_words(v).to_vec(),
            (Enumerated(set), 1, Value::Code(code)) if code.set() == set && code.is_known() => vec![code.code()],
            (Enumerated(set), 1, Value::Code(code)) if code.set() == set => {
                return Err(DeviceError::encode(
                    self.name,
                    format!("{} is not a valid {} code", code.code(), set.name()),
                ));
            }
            (Enumerated(set), 1, Value::Code(code)) => {
                return Err(DeviceError::encode(
                    self.name,
                    format!("expected a {} code, got a {} code", set.name(), code.set().name()),
                ));
            }
            (kind, 1 | 2, other) => {
                return Err(DeviceError::encode(
                    self.name,
                    format!("expected a {} value, got {}", kind, other.kind_name()),
                ));
            }
            (_, words, _) => {
                return Err(DeviceError::encode(self.name, format!("unsupported word count {}", words)));
            }
        };
        Ok(words)
    }

    /// Parse user text (CLI input) into a value of this field's kind
    pub fn parse_value(&self, text: &str) -> Result<Value, DeviceError> {
        let text = text.trim();
        let invalid = |reason: String| DeviceError::encode(self.name, reason);
        match self.kind {
            Unsigned => parse_unsigned(text)
                .map(Value::Unsigned)
                .ok_or_else(|| invalid(format!("'{}' is not an unsigned integer", text))),
            Signed => text
                .parse::<i32>()
                .map(Value::Signed)
                .map_err(|e| invalid(format!("'{}' is not a signed integer: {}", text, e))),
            Float => text
                .parse::<f32>()
                .map(Value::Float)
                .map_err(|e| invalid(format!("'{}' is not a number: {}", text, e))),
            Enumerated(set) => set
                .from_label(text)
                .or_else(|| text.parse::<u16>().ok().and_then(|code| set.decode(code)))
                .map(Value::Code)
                .ok_or_else(|| invalid(format!("'{}' is not one of: {}", text, set.labels().join(", ")))),
        }
    }
}

/// Decimal or `0x` hexadecimal
fn parse_unsigned(text: &str) -> Option<u32> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

pub static REGISTER_MAP: &[RegisterDescriptor] = &[
    RegisterDescriptor::new("machine_id", 0, 1, Unsigned, ReadOnly),
    RegisterDescriptor::new("firmware_version", 1, 1, Unsigned, ReadOnly),
    RegisterDescriptor::new("measure_unit", 2, 1, Enumerated(CodeSet::MeasureUnit), ReadWrite),
    RegisterDescriptor::new("unipolar_bipolar", 3, 1, Unsigned, ReadWrite),
    RegisterDescriptor::new("analog_output_type", 4, 1, Unsigned, ReadWrite),
    RegisterDescriptor::new("digital_in_type", 5, 1, Unsigned, ReadWrite),
    RegisterDescriptor::new("calibration_mode", 6, 1, Unsigned, ReadWrite),
    RegisterDescriptor::new("cell_sense_ratio", 13, 2, Float, ReadWrite),
    RegisterDescriptor::new("cell_full_scale", 15, 2, Float, ReadWrite),
    RegisterDescriptor::new("standard_weight", 17, 2, Float, ReadWrite),
    RegisterDescriptor::new("threshold_do1", 19, 2, Float, ReadWrite),
    RegisterDescriptor::new("output_weight_start_scale", 21, 2, Float, ReadWrite),
    RegisterDescriptor::new("output_weight_stop_scale", 23, 2, Float, ReadWrite),
    RegisterDescriptor::new("output_stop_scale", 25, 2, Float, ReadWrite),
    RegisterDescriptor::new("output_start_scale", 27, 2, Float, ReadWrite),
    RegisterDescriptor::new("delta_weight", 29, 2, Float, ReadWrite),
    RegisterDescriptor::new("delta_time", 31, 1, Unsigned, ReadWrite),
    RegisterDescriptor::new("dout_mode", 32, 1, Unsigned, ReadWrite),
    RegisterDescriptor::new("advanced_adc_speed", 33, 1, Enumerated(CodeSet::AdcSpeed), ReadWrite),
    RegisterDescriptor::new("automatic_tare_reset", 34, 2, Unsigned, ReadWrite),
    RegisterDescriptor::new("threshold_hysteresis_do1", 36, 2, Float, ReadWrite),
    RegisterDescriptor::new("advanced_denoise_filter_variation", 38, 2, Float, ReadWrite),
    RegisterDescriptor::new("advanced_denoise_filter_response", 40, 2, Float, ReadWrite),
    RegisterDescriptor::new("denoise_filter_value", 42, 1, Enumerated(CodeSet::DenoiseFilter), ReadWrite),
    RegisterDescriptor::new("resolution_mode", 43, 1, Enumerated(CodeSet::ResolutionMode), ReadWrite),
    RegisterDescriptor::new("denoise_filter_enable", 44, 1, Unsigned, ReadWrite),
    RegisterDescriptor::new("manual_resolution", 45, 2, Float, ReadWrite),
    RegisterDescriptor::new("one_piece_weight", 47, 2, Float, ReadWrite),
    RegisterDescriptor::new("threshold_do2", 49, 2, Float, ReadWrite),
    RegisterDescriptor::new("threshold_hysteresis_do2", 51, 2, Float, ReadWrite),
    RegisterDescriptor::new("adc_filtered_16bit", 62, 1, Unsigned, ReadOnly),
    RegisterDescriptor::new("net_weight", 63, 2, Float, ReadOnly),
    RegisterDescriptor::new("gross_weight", 65, 2, Float, ReadOnly),
    RegisterDescriptor::new("tare_weight", 67, 2, Float, ReadOnly),
    RegisterDescriptor::new("integer_net_weight", 69, 2, Signed, ReadOnly),
    RegisterDescriptor::new("integer_gross_weight", 71, 2, Signed, ReadOnly),
    RegisterDescriptor::new("integer_tare_weight", 73, 2, Signed, ReadOnly),
    RegisterDescriptor::new("factory_manual_tare", 75, 2, Float, ReadWrite),
    RegisterDescriptor::new("status", 77, 1, Unsigned, ReadOnly),
    RegisterDescriptor::new("password", 78, 1, Unsigned, ReadOnly),
    RegisterDescriptor::new("command", 79, 1, Enumerated(CodeSet::Command), ReadWrite),
    RegisterDescriptor::new("pieces_counter", 80, 1, Unsigned, ReadOnly),
    RegisterDescriptor::new("max_net_weight", 81, 2, Float, ReadOnly),
    RegisterDescriptor::new("min_net_weight", 83, 2, Float, ReadOnly),
    RegisterDescriptor::new("adc_raw_24bit", 91, 2, Unsigned, ReadOnly),
    RegisterDescriptor::new("adc_raw_24bit_filtered", 93, 2, Unsigned, ReadOnly),
    RegisterDescriptor::new("manual_analog_output", 95, 2, Unsigned, ReadWrite),
];

pub fn lookup(name: &str) -> Option<&'static RegisterDescriptor> {
    REGISTER_MAP.iter().find(|d| d.name == name)
}
