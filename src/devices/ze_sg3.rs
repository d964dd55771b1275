// Seneca ZE-SG3 load-cell converter
// Register façade: named fields resolved through the static register map, one transaction per call

use crate::config::ModbusConfig;
use crate::drivers::modbus::{ModbusClient, RegisterTransport};
use crate::error::DeviceError;
use crate::registers::{self, RegisterDescriptor, REGISTER_MAP};
use crate::types::*;

/// Typed getter for a float field
macro_rules! float_getters {
    ($($(#[$doc:meta])* $get:ident => $field:literal;)+) => {
        $(
            $(#[$doc])*
            pub fn $get(&mut self) -> Result<f32, DeviceError> {
                self.read_f32($field)
            }
        )+
    };
}

/// Typed setter for a float field
macro_rules! float_setters {
    ($($set:ident => $field:literal;)+) => {
        $(
            pub fn $set(&mut self, value: f32) -> Result<(), DeviceError> {
                self.write($field, Value::Float(value))
            }
        )+
    };
}

pub struct ZeSg3Device<T: RegisterTransport = ModbusClient> {
    transport: T,
}

impl ZeSg3Device<ModbusClient> {
    /// Open a Modbus TCP session to the module with default timeout and unit id
    pub fn connect(host: &str, port: u16) -> Result<Self, DeviceError> {
        Self::connect_with_config(&ModbusConfig::new(host, port))
    }

    pub fn connect_with_config(config: &ModbusConfig) -> Result<Self, DeviceError> {
        let mut device = Self::new(ModbusClient::from_config(config));
        device.open()?;
        Ok(device)
    }
}

impl<T: RegisterTransport> ZeSg3Device<T> {
    /// Wrap a transport without connecting it
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Connect the owned transport; fails with `AlreadyConnected` on an open session
    pub fn open(&mut self) -> Result<(), DeviceError> {
        self.transport.connect()?;
        Ok(())
    }

    /// Release the session. Safe to call when already closed.
    pub fn disconnect(&mut self) {
        self.transport.disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Every field the module exposes, in address order
    pub fn fields() -> &'static [RegisterDescriptor] {
        REGISTER_MAP
    }

    fn descriptor(name: &str) -> Result<&'static RegisterDescriptor, DeviceError> {
        registers::lookup(name).ok_or_else(|| DeviceError::UnknownField(name.to_string()))
    }

    fn ensure_connected(&self) -> Result<(), DeviceError> {
        if self.transport.is_connected() {
            Ok(())
        } else {
            Err(DeviceError::NotConnected)
        }
    }

    /// Read one field and decode it according to its descriptor
    pub fn read(&mut self, name: &str) -> Result<Value, DeviceError> {
        let descriptor = Self::descriptor(name)?;
        self.ensure_connected()?;

        let words = self
            .transport
            .read_holding_registers(descriptor.address, descriptor.words)
            .map_err(|e| {
                log::warn!("Read of {} at {} failed: {}", name, descriptor.address, e);
                DeviceError::from(e)
            })?;
        let value = descriptor.decode(&words)?;
        log::debug!("{} @{} -> {:?} = {}", name, descriptor.address, words, value);
        Ok(value)
    }

    /// Encode and write one field. Read-only fields are rejected before any transport call.
    pub fn write(&mut self, name: &str, value: Value) -> Result<(), DeviceError> {
        let descriptor = Self::descriptor(name)?;
        if !descriptor.is_writable() {
            return Err(DeviceError::NotWritable(name.to_string()));
        }
        let words = descriptor.encode(&value)?;
        self.ensure_connected()?;

        let result = match words.as_slice() {
            [word] => self.transport.write_single_register(descriptor.address, *word),
            _ => self.transport.write_multiple_registers(descriptor.address, &words),
        };
        result.map_err(|e| {
            log::warn!("Write of {} at {} failed: {}", name, descriptor.address, e);
            DeviceError::from(e)
        })?;
        log::debug!("{} @{} <- {:?} = {}", name, descriptor.address, words, value);
        Ok(())
    }

    /// Read every readable field in table order, stopping at the first failure
    pub fn read_all(&mut self) -> Result<Vec<(&'static str, Value)>, DeviceError> {
        REGISTER_MAP
            .iter()
            .map(|d| self.read(d.name).map(|value| (d.name, value)))
            .collect()
    }

    fn read_f32(&mut self, name: &str) -> Result<f32, DeviceError> {
        match self.read(name)? {
            Value::Float(v) => Ok(v),
            other => Err(unexpected(name, &other)),
        }
    }

    fn read_u16(&mut self, name: &str) -> Result<u16, DeviceError> {
        match self.read(name)? {
            Value::Unsigned(v) => u16::try_from(v).map_err(|_| DeviceError::decode(name, "value exceeds 16 bits")),
            other => Err(unexpected(name, &other)),
        }
    }

    fn read_u32(&mut self, name: &str) -> Result<u32, DeviceError> {
        match self.read(name)? {
            Value::Unsigned(v) => Ok(v),
            other => Err(unexpected(name, &other)),
        }
    }

    fn read_i32(&mut self, name: &str) -> Result<i32, DeviceError> {
        match self.read(name)? {
            Value::Signed(v) => Ok(v),
            other => Err(unexpected(name, &other)),
        }
    }

    fn read_code(&mut self, name: &str) -> Result<Code, DeviceError> {
        match self.read(name)? {
            Value::Code(code) => Ok(code),
            other => Err(unexpected(name, &other)),
        }
    }

    // Identification

    pub fn machine_id(&mut self) -> Result<u16, DeviceError> {
        self.read_u16("machine_id")
    }

    pub fn firmware_version(&mut self) -> Result<u16, DeviceError> {
        self.read_u16("firmware_version")
    }

    pub fn password(&mut self) -> Result<u16, DeviceError> {
        self.read_u16("password")
    }

    // Configuration

    pub fn measure_unit(&mut self) -> Result<MeasureUnit, DeviceError> {
        match self.read_code("measure_unit")? {
            Code::MeasureUnit(unit) => Ok(unit),
            other => Err(unexpected("measure_unit", &Value::Code(other))),
        }
    }

    pub fn set_measure_unit(&mut self, unit: MeasureUnit) -> Result<(), DeviceError> {
        self.write("measure_unit", Value::Code(Code::MeasureUnit(unit)))
    }

    pub fn unipolar_bipolar(&mut self) -> Result<u16, DeviceError> {
        self.read_u16("unipolar_bipolar")
    }

    pub fn set_unipolar_bipolar(&mut self, setting: u16) -> Result<(), DeviceError> {
        self.write("unipolar_bipolar", Value::Unsigned(u32::from(setting)))
    }

    pub fn analog_output_type(&mut self) -> Result<AnalogOutputType, DeviceError> {
        self.read_u16("analog_output_type").map(AnalogOutputType::from_word)
    }

    pub fn set_analog_output_type(&mut self, output: AnalogOutputType) -> Result<(), DeviceError> {
        self.write("analog_output_type", Value::Unsigned(u32::from(output.to_word())))
    }

    pub fn digital_in_type(&mut self) -> Result<DigitalInputType, DeviceError> {
        self.read_u16("digital_in_type").map(DigitalInputType::from_word)
    }

    pub fn set_digital_in_type(&mut self, inputs: DigitalInputType) -> Result<(), DeviceError> {
        self.write("digital_in_type", Value::Unsigned(u32::from(inputs.to_word())))
    }

    pub fn calibration_mode(&mut self) -> Result<u16, DeviceError> {
        self.read_u16("calibration_mode")
    }

    pub fn set_calibration_mode(&mut self, mode: u16) -> Result<(), DeviceError> {
        self.write("calibration_mode", Value::Unsigned(u32::from(mode)))
    }

    pub fn delta_time(&mut self) -> Result<u16, DeviceError> {
        self.read_u16("delta_time")
    }

    pub fn set_delta_time(&mut self, time: u16) -> Result<(), DeviceError> {
        self.write("delta_time", Value::Unsigned(u32::from(time)))
    }

    pub fn dout_mode(&mut self) -> Result<DoutMode, DeviceError> {
        self.read_u16("dout_mode").map(DoutMode::from_word)
    }

    pub fn set_dout_mode(&mut self, mode: DoutMode) -> Result<(), DeviceError> {
        self.write("dout_mode", Value::Unsigned(u32::from(mode.to_word())))
    }

    pub fn advanced_adc_speed(&mut self) -> Result<AdcSpeed, DeviceError> {
        match self.read_code("advanced_adc_speed")? {
            Code::AdcSpeed(speed) => Ok(speed),
            other => Err(unexpected("advanced_adc_speed", &Value::Code(other))),
        }
    }

    pub fn set_advanced_adc_speed(&mut self, speed: AdcSpeed) -> Result<(), DeviceError> {
        self.write("advanced_adc_speed", Value::Code(Code::AdcSpeed(speed)))
    }

    pub fn automatic_tare_reset(&mut self) -> Result<u32, DeviceError> {
        self.read_u32("automatic_tare_reset")
    }

    pub fn set_automatic_tare_reset(&mut self, value: u32) -> Result<(), DeviceError> {
        self.write("automatic_tare_reset", Value::Unsigned(value))
    }

    pub fn denoise_filter_value(&mut self) -> Result<DenoiseFilter, DeviceError> {
        match self.read_code("denoise_filter_value")? {
            Code::DenoiseFilter(filter) => Ok(filter),
            other => Err(unexpected("denoise_filter_value", &Value::Code(other))),
        }
    }

    pub fn set_denoise_filter_value(&mut self, filter: DenoiseFilter) -> Result<(), DeviceError> {
        self.write("denoise_filter_value", Value::Code(Code::DenoiseFilter(filter)))
    }

    pub fn resolution_mode(&mut self) -> Result<ResolutionMode, DeviceError> {
        match self.read_code("resolution_mode")? {
            Code::ResolutionMode(mode) => Ok(mode),
            other => Err(unexpected("resolution_mode", &Value::Code(other))),
        }
    }

    pub fn set_resolution_mode(&mut self, mode: ResolutionMode) -> Result<(), DeviceError> {
        self.write("resolution_mode", Value::Code(Code::ResolutionMode(mode)))
    }

    pub fn denoise_filter_enabled(&mut self) -> Result<bool, DeviceError> {
        self.read_u16("denoise_filter_enable").map(|v| v != 0)
    }

    pub fn set_denoise_filter_enabled(&mut self, enable: bool) -> Result<(), DeviceError> {
        self.write("denoise_filter_enable", Value::Unsigned(u32::from(enable)))
    }

    pub fn manual_analog_output(&mut self) -> Result<u32, DeviceError> {
        self.read_u32("manual_analog_output")
    }

    pub fn set_manual_analog_output(&mut self, value: u32) -> Result<(), DeviceError> {
        self.write("manual_analog_output", Value::Unsigned(value))
    }

    float_getters! {
        cell_sense_ratio => "cell_sense_ratio";
        cell_full_scale => "cell_full_scale";
        /// Reference weight used by the sample-weight calibration
        standard_weight => "standard_weight";
        threshold_do1 => "threshold_do1";
        threshold_do2 => "threshold_do2";
        threshold_hysteresis_do1 => "threshold_hysteresis_do1";
        threshold_hysteresis_do2 => "threshold_hysteresis_do2";
        output_weight_start_scale => "output_weight_start_scale";
        output_weight_stop_scale => "output_weight_stop_scale";
        output_start_scale => "output_start_scale";
        output_stop_scale => "output_stop_scale";
        delta_weight => "delta_weight";
        advanced_denoise_filter_variation => "advanced_denoise_filter_variation";
        advanced_denoise_filter_response => "advanced_denoise_filter_response";
        manual_resolution => "manual_resolution";
        one_piece_weight => "one_piece_weight";
        factory_manual_tare => "factory_manual_tare";
    }

    float_setters! {
        set_cell_sense_ratio => "cell_sense_ratio";
        set_cell_full_scale => "cell_full_scale";
        set_standard_weight => "standard_weight";
        set_threshold_do1 => "threshold_do1";
        set_threshold_do2 => "threshold_do2";
        set_threshold_hysteresis_do1 => "threshold_hysteresis_do1";
        set_threshold_hysteresis_do2 => "threshold_hysteresis_do2";
        set_output_weight_start_scale => "output_weight_start_scale";
        set_output_weight_stop_scale => "output_weight_stop_scale";
        set_output_start_scale => "output_start_scale";
        set_output_stop_scale => "output_stop_scale";
        set_delta_weight => "delta_weight";
        set_advanced_denoise_filter_variation => "advanced_denoise_filter_variation";
        set_advanced_denoise_filter_response => "advanced_denoise_filter_response";
        set_manual_resolution => "manual_resolution";
        set_one_piece_weight => "one_piece_weight";
        set_factory_manual_tare => "factory_manual_tare";
    }

    // Measurements

    float_getters! {
        /// Net weight in the configured measure unit
        net_weight => "net_weight";
        gross_weight => "gross_weight";
        tare_weight => "tare_weight";
        max_net_weight => "max_net_weight";
        min_net_weight => "min_net_weight";
    }

    pub fn integer_net_weight(&mut self) -> Result<i32, DeviceError> {
        self.read_i32("integer_net_weight")
    }

    pub fn integer_gross_weight(&mut self) -> Result<i32, DeviceError> {
        self.read_i32("integer_gross_weight")
    }

    pub fn integer_tare_weight(&mut self) -> Result<i32, DeviceError> {
        self.read_i32("integer_tare_weight")
    }

    pub fn adc_filtered_16bit(&mut self) -> Result<u16, DeviceError> {
        self.read_u16("adc_filtered_16bit")
    }

    pub fn adc_raw_24bit(&mut self) -> Result<u32, DeviceError> {
        self.read_u32("adc_raw_24bit")
    }

    pub fn adc_raw_24bit_filtered(&mut self) -> Result<u32, DeviceError> {
        self.read_u32("adc_raw_24bit_filtered")
    }

    pub fn pieces_counter(&mut self) -> Result<u16, DeviceError> {
        self.read_u16("pieces_counter")
    }

    pub fn status(&mut self) -> Result<DeviceStatus, DeviceError> {
        self.read_u16("status").map(DeviceStatus::from_word)
    }

    // Commands

    /// Last code written to the command register, `None` while it holds no known command (0 at power-up)
    pub fn last_command(&mut self) -> Result<Option<Command>, DeviceError> {
        match self.read_code("command")? {
            Code::Command(command) => Ok(Some(command)),
            Code::Unknown { .. } => Ok(None),
            other => Err(unexpected("command", &Value::Code(other))),
        }
    }

    pub fn send_command(&mut self, command: Command) -> Result<(), DeviceError> {
        log::info!("Sending command {} ({})", command, command.code());
        self.write("command", Value::Code(Code::Command(command)))
    }

    pub fn reboot(&mut self) -> Result<(), DeviceError> {
        self.send_command(Command::Reboot)
    }

    pub fn acquire_tare(&mut self) -> Result<(), DeviceError> {
        self.send_command(Command::AcquireTareRam)
    }
}

fn unexpected(name: &str, value: &Value) -> DeviceError {
    DeviceError::decode(name, format!("unexpected {} value {}", value.kind_name(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::modbus::ModbusError;
    use crate::registers::{Access, ValueKind};
    use std::collections::HashMap;

    /// Register memory that echoes back whatever was written
    #[derive(Default)]
    struct MockTransport {
        connected: bool,
        memory: HashMap<u16, u16>,
        calls: usize,
        fail_with: Option<ModbusError>,
    }

    impl MockTransport {
        fn connected() -> Self {
            Self {
                connected: true,
                ..Default::default()
            }
        }

        fn preload(&mut self, address: u16, words: &[u16]) {
            for (offset, word) in words.iter().enumerate() {
                self.memory.insert(address + offset as u16, *word);
            }
        }
    }

    impl RegisterTransport for MockTransport {
        fn connect(&mut self) -> Result<(), ModbusError> {
            if self.connected {
                return Err(ModbusError::AlreadyConnected("mock".to_string()));
            }
            self.connected = true;
            Ok(())
        }

        fn disconnect(&mut self) {
            self.connected = false;
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn read_holding_registers(&mut self, address: u16, count: u16) -> Result<Vec<u16>, ModbusError> {
            self.calls += 1;
            if let Some(err) = self.fail_with.clone() {
                return Err(err);
            }
            Ok((address..address + count)
                .map(|a| self.memory.get(&a).copied().unwrap_or(0))
                .collect())
        }

        fn write_single_register(&mut self, address: u16, value: u16) -> Result<(), ModbusError> {
            self.write_multiple_registers(address, &[value])
        }

        fn write_multiple_registers(&mut self, address: u16, values: &[u16]) -> Result<(), ModbusError> {
            self.calls += 1;
            if let Some(err) = self.fail_with.clone() {
                return Err(err);
            }
            self.preload(address, values);
            Ok(())
        }
    }

    /// A raw word image for the descriptor's kind
    fn sample_words(d: &RegisterDescriptor) -> Vec<u16> {
        match d.kind {
            ValueKind::Enumerated(_) => vec![1],
            ValueKind::Float => f32_to_words(12.5).to_vec(),
            _ => vec![0x1234; usize::from(d.words)],
        }
    }

    #[test]
    fn every_field_decodes_to_its_kind() {
        let mut transport = MockTransport::connected();
        for d in REGISTER_MAP {
            transport.preload(d.address, &sample_words(d));
        }
        let mut device = ZeSg3Device::new(transport);

        for d in REGISTER_MAP {
            let value = device.read(d.name).unwrap();
            let matches_kind = matches!(
                (d.kind, value),
                (ValueKind::Unsigned, Value::Unsigned(_))
                    | (ValueKind::Signed, Value::Signed(_))
                    | (ValueKind::Float, Value::Float(_))
                    | (ValueKind::Enumerated(_), Value::Code(_))
            );
            assert!(matches_kind, "{} decoded to {:?}", d.name, value);
            if let (ValueKind::Enumerated(set), Value::Code(code)) = (d.kind, value) {
                assert_eq!(code.set(), set);
            }
        }
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut device = ZeSg3Device::new(MockTransport::connected());

        device.set_cell_full_scale(2.0e-3).unwrap();
        assert_eq!(device.cell_full_scale().unwrap(), 2.0e-3);

        device.set_threshold_do2(-15.75).unwrap();
        assert_eq!(device.threshold_do2().unwrap(), -15.75);

        device.set_delta_time(300).unwrap();
        assert_eq!(device.delta_time().unwrap(), 300);

        device.set_automatic_tare_reset(0x0001_86A0).unwrap();
        assert_eq!(device.automatic_tare_reset().unwrap(), 100_000);

        device.set_measure_unit(MeasureUnit::Pound).unwrap();
        assert_eq!(device.measure_unit().unwrap(), MeasureUnit::Pound);

        device.set_advanced_adc_speed(AdcSpeed::Hz4_7).unwrap();
        assert_eq!(device.advanced_adc_speed().unwrap(), AdcSpeed::Hz4_7);

        device.write("manual_analog_output", Value::Unsigned(u32::MAX)).unwrap();
        assert_eq!(device.read("manual_analog_output").unwrap(), Value::Unsigned(u32::MAX));
    }

    #[test]
    fn two_word_fields_use_one_multi_register_write() {
        let mut device = ZeSg3Device::new(MockTransport::connected());
        device.set_one_piece_weight(1.0).unwrap();

        let transport = device.into_transport();
        assert_eq!(transport.calls, 1);
        assert_eq!(transport.memory.get(&47), Some(&0x3F80));
        assert_eq!(transport.memory.get(&48), Some(&0x0000));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut device = ZeSg3Device::new(MockTransport::connected());
        assert_eq!(device.read("flux_capacitor"), Err(DeviceError::UnknownField("flux_capacitor".to_string())));
        assert_eq!(
            device.write("flux_capacitor", Value::Unsigned(1)),
            Err(DeviceError::UnknownField("flux_capacitor".to_string()))
        );

        // Unknown names win over connection state
        let mut closed = ZeSg3Device::new(MockTransport::default());
        assert!(matches!(closed.read("flux_capacitor"), Err(DeviceError::UnknownField(_))));
        assert_eq!(closed.transport().calls, 0);
    }

    #[test]
    fn read_only_fields_reject_writes_without_transport_call() {
        let mut device = ZeSg3Device::new(MockTransport::connected());
        for d in REGISTER_MAP.iter().filter(|d| d.access == Access::ReadOnly) {
            let value = d.decode(&sample_words(d)).unwrap();
            assert_eq!(device.write(d.name, value), Err(DeviceError::NotWritable(d.name.to_string())));
        }
        assert_eq!(device.transport().calls, 0);
    }

    #[test]
    fn read_before_connect_fails_without_transport_call() {
        let mut device = ZeSg3Device::new(MockTransport::default());
        assert_eq!(device.read("firmware_version"), Err(DeviceError::NotConnected));
        assert_eq!(device.set_delta_time(10), Err(DeviceError::NotConnected));
        assert_eq!(device.transport().calls, 0);
    }

    #[test]
    fn open_twice_fails_fast_and_disconnect_is_idempotent() {
        let mut device = ZeSg3Device::new(MockTransport::default());
        device.open().unwrap();
        assert!(device.is_connected());
        assert!(matches!(device.open(), Err(DeviceError::AlreadyConnected(_))));

        device.disconnect();
        device.disconnect();
        assert!(!device.is_connected());
        assert_eq!(device.firmware_version(), Err(DeviceError::NotConnected));
    }

    #[test]
    fn transport_errors_surface_unchanged() {
        let mut transport = MockTransport::connected();
        transport.fail_with = Some(ModbusError::Timeout);
        let mut device = ZeSg3Device::new(transport);
        assert_eq!(device.net_weight(), Err(DeviceError::DeviceTimeout));
        assert_eq!(device.set_threshold_do1(1.0), Err(DeviceError::DeviceTimeout));

        let mut transport = MockTransport::connected();
        transport.fail_with = Some(ModbusError::Exception("Illegal data address".to_string()));
        let mut device = ZeSg3Device::new(transport);
        assert!(matches!(device.status(), Err(DeviceError::Exception(_))));
    }

    #[test]
    fn encode_errors_happen_before_transport_call() {
        let mut device = ZeSg3Device::new(MockTransport::connected());
        assert!(matches!(
            device.write("delta_time", Value::Float(1.0)),
            Err(DeviceError::Encode { .. })
        ));
        assert!(matches!(
            device.write("measure_unit", Value::Code(Code::Command(Command::Reboot))),
            Err(DeviceError::Encode { .. })
        ));
        assert_eq!(device.transport().calls, 0);
    }

    #[test]
    fn invalid_code_on_device_reads_raw_but_fails_typed_accessor() {
        let mut transport = MockTransport::connected();
        transport.preload(42, &[99]);
        let mut device = ZeSg3Device::new(transport);
        assert_eq!(
            device.read("denoise_filter_value").unwrap(),
            Value::Code(Code::Unknown { set: CodeSet::DenoiseFilter, code: 99 })
        );
        assert!(matches!(device.denoise_filter_value(), Err(DeviceError::Decode { .. })));
    }

    #[test]
    fn composite_registers_decode_into_structs() {
        let mut transport = MockTransport::connected();
        transport.preload(77, &[0b0101_0000]);
        transport.preload(69, &[0xFFFF, 0xFC18]);
        let mut device = ZeSg3Device::new(transport);

        let status = device.status().unwrap();
        assert!(status.stable_weight);
        assert!(status.digital_output_1_on);
        assert!(!status.net_weight_below_zero);
        assert_eq!(device.integer_net_weight().unwrap(), -1000);

        let mode = DoutMode {
            dout1_closed: false,
            dout2_closed: true,
            dout1_mode: 3,
            dout2_mode: 0,
        };
        device.set_dout_mode(mode).unwrap();
        assert_eq!(device.dout_mode().unwrap(), mode);

        let inputs = DigitalInputType {
            di1: true,
            ..Default::default()
        };
        device.set_digital_in_type(inputs).unwrap();
        assert_eq!(device.digital_in_type().unwrap(), inputs);
    }

    #[test]
    fn commands_write_their_code() {
        let mut device = ZeSg3Device::new(MockTransport::connected());
        device.acquire_tare().unwrap();
        assert_eq!(device.last_command().unwrap(), Some(Command::AcquireTareRam));
        assert_eq!(device.transport().memory.get(&79), Some(&49594));
    }

    #[test]
    fn idle_command_register_reads_as_no_command() {
        let mut device = ZeSg3Device::new(MockTransport::connected());
        assert_eq!(device.last_command().unwrap(), None);
        assert_eq!(
            device.read("command").unwrap(),
            Value::Code(Code::Unknown { set: CodeSet::Command, code: 0 })
        );
        assert!(matches!(
            device.write("command", Value::Code(Code::Unknown { set: CodeSet::Command, code: 7 })),
            Err(DeviceError::Encode { .. })
        ));
        assert_eq!(device.transport().calls, 2);
    }

    #[test]
    fn read_all_covers_every_field() {
        let mut transport = MockTransport::connected();
        for d in REGISTER_MAP {
            transport.preload(d.address, &sample_words(d));
        }
        let mut device = ZeSg3Device::new(transport);
        let values = device.read_all().unwrap();
        assert_eq!(values.len(), REGISTER_MAP.len());
        assert_eq!(values[0].0, "machine_id");
    }

    #[test]
    fn read_all_succeeds_on_fresh_and_garbage_memory() {
        let mut device = ZeSg3Device::new(MockTransport::connected());
        assert_eq!(device.read_all().unwrap().len(), REGISTER_MAP.len());

        let mut transport = MockTransport::connected();
        for d in REGISTER_MAP {
            transport.preload(d.address, &vec![0xBEEF; usize::from(d.words)]);
        }
        let mut device = ZeSg3Device::new(transport);
        let values = device.read_all().unwrap();
        assert_eq!(values.len(), REGISTER_MAP.len());
        let command = values.iter().find(|(name, _)| *name == "command").map(|(_, v)| *v);
        assert_eq!(command, Some(Value::Code(Code::Unknown { set: CodeSet::Command, code: 0xBEEF })));
    }
}
