use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Process-wide power state shared between the control loop and the coms
/// servicing path.
///
/// Every field is an individually atomic cell sized for single load/store
/// access on the M0+. There is deliberately no cross-field locking: a
/// telemetry word may pair a fresh setpoint with a measurement from the
/// previous control cycle. Consistency is per-field eventual only.
pub struct SharedPowerState {
    // --- setpoints (commanded by the host) ---
    set_voltage: AtomicU32,
    set_current: AtomicU32,

    // --- measurements (probed by this board, filtered) ---
    probe_voltage_output: AtomicU32,
    probe_current: AtomicU32,
    probe_internal_temperature: AtomicU32,

    // --- enable logic ---
    internal_enable: AtomicBool,
    external_enable: AtomicBool,
    output_enabled: AtomicBool,

    // --- warning lamp ---
    warn_lamp_test: AtomicBool,
    warn_lamp_on: AtomicBool,
    last_warn_blink_time_ms: AtomicU32,

    // --- spare digital output ---
    example_out: AtomicBool,
}

impl SharedPowerState {
    pub const fn new() -> SharedPowerState {
        SharedPowerState {
            set_voltage: AtomicU32::new(0),
            set_current: AtomicU32::new(0),
            probe_voltage_output: AtomicU32::new(0),
            probe_current: AtomicU32::new(0),
            probe_internal_temperature: AtomicU32::new(0),
            internal_enable: AtomicBool::new(false),
            external_enable: AtomicBool::new(false),
            output_enabled: AtomicBool::new(false),
            warn_lamp_test: AtomicBool::new(false),
            warn_lamp_on: AtomicBool::new(false),
            last_warn_blink_time_ms: AtomicU32::new(0),
            example_out: AtomicBool::new(false),
        }
    }

    pub fn get_state(&self) -> PowerState {
        PowerState {
            set_voltage: self.get_set_voltage(),
            set_current: self.get_set_current(),
            probe_voltage_output: self.get_probe_voltage_output(),
            probe_current: self.get_probe_current(),
            probe_internal_temperature: self.get_probe_internal_temperature(),
            internal_enable: self.get_internal_enable(),
            external_enable: self.get_external_enable(),
            output_enabled: self.get_output_enabled(),
            warn_lamp_test: self.get_warn_lamp_test(),
            warn_lamp_on: self.get_warn_lamp_on(),
            example_out: self.get_example_out(),
        }
    }

    pub fn get_set_voltage(&self) -> f32 {
        f32::from_bits(self.set_voltage.load(Ordering::Relaxed))
    }

    pub fn set_set_voltage(&self, volts: f32) {
        self.set_voltage.store(volts.to_bits(), Ordering::Relaxed);
    }

    pub fn get_set_current(&self) -> f32 {
        f32::from_bits(self.set_current.load(Ordering::Relaxed))
    }

    pub fn set_set_current(&self, amps: f32) {
        self.set_current.store(amps.to_bits(), Ordering::Relaxed);
    }

    pub fn get_probe_voltage_output(&self) -> f32 {
        f32::from_bits(self.probe_voltage_output.load(Ordering::Relaxed))
    }

    pub fn set_probe_voltage_output(&self, volts: f32) {
        self.probe_voltage_output.store(volts.to_bits(), Ordering::Relaxed);
    }

    pub fn get_probe_current(&self) -> f32 {
        f32::from_bits(self.probe_current.load(Ordering::Relaxed))
    }

    pub fn set_probe_current(&self, amps: f32) {
        self.probe_current.store(amps.to_bits(), Ordering::Relaxed);
    }

    pub fn get_probe_internal_temperature(&self) -> f32 {
        f32::from_bits(self.probe_internal_temperature.load(Ordering::Relaxed))
    }

    pub fn set_probe_internal_temperature(&self, deg_c: f32) {
        self.probe_internal_temperature
            .store(deg_c.to_bits(), Ordering::Relaxed);
    }

    pub fn get_internal_enable(&self) -> bool {
        self.internal_enable.load(Ordering::Relaxed)
    }

    pub fn set_internal_enable(&self, enable: bool) {
        self.internal_enable.store(enable, Ordering::Relaxed);
    }

    pub fn get_external_enable(&self) -> bool {
        self.external_enable.load(Ordering::Relaxed)
    }

    pub fn set_external_enable(&self, enable: bool) {
        self.external_enable.store(enable, Ordering::Relaxed);
    }

    pub fn get_output_enabled(&self) -> bool {
        self.output_enabled.load(Ordering::Relaxed)
    }

    pub fn set_output_enabled(&self, enabled: bool) {
        self.output_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn get_warn_lamp_test(&self) -> bool {
        self.warn_lamp_test.load(Ordering::Relaxed)
    }

    pub fn set_warn_lamp_test(&self, test_active: bool) {
        self.warn_lamp_test.store(test_active, Ordering::Relaxed);
    }

    pub fn get_warn_lamp_on(&self) -> bool {
        self.warn_lamp_on.load(Ordering::Relaxed)
    }

    pub fn set_warn_lamp_on(&self, on: bool) {
        self.warn_lamp_on.store(on, Ordering::Relaxed);
    }

    pub fn get_last_warn_blink_time_ms(&self) -> u32 {
        self.last_warn_blink_time_ms.load(Ordering::Relaxed)
    }

    pub fn set_last_warn_blink_time_ms(&self, time_ms: u32) {
        self.last_warn_blink_time_ms.store(time_ms, Ordering::Relaxed);
    }

    pub fn get_example_out(&self) -> bool {
        self.example_out.load(Ordering::Relaxed)
    }

    pub fn set_example_out(&self, out_active: bool) {
        self.example_out.store(out_active, Ordering::Relaxed);
    }
}

impl Default for SharedPowerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the shared state, for logging and telemetry.
#[derive(Clone, Copy, PartialEq, Debug, defmt::Format)]
pub struct PowerState {
    pub set_voltage: f32,
    pub set_current: f32,
    pub probe_voltage_output: f32,
    pub probe_current: f32,
    pub probe_internal_temperature: f32,
    pub internal_enable: bool,
    pub external_enable: bool,
    pub output_enabled: bool,
    pub warn_lamp_test: bool,
    pub warn_lamp_on: bool,
    pub example_out: bool,
}
