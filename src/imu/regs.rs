//! ICM-426xx register map, split by user bank.
//!
//! Register addresses repeat across banks, so every address constant is
//! prefixed with the bank it lives in. `REG_BANK_SEL` itself is visible
//! from every bank.
#![expect(
    missing_docs,
    reason = "Register names follow the datasheet and document themselves."
)]

/// Set on the address byte for a register read. Writes leave it clear.
pub const READ: u8 = 0x80;

/// Value `WHO_AM_I` must return.
pub const WHO_AM_I_EXPECTED: u8 = 0x5C;

/// Register bank selector, written directly with the bank number.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub enum Bank {
    Bank0 = 0x00,
    Bank1 = 0x01,
    Bank2 = 0x02,
    Bank3 = 0x03,
    Bank4 = 0x04,
}

// Bank 0.
pub const B0_DEVICE_CONFIG: u8 = 0x11;
pub const B0_INT_CONFIG: u8 = 0x14;
pub const B0_ACCEL_DATA_X1: u8 = 0x1F;
pub const B0_INT_STATUS: u8 = 0x2D;
pub const B0_INTF_CONFIG1: u8 = 0x4D;
pub const B0_PWR_MGMT0: u8 = 0x4E;
pub const B0_ACCEL_CONFIG0: u8 = 0x50;
pub const B0_SMD_CONFIG: u8 = 0x57;
pub const B0_INT_CONFIG0: u8 = 0x63;
pub const B0_INT_CONFIG1: u8 = 0x64;
pub const B0_INT_SOURCE0: u8 = 0x65;
pub const B0_INT_SOURCE1: u8 = 0x66;
pub const B0_INT_SOURCE2: u8 = 0x67;
pub const B0_INT_SOURCE3: u8 = 0x68;
pub const B0_WHO_AM_I: u8 = 0x75;
pub const REG_BANK_SEL: u8 = 0x76;

// Bank 4, wake-on-motion thresholds.
pub const B4_ACCEL_WOM_X_THR: u8 = 0x4A;
pub const B4_ACCEL_WOM_Y_THR: u8 = 0x4B;
pub const B4_ACCEL_WOM_Z_THR: u8 = 0x4C;

// Field values.

/// `DEVICE_CONFIG` soft reset bit.
pub const DEVICE_CONFIG_SOFT_RESET: u8 = 0x01;
/// `INTF_CONFIG1` RTC clock input enabled.
pub const INTF_CONFIG1_CLKSEL_PLL: u8 = 0x01;
/// `PWR_MGMT0` accel in low-power mode, gyro off.
pub const PWR_MGMT0_ACCEL_LP: u8 = 0x06;
/// `PWR_MGMT0` idle bit, set to sleep the sensor.
pub const PWR_MGMT0_IDLE: u8 = 0x40;
/// `ACCEL_CONFIG0` full scale +-2 g, ODR 50 Hz.
pub const ACCEL_CONFIG0_2G_50HZ: u8 = 0x09;
/// `INT_SOURCE1` wake-on-motion on all three axes plus SMD, routed to INT1.
pub const INT_SOURCE1_WOM_SMD_INT1: u8 = 0x0F;
/// `SMD_CONFIG` WOM compare to previous sample, SMD short window.
pub const SMD_CONFIG_WOM_SMD_SHORT: u8 = 0x0A;
/// Per-axis wake-on-motion threshold, roughly 0.2 g.
pub const ACCEL_WOM_THRESHOLD: u8 = 0x30;

// Sensitivities for the full-scale ranges programmed by `init`.

/// Accelerometer LSB per g at +-2 g full scale.
pub const ACCEL_LSB_PER_G: f32 = 16384.0;
/// Gyro LSB per degree-per-second at +-250 dps full scale.
pub const GYRO_LSB_PER_DPS: f32 = 131.0;
