//! ICM-426xx accelerometer/gyro driver over blocking SPI.
//!
//! The sensor exposes its register map through numbered user banks, and
//! `REG_BANK_SEL` must be written before touching a register outside the
//! currently selected bank. This driver selects the bank on every access
//! rather than caching it, so each call is correct regardless of what ran
//! before. All accesses go through `&mut self`, which makes the
//! select-then-transfer sequence non-reentrant by construction.
//!
//! Chip-select framing is owned by the [`SpiDevice`] the driver is built
//! on, so the same code runs against a dedicated bus or a shared one
//! behind `embedded-hal-bus`.

pub mod regs;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{Operation, SpiDevice};

use crate::imu::regs::Bank;

const SOFT_RESET_DELAY_MS: u32 = 10;
const POWER_ON_DELAY_MS: u32 = 100;
const CONFIG_SETTLE_DELAY_MS: u32 = 10;
const WAKE_SLEEP_DELAY_MS: u32 = 100;

/// Burst length for one accel + gyro sample, six big-endian `i16`s.
const MOTION_BURST_LEN: usize = 12;

/// Errors from the sensor transport or its identity check.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ImuError<E> {
    /// The underlying SPI transfer failed.
    #[display("SPI transfer failed")]
    Bus(#[error(not(source))] E),
    /// `WHO_AM_I` returned something other than the expected id.
    #[display("unexpected WHO_AM_I {found:#04x}")]
    Identity {
        /// The id the sensor actually reported.
        found: u8,
    },
}

impl<E> From<E> for ImuError<E> {
    fn from(bus: E) -> Self {
        Self::Bus(bus)
    }
}

/// One converted sensor reading in physical units.
#[derive(Clone, Copy, Debug, Default, PartialEq, defmt::Format)]
pub struct ImuSample {
    /// Accelerometer x, in g.
    pub ax: f32,
    /// Accelerometer y, in g.
    pub ay: f32,
    /// Accelerometer z, in g.
    pub az: f32,
    /// Gyro x, in degrees per second.
    pub gx: f32,
    /// Gyro y, in degrees per second.
    pub gy: f32,
    /// Gyro z, in degrees per second.
    pub gz: f32,
    /// Caller-supplied capture time, milliseconds since boot.
    pub timestamp_ms: u64,
}

/// ICM-426xx driver over a blocking [`SpiDevice`] plus a delay source.
pub struct Icm426xx<SPI, D> {
    spi: SPI,
    delay: D,
}

impl<SPI, D> Icm426xx<SPI, D>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    /// Wrap an already-configured SPI device. No bus traffic until
    /// [`soft_reset`](Self::soft_reset) runs.
    pub fn new(spi: SPI, delay: D) -> Self {
        Self { spi, delay }
    }

    /// Release the SPI device and delay source.
    pub fn release(self) -> (SPI, D) {
        (self.spi, self.delay)
    }

    /// Reset the sensor and verify its identity.
    ///
    /// Issues a soft reset, re-selects bank 0 (reset clears the bank
    /// selection), programs the interface clock and powers the sensors,
    /// then reads `WHO_AM_I`.
    ///
    /// # Errors
    ///
    /// [`ImuError::Bus`] on a failed transfer, [`ImuError::Identity`] if
    /// the id read back is not [`regs::WHO_AM_I_EXPECTED`]. An identity
    /// mismatch is reported, not retried; the caller decides whether to
    /// continue without motion sensing.
    pub fn soft_reset(&mut self) -> Result<(), ImuError<SPI::Error>> {
        self.write_reg(Bank::Bank0, regs::B0_DEVICE_CONFIG, regs::DEVICE_CONFIG_SOFT_RESET)?;
        self.delay.delay_ms(SOFT_RESET_DELAY_MS);

        self.select_bank(Bank::Bank0)?;
        self.write_reg(Bank::Bank0, regs::B0_INTF_CONFIG1, regs::INTF_CONFIG1_CLKSEL_PLL)?;
        self.write_reg(Bank::Bank0, regs::B0_PWR_MGMT0, regs::PWR_MGMT0_ACCEL_LP)?;
        self.delay.delay_ms(POWER_ON_DELAY_MS);

        let found = self.read_reg(Bank::Bank0, regs::B0_WHO_AM_I)?;
        if found == regs::WHO_AM_I_EXPECTED {
            Ok(())
        } else {
            Err(ImuError::Identity { found })
        }
    }

    /// Program measurement, interrupt, and wake-on-motion configuration.
    ///
    /// Powers the accel, sets +-2 g at 50 Hz, routes WOM and SMD to INT1,
    /// enables the short-window significant-motion detector, writes the
    /// per-axis WOM thresholds in bank 4, and returns to bank 0.
    ///
    /// # Errors
    ///
    /// [`ImuError::Bus`] on a failed transfer.
    pub fn init(&mut self) -> Result<(), ImuError<SPI::Error>> {
        self.write_reg(Bank::Bank0, regs::B0_PWR_MGMT0, regs::PWR_MGMT0_ACCEL_LP)?;
        self.write_reg(Bank::Bank0, regs::B0_ACCEL_CONFIG0, regs::ACCEL_CONFIG0_2G_50HZ)?;

        self.write_reg(Bank::Bank0, regs::B0_INT_CONFIG, 0x00)?;
        self.write_reg(Bank::Bank0, regs::B0_INT_CONFIG0, 0x00)?;
        self.write_reg(Bank::Bank0, regs::B0_INT_CONFIG1, 0x00)?;

        self.write_reg(Bank::Bank0, regs::B0_INT_SOURCE0, 0x00)?;
        self.write_reg(Bank::Bank0, regs::B0_INT_SOURCE1, regs::INT_SOURCE1_WOM_SMD_INT1)?;
        self.write_reg(Bank::Bank0, regs::B0_INT_SOURCE2, 0x00)?;
        self.write_reg(Bank::Bank0, regs::B0_INT_SOURCE3, 0x00)?;

        self.write_reg(Bank::Bank0, regs::B0_SMD_CONFIG, regs::SMD_CONFIG_WOM_SMD_SHORT)?;
        self.delay.delay_ms(CONFIG_SETTLE_DELAY_MS);

        self.write_reg(Bank::Bank4, regs::B4_ACCEL_WOM_X_THR, regs::ACCEL_WOM_THRESHOLD)?;
        self.write_reg(Bank::Bank4, regs::B4_ACCEL_WOM_Y_THR, regs::ACCEL_WOM_THRESHOLD)?;
        self.write_reg(Bank::Bank4, regs::B4_ACCEL_WOM_Z_THR, regs::ACCEL_WOM_THRESHOLD)?;
        self.delay.delay_ms(CONFIG_SETTLE_DELAY_MS);

        self.select_bank(Bank::Bank0)?;
        Ok(())
    }

    /// Read (and thereby clear) the latched interrupt status.
    ///
    /// # Errors
    ///
    /// [`ImuError::Bus`] on a failed transfer.
    pub fn interrupt_status(&mut self) -> Result<u8, ImuError<SPI::Error>> {
        Ok(self.read_reg(Bank::Bank0, regs::B0_INT_STATUS)?)
    }

    /// One burst read of the six motion registers as raw counts.
    ///
    /// Returns `[ax, ay, az, gx, gy, gz]` straight from the sensor.
    ///
    /// # Errors
    ///
    /// [`ImuError::Bus`] on a failed transfer.
    pub fn read_motion_burst(&mut self) -> Result<[i16; 6], ImuError<SPI::Error>> {
        let mut raw = [0u8; MOTION_BURST_LEN];
        self.read_regs(Bank::Bank0, regs::B0_ACCEL_DATA_X1, &mut raw)?;

        let mut counts = [0i16; 6];
        for (axis, bytes) in counts.iter_mut().zip(raw.chunks_exact(2)) {
            *axis = i16::from_be_bytes([bytes[0], bytes[1]]);
        }
        Ok(counts)
    }

    /// Read one sample and convert it to g / degrees-per-second.
    ///
    /// `timestamp_ms` is stamped onto the sample unchanged; the driver has
    /// no clock of its own.
    ///
    /// # Errors
    ///
    /// [`ImuError::Bus`] on a failed transfer.
    pub fn sample(&mut self, timestamp_ms: u64) -> Result<ImuSample, ImuError<SPI::Error>> {
        let [ax, ay, az, gx, gy, gz] = self.read_motion_burst()?;
        Ok(ImuSample {
            ax: f32::from(ax) / regs::ACCEL_LSB_PER_G,
            ay: f32::from(ay) / regs::ACCEL_LSB_PER_G,
            az: f32::from(az) / regs::ACCEL_LSB_PER_G,
            gx: f32::from(gx) / regs::GYRO_LSB_PER_DPS,
            gy: f32::from(gy) / regs::GYRO_LSB_PER_DPS,
            gz: f32::from(gz) / regs::GYRO_LSB_PER_DPS,
            timestamp_ms,
        })
    }

    /// Idle the sensor, leaving wake-on-motion armed.
    ///
    /// Read-modify-write of the `PWR_MGMT0` idle bit so the rest of the
    /// power configuration survives.
    ///
    /// # Errors
    ///
    /// [`ImuError::Bus`] on a failed transfer.
    pub fn wom_sleep(&mut self) -> Result<(), ImuError<SPI::Error>> {
        let power = self.read_reg(Bank::Bank0, regs::B0_PWR_MGMT0)?;
        self.write_reg(Bank::Bank0, regs::B0_PWR_MGMT0, power | regs::PWR_MGMT0_IDLE)?;
        self.delay.delay_ms(WAKE_SLEEP_DELAY_MS);
        Ok(())
    }

    /// Clear the idle bit and give the sensor time to resume.
    ///
    /// # Errors
    ///
    /// [`ImuError::Bus`] on a failed transfer.
    pub fn wake(&mut self) -> Result<(), ImuError<SPI::Error>> {
        let power = self.read_reg(Bank::Bank0, regs::B0_PWR_MGMT0)?;
        self.write_reg(Bank::Bank0, regs::B0_PWR_MGMT0, power & !regs::PWR_MGMT0_IDLE)?;
        self.delay.delay_ms(WAKE_SLEEP_DELAY_MS);
        Ok(())
    }

    // ==========================================================
    // Register plumbing. Every access selects the bank first.
    // ==========================================================

    fn select_bank(&mut self, bank: Bank) -> Result<(), SPI::Error> {
        self.spi.write(&[regs::REG_BANK_SEL, bank as u8])
    }

    fn write_reg(&mut self, bank: Bank, reg: u8, value: u8) -> Result<(), SPI::Error> {
        self.select_bank(bank)?;
        self.spi.write(&[reg, value])
    }

    fn read_reg(&mut self, bank: Bank, reg: u8) -> Result<u8, SPI::Error> {
        let mut value = [0u8; 1];
        self.read_regs(bank, reg, &mut value)?;
        Ok(value[0])
    }

    fn read_regs(&mut self, bank: Bank, reg: u8, buffer: &mut [u8]) -> Result<(), SPI::Error> {
        self.select_bank(bank)?;
        self.spi.transaction(&mut [
            Operation::Write(&[regs::READ | reg]),
            Operation::Read(buffer),
        ])
    }
}
