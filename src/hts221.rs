//! * Driver for the HTS221 humidity sensor
//! See `http://www.st.com/content/st_com/en/products/mems-and-sensors/humidity-sensors/hts221.html`

use std::io;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use measurements::Temperature;

use bus::{I2cBus, Transport};
use calibration::Calibration;
use registers::*;
use rh::RelativeHumidity;
use settings::{decode_av_conf, encode_av_conf, AvgH, AvgT, OutputDataRate};
use super::{Hts221Error, Hts221Result};

/// Largest payload `write_register` will frame. Enough for the whole
/// calibration block.
pub const MAX_WRITE_LEN: usize = CALIBRATION_LEN;

/// Contents of STATUS_REG.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Status(u8);

impl Status {
    /// A new temperature sample is waiting in TEMP_OUT.
    pub fn temperature_available(&self) -> bool {
        (self.0 & STATUS_T_DA) != 0
    }

    /// A new humidity sample is waiting in HUMIDITY_OUT.
    pub fn humidity_available(&self) -> bool {
        (self.0 & STATUS_H_DA) != 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

/// One reading of both channels.
#[derive(Debug, Copy, Clone)]
pub struct Measurement {
    pub temperature: Temperature,
    pub humidity: RelativeHumidity,
}

pub struct Hts221<T: Transport> {
    bus: T,
    calibration: Option<Calibration>,
}

impl Hts221<I2cBus> {
    /// Open the sensor on the I2C bus device node at `path`, at its fixed
    /// slave address. Call `begin()` before taking readings.
    pub fn open<P: AsRef<Path>>(path: P) -> Hts221Result<Hts221<I2cBus>> {
        Ok(Hts221::new(I2cBus::open(path, I2C_ADDRESS)?))
    }
}

impl<T> Hts221<T>
where
    T: Transport,
{
    /// Wrap a transport already bound to the sensor. No bus traffic happens
    /// until `begin()`.
    pub fn new(bus: T) -> Hts221<T> {
        Hts221 {
            bus,
            calibration: None,
        }
    }

    /// Check we are talking to an HTS221, put it into a known state and
    /// capture its calibration.
    ///
    /// The device is left powered down with block data update on and a
    /// 1 Hz output data rate. Call `enable()` to start converting.
    pub fn begin(&mut self) -> Hts221Result<()> {
        let id = self.read_id()?;
        if id != WHO_AM_I_VALUE {
            warn!(
                "WHO_AM_I returned 0x{:02x}, expected 0x{:02x}",
                id, WHO_AM_I_VALUE
            );
            return Err(Hts221Error::WrongDevice(id));
        }

        self.disable()?;
        self.set_block_data_update(true)?;
        self.set_output_data_rate(OutputDataRate::Hz1)?;

        let mut buf = [0u8; CALIBRATION_LEN];
        self.read_register(REG_H0_H_2, &mut buf)?;
        let calibration = Calibration::from_registers(&buf);
        debug!("calibration {:?}", calibration);
        self.calibration = Some(calibration);
        Ok(())
    }

    /// Power the device down. Calibration is kept, so `enable()` resumes.
    pub fn end(&mut self) -> Hts221Result<()> {
        self.disable()
    }

    /// Leave power-down mode.
    pub fn enable(&mut self) -> Hts221Result<()> {
        self.modify_register(REG_CTRL1, |reg| reg | CTRL1_PD)?;
        debug!("powered up");
        Ok(())
    }

    /// Enter power-down mode.
    pub fn disable(&mut self) -> Hts221Result<()> {
        self.modify_register(REG_CTRL1, |reg| reg & !CTRL1_PD)?;
        debug!("powered down");
        Ok(())
    }

    pub fn is_enabled(&mut self) -> Hts221Result<bool> {
        Ok((self.read_reg(REG_CTRL1)? & CTRL1_PD) != 0)
    }

    /// Read the WHO_AM_I register.
    pub fn read_id(&mut self) -> Hts221Result<u8> {
        self.read_reg(REG_WHO_AM_I)
    }

    /// Reboot the memory content, reloading the factory calibration.
    ///
    /// Returns as soon as the BOOT bit is written. The caller must give the
    /// device its boot time before touching it again.
    pub fn reset(&mut self) -> Hts221Result<()> {
        self.modify_register(REG_CTRL2, |reg| reg | CTRL2_BOOT)?;
        debug!("reboot requested");
        Ok(())
    }

    /// Obtain the status bitfield from the chip.
    pub fn status(&mut self) -> Hts221Result<Status> {
        self.read_reg(REG_STATUS).map(Status)
    }

    /// Start a single conversion. Only meaningful at the one-shot data rate.
    pub fn trigger_one_shot(&mut self) -> Hts221Result<()> {
        self.modify_register(REG_CTRL2, |reg| reg | CTRL2_ONE_SHOT)
    }

    pub fn set_heater(&mut self, on: bool) -> Hts221Result<()> {
        self.modify_register(REG_CTRL2, |reg| {
            if on {
                reg | CTRL2_HEATER
            } else {
                reg & !CTRL2_HEATER
            }
        })
    }

    /// With block data update on, the output registers are not refreshed
    /// between reading the low and high byte of a sample.
    pub fn set_block_data_update(&mut self, on: bool) -> Hts221Result<()> {
        self.modify_register(REG_CTRL1, |reg| {
            if on {
                reg | CTRL1_BDU
            } else {
                reg & !CTRL1_BDU
            }
        })
    }

    pub fn averaging(&mut self) -> Hts221Result<(AvgH, AvgT)> {
        self.read_reg(REG_AV_CONF).map(decode_av_conf)
    }

    pub fn set_averaging(&mut self, humidity: AvgH, temperature: AvgT) -> Hts221Result<()> {
        self.modify_register(REG_AV_CONF, |reg| encode_av_conf(reg, humidity, temperature))
    }

    pub fn output_data_rate(&mut self) -> Hts221Result<OutputDataRate> {
        self.read_reg(REG_CTRL1).map(OutputDataRate::from_ctrl1)
    }

    pub fn set_output_data_rate(&mut self, odr: OutputDataRate) -> Hts221Result<()> {
        self.modify_register(REG_CTRL1, |reg| (reg & !CTRL1_ODR_MASK) | odr.bits())?;
        debug!("output data rate {}", odr);
        Ok(())
    }

    /// Output data rate in Hz; 0 means one-shot.
    pub fn get_odr(&mut self) -> Hts221Result<f32> {
        self.output_data_rate().map(OutputDataRate::hz)
    }

    /// Set the output data rate from a frequency in Hz. Only 0 (one-shot),
    /// 1, 7 and 12.5 are available; anything else is rejected without
    /// touching the device.
    pub fn set_odr(&mut self, hz: f32) -> Hts221Result<()> {
        match OutputDataRate::from_hz(hz) {
            Some(odr) => self.set_output_data_rate(odr),
            None => Err(Hts221Error::UnsupportedOdr(hz)),
        }
    }

    /// The calibration captured by `begin()`.
    pub fn calibration(&self) -> Hts221Result<&Calibration> {
        self.calibration.as_ref().ok_or(Hts221Error::NotCalibrated)
    }

    /// Raw humidity ADC count.
    pub fn get_raw_humidity(&mut self) -> Hts221Result<i16> {
        self.read_i16(REG_HUMIDITY_OUT_L)
    }

    /// Raw temperature ADC count.
    pub fn get_raw_temperature(&mut self) -> Hts221Result<i16> {
        self.read_i16(REG_TEMP_OUT_L)
    }

    /// Relative humidity in percent.
    pub fn get_humidity(&mut self) -> Hts221Result<f64> {
        let calibration = *self.calibration()?;
        self.get_raw_humidity().map(|raw| calibration.humidity(raw))
    }

    /// Temperature in degrees Celsius.
    pub fn get_temperature(&mut self) -> Hts221Result<f64> {
        let calibration = *self.calibration()?;
        self.get_raw_temperature()
            .map(|raw| calibration.temperature(raw))
    }

    /// Read both channels.
    pub fn measure(&mut self) -> Hts221Result<Measurement> {
        let celsius = self.get_temperature()?;
        let percent = self.get_humidity()?;
        Ok(Measurement {
            temperature: Temperature::from_celsius(celsius),
            humidity: RelativeHumidity::from_percent(percent),
        })
    }

    /// Read one register.
    pub fn read_reg(&mut self, address: u8) -> Hts221Result<u8> {
        let mut buf = [0u8; 1];
        self.read_register(address, &mut buf)?;
        Ok(buf[0])
    }

    /// Write one register.
    pub fn write_reg(&mut self, address: u8, value: u8) -> Hts221Result<()> {
        self.write_register(address, &[value])
    }

    /// Read `buf.len()` consecutive registers starting at `address`.
    ///
    /// This is two transactions: the sub-address is written, then the data
    /// is read. Nothing stops another bus user from slipping in between.
    pub fn read_register(&mut self, address: u8, buf: &mut [u8]) -> Hts221Result<()> {
        let sub = sub_address(address, buf.len());
        let written = self.bus.write(&[sub])?;
        if written != 1 {
            return Err(short_write(1, written));
        }
        let read = self.bus.read(buf)?;
        if read != buf.len() {
            return Err(Hts221Error::IoError(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "short read from 0x{:02x}: {} of {} bytes",
                    address,
                    read,
                    buf.len()
                ),
            )));
        }
        trace!("read 0x{:02x}: {:02x?}", address, buf);
        Ok(())
    }

    /// Write `data` to consecutive registers starting at `address`, as one
    /// `[address, data...]` frame.
    pub fn write_register(&mut self, address: u8, data: &[u8]) -> Hts221Result<()> {
        if data.len() > MAX_WRITE_LEN {
            return Err(Hts221Error::IoError(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "{} byte write exceeds the {} byte limit",
                    data.len(),
                    MAX_WRITE_LEN
                ),
            )));
        }
        let mut frame = [0u8; MAX_WRITE_LEN + 1];
        frame[0] = sub_address(address, data.len());
        frame[1..=data.len()].copy_from_slice(data);
        let frame = &frame[..=data.len()];

        let written = self.bus.write(frame)?;
        if written != frame.len() {
            return Err(short_write(frame.len(), written));
        }
        trace!("wrote 0x{:02x}: {:02x?}", address, data);
        Ok(())
    }

    /// Read a register, pass it through `f` and write the result back.
    pub fn modify_register<F>(&mut self, address: u8, f: F) -> Hts221Result<()>
    where
        F: FnOnce(u8) -> u8,
    {
        let value = self.read_reg(address)?;
        self.write_reg(address, f(value))
    }

    /// Give the transport back.
    pub fn release(self) -> T {
        self.bus
    }

    pub fn bus(&self) -> &T {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut T {
        &mut self.bus
    }

    fn read_i16(&mut self, address: u8) -> Hts221Result<i16> {
        let mut buf = [0u8; 2];
        self.read_register(address, &mut buf)?;
        Ok(LittleEndian::read_i16(&buf))
    }
}

fn sub_address(address: u8, len: usize) -> u8 {
    if len > 1 {
        address | AUTO_INCREMENT
    } else {
        address
    }
}

fn short_write(expected: usize, written: usize) -> Hts221Error {
    Hts221Error::IoError(io::Error::new(
        io::ErrorKind::WriteZero,
        format!("short write: {} of {} bytes", written, expected),
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use mock::MockBus;

    /// H0 = 20 %RH @ 200, H1 = 70 %RH @ 700, T0 = 20 °C @ 200, T1 = 70 °C @ 700.
    const CALIBRATION: [u8; CALIBRATION_LEN] = [
        40, 140, 160, 0x30, 0x00, 0x08, 0xc8, 0x00, 0x00, 0x00, 0xbc, 0x02, 0xc8, 0x00, 0xbc, 0x02,
    ];

    fn calibrated_bus() -> MockBus {
        let mut bus = MockBus::hts221();
        bus.set_registers(REG_H0_H_2, &CALIBRATION);
        bus
    }

    fn started() -> Hts221<MockBus> {
        let mut hts = Hts221::new(calibrated_bus());
        hts.begin().unwrap();
        hts
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "{} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn register_round_trip() {
        let mut hts = Hts221::new(MockBus::new());
        for address in 0x10..0x40u8 {
            let data = [address, !address];
            hts.write_register(address, &data).unwrap();
            let mut back = [0u8; 2];
            hts.read_register(address, &mut back).unwrap();
            assert_eq!(back, data);

            hts.write_register(address, &[0x5a]).unwrap();
            let mut one = [0u8; 1];
            hts.read_register(address, &mut one).unwrap();
            assert_eq!(one, [0x5a]);
        }
    }

    #[test]
    fn multi_byte_read_sets_auto_increment() {
        let mut bus = MockBus::new();
        bus.set_registers(REG_HUMIDITY_OUT_L, &[0x34, 0x12]);
        let mut hts = Hts221::new(bus);
        // The mock only advances when the sub-address asks it to.
        assert_eq!(hts.get_raw_humidity().unwrap(), 0x1234);
    }

    #[test]
    fn oversized_write_rejected_without_traffic() {
        let mut hts = Hts221::new(MockBus::new());
        let data = [0u8; MAX_WRITE_LEN + 1];
        match hts.write_register(0x10, &data) {
            Err(Hts221Error::IoError(ref e)) => assert_eq!(e.kind(), io::ErrorKind::InvalidInput),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(hts.bus().transactions(), 0);
    }

    #[test]
    fn begin_checks_identity() {
        let mut bus = calibrated_bus();
        bus.set_registers(REG_WHO_AM_I, &[0xbd]);
        let mut hts = Hts221::new(bus);
        match hts.begin() {
            Err(Hts221Error::WrongDevice(0xbd)) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(hts.calibration().is_err());
    }

    #[test]
    fn begin_configures_device() {
        let mut bus = calibrated_bus();
        bus.set_registers(REG_CTRL1, &[CTRL1_PD | 0x03]);
        let mut hts = Hts221::new(bus);
        hts.begin().unwrap();
        assert_eq!(hts.bus().register(REG_CTRL1), CTRL1_BDU | 0x01);
        assert!(hts.calibration().is_ok());
    }

    #[test]
    fn read_id() {
        let mut hts = Hts221::new(MockBus::hts221());
        assert_eq!(hts.read_id().unwrap(), WHO_AM_I_VALUE);
    }

    #[test]
    fn enable_disable_preserve_other_bits() {
        let mut hts = started();
        hts.write_reg(REG_CTRL1, 0x06).unwrap();
        hts.enable().unwrap();
        assert_eq!(hts.bus().register(REG_CTRL1), 0x86);
        assert!(hts.is_enabled().unwrap());
        hts.disable().unwrap();
        assert_eq!(hts.bus().register(REG_CTRL1), 0x06);
        assert!(!hts.is_enabled().unwrap());
    }

    #[test]
    fn end_powers_down() {
        let mut hts = started();
        hts.enable().unwrap();
        hts.end().unwrap();
        assert!(!hts.is_enabled().unwrap());
    }

    #[test]
    fn converts_readings() {
        let mut hts = started();
        hts.bus_mut().set_registers(REG_HUMIDITY_OUT_L, &[0xc2, 0x01]); // 450
        hts.bus_mut().set_registers(REG_TEMP_OUT_L, &[0x2c, 0x01]); // 300
        assert_close(hts.get_humidity().unwrap(), 45.0);
        assert_close(hts.get_temperature().unwrap(), 30.0);

        let m = hts.measure().unwrap();
        assert_close(m.temperature.as_celsius(), 30.0);
        assert_close(m.humidity.as_percent(), 45.0);
    }

    #[test]
    fn readings_rereads_hardware() {
        let mut hts = started();
        hts.bus_mut().set_registers(REG_TEMP_OUT_L, &[0xc8, 0x00]); // 200
        assert_close(hts.get_temperature().unwrap(), 20.0);
        hts.bus_mut().set_registers(REG_TEMP_OUT_L, &[0xbc, 0x02]); // 700
        assert_close(hts.get_temperature().unwrap(), 70.0);
    }

    #[test]
    fn readings_need_calibration() {
        let mut hts = Hts221::new(calibrated_bus());
        match hts.get_humidity() {
            Err(Hts221Error::NotCalibrated) => {}
            other => panic!("unexpected {:?}", other),
        }
        match hts.get_temperature() {
            Err(Hts221Error::NotCalibrated) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(hts.bus().transactions(), 0);
    }

    #[test]
    fn odr_get_and_set() {
        let mut hts = started();
        assert_eq!(hts.get_odr().unwrap(), 1.0);
        hts.set_odr(12.5).unwrap();
        assert_eq!(hts.output_data_rate().unwrap(), OutputDataRate::Hz12p5);
        assert_eq!(hts.bus().register(REG_CTRL1), CTRL1_BDU | 0x03);
        hts.set_odr(0.0).unwrap();
        assert_eq!(hts.get_odr().unwrap(), 0.0);
    }

    #[test]
    fn unsupported_odr_leaves_register() {
        let mut hts = started();
        let before = hts.bus().register(REG_CTRL1);
        let transactions = hts.bus().transactions();
        match hts.set_odr(3.0) {
            Err(Hts221Error::UnsupportedOdr(hz)) => assert_eq!(hz, 3.0),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(hts.bus().register(REG_CTRL1), before);
        assert_eq!(hts.bus().transactions(), transactions);
    }

    #[test]
    fn reset_sets_boot_bit() {
        let mut hts = started();
        hts.write_reg(REG_CTRL2, CTRL2_HEATER).unwrap();
        hts.reset().unwrap();
        assert_eq!(hts.bus().register(REG_CTRL2), CTRL2_BOOT | CTRL2_HEATER);
    }

    #[test]
    fn one_shot_and_heater() {
        let mut hts = started();
        hts.set_heater(true).unwrap();
        hts.trigger_one_shot().unwrap();
        assert_eq!(
            hts.bus().register(REG_CTRL2),
            CTRL2_HEATER | CTRL2_ONE_SHOT
        );
        hts.set_heater(false).unwrap();
        assert_eq!(hts.bus().register(REG_CTRL2), CTRL2_ONE_SHOT);
    }

    #[test]
    fn status_flags() {
        let mut hts = started();
        hts.bus_mut().set_registers(REG_STATUS, &[STATUS_H_DA]);
        let status = hts.status().unwrap();
        assert!(status.humidity_available());
        assert!(!status.temperature_available());
    }

    #[test]
    fn averaging_round_trip() {
        let mut hts = started();
        hts.bus_mut().set_registers(REG_AV_CONF, &[0x1b]);
        assert_eq!(hts.averaging().unwrap(), (AvgH::Avg32, AvgT::Avg16));
        hts.set_averaging(AvgH::Avg512, AvgT::Avg256).unwrap();
        assert_eq!(hts.bus().register(REG_AV_CONF), 0x3f);
    }

    #[test]
    fn short_read_is_an_error() {
        let mut hts = started();
        hts.bus_mut().limit_reads(1);
        let transactions = hts.bus().transactions();
        match hts.get_temperature() {
            Err(Hts221Error::IoError(ref e)) => {
                assert_eq!(e.kind(), io::ErrorKind::UnexpectedEof)
            }
            other => panic!("unexpected {:?}", other),
        }
        // one address write, one read, no retry
        assert_eq!(hts.bus().transactions(), transactions + 2);
    }

    #[test]
    fn short_write_is_an_error() {
        let mut hts = started();
        hts.bus_mut().limit_writes(1);
        let transactions = hts.bus().transactions();
        match hts.write_reg(REG_CTRL1, 0x80) {
            Err(Hts221Error::IoError(ref e)) => assert_eq!(e.kind(), io::ErrorKind::WriteZero),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(hts.bus().transactions(), transactions + 1);
    }

    #[test]
    fn release_returns_bus() {
        let hts = started();
        let bus = hts.release();
        assert_eq!(bus.register(REG_WHO_AM_I), WHO_AM_I_VALUE);
    }
}
