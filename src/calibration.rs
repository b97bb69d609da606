//! * Factory calibration for the HTS221
//!
//! Each part is trimmed at two reference points per channel. The output
//! registers are converted by interpolating linearly between them.

use byteorder::{ByteOrder, LittleEndian};

use registers::CALIBRATION_LEN;

/// Upper bound of the humidity output range, in %RH.
const MAX_HUMIDITY: f64 = 100.0;

/// Two (raw ADC count, physical value) reference points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearCalibration {
    pub x0: i16,
    pub y0: f64,
    pub x1: i16,
    pub y1: f64,
}

impl LinearCalibration {
    pub fn new(x0: i16, y0: f64, x1: i16, y1: f64) -> LinearCalibration {
        LinearCalibration { x0, y0, x1, y1 }
    }

    /// Map a raw ADC count onto the line through both reference points.
    ///
    /// A part with identical raw reference points has no usable slope; every
    /// reading then maps to `y0`.
    pub fn convert(&self, raw: i16) -> f64 {
        let span = f64::from(self.x1) - f64::from(self.x0);
        if span == 0.0 {
            return self.y0;
        }
        self.y0 + (f64::from(raw) - f64::from(self.x0)) * (self.y1 - self.y0) / span
    }
}

/// Humidity and temperature calibration, captured once at start-up.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Calibration {
    pub humidity: LinearCalibration,
    pub temperature: LinearCalibration,
}

impl Calibration {
    /// Decode the calibration block read from `REG_H0_H_2` onwards.
    ///
    /// | offset | register        | contents                          |
    /// |--------|-----------------|-----------------------------------|
    /// | 0, 1   | H0_rH_x2, H1    | reference humidity, %RH * 2       |
    /// | 2, 3   | T0_degC_x8, T1  | low 8 bits of reference °C * 8    |
    /// | 5      | T1/T0 msb       | bits 9:8 of T0 (1:0) and T1 (3:2) |
    /// | 6, 7   | H0_T0_OUT       | raw humidity at H0                |
    /// | 10, 11 | H1_T0_OUT       | raw humidity at H1                |
    /// | 12, 13 | T0_OUT          | raw temperature at T0             |
    /// | 14, 15 | T1_OUT          | raw temperature at T1             |
    pub fn from_registers(buf: &[u8; CALIBRATION_LEN]) -> Calibration {
        let h0_rh = f64::from(buf[0]) / 2.0;
        let h1_rh = f64::from(buf[1]) / 2.0;
        let h0_out = LittleEndian::read_i16(&buf[6..8]);
        let h1_out = LittleEndian::read_i16(&buf[10..12]);

        let msb = buf[5];
        let t0_x8 = LittleEndian::read_u16(&[buf[2], msb & 0x03]);
        let t1_x8 = LittleEndian::read_u16(&[buf[3], (msb & 0x0c) >> 2]);
        let t0_out = LittleEndian::read_i16(&buf[12..14]);
        let t1_out = LittleEndian::read_i16(&buf[14..16]);

        Calibration {
            humidity: LinearCalibration::new(h0_out, h0_rh, h1_out, h1_rh),
            temperature: LinearCalibration::new(
                t0_out,
                f64::from(t0_x8) / 8.0,
                t1_out,
                f64::from(t1_x8) / 8.0,
            ),
        }
    }

    /// Relative humidity in percent, clipped to 0-100.
    pub fn humidity(&self, raw: i16) -> f64 {
        let rh = self.humidity.convert(raw);
        if rh < 0.0 {
            0.0
        } else if rh > MAX_HUMIDITY {
            MAX_HUMIDITY
        } else {
            rh
        }
    }

    /// Temperature in degrees Celsius.
    pub fn temperature(&self, raw: i16) -> f64 {
        self.temperature.convert(raw)
    }
}
