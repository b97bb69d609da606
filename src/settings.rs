//! Enumerated device settings and their register encodings.

use std::fmt;

use registers::{AV_CONF_AVGH_MASK, AV_CONF_AVGT_MASK, AV_CONF_AVGT_SHIFT, CTRL1_ODR_MASK};

/// Output data rate, bits 1:0 of CTRL_REG1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputDataRate {
    /// Convert only when asked to with a one-shot trigger
    OneShot,
    Hz1,
    Hz7,
    Hz12p5,
}

impl OutputDataRate {
    pub const ALL: [OutputDataRate; 4] = [
        OutputDataRate::OneShot,
        OutputDataRate::Hz1,
        OutputDataRate::Hz7,
        OutputDataRate::Hz12p5,
    ];

    /// Rate in Hz. One-shot mode reports 0.
    pub fn hz(self) -> f32 {
        match self {
            OutputDataRate::OneShot => 0.0,
            OutputDataRate::Hz1 => 1.0,
            OutputDataRate::Hz7 => 7.0,
            OutputDataRate::Hz12p5 => 12.5,
        }
    }

    /// The rate with exactly this frequency, if the device has one.
    pub fn from_hz(hz: f32) -> Option<OutputDataRate> {
        OutputDataRate::ALL
            .iter()
            .cloned()
            .find(|odr| (odr.hz() - hz).abs() < ::std::f32::EPSILON)
    }

    pub fn bits(self) -> u8 {
        match self {
            OutputDataRate::OneShot => 0b00,
            OutputDataRate::Hz1 => 0b01,
            OutputDataRate::Hz7 => 0b10,
            OutputDataRate::Hz12p5 => 0b11,
        }
    }

    /// Decode from a CTRL_REG1 value. Every code is defined.
    pub fn from_ctrl1(reg: u8) -> OutputDataRate {
        match reg & CTRL1_ODR_MASK {
            0b01 => OutputDataRate::Hz1,
            0b10 => OutputDataRate::Hz7,
            0b11 => OutputDataRate::Hz12p5,
            _ => OutputDataRate::OneShot,
        }
    }
}

impl fmt::Display for OutputDataRate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            OutputDataRate::OneShot => write!(f, "one-shot"),
            odr => write!(f, "{} Hz", odr.hz()),
        }
    }
}

/// Number of internal humidity samples averaged per reading, AV_CONF bits 2:0.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AvgH {
    Avg4,
    Avg8,
    Avg16,
    Avg32,
    Avg64,
    Avg128,
    Avg256,
    Avg512,
}

/// Number of internal temperature samples averaged per reading, AV_CONF bits 5:3.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AvgT {
    Avg2,
    Avg4,
    Avg8,
    Avg16,
    Avg32,
    Avg64,
    Avg128,
    Avg256,
}

impl AvgH {
    fn from_bits(bits: u8) -> AvgH {
        match bits & 0x07 {
            0 => AvgH::Avg4,
            1 => AvgH::Avg8,
            2 => AvgH::Avg16,
            3 => AvgH::Avg32,
            4 => AvgH::Avg64,
            5 => AvgH::Avg128,
            6 => AvgH::Avg256,
            _ => AvgH::Avg512,
        }
    }

    /// Samples per reading.
    pub fn samples(self) -> u16 {
        4 << (self as u16)
    }
}

impl AvgT {
    fn from_bits(bits: u8) -> AvgT {
        match bits & 0x07 {
            0 => AvgT::Avg2,
            1 => AvgT::Avg4,
            2 => AvgT::Avg8,
            3 => AvgT::Avg16,
            4 => AvgT::Avg32,
            5 => AvgT::Avg64,
            6 => AvgT::Avg128,
            _ => AvgT::Avg256,
        }
    }

    /// Samples per reading.
    pub fn samples(self) -> u16 {
        2 << (self as u16)
    }
}

/// Pack both averaging settings into the AV_CONF layout, keeping the
/// reserved upper bits of `current`.
pub fn encode_av_conf(current: u8, humidity: AvgH, temperature: AvgT) -> u8 {
    let keep = current & !(AV_CONF_AVGH_MASK | AV_CONF_AVGT_MASK);
    keep | (humidity as u8) | ((temperature as u8) << AV_CONF_AVGT_SHIFT)
}

pub fn decode_av_conf(reg: u8) -> (AvgH, AvgT) {
    (
        AvgH::from_bits(reg & AV_CONF_AVGH_MASK),
        AvgT::from_bits((reg & AV_CONF_AVGT_MASK) >> AV_CONF_AVGT_SHIFT),
    )
}
