//! Register map for the HTS221 humidity sensor
//!
//! See the HTS221 datasheet (DocID026315), section 7.

/// 7-bit slave address. The HTS221 has no address select pin.
pub const I2C_ADDRESS: u16 = 0x5f;

/// Expected contents of `REG_WHO_AM_I`.
pub const WHO_AM_I_VALUE: u8 = 0xbc;

pub const REG_WHO_AM_I: u8 = 0x0f;
pub const REG_AV_CONF: u8 = 0x10;
pub const REG_CTRL1: u8 = 0x20;
pub const REG_CTRL2: u8 = 0x21;
pub const REG_CTRL3: u8 = 0x22;
pub const REG_STATUS: u8 = 0x27;
pub const REG_HUMIDITY_OUT_L: u8 = 0x28;
pub const REG_HUMIDITY_OUT_H: u8 = 0x29;
pub const REG_TEMP_OUT_L: u8 = 0x2a;
pub const REG_TEMP_OUT_H: u8 = 0x2b;
pub const REG_H0_H_2: u8 = 0x30;
pub const REG_H1_H_2: u8 = 0x31;
pub const REG_T0_C_8: u8 = 0x32;
pub const REG_T1_C_8: u8 = 0x33;
pub const REG_T1_T0: u8 = 0x35;
pub const REG_H0_T0_OUT: u8 = 0x36;
pub const REG_H1_T0_OUT: u8 = 0x3a;
pub const REG_T0_OUT: u8 = 0x3c;
pub const REG_T1_OUT: u8 = 0x3e;

/// Calibration lives in 16 consecutive registers starting at `REG_H0_H_2`.
pub const CALIBRATION_LEN: usize = 16;

/// Set in the sub-address to auto-increment across a multi-byte transfer.
pub const AUTO_INCREMENT: u8 = 0x80;

// CTRL_REG1
pub const CTRL1_PD: u8 = 0x80;
pub const CTRL1_BDU: u8 = 0x04;
pub const CTRL1_ODR_MASK: u8 = 0x03;

// CTRL_REG2
pub const CTRL2_BOOT: u8 = 0x80;
pub const CTRL2_HEATER: u8 = 0x02;
pub const CTRL2_ONE_SHOT: u8 = 0x01;

// STATUS_REG
pub const STATUS_T_DA: u8 = 0x01;
pub const STATUS_H_DA: u8 = 0x02;

// AV_CONF
pub const AV_CONF_AVGH_MASK: u8 = 0x07;
pub const AV_CONF_AVGT_MASK: u8 = 0x38;
pub const AV_CONF_AVGT_SHIFT: u8 = 3;
