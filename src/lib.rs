//! # A Linux driver for the ST HTS221 humidity and temperature sensor
//!
//! The [HTS221](https://www.st.com/en/mems-and-sensors/hts221.html) is a
//! capacitive relative humidity and temperature sensor with an I2C
//! interface. This crate talks to it through the kernel's `i2c-dev`
//! character devices (`/dev/i2c-N`).
//!
//! ```no_run
//! use hts221_linux::Hts221;
//!
//! let mut sensor = Hts221::open("/dev/i2c-1").unwrap();
//! sensor.begin().unwrap();
//! sensor.enable().unwrap();
//! println!("{:.1} °C", sensor.get_temperature().unwrap());
//! println!("{:.1} %RH", sensor.get_humidity().unwrap());
//! ```
//!
//! The driver is layered:
//!
//! * [`bus`] moves raw bytes to and from the slave. [`I2cBus`] is the
//!   Linux implementation; [`mock::MockBus`] simulates the part for tests.
//! * [`Hts221`] turns register reads and writes into bus transactions and
//!   converts the output registers with the factory calibration.
//!
//! Every call blocks until the kernel finishes the transfer. Nothing is
//! locked: if several handles share a bus, serialize access yourself.

extern crate byteorder;
extern crate i2cdev;
extern crate libc;
#[macro_use]
extern crate log;
extern crate measurements;

pub mod bus;
pub mod calibration;
mod hts221;
pub mod mock;
pub mod registers;
mod rh;
pub mod settings;

use std::error::Error;
use std::fmt;
use std::io;

pub use bus::{I2cBus, Transport};
pub use calibration::{Calibration, LinearCalibration};
pub use hts221::{Hts221, Measurement, Status, MAX_WRITE_LEN};
pub use measurements::Temperature;
pub use registers::{I2C_ADDRESS, WHO_AM_I_VALUE};
pub use rh::RelativeHumidity;
pub use settings::{AvgH, AvgT, OutputDataRate};

use i2cdev::linux::LinuxI2CError;

/// Errors that this crate can return
#[derive(Debug)]
pub enum Hts221Error {
    /// Opening the bus device node or binding the slave address failed
    I2CError(LinuxI2CError),
    /// A bus transfer failed or moved fewer bytes than requested
    IoError(io::Error),
    /// WHO_AM_I did not hold the HTS221 identifier; carries what it held
    WrongDevice(u8),
    /// No output data rate matches this frequency
    UnsupportedOdr(f32),
    /// A reading was requested before `begin()` captured the calibration
    NotCalibrated,
}

/// A shortcut for Results that can return `T` or `Hts221Error`
pub type Hts221Result<T> = Result<T, Hts221Error>;

impl fmt::Display for Hts221Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Hts221Error::I2CError(ref err) => write!(f, "I2C error: {}", err),
            Hts221Error::IoError(ref err) => write!(f, "I/O error: {}", err),
            Hts221Error::WrongDevice(id) => write!(
                f,
                "unexpected device id 0x{:02x} (expected 0x{:02x})",
                id, WHO_AM_I_VALUE
            ),
            Hts221Error::UnsupportedOdr(hz) => {
                write!(f, "unsupported output data rate {} Hz", hz)
            }
            Hts221Error::NotCalibrated => write!(f, "sensor not initialised"),
        }
    }
}

impl Error for Hts221Error {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            Hts221Error::I2CError(ref err) => Some(err),
            Hts221Error::IoError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<LinuxI2CError> for Hts221Error {
    fn from(err: LinuxI2CError) -> Hts221Error {
        Hts221Error::I2CError(err)
    }
}

impl From<io::Error> for Hts221Error {
    fn from(err: io::Error) -> Hts221Error {
        Hts221Error::IoError(err)
    }
}


// End of file
