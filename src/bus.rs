//! * Raw byte transport to an I2C slave
//!
//! The register layer only ever needs "write these bytes" and "read this
//! many bytes". Both report how many bytes actually moved so a short
//! transfer can be told apart from a successful one.

use std::io;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};
use libc;

/// Something that can move bytes to and from one I2C slave.
pub trait Transport {
    /// Write `data` as a single bus transaction. Returns the number of bytes
    /// the bus accepted.
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Read into `data` as a single bus transaction. Returns the number of
    /// bytes received.
    fn read(&mut self, data: &mut [u8]) -> io::Result<usize>;
}

impl<'a, T: Transport + ?Sized> Transport for &'a mut T {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        (**self).write(data)
    }

    fn read(&mut self, data: &mut [u8]) -> io::Result<usize> {
        (**self).read(data)
    }
}

/// An `i2c-dev` character device bound to one slave address.
///
/// The node is closed when this is dropped.
pub struct I2cBus {
    device: LinuxI2CDevice,
    address: u16,
}

impl I2cBus {
    /// Open the device node at `path` (e.g. `/dev/i2c-1`) and bind it to
    /// `address` with the `I2C_SLAVE` ioctl.
    pub fn open<P: AsRef<Path>>(path: P, address: u16) -> Result<I2cBus, LinuxI2CError> {
        let device = LinuxI2CDevice::new(path.as_ref(), address)?;
        debug!(
            "opened {} for slave 0x{:02x}",
            path.as_ref().display(),
            address
        );
        Ok(I2cBus { device, address })
    }

    /// The slave address this handle is bound to.
    pub fn address(&self) -> u16 {
        self.address
    }
}

impl Transport for I2cBus {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let fd = self.device.as_raw_fd();
        // Safe: the pointer and length come from a live slice and the
        // descriptor is owned by `self.device` for the duration of the call.
        let n = unsafe { libc::write(fd, data.as_ptr() as *const libc::c_void, data.len()) };
        if n < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(n as usize)
        }
    }

    fn read(&mut self, data: &mut [u8]) -> io::Result<usize> {
        let fd = self.device.as_raw_fd();
        // Safe: as for `write`.
        let n = unsafe { libc::read(fd, data.as_mut_ptr() as *mut libc::c_void, data.len()) };
        if n < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(n as usize)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn open_missing_node_fails() {
        assert!(I2cBus::open("/dev/this-i2c-bus-does-not-exist", 0x5f).is_err());
    }
}
