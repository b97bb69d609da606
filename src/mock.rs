//! A simulated HTS221 register file for testing without hardware.
//!
//! Writes treat the first byte as the register sub-address and store any
//! remaining bytes from there. Reads return bytes starting at the last
//! sub-address. As on the real part, the address only advances across a
//! multi-byte transfer when the sub-address had `AUTO_INCREMENT` set.

use std::io;

use bus::Transport;
use registers::{AUTO_INCREMENT, REG_WHO_AM_I, WHO_AM_I_VALUE};

const NUM_REGISTERS: usize = 0x80;

pub struct MockBus {
    registers: [u8; NUM_REGISTERS],
    offset: usize,
    auto_increment: bool,
    read_limit: Option<usize>,
    write_limit: Option<usize>,
    transactions: usize,
}

impl Default for MockBus {
    fn default() -> MockBus {
        MockBus::new()
    }
}

impl MockBus {
    /// A bus with every register zeroed.
    pub fn new() -> MockBus {
        MockBus {
            registers: [0u8; NUM_REGISTERS],
            offset: 0,
            auto_increment: false,
            read_limit: None,
            write_limit: None,
            transactions: 0,
        }
    }

    /// A bus that answers the identity check like a genuine HTS221.
    pub fn hts221() -> MockBus {
        let mut bus = MockBus::new();
        bus.set_registers(REG_WHO_AM_I, &[WHO_AM_I_VALUE]);
        bus
    }

    /// Preload registers starting at `address`, bypassing the bus.
    pub fn set_registers(&mut self, address: u8, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.registers[(address as usize + i) % NUM_REGISTERS] = *byte;
        }
    }

    /// Inspect one register, bypassing the bus.
    pub fn register(&self, address: u8) -> u8 {
        self.registers[address as usize % NUM_REGISTERS]
    }

    /// Deliver at most `limit` bytes per read from now on.
    pub fn limit_reads(&mut self, limit: usize) {
        self.read_limit = Some(limit);
    }

    /// Accept at most `limit` bytes per write from now on.
    pub fn limit_writes(&mut self, limit: usize) {
        self.write_limit = Some(limit);
    }

    /// Number of `read` and `write` calls seen so far.
    pub fn transactions(&self) -> usize {
        self.transactions
    }
}

impl Transport for MockBus {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.transactions += 1;
        let len = self.write_limit.map_or(data.len(), |l| l.min(data.len()));
        if len == 0 {
            return Ok(0);
        }
        self.offset = (data[0] & !AUTO_INCREMENT) as usize;
        self.auto_increment = data[0] & AUTO_INCREMENT != 0;
        for byte in &data[1..len] {
            self.registers[self.offset] = *byte;
            if self.auto_increment {
                self.offset = (self.offset + 1) % NUM_REGISTERS;
            }
        }
        Ok(len)
    }

    fn read(&mut self, data: &mut [u8]) -> io::Result<usize> {
        self.transactions += 1;
        let len = self.read_limit.map_or(data.len(), |l| l.min(data.len()));
        for byte in data[..len].iter_mut() {
            *byte = self.registers[self.offset];
            if self.auto_increment {
                self.offset = (self.offset + 1) % NUM_REGISTERS;
            }
        }
        Ok(len)
    }
}
