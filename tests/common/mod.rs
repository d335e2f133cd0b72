//! Simulated E220 module
//!
//! The UART, both mode pins, AUX and the delay share one `Module` state so a
//! test can drive a `Device` exactly as it would drive real hardware and then
//! inspect what happened on every line.

#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, convert::Infallible, rc::Rc};

use e220::{Config, Device};

pub const FACTORY_REGISTERS: [u8; 8] = [0x00, 0x00, 0x62, 0x00, 0x17, 0x03, 0x00, 0x00];
pub const MODULE_INFO: [u8; 3] = [0x20, 0x0B, 0x16];
pub const RSSI_QUERY: [u8; 6] = [0xC0, 0xC1, 0xC2, 0xC3, 0x00, 0x02];

#[derive(Debug)]
pub struct Module {
    pub m0: bool,
    pub m1: bool,
    pub m0_writes: usize,
    pub m1_writes: usize,
    pub aux_stuck_low: bool,
    pub registers: [u8; 8],
    pub rssi: (u8, u8),
    /// Bytes waiting to be read by the host
    pub to_host: VecDeque<u8>,
    /// Every byte the host wrote, in order
    pub from_host: Vec<u8>,
    /// Bytes the module sent over the air
    pub air: Vec<u8>,
    pub pending: Vec<u8>,
    pub corrupt_echo_length: bool,
    pub elapsed_ns: u64,
    pub resets: usize,
}

impl Default for Module {
    fn default() -> Self {
        Self {
            m0: false,
            m1: false,
            m0_writes: 0,
            m1_writes: 0,
            aux_stuck_low: false,
            registers: FACTORY_REGISTERS,
            rssi: (0xA0, 0xB0),
            to_host: VecDeque::new(),
            from_host: Vec::new(),
            air: Vec::new(),
            pending: Vec::new(),
            corrupt_echo_length: false,
            elapsed_ns: 0,
            resets: 0,
        }
    }
}

impl Module {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }

    fn configuration_mode(&self) -> bool {
        self.m0 && self.m1
    }

    fn answer(&mut self, bytes: &[u8]) {
        self.to_host.extend(bytes.iter().copied());
    }

    fn reject(&mut self) {
        self.answer(&[0xFF, 0xFF, 0xFF]);
        self.pending.clear();
    }

    fn receive(&mut self, bytes: &[u8]) {
        self.from_host.extend_from_slice(bytes);
        self.pending.extend_from_slice(bytes);
        if self.configuration_mode() {
            self.process_program();
        } else {
            self.process_normal();
        }
    }

    fn process_program(&mut self) {
        if self.pending.len() < 3 {
            return;
        }
        let (opcode, address, length) = (self.pending[0], self.pending[1], self.pending[2]);
        let window = address as usize..address as usize + length as usize;

        match opcode {
            0xC4 if self.pending == [0xC4, 0xC4, 0xC4] => {
                self.resets += 1;
                self.pending.clear();
            }
            0xC1 if address == 0x08 && length == 0x03 => {
                self.answer(&[0xC1, address, length]);
                self.answer(&MODULE_INFO);
                self.pending.clear();
            }
            0xC1 if window.end <= 8 => {
                let mut data = self.registers[window.clone()].to_vec();
                for (offset, byte) in window.clone().zip(data.iter_mut()) {
                    if offset >= 6 {
                        *byte = 0;
                    }
                }
                self.answer(&[0xC1, address, length]);
                self.answer(&data);
                self.pending.clear();
            }
            0xC0 | 0xC2 if window.end <= 8 => {
                if self.pending.len() < 3 + length as usize {
                    return;
                }
                let data = self.pending[3..].to_vec();
                self.registers[window].copy_from_slice(&data);

                let echoed_length = if self.corrupt_echo_length {
                    length.wrapping_sub(1)
                } else {
                    length
                };
                self.answer(&[0xC1, address, echoed_length]);
                self.answer(&data);
                self.pending.clear();
            }
            _ => self.reject(),
        }
    }

    fn process_normal(&mut self) {
        if RSSI_QUERY.starts_with(&self.pending) {
            if self.pending == RSSI_QUERY {
                if self.registers[3] & 0x20 != 0 {
                    let (ambient, last) = self.rssi;
                    self.answer(&[0xC1, 0x00, 0x02, ambient, last]);
                }
                self.pending.clear();
            }
            return;
        }
        let pending = std::mem::take(&mut self.pending);
        self.air.extend_from_slice(&pending);
    }
}

pub type Shared = Rc<RefCell<Module>>;

pub struct SimUart(pub Shared);

impl embedded_io::ErrorType for SimUart {
    type Error = Infallible;
}

impl embedded_io::Read for SimUart {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut module = self.0.borrow_mut();
        let mut count = 0;
        while count < buf.len() {
            match module.to_host.pop_front() {
                Some(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }
}

impl embedded_io::ReadReady for SimUart {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.borrow().to_host.is_empty())
    }
}

impl embedded_io::Write for SimUart {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.borrow_mut().receive(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Clone, Copy)]
pub enum Line {
    M0,
    M1,
}

pub struct ModePin {
    module: Shared,
    line: Line,
}

impl ModePin {
    fn drive(&mut self, high: bool) {
        let mut module = self.module.borrow_mut();
        match self.line {
            Line::M0 => {
                module.m0 = high;
                module.m0_writes += 1;
            }
            Line::M1 => {
                module.m1 = high;
                module.m1_writes += 1;
            }
        }
        module.pending.clear();
    }
}

impl embedded_hal::digital::ErrorType for ModePin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for ModePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

pub struct AuxPin(pub Shared);

impl embedded_hal::digital::ErrorType for AuxPin {
    type Error = Infallible;
}

impl embedded_hal::digital::InputPin for AuxPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.borrow().aux_stuck_low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.borrow().aux_stuck_low)
    }
}

pub struct SimDelay(pub Shared);

impl embedded_hal::delay::DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().elapsed_ns += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().elapsed_ns += u64::from(ms) * 1_000_000;
    }
}

pub type SimDevice = Device<SimUart, ModePin, ModePin, AuxPin, SimDelay>;

pub fn device_with(config: Config) -> (SimDevice, Shared) {
    let module: Shared = Rc::new(RefCell::new(Module::default()));
    let device = Device::new(
        SimUart(module.clone()),
        ModePin {
            module: module.clone(),
            line: Line::M0,
        },
        ModePin {
            module: module.clone(),
            line: Line::M1,
        },
        Some(AuxPin(module.clone())),
        SimDelay(module.clone()),
        config,
    );
    (device, module)
}

pub fn device() -> (SimDevice, Shared) {
    device_with(Config::default())
}
