//! Simulated ADC register file for host tests.

use crate::regs::{Register, RegisterFile, ADSC, MUX5, MUX_MASK};
use core::cell::{Cell, RefCell};

const BASE: usize = 0x78;

/// Channel selection captured when a conversion was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub mux: u8,
    pub mux5: bool,
}

/// Register file that behaves like the ADC: setting ADSC latches the next
/// result, and ADSC reads as set for `busy_polls` status reads.
pub struct MockRegisters {
    bytes: [Cell<u8>; 7],
    result: Cell<u16>,
    busy_polls: Cell<u32>,
    remaining: Cell<u32>,
    writes: RefCell<Vec<(Register, u8)>>,
    conversions: RefCell<Vec<Selection>>,
}

impl MockRegisters {
    pub fn new() -> Self {
        Self {
            bytes: Default::default(),
            result: Cell::new(0),
            busy_polls: Cell::new(2),
            remaining: Cell::new(0),
            writes: RefCell::new(Vec::new()),
            conversions: RefCell::new(Vec::new()),
        }
    }

    /// Sets the code produced by the next conversions.
    pub fn set_result(&self, raw: u16) {
        self.result.set(raw);
    }

    /// Number of status reads that still report a conversion in progress.
    pub fn set_busy_polls(&self, polls: u32) {
        self.busy_polls.set(polls);
    }

    /// Converter never finishes.
    pub fn hang(&self) {
        self.busy_polls.set(u32::MAX);
    }

    pub fn peek(&self, register: Register) -> u8 {
        self.cell(register).get()
    }

    pub fn writes_to(&self, register: Register) -> Vec<u8> {
        self.writes
            .borrow()
            .iter()
            .filter(|(r, _)| *r == register)
            .map(|(_, value)| *value)
            .collect()
    }

    pub fn conversions(&self) -> Vec<Selection> {
        self.conversions.borrow().clone()
    }

    fn cell(&self, register: Register) -> &Cell<u8> {
        &self.bytes[register.address() - BASE]
    }
}

impl RegisterFile for MockRegisters {
    fn read(&self, register: Register) -> u8 {
        let cell = self.cell(register);
        let value = cell.get();

        if register == Register::Adcsra && value & ADSC != 0 {
            match self.remaining.get() {
                0 => {
                    cell.set(value & !ADSC);
                    return value & !ADSC;
                }
                u32::MAX => {}
                n => self.remaining.set(n - 1),
            }
        }

        value
    }

    fn write(&self, register: Register, value: u8) {
        self.writes.borrow_mut().push((register, value));
        self.cell(register).set(value);

        if register == Register::Adcsra && value & ADSC != 0 {
            self.remaining.set(self.busy_polls.get());
            self.conversions.borrow_mut().push(Selection {
                mux: self.peek(Register::Admux) & MUX_MASK,
                mux5: self.peek(Register::Adcsrb) & MUX5 != 0,
            });

            let [low, high] = self.result.get().to_le_bytes();
            self.cell(Register::Adcl).set(low);
            self.cell(Register::Adch).set(high);
        }
    }
}
