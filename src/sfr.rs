//! Register tables for the S3C24xx I/O-port and PWM-timer blocks.
//!
//! The I/O-port block packs several pins into each 32-bit word (two
//! function-select bits and two pull-select bits per pin, one data bit per
//! pin), so most fields here are constructed from a pin's bit index rather
//! than named one by one. The PWM-timer block packs per-channel nibbles and
//! bytes into its shared configuration words the same way.

use crate::window::{Field, Register};

/// GPIO banks reachable from the main connector, addressed by their base
/// offset within the I/O-port block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    B,
    F,
    G,
    L,
}

impl Bank {
    pub const fn base(&self) -> usize {
        match self {
            Bank::B => 0x10,
            Bank::F => 0x50,
            Bank::G => 0x60,
            Bank::L => 0xF0,
        }
    }

    /// Function-select register, 2 bits per pin.
    pub const fn con(&self) -> Register {
        Register::new(self.base())
    }

    /// Data register, 1 bit per pin.
    pub const fn dat(&self) -> Register {
        Register::new(self.base() + 0x4)
    }

    /// Pull-resistor select register, 2 bits per pin.
    pub const fn pud(&self) -> Register {
        Register::new(self.base() + 0x8)
    }
}

pub const fn con_field(bank: Bank, bit: u8) -> Field {
    Field::new(2, bit as usize * 2, bank.con())
}

pub const fn dat_field(bank: Bank, bit: u8) -> Field {
    Field::new(1, bit as usize, bank.dat())
}

pub const fn pud_field(bank: Bank, bit: u8) -> Field {
    Field::new(2, bit as usize * 2, bank.pud())
}

/// Function-select encodings.
pub const FUNC_INPUT: u32 = 0b00;
pub const FUNC_OUTPUT: u32 = 0b01;
/// Alternate function: EINTn on the F/G banks, TOUTn on the B bank.
pub const FUNC_ALT: u32 = 0b10;

/// Pull-select encodings.
pub const PUD_NONE: u32 = 0b00;
pub const PUD_DOWN: u32 = 0b01;
pub const PUD_UP: u32 = 0b10;

/// Byte offset of the first trigger-select word. Trigger codes are 3 bits
/// per line, packed back to back, so the bank spans consecutive words.
pub const EINT_CON: usize = 0x88;

/// Pending flags, one bit per line. Write-one-to-clear.
pub const EINT_PEND: Register = Register::new(0xA8);

pub const fn eint_trigger_field(line: u8) -> Field {
    let bit = line as usize * 3;
    Field::new(3, bit % 32, Register::new(EINT_CON + 4 * (bit / 32)))
}

pub const fn eint_pend_field(line: u8) -> Field {
    Field::new(1, line as usize, EINT_PEND)
}

/// Trigger-select encodings. Low level is also the reset state.
pub const TRIG_LOW: u32 = 0b000;
pub const TRIG_HIGH: u32 = 0b001;
pub const TRIG_FALLING: u32 = 0b010;
pub const TRIG_RISING: u32 = 0b100;
pub const TRIG_BOTH: u32 = 0b110;

// --------------------------- PWM-timer block ---------------------------

/// Prescaler configuration: one byte per channel pair.
pub const TCFG0: Register = Register::new(0x00);
/// Divider mux: one nibble per channel.
pub const TCFG1: Register = Register::new(0x04);
/// Timer control: one 4-bit slot per channel.
pub const TCON: Register = Register::new(0x08);

const TCNTB_BASE: usize = 0x0C;
const TIMER_STRIDE: usize = 0x0C;

/// Each prescaler byte feeds a pair of channels; reprogramming one channel
/// of the pair retunes the other.
pub const fn prescaler_field(channel: u8) -> Field {
    Field::new(8, (channel as usize / 2) * 8, TCFG0)
}

pub const fn divider_field(channel: u8) -> Field {
    Field::new(4, channel as usize * 4, TCFG1)
}

pub const fn tcon_field(channel: u8) -> Field {
    Field::new(4, channel as usize * 8, TCON)
}

/// Count buffer: reload value for the channel's down-counter.
pub const fn tcntb(channel: u8) -> Register {
    Register::new(TCNTB_BASE + channel as usize * TIMER_STRIDE)
}

/// Compare buffer: the count at which the output toggles.
pub const fn tcmpb(channel: u8) -> Register {
    Register::new(TCNTB_BASE + channel as usize * TIMER_STRIDE + 0x4)
}

pub const fn count_field(channel: u8) -> Field {
    Field::new(16, 0, tcntb(channel))
}

pub const fn compare_field(channel: u8) -> Field {
    Field::new(16, 0, tcmpb(channel))
}

/// Control bits within a channel's TCON slot.
pub const TCON_START: u32 = 0b0001;
pub const TCON_MANUAL_UPDATE: u32 = 0b0010;
pub const TCON_AUTO_RELOAD: u32 = 0b1000;
