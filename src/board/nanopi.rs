//! NanoPi (S3C2451) board table.
//!
//! Pin numbers are positions on the main connector; the comments carry the
//! SoC signal name for each.

use super::{BoardConfig, PinDescriptor};
use crate::sfr::{Bank, PUD_UP};

const fn gpio(pin: u8, bank: Bank, bit: u8) -> PinDescriptor {
    PinDescriptor { pin, bank, bit, pwm: None, eint: None }
}

const fn eint(pin: u8, bank: Bank, bit: u8, line: u8) -> PinDescriptor {
    PinDescriptor { pin, bank, bit, pwm: None, eint: Some(line) }
}

const fn pwm(pin: u8, bank: Bank, bit: u8, channel: u8) -> PinDescriptor {
    PinDescriptor { pin, bank, bit, pwm: Some(channel), eint: None }
}

pub const PINS: [PinDescriptor; 21] = [
    eint(7, Bank::F, 1, 1),    // EINT1/GPF1
    eint(11, Bank::F, 2, 2),   // EINT2/GPF2
    eint(12, Bank::F, 3, 3),   // EINT3/GPF3
    eint(13, Bank::F, 4, 4),   // EINT4/GPF4
    eint(15, Bank::F, 5, 5),   // EINT5/GPF5
    pwm(16, Bank::B, 2, 2),    // TOUT2/GPB2
    eint(18, Bank::G, 1, 9),   // EINT9/GPG1
    pwm(22, Bank::B, 0, 0),    // TOUT0/GPB0
    gpio(24, Bank::L, 13),     // SS0/GPL13
    pwm(26, Bank::B, 1, 1),    // TOUT1/GPB1
    gpio(27, Bank::B, 7),      // SDA1/GPB7
    gpio(28, Bank::B, 8),      // SCL1/GPB8
    eint(29, Bank::G, 3, 11),  // EINT11/GPG3
    eint(31, Bank::G, 4, 12),  // EINT12/GPG4
    eint(32, Bank::G, 5, 13),  // EINT13/GPG5
    eint(33, Bank::G, 6, 14),  // EINT14/GPG6
    eint(35, Bank::G, 7, 15),  // EINT15/GPG7
    eint(36, Bank::G, 8, 16),  // EINT16/GPG8
    eint(37, Bank::G, 9, 17),  // EINT17/GPG9
    eint(38, Bank::G, 10, 18), // EINT18/GPG10
    eint(40, Bank::G, 11, 19), // EINT19/GPG11
];

pub const NANOPI: BoardConfig = BoardConfig {
    gpio_base: 0x5600_0000,
    gpio_len: 0x100,
    pwm_base: 0x5100_0000,
    pwm_len: 0x44,
    // PCLK
    pwm_clk_hz: 66_500_000,
    pwm_dividers: &[1, 2, 4, 8, 16],
    data_reset: 0,
    func_reset: 0,
    // most pads come out of reset with the pull-up engaged
    pud_reset: PUD_UP,
    pins: &PINS,
};
