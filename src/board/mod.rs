//! Per-board configuration: pin tables, block addresses, and the clock and
//! reset constants the controllers run against.

use crate::sfr::Bank;

/// One connector pin and the capabilities it offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinDescriptor {
    /// Connector pin number; the key callers use everywhere.
    pub pin: u8,
    /// GPIO bank the pin lives in.
    pub bank: Bank,
    /// Bit index within the bank's registers.
    pub bit: u8,
    /// TOUTn channel, for pins that can drive a PWM timer output.
    pub pwm: Option<u8>,
    /// EINTn line, for pins that can latch an external interrupt.
    pub eint: Option<u8>,
}

/// Everything the controllers need to know about one board.
pub struct BoardConfig {
    /// Physical base and length of the I/O-port register block.
    pub gpio_base: usize,
    pub gpio_len: usize,
    /// Physical base and length of the PWM-timer register block.
    pub pwm_base: usize,
    pub pwm_len: usize,
    /// PWM source clock (PCLK) in Hz.
    pub pwm_clk_hz: u32,
    /// Ascending divider table; the TCFG1 nibble value is the index.
    pub pwm_dividers: &'static [u32],
    /// Chip reset values restored when a pin is closed.
    pub data_reset: u32,
    pub func_reset: u32,
    pub pud_reset: u32,
    /// The connector pin table.
    pub pins: &'static [PinDescriptor],
}

#[cfg(feature = "nanopi")]
pub mod nanopi;
