//! GPIO: 1-bit data and 2-bit function/pull transactions against the
//! I/O-port bank registers.

use crate::board::{BoardConfig, PinDescriptor};
use crate::pins::PinUse;
use crate::sfr;
use crate::window::RegisterWindow;
use crate::{Error, IoPorts};

/// Direction of a GPIO pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoDir {
    Input,
    Output,
}

impl IoDir {
    pub(crate) const fn func_bits(&self) -> u32 {
        match self {
            IoDir::Input => sfr::FUNC_INPUT,
            IoDir::Output => sfr::FUNC_OUTPUT,
        }
    }
}

/// Pull-resistor selection for an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoPull {
    None,
    Down,
    Up,
}

impl IoPull {
    pub(crate) const fn pud_bits(&self) -> u32 {
        match self {
            IoPull::None => sfr::PUD_NONE,
            IoPull::Down => sfr::PUD_DOWN,
            IoPull::Up => sfr::PUD_UP,
        }
    }
}

/// Logic level of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoValue {
    Low,
    High,
}

impl From<bool> for IoValue {
    fn from(high: bool) -> IoValue {
        if high { IoValue::High } else { IoValue::Low }
    }
}

impl IoValue {
    pub(crate) const fn bit(&self) -> u32 {
        match self {
            IoValue::Low => 0,
            IoValue::High => 1,
        }
    }
}

pub(crate) fn set_function(win: &mut RegisterWindow, desc: &PinDescriptor, func: u32) {
    win.rmwf(sfr::con_field(desc.bank, desc.bit), func);
}

pub(crate) fn set_pull_bits(win: &mut RegisterWindow, desc: &PinDescriptor, bits: u32) {
    win.rmwf(sfr::pud_field(desc.bank, desc.bit), bits);
}

/// Return a pin's data/function/pull fields to the board's reset values.
pub(crate) fn reset_pin(win: &mut RegisterWindow, desc: &PinDescriptor, board: &BoardConfig) {
    win.rmwf(sfr::dat_field(desc.bank, desc.bit), board.data_reset);
    set_function(win, desc, board.func_reset);
    set_pull_bits(win, desc, board.pud_reset);
}

impl IoPorts {
    /// Claim `pin` for GPIO and configure it.
    ///
    /// An output pad must not fight its own pull resistor, so `pull` is
    /// forced to [`IoPull::None`] whenever `dir` is `Output`, regardless of
    /// what was asked for.
    pub fn gpio_init(&mut self, pin: u8, dir: IoDir, pull: IoPull) -> Result<(), Error> {
        let desc = self.registry.acquire(pin, PinUse::Gpio)?;
        if let Err(e) = self.ensure_gpio_window() {
            self.registry.release(pin);
            return Err(e);
        }
        let win = self.gpio_window();
        set_function(win, desc, dir.func_bits());
        let pull = if dir == IoDir::Output { IoPull::None } else { pull };
        set_pull_bits(win, desc, pull.pud_bits());
        log::trace!("pin {} -> gpio {:?} {:?}", pin, dir, pull);
        Ok(())
    }

    /// Read the pin's level.
    pub fn gpio_read(&self, pin: u8) -> Result<IoValue, Error> {
        let desc = self.registry.require(pin, PinUse::Gpio)?;
        let bit = self.gpio_window_ref().rf(sfr::dat_field(desc.bank, desc.bit));
        Ok(IoValue::from(bit != 0))
    }

    /// Drive the pin, leaving the rest of the bank's data word untouched.
    pub fn gpio_write(&mut self, pin: u8, value: IoValue) -> Result<(), Error> {
        let desc = self.registry.require(pin, PinUse::Gpio)?;
        self.gpio_window().rmwf(sfr::dat_field(desc.bank, desc.bit), value.bit());
        Ok(())
    }

    /// Change direction after init.
    pub fn gpio_set_direction(&mut self, pin: u8, dir: IoDir) -> Result<(), Error> {
        let desc = self.registry.require(pin, PinUse::Gpio)?;
        set_function(self.gpio_window(), desc, dir.func_bits());
        Ok(())
    }

    /// Change the pull selection after init.
    pub fn gpio_set_pull(&mut self, pin: u8, pull: IoPull) -> Result<(), Error> {
        let desc = self.registry.require(pin, PinUse::Gpio)?;
        set_pull_bits(self.gpio_window(), desc, pull.pud_bits());
        Ok(())
    }

    /// Return the pin to its reset state and free it. The I/O-port block is
    /// unmapped once its last live pin is gone.
    pub fn gpio_close(&mut self, pin: u8) -> Result<(), Error> {
        let desc = self.registry.require(pin, PinUse::Gpio)?;
        let board = self.board;
        reset_pin(self.gpio_window(), desc, board);
        self.registry.release(pin);
        self.reap_windows();
        log::trace!("pin {} closed", pin);
        Ok(())
    }

    /// Close every pin currently held as GPIO.
    pub fn gpio_close_all(&mut self) -> Result<(), Error> {
        for i in 0..self.board.pins.len() {
            let pin = self.board.pins[i].pin;
            if self.registry.usage(pin) == Some(PinUse::Gpio) {
                self.gpio_close(pin)?;
            }
        }
        Ok(())
    }
}
