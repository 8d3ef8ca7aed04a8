#![cfg_attr(feature = "baremetal", no_std)]

//! GPIO, PWM and external-interrupt control for the Samsung S3C24xx
//! I/O-port and PWM-timer blocks, driven through a fixed per-board pin
//! table (NanoPi supported out of the box, `nanopi` feature).
//!
//! An [`IoPorts`] value arbitrates every pin on the connector: a pin is
//! claimed for exactly one capability (gpio, pwm or eint) with the matching
//! `*_init` call, operated through that capability's methods, and returned
//! to its chip reset state with `*_close`. The physical register blocks are
//! mapped lazily when the first pin needs them and unmapped when the last
//! pin is closed.
//!
//! ```no_run
//! use s3c24_hal::{board::nanopi::NANOPI, EintTrigger, IoDir, IoPorts, IoPull, IoValue};
//!
//! let mut io = IoPorts::new(&NANOPI);
//!
//! // drive pin 40 while the button on pin 12 has not fired
//! io.gpio_init(40, IoDir::Output, IoPull::None)?;
//! io.eint_init(12, EintTrigger::Falling)?;
//! while !io.eint_pending(12)? {
//!     io.gpio_write(40, IoValue::High)?;
//! }
//! io.gpio_close(40)?;
//! io.eint_close(12)?;
//!
//! // 1 kHz, 25% duty on the TOUT0 pin
//! io.pwm_init(22, 1_000_000, 250_000)?;
//! io.pwm_start(22)?;
//! # Ok::<(), s3c24_hal::Error>(())
//! ```

pub mod board;
mod eint;
mod gpio;
mod pins;
mod pwm;
pub mod sfr;
pub mod window;

pub use eint::EintTrigger;
pub use gpio::{IoDir, IoPull, IoValue};
pub use pins::PinUse;
pub use pwm::{solve_duty, solve_period, PwmTiming};

use board::BoardConfig;
use pins::PinRegistry;
use window::RegisterWindow;

/// Errors reported by the pin controllers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The pin number is not in the board's pin table.
    PinNotFound(u8),
    /// The pin exists but does not offer the requested capability; the
    /// payload is what was asked for.
    CapabilityUnsupported(u8, PinUse),
    /// The pin is already held; the payload is the capability holding it.
    PinBusy(u8, PinUse),
    /// Operation on a pin that was never initialized.
    PinNotInitialized(u8),
    /// The pin is initialized, but as a different capability; the payload
    /// is the capability holding it.
    WrongCapability(u8, PinUse),
    /// The requested PWM period is outside what the clock tree can reach.
    PeriodOutOfRange { min_ns: u64, max_ns: u64 },
    /// The requested duty time is longer than the period.
    DutyExceedsPeriod,
    /// No (prescaler, divider, counter) triple can represent the period.
    /// Distinct from the range check, and not expected once that passes.
    NoFeasibleSolution,
    /// The physical register block could not be mapped.
    CannotMapRegisters,
}

/// Controller for the I/O-port and PWM-timer blocks of one SoC.
///
/// Owns the pin registry and the lazily mapped register windows. Every
/// operation goes through `&mut self`, so one `IoPorts` value is the single
/// writer the hardware requires and pin acquisition is race-free by
/// construction; callers that want to drive pins from several threads wrap
/// the whole value in a mutex. Nothing stops another *process* from mapping
/// the same physical blocks; the hardware offers no arbitration for that.
pub struct IoPorts {
    pub(crate) board: &'static BoardConfig,
    pub(crate) registry: PinRegistry,
    pub(crate) gpio: Option<RegisterWindow>,
    pub(crate) pwm: Option<RegisterWindow>,
}

impl IoPorts {
    /// Create the controller. No registers are mapped until the first pin
    /// is initialized.
    pub fn new(board: &'static BoardConfig) -> IoPorts {
        IoPorts { board, registry: PinRegistry::new(board.pins), gpio: None, pwm: None }
    }

    /// Map the I/O-port block if this is the first pin to need it.
    pub(crate) fn ensure_gpio_window(&mut self) -> Result<(), Error> {
        if self.gpio.is_none() {
            log::debug!("mapping I/O-port block at {:#x}", self.board.gpio_base);
            self.gpio = Some(RegisterWindow::open(self.board.gpio_base, self.board.gpio_len)?);
        }
        Ok(())
    }

    /// Map the PWM-timer block if this is the first pin to need it.
    pub(crate) fn ensure_pwm_window(&mut self) -> Result<(), Error> {
        if self.pwm.is_none() {
            log::debug!("mapping PWM-timer block at {:#x}", self.board.pwm_base);
            self.pwm = Some(RegisterWindow::open(self.board.pwm_base, self.board.pwm_len)?);
        }
        Ok(())
    }

    /// Unmap any block whose live-pin count has returned to zero.
    pub(crate) fn reap_windows(&mut self) {
        if self.registry.gpio_pins_live() == 0 {
            if let Some(mut win) = self.gpio.take() {
                log::debug!("unmapping I/O-port block");
                win.close();
            }
        }
        if self.registry.pwm_pins_live() == 0 {
            if let Some(mut win) = self.pwm.take() {
                log::debug!("unmapping PWM-timer block");
                win.close();
            }
        }
    }

    pub(crate) fn gpio_window(&mut self) -> &mut RegisterWindow {
        self.gpio.as_mut().expect("I/O-port block is not mapped")
    }

    pub(crate) fn gpio_window_ref(&self) -> &RegisterWindow {
        self.gpio.as_ref().expect("I/O-port block is not mapped")
    }

    pub(crate) fn pwm_window(&mut self) -> &mut RegisterWindow {
        self.pwm.as_mut().expect("PWM-timer block is not mapped")
    }

    pub(crate) fn pwm_window_ref(&self) -> &RegisterWindow {
        self.pwm.as_ref().expect("PWM-timer block is not mapped")
    }
}
