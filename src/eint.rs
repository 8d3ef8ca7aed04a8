//! External interrupts: trigger-select and pending-flag transactions.
//!
//! An EINT line is physically a GPIO pad in its alternate function, so this
//! controller leans on the GPIO transactions for muxing and teardown. Only
//! the latched pending flag is exposed; when and how often to poll it is the
//! caller's business.

use crate::pins::PinUse;
use crate::sfr;
use crate::window::RegisterWindow;
use crate::{gpio, Error, IoPorts};

/// Condition that latches the pending flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EintTrigger {
    Low,
    High,
    Rising,
    Falling,
    Both,
}

impl EintTrigger {
    pub(crate) const fn trigger_bits(&self) -> u32 {
        match self {
            EintTrigger::Low => sfr::TRIG_LOW,
            EintTrigger::High => sfr::TRIG_HIGH,
            EintTrigger::Rising => sfr::TRIG_RISING,
            EintTrigger::Falling => sfr::TRIG_FALLING,
            EintTrigger::Both => sfr::TRIG_BOTH,
        }
    }
}

/// Dismiss one line's pending flag. The register is write-one-to-clear:
/// only the target line's bit may be written as 1, or every other line's
/// latched event would be dismissed along with it.
fn clear_pending(win: &mut RegisterWindow, line: u8) {
    #[cfg(any(target_os = "xous", feature = "baremetal"))]
    win.wo(sfr::EINT_PEND, 1 << line);
    // The hosted backing is plain RAM and cannot honor write-one-to-clear;
    // fold the hardware's response in so the flag reads back cleared.
    #[cfg(all(not(target_os = "xous"), not(feature = "baremetal")))]
    {
        let pending = win.r(sfr::EINT_PEND);
        win.wo(sfr::EINT_PEND, pending & !(1 << line));
    }
}

impl IoPorts {
    /// Claim `pin` for its EINT line, select the trigger condition, and
    /// dismiss any event latched before we owned the line.
    pub fn eint_init(&mut self, pin: u8, trigger: EintTrigger) -> Result<(), Error> {
        let desc = self.registry.acquire(pin, PinUse::Eint)?;
        if let Err(e) = self.ensure_gpio_window() {
            self.registry.release(pin);
            return Err(e);
        }
        let line = desc.eint.expect("eint capability checked at acquire");
        let win = self.gpio_window();
        gpio::set_function(win, desc, sfr::FUNC_ALT);
        win.rmwf(sfr::eint_trigger_field(line), trigger.trigger_bits());
        clear_pending(win, line);
        log::trace!("pin {} -> eint line {} on {:?}", pin, line, trigger);
        Ok(())
    }

    /// Has the line latched an event since the last clear? Non-blocking;
    /// sleep/retry cadence is up to the caller.
    pub fn eint_pending(&self, pin: u8) -> Result<bool, Error> {
        let desc = self.registry.require(pin, PinUse::Eint)?;
        let line = desc.eint.expect("eint capability checked at acquire");
        Ok(self.gpio_window_ref().rf(sfr::eint_pend_field(line)) != 0)
    }

    /// Dismiss a latched event.
    pub fn eint_clear(&mut self, pin: u8) -> Result<(), Error> {
        let desc = self.registry.require(pin, PinUse::Eint)?;
        let line = desc.eint.expect("eint capability checked at acquire");
        clear_pending(self.gpio_window(), line);
        Ok(())
    }

    /// Return the trigger select to its reset encoding and tear the pad
    /// down like any other GPIO.
    pub fn eint_close(&mut self, pin: u8) -> Result<(), Error> {
        let desc = self.registry.require(pin, PinUse::Eint)?;
        let line = desc.eint.expect("eint capability checked at acquire");
        let board = self.board;
        let win = self.gpio_window();
        win.rmwf(sfr::eint_trigger_field(line), sfr::TRIG_LOW);
        gpio::reset_pin(win, desc, board);
        self.registry.release(pin);
        self.reap_windows();
        log::trace!("pin {} closed", pin);
        Ok(())
    }

    /// Close every pin currently held as EINT.
    pub fn eint_close_all(&mut self) -> Result<(), Error> {
        for i in 0..self.board.pins.len() {
            let pin = self.board.pins[i].pin;
            if self.registry.usage(pin) == Some(PinUse::Eint) {
                self.eint_close(pin)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::nanopi::NANOPI;
    use crate::sfr::Bank;

    fn io() -> IoPorts {
        IoPorts::new(&NANOPI)
    }

    #[test]
    fn test_init_muxes_and_sets_trigger() {
        let mut io = io();
        io.eint_init(12, EintTrigger::Falling).unwrap(); // EINT3/GPF3
        let win = io.gpio_window_ref();
        assert_eq!(win.rf(sfr::con_field(Bank::F, 3)), sfr::FUNC_ALT);
        assert_eq!(win.rf(sfr::eint_trigger_field(3)), sfr::TRIG_FALLING);
    }

    #[test]
    fn test_trigger_field_in_second_word() {
        let mut io = io();
        io.eint_init(40, EintTrigger::Both).unwrap(); // EINT19/GPG11
        let win = io.gpio_window_ref();
        assert_eq!(win.rf(sfr::eint_trigger_field(19)), sfr::TRIG_BOTH);
        // line 19's code lands in the second trigger word, not the first
        assert_eq!(win.r(crate::window::Register::new(sfr::EINT_CON)), 0);
    }

    #[test]
    fn test_triggers_on_different_lines_coexist() {
        let mut io = io();
        io.eint_init(7, EintTrigger::Rising).unwrap(); // EINT1
        io.eint_init(11, EintTrigger::Low).unwrap(); // EINT2
        io.eint_init(15, EintTrigger::High).unwrap(); // EINT5
        let win = io.gpio_window_ref();
        assert_eq!(win.rf(sfr::eint_trigger_field(1)), sfr::TRIG_RISING);
        assert_eq!(win.rf(sfr::eint_trigger_field(2)), sfr::TRIG_LOW);
        assert_eq!(win.rf(sfr::eint_trigger_field(5)), sfr::TRIG_HIGH);
    }

    #[test]
    fn test_clear_then_poll_reads_zero() {
        let mut io = io();
        io.eint_init(12, EintTrigger::Rising).unwrap();
        // latch an event the way the hardware would
        let line_bit = 1 << 3;
        let pending = io.gpio_window_ref().r(sfr::EINT_PEND);
        io.gpio_window().wo(sfr::EINT_PEND, pending | line_bit);
        assert!(io.eint_pending(12).unwrap());
        io.eint_clear(12).unwrap();
        assert!(!io.eint_pending(12).unwrap());
    }

    #[test]
    fn test_clear_preserves_other_lines() {
        let mut io = io();
        io.eint_init(12, EintTrigger::Rising).unwrap(); // line 3
        io.eint_init(13, EintTrigger::Rising).unwrap(); // line 4
        let pending = io.gpio_window_ref().r(sfr::EINT_PEND);
        io.gpio_window().wo(sfr::EINT_PEND, pending | (1 << 3) | (1 << 4));
        io.eint_clear(12).unwrap();
        assert!(!io.eint_pending(12).unwrap());
        assert!(io.eint_pending(13).unwrap());
    }

    #[test]
    fn test_init_dismisses_stale_event() {
        let mut io = io();
        // a flag latched before anyone owned the line
        io.eint_init(13, EintTrigger::Rising).unwrap(); // keeps window mapped
        io.gpio_window().wo(sfr::EINT_PEND, 1 << 3);
        io.eint_init(12, EintTrigger::Rising).unwrap(); // line 3
        assert!(!io.eint_pending(12).unwrap());
    }

    #[test]
    fn test_close_resets_trigger_and_pad() {
        let mut io = io();
        io.eint_init(12, EintTrigger::Both).unwrap();
        io.eint_init(13, EintTrigger::Both).unwrap(); // keep the window alive
        io.eint_close(12).unwrap();
        let win = io.gpio_window_ref();
        assert_eq!(win.rf(sfr::eint_trigger_field(3)), sfr::TRIG_LOW);
        assert_eq!(win.rf(sfr::con_field(Bank::F, 3)), NANOPI.func_reset);
        assert_eq!(win.rf(sfr::pud_field(Bank::F, 3)), NANOPI.pud_reset);
        assert_eq!(io.registry.usage(12), None);
    }

    #[test]
    fn test_eint_refused_without_line() {
        let mut io = io();
        // pin 22 is TOUT0, no EINT line
        assert_eq!(
            io.eint_init(22, EintTrigger::Rising),
            Err(Error::CapabilityUnsupported(22, PinUse::Eint))
        );
    }
}
