//! Pin ownership: hands each physical pin to at most one capability at a
//! time, and counts how many live pins each register block has so the
//! windows can be mapped and unmapped at the right moments.

use crate::board::PinDescriptor;
use crate::Error;

/// Capability a pin can be held as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinUse {
    Gpio,
    Pwm,
    Eint,
}

/// Upper bound on board table size; connector tables are small.
const MAX_PINS: usize = 64;

/// The arbiter for pin ownership.
///
/// All checks-then-sets here are single logical transactions: the registry
/// is only reachable through `&mut` on its owner, so no interleaving can
/// observe a pin between the check and the set.
pub struct PinRegistry {
    pins: &'static [PinDescriptor],
    /// Parallel to `pins`; `None` is free.
    usage: [Option<PinUse>; MAX_PINS],
    /// Pins currently holding the I/O-port block (all three capabilities).
    gpio_live: usize,
    /// Pins currently holding the PWM-timer block.
    pwm_live: usize,
}

impl PinRegistry {
    pub fn new(pins: &'static [PinDescriptor]) -> PinRegistry {
        assert!(pins.len() <= MAX_PINS, "pin table too large");
        PinRegistry { pins, usage: [None; MAX_PINS], gpio_live: 0, pwm_live: 0 }
    }

    fn index_of(&self, pin: u8) -> Option<usize> {
        self.pins.iter().position(|d| d.pin == pin)
    }

    /// Claim `pin` for `usage`.
    ///
    /// Every pin in the table can be plain GPIO; PWM and EINT additionally
    /// need the matching channel/line in the pin's descriptor. A PWM pin
    /// holds both register blocks, since its function mux lives in the
    /// I/O-port block.
    pub fn acquire(&mut self, pin: u8, usage: PinUse) -> Result<&'static PinDescriptor, Error> {
        let idx = self.index_of(pin).ok_or(Error::PinNotFound(pin))?;
        let desc = &self.pins[idx];
        let supported = match usage {
            PinUse::Gpio => true,
            PinUse::Pwm => desc.pwm.is_some(),
            PinUse::Eint => desc.eint.is_some(),
        };
        if !supported {
            return Err(Error::CapabilityUnsupported(pin, usage));
        }
        if let Some(held) = self.usage[idx] {
            return Err(Error::PinBusy(pin, held));
        }
        self.usage[idx] = Some(usage);
        self.gpio_live += 1;
        if usage == PinUse::Pwm {
            self.pwm_live += 1;
        }
        Ok(desc)
    }

    /// Check that `pin` is currently held as `usage` before a register
    /// transaction on its behalf.
    pub fn require(&self, pin: u8, usage: PinUse) -> Result<&'static PinDescriptor, Error> {
        let idx = self.index_of(pin).ok_or(Error::PinNotFound(pin))?;
        match self.usage[idx] {
            None => Err(Error::PinNotInitialized(pin)),
            Some(held) if held != usage => Err(Error::WrongCapability(pin, held)),
            Some(_) => Ok(&self.pins[idx]),
        }
    }

    /// Return `pin` to the free pool. Idempotent; pins not in the table are
    /// ignored.
    pub fn release(&mut self, pin: u8) {
        if let Some(idx) = self.index_of(pin) {
            if let Some(held) = self.usage[idx].take() {
                self.gpio_live -= 1;
                if held == PinUse::Pwm {
                    self.pwm_live -= 1;
                }
            }
        }
    }

    pub fn usage(&self, pin: u8) -> Option<PinUse> {
        self.index_of(pin).and_then(|idx| self.usage[idx])
    }

    pub fn gpio_pins_live(&self) -> usize {
        self.gpio_live
    }

    pub fn pwm_pins_live(&self) -> usize {
        self.pwm_live
    }

    /// True if another held PWM pin drives the channel pair that shares
    /// `pin`'s prescaler byte.
    pub fn sibling_pwm_active(&self, pin: u8) -> bool {
        let idx = match self.index_of(pin) {
            Some(idx) => idx,
            None => return false,
        };
        let channel = match self.pins[idx].pwm {
            Some(channel) => channel,
            None => return false,
        };
        self.pins.iter().enumerate().any(|(i, d)| {
            i != idx
                && self.usage[i] == Some(PinUse::Pwm)
                && d.pwm.map_or(false, |c| c / 2 == channel / 2)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::nanopi::NANOPI;

    fn registry() -> PinRegistry {
        PinRegistry::new(NANOPI.pins)
    }

    #[test]
    fn test_acquire_then_require_then_release() {
        let mut reg = registry();
        reg.acquire(40, PinUse::Gpio).unwrap();
        reg.require(40, PinUse::Gpio).unwrap();
        assert_eq!(reg.acquire(40, PinUse::Gpio), Err(Error::PinBusy(40, PinUse::Gpio)));
        assert_eq!(reg.acquire(40, PinUse::Eint), Err(Error::PinBusy(40, PinUse::Gpio)));
        reg.release(40);
        reg.acquire(40, PinUse::Eint).unwrap();
    }

    #[test]
    fn test_unknown_pin() {
        let mut reg = registry();
        assert_eq!(reg.acquire(1, PinUse::Gpio), Err(Error::PinNotFound(1)));
        assert_eq!(reg.require(1, PinUse::Gpio), Err(Error::PinNotFound(1)));
        // release of an unknown pin is a no-op, not an error
        reg.release(1);
    }

    #[test]
    fn test_capability_not_offered() {
        let mut reg = registry();
        // pin 24 (GPL13) is plain GPIO: no TOUT channel, no EINT line
        assert_eq!(reg.acquire(24, PinUse::Pwm), Err(Error::CapabilityUnsupported(24, PinUse::Pwm)));
        assert_eq!(reg.acquire(24, PinUse::Eint), Err(Error::CapabilityUnsupported(24, PinUse::Eint)));
        reg.acquire(24, PinUse::Gpio).unwrap();
        // pin 22 (TOUT0) has no EINT line
        assert_eq!(reg.acquire(22, PinUse::Eint), Err(Error::CapabilityUnsupported(22, PinUse::Eint)));
    }

    #[test]
    fn test_require_distinguishes_free_and_wrong() {
        let mut reg = registry();
        assert_eq!(reg.require(22, PinUse::Pwm), Err(Error::PinNotInitialized(22)));
        reg.acquire(22, PinUse::Gpio).unwrap();
        assert_eq!(reg.require(22, PinUse::Pwm), Err(Error::WrongCapability(22, PinUse::Gpio)));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut reg = registry();
        reg.acquire(7, PinUse::Gpio).unwrap();
        reg.release(7);
        reg.release(7);
        assert_eq!(reg.gpio_pins_live(), 0);
    }

    #[test]
    fn test_live_counts() {
        let mut reg = registry();
        reg.acquire(7, PinUse::Gpio).unwrap();
        reg.acquire(11, PinUse::Eint).unwrap();
        reg.acquire(22, PinUse::Pwm).unwrap();
        assert_eq!(reg.gpio_pins_live(), 3);
        assert_eq!(reg.pwm_pins_live(), 1);
        reg.release(22);
        assert_eq!(reg.gpio_pins_live(), 2);
        assert_eq!(reg.pwm_pins_live(), 0);
        reg.release(7);
        reg.release(11);
        assert_eq!(reg.gpio_pins_live(), 0);
    }

    #[test]
    fn test_sibling_prescaler_pair() {
        let mut reg = registry();
        // TOUT0 (pin 22) and TOUT1 (pin 26) share a prescaler byte;
        // TOUT2 (pin 16) lives in the other pair.
        reg.acquire(22, PinUse::Pwm).unwrap();
        assert!(!reg.sibling_pwm_active(22));
        reg.acquire(26, PinUse::Pwm).unwrap();
        assert!(reg.sibling_pwm_active(22));
        assert!(reg.sibling_pwm_active(26));
        reg.acquire(16, PinUse::Pwm).unwrap();
        assert!(!reg.sibling_pwm_active(16));
        reg.release(26);
        assert!(!reg.sibling_pwm_active(22));
    }
}
