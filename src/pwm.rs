//! PWM: quantizing nanosecond timings onto the 16-bit timers, and the
//! register transactions that apply them.
//!
//! The clock tree in front of each counter is an 8-bit prescaler (shared by
//! a channel pair) followed by a per-channel divider mux, so a requested
//! period has to be hunted for across the discrete (prescaler, divider,
//! counter) space. [`solve_period`] does that search; [`solve_duty`] derives
//! the compare value once a period is chosen. Both are pure and involve no
//! hardware.

use crate::pins::PinUse;
use crate::sfr;
use crate::{gpio, Error, IoPorts};

const COUNTER_MAX: u128 = 65535;
const PRESCALER_MAX: u32 = 255;

/// One solved timer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmTiming {
    /// Prescaler register value; the divide factor is `prescaler + 1`.
    pub prescaler: u8,
    /// Index into the board's divider table, which is also the divider mux
    /// register value.
    pub divider_index: u8,
    /// Counter reload value, 1..=65535.
    pub counter: u16,
}

/// Numerator of one tick in nanoseconds: tick = denom / clock_hz.
/// Keeping the rational form keeps the search exact.
const fn denom(prescaler: u32, divider: u32) -> u128 {
    (prescaler as u128 + 1) * divider as u128 * 1_000_000_000
}

/// Search the discrete (prescaler, divider, counter) space for the triple
/// landing closest to `period_ns`, and return it together with the residual
/// error in nanoseconds (achieved minus requested, signed).
///
/// Enumeration order is divider index ascending, then prescaler ascending,
/// and only a strictly smaller quantization error displaces the incumbent:
/// among equally good candidates the finest time resolution wins (smallest
/// divider, then smallest prescaler). Errors are compared exactly, in
/// rational arithmetic, so the choice does not depend on float rounding.
pub fn solve_period(
    clock_hz: u32,
    dividers: &[u32],
    period_ns: u64,
) -> Result<(PwmTiming, f64), Error> {
    assert!(!dividers.is_empty(), "divider table is empty");
    let clk = clock_hz as u128;
    let d_min = denom(0, dividers[0]);
    let d_max = denom(PRESCALER_MAX, dividers[dividers.len() - 1]);
    // shortest period: one tick of the fastest clocking; longest: a full
    // counter of the slowest
    let min_ns = ((d_min + clk - 1) / clk) as u64;
    let max_ns = (COUNTER_MAX * d_max / clk) as u64;
    if period_ns < min_ns || period_ns > max_ns {
        return Err(Error::PeriodOutOfRange { min_ns, max_ns });
    }

    let n = period_ns as u128 * clk;
    let mut best: Option<(PwmTiming, u128, u128)> = None;
    for (div_idx, &div) in dividers.iter().enumerate() {
        for prescaler in 0..=PRESCALER_MAX {
            let d = denom(prescaler, div);
            if n < d || n > COUNTER_MAX * d {
                continue;
            }
            let counter = ((n + d / 2) / d).clamp(1, COUNTER_MAX);
            let achieved = counter * d;
            let err = if achieved > n { achieved - n } else { n - achieved };
            // err/d against best_err/best_d, cross-multiplied to stay exact
            let better = match &best {
                None => true,
                Some((_, best_err, best_d)) => err * best_d < *best_err * d,
            };
            if better {
                let timing = PwmTiming {
                    prescaler: prescaler as u8,
                    divider_index: div_idx as u8,
                    counter: counter as u16,
                };
                best = Some((timing, err, d));
            }
        }
    }

    let (timing, _, d) = best.ok_or(Error::NoFeasibleSolution)?;
    let achieved_ns = (timing.counter as u128 * d) as f64 / clock_hz as f64;
    Ok((timing, achieved_ns - period_ns as f64))
}

/// Derive the compare value for `duty_ns` against a solved timing, where
/// `period_ns` is the period the timing was solved for. Returns the value
/// and its residual error in nanoseconds.
pub fn solve_duty(
    clock_hz: u32,
    dividers: &[u32],
    timing: &PwmTiming,
    period_ns: u64,
    duty_ns: u64,
) -> Result<(u16, f64), Error> {
    if duty_ns > period_ns {
        return Err(Error::DutyExceedsPeriod);
    }
    let clk = clock_hz as u128;
    let d = denom(timing.prescaler as u32, dividers[timing.divider_index as usize]);
    let n = duty_ns as u128 * clk;
    let duty_counter = ((n + d / 2) / d).min(timing.counter as u128);
    let achieved_ns = (duty_counter * d) as f64 / clock_hz as f64;
    Ok((duty_counter as u16, achieved_ns - duty_ns as f64))
}

impl IoPorts {
    /// Claim `pin` for PWM, mux it to its TOUT function, and program the
    /// timer for `period_ns`/`duty_ns`. Returns the residual period error
    /// in nanoseconds; the timer is left stopped until [`IoPorts::pwm_start`].
    ///
    /// The prescaler byte is shared by the channel pair (0/1 and 2/3), so
    /// programming this channel retunes a sibling that is already running.
    pub fn pwm_init(&mut self, pin: u8, period_ns: u64, duty_ns: u64) -> Result<f64, Error> {
        let desc = self.registry.acquire(pin, PinUse::Pwm)?;
        let board = self.board;
        // solve both timings up front so a bad request leaves no trace
        let solved = solve_period(board.pwm_clk_hz, board.pwm_dividers, period_ns)
            .and_then(|(timing, period_err)| {
                solve_duty(board.pwm_clk_hz, board.pwm_dividers, &timing, period_ns, duty_ns)
                    .map(|(duty_counter, _)| (timing, period_err, duty_counter))
            });
        let (timing, period_err, duty_counter) = match solved {
            Ok(s) => s,
            Err(e) => {
                self.registry.release(pin);
                return Err(e);
            }
        };
        if let Err(e) = self.ensure_gpio_window().and_then(|_| self.ensure_pwm_window()) {
            self.registry.release(pin);
            self.reap_windows();
            return Err(e);
        }
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        gpio::set_function(self.gpio_window(), desc, sfr::FUNC_ALT);
        let win = self.pwm_window();
        win.rmwf(sfr::prescaler_field(channel), timing.prescaler as u32);
        win.rmwf(sfr::divider_field(channel), timing.divider_index as u32);
        win.rmwf(sfr::count_field(channel), timing.counter as u32);
        win.rmwf(sfr::compare_field(channel), duty_counter as u32);
        log::trace!("pin {} -> pwm channel {}, {:?}", pin, channel, timing);
        Ok(period_err)
    }

    /// Start the timer. The count and compare buffers are first loaded into
    /// the working registers with a manual-update pulse, then the pulse is
    /// dropped and the run bit set; setting the run bit alone would start
    /// the counter from whatever stale values the working registers held.
    pub fn pwm_start(&mut self, pin: u8) -> Result<(), Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        let field = sfr::tcon_field(channel);
        let win = self.pwm_window();
        win.rmwf(field, sfr::TCON_AUTO_RELOAD | sfr::TCON_MANUAL_UPDATE);
        win.rmwf(field, sfr::TCON_AUTO_RELOAD | sfr::TCON_START);
        Ok(())
    }

    /// Stop the timer.
    pub fn pwm_stop(&mut self, pin: u8) -> Result<(), Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        self.pwm_window().rmwf(sfr::tcon_field(channel), 0);
        Ok(())
    }

    /// Retune the period of a running channel. Returns the residual error
    /// in nanoseconds. The compare value is left alone; follow up with
    /// [`IoPorts::pwm_duty_cycle`] to keep the duty proportional.
    pub fn pwm_period(&mut self, pin: u8, period_ns: u64) -> Result<f64, Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let board = self.board;
        let (timing, period_err) = solve_period(board.pwm_clk_hz, board.pwm_dividers, period_ns)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        let win = self.pwm_window();
        win.rmwf(sfr::prescaler_field(channel), timing.prescaler as u32);
        win.rmwf(sfr::divider_field(channel), timing.divider_index as u32);
        win.rmwf(sfr::count_field(channel), timing.counter as u32);
        Ok(period_err)
    }

    /// Period currently programmed, reconstructed from the live registers,
    /// in nanoseconds.
    pub fn pwm_get_period(&self, pin: u8) -> Result<u64, Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        let (counter, d) = self.live_timing(channel);
        let clk = self.board.pwm_clk_hz as u128;
        Ok(((counter as u128 * d + clk / 2) / clk) as u64)
    }

    /// Retune the duty cycle, measured against the period in the live
    /// registers. Returns the residual error in nanoseconds.
    pub fn pwm_duty_cycle(&mut self, pin: u8, duty_ns: u64) -> Result<f64, Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        let (counter, d) = self.live_timing(channel);
        let clk = self.board.pwm_clk_hz as u128;
        let n = duty_ns as u128 * clk;
        if n > counter as u128 * d {
            return Err(Error::DutyExceedsPeriod);
        }
        let compare = ((n + d / 2) / d).min(counter as u128);
        self.pwm_window().rmwf(sfr::compare_field(channel), compare as u32);
        Ok((compare * d) as f64 / clk as f64 - duty_ns as f64)
    }

    /// Duty cycle currently programmed, reconstructed from the live
    /// registers, in nanoseconds.
    pub fn pwm_get_duty_cycle(&self, pin: u8) -> Result<u64, Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        let compare = self.pwm_window_ref().rf(sfr::compare_field(channel));
        let (_, d) = self.live_timing(channel);
        let clk = self.board.pwm_clk_hz as u128;
        Ok(((compare as u128 * d + clk / 2) / clk) as u64)
    }

    /// Stop the channel, zero its buffers, and reset its divider (and the
    /// shared prescaler too, unless the sibling channel of the pair still
    /// holds it), then return the pad to its reset function and free the
    /// pin. Blocks with no live pins left are unmapped.
    pub fn pwm_close(&mut self, pin: u8) -> Result<(), Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        let sibling_active = self.registry.sibling_pwm_active(pin);
        let win = self.pwm_window();
        win.rmwf(sfr::tcon_field(channel), 0);
        win.rmwf(sfr::compare_field(channel), 0);
        win.rmwf(sfr::count_field(channel), 0);
        win.rmwf(sfr::divider_field(channel), 0);
        if !sibling_active {
            win.rmwf(sfr::prescaler_field(channel), 0);
        }
        let board = self.board;
        gpio::set_function(self.gpio_window(), desc, board.func_reset);
        self.registry.release(pin);
        self.reap_windows();
        log::trace!("pin {} closed", pin);
        Ok(())
    }

    /// Close every pin currently held as PWM.
    pub fn pwm_close_all(&mut self) -> Result<(), Error> {
        for i in 0..self.board.pins.len() {
            let pin = self.board.pins[i].pin;
            if self.registry.usage(pin) == Some(PinUse::Pwm) {
                self.pwm_close(pin)?;
            }
        }
        Ok(())
    }

    // Direct register access, for callers that need exact control beyond
    // what the solver chooses.

    pub fn pwm_counter(&mut self, pin: u8, value: u16) -> Result<(), Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        self.pwm_window().rmwf(sfr::count_field(channel), value as u32);
        Ok(())
    }

    pub fn pwm_get_counter(&self, pin: u8) -> Result<u16, Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        Ok(self.pwm_window_ref().rf(sfr::count_field(channel)) as u16)
    }

    pub fn pwm_compare(&mut self, pin: u8, value: u16) -> Result<(), Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        self.pwm_window().rmwf(sfr::compare_field(channel), value as u32);
        Ok(())
    }

    pub fn pwm_get_compare(&self, pin: u8) -> Result<u16, Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        Ok(self.pwm_window_ref().rf(sfr::compare_field(channel)) as u16)
    }

    /// Write the channel pair's shared prescaler byte directly.
    pub fn pwm_prescaler(&mut self, pin: u8, value: u8) -> Result<(), Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        self.pwm_window().rmwf(sfr::prescaler_field(channel), value as u32);
        Ok(())
    }

    pub fn pwm_get_prescaler(&self, pin: u8) -> Result<u8, Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        Ok(self.pwm_window_ref().rf(sfr::prescaler_field(channel)) as u8)
    }

    /// Write the channel's divider mux nibble directly.
    pub fn pwm_divider(&mut self, pin: u8, value: u8) -> Result<(), Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        self.pwm_window().rmwf(sfr::divider_field(channel), value as u32);
        Ok(())
    }

    pub fn pwm_get_divider(&self, pin: u8) -> Result<u8, Error> {
        let desc = self.registry.require(pin, PinUse::Pwm)?;
        let channel = desc.pwm.expect("pwm capability checked at acquire");
        Ok(self.pwm_window_ref().rf(sfr::divider_field(channel)) as u8)
    }

    /// Live (counter, tick numerator) pair for a channel; tick_ns =
    /// numerator / clock_hz.
    fn live_timing(&self, channel: u8) -> (u32, u128) {
        let win = self.pwm_window_ref();
        let counter = win.rf(sfr::count_field(channel));
        let prescaler = win.rf(sfr::prescaler_field(channel));
        let idx = win.rf(sfr::divider_field(channel)) as usize;
        // a raw divider write can park the mux outside the table; read
        // those back as /1
        let div = self.board.pwm_dividers.get(idx).copied().unwrap_or(1);
        (counter, denom(prescaler, div))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::nanopi::NANOPI;

    const CLK: u32 = 50_000_000;
    const DIVIDERS: &[u32] = &[1, 2, 4, 8, 16];

    #[test]
    fn test_solver_exact_1khz() {
        // 1 kHz at 50 MHz: 20 ns ticks, 50000 of them, no error
        let (timing, err) = solve_period(CLK, DIVIDERS, 1_000_000).unwrap();
        assert_eq!(timing, PwmTiming { prescaler: 0, divider_index: 0, counter: 50000 });
        assert_eq!(err, 0.0);
    }

    #[test]
    fn test_solver_reconstruction_within_one_tick() {
        for period in [21u64, 999, 12_345, 1_000_000, 777_777_777, 5_368_627_200] {
            let (timing, err) = solve_period(CLK, DIVIDERS, period).unwrap();
            let tick = (timing.prescaler as f64 + 1.0)
                * DIVIDERS[timing.divider_index as usize] as f64
                * 1e9
                / CLK as f64;
            assert!(err.abs() <= tick, "period {} err {} tick {}", period, err, tick);
            assert!(timing.counter >= 1);
        }
    }

    #[test]
    fn test_solver_range_check() {
        // fastest tick is 20 ns, slowest full counter is 65535 * 81920 ns
        let max_ns = 65535 * 81920;
        assert_eq!(
            solve_period(CLK, DIVIDERS, 19),
            Err(Error::PeriodOutOfRange { min_ns: 20, max_ns })
        );
        assert_eq!(
            solve_period(CLK, DIVIDERS, max_ns + 1),
            Err(Error::PeriodOutOfRange { min_ns: 20, max_ns })
        );
        // both bounds are themselves solvable
        solve_period(CLK, DIVIDERS, 20).unwrap();
        solve_period(CLK, DIVIDERS, max_ns).unwrap();
    }

    #[test]
    fn test_solver_tie_prefers_finest_resolution() {
        // with a 1 GHz clock every (prescaler+1)*divider divides 100, so
        // plenty of candidates hit the period exactly; the first-found one
        // has the smallest divider and prescaler, i.e. the most counter
        // steps to play with
        let (timing, err) = solve_period(1_000_000_000, &[1, 2], 100).unwrap();
        assert_eq!(timing, PwmTiming { prescaler: 0, divider_index: 0, counter: 100 });
        assert_eq!(err, 0.0);
    }

    #[test]
    fn test_solver_skips_unrepresentable_prescalers() {
        // 70007 = 7 * 73 * 137; one tick per ns can't fit 70007 counts, so
        // the first exact hit is prescaler 6 (factor 7)
        let (timing, err) = solve_period(1_000_000_000, &[1, 2], 70_007).unwrap();
        assert_eq!(timing, PwmTiming { prescaler: 6, divider_index: 0, counter: 10001 });
        assert_eq!(err, 0.0);
    }

    #[test]
    fn test_duty_edges() {
        let (timing, _) = solve_period(CLK, DIVIDERS, 1_000_000).unwrap();
        let (zero, _) = solve_duty(CLK, DIVIDERS, &timing, 1_000_000, 0).unwrap();
        assert_eq!(zero, 0);
        let (full, _) = solve_duty(CLK, DIVIDERS, &timing, 1_000_000, 1_000_000).unwrap();
        assert_eq!(full, timing.counter);
        assert_eq!(
            solve_duty(CLK, DIVIDERS, &timing, 1_000_000, 1_000_001),
            Err(Error::DutyExceedsPeriod)
        );
    }

    #[test]
    fn test_duty_rounds_and_clamps() {
        let (timing, _) = solve_period(CLK, DIVIDERS, 1_000_000).unwrap();
        // a quarter of the period, exactly representable
        let (quarter, err) = solve_duty(CLK, DIVIDERS, &timing, 1_000_000, 250_000).unwrap();
        assert_eq!(quarter, 12500);
        assert_eq!(err, 0.0);
        // 30 ns against 20 ns ticks rounds up to 2 ticks
        let (two, _) = solve_duty(CLK, DIVIDERS, &timing, 1_000_000, 30).unwrap();
        assert_eq!(two, 2);
    }

    // Controller tests run against the NanoPi table: 66.5 MHz PCLK, so a
    // 2 ms period lands exactly on prescaler 3, divider /1, 33250 counts.

    fn io() -> IoPorts {
        IoPorts::new(&NANOPI)
    }

    #[test]
    fn test_init_programs_all_timer_registers() {
        let mut io = io();
        io.pwm_init(22, 2_000_000, 1_000_000).unwrap(); // TOUT0
        let win = io.pwm_window_ref();
        assert_eq!(win.rf(sfr::prescaler_field(0)), 3);
        assert_eq!(win.rf(sfr::divider_field(0)), 0);
        assert_eq!(win.rf(sfr::count_field(0)), 33250);
        assert_eq!(win.rf(sfr::compare_field(0)), 16625);
        // and the pad is muxed to its TOUT function
        assert_eq!(
            io.gpio_window_ref().rf(sfr::con_field(sfr::Bank::B, 0)),
            sfr::FUNC_ALT
        );
    }

    #[test]
    fn test_get_period_and_duty_roundtrip() {
        let mut io = io();
        io.pwm_init(22, 2_000_000, 1_000_000).unwrap();
        assert_eq!(io.pwm_get_period(22).unwrap(), 2_000_000);
        assert_eq!(io.pwm_get_duty_cycle(22).unwrap(), 1_000_000);
    }

    #[test]
    fn test_start_sequences_reload_then_run() {
        let mut io = io();
        io.pwm_init(22, 2_000_000, 500_000).unwrap();
        io.pwm_start(22).unwrap();
        let tcon = io.pwm_window_ref().rf(sfr::tcon_field(0));
        assert_eq!(tcon, sfr::TCON_AUTO_RELOAD | sfr::TCON_START);
        assert_eq!(tcon & sfr::TCON_MANUAL_UPDATE, 0);
        io.pwm_stop(22).unwrap();
        assert_eq!(io.pwm_window_ref().rf(sfr::tcon_field(0)), 0);
    }

    #[test]
    fn test_prescaler_shared_across_pair() {
        let mut io = io();
        io.pwm_init(22, 2_000_000, 0).unwrap(); // TOUT0: prescaler 3
        io.pwm_init(26, 1_000_000, 0).unwrap(); // TOUT1: prescaler 1
        let win = io.pwm_window_ref();
        // the pair shares one byte; the later init owns it
        assert_eq!(win.rf(sfr::prescaler_field(0)), 1);
        assert_eq!(win.rf(sfr::prescaler_field(1)), 1);
        // dividers and counters stay per-channel
        assert_eq!(win.rf(sfr::count_field(0)), 33250);
        assert_eq!(win.rf(sfr::count_field(1)), 33250);
    }

    #[test]
    fn test_close_keeps_prescaler_for_live_sibling() {
        let mut io = io();
        io.pwm_init(22, 2_000_000, 0).unwrap();
        io.pwm_init(26, 2_000_000, 0).unwrap();
        io.pwm_close(26).unwrap();
        // sibling TOUT0 still runs on the shared byte
        assert_eq!(io.pwm_window_ref().rf(sfr::prescaler_field(0)), 3);
        assert_eq!(io.pwm_window_ref().rf(sfr::count_field(1)), 0);
        io.pwm_close(22).unwrap();
        // last of the pair gone: block unmapped entirely
        assert!(io.pwm.is_none());
    }

    #[test]
    fn test_close_resets_channel() {
        let mut io = io();
        io.pwm_init(22, 2_000_000, 1_000_000).unwrap();
        io.pwm_init(16, 2_000_000, 0).unwrap(); // TOUT2 keeps the window alive
        io.pwm_start(22).unwrap();
        io.pwm_close(22).unwrap();
        let win = io.pwm_window_ref();
        assert_eq!(win.rf(sfr::tcon_field(0)), 0);
        assert_eq!(win.rf(sfr::count_field(0)), 0);
        assert_eq!(win.rf(sfr::compare_field(0)), 0);
        assert_eq!(win.rf(sfr::divider_field(0)), 0);
        assert_eq!(win.rf(sfr::prescaler_field(0)), 0);
        assert_eq!(io.registry.usage(22), None);
        assert_eq!(
            io.gpio_window_ref().rf(sfr::con_field(sfr::Bank::B, 0)),
            NANOPI.func_reset
        );
    }

    #[test]
    fn test_failed_init_leaves_pin_free() {
        let mut io = io();
        assert!(matches!(
            io.pwm_init(22, 1, 0),
            Err(Error::PeriodOutOfRange { .. })
        ));
        assert!(io.pwm.is_none());
        // the rollback freed the pin for other uses
        io.gpio_init(22, crate::IoDir::Input, crate::IoPull::Up).unwrap();
    }

    #[test]
    fn test_pwm_refused_without_channel() {
        let mut io = io();
        assert_eq!(
            io.pwm_init(40, 1_000_000, 0),
            Err(Error::CapabilityUnsupported(40, PinUse::Pwm))
        );
    }

    #[test]
    fn test_duty_retune_against_live_period() {
        let mut io = io();
        io.pwm_init(22, 2_000_000, 0).unwrap();
        // 800 us is an exact number of 60.15 ns ticks (13300 of them)
        io.pwm_duty_cycle(22, 800_000).unwrap();
        assert_eq!(io.pwm_get_compare(22).unwrap(), 13300);
        assert_eq!(io.pwm_get_duty_cycle(22).unwrap(), 800_000);
        assert_eq!(io.pwm_duty_cycle(22, 2_000_001), Err(Error::DutyExceedsPeriod));
    }

    #[test]
    fn test_direct_register_access() {
        let mut io = io();
        io.pwm_init(22, 2_000_000, 0).unwrap();
        io.pwm_counter(22, 1234).unwrap();
        io.pwm_compare(22, 567).unwrap();
        io.pwm_prescaler(22, 42).unwrap();
        io.pwm_divider(22, 2).unwrap();
        assert_eq!(io.pwm_get_counter(22).unwrap(), 1234);
        assert_eq!(io.pwm_get_compare(22).unwrap(), 567);
        assert_eq!(io.pwm_get_prescaler(22).unwrap(), 42);
        assert_eq!(io.pwm_get_divider(22).unwrap(), 2);
        // reconstruction follows the raw values: 1234 ticks of (42+1)*4/66.5 MHz
        let expect = (1234u128 * 43 * 4 * 1_000_000_000 + 33_250_000) / 66_500_000;
        assert_eq!(io.pwm_get_period(22).unwrap(), expect as u64);
    }
}
