use crate::reg::Reg;
use crate::utils::{odd_parity, WORD_DATA_MASK};

use log::warn;

///
/// Parity generation and checking. Every word strobed out of memory is
/// tested for odd parity over all sixteen stored bits; a miss latches the
/// PALM alarm, which only the monitor's clear command releases. P holds
/// the last word assembled by the GP pulse (data plus generated parity),
/// P2 is the one-pulse-delayed copy of the parity bit kept for display,
/// and G15 is the parity bit that rode in with the last memory read.
///
pub struct Par {
    pub p: Reg,
    pub p2: Reg,
    pub g15: Reg,
    pub palm: Reg,
}

impl Par {
    pub fn new() -> Par {
        Par {
            p: Reg::new(16),
            p2: Reg::new(1),
            g15: Reg::new(1),
            palm: Reg::new(1),
        }
    }

    pub fn genrst(&mut self) {
        // PALM survives GENRST; only CLR_PALM releases it
        self.p.clear();
        self.p2.clear();
        self.g15.clear();
    }

    /// Check a word arriving from memory (the SBWG pulse).
    pub fn check_read(&mut self, word: u16, cadr: u16) {
        self.g15.write((word >> 14) & 1);
        if word.count_ones() % 2 != 1 {
            warn!("PARITY ALARM: even parity at {:05o} ({:06o})", cadr, word);
            self.palm.write(1);
        }
    }

    /// Undefined-location read: data is forced to zero and PALM latches.
    pub fn flag_undefined(&mut self, cadr: u16) {
        warn!("PARITY ALARM: undefined location {:05o}", cadr);
        self.palm.write(1);
    }

    /// The GP pulse: regenerate odd parity over the data half of G.
    pub fn generate(&mut self, g: u16) {
        let data = g & WORD_DATA_MASK;
        self.p.write(data | (odd_parity(data) << 14));
    }

    /// The WP2 pulse: pipeline the generated parity bit for display.
    pub fn wp2(&mut self) {
        self.p2.write((self.p.read() >> 14) & 1);
    }

    /// Monitor command: asynchronously clear the parity alarm.
    pub fn clear_palm(&mut self) {
        self.palm.clear();
    }

    /// The complete stored word for the restore path: G data + parity.
    pub fn word_for_store(&self, g: u16) -> u16 {
        let data = g & WORD_DATA_MASK;
        data | (odd_parity(data) << 14)
    }
}

#[cfg(test)]
mod par_tests {
    use super::*;
    use crate::utils::word_with_parity;

    #[test]
    fn good_parity_passes() {
        let mut par = Par::new();
        par.check_read(word_with_parity(0o12345), 0o100);
        assert_eq!(0, par.palm.read());
    }

    #[test]
    fn even_parity_latches_palm() {
        let mut par = Par::new();
        // flip the parity bit on an otherwise valid word
        let word = word_with_parity(0o12345) ^ 0o40000;
        par.check_read(word, 0o100);
        assert_eq!(1, par.palm.read());

        // latches until cleared
        par.check_read(word_with_parity(0o12345), 0o100);
        assert_eq!(1, par.palm.read());
        par.clear_palm();
        assert_eq!(0, par.palm.read());
    }

    #[test]
    fn generated_parity_is_odd() {
        let mut par = Par::new();
        for value in [0u16, 0o1, 0o77777, 0o52525] {
            par.generate(crate::utils::pack_word(value));
            assert_eq!(1, par.p.read().count_ones() % 2);
        }
    }
}
