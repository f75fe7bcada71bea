use crate::consts::rupt::{NUM_CELLS, VECTOR_BASE};
use crate::reg::Reg;

use log::debug;

///
/// Interrupt priority logic. rupt[0..4] are set-only one-shots for
/// priorities 1..5; WPCTR folds them into RPCELL. Entry is arbitrated at
/// instruction boundaries: lowest cell index (highest priority) wins, and
/// is blocked by the software inhibit (INHINT), the one-instruction
/// overflow guard (INHINT1) and an interrupt already in progress (IIP).
///
pub struct Int {
    pub rupt: [bool; NUM_CELLS],
    pub rpcell: Reg,
    pub inhint: Reg,
    /// countdown form of the overflow guard: armed by WOVI, stepped down
    /// after the arbitration at each instruction-load boundary, so it
    /// masks exactly the boundary that follows the overflow
    pub inhint1: u8,
    /// interrupt in progress; blocks nesting until RESUME
    pub iip: Reg,
    serviced: Option<usize>,
}

impl Int {
    pub fn new() -> Int {
        Int {
            rupt: [false; NUM_CELLS],
            rpcell: Reg::new(5),
            inhint: Reg::new(1),
            inhint1: 0,
            iip: Reg::new(1),
            serviced: None,
        }
    }

    pub fn genrst(&mut self) {
        self.rupt = [false; NUM_CELLS];
        self.rpcell.clear();
        self.inhint.clear();
        self.inhint1 = 0;
        self.iip.clear();
        self.serviced = None;
    }

    pub fn raise(&mut self, cell: usize) {
        self.rupt[cell] = true;
    }

    /// Latch the one-shots into RPCELL (runs with WPCTR).
    pub fn wpctr(&mut self) {
        let mut cells = self.rpcell.read();
        for k in 0..NUM_CELLS {
            if self.rupt[k] {
                cells |= 1 << k;
                self.rupt[k] = false;
            }
        }
        self.rpcell.write(cells);
    }

    pub fn pending(&self) -> bool {
        self.rpcell.read() != 0
    }

    pub fn eligible(&self) -> bool {
        self.pending() && self.inhint.read() == 0 && self.inhint1 == 0 && self.iip.read() == 0
    }

    fn highest(&self) -> Option<usize> {
        let cells = self.rpcell.read();
        (0..NUM_CELLS).find(|k| cells & (1 << k) != 0)
    }

    /// The RRPA pulse: drive the vector address of the winning cell.
    pub fn rrpa(&mut self) -> u16 {
        match self.highest() {
            Some(k) => {
                self.serviced = Some(k);
                VECTOR_BASE + 4 * k as u16
            }
            None => VECTOR_BASE,
        }
    }

    /// The KRPT pulse: knock the serviced cell down and set IIP.
    pub fn krpt(&mut self) {
        if let Some(k) = self.serviced.take() {
            self.rpcell.write(self.rpcell.read() & !(1 << k));
            debug!("RUPT priority {} entered", k + 1);
        }
        self.iip.write(1);
    }

    /// The CLRP pulse (RESUME): reopen interrupt entry.
    pub fn clrp(&mut self) {
        self.iip.clear();
    }

    /// The WOVI pulse: arm the overflow guard.
    pub fn wovi(&mut self) {
        self.inhint1 = 1;
    }

    /// One instruction-load boundary has passed.
    pub fn step_inhint1(&mut self) {
        if self.inhint1 > 0 {
            self.inhint1 -= 1;
        }
    }
}
