use crate::consts::ctr::*;
use crate::consts::mm::MM_OVCTR;
use crate::reg::Reg;

use log::debug;

/// Where a finished counter cell sends its overflow.
pub enum Chain {
    Counter(usize),
    Rupt(usize),
}

///
/// Involuntary-counter priority logic. The pc_up/pc_dn lines are set-only
/// one-shots written by the scaler, the ALU overflow logic and the
/// monitor; WPCTR folds them into the UpCELL/DnCELL synchronizers (and
/// clears them, so a request is counted exactly once). The sequencer
/// steals an instruction boundary per pending bit and services cells
/// lowest-index-first, increments before decrements.
///
pub struct Ctr {
    pub pc_up: [bool; NUM_CELLS],
    pub pc_dn: [bool; NUM_CELLS],
    pub up_cell: Reg,
    pub dn_cell: Reg,
    /// cell picked by RSCT for the cycle in flight: (index, increment)
    pub serviced: Option<(usize, bool)>,
}

impl Ctr {
    pub fn new() -> Ctr {
        Ctr {
            pc_up: [false; NUM_CELLS],
            pc_dn: [false; NUM_CELLS],
            up_cell: Reg::new(7),
            dn_cell: Reg::new(7),
            serviced: None,
        }
    }

    pub fn genrst(&mut self) {
        self.pc_up = [false; NUM_CELLS];
        self.pc_dn = [false; NUM_CELLS];
        self.up_cell.clear();
        self.dn_cell.clear();
        self.serviced = None;
    }

    pub fn request_up(&mut self, cell: usize) {
        self.pc_up[cell] = true;
    }

    pub fn request_dn(&mut self, cell: usize) {
        self.pc_dn[cell] = true;
    }

    /// The WPCTR pulse: latch the one-shots into the priority cells.
    pub fn wpctr(&mut self) {
        let mut up = self.up_cell.read();
        let mut dn = self.dn_cell.read();
        for k in 0..NUM_CELLS {
            if self.pc_up[k] {
                up |= 1 << k;
                self.pc_up[k] = false;
            }
            if self.pc_dn[k] {
                dn |= 1 << k;
                self.pc_dn[k] = false;
            }
        }
        self.up_cell.write(up);
        self.dn_cell.write(dn);
    }

    pub fn pending(&self) -> bool {
        self.up_cell.read() != 0 || self.dn_cell.read() != 0
    }

    /// Highest-priority pending cell: increments first, lowest index first.
    pub fn next_service(&self) -> Option<(usize, bool)> {
        let up = self.up_cell.read();
        let dn = self.dn_cell.read();
        for k in 0..NUM_CELLS {
            if up & (1 << k) != 0 {
                return Some((k, true));
            }
        }
        for k in 0..NUM_CELLS {
            if dn & (1 << k) != 0 {
                return Some((k, false));
            }
        }
        None
    }

    ///
    /// The RSCT pulse: select the serviced cell, knock its priority bit
    /// down and drive the cell's erasable address for the WS that follows
    /// on the same pulse.
    ///
    pub fn rsct(&mut self) -> u16 {
        match self.next_service() {
            Some((k, up)) => {
                if up {
                    self.up_cell.write(self.up_cell.read() & !(1 << k));
                } else {
                    self.dn_cell.write(self.dn_cell.read() & !(1 << k));
                }
                self.serviced = Some((k, up));
                debug!(
                    "CTR servicing cell {} ({})",
                    k,
                    if up { "PINC" } else { "MINC" }
                );
                MM_OVCTR + k as u16
            }
            None => {
                // spurious PINC with nothing pending; address the overflow
                // counter and let the increment be harmless
                self.serviced = None;
                MM_OVCTR
            }
        }
    }

    /// Overflow destination for a cell that just wrapped.
    pub fn chain_target(cell: usize) -> Option<Chain> {
        match cell {
            TIME1 => Some(Chain::Counter(TIME2)),
            TIME3 => Some(Chain::Rupt(crate::consts::rupt::T3RUPT)),
            TIME4 => Some(Chain::Rupt(crate::consts::rupt::DSRUPT)),
            UPLINK => Some(Chain::Rupt(crate::consts::rupt::UPRUPT)),
            _ => None,
        }
    }
}
