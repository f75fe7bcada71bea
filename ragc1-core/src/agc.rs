use crate::adr::Adr;
use crate::alu::Alu;
use crate::consts::rupt;
use crate::crg::Crg;
use crate::ctr::Ctr;
use crate::dsky::{self, Dsky};
use crate::int::Int;
use crate::mbf::Mbf;
use crate::mem::Mem;
use crate::mon::Mon;
use crate::par::Par;
use crate::scl::Scl;
use crate::seq::Seq;
use crate::tpg::Tpg;
use crate::utils::unpack_word;

use log::debug;

///
/// The whole machine. One `Agc` owns every subsystem; `step()` advances it
/// by exactly one timing pulse. The monitor inputs live in `mon` and the
/// request one-shots are reachable through the methods below — everything
/// else is observable state.
///
pub struct Agc {
    pub mon: Mon,
    pub tpg: Tpg,
    pub scl: Scl,
    pub seq: Seq,
    pub alu: Alu,
    pub crg: Crg,
    pub adr: Adr,
    pub mbf: Mbf,
    pub par: Par,
    pub mem: Mem,
    pub ctr: Ctr,
    pub int: Int,
    pub dsky: Dsky,

    /// OR-tied buses, live for one pulse evaluation
    pub read_bus: u16,
    pub write_bus: u16,
    pub mem_data_bus: u16,
    pub mem_parity_bus: u16,
}

impl Agc {
    pub fn new() -> Agc {
        Agc {
            mon: Mon::default(),
            tpg: Tpg::new(),
            scl: Scl::new(),
            seq: Seq::new(),
            alu: Alu::new(),
            crg: Crg::new(),
            adr: Adr::new(),
            mbf: Mbf::new(),
            par: Par::new(),
            mem: Mem::new(),
            ctr: Ctr::new(),
            int: Int::new(),
            dsky: Dsky::new(),
            read_bus: 0,
            write_bus: 0,
            mem_data_bus: 0,
            mem_parity_bus: 0,
        }
    }

    ///
    /// The GENRST pulse: clear the machine down to its power-up state.
    /// Memory, the scaler and a latched parity alarm survive.
    ///
    pub fn genrst(&mut self) {
        self.crg.genrst();
        self.alu.genrst();
        self.adr.genrst();
        self.mbf.genrst();
        self.par.genrst();
        self.seq.genrst();
        self.ctr.genrst();
        self.int.genrst();
        self.dsky.genrst();
        self.crg.z.write(rupt::GOPROG);
    }

    /* ----- monitor request lines ----- */

    /// Raise an interrupt request, priority 1..5 as cell 0..4.
    pub fn raise_rupt(&mut self, cell: usize) {
        debug!("monitor rupt[{}]", cell);
        self.int.raise(cell);
    }

    /// One-shot plus input to a priority counter cell.
    pub fn pc_up(&mut self, cell: usize) {
        self.ctr.request_up(cell);
    }

    /// One-shot minus input to a priority counter cell.
    pub fn pc_dn(&mut self, cell: usize) {
        self.ctr.request_dn(cell);
    }

    /// DSKY key by host symbol; raises KEYRUPT with the keycode.
    pub fn key(&mut self, symbol: char) -> bool {
        match dsky::keycode(symbol) {
            Some(code) => {
                self.dsky.keypress(code);
                self.int.raise(rupt::KEYRUPT);
                true
            }
            None => false,
        }
    }

    /// Monitor command: clear the parity alarm.
    pub fn clear_palm(&mut self) {
        self.par.clear_palm();
    }

    /* ----- observables ----- */

    pub fn cadr(&self) -> u16 {
        self.adr.effective_address()
    }

    /// True for the single tick at TP1 of a freshly loaded instruction;
    /// the strict breakpoint condition keys off this.
    pub fn new_instruction(&self) -> bool {
        self.seq.new_instruction
    }

    /// Memory word as a 15-bit value, for display; never alarms.
    pub fn peek(&self, cadr: u16) -> u16 {
        match self.mem.read(cadr) {
            Some(word) => unpack_word(word),
            None => 0,
        }
    }

    /// The G register with its parity bit folded back in, as the panel
    /// displayed it.
    pub fn g_with_parity(&self) -> u16 {
        (self.mbf.g.read() & 0o137777) | (self.par.g15.read() << 14)
    }
}

impl Default for Agc {
    fn default() -> Agc {
        Agc::new()
    }
}
