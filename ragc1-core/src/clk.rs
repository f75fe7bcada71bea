use crate::agc::Agc;
use crate::consts::{cs, ctr as ctrcell, sq};
use crate::cpm;
use crate::ctr::{Chain, Ctr};
use crate::seq::Boundary;
use crate::utils::{pack_word, sign_extend, unpack_word, WORD_DATA_MASK};

use log::{debug, trace};

///
/// Every control pulse the matrix can emit. The four sweeps below each
/// match on the subset they own: pure reads drive the read bus, RU runs
/// and then merges the adder, and the write sweep latches the write bus
/// or a computed value.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pulse {
    // read bus drivers
    RA,
    RB,
    RC,
    RG,
    RLP,
    RQ,
    RZ,
    RSC,
    RSCT,
    RRPA,
    R1,
    R1C,
    R2,
    R24,
    RSB,
    SBWG,
    // adder
    RU,
    // write pulses
    WA,
    WB,
    WG,
    WLP,
    WQ,
    WZ,
    WS,
    WSC,
    WX,
    WY,
    WY12,
    WALP,
    SLALP,
    WE,
    GP,
    WP2,
    CI,
    ST1,
    ST2,
    CLSTA,
    NISQ,
    CLISQ,
    WSQ,
    TSGN,
    TSGN2,
    TSGX,
    TMZ,
    TPZ,
    TOV,
    TRSM,
    TLSB,
    WOVI,
    WOVC,
    WOVR,
    WPCTR,
    KRPT,
    CLRP,
    CLCTR,
    CTR,
    GENRST,
}

impl Agc {
    ///
    /// One timing pulse: rebuild the control-pulse list for the current
    /// state, run the four sweeps over it, then the scaler pulses and the
    /// timing-state advance. Bus values never survive a tick.
    ///
    pub fn step(&mut self) {
        self.seq.new_instruction = false;

        cpm::control_pulse_matrix(self);

        // read sweep: registers onto the OR-tied read bus
        self.read_bus = 0;
        self.mem_data_bus = 0;
        self.mem_parity_bus = 0;
        for i in 0..self.seq.glbl_cp.len() {
            let p = self.seq.glbl_cp[i];
            self.do_exec_r(p);
        }

        // ALU read sweep: evaluate the adder
        self.alu.bus = 0;
        for i in 0..self.seq.glbl_cp.len() {
            let p = self.seq.glbl_cp[i];
            self.do_exec_r_alu(p);
        }

        // ALU OR sweep: seed the write bus, then merge ALU contributions
        self.write_bus = self.read_bus;
        for i in 0..self.seq.glbl_cp.len() {
            let p = self.seq.glbl_cp[i];
            self.do_exec_r_alu_or(p);
        }

        // write sweep
        for i in 0..self.seq.glbl_cp.len() {
            let p = self.seq.glbl_cp[i];
            self.do_exec_w(p);
        }

        // scaler pulses, then the timing state
        let edges = self.scl.wp_scl(self.mon.scl_enab);
        if edges.f17 {
            self.ctr.request_up(ctrcell::TIME1);
            self.ctr.request_up(ctrcell::TIME3);
        }
        if edges.f13 {
            self.ctr.request_up(ctrcell::TIME4);
            self.dsky.flash_tick();
        }
        if edges.f10 {
            self.dsky.scan_tick();
        }

        if self.tpg.wp_tpg(&self.mon) {
            self.commit_boundary();
        }
    }

    ///
    /// Convenience for INST-granularity stepping: run until the next
    /// instruction load, bounded by `limit` ticks. Returns whether the
    /// boundary was reached.
    ///
    pub fn step_instruction(&mut self, limit: usize) -> bool {
        for _ in 0..limit {
            self.step();
            if self.seq.new_instruction {
                return true;
            }
        }
        false
    }

    fn commit_boundary(&mut self) {
        let decision = self.seq.boundary;
        self.seq.boundary = Boundary::Continue;
        self.seq.commit_stage();
        self.seq.pending_ctr = None;
        match decision {
            Boundary::Continue => {}
            Boundary::Counter(up) => {
                self.seq.pending_ctr = Some(up);
            }
            Boundary::Rupt => {
                self.seq.sni.write(0);
                self.seq.rupt_entry = true;
                self.seq.sta.clear();
                self.seq.stb.clear();
                debug!("entering interrupt save sequence");
            }
            Boundary::LoadSq => {
                self.int.step_inhint1();
                self.seq.new_instruction = true;
                trace!(
                    "instruction boundary: SQ={:02o} Z={:05o}",
                    self.seq.sq.read(),
                    self.crg.z.read()
                );
            }
        }
    }

    /* ----- sweep 1: read ----- */

    fn do_exec_r(&mut self, p: Pulse) {
        match p {
            Pulse::RA => self.read_bus |= self.crg.a.read(),
            Pulse::RB => self.read_bus |= self.alu.b.read(),
            Pulse::RC => self.read_bus |= !self.alu.b.read(),
            Pulse::RG => self.read_bus |= self.mbf.read_g(),
            Pulse::RLP => self.read_bus |= self.crg.lp.read(),
            Pulse::RQ => self.read_bus |= self.crg.q.read(),
            Pulse::RZ => self.read_bus |= self.crg.z.read(),
            Pulse::RSC => {
                if self.adr.is_central() {
                    let v = self.central_read();
                    self.read_bus |= v;
                }
            }
            Pulse::RSCT => {
                let cadr = self.ctr.rsct();
                self.read_bus |= cadr;
            }
            Pulse::RRPA => {
                let vector = self.int.rrpa();
                self.read_bus |= vector;
            }
            Pulse::R1 => self.read_bus |= 0o000001,
            Pulse::R1C => self.read_bus |= 0o177776,
            Pulse::R2 => self.read_bus |= 0o000002,
            Pulse::R24 => self.read_bus |= 0o000024,
            Pulse::RSB => self.read_bus |= 0o100000,
            Pulse::SBWG => {
                if self.adr.is_memory() {
                    let cadr = self.adr.effective_address();
                    match self.mem.read(cadr) {
                        Some(word) => {
                            self.mem_data_bus = word & WORD_DATA_MASK;
                            self.mem_parity_bus = (word >> 14) & 1;
                            self.par.check_read(word, cadr);
                        }
                        None => {
                            self.par.flag_undefined(cadr);
                        }
                    }
                    self.mbf.load_from_memory(self.mem_data_bus);
                }
            }
            _ => {}
        }
    }

    /* ----- sweep 2: ALU read ----- */

    fn do_exec_r_alu(&mut self, p: Pulse) {
        if p == Pulse::RU {
            self.alu.eval();
        }
    }

    /* ----- sweep 3: ALU contributions OR onto the write bus ----- */

    fn do_exec_r_alu_or(&mut self, p: Pulse) {
        if p == Pulse::RU {
            self.write_bus |= self.alu.bus;
        }
    }

    /* ----- sweep 4: write ----- */

    fn do_exec_w(&mut self, p: Pulse) {
        let wb = self.write_bus;
        match p {
            Pulse::WA => self.crg.a.write(wb),
            Pulse::WB => self.alu.b.write(wb),
            Pulse::WG => {
                let cadr = self.adr.effective_address();
                self.mbf.write_g(wb, cadr);
            }
            Pulse::WLP => self.crg.lp.write(wb & 0o37777),
            Pulse::WQ => self.crg.q.write(wb),
            Pulse::WZ => self.crg.z.write(wb),
            Pulse::WS => self.adr.write_s(wb),
            Pulse::WSC => self.central_write(),
            Pulse::WX => {
                let x = self.alu.x.read();
                self.alu.x.write(x | wb);
            }
            Pulse::WY => {
                self.alu.y.write(wb);
                self.alu.x.clear();
                self.alu.ci.clear();
            }
            Pulse::WY12 => {
                self.alu.y.write(wb & 0o7777);
                self.alu.x.clear();
                self.alu.ci.clear();
            }
            Pulse::WALP => {
                self.crg.a.write((wb & 0o77777) >> 1);
                let lp = self.crg.lp.read();
                self.crg.lp.write((lp >> 1) | ((wb & 1) << 13));
            }
            Pulse::SLALP => {
                let a = self.crg.a.read();
                let lp = self.crg.lp.read();
                let head = (lp >> 13) & 1;
                let qbit = self.seq.br1.read() ^ 1;
                self.crg.a.write(((a << 1) & 0o77777) | head);
                self.crg.lp.write(((lp << 1) & 0o37777) | qbit);
            }
            Pulse::WE => {
                if self.adr.is_memory() {
                    let cadr = self.adr.effective_address();
                    let word = self.par.word_for_store(self.mbf.g.read());
                    self.mem.write(cadr, word);
                }
            }
            Pulse::GP => self.par.generate(self.mbf.g.read()),
            Pulse::WP2 => self.par.wp2(),
            Pulse::CI => self.alu.ci.write(1),
            Pulse::ST1 => self.seq.st1(),
            Pulse::ST2 => self.seq.st2(),
            Pulse::CLSTA => self.seq.clsta(),
            Pulse::NISQ => self.seq.sni.write(1),
            Pulse::CLISQ => self.seq.sni.write(0),
            Pulse::WSQ => {
                let b = self.alu.b.read();
                self.seq.load_sq(b);
            }
            Pulse::TSGN => self.seq.br1.write((wb >> 14) & 1),
            Pulse::TSGN2 => self.seq.br2.write((wb >> 14) & 1),
            Pulse::TSGX => {
                let s = (wb >> 14) & 1;
                let br1 = self.seq.br1.read();
                self.seq.br1.write(br1 ^ s);
            }
            Pulse::TPZ => self.seq.br2.write(if wb == 0 { 1 } else { 0 }),
            Pulse::TMZ => {
                if wb == 0o177777 {
                    self.seq.br2.write(1);
                }
            }
            Pulse::TOV => {
                let (br1, br2) = match (wb >> 14) & 0o3 {
                    0o1 => (0, 1),
                    0o2 => (1, 0),
                    _ => (0, 0),
                };
                self.seq.br1.write(br1);
                self.seq.br2.write(br2);
            }
            Pulse::TRSM => {
                let cadr = self.adr.effective_address();
                if cadr == sq::RESUME_CADR {
                    self.seq.st2();
                    self.seq.srsm3 = true;
                    debug!("RESUME detected");
                }
                if cadr == sq::EXTEND_CADR {
                    self.seq.ext = true;
                    debug!("EXTEND latch set");
                }
            }
            Pulse::TLSB => self.seq.br2.write(wb & 1),
            Pulse::WOVI => self.int.wovi(),
            Pulse::WOVC => match (self.seq.br1.read(), self.seq.br2.read()) {
                (0, 1) => self.ctr.request_up(ctrcell::OVCTR),
                (1, 0) => self.ctr.request_dn(ctrcell::OVCTR),
                _ => {}
            },
            Pulse::WOVR => self.wovr(),
            Pulse::WPCTR => {
                self.ctr.wpctr();
                self.int.wpctr();
            }
            Pulse::KRPT => self.int.krpt(),
            Pulse::CLRP => self.int.clrp(),
            Pulse::CLCTR => self.seq.loopctr.clear(),
            Pulse::CTR => {
                let v = self.seq.loopctr.read();
                self.seq.loopctr.write(v + 1);
            }
            Pulse::GENRST => self.genrst(),
            _ => {}
        }
    }

    ///
    /// Counter-finish logic (the WOVR pulse). The adder ran end-around;
    /// counters are plain binary cells, so a fold means the binary value
    /// is U-1 and, for an increment, that the cell wrapped. A decrement
    /// wraps (borrows) exactly when no fold happened. A wrap chains per
    /// the cell's wiring and arms the overflow interrupt guard.
    ///
    fn wovr(&mut self) {
        let (cell, up) = match self.ctr.serviced {
            Some(s) => s,
            None => return,
        };

        let sum = self.alu.u.read() & 0o77777;
        let value = if self.alu.eac {
            (sum + 0o77777) & 0o77777
        } else {
            sum
        };
        self.mbf.g.write(pack_word(value));

        let wrapped = if up { self.alu.eac } else { !self.alu.eac };
        if wrapped {
            debug!("counter cell {} wrapped", cell);
            self.int.wovi();
            match Ctr::chain_target(cell) {
                Some(Chain::Counter(k)) => self.ctr.request_up(k),
                Some(Chain::Rupt(k)) => self.int.raise(k),
                None => {}
            }
        }
    }

    fn central_read(&mut self) -> u16 {
        match self.adr.s.read() {
            cs::CS_A => self.crg.a.read(),
            cs::CS_Q => self.crg.q.read(),
            cs::CS_Z => self.crg.z.read(),
            cs::CS_LP => self.crg.lp.read(),
            cs::CS_IN0 => self.dsky.in0.read(),
            cs::CS_IN1 => self.dsky.in1.read(),
            cs::CS_IN2 => self.dsky.in2.read(),
            cs::CS_IN3 => self.dsky.in3.read(),
            cs::CS_OUT1 => self.dsky.out1.read(),
            cs::CS_OUT2 => self.dsky.out2.read(),
            cs::CS_OUT3 => self.dsky.out3.read(),
            cs::CS_OUT4 => self.dsky.out4.read(),
            cs::CS_BNK => self.adr.bnk.read(),
            cs::CS_RELINT => {
                self.int.inhint.write(0);
                0
            }
            cs::CS_INHINT => {
                self.int.inhint.write(1);
                0
            }
            _ => 0,
        }
    }

    fn central_write(&mut self) {
        if !self.adr.is_central() {
            return;
        }
        let v = sign_extend(unpack_word(self.mbf.g.read()));
        match self.adr.s.read() {
            cs::CS_A => self.crg.a.write(v),
            cs::CS_Q => self.crg.q.write(v),
            cs::CS_Z => self.crg.z.write(v),
            cs::CS_LP => self.crg.lp.write(v),
            cs::CS_IN0 => self.dsky.in0.write(v & 0o77777),
            cs::CS_IN1 => self.dsky.in1.write(v & 0o77777),
            cs::CS_IN2 => self.dsky.in2.write(v & 0o77777),
            cs::CS_IN3 => self.dsky.in3.write(v & 0o77777),
            cs::CS_OUT1 => self.dsky.write_out(1, v & 0o77777),
            cs::CS_OUT2 => self.dsky.write_out(2, v & 0o77777),
            cs::CS_OUT3 => self.dsky.write_out(3, v & 0o77777),
            cs::CS_OUT4 => self.dsky.write_out(4, v & 0o77777),
            cs::CS_BNK => self.adr.bnk.write(v & 0o17),
            cs::CS_RELINT => self.int.inhint.write(0),
            cs::CS_INHINT => self.int.inhint.write(1),
            _ => {}
        }
    }
}
