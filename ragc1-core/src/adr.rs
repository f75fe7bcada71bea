use crate::reg::Reg;

///
/// Address formation. S holds the 10-bit in-bank offset and SB the two
/// quarter-select bits of the 12-bit instruction address field, both
/// latched by the same WS pulse. BNK supplies the bank for the windowed
/// quarter. The 14-bit complete address (CADR):
///
///   SB=0  CADR = S            erasable (S < 0o20 is the central store)
///   SB=1  CADR = 0o2000 | S   fixed bank 1
///   SB=2  CADR = 0o4000 | S   fixed bank 2
///   SB=3  CADR = BNK<<10 | S  window, banks 3..12
///
pub struct Adr {
    pub s: Reg,
    pub sb: Reg,
    pub bnk: Reg,
}

impl Adr {
    pub fn new() -> Adr {
        Adr {
            s: Reg::new(10),
            sb: Reg::new(2),
            bnk: Reg::new(4),
        }
    }

    pub fn genrst(&mut self) {
        self.s.clear();
        self.sb.clear();
        self.bnk.clear();
    }

    /// The WS pulse: bits 10..1 into S, bits 12..11 into SB.
    pub fn write_s(&mut self, bus: u16) {
        self.s.write(bus & 0o1777);
        self.sb.write((bus >> 10) & 0o3);
    }

    pub fn effective_address(&self) -> u16 {
        let s = self.s.read();
        match self.sb.read() {
            0 => s,
            1 => 0o2000 | s,
            2 => 0o4000 | s,
            _ => (self.bnk.read() << 10) | s,
        }
    }

    /// Address selects a central-store flip-flop rather than memory.
    pub fn is_central(&self) -> bool {
        self.sb.read() == 0 && self.s.read() < 0o20
    }

    /// Address selects a core-memory word (erasable or fixed).
    pub fn is_memory(&self) -> bool {
        !self.is_central()
    }
}
