use crate::consts::mm;
use crate::reg::Reg;
use crate::utils::{pack_word, unpack_word};

///
/// The memory buffer. G holds the data half of the word in transit (bits
/// 16,14..1); the parity bit lives in PAR's G15. Values written through WG
/// pass the editing network: a store addressed at the four editing
/// locations is shifted as it goes by, which is the entire implementation
/// of CYR, SR, CYL and SL.
///
pub struct Mbf {
    pub g: Reg,
}

impl Mbf {
    pub fn new() -> Mbf {
        Mbf { g: Reg::new(16) }
    }

    pub fn genrst(&mut self) {
        self.g.clear();
    }

    /// Bus value of G for the RG pulse: sign replicated into bit 15.
    pub fn read_g(&self) -> u16 {
        unpack_word_to_bus(self.g.read())
    }

    /// The WG pulse. `s` is the S register, used to select the edit.
    pub fn write_g(&mut self, bus: u16, s: u16) {
        let v = overflow_corrected(bus);
        let edited = match s {
            mm::MM_CYR => (v >> 1) | ((v & 0o1) << 14),
            mm::MM_SR => (v >> 1) | (v & 0o40000),
            mm::MM_CYL => ((v << 1) & 0o77777) | ((v & 0o40000) >> 14),
            mm::MM_SL => (v << 1) & 0o77777,
            _ => v,
        };
        self.g.write(pack_word(edited));
    }

    /// Raw load from the memory data bus (the SBWG pulse).
    pub fn load_from_memory(&mut self, data: u16) {
        self.g.write(data & crate::utils::WORD_DATA_MASK);
    }
}

fn unpack_word_to_bus(g: u16) -> u16 {
    let v = unpack_word(g);
    crate::utils::sign_extend(v)
}

fn overflow_corrected(bus: u16) -> u16 {
    crate::utils::overflow_correction(bus) & 0o77777
}
