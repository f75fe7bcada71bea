use crate::reg::Reg;

///
/// The central register group: accumulator, return address, program
/// counter and the low product register.
///
pub struct Crg {
    pub a: Reg,
    pub q: Reg,
    pub z: Reg,
    pub lp: Reg,
}

impl Crg {
    pub fn new() -> Crg {
        Crg {
            a: Reg::new(16),
            q: Reg::new(16),
            z: Reg::new(16),
            lp: Reg::new(16),
        }
    }

    pub fn genrst(&mut self) {
        self.a.clear();
        self.q.clear();
        self.z.clear();
        self.lp.clear();
    }
}
