use crate::mon::Mon;

///
/// The sixteen-way timing state held in SG. Exactly one state is active at
/// any tick; TP1..TP12 are the memory-cycle timing pulses, the rest are the
/// pseudo-states of the generator.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimingState {
    PwrOn,
    Stby,
    Wait,
    Tp1,
    Tp2,
    Tp3,
    Tp4,
    Tp5,
    Tp6,
    Tp7,
    Tp8,
    Tp9,
    Tp10,
    Tp11,
    Tp12,
}

impl TimingState {
    pub fn name(&self) -> &'static str {
        match self {
            TimingState::PwrOn => "PWRON",
            TimingState::Stby => "STBY",
            TimingState::Wait => "WAIT",
            TimingState::Tp1 => "TP1",
            TimingState::Tp2 => "TP2",
            TimingState::Tp3 => "TP3",
            TimingState::Tp4 => "TP4",
            TimingState::Tp5 => "TP5",
            TimingState::Tp6 => "TP6",
            TimingState::Tp7 => "TP7",
            TimingState::Tp8 => "TP8",
            TimingState::Tp9 => "TP9",
            TimingState::Tp10 => "TP10",
            TimingState::Tp11 => "TP11",
            TimingState::Tp12 => "TP12",
        }
    }

    /// Timing pulse number 1..12, or 0 for the pseudo-states.
    pub fn tp(&self) -> u8 {
        match self {
            TimingState::Tp1 => 1,
            TimingState::Tp2 => 2,
            TimingState::Tp3 => 3,
            TimingState::Tp4 => 4,
            TimingState::Tp5 => 5,
            TimingState::Tp6 => 6,
            TimingState::Tp7 => 7,
            TimingState::Tp8 => 8,
            TimingState::Tp9 => 9,
            TimingState::Tp10 => 10,
            TimingState::Tp11 => 11,
            TimingState::Tp12 => 12,
            _ => 0,
        }
    }
}

pub struct Tpg {
    pub sg: TimingState,
}

impl Tpg {
    pub fn new() -> Tpg {
        Tpg {
            sg: TimingState::PwrOn,
        }
    }

    pub fn running(&self) -> bool {
        self.sg.tp() != 0
    }

    ///
    /// The state change at the end of every tick, after all pulse work has
    /// been committed. Returns true when the generator leaves TP12, which
    /// is the instruction-boundary commit point for the sequencer.
    ///
    pub fn wp_tpg(&mut self, mon: &Mon) -> bool {
        let mut boundary = false;
        self.sg = match self.sg {
            TimingState::PwrOn => {
                if mon.purst {
                    TimingState::PwrOn
                } else {
                    TimingState::Wait
                }
            }
            TimingState::Stby => {
                // a PURST pulse releases standby into WAIT; it does not
                // re-enter PWRON from here
                if mon.purst || !mon.sa {
                    TimingState::Wait
                } else {
                    TimingState::Stby
                }
            }
            TimingState::Wait => {
                if mon.purst {
                    TimingState::PwrOn
                } else if mon.sa {
                    TimingState::Stby
                } else if mon.run {
                    TimingState::Tp1
                } else {
                    TimingState::Wait
                }
            }
            TimingState::Tp1 => TimingState::Tp2,
            TimingState::Tp2 => TimingState::Tp3,
            TimingState::Tp3 => TimingState::Tp4,
            TimingState::Tp4 => TimingState::Tp5,
            TimingState::Tp5 => TimingState::Tp6,
            TimingState::Tp6 => TimingState::Tp7,
            TimingState::Tp7 => TimingState::Tp8,
            TimingState::Tp8 => TimingState::Tp9,
            TimingState::Tp9 => TimingState::Tp10,
            TimingState::Tp10 => TimingState::Tp11,
            TimingState::Tp11 => TimingState::Tp12,
            TimingState::Tp12 => {
                boundary = true;
                if mon.purst {
                    TimingState::PwrOn
                } else if mon.run {
                    TimingState::Tp1
                } else {
                    TimingState::Wait
                }
            }
        };
        boundary
    }
}
