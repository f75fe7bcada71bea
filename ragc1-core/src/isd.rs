use crate::consts::sq;
use crate::seq::Seq;

///
/// The named execution phases. Most instructions run an operand
/// subsequence at stage 0 and finish through the shared fetch STD2 at
/// stage 2; the multi-cycle instructions walk stages 0 → 1 → 3 with the
/// loop counter holding MP1/DV1/RUPT1 in place.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subseq {
    Tc0,
    Ccs0,
    Ccs1,
    Ndx0,
    Ndx1,
    Rsm3,
    Xch0,
    Cs0,
    Ts0,
    Ad0,
    Mask0,
    Mp0,
    Mp1,
    Mp3,
    Dv0,
    Dv1,
    Dv3,
    Su0,
    Rupt0,
    Rupt1,
    Rupt3,
    Std2,
    Pinc,
    Minc,
}

impl Subseq {
    pub fn name(&self) -> &'static str {
        match self {
            Subseq::Tc0 => "TC0",
            Subseq::Ccs0 => "CCS0",
            Subseq::Ccs1 => "CCS1",
            Subseq::Ndx0 => "NDX0",
            Subseq::Ndx1 => "NDX1",
            Subseq::Rsm3 => "RSM3",
            Subseq::Xch0 => "XCH0",
            Subseq::Cs0 => "CS0",
            Subseq::Ts0 => "TS0",
            Subseq::Ad0 => "AD0",
            Subseq::Mask0 => "MASK0",
            Subseq::Mp0 => "MP0",
            Subseq::Mp1 => "MP1",
            Subseq::Mp3 => "MP3",
            Subseq::Dv0 => "DV0",
            Subseq::Dv1 => "DV1",
            Subseq::Dv3 => "DV3",
            Subseq::Su0 => "SU0",
            Subseq::Rupt0 => "RUPT0",
            Subseq::Rupt1 => "RUPT1",
            Subseq::Rupt3 => "RUPT3",
            Subseq::Std2 => "STD2",
            Subseq::Pinc => "PINC",
            Subseq::Minc => "MINC",
        }
    }
}

///
/// The instruction subsequence decoder: a pure function of the sequencer's
/// cycle-entry state. Counter steals and the interrupt save chain take the
/// place of the opcode row; extended SQ values without an extracode of
/// their own fall back to the unextended row.
///
pub fn decode(seq: &Seq) -> Subseq {
    if let Some(up) = seq.pending_ctr {
        return if up { Subseq::Pinc } else { Subseq::Minc };
    }

    let stage = seq.stage();
    if seq.rupt_entry {
        return match stage {
            0 => Subseq::Rupt0,
            1 => Subseq::Rupt1,
            2 => Subseq::Std2,
            _ => Subseq::Rupt3,
        };
    }

    if stage == 2 {
        return Subseq::Std2;
    }

    let opcode = match seq.sq.read() {
        sq::MP | sq::DV | sq::SU => seq.sq.read(),
        other => other & 0o7,
    };

    match (opcode, stage) {
        (sq::TC, _) => Subseq::Tc0,
        (sq::CCS, 0) => Subseq::Ccs0,
        (sq::CCS, _) => Subseq::Ccs1,
        (sq::INDEX, 0) => Subseq::Ndx0,
        (sq::INDEX, 1) => Subseq::Ndx1,
        (sq::INDEX, _) => Subseq::Rsm3,
        (sq::XCH, _) => Subseq::Xch0,
        (sq::CS, _) => Subseq::Cs0,
        (sq::TS, _) => Subseq::Ts0,
        (sq::AD, _) => Subseq::Ad0,
        (sq::MASK, _) => Subseq::Mask0,
        (sq::MP, 0) => Subseq::Mp0,
        (sq::MP, 1) => Subseq::Mp1,
        (sq::MP, _) => Subseq::Mp3,
        (sq::DV, 0) => Subseq::Dv0,
        (sq::DV, 1) => Subseq::Dv1,
        (sq::DV, _) => Subseq::Dv3,
        (sq::SU, _) => Subseq::Su0,
        _ => Subseq::Std2,
    }
}

#[cfg(test)]
mod isd_tests {
    use super::*;

    #[test]
    fn stage_walk_for_index() {
        let mut seq = Seq::new();
        seq.sq.write(sq::INDEX);
        assert_eq!(Subseq::Ndx0, decode(&seq));
        seq.sta.write(1);
        assert_eq!(Subseq::Ndx1, decode(&seq));
        seq.stb.write(1);
        assert_eq!(Subseq::Rsm3, decode(&seq));
        seq.sta.clear();
        assert_eq!(Subseq::Std2, decode(&seq));
    }

    #[test]
    fn counter_steal_overrides_everything() {
        let mut seq = Seq::new();
        seq.sq.write(sq::AD);
        seq.pending_ctr = Some(true);
        assert_eq!(Subseq::Pinc, decode(&seq));
        seq.pending_ctr = Some(false);
        assert_eq!(Subseq::Minc, decode(&seq));
    }

    #[test]
    fn extended_values_without_extracode_fall_back() {
        let mut seq = Seq::new();
        seq.sq.write(sq::EXTEND_BIT | sq::AD);
        assert_eq!(Subseq::Ad0, decode(&seq));
        seq.sq.write(sq::MP);
        assert_eq!(Subseq::Mp0, decode(&seq));
    }
}
