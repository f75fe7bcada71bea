use crate::agc::Agc;
use crate::clk::Pulse::{self, *};
use crate::isd::{self, Subseq};
use crate::seq::Boundary;
use crate::tpg::TimingState;

use log::debug;

///
/// Rebuild the control-pulse list for the current timing state. The
/// matrix is keyed on (subsequence, TP, BR1, BR2, LOOPCTR); the boundary
/// arbitration at TP12 additionally consults the priority cells. The
/// split into CPM-A (bookkeeping and stage flags), CPM-B (the data-path
/// tables) and CPM-C (counter/interrupt sequencing) mirrors the hardware
/// partitioning.
///
pub fn control_pulse_matrix(agc: &mut Agc) {
    agc.seq.glbl_cp.clear();

    let tp = match agc.tpg.sg {
        TimingState::PwrOn | TimingState::Stby => {
            push(agc, &[GENRST]);
            return;
        }
        TimingState::Wait => return,
        state => state.tp(),
    };

    let subseq = isd::decode(&agc.seq);
    agc.seq.subseq = subseq;

    cpm_a(agc, subseq, tp);
    cpm_b(agc, subseq, tp);
    cpm_c(agc, subseq, tp);
}

fn push(agc: &mut Agc, pulses: &[Pulse]) {
    for p in pulses {
        if agc.seq.glbl_cp.push(*p).is_err() {
            debug_assert!(false, "pulse list overflow");
        }
    }
}

///
/// CPM-A: subsequence-active flags, and the SNI clear at the top of every
/// programmed cycle (moved to TP1 from the original TP12 so the stage
/// logic sees it; counter steals leave SNI pending for the boundary they
/// displaced).
///
fn cpm_a(agc: &mut Agc, subseq: Subseq, tp: u8) {
    if tp == 1 {
        agc.seq.smp1 = subseq == Subseq::Mp1;
        agc.seq.sdv1 = subseq == Subseq::Dv1;
        agc.seq.srsm3 = subseq == Subseq::Rsm3;
        match subseq {
            Subseq::Pinc | Subseq::Minc => {}
            _ => push(agc, &[CLISQ]),
        }
    }
}

///
/// CPM-B: the per-subsequence data-path tables. Branch-dependent rows
/// read BR1/BR2 as set earlier in the same cycle.
///
fn cpm_b(agc: &mut Agc, subseq: Subseq, tp: u8) {
    let br1 = agc.seq.br1.read();
    let br2 = agc.seq.br2.read();
    let loopctr = agc.seq.loopctr.read();

    match subseq {
        Subseq::Std2 => match tp {
            1 => push(agc, &[RZ, WY, CI, WS]),
            2 => push(agc, &[RSC, WG, NISQ]),
            4 => push(agc, &[SBWG]),
            6 => push(agc, &[RU, WZ]),
            8 => push(agc, &[GP]),
            10 => push(agc, &[WE, WP2]),
            11 => push(agc, &[RG, WB]),
            _ => {}
        },
        Subseq::Tc0 => match tp {
            1 => push(agc, &[RB, WY12, CI, WS]),
            2 => push(agc, &[RSC, WG, NISQ]),
            3 => push(agc, &[RZ, WQ]),
            4 => push(agc, &[SBWG]),
            6 => push(agc, &[RU, WZ]),
            8 => push(agc, &[GP]),
            10 => push(agc, &[WE, WP2]),
            11 => push(agc, &[RG, WB]),
            _ => {}
        },
        Subseq::Ccs0 => match tp {
            1 => push(agc, &[RB, WS]),
            2 => push(agc, &[RSC, WG]),
            4 => push(agc, &[SBWG]),
            5 => push(agc, &[RG, WB, TSGN, TPZ, TMZ]),
            6 => match br1 {
                0 => push(agc, &[RB, WY]),
                _ => push(agc, &[RC, WY]),
            },
            7 => push(agc, &[R1C, WX]),
            8 => match br2 {
                0 => push(agc, &[RU, WA]),
                _ => push(agc, &[WA]),
            },
            9 => push(agc, &[GP]),
            10 => push(agc, &[WE, WP2, ST1]),
            _ => {}
        },
        Subseq::Ccs1 => match tp {
            1 => push(agc, &[RZ, WY]),
            2 => match (br1, br2) {
                (0, 0) => {}
                (0, 1) => push(agc, &[R1, WX]),
                (1, 0) => push(agc, &[R2, WX]),
                _ => push(agc, &[R1, R2, WX]),
            },
            3 => push(agc, &[RU, WS, NISQ]),
            4 => push(agc, &[SBWG]),
            5 => push(agc, &[RU, WZ]),
            6 => push(agc, &[RZ, WY, CI]),
            7 => push(agc, &[RU, WZ]),
            8 => push(agc, &[GP]),
            10 => push(agc, &[WE, WP2]),
            11 => push(agc, &[RG, WB]),
            _ => {}
        },
        Subseq::Ndx0 => match tp {
            1 => push(agc, &[RB, WS]),
            2 => push(agc, &[RSC, WG]),
            4 => push(agc, &[SBWG]),
            5 => push(agc, &[TRSM]),
            8 => push(agc, &[GP]),
            10 => push(agc, &[WE, WP2, ST1]),
            11 => push(agc, &[RG, WB]),
            _ => {}
        },
        Subseq::Ndx1 => match tp {
            1 => push(agc, &[RZ, WY, CI, WS]),
            2 => push(agc, &[RSC, WG, NISQ]),
            4 => push(agc, &[SBWG]),
            6 => push(agc, &[RU, WZ]),
            7 => push(agc, &[RB, WY]),
            8 => push(agc, &[RG, WX]),
            9 => push(agc, &[RU, WB]),
            10 => push(agc, &[WE, WP2]),
            _ => {}
        },
        Subseq::Rsm3 => match tp {
            1 => push(agc, &[R24, WS]),
            2 => push(agc, &[RSC, WG, NISQ]),
            4 => push(agc, &[SBWG]),
            6 => push(agc, &[RG, WZ]),
            8 => push(agc, &[GP]),
            10 => push(agc, &[WE, WP2, CLRP]),
            _ => {}
        },
        Subseq::Xch0 => match tp {
            1 => push(agc, &[RB, WS]),
            2 => push(agc, &[RSC, WG]),
            3 => push(agc, &[RA, WB]),
            4 => push(agc, &[SBWG]),
            7 => push(agc, &[RG, WA]),
            8 => push(agc, &[RB, WG]),
            9 => push(agc, &[GP]),
            10 => push(agc, &[WE, WP2, WSC, ST2]),
            _ => {}
        },
        Subseq::Cs0 => match tp {
            1 => push(agc, &[RB, WS]),
            2 => push(agc, &[RSC, WG]),
            4 => push(agc, &[SBWG]),
            7 => push(agc, &[RG, WB]),
            8 => push(agc, &[RC, WA]),
            9 => push(agc, &[GP]),
            10 => push(agc, &[WE, WP2, ST2]),
            _ => {}
        },
        Subseq::Ts0 => match tp {
            1 => push(agc, &[RB, WS]),
            2 => push(agc, &[RSC, WG]),
            3 => push(agc, &[RA, WB]),
            4 => push(agc, &[SBWG]),
            5 => push(agc, &[RB, TOV]),
            6 => match (br1, br2) {
                (0, 1) => push(agc, &[R1, WA, WOVI]),
                (1, 0) => push(agc, &[R1C, WA, WOVI]),
                _ => {}
            },
            7 => match (br1, br2) {
                (0, 1) | (1, 0) => push(agc, &[RZ, WY, CI]),
                _ => {}
            },
            8 => push(agc, &[RB, WG, GP]),
            9 => match (br1, br2) {
                (0, 1) | (1, 0) => push(agc, &[RU, WZ]),
                _ => {}
            },
            10 => push(agc, &[WE, WP2, WSC, ST2]),
            _ => {}
        },
        Subseq::Ad0 => match tp {
            1 => push(agc, &[RB, WS]),
            2 => push(agc, &[RSC, WG]),
            4 => push(agc, &[SBWG]),
            5 => push(agc, &[RA, WY]),
            6 => push(agc, &[RG, WX]),
            7 => push(agc, &[RU, WA]),
            8 => push(agc, &[RA, TOV, GP]),
            9 => match (br1, br2) {
                (0, 1) | (1, 0) => push(agc, &[WOVI, WOVC]),
                _ => {}
            },
            10 => push(agc, &[WE, WP2, ST2]),
            _ => {}
        },
        Subseq::Mask0 => match tp {
            1 => push(agc, &[RB, WS]),
            2 => push(agc, &[RSC, WG]),
            3 => push(agc, &[RA, WB]),
            4 => push(agc, &[SBWG]),
            5 => push(agc, &[RC, WA]),
            6 => push(agc, &[RG, WB]),
            7 => push(agc, &[RC, RA, WB]),
            8 => push(agc, &[RC, WA, GP]),
            10 => push(agc, &[WE, WP2, ST2]),
            _ => {}
        },
        Subseq::Su0 => match tp {
            1 => push(agc, &[RB, WS]),
            2 => push(agc, &[RSC, WG]),
            4 => push(agc, &[SBWG]),
            5 => push(agc, &[RG, WB]),
            6 => push(agc, &[RA, WY]),
            7 => push(agc, &[RC, WX]),
            8 => push(agc, &[RU, WA, GP]),
            9 => push(agc, &[RA, TOV]),
            10 => {
                push(agc, &[WE, WP2, ST2]);
                match (br1, br2) {
                    (0, 1) | (1, 0) => push(agc, &[WOVI, WOVC]),
                    _ => {}
                }
            }
            _ => {}
        },
        Subseq::Mp0 => match tp {
            1 => push(agc, &[RB, WS]),
            2 => push(agc, &[RSC, WG]),
            3 => push(agc, &[RA, WB, TSGN]),
            4 => push(agc, &[SBWG]),
            5 => match br1 {
                0 => push(agc, &[RA, WLP]),
                _ => push(agc, &[RC, WLP]),
            },
            6 => push(agc, &[RG, WB, TSGN2, TSGX]),
            7 => match br2 {
                0 => {}
                _ => push(agc, &[RC, WB]),
            },
            8 => push(agc, &[GP]),
            9 => push(agc, &[WA, CLCTR]),
            10 => push(agc, &[WE, WP2, ST1]),
            _ => {}
        },
        Subseq::Mp1 => match tp {
            1 => push(agc, &[RLP, TLSB]),
            2 => push(agc, &[RA, WY]),
            3 => match br2 {
                0 => {}
                _ => push(agc, &[RB, WX]),
            },
            4 => push(agc, &[RU, WALP]),
            5 => push(agc, &[RLP, TLSB]),
            6 => push(agc, &[RA, WY]),
            7 => match br2 {
                0 => {}
                _ => push(agc, &[RB, WX]),
            },
            8 => push(agc, &[RU, WALP]),
            11 => {
                push(agc, &[CTR]);
                if loopctr == 6 {
                    push(agc, &[ST2]);
                }
            }
            _ => {}
        },
        Subseq::Mp3 => match tp {
            1 => match br1 {
                0 => {}
                _ => push(agc, &[RA, WB]),
            },
            2 => match br1 {
                0 => {}
                _ => push(agc, &[RC, WA]),
            },
            3 => match br1 {
                0 => {}
                _ => push(agc, &[RLP, WB]),
            },
            4 => match br1 {
                0 => {}
                _ => push(agc, &[RC, WLP]),
            },
            10 => push(agc, &[CLSTA]),
            _ => {}
        },
        Subseq::Dv0 => match tp {
            1 => push(agc, &[RB, WS]),
            2 => push(agc, &[RSC, WG]),
            3 => push(agc, &[RA, WB, TSGN]),
            4 => push(agc, &[SBWG]),
            5 => match br1 {
                0 => push(agc, &[RA, WLP]),
                _ => push(agc, &[RC, WLP]),
            },
            6 => push(agc, &[RG, WB, TSGN2, TSGX]),
            7 => match br2 {
                0 => {}
                _ => push(agc, &[RC, WB]),
            },
            8 => match br1 {
                0 => push(agc, &[TSGN2]),
                _ => push(agc, &[RSB, TSGN2]),
            },
            9 => push(agc, &[GP, CLCTR, WA]),
            10 => push(agc, &[WE, WP2, R1C, TSGN, ST1]),
            _ => {}
        },
        Subseq::Dv1 => match tp {
            1 => push(agc, &[SLALP]),
            2 => push(agc, &[RA, WY]),
            3 => push(agc, &[RC, WX]),
            4 => push(agc, &[RU, TSGN]),
            5 => match br1 {
                0 => push(agc, &[RU, WA]),
                _ => {}
            },
            6 => push(agc, &[SLALP]),
            7 => push(agc, &[RA, WY]),
            8 => push(agc, &[RC, WX]),
            9 => push(agc, &[RU, TSGN]),
            10 => match br1 {
                0 => push(agc, &[RU, WA]),
                _ => {}
            },
            11 => {
                push(agc, &[CTR]);
                if loopctr == 6 {
                    push(agc, &[ST2]);
                }
            }
            _ => {}
        },
        Subseq::Dv3 => match tp {
            1 => push(agc, &[RA, WB]),
            2 => push(agc, &[SLALP]),
            3 => push(agc, &[RLP, WA]),
            4 => push(agc, &[RB, WLP]),
            5 => match br2 {
                0 => {}
                _ => push(agc, &[RA, WB]),
            },
            6 => match br2 {
                0 => {}
                _ => push(agc, &[RC, WA]),
            },
            10 => push(agc, &[CLSTA]),
            _ => {}
        },
        Subseq::Rupt0 => match tp {
            1 => push(agc, &[R24, WS]),
            3 => push(agc, &[RZ, WG]),
            8 => push(agc, &[GP]),
            9 => push(agc, &[CLCTR]),
            10 => push(agc, &[WE, WP2, ST1]),
            _ => {}
        },
        Subseq::Rupt1 => match tp {
            1 => match loopctr {
                0 => push(agc, &[R24, R2, WS]),
                _ => push(agc, &[R24, R2, R1, WS]),
            },
            3 => match loopctr {
                0 => push(agc, &[RA, WG]),
                _ => push(agc, &[RQ, WG]),
            },
            8 => push(agc, &[GP]),
            10 => {
                push(agc, &[WE, WP2, CTR]);
                if loopctr == 1 {
                    push(agc, &[ST2]);
                }
            }
            _ => {}
        },
        Subseq::Rupt3 => match tp {
            1 => push(agc, &[R24, R1, WS]),
            3 => push(agc, &[RB, WG]),
            8 => push(agc, &[GP]),
            9 => push(agc, &[RRPA, WZ]),
            10 => push(agc, &[WE, WP2, KRPT, CLSTA]),
            _ => {}
        },
        Subseq::Pinc => match tp {
            1 => push(agc, &[RSCT, WS]),
            2 => push(agc, &[RSC, WG]),
            4 => push(agc, &[SBWG]),
            5 => push(agc, &[RG, WY, CI]),
            6 => push(agc, &[RU, WOVR]),
            8 => push(agc, &[GP]),
            10 => push(agc, &[WE, WP2]),
            _ => {}
        },
        Subseq::Minc => match tp {
            1 => push(agc, &[RSCT, WS]),
            2 => push(agc, &[RSC, WG]),
            4 => push(agc, &[SBWG]),
            5 => push(agc, &[RG, WY]),
            6 => push(agc, &[R1, R1C, WX]),
            7 => push(agc, &[RU, WOVR]),
            8 => push(agc, &[GP]),
            10 => push(agc, &[WE, WP2]),
            _ => {}
        },
    }
}

///
/// CPM-C: the synchronizer latch at TP11 and the boundary arbitration at
/// TP12. Counters outrank interrupts; the extend latch holds an interrupt
/// off so an extracode pair stays atomic.
///
fn cpm_c(agc: &mut Agc, _subseq: Subseq, tp: u8) {
    match tp {
        11 => push(agc, &[WPCTR]),
        12 => {
            let decision = if agc.seq.sni.read() == 1 {
                if let Some((_, up)) = agc.ctr.next_service() {
                    Boundary::Counter(up)
                } else if agc.int.eligible() && !agc.seq.ext {
                    Boundary::Rupt
                } else {
                    Boundary::LoadSq
                }
            } else {
                Boundary::Continue
            };
            agc.seq.boundary = decision;
            if decision == Boundary::LoadSq {
                push(agc, &[WSQ]);
            }
            if decision != Boundary::Continue {
                debug!("boundary: {:?}", decision);
            }
        }
        _ => {}
    }
}
