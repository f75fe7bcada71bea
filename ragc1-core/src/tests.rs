use crate::agc::Agc;
use crate::consts::{ctr, rupt, MAXPULSES};
use crate::tpg::TimingState;
use crate::utils::word_with_parity;

///
/// Power the machine up into its first running pulse: GENRST under PURST,
/// release the reset, throw RUN. The scaler is held off so tick counts
/// stay deterministic; tests that want timekeeping turn it back on.
///
fn init_agc() -> Agc {
    let mut agc = Agc::new();
    agc.mon.scl_enab = false;
    agc.step();
    agc.mon.purst = false;
    agc.mon.run = true;
    agc.step();
    agc.step();
    assert_eq!(TimingState::Tp1, agc.tpg.sg);
    agc
}

fn init_with_rope(image: &str) -> Agc {
    let mut agc = init_agc();
    agc.mem.load_obj_str(image).unwrap();
    agc
}

fn run_ticks(agc: &mut Agc, n: usize) {
    for _ in 0..n {
        agc.step();
        assert!(agc.seq.glbl_cp.len() <= MAXPULSES);
    }
}

#[test]
fn power_up_lands_at_goprog() {
    let agc = init_agc();
    assert_eq!(rupt::GOPROG, agc.crg.z.read());
    assert_eq!(1, agc.seq.sni.read());
    assert_eq!(2, agc.seq.stage());
}

#[test]
fn genrst_repeats_in_standby() {
    let mut agc = init_agc();
    agc.crg.z.write(0o1234);
    agc.mon.run = false;
    agc.mon.sa = true;
    // finish the cycle, park in WAIT, then drop into STBY
    run_ticks(&mut agc, 16);
    assert_eq!(TimingState::Stby, agc.tpg.sg);
    assert_eq!(rupt::GOPROG, agc.crg.z.read(), "GENRST cleared Z in STBY");
}

#[test]
fn tc_law_z_is_k_plus_one() {
    // TC 2100 from the power-up fetch; the target holds a spin
    let mut agc = init_with_rope("02030 002100\n02100 002100\n");
    // STD2 fetch + the TC0 itself
    run_ticks(&mut agc, 24);
    assert_eq!(0o2101, agc.crg.z.read());
    assert_eq!(0o2031, agc.crg.q.read(), "Q holds the return address");
    assert_eq!(0, agc.par.palm.read());
}

#[test]
fn basic_instruction_self_test() {
    // AD/TS/CS/CCS/MASK workout ending in a spin with A clean
    let image = "\
00100 000005
00102 000000
02030 060100
02031 050101
02032 040101
02033 060100
02034 010100
02035 070102
02036 002036
";
    let mut agc = init_with_rope(image);
    run_ticks(&mut agc, 12 * 40);
    assert_eq!(0, agc.crg.a.read(), "A settles at +0");
    assert_eq!(0, agc.par.palm.read(), "no parity alarm");
    assert_eq!(0o2037, agc.crg.z.read(), "spinning at the final TC");
    assert_eq!(0o5, agc.peek(0o101), "TS stored the sum");
}

#[test]
fn cs_then_ad_of_a_gives_all_ones() {
    // CS 0000 complements A in place; AD 0000 doubles it
    let mut agc = init_with_rope("02030 040000\n02031 060000\n02032 002032\n");
    run_ticks(&mut agc, 12 * 8);
    assert_eq!(0o177777, agc.crg.a.read());
}

#[test]
fn mask_is_bitwise_and() {
    let image = "\
00100 052525
00101 066666
02030 060100
02031 070101
02032 002032
";
    let mut agc = init_with_rope(image);
    run_ticks(&mut agc, 12 * 8);
    assert_eq!(0o42424, agc.crg.a.read());
}

#[test]
fn ts_overflow_skips_and_leaves_plus_one() {
    // A is preloaded just under the positive limit; AD 101 overflows,
    // TS 102 then stores +1-corrected value, skips, and A holds +1
    let image = "\
00101 000001
02030 060101
02031 050102
02032 002032
02033 002033
";
    let mut agc = init_with_rope(image);
    agc.crg.a.write(0o37777);
    run_ticks(&mut agc, 12 * 8);
    assert_eq!(0o1, agc.crg.a.read(), "overflow leaves +1 in A");
    assert_eq!(0o0, agc.peek(0o102), "stored word is overflow-corrected");
    assert_eq!(0o2034, agc.crg.z.read(), "skip landed on 2033");
}

#[test]
fn ad_overflow_requests_ovctr_count() {
    let image = "02030 060101\n02031 002031\n00101 000001\n";
    let mut agc = init_with_rope(image);
    agc.crg.a.write(0o37777);
    run_ticks(&mut agc, 12 * 4);
    assert_eq!(0o040000, agc.crg.a.read(), "overflow pattern in A");
    // the WOVC request was latched and serviced as a PINC on OVCTR
    run_ticks(&mut agc, 12 * 4);
    assert_eq!(0o1, agc.peek(0o34));
}

#[test]
fn index_premodifies_next_instruction() {
    // INDEX 100 adds 1 to the following AD 101, turning it into AD 102
    let image = "\
00100 000001
00101 000011
00102 000022
02030 020100
02031 060101
02032 002032
";
    let mut agc = init_with_rope(image);
    run_ticks(&mut agc, 12 * 8);
    assert_eq!(0o22, agc.crg.a.read());
}

#[test]
fn xch_swaps_a_with_memory() {
    let image = "00100 000005\n02030 030100\n02031 002031\n";
    let mut agc = init_with_rope(image);
    agc.crg.a.write(0o177777);
    run_ticks(&mut agc, 12 * 6);
    assert_eq!(0o5, agc.crg.a.read());
    assert_eq!(0o77777, agc.peek(0o100), "old A stored, corrected to 15 bits");
}

#[test]
fn cyr_edits_on_store() {
    // XCH into CYR cycles the stored word right one place
    let image = "00100 040001\n02030 060100\n02031 030020\n02032 002032\n";
    let mut agc = init_with_rope(image);
    run_ticks(&mut agc, 12 * 8);
    assert_eq!(0o60000, agc.peek(0o20));
}

#[test]
fn ccs_four_way_branch() {
    // CCS at 2030; the four possible next instructions at 2031..2034 are
    // each a spin, so Z identifies the branch taken
    let cases = [
        // (operand, expected A, expected spin Z)
        (0o000005, 0o4, 0o2032), // >0: no skip, A = K-1
        (0o000000, 0o0, 0o2033), // +0: skip 1
        (0o077772, 0o4, 0o2034), // <0: skip 2, A = |K|-1
        (0o077777, 0o0, 0o2035), // -0: skip 3
    ];

    for (operand, expect_a, expect_z) in cases.iter() {
        let image = format!(
            "00100 {:06o}\n02030 010100\n02031 002031\n02032 002032\n02033 002033\n02034 002034\n",
            operand
        );
        let mut agc = init_with_rope(&image);
        run_ticks(&mut agc, 12 * 8);
        assert_eq!(*expect_a, agc.crg.a.read(), "A after CCS {:o}", operand);
        assert_eq!(*expect_z, agc.crg.z.read(), "Z after CCS {:o}", operand);
    }
}

#[test]
fn mp_products() {
    let cases = [
        // (A, K, product high in A, product low in LP)
        (0o5, 0o3, 0o0, 0o17),
        (0o177772, 0o3, 0o177777, 0o37760), // -5 * 3 = -15
        (0o0, 0o7, 0o0, 0o0),
        (0o37777, 0o37777, 0o37776, 0o00001), // max magnitudes
    ];

    for (a, k, hi, lo) in cases.iter() {
        let image = format!(
            "05777 000000\n00100 {:06o}\n02030 025777\n02031 040100\n02032 002032\n",
            k
        );
        let mut agc = init_with_rope(&image);
        agc.crg.a.write(*a);
        run_ticks(&mut agc, 12 * 16);
        assert_eq!(*hi, agc.crg.a.read(), "high product of {:o}*{:o}", a, k);
        assert_eq!(*lo, agc.crg.lp.read(), "low product of {:o}*{:o}", a, k);
    }
}

#[test]
fn dv_quotient_and_remainder() {
    let cases = [
        // (A, K, quotient in A, remainder in LP)
        (0o7, 0o2, 0o3, 0o1),
        (0o14, 0o3, 0o4, 0o0),
        (0o177770, 0o2, 0o177774, 0o1), // -7 / 2 = -3 r 1
    ];

    for (a, k, quot, rem) in cases.iter() {
        let image = format!(
            "05777 000000\n00100 {:06o}\n02030 025777\n02031 050100\n02032 002032\n",
            k
        );
        let mut agc = init_with_rope(&image);
        agc.crg.a.write(*a);
        run_ticks(&mut agc, 12 * 16);
        assert_eq!(*quot, agc.crg.a.read(), "quotient of {:o}/{:o}", a, k);
        assert_eq!(*rem, agc.crg.lp.read(), "remainder of {:o}/{:o}", a, k);
    }
}

#[test]
fn su_subtracts() {
    let image = "05777 000000\n00100 000003\n02030 025777\n02031 060100\n02032 002032\n";
    let mut agc = init_with_rope(image);
    agc.crg.a.write(0o10);
    run_ticks(&mut agc, 12 * 8);
    assert_eq!(0o5, agc.crg.a.read());
}

#[test]
fn parity_alarm_on_even_word() {
    let mut agc = init_with_rope("02030 060100\n02031 002031\n");
    // bypass parity generation: force an even-parity word at 00100
    agc.mem.write_raw(0o100, word_with_parity(0o5) ^ 0o40000);
    run_ticks(&mut agc, 12 * 4);
    assert_eq!(1, agc.par.palm.read());
    agc.clear_palm();
    assert_eq!(0, agc.par.palm.read());
}

#[test]
fn undefined_read_returns_zero_and_alarms() {
    // AD 6000 through the window quarter with BNK=15 decodes past the
    // last strand: the read returns zero and PALM latches
    let mut agc = init_with_rope("02030 066000\n02031 002031\n");
    agc.adr.bnk.write(0o15);
    run_ticks(&mut agc, 12 * 4);
    assert_eq!(0, agc.crg.a.read());
    assert_eq!(1, agc.par.palm.read());
}

#[test]
fn time1_overflow_chains_to_time2() {
    let mut agc = init_with_rope("02030 002030\n");
    agc.mem.write(0o36, word_with_parity(0o77777));
    agc.pc_up(ctr::TIME1);
    run_ticks(&mut agc, 12 * 5);
    assert_eq!(0, agc.peek(0o36), "TIME1 wrapped to zero");
    assert_eq!(1, agc.peek(0o35), "carry chained into TIME2");

    // further increments advance TIME1 without another chain
    agc.pc_up(ctr::TIME1);
    run_ticks(&mut agc, 12 * 5);
    assert_eq!(1, agc.peek(0o36));
    assert_eq!(1, agc.peek(0o35));
}

#[test]
fn minc_borrows_on_zero() {
    let mut agc = init_with_rope("02030 002030\n");
    agc.pc_dn(ctr::OUTCR1);
    run_ticks(&mut agc, 12 * 5);
    assert_eq!(0o77777, agc.peek(0o42), "decrement of zero wraps");
}

#[test]
fn interrupt_priority_and_save_cells() {
    let image = "02030 002030\n02004 002004\n";
    let mut agc = init_with_rope(image);
    run_ticks(&mut agc, 12 * 2); // settle into the spin
    let a0 = 0o1234;
    agc.crg.a.write(a0);

    agc.raise_rupt(2);
    agc.raise_rupt(0);
    run_ticks(&mut agc, 12 * 10);

    assert_eq!(0o2005, agc.crg.z.read(), "vectored to priority 1 handler");
    assert_eq!(0o2031, agc.peek(0o24), "ZRUPT holds the pre-empted Z");
    assert_eq!(0o2030, agc.peek(0o25), "BRUPT holds the pre-empted word");
    assert_eq!(a0, agc.peek(0o26), "ARUPT saved");
    assert_eq!(0o2031, agc.peek(0o27), "QRUPT saved the spin return address");
    assert_eq!(1, agc.int.iip.read(), "interrupt in progress");
    assert_ne!(0, agc.int.rpcell.read() & 0b100, "priority 3 still queued");
}

#[test]
fn resume_restores_and_reopens_entry() {
    // handler is a bare RESUME (INDEX 25)
    let image = "02030 002030\n02004 020025\n";
    let mut agc = init_with_rope(image);
    run_ticks(&mut agc, 12 * 2);
    agc.raise_rupt(0);
    run_ticks(&mut agc, 12 * 14);

    assert_eq!(0, agc.int.iip.read(), "RESUME cleared IIP");
    assert_eq!(0o2031, agc.crg.z.read(), "spin resumed where it left off");
    assert_eq!(0, agc.int.rpcell.read());
}

#[test]
fn inhint_blocks_entry_until_relint() {
    // software inhibit: any reference to 0o17 sets INHINT, to 0o16 clears
    let image = "02030 002030\n02004 002004\n";
    let mut agc = init_with_rope(image);
    run_ticks(&mut agc, 12 * 2);

    agc.int.inhint.write(1);
    agc.raise_rupt(0);
    run_ticks(&mut agc, 12 * 8);
    assert_eq!(0o2031, agc.crg.z.read(), "held out of the handler");

    agc.int.inhint.write(0);
    run_ticks(&mut agc, 12 * 10);
    assert_eq!(0o2005, agc.crg.z.read(), "entered after RELINT");
}

#[test]
fn overflow_defers_interrupt_one_instruction() {
    // AD overflows, then an XCH runs, then spin; handler spins at 2004
    let image = "\
00101 000001
00102 000000
02030 060101
02031 030102
02032 002032
02004 002004
";
    // control run: no overflow, interrupt raised mid-AD enters at the
    // first boundary after its WPCTR
    let mut control = init_with_rope(image);
    control.crg.a.write(0o10);
    run_ticks(&mut control, 14);
    control.raise_rupt(0);
    run_ticks(&mut control, 12 * 12);
    assert_eq!(0o2032, control.peek(0o24), "control enters before the XCH");

    let mut agc = init_with_rope(image);
    agc.crg.a.write(0o37777);
    run_ticks(&mut agc, 14);
    agc.raise_rupt(0);
    run_ticks(&mut agc, 12 * 12);
    assert_eq!(
        0o2033,
        agc.peek(0o24),
        "overflow guard held entry through the XCH"
    );
}

#[test]
fn counters_outrank_interrupts_on_a_boundary() {
    let image = "02030 002030\n02004 020025\n";
    let mut agc = init_with_rope(image);
    run_ticks(&mut agc, 12 * 2);

    agc.pc_up(ctr::TIME1);
    agc.raise_rupt(0);
    run_ticks(&mut agc, 24);
    // the stolen cycle right after the boundary is the PINC
    assert_eq!(1, agc.peek(0o36), "counter serviced first");
    assert!(agc.int.pending(), "interrupt still waiting");
    run_ticks(&mut agc, 12 * 16);
    assert_eq!(0, agc.int.rpcell.read(), "interrupt serviced afterwards");
}

#[test]
fn single_clock_strobes_advance_pulse_by_pulse() {
    let mut agc = init_agc();
    assert_eq!(TimingState::Tp1, agc.tpg.sg);
    for _ in 0..10 {
        agc.step();
    }
    assert_eq!(TimingState::Tp11, agc.tpg.sg);
}

#[test]
fn scaler_drives_time_counters() {
    let mut agc = init_with_rope("02030 002030\n");
    agc.mon.scl_enab = true;
    // one F17 period plus slack for the stolen PINC cycles
    run_ticks(&mut agc, (1 << 17) + 240);
    assert_eq!(1, agc.peek(0o36), "TIME1 ticked on F17");
    assert_eq!(1, agc.peek(0o37), "TIME3 ticked on F17");
    assert!(agc.peek(0o40) >= 1, "TIME4 ticked on F13");
}

#[test]
fn manual_f17_nudge_counts_without_scaler() {
    let mut agc = init_with_rope("02030 002030\n");
    agc.scl.nudge_f17();
    run_ticks(&mut agc, 12 * 5);
    assert_eq!(1, agc.peek(0o36));
}

#[test]
fn dsky_verb_entry_keyins() {
    // spin program with a bare-RESUME KEYRUPT handler (priority 4)
    let mut agc = init_with_rope("02030 002030\n02020 020025\n");
    run_ticks(&mut agc, 12 * 2);

    for (sym, code) in [
        ('/', crate::consts::keyin::KEYIN_VERB),
        ('0', crate::consts::keyin::KEYIN_0),
        ('5', crate::consts::keyin::KEYIN_5),
        ('j', crate::consts::keyin::KEYIN_ENTER),
    ] {
        assert!(agc.key(sym));
        assert_eq!(
            code | crate::consts::keyin::STROBE,
            agc.dsky.in1.read(),
            "keycode for {}",
            sym
        );
        run_ticks(&mut agc, 12 * 14);
    }

    // every KEYRUPT was taken and resumed
    assert_eq!(0, agc.int.iip.read());
    assert_eq!(0, agc.int.rpcell.read());
    assert_eq!(0, agc.par.palm.read());

    // the running software would echo the verb onto OUT2; emulate the
    // relay word and check the decoded display
    agc.dsky.write_out(2, (0o12 << 11) | (0o21 << 5) | 0o30);
    assert_eq!(['0', '5'], agc.dsky.vd);
}

#[test]
fn breakpoint_condition_fires_once_per_instruction() {
    let mut agc = init_with_rope("02030 002030\n");
    let mut hits = 0;
    for _ in 0..(12 * 6) {
        agc.step();
        if agc.new_instruction() {
            hits += 1;
            assert_eq!(TimingState::Tp1, agc.tpg.sg);
        }
    }
    // six cycles: one STD2 fetch plus five TC spins
    assert_eq!(6, hits);
}
