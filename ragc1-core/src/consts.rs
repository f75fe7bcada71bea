/* Number of words in the erasable store (CADR 0o0000 through 0o1777) */
pub const ERASABLE_NUM_WORDS: usize = 0o2000;

/* Number of fixed (rope) banks and words per bank. Bank 0 is the erasable
 * region and is never addressed through the fixed array. */
pub const FIXED_NUM_BANKS: usize = 13;
pub const FIXED_BANK_NUM_WORDS: usize = 0o2000;

/* First and last CADR the rope loader will accept */
pub const CADR_FIRST: usize = 0o20;
pub const CADR_LAST: usize = 0o31777;

/* Upper bound on control pulses emitted in one timing slot */
pub const MAXPULSES: usize = 32;

pub mod cs {
    /* Central store map: flip-flop addresses 0o00 through 0o17. Address
     * 0o10 was register OUT0 in the 1963 drawings; it shadowed the DSKY
     * register, provided nothing useful and is eliminated here. */
    pub const CS_A: u16 = 0o00;
    pub const CS_Q: u16 = 0o01;
    pub const CS_Z: u16 = 0o02;
    pub const CS_LP: u16 = 0o03;
    pub const CS_IN0: u16 = 0o04;
    pub const CS_IN1: u16 = 0o05;
    pub const CS_IN2: u16 = 0o06;
    pub const CS_IN3: u16 = 0o07;
    pub const CS_OUT1: u16 = 0o11;
    pub const CS_OUT2: u16 = 0o12;
    pub const CS_OUT3: u16 = 0o13;
    pub const CS_OUT4: u16 = 0o14;
    pub const CS_BNK: u16 = 0o15;
    pub const CS_RELINT: u16 = 0o16;
    pub const CS_INHINT: u16 = 0o17;
}

pub mod mm {
    /* Editing erasable */
    pub const MM_CYR: u16 = 0o20;
    pub const MM_SR: u16 = 0o21;
    pub const MM_CYL: u16 = 0o22;
    pub const MM_SL: u16 = 0o23;

    /* Interrupt save cells */
    pub const MM_ZRUPT: u16 = 0o24;
    pub const MM_BRUPT: u16 = 0o25;
    pub const MM_ARUPT: u16 = 0o26;
    pub const MM_QRUPT: u16 = 0o27;

    /* Involuntary counters. TIME2 sits below TIME1 so a double-word read
     * picks up the high half first, the way Block II arranged it. */
    pub const MM_OVCTR: u16 = 0o34;
    pub const MM_TIME2: u16 = 0o35;
    pub const MM_TIME1: u16 = 0o36;
    pub const MM_TIME3: u16 = 0o37;
    pub const MM_TIME4: u16 = 0o40;
    pub const MM_UPLINK: u16 = 0o41;
    pub const MM_OUTCR1: u16 = 0o42;
}

pub mod ctr {
    /* Priority cell indices; lower index wins arbitration. The serviced
     * cell's erasable address is MM_OVCTR + index. */
    pub const OVCTR: usize = 0;
    pub const TIME2: usize = 1;
    pub const TIME1: usize = 2;
    pub const TIME3: usize = 3;
    pub const TIME4: usize = 4;
    pub const UPLINK: usize = 5;
    pub const OUTCR1: usize = 6;
    pub const NUM_CELLS: usize = 7;
}

pub mod rupt {
    /* Interrupt priorities 1..5 map to rupt cells 0..4 */
    pub const T3RUPT: usize = 0;
    pub const ERRUPT: usize = 1;
    pub const DSRUPT: usize = 2;
    pub const KEYRUPT: usize = 3;
    pub const UPRUPT: usize = 4;
    pub const NUM_CELLS: usize = 5;

    /* Vector for cell k is VECTOR_BASE + 4k; GOPROG is the power-up entry */
    pub const VECTOR_BASE: u16 = 0o2004;
    pub const GOPROG: u16 = 0o2030;
}

pub mod sq {
    pub const TC: u16 = 0o00;
    pub const CCS: u16 = 0o01;
    pub const INDEX: u16 = 0o02;
    pub const XCH: u16 = 0o03;
    pub const CS: u16 = 0o04;
    pub const TS: u16 = 0o05;
    pub const AD: u16 = 0o06;
    pub const MASK: u16 = 0o07;

    /* Extended opcodes carry the extend latch in bit 4 of SQ */
    pub const EXTEND_BIT: u16 = 0o10;
    pub const MP: u16 = 0o14;
    pub const DV: u16 = 0o15;
    pub const SU: u16 = 0o16;

    /* INDEX operand addresses with special meaning */
    pub const RESUME_CADR: u16 = 0o25;
    pub const EXTEND_CADR: u16 = 0o5777;
}

pub mod keyin {
    /* 5-bit DSKY key codes, latched into IN1 bits 5..1 with STROBE at
     * bit 6 */
    pub const KEYIN_0: u16 = 0o20;
    pub const KEYIN_1: u16 = 0o01;
    pub const KEYIN_2: u16 = 0o02;
    pub const KEYIN_3: u16 = 0o03;
    pub const KEYIN_4: u16 = 0o04;
    pub const KEYIN_5: u16 = 0o05;
    pub const KEYIN_6: u16 = 0o06;
    pub const KEYIN_7: u16 = 0o07;
    pub const KEYIN_8: u16 = 0o10;
    pub const KEYIN_9: u16 = 0o11;
    pub const KEYIN_VERB: u16 = 0o21;
    pub const KEYIN_ERROR_RESET: u16 = 0o22;
    pub const KEYIN_KEY_RELEASE: u16 = 0o31;
    pub const KEYIN_PLUS: u16 = 0o32;
    pub const KEYIN_MINUS: u16 = 0o33;
    pub const KEYIN_ENTER: u16 = 0o34;
    pub const KEYIN_CLEAR: u16 = 0o36;
    pub const KEYIN_NOUN: u16 = 0o37;
    pub const STROBE: u16 = 0o40;
}

pub mod out1 {
    pub const COMP_ACTY: u16 = 0o001;
    pub const UPLINK_ACTY: u16 = 0o004;
    pub const KEY_REL: u16 = 0o020;
    pub const OPER_ERR: u16 = 0o100;
    pub const PROG_ALM: u16 = 0o400;
}
