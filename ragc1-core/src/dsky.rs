use crate::consts::keyin::*;
use crate::reg::Reg;

use log::{debug, trace};

///
/// DSKY input/output logic: the IN keyin registers, the OUT indicator
/// registers, keycode translation and the relay-word decode that turns
/// OUT2 traffic into display digits.
///
pub struct Dsky {
    pub in0: Reg,
    pub in1: Reg,
    pub in2: Reg,
    pub in3: Reg,
    pub out1: Reg,
    pub out2: Reg,
    pub out3: Reg,
    pub out4: Reg,

    pub md: [char; 2],
    pub vd: [char; 2],
    pub nd: [char; 2],
    pub r1: [char; 5],
    pub r2: [char; 5],
    pub r3: [char; 5],
    r1_sign: (bool, bool),
    r2_sign: (bool, bool),
    r3_sign: (bool, bool),

    /// flash enabled by software through OUT4
    pub flash: bool,
    /// phase toggled by the F13 scan so flashing fields blink
    pub flash_phase: bool,
    /// F10 keyboard-scan count
    pub scan: u32,

    /// something an operator display would want to repaint
    pub changed: bool,
}

///
/// Translate a host key symbol to its 5-bit keycode, using the original
/// front-panel bindings ('.' CLEAR, '*' NOUN, '/' VERB, 'g' KEY RELEASE,
/// 'h' ERROR RESET, 'j' ENTER).
///
pub fn keycode(symbol: char) -> Option<u16> {
    match symbol {
        '0' => Some(KEYIN_0),
        '1' => Some(KEYIN_1),
        '2' => Some(KEYIN_2),
        '3' => Some(KEYIN_3),
        '4' => Some(KEYIN_4),
        '5' => Some(KEYIN_5),
        '6' => Some(KEYIN_6),
        '7' => Some(KEYIN_7),
        '8' => Some(KEYIN_8),
        '9' => Some(KEYIN_9),
        '+' => Some(KEYIN_PLUS),
        '-' => Some(KEYIN_MINUS),
        '.' => Some(KEYIN_CLEAR),
        '*' => Some(KEYIN_NOUN),
        '/' => Some(KEYIN_VERB),
        'g' => Some(KEYIN_KEY_RELEASE),
        'h' => Some(KEYIN_ERROR_RESET),
        'j' => Some(KEYIN_ENTER),
        _ => None,
    }
}

/// Relay digit codes to glyphs; anything unassigned renders blank.
fn digit(code: u16) -> char {
    match code {
        0o21 => '0',
        0o03 => '1',
        0o25 => '2',
        0o27 => '3',
        0o15 => '4',
        0o30 => '5',
        0o34 => '6',
        0o23 => '7',
        0o35 => '8',
        0o37 => '9',
        _ => ' ',
    }
}

fn sign_char(s: (bool, bool)) -> char {
    match s {
        (true, false) => '+',
        (false, true) => '-',
        _ => ' ',
    }
}

impl Dsky {
    pub fn new() -> Dsky {
        Dsky {
            in0: Reg::new(15),
            in1: Reg::new(15),
            in2: Reg::new(15),
            in3: Reg::new(15),
            out1: Reg::new(15),
            out2: Reg::new(15),
            out3: Reg::new(15),
            out4: Reg::new(15),
            md: [' '; 2],
            vd: [' '; 2],
            nd: [' '; 2],
            r1: [' '; 5],
            r2: [' '; 5],
            r3: [' '; 5],
            r1_sign: (false, false),
            r2_sign: (false, false),
            r3_sign: (false, false),
            flash: false,
            flash_phase: false,
            scan: 0,
            changed: false,
        }
    }

    pub fn genrst(&mut self) {
        self.out1.clear();
        self.out2.clear();
        self.out3.clear();
        self.out4.clear();
        self.in1.clear();
        self.changed = true;
    }

    /// Latch a keycode into IN1 with the strobe bit. The caller raises
    /// KEYRUPT alongside.
    pub fn keypress(&mut self, code: u16) {
        debug!("DSKY keypress {:02o}", code);
        self.in1.write(code | STROBE);
        self.changed = true;
    }

    pub fn r1s(&self) -> char {
        sign_char(self.r1_sign)
    }

    pub fn r2s(&self) -> char {
        sign_char(self.r2_sign)
    }

    pub fn r3s(&self) -> char {
        sign_char(self.r3_sign)
    }

    /// F10 scan tick: ages the keyboard strobe.
    pub fn scan_tick(&mut self) {
        self.scan = self.scan.wrapping_add(1);
    }

    /// F13 tick: advance the flash phase.
    pub fn flash_tick(&mut self) {
        if self.flash {
            self.flash_phase = !self.flash_phase;
            self.changed = true;
        }
    }

    ///
    /// A WSC store into one of the OUT registers. OUT2 carries relay
    /// words: bits 15..12 select the row, bit 11 is a sign line, bits
    /// 10..6 and 5..1 are the two digit codes.
    ///
    pub fn write_out(&mut self, which: u16, value: u16) {
        trace!("OUT{} <- {:05o}", which, value);
        self.changed = true;
        match which {
            1 => self.out1.write(value),
            2 => {
                self.out2.write(value);
                self.decode_relay_word(value);
            }
            3 => self.out3.write(value),
            4 => {
                self.out4.write(value);
                self.flash = value & 0o100 != 0;
                if !self.flash {
                    self.flash_phase = false;
                }
            }
            _ => {}
        }
    }

    fn decode_relay_word(&mut self, value: u16) {
        let row = (value >> 11) & 0o17;
        let sign = value & 0o2000 != 0;
        let hi = digit((value >> 5) & 0o37);
        let lo = digit(value & 0o37);

        match row {
            0o13 => self.md = [hi, lo],
            0o12 => self.vd = [hi, lo],
            0o11 => self.nd = [hi, lo],
            0o10 => self.r1[0] = lo,
            0o07 => {
                self.r1[1] = hi;
                self.r1[2] = lo;
                self.r1_sign.0 = sign;
            }
            0o06 => {
                self.r1[3] = hi;
                self.r1[4] = lo;
                self.r1_sign.1 = sign;
            }
            0o05 => {
                self.r2[0] = hi;
                self.r2[1] = lo;
                self.r2_sign.0 = sign;
            }
            0o04 => {
                self.r2[2] = hi;
                self.r2[3] = lo;
                self.r2_sign.1 = sign;
            }
            0o03 => {
                self.r2[4] = hi;
                self.r3[0] = lo;
                self.r3_sign.0 = sign;
            }
            0o02 => {
                self.r3[1] = hi;
                self.r3[2] = lo;
                self.r3_sign.1 = sign;
            }
            0o01 => {
                self.r3[3] = hi;
                self.r3[4] = lo;
            }
            _ => {}
        }
    }
}
