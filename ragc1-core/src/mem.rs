use crate::consts::{
    CADR_FIRST, CADR_LAST, ERASABLE_NUM_WORDS, FIXED_BANK_NUM_WORDS, FIXED_NUM_BANKS,
};
use crate::utils::{unpack_word, word_with_parity};

use log::{error, info, trace};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RopeError {
    #[error("unable to read rope file: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: malformed record `{text}`")]
    Malformed { line: usize, text: String },
    #[error("line {line}: address {cadr:06o} outside 00020..31777")]
    AddressRange { line: usize, cadr: u32 },
    #[error("line {line}: data {data:06o} wider than 15 bits")]
    DataRange { line: usize, data: u32 },
}

///
/// Core memory. The erasable store is one flat 1024-word array (of which
/// the first 0o20 addresses belong to the central store and are never
/// reached through here); the fixed store is twelve rope banks. Each word
/// is held in stored form, data plus parity, so the parity check on the
/// read path sees exactly what a sense line would. Fixed-region writes are
/// dropped while running; the rope loader flips `rope_mode` to get its
/// words in.
///
pub struct Mem {
    erasable: [u16; ERASABLE_NUM_WORDS],
    fixed: [[u16; FIXED_BANK_NUM_WORDS]; FIXED_NUM_BANKS],
    rope_mode: bool,
}

impl Mem {
    pub fn new() -> Mem {
        Mem {
            // erasable powers up as valid (odd-parity) zeros; real core
            // string contents survive a restart, not a power cycle
            erasable: [word_with_parity(0); ERASABLE_NUM_WORDS],
            fixed: [[0; FIXED_BANK_NUM_WORDS]; FIXED_NUM_BANKS],
            rope_mode: false,
        }
    }

    ///
    /// Raw stored word at a CADR, or None when the address decodes to no
    /// strand. Central-store addresses are not memory; the caller routes
    /// those through RSC/WSC instead.
    ///
    pub fn read(&self, cadr: u16) -> Option<u16> {
        match cadr {
            0o20..=0o1777 => Some(self.erasable[cadr as usize]),
            0o2000..=0o31777 => {
                let bank = (cadr >> 10) as usize;
                Some(self.fixed[bank][(cadr & 0o1777) as usize])
            }
            _ => None,
        }
    }

    pub fn write(&mut self, cadr: u16, word: u16) {
        trace!("MEM write {:05o}: {:06o}", cadr, word);
        match cadr {
            0o20..=0o1777 => self.erasable[cadr as usize] = word,
            0o2000..=0o31777 if self.rope_mode => {
                let bank = (cadr >> 10) as usize;
                self.fixed[bank][(cadr & 0o1777) as usize] = word;
            }
            0o2000..=0o31777 => {
                trace!("MEM write to fixed {:05o} dropped", cadr);
            }
            _ => {
                error!("MEM write outside address space: {:05o}", cadr);
            }
        }
    }

    ///
    /// Load a `.obj` rope image: one `OOOOOO DDDDDD` record per line, both
    /// six-digit octal, parity recomputed here. The whole file is parsed
    /// before anything is committed, so a bad file leaves memory untouched.
    ///
    pub fn load_obj_str(&mut self, content: &str) -> Result<(), RopeError> {
        let mut records: Vec<(u16, u16)> = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = idx + 1;
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }

            let mut fields = text.split_whitespace();
            let (a, d) = match (fields.next(), fields.next(), fields.next()) {
                (Some(a), Some(d), None) => (a, d),
                _ => {
                    return Err(RopeError::Malformed {
                        line,
                        text: text.to_string(),
                    })
                }
            };

            let cadr = u32::from_str_radix(a, 8).map_err(|_| RopeError::Malformed {
                line,
                text: text.to_string(),
            })?;
            let data = u32::from_str_radix(d, 8).map_err(|_| RopeError::Malformed {
                line,
                text: text.to_string(),
            })?;

            if cadr < CADR_FIRST as u32 || cadr > CADR_LAST as u32 {
                return Err(RopeError::AddressRange { line, cadr });
            }
            if data > 0o77777 {
                return Err(RopeError::DataRange { line, data });
            }
            records.push((cadr as u16, data as u16));
        }

        self.rope_mode = true;
        for (cadr, data) in records.iter() {
            self.write(*cadr, word_with_parity(*data));
        }
        self.rope_mode = false;
        info!("rope loaded: {} words", records.len());
        Ok(())
    }

    pub fn load_obj(&mut self, path: &str) -> Result<(), RopeError> {
        let content = std::fs::read_to_string(path)?;
        self.load_obj_str(&content)
    }

    /// Dump the full address space in `.obj` form (parity not stored).
    pub fn dump_obj(&self) -> String {
        let mut out = String::new();
        for cadr in CADR_FIRST..=CADR_LAST {
            if let Some(word) = self.read(cadr as u16) {
                out.push_str(&format!("{:06o} {:06o}\n", cadr, unpack_word(word)));
            }
        }
        out
    }

    /// Test hook: store a word verbatim, bypassing parity generation.
    pub fn write_raw(&mut self, cadr: u16, word: u16) {
        match cadr {
            0o20..=0o1777 => self.erasable[cadr as usize] = word,
            0o2000..=0o31777 => {
                let bank = (cadr >> 10) as usize;
                self.fixed[bank][(cadr & 0o1777) as usize] = word;
            }
            _ => {}
        }
    }
}
