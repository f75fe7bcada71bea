extern crate clap;

use crossbeam_channel::bounded;
use ctrlc;
use env_logger;
use log::error;

use ragc1_core::agc::Agc;

use std::fs::File;
use std::io::{BufRead, BufReader};

/// Keyboard-poll batching from the original monitor loop: the core runs
/// this many pulses between checks of the outside world.
const TICK_BATCH: usize = 100;

fn fetch_config<'a>() -> clap::ArgMatches<'a> {
    let about = "RAGC1 is a pulse-level Block-I Apollo Guidance Computer simulator";
    clap::App::new("Rust Apollo Guidance Computer Block I (RAGC1)")
        .version("0.1")
        .about(about)
        .arg(
            clap::Arg::with_name("rope")
                .index(1)
                .required(true)
                .help("Rope image to load (.obj, octal address/data records)"),
        )
        .arg(
            clap::Arg::with_name("listing")
                .long("listing")
                .takes_value(true)
                .help("Assembly listing (.lst) for source display on halt"),
        )
        .arg(
            clap::Arg::with_name("breakpoint")
                .long("break")
                .takes_value(true)
                .help("Halt at TP1 of the instruction at this CADR (octal)"),
        )
        .arg(
            clap::Arg::with_name("watch")
                .long("watch")
                .takes_value(true)
                .help("Halt after any change to this CADR (octal)"),
        )
        .arg(
            clap::Arg::with_name("ticks")
                .long("ticks")
                .takes_value(true)
                .help("Stop after this many clock pulses"),
        )
        .get_matches()
}

///
/// Source-display feature: find the listing line whose first five columns
/// carry the given CADR, with a little leading context.
///
fn show_source_line(path: &str, cadr: u16) {
    let f = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            error!("unable to open listing {}: {}", path, e);
            return;
        }
    };

    let tag = format!("{:05o}", cadr);
    let mut context: Vec<String> = Vec::new();
    for line in BufReader::new(f).lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        context.push(line.clone());
        if context.len() > 5 {
            context.remove(0);
        }
        if line.get(..5) == Some(tag.as_str()) {
            for prior in context.iter().take(context.len() - 1) {
                println!("  {}", prior);
            }
            println!("> {}", line);
            return;
        }
    }
    println!("(no listing line for {:05o})", cadr);
}

fn display_agc(agc: &Agc) {
    println!("--- BLOCK 1 SIMULATOR ---------------------------------");
    println!(
        " TP: {:<5}  SCL:{:05o}  SQ:{:02o} {:<6} STA:{:01o} STB:{:01o} BR:{:01o}{:01o} SNI:{:01o}",
        agc.tpg.sg.name(),
        agc.scl.scl.read(),
        agc.seq.sq.read(),
        agc.seq.subseq.name(),
        agc.seq.sta.read(),
        agc.seq.stb.read(),
        agc.seq.br1.read(),
        agc.seq.br2.read(),
        agc.seq.sni.read(),
    );
    println!(
        "  A:{:06o}  Q:{:06o}  Z:{:06o} LP:{:06o}  G:{:06o}  S:{:04o} CADR:{:06o}",
        agc.crg.a.read(),
        agc.crg.q.read(),
        agc.crg.z.read(),
        agc.crg.lp.read(),
        agc.g_with_parity(),
        agc.adr.s.read(),
        agc.cadr(),
    );
    println!(
        "  X:{:06o}  Y:{:06o}  U:{:06o}  B:{:06o}  RPCELL:{:02o} UpCELL:{:03o} DnCELL:{:03o}{}",
        agc.alu.x.read(),
        agc.alu.y.read(),
        agc.alu.u.read(),
        agc.alu.b.read(),
        agc.int.rpcell.read(),
        agc.ctr.up_cell.read(),
        agc.ctr.dn_cell.read(),
        if agc.par.palm.read() != 0 {
            "  PALM:[*]"
        } else {
            ""
        },
    );
    println!(
        "  OUT1:{:05o}  V:[{}{}] N:[{}{}] R1:[{}{}{}{}{}{}]",
        agc.dsky.out1.read(),
        agc.dsky.vd[0],
        agc.dsky.vd[1],
        agc.dsky.nd[0],
        agc.dsky.nd[1],
        agc.dsky.r1s(),
        agc.dsky.r1[0],
        agc.dsky.r1[1],
        agc.dsky.r1[2],
        agc.dsky.r1[3],
        agc.dsky.r1[4],
    );
}

fn main() {
    env_logger::init();

    // A ctrl-c handler so a runaway rope can be stopped cleanly; a second
    // signal before the loop notices force-exits.
    let (ctrlc_tx, ctrlc_rx) = bounded(1);
    let res = ctrlc::set_handler(move || {
        if ctrlc_tx.is_full() {
            std::process::exit(-1);
        }
        let _res = ctrlc_tx.send(());
    });
    if let Err(x) = res {
        error!("Unable to register signal handler. {:?}.", x);
        return;
    }

    let matches = fetch_config();
    let rope = matches.value_of("rope").unwrap();
    let listing = matches.value_of("listing");
    let breakpoint =
        matches.value_of("breakpoint").map(|s| u16::from_str_radix(s, 8).unwrap_or(0));
    let watch = matches.value_of("watch").map(|s| u16::from_str_radix(s, 8).unwrap_or(0));
    let max_ticks: Option<u64> = matches.value_of("ticks").map(|s| s.parse().unwrap_or(0));

    let mut agc = Agc::new();
    if let Err(e) = agc.mem.load_obj(rope) {
        error!("{}", e);
        return;
    }

    // power-up: GENRST under PURST, then release and run fast
    agc.step();
    agc.mon.purst = false;
    agc.mon.run = true;
    agc.mon.fclk = true;
    agc.step();

    let mut ticks: u64 = 0;
    let mut old_watch = watch.map(|w| agc.peek(w));
    display_agc(&agc);

    loop {
        if ctrlc_rx.len() > 0 {
            break;
        }
        if !agc.mon.run {
            break;
        }
        if let Some(limit) = max_ticks {
            if ticks >= limit {
                break;
            }
        }

        // run a batch of pulses between polls, the 1:100 ratio the
        // original used to keep host I/O off the critical path
        for _ in 0..TICK_BATCH {
            agc.step();
            ticks += 1;

            // halt at TP1 of a new instruction whose CADR matches
            if let Some(bp) = breakpoint {
                if agc.new_instruction() && agc.cadr() == bp {
                    println!("breakpoint at {:05o}", bp);
                    agc.mon.run = false;
                    break;
                }
            }
            if let Some(w) = watch {
                let now = agc.peek(w);
                if Some(now) != old_watch {
                    println!("watch: {:05o} changed to {:05o}", w, now);
                    old_watch = Some(now);
                    agc.mon.run = false;
                    break;
                }
            }
        }
    }

    display_agc(&agc);
    if let Some(path) = listing {
        show_source_line(path, agc.cadr());
    }
    println!("halted after {} pulses", ticks);
}
