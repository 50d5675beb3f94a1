//! mudra — interactive entry point.

use std::io::{self, Write};

use mudra::app::{run, AppConfig, OCTAVE_MAX, OCTAVE_MIN};
use mudra::mapping::HandMappingDirection;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use swara_scale::{ragas, talas};

fn main() {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .ok();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Mudra — Hand-Gesture Carnatic Raga Instrument         ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Mode: Console simulation  (type 'l1'…'r4' to pinch fingers)");
    println!();

    let cfg = if std::env::args().any(|a| a == "--quick") {
        println!("  Quick-start: Mayamalavagowla, Adi tala, octave 4\n");
        AppConfig::default()
    } else {
        configure_interactively()
    };

    println!();
    if let Err(e) = run(&cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    let raga_key = pick_raga();
    let tala_key = pick_tala();
    let direction = pick_direction();
    let octave: i32 = {
        let o = read_line("  Octave 2–6 (default 4): ")
            .trim().parse().unwrap_or(4);
        o.max(OCTAVE_MIN).min(OCTAVE_MAX)
    };

    AppConfig {
        raga_key,
        tala_key,
        direction,
        octave,
    }
}

fn pick_raga() -> String {
    println!("  Raga:");
    for (i, r) in ragas().iter().enumerate() {
        println!("    {}. {:<17} {}", i + 1, r.name, r.description);
    }
    let n: usize = read_line("  Choice (default 1): ")
        .trim().parse().unwrap_or(1);
    let catalog = ragas();
    let idx = n.saturating_sub(1).min(catalog.len() - 1);
    catalog[idx].key.to_string()
}

fn pick_tala() -> String {
    println!("  Tala:");
    for (i, t) in talas().iter().enumerate() {
        println!("    {}. {:<14} {} beats", i + 1, t.name, t.beats);
    }
    let n: usize = read_line("  Choice (default 1): ")
        .trim().parse().unwrap_or(1);
    let catalog = talas();
    let idx = n.saturating_sub(1).min(catalog.len() - 1);
    catalog[idx].key.to_string()
}

fn pick_direction() -> HandMappingDirection {
    println!("  Hand layout: 1=left-to-right  2=right-to-left  3=cyclic");
    match read_line("  Choice (default 1): ").trim() {
        "2" => HandMappingDirection::RightToLeft,
        "3" => HandMappingDirection::Cyclic,
        _   => HandMappingDirection::LeftToRight,
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
