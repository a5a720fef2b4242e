use anyhow::{Context, Result};
use tlcs870_run::{parse_address, RunOptions, DEFAULT_CYCLES};

const USAGE: &str = "Usage: tlcs870 <image> [cycles] [load-addr]\n\
                     load-addr is decimal, or hex with a 0x prefix\n\
                     Example: tlcs870 program.bin 100000 0x8000";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(image) = args.next() else {
        eprintln!("{USAGE}");
        std::process::exit(1);
    };
    let cycles = match args.next() {
        Some(text) => text
            .parse::<u64>()
            .with_context(|| format!("invalid cycle count '{text}'"))?,
        None => DEFAULT_CYCLES,
    };
    let load_addr = match args.next() {
        Some(text) => parse_address(&text)?,
        None => 0,
    };

    let opts = RunOptions::builder()
        .image(image)
        .cycles(cycles)
        .load_addr(load_addr)
        .build();
    let summary = tlcs870_run::run(&opts)?;
    println!("{summary}");
    Ok(())
}
