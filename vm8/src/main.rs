use std::path::PathBuf;
use std::process;

use clap::Parser;

mod run;

/// Runs a program for the 8-bit interpreted virtual machine in the terminal.
///
/// Keys 1234/QWER/ASDF/ZXCV form the hex keypad; Esc quits.
#[derive(Parser, Debug)]
#[command(name = "vm8", version)]
struct Args {
    /// Raw program image, loaded at 0x200.
    #[arg(value_name = "ROM")]
    rom: PathBuf,
}

fn main() {
    // stdout is the display, so logs go to stderr; redirect it to keep them
    env_logger::init();
    let args = Args::parse();

    let machine = match run::load(&args.rom) {
        Ok(machine) => machine,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    // the display has restored the terminal by the time run returns
    if let Err(e) = run::run(machine) {
        eprintln!("{}", e);
        process::exit(1);
    }
}
