/*!
 * boottime - Kernel Clock Reader
 *
 * Prints a kernel clock reading as total nanoseconds since boot. Reads
 * CLOCK_BOOTTIME by default, the clock the kernel stamps process start
 * times with, so the output can order process starts against later
 * observations.
 */

use clap::Parser;
use std::process;
use waitn::clock::{clock_by_name, clock_ns};
use waitn::init_tracing;

#[derive(Parser)]
#[command(name = "boottime")]
#[command(about = "Print a kernel clock reading as nanoseconds since boot")]
#[command(version)]
struct Cli {
    /// Clock to read: CLOCK_BOOTTIME, CLOCK_MONOTONIC,
    /// CLOCK_MONOTONIC_COARSE, or CLOCK_MONOTONIC_RAW
    #[arg(default_value = "CLOCK_BOOTTIME", value_name = "CLOCK")]
    clock: String,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let Some(clock) = clock_by_name(&cli.clock) else {
        eprintln!("boottime: unexpected clock: {}", cli.clock);
        process::exit(1);
    };

    match clock_ns(clock) {
        Ok(ns) => println!("{ns}"),
        Err(err) => {
            eprintln!("boottime: {err}");
            process::exit(1);
        }
    }
}
