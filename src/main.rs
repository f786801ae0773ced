/*!
 * waitn - Main Entry Point
 *
 * Waits for the first of several processes to terminate, as in Bash's
 * `wait -n`, without requiring that they be child processes. Prints the
 * winning pid on stdout; everything else goes to stderr.
 */

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::process;
use tracing::error;
use waitn::{init_tracing, parse_pids, wait_first, Budget, EXIT_INPUT};

#[derive(Parser)]
#[command(name = "waitn")]
#[command(about = "Wait for the first of several processes to terminate, as in Bash's wait -n")]
#[command(version)]
#[command(after_help = "\
Exit status:
  0    a process terminated, or a pid was not found (presumed already exited)
  1    a pid was not found and --error-on-unknown was set
  2    --timeout elapsed; every process was found and none had terminated
  127  malformed input

A pid that cannot be found is reported on stdout exactly like a completion:
the process presumably exited before waitn could watch it. Note that the OS
may reuse pids; a recycled pid makes waitn wait for the wrong process.")]
struct Cli {
    /// Exit 1 instead of 0 when a pid has no live process
    #[arg(long)]
    error_on_unknown: bool,

    /// Timeout in milliseconds: negative waits forever, zero only reports a
    /// process that has already terminated
    #[arg(long, default_value_t = -1, allow_hyphen_values = true, value_name = "MS")]
    timeout: i64,

    /// Process ids to watch, in tie-break order
    #[arg(required = true, value_name = "PID")]
    pids: Vec<String>,
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            process::exit(EXIT_INPUT);
        }
    };

    let pids = match parse_pids(&cli.pids) {
        Ok(pids) => pids,
        Err(err) => {
            eprintln!("waitn: {err}");
            eprintln!("{}", Cli::command().render_usage());
            process::exit(EXIT_INPUT);
        }
    };

    match wait_first(&pids, Budget::from_millis(cli.timeout)) {
        Ok(outcome) => {
            if let Some(pid) = outcome.pid() {
                println!("{pid}");
            }
            process::exit(outcome.exit_code(cli.error_on_unknown));
        }
        Err(err) => {
            // Internal fault: never folded into an outcome. Stop loudly
            // rather than risk reporting a wrong pid as terminated.
            debug_assert!(err.is_fault(), "non-fault error escaped the wait");
            error!(error = %err, "unrecoverable fault");
            panic!("unrecoverable fault: {err}");
        }
    }
}
