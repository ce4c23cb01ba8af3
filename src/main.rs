//! docbridge CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`, which has already
//! written a JSON error response by the time an error reaches here. The
//! error is repeated on stderr and the process exits non-zero.

use docbridge::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
