//! # phopy CLI
//!
//! Command-line interface for copying photos into a target tree.
//!
//! ## Usage
//! ```bash
//! phopy --source ~/Photos --target ~/Archive
//! phopy -s ./in -t ./out --from 2024-01-01 --until 2024-12-31 --dry-run
//! ```

mod cli;

fn main() {
    if let Err(err) = cli::run() {
        eprintln!("{}", err.user_message());
        std::process::exit(1);
    }
}
