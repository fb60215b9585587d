//! Binary entry point for the `rebrand` CLI.

use rebrand::ui::output;

fn main() {
    if let Err(err) = rebrand::cli::run() {
        // {:#} renders the whole anyhow context chain on one line.
        output::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
