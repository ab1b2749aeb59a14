//! repasse-extract - Import a revenue-sharing report.
//!
//! Thin wrapper over the extract command.

fn main() -> std::process::ExitCode {
    repasse::cmd::extract_cmd::main()
}
