//! repasse-reconcile - Cross-check a report against its summaries.

fn main() -> std::process::ExitCode {
    repasse::cmd::reconcile_cmd::main()
}
