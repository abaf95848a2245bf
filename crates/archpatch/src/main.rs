use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    archpatch::run()
}
