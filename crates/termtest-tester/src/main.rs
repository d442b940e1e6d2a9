#![forbid(unsafe_code)]

use std::process::ExitCode;

fn main() -> ExitCode {
    termtest_tester::logging::init();
    match termtest_tester::run_from_env() {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            eprintln!("{error}");
            ExitCode::from(error.exit_code())
        }
    }
}
