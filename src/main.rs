use std::process::ExitCode;

use deptool::ui::output;

fn main() -> ExitCode {
    match deptool::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
