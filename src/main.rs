use std::process::ExitCode;

fn main() -> ExitCode {
    match windy_monitor::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("windy: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
