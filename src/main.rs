use arithcc::{compile, parse_args};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let src = match parse_args(env::args()) {
        Ok(src) => src,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match compile(&src) {
        Ok(asm) => {
            print!("{}", asm);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
