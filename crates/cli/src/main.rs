use std::process::ExitCode;

fn main() -> ExitCode {
    vendas_cli::run()
}
