use std::error::Error;

use clap::Parser;

use bench_reduce::cli::RecoveryCli;
use bench_reduce::gen::{open_input, report_error};
use bench_reduce::output::write_views;
use bench_reduce::pipeline::run_recovery;

fn main() {
    if let Err(err) = recsum() {
        report_error(err.as_ref());
        std::process::exit(1);
    }
}

fn recsum() -> Result<(), Box<dyn Error>> {
    let cli = RecoveryCli::parse();
    let input = open_input(&cli.out.input, cli.out.verbose)?;
    let views = run_recovery(input, cli.out.verbose)?;

    let stdout = std::io::stdout();
    write_views(&mut stdout.lock(), &views, &cli.out)?;
    Ok(())
}
