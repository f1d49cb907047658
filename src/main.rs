use std::error::Error;

use clap::Parser;

use bench_reduce::cli::PerfCli;
use bench_reduce::gen::{open_input, report_error};
use bench_reduce::output::write_views;
use bench_reduce::pipeline::run_perf;
use bench_reduce::titles::TitleMap;

fn main() {
    if let Err(err) = perfsum() {
        report_error(err.as_ref());
        std::process::exit(1);
    }
}

fn perfsum() -> Result<(), Box<dyn Error>> {
    let cli = PerfCli::parse();
    let titles = TitleMap::default().with_overrides(cli.titles.clone());
    let input = open_input(&cli.out.input, cli.out.verbose)?;
    // nothing reaches stdout until every view is built
    let views = run_perf(input, &titles, &cli.view_config(), cli.out.verbose)?;

    let stdout = std::io::stdout();
    write_views(&mut stdout.lock(), &views, &cli.out)?;
    Ok(())
}
