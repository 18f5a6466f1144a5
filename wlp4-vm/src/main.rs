mod cli;

use clap::Parser;
use cli::Cli;
use std::fs;
use std::io::{self, Read, Write};
use std::process;
use wlp4_vm::VM;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(&cli.asm_file)?;
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    let mut vm = VM::new(cli.config());
    vm.load_source(&source)?;
    vm.set_input(&input);
    if cli.array {
        vm.start_array(&cli.args)?;
    } else {
        let (a, b) = cli.two_ints()?;
        vm.start_two_ints(a, b);
    }

    let result = vm.run();
    io::stdout().write_all(&vm.output_buffer)?;
    io::stdout().flush()?;
    result?;

    if cli.verbose {
        eprintln!("wain returned {}", vm.result());
        eprintln!(
            "{} steps, {} prints, {} allocations ({} failed), {} deletes, {} blocks live",
            vm.steps,
            vm.stats.prints,
            vm.stats.allocations,
            vm.stats.failed_allocations,
            vm.stats.frees,
            vm.live_allocations()
        );
    }
    Ok(())
}
