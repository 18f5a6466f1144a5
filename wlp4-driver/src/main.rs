//! WLP4 Code Generator Driver
//!
//! Reads a type-annotated WLP4 parse tree on standard input and writes the
//! MIPS assembly for it to standard output. Logging goes to standard error and
//! is controlled with `RUST_LOG`.

use clap::Parser;
use log::info;
use std::io::{self, Read, Write};
use std::process;
use wlp4_backend::{compile_tree, LoweringOptions};
use wlp4_common::CompilerError;

#[derive(Parser)]
#[command(name = "wlp4gen")]
#[command(about = "WLP4 code generator: annotated parse tree on stdin, MIPS assembly on stdout")]
#[command(version = "0.1.0")]
struct Cli {}

fn main() {
    env_logger::init();
    let _cli = Cli::parse();

    if let Err(e) = run() {
        eprintln!("ERROR: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), CompilerError> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    info!("Read {} bytes of annotated tree", input.len());

    let assembly = compile_tree(&input, &LoweringOptions::default())?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(assembly.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
