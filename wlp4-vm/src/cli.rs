use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "wlp4vm",
    about = "Run WLP4 MIPS assembly",
    long_about = "Assembles a WLP4 MIPS program and runs wain.\n\
                  Standard input is served to getchar().",
    version
)]
pub struct Cli {
    /// Assembly file to run
    pub asm_file: PathBuf,

    /// Arguments to wain: two integers, or the array elements with --array
    #[arg(allow_negative_numbers = true)]
    pub args: Vec<i32>,

    /// Pass the arguments as an array and its length
    #[arg(short, long)]
    pub array: bool,

    /// Memory size in words
    #[arg(short, long)]
    pub memory: Option<usize>,

    /// Abandon the run after this many instructions
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Report runtime statistics on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> wlp4_vm::VmConfig {
        let mut config = wlp4_vm::VmConfig::default();
        if let Some(memory) = self.memory {
            config.memory_words = memory;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        config
    }

    /// Two-integer arguments, defaulting missing ones to zero
    pub fn two_ints(&self) -> Result<(i32, i32), String> {
        match self.args.as_slice() {
            [] => Ok((0, 0)),
            [a] => Ok((*a, 0)),
            [a, b] => Ok((*a, *b)),
            _ => Err(format!(
                "expected at most two integers, got {} (use --array for arrays)",
                self.args.len()
            )),
        }
    }
}
