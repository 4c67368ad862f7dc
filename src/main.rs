use std::cell::RefCell;
use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use clap::Parser;

use tart::default_env;
use tart::run_file;

/// Execute a Tart document and print its output.
#[derive(Parser)]
#[command(name = "tart")]
struct Args {
    /// Path to the .tart source file to execute
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let env = Rc::new(RefCell::new(default_env()));
    match run_file(&args.file, &env) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}
