//! Seltzer CLI: run script files or evaluate inline code.

use std::env;
use std::path::Path;
use std::process;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// CLI command to execute.
enum Command {
    /// Run a script file
    Run { file: String },
    /// Evaluate a string
    Eval { code: String },
}

/// CLI options parsed from arguments.
struct Options {
    command: Command,
    disassemble: bool,
}

fn print_usage() {
    eprintln!("Seltzer {} - Seltzer Interpreter", VERSION);
    eprintln!();
    eprintln!("Usage: seltzer [options] <script.sz>");
    eprintln!("       seltzer -e <code>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -e <code>            Evaluate code directly");
    eprintln!("  -d, --disassemble    Print compiled bytecode instead of running");
    eprintln!("  --version            Show version");
    eprintln!("  --help, -h           Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  seltzer script.sz           Run a script file");
    eprintln!("  seltzer -e 'put 1 + 1;'     Evaluate code directly");
    eprintln!("  seltzer -d script.sz        Show compiled bytecode");
}

fn parse_args() -> Options {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut command: Option<Command> = None;
    let mut disassemble = false;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            "--version" => {
                println!("seltzer {}", VERSION);
                process::exit(0);
            }
            "-d" | "--disassemble" => disassemble = true,
            "-e" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("-e requires a code argument");
                    print_usage();
                    process::exit(64);
                }
                if command.is_some() {
                    eprintln!("Only one script or -e block can be specified");
                    print_usage();
                    process::exit(64);
                }
                command = Some(Command::Eval {
                    code: args[i].clone(),
                });
            }
            _ if arg.starts_with('-') => {
                eprintln!("Unknown option: {}", arg);
                print_usage();
                process::exit(64);
            }
            _ => {
                if command.is_some() {
                    eprintln!("Only one script file can be specified");
                    print_usage();
                    process::exit(64);
                }
                command = Some(Command::Run { file: arg.clone() });
            }
        }
        i += 1;
    }

    let command = command.unwrap_or_else(|| {
        eprintln!("A script file or -e <code> is required");
        print_usage();
        process::exit(64);
    });

    Options {
        command,
        disassemble,
    }
}

fn main() {
    let options = parse_args();

    match &options.command {
        Command::Run { file } => run_file(file, &options),
        Command::Eval { code } => run_eval(code, &options),
    }
}

fn run_file(path: &str, options: &Options) {
    let path = Path::new(path);

    let result = if options.disassemble {
        seltzer::disassemble_file(path).map(|listing| print!("{}", listing))
    } else {
        seltzer::run_file(path)
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(70);
    }
}

fn run_eval(code: &str, options: &Options) {
    let result = if options.disassemble {
        seltzer::disassemble_source(code, "eval").map(|listing| print!("{}", listing))
    } else {
        seltzer::run(code, "eval")
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(70);
    }
}
