use std::fs;
use std::io::{self, Stderr};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use gsm_core::ast::Parser;
use gsm_core::ir::lower::lower_with_context;
use gsm_core::lexer::Lexer;
use gsm_core::{Compilation, LowerOptions, Script, StdoutSink, VmOptions, run_module};
use log::debug;

mod output;

use output::DiagnosticPrinter;

fn main() -> ExitCode {
    let cli = Command::new("gsm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compiler and reference interpreter for GSM integer programs");

    let cli = setup_cli(cli);
    let matches = cli.get_matches();

    let (verbosity, trace) = match matches.subcommand() {
        Some((_, sub)) => (sub.get_count("verbose").max(matches.get_count("verbose")), sub.get_flag("trace")),
        None => (matches.get_count("verbose"), false),
    };
    let level = output::level_for(verbosity, trace);
    if let Err(e) = output::init_logger(level) {
        eprintln!("failed to install logger: {}", e);
    }

    dispatch_commands(&matches)
}

/// Sets up the CLI with subcommands and arguments.
fn setup_cli(cli: Command) -> Command {
    cli.subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .help("Log pipeline progress to stderr (repeat for per-step tracing)")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("build")
                .about("Compile a script and print its IR or an intermediate stage")
                .arg(file_arg("The script file to build"))
                .arg(
                    Arg::new("dump")
                        .help("Which stage to emit")
                        .short('d')
                        .long("dump")
                        .value_parser(["ast", "ir", "symbols"])
                        .default_value("ir")
                        .value_name("STAGE"),
                )
                .arg(
                    Arg::new("format")
                        .help("Output format of the emitted stage")
                        .short('f')
                        .long("format")
                        .value_parser(["text", "json"])
                        .default_value("text")
                        .value_name("FORMAT"),
                )
                .arg(
                    Arg::new("output")
                        .help("Write to FILE instead of stdout")
                        .short('o')
                        .long("output")
                        .value_parser(clap::value_parser!(String))
                        .value_name("FILE"),
                )
                .arg(trace_arg()),
        )
        .subcommand(
            Command::new("run")
                .about("Compile a script and execute it, printing every assigned value")
                .arg(file_arg("The script file to run"))
                .arg(
                    Arg::new("step-limit")
                        .help("Abort after N executed instructions")
                        .long("step-limit")
                        .value_parser(clap::value_parser!(usize))
                        .value_name("N"),
                )
                .arg(trace_arg()),
        )
}

fn file_arg(help: &'static str) -> Arg {
    Arg::new("file").help(help).required(true).index(1)
}

fn trace_arg() -> Arg {
    Arg::new("trace")
        .help("Trace every interpreted instruction")
        .long("trace")
        .action(ArgAction::SetTrue)
}

/// Dispatches the command based on the parsed arguments.
fn dispatch_commands(matches: &ArgMatches) -> ExitCode {
    let mut printer = DiagnosticPrinter::new(io::stderr());
    let outcome = match matches.subcommand() {
        Some(("build", sub_m)) => build(sub_m, &mut printer),
        Some(("run", sub_m)) => run(sub_m, &mut printer),
        _ => {
            let _ = printer.failure("no valid subcommand was used, see --help");
            Err(ExitCode::FAILURE)
        }
    };
    outcome.unwrap_or_else(|code| code)
}

fn build(sub_m: &ArgMatches, printer: &mut DiagnosticPrinter<Stderr>) -> Result<ExitCode, ExitCode> {
    let compiled = compile(sub_m, printer)?;
    let dump = sub_m.get_one::<String>("dump").map(String::as_str).unwrap_or("ir");
    let format = sub_m.get_one::<String>("format").map(String::as_str).unwrap_or("text");

    let rendered = render(&compiled, dump, format).map_err(|e| {
        let _ = printer.failure(&format!("could not serialise {}: {}", dump, e));
        ExitCode::FAILURE
    })?;

    match sub_m.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, rendered).map_err(|e| {
                let _ = printer.failure(&format!("could not write {}: {}", path, e));
                ExitCode::FAILURE
            })?;
            debug!("wrote {} to {}", dump, path);
        }
        None => print!("{}", rendered),
    }
    Ok(ExitCode::SUCCESS)
}

fn run(sub_m: &ArgMatches, printer: &mut DiagnosticPrinter<Stderr>) -> Result<ExitCode, ExitCode> {
    let compiled = compile(sub_m, printer)?;
    let opts = VmOptions {
        step_limit: sub_m.get_one::<usize>("step-limit").copied(),
        trace: sub_m.get_flag("trace"),
    };

    let mut sink = StdoutSink;
    let code = run_module(&compiled.module, &mut sink, &opts).map_err(|e| {
        let _ = printer.report(&e);
        ExitCode::FAILURE
    })?;
    debug!("{} returned {}", compiled.module.routine.name, code);
    Ok(u8::try_from(code).map(ExitCode::from).unwrap_or(ExitCode::FAILURE))
}

/// Load, parse and lower the script named by the `file` argument. Every
/// diagnostic is printed before giving up.
fn compile(sub_m: &ArgMatches, printer: &mut DiagnosticPrinter<Stderr>) -> Result<Compilation, ExitCode> {
    let file = sub_m
        .get_one::<String>("file")
        .ok_or(ExitCode::FAILURE)?;

    let script = Script::new(PathBuf::from(file)).map_err(|e| {
        let _ = printer.report(e.as_ref());
        ExitCode::FAILURE
    })?;
    let lexer = Lexer::new(&script).map_err(|e| {
        let _ = printer.report(&e);
        ExitCode::FAILURE
    })?;
    let ast = Parser::new(lexer).parse().map_err(|e| {
        for diagnostic in &e.diagnostics {
            let _ = printer.report(diagnostic);
        }
        ExitCode::FAILURE
    })?;
    let (module, symbols) = lower_with_context(&ast, &LowerOptions::default()).map_err(|e| {
        let _ = printer.report(&e);
        ExitCode::FAILURE
    })?;

    Ok(Compilation { ast, module, symbols })
}

fn render(compiled: &Compilation, dump: &str, format: &str) -> Result<String, serde_json::Error> {
    let json = format == "json";
    let text = match dump {
        "ast" if json => serde_json::to_string_pretty(&compiled.ast)?,
        "ast" => compiled.ast.to_string(),
        "symbols" if json => serde_json::to_string_pretty(&output::symbol_rows(&compiled.symbols))?,
        "symbols" => output::symbols_table(&compiled.symbols, &compiled.module),
        _ if json => serde_json::to_string_pretty(&compiled.module)?,
        _ => compiled.module.to_string(),
    };
    Ok(if text.ends_with('\n') { text } else { text + "\n" })
}
