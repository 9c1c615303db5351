use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;

use interpreter::Interpreter;

#[derive(clap::Parser)]
struct Args {
    /// Script to run; omit to start an interactive session.
    file: Option<PathBuf>,

    /// Dump the parsed syntax tree before executing.
    #[arg(long)]
    print_ast: bool,
}

#[derive(Clone, Copy)]
enum Mode {
    Script,
    Interactive,
}

/// One interpreter session: the persistent interpreter plus the fault
/// flags the exit code is derived from. In interactive mode the flags are
/// reset between lines while the interpreter (and with it every
/// definition) lives on.
struct Session {
    interpreter: Interpreter,
    print_ast: bool,
    had_error: bool,
    had_runtime_error: bool,
}

impl Session {
    fn new(print_ast: bool) -> Self {
        Self {
            interpreter: Interpreter::new(),
            print_ast,
            had_error: false,
            had_runtime_error: false,
        }
    }

    fn run(&mut self, source: &str, mode: Mode) {
        let (tokens, scan_errors) = scanner::Scanner::new(source).scan_tokens();
        if !scan_errors.is_empty() {
            eprintln!("{scan_errors}");
            self.had_error = true;
        }

        let (stmts, parse_errors) = parser::Parser::new(tokens).parse();
        if !parse_errors.is_empty() {
            eprintln!("{parse_errors}");
            self.had_error = true;
        }

        if self.had_error {
            return;
        }
        log::debug!("parsed {} statements", stmts.len());

        if self.print_ast {
            for stmt in &stmts {
                println!("{stmt}");
            }
        }

        if let Err(e) = self.interpreter.interpret(&stmts, &mut stdout()) {
            match mode {
                Mode::Script => eprintln!("{e}\n[line {}]", e.line),
                // Keep interactive output terse.
                Mode::Interactive => eprintln!("{e}"),
            }
            self.had_runtime_error = true;
        }
    }
}

fn run_file(path: PathBuf, session: &mut Session) -> anyhow::Result<ExitCode> {
    let source = std::fs::read_to_string(path)?;
    session.run(&source, Mode::Script);

    // Conventional exit codes: 65 for static faults, 70 for runtime faults.
    Ok(if session.had_error {
        ExitCode::from(65)
    } else if session.had_runtime_error {
        ExitCode::from(70)
    } else {
        ExitCode::SUCCESS
    })
}

fn run_prompt(session: &mut Session) -> anyhow::Result<()> {
    loop {
        print!("> ");
        stdout().flush()?;

        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            return Ok(());
        }

        session.run(&line, Mode::Interactive);
        // A fault only kills the current line, not the session.
        session.had_error = false;
        session.had_runtime_error = false;
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let mut session = Session::new(args.print_ast);

    match args.file {
        Some(file) => run_file(file, &mut session),
        None => {
            run_prompt(&mut session)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
