//! REPL (Read-Eval-Print Loop) for cellar
//!
//! Bindings and store cells persist across lines until `:reset`. A line
//! may hold statements, expressions or a mix of both.

use crate::config::RunConfig;
use crate::interp::Interpreter;
use crate::reader::read_str;
use crate::translator::{is_statement, translate_expr, translate_stmt};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const PROMPT: &str = "cellar> ";
const HISTORY_FILE: &str = ".cellar_history";

/// What a command line asks the loop to do next
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Interpreter state behind the prompt
pub struct Session {
    interpreter: Interpreter,
}

impl Session {
    pub fn new(config: &RunConfig) -> Self {
        Session {
            interpreter: Interpreter::with_config(config),
        }
    }

    /// Run one line of input and return what should be shown
    ///
    /// Statements contribute their printed output; a bare expression
    /// contributes its value. Errors stop the line but keep the session.
    pub fn eval_line(&mut self, line: &str) -> Result<Vec<String>, String> {
        let forms = read_str(line).map_err(|e| format!("Parse error: {}", e.message()))?;
        let mut shown = Vec::new();

        for form in &forms {
            if is_statement(form) {
                let stmt = translate_stmt(form).map_err(|e| format!("Parse error: {}", e.message()))?;
                let output = self
                    .interpreter
                    .execute_stmt(&stmt)
                    .map_err(|e| e.to_string())?;
                shown.extend(output);
            } else {
                let expr = translate_expr(form).map_err(|e| format!("Parse error: {}", e.message()))?;
                let value = self.interpreter.evaluate(&expr).map_err(|e| e.to_string())?;
                shown.push(value.to_string());
            }
        }

        Ok(shown)
    }

    pub fn store_dump(&self) -> String {
        self.interpreter.store().to_string()
    }

    pub fn reset(&mut self) {
        self.interpreter.reset();
    }
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    session: Session,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL
    pub fn new(config: &RunConfig) -> RlResult<Self> {
        let editor = DefaultEditor::new()?;
        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            session: Session::new(config),
            history_path,
        };

        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("cellar {}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    if line.starts_with(':') {
                        if handle_command(&mut self.session, line) == Flow::Quit {
                            break;
                        }
                        continue;
                    }

                    match self.session.eval_line(line) {
                        Ok(shown) => shown.iter().for_each(|s| println!("{s}")),
                        Err(err) => eprintln!("{err}"),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }
}

/// Handle REPL commands (starting with :)
fn handle_command(session: &mut Session, cmd: &str) -> Flow {
    match cmd {
        ":quit" | ":q" | ":exit" => {
            println!("Goodbye!");
            Flow::Quit
        }
        ":help" | ":h" | ":?" => {
            print_help();
            Flow::Continue
        }
        ":store" => {
            println!("{}", session.store_dump());
            Flow::Continue
        }
        ":reset" => {
            session.reset();
            println!("Environment and store cleared.");
            Flow::Continue
        }
        _ => {
            println!("Unknown command: {cmd}");
            println!("Type :help for help.");
            Flow::Continue
        }
    }
}

fn print_help() {
    println!("cellar REPL commands:");
    println!("  :help, :h, :?   Show this help");
    println!("  :quit, :q       Exit the REPL");
    println!("  :store          Show every store cell");
    println!("  :reset          Drop all definitions and cells");
    println!();
    println!("You can enter:");
    println!("  - Statements:  (define p (new Num 2))  (assign p 3)  (print (deref p))");
    println!("  - Expressions: (pointer-arith + p 1)  ((lambda x (+ x 1)) 2)");
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
