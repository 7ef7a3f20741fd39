//! bc-drv - Compiler Driver
//!
//! Wires the phases together for one compilation: read the input file
//! into the arena, tokenize, parse, analyze, generate, write the output
//! file. Control flow is strictly linear; each phase fully consumes its
//! input before the next begins.
//!
//! The driver also owns the compiler's trace output: annotated dumps of
//! the source, the token stream, the parsed statements, analyzer
//! warnings, and the generated script, each in a color-delimited section
//! on standard output. Fatal errors go to standard error and terminate
//! the process with a non-zero code.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use bc_gen::generate;
use bc_lex::{Token, TokenStream};
use bc_par::Parser;
use bc_sem::analyze;
use bc_util::{Bump, Handler};

/// Capacity of the compilation arena. The original compiler ran inside a
/// fixed 1 MiB bump buffer; exceeding it aborts the compilation.
pub const ARENA_CAPACITY: usize = 1 << 20;

/// Tokens per line in the TOKENS trace section.
const TOKENS_PER_LINE: u32 = 4;

/// Compiler configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// The bb source file to compile.
    pub input: PathBuf,

    /// Where the generated Batch script goes.
    pub output: PathBuf,

    /// ANSI colors in trace output. Off when `NO_COLOR` is set.
    pub color: bool,
}

/// ANSI escape prefixes for the trace sections, or empty strings when
/// color is suppressed.
pub struct Colors {
    pub gray: &'static str,
    pub red: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub blue: &'static str,
    pub pink: &'static str,
    pub cyan: &'static str,
    pub reset: &'static str,
}

impl Colors {
    /// Creates the palette, empty when `enabled` is false.
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self {
                gray: "\x1b[90m",
                red: "\x1b[91m",
                green: "\x1b[92m",
                yellow: "\x1b[93m",
                blue: "\x1b[94m",
                pink: "\x1b[95m",
                cyan: "\x1b[96m",
                reset: "\x1b[0m",
            }
        } else {
            Self {
                gray: "",
                red: "",
                green: "",
                yellow: "",
                blue: "",
                pink: "",
                cyan: "",
                reset: "",
            }
        }
    }
}

/// One compilation session: configuration plus the arena that owns the
/// whole working set (source text, AST, generated script).
pub struct Session {
    config: Config,
    arena: Bump,
}

impl Session {
    /// Creates a session with a capacity-limited arena.
    pub fn new(config: Config) -> Self {
        let arena = Bump::new();
        arena.set_allocation_limit(Some(ARENA_CAPACITY));
        Self { config, arena }
    }

    /// Runs the full pipeline. Any phase error aborts the compilation.
    pub fn compile(&self) -> Result<()> {
        let colors = Colors::new(self.config.color);

        debug!(input = %self.config.input.display(), "reading source");
        let text = fs::read_to_string(&self.config.input)
            .with_context(|| format!("failed to read: {}", self.config.input.display()))?;
        let source: &str = self.arena.alloc_str(&text);

        println!("{}---  SOURCE ---{}", colors.gray, colors.blue);
        print!("{}", source);
        println!("\n{}--- /SOURCE ---", colors.gray);

        println!("---  TOKENS ---{}", colors.green);
        debug!("tokenizing");
        let mut tokens = TokenStream::new(source);
        let mut column = 0u32;
        loop {
            let token = tokens.next_token()?;
            if token == Token::Eof {
                break;
            }
            if column > 0 {
                if column % TOKENS_PER_LINE == 0 {
                    println!();
                } else {
                    print!("{},\t{}", colors.gray, colors.green);
                }
            }
            print!("{}", token);
            column += 1;
        }
        println!("\n{}--- /TOKENS ---", colors.gray);

        println!("---  PARSE ---{}", colors.yellow);
        debug!("parsing");
        tokens.reset();
        let program = Parser::new(&mut tokens, &self.arena).parse_program()?;
        for statement in program.statements {
            println!("{}", statement);
        }
        println!("{}--- /PARSE ---", colors.gray);

        println!("---  ANALYZE ---{}", colors.red);
        debug!("analyzing");
        let handler = Handler::new();
        analyze(&program, &handler)?;
        println!("{}--- /ANALYZE ---", colors.gray);

        println!("---  CODEGEN ---{}", colors.pink);
        debug!("generating batch");
        let script = generate(&program, &self.arena, &handler)?;
        fs::write(&self.config.output, script)
            .with_context(|| format!("failed to write: {}", self.config.output.display()))?;
        println!(
            "{}Output Batch stored in {}:{}\n",
            colors.cyan,
            self.config.output.display(),
            colors.reset
        );
        println!("{}", script);
        println!("{}--- /CODEGEN ---", colors.gray);

        println!(
            "{}Memory usage: {} / {}{}",
            colors.cyan,
            humanize(self.arena.allocated_bytes()),
            humanize(ARENA_CAPACITY),
            colors.reset
        );
        Ok(())
    }
}

/// Formats a byte count the way the memory report prints it.
fn humanize(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    const KIB: usize = 1024;
    if bytes >= MIB {
        format!("{:.2}MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.2}KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{}B", bytes)
    }
}
