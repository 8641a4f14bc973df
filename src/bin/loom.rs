use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;

use loom::ast::Parser;
use loom::interpreter::Interpreter;
use loom::lexer::Lexer;
use loom::Error;

/// `<prog> <script>` is the only real invocation; `--version`/`--help` are
/// handled by hand so their exit codes and wording match §6.2 exactly
/// rather than clap's own.
#[derive(ClapParser, Debug)]
#[command(name = "loom", disable_version_flag = true, disable_help_flag = true)]
struct Cli {
    script: Option<PathBuf>,

    #[arg(long)]
    version: bool,

    #[arg(long)]
    help: bool,
}

fn usage() -> String {
    format!(
        "{name} v{version}\n\nUsage:\n  {name} <script>\n  {name} --version\n  {name} --help\n",
        name = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
    )
}

fn main() -> ExitCode {
    simple_logger::init_with_level(log::Level::Warn).expect("logger already initialized");
    let cli = Cli::parse();

    if cli.version {
        print!("{} v{}\n", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    if cli.help {
        print!("{}", usage());
        return ExitCode::SUCCESS;
    }

    let Some(script) = cli.script else {
        print!("{}", usage());
        return ExitCode::FAILURE;
    };

    match run(&script) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Reads the script as bytes, normalizing `\r\n` to `\n` while leaving a
/// lone `\r` untouched, then runs it end to end.
fn run(path: &PathBuf) -> Result<(), String> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("could not read '{}': {e}", path.display()))?;
    let source = normalize_newlines(&bytes);

    run_source(&source).map_err(|e| e.to_string())
}

fn run_source(source: &str) -> Result<(), Error> {
    let tokens = Lexer::new(source).lex()?;
    let program = Parser::new(tokens).parse()?;
    Interpreter::new().run(&program)?;
    Ok(())
}

fn normalize_newlines(bytes: &[u8]) -> String {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
            out.push(b'\n');
            i += 2;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_crlf_but_preserves_lone_cr() {
        let input = b"a\r\nb\rc\n";
        assert_eq!(normalize_newlines(input), "a\nb\rc\n");
    }
}
