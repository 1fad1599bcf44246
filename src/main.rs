use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::{debug, info};
use realiza::{run, Config, ScopeMode};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source file to run; without it the program is read from the console
    file: Option<PathBuf>,
    /// Scoping rule for conditional branches and loop bodies
    #[arg(long, value_enum, default_value_t = ScopeMode::Isolated)]
    scope: ScopeMode,
    /// Leave the token listing out of the report
    #[arg(long)]
    hide_tokens: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::default().with_scope(cli.scope);
    if cli.hide_tokens {
        config = config.hide_tokens();
    }
    debug!("running with {:?}", config);

    let source = match &cli.file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("{}: {e}", path.display()))?,
        None => read_console()?,
    };
    print!("{}", run(&source, &config));
    Ok(())
}

// Collects lines until two consecutive blank lines, or until the console is
// closed. A single blank line stays part of the program.
fn read_console() -> rustyline::Result<String> {
    let mut rl = DefaultEditor::new()?;
    let mut lines: Vec<String> = vec![];
    println!("Enter the program; finish with two empty lines.");
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                if ends_input(&lines, &line) {
                    break;
                }
                rl.add_history_entry(line.as_str())?;
                lines.push(line);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                info!("console closed, running what was entered");
                break;
            }
            Err(err) => return Err(err),
        }
    }
    Ok(lines.join("\n"))
}

fn ends_input(lines: &[String], line: &str) -> bool {
    line.trim().is_empty() && lines.last().map_or(false, |prev| prev.trim().is_empty())
}

#[cfg(test)]
mod test {
    use super::ends_input;

    #[test]
    fn test_input_ends_at_second_blank_line() {
        let lines = vec!["ent x es 1.".to_string()];
        assert!(!ends_input(&lines, ""));
        assert!(!ends_input(&lines, "x es 2."));

        let lines = vec!["ent x es 1.".to_string(), "".to_string()];
        assert!(ends_input(&lines, ""));
        assert!(ends_input(&lines, "   "));
        assert!(!ends_input(&lines, "retorna x."));

        assert!(!ends_input(&[], ""));
        assert!(ends_input(&["".to_string()], ""));
    }
}
