// veldc: command-line driver for the Veld compiler front end

mod diagnostics;
mod parser;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as ClapParser;

use diagnostics::DiagnosticSink;
use parser::Parser;

#[derive(Debug, ClapParser)]
#[command(name = "veldc", about = "Compiler front end for the Veld language")]
struct Cli {
    /// Source file to compile
    file: PathBuf,

    /// Print the parsed AST
    #[arg(long)]
    dump_ast: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let file_name = cli.file.display().to_string();
    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read '{}'", file_name))?;

    let mut sink = DiagnosticSink::new(&file_name);
    let result = Parser::new(&source, &mut sink).parse();

    let ast = match result {
        Ok(ast) => Some(ast),
        Err(error) => {
            sink.add_error(error.message, error.location);
            None
        }
    };

    if !sink.warnings().is_empty() || sink.has_errors() {
        print!("{}", sink.render(&source));
    }

    if sink.has_errors() {
        return Ok(ExitCode::from(1));
    }

    if let Some(ast) = ast {
        if cli.dump_ast {
            println!("{:#?}", ast);
        } else {
            println!("{}: parsed {} top-level statements", file_name, ast.statements.len());
        }
    }

    Ok(ExitCode::SUCCESS)
}
