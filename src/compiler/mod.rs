// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Compiler driver - main entry point.
//!
//! Ties the pipeline stages together per compilation unit and packs the
//! resulting modules into the output archive. Each unit runs to completion
//! independently; the first failing unit aborts the whole job.

pub mod archive;
pub mod cli;


use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser as ClapParser;
use thiserror::Error;

use crate::analyzer::SemanticAnalyzer;
use crate::codegen::CodeGenerator;
use crate::dump;
use crate::error::CompileError;
use crate::lexer::Lexer;
use crate::parser::{InstructionNode, Parser};
use crate::symbol_table::SymbolTable;

use cli::{input_base_from_path, validate_cli, Cli, CliConfig};

pub use cli::VERSION;

/// One compiled module ready for packaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub module_name: String,
    pub bytecode: Vec<u8>,
}

/// Result of a successful run.
#[derive(Debug)]
pub struct RunSummary {
    pub compiled: usize,
    pub output: PathBuf,
}

/// Failure of a whole compiler run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{0}")]
    Cli(String),

    #[error("Could not open source file: {path}")]
    ReadSource {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Failed to write diagnostic listing")]
    Dump(#[source] io::Error),

    #[error("Failed to create output archive: {path}")]
    CreateArchive {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to add {name} to output archive")]
    AddModule {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to finalize output archive")]
    FinalizeArchive(#[source] zip::result::ZipError),
}

/// Run the compiler with command-line arguments.
pub fn run() -> Result<RunSummary, RunError> {
    run_with(Cli::parse())
}

/// Run the compiler with an already-parsed CLI.
pub fn run_with(cli: Cli) -> Result<RunSummary, RunError> {
    let config = validate_cli(&cli)?;

    let mut units = Vec::new();
    for input in &cli.infiles {
        let (source_name, base) = input_base_from_path(input)?;
        let source = fs::read_to_string(input).map_err(|source| RunError::ReadSource {
            path: source_name.clone(),
            source,
        })?;
        let bytecode = compile_unit(&source, &source_name, &config)?;
        units.push(CompilationUnit {
            module_name: format!("{base}.xexm"),
            bytecode,
        });
    }

    archive::write_archive(&config.outfile, &units)?;

    Ok(RunSummary {
        compiled: units.len(),
        output: config.outfile,
    })
}

/// Compile one Decoy source to bytecode.
pub fn compile_source(source: &str) -> Result<Vec<u8>, CompileError> {
    let tokens = Lexer::new(source).tokenize()?;
    let program = Parser::new(tokens).parse()?;
    finish_unit(&program)
}

fn compile_unit(
    source: &str,
    source_name: &str,
    config: &CliConfig,
) -> Result<Vec<u8>, RunError> {
    let tokens = Lexer::new(source).tokenize().map_err(CompileError::from)?;
    if config.debug_lexer {
        let stdout = io::stdout();
        dump::write_tokens(stdout.lock(), &tokens, source_name).map_err(RunError::Dump)?;
    }

    let program = Parser::new(tokens).parse().map_err(CompileError::from)?;
    if config.debug_parser {
        let stdout = io::stdout();
        dump::write_program(stdout.lock(), &program, source_name).map_err(RunError::Dump)?;
    }

    Ok(finish_unit(&program)?)
}

fn finish_unit(program: &[InstructionNode]) -> Result<Vec<u8>, CompileError> {
    let mut symbols = SymbolTable::new();
    SemanticAnalyzer::new(&mut symbols).analyze(program)?;
    let bytecode = CodeGenerator::new(&symbols).generate(program)?;
    if bytecode.is_empty() {
        return Err(CompileError::EmptyBytecode);
    }
    Ok(bytecode)
}

/// Report a run outcome on standard streams, as the binary does.
pub fn report<W: Write>(mut out: W, summary: &RunSummary) -> io::Result<()> {
    writeln!(
        out,
        "Successfully compiled {} scripts to {}",
        summary.compiled,
        summary.output.display()
    )
}
