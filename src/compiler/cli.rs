// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

use crate::compiler::RunError;

pub const VERSION: &str = "1.0";

const LONG_ABOUT: &str = "Decoy script compiler.

Each input script compiles to one bytecode module; all modules are packed
into a single .xex archive at the output path. Module entries are named
after the input file stem with a .xexm extension.";

#[derive(Parser, Debug)]
#[command(
    name = "decoyc",
    version = VERSION,
    about = "Decoy script compiler producing xex bytecode archives",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        short = 'i',
        long = "infile",
        value_name = "FILE",
        action = ArgAction::Append,
        long_help = "Input Decoy script (repeatable). Must end with .dc."
    )]
    pub infiles: Vec<PathBuf>,
    #[arg(
        short = 'o',
        long = "outfile",
        value_name = "FILE",
        long_help = "Output archive path. One compiled .xexm module is added per input script."
    )]
    pub outfile: Option<PathBuf>,
    #[arg(
        long = "debug-lexer",
        action = ArgAction::SetTrue,
        long_help = "Print the token stream of each input before parsing."
    )]
    pub debug_lexer: bool,
    #[arg(
        long = "debug-parser",
        action = ArgAction::SetTrue,
        long_help = "Print the parsed instruction list of each input before analysis."
    )]
    pub debug_parser: bool,
}

/// Validated CLI configuration.
#[derive(Debug)]
pub struct CliConfig {
    pub outfile: PathBuf,
    pub debug_lexer: bool,
    pub debug_parser: bool,
}

/// Validate CLI arguments and return the run configuration.
pub fn validate_cli(cli: &Cli) -> Result<CliConfig, RunError> {
    if cli.infiles.is_empty() {
        return Err(RunError::Cli(
            "No input files specified. Use -i/--infile".to_string(),
        ));
    }
    let outfile = match &cli.outfile {
        Some(outfile) => outfile.clone(),
        None => {
            return Err(RunError::Cli(
                "No output archive specified. Use -o/--outfile".to_string(),
            ))
        }
    };
    Ok(CliConfig {
        outfile,
        debug_lexer: cli.debug_lexer,
        debug_parser: cli.debug_parser,
    })
}

/// Split an input path into its display name and module base name.
/// The input must carry the `.dc` extension.
pub fn input_base_from_path(path: &Path) -> Result<(String, String), RunError> {
    let source_name = path.to_string_lossy().to_string();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(name) => name,
        None => return Err(RunError::Cli("Invalid input file name".to_string())),
    };
    let base = match file_name.strip_suffix(".dc") {
        Some(base) if !base.is_empty() => base,
        _ => {
            return Err(RunError::Cli(
                "Input file must end with .dc".to_string(),
            ))
        }
    };
    Ok((source_name, base.to_string()))
}
