// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Diagnostic listings for the lexer and parser debug switches.

use std::io::{self, Write};

use crate::lexer::Token;
use crate::parser::InstructionNode;

/// Write the token stream listing produced by `--debug-lexer`.
pub fn write_tokens<W: Write>(mut out: W, tokens: &[Token], source_name: &str) -> io::Result<()> {
    writeln!(out, "\nToken Stream ({source_name}):")?;
    writeln!(out, "==============")?;
    for token in tokens {
        writeln!(
            out,
            "Line {}: {:<12} '{}'",
            token.line,
            token.kind.name(),
            token.lexeme
        )?;
    }
    writeln!(out, "==============")?;
    writeln!(out)?;
    Ok(())
}

/// Write the instruction listing produced by `--debug-parser`.
pub fn write_program<W: Write>(
    mut out: W,
    program: &[InstructionNode],
    source_name: &str,
) -> io::Result<()> {
    writeln!(out, "Parsed Program ({source_name}):")?;
    writeln!(out, "----------------")?;

    let line_width = program
        .iter()
        .map(|node| node.line.to_string().len())
        .max()
        .unwrap_or(1);

    for node in program {
        write!(
            out,
            "Line {:>line_width$}: {:<6} ",
            node.line,
            node.mnemonic.name()
        )?;
        for operand in &node.operands {
            write!(out, "[{}: \"{}\"] ", operand.kind.name(), operand.lexeme)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "----------------")?;
    Ok(())
}
