// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Error types for the compilation pipeline.
//!
//! Each pipeline stage has its own error kind; [`CompileError`] is the
//! umbrella a compilation unit surfaces to the driver. All errors are fatal
//! for the current unit.

use thiserror::Error;

use crate::lang::ValueType;

/// Scanner failure. The scanning rules are total over well-formed input, so
/// this only signals an internally inconsistent state.
#[derive(Debug, Clone, Error)]
#[error("Line {line}: {message}")]
pub struct LexError {
    pub line: u32,
    pub message: String,
}

/// Syntax failure, citing the one-based source line.
#[derive(Debug, Clone, Error)]
#[error("Line {line}: {message}")]
pub struct ParseError {
    pub line: u32,
    pub message: String,
}

/// The underlying detail of a [`SemanticError`].
#[derive(Debug, Clone, Error)]
pub enum SemanticIssue {
    #[error("Redeclaration of variable '{0}'")]
    VariableRedeclared(String),

    #[error("Undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("Redeclaration of label '{0}'")]
    LabelRedeclared(String),

    #[error("Undefined label '{0}'")]
    UndefinedLabel(String),

    #[error("Expected {0} operands")]
    OperandCount(usize),

    #[error("Expected variable identifier")]
    ExpectedVariable,

    #[error("Second operand must be a type")]
    ExpectedType,

    #[error("Invalid type specifier")]
    InvalidTypeSpecifier,

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: ValueType,
        actual: ValueType,
    },

    #[error("Value {literal} out of range for type {ty}")]
    ValueOutOfRange { literal: String, ty: ValueType },

    #[error("Invalid operand type for {0}")]
    InvalidOperand(&'static str),

    #[error("Print operands must be string literals or variables")]
    InvalidPrintOperand,

    #[error("Key operation requires UI8 literal or variable")]
    InvalidKeyOperand,

    #[error("mvm operands must be I32 literals or variables")]
    InvalidMouseOperand,

    #[error("dl requires UI32 literal or variable")]
    InvalidDelayOperand,
}

/// Semantic failure, wrapped with the offending instruction and line.
#[derive(Debug, Clone, Error)]
#[error("At instruction {mnemonic} (line {line}): {issue}")]
pub struct SemanticError {
    pub mnemonic: &'static str,
    pub line: u32,
    pub issue: SemanticIssue,
}

/// Code generation failure. After a clean semantic pass these should be
/// unreachable; they exist so emission never panics on a bad table state.
#[derive(Debug, Clone, Error)]
pub enum CodegenError {
    #[error("Undefined variable '{0}'")]
    UnknownVariable(String),

    #[error("Undefined label '{0}'")]
    UnknownLabel(String),

    #[error("Unsupported literal type {0}")]
    UnsupportedLiteralType(ValueType),

    #[error("Malformed literal '{0}'")]
    MalformedLiteral(String),
}

/// Failure of one compilation unit.
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("Generated bytecode is empty")]
    EmptyBytecode,
}

#[cfg(test)]
mod tests {
    use super::{CompileError, ParseError, SemanticError, SemanticIssue};
    use crate::lang::ValueType;

    #[test]
    fn parse_error_cites_line() {
        let err = ParseError {
            line: 3,
            message: "Expected a variable name".to_string(),
        };
        assert_eq!(err.to_string(), "Line 3: Expected a variable name");
    }

    #[test]
    fn semantic_error_wraps_instruction_and_line() {
        let err = SemanticError {
            mnemonic: "av",
            line: 2,
            issue: SemanticIssue::ValueOutOfRange {
                literal: "300".to_string(),
                ty: ValueType::Ui8,
            },
        };
        assert_eq!(
            err.to_string(),
            "At instruction av (line 2): Value 300 out of range for type ui8"
        );
    }

    #[test]
    fn compile_error_is_transparent_over_stage_errors() {
        let err = CompileError::from(SemanticError {
            mnemonic: "cv",
            line: 2,
            issue: SemanticIssue::VariableRedeclared("a".to_string()),
        });
        assert_eq!(
            err.to_string(),
            "At instruction cv (line 2): Redeclaration of variable 'a'"
        );
    }
}
