// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Semantic analysis over the instruction list.
//!
//! Two passes. The first registers declarations: `cv` enters variables into
//! the symbol table, `dfp` enters labels. The label addresses recorded here
//! count instruction nodes and exist only so the second pass can confirm a
//! referenced label is declared; the code generator computes the byte
//! addresses the VM actually sees.
//!
//! The second pass checks every instruction's operand count, operand kinds,
//! name resolution, exact type matches, and literal ranges.

use crate::error::{SemanticError, SemanticIssue};
use crate::lang::{Mnemonic, ValueType};
use crate::lexer::{Token, TokenKind};
use crate::parser::InstructionNode;
use crate::symbol_table::{SymbolTable, VariableRecord};

pub struct SemanticAnalyzer<'a> {
    symbols: &'a mut SymbolTable,
}

impl<'a> SemanticAnalyzer<'a> {
    #[must_use]
    pub fn new(symbols: &'a mut SymbolTable) -> Self {
        Self { symbols }
    }

    /// Run both passes over the program.
    pub fn analyze(&mut self, program: &[InstructionNode]) -> Result<(), SemanticError> {
        self.first_pass(program)?;
        self.second_pass(program)
    }

    fn first_pass(&mut self, program: &[InstructionNode]) -> Result<(), SemanticError> {
        for (address, node) in program.iter().enumerate() {
            let result = match node.mnemonic {
                Mnemonic::Cv => self.declare_variable(node),
                Mnemonic::Dfp => self.declare_label(node, address as u32),
                _ => Ok(()),
            };
            result.map_err(|issue| wrap(node, issue))?;
        }
        Ok(())
    }

    fn second_pass(&self, program: &[InstructionNode]) -> Result<(), SemanticError> {
        for node in program {
            self.check(node).map_err(|issue| wrap(node, issue))?;
        }
        Ok(())
    }

    fn declare_variable(&mut self, node: &InstructionNode) -> Result<(), SemanticIssue> {
        operand_count(node, 2)?;
        let ty = match node.operands[1].kind {
            TokenKind::Type(ty) => ty,
            _ => return Err(SemanticIssue::ExpectedType),
        };
        if !ty.is_storable() {
            return Err(SemanticIssue::InvalidTypeSpecifier);
        }
        self.symbols.declare_variable(&node.operands[0].lexeme, ty)
    }

    fn declare_label(&mut self, node: &InstructionNode, address: u32) -> Result<(), SemanticIssue> {
        operand_count(node, 1)?;
        self.symbols.declare_label(&node.operands[0].lexeme, address)
    }

    fn check(&self, node: &InstructionNode) -> Result<(), SemanticIssue> {
        match node.mnemonic {
            Mnemonic::Av
            | Mnemonic::Aav
            | Mnemonic::Sav
            | Mnemonic::Mav
            | Mnemonic::Dav
            | Mnemonic::Moav => self.check_assignment(node),
            Mnemonic::Inc | Mnemonic::Dec => {
                operand_count(node, 1)?;
                self.variable(&node.operands[0]).map(|_| ())
            }
            Mnemonic::P | Mnemonic::Pl => self.check_print(node),
            Mnemonic::Pk | Mnemonic::Rk => self.check_key_operation(node),
            Mnemonic::Ikd => self.check_key_down(node),
            Mnemonic::Mvm => self.check_mouse_move(node),
            Mnemonic::Jmp => {
                operand_count(node, 1)?;
                self.label(&node.operands[0]).map(|_| ())
            }
            Mnemonic::Cejmp
            | Mnemonic::Cgjmp
            | Mnemonic::Cljmp
            | Mnemonic::Cegjmp
            | Mnemonic::Celjmp => self.check_conditional_jump(node),
            Mnemonic::Dl => self.check_delay(node),
            // Declarations were handled in the first pass; nop needs nothing.
            Mnemonic::Cv | Mnemonic::Dfp | Mnemonic::Nop => Ok(()),
        }
    }

    fn check_assignment(&self, node: &InstructionNode) -> Result<(), SemanticIssue> {
        operand_count(node, 2)?;
        let target = self.variable(&node.operands[0])?;
        let value = &node.operands[1];
        match value.kind {
            TokenKind::Literal => validate_literal(&value.lexeme, target.ty),
            TokenKind::Identifier => {
                let source = self.variable(value)?;
                type_match(target.ty, source.ty)
            }
            _ => Err(SemanticIssue::InvalidOperand(node.mnemonic.name())),
        }
    }

    fn check_print(&self, node: &InstructionNode) -> Result<(), SemanticIssue> {
        for operand in &node.operands {
            match operand.kind {
                TokenKind::String => {}
                TokenKind::Identifier => {
                    self.variable(operand)?;
                }
                _ => return Err(SemanticIssue::InvalidPrintOperand),
            }
        }
        Ok(())
    }

    fn check_key_operation(&self, node: &InstructionNode) -> Result<(), SemanticIssue> {
        operand_count(node, 1)?;
        let operand = &node.operands[0];
        match operand.kind {
            TokenKind::Literal => validate_literal(&operand.lexeme, ValueType::Ui8),
            // Any declared variable is acceptable as a key code source.
            TokenKind::Identifier => self.variable(operand).map(|_| ()),
            _ => Err(SemanticIssue::InvalidKeyOperand),
        }
    }

    fn check_key_down(&self, node: &InstructionNode) -> Result<(), SemanticIssue> {
        operand_count(node, 2)?;
        self.variable(&node.operands[0])?;
        let result = self.variable(&node.operands[1])?;
        type_match(ValueType::Ui8, result.ty)
    }

    fn check_mouse_move(&self, node: &InstructionNode) -> Result<(), SemanticIssue> {
        operand_count(node, 2)?;
        for operand in &node.operands {
            match operand.kind {
                TokenKind::Literal => validate_literal(&operand.lexeme, ValueType::I32)?,
                TokenKind::Identifier => {
                    let var = self.variable(operand)?;
                    type_match(ValueType::I32, var.ty)?;
                }
                _ => return Err(SemanticIssue::InvalidMouseOperand),
            }
        }
        Ok(())
    }

    fn check_conditional_jump(&self, node: &InstructionNode) -> Result<(), SemanticIssue> {
        operand_count(node, 4)?;
        self.variable(&node.operands[0])?;
        self.variable(&node.operands[1])?;
        self.label(&node.operands[2])?;
        self.label(&node.operands[3])?;
        Ok(())
    }

    fn check_delay(&self, node: &InstructionNode) -> Result<(), SemanticIssue> {
        operand_count(node, 1)?;
        let operand = &node.operands[0];
        match operand.kind {
            TokenKind::Literal => validate_literal(&operand.lexeme, ValueType::Ui32),
            TokenKind::Identifier => {
                let var = self.variable(operand)?;
                type_match(ValueType::Ui32, var.ty)
            }
            _ => Err(SemanticIssue::InvalidDelayOperand),
        }
    }

    fn variable(&self, token: &Token) -> Result<VariableRecord, SemanticIssue> {
        if token.kind != TokenKind::Identifier {
            return Err(SemanticIssue::ExpectedVariable);
        }
        self.symbols.variable(&token.lexeme).copied()
    }

    fn label(&self, token: &Token) -> Result<u32, SemanticIssue> {
        self.symbols.label_address(&token.lexeme)
    }
}

fn wrap(node: &InstructionNode, issue: SemanticIssue) -> SemanticError {
    SemanticError {
        mnemonic: node.mnemonic.name(),
        line: node.line,
        issue,
    }
}

fn operand_count(node: &InstructionNode, expected: usize) -> Result<(), SemanticIssue> {
    if node.operands.len() != expected {
        return Err(SemanticIssue::OperandCount(expected));
    }
    Ok(())
}

fn type_match(expected: ValueType, actual: ValueType) -> Result<(), SemanticIssue> {
    if expected != actual {
        return Err(SemanticIssue::TypeMismatch { expected, actual });
    }
    Ok(())
}

/// Check that a literal lexeme parses cleanly as decimal and lies within the
/// bounds of the given type.
fn validate_literal(lexeme: &str, ty: ValueType) -> Result<(), SemanticIssue> {
    if !literal_in_range(lexeme, ty) {
        return Err(SemanticIssue::ValueOutOfRange {
            literal: lexeme.to_string(),
            ty,
        });
    }
    Ok(())
}

fn literal_in_range(lexeme: &str, ty: ValueType) -> bool {
    match ty {
        ValueType::I8 => signed_in_range(lexeme, -128, 127),
        ValueType::Ui8 => unsigned_in_range(lexeme, 255),
        ValueType::I16 => signed_in_range(lexeme, -32768, 32767),
        ValueType::Ui16 => unsigned_in_range(lexeme, 65535),
        ValueType::I32 => signed_in_range(lexeme, -2147483648, 2147483647),
        ValueType::Ui32 => unsigned_in_range(lexeme, 4294967295),
        ValueType::F32 => lexeme.parse::<f32>().is_ok_and(f32::is_finite),
        ValueType::Nt | ValueType::Str => false,
    }
}

fn signed_in_range(lexeme: &str, min: i64, max: i64) -> bool {
    lexeme
        .parse::<i64>()
        .is_ok_and(|value| value >= min && value <= max)
}

fn unsigned_in_range(lexeme: &str, max: u64) -> bool {
    lexeme.parse::<u64>().is_ok_and(|value| value <= max)
}
