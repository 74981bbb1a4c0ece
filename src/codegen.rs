// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Bytecode emission.
//!
//! Two internal passes. The size pass walks the instruction list computing
//! each instruction's emitted size to fix label byte addresses; a `dfp`
//! records its label at the running address and contributes nothing to the
//! stream. The emit pass then writes each instruction's opcode and operand
//! payload. All multi-byte integers are little-endian; strings carry a 4-byte
//! length prefix and no terminator.
//!
//! `p`/`pl` payloads carry no operand count and no per-operand tags; a
//! decoder recovers the operand shapes from out-of-band knowledge of the
//! instruction. The layout is kept as-is for VM compatibility.

use std::collections::HashMap;

use crate::error::CodegenError;
use crate::lang::{Mnemonic, ValueType};
use crate::lexer::{Token, TokenKind};
use crate::parser::InstructionNode;
use crate::symbol_table::SymbolTable;

/// Default type for a literal appearing where no declared type prescribes
/// one: a decimal point means `f32`, a leading minus `i32`, anything else
/// `ui32`.
#[must_use]
pub fn infer_literal_type(lexeme: &str) -> ValueType {
    if lexeme.contains('.') {
        ValueType::F32
    } else if lexeme.starts_with('-') {
        ValueType::I32
    } else {
        ValueType::Ui32
    }
}

fn operand_size(operand: &Token) -> u32 {
    match operand.kind {
        // 1-byte type tag plus the value bytes.
        TokenKind::Literal => 1 + infer_literal_type(&operand.lexeme).size(),
        // Variable or label reference.
        _ => 4,
    }
}

/// Emitted size in bytes of one instruction.
#[must_use]
pub fn instruction_size(node: &InstructionNode) -> u32 {
    match node.mnemonic {
        // opcode, name length, name bytes, type tag
        Mnemonic::Cv => 1 + 4 + node.operands[0].lexeme.len() as u32 + 1,
        Mnemonic::Av
        | Mnemonic::Aav
        | Mnemonic::Sav
        | Mnemonic::Mav
        | Mnemonic::Dav
        | Mnemonic::Moav => 1 + 4 + operand_size(&node.operands[1]),
        Mnemonic::Inc | Mnemonic::Dec => 1 + 4,
        Mnemonic::P | Mnemonic::Pl => {
            let operands: u32 = node
                .operands
                .iter()
                .map(|operand| match operand.kind {
                    TokenKind::String => 4 + operand.lexeme.len() as u32,
                    _ => 4,
                })
                .sum();
            1 + operands
        }
        Mnemonic::Pk | Mnemonic::Rk | Mnemonic::Dl => 1 + operand_size(&node.operands[0]),
        Mnemonic::Ikd => 1 + 4 + 4,
        Mnemonic::Mvm => 1 + operand_size(&node.operands[0]) + operand_size(&node.operands[1]),
        Mnemonic::Dfp => 0,
        Mnemonic::Jmp => 1 + 4,
        Mnemonic::Cejmp
        | Mnemonic::Cgjmp
        | Mnemonic::Cljmp
        | Mnemonic::Cegjmp
        | Mnemonic::Celjmp => 1 + 16,
        Mnemonic::Nop => 1,
    }
}

pub struct CodeGenerator<'a> {
    symbols: &'a SymbolTable,
    label_addresses: HashMap<String, u32>,
    bytecode: Vec<u8>,
}

impl<'a> CodeGenerator<'a> {
    #[must_use]
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            label_addresses: HashMap::new(),
            bytecode: Vec::new(),
        }
    }

    /// Emit the bytecode for a semantically valid program.
    pub fn generate(mut self, program: &[InstructionNode]) -> Result<Vec<u8>, CodegenError> {
        self.build_label_map(program);
        for node in program {
            self.emit_instruction(node)?;
        }
        Ok(self.bytecode)
    }

    fn build_label_map(&mut self, program: &[InstructionNode]) {
        let mut address = 0u32;
        for node in program {
            if node.mnemonic == Mnemonic::Dfp {
                self.label_addresses
                    .insert(node.operands[0].lexeme.clone(), address);
            }
            address += instruction_size(node);
        }
    }

    fn emit_instruction(&mut self, node: &InstructionNode) -> Result<(), CodegenError> {
        if node.mnemonic == Mnemonic::Dfp {
            // Labels occupy no space; the address was fixed in the size pass.
            return Ok(());
        }
        self.bytecode.push(node.mnemonic.opcode());

        match node.mnemonic {
            Mnemonic::Cv => {
                let name = &node.operands[0];
                self.emit_string(&name.lexeme);
                let ty = self.variable_type(&name.lexeme)?;
                self.bytecode.push(ty.code());
            }
            Mnemonic::Av
            | Mnemonic::Aav
            | Mnemonic::Sav
            | Mnemonic::Mav
            | Mnemonic::Dav
            | Mnemonic::Moav => {
                self.emit_variable(&node.operands[0])?;
                self.emit_operand(&node.operands[1])?;
            }
            Mnemonic::Inc | Mnemonic::Dec => {
                self.emit_variable(&node.operands[0])?;
            }
            Mnemonic::P | Mnemonic::Pl => {
                for operand in &node.operands {
                    if operand.kind == TokenKind::String {
                        self.emit_string(&operand.lexeme);
                    } else {
                        self.emit_variable(operand)?;
                    }
                }
            }
            Mnemonic::Pk | Mnemonic::Rk | Mnemonic::Dl => {
                self.emit_operand(&node.operands[0])?;
            }
            Mnemonic::Ikd => {
                self.emit_variable(&node.operands[0])?;
                self.emit_variable(&node.operands[1])?;
            }
            Mnemonic::Mvm => {
                self.emit_operand(&node.operands[0])?;
                self.emit_operand(&node.operands[1])?;
            }
            Mnemonic::Jmp => {
                self.emit_label(&node.operands[0])?;
            }
            Mnemonic::Cejmp
            | Mnemonic::Cgjmp
            | Mnemonic::Cljmp
            | Mnemonic::Cegjmp
            | Mnemonic::Celjmp => {
                self.emit_variable(&node.operands[0])?;
                self.emit_variable(&node.operands[1])?;
                self.emit_label(&node.operands[2])?;
                self.emit_label(&node.operands[3])?;
            }
            Mnemonic::Nop => {}
            Mnemonic::Dfp => unreachable!("handled above"),
        }
        Ok(())
    }

    /// Emit a value operand: a tagged literal, a variable offset, or a label
    /// address, discriminated the same way the semantic pass resolved it.
    fn emit_operand(&mut self, operand: &Token) -> Result<(), CodegenError> {
        if operand.kind == TokenKind::Literal {
            self.emit_literal(&operand.lexeme)
        } else if self.symbols.is_variable(&operand.lexeme) {
            self.emit_variable(operand)
        } else {
            self.emit_label(operand)
        }
    }

    fn emit_literal(&mut self, lexeme: &str) -> Result<(), CodegenError> {
        let ty = infer_literal_type(lexeme);
        let value = match ty {
            ValueType::I32 => {
                let value: i32 = parse_literal(lexeme)?;
                (value as u32).to_le_bytes()
            }
            ValueType::Ui32 => {
                let value: u32 = parse_literal(lexeme)?;
                value.to_le_bytes()
            }
            ValueType::F32 => {
                let value: f32 = parse_literal(lexeme)?;
                value.to_le_bytes()
            }
            other => return Err(CodegenError::UnsupportedLiteralType(other)),
        };
        self.bytecode.push(ty.code());
        self.bytecode.extend_from_slice(&value);
        Ok(())
    }

    fn emit_variable(&mut self, token: &Token) -> Result<(), CodegenError> {
        let record = self
            .symbols
            .variable(&token.lexeme)
            .map_err(|_| CodegenError::UnknownVariable(token.lexeme.clone()))?;
        self.emit_u32(record.offset);
        Ok(())
    }

    fn emit_label(&mut self, token: &Token) -> Result<(), CodegenError> {
        let address = self
            .label_addresses
            .get(&token.lexeme)
            .copied()
            .ok_or_else(|| CodegenError::UnknownLabel(token.lexeme.clone()))?;
        self.emit_u32(address);
        Ok(())
    }

    fn variable_type(&self, name: &str) -> Result<ValueType, CodegenError> {
        self.symbols
            .variable(name)
            .map(|record| record.ty)
            .map_err(|_| CodegenError::UnknownVariable(name.to_string()))
    }

    fn emit_string(&mut self, text: &str) {
        self.emit_u32(text.len() as u32);
        self.bytecode.extend_from_slice(text.as_bytes());
    }

    fn emit_u32(&mut self, value: u32) {
        self.bytecode.extend_from_slice(&value.to_le_bytes());
    }
}

fn parse_literal<T: std::str::FromStr>(lexeme: &str) -> Result<T, CodegenError> {
    lexeme
        .parse()
        .map_err(|_| CodegenError::MalformedLiteral(lexeme.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{infer_literal_type, instruction_size, CodeGenerator};
    use crate::analyzer::SemanticAnalyzer;
    use crate::lang::ValueType;
    use crate::lexer::Lexer;
    use crate::parser::{InstructionNode, Parser};
    use crate::symbol_table::SymbolTable;

    fn front_end(source: &str) -> (Vec<InstructionNode>, SymbolTable) {
        let tokens = Lexer::new(source).tokenize().expect("scanning is total");
        let program = Parser::new(tokens).parse().expect("source should parse");
        let mut symbols = SymbolTable::new();
        SemanticAnalyzer::new(&mut symbols)
            .analyze(&program)
            .expect("source should analyze");
        (program, symbols)
    }

    fn generate(source: &str) -> Vec<u8> {
        let (program, symbols) = front_end(source);
        CodeGenerator::new(&symbols)
            .generate(&program)
            .expect("source should generate")
    }

    #[test]
    fn infers_literal_types_from_lexeme_shape() {
        assert_eq!(infer_literal_type("5"), ValueType::Ui32);
        assert_eq!(infer_literal_type("-5"), ValueType::I32);
        assert_eq!(infer_literal_type("5.0"), ValueType::F32);
        assert_eq!(infer_literal_type("-5.0"), ValueType::F32);
    }

    #[test]
    fn emits_declaration_and_assignment() {
        // cv: opcode, name length, name, type tag.
        // av: opcode, offset, inferred ui32 literal payload.
        let bytes = generate("cv a ui8\nav a 5\n");
        assert_eq!(
            bytes,
            vec![
                0x00, 0x01, 0x00, 0x00, 0x00, 0x61, 0x02, //
                0x01, 0x00, 0x00, 0x00, 0x00, 0x06, 0x05, 0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn emits_backward_jump_to_zero_size_label() {
        let bytes = generate("dfp start\nnop\njmp start\n");
        assert_eq!(bytes, vec![0xff, 0x10, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn emits_forward_jump_address() {
        // jmp is 5 bytes, nop is 1; "end" sits after both.
        let bytes = generate("jmp end\nnop\ndfp end\nnop\n");
        assert_eq!(bytes, vec![0x10, 0x06, 0x00, 0x00, 0x00, 0xff, 0xff]);
    }

    #[test]
    fn emits_conditional_jump_offsets_and_addresses() {
        let bytes = generate("cv x ui8\ncv y ui8\ndfp t\ndfp f\ncejmp x y t f\n");
        // Both labels land on the cejmp itself at byte 14.
        let tail = &bytes[14..];
        assert_eq!(tail[0], 0x11);
        assert_eq!(&tail[1..5], &0u32.to_le_bytes());
        assert_eq!(&tail[5..9], &1u32.to_le_bytes());
        assert_eq!(&tail[9..13], &14u32.to_le_bytes());
        assert_eq!(&tail[13..17], &14u32.to_le_bytes());
        assert_eq!(bytes.len(), 31);
    }

    #[test]
    fn emits_print_payload_without_operand_tags() {
        let bytes = generate("cv n ui8\np \"hi\" n\n");
        let payload = &bytes[7..];
        assert_eq!(payload[0], 0x09);
        assert_eq!(
            &payload[1..],
            &[0x02, 0x00, 0x00, 0x00, 0x68, 0x69, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn emits_negative_literal_as_two_complement_i32() {
        let bytes = generate("cv a i8\nav a -5\n");
        let payload = &bytes[bytes.len() - 5..];
        assert_eq!(payload[0], ValueType::I32.code());
        assert_eq!(&payload[1..], &(-5i32 as u32).to_le_bytes());
    }

    #[test]
    fn emits_float_literal_as_ieee754() {
        let bytes = generate("cv f f32\nav f 1.5\n");
        let payload = &bytes[bytes.len() - 5..];
        assert_eq!(payload[0], ValueType::F32.code());
        assert_eq!(&payload[1..], &1.5f32.to_le_bytes());
    }

    #[test]
    fn emits_key_and_delay_payloads() {
        let bytes = generate("pk 5\ndl 1000\n");
        assert_eq!(
            bytes,
            vec![
                0x0b, 0x06, 0x05, 0x00, 0x00, 0x00, //
                0x16, 0x06, 0xe8, 0x03, 0x00, 0x00, 0x00,
            ]
        );
    }

    #[test]
    fn mixed_mouse_operands_use_variable_offsets_and_literal_tags() {
        let bytes = generate("cv x i32\nmvm x -40\n");
        let tail = &bytes[7..];
        assert_eq!(tail[0], 0x0e);
        assert_eq!(&tail[1..5], &0u32.to_le_bytes());
        assert_eq!(tail[5], ValueType::I32.code());
        assert_eq!(&tail[6..10], &(-40i32 as u32).to_le_bytes());
    }

    #[test]
    fn stream_length_matches_size_pass() {
        let source = "cv a ui8\ncv b i32\nav a 200\ndfp loop\np \"a=\" a\nikd a a\nmvm b b\ninc a\ncejmp a b loop loop\ndl 16\njmp loop\nnop\n";
        let (program, symbols) = front_end(source);
        let expected: u32 = program.iter().map(instruction_size).sum();
        let bytes = CodeGenerator::new(&symbols).generate(&program).unwrap();
        assert_eq!(bytes.len() as u32, expected);
    }

    #[test]
    fn multi_byte_fields_are_little_endian() {
        let bytes = generate("dl 66051\n");
        // 66051 = 0x00010203
        assert_eq!(&bytes[2..], &[0x03, 0x02, 0x01, 0x00]);
    }

    #[test]
    fn ikd_emits_two_offsets() {
        let bytes = generate("cv k ui8\ncv r ui8\nikd k r\n");
        let tail = &bytes[14..];
        assert_eq!(tail[0], 0x0d);
        assert_eq!(&tail[1..5], &0u32.to_le_bytes());
        assert_eq!(&tail[5..9], &1u32.to_le_bytes());
    }
}
