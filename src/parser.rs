// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Parser for the token stream.
//!
//! A Decoy program is a sequence of instruction lines. Each line starts with
//! an instruction token, carries the operand shape its mnemonic prescribes,
//! and ends at an end-of-line marker. Commas are never consumed by any rule.

use crate::error::ParseError;
use crate::lang::Mnemonic;
use crate::lexer::{Token, TokenKind};

/// One parsed instruction with its operand tokens in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionNode {
    pub mnemonic: Mnemonic,
    pub line: u32,
    pub operands: Vec<Token>,
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse the full token stream into an instruction list.
    pub fn parse(mut self) -> Result<Vec<InstructionNode>, ParseError> {
        let mut program = Vec::new();
        while !self.at_end() {
            program.push(self.parse_instruction()?);
        }
        Ok(program)
    }

    fn parse_instruction(&mut self) -> Result<InstructionNode, ParseError> {
        let head = self.advance().clone();
        let mnemonic = match head.kind {
            TokenKind::Instruction(mnemonic) => mnemonic,
            _ => {
                return Err(self.error(format!("Unknown instruction {}", head.lexeme)));
            }
        };

        let mut node = InstructionNode {
            mnemonic,
            line: head.line,
            operands: Vec::new(),
        };

        match mnemonic {
            Mnemonic::Cv => {
                node.operands
                    .push(self.expect_identifier("Expected a variable name")?);
                node.operands
                    .push(self.expect_type("Expected a variable type")?);
            }
            Mnemonic::Av
            | Mnemonic::Aav
            | Mnemonic::Sav
            | Mnemonic::Mav
            | Mnemonic::Dav
            | Mnemonic::Moav => {
                node.operands
                    .push(self.expect_identifier("Expected a variable name")?);
                node.operands.push(self.expect_value()?);
            }
            Mnemonic::Inc | Mnemonic::Dec => {
                node.operands
                    .push(self.expect_identifier("Expected a variable name")?);
            }
            Mnemonic::P | Mnemonic::Pl => {
                while matches!(
                    self.peek().map(|t| &t.kind),
                    Some(TokenKind::String | TokenKind::Identifier)
                ) {
                    node.operands.push(self.advance().clone());
                }
                if node.operands.is_empty() {
                    return Err(
                        self.error("Print instruction requires at least one operand".to_string())
                    );
                }
            }
            Mnemonic::Pk | Mnemonic::Rk => match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Literal | TokenKind::Identifier) => {
                    node.operands.push(self.advance().clone());
                }
                _ => {
                    return Err(
                        self.error("Key operation requires literal or variable".to_string())
                    )
                }
            },
            Mnemonic::Ikd => {
                node.operands
                    .push(self.expect_identifier("Expected a variable name")?);
                node.operands
                    .push(self.expect_identifier("Expected result variable")?);
            }
            Mnemonic::Mvm => {
                node.operands.push(self.expect_value()?);
                node.operands.push(self.expect_value()?);
            }
            Mnemonic::Dfp | Mnemonic::Jmp => {
                node.operands
                    .push(self.expect_identifier("Expected a label name")?);
            }
            Mnemonic::Cejmp
            | Mnemonic::Cgjmp
            | Mnemonic::Cljmp
            | Mnemonic::Cegjmp
            | Mnemonic::Celjmp => {
                node.operands
                    .push(self.expect_identifier("Expected first operand variable")?);
                node.operands
                    .push(self.expect_identifier("Expected second operand variable")?);
                node.operands
                    .push(self.expect_identifier("Expected true label")?);
                node.operands
                    .push(self.expect_identifier("Expected false label")?);
            }
            Mnemonic::Dl => {
                node.operands.push(self.expect_value()?);
            }
            Mnemonic::Nop => {
                if !matches!(self.peek().map(|t| &t.kind), Some(TokenKind::EndOfLine)) {
                    return Err(self.error("nop instruction takes no operands".to_string()));
                }
            }
        }

        self.expect_end_of_line()?;
        Ok(node)
    }

    fn expect_identifier(&mut self, message: &str) -> Result<Token, ParseError> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Identifier) => Ok(self.advance().clone()),
            _ => Err(self.error(message.to_string())),
        }
    }

    fn expect_type(&mut self, message: &str) -> Result<Token, ParseError> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Type(_)) => Ok(self.advance().clone()),
            _ => Err(self.error(message.to_string())),
        }
    }

    fn expect_value(&mut self) -> Result<Token, ParseError> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Literal | TokenKind::Identifier) => Ok(self.advance().clone()),
            _ => Err(self.error("Expected literal value or variable".to_string())),
        }
    }

    fn expect_end_of_line(&mut self) -> Result<(), ParseError> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::EndOfLine) => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.error("Expected end of line after instruction".to_string())),
        }
    }

    fn error(&self, message: String) -> ParseError {
        let line = match self.peek() {
            Some(token) => token.line,
            None => self.tokens.last().map_or(1, |token| token.line),
        };
        ParseError { line, message }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len().saturating_sub(1));
        self.pos += 1;
        &self.tokens[index]
    }
}
