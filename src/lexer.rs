// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Lexer for Decoy source text.
//!
//! The scanner walks the whole source byte by byte and produces a flat token
//! sequence terminated by an end-of-line marker. Unrecognized characters are
//! skipped, so scanning is total over any input.

use crate::error::LexError;
use crate::lang::{Mnemonic, ValueType};

/// Token classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A reserved instruction name.
    Instruction(Mnemonic),
    /// Any non-reserved name.
    Identifier,
    /// A numeric literal, possibly signed, possibly with one decimal point.
    Literal,
    /// A reserved type name.
    Type(ValueType),
    /// Reserved classification. Labels surface as [`TokenKind::Identifier`]
    /// and are distinguished by position within their instruction.
    #[allow(dead_code)]
    Label,
    /// A quoted string, quotes excluded.
    String,
    Comma,
    EndOfLine,
}

impl TokenKind {
    /// Display name used by the diagnostic token dump.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Instruction(_) => "INSTRUCTION",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Literal => "LITERAL",
            TokenKind::Type(_) => "TYPE",
            TokenKind::Label => "LABEL",
            TokenKind::String => "STRING",
            TokenKind::Comma => "COMMA",
            TokenKind::EndOfLine => "END_OF_LINE",
        }
    }
}

/// One lexed token: classification, source text, and one-based line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric()
}

pub struct Lexer<'a> {
    input: &'a [u8],
    cursor: usize,
    line: u32,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            input: source.as_bytes(),
            cursor: 0,
            line: 1,
        }
    }

    /// Scan the whole source into tokens.
    ///
    /// A trailing [`TokenKind::EndOfLine`] is appended when the source does
    /// not end in a newline. An empty source yields no tokens.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while self.cursor < self.input.len() {
            let c = self.current_byte();
            if c.is_ascii_digit() || c == b'-' {
                tokens.push(self.read_number()?);
            } else if is_ident_start(c) {
                tokens.push(self.read_identifier());
            } else if c == b'"' {
                tokens.push(self.read_string());
            } else if c == b',' {
                self.cursor += 1;
                tokens.push(Token::new(TokenKind::Comma, ",", self.line));
            } else if c == b'\n' {
                self.cursor += 1;
                tokens.push(Token::new(TokenKind::EndOfLine, "EOL", self.line));
                self.line += 1;
            } else {
                self.cursor += 1;
            }
        }

        if tokens
            .last()
            .is_some_and(|token| token.kind != TokenKind::EndOfLine)
        {
            tokens.push(Token::new(TokenKind::EndOfLine, "EOL", self.line));
        }

        Ok(tokens)
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.cursor;
        if self.current_byte() == b'-' {
            self.cursor += 1;
        }
        let mut saw_point = false;
        loop {
            let c = self.current_byte();
            if c.is_ascii_digit() {
                self.cursor += 1;
            } else if c == b'.' && !saw_point {
                saw_point = true;
                self.cursor += 1;
            } else {
                break;
            }
        }
        if self.cursor == start {
            // Unreachable through tokenize(); the entry condition always
            // consumes at least the sign or one digit.
            return Err(LexError {
                line: self.line,
                message: "Empty numeric literal".to_string(),
            });
        }
        Ok(Token::new(
            TokenKind::Literal,
            self.lexeme_from(start),
            self.line,
        ))
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.cursor;
        // The start character may be an underscore; continuation characters
        // are alphanumeric only.
        self.cursor += 1;
        while is_ident_char(self.current_byte()) {
            self.cursor += 1;
        }
        let lexeme = self.lexeme_from(start);

        let kind = if let Some(mnemonic) = Mnemonic::from_name(&lexeme) {
            TokenKind::Instruction(mnemonic)
        } else if let Some(ty) = ValueType::from_name(&lexeme) {
            TokenKind::Type(ty)
        } else {
            TokenKind::Identifier
        };
        Token::new(kind, lexeme, self.line)
    }

    fn read_string(&mut self) -> Token {
        self.cursor += 1;
        let start = self.cursor;
        while self.current_byte() != b'"' && self.cursor < self.input.len() {
            self.cursor += 1;
        }
        let lexeme = self.lexeme_from(start);
        if self.current_byte() == b'"' {
            self.cursor += 1;
        }
        Token::new(TokenKind::String, lexeme, self.line)
    }

    fn lexeme_from(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.input[start..self.cursor]).to_string()
    }

    fn current_byte(&self) -> u8 {
        self.input.get(self.cursor).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Lexer, Token, TokenKind};
    use crate::lang::{Mnemonic, ValueType};

    fn lex(source: &str) -> Vec<Token> {
        Lexer::new(source).tokenize().expect("scanning is total")
    }

    #[test]
    fn classifies_keywords_and_identifiers() {
        let tokens = lex("cv counter ui8\n");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, TokenKind::Instruction(Mnemonic::Cv));
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].lexeme, "counter");
        assert_eq!(tokens[2].kind, TokenKind::Type(ValueType::Ui8));
        assert_eq!(tokens[3].kind, TokenKind::EndOfLine);
    }

    #[test]
    fn keywords_are_case_sensitive() {
        let tokens = lex("CV Ui8\n");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn scans_signed_and_decimal_literals() {
        let tokens = lex("av x -12\nav y 3.25\n");
        assert_eq!(tokens[2].kind, TokenKind::Literal);
        assert_eq!(tokens[2].lexeme, "-12");
        assert_eq!(tokens[6].lexeme, "3.25");
    }

    #[test]
    fn lone_minus_becomes_malformed_literal() {
        let tokens = lex("av x - \n");
        assert_eq!(tokens[2].kind, TokenKind::Literal);
        assert_eq!(tokens[2].lexeme, "-");
    }

    #[test]
    fn second_decimal_point_ends_the_literal() {
        let tokens = lex("1.2.3\n");
        assert_eq!(tokens[0].lexeme, "1.2");
        assert_eq!(tokens[1].lexeme, "3");
    }

    #[test]
    fn scans_strings_without_escapes() {
        let tokens = lex("p \"hi there\"\n");
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].lexeme, "hi there");
    }

    #[test]
    fn unclosed_string_absorbs_to_end_of_input() {
        let tokens = lex("p \"runs off");
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].lexeme, "runs off");
        assert_eq!(tokens.last().map(|t| t.kind.clone()), Some(TokenKind::EndOfLine));
    }

    #[test]
    fn appends_end_of_line_without_trailing_newline() {
        let tokens = lex("nop");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::EndOfLine);
    }

    #[test]
    fn empty_source_yields_no_tokens() {
        assert!(lex("").is_empty());
    }

    #[test]
    fn tracks_line_numbers() {
        let tokens = lex("nop\nnop\nnop\n");
        let lines: Vec<u32> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn skips_unrecognized_characters() {
        let tokens = lex("  \t nop \r !@#\n");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Instruction(Mnemonic::Nop));
    }

    #[test]
    fn underscore_starts_an_identifier_but_does_not_continue_one() {
        let tokens = lex("_tag a_b\n");
        assert_eq!(tokens[0].lexeme, "_tag");
        assert_eq!(tokens[1].lexeme, "a");
        assert_eq!(tokens[2].lexeme, "_b");
    }

    #[test]
    fn commas_are_emitted() {
        let tokens = lex("mvm 1, 2\n");
        assert_eq!(tokens[2].kind, TokenKind::Comma);
    }

    #[test]
    fn scanning_is_total_over_arbitrary_bytes() {
        let noise = "~`!@#$%^&*()+={}[]|\\:;'<>?/ \u{00e9}\n\"open";
        let tokens = Lexer::new(noise).tokenize().expect("never fails");
        assert_eq!(
            tokens.last().map(|t| t.kind.clone()),
            Some(TokenKind::EndOfLine)
        );
    }
}
