//! Assembly parser
//!
//! Turns token lines into [`Statement`]s. One statement per line; blank and
//! comment-only lines produce nothing.

use crate::error::{AssemblerError, Result};
use crate::lexer::Token;
use logos::Logos;
use nibbler_spec::opcode::OPCODE_MASK;
use nibbler_spec::{Nibble, Opcode, Region, WINDOW_SIZE};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    /// One code cell
    Instruction(Opcode),
    /// `.code` / `.data`
    Section(Region),
    /// `.org <offset>` within the current section's window
    Org(u16),
    /// `.nibble <n>, ...`
    Nibbles(Vec<Nibble>),
}

/// A statement with its 1-based source line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub statement: Statement,
}

/// Token with its column on the line (1-based)
pub type Spanned = (Token, usize);

/// Parse a whole source file
pub fn parse(source: &str) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    let mut current: Vec<Spanned> = Vec::new();
    let mut number = 1;
    let mut line_start = 0;

    let mut lexer = Token::lexer(source).spanned();
    loop {
        let next = lexer.next();
        let at_end = match &next {
            None | Some((Ok(Token::Newline), _)) => true,
            _ => false,
        };

        if at_end {
            if let Some(statement) = parse_statement(&current, number)? {
                lines.push(Line { number, statement });
            }
            current.clear();
            match next {
                Some((_, span)) => {
                    number += 1;
                    line_start = span.end;
                }
                None => break,
            }
            continue;
        }

        if let Some((token, span)) = next {
            let column = span.start - line_start + 1;
            match token {
                Ok(token) => current.push((token, column)),
                Err(()) => {
                    return Err(AssemblerError::SyntaxError {
                        line: number,
                        column,
                        message: format!("Unexpected character(s): {:?}", &source[span]),
                    })
                }
            }
        }
    }

    Ok(lines)
}

/// Parse one line's tokens
pub fn parse_statement(tokens: &[Spanned], line: usize) -> Result<Option<Statement>> {
    let Some(((head, column), rest)) = tokens.split_first() else {
        return Ok(None);
    };

    let statement = match head {
        Token::Identifier(mnemonic) => parse_mnemonic(mnemonic, rest, line, *column)?,
        Token::Directive(name) => parse_directive(name, rest, line, *column)?,
        other => {
            return Err(AssemblerError::SyntaxError {
                line,
                column: *column,
                message: format!("Expected instruction or directive, found {:?}", other),
            })
        }
    };
    Ok(Some(statement))
}

fn parse_mnemonic(mnemonic: &str, operands: &[Spanned], line: usize, column: usize) -> Result<Statement> {
    let opcode = match mnemonic {
        "nop" => {
            expect_no_operands(operands, line)?;
            Opcode::Nop
        }
        "stop" => {
            expect_no_operands(operands, line)?;
            Opcode::Stop
        }
        "op" => {
            let bits = parse_single_value(operands, line, column, OPCODE_MASK as u64)?;
            Opcode::from_bits(bits as u8)
        }
        _ => {
            return Err(AssemblerError::UnknownInstruction {
                line,
                mnemonic: mnemonic.to_string(),
            })
        }
    };
    Ok(Statement::Instruction(opcode))
}

fn parse_directive(name: &str, operands: &[Spanned], line: usize, column: usize) -> Result<Statement> {
    match name {
        "code" => {
            expect_no_operands(operands, line)?;
            Ok(Statement::Section(Region::Code))
        }
        "data" => {
            expect_no_operands(operands, line)?;
            Ok(Statement::Section(Region::Data))
        }
        "org" => {
            let offset = parse_single_value(operands, line, column, WINDOW_SIZE as u64 - 1)?;
            Ok(Statement::Org(offset as u16))
        }
        "nibble" => {
            let values = parse_value_list(operands, line, column)?;
            let cells = values
                .into_iter()
                .map(|v| check_range(v, Nibble::MAX.value() as u64, line).map(|v| Nibble::truncate(v as u8)))
                .collect::<Result<Vec<_>>>()?;
            Ok(Statement::Nibbles(cells))
        }
        _ => Err(AssemblerError::InvalidDirective {
            line,
            name: name.to_string(),
        }),
    }
}

fn expect_no_operands(operands: &[Spanned], line: usize) -> Result<()> {
    match operands.first() {
        None => Ok(()),
        Some((token, column)) => Err(AssemblerError::SyntaxError {
            line,
            column: *column,
            message: format!("Unexpected operand {:?}", token),
        }),
    }
}

fn check_range(value: u64, max: u64, line: usize) -> Result<u64> {
    if value > max {
        return Err(AssemblerError::ValueOutOfRange { line, value, max });
    }
    Ok(value)
}

fn parse_single_value(operands: &[Spanned], line: usize, column: usize, max: u64) -> Result<u64> {
    match operands {
        [(token, token_column)] => {
            let value = token.value().ok_or_else(|| AssemblerError::SyntaxError {
                line,
                column: *token_column,
                message: format!("Expected a number, found {:?}", token),
            })?;
            check_range(value, max, line)
        }
        [] => Err(AssemblerError::SyntaxError {
            line,
            column,
            message: "Expected a number operand".to_string(),
        }),
        [_, (_, extra), ..] => Err(AssemblerError::SyntaxError {
            line,
            column: *extra,
            message: "Expected exactly one operand".to_string(),
        }),
    }
}

/// `n (, n)*`
fn parse_value_list(operands: &[Spanned], line: usize, column: usize) -> Result<Vec<u64>> {
    if operands.is_empty() {
        return Err(AssemblerError::SyntaxError {
            line,
            column,
            message: "Expected at least one value".to_string(),
        });
    }

    let mut values = Vec::new();
    for (i, (token, token_column)) in operands.iter().enumerate() {
        let expect_value = i % 2 == 0;
        match (expect_value, token) {
            (true, token) if token.value().is_some() => values.extend(token.value()),
            (false, Token::Comma) => {}
            _ => {
                return Err(AssemblerError::SyntaxError {
                    line,
                    column: *token_column,
                    message: format!(
                        "Expected {}, found {:?}",
                        if expect_value { "a number" } else { "','" },
                        token
                    ),
                })
            }
        }
    }

    if operands.len() % 2 == 0 {
        return Err(AssemblerError::SyntaxError {
            line,
            column: operands[operands.len() - 1].1,
            message: "Trailing ','".to_string(),
        });
    }
    Ok(values)
}
