//! Assembly text parser
//!
//! Reads the dialect produced by [`crate::emit`] back into [`AsmInst`]s:
//! `;` comments, `name:` labels (optionally followed by an instruction on the
//! same line), `.word` / `.import` directives and the mnemonics of the
//! instruction subset.

use crate::asm::{AsmInst, Reg, WordValue};
use crate::error::AsmError;

pub struct Parser {
    keep_comments: bool,
}

impl Parser {
    pub fn new(keep_comments: bool) -> Self {
        Self { keep_comments }
    }

    pub fn parse_source(&self, source: &str) -> Result<Vec<AsmInst>, AsmError> {
        let mut parsed = Vec::new();
        for (index, line) in source.lines().enumerate() {
            self.parse_line(line, index + 1, &mut parsed)?;
        }
        Ok(parsed)
    }

    fn parse_line(&self, line: &str, line_number: usize, out: &mut Vec<AsmInst>) -> Result<(), AsmError> {
        let (code, comment) = match line.find(';') {
            Some(pos) => (&line[..pos], Some(line[pos + 1..].trim())),
            None => (line, None),
        };

        let mut rest = code.trim();
        while let Some(colon) = rest.find(':') {
            let label = rest[..colon].trim();
            if !is_identifier(label) {
                return Err(AsmError::parse(line_number, format!("invalid label '{label}'")));
            }
            out.push(AsmInst::Label(label.to_string()));
            rest = rest[colon + 1..].trim();
        }

        if !rest.is_empty() {
            out.push(parse_instruction(rest, line_number)?);
        }

        if let Some(text) = comment {
            if self.keep_comments {
                out.push(AsmInst::Comment(text.to_string()));
            }
        }
        Ok(())
    }
}

/// Parse a whole program, dropping comments
pub fn parse_program(source: &str) -> Result<Vec<AsmInst>, AsmError> {
    Parser::new(false).parse_source(source)
}

fn parse_instruction(text: &str, line: usize) -> Result<AsmInst, AsmError> {
    let (mnemonic, operand_text) = match text.split_once(char::is_whitespace) {
        Some((mnemonic, rest)) => (mnemonic, rest.trim()),
        None => (text, ""),
    };
    let operands: Vec<&str> = if operand_text.is_empty() {
        Vec::new()
    } else {
        operand_text.split(',').map(str::trim).collect()
    };

    let expect = |count: usize| -> Result<(), AsmError> {
        if operands.len() == count {
            Ok(())
        } else {
            Err(AsmError::parse(
                line,
                format!("'{mnemonic}' takes {count} operand(s), found {}", operands.len()),
            ))
        }
    };
    let reg = |index: usize| parse_register(operands[index], line);

    let inst = match mnemonic {
        "add" | "sub" | "slt" | "sltu" => {
            expect(3)?;
            let (rd, rs, rt) = (reg(0)?, reg(1)?, reg(2)?);
            match mnemonic {
                "add" => AsmInst::Add(rd, rs, rt),
                "sub" => AsmInst::Sub(rd, rs, rt),
                "slt" => AsmInst::Slt(rd, rs, rt),
                _ => AsmInst::Sltu(rd, rs, rt),
            }
        }
        "mult" | "div" => {
            expect(2)?;
            let (rs, rt) = (reg(0)?, reg(1)?);
            if mnemonic == "mult" {
                AsmInst::Mult(rs, rt)
            } else {
                AsmInst::Div(rs, rt)
            }
        }
        "mfhi" | "mflo" | "lis" | "jr" | "jalr" => {
            expect(1)?;
            let r = reg(0)?;
            match mnemonic {
                "mfhi" => AsmInst::Mfhi(r),
                "mflo" => AsmInst::Mflo(r),
                "lis" => AsmInst::Lis(r),
                "jr" => AsmInst::Jr(r),
                _ => AsmInst::Jalr(r),
            }
        }
        "lw" | "sw" => {
            expect(2)?;
            let rt = reg(0)?;
            let (offset, rs) = parse_memory_operand(operands[1], line)?;
            if mnemonic == "lw" {
                AsmInst::Lw(rt, offset, rs)
            } else {
                AsmInst::Sw(rt, offset, rs)
            }
        }
        "beq" | "bne" => {
            expect(3)?;
            let (rs, rt) = (reg(0)?, reg(1)?);
            let label = operands[2];
            if !is_identifier(label) {
                return Err(AsmError::parse(line, format!("invalid branch target '{label}'")));
            }
            if mnemonic == "beq" {
                AsmInst::Beq(rs, rt, label.to_string())
            } else {
                AsmInst::Bne(rs, rt, label.to_string())
            }
        }
        ".word" => {
            expect(1)?;
            AsmInst::Word(parse_word(operands[0], line)?)
        }
        ".import" => {
            expect(1)?;
            if !is_identifier(operands[0]) {
                return Err(AsmError::parse(line, format!("invalid import '{}'", operands[0])));
            }
            AsmInst::Import(operands[0].to_string())
        }
        other => return Err(AsmError::parse(line, format!("unknown mnemonic '{other}'"))),
    };
    Ok(inst)
}

fn parse_register(text: &str, line: usize) -> Result<Reg, AsmError> {
    text.strip_prefix('$')
        .and_then(|digits| digits.parse::<usize>().ok())
        .and_then(Reg::from_index)
        .ok_or_else(|| AsmError::parse(line, format!("invalid register '{text}'")))
}

/// `offset($reg)`
fn parse_memory_operand(text: &str, line: usize) -> Result<(i16, Reg), AsmError> {
    let invalid = || AsmError::parse(line, format!("invalid memory operand '{text}'"));
    let (offset, rest) = text.split_once('(').ok_or_else(invalid)?;
    let reg_text = rest.strip_suffix(')').ok_or_else(invalid)?;
    let offset = offset.trim().parse::<i16>().map_err(|_| invalid())?;
    Ok((offset, parse_register(reg_text.trim(), line)?))
}

fn parse_word(text: &str, line: usize) -> Result<WordValue, AsmError> {
    if let Some(hex) = text.strip_prefix("0x") {
        return u32::from_str_radix(hex, 16)
            .map(WordValue::Hex)
            .map_err(|_| AsmError::parse(line, format!("invalid hex word '{text}'")));
    }
    if text.starts_with(|c: char| c == '-' || c.is_ascii_digit()) {
        return match text.parse::<i64>() {
            Ok(value) if (i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(&value) => Ok(WordValue::Int(value)),
            _ => Err(AsmError::parse(line, format!("word out of range '{text}'"))),
        };
    }
    if is_identifier(text) {
        return Ok(WordValue::Label(text.to_string()));
    }
    Err(AsmError::parse(line, format!("invalid word '{text}'")))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::emit_instructions;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_simple_instruction() {
        let parsed = parse_program("add $3, $5, $3").unwrap();
        assert_eq!(parsed, vec![AsmInst::Add(Reg::R3, Reg::R5, Reg::R3)]);
    }

    #[test]
    fn test_parse_label_and_instruction_on_one_line() {
        let parsed = parse_program("loop: beq $0, $0, loop ; spin").unwrap();
        assert_eq!(
            parsed,
            vec![
                AsmInst::Label("loop".to_string()),
                AsmInst::Beq(Reg::R0, Reg::R0, "loop".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments_kept_on_request() {
        let parsed = Parser::new(true).parse_source("; prologue\njr $31").unwrap();
        assert_eq!(
            parsed,
            vec![AsmInst::Comment("prologue".to_string()), AsmInst::Jr(Reg::R31)]
        );
    }

    #[test]
    fn test_parse_memory_and_words() {
        let parsed = parse_program("lw $3, -12($29)\n.word 0xffff000c\n.word -5\n.word Pf\n.import print").unwrap();
        assert_eq!(
            parsed,
            vec![
                AsmInst::Lw(Reg::R3, -12, Reg::R29),
                AsmInst::Word(WordValue::Hex(0xffff000c)),
                AsmInst::Word(WordValue::Int(-5)),
                AsmInst::Word(WordValue::label("Pf")),
                AsmInst::Import("print".to_string()),
            ]
        );
    }

    #[test]
    fn test_emitted_text_reads_back() {
        let program = vec![
            AsmInst::Import("print".to_string()),
            AsmInst::Label("Pwain".to_string()),
            AsmInst::Lis(Reg::R4),
            AsmInst::Word(WordValue::Int(4)),
            AsmInst::Sw(Reg::R1, -4, Reg::R30),
            AsmInst::Sub(Reg::R30, Reg::R30, Reg::R4),
            AsmInst::Div(Reg::R5, Reg::R3),
            AsmInst::Mfhi(Reg::R3),
            AsmInst::Sltu(Reg::R6, Reg::R5, Reg::R3),
            AsmInst::Bne(Reg::R6, Reg::R0, "Pwain".to_string()),
            AsmInst::Jr(Reg::R31),
        ];
        let text = emit_instructions(&program).unwrap();
        assert_eq!(parse_program(&text).unwrap(), program);
    }

    #[test]
    fn test_errors_name_the_line() {
        assert_eq!(
            parse_program("jr $31\nfoo $1").unwrap_err(),
            AsmError::parse(2, "unknown mnemonic 'foo'")
        );
        assert!(matches!(parse_program("add $3, $32, $1"), Err(AsmError::Parse { line: 1, .. })));
        assert!(matches!(parse_program("lw $3, 40000($29)"), Err(AsmError::Parse { .. })));
        assert!(matches!(parse_program("mult $3"), Err(AsmError::Parse { .. })));
    }
}
