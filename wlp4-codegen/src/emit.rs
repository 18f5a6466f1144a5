//! Assembly text emission
//!
//! Checks the few properties a downstream assembler would reject (label
//! definitions and references, `lis` pairing) and renders one line per
//! instruction.

use crate::asm::AsmInst;
use crate::error::AsmError;
use log::debug;
use std::collections::HashSet;

/// Check label and `lis` consistency of a whole program
pub fn validate(instructions: &[AsmInst]) -> Result<(), AsmError> {
    let mut defined = HashSet::new();
    for inst in instructions {
        match inst {
            AsmInst::Label(name) | AsmInst::Import(name) => {
                if !defined.insert(name.as_str()) {
                    return Err(AsmError::DuplicateLabel(name.clone()));
                }
            }
            _ => {}
        }
    }

    for (index, inst) in instructions.iter().enumerate() {
        if let Some(label) = inst.label_reference() {
            if !defined.contains(label) {
                return Err(AsmError::UndefinedLabel(label.to_string()));
            }
        }
        if let AsmInst::Lis(_) = inst {
            let next = instructions[index + 1..]
                .iter()
                .find(|next| !matches!(next, AsmInst::Comment(_)));
            if !matches!(next, Some(AsmInst::Word(_))) {
                return Err(AsmError::DanglingLis(index));
            }
        }
    }
    Ok(())
}

/// Render validated instructions as assembly text
pub fn emit_instructions(instructions: &[AsmInst]) -> Result<String, AsmError> {
    validate(instructions)?;

    let mut output = String::new();
    for inst in instructions {
        if inst.is_code() {
            output.push_str("    ");
        }
        output.push_str(&inst.to_string());
        output.push('\n');
    }

    debug!(
        "Emitted {} lines, {} code words",
        instructions.len(),
        instructions.iter().filter(|inst| inst.is_code()).count()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::{Reg, WordValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emit_indents_code_only() {
        let program = vec![
            AsmInst::Import("print".to_string()),
            AsmInst::Label("Pwain".to_string()),
            AsmInst::Comment("return".to_string()),
            AsmInst::Lis(Reg::R3),
            AsmInst::Word(WordValue::Int(42)),
            AsmInst::Jr(Reg::R31),
        ];
        assert_eq!(
            emit_instructions(&program).unwrap(),
            ".import print\nPwain:\n; return\n    lis $3\n    .word 42\n    jr $31\n"
        );
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let program = vec![
            AsmInst::Label("while1".to_string()),
            AsmInst::Label("while1".to_string()),
        ];
        assert_eq!(validate(&program), Err(AsmError::DuplicateLabel("while1".to_string())));
    }

    #[test]
    fn test_undefined_branch_target_rejected() {
        let program = vec![AsmInst::Beq(Reg::R0, Reg::R0, "endwhile3".to_string())];
        assert_eq!(validate(&program), Err(AsmError::UndefinedLabel("endwhile3".to_string())));
    }

    #[test]
    fn test_imported_label_is_defined() {
        let program = vec![
            AsmInst::Import("new".to_string()),
            AsmInst::Lis(Reg::R5),
            AsmInst::Word(WordValue::label("new")),
            AsmInst::Jalr(Reg::R5),
        ];
        assert!(validate(&program).is_ok());
    }

    #[test]
    fn test_lis_must_be_followed_by_word() {
        let program = vec![AsmInst::Lis(Reg::R3), AsmInst::Jr(Reg::R31)];
        assert_eq!(validate(&program), Err(AsmError::DanglingLis(0)));
    }
}
