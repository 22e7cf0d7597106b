//! Instruction formatting to assembly text

use intcode_spec::{Instruction, Mode, Word};

/// Format instruction with its raw parameter words as assembly text
///
/// Missing parameter words are shown as `?`.
pub fn format(instr: &Instruction, params: &[Word]) -> String {
    let mut text = instr.opcode().mnemonic().to_string();

    for (i, mode) in instr.modes().iter().enumerate() {
        text.push_str(if i == 0 { " " } else { ", " });
        match params.get(i) {
            Some(&raw) => text.push_str(&format_operand(*mode, raw)),
            None => text.push('?'),
        }
    }

    text
}

/// Format a single operand
///
/// - position: `[n]`
/// - immediate: `n`
/// - relative: `[rb+n]` / `[rb-n]`
pub fn format_operand(mode: Mode, raw: Word) -> String {
    match mode {
        Mode::Position => format!("[{}]", raw),
        Mode::Immediate => raw.to_string(),
        Mode::Relative if raw < 0 => format!("[rb-{}]", raw.unsigned_abs()),
        Mode::Relative => format!("[rb+{}]", raw),
    }
}
