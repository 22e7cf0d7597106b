//! Program text parsing and instruction decoding over real programs

use intcode_spec::{Instruction, Mode, Opcode, Program, SpecError};
use proptest::prelude::*;

const QUINE: &str = "109,1,204,-1,1001,100,1,100,1008,100,16,101,1006,101,0,99";

#[test]
fn test_quine_text() {
    let program = Program::parse(QUINE).unwrap();
    assert_eq!(program.len(), 16);
    assert_eq!(program.to_string(), QUINE);
}

#[test]
fn test_multiline_program() {
    let source = "3,26,1001,26,-4,26,\n3,27,1002,27,2,27,\r\n1,27,26,27,4,27,1001,28,-1,28,1005,28,6,99,0,0,5\n";
    let program = Program::parse(source).unwrap();
    assert_eq!(program.len(), 29);
    assert_eq!(program.words()[28], 5);
}

#[test]
fn test_decode_linear_sweep() {
    // 1002,4,3,4,33: mul [4], 3, [4] then data
    let program = Program::parse("1002,4,3,4,33").unwrap();
    let instr = Instruction::decode(program.words()[0]).unwrap();
    assert_eq!(instr.opcode(), Opcode::Mul);
    assert_eq!(instr.modes(), &[Mode::Position, Mode::Immediate, Mode::Position]);
    assert_eq!(instr.width(), 4);
    assert!(Instruction::decode(program.words()[4]).is_err());
}

#[test]
fn test_negative_numbers_and_plus_sign() {
    let program = Program::parse("1101,100,-1,4,+0").unwrap();
    assert_eq!(program.words(), &[1101, 100, -1, 4, 0]);
}

#[test]
fn test_decode_error_kinds() {
    let err = Instruction::decode(12345).unwrap_err();
    assert!(err.is_decode_error());
    assert!(matches!(err, SpecError::InvalidOpcode { opcode: 45, .. }));
}

fn arb_words() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(any::<i64>(), 1..64)
}

proptest! {
    #[test]
    fn test_display_parses_back(words in arb_words()) {
        let program = Program::from_words(words.clone());
        let reparsed = Program::parse(&program.to_string()).unwrap();
        prop_assert_eq!(reparsed.words(), &words[..]);
    }

    #[test]
    fn test_whitespace_is_insignificant(words in arb_words(), pad in "[ \t\n]{0,3}") {
        let source = words
            .iter()
            .map(|w| format!("{pad}{w}{pad}"))
            .collect::<Vec<_>>()
            .join(",");
        let program = Program::parse(&source).unwrap();
        prop_assert_eq!(program.words(), &words[..]);
    }

    #[test]
    fn test_parse_never_panics(source in "[0-9, \n+-]{0,40}") {
        let _ = Program::parse(&source);
    }
}
