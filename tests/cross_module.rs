//! Cross-module interaction tests
//!
//! Tests the integration between the program format, disassembler, and runtime.

use std::path::PathBuf;

use intcode_disassembler::{decode_at, disassemble, DisassemblerError};
use intcode_runtime::{run, Machine, RuntimeError};
use intcode_spec::{Instruction, Mode, Opcode, Program, SpecError};

const QUINE: &str = "109,1,204,-1,1001,100,1,100,1008,100,16,101,1006,101,0,99";

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("intcode-{}-{}", std::process::id(), name))
}

// ============================================================================
// Image -> Runtime Tests
// ============================================================================

#[test]
fn test_image_runs_like_text() {
    let program = Program::parse(QUINE).unwrap();
    let bytes = program.to_bytes().unwrap();
    assert!(Program::is_image(&bytes));

    let restored = Program::from_bytes(&bytes).unwrap();
    assert_eq!(run(&restored, []).unwrap(), run(&program, []).unwrap());
}

#[test]
fn test_saved_image_and_text_load_identically() {
    let program = Program::parse(QUINE).unwrap();

    let image = temp_path("quine.icx");
    let text = temp_path("quine.txt");
    program.save(&image).unwrap();
    std::fs::write(&text, format!("{program}\n")).unwrap();

    let from_image = Program::load(&image).unwrap();
    let from_text = Program::load(&text).unwrap();
    let _ = std::fs::remove_file(&image);
    let _ = std::fs::remove_file(&text);

    assert_eq!(from_image, program);
    assert_eq!(from_text, program);
}

#[test]
fn test_corrupted_image_is_rejected() {
    let mut bytes = Program::parse("104,7,99").unwrap().to_bytes().unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;

    let err = Program::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, SpecError::InvalidFormat(_)));
}

// ============================================================================
// Disassembler <-> Runtime Tests
// ============================================================================

#[test]
fn test_instruction_widths_agree() {
    // Walking the listing visits the same addresses the machine executes
    let program = Program::parse("1101,2,3,9,1002,9,4,9,99,0").unwrap();
    let mut addresses = vec![];
    let mut addr = 0;
    loop {
        let decoded = decode_at(program.words(), addr).unwrap();
        addresses.push(addr);
        if decoded.instruction.opcode() == Opcode::Halt {
            break;
        }
        addr = decoded.next_address();
    }
    assert_eq!(addresses, vec![0, 4, 8]);

    let mut machine = Machine::new(&program);
    let mut executed = vec![];
    while machine.state().is_running() {
        executed.push(machine.pc());
        machine.step().unwrap();
    }
    assert_eq!(executed, addresses);
    assert_eq!(machine.peek(9), 20);
}

#[test]
fn test_decode_errors_agree() {
    for word in [42, 301, 11101] {
        let words = [word, 0, 0, 0];
        let listing_err = decode_at(&words, 0).unwrap_err();
        let runtime_err = Machine::from_words(&words).execute().unwrap_err();

        match listing_err {
            DisassemblerError::InvalidInstruction { source, .. } => {
                assert_eq!(RuntimeError::decode(0, source), runtime_err);
            }
            other => panic!("unexpected disassembler error: {other}"),
        }
    }
}

#[test]
fn test_encoded_instruction_executes() {
    let add = Instruction::new(Opcode::Add)
        .with_mode(1, Mode::Immediate)
        .with_mode(2, Mode::Relative);
    let words = vec![add.encode(), 40, 2, 6, 99, 0, 0];

    let mut machine = Machine::from_words(&words);
    machine.execute().unwrap();
    // rb = 0, so [rb+2] is the literal 2 stored at address 2
    assert_eq!(machine.peek(6), 42);
    assert!(disassemble(&Program::from_words(words)).contains("add 40, [rb+2], [6]"));
}
