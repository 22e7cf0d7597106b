//! Integration tests for the Intcode runtime

use intcode_runtime::{run, Machine, MachineConfig, OutputRecorder, RuntimeError, ScriptedInput};
use intcode_spec::{Program, Word};

const QUINE: &str = "109,1,204,-1,1001,100,1,100,1008,100,16,101,1006,101,0,99";

const COMPARE_TO_EIGHT: &str = "3,21,1008,21,8,20,1005,20,22,107,8,21,20,1006,20,31,\
    1106,0,36,98,0,0,1002,21,125,20,4,20,1105,1,46,104,\
    999,1105,1,46,1101,1000,1,20,4,20,1105,1,46,98,99";

fn memory_after(source: &str) -> Vec<Word> {
    let mut machine = Machine::parse(source).unwrap();
    machine.execute().unwrap();
    machine.memory().to_vec()
}

fn outputs(source: &str, inputs: &[Word]) -> Vec<Word> {
    run(&Program::parse(source).unwrap(), inputs.iter().copied()).unwrap()
}

// ============================================================================
// Arithmetic programs
// ============================================================================

#[test]
fn test_add_mul_memory_images() {
    let cases: [(&str, &[Word]); 5] = [
        ("1,0,0,0,99", &[2, 0, 0, 0, 99]),
        ("2,3,0,3,99", &[2, 3, 0, 6, 99]),
        ("2,4,4,5,99,0", &[2, 4, 4, 5, 99, 9801]),
        ("1,1,1,4,99,5,6,0,99", &[30, 1, 1, 4, 2, 5, 6, 0, 99]),
        (
            "1,9,10,3,2,3,11,0,99,30,40,50",
            &[3500, 9, 10, 70, 2, 3, 11, 0, 99, 30, 40, 50],
        ),
    ];

    for (source, expected) in cases {
        assert_eq!(memory_after(source), expected, "program {source}");
    }
}

#[test]
fn test_noun_verb_poke() {
    // Patch addresses 1 and 2 before running
    let base = Machine::parse("1,0,0,0,99,30,40").unwrap();

    let mut machine = base.clone();
    machine.poke(1, 5);
    machine.poke(2, 6);
    machine.execute().unwrap();
    assert_eq!(machine.peek(0), 70);

    // The base image is untouched
    assert_eq!(base.peek(1), 0);
    assert_eq!(base.peek(0), 1);
}

// ============================================================================
// Compare and jump programs
// ============================================================================

#[test]
fn test_compare_to_eight() {
    for (input, expected) in [(-3, 999), (7, 999), (8, 1000), (9, 1001), (1_000, 1001)] {
        assert_eq!(outputs(COMPARE_TO_EIGHT, &[input]), vec![expected]);
    }
}

#[test]
fn test_equals_and_less_than_all_modes() {
    let cases: [(&str, Word, Word); 8] = [
        ("3,9,8,9,10,9,4,9,99,-1,8", 8, 1),
        ("3,9,8,9,10,9,4,9,99,-1,8", 5, 0),
        ("3,9,7,9,10,9,4,9,99,-1,8", 5, 1),
        ("3,9,7,9,10,9,4,9,99,-1,8", 8, 0),
        ("3,3,1108,-1,8,3,4,3,99", 8, 1),
        ("3,3,1108,-1,8,3,4,3,99", 9, 0),
        ("3,3,1107,-1,8,3,4,3,99", 7, 1),
        ("3,3,1107,-1,8,3,4,3,99", 8, 0),
    ];

    for (source, input, expected) in cases {
        assert_eq!(outputs(source, &[input]), vec![expected], "{source} <- {input}");
    }
}

// ============================================================================
// Relative mode and large values
// ============================================================================

#[test]
fn test_quine() {
    let program = Program::parse(QUINE).unwrap();
    assert_eq!(run(&program, []).unwrap(), program.words());
}

#[test]
fn test_large_values() {
    assert_eq!(outputs("104,1125899906842624,99", &[]), vec![1_125_899_906_842_624]);

    let product = outputs("1102,34915192,34915192,7,4,7,99,0", &[]);
    assert_eq!(product, vec![34_915_192i64 * 34_915_192]);
    assert_eq!(product[0].to_string().len(), 16);
}

#[test]
fn test_memory_grows_past_program() {
    // Write far beyond the image, then read it back
    let out = outputs("1101,5,6,1000,4,1000,99", &[]);
    assert_eq!(out, vec![11]);
}

#[test]
fn test_addressing_modes_agree() {
    // The same value fetched through each mode
    let position = outputs("4,5,99,0,0,77", &[]);
    let immediate = outputs("104,77,99", &[]);
    let relative = outputs("109,3,204,4,99,0,0,77", &[]);
    assert_eq!(position, vec![77]);
    assert_eq!(immediate, position);
    assert_eq!(relative, position);
}

#[test]
fn test_relative_base_accumulates() {
    // arb 20; arb -4; in [rb+1]; out [rb+1]
    let out = outputs("109,20,109,-4,203,1,204,1,99", &[55]);
    assert_eq!(out, vec![55]);
}

// ============================================================================
// Machine lifecycle
// ============================================================================

#[test]
fn test_clone_runs_identically() {
    let base = Machine::parse(COMPARE_TO_EIGHT).unwrap();

    let results: Vec<Vec<Word>> = (0..3)
        .map(|_| {
            let out = OutputRecorder::new();
            let mut machine = base.clone();
            machine.set_input(ScriptedInput::new([8]));
            machine.set_output(out.clone());
            machine.execute().unwrap();
            out.values()
        })
        .collect();

    assert!(results.iter().all(|r| r == &[1000]));
}

#[test]
fn test_rerunning_clone_of_halted_machine() {
    // Increment [7] and print it
    let first = OutputRecorder::new();
    let mut original = Machine::parse("1001,7,1,7,4,7,99,5")
        .unwrap()
        .with_output(first.clone());
    original.execute().unwrap();
    let snapshot = original.memory().clone();

    let second = OutputRecorder::new();
    let mut clone = original.clone().with_output(second.clone());
    clone.execute().unwrap();

    // The clone starts from the halted memory and owns its own copy
    assert_eq!(first.values(), vec![6]);
    assert_eq!(second.values(), vec![7]);
    assert_eq!(original.memory(), &snapshot);
    assert_eq!(original.peek(7), 6);
}

#[test]
fn test_rewired_ports() {
    let out = OutputRecorder::new();
    let mut machine = Machine::parse("3,0,4,0,99").unwrap();
    machine.set_input(ScriptedInput::new([1]));
    machine.reset_input();
    machine.set_output(out.clone());

    let err = machine.execute().unwrap_err();
    assert!(err.is_unwired());
    assert!(out.is_empty());
}

#[test]
fn test_trace_does_not_change_results() {
    let out = OutputRecorder::new();
    let mut machine = Machine::parse(QUINE)
        .unwrap()
        .with_config(MachineConfig::default().with_trace(true).with_label("quine"))
        .with_output(out.clone());
    machine.execute().unwrap();
    assert_eq!(out.len(), 16);
}

#[test]
fn test_fault_reports_pc() {
    let mut machine = Machine::parse("1101,1,1,5,99,0,13").unwrap();
    // [5] becomes 2, execution continues at 4 which halts
    machine.execute().unwrap();

    let mut machine = Machine::parse("1101,0,0,0,77").unwrap();
    let err = machine.execute().unwrap_err();
    assert_eq!(err, RuntimeError::InvalidOpcode { pc: 4, word: 77, opcode: 77 });
    assert_eq!(err.pc(), Some(4));
}
