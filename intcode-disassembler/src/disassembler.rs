//! Main disassembler logic

use intcode_spec::{Address, Program};

use crate::decoder::decode_at;

/// Disassemble a program into assembly text
///
/// Linear sweep from address 0. Words that do not decode to a complete
/// instruction are listed as `data` and the sweep resumes at the next word.
pub fn disassemble(program: &Program) -> String {
    let words = program.words();
    let mut output = String::new();

    output.push_str("; Intcode Disassembly\n");
    output.push_str(&format!("; Words: {}\n", words.len()));
    output.push_str(&format!("; SHA-256: {}\n", hex(&program.hash())));
    output.push('\n');

    let mut addr: Address = 0;
    while (addr as usize) < words.len() {
        match decode_at(words, addr) {
            Ok(decoded) => {
                let raw = decoded
                    .words
                    .iter()
                    .map(|w| w.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                output.push_str(&format!("{:04}:  {:<28}  {}\n", addr, raw, decoded));
                addr = decoded.next_address();
            }
            Err(_) => {
                let word = words[addr as usize];
                output.push_str(&format!("{:04}:  {:<28}  data {}\n", addr, word, word));
                addr += 1;
            }
        }
    }

    output
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
