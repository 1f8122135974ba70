pub use tinybasic::{build, build_with, Error};
pub use tinybasic::compiler::CompileOptions;
pub use tinybasic::tac::{Address, ThreeAddressCode, ThreeAddressRecord, Writer};
pub use tinybasic::runtime::{Program, VM, VMState, Console, RuntimeError, RuntimeErrorKind};
pub use std::collections::VecDeque;

use std::io;

/// Console recording printed text and serving queued input lines.
pub struct BufferConsole {
    pub output: String,
    pub input: VecDeque<String>,
}

impl BufferConsole {
    #[allow(dead_code)]
    pub fn new(input: &[ &str ]) -> Self {
        BufferConsole {
            output: String::new(),
            input: input.iter().map(|line| line.to_string()).collect(),
        }
    }
}

impl Console for BufferConsole {
    fn print(self: &mut Self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }
    fn read_line(self: &mut Self) -> io::Result<Option<String>> {
        Ok(self.input.pop_front())
    }
}

/// Compiles given source, panicking with the located errors on failure.
#[allow(dead_code)]
pub fn compile(code: &str, options: CompileOptions) -> Program {
    match build_with(code, options) {
        Ok(program) => program,
        Err(error) => panic!("{}\nat {:?}", error, error.locs(code)),
    }
}

/// Runs a program, returning its output and result.
#[allow(dead_code)]
pub fn execute(program: &Program, input: &[ &str ]) -> (String, Result<i64, RuntimeError>) {
    let mut console = BufferConsole::new(input);
    let mut vm = VM::new(program);
    let result = vm.run(&mut console);
    (console.output, result)
}

/// Compiles and runs given source with all bindings global. Returns output and exit code.
#[allow(dead_code)]
pub fn run(code: &str) -> (String, i64) {
    run_with_input(code, &[])
}

/// Compiles and runs given source, feeding the given lines to INPUT statements.
#[allow(dead_code)]
pub fn run_with_input(code: &str, input: &[ &str ]) -> (String, i64) {
    let program = compile(code, CompileOptions::default());
    let (output, result) = execute(&program, input);
    match result {
        Ok(exit_code) => (output, exit_code),
        Err(error) => panic!("{}\noutput so far: {:?}", error, output),
    }
}

/// Compiles and runs given source with frame local bindings.
#[allow(dead_code)]
pub fn run_local(code: &str) -> (String, i64) {
    let program = compile(code, CompileOptions { all_global: false });
    let (output, result) = execute(&program, &[]);
    match result {
        Ok(exit_code) => (output, exit_code),
        Err(error) => panic!("{}\noutput so far: {:?}", error, output),
    }
}

/// Compiles and runs given source, expecting a runtime error. Returns output and error kind.
#[allow(dead_code)]
pub fn run_error(code: &str) -> (String, RuntimeErrorKind) {
    let program = compile(code, CompileOptions::default());
    let (output, result) = execute(&program, &[]);
    match result {
        Ok(exit_code) => panic!("Expected runtime error, program exited with {}", exit_code),
        Err(error) => (output, error.kind().clone()),
    }
}

/// Finalizes and encodes hand written three-address code.
#[allow(dead_code)]
pub fn encode(mut tac: ThreeAddressCode, options: CompileOptions) -> Program {
    if !tac.is_finalized() {
        tac.finalize();
    }
    let mut writer = Writer::new(options);
    writer.write_code(&tac).unwrap();
    writer.into_program()
}

/// Encodes and runs hand written three-address code.
#[allow(dead_code)]
pub fn run_ir(tac: ThreeAddressCode, options: CompileOptions) -> (String, Result<i64, RuntimeError>) {
    let program = encode(tac, options);
    execute(&program, &[])
}

/// Builds source text from lines, one per line.
#[allow(dead_code)]
pub fn lines(lines: &[ &str ]) -> String {
    lines.join("\n")
}
