use std::cmp::Ordering;
use tracing::{debug, trace};
use crate::config::{RECORD_SIZE, WORD_SIZE};
use crate::shared::{is_numeric, numeric::Numeric};
use crate::bytecode::{Program, Operand, opcodes::OpCode};
use crate::bytecode::runtime::{Value, Console};
use crate::bytecode::runtime::frame::CallFrame;
use crate::bytecode::runtime::heap::HeapManager;
use crate::bytecode::runtime::error::{RuntimeError, RuntimeErrorKind, RuntimeResult};

/// Current state of the vm, checked after each instruction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum VMState {
    /// The program is ready to run.
    Ready,
    /// The program has terminated with given exit code and must be reset before it can be run again.
    Terminated(i64),
    /// The program encountered a runtime error and must be reset before it can be run again.
    RuntimeError,
}

/// A virtual machine executing byte code programs.
///
/// Operands are resolved against three address spaces: negative addresses are frame relative,
/// addresses within the program refer to code or constants and addresses past the program refer to heap regions.
#[derive(Debug)]
pub struct VM {
    program     : Program,
    frames      : Vec<CallFrame>,
    heap        : HeapManager,
    all_global  : bool,
    state       : VMState,
    offset      : i64,
}

impl VM {
    /// Create a new VM instance running given program.
    pub fn new(program: &Program) -> Self {
        VM {
            program     : program.clone(),
            frames      : vec![ CallFrame::root() ],
            heap        : HeapManager::new(program.program_size()),
            all_global  : program.all_global(),
            state       : VMState::Ready,
            offset      : 0,
        }
    }

    /// Executes byte code until it terminates. Returns the exit code of the program.
    pub fn run<C: Console>(self: &mut Self, console: &mut C) -> RuntimeResult<i64> {
        if self.state != VMState::Ready {
            return Err(RuntimeError::new(self.offset, RuntimeErrorKind::NotReady));
        }
        debug!("running {} instructions, all global: {}", self.program.len(), self.all_global);
        loop {
            if let Some(exit_code) = self.exec_step(console)? {
                debug!("terminated with exit code {}, {} heap regions", exit_code, self.heap.len());
                return Ok(exit_code);
            }
        }
    }

    /// Executes a single instruction.
    #[cfg(feature="debugging")]
    pub fn step<C: Console>(self: &mut Self, console: &mut C) -> RuntimeResult<VMState> {
        if self.state != VMState::Ready {
            return Err(RuntimeError::new(self.offset, RuntimeErrorKind::NotReady));
        }
        self.exec_step(console)?;
        Ok(self.state)
    }

    /// Resets the VM, keeping only code and constants.
    pub fn reset(self: &mut Self) {
        self.frames = vec![ CallFrame::root() ];
        self.heap.reset();
        self.offset = 0;
        self.state = VMState::Ready;
    }

    /// Current VM state.
    pub fn state(self: &Self) -> VMState {
        self.state
    }

    /// Whether frames write through to the root frame.
    pub fn all_global(self: &Self) -> bool {
        self.all_global
    }

    /// The heap of the VM.
    pub fn heap(self: &Self) -> &HeapManager {
        &self.heap
    }

    /// Number of active call frames, including the root frame.
    pub fn frame_depth(self: &Self) -> usize {
        self.frames.len()
    }

    /// Reads a binding of the active frame by its frame relative byte offset, following the global binding rules.
    pub fn binding(self: &Self, offset: i64) -> Value {
        if self.all_global {
            for frame in self.frames.iter().rev() {
                if let Some(value) = frame.bindings.get(&offset) {
                    return value.clone();
                }
            }
            Value::Integer(0)
        } else {
            self.frame().bindings.get(&offset).cloned().unwrap_or(Value::Integer(0))
        }
    }

    fn frame(self: &Self) -> &CallFrame {
        &self.frames[self.frames.len() - 1]
    }

    fn frame_mut(self: &mut Self) -> &mut CallFrame {
        let top = self.frames.len() - 1;
        &mut self.frames[top]
    }

    fn error(self: &Self, kind: RuntimeErrorKind) -> RuntimeError {
        RuntimeError::new(self.offset, kind)
    }

    /// Executes one instruction and updates the VM state.
    fn exec_step<C: Console>(self: &mut Self, console: &mut C) -> RuntimeResult<Option<i64>> {
        let result = self.exec_instruction(console);
        match &result {
            Ok(Some(exit_code)) => self.state = VMState::Terminated(*exit_code),
            Ok(None) => { },
            Err(error) => {
                debug!("runtime error: {}", error);
                self.state = VMState::RuntimeError;
            },
        }
        result
    }

    fn exec_instruction<C: Console>(self: &mut Self, console: &mut C) -> RuntimeResult<Option<i64>> {
        let pc = self.frame().program_counter;
        self.offset = pc;
        let instruction = match self.program.decode(pc) {
            Some(instruction) => instruction,
            None => return Err(self.error(RuntimeErrorKind::ProgramCounterOutOfBounds)),
        };
        let opcode = match instruction.opcode() {
            Some(opcode) => opcode,
            None => return Err(self.error(RuntimeErrorKind::InvalidOpcode(instruction.code))),
        };
        let [ a1, a2, r ] = instruction.operands;
        self.frame_mut().program_counter = pc + RECORD_SIZE;
        trace!("{}:\t{}\t{}\t{}\t{}", pc, opcode.mnemonic(), a1, a2, r);

        match opcode {
            OpCode::Exit => {
                let exit_code = if a1 == Operand::Null { 0 } else { self.integer(a1)? };
                return Ok(Some(exit_code));
            },
            OpCode::Set => {
                let value = self.value(a1)?;
                self.write(r, value)?;
            },
            OpCode::Add => {
                let left = self.deref_value(a1)?;
                let right = self.deref_value(a2)?;
                let result = if left.is_string() || right.is_string() {
                    Value::String(format!("{}{}", left, right))
                } else {
                    self.arithmetic(&left, &right, |l, r| l + r)?
                };
                self.write(r, result)?;
            },
            OpCode::Sub => self.binary_arithmetic(a1, a2, r, |l, r| l - r)?,
            OpCode::Mul => self.binary_arithmetic(a1, a2, r, |l, r| l * r)?,
            OpCode::Div => {
                let left = self.deref_value(a1)?;
                let right = self.deref_value(a2)?;
                if self.numeric(&right)?.as_f64() == 0.0 {
                    return Err(self.error(RuntimeErrorKind::DivisionByZero));
                }
                let result = self.arithmetic(&left, &right, |l, r| l / r)?;
                self.write(r, result)?;
            },
            OpCode::Neg => {
                let value = self.deref_value(a1)?;
                let result = self.arithmetic(&Value::Integer(0), &value, |l, r| l - r)?;
                self.write(r, result)?;
            },
            OpCode::Eq => {
                let result = self.equals(a1, a2)?;
                self.write(r, Value::from_bool(result))?;
            },
            OpCode::Ne => {
                let result = self.equals(a1, a2)?;
                self.write(r, Value::from_bool(!result))?;
            },
            OpCode::Lt => self.comparison(a1, a2, r, |o| o == Ordering::Less)?,
            OpCode::Gt => self.comparison(a1, a2, r, |o| o == Ordering::Greater)?,
            OpCode::Le => self.comparison(a1, a2, r, |o| o != Ordering::Greater)?,
            OpCode::Ge => self.comparison(a1, a2, r, |o| o != Ordering::Less)?,
            OpCode::Not => {
                let value = self.truth(a1)?;
                self.write(r, Value::from_bool(!value))?;
            },
            OpCode::And => {
                let result = self.truth(a1)? && self.truth(a2)?;
                self.write(r, Value::from_bool(result))?;
            },
            OpCode::Or => {
                let left = self.truth(a1)?;
                let right = self.truth(a2)?;
                self.write(r, Value::from_bool(left || right))?;
            },
            OpCode::Xor => {
                let left = self.truth(a1)?;
                let right = self.truth(a2)?;
                self.write(r, Value::from_bool(left ^ right))?;
            },
            OpCode::Jump => {
                let target = self.integer(a1)?;
                self.frame_mut().program_counter = target;
            },
            OpCode::JumpIfTrue => {
                if self.truth(a2)? {
                    let target = self.integer(a1)?;
                    self.frame_mut().program_counter = target;
                }
            },
            OpCode::JumpIfFalse => {
                if !self.truth(a2)? {
                    let target = self.integer(a1)?;
                    self.frame_mut().program_counter = target;
                }
            },
            OpCode::CallParameter => {
                let value = self.value(a1)?;
                self.frame_mut().pending_parameters.push_back(value);
            },
            OpCode::FormalParameter => {
                let index = self.integer(a1)?;
                let value = usize::try_from(index).ok().and_then(|index| self.frame().formal_parameters.get(index).cloned());
                match value {
                    Some(value) => self.write(r, value)?,
                    None => return Err(self.error(RuntimeErrorKind::MissingParameters)),
                }
            },
            OpCode::Call => {
                let target = self.integer(a1)?;
                let count = self.integer(a2)?;
                let parameters = match usize::try_from(count) {
                    Ok(count) => self.frame_mut().consume_parameters(count),
                    Err(_) => None,
                };
                let parameters = match parameters {
                    Some(parameters) => parameters,
                    None => return Err(self.error(RuntimeErrorKind::MissingParameters)),
                };
                let return_target = if r == Operand::Null { None } else { Some(r) };
                self.frames.push(CallFrame::new(target, parameters, return_target));
                debug!("call {} with {} parameters, depth {}", target, count, self.frames.len());
            },
            OpCode::Return => {
                if self.frames.len() <= 1 {
                    return Err(self.error(RuntimeErrorKind::ReturnOutsideCall));
                }
                let return_target = self.frame().return_target;
                let value = match return_target {
                    Some(_) => Some(self.value(a1)?),
                    None => None,
                };
                self.frames.pop();
                debug!("return, depth {}", self.frames.len());
                if let (Some(target), Some(value)) = (return_target, value) {
                    self.write(target, value)?;
                }
            },
            OpCode::Read => {
                let line = match console.read_line() {
                    Ok(line) => line.unwrap_or_default(),
                    Err(error) => return Err(self.error(RuntimeErrorKind::Io(error.to_string()))),
                };
                let value = match Numeric::parse(&line) {
                    Some(number) if is_numeric(&line) => Value::from(number),
                    _ => Value::String(line),
                };
                self.write(r, value)?;
            },
            OpCode::Print => {
                let value = self.deref_value(a1)?;
                if let Err(error) = console.print(&value.to_string()) {
                    return Err(self.error(RuntimeErrorKind::Io(error.to_string())));
                }
            },
            OpCode::ArrayGet => {
                let region = self.array_region(a1)?;
                let index = self.array_index(a2)?;
                let value = self.heap.region(region).and_then(|region| region.get(index));
                match value {
                    Some(value) => self.write(r, value)?,
                    None => return Err(self.error(RuntimeErrorKind::IndexOutOfBounds)),
                }
            },
            OpCode::ArraySet => {
                let index = self.array_index(a1)?;
                let value = self.value(a2)?;
                let region = self.array_region(r)?;
                let written = match self.heap.region_mut(region) {
                    Some(region) => region.set(index, value),
                    None => return Err(self.error(RuntimeErrorKind::InvalidHeapAddress)),
                };
                if !written {
                    return Err(self.error(RuntimeErrorKind::IndexOutOfBounds));
                }
            },
        }
        Ok(None)
    }

    /// Resolves an operand to its value.
    fn value(self: &mut Self, operand: Operand) -> RuntimeResult<Value> {
        Ok(match operand {
            Operand::Null => Value::Address(0),
            Operand::Integer(value) => Value::Integer(value),
            Operand::Float(value) => Value::Float(value),
            Operand::Code(address) => Value::Address(address),
            Operand::Constant(address) => match self.program.c_string(address) {
                Some(text) => Value::String(text),
                None => return Err(self.error(RuntimeErrorKind::InvalidHeapAddress)),
            },
            Operand::Frame(offset) => self.binding(offset),
            Operand::Heap(address) => {
                if !self.heap.ensure(address) {
                    return Err(self.error(RuntimeErrorKind::InvalidHeapAddress));
                }
                match self.heap.region(address) {
                    Some(region) => region.value(),
                    None => return Err(self.error(RuntimeErrorKind::InvalidHeapAddress)),
                }
            },
        })
    }

    /// Resolves an operand to its value, replacing a heap address by the value of its region.
    fn deref_value(self: &mut Self, operand: Operand) -> RuntimeResult<Value> {
        let value = self.value(operand)?;
        Ok(match value {
            Value::Address(address) => match self.heap.region(address) {
                Some(region) => region.value(),
                None => value,
            },
            _ => value,
        })
    }

    /// Writes a value to the location referenced by the operand. Immediates and read-only address spaces are rejected.
    fn write(self: &mut Self, target: Operand, value: Value) -> RuntimeResult {
        if target.base().map_or(true, |base| base.is_read_only()) {
            return Err(self.error(RuntimeErrorKind::ReadOnlyWrite));
        }
        match target {
            Operand::Frame(offset) => {
                let value = match value {
                    Value::String(text) => {
                        let address = self.heap.new_region();
                        if let Some(region) = self.heap.region_mut(address) {
                            region.set(0, Value::String(text));
                        }
                        Value::Address(address)
                    },
                    value => value,
                };
                let frame = if self.all_global { &mut self.frames[0] } else { self.frame_mut() };
                frame.bindings.insert(offset, value);
                Ok(())
            },
            Operand::Heap(address) => {
                if !self.heap.ensure(address) {
                    return Err(self.error(RuntimeErrorKind::InvalidHeapAddress));
                }
                match self.heap.region_mut(address) {
                    Some(region) => {
                        region.set(0, value);
                        Ok(())
                    },
                    None => Err(self.error(RuntimeErrorKind::InvalidHeapAddress)),
                }
            },
            _ => Err(self.error(RuntimeErrorKind::ReadOnlyWrite)),
        }
    }

    /// Returns the heap region referenced by an array variable, allocating it on first use.
    fn array_region(self: &mut Self, base: Operand) -> RuntimeResult<i64> {
        match self.value(base)? {
            Value::Address(address) if self.heap.contains(address) => Ok(address),
            _ => {
                let address = self.heap.new_region();
                self.write(base, Value::Address(address))?;
                Ok(address)
            }
        }
    }

    /// Converts a byte offset operand to a unit index.
    fn array_index(self: &mut Self, operand: Operand) -> RuntimeResult<i64> {
        let offset = self.integer(operand)?;
        if offset < 0 {
            Err(self.error(RuntimeErrorKind::IndexOutOfBounds))
        } else {
            Ok(offset / WORD_SIZE)
        }
    }

    fn numeric(self: &Self, value: &Value) -> RuntimeResult<Numeric> {
        value.as_numeric().ok_or_else(|| self.error(RuntimeErrorKind::TypeMismatch))
    }

    /// Resolves an operand to an integer, truncating floats.
    fn integer(self: &mut Self, operand: Operand) -> RuntimeResult<i64> {
        let value = self.deref_value(operand)?;
        Ok(match self.numeric(&value)? {
            Numeric::Integer(value) => value,
            Numeric::Float(value) => value as i64,
        })
    }

    /// Resolves an operand to a truth value. Floats are truncated first, so only a non-zero integer part is true.
    fn truth(self: &mut Self, operand: Operand) -> RuntimeResult<bool> {
        Ok(self.integer(operand)? != 0)
    }

    /// Computes in double precision and narrows the result. Arithmetic involving an address yields an address.
    fn arithmetic(self: &Self, left: &Value, right: &Value, op: fn(f64, f64) -> f64) -> RuntimeResult<Value> {
        let result = Numeric::from_f64(op(self.numeric(left)?.as_f64(), self.numeric(right)?.as_f64()));
        Ok(match (left, right) {
            (Value::Address(_), _) | (_, Value::Address(_)) => Value::Address(match result {
                Numeric::Integer(value) => value,
                Numeric::Float(value) => value as i64,
            }),
            _ => Value::from(result),
        })
    }

    fn binary_arithmetic(self: &mut Self, a1: Operand, a2: Operand, r: Operand, op: fn(f64, f64) -> f64) -> RuntimeResult {
        let left = self.deref_value(a1)?;
        let right = self.deref_value(a2)?;
        let result = self.arithmetic(&left, &right, op)?;
        self.write(r, result)
    }

    /// Numbers compare by value, strings by text. Values of differing kinds are never equal.
    fn equals(self: &mut Self, a1: Operand, a2: Operand) -> RuntimeResult<bool> {
        let left = self.deref_value(a1)?;
        let right = self.deref_value(a2)?;
        Ok(match (left.as_numeric(), right.as_numeric()) {
            (Some(left), Some(right)) => left.as_f64() == right.as_f64(),
            (None, None) => left == right,
            _ => false,
        })
    }

    fn comparison(self: &mut Self, a1: Operand, a2: Operand, r: Operand, test: fn(Ordering) -> bool) -> RuntimeResult {
        let left = self.deref_value(a1)?;
        let right = self.deref_value(a2)?;
        let left = self.numeric(&left)?.as_f64();
        let right = self.numeric(&right)?.as_f64();
        let result = left.partial_cmp(&right).map(test).unwrap_or(false);
        self.write(r, Value::from_bool(result))
    }
}
