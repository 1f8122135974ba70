//! Lowering of the BASIC AST into three-address code and byte code.

pub mod error;

use tracing::debug;
use crate::prelude::*;
use crate::config::{WORD_SIZE, LINE_LOOKUP};
use crate::frontend::{ast::*, parser::types::ParsedProgram};
use crate::bytecode::{CompileOptions, Program, address::Address, tac::ThreeAddressCode, opcodes::ThreeAddressRecord, writer::Writer};
use error::{CompileError, CompileErrorKind, CompileResult, OptionToCompileError};

/// Lowers an expression into three-address code, returning the address holding its value.
pub trait Generate {
    fn generate(self: &Self, compiler: &mut Compiler) -> CompileResult<Address>;
}

/// Lowers a statement into three-address code.
pub trait GenerateStatement {
    fn generate_statement(self: &Self, compiler: &mut Compiler) -> CompileResult;
}

/// Compiler session. Owns the three-address code under construction and collects errors while lowering.
pub struct Compiler {
    /// Three-address code under construction.
    tac: ThreeAddressCode,
    /// Errors collected so far. Lowering continues with the next line after an error.
    errors: Vec<CompileError>,
    /// Line numbers seen so far.
    line_numbers: UnorderedMap<i64, Position>,
    /// Position of the line currently being lowered. For error reporting only.
    position: Position,
}

/// Lowers a parsed program into finalized three-address code.
pub fn lower(program: &ParsedProgram) -> Result<ThreeAddressCode, Vec<CompileError>> {
    let mut compiler = Compiler::new();
    compiler.compile_lines(&program.0);
    compiler.finish()
}

/// Compiles a parsed program into byte code.
///
/// ```
/// use tinybasic::{parser, compiler};
///
/// let parsed = parser::parse("PRINT 1+2").unwrap();
/// let program = compiler::compile(&parsed, compiler::CompileOptions::default()).unwrap();
/// assert_eq!(program.code_size() % 32, 0);
/// ```
///
/// The returned [Program] is now ready to be run by [VM::run](crate::runtime::VM::run).
pub fn compile(program: &ParsedProgram, options: CompileOptions) -> Result<Program, Vec<CompileError>> {
    let tac = lower(program)?;
    let mut writer = Writer::new(options);
    writer.write_code(&tac).map_err(|error| vec![ CompileError::ice(error.to_string()) ])?;
    let program = writer.into_program();
    debug!("compiled {} instructions, code size {}, program size {}", program.len(), program.code_size(), program.program_size());
    Ok(program)
}

impl Compiler {
    /// Creates a new compiler session.
    pub fn new() -> Self {
        Compiler {
            tac             : ThreeAddressCode::new(),
            errors          : Vec::new(),
            line_numbers    : UnorderedMap::new(),
            position        : Position(0),
        }
    }

    /// The three-address code generated so far.
    pub fn tac(self: &Self) -> &ThreeAddressCode {
        &self.tac
    }

    /// Lowers a sequence of lines, collecting errors instead of stopping at the first one.
    pub fn compile_lines(self: &mut Self, lines: &[ Line ]) {
        for line in lines {
            if let Err(error) = line.generate_statement(self) {
                self.errors.push(error);
            }
        }
    }

    /// Finalizes the three-address code, or returns all errors collected while lowering.
    pub fn finish(self: Self) -> Result<ThreeAddressCode, Vec<CompileError>> {
        let Compiler { mut tac, errors, .. } = self;
        if errors.is_empty() {
            tac.finalize();
            Ok(tac)
        } else {
            debug!("compilation failed with {} errors", errors.len());
            Err(errors)
        }
    }

    /// Appends a record.
    fn emit(self: &mut Self, record: ThreeAddressRecord) {
        self.tac.add_record(record);
    }

    /// Returns the address of a fresh temporary.
    fn temp(self: &mut Self) -> Address {
        let name = self.tac.create_temp_variable();
        self.tac.address_of(&name)
    }

    fn error(self: &Self, kind: CompileErrorKind) -> CompileError {
        CompileError::new(self.position, kind)
    }

    /// Returns a label bound to the next record, reusing a label that is already pending for it.
    fn label_here(self: &mut Self) -> String {
        if let Some(label) = self.tac.pending_label() {
            return label.to_string();
        }
        let label = self.tac.create_label();
        self.tac.set_next_label(&label);
        label
    }

    /// Binds a previously referenced label to the next record. Another pending label is given a jump to it.
    fn bind_label(self: &mut Self, label: &str) {
        if self.tac.pending_label().is_some() {
            let target = self.tac.label_address(label);
            self.emit(ThreeAddressRecord::jump(target));
        }
        self.tac.set_next_label(label);
    }

    /// Computes the byte offset of an array element.
    fn array_offset(self: &mut Self, index: &Expression) -> CompileResult<Address> {
        let index = index.generate(self)?;
        Ok(match index {
            Address::IntegerConstant(value) => Address::IntegerConstant(value.wrapping_mul(WORD_SIZE)),
            index => {
                let offset = self.temp();
                self.emit(ThreeAddressRecord::mul(index, Address::IntegerConstant(WORD_SIZE), offset.clone()));
                offset
            }
        })
    }

    /// Calls the line lookup function for a GOTO or GOSUB target and returns the address holding the code address.
    fn line_target(self: &mut Self, target: &Expression) -> CompileResult<Address> {
        if let Expression::Literal(literal) = target {
            match literal {
                Literal::Integer(line) if *line > 0 => { },
                _ => return Err(self.error(CompileErrorKind::InvalidLineNumber)),
            }
        }
        let line = target.generate(self)?;
        self.emit(ThreeAddressRecord::call_parameter(line));
        let lookup = self.tac.label_address(LINE_LOOKUP);
        let result = self.temp();
        self.emit(ThreeAddressRecord::call(lookup, Address::IntegerConstant(1), Some(result.clone())));
        Ok(result)
    }
}

impl GenerateStatement for Line {
    fn generate_statement(self: &Self, compiler: &mut Compiler) -> CompileResult {
        compiler.position = self.position;
        if self.number > 0 {
            if compiler.line_numbers.insert(self.number, self.position).is_some() {
                return Err(compiler.error(CompileErrorKind::DuplicateLineNumber(self.number)));
            }
        }
        compiler.tac.start_instruction(self.number);
        if !matches!(self.statement, Statement::Rem(_)) {
            compiler.tac.set_next_comment(&self.text);
        }
        self.statement.generate_statement(compiler)
    }
}

impl GenerateStatement for Statement {
    fn generate_statement(self: &Self, compiler: &mut Compiler) -> CompileResult {
        match self {
            Statement::Print(values) => {
                for value in values {
                    let value = value.generate(compiler)?;
                    compiler.emit(ThreeAddressRecord::print(value));
                }
                let newline = compiler.tac.constant_address("\n");
                compiler.emit(ThreeAddressRecord::print(newline));
            },
            Statement::Input(variables) => {
                for variable in variables {
                    let prompt = compiler.tac.constant_address(&format!("{}=", variable.name));
                    compiler.emit(ThreeAddressRecord::print(prompt));
                    let target = variable.generate(compiler)?;
                    compiler.emit(ThreeAddressRecord::read(target));
                }
            },
            Statement::Assign(assignment) => assignment.generate_statement(compiler)?,
            Statement::If(if_statement) => if_statement.generate_statement(compiler)?,
            Statement::Goto(target) => {
                let address = compiler.line_target(target)?;
                compiler.emit(ThreeAddressRecord::jump(address));
            },
            Statement::Gosub(target) => {
                let address = compiler.line_target(target)?;
                compiler.emit(ThreeAddressRecord::call(address, Address::IntegerConstant(0), None));
            },
            Statement::Return => compiler.emit(ThreeAddressRecord::ret(None)),
            Statement::End => compiler.emit(ThreeAddressRecord::exit(Some(Address::IntegerConstant(0)))),
            Statement::Rem(_) => { },
            Statement::While(while_loop) => while_loop.generate_statement(compiler)?,
            Statement::For(for_loop) => for_loop.generate_statement(compiler)?,
        }
        Ok(())
    }
}

impl GenerateStatement for Assignment {
    fn generate_statement(self: &Self, compiler: &mut Compiler) -> CompileResult {
        let value = self.value.generate(compiler)?;
        let target = compiler.tac.address_of(&self.name);
        match &self.index {
            None => compiler.emit(ThreeAddressRecord::set(value, target)),
            Some(index) => {
                let offset = compiler.array_offset(index)?;
                compiler.emit(ThreeAddressRecord::array_set(offset, value, target));
            },
        }
        Ok(())
    }
}

impl GenerateStatement for IfStatement {
    fn generate_statement(self: &Self, compiler: &mut Compiler) -> CompileResult {
        let condition = self.condition.generate(compiler)?;
        let after = compiler.tac.create_label();
        let else_label = self.else_branch.as_ref().map(|_| compiler.tac.create_label());
        let target = compiler.tac.label_address(else_label.as_deref().unwrap_or(&after));
        compiler.emit(ThreeAddressRecord::jump_if_false(target, condition));
        self.then_branch.generate_statement(compiler)?;
        if let Some(else_branch) = &self.else_branch {
            let after_address = compiler.tac.label_address(&after);
            compiler.emit(ThreeAddressRecord::jump(after_address));
            let else_label = else_label.ice_msg("Else branch without label")?;
            compiler.bind_label(&else_label);
            else_branch.generate_statement(compiler)?;
        }
        compiler.bind_label(&after);
        Ok(())
    }
}

impl GenerateStatement for WhileLoop {
    fn generate_statement(self: &Self, compiler: &mut Compiler) -> CompileResult {
        let condition_label = compiler.label_here();
        let condition = self.condition.generate(compiler)?;
        let after = compiler.tac.create_label();
        let after_address = compiler.tac.label_address(&after);
        compiler.emit(ThreeAddressRecord::jump_if_false(after_address, condition));
        compiler.compile_lines(&self.body);
        let condition_address = compiler.tac.label_address(&condition_label);
        compiler.emit(ThreeAddressRecord::jump(condition_address));
        compiler.bind_label(&after);
        Ok(())
    }
}

impl GenerateStatement for ForLoop {
    fn generate_statement(self: &Self, compiler: &mut Compiler) -> CompileResult {
        let variable = self.variable.generate(compiler)?;
        let start = self.start.generate(compiler)?;
        compiler.emit(ThreeAddressRecord::set(start, variable.clone()));
        let condition_label = compiler.label_here();
        let end = self.end.generate(compiler)?;
        let test = compiler.temp();
        compiler.emit(ThreeAddressRecord::le(variable.clone(), end, test.clone()));
        let after = compiler.tac.create_label();
        let after_address = compiler.tac.label_address(&after);
        compiler.emit(ThreeAddressRecord::jump_if_false(after_address, test));
        compiler.compile_lines(&self.body);
        let step = match &self.step {
            Some(step) => step.generate(compiler)?,
            None => Address::IntegerConstant(1),
        };
        compiler.emit(ThreeAddressRecord::add(variable.clone(), step, variable));
        let condition_address = compiler.tac.label_address(&condition_label);
        compiler.emit(ThreeAddressRecord::jump(condition_address));
        compiler.bind_label(&after);
        Ok(())
    }
}

impl Generate for Expression {
    fn generate(self: &Self, compiler: &mut Compiler) -> CompileResult<Address> {
        match self {
            Expression::Literal(literal) => literal.generate(compiler),
            Expression::Variable(variable) => variable.generate(compiler),
            Expression::ArrayElement(element) => element.generate(compiler),
            Expression::BinaryOp(binary_op) => binary_op.generate(compiler),
            Expression::UnaryOp(unary_op) => unary_op.generate(compiler),
        }
    }
}

impl Generate for Literal {
    fn generate(self: &Self, compiler: &mut Compiler) -> CompileResult<Address> {
        Ok(match self {
            &Literal::Integer(value) => Address::IntegerConstant(value),
            &Literal::Float(value) => Address::FloatConstant(value),
            Literal::String(text) => compiler.tac.constant_address(text),
            &Literal::Boolean(value) => Address::IntegerConstant(if value { 1 } else { 0 }),
            Literal::Undef => Address::IntegerConstant(0),
        })
    }
}

impl Generate for Variable {
    fn generate(self: &Self, compiler: &mut Compiler) -> CompileResult<Address> {
        Ok(compiler.tac.address_of(&self.name))
    }
}

impl Generate for ArrayElement {
    fn generate(self: &Self, compiler: &mut Compiler) -> CompileResult<Address> {
        if compiler.tac.symbols().lookup(&self.name).is_none() {
            return Err(CompileError::new(self.position, CompileErrorKind::UndefinedVariable(self.name.clone())));
        }
        let array = compiler.tac.address_of(&self.name);
        let offset = compiler.array_offset(&self.index)?;
        let result = compiler.temp();
        compiler.emit(ThreeAddressRecord::array_get(array, offset, result.clone()));
        Ok(result)
    }
}

impl Generate for BinaryOp {
    fn generate(self: &Self, compiler: &mut Compiler) -> CompileResult<Address> {
        let left = self.left.generate(compiler)?;
        let right = self.right.generate(compiler)?;
        let result = compiler.temp();
        let record = match self.op {
            BinaryOperator::Add => ThreeAddressRecord::add(left, right, result.clone()),
            BinaryOperator::Sub => ThreeAddressRecord::sub(left, right, result.clone()),
            BinaryOperator::Mul => ThreeAddressRecord::mul(left, right, result.clone()),
            BinaryOperator::Div => ThreeAddressRecord::div(left, right, result.clone()),
            BinaryOperator::Eq => ThreeAddressRecord::eq(left, right, result.clone()),
            BinaryOperator::Ne => ThreeAddressRecord::ne(left, right, result.clone()),
            BinaryOperator::Lt => ThreeAddressRecord::lt(left, right, result.clone()),
            BinaryOperator::Gt => ThreeAddressRecord::gt(left, right, result.clone()),
            BinaryOperator::Le => ThreeAddressRecord::le(left, right, result.clone()),
            BinaryOperator::Ge => ThreeAddressRecord::ge(left, right, result.clone()),
            BinaryOperator::And => ThreeAddressRecord::and(left, right, result.clone()),
            BinaryOperator::Or => ThreeAddressRecord::or(left, right, result.clone()),
            BinaryOperator::Xor => ThreeAddressRecord::xor(left, right, result.clone()),
        };
        compiler.emit(record);
        Ok(result)
    }
}

impl Generate for UnaryOp {
    fn generate(self: &Self, compiler: &mut Compiler) -> CompileResult<Address> {
        let value = self.expr.generate(compiler)?;
        let result = compiler.temp();
        compiler.emit(match self.op {
            UnaryOperator::Neg => ThreeAddressRecord::neg(value, result.clone()),
            UnaryOperator::Not => ThreeAddressRecord::not(value, result.clone()),
        });
        Ok(result)
    }
}
