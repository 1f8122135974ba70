//! Three-address instructions and their records.

use crate::prelude::*;
use crate::bytecode::address::Address;

/// Generates the `OpCode` enum and one `ThreeAddressRecord` constructor per instruction from a list of
/// instruction signatures. The bracketed list maps the constructor arguments onto the `arg1`, `arg2`
/// and `result` slots, the trailing string is the textual three-address form.
macro_rules! opcodes {
    (
        $(
            $( #[ $attr:meta ] )*
            $variant:ident = $ordinal:literal,
            fn $ctor:ident ( $( $arg:ident : $ty:ty ),* ) => [ $arg1:expr, $arg2:expr, $result:expr ], $format:literal
        );+ $(;)?
    ) => { paste::paste! {

        /// Byte code instructions. The discriminant is the value stored in the low 32 bits of an instruction word.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u32)]
        pub enum OpCode {
            $(
                $( #[ $attr ] )*
                $variant = $ordinal,
            )+
        }

        impl OpCode {
            /// Converts an instruction word to an opcode.
            pub fn from_u32(opcode: u32) -> Option<Self> {
                match opcode {
                    $( $ordinal => Some(Self::$variant), )+
                    _ => None,
                }
            }
            /// Instruction mnemonic used in disassembly.
            pub fn mnemonic(self: Self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!([< $variant:snake >]), )+
                }
            }
            /// Textual three-address form with `{a1}`, `{a2}` and `{r}` placeholders.
            fn template(self: Self) -> &'static str {
                match self {
                    $( Self::$variant => $format, )+
                }
            }
        }

        impl ThreeAddressRecord {
            $(
                $( #[ $attr ] )*
                pub fn $ctor( $( $arg : $ty ),* ) -> Self {
                    Self::new(OpCode::$variant, $arg1, $arg2, $result)
                }
            )+
        }
    } };
}

opcodes! {
    /// Terminates the program with an optional exit code.
    Exit = 0,           fn exit(code: Option<Address>) => [ code, None, None ], "exit {a1}";
    /// r = a1
    Set = 1,            fn set(value: Address, var: Address) => [ Some(value), None, Some(var) ], "{r} = {a1}";
    /// r = a1 + a2, concatenating if either operand is a string.
    Add = 2,            fn add(left: Address, right: Address, result: Address) => [ Some(left), Some(right), Some(result) ], "{r} = {a1} + {a2}";
    Sub = 3,            fn sub(left: Address, right: Address, result: Address) => [ Some(left), Some(right), Some(result) ], "{r} = {a1} - {a2}";
    Mul = 4,            fn mul(left: Address, right: Address, result: Address) => [ Some(left), Some(right), Some(result) ], "{r} = {a1} * {a2}";
    Div = 5,            fn div(left: Address, right: Address, result: Address) => [ Some(left), Some(right), Some(result) ], "{r} = {a1} / {a2}";
    /// r = -a1
    Neg = 6,            fn neg(value: Address, result: Address) => [ Some(value), None, Some(result) ], "{r} = -{a1}";
    Eq = 7,             fn eq(left: Address, right: Address, result: Address) => [ Some(left), Some(right), Some(result) ], "{r} = {a1} == {a2}";
    Ne = 8,             fn ne(left: Address, right: Address, result: Address) => [ Some(left), Some(right), Some(result) ], "{r} = {a1} <> {a2}";
    Lt = 9,             fn lt(left: Address, right: Address, result: Address) => [ Some(left), Some(right), Some(result) ], "{r} = {a1} < {a2}";
    Gt = 10,            fn gt(left: Address, right: Address, result: Address) => [ Some(left), Some(right), Some(result) ], "{r} = {a1} > {a2}";
    Le = 11,            fn le(left: Address, right: Address, result: Address) => [ Some(left), Some(right), Some(result) ], "{r} = {a1} <= {a2}";
    Ge = 12,            fn ge(left: Address, right: Address, result: Address) => [ Some(left), Some(right), Some(result) ], "{r} = {a1} >= {a2}";
    Not = 13,           fn not(value: Address, result: Address) => [ Some(value), None, Some(result) ], "{r} = not {a1}";
    And = 14,           fn and(left: Address, right: Address, result: Address) => [ Some(left), Some(right), Some(result) ], "{r} = {a1} and {a2}";
    Or = 15,            fn or(left: Address, right: Address, result: Address) => [ Some(left), Some(right), Some(result) ], "{r} = {a1} or {a2}";
    Xor = 16,           fn xor(left: Address, right: Address, result: Address) => [ Some(left), Some(right), Some(result) ], "{r} = {a1} xor {a2}";
    /// Continues execution at a1.
    Jump = 17,          fn jump(target: Address) => [ Some(target), None, None ], "goto {a1}";
    /// Continues execution at a1 if a2 is non-zero.
    JumpIfTrue = 18,    fn jump_if_true(target: Address, condition: Address) => [ Some(target), Some(condition), None ], "if {a2} goto {a1}";
    /// Continues execution at a1 if a2 is zero.
    JumpIfFalse = 19,   fn jump_if_false(target: Address, condition: Address) => [ Some(target), Some(condition), None ], "ifnot {a2} goto {a1}";
    /// Queues a1 as parameter for the next call.
    CallParameter = 20, fn call_parameter(value: Address) => [ Some(value), None, None ], "param {a1}";
    /// r = formal parameter a1 of the current call.
    FormalParameter = 21, fn formal_parameter(index: Address, var: Address) => [ Some(index), None, Some(var) ], "{r} = formal {a1}";
    /// Calls a1 with a2 queued parameters. The returned value is written to r, if given.
    Call = 22,          fn call(function: Address, count: Address, result: Option<Address>) => [ Some(function), Some(count), result ], "{r} = call {a1}, {a2}";
    /// Returns from the current call with an optional value.
    Return = 23,        fn ret(value: Option<Address>) => [ value, None, None ], "return {a1}";
    /// r = line read from the console
    Read = 24,          fn read(var: Address) => [ None, None, Some(var) ], "{r} = read";
    /// Writes a1 to the console.
    Print = 25,         fn print(value: Address) => [ Some(value), None, None ], "print {a1}";
    /// r = a1[a2], a2 being a byte offset.
    ArrayGet = 26,      fn array_get(array: Address, index: Address, result: Address) => [ Some(array), Some(index), Some(result) ], "{r} = {a1}[{a2}]";
    /// r[a1] = a2, a1 being a byte offset.
    ArraySet = 27,      fn array_set(index: Address, value: Address, array: Address) => [ Some(index), Some(value), Some(array) ], "{r}[{a1}] = {a2}";
}

/// A quadruple of the three-address code.
#[derive(Clone, Debug, PartialEq)]
pub struct ThreeAddressRecord {
    pub(crate) opcode   : OpCode,
    pub(crate) arg1     : Option<Address>,
    pub(crate) arg2     : Option<Address>,
    pub(crate) result   : Option<Address>,
    pub(crate) label    : Option<String>,
    pub(crate) comment  : Option<String>,
    pub(crate) address  : i64,
}

impl ThreeAddressRecord {
    fn new(opcode: OpCode, arg1: Option<Address>, arg2: Option<Address>, result: Option<Address>) -> Self {
        ThreeAddressRecord {
            opcode,
            arg1,
            arg2,
            result,
            label   : None,
            comment : None,
            address : 0,
        }
    }
    pub fn opcode(self: &Self) -> OpCode {
        self.opcode
    }
    pub fn arg1(self: &Self) -> Option<&Address> {
        self.arg1.as_ref()
    }
    pub fn arg2(self: &Self) -> Option<&Address> {
        self.arg2.as_ref()
    }
    pub fn result(self: &Self) -> Option<&Address> {
        self.result.as_ref()
    }
    pub fn label(self: &Self) -> Option<&str> {
        self.label.as_deref()
    }
    pub fn comment(self: &Self) -> Option<&str> {
        self.comment.as_deref()
    }
    /// Byte offset of the record within the code segment.
    pub fn address(self: &Self) -> i64 {
        self.address
    }
    /// Iterates the three operand slots.
    pub fn operands(self: &Self) -> [ Option<&Address>; 3 ] {
        [ self.arg1.as_ref(), self.arg2.as_ref(), self.result.as_ref() ]
    }
    pub(crate) fn operands_mut(self: &mut Self) -> [ &mut Option<Address>; 3 ] {
        [ &mut self.arg1, &mut self.arg2, &mut self.result ]
    }
}

impl Display for ThreeAddressRecord {
    fn fmt(self: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operand = |address: &Option<Address>| address.as_ref().map(|a| a.to_string()).unwrap_or("_".to_string());
        let text = self.opcode.template()
            .replace("{a1}", &operand(&self.arg1))
            .replace("{a2}", &operand(&self.arg2))
            .replace("{r}", &operand(&self.result));
        if let Some(label) = &self.label {
            write!(f, "{}:", label)?;
        }
        write!(f, "\t{}", text)?;
        if let Some(comment) = &self.comment {
            write!(f, "\t; {}", comment)?;
        }
        Ok(())
    }
}
