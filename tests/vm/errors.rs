use crate::util::*;
use tinybasic::tac::AddressBase;

#[test]
fn division_by_zero() {
    let (output, kind) = run_error(&lines(&[
        "PRINT \"start\"",
        "X = 0",
        "PRINT 1 / X",
    ]));
    assert_eq!(output, "start\n");
    assert_eq!(kind, RuntimeErrorKind::DivisionByZero);
}

#[test]
fn return_outside_call() {
    let (_, kind) = run_error("RETURN");
    assert_eq!(kind, RuntimeErrorKind::ReturnOutsideCall);
}

#[test]
fn negative_array_index() {
    let (_, kind) = run_error("A(-1) = 3");
    assert_eq!(kind, RuntimeErrorKind::IndexOutOfBounds);
}

#[test]
fn array_read_past_end() {
    let (_, kind) = run_error(&lines(&[
        "A(0) = 1",
        "PRINT A(5)",
    ]));
    assert_eq!(kind, RuntimeErrorKind::IndexOutOfBounds);
}

#[test]
fn string_comparison_mismatch() {
    let (_, kind) = run_error("PRINT \"a\" < 1");
    assert_eq!(kind, RuntimeErrorKind::TypeMismatch);
}

#[test]
fn write_to_constant() {
    let mut tac = ThreeAddressCode::new();
    let constant = tac.constant_address("read only");
    tac.add_record(ThreeAddressRecord::set(Address::IntegerConstant(1), constant));
    let (_, result) = run_ir(tac, CompileOptions::default());
    assert_eq!(result.unwrap_err().kind(), &RuntimeErrorKind::ReadOnlyWrite);
}

#[test]
fn write_to_code() {
    let mut tac = ThreeAddressCode::new();
    let target = tac.label_address("DONE");
    tac.add_record(ThreeAddressRecord::set(Address::IntegerConstant(1), target));
    tac.set_next_label("DONE");
    tac.add_record(ThreeAddressRecord::exit(None));
    let (_, result) = run_ir(tac, CompileOptions::default());
    assert_eq!(result.unwrap_err().kind(), &RuntimeErrorKind::ReadOnlyWrite);
    assert!(AddressBase::ProgramStart.is_read_only());
    assert!(AddressBase::ProgramEnd.is_read_only());
    assert!(!AddressBase::MemoryContext.is_read_only());
    assert!(!AddressBase::Heap.is_read_only());
}

#[test]
fn heap_address_beyond_allocation() {
    let heap = |offset| Address::Symbolic { name: "@heap".to_string(), offset, base: AddressBase::Heap };
    let mut tac = ThreeAddressCode::new();
    tac.add_record(ThreeAddressRecord::print(heap(0)));
    let (output, result) = run_ir(tac, CompileOptions::default());
    assert_eq!(output, "0");
    assert_eq!(result.unwrap(), 0);
    let mut tac = ThreeAddressCode::new();
    tac.add_record(ThreeAddressRecord::print(heap(1_000_000_000_000)));
    let (_, result) = run_ir(tac, CompileOptions::default());
    assert_eq!(result.unwrap_err().kind(), &RuntimeErrorKind::InvalidHeapAddress);
}

#[test]
fn call_without_parameters() {
    let mut tac = ThreeAddressCode::new();
    let sub = tac.label_address("SUB");
    tac.add_record(ThreeAddressRecord::call(sub, Address::IntegerConstant(1), None));
    tac.add_record(ThreeAddressRecord::exit(None));
    tac.set_next_label("SUB");
    tac.add_record(ThreeAddressRecord::ret(None));
    let (_, result) = run_ir(tac, CompileOptions::default());
    assert_eq!(result.unwrap_err().kind(), &RuntimeErrorKind::MissingParameters);
}

#[test]
fn formal_parameter_not_supplied() {
    let mut tac = ThreeAddressCode::new();
    let x = tac.address_of("X");
    let sub = tac.label_address("SUB");
    tac.add_record(ThreeAddressRecord::call(sub, Address::IntegerConstant(0), None));
    tac.add_record(ThreeAddressRecord::exit(None));
    tac.set_next_label("SUB");
    tac.add_record(ThreeAddressRecord::formal_parameter(Address::IntegerConstant(0), x));
    tac.add_record(ThreeAddressRecord::ret(None));
    let (_, result) = run_ir(tac, CompileOptions::default());
    assert_eq!(result.unwrap_err().kind(), &RuntimeErrorKind::MissingParameters);
}

#[test]
fn state_after_error() {
    let program = compile("PRINT 1 / 0", CompileOptions::default());
    let mut console = BufferConsole::new(&[]);
    let mut vm = VM::new(&program);
    let error = vm.run(&mut console).unwrap_err();
    assert_eq!(error.kind(), &RuntimeErrorKind::DivisionByZero);
    assert_eq!(error.offset(), 0);
    assert_eq!(vm.state(), VMState::RuntimeError);
    assert_eq!(vm.run(&mut console).unwrap_err().kind(), &RuntimeErrorKind::NotReady);
}

#[test]
fn custom_exit_code() {
    let mut tac = ThreeAddressCode::new();
    tac.add_record(ThreeAddressRecord::exit(Some(Address::IntegerConstant(42))));
    let (_, result) = run_ir(tac, CompileOptions::default());
    assert_eq!(result.unwrap(), 42);
}
