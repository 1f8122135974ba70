use crate::util::*;

/// Recursive factorial: `fact(n) = n <= 1 ? 1 : n * fact(n - 1)`, printing `fact(5)`.
fn factorial() -> ThreeAddressCode {
    let mut tac = ThreeAddressCode::new();
    let n = tac.address_of("N");
    let m = tac.address_of("M");
    let t = tac.address_of("T");
    let r = tac.address_of("R");
    let p = tac.address_of("P");
    let result = tac.address_of("RESULT");
    let one = Address::IntegerConstant(1);
    // main
    tac.add_record(ThreeAddressRecord::call_parameter(Address::IntegerConstant(5)));
    let fact = tac.label_address("FACT");
    tac.add_record(ThreeAddressRecord::call(fact, one.clone(), Some(result.clone())));
    tac.add_record(ThreeAddressRecord::print(result));
    tac.add_record(ThreeAddressRecord::exit(Some(Address::IntegerConstant(0))));
    // fact
    tac.set_next_label("FACT");
    tac.add_record(ThreeAddressRecord::formal_parameter(Address::IntegerConstant(0), n.clone()));
    tac.add_record(ThreeAddressRecord::le(n.clone(), one.clone(), t.clone()));
    let recurse = tac.label_address("RECURSE");
    tac.add_record(ThreeAddressRecord::jump_if_false(recurse, t));
    tac.add_record(ThreeAddressRecord::ret(Some(one.clone())));
    tac.set_next_label("RECURSE");
    tac.add_record(ThreeAddressRecord::sub(n.clone(), one.clone(), m.clone()));
    tac.add_record(ThreeAddressRecord::call_parameter(m));
    let fact = tac.label_address("FACT");
    tac.add_record(ThreeAddressRecord::call(fact, one, Some(r.clone())));
    tac.add_record(ThreeAddressRecord::mul(n, r, p.clone()));
    tac.add_record(ThreeAddressRecord::ret(Some(p)));
    tac
}

#[test]
fn recursion_local() {
    let (output, result) = run_ir(factorial(), CompileOptions { all_global: false });
    assert_eq!(output, "120");
    assert_eq!(result.unwrap(), 0);
}

#[test]
fn recursion_all_global() {
    // the parameter binding is shared by all frames, so every multiplication sees n = 1
    let (output, result) = run_ir(factorial(), CompileOptions { all_global: true });
    assert_eq!(output, "1");
    assert_eq!(result.unwrap(), 0);
}

#[test]
fn call_parameters_in_order() {
    let mut tac = ThreeAddressCode::new();
    let a = tac.address_of("A");
    let b = tac.address_of("B");
    let diff = tac.address_of("DIFF");
    tac.add_record(ThreeAddressRecord::call_parameter(Address::IntegerConstant(10)));
    tac.add_record(ThreeAddressRecord::call_parameter(Address::IntegerConstant(3)));
    let sub = tac.label_address("SUB");
    tac.add_record(ThreeAddressRecord::call(sub, Address::IntegerConstant(2), Some(diff.clone())));
    tac.add_record(ThreeAddressRecord::print(diff));
    tac.add_record(ThreeAddressRecord::exit(None));
    tac.set_next_label("SUB");
    tac.add_record(ThreeAddressRecord::formal_parameter(Address::IntegerConstant(0), a.clone()));
    tac.add_record(ThreeAddressRecord::formal_parameter(Address::IntegerConstant(1), b.clone()));
    let result = tac.address_of("@result");
    tac.add_record(ThreeAddressRecord::sub(a, b, result.clone()));
    tac.add_record(ThreeAddressRecord::ret(Some(result)));
    let (output, result) = run_ir(tac, CompileOptions { all_global: false });
    assert_eq!(output, "7");
    assert_eq!(result.unwrap(), 0);
}

#[test]
fn local_bindings_do_not_leak() {
    let mut tac = ThreeAddressCode::new();
    let x = tac.address_of("X");
    tac.add_record(ThreeAddressRecord::set(Address::IntegerConstant(1), x.clone()));
    let sub = tac.label_address("SUB");
    tac.add_record(ThreeAddressRecord::call(sub, Address::IntegerConstant(0), None));
    tac.add_record(ThreeAddressRecord::print(x.clone()));
    tac.add_record(ThreeAddressRecord::exit(None));
    tac.set_next_label("SUB");
    tac.add_record(ThreeAddressRecord::set(Address::IntegerConstant(2), x));
    tac.add_record(ThreeAddressRecord::ret(None));
    let (local, _) = run_ir(tac.clone(), CompileOptions { all_global: false });
    let (global, _) = run_ir(tac, CompileOptions { all_global: true });
    assert_eq!(local, "1");
    assert_eq!(global, "2");
}

#[test]
fn gosub_local_mode() {
    let source = lines(&[
        "10 X = 1",
        "20 GOSUB 100",
        "30 PRINT X",
        "40 END",
        "100 X = 2",
        "110 RETURN",
    ]);
    assert_eq!(run(&source).0, "2\n");
    assert_eq!(run_local(&source).0, "1\n");
}

#[test]
fn call_return_balance() {
    let program = compile(&lines(&[
        "10 FOR I = 1 TO 3",
        "20 GOSUB 100",
        "30 NEXT I",
        "40 PRINT S",
        "50 END",
        "100 GOSUB 200",
        "110 RETURN",
        "200 S = S + I",
        "210 RETURN",
    ]), CompileOptions::default());
    let mut console = BufferConsole::new(&[]);
    let mut vm = VM::new(&program);
    assert_eq!(vm.frame_depth(), 1);
    let exit_code = vm.run(&mut console).unwrap();
    assert_eq!(console.output, "6\n");
    assert_eq!(exit_code, 0);
    assert_eq!(vm.frame_depth(), 1);
    assert_eq!(vm.state(), VMState::Terminated(0));
}

#[test]
fn rerun_after_reset() {
    let program = compile("PRINT \"run\"", CompileOptions::default());
    let mut console = BufferConsole::new(&[]);
    let mut vm = VM::new(&program);
    vm.run(&mut console).unwrap();
    let error = vm.run(&mut console).unwrap_err();
    assert_eq!(error.kind(), &RuntimeErrorKind::NotReady);
    vm.reset();
    assert_eq!(vm.state(), VMState::Ready);
    vm.run(&mut console).unwrap();
    assert_eq!(console.output, "run\nrun\n");
}
