use crate::util::*;

#[test]
fn array_fill() {
    let (output, _) = run(&lines(&[
        "FOR I = 0 TO 4",
        "A(I) = I * I",
        "NEXT I",
        "S = 0",
        "FOR I = 0 TO 4",
        "S = S + A(I)",
        "NEXT I",
        "PRINT S, \" \", A(3)",
    ]));
    assert_eq!(output, "30 9\n");
}

#[test]
fn array_sparse_write() {
    let (output, _) = run(&lines(&[
        "A(3) = 7",
        "PRINT A(0), A(3)",
    ]));
    assert_eq!(output, "07\n");
}

#[test]
fn array_computed_index() {
    let (output, _) = run(&lines(&[
        "K = 2",
        "A(K + 1) = 11",
        "A(K - 1) = A(K + 1) * 2",
        "PRINT A(1)",
    ]));
    assert_eq!(output, "22\n");
}

#[test]
fn array_mixed_values() {
    let (output, _) = run(&lines(&[
        "A(0) = 1",
        "A(1) = 2.5",
        "A(2) = \"three\"",
        "PRINT A(0), \" \", A(1), \" \", A(2)",
    ]));
    assert_eq!(output, "1 2.5 three\n");
}

#[test]
fn arrays_are_separate() {
    let (output, _) = run(&lines(&[
        "A(0) = 1",
        "B(0) = 2",
        "A(1) = B(0) + 1",
        "PRINT A(0), B(0), A(1)",
    ]));
    assert_eq!(output, "123\n");
}

#[test]
fn heap_regions_allocated_lazily() {
    let program = compile(&lines(&[
        "X = 1",
        "A(0) = 5",
        "B(2) = 6",
        "A(1) = 7",
    ]), CompileOptions::default());
    let mut console = BufferConsole::new(&[]);
    let mut vm = VM::new(&program);
    assert_eq!(vm.heap().len(), 0);
    vm.run(&mut console).unwrap();
    assert_eq!(vm.heap().len(), 2);
    let first = vm.heap().region(program.program_size()).unwrap();
    let second = vm.heap().region(program.program_size() + 1).unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 3);
}

#[test]
fn heap_addresses_monotonic() {
    let program = compile(&lines(&[
        "FOR I = 1 TO 5",
        "S = \"text\" + I",
        "NEXT I",
        "A(0) = 1",
    ]), CompileOptions::default());
    let mut console = BufferConsole::new(&[]);
    let mut vm = VM::new(&program);
    vm.run(&mut console).unwrap();
    let regions = vm.heap().len() as i64;
    assert!(regions >= 6);
    let mut previous = None;
    for index in 0..regions {
        let region = vm.heap().region(program.program_size() + index).unwrap();
        assert!(region.address() >= program.program_size());
        if let Some(previous) = previous {
            assert!(region.address() > previous);
        }
        previous = Some(region.address());
    }
    assert!(vm.heap().region(program.program_size() + regions).is_none());
}
