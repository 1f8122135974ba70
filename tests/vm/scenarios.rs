use crate::util::*;

#[test]
fn print_sum() {
    let (output, exit_code) = run("PRINT 1+2");
    assert_eq!(output, "3\n");
    assert_eq!(exit_code, 0);
}

#[test]
fn goto_missing_line() {
    let (output, exit_code) = run("GOTO 999");
    assert_eq!(output, "Line not found: 999\n");
    assert_eq!(exit_code, 1234);
}

#[test]
fn goto_missing_line_numbered() {
    let (output, exit_code) = run(&lines(&[
        "10 PRINT \"before\"",
        "20 GOTO 15",
        "30 PRINT \"after\"",
    ]));
    assert_eq!(output, "before\nLine not found: 15\n");
    assert_eq!(exit_code, 1234);
}

#[test]
fn array_set_get() {
    let (output, exit_code) = run(&lines(&[
        "A(0) = 5",
        "PRINT A(0)",
    ]));
    assert_eq!(output, "5\n");
    assert_eq!(exit_code, 0);
}

#[test]
fn gosub_sets_caller_variable() {
    let (output, exit_code) = run(&lines(&[
        "10 X = 1",
        "20 GOSUB 100",
        "30 PRINT X",
        "40 END",
        "100 X = (2 + 3) * 4 - X",
        "110 RETURN",
    ]));
    assert_eq!(output, "19\n");
    assert_eq!(exit_code, 0);
}

#[test]
fn nested_gosub() {
    let (output, _) = run(&lines(&[
        "10 GOSUB 100",
        "20 PRINT R",
        "30 END",
        "100 A = 3 * 3",
        "110 GOSUB 200",
        "120 R = A + B",
        "130 RETURN",
        "200 B = (A + 1) * 2",
        "210 RETURN",
    ]));
    assert_eq!(output, "29\n");
}
