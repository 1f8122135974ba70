use crate::util::*;

#[test]
fn precedence() {
    let (output, _) = run(&lines(&[
        "PRINT 2 + 3 * 4",
        "PRINT (2 + 3) * 4",
        "PRINT 10 - 4 - 3",
        "PRINT 100 / 10 / 5",
    ]));
    assert_eq!(output, "14\n20\n3\n2\n");
}

#[test]
fn negation() {
    let (output, _) = run(&lines(&[
        "X = 4",
        "PRINT -X",
        "PRINT -5 + 2",
        "PRINT 3 - -2",
        "PRINT -(X * 2)",
    ]));
    assert_eq!(output, "-4\n-3\n5\n-8\n");
}

#[test]
fn negative_literal_matches_runtime_negation() {
    let (output, _) = run(&lines(&[
        "X = 9007199254740993",
        "PRINT -9007199254740993",
        "PRINT -X",
        "Y = 2.5",
        "PRINT -2.5, \" \", -Y",
    ]));
    assert_eq!(output, "-9007199254740992\n-9007199254740992\n-2.5 -2.5\n");
}

#[test]
fn float_arithmetic() {
    let (output, _) = run(&lines(&[
        "PRINT 10 / 4",
        "PRINT 1.5 * 3",
        "PRINT 6 / 3",
        "PRINT 0.25 + 0.25",
    ]));
    assert_eq!(output, "2.5\n4.5\n2\n0.5\n");
}

#[test]
fn fractional_truth() {
    let (output, _) = run(&lines(&[
        "IF 0.5 THEN PRINT \"yes\" ELSE PRINT \"no\"",
        "IF 1.5 THEN PRINT \"yes\" ELSE PRINT \"no\"",
        "PRINT NOT 0.5",
    ]));
    assert_eq!(output, "no\nyes\n1\n");
}

#[test]
fn comparisons() {
    let (output, _) = run(&lines(&[
        "PRINT 1 < 2, 2 < 1",
        "PRINT 2 > 1, 1 > 2",
        "PRINT 2 <= 2, 3 <= 2",
        "PRINT 2 >= 2, 2 >= 3",
        "PRINT 3 = 3.0, 3 <> 3",
    ]));
    assert_eq!(output, "10\n10\n10\n10\n10\n");
}

#[test]
fn logic() {
    let (output, _) = run(&lines(&[
        "PRINT TRUE AND FALSE",
        "PRINT TRUE OR FALSE",
        "PRINT TRUE XOR TRUE",
        "PRINT NOT 0",
        "PRINT NOT 1 < 2",
        "PRINT 1 < 2 AND 3 < 4",
    ]));
    assert_eq!(output, "0\n1\n0\n1\n0\n1\n");
}

#[test]
fn undef_is_zero() {
    let (output, _) = run(&lines(&[
        "X = UNDEF",
        "PRINT X + 1",
        "PRINT Y",
    ]));
    assert_eq!(output, "1\n0\n");
}

#[test]
fn set_integer() {
    let (output, _) = run(&lines(&[
        "A = 5",
        "A = A",
        "B = A",
        "PRINT A, B",
    ]));
    assert_eq!(output, "55\n");
}

#[test]
fn set_float() {
    let (output, _) = run(&lines(&[
        "A = 2.5",
        "A = A",
        "B = A",
        "PRINT A, \" \", B",
    ]));
    assert_eq!(output, "2.5 2.5\n");
}

#[test]
fn case_insensitive() {
    let (output, _) = run(&lines(&[
        "let total = 3",
        "print Total * 2",
    ]));
    assert_eq!(output, "6\n");
}

#[test]
fn input_numbers() {
    let (output, _) = run_with_input(&lines(&[
        "INPUT N, M",
        "PRINT N * M",
    ]), &[ "6", "7" ]);
    assert_eq!(output, "N=M=42\n");
}

#[test]
fn input_text() {
    let (output, _) = run_with_input(&lines(&[
        "INPUT NAME",
        "PRINT \"Hello \" + NAME",
    ]), &[ "World" ]);
    assert_eq!(output, "NAME=Hello World\n");
}

#[test]
fn input_end_of_file() {
    let (output, _) = run(&lines(&[
        "INPUT A",
        "PRINT \"[\" + A + \"]\"",
    ]));
    assert_eq!(output, "A=[]\n");
}
