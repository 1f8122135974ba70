use crate::util::*;

#[test]
fn string_literal() {
    let (output, _) = run("PRINT \"Hello World!\"");
    assert_eq!(output, "Hello World!\n");
}

#[test]
fn print_list() {
    let (output, _) = run(&lines(&[
        "X = 3",
        "PRINT \"X is \", X, \".\"",
        "PRINT",
    ]));
    assert_eq!(output, "X is 3.\n\n");
}

#[test]
fn string_concat() {
    let (output, _) = run(&lines(&[
        "A = \"foo\"",
        "B = A + \"bar\"",
        "PRINT B",
        "PRINT \"n=\" + 42",
        "PRINT 1.5 + \"x\"",
    ]));
    assert_eq!(output, "foobar\nn=42\n1.5x\n");
}

#[test]
fn string_concat_loop() {
    let (output, _) = run(&lines(&[
        "S = \"\"",
        "FOR I = 1 TO 4",
        "S = S + I",
        "NEXT I",
        "PRINT S",
    ]));
    assert_eq!(output, "1234\n");
}

#[test]
fn set_string() {
    let (output, _) = run(&lines(&[
        "A = \"text\"",
        "A = A",
        "B = A",
        "PRINT A, \"/\", B",
    ]));
    assert_eq!(output, "text/text\n");
}

#[test]
fn string_reassign() {
    let (output, _) = run(&lines(&[
        "A = \"one\"",
        "B = A",
        "A = \"two\"",
        "PRINT A, B",
    ]));
    assert_eq!(output, "twoone\n");
}

#[test]
fn string_compare() {
    let (output, _) = run(&lines(&[
        "A = \"abc\"",
        "PRINT A = \"abc\", A = \"abd\", A <> \"abd\"",
        "PRINT A = 1",
    ]));
    assert_eq!(output, "101\n0\n");
}

#[test]
fn string_constants_shared() {
    let (output, _) = run(&lines(&[
        "PRINT \"same\"",
        "PRINT \"same\"",
        "IF \"same\" = \"same\" THEN PRINT \"equal\"",
    ]));
    assert_eq!(output, "same\nsame\nequal\n");
}
