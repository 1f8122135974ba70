use crate::util::*;

#[test]
fn goto_forward() {
    let (output, _) = run(&lines(&[
        "10 GOTO 30",
        "20 PRINT \"skipped\"",
        "30 PRINT \"done\"",
    ]));
    assert_eq!(output, "done\n");
}

#[test]
fn goto_computed() {
    let (output, _) = run(&lines(&[
        "10 X = 20 + 10",
        "20 GOTO X",
        "25 PRINT 1",
        "30 PRINT 2",
    ]));
    assert_eq!(output, "2\n");
}

#[test]
fn goto_loop() {
    let (output, _) = run(&lines(&[
        "10 I = 1",
        "20 PRINT I",
        "30 I = I + 1",
        "40 IF I <= 3 THEN 20",
        "50 END",
    ]));
    assert_eq!(output, "1\n2\n3\n");
}

#[test]
fn goto_rem_line() {
    let (output, _) = run(&lines(&[
        "10 GOTO 30",
        "20 PRINT \"skipped\"",
        "30 REM jump target",
        "40 PRINT \"done\"",
    ]));
    assert_eq!(output, "done\n");
}

#[test]
fn if_then_else() {
    let (output, _) = run(&lines(&[
        "10 X = 5",
        "20 IF X > 3 THEN PRINT \"big\" ELSE PRINT \"small\"",
        "30 IF X > 8 THEN PRINT \"big\" ELSE PRINT \"small\"",
        "40 IF X = 5 THEN PRINT \"five\"",
        "50 IF X = 6 THEN PRINT \"six\"",
    ]));
    assert_eq!(output, "big\nsmall\nfive\n");
}

#[test]
fn if_line_number() {
    let (output, exit_code) = run(&lines(&[
        "10 X = 5",
        "20 IF X > 3 THEN 50 ELSE 40",
        "30 PRINT \"unreachable\"",
        "40 END",
        "50 PRINT \"big\"",
    ]));
    assert_eq!(output, "big\n");
    assert_eq!(exit_code, 0);
}

#[test]
fn nested_if() {
    let (output, _) = run(&lines(&[
        "A = 1",
        "B = 0",
        "IF A THEN IF B THEN PRINT \"both\" ELSE PRINT \"a only\"",
        "PRINT \"end\"",
    ]));
    assert_eq!(output, "a only\nend\n");
}

#[test]
fn while_loop() {
    let (output, _) = run(&lines(&[
        "10 I = 0",
        "20 WHILE I < 3",
        "30 PRINT I",
        "40 I = I + 1",
        "50 WEND",
        "60 PRINT \"done\"",
    ]));
    assert_eq!(output, "0\n1\n2\ndone\n");
}

#[test]
fn while_never_entered() {
    let (output, _) = run(&lines(&[
        "WHILE 0 DO",
        "PRINT \"body\"",
        "WEND",
        "PRINT \"after\"",
    ]));
    assert_eq!(output, "after\n");
}

#[test]
fn for_loop() {
    let (output, _) = run(&lines(&[
        "10 FOR I = 1 TO 3",
        "20 PRINT I",
        "30 NEXT I",
    ]));
    assert_eq!(output, "1\n2\n3\n");
}

#[test]
fn for_loop_step() {
    let (output, _) = run(&lines(&[
        "FOR I = 1 TO 7 STEP 2",
        "PRINT I",
        "NEXT",
        "PRINT \"I=\", I",
    ]));
    assert_eq!(output, "1\n3\n5\n7\nI=9\n");
}

#[test]
fn for_loop_empty_range() {
    let (output, _) = run(&lines(&[
        "FOR I = 5 TO 1",
        "PRINT I",
        "NEXT I",
        "PRINT \"done\"",
    ]));
    assert_eq!(output, "done\n");
}

#[test]
fn nested_for() {
    let (output, _) = run(&lines(&[
        "S = 0",
        "FOR I = 1 TO 3",
        "FOR J = 1 TO 2",
        "S = S + I * J",
        "NEXT J",
        "NEXT I",
        "PRINT S",
    ]));
    assert_eq!(output, "18\n");
}

#[test]
fn for_in_while() {
    let (output, _) = run(&lines(&[
        "N = 0",
        "WHILE N < 2",
        "FOR I = 1 TO 2",
        "PRINT N, I",
        "NEXT I",
        "N = N + 1",
        "WEND",
    ]));
    assert_eq!(output, "01\n02\n11\n12\n");
}

#[test]
fn end_stops() {
    let (output, exit_code) = run(&lines(&[
        "PRINT 1",
        "END",
        "PRINT 2",
    ]));
    assert_eq!(output, "1\n");
    assert_eq!(exit_code, 0);
}

#[test]
fn empty_program() {
    let (output, exit_code) = run("");
    assert_eq!(output, "");
    assert_eq!(exit_code, 0);
}
