use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

#[test]
fn run_evaluates_an_expression() {
    let mut cmd = Command::cargo_bin("rusche").unwrap();
    cmd.args(["run", "--expr", "(+ 1 2)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3"));
}

#[test]
fn run_executes_a_source_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "; squares a number").unwrap();
    writeln!(file, "(define (square x) (* x x))").unwrap();
    writeln!(file, "(square 7)").unwrap();

    let mut cmd = Command::cargo_bin("rusche").unwrap();
    cmd.arg("run")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("49"));
}

#[test]
fn run_supports_cond_and_closures() {
    let program = "(define (make-adder x) (lambda (y) (+ x y)))
                   (define add10 (make-adder 10))
                   (cond ((= (add10 32) 42) \"ok\") (else \"broken\"))";
    let mut cmd = Command::cargo_bin("rusche").unwrap();
    cmd.args(["run", "--expr", program])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn run_reports_unbound_variables() {
    let mut cmd = Command::cargo_bin("rusche").unwrap();
    cmd.args(["run", "--expr", "(boom)"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unbound variable: boom"));
}

#[test]
fn run_reports_parse_errors() {
    let mut cmd = Command::cargo_bin("rusche").unwrap();
    cmd.args(["run", "--expr", "(define x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));
}

#[test]
fn display_prints_text_without_quotes() {
    let mut cmd = Command::cargo_bin("rusche").unwrap();
    cmd.args(["run", "--expr", "(begin (display \"hello\") (newline))"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello").and(predicate::str::contains("\"hello\"").not()));
}

#[test]
fn definitions_print_nothing() {
    let mut cmd = Command::cargo_bin("rusche").unwrap();
    cmd.args(["run", "--expr", "(define x 1)"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn missing_subcommand_prints_help() {
    let mut cmd = Command::cargo_bin("rusche").unwrap();
    cmd.assert().failure();
}
