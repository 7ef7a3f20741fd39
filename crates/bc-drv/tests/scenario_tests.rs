//! End-to-end compilation scenarios through the real binary.
//!
//! Each test writes a bb source file, runs `bc`, and checks the
//! generated Batch script for the expected lowered fragments.

use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn bc_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bc"))
}

/// Compiles `source` and returns (script, stdout).
fn compile(source: &str) -> (String, String) {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("main.bb");
    let output = temp.path().join("main.cmd");
    fs::write(&input, source).expect("write input");

    let assert = Command::new(bc_bin())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let script = fs::read_to_string(&output).expect("read output");
    (script, stdout)
}

#[test]
fn scenario_print_string() {
    let (script, _) = compile("print(\"hello\");");
    assert!(script.contains("@echo hello\r\n"));
    assert!(!script.contains("@set "));
}

#[test]
fn scenario_constant_read_has_no_unused_warning() {
    let (script, stdout) = compile("x :: 3; print(x);");
    assert!(script.contains("@set x=3\r\n"));
    assert!(script.contains("@echo %x%\r\n"));
    assert!(!stdout.contains("Unused constant: x"));
}

#[test]
fn scenario_unread_constant_warns() {
    let (_, stdout) = compile("x :: 3;");
    assert!(stdout.contains("Unused constant: x"));
}

#[test]
fn scenario_arithmetic_declaration() {
    let (script, _) = compile("x := 1; y := x + 2; print(y);");
    assert!(script.contains("@set x=1\r\n"));
    assert!(script.contains("@set /a y=%x%+2\r\n"));
    assert!(script.contains("@echo %y%\r\n"));
}

#[test]
fn scenario_if_else() {
    let (script, _) = compile("x := 1; if (x == 1) { print(\"eq\"); } else { print(\"ne\"); }");
    assert!(script.contains("@if not \"%x%\"==\"1\" goto :_else0_\r\n"));
    assert!(script.contains("@echo eq\r\n"));
    assert!(script.contains("@goto :_endif0_\r\n"));
    assert!(script.contains("\r\n:_else0_\r\n"));
    assert!(script.contains("@echo ne\r\n"));
    assert!(script.contains("\r\n:_endif0_\r\n"));
}

#[test]
fn scenario_while_loop() {
    let (script, _) = compile("i := 0; while (i != 3) { i = i + 1; } print(i);");
    assert!(script.contains("\r\n:_while0_\r\n"));
    assert!(script.contains("@if not \"%i%\" NEQ \"3\" goto :_endwhile0_\r\n"));
    assert!(script.contains("@set /a i=%i%+1\r\n"));
    assert!(script.contains("@endlocal && set \"i=%i%\"\r\n"));
    assert!(script.contains("@goto :_while0_\r\n"));
    assert!(script.contains("\r\n:_endwhile0_\r\n"));
    assert!(script.contains("@echo %i%\r\n"));
}

#[test]
fn scenario_function_declaration_and_call() {
    let (script, _) = compile("add :: func(a, b) { return a + b; } print(add(2, 3));");
    let call = script.find("@call :add 2 3\r\n").expect("call site");
    let copy = script.find("@set _ret0_=%__ret__%\r\n").expect("ret copy");
    let echo = script.find("@echo %_ret0_%\r\n").expect("use site");
    assert!(call < copy && copy < echo);

    let label = script.find("\r\n:add\r\n").expect("function label");
    assert!(echo < label, "functions come after the program body");
    assert!(script.contains("@set a=%~1\r\n"));
    assert!(script.contains("@set b=%~2\r\n"));
    assert!(script.contains("set /a \"__ret__=%a%+%b%\" && exit /b 0\r\n"));
    assert!(script.ends_with("@exit /b 0\r\n"));
}

#[test]
fn scenario_inline_batch_passthrough() {
    let (script, _) = compile("batch {  @ver  }\nprint(\"done\");");
    assert!(script.contains("@ver\r\n"));
    assert!(script.contains("@echo done\r\n"));
}

#[test]
fn prologue_and_epilogue_are_present() {
    let (script, _) = compile("print(\"x\");");
    assert!(script.starts_with("@setlocal EnableDelayedExpansion\r\n@pushd \"%~dp0\"\r\n"));
    assert!(script.contains("\r\n@popd\r\n@endlocal\r\n@exit /b 0\r\n"));
}

#[test]
fn output_has_crlf_line_endings_only() {
    let (script, _) = compile("x := 1; print(x);");
    let bytes = script.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            assert!(i > 0 && bytes[i - 1] == b'\r', "bare LF at byte {i}");
        }
    }
}

#[test]
fn identical_inputs_give_byte_identical_outputs() {
    let source = "x := 1; while (x != 4) { x = x + 1; } \
                  double :: func(n) { return n * 2; } print(double(x));";
    let (first, _) = compile(source);
    let (second, _) = compile(source);
    assert_eq!(first, second);
}

#[test]
fn warning_texts_match_the_reference_compiler() {
    let (_, stdout) = compile(
        "x :: 1; x = 2; y = 3; z := 4; z :: 5; print(missing); print(x); print(z);",
    );
    assert!(stdout.contains("Assignment to constant: x"));
    assert!(stdout.contains("Assignment to undeclared name: y"));
    assert!(stdout.contains("Double declaration of: z"));
    assert!(stdout.contains("Referring to undeclared name: missing"));
}
