//! Edge case tests for bc-gen.

#[cfg(test)]
mod tests {
    use crate::{generate, CodeGenError};
    use bc_lex::TokenStream;
    use bc_par::Parser;
    use bc_util::{Bump, Handler};

    fn compile(source: &str) -> String {
        let arena = Bump::new();
        let mut tokens = TokenStream::new(source);
        let program = Parser::new(&mut tokens, &arena)
            .parse_program()
            .expect("parse error");
        let handler = Handler::silent();
        generate(&program, &arena, &handler)
            .expect("codegen error")
            .to_string()
    }

    fn compile_with_warnings(source: &str) -> (String, Vec<String>) {
        let arena = Bump::new();
        let mut tokens = TokenStream::new(source);
        let program = Parser::new(&mut tokens, &arena)
            .parse_program()
            .expect("parse error");
        let handler = Handler::silent();
        let script = generate(&program, &arena, &handler)
            .expect("codegen error")
            .to_string();
        (script, handler.messages())
    }

    fn compile_err(source: &str) -> CodeGenError {
        let arena = Bump::new();
        let mut tokens = TokenStream::new(source);
        let program = Parser::new(&mut tokens, &arena)
            .parse_program()
            .expect("parse error");
        let handler = Handler::silent();
        generate(&program, &arena, &handler).expect_err("expected a codegen error")
    }

    /// Byte offset of a fragment, asserting it is present.
    fn offset(script: &str, fragment: &str) -> usize {
        match script.find(fragment) {
            Some(index) => index,
            None => panic!("missing fragment {:?} in:\n{}", fragment, script),
        }
    }

    #[test]
    fn test_edge_empty_program_is_prologue_and_epilogue() {
        assert_eq!(
            compile(""),
            "@setlocal EnableDelayedExpansion\r\n@pushd \"%~dp0\"\r\n\r\n\
             \r\n@popd\r\n@endlocal\r\n@exit /b 0\r\n"
        );
    }

    #[test]
    fn test_edge_single_declaration_full_output() {
        assert_eq!(
            compile("x := 1;"),
            "@setlocal EnableDelayedExpansion\r\n@pushd \"%~dp0\"\r\n\r\n\
             @set x=1\r\n\
             \r\n@popd\r\n@endlocal\r\n@exit /b 0\r\n"
        );
    }

    #[test]
    fn test_edge_print_string() {
        let script = compile("print(\"hello\");");
        assert!(script.contains("@echo hello\r\n"));
        assert!(!script.contains("@set "));
    }

    #[test]
    fn test_edge_print_constant_reference() {
        let script = compile("x :: 3; print(x);");
        assert!(script.contains("@set x=3\r\n"));
        assert!(script.contains("@echo %x%\r\n"));
    }

    #[test]
    fn test_edge_arithmetic_declaration_uses_slash_a() {
        let script = compile("x := 1; y := x + 2; print(y);");
        assert!(script.contains("@set x=1\r\n"));
        assert!(script.contains("@set /a y=%x%+2\r\n"));
        assert!(script.contains("@echo %y%\r\n"));
    }

    #[test]
    fn test_edge_modulo_operator_is_doubled() {
        let script = compile("x := 5 % 2;");
        assert!(script.contains("@set /a x=5%%2\r\n"));
    }

    #[test]
    fn test_edge_string_backslashes_become_carets() {
        let script = compile("print(\"a\\\"b\");");
        assert!(script.contains("@echo a^\"b\r\n"));
    }

    #[test]
    fn test_edge_multi_argument_print_is_one_echo_per_argument() {
        let script = compile("print(\"a\", \"b\");");
        assert!(script.contains("@echo a\r\n@echo b\r\n"));
    }

    #[test]
    fn test_edge_if_else_lowering() {
        let script = compile("x := 1; if (x == 1) { print(\"eq\"); } else { print(\"ne\"); }");
        let branch = offset(&script, "@if not \"%x%\"==\"1\" goto :_else0_\r\n");
        let eq = offset(&script, "@echo eq\r\n");
        let skip = offset(&script, "@goto :_endif0_\r\n");
        let else_label = offset(&script, "\r\n:_else0_\r\n");
        let ne = offset(&script, "@echo ne\r\n");
        let end = offset(&script, "\r\n:_endif0_\r\n");
        assert!(branch < eq && eq < skip && skip < else_label && else_label < ne && ne < end);
    }

    #[test]
    fn test_edge_if_without_else_branches_to_endif() {
        let script = compile("x := 1; if (x) { print(\"y\"); }");
        assert!(script.contains("@if not \"%x%\"==\"true\" goto :_endif0_\r\n"));
        assert!(script.contains("@goto :_endif0_\r\n"));
        assert!(script.contains(":_endif0_\r\n"));
    }

    #[test]
    fn test_edge_while_lowering_and_export() {
        let script = compile("i := 0; while (i != 3) { i = i + 1; } print(i);");
        let head = offset(&script, ":_while0_\r\n");
        let test = offset(&script, "@if not \"%i%\" NEQ \"3\" goto :_endwhile0_\r\n");
        let update = offset(&script, "@set /a i=%i%+1\r\n");
        let export = offset(&script, "@endlocal && set \"i=%i%\"\r\n");
        let back = offset(&script, "@goto :_while0_\r\n");
        let end = offset(&script, "\r\n:_endwhile0_\r\n");
        let echo = offset(&script, "@echo %i%\r\n");
        assert!(head < test && test < update && update < export);
        assert!(export < back && back < end && end < echo);
    }

    #[test]
    fn test_edge_function_call_and_return() {
        let script = compile("add :: func(a, b) { return a + b; } print(add(2, 3));");
        // Call site: call, return copy, use.
        let call = offset(&script, "@call :add 2 3\r\n");
        let copy = offset(&script, "@set _ret0_=%__ret__%\r\n");
        let echo = offset(&script, "@echo %_ret0_%\r\n");
        assert!(call < copy && copy < echo);
        // Function section sits below the epilogue.
        let epilogue = offset(&script, "\r\n@popd\r\n@endlocal\r\n@exit /b 0\r\n");
        let label = offset(&script, ":add\r\n");
        assert!(epilogue < label);
        let a_shim = offset(&script, "@set a=%~1\r\n");
        let b_shim = offset(&script, "@set b=%~2\r\n");
        let ret = offset(
            &script,
            "@endlocal && set /a \"__ret__=%a%+%b%\" && exit /b 0\r\n",
        );
        assert!(label < a_shim && a_shim < b_shim && b_shim < ret);
        assert!(script.ends_with("@exit /b 0\r\n"));
    }

    #[test]
    fn test_edge_bare_return_pops_the_scope() {
        let script = compile("f :: func() { return; } f();");
        assert!(script.contains("@endlocal && exit /b 0\r\n"));
        assert!(script.contains("@call :f\r\n"));
        assert!(!script.contains("_ret0_"));
    }

    #[test]
    fn test_edge_comparison_as_value_lowers_through_goto_island() {
        let script = compile("x := 1; b := x == 1; print(b);");
        let branch = offset(&script, "@if not \"%x%\"==\"1\" goto :_else0_\r\n");
        let set_true = offset(&script, "@set _tmp0_=true\r\n");
        let skip = offset(&script, "@goto :_endif0_\r\n");
        let set_false = offset(&script, "@set _tmp0_=false\r\n");
        let bind = offset(&script, "@set b=%_tmp0_%\r\n");
        assert!(branch < set_true && set_true < skip && skip < set_false && set_false < bind);
    }

    #[test]
    fn test_edge_arithmetic_argument_spills_to_temporary() {
        let script = compile("print(1 + 2);");
        let spill = offset(&script, "@set /a _tmp0_=1+2\r\n");
        let echo = offset(&script, "@echo %_tmp0_%\r\n");
        assert!(spill < echo);
    }

    #[test]
    fn test_edge_call_condition_reevaluates_inside_the_loop() {
        let script = compile("f :: func() { return 1; } while (f()) { print(\"x\"); }");
        let head = offset(&script, ":_while0_\r\n");
        let call = offset(&script, "@call :f\r\n");
        let copy = offset(&script, "@set _ret0_=%__ret__%\r\n");
        let test = offset(&script, "@if not \"%_ret0_%\"==\"true\" goto :_endwhile0_\r\n");
        assert!(head < call && call < copy && copy < test);
    }

    #[test]
    fn test_edge_nested_call_arguments_flush_in_dependency_order() {
        let script = compile("add :: func(a, b) { return a + b; } print(add(add(1, 2), 3));");
        let inner = offset(&script, "@call :add 1 2\r\n");
        let inner_copy = offset(&script, "@set _ret0_=%__ret__%\r\n");
        let outer = offset(&script, "@call :add %_ret0_% 3\r\n");
        let outer_copy = offset(&script, "@set _ret1_=%__ret__%\r\n");
        let echo = offset(&script, "@echo %_ret1_%\r\n");
        assert!(inner < inner_copy && inner_copy < outer);
        assert!(outer < outer_copy && outer_copy < echo);
    }

    #[test]
    fn test_edge_sequential_ifs_get_distinct_labels() {
        let script = compile("x := 1; if (x) { print(\"a\"); } if (x) { print(\"b\"); }");
        assert!(script.contains(":_endif0_\r\n"));
        assert!(script.contains(":_endif1_\r\n"));
    }

    #[test]
    fn test_edge_nested_whiles_get_distinct_labels() {
        let script = compile("while (1) { while (2) { print(\"x\"); } }");
        assert!(script.contains(":_while0_\r\n"));
        assert!(script.contains(":_while1_\r\n"));
        assert!(script.contains(":_endwhile0_\r\n"));
        assert!(script.contains(":_endwhile1_\r\n"));
    }

    #[test]
    fn test_edge_assignment_export_propagates_through_nested_blocks() {
        let script = compile("x := 1; { { x = 2; } } print(x);");
        let exports = script.matches("@endlocal && set \"x=%x%\"\r\n").count();
        assert_eq!(exports, 2);
    }

    #[test]
    fn test_edge_declaration_inside_block_is_not_exported() {
        let script = compile("{ y := 1; y = 2; }");
        assert!(script.contains("@endlocal\r\n"));
        assert!(!script.contains("&& set \"y=%y%\""));
    }

    #[test]
    fn test_edge_inline_batch_is_trimmed_and_verbatim() {
        let script = compile("batch {  @echo raw  }");
        assert!(script.contains("@echo raw\r\n"));
        assert!(!script.contains("  @echo raw"));
    }

    #[test]
    fn test_edge_inline_batch_trim_is_idempotent() {
        let body = "  @echo raw \t ";
        assert_eq!(body.trim(), body.trim().trim());
    }

    #[test]
    fn test_edge_statement_position_call_needs_no_return_temporary() {
        let script = compile("f :: func(n) { return n; } f(2);");
        assert!(script.contains("@call :f 2\r\n"));
        assert!(!script.contains("_ret0_"));
    }

    #[test]
    fn test_edge_bare_expression_statement_is_skipped_with_a_warning() {
        let (script, warnings) = compile_with_warnings("x := 1; x;");
        assert!(script.contains("@set x=1\r\n"));
        assert_eq!(warnings, vec!["Skipped expression statement: Ident(x)"]);
    }

    #[test]
    fn test_edge_function_in_expression_position_is_fatal() {
        assert_eq!(
            compile_err("print(func() { return 1; });"),
            CodeGenError::FunctionInExpression
        );
    }

    #[test]
    fn test_edge_nested_function_declaration_is_fatal() {
        assert_eq!(
            compile_err("{ f :: func() { return 1; } }"),
            CodeGenError::NestedFunction
        );
    }

    #[test]
    fn test_edge_output_is_deterministic() {
        let source = "x := 1; while (x != 5) { x = x + 1; if (x == 3) { print(x); } } \
                      f :: func(a) { return a * 2; } print(f(x));";
        assert_eq!(compile(source), compile(source));
    }

    #[test]
    fn test_edge_every_goto_target_has_a_label() {
        let source = "x := 1; if (x == 1) { print(\"a\"); } else { print(\"b\"); } \
                      while (x != 9) { x = x + 1; }";
        let script = compile(source);
        for line in script.lines() {
            if let Some(rest) = line.strip_prefix("@goto :") {
                let label = format!("\r\n:{}\r\n", rest);
                assert!(
                    script.contains(&label),
                    "goto target {rest} has no label in:\n{script}"
                );
            }
        }
    }

    #[test]
    fn test_edge_crlf_line_endings_throughout() {
        let script = compile("x := 1; print(x);");
        for (i, b) in script.bytes().enumerate() {
            if b == b'\n' {
                assert_eq!(script.as_bytes()[i - 1], b'\r', "bare LF at byte {i}");
            }
        }
    }
}
