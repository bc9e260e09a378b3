//! End-to-end execution tests.

#[cfg(test)]
mod tests {
    use crate::bytecode::{Chunk, OpCode};
    use crate::span::Span;
    use crate::vm::Vm;
    use pretty_assertions::assert_eq;

    fn run_output(source: &str) -> String {
        crate::run_with_output(source, "test").unwrap()
    }

    fn run_error(source: &str) -> String {
        crate::run_with_output(source, "test").unwrap_err().to_string()
    }

    #[test]
    fn test_put_writes_without_newline() {
        assert_eq!(run_output("put 1; put 2;"), "12");
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(run_output(""), "");
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(run_output("put 2 + 3 * 4;"), "14");
    }

    #[test]
    fn test_subtraction_operand_order() {
        assert_eq!(run_output("put 10 - 3;"), "7");
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        assert_eq!(run_output("put 7 / 2;"), "3");
        assert_eq!(run_output("put -7 / 2;"), "-3");
    }

    #[test]
    fn test_modulo_keeps_dividend_sign() {
        assert_eq!(run_output("put 7 % 3;"), "1");
        assert_eq!(run_output("put -7 % 3;"), "-1");
    }

    #[test]
    fn test_power() {
        assert_eq!(run_output("put 2 ^ 10;"), "1024");
        // Right associative: 2 ^ (3 ^ 2)
        assert_eq!(run_output("put 2 ^ 3 ^ 2;"), "512");
    }

    #[test]
    fn test_division_by_zero() {
        assert!(run_error("put 1 / 0;").contains("Division by zero"));
        assert!(run_error("put 1 % 0;").contains("Division by zero"));
    }

    #[test]
    fn test_negative_exponent() {
        assert!(run_error("put 2 ^ -1;").contains("Negative exponent"));
    }

    #[test]
    fn test_addition_overflow_wraps() {
        assert_eq!(
            run_output("put 9223372036854775807 + 1;"),
            "-9223372036854775808"
        );
    }

    #[test]
    fn test_numeric_strings_coerce() {
        assert_eq!(run_output("put \"2\" + 3;"), "5");
        assert_eq!(run_output("put \"10\" * \"10\";"), "100");
        assert_eq!(run_output("put -\"4\";"), "-4");
    }

    #[test]
    fn test_non_numeric_string_rejected() {
        assert!(run_error("put \"a\" + 1;").contains("cannot add non-integer string"));
        assert!(run_error("put 1 - \"x\";").contains("cannot subtract non-integer string"));
    }

    #[test]
    fn test_concat() {
        assert_eq!(run_output("put \"ab\" & \"cd\";"), "abcd");
        assert_eq!(run_output("put 1 & 2;"), "12");
        assert_eq!(run_output("put \"n=\" & 1 + 2;"), "n=3");
    }

    #[test]
    fn test_diff_is_symmetric_and_ordered() {
        assert_eq!(run_output("put \"abc\" ~ \"b\";"), "ac");
        assert_eq!(run_output("put \"abc\" ~ \"bd\";"), "acd");
        assert_eq!(run_output("put \"x\" ~ \"x\";"), "");
    }

    #[test]
    fn test_comparisons_produce_truth_strings() {
        assert_eq!(run_output("put 2 > 1;"), "true");
        assert_eq!(run_output("put 1 > 2;"), "");
        assert_eq!(run_output("put 3 <= 3;"), "true");
    }

    #[test]
    fn test_mixed_comparison_coerces_to_int() {
        // "10" against an int compares numerically
        assert_eq!(run_output("put \"10\" < 9;"), "");
        // both strings compare lexicographically
        assert_eq!(run_output("put \"10\" < \"9\";"), "true");
    }

    #[test]
    fn test_equality() {
        assert_eq!(run_output("put 1 == 1;"), "true");
        assert_eq!(run_output("put 1 != 2;"), "true");
        assert_eq!(run_output("put \"5\" == 5;"), "true");
        assert_eq!(run_output("put \"a\" == \"b\";"), "");
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(run_output("put 1 && \"\";"), "");
        assert_eq!(run_output("put \"\" || \"yes\";"), "true");
        assert_eq!(run_output("put !\"\";"), "true");
        assert_eq!(run_output("put !1;"), "");
    }

    #[test]
    fn test_zero_is_truthy() {
        // 0 stringifies to "0", which is non-empty
        assert_eq!(run_output("put !0;"), "");
        assert_eq!(run_output("put 0 && 1;"), "true");
    }

    #[test]
    fn test_variables() {
        assert_eq!(run_output("x = 4; put x + 1;"), "5");
    }

    #[test]
    fn test_multi_assignment_swaps() {
        assert_eq!(run_output("a, b = 1, 2; a, b = b, a; put a; put b;"), "21");
    }

    #[test]
    fn test_read_before_first_assignment() {
        assert!(run_error("x = x + 1;").contains("Undefined variable"));
    }

    #[test]
    fn test_undefined_variable() {
        assert!(run_error("put ghost;").contains("Undefined variable"));
    }

    #[test]
    fn test_function_call() {
        assert_eq!(
            run_output("fn add(a, b) { return a + b; } put add(2, 3);"),
            "5"
        );
    }

    #[test]
    fn test_arguments_bind_in_declaration_order() {
        assert_eq!(
            run_output("fn pair(a, b) { return a & b; } put pair(1, 2);"),
            "12"
        );
    }

    #[test]
    fn test_function_locals() {
        assert_eq!(
            run_output("fn f(x) { y = x * 2; return y + 1; } put f(3);"),
            "7"
        );
    }

    #[test]
    fn test_sibling_call() {
        assert_eq!(
            run_output("fn one() { return 1; } fn two() { return one() + 1; } put two();"),
            "2"
        );
    }

    #[test]
    fn test_nested_function_sees_earlier_siblings() {
        let source = "fn a() { return 7; } fn b() { fn c() { return a(); } return c(); } put b();";
        assert_eq!(run_output(source), "7");
    }

    #[test]
    fn test_redeclaration_rebinds_later_call_sites() {
        let source = "fn f() { return 1; } put f(); fn f() { return 2; } put f();";
        assert_eq!(run_output(source), "12");
    }

    #[test]
    fn test_functions_do_not_capture_caller_variables() {
        assert!(run_error("x = 1; fn f() { return x; } put f();").contains("Undefined variable"));
    }

    #[test]
    fn test_unknown_function_fails_at_dispatch() {
        assert!(run_error("put missing();").contains("Unknown function"));
    }

    #[test]
    fn test_self_call_is_not_visible() {
        assert!(run_error("fn f(n) { return f(n - 1); } put f(3);").contains("Unknown function"));
    }

    #[test]
    fn test_arity_mismatch() {
        let message = run_error("fn id(x) { return x; } put id(1, 2);");
        assert!(message.contains("Wrong number of arguments"));
    }

    #[test]
    fn test_arity_mismatch_leaves_callee_unexecuted() {
        let source = "fn shout(x) { put \"ran\"; return x; } put shout(1, 2);";
        let chunk = crate::compile(source, "test").unwrap();
        let mut vm = Vm::with_output(Vec::new());
        let err = vm.interpret(&chunk).unwrap_err();
        assert!(err.to_string().contains("Wrong number of arguments"));
        assert!(vm.into_output().is_empty());
    }

    #[test]
    fn test_runtime_error_carries_position() {
        assert!(run_error("put 1 / 0;").contains("test:1:7"));
    }

    #[test]
    fn test_string_escapes_reach_output() {
        assert_eq!(run_output("put \"a\\nb\";"), "a\nb");
    }

    #[test]
    fn test_comments_are_ignored() {
        assert_eq!(run_output("put 1; // line\n/* block */ put 2;"), "12");
    }

    #[test]
    fn test_unrecognized_opcode() {
        let mut chunk = Chunk::new();
        chunk.code.push(99);
        chunk.code.push(0);
        let mut vm = Vm::with_output(Vec::new());
        let err = vm.interpret(&chunk).unwrap_err();
        assert!(err.to_string().contains("Unrecognized opcode 99"));
    }

    #[test]
    fn test_stack_underflow_is_corrupt_bytecode() {
        let mut chunk = Chunk::new();
        chunk.write(OpCode::Add, 0, Span::default());
        let mut vm = Vm::with_output(Vec::new());
        let err = vm.interpret(&chunk).unwrap_err();
        assert!(err.to_string().contains("Corrupt bytecode"));
    }
}
