#[cfg(test)]
mod interpreter_tests {
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    use loxwalk::runner::{Lox, Outcome};

    /// In-memory `print` sink the test keeps a handle to.
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn session() -> (Lox, SharedBuf) {
        let buf = SharedBuf::default();
        let lox = Lox::with_output(Box::new(buf.clone()));

        (lox, buf)
    }

    fn errors(lox: &Lox) -> Vec<String> {
        lox.diagnostics().errors().map(|e| e.to_string()).collect()
    }

    /// Run a program and return its outcome and printed output.
    fn run(source: &str) -> (Outcome, String) {
        let (mut lox, buf) = session();
        let outcome = lox.run(source);

        (outcome, buf.contents())
    }

    fn run_ok(source: &str) -> String {
        let (mut lox, buf) = session();
        let outcome = lox.run(source);

        assert_eq!(outcome, Outcome::Success, "errors: {:?}", errors(&lox));

        buf.contents()
    }

    fn run_err(source: &str) -> (Outcome, String, Vec<String>) {
        let (mut lox, buf) = session();
        let outcome = lox.run(source);

        (outcome, buf.contents(), errors(&lox))
    }

    #[test]
    fn test_interpreter_01_precedence() {
        assert_eq!(run_ok("print 1 + 2 * 3;"), "7\n");
        assert_eq!(run_ok("print (1 + 2) * 3;"), "9\n");
    }

    #[test]
    fn test_interpreter_02_exponent_is_left_associative() {
        assert_eq!(run_ok("print 2 ^ 3 ^ 2;"), "64\n");
        assert_eq!(run_ok("var x = -3; print x ^ 2;"), "9\n");
    }

    #[test]
    fn test_interpreter_03_block_scoping() {
        assert_eq!(
            run_ok("var a = 1; { var a = 2; print a; } print a;"),
            "2\n1\n"
        );
    }

    #[test]
    fn test_interpreter_04_closure_counter() {
        let source = "fun make() { var i = 0; fun inc() { i = i + 1; return i; } return inc; } \
                      var c = make(); print c(); print c();";

        assert_eq!(run_ok(source), "1\n2\n");
    }

    #[test]
    fn test_interpreter_05_closures_share_captured_scope() {
        let source = r#"
            var inc;
            var get;
            fun make() {
                var n = 0;
                fun i() { n = n + 1; }
                fun g() { return n; }
                inc = i;
                get = g;
            }
            make();
            inc();
            inc();
            print get();
        "#;

        assert_eq!(run_ok(source), "2\n");
    }

    #[test]
    fn test_interpreter_06_static_binding_ignores_later_shadow() {
        let source = r#"
            var a = "global";
            {
                fun show() { print a; }
                show();
                var a = "block";
                show();
            }
        "#;

        assert_eq!(run_ok(source), "global\nglobal\n");
    }

    #[test]
    fn test_interpreter_07_nested_closure_distance() {
        let source = r#"
            fun outer() {
                var x = "outer";
                fun middle() {
                    fun inner() { print x; }
                    return inner;
                }
                return middle();
            }
            outer()();
        "#;

        assert_eq!(run_ok(source), "outer\n");
    }

    #[test]
    fn test_interpreter_08_cross_type_equality() {
        assert_eq!(run_ok("print 1 == \"1\";"), "false\n");
        assert_eq!(run_ok("print nil == false;"), "false\n");
        assert_eq!(run_ok("print nil == nil;"), "true\n");
        assert_eq!(run_ok("print \"a\" != \"a\";"), "false\n");
        assert_eq!(run_ok("fun f() {} print f == f;"), "true\n");
    }

    #[test]
    fn test_interpreter_09_calling_a_non_callable() {
        let (outcome, output, errors) = run_err("var x = 1; x(); print 2;");

        assert_eq!(outcome, Outcome::RuntimeError);
        assert_eq!(output, "");
        assert_eq!(
            errors,
            vec!["[line 1] Error at ')': Can only call functions and classes."]
        );
    }

    #[test]
    fn test_interpreter_10_static_errors_prevent_execution() {
        let (outcome, output) = run("print 0; { var a = 1; var a = 2; }");
        assert_eq!(outcome, Outcome::StaticError);
        assert_eq!(output, "");

        let (outcome, output) = run("print 0; return 1;");
        assert_eq!(outcome, Outcome::StaticError);
        assert_eq!(output, "");

        let (outcome, output) = run("print 0; print ;");
        assert_eq!(outcome, Outcome::StaticError);
        assert_eq!(output, "");
    }

    #[test]
    fn test_interpreter_11_division() {
        assert_eq!(run_ok("print 10 / 4;"), "2.5\n");
        assert_eq!(run_ok("print 10 / 2;"), "5\n");
        assert_eq!(run_ok("print 1 / 0;"), "inf\n");
    }

    #[test]
    fn test_interpreter_12_truthiness() {
        assert_eq!(
            run_ok("print !0; print !\"\"; print !nil; print !false;"),
            "false\nfalse\ntrue\ntrue\n"
        );
    }

    #[test]
    fn test_interpreter_13_logical_operators_return_operands() {
        assert_eq!(
            run_ok("print nil or \"x\"; print 1 and 2; print false and boom; print 0 or boom;"),
            "x\n2\nfalse\n0\n"
        );
    }

    #[test]
    fn test_interpreter_14_ternary_evaluates_one_branch() {
        assert_eq!(run_ok("print 1 < 2 ? \"yes\" : \"no\";"), "yes\n");
        assert_eq!(run_ok("print true ? 1 : missing;"), "1\n");
        assert_eq!(run_ok("print nil ? missing : 2;"), "2\n");
    }

    #[test]
    fn test_interpreter_15_type_errors() {
        let (_, _, errors) = run_err("print \"a\" + 1;");
        assert_eq!(
            errors,
            vec!["[line 1] Error at '+': Operands must be two numbers or two strings."]
        );

        let (_, _, errors) = run_err("print -\"a\";");
        assert_eq!(errors, vec!["[line 1] Error at '-': Operand must be a number."]);

        let (_, _, errors) = run_err("print 1 < \"a\";");
        assert_eq!(errors, vec!["[line 1] Error at '<': Operands must be numbers."]);

        let (_, _, errors) = run_err("print 2 ^ nil;");
        assert_eq!(errors, vec!["[line 1] Error at '^': Operands must be numbers."]);
    }

    #[test]
    fn test_interpreter_16_string_concatenation() {
        assert_eq!(run_ok("var s = \"foo\"; print s + \"bar\";"), "foobar\n");
    }

    #[test]
    fn test_interpreter_17_arity_mismatch() {
        let (outcome, _, errors) = run_err("fun f(a) {}\nf(1, 2);");
        assert_eq!(outcome, Outcome::RuntimeError);
        assert_eq!(
            errors,
            vec!["[line 2] Error at ')': Expected 1 argument but got 2."]
        );

        let (_, _, errors) = run_err("fun g(a, b) {} g(1);");
        assert_eq!(
            errors,
            vec!["[line 1] Error at ')': Expected 2 arguments but got 1."]
        );

        let (_, _, errors) = run_err("clock(1);");
        assert_eq!(
            errors,
            vec!["[line 1] Error at ')': Expected 0 arguments but got 1."]
        );
    }

    #[test]
    fn test_interpreter_18_undefined_variable() {
        let (_, _, errors) = run_err("print y;");
        assert_eq!(errors, vec!["[line 1] Error at 'y': Undefined variable 'y'."]);

        let (_, _, errors) = run_err("z = 1;");
        assert_eq!(errors, vec!["[line 1] Error at 'z': Undefined variable 'z'."]);
    }

    #[test]
    fn test_interpreter_19_runtime_error_halts_the_run() {
        let (outcome, output, _) = run_err("print 1; print nope; print 3;");

        assert_eq!(outcome, Outcome::RuntimeError);
        assert_eq!(output, "1\n");

        let (outcome, output, _) =
            run_err("fun f() { return 1 + nil; } print f(); print \"after\";");

        assert_eq!(outcome, Outcome::RuntimeError);
        assert_eq!(output, "");
    }

    #[test]
    fn test_interpreter_20_recursion() {
        let source = "fun fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2); } print fib(10);";

        assert_eq!(run_ok(source), "55\n");
    }

    #[test]
    fn test_interpreter_21_loops() {
        assert_eq!(
            run_ok("var s = 0; for (var i = 0; i < 5; i = i + 1) s = s + i; print s;"),
            "10\n"
        );
        assert_eq!(
            run_ok("var i = 3; while (i > 0) { print i; i = i - 1; }"),
            "3\n2\n1\n"
        );
    }

    #[test]
    fn test_interpreter_22_return_unwinds_loops_and_blocks() {
        let source = r#"
            fun first() {
                var i = 0;
                while (true) {
                    {
                        if (i == 3) return i;
                    }
                    i = i + 1;
                }
                print "unreachable";
            }
            print first();
        "#;

        assert_eq!(run_ok(source), "3\n");
    }

    #[test]
    fn test_interpreter_23_implicit_nil_return() {
        assert_eq!(run_ok("fun f() {} print f();"), "nil\n");
        assert_eq!(run_ok("fun g() { return; } print g();"), "nil\n");
    }

    #[test]
    fn test_interpreter_24_lambdas() {
        assert_eq!(
            run_ok("var add = fun (a, b) { return a + b; }; print add(2, 3);"),
            "5\n"
        );
        assert_eq!(run_ok("print fun (x) { return x * 2; }(21);"), "42\n");
        assert_eq!(
            run_ok("fun twice(f, x) { return f(f(x)); } print twice(fun (n) { return n + 1; }, 5);"),
            "7\n"
        );
    }

    #[test]
    fn test_interpreter_25_value_rendering() {
        assert_eq!(
            run_ok("fun f() {} print f; print clock; print fun () {};"),
            "<fn f>\n<native fn clock>\n<anonymous fn>\n"
        );
        assert_eq!(
            run_ok("print nil; print true; print 3.14; print -0.5 * 2;"),
            "nil\ntrue\n3.14\n-1\n"
        );
    }

    #[test]
    fn test_interpreter_26_clock() {
        assert_eq!(run_ok("print clock() > 0;"), "true\n");
    }

    #[test]
    fn test_interpreter_27_session_keeps_globals() {
        let (mut lox, buf) = session();

        assert_eq!(lox.run("var a = 1; fun bump() { a = a + 1; return a; }"), Outcome::Success);
        assert_eq!(lox.run("print bump();"), Outcome::Success);
        assert_eq!(buf.contents(), "2\n");
    }

    #[test]
    fn test_interpreter_28_reset_between_lines() {
        let (mut lox, buf) = session();

        assert_eq!(lox.run("print ;"), Outcome::StaticError);
        assert!(lox.diagnostics().had_error());

        lox.reset();

        assert!(lox.diagnostics().is_empty());
        assert_eq!(lox.run("print 2;"), Outcome::Success);
        assert_eq!(buf.contents(), "2\n");
    }

    #[test]
    fn test_interpreter_29_evaluate_expression() {
        let (mut lox, buf) = session();

        assert_eq!(lox.evaluate("1 + 2 * 3"), Outcome::Success);
        assert_eq!(buf.contents(), "7\n");

        let (mut lox, _) = session();
        assert_eq!(lox.evaluate("\"a\" + 1"), Outcome::RuntimeError);

        let (mut lox, _) = session();
        assert_eq!(lox.evaluate("(1 +"), Outcome::StaticError);
    }

    #[test]
    fn test_interpreter_30_exit_codes() {
        assert_eq!(Outcome::Success.exit_code(), 0);
        assert_eq!(Outcome::StaticError.exit_code(), 65);
        assert_eq!(Outcome::RuntimeError.exit_code(), 70);
    }

    #[test]
    fn test_interpreter_31_large_numbers_switch_to_exponent_form() {
        assert_eq!(run_ok("print 1000000000000000;"), "1000000000000000\n");
        assert_eq!(run_ok("print 100000000000000000000000;"), "1.0e+23\n");
        assert_eq!(run_ok("print 25000000000000000;"), "2.5e+16\n");
        assert_eq!(run_ok("print -100000000000000000000;"), "-1.0e+20\n");
    }

    #[test]
    fn test_interpreter_32_closures_from_earlier_runs_keep_their_bindings() {
        let (mut lox, buf) = session();

        let defined = lox.run(
            "fun counter() { var n = 0; fun inc() { n = n + 1; return n; } return inc; } \
             var c = counter();",
        );
        assert_eq!(defined, Outcome::Success);

        assert_eq!(lox.run("print c();"), Outcome::Success);
        assert_eq!(lox.run("print c();"), Outcome::Success);
        assert_eq!(buf.contents(), "1\n2\n");
    }
}
