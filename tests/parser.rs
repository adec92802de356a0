#[cfg(test)]
mod parser_tests {
    use loxwalk::ast_printer::AstPrinter;
    use loxwalk::diagnostics::Diagnostics;
    use loxwalk::expr::{Expr, LiteralValue};
    use loxwalk::parser::Parser;
    use loxwalk::scanner::scan_tokens;
    use loxwalk::stmt::Stmt;

    fn parse_program(source: &str) -> (Vec<Stmt>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens(source, &mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);

        (statements, diagnostics)
    }

    fn print_expression(source: &str) -> String {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens(source, &mut diagnostics);
        let expr = Parser::new(tokens)
            .parse_expression(&mut diagnostics)
            .unwrap_or_else(|| panic!("failed to parse {:?}", source));

        AstPrinter.print(&expr)
    }

    fn messages(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics.errors().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_parser_01_precedence() {
        assert_eq!(print_expression("1 + 2 * 3"), "(+ 1.0 (* 2.0 3.0))");
        assert_eq!(print_expression("(1 + 2) * 3"), "(* (group (+ 1.0 2.0)) 3.0)");
        assert_eq!(print_expression("1 < 2 == true"), "(== (< 1.0 2.0) true)");
        assert_eq!(print_expression("a or b and c"), "(or a (and b c))");
    }

    #[test]
    fn test_parser_02_exponent_folds_left() {
        assert_eq!(print_expression("2 ^ 3 ^ 2"), "(^ (^ 2.0 3.0) 2.0)");
        assert_eq!(print_expression("2 * 3 ^ 2"), "(* 2.0 (^ 3.0 2.0))");
    }

    #[test]
    fn test_parser_03_ternary() {
        assert_eq!(
            print_expression("a == b ? 1 : 2"),
            "(?: (== a b) 1.0 2.0)"
        );
        assert_eq!(
            print_expression("x and y ? \"t\" : \"f\""),
            "(and x (?: y t f))"
        );
    }

    #[test]
    fn test_parser_04_unary_and_calls() {
        assert_eq!(print_expression("!!x"), "(! (! x))");
        assert_eq!(print_expression("-(1)"), "(- (group 1.0))");
        assert_eq!(
            print_expression("f(1)(2, 3)"),
            "(call (call f 1.0) 2.0 3.0)"
        );
        assert_eq!(print_expression("clock()"), "(call clock)");
    }

    #[test]
    fn test_parser_05_assignment_is_right_associative() {
        assert_eq!(print_expression("a = b = 3"), "(= a (= b 3.0))");
    }

    #[test]
    fn test_parser_06_invalid_assignment_target_is_not_fatal() {
        let (statements, diagnostics) = parse_program("1 = 2; print 3;");

        assert_eq!(statements.len(), 2);
        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at '=': Invalid assignment target."]
        );
        assert!(matches!(
            statements[0],
            Stmt::Expression(Expr::Literal(LiteralValue::Number(n))) if n == 1.0
        ));
    }

    #[test]
    fn test_parser_07_for_desugars_to_while() {
        let (statements, diagnostics) =
            parse_program("for (var i = 0; i < 3; i = i + 1) print i;");

        assert!(diagnostics.is_empty());
        assert_eq!(statements.len(), 1);

        let Stmt::Block(outer) = &statements[0] else {
            panic!("expected block, got {:?}", statements[0]);
        };
        assert_eq!(outer.len(), 2);
        assert!(matches!(outer[0], Stmt::Var { .. }));

        let Stmt::While { condition, body } = &outer[1] else {
            panic!("expected while, got {:?}", outer[1]);
        };
        assert_eq!(AstPrinter.print(condition), "(< i 3.0)");

        let Stmt::Block(inner) = body.as_ref() else {
            panic!("expected block body, got {:?}", body);
        };
        assert!(matches!(inner[0], Stmt::Print(_)));
        assert!(matches!(inner[1], Stmt::Expression(Expr::Assign { .. })));
    }

    #[test]
    fn test_parser_08_for_without_clauses() {
        let (statements, diagnostics) = parse_program("for (;;) print 1;");

        assert!(diagnostics.is_empty());

        let Stmt::While { condition, body } = &statements[0] else {
            panic!("expected bare while, got {:?}", statements[0]);
        };
        assert_eq!(*condition, Expr::Literal(LiteralValue::True));
        assert!(matches!(body.as_ref(), Stmt::Print(_)));
    }

    #[test]
    fn test_parser_09_recovers_at_statement_boundary() {
        let (statements, diagnostics) = parse_program("var = 1; print 2;\nprint (3;\nprint 4;");

        assert_eq!(statements.len(), 2);
        assert!(statements.iter().all(|s| matches!(s, Stmt::Print(_))));
        assert_eq!(
            messages(&diagnostics),
            vec![
                "[line 1] Error at '=': Expect variable name.",
                "[line 2] Error at ';': Expect ')' after expression.",
            ]
        );
    }

    #[test]
    fn test_parser_10_error_at_end() {
        let (statements, diagnostics) = parse_program("print 1");

        assert!(statements.is_empty());
        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at end: Expect ';' after value."]
        );
    }

    #[test]
    fn test_parser_11_dangling_else_binds_to_nearest_if() {
        let (statements, _) = parse_program("if (a) if (b) print 1; else print 2;");

        let Stmt::If {
            then_branch,
            else_branch,
            ..
        } = &statements[0]
        else {
            panic!("expected if");
        };

        assert!(else_branch.is_none());
        assert!(matches!(
            then_branch.as_ref(),
            Stmt::If {
                else_branch: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_parser_12_functions_and_lambdas() {
        let (statements, diagnostics) = parse_program(
            "fun add(a, b) { return a + b; }\nvar f = fun (x) { print x; };",
        );

        assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));

        let Stmt::Function(decl) = &statements[0] else {
            panic!("expected function");
        };
        assert_eq!(decl.name.as_ref().map(|t| t.lexeme.as_str()), Some("add"));
        assert_eq!(decl.params.len(), 2);
        assert!(matches!(decl.body[0], Stmt::Return { .. }));

        let Stmt::Var {
            initializer: Some(Expr::Lambda(lambda)),
            ..
        } = &statements[1]
        else {
            panic!("expected lambda initializer, got {:?}", statements[1]);
        };
        assert!(lambda.name.is_none());
        assert_eq!(lambda.params[0].lexeme, "x");
    }

    #[test]
    fn test_parser_13_too_many_arguments_is_reported() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});", args.join(", "));

        let (statements, diagnostics) = parse_program(&source);

        assert_eq!(statements.len(), 1);
        assert_eq!(diagnostics.errors().count(), 1);
        assert!(messages(&diagnostics)[0].contains("Can't have more than 255 arguments."));
    }

    #[test]
    fn test_parser_14_too_many_parameters_is_reported() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        let (statements, diagnostics) = parse_program(&source);

        assert_eq!(statements.len(), 1);
        assert!(messages(&diagnostics)[0].contains("Can't have more than 255 parameters."));
    }

    #[test]
    fn test_parser_15_expression_must_consume_everything() {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens("1 2", &mut diagnostics);

        assert!(Parser::new(tokens)
            .parse_expression(&mut diagnostics)
            .is_none());
        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at '2': Expect end of expression."]
        );
    }

    #[test]
    fn test_parser_16_reserved_words_are_not_expressions() {
        let (statements, diagnostics) = parse_program("class Foo {} print 1;");

        assert_eq!(statements.len(), 1);
        assert_eq!(
            messages(&diagnostics),
            vec!["[line 1] Error at 'class': Expect expression."]
        );
    }
}
