#[cfg(test)]
mod environment_tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use loxwalk::environment::Environment;
    use loxwalk::token::{Token, TokenType};
    use loxwalk::value::Value;

    fn ident(name: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, name, 7)
    }

    fn chain() -> (Rc<RefCell<Environment>>, Rc<RefCell<Environment>>) {
        let global = Rc::new(RefCell::new(Environment::new()));
        let local = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(&global))));

        (global, local)
    }

    #[test]
    fn test_environment_01_get_walks_outward() {
        let (global, local) = chain();
        global.borrow_mut().define("a", Value::Number(1.0));

        assert_eq!(local.borrow().get(&ident("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_environment_02_define_writes_innermost() {
        let (global, local) = chain();
        global.borrow_mut().define("a", Value::Number(1.0));
        local.borrow_mut().define("a", Value::Number(2.0));

        assert_eq!(local.borrow().get(&ident("a")).unwrap(), Value::Number(2.0));
        assert_eq!(global.borrow().get(&ident("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn test_environment_03_assign_updates_nearest_binding() {
        let (global, local) = chain();
        global.borrow_mut().define("a", Value::Nil);

        let assigned = local
            .borrow_mut()
            .assign(&ident("a"), Value::String("x".into()))
            .unwrap();

        assert_eq!(assigned, Value::String("x".into()));
        assert_eq!(
            global.borrow().get(&ident("a")).unwrap(),
            Value::String("x".into())
        );
    }

    #[test]
    fn test_environment_04_assign_never_creates() {
        let (_global, local) = chain();

        let err = local
            .borrow_mut()
            .assign(&ident("missing"), Value::Bool(true))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "[line 7] Error at 'missing': Undefined variable 'missing'."
        );
        assert!(local.borrow().get(&ident("missing")).is_err());
    }

    #[test]
    fn test_environment_05_get_at_does_not_search() {
        let (global, local) = chain();
        global.borrow_mut().define("a", Value::Number(1.0));

        assert_eq!(
            Environment::get_at(&local, 1, &ident("a")).unwrap(),
            Value::Number(1.0)
        );

        // Distance 0 is the local scope only, even though `a` exists further out.
        assert!(Environment::get_at(&local, 0, &ident("a")).is_err());
    }

    #[test]
    fn test_environment_06_assign_at_targets_exact_scope() {
        let (global, local) = chain();
        global.borrow_mut().define("a", Value::Number(1.0));
        local.borrow_mut().define("a", Value::Number(2.0));

        Environment::assign_at(&local, 1, &ident("a"), Value::Number(3.0)).unwrap();

        assert_eq!(global.borrow().get(&ident("a")).unwrap(), Value::Number(3.0));
        assert_eq!(local.borrow().get(&ident("a")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn test_environment_07_ancestor_past_the_root() {
        let (_global, local) = chain();

        assert!(Environment::ancestor(&local, 1).is_some());
        assert!(Environment::ancestor(&local, 2).is_none());
    }
}
