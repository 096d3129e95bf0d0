#[cfg(test)]
mod tests {
    use crate::error::{Result, TransformError};
    use crate::transform::{rebuild, transform, Identity, Transform};
    use exprkit_core::builder::*;
    use exprkit_core::{BinaryOp, Expr, Form, Kind, UnaryOp, Value};

    /// Only understands integer terminals and `+`
    struct Adder;

    impl Transform for Adder {
        type Output = i64;

        fn terminal(&mut self, _expr: &Expr, value: &Value) -> Result<i64> {
            Ok(value.as_integer()?)
        }

        fn binary(&mut self, expr: &Expr, op: BinaryOp, left: &Expr, right: &Expr) -> Result<i64> {
            match op {
                BinaryOp::Plus => Ok(self.transform(left)? + self.transform(right)?),
                _ => self.compound(expr),
            }
        }
    }

    /// Records the hook each node reached
    #[derive(Default)]
    struct HookLog {
        hooks: Vec<&'static str>,
    }

    impl Transform for HookLog {
        type Output = ();

        fn placeholder(&mut self, _expr: &Expr, _index: u32) -> Result<()> {
            self.hooks.push("placeholder");
            Ok(())
        }

        fn terminal(&mut self, _expr: &Expr, _value: &Value) -> Result<()> {
            self.hooks.push("terminal");
            Ok(())
        }

        fn unary(&mut self, _expr: &Expr, _op: UnaryOp, operand: &Expr) -> Result<()> {
            self.hooks.push("unary");
            self.transform(operand)
        }

        fn compound(&mut self, expr: &Expr) -> Result<()> {
            self.hooks.push("compound");
            for child in expr.children() {
                self.transform(child)?;
            }
            Ok(())
        }
    }

    #[test]
    fn test_handler_sums_tree() {
        let expr = terminal(1) + 2 + 3 + 4;
        assert_eq!(transform(&expr, &mut Adder).unwrap(), 10);
    }

    #[test]
    fn test_missing_call_hook_is_dispatch_failure() {
        let expr = symbol("f").call([1]);
        match transform(&expr, &mut Adder) {
            Err(TransformError::DispatchFailure { kind }) => assert_eq!(kind, Kind::Call),
            other => panic!("Expected dispatch failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unclaimed_terminal_is_dispatch_failure() {
        struct Nothing;
        impl Transform for Nothing {
            type Output = ();
        }

        assert!(matches!(
            transform(&terminal(1), &mut Nothing),
            Err(TransformError::DispatchFailure { kind: Kind::Terminal })
        ));
        assert!(matches!(
            transform(&placeholder(1), &mut Nothing),
            Err(TransformError::DispatchFailure { kind: Kind::Terminal })
        ));
    }

    #[test]
    fn test_hook_fallback_order() {
        let expr = -(placeholder(1) * terminal(2));
        let mut log = HookLog::default();
        log.transform(&expr).unwrap();

        // `*` has no dedicated hook here and falls back to `compound`
        assert_eq!(log.hooks, vec!["unary", "compound", "placeholder", "terminal"]);
    }

    #[test]
    fn test_handler_controls_recursion() {
        /// Evaluates `if` forms, visiting only the chosen branch
        struct Branches {
            visited: Vec<i64>,
        }

        impl Transform for Branches {
            type Output = i64;

            fn terminal(&mut self, _expr: &Expr, value: &Value) -> Result<i64> {
                let n = match value {
                    Value::Boolean(b) => *b as i64,
                    other => other.as_integer()?,
                };
                self.visited.push(n);
                Ok(n)
            }

            fn call(&mut self, expr: &Expr, callee: &Expr, args: &[Expr]) -> Result<i64> {
                match callee.value() {
                    Some(Value::Form(Form::If)) => {
                        if self.transform(&args[0])? != 0 {
                            self.transform(&args[1])
                        } else {
                            self.transform(&args[2])
                        }
                    }
                    _ => self.compound(expr),
                }
            }
        }

        let mut handler = Branches { visited: vec![] };
        let result = transform(&if_then_else(true, 10, 20), &mut handler).unwrap();

        assert_eq!(result, 10);
        assert_eq!(handler.visited, vec![1, 10]);
    }

    #[test]
    fn test_side_effects_follow_visit_order() {
        let expr = comma(terminal(1), terminal(2)).comma(terminal(3));
        let mut log = HookLog::default();
        log.transform(&expr).unwrap();
        assert_eq!(log.hooks, vec!["compound", "compound", "terminal", "terminal", "terminal"]);
    }

    // ===== Identity and rebuild =====

    #[test]
    fn test_identity_is_structurally_equal() {
        let expr = (placeholder(1) + 2.5).subscript(symbol("i")).assign(-terminal(3));
        let copy = transform(&expr, &mut Identity).unwrap();
        assert_eq!(copy, expr);
        assert_eq!(copy.to_string(), expr.to_string());
    }

    #[test]
    fn test_identity_reuses_nodes() {
        let expr = symbol("f").call([terminal(1) + 2, terminal(3)]);
        let copy = transform(&expr, &mut Identity).unwrap();
        assert!(Expr::ptr_eq(&copy, &expr));
    }

    #[test]
    fn test_rebuild_shares_unchanged_children() {
        /// Doubles integer terminals, leaves everything else alone
        struct Doubler;

        impl Transform for Doubler {
            type Output = Expr;

            fn terminal(&mut self, expr: &Expr, value: &Value) -> Result<Expr> {
                Ok(match value {
                    Value::Integer(n) => terminal(n * 2),
                    _ => expr.clone(),
                })
            }

            fn compound(&mut self, expr: &Expr) -> Result<Expr> {
                rebuild(expr, self)
            }
        }

        let untouched = symbol("x") * symbol("y");
        let expr = untouched.clone() + 5;
        let doubled = transform(&expr, &mut Doubler).unwrap();

        assert_eq!(doubled.to_string(), "((x * y) + 10)");
        assert!(Expr::ptr_eq(&doubled.children()[0], &untouched));
        assert!(!Expr::ptr_eq(&doubled, &expr));
    }
}
