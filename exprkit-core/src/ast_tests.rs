#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::builder::{call, placeholder, terminal};
    use crate::error::Error;
    use crate::value::Value;

    // ===== Kind Tests =====

    #[test]
    fn test_kind_arity() {
        assert_eq!(Kind::Terminal.arity(), Arity::Exact(0));
        assert_eq!(Kind::Unary(UnaryOp::Negate).arity(), Arity::Exact(1));
        assert_eq!(Kind::Binary(BinaryOp::Plus).arity(), Arity::Exact(2));
        assert_eq!(Kind::Subscript.arity(), Arity::Exact(2));
        assert_eq!(Kind::Assign.arity(), Arity::Exact(2));
        assert_eq!(Kind::Comma.arity(), Arity::Exact(2));
        assert_eq!(Kind::Call.arity(), Arity::AtLeast(1));
    }

    #[test]
    fn test_arity_accepts() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(3));
        assert!(Arity::AtLeast(1).accepts(1));
        assert!(Arity::AtLeast(1).accepts(7));
        assert!(!Arity::AtLeast(1).accepts(0));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Kind::Binary(BinaryOp::Multiply).to_string(), "*");
        assert_eq!(Kind::Binary(BinaryOp::ShiftLeft).to_string(), "<<");
        assert_eq!(Kind::Unary(UnaryOp::Not).to_string(), "!");
        assert_eq!(Kind::Call.to_string(), "()");
        assert_eq!(Kind::Subscript.to_string(), "[]");
        assert_eq!(Kind::Terminal.to_string(), "term");
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&Kind::Binary(BinaryOp::Divide)).unwrap();
        let back: Kind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Kind::Binary(BinaryOp::Divide));
    }

    // ===== Construction Tests =====

    #[test]
    fn test_new_checks_arity() {
        let one = terminal(1);
        let two = terminal(2);

        let sum = Expr::new(Kind::Binary(BinaryOp::Plus), vec![one.clone(), two.clone()]).unwrap();
        assert_eq!(sum.kind(), Kind::Binary(BinaryOp::Plus));
        assert_eq!(sum.children().len(), 2);

        let err = Expr::new(Kind::Binary(BinaryOp::Plus), vec![one.clone()]).unwrap_err();
        match err {
            Error::ArityMismatch {
                kind,
                expected,
                got,
            } => {
                assert_eq!(kind, Kind::Binary(BinaryOp::Plus));
                assert_eq!(expected, Arity::Exact(2));
                assert_eq!(got, 1);
            }
            other => panic!("Expected ArityMismatch, got {:?}", other),
        }

        assert!(matches!(
            Expr::new(Kind::Call, vec![]),
            Err(Error::ArityMismatch { got: 0, .. })
        ));
        assert!(matches!(
            Expr::new(Kind::Unary(UnaryOp::Negate), vec![one, two]),
            Err(Error::ArityMismatch { got: 2, .. })
        ));
    }

    #[test]
    fn test_new_rejects_terminal_kind() {
        assert!(matches!(
            Expr::new(Kind::Terminal, vec![]),
            Err(Error::TerminalWithoutPayload)
        ));
    }

    #[test]
    fn test_terminal_accessors() {
        let t = terminal(42);
        assert!(t.is_terminal());
        assert_eq!(t.kind(), Kind::Terminal);
        assert!(t.children().is_empty());
        assert_eq!(t.value(), Some(&Value::Integer(42)));
        assert_eq!(t.as_placeholder(), None);
        assert_eq!(placeholder(3).as_placeholder(), Some(3));
    }

    #[test]
    fn test_call_accessors() {
        let f = terminal(Value::Symbol("f".to_string()));
        let c = call(f.clone(), [1, 2, 3]);
        assert_eq!(c.callee(), Some(&f));
        assert_eq!(c.args().len(), 3);
        assert_eq!(c.args()[2].value(), Some(&Value::Integer(3)));

        // callee/args only apply to calls
        let sum = terminal(1) + 2;
        assert!(sum.callee().is_none());
        assert!(sum.args().is_empty());
    }

    #[test]
    fn test_operand_accessors() {
        let sum = terminal(1) + 2;
        assert_eq!(sum.left(), Some(&terminal(1)));
        assert_eq!(sum.right(), Some(&terminal(2)));

        let neg = -terminal(1);
        assert!(neg.left().is_none());
        assert!(call(terminal(1), [2]).right().is_none());
        assert!(terminal(1).left().is_none());
    }

    #[test]
    fn test_with_children_keeps_kind() {
        let expr = terminal(1) - 2;
        let swapped = expr
            .with_children(vec![terminal(2), terminal(1)])
            .unwrap();
        assert_eq!(swapped.kind(), Kind::Binary(BinaryOp::Minus));
        assert_eq!(swapped.to_string(), "(2 - 1)");
        assert!(terminal(1).with_children(vec![]).is_err());
    }

    // ===== Structure Tests =====

    #[test]
    fn test_structural_equality() {
        let a = terminal(1) + terminal(2.5) * placeholder(1);
        let b = terminal(1) + terminal(2.5) * placeholder(1);
        let c = terminal(1) + terminal(2.5) * placeholder(2);

        assert!(!Expr::ptr_eq(&a, &b));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_clone_shares_node() {
        let a = terminal(1) + 2;
        let b = a.clone();
        assert!(Expr::ptr_eq(&a, &b));
    }

    #[test]
    fn test_depth_and_leaf_count() {
        let leaf = terminal(1);
        assert_eq!(leaf.depth(), 1);
        assert_eq!(leaf.leaf_count(), 1);

        let expr = (terminal(1) + 2) * (terminal(3) - 4) + 5;
        assert_eq!(expr.depth(), 4);
        assert_eq!(expr.leaf_count(), 5);
    }

    #[test]
    fn test_long_chain_measure_and_drop() {
        let mut expr = terminal(0);
        for i in 1..200_000 {
            expr = expr + i;
        }
        assert_eq!(expr.depth(), 200_000);
        assert_eq!(expr.leaf_count(), 200_000);

        // a shared prefix survives dropping the tree built on top of it
        let prefix = expr.children()[0].clone();
        drop(expr);
        assert_eq!(prefix.depth(), 199_999);
        drop(prefix);
    }

    #[test]
    fn test_float_terminals_compare_exactly() {
        assert_eq!(terminal(f64::INFINITY), terminal(f64::INFINITY));
        assert_ne!(terminal(1e-20), terminal(2e-20));
    }

    // ===== Display Tests =====

    #[test]
    fn test_display_infix() {
        let sqrt = terminal(Value::Symbol("sqrt".to_string()));
        let expr = (terminal(1) + 2.5) * call(sqrt, [9]);
        assert_eq!(expr.to_string(), "((1 + 2.5) * sqrt(9))");
    }

    #[test]
    fn test_display_other_kinds() {
        let x = terminal(Value::Symbol("x".to_string()));
        assert_eq!(x.assign(placeholder(1)).to_string(), "(x = _1)");
        assert_eq!(x.subscript(0).to_string(), "x[0]");
        assert_eq!(x.comma(1).to_string(), "(x, 1)");
        assert_eq!((-&x).to_string(), "-x");
        assert_eq!(call(x, Vec::<Expr>::new()).to_string(), "x()");
    }
}
