#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, Expr, Kind, UnaryOp};
    use crate::builder::*;
    use crate::value::{Form, Value};

    #[test]
    fn test_combine_promotes_raw_values() {
        let expr = combine(BinaryOp::Plus, 1, 2.0);
        assert_eq!(expr.kind(), Kind::Binary(BinaryOp::Plus));
        assert_eq!(expr.children()[0].value(), Some(&Value::Integer(1)));
        assert_eq!(expr.children()[1].value(), Some(&Value::Float(2.0)));
    }

    #[test]
    fn test_operators_map_to_kinds() {
        let x = symbol("x");
        let cases = [
            (&x + 1, BinaryOp::Plus),
            (&x - 1, BinaryOp::Minus),
            (&x * 1, BinaryOp::Multiply),
            (&x / 1, BinaryOp::Divide),
            (&x % 1, BinaryOp::Modulo),
            (&x << 1, BinaryOp::ShiftLeft),
            (&x >> 1, BinaryOp::ShiftRight),
            (x.lt(1), BinaryOp::Less),
            (x.le(1), BinaryOp::LessEqual),
            (x.gt(1), BinaryOp::Greater),
            (x.ge(1), BinaryOp::GreaterEqual),
            (x.equals(1), BinaryOp::Equal),
            (x.not_equals(1), BinaryOp::NotEqual),
            (x.and(true), BinaryOp::LogicalAnd),
            (x.or(true), BinaryOp::LogicalOr),
        ];
        for (expr, op) in cases {
            assert_eq!(expr.kind(), Kind::Binary(op), "operator {}", op.symbol());
        }

        assert_eq!((-&x).kind(), Kind::Unary(UnaryOp::Negate));
        assert_eq!((!x).kind(), Kind::Unary(UnaryOp::Not));
    }

    #[test]
    fn test_raw_left_operand() {
        let expr = 2.0 * placeholder(1);
        assert_eq!(expr.to_string(), "(2 * _1)");
        let expr = 10 - &placeholder(2);
        assert_eq!(expr.to_string(), "(10 - _2)");
    }

    #[test]
    fn test_precedence_follows_host_operators() {
        let expr = terminal(1) + terminal(2) * 3;
        assert_eq!(expr.to_string(), "(1 + (2 * 3))");

        let expr = terminal(8) - 4 - 2;
        assert_eq!(expr.to_string(), "((8 - 4) - 2)");
    }

    #[test]
    fn test_call_builds_callee_first() {
        let f = symbol("f");
        let expr = f.call([terminal(1), placeholder(1)]);
        assert_eq!(expr.kind(), Kind::Call);
        assert_eq!(expr.children().len(), 3);
        assert_eq!(expr.callee(), Some(&f));
        assert_eq!(expr.to_string(), "f(1, _1)");
    }

    #[test]
    fn test_if_then_else_shape() {
        let expr = if_then_else(true, 1, 2);
        assert_eq!(expr.kind(), Kind::Call);
        assert_eq!(
            expr.callee().and_then(Expr::value),
            Some(&Value::Form(Form::If))
        );
        assert_eq!(expr.args().len(), 3);
    }

    #[test]
    fn test_for_each_subscript_shape() {
        let range = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
        let expr = for_each(range).subscript(placeholder(1) * 10);
        assert_eq!(expr.kind(), Kind::Subscript);
        assert_eq!(expr.children()[0].kind(), Kind::Call);
        assert_eq!(expr.to_string(), "for_each([1, 2])[(_1 * 10)]");
    }

    #[test]
    fn test_function_terminal() {
        let sqrt = function("sqrt", Some(1), |args| Ok(Value::Float(args[0].as_number()?.sqrt())));
        let expr = call(&sqrt, [9.0]);
        assert_eq!(expr.to_string(), "sqrt(9)");
        assert!(sqrt.value().map(Value::is_callable).unwrap_or(false));
    }

    #[test]
    fn test_reference_terminal() {
        let r = reference(0);
        let expr = r.assign(5);
        assert_eq!(expr.kind(), Kind::Assign);
        assert_eq!(expr.to_string(), "(&0 = 5)");
    }

    #[test]
    fn test_construction_does_not_evaluate() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let f = function("count", None, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Value::Nil)
        });
        let _expr = call(&f, [1, 2]) + call(&f, [3]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
