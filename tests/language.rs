use std::fs;

use pretty_assertions::assert_eq;
use ravel::{
    ast::BinaryOperator,
    config::Config,
    error::{Error, ParseError, RuntimeError},
    interpreter::{
        evaluator::core::Context,
        lexer::Scanner,
        parser::{core::Parser, expression::parse_expression},
        value::{
            core::{Kind, Value},
            number::{Arith, numeric_binary},
        },
    },
    run,
};
use walkdir::WalkDir;

/// Runs `src` in a fresh context and returns the printed form of every
/// result.
fn eval(src: &str) -> Vec<String> {
    let mut context = Context::new();
    eval_in(src, &mut context)
}

fn eval_in(src: &str, context: &mut Context) -> Vec<String> {
    match run(src, context) {
        Ok(values) => values.iter().map(|v| v.sprint(&context.config)).collect(),
        Err(e) => panic!("Script failed: {e}\n{src}"),
    }
}

fn eval_value(src: &str) -> Value {
    let mut context = Context::new();
    let mut values = run(src, &mut context).unwrap_or_else(|e| panic!("Script failed: {e}"));
    values.pop().expect("no printable result")
}

fn assert_success(src: &str) {
    if let Err(e) = run(src, &mut Context::new()) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) -> Error {
    match run(src, &mut Context::new()) {
        Ok(values) => panic!("Script succeeded but was expected to fail: {values:?}"),
        Err(e) => e,
    }
}

fn parse(src: &str, context: &Context) -> ravel::ast::Expr {
    let tokens: Vec<_> = Scanner::new(src).collect::<Result<_, _>>()
                                          .unwrap_or_else(|e| panic!("scan failed: {e}"));
    parse_expression(&mut tokens.iter().peekable(), context).unwrap_or_else(|e| {
                                                                panic!("parse failed: {e}")
                                                            })
}

#[test]
fn juxtaposed_numbers_form_a_vector() {
    assert_eq!(eval("2 3 4"), vec!["2 3 4"]);
    assert_eq!(eval_value("2 3 4"),
               Value::from(vec![Value::Int(2), Value::Int(3), Value::Int(4)]));
}

#[test]
fn assignment_produces_no_output() {
    assert_eq!(eval("x = 5"), Vec::<String>::new());
    assert_eq!(eval("x = 5\nx"), vec!["5"]);
}

#[test]
fn assignment_is_transparent() {
    assert_eq!(eval("x = y = 3\nx y"), vec!["3 3"]);
    assert_eq!(eval("(x = 3) + 1"), vec!["4"]);
}

#[test]
fn vector_elements_see_assignments_first() {
    assert_eq!(eval("x = 1\nx (x = 3)"), vec!["3 3"]);
    assert_eq!(eval("x = 1\n(x = 3) x"), vec!["3 3"]);
}

#[test]
fn binary_operands_evaluate_left_first() {
    assert_eq!(eval("x = 1\nx + (x = 5)"), vec!["6"]);
    assert_eq!(eval("op a plus b = a + b\nx = 1\nx plus (x = 5)"), vec!["6"]);
    assert_eq!(eval("v = 10 20 30\nv[1 + 0 * +/ (v = 4 5 6)]\nv"), vec!["10", "4 5 6"]);
}

#[test]
fn vector_elements_must_be_scalars() {
    let err = assert_failure("v = 1 2\nv 3");
    assert!(matches!(err,
                     Error::Runtime(RuntimeError::NonScalarVectorElement { kind: Kind::Vector, .. })));
}

#[test]
fn binary_operators_group_to_the_right() {
    assert_eq!(eval("2 * 3 + 4"), vec!["14"]);
    assert_eq!(eval("10 - 4 - 3"), vec!["9"]);
    assert_eq!(eval("-2 + 3"), vec!["-5"]);
}

#[test]
fn indexed_assignment_writes_in_place() {
    assert_eq!(eval("v = 1 2 3\nv[2] = 9\nv"), vec!["1 9 3"]);
    assert_eq!(eval("v = 1 2 3\nv[1 3] = 7 8\nv"), vec!["7 2 8"]);
}

#[test]
fn failed_indexed_assignment_changes_nothing() {
    let mut context = Context::new();
    eval_in("v = 1 2 3", &mut context);

    let err = run("v[1 5] = 7 8", &mut context).unwrap_err();
    assert!(matches!(err, Error::Runtime(RuntimeError::IndexOutOfRange { len: 3, .. })));

    assert_eq!(eval_in("v", &mut context), vec!["1 2 3"]);
}

#[test]
fn non_integer_index_changes_nothing() {
    let mut context = Context::new();
    eval_in("v = 1 2 3", &mut context);

    let err = run("v[1 3/2] = 7 8", &mut context).unwrap_err();
    assert!(matches!(err, Error::Runtime(RuntimeError::NonIntegerIndex { .. })));
    assert_eq!(eval_in("v", &mut context), vec!["1 2 3"]);
}

#[test]
fn indexed_assignment_errors() {
    let err = assert_failure("w[1] = 2");
    assert!(matches!(err, Error::Runtime(RuntimeError::UnknownTarget { .. })));

    let err = assert_failure("s = 5\ns[1] = 2");
    assert!(matches!(err, Error::Runtime(RuntimeError::InvalidAssignmentTarget { .. })));

    let err = assert_failure("v = 1 2 3\nv[1] = 1 2");
    assert!(matches!(err, Error::Runtime(RuntimeError::NonScalarVectorElement { .. })));

    let err = assert_failure("v = 1 2 3\nv[1 2] = 5");
    assert!(matches!(err, Error::Runtime(RuntimeError::TypeError { .. })));

    let err = assert_failure("v = 1 2 3\nv[1 2] = 4 5 6");
    assert!(matches!(err,
                     Error::Runtime(RuntimeError::LengthMismatch { expected: 2,
                                                                   found: 3,
                                                                   .. })));

    let err = assert_failure("v = 1 2 3\nv[1/2] = 4");
    assert!(matches!(err, Error::Runtime(RuntimeError::NonIntegerIndex { .. })));

    let err = assert_failure("1 2 = 3");
    assert!(matches!(err, Error::Parse(ParseError::InvalidAssignmentTarget { line: 1 })));
}

#[test]
fn map_literal_collects_variables() {
    assert_eq!(eval("a = 1\nb = 2\n{ a b }"), vec!["{ a:1 b:2 }"]);
    assert_eq!(eval("a = 1\n{ a }"), vec!["{ a:1 }"]);
}

#[test]
fn parsing_depends_on_defined_operators() {
    let mut context = Context::new();

    let before = parse("f 3\n", &context);
    assert_eq!(before.tree(), "<<var f> <3>>");

    eval_in("op f x = x + 1", &mut context);

    let after = parse("f 3\n", &context);
    assert_eq!(after.tree(), "(f <3>)");
    assert_eq!(eval_in("f 3", &mut context), vec!["4"]);
}

#[test]
fn assignment_tree_names_the_target() {
    let context = Context::new();
    assert_eq!(parse("x = 1 + 2\n", &context).tree(), "<x = (<1> + <2>)>");
    assert_eq!(parse("v[1] = 9\n", &context).tree(), "<v[1] = <9>>");
}

#[test]
fn deep_nesting_is_a_parse_error() {
    let long_sum = vec!["1"; 5000].join(" + ");
    let err = assert_failure(&long_sum);
    assert!(matches!(err, Error::Parse(ParseError::NestingTooDeep { limit: 128, line: 1 })));

    let parens = format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
    let err = assert_failure(&parens);
    assert!(matches!(err, Error::Parse(ParseError::NestingTooDeep { .. })));

    assert_eq!(eval(&vec!["1"; 100].join(" + ")), vec!["100"]);
}

#[test]
fn nesting_limit_follows_the_config() {
    let config = Config { max_nesting: 4,
                          ..Config::default() };
    let mut context = Context::with_config(config);

    assert_eq!(eval_in("1 + 1 + 1", &mut context), vec!["3"]);
    let err = run("1 + 1 + 1 + 1 + 1 + 1", &mut context).unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::NestingTooDeep { limit: 4, .. })));
    assert!(run("op f x = - - - - - - x", &mut context).is_err());
}

#[test]
fn definition_is_visible_later_on_the_same_line() {
    assert_eq!(eval("op inc x = x + 1; inc 41"), vec!["42"]);
}

#[test]
fn canonical_form_parses_back_to_the_same_tree() {
    let sources = ["1 2 3 + 4",
                   "-2 * 3 + 1",
                   "iota 5",
                   "2 3 rho iota 6",
                   "+/ 1 2 3",
                   "(1 2 3)[2]",
                   "\"abc\" , 'd'",
                   "1/3 + 1.5",
                   "abs -7",
                   "3 min 4 max 1",
                   "transp 2 2 rho 1 2 3 4",
                   "(\"ab\") 1"];

    for src in sources {
        let mut context = Context::new();
        let first = parse(&format!("{src}\n"), &context);
        let canonical = first.canonical();
        let second = parse(&format!("{canonical}\n"), &context);

        assert_eq!(second.canonical(), canonical, "source: {src}");
        let a = context.eval(&first).unwrap();
        let b = context.eval(&second).unwrap();
        assert_eq!(a, b, "source: {src}");
    }
}

#[test]
fn values_print_back_as_source() {
    let mut context = Context::new();
    for src in ["1 2 3", "-5", "1/3", "2 2 rho 1 2 3 4", "\"hi\"", "'x'", ", 7", "iota 0"] {
        let value = run(src, &mut context).unwrap().pop().unwrap();
        let again = run(&value.canonical(), &mut context).unwrap().pop().unwrap();
        assert_eq!(again, value, "source: {src}");
    }
}

#[test]
fn mixed_vectors_print_back_as_source() {
    let mut context = Context::new();
    eval_in("s = \"ab\"", &mut context);
    for src in ["s 1",
                "'c' 1/2 2.5 (-3)",
                "(2 ** 70) 1/3 0.25 'x' s",
                "1 rho s 0",
                "2 1 rho s 7"]
    {
        let value = run(src, &mut context).unwrap().pop().unwrap();
        let again = run(&value.canonical(), &mut context).unwrap().pop().unwrap();
        assert_eq!(again, value, "source: {src}, canonical: {}", value.canonical());
    }

    let value = run("s 1", &mut context).unwrap().pop().unwrap();
    assert_eq!(value.canonical(), "((\"ab\") 1)");
}

#[test]
fn promotion_never_lowers_the_rank() {
    let arith = Arith::new(32, 1);
    let samples = [eval_value("3"), eval_value("2 ** 70"), eval_value("1/3"), eval_value("0.5")];

    for a in &samples {
        for b in &samples {
            for op in [BinaryOperator::Add, BinaryOperator::Sub, BinaryOperator::Mul] {
                let result = numeric_binary(op, a, b, arith).unwrap();
                let floor = a.kind().rank().max(b.kind().rank());
                let rank = result.kind().rank();
                // An exact rational with denominator 1 becomes an integer.
                let normalized = floor == Kind::BigRat.rank() && result.kind() != Kind::BigFloat;
                assert!(rank >= floor || normalized, "{a:?} {op} {b:?} gave {result:?}");
            }
        }
    }

    let big = eval_value("2 ** 70");
    let sum = numeric_binary(BinaryOperator::Sub, &big, &big, arith).unwrap();
    assert_eq!(sum.kind(), Kind::BigInt);
    let sum = numeric_binary(BinaryOperator::Add, &big, &Value::Int(1), arith).unwrap();
    assert_eq!(sum.kind(), Kind::BigInt);
    let mixed = numeric_binary(BinaryOperator::Add, &eval_value("1/3"), &eval_value("0.5"), arith);
    assert_eq!(mixed.unwrap().kind(), Kind::BigFloat);
}

#[test]
fn numeric_tower_promotion() {
    assert_eq!(eval("1/3 + 1/6"), vec!["1/2"]);
    assert_eq!(eval_value("1/2 + 1/2"), Value::Int(1));
    assert!(matches!(eval_value("2 ** 100"), Value::BigInt(_)));
    assert_eq!(eval("2 ** 100"), vec!["1267650600228229401496703205376"]);
    assert_eq!(eval("9223372036854775807 + 1"), vec!["9223372036854775808"]);
    assert!(matches!(eval_value("9223372036854775807 + 1"), Value::BigInt(_)));
    assert_eq!(eval_value("1 + 0.5").kind(), Kind::BigFloat);
    assert_eq!(eval("1 + 0.5"), vec!["1.5"]);
    assert_eq!(eval("7 / 2"), vec!["7/2"]);
    assert_eq!(eval("6 / 3"), vec!["2"]);
    assert_eq!(eval("2 ** -2"), vec!["1/4"]);
}

#[test]
fn conversions_between_kinds() {
    let arith = Arith::new(32, 1);

    let big = eval_value("2 ** 70");
    assert!(big.convert(Kind::Int, arith).is_err());
    assert_eq!(eval_value("2 ** 10").convert(Kind::BigInt, arith).unwrap().kind(), Kind::BigInt);
    assert_eq!(eval_value("4/2 + 0").convert(Kind::BigRat, arith).unwrap().to_string(), "2/1");
    assert_eq!(eval_value("1/4").convert(Kind::BigFloat, arith).unwrap().to_string(), "0.25");
    assert!(eval_value("0.5").convert(Kind::BigRat, arith).is_err());

    let chars = Value::from(vec![Value::Char('o'), Value::Char('k')]);
    assert_eq!(chars.convert(Kind::String, arith).unwrap(), Value::from("ok"));
    assert_eq!(Value::Char('c').convert(Kind::String, arith).unwrap(), Value::from("c"));

    let row = eval_value("1 2 3").convert(Kind::Matrix, arith).unwrap();
    assert!(matches!(row, Value::Matrix(ref m) if m.shape() == [1, 3]));
    assert_eq!(Value::Int(7).convert(Kind::Vector, arith).unwrap(),
               Value::from(vec![Value::Int(7)]));

    let err = eval_value("a = 1\n{ a }").convert(Kind::Vector, arith).unwrap_err();
    assert_eq!(err,
               RuntimeError::ConversionError { from: Kind::Map,
                                               to:   Kind::Vector,
                                               line: 1, });
}

#[test]
fn division_by_zero_fails() {
    let err = assert_failure("1 / 0");
    assert!(matches!(err, Error::Runtime(RuntimeError::DivisionByZero { line: 1 })));
    assert_failure("5 mod 0");
}

#[test]
fn floored_division_and_modulus() {
    assert_eq!(eval("7 div 2"), vec!["3"]);
    assert_eq!(eval("(-7) div 2"), vec!["-4"]);
    assert_eq!(eval("-7 div 2"), vec!["-3"]);
    assert_eq!(eval("(-7) mod 3"), vec!["2"]);
    assert_failure("1/2 mod 3");
}

#[test]
fn iota_follows_the_origin() {
    assert_eq!(eval("iota 5"), vec!["1 2 3 4 5"]);
    assert_eq!(eval(")origin 0\niota 5"), vec!["0 1 2 3 4"]);
    assert_eq!(eval(")origin 0\nv = 10 20 30\nv[0]"), vec!["10"]);
}

#[test]
fn reshape_and_matrix_indexing() {
    assert_eq!(eval("m = 2 3 rho iota 6\nm[2]"), vec!["4 5 6"]);
    assert_eq!(eval("2 3 rho iota 6"), vec!["1 2 3\n4 5 6"]);
    assert_eq!(eval("rho 2 3 rho iota 6"), vec!["2 3"]);
    assert_eq!(eval("5 rho 1 2"), vec!["1 2 1 2 1"]);
    assert_eq!(eval("m = 2 3 rho iota 6\nm[2][3]"), vec!["6"]);
}

#[test]
fn matrix_arithmetic() {
    assert_eq!(eval("m = 2 2 rho 1 2 3 4\nm + m"), vec!["2 4\n6 8"]);
    assert_eq!(eval("10 * 2 2 rho 1 2 3 4"), vec!["10 20\n30 40"]);
    assert_eq!(eval("transp 2 3 rho iota 6"), vec!["1 4\n2 5\n3 6"]);
    assert_eq!(eval("+/ 2 3 rho iota 6"), vec!["6 15"]);

    let err = assert_failure("(2 2 rho 1) + 1 2");
    assert!(matches!(err, Error::Runtime(RuntimeError::ShapeMismatch { .. })));
}

#[test]
fn elementwise_vectors() {
    assert_eq!(eval("1 2 3 + 10 20 30"), vec!["11 22 33"]);
    assert_eq!(eval("1 2 3 * 2"), vec!["2 4 6"]);
    assert_eq!(eval("1 2 3 == 1 5 3"), vec!["1 0 1"]);

    let err = assert_failure("1 2 + 1 2 3");
    assert!(matches!(err,
                     Error::Runtime(RuntimeError::LengthMismatch { expected: 2,
                                                                   found: 3,
                                                                   .. })));
}

#[test]
fn reductions() {
    assert_eq!(eval("+/ iota 10"), vec!["55"]);
    assert_eq!(eval("-/ 1 2 3"), vec!["2"]);
    assert_eq!(eval("*/ 1 2 3 4"), vec!["24"]);
    assert_eq!(eval("+/ iota 0"), vec!["0"]);
}

#[test]
fn strings_and_chars() {
    assert_eq!(eval("\"hello\""), vec!["hello"]);
    assert_eq!(eval("\"ab\" \"cd\""), vec!["abcd"]);
    assert_eq!(eval("rho \"hello\""), vec!["5"]);
    assert_eq!(eval("\"abc\"[2]"), vec!["b"]);
    assert_eq!(eval("'a' < 'b'"), vec!["1"]);
    assert_eq!(eval("\"ab\" , \"cd\""), vec!["abcd"]);
    assert_eq!(eval_value("\"ab\" , \"cd\""), Value::from("abcd"));
}

#[test]
fn user_defined_operators() {
    assert_eq!(eval("op double x = x + x\ndouble 3 4"), vec!["6 8"]);
    assert_eq!(eval("op a avg b = (a + b) / 2\n3 avg 4"), vec!["7/2"]);
    assert_eq!(eval("op a avg b = (a + b) / 2\n1 2 avg 3 4"), vec!["2 3"]);
}

#[test]
fn operator_parameters_do_not_leak() {
    let mut context = Context::new();
    eval_in("x = 100\nop double x = x + x\ndouble 3", &mut context);
    assert_eq!(eval_in("x", &mut context), vec!["100"]);
}

#[test]
fn runaway_recursion_is_reported() {
    let config = Config { max_depth: 32,
                          ..Config::default() };
    let mut context = Context::with_config(config);
    let err = run("op forever x = forever x\nforever 1", &mut context).unwrap_err();
    assert!(matches!(err, Error::Runtime(RuntimeError::RecursionLimit { .. })));
    assert_eq!(context.scope_stack.len(), 1);
}

#[test]
fn malformed_definitions_are_rejected() {
    let err = assert_failure("op f = 1");
    assert!(matches!(err, Error::Parse(ParseError::InvalidOperatorDefinition { .. })));
    assert_failure("op a b c d = 1");
}

#[test]
fn errors_abort_only_their_line() {
    let mut context = Context::new();
    let mut parser = Parser::new("1 +\n2 3\nx = 1 @ 2\ny = 3\ny\n");

    assert_eq!(parser.line(&mut context),
               Some(Err(Error::Parse(ParseError::UnexpectedEndOfLine { line: 1 }))));
    assert_eq!(parser.line(&mut context),
               Some(Ok(vec![Value::from(vec![Value::Int(2), Value::Int(3)])])));
    assert!(matches!(parser.line(&mut context),
                     Some(Err(Error::Parse(ParseError::ScanError { line: 3, .. })))));
    assert_eq!(parser.line(&mut context), Some(Ok(vec![])));
    assert_eq!(parser.line(&mut context), Some(Ok(vec![Value::Int(3)])));
    assert_eq!(parser.line(&mut context), None);

    assert!(context.lookup("x", 0).is_err());
}

#[test]
fn runtime_error_keeps_earlier_statements() {
    let mut context = Context::new();
    let err = run("a = 1; b = c; d = 4", &mut context).unwrap_err();

    assert!(matches!(err, Error::Runtime(RuntimeError::UndefinedVariable { .. })));
    assert_eq!(context.lookup("a", 0).unwrap(), Value::Int(1));
    assert!(context.lookup("d", 0).is_err());
}

#[test]
fn parse_error_runs_nothing_on_the_line() {
    let mut context = Context::new();
    assert!(run("a = 1; b = )", &mut context).is_err());
    assert!(context.lookup("a", 0).is_err());
}

#[test]
fn underscore_holds_the_last_result() {
    assert_eq!(eval("1 + 1\n_ * 10"), vec!["2", "20"]);
}

#[test]
fn special_commands() {
    assert_eq!(eval(")origin"), vec!["1"]);
    assert_eq!(eval(")prec"), vec!["32"]);
    assert_eq!(eval(")debug"), vec!["parse=0 tokens=0"]);
    assert_eq!(eval(")debug parse\n)debug"), vec!["parse=1 tokens=0"]);
    assert_eq!(eval("a = 1\nb = 2\n)vars"), vec!["{ a:1 b:2 }"]);
    assert_eq!(eval("op double x = x + x\n)ops"), vec!["op double x = (x + x)"]);

    let err = assert_failure(")origin 2");
    assert!(matches!(err, Error::Parse(ParseError::InvalidSpecialCommand { .. })));
    assert_failure(")prec 0");
    assert_failure(")nonsense");
}

#[test]
fn precision_limits_float_output() {
    assert_eq!(eval(")prec 5\n1/3 + 0.0"), vec!["0.33333"]);
}

#[test]
fn precision_beyond_one_hundred_digits() {
    let thirds = format!("0.{}", "3".repeat(150));
    assert_eq!(eval(")prec 150\nfloat 1/3"), vec![thirds.clone()]);
    assert_eq!(eval(")prec 150\n1.0 / 3"), vec![thirds]);
    assert_eq!(eval(")prec 50\nsqrt 2"),
               vec!["1.4142135623730950488016887242096980785696718753769"]);

    let err = assert_failure(")prec 10001");
    assert!(matches!(err, Error::Parse(ParseError::InvalidSpecialCommand { .. })));
}

#[test]
fn powers() {
    assert_eq!(eval("2 ** 2.0"), vec!["4"]);
    assert_eq!(eval_value("2 ** 2.0").kind(), Kind::BigFloat);
    assert_eq!(eval("1/2 ** 2.0"), vec!["0.25"]);

    let err = assert_failure("2 ** 2.5");
    assert!(matches!(err, Error::Runtime(RuntimeError::DomainError { .. })));
    let err = assert_failure("(2 ** 1000) ** 1000000");
    assert!(matches!(err, Error::Runtime(RuntimeError::DomainError { .. })));
}

#[test]
fn unary_builtins() {
    assert_eq!(eval("abs -3 4"), vec!["3 4"]);
    assert_eq!(eval("sgn (-5) 0 5"), vec!["-1 0 1"]);
    assert_eq!(eval("floor 7/2"), vec!["3"]);
    assert_eq!(eval("ceil 7/2"), vec!["4"]);
    assert_eq!(eval("not 0 1 2"), vec!["1 0 0"]);
    assert_eq!(eval("float 1/4"), vec!["0.25"]);
    assert_eq!(eval(", 2 2 rho 1 2 3 4"), vec!["1 2 3 4"]);
    assert_failure("sqrt -1");
}

#[test]
fn undefined_names_and_operators() {
    let err = assert_failure("y + 1");
    assert!(matches!(err, Error::Runtime(RuntimeError::UndefinedVariable { .. })));

    let err = assert_failure("\"a\" * 2");
    assert!(matches!(err, Error::Runtime(RuntimeError::UndefinedOperator { .. })));
}

#[test]
fn line_continuation_joins_lines() {
    assert_eq!(eval("1 2 \\\n3"), vec!["1 2 3"]);
}

#[test]
fn comments_are_ignored() {
    assert_eq!(eval("1 + 2 # three\n# nothing"), vec!["3"]);
    assert_success("# only a comment");
}

/// Runs every script in `tests/scripts`.
///
/// Each line is run on its own. A line ending in `#=> text` must print
/// `text` (several results joined by `; `, matrix rows by ` / `), and a
/// line ending in `#=> error` must fail.
#[test]
fn scripts_produce_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "rv"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let mut context = Context::new();

        for (number, line) in content.lines().enumerate() {
            let Some((code, expected)) = line.split_once("#=>") else {
                if let Err(e) = run(line, &mut context) {
                    panic!("{path:?} line {}: {e}", number + 1);
                }
                continue;
            };
            count += 1;
            let expected = expected.trim();
            match run(code, &mut context) {
                Ok(_) if expected == "error" => {
                    panic!("{path:?} line {}: expected an error from `{code}`", number + 1)
                },
                Err(_) if expected == "error" => {},
                Ok(values) => {
                    let shown = values.iter()
                                      .map(|v| v.sprint(&context.config).replace('\n', " / "))
                                      .collect::<Vec<_>>()
                                      .join("; ");
                    assert_eq!(shown, expected, "{path:?} line {}: `{code}`", number + 1);
                },
                Err(e) => panic!("{path:?} line {}: `{code}` failed: {e}", number + 1),
            }
        }
    }

    assert!(count > 0, "No expectations found in tests/scripts");
}
