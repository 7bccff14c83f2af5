use callarg::prelude::*;
use callarg::{
    dispatch, Arguments, CallError, Cast, Class, Function, Metadata, Method, Script, Signature,
    Value, EX_OK, EX_USAGE,
};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use rstest::rstest;
use std::cell::RefCell;

fn recording<'a>(
    name: &str,
    signature: Signature,
    calls: &'a RefCell<Vec<Arguments>>,
) -> Function<'a> {
    Function::new(name, signature, move |arguments| {
        calls.borrow_mut().push(arguments);
        Ok(EX_OK)
    })
}

fn run(function: Function, tokens: &[&str]) -> i32 {
    Script::new("program", function)
        .width(79)
        .build_parser()
        .unwrap()
        .run_tokens(tokens)
}

#[test]
fn builder_compiles() {
    Script::new("noop", Function::new("noop", Signature::new(), |_| Ok(EX_OK)));
}

#[test]
fn required_only() {
    let calls = RefCell::new(Vec::default());
    let function = recording(
        "three",
        Signature::new().required("a").required("b").required("c"),
        &calls,
    );

    assert_eq!(run(function, &["x", "y", "z"]), EX_OK);

    let calls = calls.into_inner();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].positional(),
        &[Value::from("x"), Value::from("y"), Value::from("z")]
    );
}

#[rstest]
#[case(false, vec!["--value"])]
#[case(false, vec!["-v"])]
#[case(true, vec!["--value"])]
#[case(true, vec!["-v"])]
fn toggle_negates_default(#[case] default: bool, #[case] tokens: Vec<&str>) {
    let calls = RefCell::new(Vec::default());
    let function = recording("toggle", Signature::new().keyword("value", default), &calls);

    assert_eq!(run(function, tokens.as_slice()), EX_OK);
    assert_eq!(
        calls.into_inner()[0].value("value"),
        Some(&Value::Bool(!default))
    );
}

#[rstest]
#[case(Value::Integer(0), "7")]
#[case(Value::Float(0.0), "2.5")]
#[case(Value::from("world"), "father")]
#[case(Value::from(vec!["a"]), "x,y")]
#[case(Value::None, "anything")]
fn keyword_forms_agree(#[case] default: Value, #[case] token: &str) {
    let joined = format!("--value={token}");
    let forms: Vec<Vec<&str>> = vec![
        vec![joined.as_str()],
        vec!["--value", token],
        vec!["-v", token],
    ];
    let calls = RefCell::new(Vec::default());

    for tokens in &forms {
        let function = recording(
            "keyword",
            Signature::new().keyword("value", default.clone()),
            &calls,
        );
        assert_eq!(run(function, tokens.as_slice()), EX_OK, "{tokens:?}");
    }

    let calls = calls.into_inner();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0], calls[1]);
    assert_eq!(calls[1], calls[2]);
}

#[test]
fn terminator_binds_literally() {
    let calls = RefCell::new(Vec::default());
    let function = recording(
        "literal",
        Signature::new().required("name").keyword("world", false),
        &calls,
    );

    assert_eq!(run(function, &["--", "--world"]), EX_OK);

    let calls = calls.into_inner();
    assert_eq!(calls[0].value("name"), Some(&Value::from("--world")));
    assert_eq!(calls[0].value("world"), Some(&Value::Bool(false)));
}

#[test]
fn help_always_wins() {
    let pool = [
        "world",
        "--value=3",
        "--value=x",
        "-v",
        "--verbose",
        "-x",
        "abc",
        "-3",
        "--title",
        "-t",
    ];
    let mut rng = thread_rng();

    for _ in 0..100 {
        let mut tokens: Vec<&str> = (0..rng.gen_range(0..5))
            .map(|_| *pool.choose(&mut rng).unwrap())
            .collect();
        let help = *["--help", "-h", "-H"].choose(&mut rng).unwrap();
        tokens.insert(rng.gen_range(0..=tokens.len()), help);
        let function = Function::new(
            "f",
            Signature::new()
                .required("name")
                .keyword("verbose", false)
                .keyword("value", 0)
                .keyword("title", "untitled"),
            |_| Ok(EX_OK),
        );

        assert_eq!(run(function, tokens.as_slice()), EX_USAGE, "{tokens:?}");
    }
}

#[rstest]
#[case(vec!["--name", "--help"])]
#[case(vec!["--name", "-h"])]
#[case(vec!["-n", "--help", "father"])]
fn help_while_value_pending(#[case] tokens: Vec<&str>) {
    let calls = RefCell::new(Vec::default());
    let function = recording("greet", Signature::new().keyword("name", "x"), &calls);

    assert_eq!(run(function, tokens.as_slice()), EX_USAGE);
    assert!(calls.into_inner().is_empty());

    // Past the terminator, '--help' is an ordinary value.
    let calls = RefCell::new(Vec::default());
    let function = recording("greet", Signature::new().required("name"), &calls);

    assert_eq!(run(function, &["--", "--help"]), EX_OK);
    assert_eq!(
        calls.into_inner()[0].value("name"),
        Some(&Value::from("--help"))
    );
}

#[rstest]
#[case(vec![], EX_USAGE)]
#[case(vec!["world"], EX_OK)]
fn scenario_required(#[case] tokens: Vec<&str>, #[case] expected: i32) {
    let calls = RefCell::new(Vec::default());
    let function = recording("greet", Signature::new().required("name"), &calls);

    assert_eq!(dispatch(function, tokens.as_slice()), Ok(expected));

    if expected == EX_OK {
        assert_eq!(
            calls.into_inner()[0].get::<String>("name").unwrap(),
            "world"
        );
    }
}

#[test]
fn scenario_keyword() {
    let calls = RefCell::new(Vec::default());
    let function = recording("greet", Signature::new().keyword("name", "world"), &calls);

    assert_eq!(dispatch(function, &["--name=father"]), Ok(EX_OK));
    assert_eq!(
        calls.into_inner()[0].get::<String>("name").unwrap(),
        "father"
    );

    // Keyword parameters are never bound positionally.
    let function = Function::new("greet", Signature::new().keyword("name", "world"), |_| {
        Ok(EX_OK)
    });
    assert_eq!(dispatch(function, &["father"]), Ok(EX_USAGE));
}

#[test]
fn scenario_cast_failure() {
    let function = Function::new("integer", Signature::new().keyword("value", 0), |_| {
        Ok(EX_OK)
    });

    assert_eq!(dispatch(function, &["--value=abc"]), Ok(EX_USAGE));
}

#[test]
fn scenario_toggle_short() {
    let function = Function::new("boolean", Signature::new().keyword("value", false), |arguments| {
        Ok(arguments.get::<bool>("value")? as i32)
    });
    let dispatcher = Script::new("boolean", function).build_parser().unwrap();

    assert_eq!(dispatcher.run_tokens(&["-v"]), 1);
    assert_eq!(dispatcher.run_tokens(&[]), 0);
    // Repeating a parameter is a conflict.
    assert_eq!(dispatcher.run_tokens(&["-v", "-v"]), EX_USAGE);
    assert_eq!(dispatcher.run_tokens(&["-vv"]), EX_USAGE);
}

fn foo() -> Class<'static, ()> {
    Class::new("Foo", Signature::new(), |_| Ok(()))
        .command(Method::new("success", Signature::new(), |_: &mut (), _| Ok(0)))
        .command(Method::new("bar", Signature::new(), |_: &mut (), _| Ok(0)))
        .command(Method::new("baz", Signature::new(), |_: &mut (), _| Ok(1)))
}

#[rstest]
#[case(vec!["success"], 0)]
#[case(vec!["bar"], 0)]
#[case(vec!["baz"], 1)]
#[case(vec![], EX_USAGE)]
#[case(vec!["qux"], EX_USAGE)]
#[case(vec!["bar", "extra"], EX_USAGE)]
fn scenario_class(#[case] tokens: Vec<&str>, #[case] expected: i32) {
    assert_eq!(dispatch(foo(), tokens.as_slice()), Ok(expected));
}

struct Bar {
    argument: String,
}

fn bar() -> Class<'static, Bar> {
    Class::new("Bar", Signature::new().required("argument"), |arguments| {
        Ok(Bar {
            argument: arguments.get("argument")?,
        })
    })
    .command(Method::new("foo", Signature::new(), |bar: &mut Bar, _| {
        Ok(bar.argument.len() as i32)
    }))
    .command(Method::new(
        "baz",
        Signature::new().required("value"),
        |bar: &mut Bar, arguments| {
            let value: String = arguments.get("value")?;
            Ok((bar.argument.len() + value.len()) as i32)
        },
    ))
}

#[rstest]
#[case(vec!["world", "foo"], 5)]
#[case(vec!["world", "baz", "hello"], 10)]
#[case(vec!["world", "baz", "--value=hi"], 7)]
#[case(vec!["--argument", "world", "foo"], 5)]
#[case(vec!["world"], EX_USAGE)]
#[case(vec!["world", "baz"], EX_USAGE)]
#[case(vec!["world", "foo", "--help"], EX_USAGE)]
fn class_with_constructor(#[case] tokens: Vec<&str>, #[case] expected: i32) {
    assert_eq!(dispatch(bar(), tokens.as_slice()), Ok(expected));
}

fn fleet() -> Class<'static, ()> {
    let ship = Class::new("ship", Signature::new().required("fleet"), |arguments| {
        arguments.get::<String>("fleet")
    })
    .command(Method::new(
        "move",
        Signature::new().required("ship").keyword("speed", 10),
        |fleet: &mut String, arguments| {
            let speed: i64 = arguments.get("speed")?;
            Ok(fleet.len() as i32 + speed as i32)
        },
    ));

    Class::new("Fleet", Signature::new(), |_| Ok(())).group(ship)
}

#[rstest]
#[case(vec!["ship", "red", "move", "Titanic"], 13)]
#[case(vec!["ship", "red", "move", "Titanic", "--speed=20"], 23)]
#[case(vec!["ship", "--fleet=blue", "move", "-s", "1", "Titanic"], 5)]
#[case(vec!["ship", "red"], EX_USAGE)]
#[case(vec!["ship", "move", "Titanic"], EX_USAGE)]
#[case(vec!["move", "Titanic"], EX_USAGE)]
#[case(vec!["ship", "red", "move", "Titanic", "--help"], EX_USAGE)]
fn nested_class(#[case] tokens: Vec<&str>, #[case] expected: i32) {
    assert_eq!(dispatch(fleet(), tokens.as_slice()), Ok(expected));
}

#[rstest]
#[case(vec!["2", "4"], 8)]
#[case(vec!["--b", "4", "2"], 8)]
#[case(vec!["-2", "4"], -8)]
#[case(vec!["2"], EX_USAGE)]
#[case(vec!["2", "four"], EX_USAGE)]
fn multiply(#[case] tokens: Vec<&str>, #[case] expected: i32) {
    let function = Function::new(
        "multiply",
        Signature::new().required("a").required("b"),
        |arguments| Ok((arguments.get::<i64>("a")? * arguments.get::<i64>("b")?) as i32),
    )
    .metadata(Metadata::new().cast("a", Cast::Integer).cast("b", Cast::Integer));

    assert_eq!(dispatch(function, tokens.as_slice()), Ok(expected));
}

#[rstest]
#[case(vec!["--", "--value"], 1)]
#[case(vec!["a", "b", "c"], 3)]
#[case(vec![], 0)]
fn variadic(#[case] tokens: Vec<&str>, #[case] expected: i32) {
    let function = Function::new("args", Signature::new().variadic(), |arguments| {
        Ok(arguments.extra().len() as i32)
    });

    assert_eq!(dispatch(function, tokens.as_slice()), Ok(expected));
}

#[test]
fn variadic_keywords() {
    let calls = RefCell::new(Vec::default());
    let function = recording(
        "kwargs",
        Signature::new().keyword("known", 0).variadic_keywords(),
        &calls,
    );

    assert_eq!(
        run(function, &["--known=1", "--other=x", "--more", "y"]),
        EX_OK
    );

    let calls = calls.into_inner();
    assert_eq!(calls[0].value("known"), Some(&Value::Integer(1)));
    assert_eq!(
        calls[0].extra_named().get("other"),
        Some(&Value::from("x"))
    );
    assert_eq!(calls[0].extra_named().get("more"), Some(&Value::from("y")));
}

#[test]
fn lists() {
    let function = Function::new(
        "lists",
        Signature::new().keyword("value", Value::List(vec![])),
        |arguments| {
            let value: Vec<String> = arguments.get("value")?;
            Ok(value.len() as i32)
        },
    );

    assert_eq!(dispatch(function, &["--value=1,2,3"]), Ok(3));
}

#[test]
fn validation() {
    let function = Function::new("positive", Signature::new().keyword("count", 1), |arguments| {
        Ok(arguments.get::<i64>("count")? as i32)
    })
    .metadata(Metadata::new().validate("count", |value| match value {
        Value::Integer(count) if *count > 0 => Ok(()),
        _ => Err("must be positive".to_string()),
    }));
    let dispatcher = Script::new("positive", function).build_parser().unwrap();

    assert_eq!(dispatcher.run_tokens(&["--count=3"]), 3);
    assert_eq!(dispatcher.run_tokens(&["--count=0"]), EX_USAGE);
}

#[test]
fn custom_cast() {
    let function = Function::new("port", Signature::new().required("port"), |arguments| {
        let port: i64 = arguments.get("port")?;
        Ok((port % 100) as i32)
    })
    .metadata(Metadata::new().cast(
        "port",
        Cast::custom(|token| {
            token
                .trim_start_matches(':')
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| e.to_string())
        }),
    ));
    let dispatcher = Script::new("port", function).build_parser().unwrap();

    assert_eq!(dispatcher.run_tokens(&[":8042"]), 42);
    assert_eq!(dispatcher.run_tokens(&[":http"]), EX_USAGE);
}

#[test]
fn call_error() {
    let function = Function::new("broken", Signature::new(), |_| {
        Err(CallError::new("something went wrong"))
    });

    assert_eq!(dispatch(function, &[]), Ok(EX_USAGE));
}

#[test]
fn from_value() {
    assert_eq!(bool::from_value(&Value::Bool(true)), Some(true));
    assert_eq!(i64::from_value(&Value::from("x")), None);
}
