use callarg::{Cast, Function, Metadata, Script, Signature, Value, EX_OK};

fn main() {
    let fetch = Function::new(
        "fetch",
        Signature::new()
            .required("url")
            .keyword("retries", 3)
            .keyword("headers", Value::List(vec![]))
            .variadic_keywords(),
        |arguments| {
            let url: String = arguments.get("url")?;
            let retries: i64 = arguments.get("retries")?;
            let headers: Vec<String> = arguments.get("headers")?;
            println!("GET {url} (retries: {retries})");

            for header in headers {
                println!("  {header}");
            }

            for (name, value) in arguments.extra_named() {
                println!("  extra {name}={value}");
            }

            Ok(EX_OK)
        },
    )
    .doc("Fetch a url.")
    .metadata(
        Metadata::new()
            .cast(
                "url",
                Cast::custom(|token| {
                    if token.starts_with("http://") || token.starts_with("https://") {
                        Ok(Value::Text(token.to_string()))
                    } else {
                        Err("expected an http(s) url".to_string())
                    }
                }),
            )
            .validate("retries", |value| match value {
                Value::Integer(retries) if (0..=10).contains(retries) => Ok(()),
                _ => Err("must be between 0 and 10".to_string()),
            })
            .describe("headers", "Comma separated headers to send."),
    );

    Script::new("fetch", fetch).build().run();
}
