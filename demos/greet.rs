use callarg::{Function, Metadata, Script, Signature, EX_OK};

fn main() {
    let greet = Function::new(
        "greet",
        Signature::new()
            .required("name")
            .keyword("greeting", "Hello")
            .keyword("times", 1)
            .keyword("loud", false),
        |arguments| {
            let name: String = arguments.get("name")?;
            let greeting: String = arguments.get("greeting")?;
            let times: i64 = arguments.get("times")?;
            let loud: bool = arguments.get("loud")?;
            let mut message = format!("{greeting} {name}!");

            if loud {
                message = message.to_uppercase();
            }

            for _ in 0..times {
                println!("{message}");
            }

            Ok(EX_OK)
        },
    )
    .doc(
        "Greet somebody.

        The greeting is repeated as many times as asked for.",
    )
    .metadata(
        Metadata::new()
            .describe("name", "Who to greet.")
            .abbreviate("times", 'n'),
    );

    Script::new("greet", greet)
        .title("Greeter")
        .version("1.0")
        .copyright("Copyright (C) 2024 The callarg developers.")
        .build()
        .run();
}
