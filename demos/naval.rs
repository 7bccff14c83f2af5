use callarg::{CallError, Cast, Class, Metadata, Method, Script, Signature, EX_OK};

fn coordinates() -> Metadata {
    Metadata::new().cast("x", Cast::Float).cast("y", Cast::Float)
}

fn main() {
    let ship = Class::new(
        "ship",
        Signature::new().keyword("verbose", false),
        |arguments| arguments.get::<bool>("verbose"),
    )
    .doc("Manage ships.")
    .command(
        Method::new(
            "new",
            Signature::new().required("name"),
            |_: &mut bool, arguments| {
                let name: String = arguments.get("name")?;
                println!("Created ship {name}.");
                Ok(EX_OK)
            },
        )
        .doc("Create a new ship."),
    )
    .command(
        Method::new(
            "move",
            Signature::new()
                .required("ship")
                .required("x")
                .required("y")
                .keyword("speed", 10),
            |verbose: &mut bool, arguments| {
                let ship: String = arguments.get("ship")?;
                let x: f64 = arguments.get("x")?;
                let y: f64 = arguments.get("y")?;
                let speed: i64 = arguments.get("speed")?;

                if *verbose {
                    eprintln!("[{ship}] setting course at {speed} knots");
                }

                println!("Moving ship {ship} to ({x}, {y}) with speed {speed} knots.");
                Ok(EX_OK)
            },
        )
        .doc("Move SHIP to the new location X, Y.\n\nThe ship travels in a straight line.")
        .metadata(coordinates().describe("speed", "Speed in knots.")),
    )
    .command(
        Method::new(
            "shoot",
            Signature::new().required("ship").required("x").required("y"),
            |_: &mut bool, arguments| {
                let ship: String = arguments.get("ship")?;
                let x: f64 = arguments.get("x")?;
                let y: f64 = arguments.get("y")?;

                if x < 0.0 || y < 0.0 {
                    return Err(CallError::new("out of range"));
                }

                println!("Ship {ship} fires at ({x}, {y}).");
                Ok(EX_OK)
            },
        )
        .doc("Make SHIP fire at position X, Y.")
        .metadata(coordinates()),
    )
    .command(Method::new(
        "_scuttle",
        Signature::new(),
        |_: &mut bool, _| Ok(EX_OK),
    ));

    let mine = Class::new("mine", Signature::new(), |_| Ok(()))
        .doc("Manage mines.")
        .command(
            Method::new(
                "set",
                Signature::new()
                    .required("x")
                    .required("y")
                    .keyword("drifting", false),
                |_: &mut (), arguments| {
                    let x: f64 = arguments.get("x")?;
                    let y: f64 = arguments.get("y")?;
                    let kind = if arguments.get::<bool>("drifting")? {
                        "drifting"
                    } else {
                        "moored"
                    };
                    println!("Set {kind} mine at ({x}, {y}).");
                    Ok(EX_OK)
                },
            )
            .doc("Set a mine at a specific coordinate.")
            .metadata(coordinates()),
        )
        .command(
            Method::new(
                "remove",
                Signature::new().required("x").required("y"),
                |_: &mut (), arguments| {
                    let x: f64 = arguments.get("x")?;
                    let y: f64 = arguments.get("y")?;
                    println!("Removed mine at ({x}, {y}).");
                    Ok(EX_OK)
                },
            )
            .doc("Remove a mine at a specific coordinate.")
            .metadata(coordinates()),
        );

    let naval = Class::new("NavalFate", Signature::new(), |_| Ok(()))
        .doc("Naval Fate.\n\nAn adaption of the docopt naval example.")
        .group(ship)
        .group(mine);

    Script::new("naval", naval)
        .title("Naval Fate")
        .version("2.0")
        .license("Distributed under the MIT license.")
        .build()
        .run();
}
