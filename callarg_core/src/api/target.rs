use std::collections::BTreeMap;
use thiserror::Error;

use crate::api::signature::{Metadata, Signature};
use crate::model::Value;
use crate::prelude::FromValue;

/// An error returned by a callable's body.
///
/// The dispatcher reports the error, shows the help message, and exits with [`EX_USAGE`](crate::EX_USAGE).
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct CallError(pub String);

impl CallError {
    /// Create a call error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        CallError(message.into())
    }
}

/// The values bound for one invocation of a callable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    positional: Vec<Value>,
    named: BTreeMap<String, Value>,
    extra: Vec<Value>,
    extra_named: BTreeMap<String, Value>,
}

impl Arguments {
    pub(crate) fn new(
        positional: Vec<(String, Value)>,
        keyword: BTreeMap<String, Value>,
        extra: Vec<Value>,
        extra_named: BTreeMap<String, Value>,
    ) -> Self {
        let mut named = keyword;
        let positional = positional
            .into_iter()
            .map(|(name, value)| {
                named.insert(name, value.clone());
                value
            })
            .collect();

        Self {
            positional,
            named,
            extra,
            extra_named,
        }
    }

    /// Get a parameter's value by name (required or keyword parameter).
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    /// Get a parameter's value by name, as `T`.
    ///
    /// ### Example
    /// ```
    /// # use callarg_core as callarg;
    /// use callarg::{Function, Script, Signature};
    ///
    /// let greet = Function::new("greet", Signature::new().keyword("times", 1), |arguments| {
    ///     let times: i64 = arguments.get("times")?;
    ///     Ok(times as i32)
    /// });
    /// let dispatcher = Script::new("greet", greet).build_parser().unwrap();
    ///
    /// assert_eq!(dispatcher.run_tokens(&["--times=3"]), 3);
    /// ```
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, CallError> {
        match self.named.get(name) {
            Some(value) => T::from_value(value).ok_or_else(|| {
                CallError(format!(
                    "parameter '{name}' holds a {} value, which is not a {}.",
                    value.type_name(),
                    std::any::type_name::<T>(),
                ))
            }),
            None => Err(CallError(format!("parameter '{name}' does not exist."))),
        }
    }

    /// The values of the required parameters, in declaration order.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// The extra positional values (only populated for [`Signature::variadic`] callables).
    pub fn extra(&self) -> &[Value] {
        &self.extra
    }

    /// The extra named values (only populated for [`Signature::variadic_keywords`] callables).
    pub fn extra_named(&self) -> &BTreeMap<String, Value> {
        &self.extra_named
    }
}

type Body<'a> = dyn Fn(Arguments) -> Result<i32, CallError> + 'a;
type Constructor<'a, S> = dyn Fn(Arguments) -> Result<S, CallError> + 'a;
type MethodBody<'a, S> = dyn Fn(&mut S, Arguments) -> Result<i32, CallError> + 'a;

/// The declaration of one callable: everything the specification is derived from.
#[derive(Debug, Clone)]
pub(crate) struct Shape {
    pub(crate) name: String,
    pub(crate) signature: Signature,
    pub(crate) metadata: Metadata,
    pub(crate) doc: Option<String>,
}

impl Shape {
    fn new(name: impl Into<String>, signature: Signature) -> Self {
        Self {
            name: name.into(),
            signature,
            metadata: Metadata::default(),
            doc: None,
        }
    }

    pub(crate) fn is_public(&self) -> bool {
        !self.name.starts_with('_')
    }
}

/// A plain callable target.
///
/// ### Example
/// ```
/// # use callarg_core as callarg;
/// use callarg::{Function, Script, Signature};
///
/// let single = Function::new("single", Signature::new().required("name"), |arguments| {
///     let name: String = arguments.get("name")?;
///     println!("Hello {name}!");
///     Ok(0)
/// })
/// .doc("Say hello to somebody.");
///
/// let dispatcher = Script::new("single", single).build_parser().unwrap();
/// assert_eq!(dispatcher.run_tokens(&["world"]), 0);
/// ```
pub struct Function<'a> {
    pub(crate) shape: Shape,
    body: Box<Body<'a>>,
}

impl<'a> Function<'a> {
    /// Declare a function from its name, signature and body.
    /// The body returns the exit status of the program.
    pub fn new(
        name: impl Into<String>,
        signature: Signature,
        body: impl Fn(Arguments) -> Result<i32, CallError> + 'a,
    ) -> Self {
        Self {
            shape: Shape::new(name, signature),
            body: Box::new(body),
        }
    }

    /// Document the function.
    /// The first paragraph is the summary; any further paragraphs are the long description.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.shape.doc.replace(doc.into());
        self
    }

    /// Attach parameter metadata (descriptions, casts, abbreviations, validators).
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.shape.metadata = metadata;
        self
    }

    pub(crate) fn invoke(&self, arguments: Arguments) -> Result<i32, CallError> {
        (self.body)(arguments)
    }
}

/// A method of a [`Class`]: the sub-command of a class target.
pub struct Method<'a, S> {
    pub(crate) shape: Shape,
    body: Box<MethodBody<'a, S>>,
}

impl<'a, S> Method<'a, S> {
    /// Declare a method from its (command) name, signature and body.
    /// The body receives the instance built by the class constructor.
    ///
    /// Methods whose name starts with `_` are private: they are neither listed nor dispatched to.
    pub fn new(
        name: impl Into<String>,
        signature: Signature,
        body: impl Fn(&mut S, Arguments) -> Result<i32, CallError> + 'a,
    ) -> Self {
        Self {
            shape: Shape::new(name, signature),
            body: Box::new(body),
        }
    }

    /// Document the method.
    /// The first paragraph is the summary listed with the class's commands.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.shape.doc.replace(doc.into());
        self
    }

    /// Attach parameter metadata (descriptions, casts, abbreviations, validators).
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.shape.metadata = metadata;
        self
    }
}

/// A class target: a constructor (taking the class level arguments) and a closed set of commands.
/// Each command is either one of its methods, or a nested class with commands of its own.
///
/// ### Example
/// ```
/// # use callarg_core as callarg;
/// use callarg::{Class, Method, Script, Signature};
///
/// struct Bar {
///     argument: String,
/// }
///
/// let class = Class::new("Bar", Signature::new().required("argument"), |arguments| {
///     Ok(Bar { argument: arguments.get("argument")? })
/// })
/// .command(Method::new("foo", Signature::new(), |bar: &mut Bar, _| {
///     Ok(bar.argument.len() as i32)
/// }));
///
/// let dispatcher = Script::new("bar", class).build_parser().unwrap();
/// assert_eq!(dispatcher.run_tokens(&["world", "foo"]), 5);
/// ```
pub struct Class<'a, S> {
    pub(crate) shape: Shape,
    constructor: Box<Constructor<'a, S>>,
    commands: BTreeMap<String, Command<'a, S>>,
}

enum Command<'a, S> {
    Method(Method<'a, S>),
    Group(Box<dyn Instantiable + 'a>),
}

impl<'a, S> Command<'a, S> {
    fn shape(&self) -> &Shape {
        match self {
            Command::Method(method) => &method.shape,
            Command::Group(class) => class.shape(),
        }
    }
}

impl<'a, S> Class<'a, S> {
    /// Declare a class from its name, constructor signature and constructor.
    pub fn new(
        name: impl Into<String>,
        signature: Signature,
        constructor: impl Fn(Arguments) -> Result<S, CallError> + 'a,
    ) -> Self {
        Self {
            shape: Shape::new(name, signature),
            constructor: Box::new(constructor),
            commands: BTreeMap::default(),
        }
    }

    /// Document the class.
    /// The first paragraph is the summary; any further paragraphs are the long description.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.shape.doc.replace(doc.into());
        self
    }

    /// Attach constructor parameter metadata (descriptions, casts, abbreviations, validators).
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.shape.metadata = metadata;
        self
    }

    /// Register a method as a sub-command.
    /// If repeated for the same name, only the final command will apply.
    pub fn command(mut self, method: Method<'a, S>) -> Self {
        self.commands
            .insert(method.shape.name.clone(), Command::Method(method));
        self
    }

    /// Register a nested class as a sub-command, named after the class.
    /// The nested class takes its own constructor arguments after the command name, followed by one of its commands.
    /// If repeated for the same name, only the final command will apply.
    ///
    /// ### Example
    /// ```
    /// # use callarg_core as callarg;
    /// use callarg::{Class, Method, Script, Signature};
    ///
    /// let ship = Class::new("ship", Signature::new(), |_| Ok(()))
    ///     .command(Method::new("new", Signature::new().required("name"), |_: &mut (), arguments| {
    ///         let name: String = arguments.get("name")?;
    ///         Ok(name.len() as i32)
    ///     }));
    /// let fleet = Class::new("fleet", Signature::new(), |_| Ok(())).group(ship);
    ///
    /// let dispatcher = Script::new("naval", fleet).build_parser().unwrap();
    /// assert_eq!(dispatcher.run_tokens(&["ship", "new", "Titanic"]), 7);
    /// ```
    pub fn group<T: 'a>(mut self, class: Class<'a, T>) -> Self {
        self.commands
            .insert(class.shape.name.clone(), Command::Group(Box::new(class)));
        self
    }
}

/// Behaviour of a class target, with the instance type `S` erased.
pub(crate) trait Instantiable {
    fn shape(&self) -> &Shape;

    /// The public commands, ordered by name.
    fn commands(&self) -> Vec<&Shape>;

    /// The public command by this name, when it is a nested class.
    fn group(&self, name: &str) -> Option<&dyn Instantiable>;

    fn instantiate(&self, arguments: Arguments) -> Result<Box<dyn Instance + '_>, CallError>;
}

/// A constructed class instance, ready to run one of its methods.
pub(crate) trait Instance {
    fn invoke(&mut self, command: &str, arguments: Arguments) -> Option<Result<i32, CallError>>;
}

struct Live<'c, 'a, S> {
    class: &'c Class<'a, S>,
    state: S,
}

impl<'c, 'a, S> Instance for Live<'c, 'a, S> {
    fn invoke(&mut self, command: &str, arguments: Arguments) -> Option<Result<i32, CallError>> {
        match self.class.commands.get(command)? {
            Command::Method(method) if method.shape.is_public() => {
                Some((method.body)(&mut self.state, arguments))
            }
            _ => None,
        }
    }
}

impl<'a, S> Instantiable for Class<'a, S> {
    fn shape(&self) -> &Shape {
        &self.shape
    }

    fn commands(&self) -> Vec<&Shape> {
        self.commands
            .values()
            .map(Command::shape)
            .filter(|shape| shape.is_public())
            .collect()
    }

    fn group(&self, name: &str) -> Option<&dyn Instantiable> {
        match self.commands.get(name)? {
            Command::Group(class) if class.shape().is_public() => Some(class.as_ref()),
            _ => None,
        }
    }

    fn instantiate(&self, arguments: Arguments) -> Result<Box<dyn Instance + '_>, CallError> {
        let state = (self.constructor)(arguments)?;
        Ok(Box::new(Live { class: self, state }))
    }
}

pub(crate) enum TargetInner<'a> {
    Function(Function<'a>),
    Class(Box<dyn Instantiable + 'a>),
}

/// The thing being dispatched to: either a [`Function`] or a [`Class`].
pub struct Target<'a>(pub(crate) TargetInner<'a>);

impl<'a> From<Function<'a>> for Target<'a> {
    fn from(function: Function<'a>) -> Self {
        Target(TargetInner::Function(function))
    }
}

impl<'a, S: 'a> From<Class<'a, S>> for Target<'a> {
    fn from(class: Class<'a, S>) -> Self {
        Target(TargetInner::Class(Box::new(class)))
    }
}
