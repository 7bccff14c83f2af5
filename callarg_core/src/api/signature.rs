use std::collections::BTreeMap;

use crate::api::capture::{Cast, Validator};
use crate::model::Value;

/// The declared parameters of a callable.
///
/// This is what a reflective language would read off the function itself:
/// * the *required* parameters, bound positionally (or by name),
/// * the *keyword* parameters along with their default values,
/// * whether unlimited extra positional values are accepted,
/// * whether unlimited extra named values are accepted.
///
/// ### Example
/// ```
/// # use callarg_core as callarg;
/// use callarg::Signature;
///
/// // Think: `def copy(source, target, verbose=False, retries=3, *rest)`
/// let signature = Signature::new()
///     .required("source")
///     .required("target")
///     .keyword("verbose", false)
///     .keyword("retries", 3)
///     .variadic();
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    required: Vec<String>,
    keywords: Vec<(String, Value)>,
    variadic: bool,
    variadic_keywords: bool,
}

impl Signature {
    /// Create an empty signature (a callable without parameters).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required parameter.
    /// The order of required parameters is their positional order on the command line.
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Add a keyword parameter with its default value.
    /// The variant of the default decides how tokens for this parameter are cast.
    pub fn keyword(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.keywords.push((name.into(), default.into()));
        self
    }

    /// Accept unlimited extra positional values (think: `*args`).
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Accept unlimited extra named values (think: `**kwargs`).
    pub fn variadic_keywords(mut self) -> Self {
        self.variadic_keywords = true;
        self
    }

    pub(crate) fn required_names(&self) -> &[String] {
        &self.required
    }

    pub(crate) fn keyword_defaults(&self) -> &[(String, Value)] {
        &self.keywords
    }

    pub(crate) fn accepts_extra_positional(&self) -> bool {
        self.variadic
    }

    pub(crate) fn accepts_extra_keyword(&self) -> bool {
        self.variadic_keywords
    }
}

/// Out-of-band configuration for the parameters of a callable.
///
/// Anything configured here takes precedence over what is inferred from the [`Signature`].
/// Each entry must name a parameter of the signature it is attached to.
///
/// ### Example
/// ```
/// # use callarg_core as callarg;
/// use callarg::{Cast, Metadata};
///
/// let metadata = Metadata::new()
///     .describe("speed", "Speed in knots.")
///     .cast("x", Cast::Float)
///     .abbreviate("speed", 'k');
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub(crate) descriptions: BTreeMap<String, String>,
    pub(crate) casts: BTreeMap<String, Cast>,
    pub(crate) abbreviations: BTreeMap<String, char>,
    pub(crate) validators: BTreeMap<String, Validator>,
}

impl Metadata {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Document a parameter for the help message.
    /// If repeated, only the final description will apply.
    pub fn describe(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.descriptions.insert(name.into(), description.into());
        self
    }

    /// Explicitly set how a parameter's tokens are cast.
    pub fn cast(mut self, name: impl Into<String>, cast: Cast) -> Self {
        self.casts.insert(name.into(), cast);
        self
    }

    /// Explicitly set a parameter's short name (used in `-x` style flags).
    pub fn abbreviate(mut self, name: impl Into<String>, short: char) -> Self {
        self.abbreviations.insert(name.into(), short);
        self
    }

    /// Check a parameter's value after it has been cast; `Err(message)` rejects the value.
    pub fn validate(
        mut self,
        name: impl Into<String>,
        check: impl Fn(&Value) -> Result<(), String> + 'static,
    ) -> Self {
        self.validators.insert(name.into(), Validator::new(check));
        self
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &String> {
        self.descriptions
            .keys()
            .chain(self.casts.keys())
            .chain(self.abbreviations.keys())
            .chain(self.validators.keys())
    }
}

/// Descriptive information about the whole script, shown by `--version`.
///
/// The `-V, --version` option is only offered when a title or a version is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptInfo {
    pub(crate) title: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) copyright: Option<String>,
    pub(crate) license: Option<String>,
}

impl ScriptInfo {
    pub(crate) fn is_versioned(&self) -> bool {
        self.title.is_some() || self.version.is_some()
    }
}
