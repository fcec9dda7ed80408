use std::error::Error as StdError;
use std::fmt;

/// A `Result` alias where `Err` case is `mongo_fluent::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// The errors that may occur when building or executing a query.
pub struct Error {
    inner: Box<Inner>,
}

pub(crate) type Source = Box<dyn StdError + Send + Sync>;

struct Inner {
    kind: Kind,
    operation: Option<&'static str>,
    source: Option<Source>,
}

impl Error {
    pub(crate) fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                operation: None,
                source: None,
            }),
        }
    }

    pub(crate) fn with<S: Into<Source>>(mut self, source: S) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    pub(crate) fn during(mut self, operation: &'static str) -> Error {
        self.inner.operation = Some(operation);
        self
    }

    /// Returns the kind of this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mongo_fluent::{ErrorKind, Query};
    ///
    /// let mut query = Query::new();
    /// if let Err(e) = query.filter(("", 1)) {
    ///     match e.kind() {
    ///         ErrorKind::Validation => println!("we have a validation error..."),
    ///         _ => {}
    ///     }
    /// }
    /// ```
    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Returns the name of the operation that raised this error, if known.
    pub fn operation(&self) -> Option<&'static str> {
        self.inner.operation
    }

    /// Creates a custom `Kind::Validation` error.
    ///
    /// This is useful when implementing [`Driver`](crate::Driver) or
    /// [`Collection`](crate::Collection) by hand.
    pub fn invalid_argument<E: Into<Source>>(error: E) -> Error {
        Error::new(Kind::Validation).with(error)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = fmt.debug_struct("mongo_fluent::Error");
        builder.field("kind", &self.inner.kind);
        if let Some(operation) = self.inner.operation {
            builder.field("operation", &operation);
        }
        if let Some(ref source) = self.inner.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = match self.inner.kind {
            Kind::Bson => "bson error",
            Kind::Config => "configuration error",
            Kind::Driver => "driver error",
            Kind::Runtime => "runtime error",
            Kind::Validation => "invalid argument",
        };
        if let Some(operation) = self.inner.operation {
            write!(f, "{}(): ", operation)?;
        }
        if let Some(ref source) = self.inner.source {
            write!(f, "{}: {}", desc, source)
        } else {
            f.write_str(desc)
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

impl From<bson::ser::Error> for Error {
    fn from(err: bson::ser::Error) -> Self {
        bson(err)
    }
}

impl From<bson::de::Error> for Error {
    fn from(err: bson::de::Error) -> Self {
        bson(err)
    }
}

/// The `Kind` of `mongo_fluent::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A document could not be converted to or from BSON.
    Bson,
    /// The configuration is missing a required value or could not be loaded.
    Config,
    /// The underlying driver reported a failure.
    Driver,
    /// The driver thread could not be reached.
    Runtime,
    /// An argument given to a builder or terminal operation was rejected.
    Validation,
}

// Helpers
pub(crate) fn bson<E: Into<Source>>(e: E) -> Error {
    Error::new(Kind::Bson).with(e)
}

pub(crate) fn config<E: Into<Source>>(e: E) -> Error {
    Error::new(Kind::Config).with(e)
}

pub(crate) fn driver<E: Into<Source>>(e: E) -> Error {
    Error::new(Kind::Driver).with(e)
}

pub(crate) fn runtime<E: Into<Source>>(e: E) -> Error {
    Error::new(Kind::Runtime).with(e)
}

pub(crate) fn validation<E: Into<Source>>(operation: &'static str, e: E) -> Error {
    Error::new(Kind::Validation).with(e).during(operation)
}

/// Funnels every failure through one place.
///
/// With `debug` enabled the error is logged and handed back to the caller. Without it the error
/// is only traced and the caller continues with `T::default()`, which turns the failed operation
/// into a no-op.
pub(crate) fn report<T: Default>(debug: bool, err: Error) -> Result<T> {
    if debug {
        error!("{}", err);
        Err(err)
    } else {
        debug!("suppressed: {}", err);
        Ok(T::default())
    }
}
