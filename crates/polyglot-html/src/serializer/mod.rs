//! Polyglot XHTML5 serialization.
//!
//! [Polyglot Markup: A robust profile of the HTML5 vocabulary](https://www.w3.org/TR/html-polyglot/)

/// Serializer implementation.
pub mod core;
/// Escaping for text and attribute values.
pub mod escape;
/// Encoder configuration.
pub mod options;
/// The void element registry.
pub mod void_elements;

use std::fmt;
use std::io;

pub use self::core::{Serializer, ToMarkup};
pub use options::{NamespacePrefixResolver, OutputOptions};
pub use void_elements::{VOID_ELEMENTS, is_void};

use crate::error::EncodeError;

/// [§ 13.1.1 The DOCTYPE](https://html.spec.whatwg.org/multipage/syntax.html#the-doctype)
///
/// The shortest DOCTYPE that is valid HTML5 and well-formed XML. The HTML
/// syntax allows any case for `DOCTYPE`; XML requires it upper-case.
pub const DOCTYPE: &str = "<!DOCTYPE html>";

/// Serialize `tree` with the given options into a new string.
#[must_use]
pub fn to_string_with_options<T: ToMarkup + ?Sized>(tree: &T, options: &OutputOptions) -> String {
    let mut out = String::new();
    let _ = Serializer::new(&mut out, options).serialize(tree);
    out
}

/// Write `tree` to `sink`, preceded by the DOCTYPE line when `with_doctype` is set.
///
/// # Errors
///
/// Returns [`EncodeError::Io`] if the sink fails.
pub fn write_markup<W, T>(
    sink: &mut W,
    tree: &T,
    options: &OutputOptions,
    with_doctype: bool,
) -> Result<(), EncodeError>
where
    W: io::Write + ?Sized,
    T: ToMarkup + ?Sized,
{
    let mut adapter = IoAdapter { sink, error: None };
    let mut result = Ok(());
    if with_doctype {
        result = fmt::Write::write_fmt(&mut adapter, format_args!("{DOCTYPE}\n"));
    }
    if result.is_ok() {
        result = Serializer::new(&mut adapter, options).serialize(tree);
    }
    match (result, adapter.error) {
        (Ok(()), _) => Ok(()),
        (Err(fmt::Error), Some(error)) => Err(EncodeError::Io(error)),
        (Err(fmt::Error), None) => Err(EncodeError::Io(io::Error::other("formatter error"))),
    }
}

/// Bridges the serializer's `fmt::Write` output to an `io::Write` sink,
/// keeping the I/O error that `fmt::Error` cannot carry.
struct IoAdapter<'a, W: io::Write + ?Sized> {
    sink: &'a mut W,
    error: Option<io::Error>,
}

impl<W: io::Write + ?Sized> fmt::Write for IoAdapter<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.sink.write_all(s.as_bytes()).map_err(|error| {
            self.error = Some(error);
            fmt::Error
        })
    }
}
