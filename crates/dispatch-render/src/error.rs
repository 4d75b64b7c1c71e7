use core::fmt;
use std::{borrow::Cow, ops::Deref};

use ecow::EcoVec;
use typst::diag::SourceDiagnostic;

/// An error that can occur while rendering a formula or an image.
#[derive(Clone)]
pub struct Error(Box<Repr>);

#[derive(Clone)]
enum Repr {
    /// Just a message.
    Msg(Cow<'static, str>),
    /// Errors reported by the Typst compiler.
    Diagnostics(EcoVec<SourceDiagnostic>),
}

impl Error {
    /// The compiler diagnostics carried by this error, if any.
    pub fn diagnostics(&self) -> Option<&[SourceDiagnostic]> {
        match self.0.deref() {
            Repr::Diagnostics(diags) => Some(diags),
            Repr::Msg(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.deref() {
            Repr::Msg(s) => write!(f, "{s}"),
            Repr::Diagnostics(diags) => {
                for (idx, diag) in diags.iter().enumerate() {
                    if idx > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}", diag.message)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl From<EcoVec<SourceDiagnostic>> for Error {
    fn from(diags: EcoVec<SourceDiagnostic>) -> Self {
        Error(Box::new(Repr::Diagnostics(diags)))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error(Box::new(Repr::Msg(e.to_string().into())))
    }
}

impl From<fmt::Error> for Error {
    fn from(e: fmt::Error) -> Self {
        Error(Box::new(Repr::Msg(e.to_string().into())))
    }
}

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}

impl From<Cow<'static, str>> for Error {
    fn from(s: Cow<'static, str>) -> Self {
        Error(Box::new(Repr::Msg(s)))
    }
}
