use ariadne::Source;
use gamma_logic::GammaError;

/// Wraps a pipeline error for reporting.
pub struct Error(pub GammaError);

impl Error {
    /// Report the error to stderr, pointing into the input if the error has a span.
    ///
    /// The `ariadne` crate's [`Report`](ariadne::Report) type does not have a `Display`
    /// implementation, so we can only use its `eprint` method to print to stderr.
    pub fn report_to_stderr(&self, input: &str) {
        match self.0.spanned() {
            Some(err) => {
                let report = err.build_report("input");
                if let Err(io) = report.eprint(("input", Source::from(input))) {
                    eprintln!("{}: {}", self.0, io);
                }
            },
            None => eprintln!("error: {}", self.0),
        }
        if let GammaError::Unhandled { trace, .. } = &self.0 {
            eprintln!("{}", trace);
        }
    }
}

impl From<GammaError> for Error {
    fn from(err: GammaError) -> Self {
        Self(err)
    }
}
