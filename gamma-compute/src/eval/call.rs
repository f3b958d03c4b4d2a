use gamma_error::Error;
use gamma_parser::parser::ast::call::Call;
use crate::builtin::Args;
use crate::error::{Cancelled, NotCallable, UndefinedFunction};
use crate::namespace::{Binding, Namespace};
use crate::value::Value;
use super::Eval;

impl Eval for Call {
    fn eval(&self, ns: &Namespace) -> Result<Value, Error> {
        if ns.cancel_token().is_cancelled() {
            return Err(Error::new(self.outer_span().to_vec(), Cancelled));
        }

        let name = &self.name.name;
        let builtin = match ns.get(name) {
            Some(Binding::Builtin(builtin)) => builtin.clone(),
            Some(Binding::Value(value)) => {
                return Err(Error::new(vec![self.name.span.clone()], NotCallable {
                    name: name.clone(),
                    typename: value.typename(),
                }));
            },
            None => {
                return Err(Error::new(vec![self.name.span.clone()], UndefinedFunction {
                    name: name.clone(),
                    suggestions: ns.get_similar_names(name).into_iter().map(str::to_string).collect(),
                }));
            },
        };

        let positional = self.args
            .iter()
            .map(|arg| arg.eval(ns))
            .collect::<Result<Vec<_>, _>>()?;
        let keyword = self.kwargs
            .iter()
            .map(|kwarg| Ok((kwarg.name.name.clone(), kwarg.value.eval(ns)?)))
            .collect::<Result<Vec<_>, Error>>()?;

        Args::bind(builtin.as_ref(), positional, keyword)
            .and_then(|args| builtin.eval(args, ns.cancel_token()))
            .map_err(|err| err.into_error(self))
    }
}
