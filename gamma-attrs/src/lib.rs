mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the [`ErrorKind`] trait for the given struct.
///
/// The information of the error is customized using the `error` attribute:
///
/// ```
/// use gamma_attrs::ErrorKind;
/// use gamma_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "unexpected end of input", labels = ["add something here"])]
/// pub struct Foo;
/// ```
///
/// The following tags are available:
///
/// | Tag       | Description                                                                  |
/// | --------- | ---------------------------------------------------------------------------- |
/// | `message` | The message displayed at the top of the error when it is displayed.          |
/// | `labels`  | An array of label texts, one per span of the error, in the same order.       |
/// | `help`    | Optional help text for the error, describing what the user can do to fix it. |
///
/// Each tag accepts an expression. For structs with named fields, the expression is evaluated
/// with the members of the struct in scope, so they can be used in the expression. Tuple
/// structs are not supported.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl ErrorKind for #name {
            #target
        }
    }.into()
}
