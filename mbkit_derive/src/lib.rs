//! Procedural macros shared by the mbkit crates.
//!
//! The only macro is [`macro@context`], which wraps a function returning
//! `anyhow::Result` so that every error leaving it carries an extra line of context.

mod args;

use args::ContextArgs;
use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::{ToTokens, quote};
use syn::{ItemFn, ReturnType, parse_macro_input};

/// Attach a formatted context message to any error returned by the annotated function.
///
/// ```ignore
/// #[context("opening container '{}'", path.display())]
/// fn open(path: &Path) -> anyhow::Result<Connection> { ... }
/// ```
///
/// The arguments are passed to `format!` only when an error occurs, so they may refer
/// to the function's parameters. Prefix them with `move,` if the body consumes a
/// parameter that the message does not need.
#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let ContextArgs {
		move_token,
		format_args,
	} = parse_macro_input!(args as ContextArgs);
	let mut function = parse_macro_input!(input as ItemFn);

	if let Some(asyncness) = &function.sig.asyncness {
		return syn::Error::new_spanned(asyncness, "#[context] does not support async functions")
			.to_compile_error()
			.into();
	}

	let return_type = match &function.sig.output {
		ReturnType::Default => {
			return syn::Error::new_spanned(&function.sig, "#[context] requires a function returning Result")
				.to_compile_error()
				.into();
		}
		ReturnType::Type(_, ty) => ty.clone(),
	};

	let body = &function.block;
	let err = Ident::new("err", Span::mixed_site());
	let once = Ident::new("once", Span::mixed_site());

	// Dropping a non-`Copy` value inside the closure forces it to be `FnOnce`,
	// so the body may move out of captured parameters.
	let wrapped = quote! {
		let #once = ::std::vec::Vec::<()>::new();
		(#move_token || -> #return_type {
			::core::mem::drop(#once);
			#body
		})()
		.map_err(|#err| #err.context(format!(#format_args)).into())
	};

	function.block.stmts = vec![syn::Stmt::Expr(syn::Expr::Verbatim(wrapped), None)];
	function.into_token_stream().into()
}
