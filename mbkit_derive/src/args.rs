use proc_macro2::TokenStream as TokenStream2;
use syn::{
	LitStr, Token,
	parse::{Parse, ParseStream, Result},
};

/// Arguments of `#[context(...)]`: an optional leading `move,` followed by `format!` arguments.
#[derive(Debug)]
pub struct ContextArgs {
	pub move_token: Option<Token![move]>,
	pub format_args: TokenStream2,
}

impl Parse for ContextArgs {
	fn parse(input: ParseStream<'_>) -> Result<Self> {
		let move_token = if input.peek(Token![move]) {
			let token = input.parse()?;
			input.parse::<Token![,]>()?;
			Some(token)
		} else {
			None
		};

		if !input.peek(LitStr) {
			return Err(input.error("expected a format string literal"));
		}

		Ok(Self {
			move_token,
			format_args: input.parse()?,
		})
	}
}
