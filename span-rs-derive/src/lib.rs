//! This crate provides the derive macros for span-rs.

use proc_macro::TokenStream;

mod contiguous;
use contiguous::contiguous;

#[proc_macro_derive(Contiguous, attributes(contiguous))]
pub fn derive_contiguous(input: TokenStream) -> TokenStream {
    contiguous(input)
}

