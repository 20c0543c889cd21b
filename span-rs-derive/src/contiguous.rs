use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Generics, Ident, Member, Type, parse_macro_input, parse_quote,
    spanned::Spanned,
};

pub fn contiguous(input: TokenStream) -> TokenStream {
    let input: DeriveInput = parse_macro_input!(input);
    match contiguous_derive(input) {
        Ok(tokens) => tokens,
        Err(e) => e.into_compile_error(),
    }
    .into()
}

/// The field that holds the elements.
struct Storage {
    member: Member,
    ty: Type,
    read_only: bool,
}

fn contiguous_derive(input: DeriveInput) -> Result<TokenStream2, syn::Error> {
    let DeriveInput {
        ident,
        data,
        generics,
        ..
    } = input;

    let strukt = match data {
        Data::Struct(strukt) => strukt,
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                ident,
                "Contiguous only applies to structs",
            ));
        }
    };

    let mut marked = None;
    for (i, field) in strukt.fields.iter().enumerate() {
        let Some(attr) = field
            .attrs
            .iter()
            .find(|attr| attr.path().is_ident("contiguous"))
        else {
            continue;
        };
        if marked.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "only one field can be marked #[contiguous]",
            ));
        }
        marked = Some(Storage {
            member: member(i, field),
            ty: field.ty.clone(),
            read_only: read_only(attr)?,
        });
    }

    let storage = match marked {
        Some(storage) => storage,
        None if strukt.fields.len() == 1 => {
            let field = strukt.fields.iter().next().ok_or_else(|| {
                syn::Error::new_spanned(&ident, "expected a field")
            })?;
            Storage {
                member: member(0, field),
                ty: field.ty.clone(),
                read_only: false,
            }
        }
        None => {
            return Err(syn::Error::new_spanned(
                ident,
                "mark the field that holds the elements with #[contiguous]",
            ));
        }
    };

    Ok(generate_impl(ident, generics, storage))
}

fn member(i: usize, field: &syn::Field) -> Member {
    field
        .ident
        .clone()
        .map(Member::Named)
        .unwrap_or_else(|| {
            Member::Unnamed(syn::Index {
                index: i as u32,
                span: field.span(),
            })
        })
}

/// Parses `#[contiguous]` or `#[contiguous(read_only)]`.
fn read_only(attr: &Attribute) -> Result<bool, syn::Error> {
    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok(false);
    }
    let mut read_only = false;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("read_only") {
            read_only = true;
            Ok(())
        } else {
            Err(meta.error("expected `read_only`"))
        }
    })?;
    Ok(read_only)
}

fn generate_impl(ident: Ident, generics: Generics, storage: Storage) -> TokenStream2 {
    let Storage {
        member,
        ty,
        read_only,
    } = storage;

    let mut shared = generics.clone();
    shared
        .make_where_clause()
        .predicates
        .push(parse_quote!(#ty: ::span_rs::Contiguous));
    let (impl_generics, ty_generics, where_clause) = shared.split_for_impl();

    let shared_impl = quote! {
        #[automatically_derived]
        unsafe impl #impl_generics ::span_rs::Contiguous for #ident #ty_generics #where_clause {
            type Item = <#ty as ::span_rs::Contiguous>::Item;

            #[inline]
            fn as_ptr(&self) -> *const Self::Item {
                <#ty as ::span_rs::Contiguous>::as_ptr(&self.#member)
            }

            #[inline]
            fn len(&self) -> usize {
                <#ty as ::span_rs::Contiguous>::len(&self.#member)
            }
        }
    };

    if read_only {
        return shared_impl;
    }

    let mut exclusive = generics;
    exclusive
        .make_where_clause()
        .predicates
        .push(parse_quote!(#ty: ::span_rs::ContiguousMut));
    let (impl_generics, ty_generics, where_clause) = exclusive.split_for_impl();

    quote! {
        #shared_impl

        #[automatically_derived]
        unsafe impl #impl_generics ::span_rs::ContiguousMut for #ident #ty_generics #where_clause {
            #[inline]
            fn as_mut_ptr(&mut self) -> *mut Self::Item {
                <#ty as ::span_rs::ContiguousMut>::as_mut_ptr(&mut self.#member)
            }
        }
    }
}
