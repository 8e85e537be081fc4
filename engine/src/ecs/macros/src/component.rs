use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr, parse_macro_input};

pub fn derive_component(input: TokenStream) -> TokenStream {
    // Parse the input tokens into a syntax tree
    let ast = parse_macro_input!(input as DeriveInput);

    // Get the type name we are annotating
    let type_name = &ast.ident;

    let mut name = LitStr::new(&type_name.to_string(), type_name.span());
    for attr in ast.attrs.iter().filter(|a| a.path().is_ident("component")) {
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = meta.value()?.parse()?;
                Ok(())
            } else {
                Err(meta.error("unsupported component attribute, expected `name = \"...\"`"))
            }
        });
        if let Err(err) = parsed {
            return err.to_compile_error().into();
        }
    }

    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    // Use ::rusty_ecs::ecs::Component which works both inside and outside the crate.
    // Inside the crate, this works because of `extern crate self as rusty_ecs;` in lib.rs
    // Outside the crate, this naturally resolves to the rusty_ecs dependency.
    TokenStream::from(quote! {
        impl #impl_generics ::rusty_ecs::ecs::Component for #type_name #ty_generics #where_clause {
            const NAME: ::core::option::Option<&'static str> = ::core::option::Option::Some(#name);
        }
    })
}
