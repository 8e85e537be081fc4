mod component;

use proc_macro::TokenStream;

/// Derive `rusty_ecs::ecs::Component` for a struct or enum.
///
/// The component's diagnostic name defaults to the type's identifier and can be overridden with
/// `#[component(name = "...")]`.
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(item: TokenStream) -> TokenStream {
    component::derive_component(item)
}
