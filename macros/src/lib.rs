//! Derive macros for Sliver
//!
//! # Available Macros
//!
//! - `#[derive(ActionMap)]` - Rebinds every action creator field to a tag
//!   named after the field
//!
//! # Example
//!
//! ```
//! use sliver_core::prelude::*;
//! use sliver_core::{ActionFromPayload, CreateAction};
//! use sliver_macros::ActionMap;
//!
//! #[derive(ActionMap, Clone, Debug)]
//! struct TodoActions {
//!     add_todo: ActionFromPayload<String>,
//!
//!     #[action(tag = "todos/clear")]
//!     clear: CreateAction,
//! }
//!
//! let actions = actions_from(&TodoActions {
//!     add_todo: action_unnamed().payload(),
//!     clear: action_unnamed(),
//! });
//! assert_eq!(actions.add_todo.create("milk".into()).tag, "add_todo");
//! assert_eq!(actions.clear.create().tag, "todos/clear");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive macro for structs of action creators
///
/// Implements `sliver_core::actions::ActionMap`:
/// - `rebind()` - Returns a copy where each creator is renamed to its key
/// - `tags()` - Returns the tags the creators currently produce
///
/// The key of a field is its name, or the value of `#[action(tag = "...")]`.
/// Every field must implement `sliver_core::action::ActionCreator`.
///
/// # Attributes
///
/// - `#[action(tag = "...")]` - Use the given key instead of the field name
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to anything but a struct with named fields
/// - The `action` attribute is malformed
/// - Two fields share a key
///
/// Enums are rejected:
///
/// ```compile_fail
/// use sliver_macros::ActionMap;
///
/// #[derive(ActionMap, Clone)]
/// enum Actions {
///     Add,
///     Clear,
/// }
/// ```
///
/// So are tuple structs:
///
/// ```compile_fail
/// use sliver_core::CreateAction;
/// use sliver_macros::ActionMap;
///
/// #[derive(ActionMap, Clone)]
/// struct Actions(CreateAction, CreateAction);
/// ```
///
/// A tag override may not collide with another field's key:
///
/// ```compile_fail
/// use sliver_core::CreateAction;
/// use sliver_macros::ActionMap;
///
/// #[derive(ActionMap, Clone)]
/// struct Actions {
///     #[action(tag = "reset")]
///     clear: CreateAction,
///     reset: CreateAction,
/// }
/// ```
///
/// `tag` is the only key `#[action(...)]` accepts:
///
/// ```compile_fail
/// use sliver_core::CreateAction;
/// use sliver_macros::ActionMap;
///
/// #[derive(ActionMap, Clone)]
/// struct Actions {
///     #[action(name = "users/clear")]
///     clear: CreateAction,
/// }
/// ```
#[proc_macro_derive(ActionMap, attributes(action))]
pub fn derive_action_map(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new_spanned(&input, "#[derive(ActionMap)] can only be used on structs")
            .to_compile_error()
            .into();
    };

    let Fields::Named(fields) = &data_struct.fields else {
        return syn::Error::new_spanned(
            &input,
            "#[derive(ActionMap)] requires a struct with named fields",
        )
        .to_compile_error()
        .into();
    };

    let mut idents = Vec::new();
    let mut keys: Vec<String> = Vec::new();

    for field in &fields.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let key = match tag_override(&field.attrs) {
            Ok(Some(tag)) => tag,
            Ok(None) => ident.to_string(),
            Err(error) => return error.to_compile_error().into(),
        };
        if keys.contains(&key) {
            return syn::Error::new_spanned(field, format!("duplicate action key '{key}'"))
                .to_compile_error()
                .into();
        }
        idents.push(ident);
        keys.push(key);
    }

    let expanded = quote! {
        impl #impl_generics ::sliver_core::actions::ActionMap for #name #ty_generics #where_clause {
            fn rebind(&self) -> Self {
                Self {
                    #(
                        #idents: ::sliver_core::action::ActionCreator::rename(&self.#idents, #keys),
                    )*
                }
            }

            fn tags(&self) -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![
                    #(
                        ::std::borrow::ToOwned::to_owned(
                            ::sliver_core::action::ActionCreator::tag(&self.#idents)
                        ),
                    )*
                ]
            }
        }
    };

    TokenStream::from(expanded)
}

/// Reads the key from `#[action(tag = "...")]`, if present
fn tag_override(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut tag = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                let value: LitStr = meta.value()?.parse()?;
                tag = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported action attribute, expected `tag = \"...\"`"))
            }
        })?;
    }
    Ok(tag)
}
