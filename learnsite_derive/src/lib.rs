use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitInt, parse_macro_input};

/// Register a SeaORM entity for table creation.
///
/// Put it next to `DeriveEntityModel` on the `Model` struct. The expansion
/// submits a `learnsite::SiteEntityInfo` pointing at the sibling `Entity`, so
/// `SiteDb::get_schema_registry(prefix)` can find it by module path.
#[proc_macro_derive(SiteEntity)]
pub fn derive_site_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !matches!(input.data, Data::Struct(_)) {
        return syn::Error::new_spanned(&input.ident, "SiteEntity derive only supports structs")
            .to_compile_error()
            .into();
    }

    let expanded = quote! {
        const _: () = {
            fn __learnsite_schema(
                backend: ::learnsite::sea_orm::DatabaseBackend,
            ) -> (::std::string::String, ::learnsite::TableMeta) {
                ::learnsite::registry::entity_schema::<Entity>(backend)
            }

            ::learnsite::inventory::submit! {
                ::learnsite::SiteEntityInfo {
                    module_path: module_path!(),
                    schema_fn: __learnsite_schema,
                }
            }
        };
    };

    TokenStream::from(expanded)
}

/// Derive `learnsite::forms::ModelForm` for a struct of required fields.
///
/// Every field type must implement `learnsite::forms::FormValue`. Use
/// `#[form(max_length = N)]` to cap the submitted length in characters.
#[proc_macro_derive(ModelForm, attributes(form))]
pub fn derive_model_form(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "ModelForm derive only supports named fields")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "ModelForm derive only supports structs")
                .to_compile_error()
                .into();
        }
    };

    let mut idents = Vec::new();
    let mut names = Vec::new();
    let mut types = Vec::new();
    let mut max_lengths = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };

        let mut max_length = quote! { ::core::option::Option::None };
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("form")) {
            let parsed = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("max_length") {
                    let lit: LitInt = meta.value()?.parse()?;
                    let n: usize = lit.base10_parse()?;
                    max_length = quote! { ::core::option::Option::Some(#n) };
                    Ok(())
                } else {
                    Err(meta.error("unsupported form attribute, expected `max_length`"))
                }
            });
            if let Err(err) = parsed {
                return err.to_compile_error().into();
            }
        }

        names.push(ident.to_string());
        idents.push(ident);
        types.push(&field.ty);
        max_lengths.push(max_length);
    }

    let expanded = quote! {
        #[automatically_derived]
        impl ::learnsite::forms::ModelForm for #name {
            const FIELDS: &'static [&'static str] = &[#(#names),*];

            fn bind(
                data: &::learnsite::forms::FormData,
            ) -> ::core::result::Result<Self, ::learnsite::forms::FormErrors> {
                let mut errors = ::learnsite::forms::FormErrors::default();
                #(
                    let #idents = ::learnsite::forms::clean_field::<#types>(
                        data, #names, #max_lengths, &mut errors,
                    );
                )*
                match (#(#idents,)*) {
                    (#(::core::option::Option::Some(#idents),)*) => {
                        ::core::result::Result::Ok(Self { #(#idents),* })
                    }
                    _ => ::core::result::Result::Err(errors),
                }
            }
        }
    };

    TokenStream::from(expanded)
}
