extern crate proc_macro;

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::Data::Enum;
use syn::{DeriveInput, Expr, ExprLit, Ident, Lit, Meta, Variant};

fn fieldless_variants<'a>(ast: &'a DeriveInput, macro_name: &str) -> Vec<&'a Variant> {
    let name = &ast.ident;

    let Enum(data) = &ast.data
    else {
        panic!("{macro_name} derive macro can only be applied to enums; {name} is not an enum")
    };

    data.variants
        .iter()
        .map(|variant| {
            if !variant.fields.is_empty() {
                let variant_name = &variant.ident;
                panic!("{macro_name} macro only supports enums with only fieldless variants; {name}::{variant_name} has fields");
            }
            variant
        })
        .collect()
}

// Reads `#[display = "..."]` off a variant, if present
fn display_override(variant: &Variant) -> Option<String> {
    variant.attrs.iter().find_map(|attr| {
        if !attr.path().is_ident("display") {
            return None;
        }

        match &attr.meta {
            Meta::NameValue(name_value) => match &name_value.value {
                Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Some(s.value()),
                _ => panic!("display attribute value must be a string literal"),
            },
            _ => panic!("display attribute must have the form #[display = \"...\"]"),
        }
    })
}

/// Implement the `std::fmt::Display` trait for the given enum. Only supports enums which have only
/// fieldless variants. A variant is displayed as its name unless it carries a
/// `#[display = "..."]` attribute.
#[proc_macro_derive(EnumDisplay, attributes(display))]
pub fn enum_display(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = syn::parse(input).expect("unable to parse input");

    let name = &ast.ident;

    let match_arms: Vec<_> = fieldless_variants(&ast, "EnumDisplay")
        .into_iter()
        .map(|variant| {
            let variant_name = &variant.ident;
            let display_str = display_override(variant).unwrap_or_else(|| variant_name.to_string());
            quote! {
                Self::#variant_name => write!(f, #display_str)
            }
        })
        .collect();

    let gen = quote! {
        impl std::fmt::Display for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    #(#match_arms,)*
                }
            }
        }
    };

    gen.into()
}

/// Implement the `std::str::FromStr` trait for the given enum, with `FromStr::Err` set to `String`.
/// Only supports enums which have only fieldless variants. The generated implementation will be
/// case-insensitive and matches on variant names.
#[proc_macro_derive(EnumFromStr)]
pub fn enum_from_str(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = syn::parse(input).expect("unable to parse input");

    let name = &ast.ident;

    let match_arms: Vec<_> = fieldless_variants(&ast, "EnumFromStr")
        .into_iter()
        .map(|variant| {
            let variant_name: &Ident = &variant.ident;
            let variant_name_lowercase = variant_name.to_string().to_ascii_lowercase();
            quote! {
                #variant_name_lowercase => Ok(Self::#variant_name)
            }
        })
        .collect();

    let err_fmt_string = format!("invalid {name} string: '{{}}'");
    let gen = quote! {
        impl std::str::FromStr for #name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    #(#match_arms,)*
                    _ => Err(format!(#err_fmt_string, s))
                }
            }
        }
    };

    gen.into()
}

/// Implement the `serde::Deserialize` trait for the given type, deserializing values from strings.
/// This requires that the type implements the `std::str::FromStr` trait with a displayable error.
/// Works for map keys as well as values, e.g. the keys of a TOML table.
#[proc_macro_derive(StrDeserialize)]
pub fn str_deserialize(input: TokenStream) -> TokenStream {
    let ast: DeriveInput = syn::parse(input).expect("unable to parse input");

    let ident = &ast.ident;

    let visitor_struct_name = format_ident!("__{}VisitorGenerated", ident);
    let expecting_fmt_string = format!("a string representing a {ident}");
    let gen = quote! {
        struct #visitor_struct_name;

        impl<'de> serde::de::Visitor<'de> for #visitor_struct_name {
            type Value = #ident;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, #expecting_fmt_string)
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        impl<'de> serde::Deserialize<'de> for #ident {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserializer.deserialize_str(#visitor_struct_name)
            }
        }
    };

    gen.into()
}
