use proc_macro::TokenStream;
use quote::quote;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DataEnum, DeriveInput, Expr, Fields, Lit,
    LitStr, Meta, Token, WherePredicate,
};

/// Derive macro that generates a schema description from struct fields or enum variants.
///
/// For structs with named fields, each field contributes:
/// - Wire name (respects `#[serde(rename = "...")]` and container `rename_all`)
/// - Schema (from the field type's `Describe` impl, `Option<T>` being nullable)
/// - Aliases (each `#[serde(alias = "...")]`, accepted on input)
/// - Optional (true when the field carries `#[serde(default)]`)
/// - Description (from doc comments)
///
/// Fields marked `#[serde(flatten)]` extend the record with the flattened type's fields.
///
/// Enums with unit variants describe a literal set of their serialized names.
///
/// Generates `crate::schema::Describe` (and `DescribeRecord` for structs).
#[proc_macro_derive(Shape, attributes(serde))]
pub fn derive_shape(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let expanded = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => expand_record(&input, fields.named.iter()),
            _ => panic!("Shape only supports structs with named fields"),
        },
        Data::Enum(data) => expand_literals(&input, data),
        _ => panic!("Shape only supports structs and enums"),
    };

    match expanded {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand_record<'a>(
    input: &DeriveInput,
    fields: impl Iterator<Item = &'a syn::Field>,
) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let container = serde_attrs(&input.attrs)?;
    let record_name = container.rename.unwrap_or_else(|| name.to_string());

    let mut generics = input.generics.clone();
    let mut bounds: Vec<WherePredicate> = Vec::new();
    let mut steps = Vec::new();

    for field in fields {
        let attrs = serde_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let ty = &field.ty;

        if attrs.flatten {
            bounds.push(parse_quote!(#ty: crate::schema::DescribeRecord));
            steps.push(quote! {
                record = record.extend(&<#ty as crate::schema::DescribeRecord>::record());
            });
            continue;
        }

        let ident = field.ident.as_ref().unwrap().to_string();
        let ident = ident.trim_start_matches("r#");
        let wire_name = match attrs.rename {
            Some(rename) => rename,
            None => rename_field(container.rename_all.as_deref(), ident),
        };
        let optional = attrs.default;
        let aliases = &attrs.aliases;
        let doc = get_doc_comment(&field.attrs);

        bounds.push(parse_quote!(#ty: crate::schema::Describe));
        steps.push(quote! {
            record = record.field(
                crate::schema::Field::new(#wire_name, <#ty as crate::schema::Describe>::describe())
                    .optional(#optional)
                    #(.alias(#aliases))*
                    .doc(#doc),
            );
        });
    }

    generics.make_where_clause().predicates.extend(bounds);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics crate::schema::DescribeRecord for #name #ty_generics #where_clause {
            #[allow(unused_mut)]
            fn record() -> crate::schema::RecordSchema {
                let mut record = crate::schema::RecordSchema::new(#record_name);
                #(#steps)*
                record
            }
        }

        impl #impl_generics crate::schema::Describe for #name #ty_generics #where_clause {
            fn describe() -> crate::schema::Schema {
                crate::schema::Schema::Record(
                    <Self as crate::schema::DescribeRecord>::record(),
                )
            }
        }
    })
}

fn expand_literals(input: &DeriveInput, data: &DataEnum) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let container = serde_attrs(&input.attrs)?;
    let set_name = container.rename.unwrap_or_else(|| name.to_string());

    let mut values = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            panic!("Shape only supports enums with unit variants");
        }
        let attrs = serde_attrs(&variant.attrs)?;
        if attrs.skip {
            continue;
        }
        let value = match attrs.rename {
            Some(rename) => rename,
            None => rename_variant(container.rename_all.as_deref(), &variant.ident.to_string()),
        };
        values.push(value);
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics crate::schema::Describe for #name #ty_generics #where_clause {
            fn describe() -> crate::schema::Schema {
                crate::schema::Schema::Literal(
                    crate::schema::LiteralSet::new(#set_name, &[#(#values),*]),
                )
            }
        }
    })
}

#[derive(Default)]
struct SerdeAttrs {
    rename: Option<String>,
    rename_all: Option<String>,
    aliases: Vec<String>,
    default: bool,
    flatten: bool,
    skip: bool,
}

fn serde_attrs(attrs: &[Attribute]) -> syn::Result<SerdeAttrs> {
    let mut parsed = SerdeAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            // e.g. rename(serialize = "..."), which has no bearing on the wire name we read
            if meta.input.peek(syn::token::Paren) {
                let content;
                syn::parenthesized!(content in meta.input);
                content.parse::<proc_macro2::TokenStream>()?;
                return Ok(());
            }

            if meta.path.is_ident("rename") {
                parsed.rename = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("rename_all") {
                parsed.rename_all = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("alias") {
                parsed.aliases.push(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("default") {
                parsed.default = true;
                if meta.input.peek(Token![=]) {
                    meta.value()?.parse::<LitStr>()?;
                }
            } else if meta.path.is_ident("flatten") {
                parsed.flatten = true;
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_deserializing") {
                parsed.skip = true;
            } else if meta.input.peek(Token![=]) {
                meta.value()?.parse::<Expr>()?;
            }
            Ok(())
        })?;
    }

    Ok(parsed)
}

/// Apply a serde `rename_all` rule to a snake_case field name.
fn rename_field(rule: Option<&str>, name: &str) -> String {
    match rule {
        None | Some("snake_case") => name.to_string(),
        Some("camelCase") => {
            let mut out = String::with_capacity(name.len());
            let mut upper_next = false;
            for ch in name.chars() {
                if ch == '_' {
                    upper_next = !out.is_empty();
                } else if upper_next {
                    out.extend(ch.to_uppercase());
                    upper_next = false;
                } else {
                    out.push(ch);
                }
            }
            out
        }
        Some("lowercase") => name.to_lowercase(),
        Some("kebab-case") => name.replace('_', "-"),
        Some(other) => panic!("Shape does not support rename_all = \"{}\"", other),
    }
}

/// Apply a serde `rename_all` rule to a PascalCase variant name.
fn rename_variant(rule: Option<&str>, name: &str) -> String {
    let words = || {
        let mut out = String::with_capacity(name.len() + 4);
        for (i, ch) in name.chars().enumerate() {
            if ch.is_uppercase() && i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        }
        out
    };

    match rule {
        None => name.to_string(),
        Some("lowercase") => name.to_lowercase(),
        Some("snake_case") => words(),
        Some("kebab-case") => words().replace('_', "-"),
        Some("camelCase") => {
            let mut chars = name.chars();
            match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        Some(other) => panic!("Shape does not support rename_all = \"{}\"", other),
    }
}

fn get_doc_comment(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(meta) = &attr.meta {
                if let Expr::Lit(expr_lit) = &meta.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}
