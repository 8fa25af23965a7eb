use darling::{FromDeriveInput, FromVariant, ast, util::PathList};
use heck::ToSnakeCase;
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, parse_macro_input};

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(comparison), supports(enum_unit))]
struct ComparisonInput {
    ident: syn::Ident,
    data: ast::Data<ComparisonVariant, ()>,
    #[darling(default)]
    filters: PathList,
}

#[derive(Debug, FromVariant)]
#[darling(attributes(comparison))]
struct ComparisonVariant {
    ident: syn::Ident,
    sql: String,
}

pub fn comparison_methods_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let op = match ComparisonInput::from_derive_input(&input) {
        Ok(v) => v,
        Err(e) => return e.write_errors().into(),
    };

    let enum_name = &op.ident;
    let variants = match op.data.take_enum() {
        Some(variants) => variants,
        None => {
            return syn::Error::new_spanned(&input, "Comparison only supports enums")
                .to_compile_error()
                .into();
        }
    };

    let sql_arms = variants.iter().map(|v| {
        let var = &v.ident;
        let sql = &v.sql;
        quote! { #enum_name::#var => #sql }
    });

    let constructors = variants.iter().map(|v| {
        let var = &v.ident;
        let ctor = format_ident!("{}", var.to_string().to_snake_case());
        let doc = format!("Builds `<column> {} <value>`.", v.sql);
        quote! {
            #[doc = #doc]
            pub fn #ctor<C, V>(column: C, value: V) -> Self
            where
                C: crate::IntoColumn,
                V: crate::IntoBind,
            {
                Self::compare(column, #enum_name::#var, value)
            }
        }
    });

    let filters = op.filters.iter().map(|target| {
        let methods = variants.iter().map(|v| {
            let snake = v.ident.to_string().to_snake_case();
            let ctor = format_ident!("{}", snake);
            let where_fn = format_ident!("where_{}", snake);
            quote! {
                pub fn #where_fn<C, V>(self, column: C, value: V) -> Self
                where
                    C: crate::IntoColumn,
                    V: crate::IntoBind,
                {
                    self.where_cond(crate::cond::Condition::#ctor(column, value))
                }
            }
        });
        quote! {
            impl #target {
                #(#methods)*
            }
        }
    });

    quote! {
        impl #enum_name {
            pub const fn as_sql(self) -> &'static str {
                match self {
                    #(#sql_arms,)*
                }
            }
        }

        impl crate::cond::Condition {
            #(#constructors)*
        }

        #(#filters)*
    }
    .into()
}
