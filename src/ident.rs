use std::{borrow::Cow, sync::Arc};

use smol_str::SmolStr;

use crate::{
    buffer::Buffer,
    builder::{Alias, Build},
    dialect::Dialect,
    error::Result,
};

/// A name quoted for the target dialect. Dotted names are quoted segment by
/// segment and `name as alias` is split into a quoted alias.
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ident(SmolStr);

impl Ident {
    #[inline]
    pub fn new<T>(value: T) -> Self
    where
        T: Into<SmolStr>,
    {
        Self(value.into())
    }

    #[inline]
    pub fn new_static(value: &'static str) -> Self {
        Self(SmolStr::new_static(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last dotted segment without any alias, `users.id as uid` gives `id`.
    pub fn column_name(&self) -> &str {
        let (name, _) = split_alias(self.0.as_str());
        name.rsplit('.').next().unwrap_or(name)
    }

    pub fn alias<T: IntoIdent>(self, alias: T) -> Alias {
        Alias::new(self, alias)
    }
}

impl Build for Ident {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        let (name, maybe_alias) = split_alias(self.0.as_str());
        buf.write_ident(dialect, name);
        if let Some(alias) = maybe_alias {
            buf.write_str(" AS ");
            buf.write_quoted(dialect, alias);
        }
        Ok(())
    }
}

pub trait IntoIdent {
    fn into_ident(self) -> Ident;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> Ident {
        self
    }
}

impl IntoIdent for &str {
    #[inline]
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl IntoIdent for &String {
    #[inline]
    fn into_ident(self) -> Ident {
        Ident::new(self.as_str())
    }
}

impl IntoIdent for String {
    #[inline(always)]
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl IntoIdent for Box<str> {
    #[inline]
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl IntoIdent for Arc<str> {
    #[inline]
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl IntoIdent for Cow<'_, str> {
    #[inline]
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

impl IntoIdent for SmolStr {
    #[inline(always)]
    fn into_ident(self) -> Ident {
        Ident::new(self)
    }
}

/// A list of identifiers, used for INSERT columns, conflict targets and the like.
pub trait IntoIdents {
    fn into_idents(self) -> Vec<Ident>;
}

impl<T: IntoIdent> IntoIdents for Vec<T> {
    fn into_idents(self) -> Vec<Ident> {
        self.into_iter().map(IntoIdent::into_ident).collect()
    }
}

impl<T: IntoIdent, const N: usize> IntoIdents for [T; N] {
    fn into_idents(self) -> Vec<Ident> {
        self.into_iter().map(IntoIdent::into_ident).collect()
    }
}

impl IntoIdents for &str {
    fn into_idents(self) -> Vec<Ident> {
        vec![self.into_ident()]
    }
}

impl IntoIdents for Ident {
    fn into_idents(self) -> Vec<Ident> {
        vec![self]
    }
}

pub fn split_alias(s: &str) -> (&str, Option<&str>) {
    if let Some(idx) = find_as(s.as_bytes()) {
        (&s[..idx], Some(&s[idx + 4..]))
    } else {
        (s, None)
    }
}

/// Return the index of " as " in bytes case insensitive with no allocations.
fn find_as(h: &[u8]) -> Option<usize> {
    if h.len() < 4 {
        return None;
    }
    h.windows(4).position(|w| {
        w[0] == b' ' && w[3] == b' ' && (w[1] | 0x20) == b'a' && (w[2] | 0x20) == b's'
    })
}
