use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use smol_str::SmolStr;

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(SmolStr),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
    Date(NaiveDate),
    #[cfg(feature = "uuid")]
    Uuid(uuid::Uuid),
    #[cfg(feature = "json")]
    Json(serde_json::Value),
    /// A sequence bound to a single marker. It expands to one placeholder per
    /// element when compiled.
    List(Vec<Bind>),
}

impl Bind {
    pub fn is_null(&self) -> bool {
        matches!(self, Bind::Null)
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Bind::Null => "null",
            Bind::Bool(_) => "bool",
            Bind::I64(_) | Bind::U64(_) => "integer",
            Bind::F64(_) => "float",
            Bind::String(_) => "string",
            Bind::Bytes(_) => "bytes",
            Bind::Timestamp(_) => "timestamp",
            Bind::Date(_) => "date",
            #[cfg(feature = "uuid")]
            Bind::Uuid(_) => "uuid",
            #[cfg(feature = "json")]
            Bind::Json(_) => "json",
            Bind::List(_) => "list",
        }
    }
}

pub trait IntoBind {
    fn into_bind(self) -> Bind;
}

impl IntoBind for Bind {
    fn into_bind(self) -> Bind {
        self
    }
}

impl<T> IntoBind for Option<T>
where
    T: IntoBind,
{
    fn into_bind(self) -> Bind {
        if let Some(value) = self {
            value.into_bind()
        } else {
            Bind::Null
        }
    }
}

macro_rules! impl_into_bind {
    ($variant:ident: $($ty:ty),+) => {
        $(
            impl IntoBind for $ty {
                fn into_bind(self) -> Bind {
                    Bind::$variant(self.into())
                }
            }
        )+
    };
}

impl_into_bind!(Bool: bool);
impl_into_bind!(I64: i8, i16, i32, i64);
impl_into_bind!(U64: u8, u16, u32, u64);
impl_into_bind!(F64: f32, f64);
impl_into_bind!(String: &str, String, SmolStr);
impl_into_bind!(Bytes: Vec<u8>, &[u8]);
impl_into_bind!(Timestamp: NaiveDateTime);
impl_into_bind!(Date: NaiveDate);

impl IntoBind for &String {
    fn into_bind(self) -> Bind {
        Bind::String(SmolStr::new(self))
    }
}

impl IntoBind for isize {
    fn into_bind(self) -> Bind {
        Bind::I64(self as i64)
    }
}

impl IntoBind for usize {
    fn into_bind(self) -> Bind {
        Bind::U64(self as u64)
    }
}

impl<Tz: TimeZone> IntoBind for DateTime<Tz> {
    fn into_bind(self) -> Bind {
        Bind::Timestamp(self.naive_utc())
    }
}

#[cfg(feature = "uuid")]
impl_into_bind!(Uuid: uuid::Uuid);

#[cfg(feature = "json")]
impl_into_bind!(Json: serde_json::Value);

// sequences of everything but bytes, which already have their own encoding
macro_rules! impl_into_bind_list {
    ($($ty:ty),+) => {
        $(
            impl IntoBind for Vec<$ty> {
                fn into_bind(self) -> Bind {
                    Bind::List(self.into_iter().map(IntoBind::into_bind).collect())
                }
            }

            impl IntoBind for &[$ty] {
                fn into_bind(self) -> Bind {
                    Bind::List(self.iter().cloned().map(IntoBind::into_bind).collect())
                }
            }

            impl<const N: usize> IntoBind for [$ty; N] {
                fn into_bind(self) -> Bind {
                    Bind::List(self.into_iter().map(IntoBind::into_bind).collect())
                }
            }
        )+
    };
}

impl_into_bind_list!(
    Bind,
    bool,
    i8,
    i16,
    i32,
    i64,
    u16,
    u32,
    u64,
    f32,
    f64,
    &str,
    String,
    SmolStr,
    NaiveDateTime,
    NaiveDate
);

/// Argument list of a raw fragment, one entry per `?` marker.
pub trait IntoBinds {
    fn into_binds(self) -> Vec<Bind>;
}

impl IntoBinds for () {
    fn into_binds(self) -> Vec<Bind> {
        Vec::new()
    }
}

impl IntoBinds for Vec<Bind> {
    fn into_binds(self) -> Vec<Bind> {
        self
    }
}

macro_rules! impl_into_binds_tuple {
    ($($name:ident),+) => {
        impl<$($name: IntoBind),+> IntoBinds for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_binds(self) -> Vec<Bind> {
                let ($($name,)+) = self;
                vec![$($name.into_bind()),+]
            }
        }
    };
}

impl_into_binds_tuple!(A);
impl_into_binds_tuple!(A, B);
impl_into_binds_tuple!(A, B, C);
impl_into_binds_tuple!(A, B, C, D);
impl_into_binds_tuple!(A, B, C, D, E);
impl_into_binds_tuple!(A, B, C, D, E, F);

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_scalars() {
        assert_eq!(Bind::I64(5), 5i32.into_bind());
        assert_eq!(Bind::U64(5), 5u8.into_bind());
        assert_eq!(Bind::String("foo".into()), "foo".into_bind());
        assert_eq!(Bind::Bytes(vec![1, 2]), vec![1u8, 2].into_bind());
        assert_eq!(Bind::Null, None::<i32>.into_bind());
        assert_eq!(Bind::Bool(true), Some(true).into_bind());
    }

    #[test]
    fn test_sequences() {
        assert_eq!(
            Bind::List(vec![Bind::I64(1), Bind::I64(2)]),
            vec![1i64, 2].into_bind()
        );
        assert_eq!(
            Bind::List(vec![Bind::String("a".into())]),
            ["a"].into_bind()
        );
        let empty: &[i32] = &[];
        assert_eq!(Bind::List(Vec::new()), empty.into_bind());
    }

    #[test]
    fn test_datetime_is_utc() {
        let ts = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(Bind::Timestamp(ts.naive_utc()), ts.into_bind());
    }

    #[test]
    fn test_binds_tuple() {
        assert_eq!(
            vec![Bind::I64(1), Bind::String("x".into()), Bind::Null],
            (1, "x", None::<i32>).into_binds()
        );
        assert!(().into_binds().is_empty());
    }
}
