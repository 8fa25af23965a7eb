use crate::{buffer::Buffer, builder::Build, dialect::Dialect, error::Result};

/// LIMIT and OFFSET of a select.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paginator {
    pub maybe_limit: Option<u64>,
    pub maybe_offset: Option<u64>,
}

impl Paginator {
    pub fn limit(&mut self, limit: u64) {
        self.maybe_limit = Some(limit);
    }

    pub fn offset(&mut self, offset: u64) {
        self.maybe_offset = Some(offset);
    }

    /// Pages start at 1, page 0 is read as the first one.
    pub fn paginate(&mut self, page: u64, per_page: u64) {
        let page = page.max(1);
        self.maybe_limit = Some(per_page);
        self.maybe_offset = Some((page - 1).saturating_mul(per_page));
    }
}

impl Build for Paginator {
    fn build(&self, dialect: Dialect, buf: &mut Buffer) -> Result<()> {
        let offset = self.maybe_offset.filter(|offset| *offset > 0);
        match (self.maybe_limit, offset) {
            (Some(limit), _) => {
                buf.write_str(" LIMIT ");
                buf.write_str(&limit.to_string());
            }
            // an offset alone still needs a limit outside of postgres
            (None, Some(_)) => {
                if let Some(all) = dialect.limit_all() {
                    buf.write_str(" LIMIT ");
                    buf.write_str(all);
                }
            }
            (None, None) => {}
        }
        if let Some(offset) = offset {
            buf.write_str(" OFFSET ");
            buf.write_str(&offset.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::build_with;

    use super::*;

    #[test]
    fn test_limit_offset() {
        let mut page = Paginator::default();
        page.limit(10);
        page.offset(20);
        assert_eq!(" LIMIT 10 OFFSET 20", build_with(page, Dialect::Postgres));
        assert_eq!("", build_with(Paginator::default(), Dialect::Postgres));
    }

    #[test]
    fn test_paginate() {
        let mut page = Paginator::default();
        page.paginate(3, 15);
        assert_eq!(Some(15), page.maybe_limit);
        assert_eq!(Some(30), page.maybe_offset);
        page.paginate(0, 15);
        assert_eq!(" LIMIT 15", build_with(page, Dialect::MySql));
    }

    #[test]
    fn test_offset_only() {
        let mut page = Paginator::default();
        page.offset(5);
        assert_eq!(" OFFSET 5", build_with(page, Dialect::Postgres));
        assert_eq!(" LIMIT -1 OFFSET 5", build_with(page, Dialect::Sqlite));
        assert_eq!(
            " LIMIT 18446744073709551615 OFFSET 5",
            build_with(page, Dialect::MySql)
        );
    }
}
