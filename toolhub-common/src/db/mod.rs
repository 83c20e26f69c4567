//! Database schema, models and queries

pub mod authors;
pub mod blog;
pub mod choices;
pub mod demos;
pub mod init;
pub mod inputs;
pub mod models;
pub mod news;
pub mod tools;
pub mod users;

pub use init::*;
pub use inputs::*;
pub use models::*;

/// Validated ORDER BY clause
///
/// Built only from whitelisted column names, so it is safe to splice into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub descending: bool,
}

impl Sort {
    pub const fn asc(column: &'static str) -> Self {
        Self { column, descending: false }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self { column, descending: true }
    }

    /// Parse `field` / `-field` against the allowed columns
    ///
    /// Unknown or empty values fall back to `default`, matching how list
    /// endpoints ignore unsupported ordering parameters.
    pub fn parse(raw: Option<&str>, allowed: &[&'static str], default: Sort) -> Sort {
        let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
            return default;
        };

        let (name, descending) = match raw.strip_prefix('-') {
            Some(name) => (name, true),
            None => (raw, false),
        };

        allowed
            .iter()
            .copied()
            .find(|column| *column == name)
            .map(|column| Sort { column, descending })
            .unwrap_or(default)
    }

    /// ` ORDER BY <column> <dir>, id <dir>`; id keeps equal keys stable
    pub fn to_sql(&self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!(" ORDER BY {} {}, id {}", self.column, direction, direction)
    }
}

/// LIMIT/OFFSET window of a paginated list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: i64,
}

/// `%term%` pattern for `LIKE ... ESCAPE '\'`
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.trim().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALLOWED: &[&str] = &["created_at", "rating", "name"];

    #[test]
    fn test_sort_parse() {
        let default = Sort::desc("created_at");

        assert_eq!(Sort::parse(None, ALLOWED, default), default);
        assert_eq!(Sort::parse(Some(""), ALLOWED, default), default);
        assert_eq!(Sort::parse(Some("rating"), ALLOWED, default), Sort::asc("rating"));
        assert_eq!(Sort::parse(Some("-name"), ALLOWED, default), Sort::desc("name"));
        assert_eq!(Sort::parse(Some("password"), ALLOWED, default), default);
        assert_eq!(Sort::parse(Some("name; DROP TABLE tools"), ALLOWED, default), default);
    }

    #[test]
    fn test_sort_sql() {
        assert_eq!(Sort::desc("created_at").to_sql(), " ORDER BY created_at DESC, id DESC");
        assert_eq!(Sort::asc("name").to_sql(), " ORDER BY name ASC, id ASC");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("chat"), "%chat%");
        assert_eq!(like_pattern(" 100%_off "), "%100\\%\\_off%");
    }
}
