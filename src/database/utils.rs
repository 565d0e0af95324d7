use regex::Regex;

/// Collapse whitespace and rewrite `?` placeholders to Postgres `$n`
/// parameters, so long INSERT/UPDATE statements can be written without
/// hand-numbering their binds.
pub fn sql(query: &str) -> String {
    let collapsed = query.split_whitespace().collect::<Vec<&str>>().join(" ");
    let placeholder = Regex::new(r"\?").unwrap();

    let mut result = collapsed;
    let mut param_index = 0;
    while let Some(found) = placeholder.find(&result) {
        param_index += 1;
        let range = found.range();
        result.replace_range(range, &format!("${}", param_index));
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::sql;

    #[test]
    fn numbers_placeholders_in_order() {
        assert_eq!(
            sql("INSERT INTO t (a, b, c) VALUES (?, ?, ?)"),
            "INSERT INTO t (a, b, c) VALUES ($1, $2, $3)"
        );
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(sql("SELECT *\n  FROM   t\n WHERE a = ?"), "SELECT * FROM t WHERE a = $1");
    }
}
