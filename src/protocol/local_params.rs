/// Prefix `expression` with a local-params block carrying exclusion tags and,
/// when given, an output key: `{!ex=a,b key=alias}expression`
pub(crate) fn with_excludes(excludes: &[String], alias: Option<&str>, expression: &str) -> String {
    let mut params = Vec::with_capacity(2);
    if !excludes.is_empty() {
        params.push(format!("ex={}", excludes.join(",")));
    }
    if let Some(alias) = alias {
        params.push(format!("key={}", alias));
    }

    if params.is_empty() {
        expression.to_string()
    } else {
        format!("{{!{}}}{}", params.join(" "), expression)
    }
}

/// `{!tag=name}expression`
pub(crate) fn with_tag(tag: Option<&str>, expression: &str) -> String {
    match tag {
        Some(tag) => format!("{{!tag={}}}{}", tag, expression),
        None => expression.to_string(),
    }
}
