/// Decoded `application/x-www-form-urlencoded` body, pairs kept in order so
/// repeated keys survive.
#[derive(Debug, Default, Clone)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// First value submitted under `key`, if any.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value submitted under `key`: none gives an empty list, a single
    /// value a singleton, repeats come back in submission order.
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

impl From<Vec<(String, String)>> for FormFields {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::new(pairs)
    }
}

pub fn trim(input: &str) -> String {
    input.trim().to_string()
}

/// HTML-escapes user input before it is stored or echoed back into a form.
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());

    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

/// Empty after trimming means "not submitted".
pub fn optional(input: String) -> Option<String> {
    if input.is_empty() { None } else { Some(input) }
}

pub fn parse_number(input: &str) -> Option<f64> {
    input.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        FormFields::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_values_normalization() {
        let none = fields(&[("name", "Milk")]);
        assert!(none.values("category").is_empty());

        let single = fields(&[("name", "Milk"), ("category", "a")]);
        assert_eq!(single.values("category"), ["a"]);

        let many = fields(&[("category", "a"), ("name", "Milk"), ("category", "b")]);
        assert_eq!(many.values("category"), ["a", "b"]);
        assert_eq!(many.value("name"), Some("Milk"));
        assert_eq!(many.value("price"), None);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("Mac & Cheese"), "Mac &amp; Cheese");
        assert_eq!(escape("<b>\"hi\"</b>"), "&lt;b&gt;&quot;hi&quot;&lt;&#x2F;b&gt;");
        assert_eq!(escape("it's"), "it&#x27;s");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_trim_and_optional() {
        assert_eq!(trim("   Dairy  "), "Dairy");
        assert_eq!(optional(trim("    ")), None);
        assert_eq!(optional(trim(" fresh ")), Some("fresh".to_string()));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("2"), Some(2.0));
        assert_eq!(parse_number(" 1.25 "), Some(1.25));
        assert_eq!(parse_number("two"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }
}
