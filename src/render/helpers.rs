//! String and type-tag helpers available to every template.
//!
//! All helpers are total: any input string produces an output, never an error.

/// Split a name into words at non-alphanumeric runs and camelCase transitions.
///
/// `HTTPServer` splits as `HTTP` + `Server`; digits stay attached to the
/// preceding word (`v2Api` → `v2` + `Api`).
fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// `MyComponent` → `my-component`, `Blog Post` → `blog-post`
pub fn kebab_case(s: &str) -> String {
    words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// `my-component` → `MyComponent`
pub fn pascal_case(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

/// `my-component` → `myComponent`
pub fn camel_case(s: &str) -> String {
    let words = words(s);
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// `my component` → `my_component`
pub fn snake_case(s: &str) -> String {
    words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "feedback",
    "information",
    "metadata",
    "news",
    "series",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("woman", "women"),
    ("man", "men"),
    ("mouse", "mice"),
];

/// Naive English pluralization: `Task` → `Tasks`, `Category` → `Categories`,
/// `Box` → `Boxes`. Words that already end in a plain `s` are left alone.
pub fn pluralize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }
    let lower = s.to_ascii_lowercase();
    let shout = s.chars().any(|c| c.is_alphabetic())
        && s.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase);
    let suffix = |text: &str| {
        if shout {
            text.to_uppercase()
        } else {
            text.to_string()
        }
    };

    if UNCOUNTABLE
        .iter()
        .any(|word| trailing_word(s, &lower, word).is_some())
    {
        return s.to_string();
    }
    for (singular, plural) in IRREGULAR {
        if let Some(start) = trailing_word(s, &lower, singular) {
            return format!("{}{}", &s[..start], match_case(&s[start..], plural));
        }
    }

    let last = lower.chars().last().unwrap_or_default();
    let before_last = lower.chars().rev().nth(1);
    if lower.ends_with("ss")
        || lower.ends_with("us")
        || lower.ends_with("sh")
        || lower.ends_with("ch")
        || last == 'x'
        || last == 'z'
    {
        return format!("{s}{}", suffix("es"));
    }
    if last == 's' {
        return s.to_string();
    }
    if last == 'y' && before_last.is_some_and(|c| !"aeiou".contains(c)) {
        let stem = &s[..s.len() - 1];
        return format!("{stem}{}", suffix("ies"));
    }
    format!("{s}s")
}

/// Byte offset where `word` starts if it is the last word of `s`.
fn trailing_word(s: &str, lower: &str, word: &str) -> Option<usize> {
    if !lower.ends_with(word) {
        return None;
    }
    let start = s.len() - word.len();
    if !s.is_char_boundary(start) {
        return None;
    }
    let tail_starts_upper = s[start..].chars().next().is_some_and(char::is_uppercase);
    let at_boundary = match s[..start].chars().last() {
        None => true,
        Some(prev) => !prev.is_alphanumeric() || tail_starts_upper,
    };
    at_boundary.then_some(start)
}

fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().all(|c| !c.is_lowercase()) {
        replacement.to_uppercase()
    } else if original.chars().next().is_some_and(char::is_uppercase) {
        capitalize(replacement)
    } else {
        replacement.to_string()
    }
}

/// Abstract property type tags understood by the type tables.
pub const KNOWN_TYPES: &[&str] = &[
    "string", "text", "email", "url", "integer", "int", "decimal", "number", "float",
    "boolean", "bool", "date", "datetime", "uuid", "enum", "json", "image", "file",
    "document",
];

pub fn is_known_type(tag: &str) -> bool {
    KNOWN_TYPES.contains(&tag.trim().to_ascii_lowercase().as_str())
}

/// Upload types are stored as a URL/key string.
pub fn is_upload_type(tag: &str) -> bool {
    matches!(
        tag.trim().to_ascii_lowercase().as_str(),
        "image" | "file" | "document"
    )
}

/// Map an abstract property type to the Prisma schema type.
/// Unknown tags map to `String`.
pub fn schema_type(tag: &str) -> &'static str {
    match tag.trim().to_ascii_lowercase().as_str() {
        "integer" | "int" => "Int",
        "decimal" => "Decimal",
        "number" | "float" => "Float",
        "boolean" | "bool" => "Boolean",
        "date" | "datetime" => "DateTime",
        "json" => "Json",
        _ => "String",
    }
}

/// Map an abstract property type to the TypeScript type.
/// Unknown tags map to `string`.
pub fn host_type(tag: &str) -> &'static str {
    match tag.trim().to_ascii_lowercase().as_str() {
        "integer" | "int" | "decimal" | "number" | "float" => "number",
        "boolean" | "bool" => "boolean",
        "date" | "datetime" => "Date",
        "json" => "Record<string, unknown>",
        _ => "string",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("MyComponent"), "my-component");
        assert_eq!(kebab_case("Blog Post"), "blog-post");
        assert_eq!(kebab_case("  blog__post  "), "blog-post");
        assert_eq!(kebab_case("HTTPServer"), "http-server");
        assert_eq!(kebab_case("userID"), "user-id");
        assert_eq!(kebab_case("v2Api"), "v2-api");
        assert_eq!(kebab_case("already-kebab"), "already-kebab");
        assert_eq!(kebab_case("---"), "");
        assert_eq!(kebab_case(""), "");
    }

    #[test]
    fn test_pascal_and_camel_case() {
        assert_eq!(pascal_case("my-component"), "MyComponent");
        assert_eq!(pascal_case("blog post"), "BlogPost");
        assert_eq!(pascal_case("MyComponent"), "MyComponent");
        assert_eq!(camel_case("my-component"), "myComponent");
        assert_eq!(camel_case("Blog Post"), "blogPost");
        assert_eq!(camel_case("HTTP server"), "httpServer");
        assert_eq!(camel_case(""), "");
        assert_eq!(snake_case("Blog Post"), "blog_post");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("Task"), "Tasks");
        assert_eq!(pluralize("Tasks"), "Tasks");
        assert_eq!(pluralize("Category"), "Categories");
        assert_eq!(pluralize("Day"), "Days");
        assert_eq!(pluralize("Box"), "Boxes");
        assert_eq!(pluralize("Status"), "Statuses");
        assert_eq!(pluralize("Address"), "Addresses");
        assert_eq!(pluralize("Branch"), "Branches");
        assert_eq!(pluralize("Person"), "People");
        assert_eq!(pluralize("SalesPerson"), "SalesPeople");
        assert_eq!(pluralize("Human"), "Humans");
        assert_eq!(pluralize("Metadata"), "Metadata");
        assert_eq!(pluralize("API"), "APIs");
        assert_eq!(pluralize("BOX"), "BOXES");
        assert_eq!(pluralize("blog-post"), "blog-posts");
        assert_eq!(pluralize(""), "");
    }

    #[test]
    fn test_type_tables_are_total() {
        assert_eq!(schema_type("integer"), "Int");
        assert_eq!(schema_type("integer"), schema_type("integer"));
        assert_eq!(schema_type("Decimal"), "Decimal");
        assert_eq!(schema_type("datetime"), "DateTime");
        assert_eq!(schema_type("json"), "Json");
        assert_eq!(schema_type("image"), "String");
        assert_eq!(schema_type("hologram"), "String");
        assert_eq!(host_type("integer"), "number");
        assert_eq!(host_type("date"), "Date");
        assert_eq!(host_type("uuid"), "string");
        assert_eq!(host_type("json"), "Record<string, unknown>");
        assert_eq!(host_type("hologram"), "string");
        assert!(is_known_type(" UUID "));
        assert!(!is_known_type("hologram"));
        assert!(is_upload_type("document"));
    }
}
