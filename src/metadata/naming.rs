//! Java naming for controllers, endpoint methods and body classes

use crate::contract::{Resource, Verb};
use crate::util::{
    is_uri_parameter_segment, path_segments, singularize, split_words, to_camel_case,
    to_pascal_case,
};
use std::collections::HashSet;

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "goto", "if", "implements", "import", "instanceof", "int",
    "interface", "long", "native", "new", "null", "package", "private", "protected", "public",
    "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this", "throw",
    "throws", "transient", "true", "try", "void", "volatile", "while", "_",
];

/// Reserved words and literals that cannot name a Java variable
pub fn is_java_keyword(s: &str) -> bool {
    JAVA_KEYWORDS.contains(&s)
}

/// Singular noun naming the controller of a top-level resource:
/// `/users` -> `User`, giving `UserController`
pub fn controller_noun(resource: &Resource) -> String {
    path_segments(&resource.relative_uri)
        .into_iter()
        .find(|s| !is_uri_parameter_segment(s))
        .map(|s| singularize(&to_pascal_case(s)))
        .or_else(|| resource.display_name.as_deref().map(to_pascal_case))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Root".to_string())
}

/// Claim `{stem}{suffix}`, or `{stem}2{suffix}`, `{stem}3{suffix}`... when
/// the name is already taken
pub fn claim_unique(taken: &mut HashSet<String>, stem: &str, suffix: &str) -> String {
    let mut name = format!("{}{}", stem, suffix);
    let mut n = 2;
    while taken.contains(&name) {
        name = format!("{}{}{}", stem, n, suffix);
        n += 1;
    }
    taken.insert(name.clone());
    name
}

/// Java variable name for a contract parameter: camelCase, never a keyword
///
/// ```
/// use ramlsync::metadata::naming::parameter_name;
/// assert_eq!(parameter_name("page-size"), "pageSize");
/// assert_eq!(parameter_name("class"), "classParam");
/// assert_eq!(parameter_name("2fa"), "p2fa");
/// ```
pub fn parameter_name(name: &str) -> String {
    let camel = to_camel_case(name);
    if camel.is_empty() {
        "param".to_string()
    } else if camel.starts_with(|c: char| c.is_ascii_digit()) {
        format!("p{}", camel)
    } else if is_java_keyword(&camel) {
        format!("{}Param", camel)
    } else {
        camel
    }
}

fn verb_prefix(verb: Verb) -> &'static str {
    match verb {
        Verb::Get => "get",
        Verb::Post => "create",
        Verb::Put => "update",
        Verb::Patch => "modify",
        Verb::Delete => "delete",
        Verb::Head => "head",
        Verb::Options => "options",
    }
}

/// Method name for an action on a resource uri.
///
/// The last literal segment names the target; it is singular when the path
/// ends in a URI parameter or the verb creates a single item. Every URI
/// parameter on the path is listed in a `By…And…` suffix.
///
/// ```
/// use ramlsync::contract::Verb;
/// use ramlsync::metadata::naming::method_name;
/// assert_eq!(method_name(Verb::Get, "/users", None), "getUsers");
/// assert_eq!(method_name(Verb::Get, "/users/{id}", None), "getUserById");
/// assert_eq!(method_name(Verb::Post, "/users", None), "createUser");
/// ```
pub fn method_name(verb: Verb, resource_uri: &str, content_type: Option<&str>) -> String {
    let segments = path_segments(resource_uri);
    let params: Vec<&str> = segments
        .iter()
        .copied()
        .filter(|s| is_uri_parameter_segment(s))
        .collect();
    let ends_with_param = segments
        .last()
        .is_some_and(|s| is_uri_parameter_segment(s));

    let noun = segments
        .iter()
        .rev()
        .find(|s| !is_uri_parameter_segment(s))
        .map(|s| to_pascal_case(s))
        .unwrap_or_else(|| "Resource".to_string());
    let noun = if ends_with_param || verb == Verb::Post {
        singularize(&noun)
    } else {
        noun
    };

    let mut name = format!("{}{}", verb_prefix(verb), noun);
    if !params.is_empty() {
        let by: Vec<String> = params
            .iter()
            .map(|p| to_pascal_case(p.trim_matches(|c| c == '{' || c == '}')))
            .collect();
        name.push_str("By");
        name.push_str(&by.join("And"));
    }
    if let Some(content_type) = content_type {
        name.push_str(&content_type_suffix(content_type));
    }
    name
}

/// `application/vnd.user+json` -> `AsJson`, `text/plain` -> `AsPlain`
pub fn content_type_suffix(media_type: &str) -> String {
    let subtype = media_type
        .split(';')
        .next()
        .unwrap_or(media_type)
        .rsplit('/')
        .next()
        .unwrap_or(media_type);
    let subtype = subtype.rsplit('+').next().unwrap_or(subtype);
    let subtype = subtype.strip_prefix("vnd.").unwrap_or(subtype);
    format!("As{}", to_pascal_case(subtype))
}

/// Class name for a named root schema
pub fn schema_class_name(schema_name: &str) -> String {
    let words = split_words(schema_name);
    if words.is_empty() {
        "Body".to_string()
    } else {
        to_pascal_case(schema_name)
    }
}

/// Class name for an inline schema, derived from the endpoint method
pub fn inline_body_class_name(method: &str, is_request: bool) -> String {
    let suffix = if is_request { "Request" } else { "Response" };
    format!("{}{}", to_pascal_case(method), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_noun() {
        assert_eq!(controller_noun(&Resource::new("", "/users")), "User");
        assert_eq!(controller_noun(&Resource::new("", "/order-items")), "OrderItem");
        assert_eq!(controller_noun(&Resource::new("", "/{id}")), "Root");
    }

    #[test]
    fn test_claim_unique() {
        let mut taken = HashSet::new();
        assert_eq!(claim_unique(&mut taken, "User", "Controller"), "UserController");
        assert_eq!(claim_unique(&mut taken, "User", "Controller"), "User2Controller");
        assert_eq!(claim_unique(&mut taken, "User", "Controller"), "User3Controller");
        assert_eq!(claim_unique(&mut taken, "Order", "Controller"), "OrderController");
    }

    #[test]
    fn test_parameter_names() {
        assert_eq!(parameter_name("user_id"), "userId");
        assert_eq!(parameter_name("default"), "defaultParam");
        assert_eq!(parameter_name("class"), "classParam");
        assert_eq!(parameter_name("int"), "intParam");
        assert_eq!(parameter_name("classic"), "classic");
        assert_eq!(parameter_name("--"), "param");
    }

    #[test]
    fn test_method_names() {
        assert_eq!(method_name(Verb::Get, "/users", None), "getUsers");
        assert_eq!(method_name(Verb::Get, "/users/{id}", None), "getUserById");
        assert_eq!(method_name(Verb::Put, "/users/{id}", None), "updateUserById");
        assert_eq!(method_name(Verb::Delete, "/users", None), "deleteUsers");
        assert_eq!(
            method_name(Verb::Get, "/users/{userId}/orders", None),
            "getOrdersByUserId"
        );
        assert_eq!(
            method_name(Verb::Delete, "/users/{userId}/orders/{orderId}", None),
            "deleteOrderByUserIdAndOrderId"
        );
    }

    #[test]
    fn test_method_name_with_content_type() {
        assert_eq!(
            method_name(Verb::Post, "/users", Some("application/xml")),
            "createUserAsXml"
        );
        assert_eq!(content_type_suffix("application/vnd.user+json"), "AsJson");
        assert_eq!(content_type_suffix("text/plain; charset=utf-8"), "AsPlain");
    }

    #[test]
    fn test_body_class_names() {
        assert_eq!(schema_class_name("user-profile"), "UserProfile");
        assert_eq!(inline_body_class_name("getUserById", false), "GetUserByIdResponse");
        assert_eq!(inline_body_class_name("createUser", true), "CreateUserRequest");
    }
}
