//! XML-RPC request serialization.

use super::value::{Value, escape_into};

/// Serialize one method call as a complete request body.
///
/// The `<params>` element is always present, even for zero-argument
/// calls, matching what the deployed XML-RPC runtimes emit.
pub(crate) fn write_method_call(method: &str, params: &[Value]) -> String {
    let mut body = String::with_capacity(128 + params.len() * 64);
    body.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    body.push_str("<methodCall><methodName>");
    escape_into(&mut body, method);
    body.push_str("</methodName><params>");
    for param in params {
        body.push_str("<param>");
        param.write_xml(&mut body);
        body.push_str("</param>");
    }
    body.push_str("</params></methodCall>");
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_a_login_call() {
        let body = write_method_call(
            "sape.login",
            &["alice".into(), "secret".into(), false.into()],
        );
        assert_eq!(
            body,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <methodCall><methodName>sape.login</methodName><params>\
             <param><value><string>alice</string></value></param>\
             <param><value><string>secret</string></value></param>\
             <param><value><boolean>0</boolean></value></param>\
             </params></methodCall>"
        );
    }

    #[test]
    fn zero_argument_call_keeps_the_params_element() {
        let body = write_method_call("sape.get_user", &[]);
        assert!(body.ends_with(
            "<methodName>sape.get_user</methodName><params></params></methodCall>"
        ));
    }

    #[test]
    fn escapes_the_method_name_and_string_params() {
        let body = write_method_call("a<b", &["x&y".into()]);
        assert!(body.contains("<methodName>a&lt;b</methodName>"));
        assert!(body.contains("<string>x&amp;y</string>"));
    }
}
