//! XML-RPC response deserialization.
//!
//! A pull parser over the event stream of a `<methodResponse>` document.
//! The grammar is small and fixed, so the parser walks it directly rather
//! than building a DOM: one `<params>` with exactly one `<param>`, or one
//! `<fault>` wrapping a struct with `faultCode` and `faultString`.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDateTime;
use xml::reader::{EventReader, ParserConfig, XmlEvent};

use crate::error::{Fault, ParseError};

use super::value::{DATETIME_FORMAT, Value};

/// A deserialized `<methodResponse>`: the call result, or the fault the
/// remote side reported instead.
pub(crate) type MethodResponse = Result<Value, Fault>;

/// Deserialize a complete `<methodResponse>` body.
pub(crate) fn parse_method_response(body: &[u8]) -> Result<MethodResponse, ParseError> {
    Parser::new(body).parse()
}

impl Fault {
    /// Extract a fault from the struct inside a `<fault>` element.
    fn from_value(value: &Value) -> Option<Fault> {
        let members = value.as_struct()?;
        let code = members.get("faultCode")?.as_i64()?;
        let message = members.get("faultString")?.as_str()?;
        Some(Fault {
            code: i32::try_from(code).ok()?,
            message: message.to_string(),
        })
    }
}

/// Deepest `<value>` nesting the parser follows. Structs and arrays
/// recurse, and the body is server-controlled, so the depth is capped.
const MAX_NESTING: usize = 128;

struct Parser<'a> {
    events: EventReader<&'a [u8]>,
}

impl<'a> Parser<'a> {
    fn new(body: &'a [u8]) -> Self {
        let events = ParserConfig::new()
            .cdata_to_characters(true)
            .create_reader(body);
        Self { events }
    }

    fn parse(mut self) -> Result<MethodResponse, ParseError> {
        self.expect_start("methodResponse")?;
        match self.next_significant()? {
            XmlEvent::StartElement { name, .. } if name.local_name == "params" => {
                self.expect_start("param")?;
                self.expect_start("value")?;
                let value = self.parse_value(0)?;
                self.expect_end("param")?;
                self.expect_end("params")?;
                self.expect_end("methodResponse")?;
                self.expect_document_end()?;
                Ok(Ok(value))
            }
            XmlEvent::StartElement { name, .. } if name.local_name == "fault" => {
                self.expect_start("value")?;
                let value = self.parse_value(0)?;
                self.expect_end("fault")?;
                self.expect_end("methodResponse")?;
                self.expect_document_end()?;
                let fault = Fault::from_value(&value).ok_or(ParseError::MalformedFault)?;
                Ok(Err(fault))
            }
            event => Err(unexpected("element <params> or <fault>", &event)),
        }
    }

    /// Parse the contents of a `<value>` whose start tag is already
    /// consumed, through its end tag.
    ///
    /// A `<value>` holding bare character data and no type element is a
    /// string; the deployed servers emit that form freely. `depth`
    /// counts enclosing values: structs and arrays recurse through here,
    /// and nesting past [`MAX_NESTING`] is rejected instead of followed.
    fn parse_value(&mut self, depth: usize) -> Result<Value, ParseError> {
        if depth >= MAX_NESTING {
            return Err(ParseError::NestingTooDeep { limit: MAX_NESTING });
        }
        let mut text = String::new();
        loop {
            match self.next()? {
                XmlEvent::StartElement { name, .. } => {
                    if !text.trim().is_empty() {
                        return Err(ParseError::Unexpected {
                            expected: "a single type element or character data".to_string(),
                            found: format!("element <{}> after text", name.local_name),
                        });
                    }
                    let value = self.parse_typed(&name.local_name, depth)?;
                    self.expect_end("value")?;
                    return Ok(value);
                }
                XmlEvent::Characters(s) => text.push_str(&s),
                XmlEvent::Whitespace(s) => text.push_str(&s),
                XmlEvent::EndElement { name } if name.local_name == "value" => {
                    return Ok(Value::String(text));
                }
                event => return Err(unexpected("value content", &event)),
            }
        }
    }

    /// Parse a type element whose start tag `tag` is already consumed,
    /// through its end tag.
    fn parse_typed(&mut self, tag: &str, depth: usize) -> Result<Value, ParseError> {
        match tag {
            "int" | "i4" => {
                let text = self.read_text(tag)?;
                let parsed = text.trim().parse().map_err(|_| invalid("int", &text))?;
                Ok(Value::Int(parsed))
            }
            "i8" => {
                let text = self.read_text(tag)?;
                let parsed = text.trim().parse().map_err(|_| invalid("i8", &text))?;
                Ok(Value::Int64(parsed))
            }
            "boolean" => {
                let text = self.read_text(tag)?;
                match text.trim() {
                    "1" => Ok(Value::Bool(true)),
                    "0" => Ok(Value::Bool(false)),
                    _ => Err(invalid("boolean", &text)),
                }
            }
            "string" => Ok(Value::String(self.read_text(tag)?)),
            "double" => {
                let text = self.read_text(tag)?;
                let parsed = text.trim().parse().map_err(|_| invalid("double", &text))?;
                Ok(Value::Double(parsed))
            }
            "dateTime.iso8601" => {
                let text = self.read_text(tag)?;
                let trimmed = text.trim();
                // The compact form is the common one; some servers emit
                // the dashed ISO 8601 spelling instead.
                let parsed = NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT)
                    .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
                    .map_err(|_| invalid("dateTime.iso8601", &text))?;
                Ok(Value::DateTime(parsed))
            }
            "base64" => {
                let text = self.read_text(tag)?;
                let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
                let bytes = BASE64
                    .decode(compact.as_bytes())
                    .map_err(|_| invalid("base64", &text))?;
                Ok(Value::Base64(bytes))
            }
            "nil" => {
                self.read_text(tag)?;
                Ok(Value::Nil)
            }
            "struct" => self.parse_struct(depth),
            "array" => self.parse_array(depth),
            other => Err(ParseError::UnknownType(other.to_string())),
        }
    }

    fn parse_struct(&mut self, depth: usize) -> Result<Value, ParseError> {
        let mut members = BTreeMap::new();
        loop {
            match self.next_significant()? {
                XmlEvent::StartElement { name, .. } if name.local_name == "member" => {
                    self.expect_start("name")?;
                    let member_name = self.read_text("name")?;
                    self.expect_start("value")?;
                    let value = self.parse_value(depth + 1)?;
                    self.expect_end("member")?;
                    members.insert(member_name, value);
                }
                XmlEvent::EndElement { name } if name.local_name == "struct" => {
                    return Ok(Value::Struct(members));
                }
                event => return Err(unexpected("element <member> or end of <struct>", &event)),
            }
        }
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, ParseError> {
        self.expect_start("data")?;
        let mut items = Vec::new();
        loop {
            match self.next_significant()? {
                XmlEvent::StartElement { name, .. } if name.local_name == "value" => {
                    items.push(self.parse_value(depth + 1)?);
                }
                XmlEvent::EndElement { name } if name.local_name == "data" => break,
                event => return Err(unexpected("element <value> or end of <data>", &event)),
            }
        }
        self.expect_end("array")?;
        Ok(Value::Array(items))
    }

    /// Accumulate the character data up to the end tag of `tag`.
    fn read_text(&mut self, tag: &str) -> Result<String, ParseError> {
        let mut text = String::new();
        loop {
            match self.next()? {
                XmlEvent::Characters(s) => text.push_str(&s),
                XmlEvent::Whitespace(s) => text.push_str(&s),
                XmlEvent::EndElement { name } if name.local_name == tag => return Ok(text),
                event => return Err(unexpected("character data", &event)),
            }
        }
    }

    fn expect_start(&mut self, tag: &str) -> Result<(), ParseError> {
        match self.next_significant()? {
            XmlEvent::StartElement { name, .. } if name.local_name == tag => Ok(()),
            event => Err(unexpected(format!("element <{tag}>"), &event)),
        }
    }

    fn expect_end(&mut self, tag: &str) -> Result<(), ParseError> {
        match self.next_significant()? {
            XmlEvent::EndElement { name } if name.local_name == tag => Ok(()),
            event => Err(unexpected(format!("end of element </{tag}>"), &event)),
        }
    }

    /// Require that nothing but trailing whitespace follows the root
    /// element. Reads the raw event stream: here `EndDocument` is the
    /// success case, not an error.
    fn expect_document_end(&mut self) -> Result<(), ParseError> {
        loop {
            match self.events.next()? {
                XmlEvent::Whitespace(_) | XmlEvent::ProcessingInstruction { .. } => continue,
                XmlEvent::EndDocument => return Ok(()),
                event => return Err(unexpected("end of document", &event)),
            }
        }
    }

    /// Next event with inter-element whitespace skipped.
    fn next_significant(&mut self) -> Result<XmlEvent, ParseError> {
        loop {
            match self.next()? {
                XmlEvent::Whitespace(_) => continue,
                event => return Ok(event),
            }
        }
    }

    /// Next event with document framing skipped.
    fn next(&mut self) -> Result<XmlEvent, ParseError> {
        loop {
            match self.events.next()? {
                XmlEvent::StartDocument { .. } | XmlEvent::ProcessingInstruction { .. } => {
                    continue;
                }
                XmlEvent::EndDocument => {
                    return Err(ParseError::Unexpected {
                        expected: "more content".to_string(),
                        found: "end of document".to_string(),
                    });
                }
                event => return Ok(event),
            }
        }
    }
}

fn unexpected(expected: impl Into<String>, event: &XmlEvent) -> ParseError {
    ParseError::Unexpected {
        expected: expected.into(),
        found: describe(event),
    }
}

fn invalid(kind: &'static str, value: &str) -> ParseError {
    ParseError::InvalidScalar {
        kind,
        value: value.to_string(),
    }
}

fn describe(event: &XmlEvent) -> String {
    match event {
        XmlEvent::StartElement { name, .. } => format!("element <{}>", name.local_name),
        XmlEvent::EndElement { name } => format!("end of element </{}>", name.local_name),
        XmlEvent::Characters(_) => "character data".to_string(),
        XmlEvent::EndDocument => "end of document".to_string(),
        other => format!("{other:?}"),
    }
}
