//! Prototype heading-comment parser — line-by-line state machine.
//!
//! A descriptor documents itself in a block of `//` comments at the top of
//! the file. Tag lines open fields (`@name`, `@description`, ...); indented
//! or empty comment lines continue the value of the open field. The first
//! line that is not a comment ends the block, and the rest of the file is
//! ignored.

use crate::model::{Param, ParamType, Prototype};
use thiserror::Error;

/// Comment marker for descriptor files.
const MARKER: &str = "//";

// -- Errors -------------------------------------------------------------------

/// Everything that can go wrong while parsing a heading comment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("heading comments are required to have a space after the '//' that begins the line")]
    MissingSpace,

    #[error("free text is not allowed in the heading comment, all text must be in a field: '{0}'")]
    FreeText(String),

    #[error("invalid field '{0}', fields must have a non-whitespace value")]
    BareField(String),

    #[error(
        "'{0}' is not recognized as a tag. Only tags can begin lines, and text \
         that is wrapped must be indented. For example:\n\n\
         // @description This is a long description\n\
         //   that we are wrapping on two lines"
    )]
    UnknownTag(String),

    #[error("heading comment has two '{0}' fields")]
    DuplicateField(&'static str),

    #[error("param fields must be '<name> <type> <description>', but got: '{0}'")]
    MalformedParam(String),

    #[error("param type must be 'number', 'string', or 'number-or-string', but got '{0}'")]
    InvalidParamType(String),

    #[error("invalid prototype specification, all fields are required (@name and @description)")]
    MissingRequiredFields,
}

// -- Join policy --------------------------------------------------------------

/// How continuation lines are appended to the value of the open field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JoinPolicy {
    /// Wrapped text folds onto one line with a single-space separator.
    #[default]
    Space,
    /// Wrapped text keeps its line breaks.
    Newline,
}

impl JoinPolicy {
    fn separator(self) -> char {
        match self {
            JoinPolicy::Space => ' ',
            JoinPolicy::Newline => '\n',
        }
    }
}

// -- Tags ---------------------------------------------------------------------

/// Closed vocabulary of heading-comment tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    ApiVersion,
    Name,
    Description,
    ShortDescription,
    Param,
    OptionalParam,
}

impl Tag {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "@apiVersion" => Some(Tag::ApiVersion),
            "@name" => Some(Tag::Name),
            "@description" => Some(Tag::Description),
            "@shortDescription" => Some(Tag::ShortDescription),
            "@param" => Some(Tag::Param),
            "@optionalParam" => Some(Tag::OptionalParam),
            _ => None,
        }
    }
}

// -- Public API ---------------------------------------------------------------

/// Parse a descriptor's heading comment with the default space join.
pub fn parse(input: &str) -> Result<Prototype, ParseError> {
    parse_with(input, JoinPolicy::default())
}

/// Parse a descriptor's heading comment into a [`Prototype`].
///
/// Pure function over the input text. Either the whole block parses, or a
/// descriptive error is returned; there is no partial result.
pub fn parse_with(input: &str, join: JoinPolicy) -> Result<Prototype, ParseError> {
    let block = comment_block(input)?;

    let mut builder = Builder::default();
    let mut open: Option<(Tag, String)> = None;

    for line in block {
        // Continuation: an empty line or indented text extends the open field.
        if line.is_empty() || line.starts_with(char::is_whitespace) {
            match open.as_mut() {
                Some((_, value)) => {
                    value.push(join.separator());
                    value.push_str(line.trim());
                }
                None => return Err(ParseError::FreeText(line)),
            }
            continue;
        }

        // Tag line: token and value split on the first space.
        let (token, value) = match line.split_once(' ') {
            Some((token, value)) => (token, value.trim().to_string()),
            None => return Err(ParseError::BareField(line)),
        };
        let tag =
            Tag::from_token(token).ok_or_else(|| ParseError::UnknownTag(token.to_string()))?;

        // Opening a new field commits the previous one.
        if let Some((open_tag, open_value)) = open.take() {
            builder.commit(open_tag, &open_value)?;
        }
        open = Some((tag, value));
    }

    if let Some((open_tag, open_value)) = open {
        builder.commit(open_tag, &open_value)?;
    }

    builder.finish()
}

// -- Comment-block extraction -------------------------------------------------

/// Collect the heading comment block: marker-stripped lines from the top of
/// the file, up to the first non-comment line.
fn comment_block(input: &str) -> Result<Vec<String>, ParseError> {
    let mut seen_comment = false;
    let mut block = Vec::new();

    for raw in input.lines() {
        let line = raw.trim();

        // Blank lines are skipped, but only above the comment block.
        if line.is_empty() && !seen_comment {
            continue;
        }
        if !line.starts_with(MARKER) {
            break;
        }
        seen_comment = true;

        if let Some(rest) = line.strip_prefix("// ") {
            // Keep the remainder verbatim; leading whitespace marks a
            // continuation line.
            block.push(rest.to_string());
        } else if line == MARKER {
            block.push(String::new());
        } else {
            // "//foo": the marker must be followed by a space.
            return Err(ParseError::MissingSpace);
        }
    }

    Ok(block)
}

// -- Field commit -------------------------------------------------------------

#[derive(Default)]
struct Builder {
    name: Option<String>,
    description: Option<String>,
    short_description: Option<String>,
    params: Vec<Param>,
}

impl Builder {
    /// Dispatch an accumulated field value onto the descriptor being built.
    fn commit(&mut self, tag: Tag, value: &str) -> Result<(), ParseError> {
        match tag {
            // Value is accepted and ignored.
            Tag::ApiVersion => {}
            Tag::Name => set_once(&mut self.name, value, "@name")?,
            Tag::Description => set_once(&mut self.description, value, "@description")?,
            Tag::ShortDescription => {
                set_once(&mut self.short_description, value, "@shortDescription")?;
            }
            Tag::Param => self.params.push(parse_param(value)?),
            // Accepted syntactically, produces no parameter record.
            Tag::OptionalParam => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Prototype, ParseError> {
        let name = self.name.unwrap_or_default();
        let description = self.description.unwrap_or_default();
        if name.is_empty() || description.is_empty() {
            return Err(ParseError::MissingRequiredFields);
        }
        Ok(Prototype {
            name,
            description,
            short_description: self.short_description.filter(|s| !s.is_empty()),
            params: self.params,
        })
    }
}

fn set_once(slot: &mut Option<String>, value: &str, tag: &'static str) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(ParseError::DuplicateField(tag));
    }
    *slot = Some(value.to_string());
    Ok(())
}

/// `<name> <type> <description>`: exactly three whitespace-separated segments.
fn parse_param(value: &str) -> Result<Param, ParseError> {
    let mut segments = value.splitn(3, char::is_whitespace);
    let (Some(name), Some(type_token), Some(description)) =
        (segments.next(), segments.next(), segments.next())
    else {
        return Err(ParseError::MalformedParam(value.to_string()));
    };
    let param_type = ParamType::from_token(type_token)
        .ok_or_else(|| ParseError::InvalidParamType(type_token.to_string()))?;
    Ok(Param {
        name: name.to_string(),
        param_type,
        description: description.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trip() {
        let input = "\
// @name redis
// @description Deploys a Redis instance.
// @param memory string Memory limit for the instance
";
        let proto = parse(input).unwrap();
        assert_eq!(proto.name, "redis");
        assert_eq!(proto.description, "Deploys a Redis instance.");
        assert_eq!(proto.params.len(), 1);
        assert_eq!(proto.params[0].name, "memory");
        assert_eq!(proto.params[0].param_type, ParamType::String);
        assert_eq!(proto.params[0].description, "Memory limit for the instance");
    }

    #[test]
    fn parse_skips_leading_blank_lines() {
        let input = "\n\n// @name redis\n// @description A database.\n";
        let proto = parse(input).unwrap();
        assert_eq!(proto.name, "redis");
    }

    #[test]
    fn parse_stops_at_first_non_comment_line() {
        let input = "\
// @name redis
// @description A database.
local k = import 'k.libsonnet';
// @param ignored string This line is past the block
";
        let proto = parse(input).unwrap();
        assert!(proto.params.is_empty());
    }

    #[test]
    fn parse_blank_line_ends_block() {
        let input = "// @name redis\n// @description A database.\n\n// @param x string y\n";
        let proto = parse(input).unwrap();
        assert!(proto.params.is_empty());
    }

    #[test]
    fn continuation_joined_with_space() {
        let input = "\
// @name redis
// @description A long description
//   that we are wrapping on two lines
";
        let proto = parse(input).unwrap();
        assert_eq!(
            proto.description,
            "A long description that we are wrapping on two lines"
        );
    }

    #[test]
    fn continuation_joined_with_newline() {
        let input = "\
// @name redis
// @description A long description
//   that we are wrapping on two lines
";
        let proto = parse_with(input, JoinPolicy::Newline).unwrap();
        assert_eq!(
            proto.description,
            "A long description\nthat we are wrapping on two lines"
        );
    }

    #[test]
    fn empty_comment_line_continues_field() {
        let input = "\
// @name redis
// @description First part.
//
//   Second part.
";
        let proto = parse(input).unwrap();
        assert_eq!(proto.description, "First part.  Second part.");
    }

    #[test]
    fn bare_marker_line_accepted() {
        let input = "//\n// @name redis\n// @description A database.\n";
        assert!(parse(input).is_ok());
    }

    #[test]
    fn missing_space_after_marker_fails() {
        let input = "//@name redis\n// @description A database.\n";
        assert_eq!(parse(input), Err(ParseError::MissingSpace));
    }

    #[test]
    fn short_comment_without_space_fails() {
        // Three-character lines are a spacing violation like any other.
        let input = "//x\n// @name redis\n// @description A database.\n";
        assert_eq!(parse(input), Err(ParseError::MissingSpace));
    }

    #[test]
    fn free_text_before_any_tag_fails() {
        let input = "//   stray text\n// @name redis\n";
        assert_eq!(
            parse(input),
            Err(ParseError::FreeText("  stray text".to_string()))
        );
    }

    #[test]
    fn bare_tag_without_value_fails() {
        let input = "// @name redis\n// @description\n";
        assert_eq!(
            parse(input),
            Err(ParseError::BareField("@description".to_string()))
        );
    }

    #[test]
    fn unknown_tag_fails() {
        let input = "// @name redis\n// @version 1.0\n";
        assert_eq!(
            parse(input),
            Err(ParseError::UnknownTag("@version".to_string()))
        );
    }

    #[test]
    fn unknown_tag_message_shows_wrapping_syntax() {
        let err = parse("// @frobnicate x\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("@frobnicate"));
        assert!(message.contains("must be indented"));
    }

    #[test]
    fn duplicate_name_fails() {
        let input = "// @name redis\n// @description A database.\n// @name redis2\n";
        assert_eq!(parse(input), Err(ParseError::DuplicateField("@name")));
    }

    #[test]
    fn duplicate_description_fails() {
        let input = "// @description one\n// @description two\n// @name redis\n";
        assert_eq!(
            parse(input),
            Err(ParseError::DuplicateField("@description"))
        );
    }

    #[test]
    fn duplicate_short_description_fails() {
        let input = "\
// @name redis
// @description A database.
// @shortDescription one
// @shortDescription two
";
        assert_eq!(
            parse(input),
            Err(ParseError::DuplicateField("@shortDescription"))
        );
    }

    #[test]
    fn short_description_is_optional() {
        let input = "// @name redis\n// @description A database.\n";
        assert_eq!(parse(input).unwrap().short_description, None);

        let input = "\
// @name redis
// @description A database.
// @shortDescription An in-memory store
";
        assert_eq!(
            parse(input).unwrap().short_description.as_deref(),
            Some("An in-memory store")
        );
    }

    #[test]
    fn param_with_two_segments_fails() {
        let input = "// @name redis\n// @description A database.\n// @param memory string\n";
        assert_eq!(
            parse(input),
            Err(ParseError::MalformedParam("memory string".to_string()))
        );
    }

    #[test]
    fn param_with_invalid_type_fails() {
        let input = "// @name redis\n// @description A database.\n// @param memory int Size\n";
        assert_eq!(
            parse(input),
            Err(ParseError::InvalidParamType("int".to_string()))
        );
    }

    #[test]
    fn param_types_accepted() {
        let input = "\
// @name redis
// @description A database.
// @param a number Count
// @param b string Name
// @param c number-or-string Either
";
        let proto = parse(input).unwrap();
        let types: Vec<ParamType> = proto.params.iter().map(|p| p.param_type).collect();
        assert_eq!(
            types,
            vec![ParamType::Number, ParamType::String, ParamType::NumberOrString]
        );
    }

    #[test]
    fn params_keep_source_order() {
        let input = "\
// @name redis
// @description A database.
// @param zeta string Last alphabetically
// @param alpha string First alphabetically
";
        let proto = parse(input).unwrap();
        let names: Vec<&str> = proto.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn api_version_value_ignored() {
        let input = "\
// @apiVersion 0.0.1
// @name redis
// @description A database.
";
        assert!(parse(input).is_ok());
    }

    #[test]
    fn optional_param_is_a_no_op() {
        let input = "\
// @name redis
// @description A database.
// @optionalParam version string Image tag to use
";
        let proto = parse(input).unwrap();
        assert!(proto.params.is_empty());
    }

    #[test]
    fn missing_name_fails() {
        let input = "// @description A database.\n";
        assert_eq!(parse(input), Err(ParseError::MissingRequiredFields));
    }

    #[test]
    fn missing_description_fails() {
        let input = "// @name redis\n";
        assert_eq!(parse(input), Err(ParseError::MissingRequiredFields));
    }

    #[test]
    fn empty_input_fails_required_fields() {
        assert_eq!(parse(""), Err(ParseError::MissingRequiredFields));
    }
}
