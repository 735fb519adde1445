//! In-memory model of an `.editorconfig` file.
//!
//! Known properties are a closed set ([`Key`]) with typed values so the
//! inspector and fixer can match on them exhaustively. Anything else is kept
//! verbatim as [`Property::Unknown`] and written back out untouched.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndentStyle {
    Space,
    Tab,
}

impl IndentStyle {
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "space" => Some(Self::Space),
            "tab" => Some(Self::Tab),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::Tab => "tab",
        }
    }
}

/// `indent_size`: a column count, or `tab` to follow `tab_width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndentSize {
    Width(u32),
    Tab,
}

impl IndentSize {
    pub fn from_value(value: &str) -> Option<Self> {
        if value == "tab" {
            return Some(Self::Tab);
        }
        parse_width(value).map(Self::Width)
    }
}

impl fmt::Display for IndentSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width(n) => write!(f, "{n}"),
            Self::Tab => f.write_str("tab"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EndOfLine {
    Lf,
    CrLf,
    Cr,
}

impl EndOfLine {
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "lf" => Some(Self::Lf),
            "crlf" => Some(Self::CrLf),
            "cr" => Some(Self::Cr),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "lf",
            Self::CrLf => "crlf",
            Self::Cr => "cr",
        }
    }

    /// The terminator characters this line ending stands for.
    pub fn terminator(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::Cr => "\r",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Charset {
    Latin1,
    Utf8,
    Utf8Bom,
    Utf16Be,
    Utf16Le,
}

impl Charset {
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "latin1" => Some(Self::Latin1),
            "utf-8" => Some(Self::Utf8),
            "utf-8-bom" => Some(Self::Utf8Bom),
            "utf-16be" => Some(Self::Utf16Be),
            "utf-16le" => Some(Self::Utf16Le),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latin1 => "latin1",
            Self::Utf8 => "utf-8",
            Self::Utf8Bom => "utf-8-bom",
            Self::Utf16Be => "utf-16be",
            Self::Utf16Le => "utf-16le",
        }
    }

    /// Byte order mark written at the start of a file in this charset.
    pub fn bom(self) -> &'static [u8] {
        match self {
            Self::Latin1 | Self::Utf8 => b"",
            Self::Utf8Bom => b"\xEF\xBB\xBF",
            Self::Utf16Be => b"\xFE\xFF",
            Self::Utf16Le => b"\xFF\xFE",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(IndentStyle, EndOfLine, Charset, Key);

/// Known property keys, in the order discrepancies are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    IndentStyle,
    IndentSize,
    TabWidth,
    EndOfLine,
    InsertFinalNewline,
    TrimTrailingWhitespace,
    Charset,
}

impl Key {
    pub const ALL: [Key; 7] = [
        Key::IndentStyle,
        Key::IndentSize,
        Key::TabWidth,
        Key::EndOfLine,
        Key::InsertFinalNewline,
        Key::TrimTrailingWhitespace,
        Key::Charset,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Key::IndentStyle => "indent_style",
            Key::IndentSize => "indent_size",
            Key::TabWidth => "tab_width",
            Key::EndOfLine => "end_of_line",
            Key::InsertFinalNewline => "insert_final_newline",
            Key::TrimTrailingWhitespace => "trim_trailing_whitespace",
            Key::Charset => "charset",
        }
    }
}

/// One `key = value` line of a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    IndentStyle(IndentStyle),
    IndentSize(IndentSize),
    TabWidth(u32),
    EndOfLine(EndOfLine),
    InsertFinalNewline(bool),
    TrimTrailingWhitespace(bool),
    Charset(Charset),
    /// `key = unset` clears whatever an earlier section set.
    Unset(Key),
    /// Unrecognized key, or a known key with a value outside its domain.
    Unknown { key: String, value: String },
}

impl Property {
    /// Interpret a pair read from a config file. `key` is expected lowercased.
    pub fn from_pair(key: &str, value: &str) -> Self {
        let Some(known) = Key::from_name(key) else {
            return Self::unknown(key, value);
        };

        let lowered = value.to_ascii_lowercase();
        if lowered == "unset" {
            return Property::Unset(known);
        }

        let parsed = match known {
            Key::IndentStyle => IndentStyle::from_value(&lowered).map(Property::IndentStyle),
            Key::IndentSize => IndentSize::from_value(&lowered).map(Property::IndentSize),
            Key::TabWidth => parse_width(&lowered).map(Property::TabWidth),
            Key::EndOfLine => EndOfLine::from_value(&lowered).map(Property::EndOfLine),
            Key::InsertFinalNewline => parse_bool(&lowered).map(Property::InsertFinalNewline),
            Key::TrimTrailingWhitespace => {
                parse_bool(&lowered).map(Property::TrimTrailingWhitespace)
            }
            Key::Charset => Charset::from_value(&lowered).map(Property::Charset),
        };

        parsed.unwrap_or_else(|| Self::unknown(key, value))
    }

    fn unknown(key: &str, value: &str) -> Self {
        Property::Unknown {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// The known key this property sets, if any.
    pub fn key(&self) -> Option<Key> {
        match self {
            Property::IndentStyle(_) => Some(Key::IndentStyle),
            Property::IndentSize(_) => Some(Key::IndentSize),
            Property::TabWidth(_) => Some(Key::TabWidth),
            Property::EndOfLine(_) => Some(Key::EndOfLine),
            Property::InsertFinalNewline(_) => Some(Key::InsertFinalNewline),
            Property::TrimTrailingWhitespace(_) => Some(Key::TrimTrailingWhitespace),
            Property::Charset(_) => Some(Key::Charset),
            Property::Unset(key) => Some(*key),
            Property::Unknown { .. } => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Property::Unknown { key, .. } => key,
            other => other.key().map_or("", Key::as_str),
        }
    }

    pub fn value(&self) -> String {
        match self {
            Property::IndentStyle(v) => v.to_string(),
            Property::IndentSize(v) => v.to_string(),
            Property::TabWidth(v) => v.to_string(),
            Property::EndOfLine(v) => v.to_string(),
            Property::InsertFinalNewline(v) | Property::TrimTrailingWhitespace(v) => v.to_string(),
            Property::Charset(v) => v.to_string(),
            Property::Unset(_) => "unset".to_string(),
            Property::Unknown { value, .. } => value.clone(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_width(value: &str) -> Option<u32> {
    value.parse::<u32>().ok().filter(|n| *n > 0)
}

/// A `[glob]` header and the properties listed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub glob: String,
    pub properties: Vec<Property>,
}

impl Section {
    pub fn new(glob: impl Into<String>) -> Self {
        Self {
            glob: glob.into(),
            properties: Vec::new(),
        }
    }

    pub fn with(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorConfig {
    /// `root = ...` from the preamble, before the first section.
    pub root: Option<bool>,
    /// Other preamble pairs, kept for round-tripping.
    pub preamble: Vec<(String, String)>,
    pub sections: Vec<Section>,
}

/// The resolved property set for one file (or observed from one file).
///
/// `None` means "not specified", never a default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    pub indent_style: Option<IndentStyle>,
    pub indent_size: Option<IndentSize>,
    pub tab_width: Option<u32>,
    pub end_of_line: Option<EndOfLine>,
    pub insert_final_newline: Option<bool>,
    pub trim_trailing_whitespace: Option<bool>,
    pub charset: Option<Charset>,
    pub unknown: Vec<(String, String)>,
}

impl Properties {
    /// Layer one property on top of the current set.
    pub fn apply(&mut self, property: &Property) {
        match property {
            Property::IndentStyle(v) => self.indent_style = Some(*v),
            Property::IndentSize(v) => self.indent_size = Some(*v),
            Property::TabWidth(v) => self.tab_width = Some(*v),
            Property::EndOfLine(v) => self.end_of_line = Some(*v),
            Property::InsertFinalNewline(v) => self.insert_final_newline = Some(*v),
            Property::TrimTrailingWhitespace(v) => self.trim_trailing_whitespace = Some(*v),
            Property::Charset(v) => self.charset = Some(*v),
            Property::Unset(key) => self.clear(*key),
            Property::Unknown { key, value } => {
                match self.unknown.iter_mut().find(|(k, _)| k == key) {
                    Some(slot) => slot.1.clone_from(value),
                    None => self.unknown.push((key.clone(), value.clone())),
                }
            }
        }
    }

    fn clear(&mut self, key: Key) {
        match key {
            Key::IndentStyle => self.indent_style = None,
            Key::IndentSize => self.indent_size = None,
            Key::TabWidth => self.tab_width = None,
            Key::EndOfLine => self.end_of_line = None,
            Key::InsertFinalNewline => self.insert_final_newline = None,
            Key::TrimTrailingWhitespace => self.trim_trailing_whitespace = None,
            Key::Charset => self.charset = None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Width of a tab stop: `tab_width`, else a numeric `indent_size`.
    pub fn tab_width(&self) -> Option<u32> {
        self.tab_width.or(match self.indent_size {
            Some(IndentSize::Width(n)) => Some(n),
            _ => None,
        })
    }

    /// Columns per indentation level; `indent_size = tab` defers to the tab width.
    pub fn indent_width(&self) -> Option<u32> {
        match self.indent_size {
            Some(IndentSize::Width(n)) => Some(n),
            Some(IndentSize::Tab) => self.tab_width,
            None => None,
        }
    }

    /// Flatten back into section lines, known keys first in [`Key`] order.
    pub fn to_properties(&self) -> Vec<Property> {
        let known = [
            self.indent_style.map(Property::IndentStyle),
            self.indent_size.map(Property::IndentSize),
            self.tab_width.map(Property::TabWidth),
            self.end_of_line.map(Property::EndOfLine),
            self.insert_final_newline.map(Property::InsertFinalNewline),
            self.trim_trailing_whitespace.map(Property::TrimTrailingWhitespace),
            self.charset.map(Property::Charset),
        ];
        known
            .into_iter()
            .flatten()
            .chain(self.unknown.iter().map(|(key, value)| Property::Unknown {
                key: key.clone(),
                value: value.clone(),
            }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pair_known_values() {
        assert_eq!(
            Property::from_pair("indent_style", "Space"),
            Property::IndentStyle(IndentStyle::Space)
        );
        assert_eq!(
            Property::from_pair("indent_size", "tab"),
            Property::IndentSize(IndentSize::Tab)
        );
        assert_eq!(
            Property::from_pair("end_of_line", "CRLF"),
            Property::EndOfLine(EndOfLine::CrLf)
        );
        assert_eq!(
            Property::from_pair("charset", "utf-8-bom"),
            Property::Charset(Charset::Utf8Bom)
        );
        assert_eq!(
            Property::from_pair("insert_final_newline", "false"),
            Property::InsertFinalNewline(false)
        );
    }

    #[test]
    fn test_from_pair_unset() {
        assert_eq!(
            Property::from_pair("indent_size", "unset"),
            Property::Unset(Key::IndentSize)
        );
    }

    #[test]
    fn test_from_pair_invalid_value_kept_verbatim() {
        assert_eq!(
            Property::from_pair("indent_size", "Zero"),
            Property::Unknown {
                key: "indent_size".into(),
                value: "Zero".into()
            }
        );
        assert!(matches!(
            Property::from_pair("indent_size", "0"),
            Property::Unknown { .. }
        ));
    }

    #[test]
    fn test_from_pair_unknown_key() {
        let property = Property::from_pair("max_line_length", "100");
        assert_eq!(property.key(), None);
        assert_eq!(property.name(), "max_line_length");
        assert_eq!(property.value(), "100");
    }

    #[test]
    fn test_apply_overrides_and_unset() {
        let mut props = Properties::default();
        props.apply(&Property::IndentStyle(IndentStyle::Space));
        props.apply(&Property::IndentSize(IndentSize::Width(4)));
        props.apply(&Property::IndentStyle(IndentStyle::Tab));
        props.apply(&Property::Unset(Key::IndentSize));

        assert_eq!(props.indent_style, Some(IndentStyle::Tab));
        assert_eq!(props.indent_size, None);
    }

    #[test]
    fn test_apply_unknown_replaces_same_key() {
        let mut props = Properties::default();
        props.apply(&Property::from_pair("max_line_length", "80"));
        props.apply(&Property::from_pair("max_line_length", "120"));
        assert_eq!(
            props.unknown,
            vec![("max_line_length".to_string(), "120".to_string())]
        );
    }

    #[test]
    fn test_tab_width_derivation() {
        let props = Properties {
            indent_size: Some(IndentSize::Width(2)),
            ..Default::default()
        };
        assert_eq!(props.tab_width(), Some(2));

        let props = Properties {
            indent_size: Some(IndentSize::Tab),
            tab_width: Some(8),
            ..Default::default()
        };
        assert_eq!(props.tab_width(), Some(8));
        assert_eq!(props.indent_width(), Some(8));
    }

    #[test]
    fn test_to_properties_order() {
        let props = Properties {
            charset: Some(Charset::Utf8),
            indent_style: Some(IndentStyle::Space),
            unknown: vec![("quote_type".into(), "single".into())],
            ..Default::default()
        };
        let names: Vec<_> = props
            .to_properties()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(names, ["indent_style", "charset", "quote_type"]);
    }
}
