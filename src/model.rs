//! The page/form data model: `PageId` and the on-disk metadata schema
//! (`PageMetadata`, `GlobalOverrides`, `FormSpec`, `FieldSpec`).
//!
//! The schema is closed (`#[serde(deny_unknown_fields)]`) so a typo in a
//! `.meta` file fails at load time instead of being silently ignored, and
//! `special`/`validate`/`target` tags are resolved against a
//! [`crate::registry::Registry`] at the same point, per the REDESIGN FLAGS
//! in the specification: unknown tags become a configuration error where
//! the document is loaded, not a runtime no-op where it's used.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::registry::Registry;

/// A non-empty string over digits and lowercase ASCII letters identifying
/// a page. See module docs for the suffix/successor rules.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(String);

impl PageId {
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()) {
            return Err(Error::UnknownTag(format!("invalid page id: {s:?}")));
        }
        Ok(PageId(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A trailing digit denotes the first subpage of a series; normalize
    /// it to that digit followed by `'a'` before resolution.
    pub fn normalized(&self) -> PageId {
        if self.0.ends_with(|c: char| c.is_ascii_digit()) {
            PageId(format!("{}a", self.0))
        } else {
            self.clone()
        }
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// The next id in the successor chain: digit -> digit+'a', 'a'..'y' ->
    /// next letter, 'z' -> `None` (not a valid successor).
    pub fn successor(&self) -> Option<PageId> {
        let last = self.0.chars().last()?;
        if last.is_ascii_digit() {
            Some(PageId(format!("{}a", self.0)))
        } else if ('a'..='y').contains(&last) {
            let next = (last as u8 + 1) as char;
            let mut s = self.0.clone();
            s.pop();
            s.push(next);
            Some(PageId(s))
        } else {
            None
        }
    }

    /// Prefixes of this id from longest to shortest, for directory lookup.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        let s = &self.0;
        (1..=s.len()).rev().map(move |i| &s[..i])
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved validator tag, checked against the registry at load time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidatorTag {
    UserId,
    Ext,
    LoginPassword,
    Custom(String),
}

impl ValidatorTag {
    fn resolve(raw: &str, registry: &Registry) -> Result<Self> {
        match raw {
            "user_id" => Ok(ValidatorTag::UserId),
            "ext" => Ok(ValidatorTag::Ext),
            "$login_password" => Ok(ValidatorTag::LoginPassword),
            other => {
                if let Some(name) = other.strip_prefix("call:") {
                    if registry.has_validator(name) {
                        Ok(ValidatorTag::Custom(name.to_string()))
                    } else {
                        Err(Error::UnknownTag(other.to_string()))
                    }
                } else {
                    Err(Error::UnknownTag(other.to_string()))
                }
            }
        }
    }
}

/// A resolved form/field target, checked against the registry at load time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetSpec {
    Page(PageId),
    Call(String),
}

impl TargetSpec {
    fn resolve(raw: &str, registry: &Registry) -> Result<Self> {
        if let Some(id) = raw.strip_prefix("page:") {
            Ok(TargetSpec::Page(PageId::new(id)?))
        } else if let Some(name) = raw.strip_prefix("call:") {
            if registry.has_target(name) {
                Ok(TargetSpec::Call(name.to_string()))
            } else {
                Err(Error::UnknownTag(raw.to_string()))
            }
        } else {
            Err(Error::UnknownTag(raw.to_string()))
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFieldSpec {
    name: String,
    line: u16,
    column: u16,
    height: u16,
    width: u16,
    #[serde(default)]
    fgcolor: Option<u8>,
    #[serde(default)]
    bgcolor: Option<u8>,
    #[serde(default)]
    hint: Option<String>,
    #[serde(rename = "type", default)]
    field_type: Option<String>,
    #[serde(default)]
    cursor_home: bool,
    #[serde(default)]
    legal_values: Option<Vec<String>>,
    #[serde(default = "default_true")]
    clear_line: bool,
    #[serde(default)]
    end_on_illegal_character: bool,
    #[serde(default)]
    end_on_legal_string: bool,
    #[serde(default)]
    echo_ter: bool,
    #[serde(rename = "default", default)]
    default_value: Option<String>,
    #[serde(default)]
    special: Option<String>,
    #[serde(default)]
    validate: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub line: u16,
    pub column: u16,
    pub height: u16,
    pub width: u16,
    pub fgcolor: Option<u8>,
    pub bgcolor: Option<u8>,
    pub hint: Option<String>,
    pub field_type: Option<String>,
    pub cursor_home: bool,
    pub legal_values: Option<Vec<String>>,
    pub clear_line: bool,
    pub end_on_illegal_character: bool,
    pub end_on_legal_string: bool,
    pub echo_ter: bool,
    pub default_value: Option<String>,
    /// `validate` takes priority over `special` when both resolve.
    pub validator: Option<ValidatorTag>,
}

impl FieldSpec {
    fn from_raw(raw: RawFieldSpec, registry: &Registry) -> Result<Self> {
        let validator = match (&raw.validate, &raw.special) {
            (Some(v), _) => Some(ValidatorTag::resolve(v, registry)?),
            (None, Some(s)) => Some(ValidatorTag::resolve(s, registry)?),
            (None, None) => None,
        };
        Ok(FieldSpec {
            name: raw.name,
            line: raw.line,
            column: raw.column,
            height: raw.height,
            width: raw.width,
            fgcolor: raw.fgcolor,
            bgcolor: raw.bgcolor,
            hint: raw.hint,
            field_type: raw.field_type,
            cursor_home: raw.cursor_home,
            legal_values: raw.legal_values,
            clear_line: raw.clear_line,
            end_on_illegal_character: raw.end_on_illegal_character,
            end_on_legal_string: raw.end_on_legal_string,
            echo_ter: raw.echo_ter,
            default_value: raw.default_value,
            validator,
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFormSpec {
    fields: Vec<RawFieldSpec>,
    #[serde(default)]
    no_navigation: bool,
    #[serde(default = "default_true")]
    confirm: bool,
    #[serde(default)]
    no_55: bool,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    target: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormSpec {
    pub fields: Vec<FieldSpec>,
    pub no_navigation: bool,
    pub confirm: bool,
    pub no_55: bool,
    pub action: Option<String>,
    pub target: Option<TargetSpec>,
}

impl FormSpec {
    fn from_raw(raw: RawFormSpec, registry: &Registry) -> Result<Self> {
        let fields = raw
            .fields
            .into_iter()
            .map(|f| FieldSpec::from_raw(f, registry))
            .collect::<Result<Vec<_>>>()?;
        let target = raw
            .target
            .as_deref()
            .map(|t| TargetSpec::resolve(t, registry))
            .transpose()?;
        Ok(FormSpec {
            fields,
            no_navigation: raw.no_navigation,
            confirm: raw.confirm,
            no_55: raw.no_55,
            action: raw.action,
            target,
        })
    }

    /// The synthetic single-field navigation form used when a page has no
    /// `inputs` of its own: a legal-values prompt over the page's links.
    pub fn default_navigation(links: &HashMap<String, String>) -> FormSpec {
        let legal_values: Vec<String> = links.keys().filter(|k| k.as_str() != "#").cloned().collect();
        FormSpec {
            fields: vec![FieldSpec {
                name: "$navigation".to_string(),
                line: 24,
                column: 1,
                height: 1,
                width: 20,
                fgcolor: None,
                bgcolor: None,
                hint: None,
                field_type: None,
                cursor_home: false,
                legal_values: Some(legal_values),
                clear_line: false,
                end_on_illegal_character: true,
                end_on_legal_string: true,
                echo_ter: true,
                default_value: None,
                validator: None,
            }],
            no_navigation: false,
            confirm: false,
            no_55: true,
            action: None,
            target: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPageMetadata {
    publisher_name: String,
    publisher_color: u8,
    #[serde(default)]
    palette: Option<String>,
    #[serde(default)]
    include: Option<String>,
    #[serde(default)]
    clear_screen: bool,
    #[serde(default)]
    cls2: bool,
    #[serde(default)]
    links: HashMap<String, String>,
    #[serde(default)]
    inputs: Option<RawFormSpec>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageMetadata {
    pub publisher_name: String,
    pub publisher_color: u8,
    pub palette: Option<String>,
    pub include: Option<String>,
    pub clear_screen: bool,
    pub cls2: bool,
    pub links: HashMap<String, String>,
    pub inputs: Option<FormSpec>,
}

impl PageMetadata {
    pub fn parse(json: &str, registry: &Registry) -> Result<Self> {
        let raw: RawPageMetadata = serde_json::from_str(json).map_err(|source| Error::MalformedDocument {
            path: "<metadata>".to_string(),
            source,
        })?;
        let inputs = raw
            .inputs
            .map(|f| FormSpec::from_raw(f, registry))
            .transpose()?;
        Ok(PageMetadata {
            publisher_name: raw.publisher_name,
            publisher_color: raw.publisher_color,
            palette: raw.palette,
            include: raw.include,
            clear_screen: raw.clear_screen,
            cls2: raw.cls2,
            links: raw.links,
            inputs,
        })
    }

    /// Overlays `overrides` onto `self`; any key present in `overrides`
    /// wins (global-overrides-win).
    pub fn apply_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(v) = &overrides.publisher_name {
            self.publisher_name = v.clone();
        }
        if let Some(v) = overrides.publisher_color {
            self.publisher_color = v;
        }
        if overrides.palette.is_some() {
            self.palette = overrides.palette.clone();
        }
        if overrides.include.is_some() {
            self.include = overrides.include.clone();
        }
        if let Some(v) = overrides.clear_screen {
            self.clear_screen = v;
        }
        if let Some(v) = overrides.cls2 {
            self.cls2 = v;
        }
        if let Some(v) = &overrides.links {
            self.links = v.clone();
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalOverrides {
    #[serde(default)]
    pub publisher_name: Option<String>,
    #[serde(default)]
    pub publisher_color: Option<u8>,
    #[serde(default)]
    pub palette: Option<String>,
    #[serde(default)]
    pub include: Option<String>,
    #[serde(default)]
    pub clear_screen: Option<bool>,
    #[serde(default)]
    pub cls2: Option<bool>,
    #[serde(default)]
    pub links: Option<HashMap<String, String>>,
}

impl GlobalOverrides {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| Error::MalformedDocument {
            path: "<a.glob>".to_string(),
            source,
        })
    }
}

/// The `.pal` document: 32 RGB palette entries.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaletteDocument {
    pub palette: Vec<(u8, u8, u8)>,
}

impl PaletteDocument {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| Error::MalformedDocument {
            path: "<palette>".to_string(),
            source,
        })
    }
}
