use std::collections::BTreeSet;

use serde::de::{self, DeserializeOwned};
use serde::{ser, ser::Serializer, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One experience item. Kept as an open key/value map so fields the
/// application does not model (dates, locations, bullet lists) survive a
/// round trip. Equality is deep and ignores key order.
pub type ExperienceEntry = Map<String, Value>;

const NAME: &str = "name";
const SUMMARY: &str = "summary";
const EXPERIENCE: &str = "experience";
const SKILLS: &str = "skills";
const SECTIONS: [&str; 4] = [NAME, SUMMARY, EXPERIENCE, SKILLS];

/// A stored résumé.
///
/// `summary`, `experience` and `skills` are the sections the tailoring step
/// rewrites. A missing or `null` section reads as empty. Every other
/// top-level field lands in `extra`.
///
/// Serialization follows the object as it was read: keys keep their order,
/// and a section nobody changed is written back exactly as stored, including
/// a `null` or no key at all.
#[derive(Debug, Clone, Default)]
pub struct ResumeDocument {
    pub name: Option<String>,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub skills: SkillSet,
    pub extra: Map<String, Value>,
    source: Map<String, Value>,
}

impl ResumeDocument {
    /// Parses a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serializes the document the way it is shown for editing: pretty JSON
    /// indented with four spaces.
    pub fn to_pretty_text(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn from_object(source: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let extra = source
            .iter()
            .filter(|(key, _)| !SECTIONS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(Self {
            name: read_section(source.get(NAME))?,
            summary: read_section(source.get(SUMMARY))?,
            experience: read_section(source.get(EXPERIENCE))?,
            skills: read_section(source.get(SKILLS))?,
            extra,
            source,
        })
    }

    fn to_object(&self) -> Result<Map<String, Value>, serde_json::Error> {
        // Keys as read first, then new unmodelled fields, then new sections.
        let keys = self
            .source
            .keys()
            .map(String::as_str)
            .chain(self.extra.keys().map(String::as_str))
            .chain(SECTIONS);

        let mut out = Map::new();
        for key in keys {
            if out.contains_key(key) {
                continue;
            }
            let value = if SECTIONS.contains(&key) {
                self.section_value(key)?
            } else {
                self.extra.get(key).cloned()
            };
            if let Some(value) = value {
                out.insert(key.to_string(), value);
            }
        }
        Ok(out)
    }

    fn section_value(&self, key: &str) -> Result<Option<Value>, serde_json::Error> {
        let stored = self.source.get(key);
        match key {
            NAME => write_section(stored, &self.name),
            SUMMARY => write_section(stored, &self.summary),
            EXPERIENCE => write_section(stored, &self.experience),
            SKILLS => write_section(stored, &self.skills),
            _ => Ok(None),
        }
    }
}

/// Missing and `null` both read as the empty section.
fn read_section<T>(value: Option<&Value>) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned + Default,
{
    match value {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value),
    }
}

/// The stored value while the section is unchanged, the current one
/// otherwise. An absent section stays absent until it has content.
fn write_section<T>(stored: Option<&Value>, current: &T) -> Result<Option<Value>, serde_json::Error>
where
    T: DeserializeOwned + Default + PartialEq + Serialize,
{
    if read_section::<T>(stored)? == *current {
        return Ok(stored.cloned());
    }
    serde_json::to_value(current).map(Some)
}

impl PartialEq for ResumeDocument {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.summary == other.summary
            && self.experience == other.experience
            && self.skills == other.skills
            && self.extra == other.extra
    }
}

impl Serialize for ResumeDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_object() {
            Ok(object) => object.serialize(serializer),
            Err(e) => Err(ser::Error::custom(e)),
        }
    }
}

impl<'de> Deserialize<'de> for ResumeDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_object(source).map_err(de::Error::custom)
    }
}

/// Skills as an unordered, deduplicated collection.
///
/// Comparison is set comparison. The first-seen order is kept only so the
/// document serializes back the way the user wrote it.
#[derive(Debug, Clone, Default)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.iter().any(|s| s == skill)
    }

    /// Skills present in `self` but not in `other`.
    pub fn difference(&self, other: &SkillSet) -> BTreeSet<String> {
        self.iter()
            .filter(|s| !other.contains(s))
            .cloned()
            .collect()
    }

    fn as_set(&self) -> BTreeSet<&str> {
        self.iter().map(String::as_str).collect()
    }
}

impl PartialEq for SkillSet {
    fn eq(&self, other: &Self) -> bool {
        self.as_set() == other.as_set()
    }
}

impl Eq for SkillSet {}

impl<S: Into<String>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut skills: Vec<String> = Vec::new();
        for skill in iter {
            let skill = skill.into();
            if !skills.contains(&skill) {
                skills.push(skill);
            }
        }
        SkillSet(skills)
    }
}

impl Serialize for SkillSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SkillSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<String>::deserialize(deserializer).map(SkillSet::from_iter)
    }
}
