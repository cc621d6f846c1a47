//! Core record types: identifiers, individuals and drafts.

use crate::layout::Position;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque, immutable identifier of an individual.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndividualId(String);

impl IndividualId {
    /// Wrap a raw id string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw id text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IndividualId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for IndividualId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for IndividualId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for IndividualId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Gender shown on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Default for new records.
    #[default]
    Male,
    /// Shown with the female card style.
    Female,
    /// Anything else, or not stated.
    Other,
}

impl Gender {
    /// Lowercase name, as stored in snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(format!("unknown gender '{other}'")),
        }
    }
}

/// One person node in the family graph.
///
/// Edge fields (`parents`, `partner`, `children`) are read-only outside the
/// crate; they only change through [`crate::FamilyTree`] so that both sides
/// of every edge stay in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    id: IndividualId,
    name: String,
    #[serde(default)]
    gender: Gender,
    #[serde(default)]
    description: String,
    #[serde(default, with = "blank_as_none")]
    image: Option<String>,
    #[serde(default)]
    parents: IndexSet<IndividualId>,
    #[serde(default, with = "blank_as_none")]
    partner: Option<IndividualId>,
    #[serde(default)]
    children: IndexSet<IndividualId>,
    position: Position,
}

impl Individual {
    pub(crate) fn new(id: IndividualId, draft: CheckedDraft, position: Position) -> Self {
        Self {
            id,
            name: draft.name,
            gender: draft.gender,
            description: draft.description,
            image: draft.image,
            parents: draft.parents,
            partner: draft.partner,
            children: IndexSet::new(),
            position,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &IndividualId {
        &self.id
    }

    /// Display name, never blank.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gender shown on the card.
    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Free-text notes.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Portrait URI, if one is set.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Parent ids in the order they were added.
    pub fn parents(&self) -> &IndexSet<IndividualId> {
        &self.parents
    }

    /// Current partner, if any.
    pub fn partner(&self) -> Option<&IndividualId> {
        self.partner.as_ref()
    }

    /// Kept in step with the children's own parent lists.
    pub fn children(&self) -> &IndexSet<IndividualId> {
        &self.children
    }

    /// Card position on the canvas.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Replace scalar fields and the parent/partner references from a checked draft.
    /// Children are untouched; they belong to the other side of each edge.
    pub(crate) fn apply_draft(&mut self, draft: CheckedDraft) {
        self.name = draft.name;
        self.gender = draft.gender;
        self.description = draft.description;
        self.image = draft.image;
        self.parents = draft.parents;
        self.partner = draft.partner;
    }

    pub(crate) fn link_child(&mut self, child: &IndividualId) -> bool {
        self.children.insert(child.clone())
    }

    pub(crate) fn unlink_child(&mut self, child: &IndividualId) -> bool {
        self.children.shift_remove(child)
    }

    pub(crate) fn unlink_parent(&mut self, parent: &IndividualId) -> bool {
        self.parents.shift_remove(parent)
    }

    /// Returns the previous partner.
    pub(crate) fn set_partner(&mut self, partner: Option<IndividualId>) -> Option<IndividualId> {
        std::mem::replace(&mut self.partner, partner)
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }
}

/// User-supplied fields for add and update.
///
/// A draft is what the presentation layer collects from its form. Parent
/// and partner ids must name individuals already in the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndividualDraft {
    /// Display name; must not be blank.
    pub name: String,
    /// Defaults to male.
    pub gender: Gender,
    /// Free-text notes.
    pub description: String,
    /// Portrait URI.
    pub image: Option<String>,
    /// Requested parents; duplicates collapse.
    pub parents: Vec<IndividualId>,
    /// Requested partner; `None` ends any partnership.
    pub partner: Option<IndividualId>,
}

impl IndividualDraft {
    /// Draft with only a name set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Prefill a draft from a stored individual, as an edit form would.
    pub fn from_individual(individual: &Individual) -> Self {
        Self {
            name: individual.name.clone(),
            gender: individual.gender,
            description: individual.description.clone(),
            image: individual.image.clone(),
            parents: individual.parents.iter().cloned().collect(),
            partner: individual.partner.clone(),
        }
    }

    /// Set the gender.
    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    /// Set the free-text notes.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the portrait. An empty string clears it.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Replace the parent list.
    #[must_use]
    pub fn with_parents<I>(mut self, parents: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<IndividualId>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    /// Request a partner.
    #[must_use]
    pub fn with_partner(mut self, partner: impl Into<IndividualId>) -> Self {
        self.partner = Some(partner.into());
        self
    }

    /// Request no partner.
    #[must_use]
    pub fn without_partner(mut self) -> Self {
        self.partner = None;
        self
    }
}

/// A draft that passed validation against the current store.
///
/// Only [`crate::engine::check_draft`] builds one, so holding a value means
/// the name is present and every reference resolves.
#[derive(Debug, Clone)]
pub(crate) struct CheckedDraft {
    pub(crate) name: String,
    pub(crate) gender: Gender,
    pub(crate) description: String,
    pub(crate) image: Option<String>,
    pub(crate) parents: IndexSet<IndividualId>,
    pub(crate) partner: Option<IndividualId>,
}

/// Snapshot files spell "no value" as an empty string.
mod blank_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<str>,
        S: Serializer,
    {
        serializer.serialize_str(value.as_ref().map_or("", AsRef::as_ref))
    }

    pub(super) fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: From<String>,
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()).map(T::from))
    }
}
