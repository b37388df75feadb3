//! Gallery search over an in-memory list of people.

use serde::{Deserialize, Serialize};

use crate::person::Person;

/// Search criteria. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonFilter {
    /// Case-insensitive substring of name or description
    pub search: Option<String>,
    /// Exact relationship label
    pub relationship: Option<String>,
    /// Exact tag
    pub tag: Option<String>,
}

impl PersonFilter {
    pub fn matches(&self, person: &Person) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                person.name.to_lowercase().contains(&q)
                    || person.description.to_lowercase().contains(&q)
            }
            _ => true,
        };
        let matches_relationship = self
            .relationship
            .as_ref()
            .map_or(true, |r| &person.relationship == r);
        let matches_tag = self
            .tag
            .as_ref()
            .map_or(true, |t| person.tags.iter().any(|pt| pt == t));

        matches_search && matches_relationship && matches_tag
    }

    /// Matching people, in input order.
    pub fn apply<'a>(&self, people: &'a [Person]) -> Vec<&'a Person> {
        people.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Distinct filter values present in a list of people.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub relationships: Vec<String>,
    pub tags: Vec<String>,
}

/// Collect unique relationships and tags in first-seen order.
pub fn facets(people: &[Person]) -> Facets {
    let mut out = Facets::default();
    for person in people {
        if !out.relationships.contains(&person.relationship) {
            out.relationships.push(person.relationship.clone());
        }
        for tag in &person.tags {
            if !out.tags.contains(tag) {
                out.tags.push(tag.clone());
            }
        }
    }
    out
}
