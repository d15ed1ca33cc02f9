use std::collections::HashSet;

use crate::core::course::{Course, CourseId};

/// Ordered collection of course records. Input order is significant: it
/// decides representatives under title deduplication and node order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn get(&self, id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| &course.id == id)
    }

    pub fn contains(&self, id: &CourseId) -> bool {
        self.get(id).is_some()
    }

    /// Distinct specialization tags in first-seen order.
    pub fn specializations(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.courses
            .iter()
            .filter(|course| seen.insert(course.specialization.as_str()))
            .map(|course| course.specialization.clone())
            .collect()
    }

    pub fn extend(&mut self, courses: impl IntoIterator<Item = Course>) {
        self.courses.extend(courses);
    }
}

impl FromIterator<Course> for Catalog {
    fn from_iter<T: IntoIterator<Item = Course>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
