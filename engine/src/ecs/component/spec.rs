use std::{cmp::Ordering, slice};

use crate::ecs::component::Id;

/// A sorted, duplicate free set of component ids.
///
/// Two specs built from the same ids in any order are equal and hash alike, so a `Spec` can key
/// maps of component combinations. All set operations walk both sides once.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Spec {
    ids: Vec<Id>,
}

impl Spec {
    /// The empty id set.
    pub const EMPTY: Self = Spec { ids: Vec::new() };

    /// Construct a new Spec from the given component ids, in any order and with repeats.
    #[inline]
    pub fn new(ids: impl Into<Vec<Id>>) -> Self {
        let mut ids = ids.into();
        ids.sort_unstable();
        ids.dedup();
        Self { ids }
    }

    /// Get the component ids, ascending.
    #[inline]
    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, Id> {
        self.ids.iter()
    }

    /// Check whether `id` is a member.
    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Check whether every member of `other` is a member of `self`.
    pub fn contains_all(&self, other: &Spec) -> bool {
        let mut mine = self.ids.iter().peekable();
        other.ids.iter().all(|id| {
            while mine.next_if(|m| *m < id).is_some() {}
            mine.next_if_eq(&id).is_some()
        })
    }

    /// Check whether `self` and `other` share any member.
    pub fn contains_any(&self, other: &Spec) -> bool {
        let mut found = false;
        Self::walk(&self.ids, &other.ids, |_, side| {
            found |= side == Ordering::Equal;
        });
        found
    }

    /// Members of either spec.
    pub fn union(&self, other: &Spec) -> Self {
        let mut ids = Vec::with_capacity(self.ids.len() + other.ids.len());
        Self::walk(&self.ids, &other.ids, |id, _| ids.push(id));
        Self { ids }
    }

    /// Members of `self` that are not in `other`.
    pub fn difference(&self, other: &Spec) -> Self {
        let mut ids = Vec::new();
        Self::walk(&self.ids, &other.ids, |id, side| {
            if side == Ordering::Less {
                ids.push(id);
            }
        });
        Self { ids }
    }

    /// Members of both specs.
    pub fn intersection(&self, other: &Spec) -> Self {
        let mut ids = Vec::new();
        Self::walk(&self.ids, &other.ids, |id, side| {
            if side == Ordering::Equal {
                ids.push(id);
            }
        });
        Self { ids }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Merge-walk two ascending slices, reporting each distinct id once with where it was found:
    /// `Less` for left only, `Greater` for right only, `Equal` for both.
    fn walk(left: &[Id], right: &[Id], mut visit: impl FnMut(Id, Ordering)) {
        let (mut l, mut r) = (0, 0);
        while l < left.len() && r < right.len() {
            match left[l].cmp(&right[r]) {
                Ordering::Less => {
                    visit(left[l], Ordering::Less);
                    l += 1;
                }
                Ordering::Greater => {
                    visit(right[r], Ordering::Greater);
                    r += 1;
                }
                Ordering::Equal => {
                    visit(left[l], Ordering::Equal);
                    l += 1;
                    r += 1;
                }
            }
        }
        left[l..].iter().for_each(|id| visit(*id, Ordering::Less));
        right[r..].iter().for_each(|id| visit(*id, Ordering::Greater));
    }
}

impl From<Vec<Id>> for Spec {
    #[inline]
    fn from(value: Vec<Id>) -> Self {
        Spec::new(value)
    }
}

impl FromIterator<Id> for Spec {
    fn from_iter<T: IntoIterator<Item = Id>>(iter: T) -> Self {
        Spec::new(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a Spec {
    type Item = &'a Id;
    type IntoIter = slice::Iter<'a, Id>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(ids: &[u32]) -> Spec {
        ids.iter().copied().map(Id::new).collect()
    }

    #[test]
    fn new_sorts_and_dedups() {
        // When
        let spec = Spec::new(vec![Id::new(3), Id::new(1), Id::new(3), Id::new(2)]);

        // Then
        assert_eq!(spec.ids(), &[Id::new(1), Id::new(2), Id::new(3)]);
        assert_eq!(spec.len(), 3);
        assert_eq!(spec, self::spec(&[2, 3, 1]));
    }

    #[test]
    fn empty_spec() {
        assert!(Spec::EMPTY.is_empty());
        assert_eq!(Spec::default(), Spec::EMPTY);
        assert!(spec(&[1]).contains_all(&Spec::EMPTY));
        assert!(!spec(&[1]).contains_any(&Spec::EMPTY));
    }

    #[test]
    fn containment() {
        // Given
        let spec = spec(&[1, 4, 9]);

        // Then
        assert!(spec.contains(Id::new(4)));
        assert!(!spec.contains(Id::new(5)));
        assert!(spec.contains_all(&self::spec(&[1, 9])));
        assert!(!spec.contains_all(&self::spec(&[1, 5])));
        assert!(!spec.contains_all(&self::spec(&[10])));
        assert!(spec.contains_any(&self::spec(&[0, 9])));
        assert!(!spec.contains_any(&self::spec(&[0, 2, 10])));
    }

    #[test]
    fn set_operations() {
        // Given
        let a = spec(&[1, 2, 5, 8]);
        let b = spec(&[2, 3, 8, 13]);

        // Then
        assert_eq!(a.union(&b), spec(&[1, 2, 3, 5, 8, 13]));
        assert_eq!(a.difference(&b), spec(&[1, 5]));
        assert_eq!(b.difference(&a), spec(&[3, 13]));
        assert_eq!(a.intersection(&b), spec(&[2, 8]));
        assert_eq!(a.intersection(&Spec::EMPTY), Spec::EMPTY);
    }

    #[test]
    fn iterates_ascending() {
        let collected: Vec<_> = (&spec(&[7, 3])).into_iter().map(Id::index).collect();
        assert_eq!(collected, vec![3, 7]);
    }
}
