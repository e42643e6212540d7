//! `List<T>`: the two interoperating shapes a persistent list needs —
//! a persistent vector, and a cons-cell spine of O(1) prepends sitting on
//! top of a vector tail. All operations must behave identically regardless
//! of which shape backs a given value; we realize that by materializing the
//! cons spine into a vector lazily whenever an operation needs random
//! access or a vector-shaped result.

use super::pvec::PVec;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Shape<T> {
    Vector(PVec<T>),
    Cons { head: T, tail: Arc<Shape<T>> },
}

#[derive(Debug, Clone)]
pub struct PList<T> {
    shape: Arc<Shape<T>>,
}

impl<T: Clone> Default for PList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> PList<T> {
    pub fn new() -> Self {
        Self {
            shape: Arc::new(Shape::Vector(PVec::new())),
        }
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            shape: Arc::new(Shape::Vector(PVec::from_iter(items))),
        }
    }

    pub fn prepend(&self, value: T) -> Self {
        Self {
            shape: Arc::new(Shape::Cons {
                head: value,
                tail: Arc::clone(&self.shape),
            }),
        }
    }

    pub fn append(&self, value: T) -> Self {
        Self {
            shape: Arc::new(Shape::Vector(self.to_vector().push(value))),
        }
    }

    pub fn len(&self) -> usize {
        match self.shape.as_ref() {
            Shape::Vector(v) => v.len(),
            Shape::Cons { tail, .. } => 1 + Self { shape: Arc::clone(tail) }.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialize the cons overlay into a flat vector, needed for any
    /// operation requiring arbitrary index beyond the spine.
    pub fn to_vector(&self) -> PVec<T> {
        match self.shape.as_ref() {
            Shape::Vector(v) => v.clone(),
            Shape::Cons { .. } => {
                let mut items = Vec::with_capacity(self.len());
                self.collect_into(&mut items);
                PVec::from_iter(items)
            }
        }
    }

    fn collect_into(&self, out: &mut Vec<T>) {
        match self.shape.as_ref() {
            Shape::Vector(v) => out.extend(v.iter().cloned()),
            Shape::Cons { head, tail } => {
                out.push(head.clone());
                Self { shape: Arc::clone(tail) }.collect_into(out);
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<T> {
        match self.shape.as_ref() {
            Shape::Vector(v) => v.get(index).cloned(),
            Shape::Cons { head, tail } => {
                if index == 0 {
                    Some(head.clone())
                } else {
                    Self { shape: Arc::clone(tail) }.get(index - 1)
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let vec = self.to_vector();
        (0..vec.len()).map(move |i| vec.get(i).unwrap().clone())
    }

    pub fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            shape: Arc::new(Shape::Vector(self.to_vector().slice(start, end))),
        }
    }

    pub fn concat(&self, other: &Self) -> Self {
        match (self.shape.as_ref(), other.shape.as_ref()) {
            (Shape::Vector(a), Shape::Vector(b)) => Self {
                shape: Arc::new(Shape::Vector(a.concat(b))),
            },
            _ => {
                let mut items: Vec<T> = self.iter().collect();
                items.extend(other.iter());
                Self::from_vec(items)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepend_is_o1_and_visible_at_index_zero() {
        let base = PList::from_vec(vec![2, 3, 4]);
        let grown = base.prepend(1);
        assert_eq!(grown.len(), base.len() + 1);
        assert_eq!(grown.get(0), Some(1));
        for i in 0..base.len() {
            assert_eq!(grown.get(i + 1), base.get(i));
        }
    }

    #[test]
    fn concat_length_and_index_equivalence() {
        let xs = PList::from_vec(vec![1, 2, 3]);
        let ys = PList::from_vec(vec![4, 5]);
        let both = xs.concat(&ys);
        assert_eq!(both.len(), xs.len() + ys.len());
        let collected: Vec<_> = both.iter().collect();
        assert_eq!(collected, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn mixed_shape_concat_via_cons_overlay() {
        let consy = PList::from_vec(vec![3, 4]).prepend(2).prepend(1);
        let vecy = PList::from_vec(vec![5, 6]);
        let joined = consy.concat(&vecy);
        let collected: Vec<_> = joined.iter().collect();
        assert_eq!(collected, vec![1, 2, 3, 4, 5, 6]);
    }
}
