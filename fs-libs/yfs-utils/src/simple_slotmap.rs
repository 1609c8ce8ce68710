/// A bounded slot table that always hands out the lowest free index, the way
/// file descriptor numbers are assigned.
#[derive(Debug, Clone)]
pub struct SimpleSlotmap<T> {
    data: Vec<Option<T>>,
    limit: usize,
}

impl<T> SimpleSlotmap<T> {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit,
        }
    }

    /// Stores `value` in the lowest free slot, or gives it back when every
    /// slot up to the limit is taken.
    pub fn insert(&mut self, value: T) -> Result<usize, T> {
        if let Some(idx) = self.data.iter().position(Option::is_none) {
            self.data[idx] = Some(value);
            return Ok(idx);
        }

        if self.data.len() >= self.limit {
            return Err(value);
        }

        self.data.push(Some(value));
        Ok(self.data.len() - 1)
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        let removed = self.data.get_mut(index)?.take();

        while matches!(self.data.last(), Some(None)) {
            self.data.pop();
        }

        removed
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index).and_then(Option::as_mut)
    }

    pub fn len(&self) -> usize {
        self.data.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.iter().all(Option::is_none)
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (i, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::SimpleSlotmap;

    #[test]
    fn reuses_lowest_index() {
        let mut map = SimpleSlotmap::with_limit(4);
        assert_eq!(Ok(0), map.insert("a"));
        assert_eq!(Ok(1), map.insert("b"));
        assert_eq!(Ok(2), map.insert("c"));

        assert_eq!(Some("b"), map.remove(1));
        assert_eq!(Ok(1), map.insert("d"));
        assert_eq!(Some(&"d"), map.get(1));
        assert_eq!(3, map.len());
    }

    #[test]
    fn bounded() {
        let mut map = SimpleSlotmap::with_limit(2);
        map.insert(1).unwrap();
        map.insert(2).unwrap();
        assert_eq!(Err(3), map.insert(3));

        map.remove(0);
        assert_eq!(Ok(0), map.insert(3));
    }

    #[test]
    fn remove_missing() {
        let mut map = SimpleSlotmap::<u8>::with_limit(2);
        assert_eq!(None, map.remove(5));
        assert!(map.is_empty());
        map.insert(9).unwrap();
        *map.get_mut(0).unwrap() += 1;
        assert_eq!(vec![(0, &10)], map.iter().collect::<Vec<_>>());
    }
}
