use std::{collections::HashMap, hash::Hash};

use slotmap::SlotMap;

slotmap::new_key_type! {
    struct ItemKey;
}

/// A cached value together with its write-back state.
#[derive(Debug)]
pub struct CacheEntry<V> {
    pub value: V,
    pub dirty: bool,
}

struct Node<K, V> {
    key: K,
    entry: CacheEntry<V>,
    prev: Option<ItemKey>,
    next: Option<ItemKey>,
}

/// A fixed-capacity least-recently-used cache.
///
/// Items live in a slot arena and are threaded into a doubly-linked recency
/// queue through arena keys; a hash index maps cache keys to arena keys. The
/// front of the queue is the least recently used item.
///
/// The cache never evicts on its own: callers check [`is_full`] and call
/// [`pop_lru`] before inserting, so they can write the evicted item back
/// wherever it belongs.
///
/// [`is_full`]: LruCache::is_full
/// [`pop_lru`]: LruCache::pop_lru
pub struct LruCache<K, V> {
    items: SlotMap<ItemKey, Node<K, V>>,
    index: HashMap<K, ItemKey>,
    front: Option<ItemKey>,
    back: Option<ItemKey>,
    capacity: usize,
}

impl<K: Copy + Eq + Hash, V> LruCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: SlotMap::with_capacity_and_key(capacity),
            index: HashMap::with_capacity(capacity),
            front: None,
            back: None,
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Looks an item up and makes it the most recently used.
    pub fn get(&mut self, key: &K) -> Option<&mut CacheEntry<V>> {
        let item = *self.index.get(key)?;
        self.unlink(item);
        self.link_back(item);
        Some(&mut self.items[item].entry)
    }

    /// Looks an item up without touching the recency order.
    pub fn peek(&self, key: &K) -> Option<&CacheEntry<V>> {
        let item = *self.index.get(key)?;
        Some(&self.items[item].entry)
    }

    pub fn peek_mut(&mut self, key: &K) -> Option<&mut CacheEntry<V>> {
        let item = *self.index.get(key)?;
        Some(&mut self.items[item].entry)
    }

    /// Inserts a clean item as the most recently used one, replacing any
    /// previous value for the same key.
    pub fn insert(&mut self, key: K, value: V) -> &mut CacheEntry<V> {
        if let Some(&item) = self.index.get(&key) {
            self.unlink(item);
            self.link_back(item);
            let entry = &mut self.items[item].entry;
            entry.value = value;
            entry.dirty = false;
            return entry;
        }

        let item = self.items.insert(Node {
            key,
            entry: CacheEntry {
                value,
                dirty: false,
            },
            prev: None,
            next: None,
        });
        self.index.insert(key, item);
        self.link_back(item);
        &mut self.items[item].entry
    }

    /// Removes and returns the least recently used item.
    pub fn pop_lru(&mut self) -> Option<(K, CacheEntry<V>)> {
        let item = self.front?;
        self.unlink(item);
        let node = self.items.remove(item)?;
        self.index.remove(&node.key);
        Some((node.key, node.entry))
    }

    pub fn remove(&mut self, key: &K) -> Option<CacheEntry<V>> {
        let item = self.index.remove(key)?;
        self.unlink(item);
        self.items.remove(item).map(|node| node.entry)
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            cache: self,
            next: self.front,
        }
    }

    /// Keys of dirty items, from least to most recently used.
    pub fn dirty_keys(&self) -> Vec<K> {
        self.keys()
            .filter(|key| self.peek(key).is_some_and(|entry| entry.dirty))
            .collect()
    }

    fn unlink(&mut self, item: ItemKey) {
        let (prev, next) = {
            let node = &mut self.items[item];
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(prev) => self.items[prev].next = next,
            None => self.front = next,
        }
        match next {
            Some(next) => self.items[next].prev = prev,
            None => self.back = prev,
        }
    }

    fn link_back(&mut self, item: ItemKey) {
        self.items[item].prev = self.back;
        self.items[item].next = None;
        match self.back {
            Some(back) => self.items[back].next = Some(item),
            None => self.front = Some(item),
        }
        self.back = Some(item);
    }
}

pub struct Keys<'a, K, V> {
    cache: &'a LruCache<K, V>,
    next: Option<ItemKey>,
}

impl<K: Copy, V> Iterator for Keys<'_, K, V> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cache.items.get(self.next?)?;
        self.next = node.next;
        Some(node.key)
    }
}
