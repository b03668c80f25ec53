//! Comparator-driven binary min-heap. Unlike [std::collections::BinaryHeap] the ordering is
//! injected as a closure instead of being taken from [Ord], which lets the search order nodes by
//! a floating point f-value with a non-strict comparison.

/// Array backed binary heap. `higher_priority(a, b)` returns [true] if `a` should leave the heap
/// before `b`. With a non-strict comparator the relative order of equal items is unspecified.
pub struct BinaryHeap<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    nodes: Vec<T>,
    higher_priority: F,
}

impl<T, F> BinaryHeap<T, F>
where
    F: Fn(&T, &T) -> bool,
{
    pub fn new(higher_priority: F) -> BinaryHeap<T, F> {
        BinaryHeap {
            nodes: Vec::new(),
            higher_priority,
        }
    }

    /// Inserts an item. Passing [None] leaves the heap untouched.
    pub fn insert(&mut self, item: impl Into<Option<T>>) {
        if let Some(item) = item.into() {
            self.nodes.push(item);
            self.bubble_up(self.nodes.len() - 1);
        }
    }

    /// Removes and returns the item with the highest priority, or [None] if the heap is empty.
    pub fn extract_min(&mut self) -> Option<T> {
        if self.nodes.is_empty() {
            return None;
        }
        let root = self.nodes.swap_remove(0);
        if !self.nodes.is_empty() {
            self.sink_down(0);
        }
        Some(root)
    }

    pub fn peek(&self) -> Option<&T> {
        self.nodes.first()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Iterates over the live contents in storage order, which is not priority order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.nodes.iter()
    }

    fn bubble_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if (self.higher_priority)(&self.nodes[index], &self.nodes[parent]) {
                self.nodes.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sink_down(&mut self, mut index: usize) {
        let count = self.nodes.len();
        loop {
            let left = 2 * index + 1;
            if left >= count {
                break;
            }
            let right = left + 1;
            let child = if right < count
                && (self.higher_priority)(&self.nodes[right], &self.nodes[left])
            {
                right
            } else {
                left
            };
            // Stop as soon as the child no longer strictly outranks the sinking item, so a
            // non-strict comparator cannot make equal items swap forever.
            if (self.higher_priority)(&self.nodes[index], &self.nodes[child]) {
                break;
            }
            self.nodes.swap(index, child);
            index = child;
        }
    }
}
