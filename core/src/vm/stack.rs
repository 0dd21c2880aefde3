use crate::errors::ErrorKind;

/// A LIFO stack with an enforced maximum depth.
///
/// The VM keeps its call frames here. Unlike a plain `Vec`, pushing beyond
/// `max_depth` fails with [`ErrorKind::StackOverflow`] instead of growing, so
/// runaway recursion in a program aborts the run rather than the host.
///
/// # Examples
///
/// ```ignore
/// use kiln_core::vm::Stack;
///
/// let mut stack = Stack::new(2);
/// stack.push(1).unwrap();
/// stack.push(2).unwrap();
/// assert!(stack.push(3).is_err());
/// assert_eq!(stack.pop(), Some(2));
/// ```
pub struct Stack<T> {
    items: Vec<T>,
    max_depth: usize,
}

impl<T> Stack<T> {
    /// Creates an empty stack that holds at most `max_depth` elements.
    pub fn new(max_depth: usize) -> Self {
        Self {
            items: Vec::with_capacity(max_depth.min(64)),
            max_depth,
        }
    }

    #[inline]
    pub fn push(&mut self, value: T) -> Result<(), ErrorKind> {
        if self.items.len() >= self.max_depth {
            return Err(ErrorKind::StackOverflow {
                depth: self.items.len() + 1,
                max_depth: self.max_depth,
            });
        }
        self.items.push(value);
        Ok(())
    }

    /// Removes and returns the top value, or `None` if the stack is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    #[inline]
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of elements the stack accepts.
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Iterates from bottom to top.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Stack")
            .field("items", &self.items)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_peek() {
        let mut stack = Stack::new(10);
        assert!(stack.is_empty());
        stack.push(1).unwrap();
        stack.push(2).unwrap();
        assert_eq!(stack.peek(), Some(&2));
        assert_eq!(stack.len(), 2);
        if let Some(top) = stack.peek_mut() {
            *top = 20;
        }
        assert_eq!(stack.pop(), Some(20));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_overflow() {
        let mut stack = Stack::new(2);
        stack.push('a').unwrap();
        stack.push('b').unwrap();
        let err = stack.push('c').unwrap_err();
        assert!(matches!(
            err,
            ErrorKind::StackOverflow {
                depth: 3,
                max_depth: 2
            }
        ));
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn test_iter_bottom_to_top() {
        let mut stack = Stack::new(10);
        for i in 0..3 {
            stack.push(i).unwrap();
        }
        let items: Vec<_> = stack.iter().copied().collect();
        assert_eq!(items, vec![0, 1, 2]);
        assert_eq!(stack.max_depth(), 10);
    }
}
