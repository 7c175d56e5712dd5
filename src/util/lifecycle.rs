use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ZeroSizedType;

/// Counts how many instances sharing one counter are currently alive. Construction and cloning
/// increment the count, dropping decrements it, so a count of zero after a test means there were
/// no leaks and no double drops.
#[derive(Debug)]
pub struct LiveCounter {
    live: Rc<Cell<isize>>,
    pub id: usize,
}

impl LiveCounter {
    pub fn tracker() -> Rc<Cell<isize>> {
        Rc::new(Cell::new(0))
    }

    pub fn new(live: &Rc<Cell<isize>>, id: usize) -> LiveCounter {
        live.set(live.get() + 1);
        LiveCounter {
            live: Rc::clone(live),
            id,
        }
    }
}

impl Clone for LiveCounter {
    fn clone(&self) -> Self {
        LiveCounter::new(&self.live, self.id)
    }
}

impl PartialEq for LiveCounter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Drop for LiveCounter {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}
