/**
    Walks up a slash-separated path one segment at a time.

    The segments of the original path form a stack: everything before
    the split point is the current path, and everything after it is
    the tail. Retreating moves the split point one segment to the left,
    which shifts the last segment of the path onto the front of the tail.

    At every step, joining the path and the tail gives back the original.
*/
#[derive(Debug, Clone)]
pub struct PathRetreat<'a> {
    segments: Vec<&'a str>,
    split: usize,
}

impl<'a> PathRetreat<'a> {
    #[must_use]
    pub fn new(path: &'a str) -> Self {
        let segments = path.split('/').collect::<Vec<_>>();
        let split = segments.len();
        Self { segments, split }
    }

    /**
        Returns the current path, which shrinks with every retreat.
    */
    #[must_use]
    pub fn path(&self) -> String {
        self.segments[..self.split].join("/")
    }

    /**
        Returns the current tail, which grows with every retreat.
    */
    #[must_use]
    pub fn tail(&self) -> String {
        self.segments[self.split..].join("/")
    }

    /**
        Returns the current tail, or `None` if nothing has been
        retreated yet.

        Unlike [`PathRetreat::tail`], this tells an empty trailing
        segment (as in `a/`) apart from there being no tail at all.
    */
    #[must_use]
    pub fn split_tail(&self) -> Option<String> {
        (self.split < self.segments.len()).then(|| self.tail())
    }

    /**
        Returns the current path and tail joined back together.
    */
    #[must_use]
    pub fn joined(&self) -> String {
        join_path_and_tail(&self.path(), self.split_tail().as_deref())
    }

    /**
        Returns `true` if the current path is a single segment
        and can not be shortened any further.
    */
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.split <= 1
    }

    /**
        Returns how many segments have been moved onto the tail.
    */
    #[must_use]
    pub fn retreated(&self) -> usize {
        self.segments.len() - self.split
    }

    /**
        Moves the last segment of the current path onto the tail.

        Returns `false` and does nothing if the path is already the root.
    */
    pub fn retreat(&mut self) -> bool {
        if self.is_root() {
            false
        } else {
            self.split -= 1;
            true
        }
    }
}

pub(crate) fn join_path_and_tail(path: &str, tail: Option<&str>) -> String {
    match tail {
        Some(tail) => format!("{path}/{tail}"),
        None => path.to_string(),
    }
}
