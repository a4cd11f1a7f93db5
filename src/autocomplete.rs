use std::{collections::HashMap, fmt};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Fold a word to its canonical (lowercase) form.
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Values accepted as a word frequency. NaN counts as not a number.
pub trait IntoFrequency {
    fn into_frequency(self) -> Result<f64, Error>;
}

impl IntoFrequency for f64 {
    fn into_frequency(self) -> Result<f64, Error> {
        if self.is_nan() {
            return Err(Error::InvalidInput("frequency is NaN".to_string()));
        }
        Ok(self)
    }
}

impl IntoFrequency for f32 {
    fn into_frequency(self) -> Result<f64, Error> {
        f64::from(self).into_frequency()
    }
}

macro_rules! int_frequency {
    ($($t:ty),*) => {
        $(impl IntoFrequency for $t {
            fn into_frequency(self) -> Result<f64, Error> {
                Ok(self as f64)
            }
        })*
    };
}

int_frequency!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl IntoFrequency for &str {
    fn into_frequency(self) -> Result<f64, Error> {
        match self.trim().parse::<f64>() {
            Ok(f) => f.into_frequency(),
            Err(_) => Err(Error::InvalidInput(format!(
                "frequency '{}' is not a number",
                self
            ))),
        }
    }
}

impl IntoFrequency for String {
    fn into_frequency(self) -> Result<f64, Error> {
        self.as_str().into_frequency()
    }
}

/// Values accepted as a completion limit. `None` means the limit could not
/// be interpreted, which yields no results.
pub trait IntoLimit {
    fn into_limit(self) -> Option<i64>;
}

macro_rules! int_limit {
    ($($t:ty),*) => {
        $(impl IntoLimit for $t {
            fn into_limit(self) -> Option<i64> {
                Some(i64::try_from(self).unwrap_or(i64::MAX))
            }
        })*
    };
}

int_limit!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl IntoLimit for &str {
    fn into_limit(self) -> Option<i64> {
        self.trim().parse().ok()
    }
}

impl IntoLimit for String {
    fn into_limit(self) -> Option<i64> {
        self.as_str().into_limit()
    }
}

#[derive(Default)]
struct Node {
    children: HashMap<char, Node>,
    is_word: bool,
    freq: f64,
}

impl Node {
    fn find(&self, path: &str) -> Option<&Node> {
        let mut node = self;
        for ch in path.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }
}

// Long chains would otherwise be dropped recursively, one stack frame per level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut stack: Vec<Node> = self.children.drain().map(|(_, n)| n).collect();
        while let Some(mut n) = stack.pop() {
            stack.extend(n.children.drain().map(|(_, c)| c));
        }
    }
}

/// Depth-first walk over `start` and its subtree without recursion. `visit`
/// receives the path spelled so far (starting with `prefix`), the node and its
/// depth relative to `start`.
fn walk<'a>(
    start: &'a Node,
    prefix: &str,
    mut visit: impl FnMut(&str, &'a Node, usize),
) {
    let mut path = prefix.to_string();
    visit(&path, start, 0);

    let mut stack = vec![start.children.iter()];
    while let Some(iter) = stack.last_mut() {
        match iter.next() {
            Some((ch, child)) => {
                path.push(*ch);
                visit(&path, child, stack.len());
                stack.push(child.children.iter());
            }
            None => {
                stack.pop();
                if !stack.is_empty() {
                    path.pop();
                }
            }
        }
    }
}

/// Index statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub words: usize,
    pub height: usize,
    pub nodes: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "words={} height={} nodes={}",
            self.words, self.height, self.nodes
        )
    }
}

/// In-memory trie of words and their frequencies for ranked prefix completion.
///
/// insert, remove and contains are O(len(word)). complete is O(m) to reach the
/// prefix node plus O(s + k log k) to walk its s-node subtree and rank the top k.
pub struct PrefixIndex {
    root: Node,
    words: usize,
    nodes: usize,
}

impl Default for PrefixIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PrefixIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixIndex")
            .field("words", &self.words)
            .field("nodes", &self.nodes)
            .finish()
    }
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self {
            root: Node::default(),
            words: 0,
            nodes: 1,
        }
    }

    /// Number of stored words.
    pub fn len(&self) -> usize {
        self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }

    /// Insert a word, or update its frequency if it is already stored.
    /// An empty word is ignored, whatever its frequency.
    pub fn insert(&mut self, word: &str, freq: impl IntoFrequency) -> Result<(), Error> {
        let word = fold(word);
        if word.is_empty() {
            return Ok(());
        }

        // Parse before touching the tree so a bad frequency leaves no trace.
        let freq = freq.into_frequency()?;

        let mut created = 0;
        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node.children.entry(ch).or_insert_with(|| {
                created += 1;
                Node::default()
            });
        }
        self.nodes += created;

        if !node.is_word {
            node.is_word = true;
            self.words += 1;
        }
        node.freq = freq;

        Ok(())
    }

    /// Remove a word and prune the nodes that no longer lead to any word.
    /// Returns false if the exact word was not stored.
    pub fn remove(&mut self, word: &str) -> bool {
        let word = fold(word);
        if word.is_empty() {
            return false;
        }
        let path: Vec<char> = word.chars().collect();

        // Find the deepest ancestor of the terminal node that must survive
        // pruning: the root, a word, or a node with more than one child.
        let mut keep = 0;
        let mut node = &self.root;
        for (i, ch) in path.iter().enumerate() {
            if i > 0 && (node.is_word || node.children.len() > 1) {
                keep = i;
            }
            match node.children.get(ch) {
                Some(n) => node = n,
                None => return false,
            }
        }
        if !node.is_word {
            return false;
        }
        let has_children = !node.children.is_empty();

        // Walk again mutably to the terminal node.
        let mut node = &mut self.root;
        for ch in &path {
            match node.children.get_mut(ch) {
                Some(n) => node = n,
                None => return false,
            }
        }
        node.is_word = false;
        node.freq = 0.0;
        self.words -= 1;

        if has_children {
            return true;
        }

        // Detach the dead chain below `keep`. Every node after it on the path
        // is a non-word with a single child, ending at the childless terminal.
        let mut parent = &mut self.root;
        for ch in &path[..keep] {
            match parent.children.get_mut(ch) {
                Some(n) => parent = n,
                None => return true,
            }
        }
        if parent.children.remove(&path[keep]).is_some() {
            self.nodes -= path.len() - keep;
        }

        true
    }

    /// Check if the exact word is stored.
    pub fn contains(&self, word: &str) -> bool {
        let word = fold(word);
        if word.is_empty() {
            return false;
        }
        self.root.find(&word).is_some_and(|n| n.is_word)
    }

    /// Top `k` stored words starting with `prefix`, by descending frequency and
    /// then ascending word. A missing prefix matches every word. A limit that
    /// is not a number or is <= 0 yields nothing.
    pub fn complete<'a>(
        &self,
        prefix: impl Into<Option<&'a str>>,
        k: impl IntoLimit,
    ) -> Vec<String> {
        let prefix = fold(prefix.into().unwrap_or(""));

        let k = match k.into_limit() {
            Some(k) if k > 0 => usize::try_from(k).unwrap_or(usize::MAX),
            _ => return Vec::new(),
        };

        let start = match self.root.find(&prefix) {
            Some(n) => n,
            None => return Vec::new(),
        };

        let mut found: Vec<(String, f64)> = Vec::new();
        walk(start, &prefix, |path, node, _| {
            if node.is_word {
                found.push((path.to_string(), node.freq));
            }
        });

        let rank = |a: &(String, f64), b: &(String, f64)| {
            b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
        };

        // Partition the top k to the front before sorting only those.
        if k < found.len() {
            found.select_nth_unstable_by(k - 1, rank);
            found.truncate(k);
        }
        found.sort_unstable_by(rank);

        found.into_iter().map(|(w, _)| w).collect()
    }

    /// Word count, tree height (root is depth 0) and node count (root included).
    pub fn stats(&self) -> Stats {
        let mut height = 0;
        walk(&self.root, "", |_, _, depth| height = height.max(depth));

        Stats {
            words: self.words,
            height,
            nodes: self.nodes,
        }
    }

    /// All stored (word, frequency) pairs in no particular order.
    pub fn items(&self) -> Vec<(String, f64)> {
        let mut out = Vec::with_capacity(self.words);
        walk(&self.root, "", |path, node, _| {
            if node.is_word {
                out.push((path.to_string(), node.freq));
            }
        });
        out
    }
}
