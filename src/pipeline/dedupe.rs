use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    texts: HashSet<String>,
}

impl SeenSet {
    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let texts = lines
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        Self { texts }
    }

    pub fn contains(&self, text: &str) -> bool {
        self.texts.contains(text)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn commit<S: AsRef<str>>(&mut self, accepted: &[S]) {
        self.texts
            .extend(accepted.iter().map(|text| text.as_ref().to_string()));
    }
}

/// Returns the candidates not already in `seen`, in input order. Repeats within
/// `candidates` keep only their first occurrence. `seen` is left untouched;
/// callers commit the result themselves once it is persisted.
pub fn filter_new<S: AsRef<str>>(candidates: &[S], seen: &SeenSet) -> Vec<String> {
    let mut batch: HashSet<&str> = HashSet::new();
    candidates
        .iter()
        .map(|candidate| candidate.as_ref())
        .filter(|&text| !seen.contains(text) && batch.insert(text))
        .map(ToOwned::to_owned)
        .collect()
}
