use similar::{ChangeTag, TextDiff};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Unchanged,
    Removed,
    Added,
}

impl From<ChangeTag> for SpanKind {
    fn from(tag: ChangeTag) -> Self {
        match tag {
            ChangeTag::Equal => SpanKind::Unchanged,
            ChangeTag::Delete => SpanKind::Removed,
            ChangeTag::Insert => SpanKind::Added,
        }
    }
}

/// A run of consecutive characters sharing one diff tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffSpan {
    pub kind: SpanKind,
    pub count: usize,
}

/// Character diff from `previous` to `observed`, grouped into spans.
/// Identical inputs give a single unchanged span; two empty inputs give none.
pub fn diff_chars(previous: &str, observed: &str) -> Vec<DiffSpan> {
    let diff = TextDiff::from_chars(previous, observed);
    let mut spans: Vec<DiffSpan> = Vec::new();

    for change in diff.iter_all_changes() {
        let kind = SpanKind::from(change.tag());
        match spans.last_mut() {
            Some(last) if last.kind == kind => last.count += 1,
            _ => spans.push(DiffSpan { kind, count: 1 }),
        }
    }

    spans
}

/// The unchanged prefix of a diff and the first change after it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadingChange {
    /// Characters unchanged before the first change (0 when the texts
    /// diverge at the first character)
    pub prefix: usize,
    pub first: Option<DiffSpan>,
    /// Everything after the first change is unchanged
    pub isolated: bool,
}

impl LeadingChange {
    pub fn of(spans: &[DiffSpan]) -> Self {
        let (prefix, rest) = match spans.first() {
            Some(span) if span.kind == SpanKind::Unchanged => (span.count, &spans[1..]),
            _ => (0, spans),
        };
        let first = rest.first().copied();
        let isolated = rest
            .iter()
            .skip(1)
            .all(|span| span.kind == SpanKind::Unchanged);

        Self {
            prefix,
            first,
            isolated,
        }
    }

    /// Exactly one character removed and nothing else changed
    pub fn is_single_removal(&self) -> bool {
        self.isolated
            && matches!(
                self.first,
                Some(DiffSpan {
                    kind: SpanKind::Removed,
                    count: 1
                })
            )
    }
}
