/// Turns a raw name (field, transition, ...) into a translatable label.
pub trait LabelStrategy: Send + Sync {
    fn label(&self, name: &str, context: &str, kind: &str) -> String;
}

/// Human readable labels: `startReview` and `start_review` both become `Start review`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeLabelStrategy;

impl LabelStrategy for NativeLabelStrategy {
    fn label(&self, name: &str, _context: &str, _kind: &str) -> String {
        let words = split_words(name).join(" ");
        let mut chars = words.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Translation keys: `start_review` in context `workflow`, kind `transition`
/// becomes `workflow.transition_start_review`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnderscoreLabelStrategy;

impl LabelStrategy for UnderscoreLabelStrategy {
    fn label(&self, name: &str, context: &str, kind: &str) -> String {
        format!("{context}.{kind}_{}", split_words(name).join("_"))
    }
}

// Lowercased words, split on underscores, whitespace and camel-case humps.
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for c in name.trim().chars() {
        if c == '_' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.extend(c.to_lowercase());
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
