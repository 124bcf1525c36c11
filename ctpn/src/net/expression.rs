use std::collections::HashMap;

use super::Token;

/// Binding keyed by place id, as supplied for nets loaded from a [`crate::definition::NetDefinition`].
pub type BindingMap<C> = HashMap<String, Vec<Token<C>>>;

/// Maps the binding of a firing to the multiset of tokens an arc consumes or produces.
///
/// Evaluated once per arc and firing attempt. Implementations must be deterministic and free of
/// side effects; the order of the returned tokens is not significant, duplicates are.
///
/// Any `Fn(&B) -> Vec<Token<C>>` closure is an arc expression.
pub trait ArcExpression<C, B>: Send + Sync {
    fn evaluate(&self, binding: &B) -> Vec<Token<C>>;
}

impl<C, B, F> ArcExpression<C, B> for F
where
    F: Fn(&B) -> Vec<Token<C>> + Send + Sync,
{
    fn evaluate(&self, binding: &B) -> Vec<Token<C>> {
        self(binding)
    }
}

/// Pass-through expression: returns whatever tokens the binding holds under `key`.
#[derive(Clone, Debug)]
pub struct BindingLookup {
    key: String,
}

impl BindingLookup {
    pub fn new(key: impl Into<String>) -> Self {
        BindingLookup { key: key.into() }
    }
}

impl<C: Clone> ArcExpression<C, BindingMap<C>> for BindingLookup {
    fn evaluate(&self, binding: &BindingMap<C>) -> Vec<Token<C>> {
        binding.get(&self.key).cloned().unwrap_or_default()
    }
}

/// Expression that ignores the binding and always yields the same tokens.
#[derive(Clone, Debug)]
pub struct ConstantTokens<C> {
    tokens: Vec<Token<C>>,
}

impl<C> ConstantTokens<C> {
    pub fn new(tokens: impl IntoIterator<Item = Token<C>>) -> Self {
        ConstantTokens { tokens: tokens.into_iter().collect() }
    }

    pub fn empty() -> Self {
        ConstantTokens { tokens: Vec::new() }
    }

    /// Tokens with the given colors. Timestamps are zero; output arcs restamp them anyway and
    /// input arcs match by color only.
    pub fn values(values: impl IntoIterator<Item = C>) -> Self {
        Self::new(values.into_iter().map(|value| Token::new(value, 0)))
    }
}

impl<C, B> ArcExpression<C, B> for ConstantTokens<C>
where
    C: Clone + Send + Sync,
{
    fn evaluate(&self, _binding: &B) -> Vec<Token<C>> {
        self.tokens.clone()
    }
}
