use clap::ValueEnum;
use derivative::Derivative;

/// How a conditional branch or loop body sees the variables around it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ScopeMode {
    /// Every block starts from an empty environment; enclosing variables
    /// read as 0 and only a returned value leaves the block.
    #[default]
    Isolated,
    /// Blocks start from a copy of the enclosing environment and write
    /// updates of existing variables back when they finish.
    Inherited,
}

#[derive(Derivative, Clone, Debug)]
#[derivative(Default)]
pub struct Config {
    pub scope: ScopeMode,
    #[derivative(Default(value = "true"))]
    pub show_tokens: bool,
}

impl Config {
    pub fn with_scope(mut self, scope: ScopeMode) -> Self {
        self.scope = scope;
        self
    }

    pub fn hide_tokens(mut self) -> Self {
        self.show_tokens = false;
        self
    }
}
